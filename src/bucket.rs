//! Gain-indexed bucket array: the priority structure behind a `Block`.
//!
//! Buckets are indexed by gain `g ∈ [-pmax, pmax]`. Each bucket is a FIFO
//! queue (append at the tail, select from the head) so that tie-breaking
//! among equal-gain cells is deterministic — the gain-update case analysis in
//! `net.rs` depends on that determinism when it reasons about "the unique
//! free cell" on a net's side.
//!
//! `max_gain` is a cursor, not a fact: it may overestimate the highest
//! non-empty bucket, and only `decrement_max_gain` brings it back down, one
//! empty bucket at a time, the first time something asks.

use crate::ids::CellId;

/// Gain-indexed priority structure for one `Block`.
#[derive(Clone, Debug)]
pub struct BucketArray {
    pmax: i64,
    /// `buckets[g + pmax]` holds the cells currently at gain `g`.
    buckets: Vec<Vec<CellId>>,
    /// Upper bound on the highest non-empty bucket index (gain, not offset).
    max_gain: i64,
    /// Cells registered on this block but not yet placed in a bucket.
    free_cell_list: Vec<CellId>,
}

impl BucketArray {
    /// A fresh bucket array sized for pin counts up to `pmax`.
    pub fn new(pmax: u32) -> Self {
        let pmax = pmax as i64;
        Self {
            pmax,
            buckets: vec![Vec::new(); (2 * pmax + 1) as usize],
            max_gain: -pmax,
            free_cell_list: Vec::new(),
        }
    }

    #[inline]
    fn offset(&self, gain: i64) -> usize {
        assert!(
            -self.pmax <= gain && gain <= self.pmax,
            "gain {gain} out of bucket range [-{}, {}]",
            self.pmax,
            self.pmax
        );
        (gain + self.pmax) as usize
    }

    /// Appends `id` to `bucket[gain]` and raises `max_gain` if needed.
    pub fn add_cell(&mut self, id: CellId, gain: i64) {
        let offset = self.offset(gain);
        self.buckets[offset].push(id);
        if gain > self.max_gain {
            self.max_gain = gain;
        }
    }

    /// Removes `id` from `bucket[gain]`. `id` must currently be present
    /// there. If that bucket was the `max_gain` bucket and is now empty,
    /// lazily decrements `max_gain` past any other empty buckets below it.
    pub fn remove_cell(&mut self, id: CellId, gain: i64) {
        let offset = self.offset(gain);
        let bucket = &mut self.buckets[offset];
        let pos = bucket
            .iter()
            .position(|&c| c == id)
            .unwrap_or_else(|| panic!("cell {id:?} not present in bucket at gain {gain}"));
        bucket.remove(pos);
        if gain == self.max_gain && self.buckets[offset].is_empty() {
            self.decrement_max_gain();
        }
    }

    /// Equivalent to `remove_cell(id, old_gain)` followed by
    /// `add_cell(id, new_gain)`; used whenever a cell's gain has been
    /// mutated and its bucket placement has gone stale.
    pub fn yank(&mut self, id: CellId, old_gain: i64, new_gain: i64) {
        self.remove_cell(id, old_gain);
        self.add_cell(id, new_gain);
    }

    /// Walks `max_gain` down, one step at a time, until it lands on a
    /// non-empty bucket or hits the floor. Does not guarantee the landing
    /// bucket is non-empty — only that no empty bucket was skipped past it.
    fn decrement_max_gain(&mut self) {
        while self.max_gain > -self.pmax {
            self.max_gain -= 1;
            if !self.buckets[self.offset(self.max_gain)].is_empty() {
                break;
            }
        }
    }

    /// The candidate base cell: the head of the `max_gain` bucket, or `None`
    /// if that bucket (and everything checked below it) is empty.
    pub fn peek_max(&self) -> Option<CellId> {
        self.buckets[self.offset(self.max_gain)].first().copied()
    }

    /// Parks `id` on the free list, to be bucketed later by `initialize`.
    pub fn add_to_free_list(&mut self, id: CellId) {
        self.free_cell_list.push(id);
    }

    /// Empties every bucket and resets `max_gain` to the floor, without
    /// touching the free list. Used at the start of a pass to rebuild a
    /// block's bucket array from its current roster.
    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            bucket.clear();
        }
        self.max_gain = -self.pmax;
    }

    /// Buckets every cell on the free list according to its current gain
    /// (obtained via `gain_of`), then clears the free list.
    pub fn initialize(&mut self, gain_of: impl Fn(CellId) -> i64) {
        let pending = std::mem::take(&mut self.free_cell_list);
        for id in pending {
            let gain = gain_of(id);
            self.add_cell(id, gain);
        }
    }

    /// Highest gain bound currently tracked (for diagnostics/tests).
    pub fn max_gain(&self) -> i64 {
        self.max_gain
    }

    /// True once `initialize` has drained the free list.
    pub fn free_list_is_empty(&self) -> bool {
        self.free_cell_list.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_then_peek_returns_highest_gain() {
        let mut b = BucketArray::new(3);
        b.add_cell(CellId(0), 1);
        b.add_cell(CellId(1), 3);
        b.add_cell(CellId(2), -2);
        assert_eq!(b.peek_max(), Some(CellId(1)));
        assert_eq!(b.max_gain(), 3);
    }

    #[test]
    fn fifo_tie_break_within_a_bucket() {
        let mut b = BucketArray::new(2);
        b.add_cell(CellId(5), 1);
        b.add_cell(CellId(6), 1);
        assert_eq!(b.peek_max(), Some(CellId(5)));
        b.remove_cell(CellId(5), 1);
        assert_eq!(b.peek_max(), Some(CellId(6)));
    }

    #[test]
    fn decrement_max_gain_skips_empty_buckets() {
        let mut b = BucketArray::new(4);
        b.add_cell(CellId(0), 4);
        b.add_cell(CellId(1), 1);
        b.remove_cell(CellId(0), 4);
        assert_eq!(b.max_gain(), 1);
        assert_eq!(b.peek_max(), Some(CellId(1)));
    }

    #[test]
    fn decrement_max_gain_can_bottom_out_empty() {
        let mut b = BucketArray::new(2);
        b.add_cell(CellId(0), 2);
        b.remove_cell(CellId(0), 2);
        assert_eq!(b.max_gain(), -2);
        assert_eq!(b.peek_max(), None);
    }

    #[test]
    fn yank_moves_cell_to_new_bucket() {
        let mut b = BucketArray::new(3);
        b.add_cell(CellId(0), 0);
        b.yank(CellId(0), 0, 2);
        assert_eq!(b.max_gain(), 2);
        assert_eq!(b.peek_max(), Some(CellId(0)));
    }

    #[test]
    fn initialize_drains_free_list_using_supplied_gains() {
        let mut b = BucketArray::new(2);
        b.add_to_free_list(CellId(0));
        b.add_to_free_list(CellId(1));
        let gains = [(CellId(0), -1), (CellId(1), 2)];
        b.initialize(|id| gains.iter().find(|(c, _)| *c == id).unwrap().1);
        assert!(b.free_list_is_empty());
        assert_eq!(b.peek_max(), Some(CellId(1)));
    }

    #[test]
    #[should_panic]
    fn out_of_range_gain_panics() {
        let mut b = BucketArray::new(1);
        b.add_cell(CellId(0), 5);
    }
}
