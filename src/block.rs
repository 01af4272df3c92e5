//! A partition half: a cell roster plus its `BucketArray`, and the `Engine`
//! method implementing `move_cell` — the heart of the FM heuristic.

use crate::bucket::BucketArray;
use crate::engine::Engine;
use crate::ids::{CellId, Side};

/// One of the two partition blocks.
#[derive(Clone, Debug)]
pub struct Block {
    /// Which side of the partition this is.
    pub side: Side,
    /// Member cells, in insertion order. Order is not semantically
    /// significant for the roster itself (only the bucket array's FIFO order
    /// matters for determinism).
    pub cells: Vec<CellId>,
    /// Gain-indexed priority structure over this block's cells.
    pub bucket: BucketArray,
}

impl Block {
    /// An empty block on `side`, with a bucket array sized for `pmax`.
    pub fn new(side: Side, pmax: u32) -> Self {
        Self {
            side,
            cells: Vec::new(),
            bucket: BucketArray::new(pmax),
        }
    }

    /// Number of cells currently assigned to this block.
    #[inline]
    pub fn size(&self) -> usize {
        self.cells.len()
    }

    fn push_roster(&mut self, id: CellId) {
        self.cells.push(id);
    }

    fn remove_roster(&mut self, id: CellId) {
        let pos = self
            .cells
            .iter()
            .position(|&c| c == id)
            .unwrap_or_else(|| panic!("cell {id:?} not on roster of block {:?}", self.side));
        self.cells.remove(pos);
    }
}

impl Engine {
    /// Registers `id` as a member of `side`'s roster and parks it on that
    /// block's bucket-array free list; the cell is not reachable by
    /// `peek_max`/`get_candidate_base_cell` until `block_initialize` runs.
    /// Used only during ingestion.
    pub(crate) fn block_add_cell_to_free_list(&mut self, side: Side, id: CellId) {
        self.cells[id.as_usize()].side = side;
        let block = self.block_mut(side);
        block.push_roster(id);
        block.bucket.add_to_free_list(id);
    }

    /// Rebuilds `side`'s bucket array from scratch: unlocks every roster
    /// member, then re-buckets each at its current gain via the free-list
    /// primitives. Run once at the start of every pass (ingestion included),
    /// always after gains have been refreshed.
    ///
    /// A cell moved mid-pass is left off its destination's bucket entirely
    /// (see `block_add_cell_to_roster`) rather than staying visible with a
    /// stale gain, so there is nothing incremental to preserve here; a full
    /// rebuild is simplest and is the same O(roster size) cost as the gain
    /// recomputation that always precedes it.
    pub(crate) fn block_initialize(&mut self, side: Side) {
        let roster = self.block(side).cells.clone();
        for &id in &roster {
            self.unlock_cell(id);
        }
        {
            let block = self.block_mut(side);
            block.bucket.clear();
            for &id in &roster {
                block.bucket.add_to_free_list(id);
            }
        }
        let (block, cells) = self.block_and_cells_mut(side);
        block.bucket.initialize(|id| cells[id.as_usize()].gain);
        for &id in &block.cells {
            cells[id.as_usize()].bucketed = true;
        }
    }

    /// Removes `id` from `side`'s roster and bucket array.
    fn block_remove_cell(&mut self, side: Side, id: CellId) {
        let gain = self.cells[id.as_usize()].gain;
        let block = self.block_mut(side);
        block.remove_roster(id);
        block.bucket.remove_cell(id, gain);
        self.cells[id.as_usize()].bucketed = false;
    }

    /// Adds `id` to `side`'s roster only. `id` is locked for the rest of
    /// this pass and is therefore never a selectable candidate, so there is
    /// no point bucketing it; the next `block_initialize` picks it up.
    fn block_add_cell_to_roster(&mut self, side: Side, id: CellId) {
        self.block_mut(side).push_roster(id);
    }

    /// The candidate base cell for `side`: the head of its bucket array's
    /// highest non-empty gain bucket, or `None`.
    pub(crate) fn candidate_base_cell(&self, side: Side) -> Option<CellId> {
        self.block(side).bucket.peek_max()
    }

    /// Moves `id` from its current block to the opposite one, performing the
    /// full locking / gain-adjustment / reassignment protocol.
    pub(crate) fn move_cell(&mut self, id: CellId) {
        let from_side = self.cells[id.as_usize()].side;
        let to_side = from_side.opposite();

        self.lock_cell(id);
        self.adjust_gains_before_move(id, to_side);

        self.block_remove_cell(from_side, id);
        self.cells[id.as_usize()].side = to_side;
        self.block_add_cell_to_roster(to_side, id);

        self.adjust_net_distribution(id);
        self.adjust_gains_after_move(id, from_side);
    }

    /// For each net incident to `id`, inspects the "To" side's counts
    /// (`LT`/`FT`) and dispatches the appropriate free-cell gain bump,
    /// *before* `id` itself has moved.
    fn adjust_gains_before_move(&mut self, id: CellId, to_side: Side) {
        let nets = self.cells[id.as_usize()].nets.clone();
        for net_id in nets {
            let (lt, ft) = {
                let side = self.nets[net_id.as_usize()].side(to_side);
                (side.locked, side.free)
            };
            if lt == 0 {
                if ft == 0 {
                    self.net_inc_gains_of_free_cells(net_id);
                } else if ft == 1 {
                    self.net_dec_gain_tcell(net_id, to_side);
                }
            }
        }
    }

    /// For each net incident to `id`, inspects the "From" side's counts
    /// (`LF`/`FF`) — the side `id` just vacated — and dispatches the
    /// appropriate free-cell gain bump, *after* `id` has moved.
    fn adjust_gains_after_move(&mut self, id: CellId, from_side: Side) {
        let nets = self.cells[id.as_usize()].nets.clone();
        for net_id in nets {
            let (lf, ff) = {
                let side = self.nets[net_id.as_usize()].side(from_side);
                (side.locked, side.free)
            };
            if lf == 0 {
                if ff == 0 {
                    self.net_dec_gains_of_free_cells(net_id);
                } else if ff == 1 {
                    self.net_inc_gain_fcell(net_id, from_side);
                }
            }
        }
    }
}
