//! Vertex records, plus the `Engine` operations that need the cell/net
//! arenas together: `lock`, `unlock`, `adjust_net_distribution`, `yank`.
//!
//! Those four operations all have to reach across into the net arena (to
//! bump lock/free tallies or to move a net's cell-side bookkeeping), so they
//! live as `Engine` methods rather than `Cell` methods — the arena owner is
//! the only thing that can see both sides at once. `Cell` itself stays plain
//! data plus the one self-contained operation, `add_net`.

use crate::engine::Engine;
use crate::ids::{CellId, NetId, Side};

/// A vertex to be partitioned.
#[derive(Clone, Debug)]
pub struct Cell {
    /// This cell's own handle, redundant with its arena position but handy
    /// to carry alongside a borrowed `&Cell`.
    pub id: CellId,
    /// Row/column index in the adjacency matrix this cell was built from.
    /// Distinct from `id`, which is dense and contiguous, while `row` may be
    /// sparse whenever ingestion used a `selection`.
    pub row: usize,
    /// Number of distinct incident nets; equals `nets.len()`.
    pub pins: u32,
    /// Incident nets, insertion order, each appearing at most once.
    pub nets: Vec<NetId>,
    /// Signed gain in `[-pmax, pmax]`: the cutset reduction from moving this
    /// cell to the opposite side.
    pub gain: i64,
    /// Current block membership.
    pub side: Side,
    /// True once this cell has been moved during the current pass.
    pub locked: bool,
    /// True iff this cell currently resides in its block's bucket array
    /// (as opposed to sitting on the free list, or not yet placed at all).
    pub bucketed: bool,
}

impl Cell {
    /// A fresh cell with no incident nets, not yet bucketed.
    pub fn new(id: CellId, row: usize, side: Side) -> Self {
        Self {
            id,
            row,
            pins: 0,
            nets: Vec::new(),
            gain: 0,
            side,
            locked: false,
            bucketed: false,
        }
    }

    /// Idempotent insert: adds `net` to the incidence set and increments
    /// `pins` only the first time a given net is seen.
    pub fn add_net(&mut self, net: NetId) {
        if !self.nets.contains(&net) {
            self.nets.push(net);
            self.pins += 1;
        }
    }
}

impl Engine {
    /// Idempotent free→locked transition. For every incident net, bumps
    /// that side's locked tally and drops its free tally.
    pub(crate) fn lock_cell(&mut self, id: CellId) {
        if self.cells[id.as_usize()].locked {
            return;
        }
        self.cells[id.as_usize()].locked = true;
        let side = self.cells[id.as_usize()].side;
        for i in 0..self.cells[id.as_usize()].nets.len() {
            let net_id = self.cells[id.as_usize()].nets[i];
            self.nets[net_id.as_usize()].side_mut(side).lock_one();
        }
    }

    /// Idempotent locked→free transition, the inverse of `lock_cell`.
    pub(crate) fn unlock_cell(&mut self, id: CellId) {
        if !self.cells[id.as_usize()].locked {
            return;
        }
        self.cells[id.as_usize()].locked = false;
        let side = self.cells[id.as_usize()].side;
        for i in 0..self.cells[id.as_usize()].nets.len() {
            let net_id = self.cells[id.as_usize()].nets[i];
            self.nets[net_id.as_usize()].side_mut(side).unlock_one();
        }
    }

    /// After `id`'s `side` field has been updated to reflect a move, tells
    /// every incident net to shift its per-side bookkeeping accordingly.
    pub(crate) fn adjust_net_distribution(&mut self, id: CellId) {
        let side = self.cells[id.as_usize()].side;
        let nets = self.cells[id.as_usize()].nets.clone();
        for net_id in nets {
            self.net_move_to_side(net_id, id, side);
        }
    }

    /// Delegates to the bucket array of `id`'s current block: removes it
    /// from its old gain bucket and reinserts it at its current gain.
    pub(crate) fn yank_cell(&mut self, id: CellId, old_gain: i64) {
        let side = self.cells[id.as_usize()].side;
        let new_gain = self.cells[id.as_usize()].gain;
        self.block_mut(side).bucket.yank(id, old_gain, new_gain);
    }
}
