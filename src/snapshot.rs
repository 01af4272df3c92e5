//! Whole-state checkpoint used to roll a pass back to its best cutset.
//!
//! The source snapshots each component (`Cell`, `Net`, `Block`,
//! `BucketArray`) independently, each holding its own `Option<Self>` copy of
//! its own fields. Since the engine here owns every arena directly, a single
//! deep clone of the four owned collections is equivalent and simpler: there
//! is nowhere else the state could be hiding. Move journaling (recording the
//! move sequence and replaying the best prefix) is the leaner alternative,
//! but it requires the gain deltas applied by each move to be exactly
//! reversible in reverse order, which is easy to get subtly wrong; a full
//! clone is trivially correct and this partitioner does not run at a scale
//! where the allocation cost matters.

use crate::block::Block;
use crate::cell::Cell;
use crate::net::Net;

/// A point-in-time copy of everything `take_snapshot`/`load_snapshot` touch.
#[derive(Clone, Debug)]
pub struct Snapshot {
    pub(crate) cells: Vec<Cell>,
    pub(crate) nets: Vec<Net>,
    pub(crate) block_a: Block,
    pub(crate) block_b: Block,
    pub(crate) cutset: usize,
}

impl crate::engine::Engine {
    /// Deep-copies the current state into `self.snapshot`, overwriting any
    /// earlier snapshot taken this pass.
    pub(crate) fn take_snapshot(&mut self) {
        self.snapshot = Some(Snapshot {
            cells: self.cells.clone(),
            nets: self.nets.clone(),
            block_a: self.block_a.clone(),
            block_b: self.block_b.clone(),
            cutset: self.cutset,
        });
    }

    /// Restores the state captured by the last `take_snapshot` call.
    ///
    /// # Panics
    /// Panics if no snapshot has been taken.
    pub(crate) fn load_snapshot(&mut self) {
        let snapshot = self.snapshot.take().expect("load_snapshot called with no snapshot taken");
        self.cells = snapshot.cells;
        self.nets = snapshot.nets;
        self.block_a = snapshot.block_a;
        self.block_b = snapshot.block_b;
        self.cutset = snapshot.cutset;
    }
}
