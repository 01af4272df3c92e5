//! Hyperedge records, plus the `Engine` operations implementing the
//! incremental gain-update protocol that fires on every cell move.
//!
//! Built from a 0/1 adjacency matrix every net happens to have exactly two
//! endpoints, but the data model and the update rules below are written for
//! the general hyperedge case.

use crate::engine::Engine;
use crate::ids::{CellId, NetId, Side};

/// One side's bookkeeping for a `Net`.
#[derive(Clone, Debug, Default)]
pub struct NetSide {
    /// Count of incident cells on this side that have already moved this pass.
    pub locked: u32,
    /// Count of incident cells on this side still eligible to move.
    pub free: u32,
    /// Incident cells currently on this side. Order is not semantically
    /// significant; callers needing "the unique free cell" only ever do so
    /// when `free == 1`, at which point there is nothing to disambiguate.
    pub cells: Vec<CellId>,
}

impl NetSide {
    /// Total incident cells on this side, locked and free combined.
    pub fn count(&self) -> u32 {
        self.locked + self.free
    }

    pub(crate) fn lock_one(&mut self) {
        assert!(self.free > 0, "lock_one called with no free cells on this side");
        self.locked += 1;
        self.free -= 1;
    }

    pub(crate) fn unlock_one(&mut self) {
        assert!(self.locked > 0, "unlock_one called with no locked cells on this side");
        self.locked -= 1;
        self.free += 1;
    }

    fn add_cell(&mut self, id: CellId) {
        self.cells.push(id);
        self.free += 1;
    }

    fn remove_cell(&mut self, id: CellId) -> bool {
        let locked = if let Some(pos) = self.cells.iter().position(|&c| c == id) {
            self.cells.remove(pos);
            true
        } else {
            false
        };
        locked
    }

    /// The unique free cell on this side.
    ///
    /// Both call sites (`dec_gain_Tcell`, `inc_gain_Fcell`) only reach this
    /// when `locked == 0` on the side in question (that's the `LT == 0` /
    /// `LF == 0` half of their caller's precondition in `block.rs`), so
    /// `free == 1` in fact means the side has exactly one incident cell,
    /// full stop — there is nothing to filter by lock status.
    fn unique_free_cell(&self) -> CellId {
        debug_assert_eq!(self.locked, 0);
        debug_assert_eq!(self.free, 1);
        debug_assert_eq!(self.cells.len(), 1);
        self.cells[0]
    }
}

/// A hyperedge over the cell arena.
#[derive(Clone, Debug)]
pub struct Net {
    /// This net's own handle.
    pub id: NetId,
    /// All incident cells, both sides combined, each appearing once.
    pub cells: Vec<CellId>,
    /// Bookkeeping for the cells of this net currently on block A.
    pub a: NetSide,
    /// Bookkeeping for the cells of this net currently on block B.
    pub b: NetSide,
    /// True iff this net currently has endpoints on both sides.
    pub cut: bool,
}

impl Net {
    /// A fresh, uncut net with no incident cells.
    pub fn new(id: NetId) -> Self {
        Self {
            id,
            cells: Vec::new(),
            a: NetSide::default(),
            b: NetSide::default(),
            cut: false,
        }
    }

    /// This net's bookkeeping for `side`.
    #[inline]
    pub fn side(&self, side: Side) -> &NetSide {
        match side {
            Side::A => &self.a,
            Side::B => &self.b,
        }
    }

    /// Mutable access to this net's bookkeeping for `side`.
    #[inline]
    pub fn side_mut(&mut self, side: Side) -> &mut NetSide {
        match side {
            Side::A => &mut self.a,
            Side::B => &mut self.b,
        }
    }

    /// Idempotent insert of an incident cell, placing it on `initial_side`.
    pub fn add_cell(&mut self, id: CellId, initial_side: Side) {
        if self.cells.contains(&id) {
            return;
        }
        self.cells.push(id);
        self.side_mut(initial_side).add_cell(id);
    }
}

impl Engine {
    /// Moves `id` (already updated to `new_side` on the `Cell` record) across
    /// this net's bookkeeping: counts, lock/free tallies, cell lists, and the
    /// `cut` flag — bumping/dropping `self.cutset` on a `cut` transition.
    pub(crate) fn net_move_to_side(&mut self, net_id: NetId, id: CellId, new_side: Side) {
        let old_side = new_side.opposite();
        let locked = self.cells[id.as_usize()].locked;

        {
            let net = &mut self.nets[net_id.as_usize()];
            let removed = net.side_mut(old_side).remove_cell(id);
            debug_assert!(removed, "cell not present on its claimed old side");
            if locked {
                net.side_mut(old_side).locked -= 1;
            } else {
                net.side_mut(old_side).free -= 1;
            }
            net.side_mut(new_side).add_cell(id);
            if locked {
                // add_cell always stages the cell as free; lock it back up.
                net.side_mut(new_side).free -= 1;
                net.side_mut(new_side).locked += 1;
            }

            debug_assert_eq!(
                net.a.free + net.a.locked,
                net.a.count(),
                "side A free/locked out of sync"
            );
            debug_assert_eq!(
                net.b.free + net.b.locked,
                net.b.count(),
                "side B free/locked out of sync"
            );
        }

        let new_cut = {
            let net = &self.nets[net_id.as_usize()];
            net.a.count() > 0 && net.b.count() > 0
        };
        let net = &mut self.nets[net_id.as_usize()];
        if net.cut != new_cut {
            net.cut = new_cut;
            if new_cut {
                self.cutset += 1;
            } else {
                self.cutset -= 1;
            }
        }
    }

    /// Registers `id` on `net_id`, on `initial_side`, during ingestion.
    pub(crate) fn net_add_cell(&mut self, net_id: NetId, id: CellId, initial_side: Side) {
        self.nets[net_id.as_usize()].add_cell(id, initial_side);
    }

    /// Bumps the gain of every free (unlocked) cell on this net by +1 and
    /// yanks each to its new bucket position.
    pub(crate) fn net_inc_gains_of_free_cells(&mut self, net_id: NetId) {
        self.net_adjust_gains_of_free_cells(net_id, 1);
    }

    /// Symmetric -1 counterpart of `net_inc_gains_of_free_cells`.
    pub(crate) fn net_dec_gains_of_free_cells(&mut self, net_id: NetId) {
        self.net_adjust_gains_of_free_cells(net_id, -1);
    }

    fn net_adjust_gains_of_free_cells(&mut self, net_id: NetId, delta: i64) {
        let cells = self.nets[net_id.as_usize()].cells.clone();
        for id in cells {
            if !self.cells[id.as_usize()].locked {
                self.bump_gain(id, delta);
            }
        }
    }

    /// The unique free cell on `to_side` (precondition: exactly one free
    /// cell there) has its gain decremented and is yanked.
    pub(crate) fn net_dec_gain_tcell(&mut self, net_id: NetId, to_side: Side) {
        let net = &self.nets[net_id.as_usize()];
        let side = net.side(to_side);
        assert_eq!(side.free, 1, "dec_gain_Tcell requires exactly one free cell on to_side");
        let id = side.unique_free_cell();
        self.bump_gain(id, -1);
    }

    /// The unique free cell on `from_side` (precondition: exactly one free
    /// cell there) has its gain incremented and is yanked.
    ///
    /// Some implementations of this rule read the block's first cell here
    /// instead of the net's own free cell on the affected side, which
    /// silently breaks on any block with more than one cell. This follows
    /// the symmetric form of `dec_gain_Tcell` instead.
    pub(crate) fn net_inc_gain_fcell(&mut self, net_id: NetId, from_side: Side) {
        let net = &self.nets[net_id.as_usize()];
        let side = net.side(from_side);
        assert_eq!(side.free, 1, "inc_gain_Fcell requires exactly one free cell on from_side");
        let id = side.unique_free_cell();
        self.bump_gain(id, 1);
    }

    /// Applies `delta` to `id`'s gain and yanks it to the new bucket slot.
    fn bump_gain(&mut self, id: CellId, delta: i64) {
        let old_gain = self.cells[id.as_usize()].gain;
        self.cells[id.as_usize()].gain += delta;
        self.yank_cell(id, old_gain);
    }
}
