//! The partitioner: owns every arena and orchestrates ingestion, the
//! balancing pre-pass, and the outer FM convergence loop.
//!
//! `Engine` is the sole owner of `cells`/`nets`/`block_a`/`block_b`. Every
//! operation that needs to see more than one of those arenas at once — a
//! cell move, a gain bump, a lock transition — is implemented as an `Engine`
//! method (split across `cell.rs`, `net.rs`, `block.rs` by which arena each
//! one is mostly about) rather than as a method on the value it's named
//! after. Values hold ids and plain data; only the engine holds structure.

use tracing::{debug, info};

use crate::block::Block;
use crate::cell::Cell;
use crate::config::PartitionConfig;
use crate::error::{PartitionError, Result};
use crate::ids::{CellId, NetId, Side};
use crate::net::Net;
use crate::snapshot::Snapshot;

/// Owns the full problem state for one partitioning run.
pub struct Engine {
    pub(crate) cells: Vec<Cell>,
    pub(crate) nets: Vec<Net>,
    pub(crate) block_a: Block,
    pub(crate) block_b: Block,
    pub(crate) pmax: u32,
    pub(crate) cutset: usize,
    pub(crate) config: PartitionConfig,
    pub(crate) snapshot: Option<Snapshot>,
}

/// Constructs an engine with the default configuration (even balance split).
pub fn new_engine() -> Engine {
    Engine::new(PartitionConfig::default())
}

impl Engine {
    /// An engine with the given configuration. `pmax` starts at zero and the
    /// blocks start empty; call `input_routine` before anything else.
    pub fn new(config: PartitionConfig) -> Self {
        Self {
            cells: Vec::new(),
            nets: Vec::new(),
            block_a: Block::new(Side::A, 0),
            block_b: Block::new(Side::B, 0),
            pmax: 0,
            cutset: 0,
            config,
            snapshot: None,
        }
    }

    #[inline]
    pub(crate) fn block(&self, side: Side) -> &Block {
        match side {
            Side::A => &self.block_a,
            Side::B => &self.block_b,
        }
    }

    #[inline]
    pub(crate) fn block_mut(&mut self, side: Side) -> &mut Block {
        match side {
            Side::A => &mut self.block_a,
            Side::B => &mut self.block_b,
        }
    }

    /// Splits `self` into independent mutable borrows of one block and the
    /// cell arena, so a bucket rebuild can read cell gains while mutating
    /// that block's bucket array.
    pub(crate) fn block_and_cells_mut(&mut self, side: Side) -> (&mut Block, &mut Vec<Cell>) {
        match side {
            Side::A => (&mut self.block_a, &mut self.cells),
            Side::B => (&mut self.block_b, &mut self.cells),
        }
    }

    /// Current cutset: number of nets with endpoints on both sides.
    pub fn cutset(&self) -> usize {
        self.cutset
    }

    /// Ingests a problem: a symmetric 0/1 adjacency matrix, read from its
    /// strict upper triangle, optionally restricted to the rows/columns named
    /// by `selection` (in which case cell ids are the original row indices).
    ///
    /// Builds every cell and net, places all cells on block A, computes
    /// initial gains, and buckets block A. Block B starts empty.
    pub fn input_routine(&mut self, matrix: &[Vec<bool>], selection: Option<&[usize]>) -> Result<()> {
        self.config.validate()?;

        let n = matrix.len();
        for (row, entries) in matrix.iter().enumerate() {
            if entries.len() != n {
                return Err(PartitionError::RaggedMatrix {
                    row,
                    len: entries.len(),
                    expected: n,
                });
            }
        }

        let q: Vec<usize> = match selection {
            Some(sel) => {
                let mut seen = std::collections::HashSet::with_capacity(sel.len());
                for &index in sel {
                    if index >= n {
                        return Err(PartitionError::SelectionIndexOutOfRange { index, n });
                    }
                    if !seen.insert(index) {
                        return Err(PartitionError::DuplicateSelectionIndex(index));
                    }
                }
                sel.to_vec()
            }
            None => (0..n).collect(),
        };

        self.cells.clear();
        self.nets.clear();
        self.cutset = 0;

        let mut cell_ids: std::collections::HashMap<usize, CellId> = std::collections::HashMap::with_capacity(q.len());
        for &raw in &q {
            let id = CellId(self.cells.len());
            self.cells.push(Cell::new(id, raw, Side::A));
            cell_ids.insert(raw, id);
        }

        for (i, &qi) in q.iter().enumerate() {
            for &qj in &q[i + 1..] {
                if matrix[qi][qj] {
                    let ci = cell_ids[&qi];
                    let cj = cell_ids[&qj];

                    let net_id = NetId(self.nets.len());
                    self.nets.push(Net::new(net_id));

                    self.cells[ci.as_usize()].add_net(net_id);
                    self.cells[cj.as_usize()].add_net(net_id);
                    self.net_add_cell(net_id, ci, Side::A);
                    self.net_add_cell(net_id, cj, Side::A);
                }
            }
        }

        self.pmax = self.cells.iter().map(|c| c.pins).max().unwrap_or(0);
        self.block_a = Block::new(Side::A, self.pmax);
        self.block_b = Block::new(Side::B, self.pmax);

        for id in 0..self.cells.len() {
            self.block_add_cell_to_free_list(Side::A, CellId(id));
        }

        self.compute_initial_gains();
        self.block_initialize(Side::A);

        debug!(cells = self.cells.len(), nets = self.nets.len(), pmax = self.pmax, "ingested partitioning problem");
        Ok(())
    }

    /// Recomputes every cell's gain from its current side and incident nets'
    /// distributions. Cells currently bucketed are yanked to their new slot.
    pub(crate) fn compute_initial_gains(&mut self) {
        for i in 0..self.cells.len() {
            let side = self.cells[i].side;
            let nets = self.cells[i].nets.clone();
            let mut gain: i64 = 0;
            for net_id in &nets {
                let net = &self.nets[net_id.as_usize()];
                if net.side(side).count() == 1 {
                    gain += 1;
                }
                if net.side(side.opposite()).count() == 0 {
                    gain -= 1;
                }
            }
            let old_gain = self.cells[i].gain;
            self.cells[i].gain = gain;
            if self.cells[i].bucketed {
                let id = CellId(i);
                self.block_mut(side).bucket.yank(id, old_gain, gain);
            }
        }
    }

    /// Admissibility + balance factor of moving `id` (currently on `from`) to
    /// the opposite side, or `None` if the move would violate `smax`.
    fn balance_factor(&self, from: Side, smax: f64) -> Option<f64> {
        let a = self.block_a.size() as f64;
        let b = self.block_b.size() as f64;
        let (a_after, b_after) = match from {
            Side::A => (a - 1.0, b + 1.0),
            Side::B => (a + 1.0, b - 1.0),
        };
        let w = a_after + b_after;
        let r = self.config.ratio;
        if r * w - smax <= a_after && a_after <= r * w + smax {
            Some((a_after - r * w).abs())
        } else {
            None
        }
    }

    /// The candidate base cell from `side`, together with its balance
    /// factor, or `None` if `side` has no candidate or it is inadmissible.
    fn candidate_with_balance(&self, side: Side, smax: f64) -> Option<(CellId, f64)> {
        let candidate = self.candidate_base_cell(side)?;
        let factor = self.balance_factor(side, smax)?;
        Some((candidate, factor))
    }

    /// Highest-gain admissible cell across both blocks, breaking ties by
    /// balance factor (ties between the two blocks go to B).
    pub(crate) fn get_base_cell(&self) -> Option<CellId> {
        let smax = self.pmax as f64;
        let a = self.candidate_with_balance(Side::A, smax);
        let b = self.candidate_with_balance(Side::B, smax);
        match (a, b) {
            (None, None) => None,
            (Some((c, _)), None) => Some(c),
            (None, Some((c, _))) => Some(c),
            (Some((ca, fa)), Some((cb, fb))) => {
                if fa < fb {
                    Some(ca)
                } else {
                    Some(cb)
                }
            }
        }
    }

    /// Same admissibility predicate with `smax = 1`, evaluated against the
    /// current (not hypothetical) sizes.
    pub(crate) fn is_partition_balanced(&self) -> bool {
        let a = self.block_a.size() as f64;
        let b = self.block_b.size() as f64;
        let w = a + b;
        let r = self.config.ratio;
        r * w - 1.0 <= a && a <= r * w + 1.0
    }

    /// Moves cells from A to B, strictly, until the partition is balanced.
    /// Valid only as the very first pass, while every cell still sits on A.
    pub(crate) fn initial_pass(&mut self) {
        while !self.is_partition_balanced() {
            let bcell = self
                .candidate_base_cell(Side::A)
                .expect("block A must still have a candidate while the partition is unbalanced");
            self.move_cell(bcell);
        }
    }

    /// One full FM sweep: moves cells (in either direction) until no
    /// admissible base cell remains, tracking the best cutset seen and
    /// rolling back to it at the end.
    pub(crate) fn perform_pass(&mut self) {
        self.compute_initial_gains();
        self.block_initialize(Side::A);
        self.block_initialize(Side::B);
        self.snapshot = None;

        let mut best_cutset = usize::MAX;
        let mut moves = 0usize;
        while let Some(bcell) = self.get_base_cell() {
            self.move_cell(bcell);
            moves += 1;
            if self.cutset < best_cutset {
                best_cutset = self.cutset;
                self.take_snapshot();
            }
        }
        if self.snapshot.is_some() {
            self.load_snapshot();
        }
        debug!(moves, cutset = self.cutset, "completed pass");
    }

    /// Runs the balancing pre-pass followed by FM sweeps until the cutset
    /// stops improving, then returns the two sides' cell ids (as the caller's
    /// original row indices), each in an unspecified order.
    pub fn find_mincut(&mut self) -> (Vec<usize>, Vec<usize>) {
        if self.cells.is_empty() {
            return (Vec::new(), Vec::new());
        }

        self.initial_pass();

        let mut prev_cutset = usize::MAX;
        self.perform_pass();
        let mut iterations = 1u32;
        debug!(iterations, cutset = self.cutset, "pass complete");

        while self.cutset != prev_cutset {
            prev_cutset = self.cutset;
            self.perform_pass();
            iterations += 1;
            debug!(iterations, cutset = self.cutset, "pass complete");
        }

        info!(iterations, cutset = self.cutset, "found mincut");

        let a = self.block_a.cells.iter().map(|id| self.cells[id.as_usize()].row).collect();
        let b = self.block_b.cells.iter().map(|id| self.cells[id.as_usize()].row).collect();
        (a, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn matrix_from_edges(n: usize, edges: &[(usize, usize)]) -> Vec<Vec<bool>> {
        let mut m = vec![vec![false; n]; n];
        for &(i, j) in edges {
            m[i][j] = true;
            m[j][i] = true;
        }
        m
    }

    fn as_sets(a: Vec<usize>, b: Vec<usize>) -> (BTreeSet<usize>, BTreeSet<usize>) {
        (a.into_iter().collect(), b.into_iter().collect())
    }

    fn assert_invariants(engine: &Engine) {
        let computed_cut = engine
            .nets
            .iter()
            .filter(|n| n.a.count() > 0 && n.b.count() > 0)
            .count();
        assert_eq!(engine.cutset, computed_cut, "cutset out of sync with net cut flags");

        for net in &engine.nets {
            assert_eq!(net.a.free + net.a.locked, net.a.count());
            assert_eq!(net.b.free + net.b.locked, net.b.count());
            assert_eq!(net.a.count() as usize, net.a.cells.len());
            assert_eq!(net.b.count() as usize, net.b.cells.len());
        }

        let mut seen = BTreeSet::new();
        for &id in engine.block_a.cells.iter().chain(engine.block_b.cells.iter()) {
            assert!(seen.insert(id), "cell {id:?} present in both blocks");
        }
        assert_eq!(engine.block_a.size() + engine.block_b.size(), engine.cells.len());
    }

    #[test]
    fn two_disconnected_vertices() {
        let mut engine = new_engine();
        engine.input_routine(&matrix_from_edges(2, &[]), None).unwrap();
        let (a, b) = engine.find_mincut();
        assert_eq!(engine.cutset(), 0);
        assert_invariants(&engine);
        let (sa, sb) = as_sets(a, b);
        assert_eq!(sa.len() + sb.len(), 2);
    }

    #[test]
    fn single_edge() {
        let mut engine = new_engine();
        engine.input_routine(&matrix_from_edges(2, &[(0, 1)]), None).unwrap();
        let (a, b) = engine.find_mincut();
        assert_eq!(engine.cutset(), 1);
        assert_invariants(&engine);
        let (sa, sb) = as_sets(a, b);
        assert_eq!(sa.len(), 1);
        assert_eq!(sb.len(), 1);
    }

    #[test]
    fn triangle() {
        let mut engine = new_engine();
        engine
            .input_routine(&matrix_from_edges(3, &[(0, 1), (1, 2), (0, 2)]), None)
            .unwrap();
        let (a, b) = engine.find_mincut();
        assert_eq!(engine.cutset(), 2);
        assert_invariants(&engine);
        let mut sizes = [a.len(), b.len()];
        sizes.sort_unstable();
        assert_eq!(sizes, [1, 2]);
    }

    #[test]
    fn square_cycle() {
        let mut engine = new_engine();
        engine
            .input_routine(&matrix_from_edges(4, &[(0, 1), (1, 2), (2, 3), (3, 0)]), None)
            .unwrap();
        let (a, b) = engine.find_mincut();
        assert_eq!(engine.cutset(), 2);
        assert_invariants(&engine);
        assert_eq!(a.len() + b.len(), 4);
    }

    #[test]
    fn two_disjoint_triangles() {
        let mut engine = new_engine();
        let edges = [(0, 1), (1, 2), (0, 2), (3, 4), (4, 5), (3, 5)];
        engine.input_routine(&matrix_from_edges(6, &edges), None).unwrap();
        let (a, b) = engine.find_mincut();
        assert_eq!(engine.cutset(), 0);
        assert_invariants(&engine);
        let (sa, sb) = as_sets(a, b);
        assert_eq!(sa.len(), 3);
        assert_eq!(sb.len(), 3);
        let first_triangle: BTreeSet<usize> = [0, 1, 2].into_iter().collect();
        let second_triangle: BTreeSet<usize> = [3, 4, 5].into_iter().collect();
        assert!(
            (sa == first_triangle && sb == second_triangle) || (sa == second_triangle && sb == first_triangle)
        );
    }

    #[test]
    fn k4() {
        let mut engine = new_engine();
        let edges = [(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)];
        engine.input_routine(&matrix_from_edges(4, &edges), None).unwrap();
        let (a, b) = engine.find_mincut();
        assert_eq!(engine.cutset(), 4);
        assert_invariants(&engine);
        let mut sizes = [a.len(), b.len()];
        sizes.sort_unstable();
        assert_eq!(sizes, [2, 2]);
    }

    #[test]
    fn empty_input_returns_empty_partition_without_passes() {
        let mut engine = new_engine();
        engine.input_routine(&matrix_from_edges(0, &[]), None).unwrap();
        let (a, b) = engine.find_mincut();
        assert!(a.is_empty());
        assert!(b.is_empty());
        assert_eq!(engine.cutset(), 0);
    }

    #[test]
    fn selection_restricts_to_named_rows() {
        let mut engine = new_engine();
        let m = matrix_from_edges(5, &[(0, 1), (1, 2), (2, 3), (3, 4)]);
        engine.input_routine(&m, Some(&[1, 2, 3])).unwrap();
        let (a, b) = engine.find_mincut();
        let (sa, sb) = as_sets(a, b);
        let all: BTreeSet<usize> = sa.union(&sb).copied().collect();
        assert_eq!(all, [1usize, 2, 3].into_iter().collect());
    }

    #[test]
    fn ragged_matrix_is_rejected() {
        let mut engine = new_engine();
        let bad = vec![vec![false, false], vec![false]];
        let err = engine.input_routine(&bad, None).unwrap_err();
        assert!(matches!(err, PartitionError::RaggedMatrix { .. }));
    }

    #[test]
    fn selection_index_out_of_range_is_rejected() {
        let mut engine = new_engine();
        let m = matrix_from_edges(2, &[(0, 1)]);
        let err = engine.input_routine(&m, Some(&[0, 5])).unwrap_err();
        assert!(matches!(err, PartitionError::SelectionIndexOutOfRange { .. }));
    }

    #[test]
    fn duplicate_selection_index_is_rejected() {
        let mut engine = new_engine();
        let m = matrix_from_edges(2, &[(0, 1)]);
        let err = engine.input_routine(&m, Some(&[0, 1, 0])).unwrap_err();
        assert!(matches!(err, PartitionError::DuplicateSelectionIndex(_)));
    }

    #[test]
    fn invalid_ratio_is_rejected_at_ingestion() {
        let mut engine = Engine::new(PartitionConfig::with_ratio(1.5));
        let m = matrix_from_edges(2, &[(0, 1)]);
        let err = engine.input_routine(&m, None).unwrap_err();
        assert!(matches!(err, PartitionError::InvalidRatio(_)));
    }

    #[test]
    fn random_graphs_satisfy_invariants() {
        use rand::Rng;
        use rand::SeedableRng;

        let mut rng = rand::rngs::StdRng::seed_from_u64(0xFACADE);
        for _ in 0..50 {
            let n: usize = rng.gen_range(1..16);
            let mut edges = Vec::new();
            for i in 0..n {
                for j in (i + 1)..n {
                    if rng.gen_bool(0.3) {
                        edges.push((i, j));
                    }
                }
            }
            let mut engine = new_engine();
            engine.input_routine(&matrix_from_edges(n, &edges), None).unwrap();
            let (a, b) = engine.find_mincut();
            assert_invariants(&engine);
            assert_eq!(a.len() + b.len(), n);
            let w = n as f64;
            let a_len = a.len() as f64;
            assert!(0.5 * w - 1.0 <= a_len && a_len <= 0.5 * w + 1.0, "unbalanced for n={n}: |A|={a_len}");
        }
    }

    #[test]
    fn snapshot_round_trip_is_idempotent() {
        let mut engine = new_engine();
        let edges = [(0, 1), (1, 2), (0, 2)];
        engine.input_routine(&matrix_from_edges(3, &edges), None).unwrap();
        engine.initial_pass();
        let before_cutset = engine.cutset;
        let before_a: Vec<_> = engine.block_a.cells.clone();
        let before_b: Vec<_> = engine.block_b.cells.clone();

        engine.take_snapshot();
        engine.load_snapshot();

        assert_eq!(engine.cutset, before_cutset);
        assert_eq!(engine.block_a.cells, before_a);
        assert_eq!(engine.block_b.cells, before_b);
    }
}
