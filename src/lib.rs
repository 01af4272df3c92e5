//! Two-way hypergraph min-cut partitioning via the Fiduccia–Mattheyses
//! heuristic.
//!
//! ## Invariants
//!
//! - **Single owner.** `Engine` is the sole owner of the cell and net arenas;
//!   every cross-cutting mutation (a move, a lock, a gain bump) is an
//!   `Engine` method, never a method on the value it mutates.
//! - **Determinism.** Gain buckets are FIFO (append tail, select head); the
//!   same input and configuration always produce the same sequence of moves.
//! - **Fatal-by-default errors.** Only ingestion (a malformed adjacency
//!   matrix, selection, or balance ratio) returns `Result`. Everything past
//!   that boundary — calling `find_mincut` before `input_routine`, an
//!   invariant breach — is a programmer error and panics with a diagnostic.
//! - **Single-threaded.** No operation suspends or spawns; a run is owned
//!   entirely by one `Engine` instance with no shared mutable state.
//!
//! These invariants are enforced by design across the submodules below. If
//! any is violated at runtime, the failure mode is a precise panic, never UB.

#![forbid(unsafe_code)]
#![deny(missing_docs, rust_2018_idioms)]

/// Stable integer handles (`CellId`, `NetId`) and the `Side` enum.
pub mod ids;
/// Errors surfaced at the ingestion boundary.
pub mod error;
/// Target balance ratio and other run configuration.
pub mod config;
/// Gain-indexed bucket array, the priority structure behind a block.
pub mod bucket;
/// Vertex records and the lock/yank/net-distribution operations on them.
pub mod cell;
/// Hyperedge records and the incremental gain-update protocol.
pub mod net;
/// A partition half: cell roster plus bucket array, and `move_cell`.
pub mod block;
/// Whole-state checkpoint used to roll a pass back to its best cutset.
pub mod snapshot;
/// The partitioner: ingestion, the balancing pre-pass, and the outer loop.
pub mod engine;

pub use crate::config::{PartitionConfig, DEFAULT_RATIO};
pub use crate::engine::{new_engine, Engine};
pub use crate::error::{PartitionError, Result};
pub use crate::ids::{CellId, NetId, Side};
