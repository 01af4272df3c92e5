//! Errors surfaced at the engine's input boundary.
//!
//! Everything else (calling `find_mincut` before `input_routine`, an
//! invariant breach) is a programmer error and is reported by panicking with
//! a diagnostic, not by a `Result` — those conditions are not recoverable and
//! do not originate from caller-supplied data. Only the adjacency matrix,
//! selection, and ratio, which cross from caller-owned data into the engine,
//! are validated and reported here.

/// Errors produced while ingesting a partitioning problem.
#[derive(Debug, thiserror::Error)]
pub enum PartitionError {
    /// The matrix is not square: row `row` has `len` entries, but the matrix
    /// has `expected` rows (and is expected to have as many columns).
    #[error("matrix row {row} has {len} entries, expected {expected}")]
    RaggedMatrix {
        row: usize,
        len: usize,
        expected: usize,
    },

    /// A `selection` index referenced a row/column outside the matrix.
    #[error("selection index {index} out of range (matrix has {n} rows)")]
    SelectionIndexOutOfRange { index: usize, n: usize },

    /// A `selection` index appeared more than once.
    #[error("selection index {0} appears more than once")]
    DuplicateSelectionIndex(usize),

    /// The balance ratio `r` must lie strictly between 0 and 1.
    #[error("balance ratio must satisfy 0.0 < r < 1.0 (got {0})")]
    InvalidRatio(f64),
}

/// Shorthand for a `Result` whose error is `PartitionError`.
pub type Result<T> = std::result::Result<T, PartitionError>;
