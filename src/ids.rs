//! Stable integer handles used in place of the shared mutable references the
//! reference implementation relies on (Cell↔Net, Cell↔Block).
//!
//! `Engine` owns the `Cell`/`Net` arenas; every other type refers to them by
//! `CellId`/`NetId` rather than by pointer or borrow, which sidesteps the
//! reference cycles the original Python object graph has no trouble with.

/// Handle to a `Cell` in `Engine`'s cell arena.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellId(
    /// Index into the cell arena.
    pub usize,
);

impl CellId {
    /// Access the underlying index.
    #[inline]
    pub fn as_usize(self) -> usize {
        self.0
    }
}

/// Handle to a `Net` in `Engine`'s net arena.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NetId(
    /// Index into the net arena.
    pub usize,
);

impl NetId {
    /// Access the underlying index.
    #[inline]
    pub fn as_usize(self) -> usize {
        self.0
    }
}

/// One of the two partition blocks.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    /// Block A. All cells start here at ingestion.
    A,
    /// Block B. Empty until the balancing pre-pass moves cells into it.
    B,
}

impl Side {
    /// The other side.
    #[inline]
    pub fn opposite(self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }

    /// `"A"` / `"B"`, for use in diagnostics.
    #[inline]
    pub fn as_str(self) -> &'static str {
        match self {
            Side::A => "A",
            Side::B => "B",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_is_involutive() {
        assert_eq!(Side::A.opposite(), Side::B);
        assert_eq!(Side::B.opposite(), Side::A);
        assert_eq!(Side::A.opposite().opposite(), Side::A);
    }

    #[test]
    fn ids_are_ordered_by_index() {
        assert!(CellId(1) < CellId(2));
        assert!(NetId(0) < NetId(1));
    }
}
