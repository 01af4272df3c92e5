//! Partitioner configuration.
//!
//! The target balance ratio is an ordinary value owned by the `Engine` it
//! configures, rather than shared mutable state across every run.

use crate::error::{PartitionError, Result};

/// Default target ratio `r`: an even 50/50 split.
pub const DEFAULT_RATIO: f64 = 0.5;

/// Configuration for a partitioning run.
#[derive(Clone, Debug, PartialEq)]
pub struct PartitionConfig {
    /// Target fraction of cells assigned to block A. Must satisfy `0.0 < r < 1.0`.
    pub ratio: f64,
}

impl PartitionConfig {
    /// A config using the default ratio (0.5, i.e. an even split).
    pub fn new() -> Self {
        Self { ratio: DEFAULT_RATIO }
    }

    /// A config targeting the given ratio. Not validated until `validate` is
    /// called (`Engine::input_routine` does this at the start of ingestion).
    pub fn with_ratio(ratio: f64) -> Self {
        Self { ratio }
    }

    /// Checks `0.0 < ratio < 1.0`.
    pub fn validate(&self) -> Result<()> {
        if self.ratio > 0.0 && self.ratio < 1.0 {
            Ok(())
        } else {
            Err(PartitionError::InvalidRatio(self.ratio))
        }
    }
}

impl Default for PartitionConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_ratio_is_even_split() {
        assert_eq!(PartitionConfig::default().ratio, 0.5);
    }

    #[test]
    fn validate_rejects_out_of_range_ratios() {
        assert!(PartitionConfig::with_ratio(0.0).validate().is_err());
        assert!(PartitionConfig::with_ratio(1.0).validate().is_err());
        assert!(PartitionConfig::with_ratio(-0.2).validate().is_err());
        assert!(PartitionConfig::with_ratio(1.2).validate().is_err());
    }

    #[test]
    fn validate_accepts_interior_ratios() {
        assert!(PartitionConfig::with_ratio(0.3).validate().is_ok());
        assert!(PartitionConfig::with_ratio(0.99).validate().is_ok());
    }
}
