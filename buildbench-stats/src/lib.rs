#![warn(missing_docs)]
//! BuildBench Statistical Engine
//!
//! Reduces repeated timing samples into the figures reported per scenario:
//! - Mean and Bessel-corrected standard deviation
//! - Normal-approximation 95% confidence half-width of the mean
//! - Extremes

mod summary;

pub use summary::{StatsError, SummaryStatistics, compute_summary};

/// z-score for a two-sided 95% interval under the normal approximation
pub const Z_95: f64 = 1.96;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants() {
        assert!((Z_95 - 1.96).abs() < f64::EPSILON);
    }
}
