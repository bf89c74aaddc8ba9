//! Summary Statistics
//!
//! All figures are computed over the full sample set. Benchmark runs here are
//! few and expensive (whole tool invocations), so nothing is discarded as an
//! outlier.

use crate::Z_95;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from summarizing samples
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatsError {
    /// No samples were collected
    #[error("cannot summarize an empty sample set")]
    EmptySamples,

    /// A sample was NaN or infinite
    #[error("sample {index} is not a finite number")]
    NonFiniteSample {
        /// Position of the offending sample
        index: usize,
    },
}

/// Summary of one scenario's samples, in seconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStatistics {
    /// Number of samples
    pub sample_count: usize,
    /// Arithmetic mean
    pub mean: f64,
    /// Sample standard deviation (n - 1 divisor), 0 for a single sample
    pub std_dev: f64,
    /// 95% confidence half-width of the mean, 0 for fewer than two samples
    pub ci95: f64,
    /// Fastest sample
    pub min: f64,
    /// Slowest sample
    pub max: f64,
}

/// Compute summary statistics for a non-empty set of finite samples
pub fn compute_summary(samples: &[f64]) -> Result<SummaryStatistics, StatsError> {
    if samples.is_empty() {
        return Err(StatsError::EmptySamples);
    }
    if let Some(index) = samples.iter().position(|x| !x.is_finite()) {
        return Err(StatsError::NonFiniteSample { index });
    }

    let n = samples.len();
    let mean = samples.iter().sum::<f64>() / n as f64;

    let std_dev = if n < 2 {
        0.0
    } else {
        let variance = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
        variance.sqrt()
    };

    let ci95 = if n < 2 {
        0.0
    } else {
        Z_95 * std_dev / (n as f64).sqrt()
    };

    let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
    let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    // Summation rounding can push the mean a hair outside [min, max] when all
    // samples are (nearly) equal.
    let mean = mean.clamp(min, max);

    Ok(SummaryStatistics {
        sample_count: n,
        mean,
        std_dev,
        ci95,
        min,
        max,
    })
}

impl SummaryStatistics {
    /// Coefficient of variation (relative stddev, percent)
    pub fn coefficient_of_variation(&self) -> f64 {
        if self.mean == 0.0 {
            0.0
        } else {
            (self.std_dev / self.mean) * 100.0
        }
    }

    /// Lower and upper bounds of the 95% confidence interval
    pub fn ci_bounds(&self) -> (f64, f64) {
        (self.mean - self.ci95, self.mean + self.ci95)
    }
}
