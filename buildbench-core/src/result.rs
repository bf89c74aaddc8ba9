//! Per-scenario result

use buildbench_stats::SummaryStatistics;
use serde::{Deserialize, Serialize};

/// Summary of one scenario's measured runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchResult {
    /// Scenario label
    pub label: String,
    /// Measured argument vector
    pub command: Vec<String>,
    /// Statistics over the samples, in seconds
    pub stats: SummaryStatistics,
}
