//! Report Data Structures

use buildbench_core::BenchResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Complete harness report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Run metadata
    pub meta: ReportMeta,
    /// One entry per scenario, in declaration order
    pub results: Vec<BenchResult>,
}

/// Report metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMeta {
    /// buildbench version that produced the report
    pub version: String,
    /// When the report was built
    pub timestamp: DateTime<Utc>,
    /// Measured repeats per scenario
    pub repeats: usize,
    /// Wall time of the whole run, including resets and warm-ups
    pub total_duration_ms: f64,
}

/// Build a report from finished results
pub fn build_report(results: Vec<BenchResult>, repeats: usize, total_duration_ms: f64) -> Report {
    Report {
        meta: ReportMeta {
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: Utc::now(),
            repeats,
            total_duration_ms,
        },
        results,
    }
}
