#![warn(missing_docs)]
//! # BuildBench
//!
//! Wall-clock benchmarking of build tools under controlled cache and daemon
//! conditions.
//!
//! Every scenario repeats a reset → warm-up → measure cycle:
//! - **Reset**: delete caches or run cleanup commands so the measured build
//!   starts from a known state
//! - **Warm-up**: prime caches or daemons, retried on failure
//! - **Measure**: time the build command once, never retried
//!
//! Samples are summarized as mean, sample standard deviation and a 95%
//! confidence half-width, then printed per scenario and in a final summary.
//!
//! ## Quick Start
//!
//! ```ignore
//! use buildbench::{NullSink, Scenario, ScenarioRunner, Step, SystemExecutor, SystemFilesystem};
//!
//! let scenario = Scenario::new("cold build", ".", ["cargo", "build"])?
//!     .with_reset([Step::remove("target")])?;
//! let executor = SystemExecutor::new();
//! let runner = ScenarioRunner::new(&executor, &SystemFilesystem);
//! let result = runner.run_scenario(&scenario, 5, &mut NullSink)?;
//! println!("{:.3}s ± {:.3}s", result.stats.mean, result.stats.ci95);
//! ```

// Re-export core types
pub use buildbench_core::{
    BenchResult, CommandStatus, ExecutionError, Filesystem, NullSink, ProcessExecutor,
    ProcessRunner, ProgressSink, RecordingSink, RetryPolicy, RunError, Scenario, ScenarioError,
    ScenarioRunner, Step, SystemExecutor, SystemFilesystem, TimedExecutor,
};

// Re-export stats
pub use buildbench_stats::{StatsError, SummaryStatistics, compute_summary};

// Re-export report types
pub use buildbench_report::{OutputFormat, Report, build_report};

/// Run the BuildBench CLI.
///
/// ```ignore
/// fn main() -> anyhow::Result<()> {
///     buildbench::run()
/// }
/// ```
pub use buildbench_cli::run;
