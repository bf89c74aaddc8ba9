//! Scenario Runner
//!
//! ```text
//! for i in 1..=repeats:
//!     reset steps      (retrying runner / filesystem)
//!     warm-up steps    (retrying runner)
//!     measured command (timed executor, no retry) → sample i
//! summarize(samples) → BenchResult
//! ```
//!
//! The first error ends the run. A scenario either yields all of its samples
//! or nothing.

use crate::fs::Filesystem;
use crate::process::{ExecutionError, ProcessExecutor};
use crate::progress::ProgressSink;
use crate::result::BenchResult;
use crate::runner::{ProcessRunner, RetryPolicy};
use crate::scenario::{Scenario, Step};
use crate::timed::TimedExecutor;
use buildbench_stats::{StatsError, compute_summary};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info};

/// Fatal errors while running a scenario
#[derive(Debug, Error)]
pub enum RunError {
    /// A reset, warm-up or measured command failed
    #[error(transparent)]
    Execution(#[from] ExecutionError),

    /// A reset path could not be removed
    #[error("failed to remove {}: {source}", .path.display())]
    RemovePath {
        /// Path being removed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Samples could not be summarized
    #[error(transparent)]
    Stats(#[from] StatsError),

    /// Zero repeats were requested
    #[error("repeat count must be at least 1")]
    InvalidRepeats,
}

/// Runs scenarios through the reset → warm-up → measure cycle
pub struct ScenarioRunner<'a> {
    executor: &'a dyn ProcessExecutor,
    filesystem: &'a dyn Filesystem,
    retry: RetryPolicy,
}

impl<'a> ScenarioRunner<'a> {
    /// Runner using the default retry policy for unmeasured steps
    pub fn new(executor: &'a dyn ProcessExecutor, filesystem: &'a dyn Filesystem) -> Self {
        Self {
            executor,
            filesystem,
            retry: RetryPolicy::default(),
        }
    }

    /// Override the retry policy for reset and warm-up commands
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Measure `scenario` `repeats` times and summarize the samples
    pub fn run_scenario(
        &self,
        scenario: &Scenario,
        repeats: usize,
        sink: &mut dyn ProgressSink,
    ) -> Result<BenchResult, RunError> {
        if repeats == 0 {
            return Err(RunError::InvalidRepeats);
        }

        info!(scenario = scenario.label(), repeats, "starting scenario");
        sink.scenario_started(scenario, repeats);

        let timed = TimedExecutor::new(self.executor);
        let mut samples = Vec::with_capacity(repeats);

        for repeat in 1..=repeats {
            // Reset first so warm-up always starts from a clean state
            self.run_steps(scenario, scenario.reset())?;
            self.run_steps(scenario, scenario.warmup())?;

            let seconds = timed.timed_run(scenario.command(), scenario.working_dir())?;
            samples.push(seconds);
            sink.sample_recorded(repeat, repeats, seconds);
        }

        let stats = compute_summary(&samples)?;
        let result = BenchResult {
            label: scenario.label().to_string(),
            command: scenario.command().to_vec(),
            stats,
        };

        info!(
            scenario = scenario.label(),
            mean_s = result.stats.mean,
            ci95_s = result.stats.ci95,
            "scenario complete"
        );
        sink.scenario_finished(&result);
        Ok(result)
    }

    fn run_steps(&self, scenario: &Scenario, steps: &[Step]) -> Result<(), RunError> {
        let runner = ProcessRunner::with_policy(self.executor, self.retry);
        for step in steps {
            debug!(scenario = scenario.label(), step = %step.describe(), "step");
            match step {
                Step::RemovePath { path } => {
                    // Relative paths name entries under the scenario's directory
                    let target = scenario.working_dir().join(path);
                    self.filesystem
                        .remove_all(&target)
                        .map_err(|source| RunError::RemovePath {
                            path: target.clone(),
                            source,
                        })?;
                }
                Step::Run {
                    command,
                    working_dir,
                    quiet,
                } => {
                    let dir = match working_dir {
                        Some(dir) => scenario.working_dir().join(dir),
                        None => scenario.working_dir().to_path_buf(),
                    };
                    runner.run(command, &dir, *quiet)?;
                }
            }
        }
        Ok(())
    }
}
