//! Timed Executor
//!
//! Runs the measured command exactly once. A failed measured run is never
//! retried: the retried sample would include whatever made the first attempt
//! fail, so the benchmark aborts instead.

use crate::process::{ExecutionError, Invocation, OutputMode, ProcessExecutor, display_command};
use std::path::Path;
use std::time::Instant;

/// Measures wall-clock duration of a single command run
pub struct TimedExecutor<'a> {
    executor: &'a dyn ProcessExecutor,
}

impl<'a> TimedExecutor<'a> {
    /// Wrap a process executor
    pub fn new(executor: &'a dyn ProcessExecutor) -> Self {
        Self { executor }
    }

    /// Run `command` in `working_dir` and return the elapsed seconds.
    ///
    /// Output is inherited so the run sees the same conditions as an
    /// interactive build.
    pub fn timed_run(
        &self,
        command: &[String],
        working_dir: &Path,
    ) -> Result<f64, ExecutionError> {
        let invocation = Invocation {
            command,
            working_dir,
            output: OutputMode::Inherit,
        };

        let start = Instant::now();
        let status = self.executor.execute(&invocation)?;
        let elapsed = start.elapsed();

        if !status.success() {
            return Err(ExecutionError::NonZeroExit {
                command: display_command(command),
                status,
            });
        }
        Ok(elapsed.as_secs_f64())
    }
}
