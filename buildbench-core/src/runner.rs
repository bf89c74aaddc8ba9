//! Process Runner
//!
//! Runs the unmeasured reset and warm-up commands. External build tools are
//! occasionally flaky (network fetches, daemons starting up), so a non-zero
//! exit is retried immediately, up to a fixed number of attempts.

use crate::process::{
    CommandStatus, ExecutionError, Invocation, OutputMode, ProcessExecutor, display_command,
};
use std::path::Path;
use tracing::{debug, warn};

/// Total attempts (first run plus retries) made by default
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// When and how often a failed command is re-run
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts allowed, including the first. Values below 1 act as 1.
    pub max_attempts: u32,
    /// Decides whether a failed attempt may be retried
    pub retry_if: fn(&CommandStatus) -> bool,
}

fn always_retry(_: &CommandStatus) -> bool {
    true
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_if: always_retry,
        }
    }
}

impl RetryPolicy {
    /// Unconditional retry with the given attempt budget
    pub fn attempts(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..Self::default()
        }
    }

    /// Never re-run a failed command
    pub fn no_retry() -> Self {
        Self::attempts(1)
    }

    /// Only retry failures accepted by `predicate`
    pub fn with_predicate(mut self, predicate: fn(&CommandStatus) -> bool) -> Self {
        self.retry_if = predicate;
        self
    }
}

/// Runs commands to completion, retrying non-zero exits
pub struct ProcessRunner<'a> {
    executor: &'a dyn ProcessExecutor,
    policy: RetryPolicy,
}

impl<'a> ProcessRunner<'a> {
    /// Runner with the default policy (3 unconditional attempts)
    pub fn new(executor: &'a dyn ProcessExecutor) -> Self {
        Self::with_policy(executor, RetryPolicy::default())
    }

    /// Runner with an explicit retry policy
    pub fn with_policy(executor: &'a dyn ProcessExecutor, policy: RetryPolicy) -> Self {
        Self { executor, policy }
    }

    /// Run `command` in `working_dir`, discarding its output when `quiet`.
    ///
    /// Spawn failures are returned at once; only non-zero exits are retried.
    pub fn run(
        &self,
        command: &[String],
        working_dir: &Path,
        quiet: bool,
    ) -> Result<(), ExecutionError> {
        let invocation = Invocation {
            command,
            working_dir,
            output: if quiet {
                OutputMode::Discard
            } else {
                OutputMode::Inherit
            },
        };
        let max_attempts = self.policy.max_attempts.max(1);

        let mut attempt = 1;
        loop {
            debug!(
                command = %display_command(command),
                attempt,
                max_attempts,
                "running step"
            );
            let status = self.executor.execute(&invocation)?;
            if status.success() {
                return Ok(());
            }

            if !(self.policy.retry_if)(&status) {
                return Err(ExecutionError::NonZeroExit {
                    command: display_command(command),
                    status,
                });
            }
            if attempt >= max_attempts {
                return Err(ExecutionError::RetryExhausted {
                    command: display_command(command),
                    attempts: attempt,
                    status,
                });
            }

            warn!(
                command = %display_command(command),
                %status,
                attempt,
                "step failed, retrying"
            );
            attempt += 1;
        }
    }
}
