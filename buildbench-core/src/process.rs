//! Process Execution
//!
//! The `ProcessExecutor` trait is the seam between the harness and the OS.
//! Implementations spawn one command, wait for it and report how it exited;
//! interpreting the exit status (retry, fail, time) is left to the callers.

use std::fmt;
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};
use thiserror::Error;

/// Errors raised while executing external commands
#[derive(Debug, Error)]
pub enum ExecutionError {
    /// The argument vector was empty
    #[error("cannot execute an empty command")]
    EmptyCommand,

    /// The OS refused to start the process
    #[error("failed to spawn `{command}`: {source}")]
    Spawn {
        /// Command line that was attempted
        command: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Waiting on a running child failed
    #[error("failed waiting for `{command}`: {source}")]
    Wait {
        /// Command line being waited on
        command: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The command ran and exited unsuccessfully
    #[error("`{command}` failed with {status}")]
    NonZeroExit {
        /// Command line that failed
        command: String,
        /// How it exited
        status: CommandStatus,
    },

    /// Every allowed attempt exited unsuccessfully
    #[error("`{command}` failed with {status} after {attempts} attempt(s)")]
    RetryExhausted {
        /// Command line that failed
        command: String,
        /// Number of attempts made
        attempts: u32,
        /// Exit status of the final attempt
        status: CommandStatus,
    },

    /// The command outlived the configured timeout and was killed
    #[error("`{command}` timed out after {timeout:?}")]
    TimedOut {
        /// Command line that was killed
        command: String,
        /// Configured limit
        timeout: Duration,
    },
}

/// How a finished process exited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandStatus {
    code: Option<i32>,
}

impl CommandStatus {
    /// Successful exit (code 0)
    pub const SUCCESS: CommandStatus = CommandStatus { code: Some(0) };

    /// Status from a plain exit code
    pub fn from_code(code: i32) -> Self {
        Self { code: Some(code) }
    }

    /// Status for a process terminated without an exit code (e.g. by a signal)
    pub fn terminated() -> Self {
        Self { code: None }
    }

    /// Exit code, if the process exited normally
    pub fn code(self) -> Option<i32> {
        self.code
    }

    /// Whether the process exited with code 0
    pub fn success(self) -> bool {
        self.code == Some(0)
    }
}

impl From<std::process::ExitStatus> for CommandStatus {
    fn from(status: std::process::ExitStatus) -> Self {
        Self {
            code: status.code(),
        }
    }
}

impl fmt::Display for CommandStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "exit code {}", code),
            None => write!(f, "termination by signal"),
        }
    }
}

/// What to do with a child's stdout and stderr
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Share the parent's console
    #[default]
    Inherit,
    /// Send both streams to the null device
    Discard,
}

/// A single request to run a command
#[derive(Debug, Clone, Copy)]
pub struct Invocation<'a> {
    /// Argument vector; the first element is the executable
    pub command: &'a [String],
    /// Directory the child starts in
    pub working_dir: &'a Path,
    /// Output handling
    pub output: OutputMode,
}

/// Spawns a command and waits for it to exit
pub trait ProcessExecutor {
    /// Run the invocation to completion.
    ///
    /// Returns `Ok` with the exit status whenever the process ran, whether or
    /// not it succeeded. `Err` is reserved for failures to start, wait on, or
    /// bound the process.
    fn execute(&self, invocation: &Invocation<'_>) -> Result<CommandStatus, ExecutionError>;
}

/// Render an argument vector the way it would be typed
pub fn display_command(command: &[String]) -> String {
    command.join(" ")
}

/// Runs commands as real OS processes
#[derive(Debug, Clone, Default)]
pub struct SystemExecutor {
    timeout: Option<Duration>,
}

/// Polling interval while waiting on a child with a timeout. Bounds how late
/// an exit is noticed, and so the error added to a timed sample.
const POLL_INTERVAL: Duration = Duration::from_millis(1);

impl SystemExecutor {
    /// Executor that waits on children indefinitely
    pub fn new() -> Self {
        Self::default()
    }

    /// Kill children that run longer than `timeout`
    pub fn with_timeout(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }

    fn wait_with_timeout(
        child: &mut Child,
        timeout: Duration,
        command: &[String],
    ) -> Result<std::process::ExitStatus, ExecutionError> {
        let deadline = Instant::now() + timeout;
        loop {
            let polled = child.try_wait().map_err(|source| ExecutionError::Wait {
                command: display_command(command),
                source,
            })?;
            if let Some(status) = polled {
                return Ok(status);
            }

            let now = Instant::now();
            if now >= deadline {
                // The child may exit between try_wait and kill; either way it is reaped below.
                let _ = child.kill();
                let _ = child.wait();
                return Err(ExecutionError::TimedOut {
                    command: display_command(command),
                    timeout,
                });
            }
            std::thread::sleep(POLL_INTERVAL.min(deadline - now));
        }
    }
}

impl ProcessExecutor for SystemExecutor {
    fn execute(&self, invocation: &Invocation<'_>) -> Result<CommandStatus, ExecutionError> {
        let (program, args) = invocation
            .command
            .split_first()
            .ok_or(ExecutionError::EmptyCommand)?;

        let mut command = Command::new(program);
        command.args(args).current_dir(invocation.working_dir);
        if invocation.output == OutputMode::Discard {
            command.stdout(Stdio::null()).stderr(Stdio::null());
        }

        let mut child = command.spawn().map_err(|source| ExecutionError::Spawn {
            command: display_command(invocation.command),
            source,
        })?;

        let status = match self.timeout {
            Some(timeout) => Self::wait_with_timeout(&mut child, timeout, invocation.command)?,
            None => child.wait().map_err(|source| ExecutionError::Wait {
                command: display_command(invocation.command),
                source,
            })?,
        };

        Ok(status.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_command_status() {
        assert!(CommandStatus::SUCCESS.success());
        assert!(!CommandStatus::from_code(2).success());
        assert!(!CommandStatus::terminated().success());
        assert_eq!(CommandStatus::from_code(2).to_string(), "exit code 2");
    }

    #[test]
    fn test_empty_command_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let invocation = Invocation {
            command: &[],
            working_dir: dir.path(),
            output: OutputMode::Discard,
        };
        let err = SystemExecutor::new().execute(&invocation).unwrap_err();
        assert!(matches!(err, ExecutionError::EmptyCommand));
    }

    #[test]
    fn test_missing_executable_is_spawn_error() {
        let dir = tempfile::tempdir().unwrap();
        let command = argv(&["buildbench-definitely-not-a-real-binary"]);
        let invocation = Invocation {
            command: &command,
            working_dir: dir.path(),
            output: OutputMode::Discard,
        };
        let err = SystemExecutor::new().execute(&invocation).unwrap_err();
        assert!(matches!(err, ExecutionError::Spawn { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_exit_code_reported() {
        let dir = tempfile::tempdir().unwrap();
        let command = argv(&["sh", "-c", "exit 3"]);
        let invocation = Invocation {
            command: &command,
            working_dir: dir.path(),
            output: OutputMode::Discard,
        };
        let status = SystemExecutor::new().execute(&invocation).unwrap();
        assert_eq!(status.code(), Some(3));
    }

    #[cfg(unix)]
    #[test]
    fn test_runs_in_working_dir() {
        let dir = tempfile::tempdir().unwrap();
        let command = argv(&["sh", "-c", "touch here"]);
        let invocation = Invocation {
            command: &command,
            working_dir: dir.path(),
            output: OutputMode::Inherit,
        };
        assert!(SystemExecutor::new().execute(&invocation).unwrap().success());
        assert!(dir.path().join("here").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_exit_seen_promptly_under_timeout() {
        assert!(POLL_INTERVAL <= Duration::from_millis(1));

        let dir = tempfile::tempdir().unwrap();
        let command = argv(&["sh", "-c", "exit 4"]);
        let invocation = Invocation {
            command: &command,
            working_dir: dir.path(),
            output: OutputMode::Discard,
        };
        let executor = SystemExecutor::with_timeout(Some(Duration::from_secs(30)));
        let status = executor.execute(&invocation).unwrap();
        assert_eq!(status.code(), Some(4));
    }

    #[cfg(unix)]
    #[test]
    fn test_timeout_kills_child() {
        let dir = tempfile::tempdir().unwrap();
        let command = argv(&["sleep", "5"]);
        let invocation = Invocation {
            command: &command,
            working_dir: dir.path(),
            output: OutputMode::Discard,
        };
        let executor = SystemExecutor::with_timeout(Some(Duration::from_millis(50)));
        let start = Instant::now();
        let err = executor.execute(&invocation).unwrap_err();
        assert!(matches!(err, ExecutionError::TimedOut { .. }));
        assert!(start.elapsed() < Duration::from_secs(4));
    }
}
