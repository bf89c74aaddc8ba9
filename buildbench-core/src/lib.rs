#![warn(missing_docs)]
//! BuildBench Core - Measurement Runtime
//!
//! This crate provides the reset → warm-up → measure cycle:
//! - `ProcessRunner` for unmeasured steps, with bounded retry
//! - `TimedExecutor` for the measured command, never retried
//! - `Scenario` and `Step` as plain, serializable scenario descriptors
//! - `ScenarioRunner` driving one scenario for N repeats
//!
//! Process spawning, filesystem deletion and progress reporting sit behind
//! the `ProcessExecutor`, `Filesystem` and `ProgressSink` traits.

mod fs;
mod process;
mod progress;
mod result;
mod runner;
mod scenario;
mod scenario_runner;
mod timed;

#[cfg(test)]
mod testing;

pub use fs::{Filesystem, SystemFilesystem, remove_path};
pub use process::{
    CommandStatus, ExecutionError, Invocation, OutputMode, ProcessExecutor, SystemExecutor,
    display_command,
};
pub use progress::{NullSink, ProgressEvent, ProgressSink, RecordingSink};
pub use result::BenchResult;
pub use runner::{DEFAULT_MAX_ATTEMPTS, ProcessRunner, RetryPolicy};
pub use scenario::{Scenario, ScenarioError, Step};
pub use scenario_runner::{RunError, ScenarioRunner};
pub use timed::TimedExecutor;
