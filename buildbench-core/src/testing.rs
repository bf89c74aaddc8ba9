//! Fakes for the process and filesystem seams

use crate::fs::Filesystem;
use crate::process::{CommandStatus, ExecutionError, Invocation, OutputMode, ProcessExecutor};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};

/// One call observed by a fake
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Execute {
        command: Vec<String>,
        working_dir: PathBuf,
        output: OutputMode,
    },
    Remove(PathBuf),
}

/// Executor that replays scripted exit statuses and records every call.
///
/// Once the script runs out every further call succeeds.
#[derive(Default)]
pub struct ScriptedExecutor {
    script: RefCell<VecDeque<CommandStatus>>,
    calls: RefCell<Vec<Call>>,
}

impl ScriptedExecutor {
    pub fn new(codes: &[i32]) -> Self {
        Self {
            script: RefCell::new(codes.iter().map(|&c| CommandStatus::from_code(c)).collect()),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn always_failing() -> Self {
        Self::new(&[1; 64])
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

impl ProcessExecutor for ScriptedExecutor {
    fn execute(&self, invocation: &Invocation<'_>) -> Result<CommandStatus, ExecutionError> {
        self.calls.borrow_mut().push(Call::Execute {
            command: invocation.command.to_vec(),
            working_dir: invocation.working_dir.to_path_buf(),
            output: invocation.output,
        });
        Ok(self
            .script
            .borrow_mut()
            .pop_front()
            .unwrap_or(CommandStatus::SUCCESS))
    }
}

/// Filesystem that only records removals, sharing a call log with an executor
pub struct RecordingFilesystem<'a> {
    pub log: &'a ScriptedExecutor,
}

impl Filesystem for RecordingFilesystem<'_> {
    fn remove_all(&self, path: &Path) -> std::io::Result<()> {
        self.log
            .calls
            .borrow_mut()
            .push(Call::Remove(path.to_path_buf()));
        Ok(())
    }
}

pub fn argv(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}
