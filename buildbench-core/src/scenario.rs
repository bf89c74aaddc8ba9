//! Scenario Descriptors
//!
//! A scenario is plain data: what to measure, where, and which steps restore
//! and warm its preconditions. Reset and warm-up are lists of `Step`s rather
//! than callbacks so scenarios can be declared in configuration files and
//! inspected in tests.

use crate::process::display_command;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Invalid scenario definitions
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScenarioError {
    /// Scenario label was empty
    #[error("scenario label must not be empty")]
    EmptyLabel,

    /// Measured command had no executable
    #[error("scenario `{label}` has an empty command")]
    EmptyCommand {
        /// Offending scenario
        label: String,
    },

    /// A reset or warm-up `run` step had no executable
    #[error("scenario `{label}` has a run step with an empty command")]
    EmptyStepCommand {
        /// Offending scenario
        label: String,
    },
}

/// One reset or warm-up action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Step {
    /// Delete a file or directory tree; missing paths are ignored
    RemovePath {
        /// Path to delete, relative to the scenario's working directory
        path: PathBuf,
    },
    /// Run a command through the retrying process runner
    Run {
        /// Argument vector
        command: Vec<String>,
        /// Directory to run in, relative to the scenario's; defaults to the scenario's
        #[serde(default, skip_serializing_if = "Option::is_none")]
        working_dir: Option<PathBuf>,
        /// Discard the command's output
        #[serde(default)]
        quiet: bool,
    },
}

impl Step {
    /// Step deleting `path`
    pub fn remove(path: impl Into<PathBuf>) -> Self {
        Step::RemovePath { path: path.into() }
    }

    /// Step running `command` with its output shown
    pub fn run<I, S>(command: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Step::Run {
            command: command.into_iter().map(Into::into).collect(),
            working_dir: None,
            quiet: false,
        }
    }

    /// Step running `command` with its output discarded
    pub fn run_quiet<I, S>(command: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut step = Self::run(command);
        if let Step::Run { quiet, .. } = &mut step {
            *quiet = true;
        }
        step
    }

    /// Run this step in `dir` instead of the scenario's directory.
    /// No effect on `RemovePath`.
    pub fn in_dir(self, dir: impl Into<PathBuf>) -> Self {
        match self {
            Step::Run { command, quiet, .. } => Step::Run {
                command,
                working_dir: Some(dir.into()),
                quiet,
            },
            other => other,
        }
    }

    /// Short human description used in logs and dry runs
    pub fn describe(&self) -> String {
        match self {
            Step::RemovePath { path } => format!("remove {}", path.display()),
            Step::Run { command, quiet, .. } => {
                let suffix = if *quiet { " (quiet)" } else { "" };
                format!("run {}{}", display_command(command), suffix)
            }
        }
    }
}

/// Serialized form, validated into `Scenario`
#[derive(Deserialize)]
struct RawScenario {
    label: String,
    working_dir: PathBuf,
    command: Vec<String>,
    #[serde(default)]
    reset: Vec<Step>,
    #[serde(default)]
    warmup: Vec<Step>,
}

impl TryFrom<RawScenario> for Scenario {
    type Error = ScenarioError;

    fn try_from(raw: RawScenario) -> Result<Self, Self::Error> {
        let scenario = Scenario {
            label: raw.label,
            working_dir: raw.working_dir,
            command: raw.command,
            reset: raw.reset,
            warmup: raw.warmup,
        };
        scenario.validate()?;
        Ok(scenario)
    }
}

/// One named benchmark configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawScenario")]
pub struct Scenario {
    label: String,
    working_dir: PathBuf,
    command: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    reset: Vec<Step>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    warmup: Vec<Step>,
}

impl Scenario {
    /// Create a scenario with no reset or warm-up steps
    pub fn new<I, S>(
        label: impl Into<String>,
        working_dir: impl Into<PathBuf>,
        command: I,
    ) -> Result<Self, ScenarioError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let scenario = Self {
            label: label.into(),
            working_dir: working_dir.into(),
            command: command.into_iter().map(Into::into).collect(),
            reset: Vec::new(),
            warmup: Vec::new(),
        };
        scenario.validate()?;
        Ok(scenario)
    }

    /// Resolve a relative working directory against `base`
    pub fn anchored_at(mut self, base: &Path) -> Self {
        self.working_dir = base.join(&self.working_dir);
        self
    }

    /// Replace the reset steps
    pub fn with_reset(
        mut self,
        steps: impl IntoIterator<Item = Step>,
    ) -> Result<Self, ScenarioError> {
        self.reset = steps.into_iter().collect();
        self.validate()?;
        Ok(self)
    }

    /// Replace the warm-up steps
    pub fn with_warmup(
        mut self,
        steps: impl IntoIterator<Item = Step>,
    ) -> Result<Self, ScenarioError> {
        self.warmup = steps.into_iter().collect();
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<(), ScenarioError> {
        if self.label.trim().is_empty() {
            return Err(ScenarioError::EmptyLabel);
        }
        if self.command.is_empty() {
            return Err(ScenarioError::EmptyCommand {
                label: self.label.clone(),
            });
        }
        let empty_step = self
            .reset
            .iter()
            .chain(&self.warmup)
            .any(|step| matches!(step, Step::Run { command, .. } if command.is_empty()));
        if empty_step {
            return Err(ScenarioError::EmptyStepCommand {
                label: self.label.clone(),
            });
        }
        Ok(())
    }

    /// Human-readable label
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Directory the measured command runs in
    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Measured argument vector (never empty)
    pub fn command(&self) -> &[String] {
        &self.command
    }

    /// Measured command as a single line
    pub fn command_line(&self) -> String {
        display_command(&self.command)
    }

    /// Steps restoring the measured precondition
    pub fn reset(&self) -> &[Step] {
        &self.reset
    }

    /// Unmeasured steps run after reset
    pub fn warmup(&self) -> &[Step] {
        &self.warmup
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_command_rejected() {
        let err = Scenario::new("empty", "/tmp", Vec::<String>::new()).unwrap_err();
        assert_eq!(
            err,
            ScenarioError::EmptyCommand {
                label: "empty".to_string()
            }
        );
    }

    #[test]
    fn test_empty_label_rejected() {
        assert_eq!(
            Scenario::new("  ", "/tmp", ["true"]).unwrap_err(),
            ScenarioError::EmptyLabel
        );
    }

    #[test]
    fn test_empty_step_command_rejected() {
        let err = Scenario::new("s", "/tmp", ["true"])
            .unwrap()
            .with_warmup([Step::run(Vec::<String>::new())])
            .unwrap_err();
        assert!(matches!(err, ScenarioError::EmptyStepCommand { .. }));
    }

    #[test]
    fn test_builder_keeps_steps_in_order() {
        let scenario = Scenario::new("Uv/pex: Cold", "/repo", ["bash", "./cli/build.sh"])
            .unwrap()
            .with_reset([
                Step::run(["uv", "cache", "clean", "--force"]),
                Step::remove("/home/u/.pex"),
            ])
            .unwrap();

        assert_eq!(scenario.command_line(), "bash ./cli/build.sh");
        assert_eq!(scenario.reset().len(), 2);
        assert!(scenario.warmup().is_empty());
        assert_eq!(scenario.reset()[1].describe(), "remove /home/u/.pex");
    }

    #[test]
    fn test_anchored_at() {
        let base = Path::new("/repo");
        let relative = Scenario::new("s", "sub", ["true"]).unwrap().anchored_at(base);
        assert_eq!(relative.working_dir(), Path::new("/repo/sub"));

        let absolute = Scenario::new("s", "/elsewhere", ["true"]).unwrap().anchored_at(base);
        assert_eq!(absolute.working_dir(), Path::new("/elsewhere"));
    }

    #[test]
    fn test_step_helpers() {
        let step = Step::run_quiet(["grog", "build", "//cli:image"]).in_dir("/elsewhere");
        assert_eq!(
            step,
            Step::Run {
                command: vec!["grog".into(), "build".into(), "//cli:image".into()],
                working_dir: Some(PathBuf::from("/elsewhere")),
                quiet: true,
            }
        );
        assert_eq!(step.describe(), "run grog build //cli:image (quiet)");
        assert_eq!(Step::remove("/x").in_dir("/y"), Step::remove("/x"));
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: Result<Scenario, _> = serde_json::from_str(
            r#"{"label":"a","working_dir":"/w","command":["true"],
                "reset":[{"kind":"remove-path","path":"/c"}],
                "warmup":[{"kind":"run","command":["make"],"quiet":true}]}"#,
        );
        let scenario = ok.unwrap();
        assert_eq!(scenario.reset(), &[Step::remove("/c")]);
        assert_eq!(scenario.warmup(), &[Step::run_quiet(["make"])]);

        let bad: Result<Scenario, _> =
            serde_json::from_str(r#"{"label":"a","working_dir":"/w","command":[]}"#);
        assert!(bad.is_err());
    }
}
