//! Configuration loading from buildbench.toml
//!
//! Settings can be kept in a `buildbench.toml` file in the project root. The
//! file is discovered by walking up from the current directory; command-line
//! flags override anything it sets. Relative paths in the file are taken
//! relative to the directory holding it.

use buildbench_core::{DEFAULT_MAX_ATTEMPTS, Scenario};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// File name looked up during discovery
pub const CONFIG_FILE_NAME: &str = "buildbench.toml";

/// BuildBench configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BenchConfig {
    /// Runner configuration
    #[serde(default)]
    pub runner: RunnerConfig,
    /// Cache and project locations used by the built-in catalogue
    #[serde(default)]
    pub paths: PathsConfig,
    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
    /// Table-driven scenarios; replace the built-in catalogue when present
    #[serde(default, rename = "scenario", skip_serializing_if = "Vec::is_empty")]
    pub scenarios: Vec<Scenario>,
}

/// Runner configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Measured samples per scenario
    #[serde(default = "default_repeats")]
    pub repeats: usize,
    /// Attempts allowed for each reset/warm-up command
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Per-command timeout (e.g., "90s", "10m"); none when absent
    #[serde(default)]
    pub timeout: Option<String>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            repeats: default_repeats(),
            max_attempts: default_max_attempts(),
            timeout: None,
        }
    }
}

fn default_repeats() -> usize {
    5
}
fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}

/// Locations used by the built-in catalogue.
///
/// Unset values fall back to defaults derived from the project root and the
/// user's home directory.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PathsConfig {
    /// Repository containing `cli/build.sh` and the Grog workspace
    #[serde(default)]
    pub project_root: Option<PathBuf>,
    /// Pants workspace (default: `<project_root>/pants`)
    #[serde(default)]
    pub pants_dir: Option<PathBuf>,
    /// Pants cache directory (default: `~/.cache/pants`)
    #[serde(default)]
    pub pants_cache: Option<PathBuf>,
    /// pex cache directory (default: `~/.pex`)
    #[serde(default)]
    pub pex_cache: Option<PathBuf>,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Default output format: "human" or "json"
    #[serde(default = "default_format")]
    pub format: String,
    /// Write the report here instead of stdout
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            path: None,
        }
    }
}

fn default_format() -> String {
    "human".to_string()
}

impl BenchConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read {}: {}", path.display(), e))?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("invalid config {}: {}", path.display(), e))?;
        Ok(config)
    }

    /// Find `buildbench.toml` in `start` or any parent directory and load it
    pub fn discover_from(start: &Path) -> anyhow::Result<Option<(PathBuf, Self)>> {
        let mut dir = start.to_path_buf();
        loop {
            let config_path = dir.join(CONFIG_FILE_NAME);
            if config_path.is_file() {
                let config = Self::load(&config_path)?;
                return Ok(Some((config_path, config)));
            }
            if !dir.pop() {
                return Ok(None);
            }
        }
    }

    /// Resolve relative paths in this file against `base`, its directory
    pub fn anchor_to(&mut self, base: &Path) {
        let paths = &mut self.paths;
        for path in [
            &mut paths.project_root,
            &mut paths.pants_dir,
            &mut paths.pants_cache,
            &mut paths.pex_cache,
        ]
        .into_iter()
        .flatten()
        {
            *path = base.join(&*path);
        }
        if let Some(path) = &mut self.output.path {
            *path = base.join(&*path);
        }
        self.scenarios = std::mem::take(&mut self.scenarios)
            .into_iter()
            .map(|scenario| scenario.anchored_at(base))
            .collect();
    }

    /// Parsed runner timeout
    pub fn timeout(&self) -> anyhow::Result<Option<Duration>> {
        self.runner.timeout.as_deref().map(parse_duration).transpose()
    }

    /// Generate a default configuration as TOML string
    pub fn default_toml() -> String {
        r#"# BuildBench Configuration

[runner]
# Measured samples per scenario
repeats = 5
# Attempts for each reset/warm-up command (measured runs are never retried)
max_attempts = 3
# Kill any command running longer than this (uncomment to enable)
# timeout = "30m"

[paths]
# Repository holding cli/build.sh and the Grog workspace (default: current directory)
# project_root = "."
# Pants workspace (default: <project_root>/pants)
# pants_dir = "pants"
# Caches purged by reset steps
# pants_cache = "/home/me/.cache/pants"
# pex_cache = "/home/me/.pex"

[output]
# Output format: human or json
format = "human"
# Write the report to a file instead of stdout (uncomment to enable)
# path = "target/buildbench/report.json"

# Scenarios declared here replace the built-in Pants/uv/Grog catalogue.
# [[scenario]]
# label = "make: clean build"
# working_dir = "."
# command = ["make", "-j8"]
# reset = [{ kind = "run", command = ["make", "clean"], quiet = true }]
# warmup = [{ kind = "remove-path", path = "build/.stamp" }]
"#
        .to_string()
    }
}

/// Parse duration string (e.g., "3s", "500ms", "2m"); a bare number is seconds
pub fn parse_duration(s: &str) -> anyhow::Result<Duration> {
    let s = s.trim();
    if s.is_empty() {
        return Err(anyhow::anyhow!("Empty duration string"));
    }

    // Find where the number ends and unit begins
    let (num_part, unit_part) = s
        .char_indices()
        .find(|(_, c)| c.is_alphabetic())
        .map(|(i, _)| s.split_at(i))
        .unwrap_or((s, "s"));

    let value: f64 = num_part
        .trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid duration number: {}", num_part))?;
    if !value.is_finite() || value < 0.0 {
        return Err(anyhow::anyhow!("Invalid duration number: {}", num_part));
    }

    let multiplier: u64 = match unit_part.to_lowercase().as_str() {
        "ns" => 1,
        "us" | "µs" => 1_000,
        "ms" => 1_000_000,
        "s" => 1_000_000_000,
        "m" | "min" => 60_000_000_000,
        "h" => 3_600_000_000_000,
        _ => return Err(anyhow::anyhow!("Unknown duration unit: {}", unit_part)),
    };

    Ok(Duration::from_nanos((value * multiplier as f64) as u64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use buildbench_core::Step;

    #[test]
    fn test_default_config() {
        let config = BenchConfig::default();
        assert_eq!(config.runner.repeats, 5);
        assert_eq!(config.runner.max_attempts, 3);
        assert!(config.runner.timeout.is_none());
        assert_eq!(config.output.format, "human");
        assert!(config.scenarios.is_empty());
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("3s").unwrap(), Duration::from_secs(3));
        assert_eq!(parse_duration("500ms").unwrap(), Duration::from_millis(500));
        assert_eq!(parse_duration("100us").unwrap(), Duration::from_micros(100));
        assert_eq!(parse_duration("2m").unwrap(), Duration::from_secs(120));
        assert_eq!(parse_duration("1.5s").unwrap(), Duration::from_millis(1500));
        assert_eq!(parse_duration("90").unwrap(), Duration::from_secs(90));
        assert!(parse_duration("").is_err());
        assert!(parse_duration("5 parsecs").is_err());
        assert!(parse_duration("-1s").is_err());
    }

    #[test]
    fn test_parse_toml() {
        let toml_str = r#"
            [runner]
            repeats = 10
            timeout = "15m"

            [paths]
            pex_cache = "/tmp/pex"
        "#;

        let config: BenchConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.runner.repeats, 10);
        assert_eq!(config.timeout().unwrap(), Some(Duration::from_secs(900)));
        assert_eq!(config.paths.pex_cache, Some(PathBuf::from("/tmp/pex")));
        // Defaults should still apply
        assert_eq!(config.runner.max_attempts, 3);
        assert_eq!(config.output.format, "human");
    }

    #[test]
    fn test_parse_scenarios() {
        let toml_str = r#"
            [[scenario]]
            label = "make: clean build"
            working_dir = "/src"
            command = ["make", "-j8"]
            reset = [{ kind = "run", command = ["make", "clean"], quiet = true }]
            warmup = [{ kind = "remove-path", path = "/src/.stamp" }]

            [[scenario]]
            label = "make: no-op"
            working_dir = "/src"
            command = ["make"]
        "#;

        let config: BenchConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.scenarios.len(), 2);
        let first = &config.scenarios[0];
        assert_eq!(first.label(), "make: clean build");
        assert_eq!(first.reset(), &[Step::run_quiet(["make", "clean"])]);
        assert_eq!(first.warmup(), &[Step::remove("/src/.stamp")]);
        assert!(config.scenarios[1].reset().is_empty());
    }

    #[test]
    fn test_scenario_with_empty_command_rejected() {
        let toml_str = r#"
            [[scenario]]
            label = "broken"
            working_dir = "/src"
            command = []
        "#;
        assert!(toml::from_str::<BenchConfig>(toml_str).is_err());
    }

    #[test]
    fn test_default_toml_parses() {
        let config: BenchConfig = toml::from_str(&BenchConfig::default_toml()).unwrap();
        assert_eq!(config.runner.repeats, 5);
        assert!(config.scenarios.is_empty());
    }

    #[test]
    fn test_discover_walks_up() {
        let root = tempfile::tempdir().unwrap();
        std::fs::write(
            root.path().join(CONFIG_FILE_NAME),
            "[runner]\nrepeats = 7\n",
        )
        .unwrap();
        let nested = root.path().join("a/b");
        std::fs::create_dir_all(&nested).unwrap();

        let (path, config) = BenchConfig::discover_from(&nested).unwrap().unwrap();
        assert_eq!(path, root.path().join(CONFIG_FILE_NAME));
        assert_eq!(config.runner.repeats, 7);
    }

    #[test]
    fn test_anchor_to_config_dir() {
        let toml_str = r#"
            [paths]
            project_root = "."
            pants_cache = "caches/pants"
            pex_cache = "/abs/pex"

            [output]
            path = "out/report.json"

            [[scenario]]
            label = "here"
            working_dir = "."
            command = ["make"]
        "#;
        let mut config: BenchConfig = toml::from_str(toml_str).unwrap();
        config.anchor_to(Path::new("/repo"));

        assert_eq!(config.paths.project_root, Some(PathBuf::from("/repo")));
        assert_eq!(config.paths.pants_dir, None);
        assert_eq!(config.paths.pants_cache, Some(PathBuf::from("/repo/caches/pants")));
        assert_eq!(config.paths.pex_cache, Some(PathBuf::from("/abs/pex")));
        assert_eq!(config.output.path, Some(PathBuf::from("/repo/out/report.json")));
        assert_eq!(config.scenarios[0].working_dir(), Path::new("/repo"));
    }

    #[test]
    fn test_discover_reports_invalid_file() {
        let root = tempfile::tempdir().unwrap();
        std::fs::write(root.path().join(CONFIG_FILE_NAME), "[runner\n").unwrap();
        assert!(BenchConfig::discover_from(root.path()).is_err());
    }
}
