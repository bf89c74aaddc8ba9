#![warn(missing_docs)]
//! BuildBench CLI Library
//!
//! Command-line driver for the harness: loads `buildbench.toml`, builds the
//! scenario catalogue, runs it and prints the comparative summary.
//!
//! # Example
//!
//! ```ignore
//! fn main() -> anyhow::Result<()> {
//!     buildbench_cli::run()
//! }
//! ```

mod catalogue;
mod config;
mod console;
mod driver;
mod planner;

pub use catalogue::{CatalogueConfig, default_catalogue};
pub use config::*;
pub use console::{ConsoleReporter, ProgressStream};
pub use driver::Harness;
pub use planner::{ExecutionPlan, build_plan};

use buildbench_core::{
    ProcessExecutor, RetryPolicy, ScenarioRunner, SystemExecutor, SystemFilesystem,
};
use buildbench_report::{OutputFormat, build_report};
use clap::Parser;
use regex::Regex;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::debug;

/// BuildBench CLI arguments
#[derive(Parser, Debug)]
#[command(name = "buildbench")]
#[command(
    author,
    version,
    about = "BuildBench - compare build tools under cold, cached and warm conditions"
)]
pub struct Cli {
    /// Measured samples per scenario [default: 5]
    #[arg(long)]
    pub repeats: Option<usize>,

    /// Configuration file (default: discover buildbench.toml upwards from the current directory)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Only run scenarios whose label matches this regex
    #[arg(long)]
    pub filter: Option<String>,

    /// Dry run - list scenarios without executing
    #[arg(long)]
    pub dry_run: bool,

    /// Output format: human, json
    #[arg(long)]
    pub format: Option<String>,

    /// Output file (stdout if not specified)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Kill any command running longer than this (e.g. "90s", "10m")
    #[arg(long)]
    pub timeout: Option<String>,

    /// Attempts allowed for each reset/warm-up command
    #[arg(long)]
    pub max_attempts: Option<u32>,

    /// Repository root for the built-in catalogue
    #[arg(long)]
    pub project_root: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Effective settings after layering buildbench.toml and CLI flags
#[derive(Debug, Clone)]
pub struct Settings {
    /// Measured samples per scenario
    pub repeats: usize,
    /// Attempts for unmeasured commands
    pub max_attempts: u32,
    /// Per-command timeout
    pub timeout: Option<Duration>,
    /// Report format
    pub format: OutputFormat,
    /// Report destination; stdout when `None`
    pub output: Option<PathBuf>,
    /// Scenario label filter
    pub filter: Option<Regex>,
}

impl Settings {
    /// Layer CLI flags over the configuration file
    pub fn resolve(cli: &Cli, config: &BenchConfig) -> anyhow::Result<Self> {
        let repeats = cli.repeats.unwrap_or(config.runner.repeats);
        if repeats == 0 {
            anyhow::bail!("--repeats must be at least 1");
        }

        let timeout = match &cli.timeout {
            Some(t) => Some(parse_duration(t)?),
            None => config.timeout()?,
        };

        let format: OutputFormat = cli
            .format
            .as_deref()
            .unwrap_or(&config.output.format)
            .parse()
            .map_err(|e: String| anyhow::anyhow!(e))?;

        let filter = cli
            .filter
            .as_deref()
            .map(Regex::new)
            .transpose()
            .map_err(|e| anyhow::anyhow!("invalid --filter: {}", e))?;

        Ok(Self {
            repeats,
            max_attempts: cli.max_attempts.unwrap_or(config.runner.max_attempts),
            timeout,
            format,
            output: cli.output.clone().or_else(|| config.output.path.clone()),
            filter,
        })
    }
}

/// Run the BuildBench CLI with the process arguments.
///
/// # Returns
/// Returns `Ok(())` once every scenario completed, or the first fatal error.
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run_with_cli(cli)
}

/// Run the BuildBench CLI with pre-parsed arguments.
pub fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    init_logging(cli.verbose);

    let cwd = std::env::current_dir()?;
    let (base_dir, config) = load_config(&cli, &cwd)?;
    let settings = Settings::resolve(&cli, &config)?;

    let builtin = config.scenarios.is_empty();
    let scenarios = if builtin {
        let mut paths = config.paths.clone();
        if let Some(root) = &cli.project_root {
            paths.project_root = Some(cwd.join(root));
        }
        let home = dirs::home_dir();
        let catalogue = CatalogueConfig::resolve(&paths, &base_dir, home.as_deref())?;
        default_catalogue(&catalogue)?
    } else {
        config.scenarios.clone()
    };

    let plan = build_plan(scenarios, settings.filter.as_ref());

    if cli.dry_run {
        print!("{}", plan.describe());
        return Ok(());
    }
    if plan.scenarios.is_empty() {
        println!("No scenarios found.");
        return Ok(());
    }

    let title = if builtin {
        "Starting Benchmark: Pants vs Grog (with error bars)".to_string()
    } else {
        format!(
            "Starting Benchmark: {} scenario(s), {} repeat(s) each",
            plan.scenarios.len(),
            settings.repeats
        )
    };

    let executor = SystemExecutor::with_timeout(settings.timeout);
    let mut reporter = ConsoleReporter::new(plan.scenarios.len(), progress_stream(&settings));
    run_plan(
        plan,
        &settings,
        &title,
        &executor,
        &mut reporter,
        &mut std::io::stdout(),
    )
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        "buildbench=debug"
    } else {
        "buildbench=info"
    };
    // A subscriber may already be installed when embedded (e.g. in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Load the configuration and return it with the directory its relative
/// paths resolve against: the file's directory, or `cwd` without a file.
fn load_config(cli: &Cli, cwd: &Path) -> anyhow::Result<(PathBuf, BenchConfig)> {
    let loaded = match &cli.config {
        Some(path) => {
            let path = cwd.join(path);
            let config = BenchConfig::load(&path)?;
            Some((path, config))
        }
        None => BenchConfig::discover_from(cwd)?,
    };

    match loaded {
        Some((path, mut config)) => {
            debug!(path = %path.display(), "loaded configuration");
            let base = path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| cwd.to_path_buf());
            config.anchor_to(&base);
            Ok((base, config))
        }
        None => Ok((cwd.to_path_buf(), BenchConfig::default())),
    }
}

/// JSON on stdout must not be mixed with progress lines
fn progress_stream(settings: &Settings) -> ProgressStream {
    if settings.format == OutputFormat::Json && settings.output.is_none() {
        ProgressStream::Stderr
    } else {
        ProgressStream::Stdout
    }
}

fn run_plan(
    plan: ExecutionPlan,
    settings: &Settings,
    title: &str,
    executor: &dyn ProcessExecutor,
    reporter: &mut ConsoleReporter,
    stdout: &mut dyn Write,
) -> anyhow::Result<()> {
    let filesystem = SystemFilesystem;
    let runner = ScenarioRunner::new(executor, &filesystem)
        .with_retry_policy(RetryPolicy::attempts(settings.max_attempts));

    reporter.line("");
    reporter.header(title);

    let start_time = Instant::now();
    let harness = Harness::new(plan.scenarios, settings.repeats, runner);
    let results = harness.run(reporter);
    reporter.finish();
    let results = results?;

    let total_duration_ms = start_time.elapsed().as_secs_f64() * 1000.0;
    let report = build_report(results, settings.repeats, total_duration_ms);
    let output = settings.format.render(&report)?;

    if let Some(ref path) = settings.output {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = std::fs::File::create(path)?;
        file.write_all(output.as_bytes())?;
        reporter.line(&format!("Report written to: {}", path.display()));
    } else {
        stdout.write_all(output.as_bytes())?;
        stdout.flush()?;
    }

    reporter.line("");
    reporter.header("Benchmark Complete");
    Ok(())
}
