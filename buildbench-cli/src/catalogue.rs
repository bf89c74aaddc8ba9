//! Built-in Scenario Catalogue
//!
//! Pants, uv + pex and Grog building the same CLI under cold, cached and warm
//! conditions. Every cache location comes from `CatalogueConfig`; nothing here
//! reads the environment.

use crate::config::PathsConfig;
use buildbench_core::{Scenario, ScenarioError, Step};
use std::path::{Path, PathBuf};

/// Locations the catalogue's commands and reset steps operate on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogueConfig {
    /// Repository root (uv/pex and Grog scenarios run here)
    pub project_root: PathBuf,
    /// Pants workspace
    pub pants_dir: PathBuf,
    /// Pants cache, purged for cold Pants runs
    pub pants_cache: PathBuf,
    /// pex cache, purged for uv/pex and Grog runs
    pub pex_cache: PathBuf,
}

impl CatalogueConfig {
    /// Default layout under `project_root` and `home`
    pub fn with_defaults(project_root: impl Into<PathBuf>, home: &Path) -> Self {
        let project_root = project_root.into();
        Self {
            pants_dir: project_root.join("pants"),
            pants_cache: home.join(".cache").join("pants"),
            pex_cache: home.join(".pex"),
            project_root,
        }
    }

    /// Fill unset `paths` entries with defaults.
    ///
    /// Relative paths are taken relative to `cwd`. `home` is only consulted for
    /// cache paths the configuration leaves unset.
    pub fn resolve(paths: &PathsConfig, cwd: &Path, home: Option<&Path>) -> anyhow::Result<Self> {
        let project_root = match &paths.project_root {
            Some(root) => cwd.join(root),
            None => cwd.to_path_buf(),
        };
        let pants_dir = match &paths.pants_dir {
            Some(dir) => project_root.join(dir),
            None => project_root.join("pants"),
        };

        Ok(Self {
            pants_cache: cache_path(paths.pants_cache.as_deref(), cwd, home, &[".cache", "pants"])?,
            pex_cache: cache_path(paths.pex_cache.as_deref(), cwd, home, &[".pex"])?,
            pants_dir,
            project_root,
        })
    }
}

fn cache_path(
    configured: Option<&Path>,
    cwd: &Path,
    home: Option<&Path>,
    default: &[&str],
) -> anyhow::Result<PathBuf> {
    if let Some(path) = configured {
        return Ok(cwd.join(path));
    }
    let home = home.ok_or_else(|| {
        anyhow::anyhow!("cannot determine home directory; set paths.pants_cache and paths.pex_cache")
    })?;
    Ok(default.iter().fold(home.to_path_buf(), |p, part| p.join(part)))
}

/// The fixed, ordered scenario list
pub fn default_catalogue(config: &CatalogueConfig) -> Result<Vec<Scenario>, ScenarioError> {
    let root = &config.project_root;
    let pants = &config.pants_dir;

    let warm_pants_cache = || Step::run(["pants", "package", "cli:docker"]);
    let purge_uv_and_pex = || {
        [
            Step::run(["uv", "cache", "clean", "--force"]).in_dir(root),
            Step::remove(&config.pex_cache),
        ]
    };

    Ok(vec![
        Scenario::new(
            "Pants: Cold start (No Daemon, No Cache) - cli pex",
            pants,
            [
                "pants",
                "--no-pantsd",
                "--no-local-cache",
                "--no-remote-cache-read",
                "package",
                "cli:cli_bin",
            ],
        )?
        .with_reset([Step::remove(&config.pants_cache)])?,
        Scenario::new(
            "Pants: Cold start (No Daemon, With Cache) - cli pex",
            pants,
            ["pants", "--no-pantsd", "package", "cli:cli_bin"],
        )?
        .with_warmup([warm_pants_cache()])?,
        Scenario::new(
            "Pants: Warm start (With Daemon & Cache) - cli image",
            pants,
            ["pants", "package", "cli:docker"],
        )?
        .with_warmup([warm_pants_cache()])?,
        Scenario::new(
            "Uv/pex: Cold start (No Cache) - cli pex",
            root,
            ["bash", "./cli/build.sh"],
        )?
        .with_reset(purge_uv_and_pex())?,
        Scenario::new(
            "Uv/pex: Warm start (with uv caches) - cli pex",
            root,
            ["bash", "./cli/build.sh"],
        )?
        .with_reset(purge_uv_and_pex())?
        .with_warmup([Step::run_quiet(["bash", "./cli/build.sh"])])?,
        Scenario::new(
            "Grog: Docker Image Build - cli image",
            root,
            ["grog", "build", "//cli:image"],
        )?
        .with_reset(purge_uv_and_pex())?
        .with_warmup([Step::run_quiet(["grog", "build", "//cli:image"])])?,
    ])
}
