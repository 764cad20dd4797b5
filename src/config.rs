//! Run configuration.
//!
//! All settings come from the environment once at startup and are carried
//! through the run in a single [`Config`] value.

use crate::error::HealthError;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Checkout root used when `REPOS_DIR` is not set.
pub const DEFAULT_REPOS_DIR: &str = "/tmp/org_repos";

/// Full report location, relative to the root.
pub const REPORT_PATH: &str = "docs/HEALTH_REPORT.md";

/// Per-repository cloc snapshots, relative to the root.
pub const CLOC_DIR: &str = ".health/cloc_json";

/// Profile document receiving the spliced block, relative to the root.
pub const PROFILE_PATH: &str = "profile/README.md";

/// Root configuration structure.
#[derive(Debug, Clone)]
pub struct Config {
    /// Organization whose repositories are reported on.
    pub org: String,

    /// Directory holding one checkout per repository, named after the repo.
    pub repos_dir: PathBuf,

    /// Directory the fixed output and cache paths are resolved against.
    pub root: PathBuf,
}

impl Config {
    /// Build the configuration from the process environment.
    pub fn from_env() -> Result<Self, HealthError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    ///
    /// Blank values are treated the same as unset ones.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, HealthError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let org = get("ORG").ok_or(HealthError::MissingEnv {
            var: "ORG",
            example: "phys-sims",
        })?;

        let repos_dir = get("REPOS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_REPOS_DIR));

        let root = get("HEALTH_ROOT")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));

        Ok(Self {
            org,
            repos_dir: absolutize(&repos_dir),
            root,
        })
    }

    /// Check that the checkout root exists.
    pub fn validate(&self) -> Result<(), HealthError> {
        if !self.repos_dir.is_dir() {
            return Err(HealthError::MissingDirectory {
                what: "REPOS_DIR",
                path: self.repos_dir.clone(),
                hint: "workflow should clone repos first",
            });
        }
        Ok(())
    }

    /// Create the cache directory and the report's parent directory.
    pub fn prepare_dirs(&self) -> Result<()> {
        let cloc_dir = self.cloc_dir();
        std::fs::create_dir_all(&cloc_dir)
            .with_context(|| format!("Failed to create {}", cloc_dir.display()))?;

        if let Some(parent) = self.report_path().parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        Ok(())
    }

    pub fn cloc_dir(&self) -> PathBuf {
        self.root.join(CLOC_DIR)
    }

    pub fn report_path(&self) -> PathBuf {
        self.root.join(REPORT_PATH)
    }

    pub fn profile_path(&self) -> PathBuf {
        self.root.join(PROFILE_PATH)
    }

    /// Local checkout directory for a repository.
    pub fn checkout_dir(&self, repo_name: &str) -> PathBuf {
        self.repos_dir.join(repo_name)
    }
}

/// Make a path absolute without requiring it to exist.
fn absolutize(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()
                .map(|cwd| cwd.join(path))
                .unwrap_or_else(|_| path.to_path_buf())
        }
    })
}
