//! Local checkout introspection.
//!
//! This module inspects a repository checkout for the project files the
//! health report tracks. Every check degrades to "absent" on failure so a
//! missing or odd checkout never aborts the run.

pub mod loc;

use crate::models::ProjectInfo;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Python project manifest.
pub const MANIFEST_FILE: &str = "pyproject.toml";

/// Test suite directory.
pub const TESTS_DIR: &str = "tests";

/// CI workflow definitions.
pub const WORKFLOWS_DIR: &str = ".github/workflows";

/// pre-commit configuration.
pub const PRECOMMIT_FILE: &str = ".pre-commit-config.yaml";

/// Scanner for a single repository checkout.
pub struct CheckoutScanner {
    repo_root: PathBuf,
}

impl CheckoutScanner {
    /// Create a new scanner rooted at a checkout directory.
    pub fn new(repo_root: PathBuf) -> Self {
        Self { repo_root }
    }

    /// Inspect the checkout.
    pub fn inspect(&self) -> ProjectInfo {
        if !self.repo_root.is_dir() {
            debug!("No checkout at {}", self.repo_root.display());
            return ProjectInfo::default();
        }

        let manifest = self.repo_root.join(MANIFEST_FILE);
        let has_manifest = manifest.exists();
        let project_name = if has_manifest {
            read_project_name(&manifest)
        } else {
            None
        };

        ProjectInfo {
            has_manifest,
            project_name,
            has_tests: self.repo_root.join(TESTS_DIR).is_dir(),
            workflow_count: self.count_workflows(),
            has_precommit: self.repo_root.join(PRECOMMIT_FILE).exists(),
        }
    }

    /// Count workflow files directly under the workflows directory.
    fn count_workflows(&self) -> usize {
        let dir = self.repo_root.join(WORKFLOWS_DIR);
        if !dir.is_dir() {
            return 0;
        }

        WalkDir::new(&dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(e) => Some(e),
                Err(e) => {
                    debug!("Skipping unreadable workflow entry: {}", e);
                    None
                }
            })
            .filter(|e| e.file_type().is_file())
            .filter(|e| is_workflow_file(&e.file_name().to_string_lossy()))
            .count()
    }
}

/// Matches the `*.y*ml` pattern (`ci.yml`, `release.yaml`, `.ci.yml`).
fn is_workflow_file(name: &str) -> bool {
    match name.strip_suffix("ml") {
        Some(stem) => stem.contains(".y"),
        None => false,
    }
}

/// Read `project.name` from a manifest, tolerating malformed content.
fn read_project_name(path: &Path) -> Option<String> {
    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read {}: {}", path.display(), e);
            return None;
        }
    };

    let table: toml::Table = match toml::from_str(&content) {
        Ok(t) => t,
        Err(e) => {
            warn!("Ignoring malformed {}: {}", path.display(), e);
            return None;
        }
    };

    table
        .get("project")
        .and_then(|p| p.as_table())
        .and_then(|p| p.get("name"))
        .and_then(|n| n.as_str())
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(String::from)
}
