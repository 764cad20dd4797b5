//! Data models for the health report.
//!
//! This module contains the per-repository records built during a run and
//! the organization-wide summary computed from them.

use crate::error::HealthError;
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Branch assumed when the listing does not report one.
pub const FALLBACK_BRANCH: &str = "main";

/// One entry of the organization repository listing.
#[derive(Debug, Clone, Deserialize)]
pub struct RepoListing {
    pub name: String,
    pub full_name: String,
    #[serde(default)]
    pub private: bool,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub default_branch: Option<String>,
    /// `null` for repositories that never received a push.
    #[serde(default)]
    pub pushed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl RepoListing {
    /// Default branch, falling back to [`FALLBACK_BRANCH`].
    pub fn default_branch(&self) -> &str {
        self.default_branch
            .as_deref()
            .filter(|b| !b.is_empty())
            .unwrap_or(FALLBACK_BRANCH)
    }

    /// Last push instant, falling back to the creation time.
    pub fn last_push(&self) -> Result<DateTime<Utc>, HealthError> {
        self.pushed_at
            .or(self.created_at)
            .ok_or_else(|| HealthError::MissingPushedAt {
                repo: self.full_name.clone(),
            })
    }
}

/// Cached line-count breakdown for one repository.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocSnapshot {
    pub code: u64,
    pub comment: u64,
    pub blank: u64,
    /// Up to five `(language, code lines)` pairs, largest first.
    pub top_languages: Vec<(String, u64)>,
}

/// What a local checkout reveals about the project.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectInfo {
    /// `pyproject.toml` is present.
    pub has_manifest: bool,
    /// `project.name` declared in the manifest.
    pub project_name: Option<String>,
    /// A `tests/` directory is present.
    pub has_tests: bool,
    /// Number of workflow definitions under `.github/workflows`.
    pub workflow_count: usize,
    /// `.pre-commit-config.yaml` is present.
    pub has_precommit: bool,
}

/// Everything known about one repository for this run.
#[derive(Debug, Clone)]
pub struct RepoRecord {
    pub name: String,
    pub full_name: String,
    pub private: bool,
    pub archived: bool,
    pub default_branch: String,
    pub pushed_at: DateTime<Utc>,
    pub open_issues: u64,
    pub open_prs: u64,
    pub loc: LocSnapshot,
    pub project: ProjectInfo,
}

impl RepoRecord {
    /// At least one CI workflow is defined.
    pub fn has_ci(&self) -> bool {
        self.project.workflow_count > 0
    }
}

/// Organization-wide totals.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrgSummary {
    pub repos: usize,
    pub private: usize,
    pub code: u64,
    pub comment: u64,
    pub blank: u64,
    pub open_issues: u64,
    pub open_prs: u64,
    pub with_ci: usize,
    pub with_tests: usize,
    pub with_manifest: usize,
    pub with_precommit: usize,
}

impl OrgSummary {
    /// Creates a summary from the non-archived records.
    pub fn from_records(records: &[RepoRecord]) -> Self {
        let mut summary = Self::default();

        for record in records.iter().filter(|r| !r.archived) {
            summary.repos += 1;
            summary.code += record.loc.code;
            summary.comment += record.loc.comment;
            summary.blank += record.loc.blank;
            summary.open_issues += record.open_issues;
            summary.open_prs += record.open_prs;

            if record.private {
                summary.private += 1;
            }
            if record.has_ci() {
                summary.with_ci += 1;
            }
            if record.project.has_tests {
                summary.with_tests += 1;
            }
            if record.project.has_manifest {
                summary.with_manifest += 1;
            }
            if record.project.has_precommit {
                summary.with_precommit += 1;
            }
        }

        summary
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use chrono::Duration;

    /// A plain public repository pushed `days_ago` days before `now`.
    pub fn record(name: &str, code: u64, now: DateTime<Utc>, days_ago: i64) -> RepoRecord {
        RepoRecord {
            name: name.to_string(),
            full_name: format!("acme/{}", name),
            private: false,
            archived: false,
            default_branch: FALLBACK_BRANCH.to_string(),
            pushed_at: now - Duration::days(days_ago),
            open_issues: 0,
            open_prs: 0,
            loc: LocSnapshot {
                code,
                ..LocSnapshot::default()
            },
            project: ProjectInfo::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::record;
    use super::*;

    #[test]
    fn test_listing_fallbacks() {
        let listing: RepoListing = serde_json::from_str(
            r#"{
                "name": "empty",
                "full_name": "acme/empty",
                "private": true,
                "default_branch": null,
                "pushed_at": null,
                "created_at": "2026-02-12T21:12:34Z"
            }"#,
        )
        .unwrap();

        assert_eq!(listing.default_branch(), "main");
        assert!(listing.private);
        assert!(!listing.archived);
        assert_eq!(
            listing.last_push().unwrap().to_rfc3339(),
            "2026-02-12T21:12:34+00:00"
        );
    }

    #[test]
    fn test_listing_without_timestamps_is_an_error() {
        let listing: RepoListing =
            serde_json::from_str(r#"{"name": "x", "full_name": "acme/x"}"#).unwrap();
        assert!(matches!(
            listing.last_push(),
            Err(HealthError::MissingPushedAt { .. })
        ));
    }

    #[test]
    fn test_summary_totals() {
        let now = Utc::now();
        let mut a = record("a", 100, now, 1);
        a.loc.comment = 10;
        a.loc.blank = 5;
        a.open_issues = 3;
        a.open_prs = 1;
        a.private = true;
        a.project.workflow_count = 2;
        a.project.has_tests = true;

        let mut b = record("b", 250, now, 2);
        b.open_issues = 4;
        b.project.has_manifest = true;
        b.project.has_precommit = true;

        let summary = OrgSummary::from_records(&[a, b]);
        assert_eq!(summary.repos, 2);
        assert_eq!(summary.private, 1);
        assert_eq!(summary.code, 350);
        assert_eq!(summary.comment, 10);
        assert_eq!(summary.blank, 5);
        assert_eq!(summary.open_issues, 7);
        assert_eq!(summary.open_prs, 1);
        assert_eq!(summary.with_ci, 1);
        assert_eq!(summary.with_tests, 1);
        assert_eq!(summary.with_manifest, 1);
        assert_eq!(summary.with_precommit, 1);
    }

    #[test]
    fn test_summary_skips_archived() {
        let now = Utc::now();
        let mut archived = record("old", 10_000, now, 400);
        archived.archived = true;
        archived.open_issues = 9;

        let summary = OrgSummary::from_records(&[record("live", 42, now, 3), archived]);
        assert_eq!(summary.repos, 1);
        assert_eq!(summary.code, 42);
        assert_eq!(summary.open_issues, 0);
    }
}
