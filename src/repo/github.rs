//! GitHub access through the `gh` command-line tool.
//!
//! The repository listing and the issue/PR search counts are the only data
//! fetched remotely. Both go through `gh api`, which owns authentication and
//! pagination. Any failure here is fatal for the run.

use crate::error::HealthError;
use crate::models::RepoListing;
use serde_json::Value;
use std::fmt;
use tokio::process::Command;
use tracing::debug;

/// Remote data needed to build the report.
#[allow(async_fn_in_trait)]
pub trait RepoSource {
    /// Every repository of the organization visible to the caller.
    async fn list_repos(&self, org: &str) -> Result<Vec<RepoListing>, HealthError>;

    /// `total_count` of an issue search query.
    async fn search_count(&self, query: &str) -> Result<u64, HealthError>;
}

/// Kind of open item counted by a search query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKind {
    Issue,
    PullRequest,
}

impl SearchKind {
    fn qualifier(self) -> &'static str {
        match self {
            SearchKind::Issue => "is:issue",
            SearchKind::PullRequest => "is:pr",
        }
    }
}

impl fmt::Display for SearchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchKind::Issue => write!(f, "issues"),
            SearchKind::PullRequest => write!(f, "PRs"),
        }
    }
}

/// Search query counting open items of one kind in one repository.
///
/// Issues and PRs use disjoint qualifiers so neither count includes the other.
pub fn open_items_query(owner: &str, repo: &str, kind: SearchKind) -> String {
    format!("repo:{}/{} {} is:open", owner, repo, kind.qualifier())
}

/// Count open issues or PRs of a repository.
pub async fn count_open<S: RepoSource>(
    source: &S,
    owner: &str,
    repo: &str,
    kind: SearchKind,
) -> Result<u64, HealthError> {
    let count = source
        .search_count(&open_items_query(owner, repo, kind))
        .await?;
    debug!("{}/{}: {} open {}", owner, repo, count, kind);
    Ok(count)
}

/// [`RepoSource`] backed by the `gh` binary.
#[derive(Debug, Clone)]
pub struct GhCli {
    program: String,
}

impl Default for GhCli {
    fn default() -> Self {
        Self {
            program: "gh".to_string(),
        }
    }
}

impl GhCli {
    /// Run `gh` with the given arguments and return its trimmed stdout.
    async fn run(&self, args: &[&str]) -> Result<String, HealthError> {
        let command = format!("{} {}", self.program, args.join(" "));
        debug!("Running: {}", command);

        let output = Command::new(&self.program)
            .args(args)
            .output()
            .await
            .map_err(|source| HealthError::Spawn {
                command: command.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(HealthError::CommandFailed {
                command,
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

impl RepoSource for GhCli {
    async fn list_repos(&self, org: &str) -> Result<Vec<RepoListing>, HealthError> {
        let path = format!("orgs/{}/repos?per_page=100&type=all", org);
        let args = ["api", "--paginate", "--slurp", path.as_str()];
        let stdout = self.run(&args).await?;
        parse_listing(&format!("gh {}", args.join(" ")), &stdout)
    }

    async fn search_count(&self, query: &str) -> Result<u64, HealthError> {
        let field = format!("q={}", query);
        let args = ["api", "-X", "GET", "search/issues", "-f", field.as_str()];
        let stdout = self.run(&args).await?;
        parse_total_count(&format!("gh {}", args.join(" ")), &stdout)
    }
}

/// Parse a repository listing.
///
/// Slurped pagination yields an array of pages; a flat array is accepted too.
/// Empty output is an empty listing.
pub fn parse_listing(command: &str, stdout: &str) -> Result<Vec<RepoListing>, HealthError> {
    if stdout.trim().is_empty() {
        return Ok(Vec::new());
    }

    let invalid = |reason: String| HealthError::InvalidResponse {
        command: command.to_string(),
        reason,
    };

    let value: Value = serde_json::from_str(stdout).map_err(|e| invalid(e.to_string()))?;
    let Value::Array(items) = value else {
        return Err(invalid("expected a JSON array".to_string()));
    };

    let entries: Vec<Value> = if items.iter().all(Value::is_array) {
        items
            .into_iter()
            .flat_map(|page| match page {
                Value::Array(entries) => entries,
                _ => Vec::new(),
            })
            .collect()
    } else {
        items
    };

    entries
        .into_iter()
        .map(|entry| serde_json::from_value(entry).map_err(|e| invalid(e.to_string())))
        .collect()
}

/// Extract `total_count` from a search response.
pub fn parse_total_count(command: &str, stdout: &str) -> Result<u64, HealthError> {
    let value: Value =
        serde_json::from_str(stdout).map_err(|e| HealthError::InvalidResponse {
            command: command.to_string(),
            reason: e.to_string(),
        })?;

    value
        .get("total_count")
        .and_then(Value::as_u64)
        .ok_or_else(|| HealthError::InvalidResponse {
            command: command.to_string(),
            reason: "missing total_count".to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SLURPED: &str = include_str!("../../fixtures/repos_slurped.json");

    #[test]
    fn test_open_items_queries_are_disjoint() {
        let issues = open_items_query("acme", "fluxsim", SearchKind::Issue);
        let prs = open_items_query("acme", "fluxsim", SearchKind::PullRequest);

        assert_eq!(issues, "repo:acme/fluxsim is:issue is:open");
        assert_eq!(prs, "repo:acme/fluxsim is:pr is:open");
    }

    #[test]
    fn test_parse_slurped_pages() {
        let repos = parse_listing("gh api", SLURPED).unwrap();

        assert_eq!(repos.len(), 3);
        assert_eq!(repos[0].name, "fluxsim");
        assert!(repos[1].archived);
        assert_eq!(repos[1].default_branch(), "master");
        assert_eq!(repos[2].full_name, "acme/Notebooks");
        assert_eq!(repos[2].default_branch(), "main");
    }

    #[test]
    fn test_parse_flat_listing() {
        let flat = r#"[{"name": "a", "full_name": "acme/a", "pushed_at": "2026-01-01T00:00:00Z"}]"#;
        let repos = parse_listing("gh api", flat).unwrap();
        assert_eq!(repos.len(), 1);
        assert!(!repos[0].private);
    }

    #[test]
    fn test_parse_empty_listing() {
        assert!(parse_listing("gh api", "").unwrap().is_empty());
        assert!(parse_listing("gh api", "[]").unwrap().is_empty());
    }

    #[test]
    fn test_parse_listing_rejects_objects() {
        let err = parse_listing("gh api", r#"{"message": "Not Found"}"#).unwrap_err();
        assert!(matches!(err, HealthError::InvalidResponse { .. }));
    }

    #[test]
    fn test_parse_total_count() {
        let count = parse_total_count(
            "gh api",
            r#"{"total_count": 1532, "incomplete_results": false, "items": []}"#,
        )
        .unwrap();
        assert_eq!(count, 1532);

        assert!(parse_total_count("gh api", r#"{"items": []}"#).is_err());
        assert!(parse_total_count("gh api", "oops").is_err());
    }

    #[test]
    fn test_missing_binary_is_spawn_error() {
        let cli = GhCli {
            program: "definitely-not-a-real-gh-binary".to_string(),
        };
        let err = tokio_test::block_on(cli.search_count("repo:a/b is:pr is:open")).unwrap_err();
        assert!(matches!(err, HealthError::Spawn { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_failed_listing_is_command_failed() {
        let cli = GhCli {
            program: "false".to_string(),
        };
        let err = tokio_test::block_on(cli.list_repos("acme")).unwrap_err();
        match err {
            HealthError::CommandFailed { command, status, .. } => {
                assert!(command.starts_with("false api --paginate"));
                assert!(!status.success());
            }
            other => panic!("expected CommandFailed, got {:?}", other),
        }
    }
}
