//! Error types.
//!
//! Configuration and external-call failures are fatal and surface as
//! [`HealthError`]. Per-repository introspection problems never reach this
//! type; they are logged and degraded to "absent" where they happen.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors that abort the run before any report is written.
#[derive(Debug, Error)]
pub enum HealthError {
    /// A required environment variable is missing or blank.
    #[error("{var} env var is required (e.g. {var}={example})")]
    MissingEnv {
        var: &'static str,
        example: &'static str,
    },

    /// A directory the run depends on does not exist.
    #[error("{what} does not exist: {} ({hint})", .path.display())]
    MissingDirectory {
        what: &'static str,
        path: PathBuf,
        hint: &'static str,
    },

    /// An external command could not be started.
    #[error("failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// An external command exited unsuccessfully.
    #[error("`{command}` exited with {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: std::process::ExitStatus,
        stderr: String,
    },

    /// An external command produced output we could not interpret.
    #[error("unexpected response from `{command}`: {reason}")]
    InvalidResponse { command: String, reason: String },

    /// A repository listing entry carried neither a push nor a creation time.
    #[error("repository {repo} has no pushed_at or created_at timestamp")]
    MissingPushedAt { repo: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_env_message_names_variable() {
        let err = HealthError::MissingEnv {
            var: "ORG",
            example: "phys-sims",
        };
        assert_eq!(
            err.to_string(),
            "ORG env var is required (e.g. ORG=phys-sims)"
        );
    }

    #[test]
    fn test_missing_directory_message_names_path() {
        let err = HealthError::MissingDirectory {
            what: "REPOS_DIR",
            path: PathBuf::from("/tmp/nowhere"),
            hint: "clone repos first",
        };
        let msg = err.to_string();
        assert!(msg.contains("/tmp/nowhere"));
        assert!(msg.starts_with("REPOS_DIR does not exist"));
    }
}
