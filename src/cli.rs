//! Command-line interface.
//!
//! The tool takes no flags or positional arguments; everything is configured
//! through the environment. clap still provides `--help` and `--version` and
//! rejects stray arguments.

use clap::Parser;

const ENV_HELP: &str = "\
Environment:
  ORG          Organization to report on (required)
  REPOS_DIR    Directory with one checkout per repository [default: /tmp/org_repos]
  HEALTH_ROOT  Directory the report, cache and profile paths are resolved against [default: .]
  RUST_LOG     Log filter [default: info]";

/// OrgHealth - organization repository health report
///
/// Lists every repository of a GitHub organization through `gh`, combines
/// issue/PR counts, cached cloc snapshots and checkout introspection, and
/// writes docs/HEALTH_REPORT.md plus a summary block in profile/README.md.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(after_help = ENV_HELP)]
pub struct Args {}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
