//! OrgHealth - organization repository health report
//!
//! Aggregates per-repository metadata across a GitHub organization into a
//! markdown report and an auto-updated block of the profile README.
//!
//! Exit codes:
//!   0 - Report written
//!   1 - Configuration, I/O or external command failure

mod analysis;
mod cli;
mod config;
mod error;
mod models;
mod repo;
mod report;
mod scanner;

use analysis::AggregatedView;
use anyhow::{Context, Result};
use chrono::Utc;
use cli::Args;
use config::{Config, PROFILE_PATH, REPORT_PATH};
use repo::GhCli;
use std::io::IsTerminal;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Args::parse_args();

    if let Err(e) = init_logging() {
        eprintln!("Warning: {:#}", e);
    }

    info!("OrgHealth v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    if let Err(e) = run().await {
        error!("Report failed: {:#}", e);
        eprintln!("{}", failure_message(&e));
        std::process::exit(1);
    }
}

/// Line printed to stderr when the run fails.
fn failure_message(e: &anyhow::Error) -> String {
    format!("Error: {:#}", e)
}

/// Initialize logging from `RUST_LOG`, defaulting to `info`.
fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")
}

/// Run the complete report workflow.
async fn run() -> Result<()> {
    // Step 1: Configuration
    let config = Config::from_env()?;
    config.validate()?;
    config.prepare_dirs()?;
    info!(
        "Reporting on {} (checkouts in {})",
        config.org,
        config.repos_dir.display()
    );

    // Step 2: Collect every row before rendering anything
    let source = GhCli::default();
    let rows = analysis::build_rows(&source, &config, std::io::stderr().is_terminal())
        .await
        .with_context(|| format!("Failed to collect repository data for {}", config.org))?;

    // Step 3: Aggregate
    let view = AggregatedView::new(&rows, Utc::now());
    info!(
        "{} repos, {} LOC, {} stale",
        view.summary.repos,
        view.summary.code,
        view.stale.len()
    );

    // Step 4: Full report first, then the profile block
    let report_path = config.report_path();
    report::write_atomic(&report_path, &report::generate_markdown_report(&view))?;
    info!("Wrote {}", report_path.display());

    let block = report::render_profile_block(&view);
    report::update_profile(&config.profile_path(), &block)?;

    println!(
        "Wrote {} and updated {} (if present).",
        REPORT_PATH, PROFILE_PATH
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_message_includes_context_chain() {
        let err = anyhow::anyhow!("gh exited with status 1")
            .context("Failed to collect repository data for acme");

        assert_eq!(
            failure_message(&err),
            "Error: Failed to collect repository data for acme: gh exited with status 1"
        );
    }
}
