//! Per-repository metric collection.
//!
//! Enumerates the organization, then gathers search counts, the cached cloc
//! snapshot and checkout introspection for one repository at a time.

use crate::config::Config;
use crate::error::HealthError;
use crate::models::{RepoListing, RepoRecord};
use crate::repo::{count_open, RepoSource, SearchKind};
use crate::scanner::{loc, CheckoutScanner};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

/// Archived repositories are left out of the report unless this is set.
pub const INCLUDE_ARCHIVED: bool = false;

/// Build the record for every reported repository of the organization.
///
/// Repositories are processed strictly one after another. The first failing
/// remote call aborts the whole collection.
pub async fn build_rows<S: RepoSource>(
    source: &S,
    config: &Config,
    show_progress: bool,
) -> Result<Vec<RepoRecord>, HealthError> {
    let listings = source.list_repos(&config.org).await?;
    let total = listings.len();

    let listings: Vec<RepoListing> = listings
        .into_iter()
        .filter(|l| {
            let keep = INCLUDE_ARCHIVED || !l.archived;
            if !keep {
                debug!("Skipping archived repository {}", l.full_name);
            }
            keep
        })
        .collect();

    info!(
        "Found {} repositories in {} ({} archived skipped)",
        total,
        config.org,
        total - listings.len()
    );

    let progress = progress_bar(listings.len() as u64, show_progress);
    let mut rows = Vec::with_capacity(listings.len());

    for listing in &listings {
        progress.set_message(listing.name.clone());
        rows.push(build_record(source, config, listing).await?);
        progress.inc(1);
    }

    progress.finish_and_clear();
    Ok(rows)
}

/// Gather every metric for one repository.
pub async fn build_record<S: RepoSource>(
    source: &S,
    config: &Config,
    listing: &RepoListing,
) -> Result<RepoRecord, HealthError> {
    let pushed_at = listing.last_push()?;

    let open_prs = count_open(source, &config.org, &listing.name, SearchKind::PullRequest).await?;
    let open_issues = count_open(source, &config.org, &listing.name, SearchKind::Issue).await?;

    let loc = loc::load_snapshot(&config.cloc_dir(), &listing.name);
    let project = CheckoutScanner::new(config.checkout_dir(&listing.name)).inspect();

    let record = RepoRecord {
        name: listing.name.clone(),
        full_name: listing.full_name.clone(),
        private: listing.private,
        archived: listing.archived,
        default_branch: listing.default_branch().to_string(),
        pushed_at,
        open_issues,
        open_prs,
        loc,
        project,
    };

    debug!(
        "{}: {} LOC, {} workflows, tests: {}",
        record.full_name, record.loc.code, record.project.workflow_count, record.project.has_tests
    );

    Ok(record)
}

fn progress_bar(len: u64, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-"),
    );
    pb
}
