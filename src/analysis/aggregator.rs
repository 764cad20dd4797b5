//! Organization-wide aggregation.
//!
//! Pure functions from repository records to the summary and the ordered
//! views the renderers consume. Archived records are dropped by every view.
//! Each sort uses the repository name as a secondary key so output never
//! depends on input order.

use crate::models::{OrgSummary, RepoRecord};
use chrono::{DateTime, Duration, Utc};

/// Days without a push after which a repository counts as stale.
pub const STALE_AFTER_DAYS: i64 = 90;

/// Instant before which a push is stale.
pub fn stale_cutoff(now: DateTime<Utc>) -> DateTime<Utc> {
    now - Duration::days(STALE_AFTER_DAYS)
}

fn active(rows: &[RepoRecord]) -> Vec<&RepoRecord> {
    rows.iter().filter(|r| !r.archived).collect()
}

/// Largest code base first.
pub fn by_loc(rows: &[RepoRecord]) -> Vec<&RepoRecord> {
    let mut view = active(rows);
    view.sort_by(|a, b| {
        b.loc
            .code
            .cmp(&a.loc.code)
            .then_with(|| a.name.cmp(&b.name))
    });
    view
}

/// Most recent push first.
pub fn by_recent(rows: &[RepoRecord]) -> Vec<&RepoRecord> {
    let mut view = active(rows);
    view.sort_by(|a, b| {
        b.pushed_at
            .cmp(&a.pushed_at)
            .then_with(|| a.name.cmp(&b.name))
    });
    view
}

/// Repositories with no push since the cutoff, oldest first.
pub fn stale(rows: &[RepoRecord], now: DateTime<Utc>) -> Vec<&RepoRecord> {
    let cutoff = stale_cutoff(now);
    let mut view: Vec<&RepoRecord> = active(rows)
        .into_iter()
        .filter(|r| r.pushed_at < cutoff)
        .collect();
    view.sort_by(|a, b| {
        a.pushed_at
            .cmp(&b.pushed_at)
            .then_with(|| a.name.cmp(&b.name))
    });
    view
}

/// Case-insensitive name order.
pub fn by_name(rows: &[RepoRecord]) -> Vec<&RepoRecord> {
    let mut view = active(rows);
    view.sort_by_cached_key(|r| (r.name.to_lowercase(), r.name.clone()));
    view
}

/// Summary plus every derived view, computed once per run.
#[derive(Debug)]
pub struct AggregatedView<'a> {
    pub now: DateTime<Utc>,
    pub summary: OrgSummary,
    pub by_loc: Vec<&'a RepoRecord>,
    pub by_recent: Vec<&'a RepoRecord>,
    pub stale: Vec<&'a RepoRecord>,
    pub by_name: Vec<&'a RepoRecord>,
}

impl<'a> AggregatedView<'a> {
    pub fn new(rows: &'a [RepoRecord], now: DateTime<Utc>) -> Self {
        Self {
            now,
            summary: OrgSummary::from_records(rows),
            by_loc: by_loc(rows),
            by_recent: by_recent(rows),
            stale: stale(rows, now),
            by_name: by_name(rows),
        }
    }
}
