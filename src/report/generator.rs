//! Markdown report generation.
//!
//! This module renders the full organization health report from the
//! aggregated rows.

use super::{format_count, format_date};
use crate::analysis::aggregator::STALE_AFTER_DAYS;
use crate::analysis::AggregatedView;
use crate::models::{OrgSummary, RepoRecord};

/// Rows shown in the "top" tables.
pub const TOP_ROWS: usize = 15;

/// Generate the complete Markdown report.
pub fn generate_markdown_report(view: &AggregatedView<'_>) -> String {
    let mut output = String::new();

    // Title
    output.push_str("# Org Health Report\n\n");
    output.push_str(&format!(
        "_Auto-generated: **{}**_\n\n",
        view.now.format("%Y-%m-%d %H:%M UTC")
    ));

    output.push_str(&generate_summary_section(&view.summary));
    output.push_str(&generate_top_loc_section(&view.by_loc));
    output.push_str(&generate_recent_section(&view.by_recent));
    output.push_str(&generate_stale_section(&view.stale));
    output.push_str(&generate_full_table(&view.by_name));
    output.push_str(&generate_notes());

    output
}

fn generate_summary_section(summary: &OrgSummary) -> String {
    let mut section = String::new();
    let n = summary.repos;

    section.push_str("## Summary\n\n");
    section.push_str(&format!(
        "- Repos counted: **{}** (private: **{}**)\n",
        n, summary.private
    ));
    section.push_str(&format!(
        "- LOC (code): **{}**  |  comment: **{}**  |  blank: **{}**\n",
        format_count(summary.code),
        format_count(summary.comment),
        format_count(summary.blank)
    ));
    section.push_str(&format!(
        "- Open issues: **{}**  |  Open PRs: **{}**\n",
        format_count(summary.open_issues),
        format_count(summary.open_prs)
    ));
    section.push_str(&format!(
        "- CI workflows present: **{}/{}**\n",
        summary.with_ci, n
    ));
    section.push_str(&format!("- `tests/` present: **{}/{}**\n", summary.with_tests, n));
    section.push_str(&format!(
        "- `pyproject.toml` present: **{}/{}**\n",
        summary.with_manifest, n
    ));
    section.push_str(&format!(
        "- pre-commit config present: **{}/{}**\n",
        summary.with_precommit, n
    ));
    section.push('\n');

    section
}

fn generate_top_loc_section(rows: &[&RepoRecord]) -> String {
    let mut section = String::new();

    section.push_str("## Top repos by LOC\n\n");
    section.push_str("| Repo | Private | Project | LOC (code) | Last push | Issues | PRs | CI | Tests |\n");
    section.push_str("|---|:---:|---|---:|---:|---:|---:|:---:|:---:|\n");

    for r in rows.iter().take(TOP_ROWS) {
        section.push_str(&format!(
            "| `{}` | {} | {} | {} | {} | {} | {} | {} | {} |\n",
            r.name,
            private_badge(r),
            project_name(r),
            format_count(r.loc.code),
            format_date(&r.pushed_at),
            format_count(r.open_issues),
            format_count(r.open_prs),
            check(r.has_ci()),
            check(r.project.has_tests),
        ));
    }
    section.push('\n');

    section
}

fn generate_recent_section(rows: &[&RepoRecord]) -> String {
    let mut section = String::new();

    section.push_str("## Most recently updated\n\n");
    section.push_str(&loc_table(&rows[..rows.len().min(TOP_ROWS)]));
    section.push('\n');

    section
}

/// Omitted entirely when nothing is stale.
fn generate_stale_section(rows: &[&RepoRecord]) -> String {
    if rows.is_empty() {
        return String::new();
    }

    let mut section = String::new();

    section.push_str(&format!(
        "## Stale repos (no push in {} days)\n\n",
        STALE_AFTER_DAYS
    ));
    section.push_str(&loc_table(rows));
    section.push('\n');

    section
}

/// Repo / Last push / LOC table shared by the recency and stale sections.
fn loc_table(rows: &[&RepoRecord]) -> String {
    let mut table = String::new();

    table.push_str("| Repo | Last push | LOC (code) |\n");
    table.push_str("|---|---:|---:|\n");
    for r in rows {
        table.push_str(&format!(
            "| `{}` | {} | {} |\n",
            r.name,
            format_date(&r.pushed_at),
            format_count(r.loc.code)
        ));
    }

    table
}

fn generate_full_table(rows: &[&RepoRecord]) -> String {
    let mut section = String::new();

    section.push_str("## Full repo table\n\n");
    section.push_str("| Repo | Private | Default branch | Project | LOC (code) | Last push | Issues | PRs | Workflows | Top langs (code LOC) |\n");
    section.push_str("|---|:---:|---|---|---:|---:|---:|---:|---:|---|\n");

    for r in rows {
        let langs = r
            .loc
            .top_languages
            .iter()
            .map(|(lang, code)| format!("{}:{}", lang, format_count(*code)))
            .collect::<Vec<_>>()
            .join(", ");

        section.push_str(&format!(
            "| `{}` | {} | `{}` | {} | {} | {} | {} | {} | {} | {} |\n",
            r.name,
            private_badge(r),
            r.default_branch,
            project_name(r),
            format_count(r.loc.code),
            format_date(&r.pushed_at),
            format_count(r.open_issues),
            format_count(r.open_prs),
            r.project.workflow_count,
            langs,
        ));
    }
    section.push('\n');

    section
}

fn generate_notes() -> String {
    let mut notes = String::new();

    notes.push_str("## Notes\n\n");
    notes.push_str("- LOC is computed by `cloc` with common cache/build/vendor directories excluded.\n");
    notes.push_str("- Issues/PRs are counted via GitHub search (so PRs are not mistakenly included in issue counts).\n");
    notes.push_str("- Archived repos are excluded by default (edit `INCLUDE_ARCHIVED` if you want them included).\n");

    notes
}

fn private_badge(r: &RepoRecord) -> &'static str {
    if r.private {
        "🔒"
    } else {
        ""
    }
}

fn check(present: bool) -> &'static str {
    if present {
        "✅"
    } else {
        ""
    }
}

fn project_name(r: &RepoRecord) -> &str {
    r.project.project_name.as_deref().unwrap_or("")
}
