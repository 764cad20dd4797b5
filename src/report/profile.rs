//! Profile page fragment.
//!
//! A short summary block is kept up to date inside the organization profile
//! document, delimited by two sentinel comment lines.

use super::{format_count, format_date, write_atomic};
use crate::analysis::AggregatedView;
use crate::config::REPORT_PATH;
use anyhow::{Context, Result};
use std::path::Path;
use tracing::{debug, info, warn};

pub const METRICS_START: &str = "<!-- HEALTH:START -->";
pub const METRICS_END: &str = "<!-- HEALTH:END -->";

const TOP_LOC: usize = 5;
const RECENT: usize = 3;

/// Render the sentinel-delimited block.
pub fn render_profile_block(view: &AggregatedView<'_>) -> String {
    let summary = &view.summary;
    let mut block = String::new();

    block.push_str(METRICS_START);
    block.push_str("\n\n## Org health (auto-updated)\n\n");
    block.push_str(&format!(
        "- **{} repos** (private: **{}**) — updated **{}**\n",
        summary.repos,
        summary.private,
        format_date(&view.now)
    ));
    block.push_str(&format!(
        "- **LOC (code): {}+**  |  **Open issues:** {}  |  **Open PRs:** {}\n",
        format_count(summary.code),
        format_count(summary.open_issues),
        format_count(summary.open_prs)
    ));

    block.push_str("\n**Top repos by LOC**\n");
    for r in view.by_loc.iter().take(TOP_LOC) {
        block.push_str(&format!(
            "- `{}` — {}{}\n",
            r.name,
            format_count(r.loc.code),
            if r.private { " (private)" } else { "" }
        ));
    }

    block.push_str("\n**Most recently updated**\n");
    for r in view.by_recent.iter().take(RECENT) {
        block.push_str(&format!("- `{}` — {}\n", r.name, format_date(&r.pushed_at)));
    }

    block.push_str(&format!("\n_Full report: `{}`_\n\n", REPORT_PATH));
    block.push_str(METRICS_END);

    block
}

/// Put `block` into `text`.
///
/// Every existing `START ... END` span is replaced and the rest of the text is
/// left untouched. When both markers occur but never as a `START ... END`
/// span, the text is returned unchanged. Otherwise the block is appended after
/// one blank line.
pub fn splice_block(text: &str, block: &str) -> String {
    if text.contains(METRICS_START) && text.contains(METRICS_END) {
        return replace_marked(text, block).unwrap_or_else(|| {
            warn!("Profile markers are out of order, leaving the document as is");
            text.to_string()
        });
    }
    format!("{}\n\n{}\n", text.trim_end(), block)
}

/// Replace each start marker and the nearest end marker after it.
fn replace_marked(text: &str, block: &str) -> Option<String> {
    let mut out = String::with_capacity(text.len() + block.len());
    let mut rest = text;
    let mut replaced = false;

    while let Some(start) = rest.find(METRICS_START) {
        let after_start = &rest[start + METRICS_START.len()..];
        let Some(end) = after_start.find(METRICS_END) else {
            break;
        };

        out.push_str(&rest[..start]);
        out.push_str(block);
        rest = &after_start[end + METRICS_END.len()..];
        replaced = true;
    }

    if !replaced {
        return None;
    }
    out.push_str(rest);
    Some(out)
}

/// Splice the block into the profile document if it exists.
///
/// Returns whether the document was updated.
pub fn update_profile(path: &Path, block: &str) -> Result<bool> {
    if !path.exists() {
        debug!("No profile document at {}, skipping", path.display());
        return Ok(false);
    }

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    write_atomic(path, &splice_block(&text, block))?;

    info!("Updated {}", path.display());
    Ok(true)
}
