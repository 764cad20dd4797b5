//! Cached cloc snapshots.
//!
//! Each repository may have a `<name>.json` file produced by a previous
//! `cloc --json` run. The file maps language names to line counts plus two
//! reserved keys, `header` and `SUM`.

use crate::models::LocSnapshot;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, warn};

/// Keys in a cloc payload that are not languages.
const RESERVED_KEYS: [&str; 2] = ["header", "SUM"];

/// Number of languages kept per repository.
pub const TOP_LANGUAGES: usize = 5;

/// Line counts for one cloc entry. Unknown fields are ignored so the
/// `header` object also deserializes.
#[derive(Debug, Default, Deserialize)]
struct LocCounts {
    #[serde(default)]
    code: u64,
    #[serde(default)]
    comment: u64,
    #[serde(default)]
    blank: u64,
}

/// Load the snapshot for a repository, or an empty one if there is none.
pub fn load_snapshot(cloc_dir: &Path, repo_name: &str) -> LocSnapshot {
    let path = cloc_dir.join(format!("{}.json", repo_name));

    let content = match std::fs::read_to_string(&path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("No cloc snapshot for {}", repo_name);
            return LocSnapshot::default();
        }
        Err(e) => {
            warn!("Failed to read {}: {}", path.display(), e);
            return LocSnapshot::default();
        }
    };

    match parse_snapshot(&content) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            warn!("Ignoring malformed cloc snapshot {}: {}", path.display(), e);
            LocSnapshot::default()
        }
    }
}

/// Parse a cloc JSON payload.
pub fn parse_snapshot(content: &str) -> serde_json::Result<LocSnapshot> {
    let mut entries: BTreeMap<String, LocCounts> = serde_json::from_str(content)?;
    let sum = entries.remove("SUM").unwrap_or_default();

    let mut languages: Vec<(String, u64)> = entries
        .into_iter()
        .filter(|(key, _)| !RESERVED_KEYS.contains(&key.as_str()))
        .map(|(lang, counts)| (lang, counts.code))
        .collect();

    // BTreeMap order makes the name tie-break implicit; the sort is stable.
    languages.sort_by_key(|(_, code)| std::cmp::Reverse(*code));
    languages.truncate(TOP_LANGUAGES);

    Ok(LocSnapshot {
        code: sum.code,
        comment: sum.comment,
        blank: sum.blank,
        top_languages: languages,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SAMPLE: &str = include_str!("../../fixtures/cloc_sample.json");

    #[test]
    fn test_parse_sample() {
        let snapshot = parse_snapshot(SAMPLE).unwrap();

        assert_eq!(snapshot.code, 12_480);
        assert_eq!(snapshot.comment, 2_113);
        assert_eq!(snapshot.blank, 1_907);
        assert_eq!(snapshot.top_languages.len(), TOP_LANGUAGES);
        assert_eq!(snapshot.top_languages[0], ("Python".to_string(), 9_800));
        assert!(snapshot
            .top_languages
            .iter()
            .all(|(lang, _)| lang != "header" && lang != "SUM"));
        assert!(snapshot
            .top_languages
            .windows(2)
            .all(|w| w[0].1 >= w[1].1));
    }

    #[test]
    fn test_ties_break_by_language_name() {
        let snapshot = parse_snapshot(
            r#"{"SUM": {"code": 20}, "YAML": {"code": 10}, "Markdown": {"code": 10}}"#,
        )
        .unwrap();
        assert_eq!(
            snapshot.top_languages,
            vec![("Markdown".to_string(), 10), ("YAML".to_string(), 10)]
        );
    }

    #[test]
    fn test_missing_sum_counts_zero() {
        let snapshot = parse_snapshot(r#"{"Rust": {"code": 7}}"#).unwrap();
        assert_eq!(snapshot.code, 0);
        assert_eq!(snapshot.top_languages, vec![("Rust".to_string(), 7)]);
    }

    #[test]
    fn test_absent_file_is_empty() {
        let tmp = TempDir::new().unwrap();
        let snapshot = load_snapshot(tmp.path(), "foo");
        assert_eq!(snapshot, LocSnapshot::default());
        assert_eq!(snapshot.code, 0);
        assert_eq!(snapshot.comment, 0);
        assert_eq!(snapshot.blank, 0);
        assert!(snapshot.top_languages.is_empty());
    }

    #[test]
    fn test_malformed_file_is_empty() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("bad.json"), "{not json").unwrap();
        assert_eq!(load_snapshot(tmp.path(), "bad"), LocSnapshot::default());
    }

    #[test]
    fn test_load_from_disk() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("fluxsim.json"), SAMPLE).unwrap();
        assert_eq!(load_snapshot(tmp.path(), "fluxsim").code, 12_480);
    }
}
