//! Conductor tag extraction
//!
//! Tracking issues carry a machine-readable tag in an HTML comment:
//!
//! ```text
//! <!-- conductor = {"table":"schema.table","when":"2020-07-16T09:00:00.000Z"} -->
//! ```
//!
//! Extraction is pure; the `missing-metadata` labeling side effect lives in
//! the orchestrator.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::warn;

/// Structured intent parsed from an issue body
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IssueMetadata {
    /// Dotted dataset identifier
    pub table: String,
    /// Scheduled effective date; advisory only
    #[serde(default)]
    pub when: Option<DateTime<Utc>>,
}

/// Pull the conductor tag out of an issue body.
///
/// Only lines starting with the comment-open token and mentioning
/// `conductor` are scanned; the JSON span runs from the first `{` to the
/// last `}` on the line. If a body carries more than one tag, the last
/// parsable one wins. Malformed tags are skipped; a body with no parsable
/// tag yields `None`.
pub fn extract(body: &str) -> Option<IssueMetadata> {
    let mut metadata = None;

    for line in body.lines() {
        let trimmed = line.trim_start();

        if !trimmed.starts_with("<!--") || !trimmed.contains("conductor") {
            continue;
        }

        let start = match trimmed.find('{') {
            Some(index) => index,
            None => continue,
        };
        let end = match trimmed.rfind('}') {
            Some(index) => index + 1,
            None => continue,
        };

        match serde_json::from_str::<IssueMetadata>(&trimmed[start..end]) {
            Ok(parsed) => metadata = Some(parsed),
            Err(e) => warn!("skipping malformed conductor tag: {}", e),
        }
    }

    metadata
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn extracts_table_and_when() {
        let body = "ready to go\n<!-- conductor = {\"table\":\"boundaries.counties\",\"when\":\"2020-07-16T09:00:00.000Z\"} -->\n";

        let metadata = extract(body).unwrap();
        assert_eq!(metadata.table, "boundaries.counties");
        assert_eq!(
            metadata.when.unwrap(),
            "2020-07-16T09:00:00Z".parse::<DateTime<Utc>>().unwrap()
        );
    }

    #[test]
    fn when_is_optional() {
        let body = "<!-- conductor = {\"table\":\"sgid.boundaries.counties\"} -->";

        let metadata = extract(body).unwrap();
        assert_eq!(metadata.table, "sgid.boundaries.counties");
        assert_eq!(metadata.when, None);
    }

    #[test]
    fn ignores_unrelated_comments_and_prose() {
        let body = "<!-- note to self -->\nthe {braces} here do not count\n";
        assert_eq!(extract(body), None);
    }

    #[test]
    fn last_parsable_tag_wins() {
        let body = "<!-- conductor = {\"table\":\"first.table\"} -->\n\
                    <!-- conductor = {\"table\":\"second.table\"} -->";

        assert_eq!(extract(body).unwrap().table, "second.table");
    }

    #[test]
    fn malformed_tag_is_skipped() {
        let body = "<!-- conductor = {\"table\":\"good.table\"} -->\n\
                    <!-- conductor = {\"table\": -->";

        assert_eq!(extract(body).unwrap().table, "good.table");
    }

    #[test]
    fn body_with_only_malformed_tags_yields_none() {
        let body = "<!-- conductor = {not json} -->";
        assert_eq!(extract(body), None);
    }
}
