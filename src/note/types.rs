//! Note types and frontmatter metadata.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;

use super::extract;

/// Metadata read from a note's YAML frontmatter.
///
/// Every field is optional; unknown keys are ignored.
///
/// ```markdown
/// ---
/// title: Rust Ownership
/// tags: [rust, memory]
/// created: 2026-01-14
/// updated: 2026-01-14T14:00:00Z
/// ---
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NoteMeta {
    /// Explicit title, overrides the first heading
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Tags as a YAML list or a comma/space separated string
    #[serde(default, deserialize_with = "tag_list", skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// When this note was created
    #[serde(default, deserialize_with = "lenient_timestamp", skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,

    /// When this note was last updated
    #[serde(default, deserialize_with = "lenient_timestamp", skip_serializing_if = "Option::is_none")]
    pub updated: Option<DateTime<Utc>>,
}

/// A note as handed to the graph engine: raw text plus extracted structure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NoteDocument {
    /// Canonical id (vault-relative path)
    pub id: String,
    /// Raw markdown, frontmatter included
    pub text: String,
    pub title: String,
    /// Normalized tags
    pub tags: BTreeSet<String>,
    /// Link targets as authored, deduplicated, in document order
    pub outlinks: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated: Option<DateTime<Utc>>,
}

impl NoteDocument {
    /// Build a document by running the content extractor over `text`.
    ///
    /// `extension` is the vault's note extension without the dot; it is used
    /// to derive the fallback title from the id.
    pub fn from_markdown(id: &str, text: &str, extension: &str) -> Self {
        let extracted = extract::extract(id, text, extension);
        Self {
            id: id.to_string(),
            text: text.to_string(),
            title: extracted.title,
            tags: extracted.tags,
            outlinks: extracted.outlinks,
            updated: extracted.meta.updated,
        }
    }

    /// Set the updated timestamp when the frontmatter did not carry one.
    pub fn or_updated(mut self, updated: Option<DateTime<Utc>>) -> Self {
        if self.updated.is_none() {
            self.updated = updated;
        }
        self
    }
}

fn tag_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_yaml::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_yaml::Value::Sequence(items)) => items
            .iter()
            .filter_map(|item| item.as_str())
            .map(str::to_string)
            .collect(),
        Some(serde_yaml::Value::String(raw)) => raw
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    })
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_yaml::Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(|v| v.as_str())
        .and_then(parse_timestamp))
}

/// Accepts RFC 3339 timestamps and bare `YYYY-MM-DD` dates.
pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}
