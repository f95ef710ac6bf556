//! Search query construction

use crate::error::Result;
use crate::models::SearchField;
use crate::state::DocumentFilter;
use regex::{Regex, RegexBuilder};
use serde_json::{json, Map, Value};

/// Pattern token standing in for a single normalized space
const WHITESPACE_RUN: &str = r"\s*";

/// Trim both ends and collapse every whitespace run to a single space.
pub fn normalize(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Anchored pattern for an already-normalized value.
///
/// Each space-separated piece is escaped so metacharacters match literally.
pub fn anchored_pattern(normalized: &str) -> String {
    let body = normalized
        .split(' ')
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(WHITESPACE_RUN);
    format!("^{}$", body)
}

/// A compiled single-field lookup
#[derive(Debug, Clone)]
pub struct RecordQuery {
    field: SearchField,
    value: String,
    pattern: String,
    regex: Regex,
}

impl RecordQuery {
    /// Build a query from raw operator input.
    ///
    /// Returns `Ok(None)` when the input is empty after normalization; no
    /// query should be issued in that case.
    pub fn build(field: SearchField, raw: &str) -> Result<Option<Self>> {
        let value = normalize(raw);
        if value.is_empty() {
            return Ok(None);
        }

        let pattern = anchored_pattern(&value);
        let regex = RegexBuilder::new(&pattern).case_insensitive(true).build()?;

        Ok(Some(Self {
            field,
            value,
            pattern,
            regex,
        }))
    }

    pub fn field(&self) -> SearchField {
        self.field
    }

    /// The normalized input
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Pattern source, without the case-insensitivity flag
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn is_match(&self, candidate: &str) -> bool {
        self.regex.is_match(candidate)
    }

    /// Store filter selecting records whose field matches this query
    pub fn to_filter(&self) -> DocumentFilter {
        DocumentFilter::new().matches(self.field.key(), self.regex.clone())
    }

    /// Mongo-style rendering, used in logs
    pub fn to_json(&self) -> Value {
        let mut filter = Map::new();
        filter.insert(
            self.field.key().to_string(),
            json!({ "$regex": self.pattern, "$options": "i" }),
        );
        Value::Object(filter)
    }
}

/// Build the lookup filter for `field` and raw input, or `None` for blank input.
pub fn build_filter(field: SearchField, raw: &str) -> Result<Option<RecordQuery>> {
    RecordQuery::build(field, raw)
}
