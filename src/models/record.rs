use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

/// A stored document. Key order is preserved as stored.
pub type Document = Map<String, Value>;

/// Internal identifier assigned by the store; never displayed
pub const ID_FIELD: &str = "_id";

/// Fields an operator can search records by
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SearchField {
    #[default]
    Address,
    Name,
    BslOnRoll,
    Lease,
    Licence,
}

impl SearchField {
    /// Document key this field is stored under
    pub fn key(self) -> &'static str {
        self.into()
    }

    /// Human-readable column name
    pub fn label(self) -> &'static str {
        match self {
            SearchField::Address => "Address",
            SearchField::Name => "Name",
            SearchField::BslOnRoll => "BSL On Roll",
            SearchField::Lease => "Lease",
            SearchField::Licence => "Licence",
        }
    }

    /// Parse a submitted selector value
    pub fn parse_key(key: &str) -> Result<Self> {
        key.parse()
            .map_err(|_| AppError::Validation(format!("unknown search field '{}'", key)))
    }

    /// All searchable fields in selector order
    pub fn all() -> impl Iterator<Item = SearchField> {
        SearchField::iter()
    }
}

/// Display name for a document key. Keys outside the searchable set pass
/// through unchanged.
pub fn display_name(key: &str) -> &str {
    SearchField::all()
        .find(|field| field.key() == key)
        .map(SearchField::label)
        .unwrap_or(key)
}

/// A single-row table ready for rendering
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayRow {
    /// (column label, value) pairs in stored key order
    pub columns: Vec<(String, Value)>,
}

impl DisplayRow {
    /// Drop the internal id and rename keys to their display names
    pub fn from_record(record: Document) -> Self {
        let columns = record
            .into_iter()
            .filter(|(key, _)| key != ID_FIELD)
            .map(|(key, value)| (display_name(&key).to_string(), value))
            .collect();

        Self { columns }
    }

    /// Look up a column value by its label
    pub fn get(&self, label: &str) -> Option<&Value> {
        self.columns
            .iter()
            .find(|(column, _)| column == label)
            .map(|(_, value)| value)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(label, _)| label.as_str())
    }

    /// Render as a JSON object keyed by column label
    pub fn to_json(&self) -> Value {
        Value::Object(self.columns.iter().cloned().collect())
    }
}

/// Text shown in a table cell for a stored value
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::str::FromStr;

    fn record(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    #[test]
    fn test_parse_key_rejects_unknown_fields() {
        assert_eq!(SearchField::parse_key("bsl_on_roll").unwrap(), SearchField::BslOnRoll);
        assert!(matches!(
            SearchField::parse_key("password"),
            Err(AppError::Validation(_))
        ));
        assert!(SearchField::parse_key("Address").is_err());
    }

    #[test]
    fn test_search_field_keys_round_trip() {
        for field in SearchField::all() {
            assert_eq!(SearchField::from_str(field.key()).unwrap(), field);
        }
        assert_eq!(SearchField::BslOnRoll.key(), "bsl_on_roll");
        assert_eq!(SearchField::BslOnRoll.to_string(), "bsl_on_roll");
        assert!(SearchField::from_str("owner").is_err());
    }

    #[test]
    fn test_selector_order() {
        let keys: Vec<_> = SearchField::all().map(SearchField::key).collect();
        assert_eq!(keys, ["address", "name", "bsl_on_roll", "lease", "licence"]);
    }

    #[test]
    fn test_display_names() {
        assert_eq!(display_name("address"), "Address");
        assert_eq!(display_name("bsl_on_roll"), "BSL On Roll");
        assert_eq!(display_name("licence"), "Licence");
        assert_eq!(display_name("ward"), "ward");
    }

    #[test]
    fn test_display_row_drops_id_and_keeps_order() {
        let row = DisplayRow::from_record(record(json!({
            "_id": "42",
            "address": "12 Main St",
            "name": "John Doe",
            "bsl_on_roll": "Yes",
            "ward": 7,
            "lease": "L-100",
            "licence": null,
        })));

        let labels: Vec<_> = row.labels().collect();
        assert_eq!(
            labels,
            ["Address", "Name", "BSL On Roll", "ward", "Lease", "Licence"]
        );
        assert_eq!(row.get("Name"), Some(&json!("John Doe")));
        assert!(row.get("_id").is_none());
    }

    #[test]
    fn test_display_value() {
        assert_eq!(display_value(&json!("text")), "text");
        assert_eq!(display_value(&json!(7)), "7");
        assert_eq!(display_value(&json!(true)), "true");
        assert_eq!(display_value(&Value::Null), "");
    }
}
