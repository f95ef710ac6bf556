pub mod store;
pub mod sled_store;
pub mod redis_store;
pub mod factory;

pub use store::*;
pub use sled_store::SledStore;
pub use redis_store::RedisStore;
pub use factory::{create_store, create_in_memory_store, StoreUrl};

use crate::error::Result;
use crate::models::{Document, ID_FIELD};
use async_trait::async_trait;
use regex::Regex;
use serde_json::Value;

/// Trait for document collections the lookup service reads from
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// First document in insertion order matching every clause of `filter`
    async fn find_one(&self, collection: &str, filter: &DocumentFilter) -> Result<Option<Document>>;

    /// Insert a document, assigning `_id` when absent. Returns the id.
    async fn insert_one(&self, collection: &str, document: Document) -> Result<String>;

    /// Number of documents in a collection
    async fn count(&self, collection: &str) -> Result<u64>;

    /// Verify the backend is reachable
    async fn ping(&self) -> Result<()>;

    /// Flush pending writes before shutdown
    async fn flush(&self) -> Result<()> {
        Ok(())
    }

    /// Short backend name for logs and health output
    fn backend_name(&self) -> &'static str;
}

/// Condition on a single document field
#[derive(Debug, Clone)]
pub enum Condition {
    /// Exact, case-sensitive equality
    Equals(Value),
    /// String value matching a compiled pattern
    Matches(Regex),
}

impl Condition {
    fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (Condition::Equals(expected), Value::Array(items)) => {
                expected == value || items.contains(expected)
            }
            (Condition::Equals(expected), _) => expected == value,
            (Condition::Matches(regex), Value::String(s)) => regex.is_match(s),
            (Condition::Matches(regex), Value::Array(items)) => items
                .iter()
                .any(|item| matches!(item, Value::String(s) if regex.is_match(s))),
            (Condition::Matches(_), _) => false,
        }
    }
}

/// Conjunction of per-field conditions
#[derive(Debug, Clone, Default)]
pub struct DocumentFilter {
    clauses: Vec<(String, Condition)>,
}

impl DocumentFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `field` to equal `value`
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.clauses
            .push((field.into(), Condition::Equals(value.into())));
        self
    }

    /// Require `field` to be a string matching `regex`
    pub fn matches(mut self, field: impl Into<String>, regex: Regex) -> Self {
        self.clauses.push((field.into(), Condition::Matches(regex)));
        self
    }

    /// Whether `document` satisfies every clause. Missing fields never match.
    pub fn is_match(&self, document: &Document) -> bool {
        self.clauses.iter().all(|(field, condition)| {
            document
                .get(field)
                .map(|value| condition.accepts(value))
                .unwrap_or(false)
        })
    }
}

/// Render a document id for callers
pub(crate) fn id_string(document: &Document) -> Option<String> {
    match document.get(ID_FIELD)? {
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
