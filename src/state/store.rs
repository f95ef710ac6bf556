use crate::error::Result;
use crate::models::{Document, ID_FIELD};
use crate::state::{id_string, DocumentFilter, DocumentStore};
use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// In-memory document store (for demos and testing)
#[derive(Clone, Default)]
pub struct InMemoryStore {
    collections: Arc<RwLock<HashMap<String, Vec<Document>>>>,
    next_id: Arc<AtomicU64>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn find_one(&self, collection: &str, filter: &DocumentFilter) -> Result<Option<Document>> {
        let collections = self.collections.read();
        Ok(collections
            .get(collection)
            .and_then(|documents| documents.iter().find(|doc| filter.is_match(doc)))
            .cloned())
    }

    async fn insert_one(&self, collection: &str, mut document: Document) -> Result<String> {
        if !document.contains_key(ID_FIELD) {
            let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
            document.insert(ID_FIELD.to_string(), Value::String(id.to_string()));
        }
        let id = id_string(&document).unwrap_or_default();

        self.collections
            .write()
            .entry(collection.to_string())
            .or_default()
            .push(document);

        tracing::debug!(collection, id = %id, "Document inserted");
        Ok(id)
    }

    async fn count(&self, collection: &str) -> Result<u64> {
        Ok(self
            .collections
            .read()
            .get(collection)
            .map(|documents| documents.len() as u64)
            .unwrap_or(0))
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
