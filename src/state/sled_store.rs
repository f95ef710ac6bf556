use crate::error::{AppError, Result};
use crate::models::{Document, ID_FIELD};
use crate::state::{id_string, DocumentFilter, DocumentStore};
use async_trait::async_trait;
use serde_json::Value;
use sled::Db;
use std::path::Path;
use std::sync::Arc;

/// Persistent document store using Sled embedded database
///
/// Each collection is a tree. Keys are sled-generated ids in big-endian
/// order, so a forward scan visits documents in insertion order.
#[derive(Clone)]
pub struct SledStore {
    db: Arc<Db>,
}

impl SledStore {
    /// Open (or create) a Sled store at the specified path
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let db = sled::open(path.as_ref()).map_err(|e| {
            AppError::Database(format!("Failed to open Sled database: {}", e))
        })?;

        tracing::info!("Initialized Sled store at {:?}", path.as_ref());

        Ok(Self { db: Arc::new(db) })
    }

    fn tree(&self, collection: &str) -> Result<sled::Tree> {
        self.db.open_tree(collection).map_err(|e| {
            AppError::Database(format!("Failed to open collection '{}': {}", collection, e))
        })
    }

    fn serialize_document(document: &Document) -> Result<Vec<u8>> {
        serde_json::to_vec(document).map_err(|e| {
            AppError::Serialization(format!("Failed to serialize document: {}", e))
        })
    }

    fn deserialize_document(bytes: &[u8]) -> Result<Document> {
        serde_json::from_slice(bytes).map_err(|e| {
            AppError::Database(format!("Failed to deserialize document: {}", e))
        })
    }
}

#[async_trait]
impl DocumentStore for SledStore {
    async fn find_one(&self, collection: &str, filter: &DocumentFilter) -> Result<Option<Document>> {
        let tree = self.tree(collection)?;

        for entry in tree.iter() {
            let (_, bytes) = entry?;
            let document = Self::deserialize_document(&bytes)?;
            if filter.is_match(&document) {
                return Ok(Some(document));
            }
        }

        Ok(None)
    }

    async fn insert_one(&self, collection: &str, mut document: Document) -> Result<String> {
        let tree = self.tree(collection)?;
        let key = self.db.generate_id()?;

        if !document.contains_key(ID_FIELD) {
            document.insert(ID_FIELD.to_string(), Value::String(key.to_string()));
        }
        let id = id_string(&document).unwrap_or_default();

        tree.insert(key.to_be_bytes(), Self::serialize_document(&document)?)?;
        tree.flush()?;

        tracing::debug!(collection, id = %id, "Document saved to Sled");
        Ok(id)
    }

    async fn count(&self, collection: &str) -> Result<u64> {
        Ok(self.tree(collection)?.len() as u64)
    }

    async fn ping(&self) -> Result<()> {
        self.db.size_on_disk()?;
        Ok(())
    }

    async fn flush(&self) -> Result<()> {
        self.db.flush_async().await.map_err(|e| {
            AppError::Database(format!("Failed to flush database: {}", e))
        })?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "sled"
    }
}
