use crate::error::{AppError, Result};
use crate::models::{Document, ID_FIELD};
use crate::state::{id_string, DocumentFilter, DocumentStore};
use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};
use serde_json::Value;

/// Documents fetched per LRANGE round trip while scanning
const SCAN_BATCH: isize = 256;

/// Redis-backed document store
///
/// Each collection is a list of JSON documents at `<prefix>:<collection>`,
/// appended with RPUSH so list order is insertion order. Ids come from an
/// INCR counter at `<prefix>:<collection>:next_id`.
#[derive(Clone)]
pub struct RedisStore {
    connection: ConnectionManager,
    key_prefix: String,
}

impl RedisStore {
    /// Connect and verify the server answers. Keys are namespaced by `prefix`.
    pub async fn new_with_prefix(redis_url: &str, prefix: &str) -> Result<Self> {
        let client = Client::open(redis_url).map_err(|e| {
            AppError::Configuration(format!("Invalid Redis URL: {}", e))
        })?;

        let connection = ConnectionManager::new(client)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Redis: {}", e)))?;

        let store = Self {
            connection,
            key_prefix: prefix.to_string(),
        };
        store.ping().await?;

        tracing::info!("Initialized Redis store with prefix '{}'", prefix);
        Ok(store)
    }

    fn collection_key(&self, collection: &str) -> String {
        format!("{}:{}", self.key_prefix, collection)
    }

    fn id_counter_key(&self, collection: &str) -> String {
        format!("{}:{}:next_id", self.key_prefix, collection)
    }

    fn deserialize_document(json: &str) -> Result<Document> {
        serde_json::from_str(json).map_err(|e| {
            AppError::Database(format!("Failed to deserialize document: {}", e))
        })
    }
}

#[async_trait]
impl DocumentStore for RedisStore {
    async fn find_one(&self, collection: &str, filter: &DocumentFilter) -> Result<Option<Document>> {
        let mut conn = self.connection.clone();
        let key = self.collection_key(collection);
        let mut start: isize = 0;

        loop {
            let batch: Vec<String> = conn.lrange(&key, start, start + SCAN_BATCH - 1).await?;

            for raw in &batch {
                let document = Self::deserialize_document(raw)?;
                if filter.is_match(&document) {
                    return Ok(Some(document));
                }
            }

            if (batch.len() as isize) < SCAN_BATCH {
                return Ok(None);
            }
            start += SCAN_BATCH;
        }
    }

    async fn insert_one(&self, collection: &str, mut document: Document) -> Result<String> {
        let mut conn = self.connection.clone();

        if !document.contains_key(ID_FIELD) {
            let next: u64 = conn.incr(self.id_counter_key(collection), 1).await?;
            document.insert(ID_FIELD.to_string(), Value::String(next.to_string()));
        }
        let id = id_string(&document).unwrap_or_default();

        let json = serde_json::to_string(&document)?;
        let _: () = conn.rpush(self.collection_key(collection), json).await?;

        tracing::debug!(collection, id = %id, "Document saved to Redis");
        Ok(id)
    }

    async fn count(&self, collection: &str) -> Result<u64> {
        let mut conn = self.connection.clone();
        Ok(conn.llen(self.collection_key(collection)).await?)
    }

    async fn ping(&self) -> Result<()> {
        let mut conn = self.connection.clone();
        redis::cmd("PING")
            .query_async::<_, String>(&mut conn)
            .await
            .map_err(|e| AppError::Database(format!("Redis connection test failed: {}", e)))?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }
}
