use crate::config::StoreConfig;
use crate::error::{AppError, Result};
use crate::state::{DocumentStore, InMemoryStore, RedisStore, SledStore};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

/// Parsed store connection URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreUrl {
    /// `memory://`
    Memory,
    /// `sled://<path>`
    Sled(PathBuf),
    /// `redis://...` or `rediss://...`, passed through to the client
    Redis(String),
}

impl FromStr for StoreUrl {
    type Err = AppError;

    fn from_str(url: &str) -> Result<Self> {
        let url = url.trim();

        if url == "memory://" || url == "memory:" {
            return Ok(StoreUrl::Memory);
        }

        if let Some(path) = url.strip_prefix("sled://") {
            if path.is_empty() {
                return Err(AppError::Configuration(
                    "sled:// URL requires a database path".to_string(),
                ));
            }
            return Ok(StoreUrl::Sled(PathBuf::from(path)));
        }

        if url.starts_with("redis://") || url.starts_with("rediss://") {
            return Ok(StoreUrl::Redis(url.to_string()));
        }

        let scheme = url.split_once("://").map(|(scheme, _)| scheme).unwrap_or(url);
        Err(AppError::Configuration(format!(
            "unsupported store URL scheme '{}' (expected memory://, sled://, redis://)",
            scheme
        )))
    }
}

/// Open the document store named by the configured connection URL
pub async fn create_store(config: &StoreConfig) -> Result<Arc<dyn DocumentStore>> {
    match config.url()?.parse::<StoreUrl>()? {
        StoreUrl::Memory => {
            tracing::warn!("Using in-memory document store; data is lost on restart");
            Ok(create_in_memory_store())
        }

        StoreUrl::Sled(path) => {
            tracing::info!(path = ?path, "Initializing Sled storage backend");

            let store = SledStore::new(&path)?;
            Ok(Arc::new(store))
        }

        StoreUrl::Redis(url) => {
            tracing::info!(database = %config.database, "Initializing Redis storage backend");

            let store = RedisStore::new_with_prefix(&url, &config.database).await?;
            Ok(Arc::new(store))
        }
    }
}

/// Create an in-memory store (for testing and development)
pub fn create_in_memory_store() -> Arc<dyn DocumentStore> {
    Arc::new(InMemoryStore::new())
}
