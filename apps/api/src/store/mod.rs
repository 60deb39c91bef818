//! Keyed persistence — the only place that knows which backend holds audit and
//! history data.
//!
//! Every collection is a JSON array stored under a string key:
//! `audit.entries` (global), `history.<user_id>` and `emotion_trends.<user_id>` (per user).
//! Callers go through `CappedCollection` so retention caps and FIFO eviction are applied
//! the same way regardless of backend.

pub mod capped;
pub mod memory;
pub mod postgres_store;
pub mod redis_store;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tracing::info;

use crate::config::Config;

pub use capped::CappedCollection;
pub use memory::MemoryStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store call timed out after {0}ms")]
    Timeout(u64),
}

/// A durable store keyed by string. Values are whole JSON documents.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;

    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError>;

    /// Pushes `item` onto the array under `key`, dropping the oldest items beyond `cap`.
    async fn append(&self, key: &str, item: Value, cap: usize) -> Result<(), StoreError> {
        let mut items = match self.get(key).await? {
            Some(Value::Array(items)) => items,
            Some(_) | None => Vec::new(),
        };
        items.push(item);
        if items.len() > cap {
            let overflow = items.len() - cap;
            items.drain(..overflow);
        }
        self.set(key, Value::Array(items)).await
    }

    /// Short backend label for logs and /health.
    fn backend(&self) -> &'static str;
}

/// Which backend `STORE_BACKEND` selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    Redis,
    Postgres,
}

impl std::str::FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(StoreBackend::Memory),
            "redis" => Ok(StoreBackend::Redis),
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            other => bail!("Unknown STORE_BACKEND '{other}' (expected memory, redis or postgres)"),
        }
    }
}

/// Builds the configured store backend.
pub async fn connect(config: &Config) -> Result<Arc<dyn KeyValueStore>> {
    let timeout = Duration::from_millis(config.store_timeout_ms);

    let store: Arc<dyn KeyValueStore> = match config.store_backend {
        StoreBackend::Memory => Arc::new(MemoryStore::new()),
        StoreBackend::Redis => {
            let url = config
                .redis_url
                .as_deref()
                .context("REDIS_URL is required when STORE_BACKEND=redis")?;
            Arc::new(redis_store::RedisStore::open(url, timeout)?)
        }
        StoreBackend::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL is required when STORE_BACKEND=postgres")?;
            let pool = crate::db::create_pool(url, timeout).await?;
            Arc::new(postgres_store::PostgresStore::connect(pool, timeout).await?)
        }
    };

    info!("Store backend initialized: {}", store.backend());
    Ok(store)
}

/// Runs a remote store call under the configured timeout.
pub(crate) async fn with_timeout<T, F>(timeout: Duration, fut: F) -> Result<T, StoreError>
where
    F: std::future::Future<Output = Result<T, StoreError>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result,
        Err(_) => Err(StoreError::Timeout(timeout.as_millis() as u64)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_backend_parses_case_insensitively() {
        assert_eq!("Memory".parse::<StoreBackend>().unwrap(), StoreBackend::Memory);
        assert_eq!("REDIS".parse::<StoreBackend>().unwrap(), StoreBackend::Redis);
        assert_eq!(
            "postgresql".parse::<StoreBackend>().unwrap(),
            StoreBackend::Postgres
        );
    }

    #[test]
    fn test_unknown_backend_is_rejected() {
        assert!("sqlite".parse::<StoreBackend>().is_err());
    }

    #[tokio::test]
    async fn test_default_append_evicts_oldest_first() {
        let store = MemoryStore::new();
        for i in 0..5 {
            store.append("k", json!(i), 3).await.unwrap();
        }
        let value = store.get("k").await.unwrap().unwrap();
        assert_eq!(value, json!([2, 3, 4]));
    }

    #[tokio::test]
    async fn test_timeout_maps_to_store_error() {
        let result: Result<(), StoreError> = with_timeout(Duration::from_millis(10), async {
            tokio::time::sleep(Duration::from_millis(200)).await;
            Ok(())
        })
        .await;
        assert!(matches!(result, Err(StoreError::Timeout(10))));
    }
}
