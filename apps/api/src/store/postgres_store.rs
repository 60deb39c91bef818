use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;
use tracing::info;

use super::{with_timeout, KeyValueStore, StoreError};

/// PostgreSQL-backed store: a single `kv_store` table, one JSONB document per key.
pub struct PostgresStore {
    pool: PgPool,
    timeout: Duration,
}

impl PostgresStore {
    /// Wraps the pool and makes sure the backing table exists.
    pub async fn connect(pool: PgPool, timeout: Duration) -> Result<Self, StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS kv_store (
                key        TEXT PRIMARY KEY,
                value      JSONB NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )
            "#,
        )
        .execute(&pool)
        .await?;

        info!("kv_store table ready");
        Ok(Self { pool, timeout })
    }
}

#[async_trait]
impl KeyValueStore for PostgresStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        with_timeout(self.timeout, async {
            let value: Option<Value> =
                sqlx::query_scalar("SELECT value FROM kv_store WHERE key = $1")
                    .bind(key)
                    .fetch_optional(&self.pool)
                    .await?;
            Ok(value)
        })
        .await
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        with_timeout(self.timeout, async {
            sqlx::query(
                r#"
                INSERT INTO kv_store (key, value, updated_at)
                VALUES ($1, $2, now())
                ON CONFLICT (key) DO UPDATE
                    SET value = EXCLUDED.value, updated_at = now()
                "#,
            )
            .bind(key)
            .bind(&value)
            .execute(&self.pool)
            .await?;
            Ok(())
        })
        .await
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}
