use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

/// Pool behind the postgres store backend. Every stored collection is a single row, so a
/// handful of connections is plenty; acquiring one shares the store call timeout.
pub async fn create_pool(database_url: &str, acquire_timeout: Duration) -> Result<PgPool> {
    info!("Connecting to PostgreSQL store...");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(acquire_timeout)
        .connect(database_url)
        .await
        .context("Failed to connect to PostgreSQL (check DATABASE_URL)")?;

    info!("PostgreSQL store pool established");
    Ok(pool)
}
