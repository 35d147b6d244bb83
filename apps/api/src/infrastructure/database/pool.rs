use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

/// Opens the comment store's connection pool. Fails fast when Postgres is
/// unreachable at start-up.
pub async fn create_pool(database_url: &str, max_connections: u32) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await?;
    tracing::info!(max_connections, "Connected to comment store");
    Ok(pool)
}
