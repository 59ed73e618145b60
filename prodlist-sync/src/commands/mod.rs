pub mod admin;
pub mod migrate;
pub mod sync;

use prodlist_shared::db::pool::{create_pool, PoolConfig};
use sqlx::PgPool;

/// Small pool for one-shot commands
async fn connect(database_url: &str) -> anyhow::Result<PgPool> {
    let config = PoolConfig {
        max_connections: 2,
        min_connections: 0,
        ..PoolConfig::from_url(database_url)
    };

    tracing::info!("Connecting to database...");
    Ok(create_pool(config).await?)
}
