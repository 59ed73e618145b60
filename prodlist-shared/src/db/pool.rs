/// PostgreSQL pool construction
///
/// The API server and the sync commands each build one `PgPool` at startup
/// and pass it down explicitly.

use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::{debug, info};

/// Pool sizing and timeouts
#[derive(Debug, Clone)]
pub struct PoolConfig {
    pub url: String,

    pub max_connections: u32,

    /// Idle connections kept open
    pub min_connections: u32,

    /// How long a caller waits for a free connection
    pub acquire_timeout: Duration,

    /// Idle connections past this age are closed; `None` keeps them
    pub idle_timeout: Option<Duration>,
}

impl PoolConfig {
    /// Ten connections, one kept warm, 30s acquire and 10min idle timeouts
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 10,
            min_connections: 1,
            acquire_timeout: Duration::from_secs(30),
            idle_timeout: Some(Duration::from_secs(600)),
        }
    }
}

/// Connects the pool and runs one round trip before returning it
///
/// # Errors
///
/// Fails on a malformed URL, an unreachable server, or a failed probe query.
pub async fn create_pool(config: PoolConfig) -> Result<PgPool, sqlx::Error> {
    info!(
        max_connections = config.max_connections,
        min_connections = config.min_connections,
        "Connecting to PostgreSQL"
    );

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.acquire_timeout)
        .idle_timeout(config.idle_timeout)
        .connect(&config.url)
        .await?;

    health_check(&pool).await?;

    debug!("Database pool ready");
    Ok(pool)
}

/// Probes the database with `SELECT 1`
pub async fn health_check(pool: &PgPool) -> Result<(), sqlx::Error> {
    let one: i32 = sqlx::query_scalar("SELECT 1").fetch_one(pool).await?;

    if one != 1 {
        return Err(sqlx::Error::Protocol(format!(
            "probe query returned {}",
            one
        )));
    }

    Ok(())
}

/// Waits for checked-out connections to come back, then closes the pool
pub async fn close_pool(pool: PgPool) {
    debug!("Closing database pool");
    pool.close().await;
}
