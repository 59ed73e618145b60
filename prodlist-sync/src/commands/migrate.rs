//! `migrate`: create the database when missing and apply migrations.

use prodlist_shared::db::migrations::{ensure_database_exists, run_migrations};
use prodlist_shared::db::pool::close_pool;

pub async fn run(database_url: &str) -> anyhow::Result<()> {
    ensure_database_exists(database_url).await?;

    let pool = super::connect(database_url).await?;

    tracing::info!("Running migrations...");
    let result = run_migrations(&pool).await;
    close_pool(pool).await;
    result?;

    tracing::info!("Migrations complete");
    Ok(())
}
