/// Schema migrations
///
/// The SQL files under the workspace `migrations/` directory are compiled
/// into the crate with `sqlx::migrate!`.

use sqlx::{migrate::MigrateDatabase, postgres::PgPool, Postgres};

/// Applies every migration not yet recorded in `_sqlx_migrations`
///
/// # Errors
///
/// Fails when a migration errors or an applied one was edited afterwards.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../migrations")
        .run(pool)
        .await
        .inspect_err(|e| tracing::error!(error = %e, "Migration failed"))?;

    tracing::info!("Schema is up to date");
    Ok(())
}

/// Creates the database named in `database_url` when it is missing
///
/// Safe to call from several processes or tasks at once: losing the race to
/// another `CREATE DATABASE` counts as success.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), sqlx::Error> {
    if Postgres::database_exists(database_url).await? {
        return Ok(());
    }

    tracing::info!("Creating database");
    match Postgres::create_database(database_url).await {
        Ok(()) => Ok(()),
        Err(e) if Postgres::database_exists(database_url).await? => {
            tracing::debug!(error = %e, "Database created concurrently");
            Ok(())
        }
        Err(e) => Err(e),
    }
}
