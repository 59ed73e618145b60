/// Database layer for ProdList
///
/// # Modules
///
/// - `pool`: PostgreSQL connection pool with a startup health check
/// - `migrations`: Embedded migration runner
///
/// Models live in the `models` module at crate root level.
///
/// # Example
///
/// ```no_run
/// use prodlist_shared::db::{migrations::run_migrations, pool::{create_pool, PoolConfig}};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let pool = create_pool(PoolConfig::from_url(std::env::var("DATABASE_URL")?)).await?;
///     run_migrations(&pool).await?;
///     Ok(())
/// }
/// ```

pub mod migrations;
pub mod pool;
