//! `sync-products`: refresh stored products from the catalog.

use anyhow::Context;
use prodlist_shared::catalog::HttpCatalogClient;
use prodlist_shared::db::pool::close_pool;
use prodlist_shared::sync::{sync_products, SyncReport};
use std::time::Duration;

pub async fn run(
    database_url: &str,
    catalog_url: &str,
    timeout_seconds: Option<u64>,
) -> anyhow::Result<SyncReport> {
    let catalog = HttpCatalogClient::new(catalog_url, timeout_seconds.map(Duration::from_secs))
        .context("Failed to build catalog client")?;

    let pool = super::connect(database_url).await?;

    tracing::info!(catalog = catalog.base_url(), "Syncing products");
    let result = sync_products(&pool, &catalog).await;
    close_pool(pool).await;

    let report = result.context("Product sync failed")?;

    tracing::info!(
        updated = report.updated,
        skipped = report.skipped,
        total = report.total(),
        "Product sync complete"
    );

    Ok(report)
}
