/// Catalog-to-database product refresh
///
/// Pulls the full product list from the catalog and rewrites every local
/// product whose synced fields drifted. Only products someone has already
/// favorited exist locally; the rest of the catalog is skipped, never
/// inserted.
///
/// ```text
/// get_product_list()
///   └─> for each item
///         ├─> not stored locally       -> skipped
///         ├─> stored, unchanged        -> skipped
///         └─> stored, fields differ    -> refresh_from_catalog -> updated
/// ```
///
/// The catalog is fetched before any write, so a catalog outage leaves the
/// database untouched. Writes are per product: a database failure midway
/// keeps the rows already refreshed.

use serde::Serialize;
use sqlx::PgPool;

use crate::catalog::{CatalogError, ProductCatalog};
use crate::models::product::Product;

/// Outcome of a sync run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    /// Products rewritten from the catalog
    pub updated: usize,

    /// Catalog items left alone (unchanged or not stored locally)
    pub skipped: usize,
}

impl SyncReport {
    /// Number of catalog items looked at
    pub fn total(&self) -> usize {
        self.updated + self.skipped
    }
}

/// Sync failure
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// Catalog could not be read; nothing was written
    #[error("Failed to fetch product list: {0}")]
    Catalog(#[from] CatalogError),

    /// A read or write against the local database failed
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Refreshes local products from the catalog
pub async fn sync_products(
    pool: &PgPool,
    catalog: &dyn ProductCatalog,
) -> Result<SyncReport, SyncError> {
    let items = catalog.get_product_list().await?;
    tracing::info!(count = items.len(), "Fetched product list from catalog");

    let mut report = SyncReport::default();

    for item in &items {
        let Some(product) = Product::find_by_api_id(pool, item.id).await? else {
            report.skipped += 1;
            continue;
        };

        if !product.differs_from(item) {
            report.skipped += 1;
            continue;
        }

        Product::refresh_from_catalog(pool, product.id, item).await?;
        tracing::debug!(api_id = item.id, product_id = product.id, "Product refreshed");
        report.updated += 1;
    }

    tracing::info!(
        updated = report.updated,
        skipped = report.skipped,
        "Product sync finished"
    );

    Ok(report)
}
