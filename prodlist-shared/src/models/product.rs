/// Product model and database operations
///
/// Products are local copies of catalog items. They are created lazily the
/// first time anyone favorites a catalog id and refreshed by the sync job.
/// Request handlers never delete them.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE products (
///     id BIGSERIAL PRIMARY KEY,
///     api_id INTEGER NOT NULL UNIQUE,
///     title VARCHAR(255) NOT NULL,
///     price NUMERIC(10, 2) NOT NULL,
///     description TEXT NOT NULL,
///     category VARCHAR(255) NOT NULL,
///     image VARCHAR(512) NOT NULL,
///     rating_rate NUMERIC(3, 1),
///     rating_count INTEGER,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     active BOOLEAN NOT NULL DEFAULT TRUE
/// );
/// ```

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::catalog::CatalogProduct;

pub(crate) const PRODUCT_COLUMNS: &str = "id, api_id, title, price, description, category, image, \
     rating_rate, rating_count, created_at, updated_at, active";

/// Decimal places of the `price` column
pub const PRICE_SCALE: u32 = 2;

/// Decimal places of the `rating_rate` column
pub const RATING_SCALE: u32 = 1;

/// Local product record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    /// Local primary key
    pub id: i64,

    /// Catalog id (unique)
    pub api_id: i32,

    /// Product title
    pub title: String,

    /// Unit price
    pub price: Decimal,

    /// Long description
    pub description: String,

    /// Catalog category name
    pub category: String,

    /// Image URL
    pub image: String,

    /// Average rating, if the catalog reported one
    pub rating_rate: Option<Decimal>,

    /// Number of ratings, if the catalog reported one
    pub rating_count: Option<i32>,

    /// When the local copy was created
    pub created_at: DateTime<Utc>,

    /// When the local copy was last refreshed
    pub updated_at: DateTime<Utc>,

    /// Soft-active flag
    pub active: bool,
}

impl Product {
    /// True if any synced field differs from the catalog item
    ///
    /// Rating changes alone do not count as a change.
    pub fn differs_from(&self, item: &CatalogProduct) -> bool {
        self.title != item.title
            || self.price != item.price.round_dp(PRICE_SCALE)
            || self.description != item.description
            || self.category != item.category
            || self.image != item.image
    }

    /// Finds a product by catalog id
    pub async fn find_by_api_id(pool: &PgPool, api_id: i32) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE api_id = $1"
        ))
        .bind(api_id)
        .fetch_optional(pool)
        .await
    }

    /// Stores a catalog item as a new local product
    ///
    /// If another request inserted the same `api_id` first, the existing row
    /// is returned unchanged, so concurrent first favorites still produce a
    /// single product.
    pub async fn create_from_catalog(
        pool: &PgPool,
        item: &CatalogProduct,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Product>(&format!(
            r#"
            INSERT INTO products
                (api_id, title, price, description, category, image, rating_rate, rating_count)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (api_id) DO UPDATE SET api_id = products.api_id
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(item.id)
        .bind(&item.title)
        .bind(item.price.round_dp(PRICE_SCALE))
        .bind(&item.description)
        .bind(&item.category)
        .bind(&item.image)
        .bind(item.rating_rate().map(|rate| rate.round_dp(RATING_SCALE)))
        .bind(item.rating_count())
        .fetch_one(pool)
        .await
    }

    /// Overwrites the synced fields of an existing product
    ///
    /// The rating is only replaced when the catalog item carries one, and is
    /// stored as sent: a zero rating stays zero here, unlike on create.
    pub async fn refresh_from_catalog(
        pool: &PgPool,
        id: i64,
        item: &CatalogProduct,
    ) -> Result<Self, sqlx::Error> {
        let rating = item.rating.as_ref();

        sqlx::query_as::<_, Product>(&format!(
            r#"
            UPDATE products
            SET title = $2,
                price = $3,
                description = $4,
                category = $5,
                image = $6,
                rating_rate = CASE WHEN $9 THEN $7 ELSE rating_rate END,
                rating_count = CASE WHEN $9 THEN $8 ELSE rating_count END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&item.title)
        .bind(item.price.round_dp(PRICE_SCALE))
        .bind(&item.description)
        .bind(&item.category)
        .bind(&item.image)
        .bind(rating.and_then(|r| r.rate).map(|rate| rate.round_dp(RATING_SCALE)))
        .bind(rating.and_then(|r| r.count))
        .bind(rating.is_some())
        .fetch_one(pool)
        .await
    }
}
