/// Favorite link model
///
/// A favorite is a unique (user, product) pair. Both foreign keys cascade,
/// so deleting a user removes its links while the products stay.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE favorite_products (
///     id BIGSERIAL PRIMARY KEY,
///     user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     product_id BIGINT NOT NULL REFERENCES products(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     active BOOLEAN NOT NULL DEFAULT TRUE,
///     UNIQUE (user_id, product_id)
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use super::product::Product;

/// Favorite link row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct FavoriteProduct {
    /// Primary key
    pub id: i64,

    /// Owner of the favorite
    pub user_id: i64,

    /// Local product id (not the catalog id)
    pub product_id: i64,

    /// When the product was favorited
    pub created_at: DateTime<Utc>,

    /// Last modification time
    pub updated_at: DateTime<Utc>,

    /// Soft-active flag
    pub active: bool,
}

impl FavoriteProduct {
    /// Links a product to a user
    ///
    /// # Errors
    ///
    /// Fails with a unique violation if the pair already exists.
    pub async fn create(pool: &PgPool, user_id: i64, product_id: i64) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, FavoriteProduct>(
            r#"
            INSERT INTO favorite_products (user_id, product_id)
            VALUES ($1, $2)
            RETURNING id, user_id, product_id, created_at, updated_at, active
            "#,
        )
        .bind(user_id)
        .bind(product_id)
        .fetch_one(pool)
        .await
    }

    /// Finds a user's link to the product with the given catalog id
    pub async fn find_by_catalog_id(
        pool: &PgPool,
        user_id: i64,
        api_id: i32,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, FavoriteProduct>(
            r#"
            SELECT f.id, f.user_id, f.product_id, f.created_at, f.updated_at, f.active
            FROM favorite_products f
            JOIN products p ON p.id = f.product_id
            WHERE f.user_id = $1 AND p.api_id = $2
            "#,
        )
        .bind(user_id)
        .bind(api_id)
        .fetch_optional(pool)
        .await
    }

    /// Deletes a link by id
    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM favorite_products WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists the products a user has favorited
    ///
    /// Ordered by the product's creation time, ties broken by product id.
    pub async fn list_products_for_user(
        pool: &PgPool,
        user_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Product>, sqlx::Error> {
        sqlx::query_as::<_, Product>(
            r#"
            SELECT p.id, p.api_id, p.title, p.price, p.description, p.category, p.image,
                   p.rating_rate, p.rating_count, p.created_at, p.updated_at, p.active
            FROM products p
            JOIN favorite_products f ON f.product_id = p.id
            WHERE f.user_id = $1
            ORDER BY p.created_at ASC, p.id ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
    }

    /// Counts a user's favorites
    pub async fn count_for_user(pool: &PgPool, user_id: i64) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM favorite_products WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(pool)
                .await?;

        Ok(count)
    }

    /// Counts links pointing at a product
    pub async fn count_for_product(pool: &PgPool, product_id: i64) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM favorite_products WHERE product_id = $1")
                .bind(product_id)
                .fetch_one(pool)
                .await?;

        Ok(count)
    }
}
