/// API token model
///
/// Tokens are opaque keys stored as-is: the management API returns a user's
/// token in its responses, so the plaintext must stay retrievable. A token
/// is valid for as long as its row exists; there is no expiry.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE auth_tokens (
///     key VARCHAR(64) PRIMARY KEY,
///     user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgExecutor, PgPool};

use super::user::User;
use crate::auth::token::generate_token;

/// API token row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AuthToken {
    /// The token value sent in `X-API-Key`
    pub key: String,

    /// Owner of the token
    pub user_id: i64,

    /// When the token was issued
    pub created_at: DateTime<Utc>,
}

impl AuthToken {
    /// Issues a new random token for `user_id`
    ///
    /// Accepts any executor so it can run inside the user-creation
    /// transaction.
    pub async fn insert<'e, E>(executor: E, user_id: i64) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, AuthToken>(
            r#"
            INSERT INTO auth_tokens (key, user_id)
            VALUES ($1, $2)
            RETURNING key, user_id, created_at
            "#,
        )
        .bind(generate_token())
        .bind(user_id)
        .fetch_one(executor)
        .await
    }

    /// Resolves a token key to its user
    ///
    /// Exact match only. Returns `None` for unknown keys.
    pub async fn find_user(pool: &PgPool, key: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT u.id, u.email, u.name, u.password_hash, u.role, u.created_at, u.updated_at
            FROM auth_tokens t
            JOIN users u ON u.id = t.user_id
            WHERE t.key = $1
            "#,
        )
        .bind(key)
        .fetch_optional(pool)
        .await
    }

    /// Returns the user's oldest token key, if any
    pub async fn first_for_user(pool: &PgPool, user_id: i64) -> Result<Option<String>, sqlx::Error> {
        sqlx::query_scalar(
            r#"
            SELECT key
            FROM auth_tokens
            WHERE user_id = $1
            ORDER BY created_at ASC, key ASC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }

    /// Counts tokens belonging to a user
    pub async fn count_for_user(pool: &PgPool, user_id: i64) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM auth_tokens WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await?;

        Ok(count)
    }
}
