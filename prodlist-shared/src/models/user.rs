/// Accounts: customers who keep favorites and administrators who manage them
///
/// Emails are unique after normalization (see [`normalize_email`]). Deleting a user cascades to its `auth_tokens` and `favorite_products`
/// rows. Products themselves are never removed.
///
/// # Example
///
/// ```no_run
/// use prodlist_shared::models::user::{CreateUser, User, UserRole};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool, hash: String) -> Result<(), sqlx::Error> {
/// let (user, token) = User::create_with_token(&pool, CreateUser {
///     email: "ana@example.com".to_string(),
///     name: "Ana".to_string(),
///     password_hash: hash,
///     role: UserRole::Customer,
/// }).await?;
///
/// println!("Created user {} with token {}", user.id, token);
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use super::auth_token::AuthToken;

const USER_COLUMNS: &str = "id, email, name, password_hash, role, created_at, updated_at";

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    /// May use the management endpoints
    Admin,

    /// Regular account, favorites only
    Customer,
}

impl UserRole {
    /// Returns the role as stored in the database
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "ADMIN",
            UserRole::Customer => "CUSTOMER",
        }
    }
}

impl Default for UserRole {
    fn default() -> Self {
        UserRole::Customer
    }
}

/// User account
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Primary key
    pub id: i64,

    /// Unique email address (login identifier)
    pub email: String,

    /// Display name
    pub name: String,

    /// Argon2id PHC string, never the plaintext password
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Account role
    pub role: UserRole,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account was last modified
    pub updated_at: DateTime<Utc>,
}

/// Fields for a new account
#[derive(Debug, Clone)]
pub struct CreateUser {
    /// Email address (normalized before insert)
    pub email: String,

    /// Display name
    pub name: String,

    /// Argon2id hash of the password
    pub password_hash: String,

    /// Account role
    pub role: UserRole,
}

/// Partial update of a user
///
/// Only `Some` fields are written.
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    /// New email address
    pub email: Option<String>,

    /// New display name
    pub name: Option<String>,

    /// New password hash
    pub password_hash: Option<String>,
}

impl UpdateUser {
    /// True when no field would change
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.name.is_none() && self.password_hash.is_none()
    }
}

/// Lowercases the domain part of an email address
///
/// The local part is case-sensitive by RFC 5321 and is kept as given.
///
/// ```
/// use prodlist_shared::models::user::normalize_email;
///
/// assert_eq!(normalize_email("Ana.Silva@Example.COM"), "Ana.Silva@example.com");
/// ```
pub fn normalize_email(email: &str) -> String {
    let email = email.trim();
    match email.rsplit_once('@') {
        Some((local, domain)) => format!("{}@{}", local, domain.to_lowercase()),
        None => email.to_string(),
    }
}

impl User {
    /// True if the user may call management endpoints
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Inserts a user and issues its first API token in one transaction
    ///
    /// # Errors
    ///
    /// Returns a unique-violation database error if the email is taken; no
    /// row is left behind in that case.
    pub async fn create_with_token(
        pool: &PgPool,
        data: CreateUser,
    ) -> Result<(Self, String), sqlx::Error> {
        let mut tx = pool.begin().await?;

        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (email, name, password_hash, role)
            VALUES ($1, $2, $3, $4)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(normalize_email(&data.email))
        .bind(data.name)
        .bind(data.password_hash)
        .bind(data.role)
        .fetch_one(&mut *tx)
        .await?;

        let token = AuthToken::insert(&mut *tx, user.id).await?;

        tx.commit().await?;

        Ok((user, token.key))
    }

    /// Finds a user by primary key
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Finds a user by email (after normalization)
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(normalize_email(email))
        .fetch_optional(pool)
        .await
    }

    /// Checks whether any user other than `exclude_id` owns `email`
    pub async fn email_in_use_by_other(
        pool: &PgPool,
        email: &str,
        exclude_id: i64,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE email = $1 AND id <> $2)")
            .bind(normalize_email(email))
            .bind(exclude_id)
            .fetch_one(pool)
            .await
    }

    /// Applies a partial update
    ///
    /// Returns `None` if the user does not exist. `updated_at` is always
    /// refreshed.
    pub async fn update(
        pool: &PgPool,
        id: i64,
        data: UpdateUser,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET email = COALESCE($2, email),
                name = COALESCE($3, name),
                password_hash = COALESCE($4, password_hash),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(data.email.as_deref().map(normalize_email))
        .bind(data.name)
        .bind(data.password_hash)
        .fetch_optional(pool)
        .await
    }

    /// Deletes a user, cascading to tokens and favorite links
    ///
    /// Returns false if no such user existed.
    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists users ordered by name (ties broken by id)
    pub async fn list_by_name(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            ORDER BY name ASC, id ASC
            LIMIT $1 OFFSET $2
            "#
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
    }

    /// Counts all users
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(pool)
            .await
    }
}
