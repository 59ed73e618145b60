/// Database models for ProdList
///
/// Each model owns its SQL. Handlers and the sync job call these methods
/// with an explicitly passed `&PgPool`.
///
/// # Models
///
/// - `user`: User accounts with roles and Argon2 password hashes
/// - `auth_token`: Opaque API tokens (one or more per user)
/// - `product`: Local copies of catalog products
/// - `favorite`: (user, product) favorite links

pub mod auth_token;
pub mod favorite;
pub mod product;
pub mod user;

/// Returns true when `err` is a unique-constraint violation
///
/// Handlers use this to turn duplicate emails and duplicate favorites into
/// their fixed 400 messages instead of internal errors.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.is_unique_violation(),
        _ => false,
    }
}
