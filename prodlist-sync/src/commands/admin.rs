//! `create-admin`: bootstrap an administrator account.
//!
//! The management API only creates customers, so the first administrator
//! has to come from here.

use anyhow::bail;
use prodlist_shared::auth::password::hash_password;
use prodlist_shared::db::pool::close_pool;
use prodlist_shared::models::is_unique_violation;
use prodlist_shared::models::user::{normalize_email, CreateUser, User, UserRole};

/// Creates the administrator and returns its API token
pub async fn create(
    database_url: &str,
    email: &str,
    name: &str,
    password: &str,
) -> anyhow::Result<String> {
    let email = normalize_email(email);
    if !email.contains('@') {
        bail!("Invalid email: {}", email);
    }
    if name.trim().is_empty() {
        bail!("Name must not be empty");
    }
    if password.is_empty() {
        bail!("Password must not be empty");
    }

    let password_hash = hash_password(password)?;

    let pool = super::connect(database_url).await?;

    let created = User::create_with_token(
        &pool,
        CreateUser {
            email: email.clone(),
            name: name.to_string(),
            password_hash,
            role: UserRole::Admin,
        },
    )
    .await;
    close_pool(pool).await;

    match created {
        Ok((user, token)) => {
            tracing::info!(
                user_id = user.id,
                email = %user.email,
                role = user.role.as_str(),
                "Administrator created"
            );
            Ok(token)
        }
        Err(e) if is_unique_violation(&e) => bail!("A user already exists with email {}", email),
        Err(e) => Err(e.into()),
    }
}
