/// Authentication endpoint
///
/// - `POST /auth/login` - exchange email and password for an API token
///
/// Tokens never expire, so login hands back the token the user already has.
/// A user without one (every token deleted by hand, say) gets a fresh one.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::ValidatedJson,
};
use axum::{extract::State, Json};
use prodlist_shared::{
    auth::password,
    models::{auth_token::AuthToken, user::User},
};
use serde::{Deserialize, Serialize};
use validator::Validate;

const INVALID_CREDENTIALS: &str = "Invalid email or password.";

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password must not be empty"))]
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Value for the `X-API-Key` header
    pub token: String,
}

/// Login endpoint
///
/// ```text
/// POST /auth/login
/// Content-Type: application/json
///
/// { "email": "ana@example.com", "password": "hunter22" }
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: unknown email or wrong password
/// - `422 Unprocessable Entity`: malformed body
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let user = User::find_by_email(&state.db, &req.email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;

    if !password::verify_password(&req.password, &user.password_hash)? {
        tracing::debug!(user_id = user.id, "Login rejected: wrong password");
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    }

    let token = match AuthToken::first_for_user(&state.db, user.id).await? {
        Some(token) => token,
        None => {
            tracing::info!(user_id = user.id, "Issuing token on login");
            AuthToken::insert(&state.db, user.id).await?.key
        }
    };

    Ok(Json(LoginResponse { token }))
}
