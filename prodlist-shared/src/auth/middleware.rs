/// Request gates for Axum
///
/// Two middleware functions, meant to be stacked:
///
/// - [`require_api_key`] resolves the `X-API-Key` header to a [`User`] and
///   stores an [`AuthContext`] in the request extensions.
/// - [`require_admin`] runs after it and lets only administrators through.
///
/// # Example
///
/// ```no_run
/// use axum::{middleware, routing::get, Router};
/// use prodlist_shared::auth::middleware::{require_admin, require_api_key, AuthContext};
/// use sqlx::PgPool;
///
/// async fn whoami(auth: AuthContext) -> String {
///     auth.user.email
/// }
///
/// fn router(pool: PgPool) -> Router {
///     Router::new()
///         .route("/whoami", get(whoami))
///         // Layers run bottom-up: the token gate first, then the admin gate
///         .layer(middleware::from_fn(require_admin))
///         .layer(middleware::from_fn_with_state(pool, require_api_key))
/// }
/// ```

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use sqlx::PgPool;

use super::token::is_well_formed;
use crate::models::auth_token::AuthToken;
use crate::models::user::User;

/// Header carrying the API token
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Authenticated caller, placed in request extensions by [`require_api_key`]
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// User owning the presented token
    pub user: User,
}

impl AuthContext {
    pub fn user_id(&self) -> i64 {
        self.user.id
    }

    pub fn is_admin(&self) -> bool {
        self.user.is_admin()
    }
}

/// Gate failures
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Header absent, malformed, or token unknown
    #[error("Unauthorized")]
    Unauthorized,

    /// Authenticated but not an administrator
    #[error("Forbidden")]
    Forbidden,

    /// Token lookup failed
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, detail) = match &self {
            AuthError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized"),
            AuthError::Forbidden => (StatusCode::FORBIDDEN, "Forbidden"),
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Token lookup failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "An internal error occurred")
            }
        };

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .ok_or(AuthError::Unauthorized)
    }
}

/// Resolves the `X-API-Key` header to a user
///
/// Responds 401 when the header is missing, not valid UTF-8, or does not
/// match a stored token.
pub async fn require_api_key(
    State(pool): State<PgPool>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let key = req
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::Unauthorized)?;

    if !is_well_formed(key) {
        return Err(AuthError::Unauthorized);
    }

    let user = AuthToken::find_user(&pool, key)
        .await?
        .ok_or(AuthError::Unauthorized)?;

    tracing::debug!(
        user_id = user.id,
        role = user.role.as_str(),
        "Authenticated request"
    );

    req.extensions_mut().insert(AuthContext { user });

    Ok(next.run(req).await)
}

/// Lets only administrators through
///
/// Must be layered inside [`require_api_key`]; without an [`AuthContext`] the
/// request is treated as unauthenticated.
pub async fn require_admin(req: Request, next: Next) -> Result<Response, AuthError> {
    let auth = req
        .extensions()
        .get::<AuthContext>()
        .ok_or(AuthError::Unauthorized)?;

    if !auth.is_admin() {
        tracing::debug!(user_id = auth.user_id(), "Non-admin caller rejected");
        return Err(AuthError::Forbidden);
    }

    Ok(next.run(req).await)
}
