/// Error handling for the API server
///
/// Handlers return `ApiResult<T>`; every failure funnels into [`ApiError`],
/// which picks the status code and body.
///
/// | Variant            | Status | Body                                   |
/// |--------------------|--------|----------------------------------------|
/// | `BadRequest`       | 400    | `{"error": msg}` or `"msg"`            |
/// | `Unauthorized`     | 401    | `{"detail": msg}`                      |
/// | `ValidationError`  | 422    | `{"detail": [{"field", "message"}]}`   |
/// | `InternalError`    | 500    | `{"detail": "An internal error occurred"}` |
///
/// Business errors are small per-endpoint enums living next to their
/// handlers. Each converts into `BadRequest` with the body shape that
/// endpoint has always used.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use prodlist_shared::auth::password::PasswordError;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// How a 400 message is wrapped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyShape {
    /// `{"error": "<message>"}`
    Object,

    /// `"<message>"`
    Text,
}

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Business rule violation (400)
    BadRequest { message: String, shape: BodyShape },

    /// Unauthorized (401)
    Unauthorized(String),

    /// Unprocessable entity (422)
    ValidationError(Vec<ValidationErrorDetail>),

    /// Internal server error (500)
    InternalError(String),
}

/// Validation error detail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    /// Field (or request part) that failed validation
    pub field: String,

    /// Error message
    pub message: String,
}

impl ValidationErrorDetail {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl ApiError {
    /// 400 with an `{"error": ...}` body
    pub fn bad_request_object(message: impl Into<String>) -> Self {
        ApiError::BadRequest {
            message: message.into(),
            shape: BodyShape::Object,
        }
    }

    /// 400 with a bare JSON string body
    pub fn bad_request_text(message: impl Into<String>) -> Self {
        ApiError::BadRequest {
            message: message.into(),
            shape: BodyShape::Text,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest { message, .. } => write!(f, "Bad request: {}", message),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::ValidationError(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest {
                message,
                shape: BodyShape::Object,
            } => (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response(),
            ApiError::BadRequest {
                message,
                shape: BodyShape::Text,
            } => (StatusCode::BAD_REQUEST, Json(message)).into_response(),
            ApiError::Unauthorized(msg) => {
                (StatusCode::UNAUTHORIZED, Json(json!({ "detail": msg }))).into_response()
            }
            ApiError::ValidationError(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "detail": errors })),
            )
                .into_response(),
            ApiError::InternalError(msg) => {
                // Logged here, never sent to the client
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "detail": "An internal error occurred" })),
                )
                    .into_response()
            }
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        ApiError::InternalError(format!("Database error: {}", err))
    }
}

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::InternalError(format!("Password operation failed: {}", err))
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut details: Vec<ValidationErrorDetail> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| {
                    ValidationErrorDetail::new(
                        field.to_string(),
                        error
                            .message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| "Validation failed".to_string()),
                    )
                })
            })
            .collect();

        details.sort_by(|a, b| a.field.cmp(&b.field));
        ApiError::ValidationError(details)
    }
}
