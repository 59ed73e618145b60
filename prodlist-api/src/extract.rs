/// Request extractors with uniform 422 rejections
///
/// Axum's stock extractors answer malformed input with assorted 400/415/422
/// plain-text bodies. These wrappers route every rejection, plus `validator`
/// failures, through [`ApiError::ValidationError`] so clients always get
/// `{"detail": [{"field", "message"}]}`.

use axum::{
    async_trait,
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        FromRequest, FromRequestParts, Path, Query, Request,
    },
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::{ApiError, ValidationErrorDetail};

/// JSON body that has passed `validator` checks
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

/// Query string that has passed `validator` checks
#[derive(Debug, Clone)]
pub struct ValidatedQuery<T>(pub T);

/// Path parameters with a 422 rejection
#[derive(Debug, Clone)]
pub struct ValidPath<T>(pub T);

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::ValidationError(vec![ValidationErrorDetail::new(
            "body",
            rejection.body_text(),
        )])
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::ValidationError(vec![ValidationErrorDetail::new(
            "query",
            rejection.body_text(),
        )])
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::ValidationError(vec![ValidationErrorDetail::new(
            "path",
            rejection.body_text(),
        )])
    }
}

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(Self(value))
    }
}

#[async_trait]
impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state).await?;
        value.validate()?;
        Ok(Self(value))
    }
}

#[async_trait]
impl<T, S> FromRequestParts<S> for ValidPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state).await?;
        Ok(Self(value))
    }
}
