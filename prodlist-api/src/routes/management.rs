/// User administration endpoints
///
/// Mounted under `/management` behind both the API-key gate and the admin
/// gate. Every business error answers 400 with a bare JSON string.
///
/// - `GET    /management/user/list?page=N`
/// - `POST   /management/user`
/// - `GET    /management/user/:id`
/// - `PUT    /management/user/:id`
/// - `DELETE /management/user/:id`

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{ValidPath, ValidatedJson, ValidatedQuery},
    routes::PageParams,
};
use axum::{extract::State, http::StatusCode, Json};
use prodlist_shared::{
    auth::password,
    models::{
        auth_token::AuthToken,
        is_unique_violation,
        user::{CreateUser, UpdateUser, User, UserRole},
    },
    pagination::{limit_offset, Page},
};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use validator::Validate;

const USER_NOT_FOUND: &str = "No user was found with the provided ID.";
const EMAIL_IN_USE: &str = "The provided email is already in use.";

/// Lookup failures shared by get and delete
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum UserError {
    #[error("{}", USER_NOT_FOUND)]
    NotFound,
}

/// User creation failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum UserCreateError {
    #[error("{}", EMAIL_IN_USE)]
    EmailInUse,
}

/// User update failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum UserUpdateError {
    #[error("{}", USER_NOT_FOUND)]
    NotFound,

    #[error("{}", EMAIL_IN_USE)]
    EmailInUse,
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        ApiError::bad_request_text(err.to_string())
    }
}

impl From<UserCreateError> for ApiError {
    fn from(err: UserCreateError) -> Self {
        ApiError::bad_request_text(err.to_string())
    }
}

impl From<UserUpdateError> for ApiError {
    fn from(err: UserUpdateError) -> Self {
        ApiError::bad_request_text(err.to_string())
    }
}

/// Create request; every field is required
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be 1 to 255 characters"))]
    pub name: String,

    #[validate(
        email(message = "Invalid email format"),
        length(max = 254, message = "Email must be at most 254 characters")
    )]
    pub email: String,

    #[validate(length(min = 1, message = "Password must not be empty"))]
    pub password: String,
}

/// Partial update request; absent fields stay as they are
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be 1 to 255 characters"))]
    pub name: Option<String>,

    #[validate(
        email(message = "Invalid email format"),
        length(max = 254, message = "Email must be at most 254 characters")
    )]
    pub email: Option<String>,

    #[validate(length(min = 1, message = "Password must not be empty"))]
    pub password: Option<String>,
}

/// User as listed and fetched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserOut {
    pub id: i64,
    pub name: String,
    pub email: String,
}

/// User plus its API token, returned on create and update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserWithTokenOut {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub token: String,
}

impl From<User> for UserOut {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}

impl UserWithTokenOut {
    fn new(user: User, token: String) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            token,
        }
    }
}

/// Returns the user's token, issuing one if it has none
async fn token_for(pool: &PgPool, user_id: i64) -> Result<String, sqlx::Error> {
    match AuthToken::first_for_user(pool, user_id).await? {
        Some(token) => Ok(token),
        None => Ok(AuthToken::insert(pool, user_id).await?.key),
    }
}

/// Lists users ordered by name
pub async fn list_users(
    State(state): State<AppState>,
    ValidatedQuery(params): ValidatedQuery<PageParams>,
) -> ApiResult<Json<Page<UserOut>>> {
    let (limit, offset) = limit_offset(params.page);

    let users = User::list_by_name(&state.db, limit, offset).await?;
    let count = User::count(&state.db).await?;

    Ok(Json(Page::new(users, count).map(UserOut::from)))
}

/// Creates a customer account and its first token
///
/// # Errors
///
/// - `400 "The provided email is already in use."`
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<UserWithTokenOut>)> {
    let password_hash = password::hash_password(&req.password)?;

    let created = User::create_with_token(
        &state.db,
        CreateUser {
            email: req.email,
            name: req.name,
            password_hash,
            role: UserRole::Customer,
        },
    )
    .await;

    let (user, token) = match created {
        Ok(pair) => pair,
        Err(e) if is_unique_violation(&e) => return Err(UserCreateError::EmailInUse.into()),
        Err(e) => return Err(e.into()),
    };

    tracing::info!(user_id = user.id, "User created");

    Ok((
        StatusCode::CREATED,
        Json(UserWithTokenOut::new(user, token)),
    ))
}

/// Fetches one user
///
/// # Errors
///
/// - `400 "No user was found with the provided ID."`
pub async fn get_user(
    State(state): State<AppState>,
    ValidPath(user_id): ValidPath<i64>,
) -> ApiResult<Json<UserOut>> {
    let user = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or(UserError::NotFound)?;

    Ok(Json(user.into()))
}

/// Applies a partial update
///
/// The password is re-hashed when present. An email is rejected only when it
/// belongs to a different user.
///
/// # Errors
///
/// - `400 "No user was found with the provided ID."`
/// - `400 "The provided email is already in use."`
pub async fn update_user(
    State(state): State<AppState>,
    ValidPath(user_id): ValidPath<i64>,
    ValidatedJson(req): ValidatedJson<UpdateUserRequest>,
) -> ApiResult<Json<UserWithTokenOut>> {
    let existing = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or(UserUpdateError::NotFound)?;

    if let Some(email) = &req.email {
        if User::email_in_use_by_other(&state.db, email, user_id).await? {
            return Err(UserUpdateError::EmailInUse.into());
        }
    }

    let password_hash = match &req.password {
        Some(password) => Some(password::hash_password(password)?),
        None => None,
    };

    let changes = UpdateUser {
        email: req.email,
        name: req.name,
        password_hash,
    };

    if changes.is_empty() {
        let token = token_for(&state.db, existing.id).await?;
        return Ok(Json(UserWithTokenOut::new(existing, token)));
    }

    let user = match User::update(&state.db, user_id, changes).await {
        Ok(Some(user)) => user,
        // Deleted between the lookup and the update
        Ok(None) => return Err(UserUpdateError::NotFound.into()),
        Err(e) if is_unique_violation(&e) => return Err(UserUpdateError::EmailInUse.into()),
        Err(e) => return Err(e.into()),
    };

    let token = token_for(&state.db, user.id).await?;

    tracing::info!(user_id = user.id, "User updated");

    Ok(Json(UserWithTokenOut::new(user, token)))
}

/// Deletes a user with its tokens and favorites; products stay
///
/// # Errors
///
/// - `400 "No user was found with the provided ID."`
pub async fn delete_user(
    State(state): State<AppState>,
    ValidPath(user_id): ValidPath<i64>,
) -> ApiResult<StatusCode> {
    if !User::delete(&state.db, user_id).await? {
        return Err(UserError::NotFound.into());
    }

    tracing::info!(user_id, "User deleted");

    Ok(StatusCode::NO_CONTENT)
}
