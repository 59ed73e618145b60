/// API route handlers
///
/// - `health`: service and database status
/// - `auth`: credential login returning the caller's API token
/// - `favorites`: the caller's favorite products (`/common`)
/// - `management`: user administration (`/management`, admin only)

pub mod auth;
pub mod favorites;
pub mod health;
pub mod management;

use serde::Deserialize;
use validator::Validate;

/// `?page=N` query parameter shared by list endpoints
#[derive(Debug, Clone, Copy, Deserialize, Validate)]
pub struct PageParams {
    /// 1-indexed page number
    #[serde(default = "first_page")]
    #[validate(range(min = 1, message = "Page must be at least 1"))]
    pub page: u32,
}

fn first_page() -> u32 {
    1
}
