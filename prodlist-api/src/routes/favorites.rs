/// Favorite product endpoints
///
/// All routes sit behind the API-key gate and act on the calling user.
///
/// - `POST /common/favorites/:id` - favorite catalog product `id`
/// - `POST /common/favorites/:id/delete` - drop it again
/// - `GET  /common/favorites?page=N` - list favorites, 20 per page
///
/// Products are fetched from the catalog the first time anyone favorites
/// them and served from the database afterwards.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{ValidPath, ValidatedQuery},
    routes::PageParams,
};
use axum::{extract::State, http::StatusCode, Json};
use prodlist_shared::{
    auth::middleware::AuthContext,
    models::{favorite::FavoriteProduct, is_unique_violation, product::Product},
    pagination::{limit_offset, Page},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Favorite-add failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AddFavoriteError {
    #[error("Product not found or could not be fetched from the API.")]
    ProductUnavailable,

    #[error("The product selected is already on user's favorites.")]
    AlreadyFavorited,
}

/// Favorite-remove failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RemoveFavoriteError {
    #[error("This product is not on your favorites.")]
    NotFavorited,
}

impl From<AddFavoriteError> for ApiError {
    fn from(err: AddFavoriteError) -> Self {
        ApiError::bad_request_object(err.to_string())
    }
}

impl From<RemoveFavoriteError> for ApiError {
    fn from(err: RemoveFavoriteError) -> Self {
        ApiError::bad_request_text(err.to_string())
    }
}

/// Product as shown to API clients
///
/// Decimals serialize as strings (`"109.95"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductOut {
    pub api_id: i32,
    pub title: String,
    pub image: String,
    pub price: Decimal,
    pub rating_rate: Option<Decimal>,
    pub rating_count: Option<i32>,
}

impl From<Product> for ProductOut {
    fn from(product: Product) -> Self {
        Self {
            api_id: product.api_id,
            title: product.title,
            image: product.image,
            price: product.price,
            rating_rate: product.rating_rate,
            rating_count: product.rating_count,
        }
    }
}

/// Adds a catalog product to the caller's favorites
///
/// # Errors
///
/// - `400 {"error": ...}`: catalog fetch failed, or already a favorite
pub async fn add_favorite(
    State(state): State<AppState>,
    auth: AuthContext,
    ValidPath(api_id): ValidPath<i32>,
) -> ApiResult<(StatusCode, Json<ProductOut>)> {
    let product = match Product::find_by_api_id(&state.db, api_id).await? {
        Some(product) => product,
        None => {
            let item = state.catalog.get_product(api_id).await.map_err(|e| {
                tracing::warn!(api_id, error = %e, "Catalog fetch failed");
                AddFavoriteError::ProductUnavailable
            })?;

            let product = Product::create_from_catalog(&state.db, &item).await?;
            tracing::info!(api_id, product_id = product.id, "Stored product from catalog");
            product
        }
    };

    match FavoriteProduct::create(&state.db, auth.user_id(), product.id).await {
        Ok(_) => {}
        Err(e) if is_unique_violation(&e) => return Err(AddFavoriteError::AlreadyFavorited.into()),
        Err(e) => return Err(e.into()),
    }

    tracing::debug!(user_id = auth.user_id(), api_id, "Favorite added");

    Ok((StatusCode::CREATED, Json(product.into())))
}

/// Removes a catalog product from the caller's favorites
///
/// # Errors
///
/// - `400 "..."`: the product is not among the caller's favorites
pub async fn remove_favorite(
    State(state): State<AppState>,
    auth: AuthContext,
    ValidPath(api_id): ValidPath<i32>,
) -> ApiResult<StatusCode> {
    let favorite = FavoriteProduct::find_by_catalog_id(&state.db, auth.user_id(), api_id)
        .await?
        .ok_or(RemoveFavoriteError::NotFavorited)?;

    FavoriteProduct::delete(&state.db, favorite.id).await?;

    tracing::debug!(user_id = auth.user_id(), api_id, "Favorite removed");

    Ok(StatusCode::NO_CONTENT)
}

/// Lists the caller's favorites, oldest product first
pub async fn list_favorites(
    State(state): State<AppState>,
    auth: AuthContext,
    ValidatedQuery(params): ValidatedQuery<PageParams>,
) -> ApiResult<Json<Page<ProductOut>>> {
    let (limit, offset) = limit_offset(params.page);

    let products =
        FavoriteProduct::list_products_for_user(&state.db, auth.user_id(), limit, offset).await?;
    let count = FavoriteProduct::count_for_user(&state.db, auth.user_id()).await?;

    Ok(Json(Page::new(products, count).map(ProductOut::from)))
}
