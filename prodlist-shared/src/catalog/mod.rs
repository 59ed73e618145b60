/// External product catalog
///
/// The catalog is a third-party REST service exposing `GET /products` and
/// `GET /products/{id}`. It is reached through the [`ProductCatalog`] trait
/// so request handlers and the sync job can be exercised against
/// [`mock::MockCatalog`] in tests.
///
/// Requests are neither retried, cached nor rate limited. Any
/// transport, status or decode failure surfaces as a [`CatalogError`].
///
/// # Payload
///
/// ```json
/// {
///   "id": 1,
///   "title": "Fjallraven - Foldsack No. 1 Backpack",
///   "price": 109.95,
///   "description": "Your perfect pack for everyday use",
///   "category": "men's clothing",
///   "image": "https://fakestoreapi.com/img/81fPKd-2AYL._AC_SL1500_.jpg",
///   "rating": { "rate": 3.9, "count": 120 }
/// }
/// ```

pub mod client;
pub mod mock;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

pub use client::HttpCatalogClient;

/// Default catalog base URL
pub const DEFAULT_BASE_URL: &str = "https://fakestoreapi.com";

/// Catalog error types
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Request could not be sent or the connection failed
    #[error("Catalog request failed: {0}")]
    Transport(String),

    /// Catalog answered with a non-success status
    #[error("Catalog returned HTTP {0}")]
    Status(u16),

    /// Body was empty, not JSON, or missing required fields
    #[error("Invalid catalog payload: {0}")]
    Decode(String),
}

/// Catalog result type alias
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Product as returned by the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogProduct {
    /// Catalog id
    pub id: i32,

    /// Product title
    pub title: String,

    /// Unit price
    #[serde(deserialize_with = "deserialize_decimal")]
    pub price: Decimal,

    /// Long description
    pub description: String,

    /// Category name
    pub category: String,

    /// Image URL
    pub image: String,

    /// Optional rating summary
    #[serde(default)]
    pub rating: Option<CatalogRating>,
}

/// Rating summary attached to a catalog product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogRating {
    /// Average rating
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    pub rate: Option<Decimal>,

    /// Number of ratings
    #[serde(default)]
    pub count: Option<i32>,
}

impl CatalogProduct {
    /// Rating average to store, treating zero as "no rating"
    pub fn rating_rate(&self) -> Option<Decimal> {
        self.rating
            .as_ref()
            .and_then(|r| r.rate)
            .filter(|rate| !rate.is_zero())
    }

    /// Rating count to store, treating zero as "no rating"
    pub fn rating_count(&self) -> Option<i32> {
        self.rating
            .as_ref()
            .and_then(|r| r.count)
            .filter(|count| *count != 0)
    }
}

/// Read access to the product catalog
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    /// Fetches one product by catalog id
    async fn get_product(&self, id: i32) -> CatalogResult<CatalogProduct>;

    /// Fetches the full product list
    async fn get_product_list(&self) -> CatalogResult<Vec<CatalogProduct>>;
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(serde_json::Number),
    String(String),
}

impl NumberOrString {
    fn into_decimal<E: serde::de::Error>(self) -> Result<Decimal, E> {
        // Going through the shortest decimal text keeps 109.95 exact
        let text = match self {
            NumberOrString::Number(n) => n.to_string(),
            NumberOrString::String(s) => s,
        };
        Decimal::from_str(text.trim())
            .or_else(|_| Decimal::from_scientific(text.trim()))
            .map_err(|e| E::custom(format!("invalid decimal '{}': {}", text, e)))
    }
}

fn deserialize_decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    NumberOrString::deserialize(deserializer)?.into_decimal()
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumberOrString>::deserialize(deserializer)? {
        Some(value) => value.into_decimal().map(Some),
        None => Ok(None),
    }
}
