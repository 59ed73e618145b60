/// HTTP implementation of [`ProductCatalog`]
///
/// A plain `reqwest` client: one GET per call, JSON decode, no retry. The
/// request timeout is optional and unset by default, in which case a slow
/// catalog holds the calling request for as long as it takes.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

use super::{CatalogError, CatalogProduct, CatalogResult, ProductCatalog};

/// Catalog client backed by `reqwest`
#[derive(Debug, Clone)]
pub struct HttpCatalogClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpCatalogClient {
    /// Creates a client for `base_url` (trailing slashes are ignored)
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Transport` if the TLS backend cannot be
    /// initialised.
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> CatalogResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let http = builder
            .build()
            .map_err(|e| CatalogError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn product_url(&self, id: i32) -> String {
        format!("{}/products/{}", self.base_url, id)
    }

    fn product_list_url(&self) -> String {
        format!("{}/products", self.base_url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> CatalogResult<T> {
        debug!(url = %url, "Fetching from catalog");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| CatalogError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!(url = %url, status = status.as_u16(), "Catalog returned error status");
            return Err(CatalogError::Status(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| CatalogError::Transport(e.to_string()))?;

        serde_json::from_slice(&body).map_err(|e| CatalogError::Decode(e.to_string()))
    }
}

#[async_trait]
impl ProductCatalog for HttpCatalogClient {
    async fn get_product(&self, id: i32) -> CatalogResult<CatalogProduct> {
        self.get_json(&self.product_url(id)).await
    }

    async fn get_product_list(&self) -> CatalogResult<Vec<CatalogProduct>> {
        self.get_json(&self.product_list_url()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls() {
        let client = HttpCatalogClient::new("https://catalog.test/", None).unwrap();
        assert_eq!(client.base_url(), "https://catalog.test");
        assert_eq!(client.product_url(3), "https://catalog.test/products/3");
        assert_eq!(client.product_list_url(), "https://catalog.test/products");
    }

    /// Serves a tiny catalog on an ephemeral port
    ///
    /// - `/products/1`: 200 with an empty body (how the public catalog answers
    ///   unknown ids)
    /// - `/products/2`: 404
    /// - `/products/3`: a valid product
    /// - `/products`: 200 with JSON that is not a product list
    async fn spawn_catalog() -> HttpCatalogClient {
        use axum::{http::StatusCode, routing::get, Json, Router};
        use serde_json::json;

        let app = Router::new()
            .route("/products/1", get(|| async { "" }))
            .route("/products/2", get(|| async { StatusCode::NOT_FOUND }))
            .route(
                "/products/3",
                get(|| async {
                    Json(json!({
                        "id": 3,
                        "title": "Mens Cotton Jacket",
                        "price": 55.99,
                        "description": "Great outerwear jackets",
                        "category": "men's clothing",
                        "image": "https://fakestoreapi.com/img/71li-ujtlUL._AC_UX679_.jpg",
                        "rating": {"rate": 4.7, "count": 500}
                    }))
                }),
            )
            .route("/products", get(|| async { Json(json!({"oops": 1})) }));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        HttpCatalogClient::new(format!("http://{}", addr), Some(Duration::from_secs(5))).unwrap()
    }

    #[tokio::test]
    async fn test_empty_body_is_decode_error() {
        let client = spawn_catalog().await;

        let err = client.get_product(1).await.unwrap_err();
        assert!(matches!(err, CatalogError::Decode(_)), "got {:?}", err);
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let client = spawn_catalog().await;

        let err = client.get_product(2).await.unwrap_err();
        assert!(matches!(err, CatalogError::Status(404)), "got {:?}", err);
    }

    #[tokio::test]
    async fn test_unexpected_list_shape_is_decode_error() {
        let client = spawn_catalog().await;

        let err = client.get_product_list().await.unwrap_err();
        assert!(matches!(err, CatalogError::Decode(_)), "got {:?}", err);
    }

    #[tokio::test]
    async fn test_product_decodes() {
        let client = spawn_catalog().await;

        let product = client.get_product(3).await.unwrap();
        assert_eq!(product.id, 3);
        assert_eq!(product.price.to_string(), "55.99");
        assert_eq!(product.rating_count(), Some(500));
    }

    #[tokio::test]
    async fn test_unreachable_catalog_is_transport_error() {
        // Port 9 (discard) on localhost is closed on any sane test host
        let client =
            HttpCatalogClient::new("http://127.0.0.1:9", Some(Duration::from_secs(2))).unwrap();

        let err = client.get_product(1).await.unwrap_err();
        assert!(matches!(err, CatalogError::Transport(_)), "got {:?}", err);
    }
}
