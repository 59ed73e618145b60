/// In-memory catalog for tests and local demos
///
/// Serves a fixed set of products, can be switched into a failing mode, and
/// counts how many requests it has answered.
///
/// # Example
///
/// ```
/// use prodlist_shared::catalog::{mock::MockCatalog, ProductCatalog};
///
/// # async fn example() {
/// let catalog = MockCatalog::new(vec![MockCatalog::sample_product(1)]);
/// assert!(catalog.get_product(1).await.is_ok());
/// assert!(catalog.get_product(2).await.is_err());
/// assert_eq!(catalog.request_count(), 2);
/// # }
/// ```

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use super::{CatalogError, CatalogProduct, CatalogRating, CatalogResult, ProductCatalog};

/// Mock catalog implementation
#[derive(Debug, Default)]
pub struct MockCatalog {
    products: Mutex<BTreeMap<i32, CatalogProduct>>,
    failing: AtomicBool,
    requests: AtomicUsize,
}

impl MockCatalog {
    /// Creates a catalog serving `products`
    pub fn new(products: Vec<CatalogProduct>) -> Self {
        let catalog = Self::default();
        for product in products {
            catalog.upsert(product);
        }
        catalog
    }

    /// Catalog whose every request fails with a transport error
    pub fn failing() -> Self {
        let catalog = Self::default();
        catalog.set_failing(true);
        catalog
    }

    /// Deterministic product for catalog id `id`
    pub fn sample_product(id: i32) -> CatalogProduct {
        CatalogProduct {
            id,
            title: format!("Product {}", id),
            price: Decimal::new(1000 + i64::from(id), 2),
            description: format!("Description of product {}", id),
            category: "electronics".to_string(),
            image: format!("https://catalog.test/img/{}.jpg", id),
            rating: Some(CatalogRating {
                rate: Some(Decimal::new(41, 1)),
                count: Some(100 + id % 900),
            }),
        }
    }

    /// Adds or replaces a product
    pub fn upsert(&self, product: CatalogProduct) {
        if let Ok(mut products) = self.products.lock() {
            products.insert(product.id, product);
        }
    }

    /// Toggles failure mode
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of requests served so far (including failed ones)
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    fn begin_request(&self) -> CatalogResult<()> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(CatalogError::Transport("mock catalog unavailable".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl ProductCatalog for MockCatalog {
    async fn get_product(&self, id: i32) -> CatalogResult<CatalogProduct> {
        self.begin_request()?;

        let products = self
            .products
            .lock()
            .map_err(|_| CatalogError::Transport("mock catalog poisoned".to_string()))?;

        // The public catalog answers unknown ids with an empty 200 body
        products
            .get(&id)
            .cloned()
            .ok_or_else(|| CatalogError::Decode("EOF while parsing a value".to_string()))
    }

    async fn get_product_list(&self) -> CatalogResult<Vec<CatalogProduct>> {
        self.begin_request()?;

        let products = self
            .products
            .lock()
            .map_err(|_| CatalogError::Transport("mock catalog poisoned".to_string()))?;

        Ok(products.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_serves_known_products() {
        let catalog = MockCatalog::new(vec![
            MockCatalog::sample_product(1),
            MockCatalog::sample_product(2),
        ]);

        let product = catalog.get_product(2).await.unwrap();
        assert_eq!(product.title, "Product 2");
        assert_eq!(catalog.get_product_list().await.unwrap().len(), 2);
        assert_eq!(catalog.request_count(), 2);
    }

    #[tokio::test]
    async fn test_unknown_id_is_decode_error() {
        let catalog = MockCatalog::default();
        let err = catalog.get_product(99).await.unwrap_err();
        assert!(matches!(err, CatalogError::Decode(_)));
    }

    #[tokio::test]
    async fn test_failing_mode() {
        let catalog = MockCatalog::failing();
        assert!(catalog.get_product_list().await.is_err());

        catalog.set_failing(false);
        assert!(catalog.get_product_list().await.is_ok());
        assert_eq!(catalog.request_count(), 2);
    }

    #[test]
    fn test_sample_product_price() {
        let product = MockCatalog::sample_product(5);
        assert_eq!(product.price, Decimal::new(1005, 2));
    }
}
