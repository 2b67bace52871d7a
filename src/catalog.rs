//! Read-only product catalog sources.

use thiserror::Error;
use tracing::{debug, instrument};

use crate::product::Product;

/// Catalog fetch or decode failure.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Transport or HTTP status error.
    #[error("catalog request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// Payload did not match the product shape.
    #[error("catalog payload is not a product list: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Anything that can produce the product list shown to visitors.
pub trait CatalogSource {
    /// Current product list.
    async fn products(&self) -> Result<Vec<Product>, CatalogError>;
}

/// Parses a JSON array of products.
pub fn parse_products(raw: &str) -> Result<Vec<Product>, CatalogError> {
    Ok(serde_json::from_str(raw)?)
}

/// Catalog fetched with a single GET. No retries.
#[derive(Debug, Clone)]
pub struct HttpCatalog {
    client: reqwest::Client,
    url: String,
}

impl HttpCatalog {
    /// Catalog served at `url`.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }

    /// Endpoint URL.
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl CatalogSource for HttpCatalog {
    #[instrument(skip(self), fields(url = %self.url))]
    async fn products(&self) -> Result<Vec<Product>, CatalogError> {
        let body = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        let products = parse_products(&body)?;
        debug!(count = products.len(), "catalog fetched");
        Ok(products)
    }
}

/// Fixed catalog, typically loaded from a bundled JSON file.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    products: Vec<Product>,
}

impl StaticCatalog {
    /// Catalog holding exactly `products`.
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// Parses a JSON product array.
    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        parse_products(raw).map(Self::new)
    }
}

impl CatalogSource for StaticCatalog {
    async fn products(&self) -> Result<Vec<Product>, CatalogError> {
        Ok(self.products.clone())
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    const SAMPLE: &str = r#"[
        {
            "id": 1,
            "title": "Fjallraven - Foldsack No. 1 Backpack",
            "price": 109.95,
            "description": "Your perfect pack for everyday use",
            "category": "men's clothing",
            "image": "https://fakestoreapi.com/img/81fPKd-2AYL._AC_SL1500_.jpg",
            "rating": { "rate": 3.9, "count": 120 }
        },
        {
            "id": 2,
            "title": "Mens Casual Slim Fit",
            "price": 22,
            "description": "The color could be slightly different",
            "category": "men's clothing",
            "image": "https://fakestoreapi.com/img/71YXzeOuslL._AC_UY879_.jpg",
            "rating": { "rate": 4.1, "count": 259 }
        }
    ]"#;

    #[tokio::test]
    async fn static_catalog_parses_product_shape() {
        let catalog = StaticCatalog::from_json(SAMPLE).expect("parse");
        let products = catalog.products().await.expect("products");

        assert_eq!(products.len(), 2);
        assert_eq!(products[0].price, Decimal::new(10995, 2));
        assert_eq!(products[0].rating.count, 120);
        assert_eq!(products[1].price, Decimal::new(22, 0));
    }

    #[test]
    fn non_list_payload_is_a_decode_error() {
        assert!(matches!(
            parse_products(r#"{"id":1}"#),
            Err(CatalogError::Decode(_))
        ));
    }
}
