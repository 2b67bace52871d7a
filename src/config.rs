//! Store configuration.

use crate::types::{CART_KEY, THEME_KEY};

/// Default product catalog endpoint.
pub const DEFAULT_CATALOG_URL: &str = "https://fakestoreapi.com/products";

/// Keys, channel sizes, and endpoints for one storefront client.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Key holding the cart snapshot.
    pub cart_key: String,
    /// Key holding the selected theme.
    pub theme_key: String,
    /// Bound of the cart loop's command queue.
    pub command_queue_bound: usize,
    /// Buffered [`crate::runtime::events::CartEvent`]s per subscriber.
    pub event_capacity: usize,
    /// Buffered storage change notifications per subscriber.
    pub change_capacity: usize,
    /// Catalog endpoint returning a JSON product array.
    pub catalog_url: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            cart_key: CART_KEY.to_string(),
            theme_key: THEME_KEY.to_string(),
            command_queue_bound: 256,
            event_capacity: 1024,
            change_capacity: 256,
            catalog_url: DEFAULT_CATALOG_URL.to_string(),
        }
    }
}
