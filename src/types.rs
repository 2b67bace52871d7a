//! Shared primitive IDs and storage keys.

/// Catalog product identifier, unique per catalog.
pub type ProductId = u64;
/// Number of units of one product held in the cart. Always at least 1.
pub type Quantity = u32;
/// Identifier of one execution context (tab) attached to an origin.
pub type ContextId = u64;

/// Storage key holding the serialized cart snapshot.
pub const CART_KEY: &str = "my_app_cart_v1";
/// Storage key holding the bare theme identifier.
pub const THEME_KEY: &str = "app-theme";
