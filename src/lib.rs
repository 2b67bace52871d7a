//! Client-held shopping cart with durable storage and cross-context sync.
//!
//! # Examples
//!
//! A cart over an in-process medium:
//! ```
//! use cartstore::{
//!     core::store::CartStore,
//!     persist::{adapter::CartStorage, memory::MemoryStore},
//!     product::{Product, Rating},
//!     types::CART_KEY,
//! };
//! use rust_decimal::Decimal;
//!
//! let mut cart = CartStore::open(CartStorage::new(MemoryStore::new(), CART_KEY));
//! let product = Product {
//!     id: 7,
//!     title: "Backpack".to_string(),
//!     price: Decimal::new(10995, 2),
//!     description: String::new(),
//!     category: "bags".to_string(),
//!     image: String::new(),
//!     rating: Rating { rate: 3.9, count: 120 },
//! };
//! cart.add_to_cart(&product, 2);
//! cart.update_quantity(7, 0);
//! assert_eq!(cart.total_items(), 1);
//! assert!(cart.is_in_cart(7));
//! ```
//!
//! Two contexts sharing one SQLite file, each running its own cart loop:
//! ```no_run
//! use cartstore::{
//!     config::StoreConfig,
//!     core::store::CartStore,
//!     persist::{adapter::CartStorage, origin::Origin, sqlite::SqliteStore},
//!     runtime::handle::spawn_cart,
//!     sync::CrossTabSync,
//! };
//!
//! # #[tokio::main]
//! # async fn main() {
//! let config = StoreConfig::default();
//! let origin = Origin::new(SqliteStore::open("cart.db").expect("open sqlite"), config.change_capacity);
//!
//! let tab = origin.context();
//! let sync = CrossTabSync::new(tab.subscribe(config.cart_key.as_str()));
//! let store = CartStore::open(CartStorage::new(tab, config.cart_key.as_str()));
//! let handle = spawn_cart(store, sync, &config);
//!
//! let totals = handle.totals().await.expect("totals");
//! println!("{} items", totals.items);
//! handle.shutdown().await.expect("shutdown");
//! # }
//! ```
#![deny(missing_docs)]

/// Product catalog sources.
pub mod catalog;
/// Store configuration.
pub mod config;
/// In-memory cart aggregate and persisted store.
pub mod core;
/// Persistence media, change notifications, and the cart adapter.
pub mod persist;
/// Catalog product and cart line types.
pub mod product;
/// Single-writer cart runtime handle and events.
pub mod runtime;
/// Cross-context reconciliation.
pub mod sync;
/// Persisted theme selection.
pub mod theme;
/// Shared primitive types and storage keys.
pub mod types;
