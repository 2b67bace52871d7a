//! In-memory cart aggregate and its persisted store.

/// Ordered cart lines with an O(1) id index.
pub mod cart;
/// Cart aggregate bound to durable storage.
pub mod store;
