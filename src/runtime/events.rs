//! Runtime event stream payloads.

use crate::types::{ProductId, Quantity};

/// Events emitted from the cart event loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartEvent {
    /// Units of a product were added.
    Added {
        /// Product id.
        id: ProductId,
        /// Quantity after the add.
        quantity: Quantity,
    },
    /// A line was removed.
    Removed {
        /// Product id.
        id: ProductId,
    },
    /// A line's quantity was set.
    QuantityUpdated {
        /// Product id.
        id: ProductId,
        /// Stored quantity.
        quantity: Quantity,
    },
    /// The cart was emptied and its key removed.
    Cleared,
    /// Another context wrote the cart and local state was replaced.
    Reconciled,
}
