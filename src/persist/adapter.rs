//! Durable cart snapshot adapter over a [`KeyValueStore`].

use hashbrown::HashSet;
use rust_decimal::Decimal;
use tracing::warn;

use crate::product::{CartLine, CartSnapshot};

use super::{KeyValueStore, PersistResult};

/// Reads and writes the cart snapshot as one JSON blob under a fixed key.
pub struct CartStorage<S> {
    medium: S,
    key: String,
}

impl<S: KeyValueStore> CartStorage<S> {
    /// Binds the adapter to `key` in `medium`.
    pub fn new(medium: S, key: impl Into<String>) -> Self {
        Self {
            medium,
            key: key.into(),
        }
    }

    /// Storage key of the snapshot.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Underlying medium.
    pub fn medium(&self) -> &S {
        &self.medium
    }

    /// Loads the persisted snapshot. Absent, unreadable, or malformed blobs
    /// all yield an empty snapshot.
    pub fn load(&self) -> CartSnapshot {
        let raw = match self.medium.get_item(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return CartSnapshot::new(),
            Err(err) => {
                warn!(key = %self.key, error = %err, "cart read failed, starting empty");
                return CartSnapshot::new();
            }
        };

        decode_snapshot(&raw).unwrap_or_else(|| {
            warn!(key = %self.key, "persisted cart is malformed, starting empty");
            CartSnapshot::new()
        })
    }

    /// Serializes `snapshot` and writes it with a single call.
    pub fn save(&self, snapshot: &[CartLine]) -> PersistResult<()> {
        let blob = serde_json::to_string(snapshot)?;
        self.medium.set_item(&self.key, &blob)
    }

    /// Removes the key entirely.
    pub fn clear(&self) -> PersistResult<()> {
        self.medium.remove_item(&self.key)
    }
}

/// Decodes and validates a persisted blob.
///
/// Returns `None` on parse failure, shape mismatch, a zero quantity, a
/// repeated product id, a negative price, a rating outside `0..=5`, or a
/// price total that does not fit in a `Decimal`.
pub fn decode_snapshot(raw: &str) -> Option<CartSnapshot> {
    let lines: CartSnapshot = serde_json::from_str(raw).ok()?;

    let mut seen = HashSet::with_capacity(lines.len());
    let mut total = Decimal::ZERO;
    for line in &lines {
        if line.quantity == 0 || !seen.insert(line.id()) {
            return None;
        }
        let product = &line.product;
        if product.price.is_sign_negative() || !(0.0..=5.0).contains(&product.rating.rate) {
            return None;
        }
        let line_total = product.price.checked_mul(Decimal::from(line.quantity))?;
        total = total.checked_add(line_total)?;
    }
    Some(lines)
}
