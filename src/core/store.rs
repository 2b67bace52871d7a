use tracing::{debug, error};

use crate::{
    core::cart::Cart,
    persist::{KeyValueStore, PersistResult, adapter::CartStorage},
    product::{CartLine, CartSnapshot, CartTotals, Product},
    types::{ProductId, Quantity},
};

/// Cart aggregate bound to a [`CartStorage`].
///
/// Every mutation is applied in memory and then persisted before it returns.
/// Storage failures are logged and do not roll back the in-memory change.
pub struct CartStore<S> {
    cart: Cart,
    storage: CartStorage<S>,
}

impl<S: KeyValueStore> CartStore<S> {
    /// Initializes the cart from whatever `storage` currently holds.
    pub fn open(storage: CartStorage<S>) -> Self {
        let cart = Cart::from_snapshot(storage.load());
        debug!(key = storage.key(), lines = cart.len(), "cart loaded");
        Self { cart, storage }
    }

    /// Adds `qty` units of `product`. Returns the line's quantity afterwards.
    pub fn add_to_cart(&mut self, product: &Product, qty: Quantity) -> Quantity {
        let out = self.cart.add(product, qty);
        self.persist();
        out
    }

    /// Removes the line for `id`. Absent ids are a no-op.
    pub fn remove_from_cart(&mut self, id: ProductId) -> bool {
        let removed = self.cart.remove(id).is_some();
        self.persist();
        removed
    }

    /// Sets the quantity of an existing line to `max(1, qty)`.
    pub fn update_quantity(&mut self, id: ProductId, qty: i64) -> Option<Quantity> {
        let out = self.cart.set_quantity(id, qty);
        self.persist();
        out
    }

    /// Empties the cart and removes the persisted key.
    pub fn clear_cart(&mut self) {
        self.cart.clear();
        if let Err(err) = self.storage.clear() {
            error!(key = self.storage.key(), error = %err, "failed to clear persisted cart");
        }
    }

    /// Discards in-memory state in favor of the latest persisted snapshot.
    pub fn reload(&mut self) {
        self.cart.replace(self.storage.load());
        debug!(key = self.storage.key(), lines = self.cart.len(), "cart reloaded");
    }

    /// Whether a line exists for `id`.
    pub fn is_in_cart(&self, id: ProductId) -> bool {
        self.cart.contains(id)
    }

    /// Line for `id`, if any.
    pub fn line(&self, id: ProductId) -> Option<&CartLine> {
        self.cart.get(id)
    }

    /// Lines in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        self.cart.lines()
    }

    /// Owned copy of the current lines.
    pub fn snapshot(&self) -> CartSnapshot {
        self.cart.export_snapshot()
    }

    /// Sum of quantities.
    pub fn total_items(&self) -> u64 {
        self.totals().items
    }

    /// Sum of line totals.
    pub fn total_price(&self) -> rust_decimal::Decimal {
        self.totals().price
    }

    /// Item and price totals together.
    pub fn totals(&self) -> CartTotals {
        self.cart.totals()
    }

    /// Backing adapter.
    pub fn storage(&self) -> &CartStorage<S> {
        &self.storage
    }

    /// Writes the current lines, surfacing any storage error.
    pub fn save(&self) -> PersistResult<()> {
        self.storage.save(self.cart.lines())
    }

    fn persist(&self) {
        if let Err(err) = self.save() {
            error!(key = self.storage.key(), error = %err, "failed to persist cart");
        }
    }
}
