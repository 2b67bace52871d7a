use hashbrown::HashMap;

use crate::{
    product::{CartLine, CartSnapshot, CartTotals, Product},
    types::{ProductId, Quantity},
};

/// In-memory cart lines in insertion order with an id → position index.
#[derive(Debug, Default, Clone)]
pub struct Cart {
    lines: Vec<CartLine>,
    pos: HashMap<ProductId, usize>,
}

impl Cart {
    /// Creates an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a cart from an already validated snapshot.
    pub fn from_snapshot(snapshot: CartSnapshot) -> Self {
        let mut cart = Self::new();
        cart.replace(snapshot);
        cart
    }

    /// Clones the lines in insertion order.
    pub fn export_snapshot(&self) -> CartSnapshot {
        self.lines.clone()
    }

    /// Replaces every line with `snapshot`.
    pub fn replace(&mut self, snapshot: CartSnapshot) {
        self.lines = snapshot;
        self.reindex();
    }

    /// Adds `qty` units, appending a line for an unseen product. Returns the
    /// resulting quantity.
    pub fn add(&mut self, product: &Product, qty: Quantity) -> Quantity {
        let qty = qty.max(1);
        if let Some(line) = self.line_mut(product.id) {
            line.quantity = line.quantity.saturating_add(qty);
            return line.quantity;
        }

        self.pos.insert(product.id, self.lines.len());
        self.lines.push(CartLine {
            product: product.clone(),
            quantity: qty,
        });
        qty
    }

    /// Removes the line for `id`. Returns the removed line, if any.
    pub fn remove(&mut self, id: ProductId) -> Option<CartLine> {
        let idx = self.pos.remove(&id)?;
        let line = self.lines.remove(idx);
        for later in self.lines.iter().skip(idx) {
            if let Some(p) = self.pos.get_mut(&later.id()) {
                *p -= 1;
            }
        }
        Some(line)
    }

    /// Sets the quantity for `id` to `max(1, qty)`. Returns the stored
    /// quantity, or `None` if there is no such line.
    pub fn set_quantity(&mut self, id: ProductId, qty: i64) -> Option<Quantity> {
        let clamped = Quantity::try_from(qty.max(1)).unwrap_or(Quantity::MAX);
        let line = self.line_mut(id)?;
        line.quantity = clamped;
        Some(clamped)
    }

    /// Drops every line.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.pos.clear();
    }

    /// Whether a line exists for `id`.
    pub fn contains(&self, id: ProductId) -> bool {
        self.pos.contains_key(&id)
    }

    /// Line for `id`, if any.
    pub fn get(&self, id: ProductId) -> Option<&CartLine> {
        self.pos.get(&id).and_then(|idx| self.lines.get(*idx))
    }

    /// Lines in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Number of distinct products.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// True when there are no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Recomputes item and price totals.
    pub fn totals(&self) -> CartTotals {
        CartTotals::of(&self.lines)
    }

    fn line_mut(&mut self, id: ProductId) -> Option<&mut CartLine> {
        let idx = *self.pos.get(&id)?;
        self.lines.get_mut(idx)
    }

    fn reindex(&mut self) {
        self.pos.clear();
        for (idx, line) in self.lines.iter().enumerate() {
            self.pos.insert(line.id(), idx);
        }
    }
}
