//! Catalog product, cart line, and derived total types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{ProductId, Quantity};

/// Customer rating summary attached to a catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Rating {
    /// Average rate, 0 to 5.
    pub rate: f64,
    /// Number of ratings.
    pub count: u64,
}

/// Immutable catalog entry. The cart only ever copies it by value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Catalog-unique identifier.
    pub id: ProductId,
    /// Display title.
    pub title: String,
    /// Unit price, non-negative.
    pub price: Decimal,
    /// Long description.
    pub description: String,
    /// Category name.
    pub category: String,
    /// Image URI.
    pub image: String,
    /// Rating summary.
    pub rating: Rating,
}

/// One product's entry in the cart.
///
/// Serialized flat, so a persisted line reads as the product's fields plus
/// `quantity`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    /// Product value captured when it was first added.
    #[serde(flatten)]
    pub product: Product,
    /// Units held, never below 1.
    pub quantity: Quantity,
}

impl CartLine {
    /// Product id of this line.
    pub fn id(&self) -> ProductId {
        self.product.id
    }

    /// `price × quantity` for this line, saturating at the `Decimal` range.
    pub fn line_total(&self) -> Decimal {
        self.product.price.saturating_mul(Decimal::from(self.quantity))
    }
}

/// Ordered cart lines as durably persisted.
pub type CartSnapshot = Vec<CartLine>;

/// Derived aggregates over a snapshot. Never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CartTotals {
    /// Sum of quantities.
    pub items: u64,
    /// Sum of `price × quantity`.
    pub price: Decimal,
}

impl CartTotals {
    /// Recomputes totals from `lines`. Both sums saturate.
    pub fn of(lines: &[CartLine]) -> Self {
        lines.iter().fold(Self::default(), |acc, line| Self {
            items: acc.items.saturating_add(u64::from(line.quantity)),
            price: acc.price.saturating_add(line.line_total()),
        })
    }
}
