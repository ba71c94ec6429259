//! Cart line items and derived totals.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::add_amounts;
use super::product::Product;

/// One product in the cart with its quantity.
///
/// `snapshot` is a copy of the product taken when it was added (or last
/// re-added); it is not kept in step with later catalog edits. The line is
/// keyed by `snapshot.id` and the quantity is at least one for any line
/// that is still in a cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    pub quantity: u32,
    pub snapshot: Product,
}

impl CartLine {
    /// A fresh line holding one unit of `product`.
    #[must_use]
    pub const fn new(product: Product) -> Self {
        Self {
            quantity: 1,
            snapshot: product,
        }
    }

    /// The product this line references.
    #[must_use]
    pub const fn product_id(&self) -> ProductId {
        self.snapshot.id
    }

    /// Snapshot price times quantity.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.snapshot.price.times(self.quantity)
    }
}

/// Item count and price sum for a set of lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CartTotals {
    /// Sum of quantities.
    pub count: u64,
    /// Sum of `quantity * price`.
    pub total_price: Decimal,
}

impl CartTotals {
    /// Sum quantities and subtotals across `lines`.
    #[must_use]
    pub fn from_lines<'a>(lines: impl IntoIterator<Item = &'a CartLine>) -> Self {
        lines.into_iter().fold(Self::default(), |acc, line| Self {
            count: acc.count.saturating_add(u64::from(line.quantity)),
            total_price: add_amounts(acc.total_price, line.subtotal()),
        })
    }

    /// True when there is nothing in the cart.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::price::Price;

    fn product(id: i64, price: &str) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Item {id}"),
            price: Price::parse(price).unwrap(),
            description: String::new(),
            category: String::new(),
            images: Vec::new(),
        }
    }

    #[test]
    fn test_new_line_has_one_unit() {
        let line = CartLine::new(product(3, "4.25"));
        assert_eq!(line.quantity, 1);
        assert_eq!(line.product_id(), ProductId::new(3));
    }

    #[test]
    fn test_totals_at_max_price_and_quantity_stay_exact() {
        let mut a = CartLine::new(product(1, "999999999999.99"));
        a.quantity = u32::MAX;
        let mut b = a.clone();
        b.snapshot.id = ProductId::new(2);

        let totals = CartTotals::from_lines([&a, &b]);
        assert_eq!(totals.count, 2 * u64::from(u32::MAX));
        assert_eq!(totals.total_price, Price::MAX.times(u32::MAX) * Decimal::TWO);
    }

    #[test]
    fn test_totals_sum_quantities_and_prices() {
        let mut a = CartLine::new(product(1, "10"));
        a.quantity = 2;
        let b = CartLine::new(product(2, "0.5"));

        let totals = CartTotals::from_lines([&a, &b]);
        assert_eq!(totals.count, 3);
        assert_eq!(totals.total_price, Decimal::new(205, 1));
    }

    #[test]
    fn test_totals_of_nothing() {
        let totals = CartTotals::from_lines(std::iter::empty());
        assert!(totals.is_empty());
        assert_eq!(totals.total_price, Decimal::ZERO);
    }
}
