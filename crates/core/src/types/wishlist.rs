//! Wishlist entries.

use super::id::ProductId;
use super::product::Product;

/// A saved product. The wishlist holds at most one entry per product id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WishlistEntry {
    pub snapshot: Product,
}

impl WishlistEntry {
    #[must_use]
    pub const fn new(product: Product) -> Self {
        Self { snapshot: product }
    }

    #[must_use]
    pub const fn product_id(&self) -> ProductId {
        self.snapshot.id
    }
}
