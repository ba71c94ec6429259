//! Read-time reconciliation of cart and wishlist snapshots against the
//! live catalog.
//!
//! Cart lines and wishlist entries keep the copy of a product taken when
//! the user acted on it. For display, each one is re-joined by id against
//! the current catalog:
//!
//! - product still exists: every displayed field comes from the live
//!   product (a price edit shows up immediately)
//! - product was removed: the stored snapshot is shown as-is and the item
//!   is marked [`Source::Snapshot`]; it is never dropped
//!
//! None of this writes back. Persisted snapshots only change on the next
//! explicit cart or wishlist mutation.

use std::collections::HashMap;

use tokio::sync::watch;
use tracing::debug;

use corner_shop_core::{
    CartLine, CartTotals, Price, Product, ProductId, WishlistEntry, add_amounts,
};
use rust_decimal::Decimal;

use crate::stores::{CartStore, ProductStore, Revision, WishlistStore};

/// Where a displayed item's fields came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// The product is in the catalog; fields are live.
    Live,
    /// The product is gone; fields are the last stored snapshot.
    Snapshot,
}

/// A cart line as it should be shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayLine {
    pub product: Product,
    pub quantity: u32,
    pub source: Source,
}

impl DisplayLine {
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.product.price.times(self.quantity)
    }

    #[must_use]
    pub const fn unit_price(&self) -> Price {
        self.product.price
    }

    #[must_use]
    pub fn is_stale(&self) -> bool {
        self.source == Source::Snapshot
    }
}

/// A wishlist entry as it should be shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayItem {
    pub product: Product,
    pub source: Source,
}

/// The reconciled cart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartView {
    pub lines: Vec<DisplayLine>,
    /// Totals over the displayed prices.
    pub totals: CartTotals,
}

impl CartView {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// The reconciled wishlist.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WishlistView {
    pub items: Vec<DisplayItem>,
}

/// Id lookup over a product slice.
#[derive(Debug)]
pub struct CatalogIndex<'a> {
    by_id: HashMap<ProductId, &'a Product>,
}

impl<'a> CatalogIndex<'a> {
    #[must_use]
    pub fn new(products: &'a [Product]) -> Self {
        Self {
            by_id: products.iter().map(|p| (p.id, p)).collect(),
        }
    }

    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&'a Product> {
        self.by_id.get(&id).copied()
    }

    /// The live product for `snapshot`, or the snapshot itself.
    fn resolve(&self, snapshot: &Product) -> (Product, Source) {
        self.get(snapshot.id).map_or_else(
            || (snapshot.clone(), Source::Snapshot),
            |live| (live.clone(), Source::Live),
        )
    }
}

/// Project cart lines through the catalog.
#[must_use]
pub fn reconcile_cart(index: &CatalogIndex<'_>, lines: &[CartLine]) -> CartView {
    let lines: Vec<DisplayLine> = lines
        .iter()
        .map(|line| {
            let (product, source) = index.resolve(&line.snapshot);
            DisplayLine {
                product,
                quantity: line.quantity,
                source,
            }
        })
        .collect();
    let totals = lines.iter().fold(CartTotals::default(), |acc, line| CartTotals {
        count: acc.count.saturating_add(u64::from(line.quantity)),
        total_price: add_amounts(acc.total_price, line.subtotal()),
    });
    CartView { lines, totals }
}

/// Project wishlist entries through the catalog.
#[must_use]
pub fn reconcile_wishlist(index: &CatalogIndex<'_>, entries: &[WishlistEntry]) -> WishlistView {
    WishlistView {
        items: entries
            .iter()
            .map(|entry| {
                let (product, source) = index.resolve(&entry.snapshot);
                DisplayItem { product, source }
            })
            .collect(),
    }
}

/// Keeps the reconciled cart and wishlist views current.
///
/// Subscribes to the change feeds of the three stores and recomputes
/// whichever view depends on a store that has published since the last
/// [`sync`](Self::sync). A catalog change refreshes both views.
#[derive(Debug)]
pub struct SyncReconciler {
    catalog_rx: watch::Receiver<Revision>,
    cart_rx: watch::Receiver<Revision>,
    wishlist_rx: watch::Receiver<Revision>,
    cart: CartView,
    wishlist: WishlistView,
}

impl SyncReconciler {
    /// Subscribe to the stores and compute the initial views.
    #[must_use]
    pub fn new(products: &ProductStore, cart: &CartStore, wishlist: &WishlistStore) -> Self {
        let index = CatalogIndex::new(products.products());
        Self {
            catalog_rx: products.changes().subscribe(),
            cart_rx: cart.changes().subscribe(),
            wishlist_rx: wishlist.changes().subscribe(),
            cart: reconcile_cart(&index, cart.lines()),
            wishlist: reconcile_wishlist(&index, wishlist.entries()),
        }
    }

    /// Recompute views whose inputs changed. Returns whether anything was
    /// recomputed.
    pub fn sync(
        &mut self,
        products: &ProductStore,
        cart: &CartStore,
        wishlist: &WishlistStore,
    ) -> bool {
        let catalog_changed = take_change(&mut self.catalog_rx);
        let cart_changed = take_change(&mut self.cart_rx);
        let wishlist_changed = take_change(&mut self.wishlist_rx);
        if !(catalog_changed || cart_changed || wishlist_changed) {
            return false;
        }

        let index = CatalogIndex::new(products.products());
        if catalog_changed || cart_changed {
            self.cart = reconcile_cart(&index, cart.lines());
        }
        if catalog_changed || wishlist_changed {
            self.wishlist = reconcile_wishlist(&index, wishlist.entries());
        }
        debug!(
            catalog_changed,
            cart_changed,
            wishlist_changed,
            stale_lines = self.cart.lines.iter().filter(|l| l.is_stale()).count(),
            "Reconciled views"
        );
        true
    }

    #[must_use]
    pub const fn cart(&self) -> &CartView {
        &self.cart
    }

    #[must_use]
    pub const fn wishlist(&self) -> &WishlistView {
        &self.wishlist
    }
}

/// Whether `rx` has an unseen revision, marking it seen. A closed channel
/// counts as unchanged.
fn take_change(rx: &mut watch::Receiver<Revision>) -> bool {
    let changed = rx.has_changed().unwrap_or(false);
    if changed {
        rx.borrow_and_update();
    }
    changed
}
