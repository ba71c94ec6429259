//! State stores for the catalog, cart, wishlist and checkout form.
//!
//! Each store follows the same shape:
//!
//! 1. a command enum naming every mutation with exactly its payload
//! 2. a pure `apply` function from (state, command) to the next state
//! 3. a store struct that owns the state, applies commands, writes the
//!    result to [`LocalStorage`](crate::storage::LocalStorage) and bumps
//!    its [`ChangeFeed`] revision
//!
//! Commands that leave the state unchanged (removing an absent id, say)
//! neither write nor notify.

use tokio::sync::watch;

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod wishlist;

pub use cart::{CartCommand, CartStore};
pub use catalog::{Catalog, CatalogError, IdClock, ProductCommand, ProductStore};
pub use checkout::{CheckoutError, CheckoutStore, Receipt};
pub use wishlist::{Toggled, WishlistCommand, WishlistStore};

/// Monotonic counter bumped once per applied mutation.
pub type Revision = u64;

/// Change notifications for one store.
///
/// Backed by a `watch` channel so any number of observers can ask "has
/// this store changed since I last looked?" without the store knowing
/// about them.
#[derive(Debug)]
pub struct ChangeFeed {
    tx: watch::Sender<Revision>,
}

impl ChangeFeed {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(0);
        Self { tx }
    }

    /// Announce a change.
    pub fn publish(&self) {
        self.tx.send_modify(|revision| *revision += 1);
    }

    /// A receiver that reports every change published after this call.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Revision> {
        self.tx.subscribe()
    }

    /// The current revision.
    #[must_use]
    pub fn revision(&self) -> Revision {
        *self.tx.borrow()
    }
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new()
    }
}
