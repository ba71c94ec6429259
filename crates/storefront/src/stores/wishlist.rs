//! Wishlist of saved products.

use tracing::info;

use corner_shop_core::{Product, ProductId, WishlistEntry};

use super::ChangeFeed;
use crate::storage::{SharedStorage, StorageError, records};

/// A mutation of the wishlist.
///
/// There is deliberately no separate add or remove: toggling is the only
/// way in or out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WishlistCommand {
    /// Remove the product if saved, otherwise save a snapshot of it.
    Toggle(Product),
    /// Forget everything.
    Clear,
}

/// What a toggle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggled {
    Added,
    Removed,
}

/// Apply `command` to `entries`, returning the next set of entries.
#[must_use]
pub fn apply(entries: &[WishlistEntry], command: WishlistCommand) -> Vec<WishlistEntry> {
    match command {
        WishlistCommand::Toggle(product) => {
            let mut next = entries.to_vec();
            if next.iter().any(|entry| entry.product_id() == product.id) {
                next.retain(|entry| entry.product_id() != product.id);
            } else {
                next.push(WishlistEntry::new(product));
            }
            next
        }
        WishlistCommand::Clear => Vec::new(),
    }
}

/// The wishlist store.
#[derive(Debug)]
pub struct WishlistStore {
    entries: Vec<WishlistEntry>,
    storage: SharedStorage,
    changes: ChangeFeed,
}

impl WishlistStore {
    /// Load the wishlist from storage. Unreadable state loads as empty.
    #[must_use]
    pub fn load(storage: SharedStorage) -> Self {
        let entries = records::load_wishlist(storage.as_ref());
        info!(entries = entries.len(), "Wishlist loaded");
        Self {
            entries,
            storage,
            changes: ChangeFeed::new(),
        }
    }

    #[must_use]
    pub fn entries(&self) -> &[WishlistEntry] {
        &self.entries
    }

    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&WishlistEntry> {
        self.entries.iter().find(|entry| entry.product_id() == id)
    }

    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.get(id).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub const fn changes(&self) -> &ChangeFeed {
        &self.changes
    }

    /// Save `product` if absent, remove it if present.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the wishlist could not be saved; the
    /// change is kept in memory.
    pub fn toggle(&mut self, product: &Product) -> Result<Toggled, StorageError> {
        let toggled = if self.contains(product.id) {
            Toggled::Removed
        } else {
            Toggled::Added
        };
        info!(product_id = %product.id, ?toggled, "Toggling wishlist");
        self.commit(WishlistCommand::Toggle(product.clone()))?;
        Ok(toggled)
    }

    /// Remove every entry.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the wishlist could not be saved.
    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.commit(WishlistCommand::Clear)
    }

    fn commit(&mut self, command: WishlistCommand) -> Result<(), StorageError> {
        let next = apply(&self.entries, command);
        if next == self.entries {
            return Ok(());
        }
        self.entries = next;
        self.changes.publish();
        records::save_wishlist(self.storage.as_ref(), &self.entries)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use corner_shop_core::Price;
    use proptest::prelude::*;

    use super::*;
    use crate::storage::MemoryStorage;

    fn product(id: i64) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("P{id}"),
            price: Price::from_cents(id * 100).unwrap(),
            description: String::new(),
            category: String::new(),
            images: Vec::new(),
        }
    }

    #[test]
    fn test_toggle_adds_then_removes() {
        let storage = Arc::new(MemoryStorage::new());
        let mut wishlist = WishlistStore::load(storage.clone());
        let p = product(1);

        assert_eq!(wishlist.toggle(&p).unwrap(), Toggled::Added);
        assert!(wishlist.contains(p.id));
        assert_eq!(WishlistStore::load(storage.clone()).len(), 1);

        assert_eq!(wishlist.toggle(&p).unwrap(), Toggled::Removed);
        assert!(!wishlist.contains(p.id));
        assert!(WishlistStore::load(storage).is_empty());
    }

    #[test]
    fn test_clear() {
        let mut wishlist = WishlistStore::load(Arc::new(MemoryStorage::new()));
        wishlist.toggle(&product(1)).unwrap();
        wishlist.toggle(&product(2)).unwrap();
        wishlist.clear().unwrap();
        assert!(wishlist.is_empty());
        assert_eq!(wishlist.changes().revision(), 3);

        wishlist.clear().unwrap();
        assert_eq!(wishlist.changes().revision(), 3);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_toggle_twice_restores_membership(
            seed in proptest::collection::vec(1_i64..10, 0..8),
            target in 1_i64..10,
        ) {
            let mut entries = Vec::new();
            for id in seed {
                entries = apply(&entries, WishlistCommand::Toggle(product(id)));
            }
            let had = entries.iter().any(|e| e.product_id().as_i64() == target);

            let once = apply(&entries, WishlistCommand::Toggle(product(target)));
            let twice = apply(&once, WishlistCommand::Toggle(product(target)));

            prop_assert_eq!(twice.iter().any(|e| e.product_id().as_i64() == target), had);
            prop_assert_eq!(once.iter().any(|e| e.product_id().as_i64() == target), !had);
        }
    }
}
