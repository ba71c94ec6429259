//! Shopping cart.

use tracing::info;

use corner_shop_core::{CartLine, CartTotals, Product, ProductId};

use super::ChangeFeed;
use crate::storage::{SharedStorage, StorageError, records};

/// A mutation of the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartCommand {
    /// Add one unit. An existing line for the product gets its quantity
    /// bumped and its snapshot refreshed from the given product.
    AddItem(Product),
    /// Drop the line for a product; ignored if absent.
    RemoveItem(ProductId),
    /// One more unit of an existing line; ignored if absent.
    Increment(ProductId),
    /// One fewer unit; a line at quantity one is removed. Ignored if absent.
    Decrement(ProductId),
    /// Empty the cart.
    Clear,
}

/// Apply `command` to `lines`, returning the next set of lines.
#[must_use]
pub fn apply(lines: &[CartLine], command: CartCommand) -> Vec<CartLine> {
    let mut next = lines.to_vec();
    match command {
        CartCommand::AddItem(product) => {
            match next.iter_mut().find(|line| line.product_id() == product.id) {
                Some(line) => {
                    line.quantity = line.quantity.saturating_add(1);
                    line.snapshot = product;
                }
                None => next.push(CartLine::new(product)),
            }
        }
        CartCommand::RemoveItem(id) => next.retain(|line| line.product_id() != id),
        CartCommand::Increment(id) => {
            if let Some(line) = next.iter_mut().find(|line| line.product_id() == id) {
                line.quantity = line.quantity.saturating_add(1);
            }
        }
        CartCommand::Decrement(id) => {
            if let Some(index) = next.iter().position(|line| line.product_id() == id) {
                let remaining = next
                    .get(index)
                    .map_or(0, |line| line.quantity.saturating_sub(1));
                if remaining == 0 {
                    next.remove(index);
                } else if let Some(line) = next.get_mut(index) {
                    line.quantity = remaining;
                }
            }
        }
        CartCommand::Clear => next.clear(),
    }
    next
}

/// The cart store.
#[derive(Debug)]
pub struct CartStore {
    lines: Vec<CartLine>,
    storage: SharedStorage,
    changes: ChangeFeed,
}

impl CartStore {
    /// Load the cart from storage. Unreadable state loads as empty.
    #[must_use]
    pub fn load(storage: SharedStorage) -> Self {
        let lines = records::load_cart(storage.as_ref());
        info!(lines = lines.len(), "Cart loaded");
        Self {
            lines,
            storage,
            changes: ChangeFeed::new(),
        }
    }

    /// Lines in the order they were first added.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.product_id() == id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Item count and total over the stored snapshot prices, computed
    /// fresh on every call.
    #[must_use]
    pub fn totals(&self) -> CartTotals {
        CartTotals::from_lines(&self.lines)
    }

    #[must_use]
    pub const fn changes(&self) -> &ChangeFeed {
        &self.changes
    }

    /// Add one unit of `product`.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the cart could not be saved; the
    /// change is kept in memory.
    pub fn add_item(&mut self, product: &Product) -> Result<(), StorageError> {
        info!(product_id = %product.id, "Adding to cart");
        self.commit(CartCommand::AddItem(product.clone()))
            .map(drop)
    }

    /// Remove the line for `id`. Returns whether a line was removed.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the cart could not be saved.
    pub fn remove_item(&mut self, id: ProductId) -> Result<bool, StorageError> {
        self.commit(CartCommand::RemoveItem(id))
    }

    /// One more unit of `id`. Returns whether a line was changed.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the cart could not be saved.
    pub fn increment(&mut self, id: ProductId) -> Result<bool, StorageError> {
        self.commit(CartCommand::Increment(id))
    }

    /// One fewer unit of `id`, removing the line at zero. Returns whether
    /// a line was changed.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the cart could not be saved.
    pub fn decrement(&mut self, id: ProductId) -> Result<bool, StorageError> {
        self.commit(CartCommand::Decrement(id))
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the cart could not be saved.
    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.commit(CartCommand::Clear).map(drop)
    }

    fn commit(&mut self, command: CartCommand) -> Result<bool, StorageError> {
        let next = apply(&self.lines, command);
        if next == self.lines {
            return Ok(false);
        }
        self.lines = next;
        self.changes.publish();

        let totals = self.totals();
        info!(
            lines = self.lines.len(),
            count = totals.count,
            total = %totals.total_price,
            "Cart updated"
        );
        records::save_cart(self.storage.as_ref(), &self.lines)?;
        Ok(true)
    }
}
