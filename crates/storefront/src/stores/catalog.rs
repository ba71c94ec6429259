//! Product catalog and category set.

use chrono::Utc;
use thiserror::Error;
use tracing::{debug, info};

use corner_shop_core::{CategoryName, NewProduct, Product, ProductId, ProductPatch};

use super::ChangeFeed;
use crate::storage::{SharedStorage, StorageError, records};

/// Errors from catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A category with the same (trimmed) name already exists.
    #[error("category already exists: {0}")]
    DuplicateCategory(String),

    /// A required input was blank.
    #[error("{field} cannot be empty")]
    EmptyInput { field: &'static str },

    /// No id greater than every existing one is left to hand out.
    #[error("product ids exhausted after {last}")]
    IdsExhausted { last: ProductId },

    /// The change was applied but could not be persisted.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Products and categories, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    pub products: Vec<Product>,
    pub categories: Vec<CategoryName>,
}

impl Catalog {
    /// Look up a product by id.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Whether `name` is already in the category set.
    #[must_use]
    pub fn has_category(&self, name: &str) -> bool {
        self.categories.iter().any(|c| c.as_str() == name)
    }
}

/// A mutation of the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductCommand {
    /// Append a product whose id has already been assigned. A product with
    /// the same id is replaced in place instead, so ids stay unique.
    Add(Product),
    /// Merge fields into the product with `id`; ignored if absent.
    Update { id: ProductId, patch: ProductPatch },
    /// Delete by id; ignored if absent.
    Remove(ProductId),
    /// Delete every product. Categories are kept.
    Clear,
    /// Append a category; rejected if already present.
    AddCategory(CategoryName),
    /// Drop a category name. Products tagged with it keep the tag.
    RemoveCategory(String),
}

/// Apply `command` to `catalog`, returning the next catalog.
///
/// # Errors
///
/// Returns [`CatalogError::DuplicateCategory`] for an `AddCategory` whose
/// name is already present.
pub fn apply(catalog: &Catalog, command: ProductCommand) -> Result<Catalog, CatalogError> {
    let mut next = catalog.clone();
    match command {
        ProductCommand::Add(product) => {
            match next.products.iter_mut().find(|p| p.id == product.id) {
                Some(existing) => *existing = product,
                None => next.products.push(product),
            }
        }
        ProductCommand::Update { id, patch } => {
            if let Some(product) = next.products.iter_mut().find(|p| p.id == id) {
                product.apply_patch(&patch);
            }
        }
        ProductCommand::Remove(id) => next.products.retain(|p| p.id != id),
        ProductCommand::Clear => next.products.clear(),
        ProductCommand::AddCategory(name) => {
            if next.has_category(name.as_str()) {
                return Err(CatalogError::DuplicateCategory(name.as_str().to_owned()));
            }
            next.categories.push(name);
        }
        ProductCommand::RemoveCategory(name) => {
            let name = name.trim();
            next.categories.retain(|c| c.as_str() != name);
        }
    }
    Ok(next)
}

/// Hands out product ids from the wall clock (milliseconds since the
/// epoch), bumped when needed so each id is strictly greater than every id
/// issued or observed before it.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdClock {
    last: i64,
}

impl IdClock {
    /// Record an id that exists already, e.g. loaded from storage.
    pub fn observe(&mut self, id: ProductId) {
        self.last = self.last.max(id.as_i64());
    }

    /// Next id at the current time.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::IdsExhausted`] once `i64::MAX` has been
    /// issued or observed.
    pub fn next(&mut self) -> Result<ProductId, CatalogError> {
        self.next_at(Utc::now().timestamp_millis())
    }

    /// Next id given `now_ms` as the current time.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::IdsExhausted`] once `i64::MAX` has been
    /// issued or observed.
    pub fn next_at(&mut self, now_ms: i64) -> Result<ProductId, CatalogError> {
        let floor = self
            .last
            .checked_add(1)
            .ok_or(CatalogError::IdsExhausted {
                last: ProductId::new(self.last),
            })?;
        let id = now_ms.max(floor);
        self.last = id;
        Ok(ProductId::new(id))
    }
}

/// The product catalog store.
#[derive(Debug)]
pub struct ProductStore {
    catalog: Catalog,
    ids: IdClock,
    storage: SharedStorage,
    changes: ChangeFeed,
}

impl ProductStore {
    /// Load the catalog from storage. Unreadable state loads as empty.
    #[must_use]
    pub fn load(storage: SharedStorage) -> Self {
        let catalog = Catalog {
            products: records::load_products(storage.as_ref()),
            categories: records::load_categories(storage.as_ref()),
        };
        let mut ids = IdClock::default();
        for product in &catalog.products {
            ids.observe(product.id);
        }
        info!(
            products = catalog.products.len(),
            categories = catalog.categories.len(),
            "Catalog loaded"
        );
        Self {
            catalog,
            ids,
            storage,
            changes: ChangeFeed::new(),
        }
    }

    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.catalog.products
    }

    #[must_use]
    pub fn categories(&self) -> &[CategoryName] {
        &self.catalog.categories
    }

    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.catalog.get(id)
    }

    /// Products tagged with `category`.
    pub fn by_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a Product> {
        self.catalog
            .products
            .iter()
            .filter(move |p| p.category == category)
    }

    #[must_use]
    pub const fn changes(&self) -> &ChangeFeed {
        &self.changes
    }

    /// Add a product under a freshly issued id.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::IdsExhausted`] if no fresh id is left, or
    /// [`CatalogError::Storage`] if the catalog could not be saved; in the
    /// latter case the product is still added in memory.
    pub fn add(&mut self, product: NewProduct) -> Result<Product, CatalogError> {
        let product = product.with_id(self.ids.next()?);
        info!(product_id = %product.id, name = %product.name, "Adding product");
        self.commit(ProductCommand::Add(product.clone()))?;
        Ok(product)
    }

    /// Merge `patch` into the product with `id`. Returns the updated
    /// product, or `None` (and does nothing) if there is no such product.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Storage`] if the catalog could not be saved.
    pub fn update(
        &mut self,
        id: ProductId,
        patch: ProductPatch,
    ) -> Result<Option<Product>, CatalogError> {
        if self.get(id).is_none() {
            debug!(product_id = %id, "Update for unknown product ignored");
            return Ok(None);
        }
        info!(product_id = %id, "Updating product");
        self.commit(ProductCommand::Update { id, patch })?;
        Ok(self.get(id).cloned())
    }

    /// Remove the product with `id`. Returns whether anything was removed.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Storage`] if the catalog could not be saved.
    pub fn remove(&mut self, id: ProductId) -> Result<bool, CatalogError> {
        let removed = self.commit(ProductCommand::Remove(id))?;
        if removed {
            info!(product_id = %id, "Removed product");
        }
        Ok(removed)
    }

    /// Remove every product.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Storage`] if the catalog could not be saved.
    pub fn clear(&mut self) -> Result<(), CatalogError> {
        if self.commit(ProductCommand::Clear)? {
            info!("Cleared catalog");
        }
        Ok(())
    }

    /// Add a category after trimming `name`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::EmptyInput`] for a blank name,
    /// [`CatalogError::DuplicateCategory`] if it already exists, or
    /// [`CatalogError::Storage`] if the change could not be saved.
    pub fn add_category(&mut self, name: &str) -> Result<CategoryName, CatalogError> {
        let name = CategoryName::parse(name).map_err(|_| CatalogError::EmptyInput {
            field: "category name",
        })?;
        self.commit(ProductCommand::AddCategory(name.clone()))?;
        info!(category = %name, "Added category");
        Ok(name)
    }

    /// Remove a category. Products keep their (now orphaned) category
    /// string. Returns whether the category existed.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Storage`] if the change could not be saved.
    pub fn remove_category(&mut self, name: &str) -> Result<bool, CatalogError> {
        let removed = self.commit(ProductCommand::RemoveCategory(name.to_owned()))?;
        if removed {
            info!(category = %name.trim(), "Removed category");
        }
        Ok(removed)
    }

    /// Apply, persist, notify. Returns whether the state changed.
    fn commit(&mut self, command: ProductCommand) -> Result<bool, CatalogError> {
        let next = apply(&self.catalog, command)?;
        if next == self.catalog {
            return Ok(false);
        }
        let products_changed = next.products != self.catalog.products;
        let categories_changed = next.categories != self.catalog.categories;
        self.catalog = next;
        self.changes.publish();

        if products_changed {
            records::save_products(self.storage.as_ref(), &self.catalog.products)?;
        }
        if categories_changed {
            records::save_categories(self.storage.as_ref(), &self.catalog.categories)?;
        }
        Ok(true)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use corner_shop_core::Price;

    use super::*;
    use crate::storage::{MemoryStorage, StorageKey};

    fn draft(name: &str, price: &str) -> NewProduct {
        NewProduct {
            name: name.to_owned(),
            price: Price::parse(price).unwrap(),
            ..NewProduct::default()
        }
    }

    fn store() -> (Arc<MemoryStorage>, ProductStore) {
        let storage = Arc::new(MemoryStorage::new());
        let store = ProductStore::load(storage.clone());
        (storage, store)
    }

    #[test]
    fn test_id_clock_is_strictly_increasing() {
        let mut clock = IdClock::default();
        let a = clock.next_at(1_000).unwrap();
        let b = clock.next_at(1_000).unwrap();
        let c = clock.next_at(999).unwrap();
        let d = clock.next_at(5_000).unwrap();
        assert_eq!(
            [a, b, c, d].map(|id| id.as_i64()),
            [1_000, 1_001, 1_002, 5_000]
        );
    }

    #[test]
    fn test_id_clock_skips_past_observed_ids() {
        let mut clock = IdClock::default();
        clock.observe(ProductId::new(9_999_999_999_999));
        assert_eq!(clock.next_at(1_000).unwrap().as_i64(), 10_000_000_000_000);
    }

    #[test]
    fn test_id_clock_refuses_to_repeat_max_id() {
        let mut clock = IdClock::default();
        assert_eq!(clock.next_at(i64::MAX).unwrap().as_i64(), i64::MAX);
        assert!(matches!(
            clock.next_at(1_000),
            Err(CatalogError::IdsExhausted { .. })
        ));
    }

    #[test]
    fn test_add_never_overwrites_product_with_max_id() {
        let storage = Arc::new(MemoryStorage::with_values([(
            StorageKey::Products,
            r#"[{"id": 9223372036854775807, "name": "Old", "price": 1}]"#,
        )]));
        let mut store = ProductStore::load(storage.clone());
        let before = storage.raw(StorageKey::Products);

        let err = store.add(draft("New", "1")).unwrap_err();
        assert!(matches!(err, CatalogError::IdsExhausted { .. }));
        assert_eq!(store.products().len(), 1);
        assert_eq!(store.products()[0].name, "Old");
        assert_eq!(storage.raw(StorageKey::Products), before);
    }

    #[test]
    fn test_add_assigns_unique_ids_and_persists() {
        let (storage, mut store) = store();
        let a = store.add(draft("A", "1")).unwrap();
        let b = store.add(draft("B", "2")).unwrap();
        assert!(b.id > a.id);
        assert_eq!(store.products().len(), 2);

        let reloaded = ProductStore::load(storage);
        assert_eq!(reloaded.products(), store.products());
    }

    #[test]
    fn test_ids_after_reload_exceed_loaded_ids() {
        let storage = Arc::new(MemoryStorage::with_values([(
            StorageKey::Products,
            r#"[{"id": 99999999999999, "name": "Future", "price": 1}]"#,
        )]));
        let mut store = ProductStore::load(storage);
        let added = store.add(draft("Now", "1")).unwrap();
        assert!(added.id.as_i64() > 99_999_999_999_999);
    }

    #[test]
    fn test_update_merges_and_keeps_id() {
        let (_, mut store) = store();
        let lamp = store.add(draft("Lamp", "20")).unwrap();
        let updated = store
            .update(
                lamp.id,
                ProductPatch {
                    name: Some("Desk Lamp".to_owned()),
                    ..ProductPatch::default()
                },
            )
            .unwrap()
            .unwrap();
        assert_eq!(updated.id, lamp.id);
        assert_eq!(updated.name, "Desk Lamp");
        assert_eq!(updated.price, lamp.price);
    }

    #[test]
    fn test_update_unknown_id_is_silent_noop() {
        let (_, mut store) = store();
        let before = store.changes().revision();
        let result = store
            .update(ProductId::new(42), ProductPatch::default())
            .unwrap();
        assert!(result.is_none());
        assert_eq!(store.changes().revision(), before);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let (_, mut store) = store();
        let p = store.add(draft("A", "1")).unwrap();
        assert!(store.remove(p.id).unwrap());
        assert!(!store.remove(p.id).unwrap());
        assert!(store.products().is_empty());
    }

    #[test]
    fn test_clear_keeps_categories() {
        let (_, mut store) = store();
        store.add_category("Books").unwrap();
        store.add(draft("A", "1")).unwrap();
        store.clear().unwrap();
        assert!(store.products().is_empty());
        assert_eq!(store.categories().len(), 1);
    }

    #[test]
    fn test_duplicate_category_rejected() {
        let (_, mut store) = store();
        store.add_category("Books").unwrap();
        let err = store.add_category("  Books ").unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateCategory(name) if name == "Books"));
        assert_eq!(store.categories().len(), 1);
    }

    #[test]
    fn test_blank_category_rejected() {
        let (storage, mut store) = store();
        let err = store.add_category("   ").unwrap_err();
        assert!(matches!(err, CatalogError::EmptyInput { .. }));
        assert!(storage.raw(StorageKey::Categories).is_none());
    }

    #[test]
    fn test_remove_category_leaves_products_tagged() {
        let (_, mut store) = store();
        store.add_category("Books").unwrap();
        let mut novel = draft("Novel", "9");
        novel.category = "Books".to_owned();
        let novel = store.add(novel).unwrap();

        assert!(store.remove_category(" Books").unwrap());
        assert!(store.categories().is_empty());
        assert_eq!(store.get(novel.id).unwrap().category, "Books");
        assert_eq!(store.by_category("Books").count(), 1);
    }

    #[test]
    fn test_every_change_publishes_once() {
        let (_, mut store) = store();
        let mut rx = store.changes().subscribe();
        store.add(draft("A", "1")).unwrap();
        assert!(rx.has_changed().unwrap());
        rx.borrow_and_update();

        store.remove(ProductId::new(1)).unwrap();
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn test_apply_add_with_existing_id_replaces() {
        let catalog = Catalog::default();
        let first = draft("A", "1").with_id(ProductId::new(7));
        let second = draft("B", "2").with_id(ProductId::new(7));
        let catalog = apply(&catalog, ProductCommand::Add(first)).unwrap();
        let catalog = apply(&catalog, ProductCommand::Add(second.clone())).unwrap();
        assert_eq!(catalog.products, vec![second]);
    }
}
