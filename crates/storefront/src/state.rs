//! The shop: every store, wired to one storage handle and one reconciler.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{info, instrument};

use corner_shop_core::{
    CategoryName, CheckoutField, CurrencyCode, NewProduct, Product, ProductId, ProductPatch,
    format_amount,
};

use crate::config::ShopConfig;
use crate::error::AppError;
use crate::storage::{FileStorage, SharedStorage};
use crate::stores::{CartStore, CheckoutStore, ProductStore, Receipt, Toggled, WishlistStore};
use crate::sync::{CartView, SyncReconciler, WishlistView};

/// Application object owning every store.
///
/// Created once at startup and passed by reference. Every mutation goes
/// through `&mut Shop`, and the reconciled views are brought up to date
/// before the mutating call returns.
#[derive(Debug)]
pub struct Shop {
    products: ProductStore,
    cart: CartStore,
    wishlist: WishlistStore,
    checkout: CheckoutStore,
    view: SyncReconciler,
    currency: CurrencyCode,
}

impl Shop {
    /// Load every store from `storage`.
    #[must_use]
    pub fn open(storage: SharedStorage) -> Self {
        let products = ProductStore::load(storage.clone());
        let cart = CartStore::load(storage.clone());
        let wishlist = WishlistStore::load(storage.clone());
        let checkout = CheckoutStore::load(storage);
        let view = SyncReconciler::new(&products, &cart, &wishlist);

        info!(
            products = products.products().len(),
            categories = products.categories().len(),
            cart_lines = cart.lines().len(),
            wishlist = wishlist.len(),
            "Shop opened"
        );

        Self {
            products,
            cart,
            wishlist,
            checkout,
            view,
            currency: CurrencyCode::default(),
        }
    }

    /// Open a file-backed shop in the configured directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage directory cannot be created.
    pub fn from_config(config: &ShopConfig) -> Result<Self, AppError> {
        let storage = FileStorage::open(&config.storage_dir)?;
        Ok(Self::open(Arc::new(storage)).with_currency(config.currency))
    }

    /// Set the currency used by [`format`](Self::format).
    #[must_use]
    pub const fn with_currency(mut self, currency: CurrencyCode) -> Self {
        self.currency = currency;
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[must_use]
    pub const fn products(&self) -> &ProductStore {
        &self.products
    }

    #[must_use]
    pub const fn cart(&self) -> &CartStore {
        &self.cart
    }

    #[must_use]
    pub const fn wishlist(&self) -> &WishlistStore {
        &self.wishlist
    }

    #[must_use]
    pub const fn checkout(&self) -> &CheckoutStore {
        &self.checkout
    }

    /// The cart as it should be displayed, priced from the live catalog.
    #[must_use]
    pub const fn cart_view(&self) -> &CartView {
        self.view.cart()
    }

    /// The wishlist as it should be displayed.
    #[must_use]
    pub const fn wishlist_view(&self) -> &WishlistView {
        self.view.wishlist()
    }

    #[must_use]
    pub const fn currency(&self) -> CurrencyCode {
        self.currency
    }

    /// Format an amount in the shop currency.
    #[must_use]
    pub fn format(&self, amount: Decimal) -> String {
        format_amount(amount, self.currency)
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// Add a product. The name is trimmed and must not be blank.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::EmptyInput`] for a blank name, or a storage error
    /// if the catalog could not be saved.
    pub fn add_product(&mut self, mut draft: NewProduct) -> Result<Product, AppError> {
        draft.name = require("product name", &draft.name)?;
        draft.category = draft.category.trim().to_owned();
        let added = self.products.add(draft);
        self.refresh();
        Ok(added?)
    }

    /// Edit a product. Returns `None` if there is no such product.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::EmptyInput`] if the patch blanks the name, or a
    /// storage error if the catalog could not be saved.
    pub fn update_product(
        &mut self,
        id: ProductId,
        mut patch: ProductPatch,
    ) -> Result<Option<Product>, AppError> {
        if let Some(name) = patch.name.take() {
            patch.name = Some(require("product name", &name)?);
        }
        if let Some(category) = patch.category.take() {
            patch.category = Some(category.trim().to_owned());
        }
        let updated = self.products.update(id, patch);
        self.refresh();
        Ok(updated?)
    }

    /// Remove a product. Cart lines and wishlist entries for it remain and
    /// fall back to their snapshots.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the catalog could not be saved.
    pub fn remove_product(&mut self, id: ProductId) -> Result<bool, AppError> {
        let removed = self.products.remove(id);
        self.refresh();
        Ok(removed?)
    }

    /// Remove every product.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the catalog could not be saved.
    pub fn clear_products(&mut self) -> Result<(), AppError> {
        let cleared = self.products.clear();
        self.refresh();
        Ok(cleared?)
    }

    /// Add a category.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`](crate::stores::CatalogError) for a blank
    /// or duplicate name, or if the categories could not be saved.
    pub fn add_category(&mut self, name: &str) -> Result<CategoryName, AppError> {
        let added = self.products.add_category(name);
        self.refresh();
        Ok(added?)
    }

    /// Remove a category.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the categories could not be saved.
    pub fn remove_category(&mut self, name: &str) -> Result<bool, AppError> {
        let removed = self.products.remove_category(name);
        self.refresh();
        Ok(removed?)
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Add one of the catalog product `id` to the cart. Returns the new
    /// quantity of its line.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the product is not in the catalog,
    /// or a storage error if the cart could not be saved.
    #[instrument(skip(self), fields(product_id = %id))]
    pub fn add_to_cart(&mut self, id: ProductId) -> Result<u32, AppError> {
        let product = self.products.get(id).cloned().ok_or(AppError::NotFound(id))?;
        let added = self.cart.add_item(&product);
        self.refresh();
        added?;
        Ok(self.cart.get(id).map_or(0, |line| line.quantity))
    }

    /// Remove the line for `id`. Returns whether there was one.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the cart could not be saved.
    pub fn remove_from_cart(&mut self, id: ProductId) -> Result<bool, AppError> {
        let removed = self.cart.remove_item(id);
        self.refresh();
        Ok(removed?)
    }

    /// Add one to the line for `id`. Returns whether there was one.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the cart could not be saved.
    pub fn increment(&mut self, id: ProductId) -> Result<bool, AppError> {
        let changed = self.cart.increment(id);
        self.refresh();
        Ok(changed?)
    }

    /// Take one from the line for `id`, removing it at zero. Returns whether
    /// there was a line.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the cart could not be saved.
    pub fn decrement(&mut self, id: ProductId) -> Result<bool, AppError> {
        let changed = self.cart.decrement(id);
        self.refresh();
        Ok(changed?)
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the cart could not be saved.
    pub fn clear_cart(&mut self) -> Result<(), AppError> {
        let cleared = self.cart.clear();
        self.refresh();
        Ok(cleared?)
    }

    // =========================================================================
    // Wishlist
    // =========================================================================

    /// Toggle `id` on the wishlist.
    ///
    /// A product that has left the catalog can still be toggled off using its
    /// saved snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the id is neither in the catalog nor
    /// on the wishlist, or a storage error if the wishlist could not be saved.
    #[instrument(skip(self), fields(product_id = %id))]
    pub fn toggle_wishlist(&mut self, id: ProductId) -> Result<Toggled, AppError> {
        let product = self
            .products
            .get(id)
            .or_else(|| self.wishlist.get(id).map(|entry| &entry.snapshot))
            .cloned()
            .ok_or(AppError::NotFound(id))?;
        let toggled = self.wishlist.toggle(&product);
        self.refresh();
        Ok(toggled?)
    }

    /// Move a saved product into the cart. The live product is used when it
    /// still exists, otherwise the saved snapshot. Returns `false` if `id` is
    /// not on the wishlist.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the cart or wishlist could not be saved.
    #[instrument(skip(self), fields(product_id = %id))]
    pub fn move_to_cart(&mut self, id: ProductId) -> Result<bool, AppError> {
        let Some(entry) = self.wishlist.get(id) else {
            return Ok(false);
        };
        let product = self
            .products
            .get(id)
            .cloned()
            .unwrap_or_else(|| entry.snapshot.clone());

        let added = self.cart.add_item(&product);
        let toggled = self.wishlist.toggle(&product);
        self.refresh();
        added?;
        toggled?;
        info!("Moved wishlist item to cart");
        Ok(true)
    }

    /// Empty the wishlist.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the wishlist could not be saved.
    pub fn clear_wishlist(&mut self) -> Result<(), AppError> {
        let cleared = self.wishlist.clear();
        self.refresh();
        Ok(cleared?)
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    /// Set one checkout field and save the form.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the form could not be saved.
    pub fn set_checkout_field(
        &mut self,
        field: CheckoutField,
        value: impl Into<String>,
    ) -> Result<(), AppError> {
        Ok(self.checkout.set_field(field, value)?)
    }

    /// Place an order for the current cart, priced from the live catalog.
    /// On success the cart is emptied and the saved form erased.
    ///
    /// # Errors
    ///
    /// Returns a [`CheckoutError`](crate::stores::CheckoutError) if the cart
    /// is empty or the form is incomplete, or a storage error.
    pub fn place_order(&mut self) -> Result<Receipt, AppError> {
        self.refresh();
        let receipt = self.checkout.place_order(self.view.cart())?;
        let cleared = self.cart.clear();
        self.refresh();
        cleared?;
        Ok(receipt)
    }

    fn refresh(&mut self) {
        self.view.sync(&self.products, &self.cart, &self.wishlist);
    }
}

/// Trim `value`, rejecting it if nothing is left.
fn require(field: &'static str, value: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::EmptyInput { field });
    }
    Ok(trimmed.to_owned())
}
