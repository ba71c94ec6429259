//! Checkout form and simulated order placement.
//!
//! There is no payment processor. Placing an order validates the form,
//! captures the reconciled cart as a [`Receipt`], and leaves it to the
//! caller to clear the cart.

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, info};

use corner_shop_core::{CartTotals, CheckoutField, CheckoutForm, Email, EmailError};

use crate::storage::{SharedStorage, StorageError, StorageKey, records};
use crate::sync::{CartView, DisplayLine};

/// Errors from checkout.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Nothing to buy.
    #[error("your cart is empty")]
    EmptyCart,

    /// A required form field is blank.
    #[error("{} is required", .field.label())]
    EmptyInput { field: CheckoutField },

    /// The email field is not a usable address.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Storage failed while saving or clearing the form.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Summary of a placed order, built before the cart is cleared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub lines: Vec<DisplayLine>,
    pub totals: CartTotals,
    pub customer: String,
    pub email: Email,
    pub placed_at: DateTime<Utc>,
}

/// The persisted checkout form.
#[derive(Debug)]
pub struct CheckoutStore {
    form: CheckoutForm,
    storage: SharedStorage,
}

impl CheckoutStore {
    /// Load the saved form, or start blank.
    #[must_use]
    pub fn load(storage: SharedStorage) -> Self {
        let form = records::load_checkout_form(storage.as_ref());
        debug!(restored = !form.is_untouched(), "Checkout form loaded");
        Self { form, storage }
    }

    #[must_use]
    pub const fn form(&self) -> &CheckoutForm {
        &self.form
    }

    /// Set one field and save the whole form.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the form could not be saved.
    pub fn set_field(
        &mut self,
        field: CheckoutField,
        value: impl Into<String>,
    ) -> Result<(), StorageError> {
        self.form.set(field, value);
        records::save_checkout_form(self.storage.as_ref(), &self.form)
    }

    /// Check the form is complete, returning the parsed email.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyInput`] naming the first blank field,
    /// or [`CheckoutError::InvalidEmail`].
    pub fn validate(&self) -> Result<Email, CheckoutError> {
        if let Some(field) = self.form.first_blank() {
            return Err(CheckoutError::EmptyInput { field });
        }
        Ok(Email::parse(&self.form.email)?)
    }

    /// Validate and build a receipt for `cart`. The saved form is removed
    /// from storage first; only then is the in-memory form reset.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyCart`] for an empty cart, any
    /// validation error from [`validate`](Self::validate), or a
    /// [`StorageError`] if the saved form could not be removed.
    pub fn place_order(&mut self, cart: &CartView) -> Result<Receipt, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        let email = self.validate()?;

        self.storage.remove(StorageKey::CheckoutForm)?;
        let receipt = Receipt {
            lines: cart.lines.clone(),
            totals: cart.totals,
            customer: self.form.name.trim().to_owned(),
            email,
            placed_at: Utc::now(),
        };
        self.form = CheckoutForm::default();

        info!(
            items = receipt.totals.count,
            total = %receipt.totals.total_price,
            email_domain = receipt.email.domain(),
            "Order placed"
        );
        Ok(receipt)
    }
}
