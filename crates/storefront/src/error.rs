//! Unified error type for shop operations.
//!
//! Store-level operations never fail for a missing id: they degrade to
//! no-ops. The variants here are what is left to report to the user after
//! boundary validation.

use thiserror::Error;

use corner_shop_core::{PriceError, ProductId};

use crate::config::ConfigError;
use crate::storage::StorageError;
use crate::stores::{CatalogError, CheckoutError};

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// The action needs a product that is not in the catalog.
    #[error("product not found: {0}")]
    NotFound(ProductId),

    /// A required input was blank.
    #[error("{field} cannot be empty")]
    EmptyInput { field: &'static str },

    /// Catalog operation rejected or not persisted.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Checkout rejected or not persisted.
    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    /// A price could not be parsed.
    #[error(transparent)]
    Price(#[from] PriceError),

    /// Local storage failed.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl AppError {
    /// Whether this is a rejected user input, as opposed to an environment
    /// failure.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        match self {
            Self::NotFound(_) | Self::EmptyInput { .. } | Self::Price(_) => true,
            Self::Catalog(err) => !matches!(
                err,
                CatalogError::Storage(_) | CatalogError::IdsExhausted { .. }
            ),
            Self::Checkout(err) => !matches!(err, CheckoutError::Storage(_)),
            Self::Storage(_) | Self::Config(_) => false,
        }
    }
}
