//! Durable local key-value storage.
//!
//! Every store persists its whole state under one fixed key as a JSON
//! document, the same way a browser keeps site data in local storage.
//!
//! # Keys
//!
//! - `products` - array of products
//! - `categories` - array of unique category names
//! - `cart` - array of flattened cart lines
//! - `wishlist` - array of products
//! - `checkoutForm` - object of checkout form fields
//!
//! # Backends
//!
//! - [`FileStorage`] - one `<key>.json` file per key in a directory
//! - [`MemoryStorage`] - a process-local map, used by tests
//!
//! Reading is lenient (see [`records`]): anything that cannot be decoded
//! loads as empty state with a warning instead of failing startup.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

mod file;
mod memory;
pub mod records;

pub use file::FileStorage;
pub use memory::MemoryStorage;

/// The fixed set of keys the shop persists under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StorageKey {
    Products,
    Categories,
    Cart,
    Wishlist,
    CheckoutForm,
}

impl StorageKey {
    /// Every key, in the order stores are loaded.
    pub const ALL: [Self; 5] = [
        Self::Products,
        Self::Categories,
        Self::Cart,
        Self::Wishlist,
        Self::CheckoutForm,
    ];

    /// The key name as stored.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Products => "products",
            Self::Categories => "categories",
            Self::Cart => "cart",
            Self::Wishlist => "wishlist",
            Self::CheckoutForm => "checkoutForm",
        }
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors from reading or writing local storage.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("storage I/O error for {key}: {source}")]
    Io {
        key: StorageKey,
        #[source]
        source: std::io::Error,
    },

    /// The storage directory could not be prepared.
    #[error("cannot open storage directory {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A value could not be encoded for writing.
    #[error("cannot encode {key}: {source}")]
    Encode {
        key: StorageKey,
        #[source]
        source: serde_json::Error,
    },

    /// A persisted value could not be decoded. Never surfaced by the
    /// stores, which fall back to empty state.
    #[error("malformed persisted state under {key}: {reason}")]
    MalformedPersistedState { key: StorageKey, reason: String },
}

/// A synchronous string key-value store.
///
/// Writes must be durable by the time `set` or `remove` returns; there is
/// exactly one writer (the running shop).
pub trait LocalStorage: Send + Sync + fmt::Debug {
    /// Read the raw value under `key`, `None` if never written.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the backend cannot be read.
    fn get(&self, key: StorageKey) -> Result<Option<String>, StorageError>;

    /// Replace the value under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the write fails.
    fn set(&self, key: StorageKey, value: &str) -> Result<(), StorageError>;

    /// Delete the value under `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the delete fails.
    fn remove(&self, key: StorageKey) -> Result<(), StorageError>;
}

/// Storage handle shared by every store in a shop.
pub type SharedStorage = Arc<dyn LocalStorage>;
