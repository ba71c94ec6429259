//! Corner Shop storefront library.
//!
//! Client-side state for a small shop: the product catalog, the cart, the
//! wishlist and the checkout form, each persisted as JSON in a local
//! key-value store. [`Shop`] owns every store and keeps the reconciled cart
//! and wishlist views (snapshots re-joined against the live catalog) current.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod state;
pub mod storage;
pub mod stores;
pub mod sync;

pub use config::{ConfigError, LogFormat, ShopConfig};
pub use error::AppError;
pub use state::Shop;
pub use storage::{FileStorage, LocalStorage, MemoryStorage, SharedStorage, StorageError, StorageKey};
pub use sync::{CartView, DisplayItem, DisplayLine, Source, WishlistView};
