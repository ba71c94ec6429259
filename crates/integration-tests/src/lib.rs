//! Integration tests for Corner Shop.
//!
//! Scenarios run against a real [`FileStorage`] in a temporary directory and
//! reopen the shop between steps, so every assertion about persistence goes
//! through the files on disk.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p corner-shop-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;
use std::sync::Arc;

use serde_json::Value;
use tempfile::TempDir;

use corner_shop_core::{NewProduct, Price, Product};
use corner_shop_storefront::{FileStorage, Shop, StorageKey};

/// A shop directory that lives as long as the test.
#[derive(Debug)]
pub struct TestShop {
    dir: TempDir,
}

impl TestShop {
    /// Create an empty shop directory.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created.
    #[must_use]
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    /// Create a shop directory pre-seeded with raw file contents.
    #[must_use]
    pub fn with_files(files: &[(StorageKey, &str)]) -> Self {
        let shop = Self::new();
        for (key, contents) in files {
            shop.write_raw(*key, contents);
        }
        shop
    }

    /// Open the shop as a fresh process would.
    ///
    /// # Panics
    ///
    /// Panics if the storage directory cannot be opened.
    #[must_use]
    pub fn open(&self) -> Shop {
        let storage = FileStorage::open(self.dir.path()).expect("Failed to open storage");
        Shop::open(Arc::new(storage))
    }

    /// Path of the file backing `key`.
    #[must_use]
    pub fn path(&self, key: StorageKey) -> PathBuf {
        self.dir.path().join(format!("{key}.json"))
    }

    /// Raw file contents for `key`, if the file exists.
    #[must_use]
    pub fn read_raw(&self, key: StorageKey) -> Option<String> {
        std::fs::read_to_string(self.path(key)).ok()
    }

    /// Parsed file contents for `key`, if the file exists and is JSON.
    #[must_use]
    pub fn read_json(&self, key: StorageKey) -> Option<Value> {
        self.read_raw(key)
            .and_then(|raw| serde_json::from_str(&raw).ok())
    }

    /// Overwrite the file for `key`.
    ///
    /// # Panics
    ///
    /// Panics if the file cannot be written.
    pub fn write_raw(&self, key: StorageKey, contents: &str) {
        std::fs::write(self.path(key), contents).expect("Failed to write storage file");
    }
}

impl Default for TestShop {
    fn default() -> Self {
        Self::new()
    }
}

/// Add a product with just a name and price.
///
/// # Panics
///
/// Panics if the price does not parse or the product cannot be saved.
pub fn add_product(shop: &mut Shop, name: &str, price: &str) -> Product {
    shop.add_product(NewProduct {
        name: name.to_owned(),
        price: Price::parse(price).expect("valid price"),
        images: vec![format!("https://img.example/{}.jpg", name.to_lowercase())],
        ..NewProduct::default()
    })
    .expect("Failed to add product")
}
