//! Persisted record shapes and their conversion to domain types.
//!
//! Records are written in one canonical shape but read leniently, since
//! earlier versions of the shop stored whatever the UI happened to hold:
//!
//! - a single `image` string instead of an `images` array
//! - `price` as the raw form input string rather than a number
//! - `id` as a string, `category`/`description` missing or `null`
//! - cart entries with no `quantity` (one entry per click)
//!
//! Each array element is decoded on its own, so one bad record is dropped
//! with a warning while the rest still load. A value that is not JSON at
//! all, or not the expected container, loads as empty state.

use std::collections::HashSet;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use corner_shop_core::{
    CartLine, CategoryName, CheckoutForm, Price, Product, ProductId, WishlistEntry,
};

use super::{LocalStorage, StorageError, StorageKey};

// =============================================================================
// Legacy-tolerant product record
// =============================================================================

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredId {
    Number(i64),
    Text(String),
}

impl StoredId {
    fn into_id(self) -> Result<ProductId, String> {
        match self {
            Self::Number(n) => Ok(ProductId::new(n)),
            Self::Text(s) => s.parse().map_err(|_| format!("id {s:?} is not numeric")),
        }
    }
}

/// A product as it may appear in any persisted array.
#[derive(Deserialize)]
struct StoredProduct {
    id: StoredId,
    #[serde(default)]
    name: Option<String>,
    price: Price,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    images: Option<Vec<String>>,
    #[serde(default)]
    image: Option<String>,
}

impl StoredProduct {
    fn into_product(self) -> Result<Product, String> {
        let mut images: Vec<String> = self
            .images
            .unwrap_or_default()
            .into_iter()
            .filter(|src| !src.trim().is_empty())
            .collect();
        // The singular field was the cover image in older records.
        if let Some(cover) = self.image.filter(|src| !src.trim().is_empty()) {
            if !images.contains(&cover) {
                images.insert(0, cover);
            }
        }

        Ok(Product {
            id: self.id.into_id()?,
            name: self.name.unwrap_or_default(),
            price: self.price,
            description: self.description.unwrap_or_default(),
            category: self.category.map(|c| c.trim().to_owned()).unwrap_or_default(),
            images,
        })
    }
}

#[derive(Deserialize)]
struct StoredCartLine {
    #[serde(flatten)]
    product: StoredProduct,
    #[serde(default)]
    quantity: Option<u32>,
}

/// Cart lines are persisted flat: product fields plus `quantity`.
#[derive(Serialize)]
struct CartLineRecord<'a> {
    #[serde(flatten)]
    product: &'a Product,
    quantity: u32,
}

// =============================================================================
// Load
// =============================================================================

/// Read and parse the raw JSON under `key`. `None` means "start empty";
/// the reason has already been logged.
fn read_value(storage: &dyn LocalStorage, key: StorageKey) -> Option<Value> {
    let raw = match storage.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            warn!(%key, error = %e, "Cannot read persisted state, starting empty");
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(Value::Null) => None,
        Ok(value) => Some(value),
        Err(e) => {
            let err = StorageError::MalformedPersistedState {
                key,
                reason: e.to_string(),
            };
            warn!(%key, error = %err, "Discarding persisted state");
            None
        }
    }
}

/// Decode each element of the array under `key`, dropping the ones that
/// fail.
fn read_array<T, F>(storage: &dyn LocalStorage, key: StorageKey, convert: F) -> Vec<T>
where
    F: Fn(Value) -> Result<T, String>,
{
    let items = match read_value(storage, key) {
        None => return Vec::new(),
        Some(Value::Array(items)) => items,
        Some(other) => {
            let err = StorageError::MalformedPersistedState {
                key,
                reason: format!("expected an array, found {}", json_kind(&other)),
            };
            warn!(%key, error = %err, "Discarding persisted state");
            return Vec::new();
        }
    };

    items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match convert(item) {
            Ok(value) => Some(value),
            Err(reason) => {
                warn!(%key, index, %reason, "Dropping unreadable record");
                None
            }
        })
        .collect()
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, String> {
    serde_json::from_value(value).map_err(|e| e.to_string())
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Load the catalog. Later records with an already-seen id are dropped.
pub fn load_products(storage: &dyn LocalStorage) -> Vec<Product> {
    let mut seen = HashSet::new();
    read_array(storage, StorageKey::Products, |value| {
        decode::<StoredProduct>(value)?.into_product()
    })
    .into_iter()
    .filter(|product| {
        let fresh = seen.insert(product.id);
        if !fresh {
            warn!(product_id = %product.id, "Dropping duplicate product record");
        }
        fresh
    })
    .collect()
}

/// Load the category set, trimming names and dropping blanks and repeats.
pub fn load_categories(storage: &dyn LocalStorage) -> Vec<CategoryName> {
    let mut categories: Vec<CategoryName> = Vec::new();
    let names = read_array(storage, StorageKey::Categories, |value| {
        let name: String = decode(value)?;
        CategoryName::parse(&name).map_err(|e| e.to_string())
    });
    for name in names {
        if !categories.contains(&name) {
            categories.push(name);
        }
    }
    categories
}

/// Load cart lines. Records for the same product are merged by summing
/// quantities; a missing quantity counts as one.
pub fn load_cart(storage: &dyn LocalStorage) -> Vec<CartLine> {
    let records = read_array(storage, StorageKey::Cart, |value| {
        let record: StoredCartLine = decode(value)?;
        let quantity = record.quantity.unwrap_or(1);
        if quantity == 0 {
            return Err("quantity is zero".to_owned());
        }
        Ok(CartLine {
            quantity,
            snapshot: record.product.into_product()?,
        })
    });

    let mut lines: Vec<CartLine> = Vec::with_capacity(records.len());
    for record in records {
        match lines
            .iter_mut()
            .find(|line| line.product_id() == record.product_id())
        {
            Some(line) => line.quantity = line.quantity.saturating_add(record.quantity),
            None => lines.push(record),
        }
    }
    lines
}

/// Load wishlist entries, keeping the first record per product.
pub fn load_wishlist(storage: &dyn LocalStorage) -> Vec<WishlistEntry> {
    let mut seen = HashSet::new();
    read_array(storage, StorageKey::Wishlist, |value| {
        decode::<StoredProduct>(value)?.into_product()
    })
    .into_iter()
    .filter(|product| seen.insert(product.id))
    .map(WishlistEntry::new)
    .collect()
}

/// Load the saved checkout form, or a blank one.
pub fn load_checkout_form(storage: &dyn LocalStorage) -> CheckoutForm {
    let key = StorageKey::CheckoutForm;
    let Some(value) = read_value(storage, key) else {
        return CheckoutForm::default();
    };
    serde_json::from_value(value).unwrap_or_else(|e| {
        let err = StorageError::MalformedPersistedState {
            key,
            reason: e.to_string(),
        };
        warn!(%key, error = %err, "Discarding persisted state");
        CheckoutForm::default()
    })
}

// =============================================================================
// Save
// =============================================================================

fn write<T: Serialize + ?Sized>(
    storage: &dyn LocalStorage,
    key: StorageKey,
    value: &T,
) -> Result<(), StorageError> {
    let json = serde_json::to_string(value).map_err(|source| StorageError::Encode { key, source })?;
    storage.set(key, &json)
}

/// Persist the catalog products.
///
/// # Errors
///
/// Returns a [`StorageError`] if encoding or writing fails.
pub fn save_products(storage: &dyn LocalStorage, products: &[Product]) -> Result<(), StorageError> {
    write(storage, StorageKey::Products, products)
}

/// Persist the category set.
///
/// # Errors
///
/// Returns a [`StorageError`] if encoding or writing fails.
pub fn save_categories(
    storage: &dyn LocalStorage,
    categories: &[CategoryName],
) -> Result<(), StorageError> {
    write(storage, StorageKey::Categories, categories)
}

/// Persist cart lines in the flattened record shape.
///
/// # Errors
///
/// Returns a [`StorageError`] if encoding or writing fails.
pub fn save_cart(storage: &dyn LocalStorage, lines: &[CartLine]) -> Result<(), StorageError> {
    let records: Vec<CartLineRecord<'_>> = lines
        .iter()
        .map(|line| CartLineRecord {
            product: &line.snapshot,
            quantity: line.quantity,
        })
        .collect();
    write(storage, StorageKey::Cart, &records)
}

/// Persist wishlist snapshots as plain product objects.
///
/// # Errors
///
/// Returns a [`StorageError`] if encoding or writing fails.
pub fn save_wishlist(
    storage: &dyn LocalStorage,
    entries: &[WishlistEntry],
) -> Result<(), StorageError> {
    let products: Vec<&Product> = entries.iter().map(|entry| &entry.snapshot).collect();
    write(storage, StorageKey::Wishlist, &products)
}

/// Persist the checkout form.
///
/// # Errors
///
/// Returns a [`StorageError`] if encoding or writing fails.
pub fn save_checkout_form(storage: &dyn LocalStorage, form: &CheckoutForm) -> Result<(), StorageError> {
    write(storage, StorageKey::CheckoutForm, form)
}
