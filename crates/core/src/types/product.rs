//! Catalog products and categories.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;

/// A product in the catalog.
///
/// The `id` never changes once assigned; every other field can be edited
/// in place through a [`ProductPatch`]. Cart lines and wishlist entries
/// hold copies of this struct as their snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    #[serde(default)]
    pub description: String,
    /// Category label; empty when uncategorized. May name a category that
    /// has since been removed from the category set.
    #[serde(default)]
    pub category: String,
    /// Image URLs or data URIs, first one is the cover.
    #[serde(default)]
    pub images: Vec<String>,
}

impl Product {
    /// The cover image, if any.
    #[must_use]
    pub fn cover_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    /// Merge the set fields of `patch` into this product. The id is kept.
    pub fn apply_patch(&mut self, patch: &ProductPatch) {
        if let Some(name) = &patch.name {
            name.clone_into(&mut self.name);
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(description) = &patch.description {
            description.clone_into(&mut self.description);
        }
        if let Some(category) = &patch.category {
            category.clone_into(&mut self.category);
        }
        if let Some(images) = &patch.images {
            images.clone_into(&mut self.images);
        }
    }
}

/// A product that has not been given an id yet.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub price: Price,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub images: Vec<String>,
}

impl NewProduct {
    /// Attach an id, producing a catalog product.
    #[must_use]
    pub fn with_id(self, id: ProductId) -> Product {
        Product {
            id,
            name: self.name,
            price: self.price,
            description: self.description,
            category: self.category,
            images: self.images,
        }
    }
}

/// A partial update to a product. `None` fields are left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProductPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
}

impl ProductPatch {
    /// True when the patch would not change anything.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.price.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.images.is_none()
    }
}

/// Errors that can occur when parsing a [`CategoryName`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CategoryNameError {
    /// Nothing left after trimming.
    #[error("category name cannot be empty")]
    Empty,
}

/// A trimmed, non-empty category name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryName(String);

impl CategoryName {
    /// Parse a category name, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`CategoryNameError::Empty`] if nothing is left after trimming.
    pub fn parse(s: &str) -> Result<Self, CategoryNameError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(CategoryNameError::Empty);
        }
        Ok(Self(s.to_owned()))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CategoryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
