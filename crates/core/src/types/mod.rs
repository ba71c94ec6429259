//! Core types for Corner Shop.
//!
//! This module provides type-safe wrappers for the storefront domain.

pub mod cart;
pub mod checkout;
pub mod email;
pub mod id;
pub mod price;
pub mod product;
pub mod wishlist;

pub use cart::{CartLine, CartTotals};
pub use checkout::{CheckoutField, CheckoutForm};
pub use email::{Email, EmailError};
pub use id::*;
pub use price::{CurrencyCode, Price, PriceError, add_amounts, format_amount};
pub use product::{CategoryName, CategoryNameError, NewProduct, Product, ProductPatch};
pub use wishlist::WishlistEntry;
