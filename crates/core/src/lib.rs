//! Corner Shop Core - Shared domain types.
//!
//! This crate provides the types used across all Corner Shop components:
//! - `storefront` - Catalog, cart, wishlist and checkout stores
//! - `cli` - Command-line driver over a file-backed shop
//!
//! # Architecture
//!
//! The core crate contains only types and their invariants - no I/O, no
//! storage, no logging. Anything that persists or notifies lives in the
//! storefront crate.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices, emails, products, cart lines, wishlist
//!   entries and the checkout form

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
