//! Cartlane Core - Shared catalog and cart types.
//!
//! This crate provides the types used across all Cartlane components:
//! - `storefront` - Commerce API client, session handling and cart mutations
//! - `cli` - Command-line storefront
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no session storage. This keeps it lightweight and allows it to be
//! used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for product IDs, prices and session tokens
//! - [`product`] - Catalog records
//! - [`cart`] - Cart records and reconciliation against the catalog

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod product;
pub mod types;

pub use cart::{
    CartItem, CartRecord, CartView, LenientCartView, ReconciliationError,
    join_cart_with_catalog, join_cart_with_catalog_lenient, total_quantity, total_value,
};
pub use product::Product;
pub use types::*;
