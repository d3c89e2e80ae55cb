//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `auth` - Login, registration and logout against the commerce API
//! - `cart` - Cart mutations and reconciliation with the catalog

pub mod auth;
pub mod cart;
