//! Core types for Cartlane.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod credential;
pub mod id;
pub mod price;

pub use credential::SessionToken;
pub use id::ProductId;
pub use price::{Price, PriceError};
