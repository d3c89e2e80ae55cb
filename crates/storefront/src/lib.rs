//! Cartlane storefront library.
//!
//! Talks to the remote commerce API and keeps one user's cart in sync with
//! it. The `cartlane` CLI is a thin shell over this crate.
//!
//! - [`api`] - HTTP client and the [`api::CommerceApi`] seam
//! - [`services::cart`] - cart mutations and the per-user cart controller
//! - [`services::auth`] - login, registration and logout
//! - [`session`] - key-value session store
//! - [`search`] - debounced product search

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod search;
pub mod services;
pub mod session;
pub mod state;

#[cfg(test)]
mod testing;
