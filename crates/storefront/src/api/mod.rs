//! Commerce API client.
//!
//! # Architecture
//!
//! - Plain JSON-over-HTTP with `reqwest`; the remote service is the source of
//!   truth for the catalog and every cart
//! - In-memory caching via `moka` for the product catalog (configurable TTL)
//! - The [`CommerceApi`] trait is the seam between the cart logic and the
//!   network, so cart mutations can be exercised against in-memory fakes
//!
//! # Endpoints
//!
//! | Method | Path | Auth | Response |
//! |--------|------|------|----------|
//! | `GET` | `/products` | - | `[Product]` |
//! | `GET` | `/products/search?value=<text>` | - | `[Product]` (404 = no results) |
//! | `GET` | `/cart` | Bearer | `[CartRecord]` |
//! | `POST` | `/cart` | Bearer | `[CartRecord]` |
//! | `POST` | `/auth/login` | - | `{success, token, username, balance}` |
//! | `POST` | `/auth/register` | - | `{success}` |
//!
//! Failures carry a `{"success": false, "message": "..."}` body.
//!
//! # Example
//!
//! ```rust,ignore
//! use cartlane_storefront::api::StorefrontClient;
//!
//! let client = StorefrontClient::new(&config.api)?;
//!
//! let catalog = client.get_products().await?;
//! let cart = client.get_cart(&token).await?;
//! let cart = client.upsert_cart_item(&token, &catalog[0].id, 1).await?;
//! ```

mod client;
pub mod types;

pub use client::StorefrontClient;
pub use types::*;

use std::future::Future;

use cartlane_core::{CartRecord, Product, ProductId, SessionToken};
use thiserror::Error;

/// Errors that can occur when talking to the commerce API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No response was received (connection refused, DNS, timeout, reset).
    #[error("Could not reach the commerce API: {0}")]
    Connectivity(String),

    /// The API answered with a structured `{success: false, message}` error.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// The API answered with an error status and no structured body.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body could not be parsed.
    #[error("Parse error: {0}")]
    Parse(String),

    /// The configured endpoint is not a valid URL.
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),

    /// The HTTP client could not be built.
    #[error("HTTP client error: {0}")]
    Client(String),
}

impl ApiError {
    /// HTTP status of the failed response, if one was received.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } | Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` for a structured 4xx error from the API.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::Api { status, .. } if *status >= 400 && *status < 500)
    }

    /// Returns `true` if no response was received.
    #[must_use]
    pub const fn is_connectivity(&self) -> bool {
        matches!(self, Self::Connectivity(_))
    }
}

/// Remote catalog and cart operations.
///
/// [`StorefrontClient`] is the production implementation. Every method issues
/// at most one request; nothing here retries.
pub trait CommerceApi: Send + Sync {
    /// Fetch the full product catalog.
    fn get_products(&self) -> impl Future<Output = Result<Vec<Product>, ApiError>> + Send;

    /// Search the catalog by name or category. No match is `Ok(vec![])`.
    fn search_products(
        &self,
        text: &str,
    ) -> impl Future<Output = Result<Vec<Product>, ApiError>> + Send;

    /// Fetch the cart records of the authenticated user.
    fn get_cart(
        &self,
        token: &SessionToken,
    ) -> impl Future<Output = Result<Vec<CartRecord>, ApiError>> + Send;

    /// Set the quantity of one product in the cart and return the new cart.
    ///
    /// A quantity of zero removes the product.
    fn upsert_cart_item(
        &self,
        token: &SessionToken,
        product_id: &ProductId,
        qty: u32,
    ) -> impl Future<Output = Result<Vec<CartRecord>, ApiError>> + Send;
}

/// Account operations.
pub trait AccountApi: Send + Sync {
    /// Exchange credentials for a session token.
    fn login(
        &self,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<LoginResponse, ApiError>> + Send;

    /// Create an account.
    fn register(
        &self,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<RegisterResponse, ApiError>> + Send;
}
