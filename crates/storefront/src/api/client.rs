//! Commerce API client implementation.
//!
//! Uses `reqwest` for HTTP and caches the product catalog using `moka`.
//! Cart requests are never cached: the server's answer is always authoritative.

use std::sync::Arc;

use cartlane_core::{CartRecord, Product, ProductId, SessionToken};
use moka::future::Cache;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use super::types::{
    CartUpsertRequest, Credentials, ErrorBody, LoginResponse, RegisterResponse,
};
use super::{AccountApi, ApiError, CommerceApi};
use crate::config::ApiConfig;

/// Cache key for the full product listing.
const CATALOG_CACHE_KEY: &str = "catalog";

/// Maximum number of body characters kept in errors and logs.
const MAX_BODY_CHARS: usize = 200;

// =============================================================================
// StorefrontClient
// =============================================================================

/// Client for the commerce API.
///
/// Cheaply cloneable; clones share the HTTP connection pool and the catalog
/// cache.
#[derive(Clone)]
pub struct StorefrontClient {
    inner: Arc<StorefrontClientInner>,
}

struct StorefrontClientInner {
    client: reqwest::Client,
    endpoint: String,
    catalog: Cache<&'static str, Arc<Vec<Product>>>,
}

impl std::fmt::Debug for StorefrontClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorefrontClient")
            .field("endpoint", &self.inner.endpoint)
            .finish_non_exhaustive()
    }
}

impl StorefrontClient {
    /// Create a new commerce API client.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Client` if the HTTP client fails to build.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ApiError::Client(e.to_string()))?;

        let catalog = Cache::builder()
            .max_capacity(1)
            .time_to_live(config.catalog_cache_ttl)
            .build();

        Ok(Self {
            inner: Arc::new(StorefrontClientInner {
                client,
                endpoint: config.endpoint.as_str().trim_end_matches('/').to_string(),
                catalog,
            }),
        })
    }

    /// Base URL requests are issued against.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.inner.endpoint
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.endpoint)
    }

    // =========================================================================
    // Catalog Methods
    // =========================================================================

    /// Get the full product catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_products(&self) -> Result<Vec<Product>, ApiError> {
        if let Some(products) = self.inner.catalog.get(CATALOG_CACHE_KEY).await {
            debug!("Cache hit for catalog");
            return Ok(products.as_ref().clone());
        }

        let response = self.send(self.inner.client.get(self.url("/products"))).await?;
        let products: Vec<Product> = handle_response(response).await?;

        debug!(count = products.len(), "Fetched catalog");
        self.inner
            .catalog
            .insert(CATALOG_CACHE_KEY, Arc::new(products.clone()))
            .await;

        Ok(products)
    }

    /// Search products by name or category.
    ///
    /// Empty (or whitespace-only) text returns the full catalog. A 404 from
    /// the search endpoint means "no results", not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, text), fields(text = %text))]
    pub async fn search_products(&self, text: &str) -> Result<Vec<Product>, ApiError> {
        let text = text.trim();
        if text.is_empty() {
            return self.get_products().await;
        }

        let url = Url::parse_with_params(&self.url("/products/search"), &[("value", text)])?;
        let response = self.send(self.inner.client.get(url)).await?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!("No products matched search");
            return Ok(Vec::new());
        }

        let (status, text) = read_body(response).await?;
        if !status.is_success() {
            return Err(error_from_body(status, &text));
        }
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        parse_json(&text)
    }

    /// Drop the cached catalog so the next read goes to the API.
    pub async fn invalidate_catalog(&self) {
        self.inner.catalog.invalidate(CATALOG_CACHE_KEY).await;
    }

    // =========================================================================
    // Cart Methods (not cached - mutable state)
    // =========================================================================

    /// Get the cart of the authenticated user.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, token))]
    pub async fn get_cart(&self, token: &SessionToken) -> Result<Vec<CartRecord>, ApiError> {
        let request = self
            .inner
            .client
            .get(self.url("/cart"))
            .bearer_auth(token.expose());
        let response = self.send(request).await?;
        handle_response(response).await
    }

    /// Set the quantity of a product in the cart.
    ///
    /// Returns the full cart as stored by the server after the update.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the server rejects the
    /// update (e.g. insufficient stock).
    #[instrument(skip(self, token, product_id), fields(product_id = %product_id))]
    pub async fn upsert_cart_item(
        &self,
        token: &SessionToken,
        product_id: &ProductId,
        qty: u32,
    ) -> Result<Vec<CartRecord>, ApiError> {
        let body = CartUpsertRequest {
            product_id: product_id.clone(),
            qty,
        };
        let request = self
            .inner
            .client
            .post(self.url("/cart"))
            .bearer_auth(token.expose())
            .json(&body);
        let response = self.send(request).await?;
        handle_response(response).await
    }

    // =========================================================================
    // Auth Methods
    // =========================================================================

    /// Log in with username and password.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Api` with the server's message for bad credentials.
    #[instrument(skip(self, credentials), fields(username = %credentials.username))]
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        let request = self
            .inner
            .client
            .post(self.url("/auth/login"))
            .json(credentials);
        let response = self.send(request).await?;
        handle_response(response).await
    }

    /// Register a new account.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Api` with the server's message (e.g. the username is
    /// already taken).
    #[instrument(skip(self, credentials), fields(username = %credentials.username))]
    pub async fn register(&self, credentials: &Credentials) -> Result<RegisterResponse, ApiError> {
        let request = self
            .inner
            .client
            .post(self.url("/auth/register"))
            .json(credentials);
        let response = self.send(request).await?;
        handle_response(response).await
    }

    // =========================================================================
    // Transport
    // =========================================================================

    /// Send a request. Any failure here means no response was received.
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, ApiError> {
        request.send().await.map_err(|e| {
            tracing::warn!(error = %e, endpoint = %self.inner.endpoint, "Commerce API unreachable");
            ApiError::Connectivity(e.to_string())
        })
    }
}

impl CommerceApi for StorefrontClient {
    async fn get_products(&self) -> Result<Vec<Product>, ApiError> {
        Self::get_products(self).await
    }

    async fn search_products(&self, text: &str) -> Result<Vec<Product>, ApiError> {
        Self::search_products(self, text).await
    }

    async fn get_cart(&self, token: &SessionToken) -> Result<Vec<CartRecord>, ApiError> {
        Self::get_cart(self, token).await
    }

    async fn upsert_cart_item(
        &self,
        token: &SessionToken,
        product_id: &ProductId,
        qty: u32,
    ) -> Result<Vec<CartRecord>, ApiError> {
        Self::upsert_cart_item(self, token, product_id, qty).await
    }
}

impl AccountApi for StorefrontClient {
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        Self::login(self, credentials).await
    }

    async fn register(&self, credentials: &Credentials) -> Result<RegisterResponse, ApiError> {
        Self::register(self, credentials).await
    }
}

// =============================================================================
// Response Handling
// =============================================================================

/// Read the status and body of a response.
async fn read_body(response: reqwest::Response) -> Result<(StatusCode, String), ApiError> {
    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| ApiError::Connectivity(format!("failed to read response body: {e}")))?;
    Ok((status, text))
}

/// Handle an API response and parse its JSON body.
async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let (status, text) = read_body(response).await?;

    if !status.is_success() {
        return Err(error_from_body(status, &text));
    }

    parse_json(&text)
}

fn parse_json<T: DeserializeOwned>(text: &str) -> Result<T, ApiError> {
    serde_json::from_str(text).map_err(|e| {
        tracing::error!(
            error = %e,
            body = %truncate(text),
            "Failed to parse commerce API response"
        );
        ApiError::Parse(e.to_string())
    })
}

/// Classify an error response.
///
/// A `{success: false, message}` body becomes `ApiError::Api` carrying the
/// message verbatim; anything else is kept as a truncated raw body.
fn error_from_body(status: StatusCode, text: &str) -> ApiError {
    if let Ok(body) = serde_json::from_str::<ErrorBody>(text) {
        if status.is_server_error() {
            tracing::error!(status = %status, message = %body.message, "Commerce API server error");
        } else {
            debug!(status = %status, message = %body.message, "Commerce API rejected request");
        }
        return ApiError::Api {
            status: status.as_u16(),
            message: body.message,
        };
    }

    tracing::error!(
        status = %status,
        body = %truncate(text),
        "Commerce API returned non-success status"
    );
    ApiError::Status {
        status: status.as_u16(),
        body: truncate(text),
    }
}

fn truncate(text: &str) -> String {
    text.chars().take(MAX_BODY_CHARS).collect()
}
