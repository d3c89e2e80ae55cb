//! Application state shared across commands.

use std::sync::Arc;

use crate::api::{ApiError, StorefrontClient};
use crate::config::StorefrontConfig;
use crate::search::SearchDebouncer;
use crate::session::FileSessionStore;

/// Application state shared across commands.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// configuration and the commerce API client.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    client: Arc<StorefrontClient>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("client", &self.inner.client)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Client` if the HTTP client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, ApiError> {
        let client = StorefrontClient::new(&config.api)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                client: Arc::new(client),
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the commerce API client.
    #[must_use]
    pub fn client(&self) -> &StorefrontClient {
        &self.inner.client
    }

    /// Open the session store configured for this process.
    #[must_use]
    pub fn session_store(&self) -> FileSessionStore {
        FileSessionStore::new(&self.inner.config.session_file)
    }

    /// Create a search debouncer using the configured delay.
    #[must_use]
    pub fn search(&self) -> SearchDebouncer<StorefrontClient> {
        SearchDebouncer::new(
            Arc::clone(&self.inner.client),
            self.inner.config.search_debounce,
        )
    }
}
