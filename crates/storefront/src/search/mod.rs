//! Debounced product search.
//!
//! Keystrokes arrive faster than the commerce API should be queried. Each
//! input reschedules a single pending search; only the last input within the
//! debounce window reaches the API.
//!
//! # Example
//!
//! ```rust,ignore
//! let mut search = SearchDebouncer::new(Arc::new(client), config.search_debounce);
//! let mut results = search.subscribe();
//!
//! search.on_input("iph");
//! search.on_input("iphone");
//!
//! results.changed().await?;
//! ```

mod debounce;

pub use debounce::Debouncer;

use std::sync::Arc;
use std::time::Duration;

use cartlane_core::Product;
use tokio::sync::watch;
use tracing::debug;

use crate::api::CommerceApi;
use crate::error::{AppError, Notice, report};

/// Outcome of the latest search.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SearchState {
    /// Nothing searched yet.
    #[default]
    Idle,
    /// Products matching `text`. Empty text yields the full catalog.
    Results { text: String, products: Vec<Product> },
    /// The search succeeded with no match.
    NoResults { text: String },
    /// The search failed.
    Failed { text: String, notice: Notice },
}

/// Runs [`CommerceApi::search_products`] behind a [`Debouncer`] and
/// publishes each outcome on a watch channel.
pub struct SearchDebouncer<A> {
    api: Arc<A>,
    debouncer: Debouncer,
    state: Arc<watch::Sender<SearchState>>,
}

impl<A: CommerceApi + 'static> SearchDebouncer<A> {
    #[must_use]
    pub fn new(api: Arc<A>, delay: Duration) -> Self {
        let (state, _) = watch::channel(SearchState::Idle);
        Self {
            api,
            debouncer: Debouncer::new(delay),
            state: Arc::new(state),
        }
    }

    /// Receive every published [`SearchState`].
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state.subscribe()
    }

    /// How long input must stay unchanged before a search is sent.
    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.debouncer.delay()
    }

    /// The latest published state.
    #[must_use]
    pub fn current(&self) -> SearchState {
        self.state.borrow().clone()
    }

    /// Record a change of the search text. Replaces any pending search,
    /// including one already waiting on the API.
    pub fn on_input(&mut self, text: impl Into<String>) {
        let text = text.into();
        let api = Arc::clone(&self.api);
        let state = Arc::clone(&self.state);

        self.debouncer.schedule(async move {
            debug!(text = %text, "Running debounced search");
            let next = match api.search_products(&text).await {
                Ok(products) if products.is_empty() => SearchState::NoResults { text },
                Ok(products) => SearchState::Results { text, products },
                Err(e) => {
                    let err = AppError::from(e);
                    report(&err);
                    SearchState::Failed {
                        text,
                        notice: Notice::from(&err),
                    }
                }
            };
            state.send_replace(next);
        });
    }

    /// Drop the pending search, if any.
    pub fn cancel(&mut self) {
        self.debouncer.cancel();
    }

    /// Returns `true` while a search is scheduled or running.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::error::CONNECTIVITY_MESSAGE;
    use crate::testing::{FakeApi, product};

    const DELAY: Duration = Duration::from_millis(40);

    async fn next_state(rx: &mut watch::Receiver<SearchState>) -> SearchState {
        tokio::time::timeout(Duration::from_secs(2), rx.changed())
            .await
            .unwrap()
            .unwrap();
        rx.borrow_and_update().clone()
    }

    #[tokio::test]
    async fn test_only_last_input_is_searched() {
        let api = Arc::new(FakeApi::default().with_search(Ok(vec![product("p1", 100)])));
        let mut search = SearchDebouncer::new(Arc::clone(&api), DELAY);
        let mut rx = search.subscribe();

        search.on_input("i");
        search.on_input("ip");
        search.on_input("iphone");

        let state = next_state(&mut rx).await;

        assert_eq!(api.search_texts(), vec!["iphone".to_string()]);
        assert!(matches!(state, SearchState::Results { ref text, ref products }
            if text == "iphone" && products.len() == 1));
    }

    #[tokio::test]
    async fn test_empty_result_is_no_results() {
        let api = Arc::new(FakeApi::default().with_search(Ok(vec![])));
        let mut search = SearchDebouncer::new(api, DELAY);
        let mut rx = search.subscribe();

        search.on_input("zzz");

        assert_eq!(
            next_state(&mut rx).await,
            SearchState::NoResults {
                text: "zzz".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_failure_publishes_notice() {
        let api = Arc::new(
            FakeApi::default().with_search(Err(ApiError::Connectivity("refused".to_string()))),
        );
        let mut search = SearchDebouncer::new(api, DELAY);
        let mut rx = search.subscribe();

        search.on_input("phone");

        match next_state(&mut rx).await {
            SearchState::Failed { notice, .. } => assert_eq!(notice.message, CONNECTIVITY_MESSAGE),
            other => panic!("unexpected state: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_cancel_drops_pending_search() {
        let api = Arc::new(FakeApi::default());
        let mut search = SearchDebouncer::new(Arc::clone(&api), DELAY);

        search.on_input("phone");
        assert!(search.is_pending());
        search.cancel();

        tokio::time::sleep(DELAY * 3).await;

        assert!(api.search_texts().is_empty());
        assert_eq!(search.current(), SearchState::Idle);
    }
}
