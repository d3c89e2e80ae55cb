//! Catalog browsing and search.

use cartlane_storefront::search::SearchState;
use cartlane_storefront::state::AppState;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;

use super::CommandError;
use crate::render;

/// Print the full catalog.
pub async fn products(state: &AppState) -> Result<(), CommandError> {
    let products = state.client().get_products().await?;
    render::products(&products);
    Ok(())
}

/// Run one search and print the matches.
pub async fn search(state: &AppState, text: &str) -> Result<(), CommandError> {
    let products = state.client().search_products(text).await?;
    if products.is_empty() {
        render::search_state(&SearchState::NoResults {
            text: text.to_string(),
        });
    } else {
        render::products(&products);
    }
    Ok(())
}

/// Treat each stdin line as the current contents of a search box.
///
/// Lines arriving within the debounce window replace each other; only the
/// last one is searched. Exits at end of input once the last search settles.
pub async fn search_interactive(state: &AppState) -> Result<(), CommandError> {
    let mut search = state.search();
    let mut results = search.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    tracing::info!(
        delay_ms = search.delay().as_millis(),
        "Reading search text from stdin"
    );

    loop {
        tokio::select! {
            line = lines.next_line() => match line? {
                Some(text) => search.on_input(text),
                None => break,
            },
            changed = results.changed() => {
                if changed.is_err() {
                    break;
                }
                let current = results.borrow_and_update().clone();
                render::search_state(&current);
            }
        }
    }

    if let Some(current) = final_state(&mut results, search.is_pending()).await {
        render::search_state(&current);
    }
    Ok(())
}

/// The state still owed to the user once input has ended.
///
/// EOF can win the race against a result published in the same poll, so an
/// unseen change counts even when nothing is pending any more.
async fn final_state(
    results: &mut watch::Receiver<SearchState>,
    pending: bool,
) -> Option<SearchState> {
    let settled =
        results.has_changed().unwrap_or(false) || (pending && results.changed().await.is_ok());
    settled.then(|| results.borrow_and_update().clone())
}
