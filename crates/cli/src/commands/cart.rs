//! Cart commands.
//!
//! Each command loads the catalog and the server cart, applies at most one
//! change, and prints the reconciled cart the server ended up with.

use cartlane_core::ProductId;
use cartlane_storefront::api::StorefrontClient;
use cartlane_storefront::error::Notice;
use cartlane_storefront::services::auth;
use cartlane_storefront::services::cart::CartSession;
use cartlane_storefront::state::AppState;

use super::CommandError;
use crate::render;

async fn load(state: &AppState) -> Result<CartSession<'_, StorefrontClient>, CommandError> {
    let session = auth::current_session(&state.session_store())?;
    Ok(CartSession::load(state.client(), session).await?)
}

/// Print the cart with totals.
pub async fn show(state: &AppState) -> Result<(), CommandError> {
    let cart = load(state).await?;
    render::cart(&cart.view()?);
    Ok(())
}

/// Add one unit of a product that is not in the cart yet.
pub async fn add(state: &AppState, product_id: &ProductId) -> Result<(), CommandError> {
    let mut cart = load(state).await?;
    let view = cart.add_to_cart(product_id).await?;
    render::notice(&Notice::info("Added to cart"));
    render::cart(&view);
    Ok(())
}

/// Set an explicit quantity.
pub async fn set(state: &AppState, product_id: &ProductId, qty: u32) -> Result<(), CommandError> {
    let mut cart = load(state).await?;
    let view = cart.set_quantity(product_id, qty).await?;
    render::cart(&view);
    Ok(())
}

/// Increase a quantity by one.
pub async fn increment(state: &AppState, product_id: &ProductId) -> Result<(), CommandError> {
    let mut cart = load(state).await?;
    let view = cart.increment(product_id).await?;
    render::cart(&view);
    Ok(())
}

/// Decrease a quantity by one; reaching zero removes the item.
pub async fn decrement(state: &AppState, product_id: &ProductId) -> Result<(), CommandError> {
    let mut cart = load(state).await?;
    let view = cart.decrement(product_id).await?;
    render::cart(&view);
    Ok(())
}
