//! Cart mutation gateway.
//!
//! Applies one quantity change to the remote cart and hands back the cart the
//! server ends up with. Unauthenticated and duplicate adds are refused before
//! any request is made.

use cartlane_core::{CartRecord, Product, ProductId};
use tracing::{debug, info, instrument};

use super::CartError;
use crate::api::CommerceApi;
use crate::error::{add_breadcrumb, report};
use crate::session::Session;

/// Options for [`CartMutationGateway::add_or_update_quantity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MutationOptions {
    /// Skip the "already in cart" check.
    ///
    /// `false` for first-time adds from the catalog, where adding a product
    /// that is already in the cart is refused. `true` for quantity changes on
    /// items already in the cart.
    pub prevent_duplicate: bool,
}

impl MutationOptions {
    /// Options for adding a product from the catalog.
    #[must_use]
    pub const fn first_add() -> Self {
        Self {
            prevent_duplicate: false,
        }
    }

    /// Options for changing the quantity of an item already in the cart.
    #[must_use]
    pub const fn adjust() -> Self {
        Self {
            prevent_duplicate: true,
        }
    }
}

/// Returns `true` if `product_id` has a non-zero quantity in `records`.
#[must_use]
pub fn is_item_in_cart(records: &[CartRecord], product_id: &ProductId) -> bool {
    records
        .iter()
        .any(|record| record.qty > 0 && record.product_id == *product_id)
}

/// Applies quantity changes to the remote cart.
#[derive(Debug, Clone, Copy)]
pub struct CartMutationGateway<'a, A> {
    api: &'a A,
}

impl<'a, A: CommerceApi> CartMutationGateway<'a, A> {
    /// Create a gateway over the given API.
    #[must_use]
    pub const fn new(api: &'a A) -> Self {
        Self { api }
    }

    /// Set the quantity of `product_id` in the remote cart.
    ///
    /// On success returns the server's full cart, which replaces
    /// `current_records` wholesale. On failure the caller keeps
    /// `current_records` as they are. A quantity of zero is sent like any
    /// other and removes the item server-side.
    ///
    /// `catalog` is only used to name the product in logs and breadcrumbs.
    ///
    /// # Errors
    ///
    /// - `CartError::Unauthenticated` if the session has no token (no request)
    /// - `CartError::DuplicateItem` if the product is already in the cart and
    ///   `options.prevent_duplicate` is `false` (no request)
    /// - `CartError::RemoteValidation` with the server's message for a 4xx
    /// - `CartError::Connectivity` if no response was received
    /// - `CartError::Remote` for any other remote failure
    #[instrument(
        skip_all,
        fields(product_id = %product_id, qty = new_quantity, prevent_duplicate = options.prevent_duplicate)
    )]
    pub async fn add_or_update_quantity(
        &self,
        session: &Session,
        current_records: &[CartRecord],
        catalog: &[Product],
        product_id: &ProductId,
        new_quantity: u32,
        options: MutationOptions,
    ) -> Result<Vec<CartRecord>, CartError> {
        let Some(token) = session.token() else {
            debug!("Refusing cart mutation without a session token");
            return Err(CartError::Unauthenticated);
        };

        if !options.prevent_duplicate && is_item_in_cart(current_records, product_id) {
            debug!("Refusing duplicate add");
            return Err(CartError::DuplicateItem {
                product_id: product_id.clone(),
            });
        }

        let name = catalog
            .iter()
            .find(|product| product.id == *product_id)
            .map_or_else(|| product_id.as_str(), |product| product.name.as_str());
        add_breadcrumb(
            "cart",
            &format!("Set quantity of {name} to {new_quantity}"),
            Some(&[("product_id", product_id.as_str())]),
        );

        let records = self
            .api
            .upsert_cart_item(token, product_id, new_quantity)
            .await
            .map_err(|e| {
                let err = CartError::from(e);
                report(&err);
                err
            })?;

        info!(lines = records.len(), "Cart updated");
        Ok(records)
    }
}
