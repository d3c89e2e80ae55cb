//! Per-user cart controller.

use cartlane_core::{CartRecord, CartView, Product, ProductId, join_cart_with_catalog};
use tracing::{debug, instrument};

use super::{CartError, CartMutationGateway, MutationOptions};
use crate::api::{ApiError, CommerceApi};
use crate::error::report;
use crate::session::Session;

/// Catalog and cart state for one session.
///
/// Every change goes through [`CartMutationGateway`]. The cached records are
/// replaced by the server's answer on success and left alone on failure.
pub struct CartSession<'a, A> {
    api: &'a A,
    session: Session,
    catalog: Vec<Product>,
    records: Vec<CartRecord>,
}

impl<A> std::fmt::Debug for CartSession<'_, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartSession")
            .field("authenticated", &self.session.is_authenticated())
            .field("catalog", &self.catalog.len())
            .field("records", &self.records)
            .finish_non_exhaustive()
    }
}

impl<'a, A: CommerceApi> CartSession<'a, A> {
    /// Fetch the catalog and the cart concurrently.
    ///
    /// Without a session token the cart is empty and not requested.
    ///
    /// # Errors
    ///
    /// Returns `CartError` if either fetch fails.
    #[instrument(skip_all, fields(authenticated = session.is_authenticated()))]
    pub async fn load(api: &'a A, session: Session) -> Result<Self, CartError> {
        let cart = async {
            match session.token() {
                Some(token) => api.get_cart(token).await,
                None => Ok(Vec::new()),
            }
        };
        let (catalog, records) = tokio::join!(api.get_products(), cart);

        let catalog = catalog.map_err(remote_failure)?;
        let records = records.map_err(remote_failure)?;
        debug!(
            products = catalog.len(),
            lines = records.len(),
            "Loaded catalog and cart"
        );

        Ok(Self {
            api,
            session,
            catalog,
            records,
        })
    }

    /// Build a session from already-fetched state.
    #[must_use]
    pub const fn from_parts(
        api: &'a A,
        session: Session,
        catalog: Vec<Product>,
        records: Vec<CartRecord>,
    ) -> Self {
        Self {
            api,
            session,
            catalog,
            records,
        }
    }

    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    #[must_use]
    pub fn catalog(&self) -> &[Product] {
        &self.catalog
    }

    /// Raw cart records as last returned by the server.
    #[must_use]
    pub fn records(&self) -> &[CartRecord] {
        &self.records
    }

    /// Quantity of `product_id` currently in the cart.
    #[must_use]
    pub fn quantity_of(&self, product_id: &ProductId) -> Option<u32> {
        self.records
            .iter()
            .find(|record| record.product_id == *product_id && record.qty > 0)
            .map(|record| record.qty)
    }

    /// Reconcile the cached records with the catalog.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Reconciliation` if the cart references a product
    /// missing from the catalog.
    pub fn view(&self) -> Result<CartView, CartError> {
        join_cart_with_catalog(&self.records, &self.catalog).map_err(|e| {
            let err = CartError::from(e);
            report(&err);
            err
        })
    }

    /// Add one unit of a product that is not yet in the cart.
    ///
    /// # Errors
    ///
    /// See [`CartMutationGateway::add_or_update_quantity`].
    pub async fn add_to_cart(&mut self, product_id: &ProductId) -> Result<CartView, CartError> {
        self.apply(product_id, 1, MutationOptions::first_add())
            .await
    }

    /// Increase the quantity of an item in the cart by one.
    ///
    /// # Errors
    ///
    /// Returns `CartError::NotInCart` if the product is not in the cart, or
    /// any error from [`CartMutationGateway::add_or_update_quantity`].
    pub async fn increment(&mut self, product_id: &ProductId) -> Result<CartView, CartError> {
        let qty = self.require_in_cart(product_id)?;
        self.apply(product_id, qty.saturating_add(1), MutationOptions::adjust())
            .await
    }

    /// Decrease the quantity of an item in the cart by one. Reaching zero
    /// removes the item.
    ///
    /// # Errors
    ///
    /// Returns `CartError::NotInCart` if the product is not in the cart, or
    /// any error from [`CartMutationGateway::add_or_update_quantity`].
    pub async fn decrement(&mut self, product_id: &ProductId) -> Result<CartView, CartError> {
        let qty = self.require_in_cart(product_id)?;
        self.apply(product_id, qty.saturating_sub(1), MutationOptions::adjust())
            .await
    }

    /// Set an explicit quantity. Zero removes the item.
    ///
    /// # Errors
    ///
    /// See [`CartMutationGateway::add_or_update_quantity`].
    pub async fn set_quantity(
        &mut self,
        product_id: &ProductId,
        qty: u32,
    ) -> Result<CartView, CartError> {
        self.apply(product_id, qty, MutationOptions::adjust()).await
    }

    /// Re-fetch the cart from the server.
    ///
    /// # Errors
    ///
    /// Returns `CartError` if the fetch fails; the cached records are kept.
    pub async fn refresh(&mut self) -> Result<CartView, CartError> {
        if let Some(token) = self.session.token() {
            self.records = self.api.get_cart(token).await.map_err(remote_failure)?;
        } else {
            self.records.clear();
        }
        self.view()
    }

    fn require_in_cart(&self, product_id: &ProductId) -> Result<u32, CartError> {
        if !self.session.is_authenticated() {
            return Err(CartError::Unauthenticated);
        }
        self.quantity_of(product_id)
            .ok_or_else(|| CartError::NotInCart {
                product_id: product_id.clone(),
            })
    }

    async fn apply(
        &mut self,
        product_id: &ProductId,
        qty: u32,
        options: MutationOptions,
    ) -> Result<CartView, CartError> {
        let records = CartMutationGateway::new(self.api)
            .add_or_update_quantity(
                &self.session,
                &self.records,
                &self.catalog,
                product_id,
                qty,
                options,
            )
            .await?;

        self.records = records;
        self.view()
    }
}

fn remote_failure(err: ApiError) -> CartError {
    let err = CartError::from(err);
    report(&err);
    err
}
