//! Cart synchronization with the commerce API.
//!
//! - [`gateway`] applies quantity changes to the remote cart
//! - [`session`] caches the catalog and cart records for one user and
//!   re-reconciles them after every successful change
//!
//! The server's cart is the only source of truth. A successful mutation
//! replaces the local record list with the server's response; a failed one
//! leaves it untouched. Quantities are never guessed or applied optimistically.

pub mod gateway;
pub mod session;

pub use gateway::{CartMutationGateway, MutationOptions, is_item_in_cart};
pub use session::CartSession;

use cartlane_core::{ProductId, ReconciliationError};
use thiserror::Error;

use crate::api::ApiError;
use crate::error::{CONNECTIVITY_MESSAGE, Reportable};

/// Errors from cart operations.
///
/// Every variant is terminal for the operation that raised it and none ends
/// the session: the user can simply retry.
#[derive(Debug, Error)]
pub enum CartError {
    /// No session token; the user must log in first.
    #[error("Login to add an item to the Cart")]
    Unauthenticated,

    /// First-time add of a product that is already in the cart.
    #[error("Item already in cart. Use the cart sidebar to update quantity or remove item.")]
    DuplicateItem { product_id: ProductId },

    /// Quantity adjustment for a product that is not in the cart.
    #[error("Item is not in the cart: {product_id}")]
    NotInCart { product_id: ProductId },

    /// The server rejected the change; the message is the server's, verbatim.
    #[error("{0}")]
    RemoteValidation(String),

    /// No response from the server.
    #[error("{}", CONNECTIVITY_MESSAGE)]
    Connectivity { detail: String },

    /// The cart references a product missing from the catalog.
    #[error(transparent)]
    Reconciliation(#[from] ReconciliationError),

    /// Any other remote failure (5xx, unparseable response).
    #[error("Commerce API error: {0}")]
    Remote(#[source] ApiError),
}

impl From<ApiError> for CartError {
    fn from(err: ApiError) -> Self {
        if err.is_client_error() {
            return match err {
                ApiError::Api { message, .. } => Self::RemoteValidation(message),
                other => Self::Remote(other),
            };
        }
        match err {
            ApiError::Connectivity(detail) => Self::Connectivity { detail },
            other => Self::Remote(other),
        }
    }
}

impl CartError {
    /// Returns `true` if the operation was refused locally, without any
    /// request being sent.
    #[must_use]
    pub const fn is_local(&self) -> bool {
        matches!(
            self,
            Self::Unauthenticated | Self::DuplicateItem { .. } | Self::NotInCart { .. }
        )
    }
}

impl Reportable for CartError {
    fn should_report(&self) -> bool {
        matches!(self, Self::Reconciliation(_) | Self::Remote(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_becomes_remote_validation() {
        let err = CartError::from(ApiError::Api {
            status: 400,
            message: "Out of stock".to_string(),
        });
        assert!(matches!(err, CartError::RemoteValidation(ref m) if m == "Out of stock"));
        assert_eq!(err.to_string(), "Out of stock");
    }

    #[test]
    fn test_transport_failure_becomes_connectivity() {
        let err = CartError::from(ApiError::Connectivity("connection refused".to_string()));
        assert!(matches!(err, CartError::Connectivity { .. }));
        assert_eq!(
            err.to_string(),
            "Something went wrong. Check that the backend is running, reachable and returns valid JSON."
        );
    }

    #[test]
    fn test_server_error_becomes_remote() {
        let err = CartError::from(ApiError::Api {
            status: 500,
            message: "boom".to_string(),
        });
        assert!(matches!(err, CartError::Remote(_)));
        assert!(err.should_report());

        let err = CartError::from(ApiError::Parse("eof".to_string()));
        assert!(matches!(err, CartError::Remote(_)));
    }

    #[test]
    fn test_local_refusals() {
        assert!(CartError::Unauthenticated.is_local());
        assert!(
            CartError::DuplicateItem {
                product_id: ProductId::new("p1")
            }
            .is_local()
        );
        assert!(!CartError::RemoteValidation("x".to_string()).is_local());
        assert!(!CartError::Unauthenticated.should_report());
    }
}
