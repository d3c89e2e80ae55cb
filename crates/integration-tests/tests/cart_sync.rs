//! Cart synchronization against the mock commerce API.
//!
//! Covers the full path: `CartSession` -> gateway -> `StorefrontClient` ->
//! HTTP -> mock server, and back through reconciliation.

#![allow(clippy::unwrap_used)]

use cartlane_core::{CartRecord, Price, ProductId};
use cartlane_integration_tests::{
    MockCommerce, TEST_USERNAME, client_for, logged_in_session, unreachable_endpoint,
};
use cartlane_storefront::api::ApiError;
use cartlane_storefront::error::CONNECTIVITY_MESSAGE;
use cartlane_storefront::services::cart::{CartError, CartSession};
use cartlane_storefront::session::Session;

const SHIRT: &str = "KCRwjF7lN97HnEaY";
const RACQUET: &str = "BW0jAAeDJmlZCF8i";
const DUFFLE: &str = "PmInA797xJhMIPti";

// ============================================================================
// Loading
// ============================================================================

#[tokio::test]
async fn test_load_reconciles_server_cart_in_server_order() {
    let mock = MockCommerce::start().await;
    mock.seed_cart(
        TEST_USERNAME,
        vec![CartRecord::new(RACQUET, 2), CartRecord::new(SHIRT, 1)],
    );
    let client = mock.client();

    let cart = CartSession::load(&client, logged_in_session()).await.unwrap();
    let view = cart.view().unwrap();

    let ids: Vec<&str> = view.items.iter().map(|i| i.product.id.as_str()).collect();
    assert_eq!(ids, vec![RACQUET, SHIRT]);
    assert_eq!(view.total_quantity, 3);
    assert_eq!(view.total_value, Price::from_units(250));
}

#[tokio::test]
async fn test_load_without_token_does_not_request_cart() {
    let mock = MockCommerce::start().await;
    let client = mock.client();

    let cart = CartSession::load(&client, Session::anonymous()).await.unwrap();

    assert!(cart.view().unwrap().is_empty());
    assert_eq!(mock.hits("products"), 1);
    assert_eq!(mock.hits("get_cart"), 0);
}

#[tokio::test]
async fn test_cart_with_delisted_product_fails_reconciliation() {
    let mock = MockCommerce::start().await;
    mock.seed_cart(
        TEST_USERNAME,
        vec![CartRecord::new(SHIRT, 1), CartRecord::new(DUFFLE, 1)],
    );
    mock.delist(DUFFLE);
    let client = mock.client();

    let cart = CartSession::load(&client, logged_in_session()).await.unwrap();
    let err = cart.view().unwrap_err();

    assert!(matches!(err, CartError::Reconciliation(_)));
    assert!(err.to_string().contains(DUFFLE));
}

// ============================================================================
// Mutations
// ============================================================================

#[tokio::test]
async fn test_add_then_adjust_quantity() {
    let mock = MockCommerce::start().await;
    let client = mock.client();
    let mut cart = CartSession::load(&client, logged_in_session()).await.unwrap();

    let view = cart.add_to_cart(&ProductId::new(SHIRT)).await.unwrap();
    assert_eq!(view.total_quantity, 1);

    let view = cart.increment(&ProductId::new(SHIRT)).await.unwrap();
    assert_eq!(view.total_quantity, 2);
    assert_eq!(view.total_value, Price::from_units(100));

    let view = cart.set_quantity(&ProductId::new(SHIRT), 5).await.unwrap();
    assert_eq!(view.item(&ProductId::new(SHIRT)).unwrap().qty, 5);

    assert_eq!(mock.cart_of(TEST_USERNAME), vec![CartRecord::new(SHIRT, 5)]);
    assert_eq!(mock.hits("post_cart"), 3);
}

#[tokio::test]
async fn test_repeated_set_quantity_converges_without_coalescing() {
    let mock = MockCommerce::start().await;
    let client = mock.client();
    let mut cart = CartSession::load(&client, logged_in_session()).await.unwrap();

    let first = cart.set_quantity(&ProductId::new(SHIRT), 3).await.unwrap();
    let second = cart.set_quantity(&ProductId::new(SHIRT), 3).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(mock.hits("post_cart"), 2);
    assert_eq!(mock.cart_of(TEST_USERNAME), vec![CartRecord::new(SHIRT, 3)]);
    assert_eq!(cart.records(), &[CartRecord::new(SHIRT, 3)]);
}

#[tokio::test]
async fn test_duplicate_add_sends_nothing() {
    let mock = MockCommerce::start().await;
    mock.seed_cart(TEST_USERNAME, vec![CartRecord::new(SHIRT, 1)]);
    let client = mock.client();
    let mut cart = CartSession::load(&client, logged_in_session()).await.unwrap();

    let err = cart.add_to_cart(&ProductId::new(SHIRT)).await.unwrap_err();

    assert_eq!(
        err.to_string(),
        "Item already in cart. Use the cart sidebar to update quantity or remove item."
    );
    assert_eq!(mock.hits("post_cart"), 0);
}

#[tokio::test]
async fn test_add_without_login_sends_nothing() {
    let mock = MockCommerce::start().await;
    let client = mock.client();
    let mut cart = CartSession::load(&client, Session::anonymous()).await.unwrap();

    let err = cart.add_to_cart(&ProductId::new(SHIRT)).await.unwrap_err();

    assert_eq!(err.to_string(), "Login to add an item to the Cart");
    assert_eq!(mock.hits("post_cart"), 0);
}

#[tokio::test]
async fn test_decrement_to_zero_removes_item() {
    let mock = MockCommerce::start().await;
    mock.seed_cart(
        TEST_USERNAME,
        vec![CartRecord::new(SHIRT, 1), CartRecord::new(RACQUET, 1)],
    );
    let client = mock.client();
    let mut cart = CartSession::load(&client, logged_in_session()).await.unwrap();

    let view = cart.decrement(&ProductId::new(SHIRT)).await.unwrap();

    assert!(view.item(&ProductId::new(SHIRT)).is_none());
    assert_eq!(view.total_quantity, 1);
    assert_eq!(mock.cart_of(TEST_USERNAME), vec![CartRecord::new(RACQUET, 1)]);
}

// ============================================================================
// Failures
// ============================================================================

#[tokio::test]
async fn test_out_of_stock_message_is_verbatim_and_state_unchanged() {
    let mock = MockCommerce::start().await;
    mock.seed_cart(TEST_USERNAME, vec![CartRecord::new(RACQUET, 2)]);
    mock.set_stock(RACQUET, 2);
    let client = mock.client();
    let mut cart = CartSession::load(&client, logged_in_session()).await.unwrap();

    let err = cart.increment(&ProductId::new(RACQUET)).await.unwrap_err();

    assert_eq!(err.to_string(), "Out of stock");
    assert_eq!(cart.records(), &[CartRecord::new(RACQUET, 2)]);
    assert_eq!(mock.cart_of(TEST_USERNAME), vec![CartRecord::new(RACQUET, 2)]);
}

#[tokio::test]
async fn test_server_error_without_body_is_remote_failure() {
    let mock = MockCommerce::start().await;
    mock.fail_cart_writes();
    let client = mock.client();
    let mut cart = CartSession::load(&client, logged_in_session()).await.unwrap();

    let err = cart.add_to_cart(&ProductId::new(SHIRT)).await.unwrap_err();

    match err {
        CartError::Remote(ApiError::Status { status, .. }) => assert_eq!(status, 500),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(cart.records().is_empty());
}

#[tokio::test]
async fn test_unreachable_backend_reports_connectivity_message() {
    let client = client_for(unreachable_endpoint().await);
    let catalog = cartlane_integration_tests::catalog();
    let mut cart = CartSession::from_parts(&client, logged_in_session(), catalog, vec![]);

    let err = cart.add_to_cart(&ProductId::new(SHIRT)).await.unwrap_err();

    assert!(matches!(err, CartError::Connectivity { .. }));
    assert_eq!(err.to_string(), CONNECTIVITY_MESSAGE);
    assert!(cart.records().is_empty());
}

#[tokio::test]
async fn test_expired_token_is_a_validation_error() {
    let mock = MockCommerce::start().await;
    let client = mock.client();
    let session = Session::authenticated(
        cartlane_core::SessionToken::new("token-nobody"),
        "nobody".to_string(),
        rust_decimal::Decimal::ZERO,
    );

    let err = CartSession::load(&client, session).await.unwrap_err();

    assert_eq!(
        err.to_string(),
        "Protected route, Oauth2 Bearer token not found"
    );
}
