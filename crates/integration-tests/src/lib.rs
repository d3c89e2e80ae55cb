//! Integration tests for Cartlane.
//!
//! The tests drive the real `reqwest`-based [`StorefrontClient`] against
//! [`MockCommerce`], an in-process commerce API served with `axum` on an
//! ephemeral local port. No external services are needed:
//!
//! ```bash
//! cargo test -p cartlane-integration-tests
//! ```
//!
//! The mock follows the wire contract of the real service: `{success: false,
//! message}` bodies on 4xx, `404` for a search without matches, and the full
//! cart returned from every `POST /cart`.

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use cartlane_core::{CartRecord, Price, Product, ProductId, SessionToken};
use cartlane_storefront::api::{CartUpsertRequest, Credentials, StorefrontClient};
use cartlane_storefront::config::ApiConfig;
use cartlane_storefront::session::Session;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tokio::task::JoinHandle;
use url::Url;

/// Username seeded into every mock.
pub const TEST_USERNAME: &str = "crio.do";

/// Password of [`TEST_USERNAME`].
pub const TEST_PASSWORD: &str = "learnwithcrio";

/// Wallet balance returned at login.
pub const TEST_BALANCE: u32 = 5000;

// =============================================================================
// Catalog fixture
// =============================================================================

/// The catalog every mock starts with.
#[must_use]
pub fn catalog() -> Vec<Product> {
    vec![
        product("KCRwjF7lN97HnEaY", "UNIQLO Men Slim Fit Shirt", "Fashion", 50, 4),
        product("BW0jAAeDJmlZCF8i", "YONEX Smash Badminton Racquet", "Sports", 100, 5),
        product("PmInA797xJhMIPti", "Tan Leatherette Weekender Duffle", "Fashion", 150, 4),
        product("upLK9JbQ4rMhTwt4", "OnePlus Nord 5G", "Phones", 320, 5),
        product("v4sLtEcMpzabRyfx", "iPhone XR", "Phones", 699, 4),
    ]
}

fn product(id: &str, name: &str, category: &str, cost: u64, rating: u8) -> Product {
    Product {
        id: ProductId::new(id),
        name: name.to_string(),
        category: category.to_string(),
        cost: Price::from_units(cost),
        rating,
        image: format!("https://crio-directus-assets.s3.ap-south-1.amazonaws.com/{id}.png"),
    }
}

/// Token the mock issues for `username`.
#[must_use]
pub fn token_for(username: &str) -> SessionToken {
    SessionToken::new(format!("token-{username}"))
}

/// A session for [`TEST_USERNAME`] as produced by a successful login.
#[must_use]
pub fn logged_in_session() -> Session {
    Session::authenticated(
        token_for(TEST_USERNAME),
        TEST_USERNAME.to_string(),
        Decimal::from(TEST_BALANCE),
    )
}

/// Build a client for `endpoint` with default timeouts.
///
/// # Panics
///
/// Panics if the HTTP client cannot be built.
#[must_use]
pub fn client_for(endpoint: Url) -> StorefrontClient {
    StorefrontClient::new(&ApiConfig::new(endpoint)).expect("Failed to build storefront client")
}

/// An endpoint on a local port nothing listens on.
///
/// # Panics
///
/// Panics if no local port can be reserved.
pub async fn unreachable_endpoint() -> Url {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to reserve a local port");
    let addr = listener.local_addr().expect("Failed to read local address");
    drop(listener);
    api_url(addr)
}

fn api_url(addr: SocketAddr) -> Url {
    Url::parse(&format!("http://{addr}/api/v1")).expect("Local address is a valid URL")
}

// =============================================================================
// Mock server
// =============================================================================

#[derive(Default)]
struct MockState {
    products: Vec<Product>,
    users: BTreeMap<String, String>,
    carts: BTreeMap<String, Vec<CartRecord>>,
    stock: BTreeMap<ProductId, u32>,
    fail_cart_writes: bool,
    hits: BTreeMap<&'static str, usize>,
}

impl MockState {
    fn hit(&mut self, route: &'static str) {
        *self.hits.entry(route).or_default() += 1;
    }

    fn user_for(&self, headers: &HeaderMap) -> Option<String> {
        let username = headers
            .get(header::AUTHORIZATION)?
            .to_str()
            .ok()?
            .strip_prefix("Bearer ")?
            .strip_prefix("token-")?;
        self.users
            .contains_key(username)
            .then(|| username.to_string())
    }
}

type Shared = Arc<Mutex<MockState>>;

fn lock(state: &Shared) -> MutexGuard<'_, MockState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// In-process commerce API.
///
/// The server task is aborted when the mock is dropped.
pub struct MockCommerce {
    addr: SocketAddr,
    state: Shared,
    server: JoinHandle<()>,
}

impl MockCommerce {
    /// Start a mock with [`catalog`] and the [`TEST_USERNAME`] account.
    ///
    /// # Panics
    ///
    /// Panics if the server cannot bind a local port.
    pub async fn start() -> Self {
        let state = Arc::new(Mutex::new(MockState {
            products: catalog(),
            users: BTreeMap::from([(TEST_USERNAME.to_string(), TEST_PASSWORD.to_string())]),
            ..MockState::default()
        }));

        let app = Router::new()
            .route("/api/v1/products", get(list_products))
            .route("/api/v1/products/search", get(search_products))
            .route("/api/v1/cart", get(get_cart).post(upsert_cart))
            .route("/api/v1/auth/login", post(login))
            .route("/api/v1/auth/register", post(register))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock commerce API");
        let addr = listener.local_addr().expect("Failed to read local address");
        let server = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            addr,
            state,
            server,
        }
    }

    /// Base URL of the mock API.
    #[must_use]
    pub fn endpoint(&self) -> Url {
        api_url(self.addr)
    }

    /// A client pointed at this mock.
    #[must_use]
    pub fn client(&self) -> StorefrontClient {
        client_for(self.endpoint())
    }

    /// Replace the server-side cart of `username`.
    pub fn seed_cart(&self, username: &str, records: Vec<CartRecord>) {
        lock(&self.state).carts.insert(username.to_string(), records);
    }

    /// Current server-side cart of `username`.
    #[must_use]
    pub fn cart_of(&self, username: &str) -> Vec<CartRecord> {
        lock(&self.state)
            .carts
            .get(username)
            .cloned()
            .unwrap_or_default()
    }

    /// Limit the quantity of `product_id` a cart may hold.
    pub fn set_stock(&self, product_id: &str, qty: u32) {
        lock(&self.state).stock.insert(ProductId::new(product_id), qty);
    }

    /// Remove a product from the catalog without touching carts.
    pub fn delist(&self, product_id: &str) {
        lock(&self.state).products.retain(|p| p.id != product_id);
    }

    /// Make every `POST /cart` answer 500 with an HTML body.
    pub fn fail_cart_writes(&self) {
        lock(&self.state).fail_cart_writes = true;
    }

    /// Number of requests served for `route` (`products`, `search`,
    /// `get_cart`, `post_cart`, `login`, `register`).
    #[must_use]
    pub fn hits(&self, route: &str) -> usize {
        lock(&self.state).hits.get(route).copied().unwrap_or_default()
    }
}

impl Drop for MockCommerce {
    fn drop(&mut self) {
        self.server.abort();
    }
}

// =============================================================================
// Handlers
// =============================================================================

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "success": false, "message": message }))).into_response()
}

fn unauthorized() -> Response {
    error(
        StatusCode::UNAUTHORIZED,
        "Protected route, Oauth2 Bearer token not found",
    )
}

async fn list_products(State(state): State<Shared>) -> Json<Vec<Product>> {
    let mut state = lock(&state);
    state.hit("products");
    Json(state.products.clone())
}

#[derive(Deserialize)]
struct SearchParams {
    #[serde(default)]
    value: String,
}

async fn search_products(
    State(state): State<Shared>,
    Query(params): Query<SearchParams>,
) -> Response {
    let mut state = lock(&state);
    state.hit("search");

    let needle = params.value.to_lowercase();
    let matches: Vec<Product> = state
        .products
        .iter()
        .filter(|p| {
            p.name.to_lowercase().contains(&needle) || p.category.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect();

    if matches.is_empty() {
        return (StatusCode::NOT_FOUND, Json(matches)).into_response();
    }
    Json(matches).into_response()
}

async fn get_cart(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let mut state = lock(&state);
    state.hit("get_cart");

    let Some(username) = state.user_for(&headers) else {
        return unauthorized();
    };
    Json(state.carts.get(&username).cloned().unwrap_or_default()).into_response()
}

async fn upsert_cart(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<CartUpsertRequest>,
) -> Response {
    let mut state = lock(&state);
    state.hit("post_cart");

    let Some(username) = state.user_for(&headers) else {
        return unauthorized();
    };
    if state.fail_cart_writes {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            "<html><body>Internal Server Error</body></html>",
        )
            .into_response();
    }
    if !state.products.iter().any(|p| p.id == body.product_id) {
        return error(StatusCode::BAD_REQUEST, "Product doesn't exist");
    }
    if state
        .stock
        .get(&body.product_id)
        .is_some_and(|stock| body.qty > *stock)
    {
        return error(StatusCode::BAD_REQUEST, "Out of stock");
    }

    let cart = state.carts.entry(username).or_default();
    match cart.iter().position(|r| r.product_id == body.product_id) {
        Some(index) if body.qty == 0 => {
            cart.remove(index);
        }
        Some(index) => {
            if let Some(record) = cart.get_mut(index) {
                record.qty = body.qty;
            }
        }
        None if body.qty > 0 => cart.push(CartRecord::new(body.product_id, body.qty)),
        None => {}
    }
    Json(cart.clone()).into_response()
}

async fn login(State(state): State<Shared>, Json(body): Json<Credentials>) -> Response {
    let mut state = lock(&state);
    state.hit("login");

    match state.users.get(&body.username) {
        None => error(StatusCode::BAD_REQUEST, "Username does not exist"),
        Some(password) if *password != body.password => {
            error(StatusCode::BAD_REQUEST, "Password is incorrect")
        }
        Some(_) => Json(json!({
            "success": true,
            "token": token_for(&body.username).expose(),
            "username": body.username,
            "balance": TEST_BALANCE,
        }))
        .into_response(),
    }
}

async fn register(State(state): State<Shared>, Json(body): Json<Credentials>) -> Response {
    let mut state = lock(&state);
    state.hit("register");

    if state.users.contains_key(&body.username) {
        return error(StatusCode::BAD_REQUEST, "Username is already taken");
    }
    state.users.insert(body.username, body.password);
    (StatusCode::CREATED, Json(json!({ "success": true }))).into_response()
}
