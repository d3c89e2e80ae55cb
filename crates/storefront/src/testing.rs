//! In-memory `CommerceApi` used by unit tests.

#![allow(clippy::unwrap_used)]

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use cartlane_core::{CartRecord, Product, ProductId, SessionToken};

use crate::api::{ApiError, CommerceApi};

type Scripted<T> = Mutex<VecDeque<Result<T, ApiError>>>;

/// Scripted fake. Each call pops the next scripted answer; an empty script
/// answers with an empty list.
#[derive(Default)]
pub struct FakeApi {
    products: Vec<Product>,
    cart: Scripted<Vec<CartRecord>>,
    upserts: Scripted<Vec<CartRecord>>,
    searches: Scripted<Vec<Product>>,
    upsert_calls: AtomicUsize,
    get_cart_calls: AtomicUsize,
    last_upsert: Mutex<Option<(String, ProductId, u32)>>,
    search_texts: Mutex<Vec<String>>,
}

impl FakeApi {
    pub fn with_products(mut self, products: Vec<Product>) -> Self {
        self.products = products;
        self
    }

    pub fn with_cart(self, answer: Result<Vec<CartRecord>, ApiError>) -> Self {
        self.cart.lock().unwrap().push_back(answer);
        self
    }

    pub fn with_upsert(self, answer: Result<Vec<CartRecord>, ApiError>) -> Self {
        self.upserts.lock().unwrap().push_back(answer);
        self
    }

    pub fn with_search(self, answer: Result<Vec<Product>, ApiError>) -> Self {
        self.searches.lock().unwrap().push_back(answer);
        self
    }

    pub fn upsert_calls(&self) -> usize {
        self.upsert_calls.load(Ordering::SeqCst)
    }

    pub fn get_cart_calls(&self) -> usize {
        self.get_cart_calls.load(Ordering::SeqCst)
    }

    pub fn last_upsert(&self) -> Option<(String, ProductId, u32)> {
        self.last_upsert.lock().unwrap().clone()
    }

    pub fn search_texts(&self) -> Vec<String> {
        self.search_texts.lock().unwrap().clone()
    }
}

fn next<T: Default>(script: &Scripted<T>) -> Result<T, ApiError> {
    script.lock().unwrap().pop_front().unwrap_or_else(|| Ok(T::default()))
}

impl CommerceApi for FakeApi {
    async fn get_products(&self) -> Result<Vec<Product>, ApiError> {
        Ok(self.products.clone())
    }

    async fn search_products(&self, text: &str) -> Result<Vec<Product>, ApiError> {
        self.search_texts.lock().unwrap().push(text.to_string());
        next(&self.searches)
    }

    async fn get_cart(&self, _token: &SessionToken) -> Result<Vec<CartRecord>, ApiError> {
        self.get_cart_calls.fetch_add(1, Ordering::SeqCst);
        next(&self.cart)
    }

    async fn upsert_cart_item(
        &self,
        token: &SessionToken,
        product_id: &ProductId,
        qty: u32,
    ) -> Result<Vec<CartRecord>, ApiError> {
        self.upsert_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_upsert.lock().unwrap() =
            Some((token.expose().to_string(), product_id.clone(), qty));
        next(&self.upserts)
    }
}

/// A catalog product with the given id and cost.
pub fn product(id: &str, cost: u64) -> Product {
    Product {
        id: ProductId::new(id),
        name: format!("Product {id}"),
        category: "Test".to_string(),
        cost: cartlane_core::Price::from_units(cost),
        rating: 3,
        image: format!("https://example.com/{id}.png"),
    }
}
