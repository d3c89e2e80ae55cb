//! Catalog records.

use serde::{Deserialize, Serialize};

use crate::types::{Price, ProductId};

/// A purchasable product as listed by the commerce API.
///
/// Catalog records are owned by the remote service and are read-only here.
///
/// ```json
/// {
///     "name": "iPhone XR",
///     "category": "Phones",
///     "cost": 100,
///     "rating": 4,
///     "image": "https://i.imgur.com/lulqWzW.jpg",
///     "_id": "v4sLtEcMpzabRyfx"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Unique product ID.
    #[serde(rename = "_id")]
    pub id: ProductId,
    /// Name or title of the product.
    pub name: String,
    /// Category the product belongs to.
    pub category: String,
    /// Price to buy one unit.
    pub cost: Price,
    /// Aggregate rating, an integer out of five.
    pub rating: u8,
    /// URL of the product image.
    pub image: String,
}

impl Product {
    /// Clamp the rating into the `0..=5` range used for display.
    #[must_use]
    pub fn stars(&self) -> u8 {
        self.rating.min(5)
    }
}

/// Find the first product in `catalog` with the given ID.
pub(crate) fn find<'a>(catalog: &'a [Product], id: &ProductId) -> Option<&'a Product> {
    catalog.iter().find(|product| product.id == *id)
}
