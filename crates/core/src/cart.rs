//! Cart records and reconciliation against the catalog.
//!
//! The commerce API stores a cart as a compact list of `{productId, qty}`
//! pairs. Rendering needs the full product data, so every time either the
//! catalog or the cart changes the two are joined into a [`CartView`].
//!
//! Reconciliation is a pure function of its inputs: nothing here is cached
//! or mutated in place, and the server's record list is always the source of
//! truth.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::product::{self, Product};
use crate::types::{Price, ProductId};

// =============================================================================
// Types
// =============================================================================

/// Server-side cart entry: a product ID and a quantity.
///
/// A quantity of zero means the product is not in the cart. The server omits
/// such entries, but they are tolerated (and dropped) during reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartRecord {
    /// ID of the product in the cart.
    #[serde(rename = "productId")]
    pub product_id: ProductId,
    /// Number of units in the cart.
    pub qty: u32,
}

impl CartRecord {
    /// Create a new cart record.
    #[must_use]
    pub fn new(product_id: impl Into<ProductId>, qty: u32) -> Self {
        Self {
            product_id: product_id.into(),
            qty,
        }
    }
}

/// A catalog product joined with its cart quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartItem {
    /// Full catalog record.
    #[serde(flatten)]
    pub product: Product,
    /// Number of units in the cart.
    pub qty: u32,
}

impl CartItem {
    /// Cost of this line (`qty × cost`).
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.cost.times(self.qty)
    }
}

/// Render-ready cart: ordered items plus aggregate totals.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct CartView {
    /// Items in the order the server listed them.
    pub items: Vec<CartItem>,
    /// Sum of all quantities.
    pub total_quantity: u64,
    /// Sum of `qty × cost` over all items.
    pub total_value: Price,
}

impl CartView {
    /// Build a view from already-joined items, computing the totals.
    #[must_use]
    pub fn from_items(items: Vec<CartItem>) -> Self {
        let total_quantity = total_quantity(&items);
        let total_value = total_value(&items);
        Self {
            items,
            total_quantity,
            total_value,
        }
    }

    /// Returns `true` if the cart has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up the item for a product, if it is in the cart.
    #[must_use]
    pub fn item(&self, product_id: &ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| item.product.id == *product_id)
    }
}

/// Result of a lenient reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LenientCartView {
    /// View built from the records that matched the catalog.
    pub view: CartView,
    /// IDs referenced by the cart but missing from the catalog, in cart order.
    pub unknown: Vec<ProductId>,
}

/// Reconciliation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReconciliationError {
    /// A cart record references a product that is not in the catalog.
    #[error("Cart references unknown product: {product_id}")]
    UnknownProduct {
        /// The ID that could not be resolved.
        product_id: ProductId,
    },
}

// =============================================================================
// Reconciliation
// =============================================================================

/// Join cart records with the catalog.
///
/// Items keep the order of `records`. Zero-quantity records are dropped.
///
/// # Errors
///
/// Returns `ReconciliationError::UnknownProduct` for the first record whose
/// product is not in `catalog`. Nothing is returned for the records that did
/// resolve; use [`join_cart_with_catalog_lenient`] to render a partial cart.
pub fn join_cart_with_catalog(
    records: &[CartRecord],
    catalog: &[Product],
) -> Result<CartView, ReconciliationError> {
    let items = records
        .iter()
        .filter(|record| record.qty > 0)
        .map(|record| {
            product::find(catalog, &record.product_id)
                .map(|product| CartItem {
                    product: product.clone(),
                    qty: record.qty,
                })
                .ok_or_else(|| ReconciliationError::UnknownProduct {
                    product_id: record.product_id.clone(),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CartView::from_items(items))
}

/// Join cart records with the catalog, skipping records with unknown products.
///
/// The skipped IDs are reported in [`LenientCartView::unknown`] so the caller
/// can still surface the inconsistency.
#[must_use]
pub fn join_cart_with_catalog_lenient(
    records: &[CartRecord],
    catalog: &[Product],
) -> LenientCartView {
    let mut items = Vec::with_capacity(records.len());
    let mut unknown = Vec::new();

    for record in records.iter().filter(|record| record.qty > 0) {
        match product::find(catalog, &record.product_id) {
            Some(product) => items.push(CartItem {
                product: product.clone(),
                qty: record.qty,
            }),
            None => unknown.push(record.product_id.clone()),
        }
    }

    LenientCartView {
        view: CartView::from_items(items),
        unknown,
    }
}

// =============================================================================
// Aggregates
// =============================================================================

/// Total value of the cart: the sum of `qty × cost` over `items`.
///
/// Returns zero for an empty slice.
#[must_use]
pub fn total_value(items: &[CartItem]) -> Price {
    items.iter().map(CartItem::line_total).sum()
}

/// Total number of units in the cart.
///
/// Returns zero for an empty slice.
#[must_use]
pub fn total_quantity(items: &[CartItem]) -> u64 {
    items
        .iter()
        .fold(0_u64, |total, item| total.saturating_add(u64::from(item.qty)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn product(id: &str, cost: u64) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            category: "Test".to_string(),
            cost: Price::from_units(cost),
            rating: 4,
            image: format!("https://img.example/{id}.jpg"),
        }
    }

    #[test]
    fn test_empty_records_give_empty_view() {
        let catalog = vec![product("p1", 100)];
        let view = join_cart_with_catalog(&[], &catalog).unwrap();

        assert!(view.is_empty());
        assert_eq!(view.total_quantity, 0);
        assert_eq!(view.total_value, Price::ZERO);
        assert_eq!(total_value(&view.items), Price::ZERO);
        assert_eq!(total_quantity(&view.items), 0);
    }

    #[test]
    fn test_empty_records_with_empty_catalog() {
        let view = join_cart_with_catalog(&[], &[]).unwrap();
        assert_eq!(view, CartView::default());
    }

    #[test]
    fn test_single_item_totals() {
        let catalog = vec![product("p1", 100)];
        let records = vec![CartRecord::new("p1", 2)];

        let view = join_cart_with_catalog(&records, &catalog).unwrap();

        assert_eq!(view.total_value, Price::from_units(200));
        assert_eq!(view.total_quantity, 2);
        assert_eq!(view.items.len(), 1);
        assert_eq!(view.items[0].product.name, "Product p1");
    }

    #[test]
    fn test_join_preserves_record_order() {
        let catalog = vec![product("A", 10), product("B", 20)];
        let records = vec![CartRecord::new("B", 2), CartRecord::new("A", 1)];

        let view = join_cart_with_catalog(&records, &catalog).unwrap();
        let ids: Vec<&str> = view.items.iter().map(|i| i.product.id.as_str()).collect();

        assert_eq!(ids, vec!["B", "A"]);
        assert_eq!(view.items[0].qty, 2);
        assert_eq!(view.items[1].qty, 1);
    }

    #[test]
    fn test_totals_are_exact_sums() {
        let catalog = vec![
            product("a", 100),
            product("b", 35),
            Product {
                cost: Price::new(Decimal::new(1999, 2)).unwrap(),
                ..product("c", 0)
            },
        ];
        let records = vec![
            CartRecord::new("a", 3),
            CartRecord::new("b", 1),
            CartRecord::new("c", 2),
        ];

        let view = join_cart_with_catalog(&records, &catalog).unwrap();

        // 300 + 35 + 39.98
        assert_eq!(view.total_value.amount(), Decimal::new(37498, 2));
        assert_eq!(view.total_quantity, 6);
    }

    #[test]
    fn test_unknown_product_is_an_error() {
        let catalog = vec![product("p1", 100)];
        let records = vec![CartRecord::new("p1", 1), CartRecord::new("ghost", 1)];

        let err = join_cart_with_catalog(&records, &catalog).unwrap_err();

        assert_eq!(
            err,
            ReconciliationError::UnknownProduct {
                product_id: ProductId::new("ghost")
            }
        );
        assert_eq!(err.to_string(), "Cart references unknown product: ghost");
    }

    #[test]
    fn test_lenient_join_reports_unknown_products() {
        let catalog = vec![product("p1", 100)];
        let records = vec![
            CartRecord::new("ghost", 1),
            CartRecord::new("p1", 2),
            CartRecord::new("phantom", 4),
        ];

        let lenient = join_cart_with_catalog_lenient(&records, &catalog);

        assert_eq!(lenient.view.items.len(), 1);
        assert_eq!(lenient.view.total_value, Price::from_units(200));
        assert_eq!(
            lenient.unknown,
            vec![ProductId::new("ghost"), ProductId::new("phantom")]
        );
    }

    #[test]
    fn test_zero_quantity_records_are_dropped() {
        let catalog = vec![product("p1", 100), product("p2", 50)];
        let records = vec![CartRecord::new("p1", 0), CartRecord::new("p2", 1)];

        let view = join_cart_with_catalog(&records, &catalog).unwrap();

        assert_eq!(view.items.len(), 1);
        assert!(view.item(&ProductId::new("p1")).is_none());
        assert_eq!(view.total_value, Price::from_units(50));
    }

    #[test]
    fn test_zero_quantity_unknown_product_is_not_an_error() {
        let records = vec![CartRecord::new("gone", 0)];
        assert!(join_cart_with_catalog(&records, &[]).unwrap().is_empty());
    }

    #[test]
    fn test_duplicate_catalog_ids_use_first_match() {
        let catalog = vec![product("p1", 100), product("p1", 999)];
        let records = vec![CartRecord::new("p1", 1)];

        let view = join_cart_with_catalog(&records, &catalog).unwrap();
        assert_eq!(view.total_value, Price::from_units(100));
    }

    #[test]
    fn test_cart_record_wire_format() {
        let records: Vec<CartRecord> =
            serde_json::from_str(r#"[{"productId":"KCRwjF7lN97HnEaY","qty":3}]"#).unwrap();
        assert_eq!(records, vec![CartRecord::new("KCRwjF7lN97HnEaY", 3)]);
    }
}
