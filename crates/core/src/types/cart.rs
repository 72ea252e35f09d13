//! Cart and line item types.
//!
//! The cart is an insertion-ordered map from product ID to line item, so
//! repeated adds of the same product bump a counter instead of growing a
//! list, and lookups never scan.
//!
//! # Serialized form
//!
//! A cart serializes as a JSON array of `{ "product": ..., "quantity": n }`
//! entries in insertion order. Deserializing merges duplicate product IDs
//! (first position wins, quantities add) and drops zero-quantity entries.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize, Serializer};

use super::id::ProductId;
use super::price::Price;
use super::product::Product;

/// A product in the cart with its quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// The product as it was when first added.
    pub product: Product,
    /// Number of units; always at least 1 inside a [`Cart`].
    pub quantity: u32,
}

impl LineItem {
    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price.times(self.quantity)
    }
}

/// A shopping cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "Vec<LineItem>")]
pub struct Cart {
    lines: IndexMap<ProductId, LineItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cart from line items, merging duplicates and dropping empty lines.
    #[must_use]
    pub fn from_line_items(items: impl IntoIterator<Item = LineItem>) -> Self {
        let mut lines: IndexMap<ProductId, LineItem> = IndexMap::new();
        for item in items.into_iter().filter(|item| item.quantity > 0) {
            lines
                .entry(item.product.id)
                .and_modify(|existing| {
                    existing.quantity = existing.quantity.saturating_add(item.quantity);
                })
                .or_insert(item);
        }
        Self { lines }
    }

    /// Add one unit of `product`.
    ///
    /// Increments the quantity if the product is already in the cart,
    /// otherwise appends a new line with quantity 1. Returns the new quantity.
    pub fn add(&mut self, product: Product) -> u32 {
        let line = self
            .lines
            .entry(product.id)
            .and_modify(|line| line.quantity = line.quantity.saturating_add(1))
            .or_insert(LineItem {
                product,
                quantity: 1,
            });
        line.quantity
    }

    /// Remove the line for `product_id`, preserving the order of the rest.
    ///
    /// Returns the removed line, or `None` if the product was not in the cart.
    pub fn remove(&mut self, product_id: ProductId) -> Option<LineItem> {
        self.lines.shift_remove(&product_id)
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Whether a line exists for `product_id`.
    #[must_use]
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.lines.contains_key(&product_id)
    }

    /// Quantity of `product_id` in the cart (0 if absent).
    #[must_use]
    pub fn quantity_of(&self, product_id: ProductId) -> u32 {
        self.lines.get(&product_id).map_or(0, |line| line.quantity)
    }

    /// Line items in insertion order.
    pub fn line_items(&self) -> impl ExactSizeIterator<Item = &LineItem> {
        self.lines.values()
    }

    /// Number of distinct products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines
            .values()
            .fold(0u32, |acc, line| acc.saturating_add(line.quantity))
    }

    /// Exact sum of `price * quantity` over all lines, computed fresh.
    #[must_use]
    pub fn grand_total(&self) -> Price {
        self.lines.values().map(LineItem::line_total).sum()
    }

    /// Snapshot for rendering.
    #[must_use]
    pub fn summary(&self) -> CartSummary {
        CartSummary {
            lines: self.lines.values().map(LineSummary::from).collect(),
            grand_total: self.grand_total(),
            item_count: self.item_count(),
        }
    }
}

impl From<Vec<LineItem>> for Cart {
    fn from(items: Vec<LineItem>) -> Self {
        Self::from_line_items(items)
    }
}

impl Serialize for Cart {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.lines.values())
    }
}

/// A rendered view of one cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineSummary {
    pub product_id: ProductId,
    pub title: String,
    pub image: String,
    pub unit_price: Price,
    pub quantity: u32,
    pub line_total: Price,
}

impl From<&LineItem> for LineSummary {
    fn from(item: &LineItem) -> Self {
        Self {
            product_id: item.product.id,
            title: item.product.title.clone(),
            image: item.product.image.clone(),
            unit_price: item.product.price,
            quantity: item.quantity,
            line_total: item.line_total(),
        }
    }
}

/// Cart state delivered to change listeners.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CartSummary {
    /// Lines in insertion order.
    pub lines: Vec<LineSummary>,
    /// Exact grand total.
    pub grand_total: Price,
    /// Total units across all lines.
    pub item_count: u32,
}

impl CartSummary {
    /// Whether the summary has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use rust_decimal::Decimal;

    use super::*;

    fn product(id: i64, title: &str, price: &str) -> Product {
        Product {
            id: ProductId::new(id),
            title: title.to_string(),
            price: Price::new(Decimal::from_str(price).unwrap()).unwrap(),
            image: format!("https://example.test/{id}.jpg"),
            category: None,
        }
    }

    fn shirt() -> Product {
        product(1, "Shirt", "19.99")
    }

    fn hat() -> Product {
        product(2, "Hat", "9.50")
    }

    fn quantities(cart: &Cart) -> Vec<(i64, u32)> {
        cart.line_items()
            .map(|line| (line.product.id.as_i64(), line.quantity))
            .collect()
    }

    #[test]
    fn test_repeated_add_aggregates_into_one_line() {
        let mut cart = Cart::new();
        for expected in 1..=5 {
            assert_eq!(cart.add(shirt()), expected);
        }
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.quantity_of(ProductId::new(1)), 5);
    }

    #[test]
    fn test_worked_example() {
        let mut cart = Cart::new();
        cart.add(shirt());
        cart.add(shirt());
        cart.add(hat());
        assert_eq!(quantities(&cart), vec![(1, 2), (2, 1)]);
        assert_eq!(cart.grand_total().to_string(), "$49.48");

        assert!(cart.remove(ProductId::new(2)).is_some());
        assert_eq!(quantities(&cart), vec![(1, 2)]);
        assert_eq!(cart.grand_total().to_string(), "$39.98");

        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.grand_total(), Price::ZERO);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut cart = Cart::new();
        cart.add(shirt());
        let before = cart.clone();
        assert!(cart.remove(ProductId::new(99)).is_none());
        assert_eq!(cart, before);
    }

    #[test]
    fn test_remove_preserves_order_of_remaining_lines() {
        let mut cart = Cart::new();
        cart.add(product(1, "A", "1"));
        cart.add(product(2, "B", "1"));
        cart.add(product(3, "C", "1"));
        cart.remove(ProductId::new(2));
        assert_eq!(quantities(&cart), vec![(1, 1), (3, 1)]);
    }

    #[test]
    fn test_readding_after_remove_appends_at_end() {
        let mut cart = Cart::new();
        cart.add(shirt());
        cart.add(hat());
        cart.remove(ProductId::new(1));
        cart.add(shirt());
        assert_eq!(quantities(&cart), vec![(2, 1), (1, 1)]);
    }

    #[test]
    fn test_grand_total_tracks_mutations() {
        let mut cart = Cart::new();
        let cheap = product(3, "Sticker", "0.10");
        for _ in 0..30 {
            cart.add(cheap.clone());
        }
        assert_eq!(cart.grand_total().amount(), Decimal::from(3));
        cart.add(hat());
        assert_eq!(cart.grand_total().to_string(), "$12.50");
    }

    #[test]
    fn test_contains_and_item_count() {
        let mut cart = Cart::new();
        assert!(!cart.contains(ProductId::new(1)));
        cart.add(shirt());
        cart.add(shirt());
        cart.add(hat());
        assert!(cart.contains(ProductId::new(1)));
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn test_serialized_shape() {
        let mut cart = Cart::new();
        cart.add(hat());
        let value = serde_json::to_value(&cart).unwrap();
        assert_eq!(
            value,
            serde_json::json!([{
                "product": {
                    "id": 2,
                    "title": "Hat",
                    "price": 9.5,
                    "image": "https://example.test/2.jpg"
                },
                "quantity": 1
            }])
        );
    }

    #[test]
    fn test_restore_preserves_order_quantities_and_total() {
        let mut cart = Cart::new();
        cart.add(shirt());
        cart.add(shirt());
        cart.add(hat());

        let json = serde_json::to_string(&cart).unwrap();
        let restored: Cart = serde_json::from_str(&json).unwrap();

        assert_eq!(quantities(&restored), vec![(1, 2), (2, 1)]);
        assert_eq!(restored.grand_total(), cart.grand_total());
    }

    #[test]
    fn test_deserialize_merges_duplicates_and_drops_empty_lines() {
        let json = r#"[
            {"product": {"id": 1, "title": "Shirt", "price": 19.99, "image": "a"}, "quantity": 1},
            {"product": {"id": 2, "title": "Hat", "price": 9.5, "image": "b"}, "quantity": 0},
            {"product": {"id": 1, "title": "Shirt", "price": 19.99, "image": "a"}, "quantity": 2}
        ]"#;
        let cart: Cart = serde_json::from_str(json).unwrap();
        assert_eq!(quantities(&cart), vec![(1, 3)]);
    }

    #[test]
    fn test_summary_matches_cart() {
        let mut cart = Cart::new();
        cart.add(shirt());
        cart.add(shirt());
        cart.add(hat());
        let summary = cart.summary();
        assert_eq!(summary.lines.len(), 2);
        assert_eq!(summary.lines[0].line_total.to_string(), "$39.98");
        assert_eq!(summary.item_count, 3);
        assert_eq!(summary.grand_total, cart.grand_total());
    }
}
