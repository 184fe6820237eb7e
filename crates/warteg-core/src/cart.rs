//! # Cart Aggregator
//!
//! The order list of a single POS session.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Cashier Action            Method                 Cart Change           │
//! │  ──────────────            ──────                 ───────────           │
//! │                                                                         │
//! │  Click product (new) ────► add_item() ─────────► lines.push(qty = 1)   │
//! │                                                                         │
//! │  Click product (again) ──► add_item() ─────────► lines[i].qty += 1     │
//! │                                                                         │
//! │  Click remove ───────────► remove_item() ──────► lines.retain(..)      │
//! │                                                                         │
//! │  Press save ─────────────► to_batch() ─────────► (read only)           │
//! │                              │                                          │
//! │                              └─ on server ack ─► clear()               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - `product_id` is unique across lines (repeat adds merge)
//! - `quantity >= 1` for every line (adds only increment)
//! - `line_total == unit_price × quantity`, computed on read
//! - `grand_total == Σ line_total`, computed on read, never cached
//!
//! Submission itself needs the network and lives with the POS screen; this
//! module only produces the batch and clears the lines once told to.

use serde::Serialize;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{CreatePenjualan, PenjualanItem, Produk};
use crate::validation::{Validate, ValidationResult};

// =============================================================================
// Product Reference
// =============================================================================

/// Snapshot of a product taken at the moment it is added.
///
/// Later catalog edits do not reach an open cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRef {
    pub product_id: String,
    pub name: String,
    pub unit_price: Money,
}

impl From<&Produk> for ProductRef {
    fn from(produk: &Produk) -> Self {
        ProductRef {
            product_id: produk.produk_id.clone(),
            name: produk.nama_produk.clone(),
            unit_price: produk.price(),
        }
    }
}

// =============================================================================
// Order Line
// =============================================================================

/// One product in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    product_id: String,
    name: String,
    unit_price: Money,
    quantity: i64,
}

impl OrderLine {
    pub fn product_id(&self) -> &str {
        &self.product_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    /// Unit price × quantity.
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }

    fn to_item(&self) -> PenjualanItem {
        PenjualanItem {
            produk_id: self.product_id.clone(),
            qty: self.quantity,
            harga: self.unit_price.rupiah(),
            harga_total: self.line_total().rupiah(),
        }
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The in-memory order list. Insertion order is display order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    lines: Vec<OrderLine>,
}

impl Cart {
    /// Creates an empty cart.
    pub fn new() -> Self {
        Cart { lines: Vec::new() }
    }

    /// Adds one unit of a product.
    ///
    /// ## Behavior
    /// - Product already in cart: quantity += 1
    /// - Otherwise: appends a line with quantity 1
    ///
    /// The name and price of the first add are kept for the line's lifetime.
    ///
    /// ## Errors
    /// [`ValidationError::Negative`] if `unit_price < 0`.
    pub fn add_item(
        &mut self,
        product_id: impl Into<String>,
        name: impl Into<String>,
        unit_price: Money,
    ) -> ValidationResult<()> {
        if unit_price.is_negative() {
            return Err(ValidationError::Negative {
                field: "unitPrice".to_string(),
            });
        }

        let product_id = product_id.into();
        if let Some(line) = self.lines.iter_mut().find(|l| l.product_id == product_id) {
            line.quantity = line.quantity.saturating_add(1);
            return Ok(());
        }

        self.lines.push(OrderLine {
            product_id,
            name: name.into(),
            unit_price,
            quantity: 1,
        });
        Ok(())
    }

    /// Adds one unit from a product snapshot.
    pub fn add_product(&mut self, product: ProductRef) -> ValidationResult<()> {
        self.add_item(product.product_id, product.name, product.unit_price)
    }

    /// Removes the line for `product_id`. Absent ids are a no-op.
    pub fn remove_item(&mut self, product_id: &str) -> Option<OrderLine> {
        let index = self.lines.iter().position(|l| l.product_id == product_id)?;
        Some(self.lines.remove(index))
    }

    /// Σ line totals.
    pub fn grand_total(&self) -> Money {
        self.lines.iter().map(OrderLine::line_total).sum()
    }

    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    pub fn line(&self, product_id: &str) -> Option<&OrderLine> {
        self.lines.iter().find(|l| l.product_id == product_id)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct products.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Projects every line into one validated batch create body.
    ///
    /// ## Errors
    /// - [`CoreError::EmptyOrder`] when there are no lines
    /// - [`CoreError::Validation`] when a line total is out of range
    pub fn to_batch(&self) -> CoreResult<CreatePenjualan> {
        if self.lines.is_empty() {
            return Err(CoreError::EmptyOrder);
        }
        let batch = CreatePenjualan {
            items: self.lines.iter().map(OrderLine::to_item).collect(),
        };
        batch.validate()?;
        Ok(batch)
    }

    /// Drops every line. Called once the server acknowledged the batch.
    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

/// Cart totals summary for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub line_count: usize,
    pub total_quantity: i64,
    pub grand_total: Money,
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        CartTotals {
            line_count: cart.len(),
            total_quantity: cart.total_quantity(),
            grand_total: cart.grand_total(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rp(v: i64) -> Money {
        Money::from_rupiah(v)
    }

    fn summary(cart: &Cart) -> Vec<(&str, i64, i64)> {
        cart.lines()
            .iter()
            .map(|l| (l.product_id(), l.quantity(), l.line_total().rupiah()))
            .collect()
    }

    #[test]
    fn test_repeat_add_merges_and_remove_updates_total() {
        let mut cart = Cart::new();
        cart.add_item("p1", "Nasi", rp(5000)).unwrap();
        cart.add_item("p1", "Nasi", rp(5000)).unwrap();
        cart.add_item("p2", "Teh", rp(3000)).unwrap();

        assert_eq!(summary(&cart), vec![("p1", 2, 10000), ("p2", 1, 3000)]);
        assert_eq!(cart.grand_total(), rp(13000));

        cart.remove_item("p2");
        assert_eq!(summary(&cart), vec![("p1", 2, 10000)]);
        assert_eq!(cart.grand_total(), rp(10000));
    }

    #[test]
    fn test_one_line_per_distinct_product() {
        let mut cart = Cart::new();
        let adds = ["a", "b", "a", "c", "a", "b"];
        for id in adds {
            cart.add_item(id, id, rp(100)).unwrap();
        }

        assert_eq!(cart.len(), 3);
        for id in ["a", "b", "c"] {
            let expected = adds.iter().filter(|x| **x == id).count() as i64;
            assert_eq!(cart.line(id).unwrap().quantity(), expected);
        }
        // Insertion order is kept.
        let order: Vec<_> = cart.lines().iter().map(|l| l.product_id()).collect();
        assert_eq!(order, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_grand_total_tracks_interleaving() {
        let mut cart = Cart::new();
        cart.add_item("a", "A", rp(1500)).unwrap();
        cart.add_item("b", "B", rp(2500)).unwrap();
        cart.add_item("a", "A", rp(1500)).unwrap();
        cart.remove_item("b");
        cart.add_item("c", "C", rp(0)).unwrap();
        cart.add_item("b", "B", rp(2500)).unwrap();

        let expected: i64 = cart
            .lines()
            .iter()
            .map(|l| l.unit_price().rupiah() * l.quantity())
            .sum();
        assert_eq!(cart.grand_total().rupiah(), expected);
        assert_eq!(expected, 5500);
    }

    #[test]
    fn test_first_snapshot_wins() {
        let mut cart = Cart::new();
        cart.add_item("p1", "Nasi", rp(5000)).unwrap();
        cart.add_item("p1", "Nasi Baru", rp(7000)).unwrap();

        let line = cart.line("p1").unwrap();
        assert_eq!(line.name(), "Nasi");
        assert_eq!(line.unit_price(), rp(5000));
        assert_eq!(line.line_total(), rp(10000));
    }

    #[test]
    fn test_negative_price_rejected() {
        let mut cart = Cart::new();
        let err = cart.add_item("p1", "Nasi", rp(-1)).unwrap_err();
        assert!(matches!(err, ValidationError::Negative { .. }));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut cart = Cart::new();
        cart.add_item("p1", "Nasi", rp(5000)).unwrap();

        assert!(cart.remove_item("p1").is_some());
        assert!(cart.remove_item("p1").is_none());
        assert!(cart.remove_item("missing").is_none());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_empty_cart_has_no_batch() {
        let mut cart = Cart::new();
        assert!(matches!(cart.to_batch(), Err(CoreError::EmptyOrder)));

        cart.add_item("p1", "Nasi", rp(5000)).unwrap();
        cart.remove_item("p1");
        assert!(matches!(cart.to_batch(), Err(CoreError::EmptyOrder)));
    }

    #[test]
    fn test_batch_projects_each_line() {
        let mut cart = Cart::new();
        cart.add_item("p1", "Nasi", rp(5000)).unwrap();
        cart.add_item("p1", "Nasi", rp(5000)).unwrap();
        cart.add_item("p2", "Teh", rp(3000)).unwrap();

        let batch = cart.to_batch().unwrap();
        assert_eq!(
            batch.items,
            vec![
                PenjualanItem { produk_id: "p1".into(), qty: 2, harga: 5000, harga_total: 10000 },
                PenjualanItem { produk_id: "p2".into(), qty: 1, harga: 3000, harga_total: 3000 },
            ]
        );
        // Building the batch does not consume the cart.
        assert_eq!(cart.len(), 2);
    }

    #[test]
    fn test_overflowing_line_blocks_batch() {
        let mut cart = Cart::new();
        cart.add_item("p1", "Nasi", rp(i64::MAX)).unwrap();
        cart.add_item("p1", "Nasi", rp(i64::MAX)).unwrap();
        cart.add_item("p2", "Teh", rp(3000)).unwrap();

        assert_eq!(cart.grand_total(), rp(i64::MAX));
        assert!(matches!(
            cart.to_batch(),
            Err(CoreError::Validation(ValidationError::Inconsistent { .. }))
        ));
    }

    #[test]
    fn test_totals_summary() {
        let mut cart = Cart::new();
        cart.add_product(ProductRef {
            product_id: "p1".into(),
            name: "Nasi".into(),
            unit_price: rp(5000),
        })
        .unwrap();
        cart.add_item("p1", "Nasi", rp(5000)).unwrap();

        let totals = CartTotals::from(&cart);
        assert_eq!(totals.line_count, 1);
        assert_eq!(totals.total_quantity, 2);
        assert_eq!(totals.grand_total, rp(10000));

        cart.clear();
        assert_eq!(CartTotals::from(&cart).grand_total, Money::zero());
    }
}
