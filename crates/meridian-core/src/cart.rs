//! # Cart Store
//!
//! The in-memory cart: ordered lines, the single discount, and every derived
//! total.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart State Operations                                │
//! │                                                                         │
//! │  Surface Action           Operation              Cart State Change      │
//! │  ──────────────           ─────────              ─────────────────      │
//! │                                                                         │
//! │  Scan / tap unit ────────► add_unit() ─────────► quantity += 1 or      │
//! │                                                   new line at qty 1     │
//! │                                                                         │
//! │  Change quantity ────────► set_quantity() ─────► line.qty = n          │
//! │                                                   (n <= 0 removes)      │
//! │                                                                         │
//! │  Tap remove ─────────────► remove_unit() ──────► line deleted          │
//! │                                                                         │
//! │  Pick discount ──────────► set_discount() ─────► replaces previous     │
//! │                                                                         │
//! │  Tap clear ──────────────► clear() ────────────► lines + discount gone │
//! │                                                                         │
//! │  NOTE: every derived value (subtotal, tax, total, item count) is       │
//! │        recomputed from current lines + discount on every read.          │
//! │        Nothing is cached, so nothing can go stale.                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - Lines are unique by unit id (re-adding increments quantity)
//! - Quantity is always ≥ 1 (dropping to 0 removes the line)
//! - Line order is insertion order, for display stability
//! - `total = subtotal − discount_amount + tax_total`, always

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::discount::Discount;
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::SellableUnit;

// =============================================================================
// Cart Line
// =============================================================================

/// One line in the cart: a frozen unit snapshot plus a positive quantity.
///
/// ## Price Freezing
/// The unit snapshot is captured when the line is created. If the catalog
/// price changes afterwards, this line retains the original price.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// The sellable unit snapshot (frozen at add time).
    pub unit: SellableUnit,

    /// Quantity in cart. Always ≥ 1; a line at 0 is removed, never kept.
    pub quantity: i64,

    /// When this line was first added.
    #[ts(as = "String")]
    pub added_at: DateTime<Utc>,
}

impl CartLine {
    fn new(unit: SellableUnit) -> Self {
        CartLine {
            unit,
            quantity: 1,
            added_at: Utc::now(),
        }
    }

    /// Line total before tax (unit price × quantity).
    pub fn line_total(&self) -> Money {
        self.unit.price().multiply_quantity(self.quantity)
    }

    /// GST contribution of this line, computed on the pre-discount line
    /// total. The cart discount does not reduce the taxable base.
    pub fn gst(&self) -> Money {
        self.line_total().gst(self.unit.gst_rate())
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The cart: ordered lines plus at most one discount.
///
/// Created empty on session start; cleared on confirmed checkout success or
/// explicit reset. Single-owner, single-writer - the session that created it
/// is the only mutator.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    lines: Vec<CartLine>,
    discount: Discount,

    /// When the cart was created/last cleared.
    #[ts(as = "String")]
    created_at: DateTime<Utc>,
}

impl Cart {
    /// Creates a new empty cart with no discount.
    pub fn new() -> Self {
        Cart {
            lines: Vec::new(),
            discount: Discount::None,
            created_at: Utc::now(),
        }
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Adds one of the given unit to the cart.
    ///
    /// ## Behavior
    /// - If a line for `unit.id` exists: increments its quantity by 1
    /// - Otherwise: appends a new line at quantity 1
    /// - If the cached stock snapshot is zero: rejects with `OutOfStock`
    ///   and does not mutate
    pub fn add_unit(&mut self, unit: &SellableUnit) -> CoreResult<()> {
        if unit.cached_stock == 0 {
            return Err(CoreError::OutOfStock {
                name: unit.name.clone(),
                sku: unit.sku.clone(),
            });
        }

        if let Some(line) = self.lines.iter_mut().find(|l| l.unit.id == unit.id) {
            line.quantity += 1;
            return Ok(());
        }

        self.lines.push(CartLine::new(unit.clone()));
        Ok(())
    }

    /// Removes the line for `unit_id` entirely, regardless of quantity.
    pub fn remove_unit(&mut self, unit_id: &str) -> CoreResult<()> {
        let initial_len = self.lines.len();
        self.lines.retain(|l| l.unit.id != unit_id);

        if self.lines.len() == initial_len {
            Err(CoreError::UnitNotInCart(unit_id.to_string()))
        } else {
            Ok(())
        }
    }

    /// Replaces the quantity of the line for `unit_id`.
    ///
    /// ## Behavior
    /// - `qty <= 0` behaves exactly like [`Cart::remove_unit`]
    /// - No client-side upper bound; the server validates real stock at
    ///   checkout
    pub fn set_quantity(&mut self, unit_id: &str, qty: i64) -> CoreResult<()> {
        if qty <= 0 {
            return self.remove_unit(unit_id);
        }

        match self.lines.iter_mut().find(|l| l.unit.id == unit_id) {
            Some(line) => {
                line.quantity = qty;
                Ok(())
            }
            None => Err(CoreError::UnitNotInCart(unit_id.to_string())),
        }
    }

    /// Replaces the active discount. Idempotent.
    pub fn set_discount(&mut self, discount: Discount) {
        self.discount = discount;
    }

    /// Clears the discount back to none. Idempotent.
    pub fn clear_discount(&mut self) {
        self.discount = Discount::None;
    }

    /// Empties all lines and resets the discount.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.discount = Discount::None;
        self.created_at = Utc::now();
    }

    // =========================================================================
    // Derived Values (recomputed on every read)
    // =========================================================================

    /// The lines in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// The active discount.
    pub fn discount(&self) -> Discount {
        self.discount
    }

    /// Σ(line price × quantity), before discount and tax.
    pub fn subtotal(&self) -> Money {
        self.lines.iter().map(|l| l.line_total()).fold(Money::zero(), |a, b| a + b)
    }

    /// Σ per-line GST. Computed on the pre-discount base.
    pub fn tax_total(&self) -> Money {
        self.lines.iter().map(|l| l.gst()).fold(Money::zero(), |a, b| a + b)
    }

    /// The discount engine output on the current subtotal.
    pub fn discount_amount(&self) -> Money {
        self.discount.amount_off(self.subtotal())
    }

    /// `subtotal − discount_amount + tax_total`.
    pub fn total(&self) -> Money {
        self.subtotal() - self.discount_amount() + self.tax_total()
    }

    /// Σ quantity across all lines.
    pub fn item_count(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Number of distinct lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Checks if the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl Default for Cart {
    fn default() -> Self {
        Cart::new()
    }
}

// =============================================================================
// Cart Totals Summary
// =============================================================================

/// Cart totals summary for one-shot reads by rendering surfaces.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub line_count: usize,
    pub item_count: i64,
    pub subtotal_paise: i64,
    pub discount_paise: i64,
    pub tax_paise: i64,
    pub total_paise: i64,
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        CartTotals {
            line_count: cart.line_count(),
            item_count: cart.item_count(),
            subtotal_paise: cart.subtotal().paise(),
            discount_paise: cart.discount_amount().paise(),
            tax_paise: cart.tax_total().paise(),
            total_paise: cart.total().paise(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn test_unit(id: &str, price_paise: i64, stock: i64) -> SellableUnit {
        SellableUnit {
            id: id.to_string(),
            name: format!("Unit {}", id),
            sku: format!("SKU-{}", id),
            barcode: format!("890{}", id),
            price_paise,
            cached_stock: stock,
            gst_rate_bps: 1800, // 18%
            category: None,
            size: None,
            color: None,
        }
    }

    #[test]
    fn test_add_unit_appends_line_at_one() {
        let mut cart = Cart::new();
        let unit = test_unit("1", 999, 10);

        cart.add_unit(&unit).unwrap();

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.subtotal().paise(), 999);
    }

    #[test]
    fn test_repeated_adds_increment_one_line() {
        let mut cart = Cart::new();
        let unit = test_unit("1", 999, 10);

        for _ in 0..5 {
            cart.add_unit(&unit).unwrap();
        }

        // Five adds of the same unit: one line, quantity five
        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.lines()[0].quantity, 5);
        assert_eq!(cart.item_count(), 5);
    }

    #[test]
    fn test_add_out_of_stock_rejected_without_mutation() {
        let mut cart = Cart::new();
        let sold_out = test_unit("1", 999, 0);

        let err = cart.add_unit(&sold_out).unwrap_err();
        assert!(matches!(err, CoreError::OutOfStock { .. }));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_zero_equals_remove() {
        let unit = test_unit("1", 999, 10);

        let mut via_set = Cart::new();
        via_set.add_unit(&unit).unwrap();
        via_set.set_quantity("1", 0).unwrap();

        let mut via_remove = Cart::new();
        via_remove.add_unit(&unit).unwrap();
        via_remove.remove_unit("1").unwrap();

        assert!(via_set.is_empty());
        assert!(via_remove.is_empty());
    }

    #[test]
    fn test_set_quantity_replaces() {
        let mut cart = Cart::new();
        cart.add_unit(&test_unit("1", 999, 10)).unwrap();

        cart.set_quantity("1", 7).unwrap();
        assert_eq!(cart.item_count(), 7);

        // No client-side upper bound
        cart.set_quantity("1", 5_000).unwrap();
        assert_eq!(cart.item_count(), 5_000);
    }

    #[test]
    fn test_unknown_unit_errors() {
        let mut cart = Cart::new();
        assert!(matches!(cart.remove_unit("ghost"), Err(CoreError::UnitNotInCart(_))));
        assert!(matches!(cart.set_quantity("ghost", 3), Err(CoreError::UnitNotInCart(_))));
    }

    #[test]
    fn test_insertion_order_is_stable() {
        let mut cart = Cart::new();
        cart.add_unit(&test_unit("b", 100, 5)).unwrap();
        cart.add_unit(&test_unit("a", 200, 5)).unwrap();
        cart.add_unit(&test_unit("b", 100, 5)).unwrap(); // increments, no reorder

        let ids: Vec<&str> = cart.lines().iter().map(|l| l.unit.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_total_identity_holds() {
        let mut cart = Cart::new();
        cart.add_unit(&test_unit("1", 12_345, 9)).unwrap();
        cart.add_unit(&test_unit("2", 678, 9)).unwrap();
        cart.set_quantity("2", 3).unwrap();

        for discount in [
            Discount::None,
            Discount::percentage(10).unwrap(),
            Discount::flat(Money::from_paise(5_000)).unwrap(),
            Discount::flat(Money::from_paise(10_000_000)).unwrap(),
        ] {
            cart.set_discount(discount);
            let expected = cart.subtotal() - cart.discount_amount() + cart.tax_total();
            assert_eq!(cart.total(), expected);
        }
    }

    #[test]
    fn test_clear_resets_lines_and_discount() {
        let mut cart = Cart::new();
        cart.add_unit(&test_unit("1", 999, 10)).unwrap();
        cart.set_discount(Discount::percentage(10).unwrap());

        cart.clear();

        assert!(cart.is_empty());
        assert!(cart.discount().is_none());
    }

    #[test]
    fn test_end_to_end_totals() {
        // One line: ₹100.00 × 2 at 18% GST, 10% discount
        // subtotal 200.00, discount 20.00, GST 36.00, total 216.00
        let mut cart = Cart::new();
        let unit = test_unit("1", 10_000, 10);
        cart.add_unit(&unit).unwrap();
        cart.add_unit(&unit).unwrap();
        cart.set_discount(Discount::percentage(10).unwrap());

        assert_eq!(cart.subtotal().paise(), 20_000);
        assert_eq!(cart.discount_amount().paise(), 2_000);
        assert_eq!(cart.tax_total().paise(), 3_600);
        assert_eq!(cart.total().paise(), 21_600);
    }

    #[test]
    fn test_cart_totals_summary() {
        let mut cart = Cart::new();
        cart.add_unit(&test_unit("1", 10_000, 10)).unwrap();
        cart.set_quantity("1", 2).unwrap();
        cart.set_discount(Discount::percentage(10).unwrap());

        let totals = CartTotals::from(&cart);
        assert_eq!(totals.line_count, 1);
        assert_eq!(totals.item_count, 2);
        assert_eq!(totals.subtotal_paise, 20_000);
        assert_eq!(totals.discount_paise, 2_000);
        assert_eq!(totals.tax_paise, 3_600);
        assert_eq!(totals.total_paise, 21_600);
    }
}
