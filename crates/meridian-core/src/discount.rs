//! # Discount Engine
//!
//! The single cart-level discount and its math.
//!
//! ## Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Discount Behaviour                                 │
//! │                                                                         │
//! │  NONE          → amount off is zero                                    │
//! │                                                                         │
//! │  PERCENTAGE(v) → round-half-up(subtotal × v / 100) to the whole        │
//! │                  rupee, clamped to ≤ subtotal                          │
//! │                                                                         │
//! │  FLAT(v)       → min(v, subtotal)                                      │
//! │                  a flat discount can never drive the total negative    │
//! │                                                                         │
//! │  At most ONE discount is active per cart. Applying a new one replaces  │
//! │  the previous one; clearing resets to NONE. The function is pure and   │
//! │  idempotent: the same discount on the same subtotal always yields the  │
//! │  same amount.                                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreResult, ValidationError};
use crate::money::Money;

// =============================================================================
// Discount
// =============================================================================

/// The cart-level discount. At most one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Discount {
    /// No discount applied.
    #[default]
    None,

    /// Percentage of the subtotal, 0-100.
    Percentage(u32),

    /// Fixed amount off the subtotal.
    Flat(Money),
}

impl Discount {
    /// Creates a percentage discount, validating the 0-100 range.
    pub fn percentage(percent: u32) -> CoreResult<Self> {
        if percent > 100 {
            return Err(ValidationError::OutOfRange {
                field: "discount percent".to_string(),
                min: 0,
                max: 100,
            }
            .into());
        }
        Ok(Discount::Percentage(percent))
    }

    /// Creates a flat discount, validating non-negativity.
    pub fn flat(amount: Money) -> CoreResult<Self> {
        if amount.is_negative() {
            return Err(ValidationError::MustBeNonNegative {
                field: "discount amount".to_string(),
            }
            .into());
        }
        Ok(Discount::Flat(amount))
    }

    /// Checks whether a discount is actually active.
    #[inline]
    pub const fn is_none(&self) -> bool {
        matches!(self, Discount::None)
    }

    /// Computes the amount taken off the given subtotal.
    ///
    /// Pure and idempotent. The result is never negative and never exceeds
    /// the subtotal.
    ///
    /// ## Percentage Rounding
    /// Percentages round half-up to the whole rupee (100 paise), matching
    /// how the platform prints discounts on invoices:
    /// `(subtotal_paise × percent + 5000) / 10000` whole rupees.
    pub fn amount_off(&self, subtotal: Money) -> Money {
        match self {
            Discount::None => Money::zero(),
            Discount::Percentage(percent) => {
                let rupees = (subtotal.paise() as i128 * *percent as i128 + 5_000) / 10_000;
                Money::from_paise((rupees * 100) as i64).min(subtotal)
            }
            Discount::Flat(amount) => (*amount).min(subtotal),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_is_zero() {
        assert_eq!(Discount::None.amount_off(Money::from_paise(12_345)), Money::zero());
    }

    #[test]
    fn test_percentage_basic() {
        // ₹200.00 at 10% = ₹20.00
        let discount = Discount::percentage(10).unwrap();
        assert_eq!(discount.amount_off(Money::from_paise(20_000)).paise(), 2_000);
    }

    #[test]
    fn test_percentage_rounds_half_up_to_rupee() {
        // ₹5.00 at 10% = ₹0.50 → rounds up to ₹1.00
        let discount = Discount::percentage(10).unwrap();
        assert_eq!(discount.amount_off(Money::from_paise(500)).paise(), 100);

        // ₹4.00 at 10% = ₹0.40 → rounds down to ₹0.00
        assert_eq!(discount.amount_off(Money::from_paise(400)).paise(), 0);

        // ₹15.00 at 33% = ₹4.95 → rounds to ₹5.00
        let discount = Discount::percentage(33).unwrap();
        assert_eq!(discount.amount_off(Money::from_paise(1_500)).paise(), 500);
    }

    #[test]
    fn test_percentage_never_exceeds_subtotal() {
        // ₹0.50 at 100%: rounding up to the rupee would give ₹1.00,
        // the clamp keeps it at the subtotal
        let discount = Discount::percentage(100).unwrap();
        assert_eq!(discount.amount_off(Money::from_paise(50)).paise(), 50);
    }

    #[test]
    fn test_percentage_range_validated() {
        assert!(Discount::percentage(0).is_ok());
        assert!(Discount::percentage(100).is_ok());
        assert!(Discount::percentage(101).is_err());
    }

    #[test]
    fn test_flat_clamped_to_subtotal() {
        let subtotal = Money::from_paise(10_000);

        let small = Discount::flat(Money::from_paise(2_500)).unwrap();
        assert_eq!(small.amount_off(subtotal).paise(), 2_500);

        // Flat value larger than the subtotal never drives the total negative
        let huge = Discount::flat(Money::from_paise(99_999)).unwrap();
        assert_eq!(huge.amount_off(subtotal), subtotal);
    }

    #[test]
    fn test_flat_rejects_negative() {
        assert!(Discount::flat(Money::from_paise(-1)).is_err());
        assert!(Discount::flat(Money::zero()).is_ok());
    }

    #[test]
    fn test_amount_off_is_idempotent() {
        let subtotal = Money::from_paise(21_700);
        for discount in [
            Discount::None,
            Discount::percentage(15).unwrap(),
            Discount::flat(Money::from_paise(999)).unwrap(),
        ] {
            let first = discount.amount_off(subtotal);
            let second = discount.amount_off(subtotal);
            assert_eq!(first, second);
        }
    }
}
