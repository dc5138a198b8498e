//! # Domain Types
//!
//! Core domain types for the Meridian cart & checkout engine.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  SellableUnit   │   │    TaxRate      │   │  TenderMethod   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (variant)   │   │  bps (u32)      │   │  Cash           │       │
//! │  │  sku / barcode  │   │  1800 = 18%     │   │  Card           │       │
//! │  │  price_paise    │   └─────────────────┘   │  Upi            │       │
//! │  │  cached_stock   │                         │  Credit         │       │
//! │  └─────────────────┘   ┌─────────────────┐   └─────────────────┘       │
//! │                        │ CustomerDetails │                              │
//! │                        │  ─────────────  │                              │
//! │                        │  name? mobile?  │                              │
//! │                        │  email? addr?   │                              │
//! │                        └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Semantics
//! A `SellableUnit` is an immutable snapshot taken when the variant is added
//! to the cart. Price and stock are frozen at that moment; the server is the
//! sole authority on both at checkout time.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::validation;

// =============================================================================
// Tax Rate
// =============================================================================

/// GST rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 1800 bps = 18% (standard GST slab)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a fraction (0.18 → 18%).
    ///
    /// The catalog API reports rates this way.
    pub fn from_fraction(fraction: f64) -> Self {
        TaxRate((fraction * 10_000.0).round() as u32)
    }

    /// Creates a tax rate from a percentage (for convenience).
    pub fn from_percentage(pct: f64) -> Self {
        TaxRate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Returns the rate as a fraction (for display only).
    #[inline]
    pub fn fraction(&self) -> f64 {
        self.0 as f64 / 10_000.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    /// Checks if tax rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

// =============================================================================
// Sellable Unit
// =============================================================================

/// The smallest purchasable entity: a specific variant of a product with its
/// own price and stock.
///
/// ## Design Notes
/// - Immutable snapshot at time of cart add; later catalog changes do not
///   reach lines already in the cart
/// - `cached_stock` is advisory only. The zero case blocks an add locally;
///   everything else is re-validated server-side at checkout
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SellableUnit {
    /// Unique variant identifier.
    pub id: String,

    /// Display name shown to cashier and on the invoice.
    pub name: String,

    /// Stock Keeping Unit - business identifier.
    pub sku: String,

    /// Barcode (EAN-13, UPC-A, etc.). The checkout request identifies lines
    /// by barcode, not by client-held ids, to avoid staleness.
    pub barcode: String,

    /// Price in paise at time of snapshot (frozen).
    pub price_paise: i64,

    /// Stock level at time of snapshot. Advisory only.
    pub cached_stock: i64,

    /// GST rate in basis points (1800 = 18%).
    pub gst_rate_bps: u32,

    /// Product category, if known.
    pub category: Option<String>,

    /// Variant size attribute (e.g. "M").
    pub size: Option<String>,

    /// Variant color attribute (e.g. "Blue").
    pub color: Option<String>,
}

impl SellableUnit {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_paise(self.price_paise)
    }

    /// Returns the GST rate.
    #[inline]
    pub fn gst_rate(&self) -> TaxRate {
        TaxRate::from_bps(self.gst_rate_bps)
    }

    /// Checks the advisory stock snapshot. Only an exactly-zero snapshot
    /// blocks an add; the server owns the real answer.
    #[inline]
    pub fn has_cached_stock(&self) -> bool {
        self.cached_stock != 0
    }
}

// =============================================================================
// Tender Method
// =============================================================================

/// The instrument used to pay.
///
/// ## Credit
/// CREDIT is the odd one out: it records a customer-owed balance instead of
/// collecting money, and it is the only method allowed to leave a non-zero
/// remaining balance at submit time ("pay later").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TenderMethod {
    /// Physical cash payment.
    Cash,
    /// Card payment on external terminal.
    Card,
    /// UPI transfer.
    Upi,
    /// Store credit - shortfall becomes a customer-owed balance.
    Credit,
}

impl TenderMethod {
    /// Returns true for the "pay later" method.
    #[inline]
    pub const fn is_credit(&self) -> bool {
        matches!(self, TenderMethod::Credit)
    }
}

impl std::fmt::Display for TenderMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TenderMethod::Cash => write!(f, "cash"),
            TenderMethod::Card => write!(f, "card"),
            TenderMethod::Upi => write!(f, "upi"),
            TenderMethod::Credit => write!(f, "credit"),
        }
    }
}

// =============================================================================
// Customer Details
// =============================================================================

/// Optional customer details captured during checkout.
///
/// All fields are optional; a walk-in sale carries none of them. A credit
/// sale should carry at least a name or mobile so the balance can be chased,
/// but that policy is the server's to enforce.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDetails {
    /// Customer display name.
    pub name: Option<String>,

    /// Mobile number (digits only, optional leading +).
    pub mobile: Option<String>,

    /// Email address.
    pub email: Option<String>,

    /// Postal address.
    pub address: Option<String>,
}

impl CustomerDetails {
    /// Checks whether any detail was entered at all.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.mobile.is_none() && self.email.is_none() && self.address.is_none()
    }

    /// Validates all present fields. Absent fields are fine.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(ref name) = self.name {
            validation::validate_customer_name(name)?;
        }
        if let Some(ref mobile) = self.mobile {
            validation::validate_mobile(mobile)?;
        }
        if let Some(ref email) = self.email {
            validation::validate_email(email)?;
        }
        if let Some(ref address) = self.address {
            validation::validate_address(address)?;
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tax_rate_from_bps() {
        let rate = TaxRate::from_bps(1800);
        assert_eq!(rate.bps(), 1800);
        assert!((rate.percentage() - 18.0).abs() < 0.001);
        assert!((rate.fraction() - 0.18).abs() < 0.0001);
    }

    #[test]
    fn test_tax_rate_from_fraction() {
        assert_eq!(TaxRate::from_fraction(0.18).bps(), 1800);
        assert_eq!(TaxRate::from_fraction(0.0).bps(), 0);
        assert_eq!(TaxRate::from_fraction(0.0825).bps(), 825);
    }

    #[test]
    fn test_tender_method_wire_names() {
        assert_eq!(serde_json::to_string(&TenderMethod::Cash).unwrap(), "\"CASH\"");
        assert_eq!(serde_json::to_string(&TenderMethod::Upi).unwrap(), "\"UPI\"");
        assert_eq!(serde_json::to_string(&TenderMethod::Credit).unwrap(), "\"CREDIT\"");

        let parsed: TenderMethod = serde_json::from_str("\"CARD\"").unwrap();
        assert_eq!(parsed, TenderMethod::Card);
    }

    #[test]
    fn test_tender_method_is_credit() {
        assert!(TenderMethod::Credit.is_credit());
        assert!(!TenderMethod::Cash.is_credit());
        assert!(!TenderMethod::Upi.is_credit());
    }

    #[test]
    fn test_customer_details_validate() {
        let empty = CustomerDetails::default();
        assert!(empty.is_empty());
        assert!(empty.validate().is_ok());

        let customer = CustomerDetails {
            name: Some("Asha Verma".to_string()),
            mobile: Some("+919876543210".to_string()),
            email: Some("asha@example.com".to_string()),
            address: None,
        };
        assert!(!customer.is_empty());
        assert!(customer.validate().is_ok());

        let bad_mobile = CustomerDetails {
            mobile: Some("not-a-number".to_string()),
            ..CustomerDetails::default()
        };
        assert!(bad_mobile.validate().is_err());
    }
}
