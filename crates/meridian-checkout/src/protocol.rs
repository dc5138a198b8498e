//! # Wire Protocol
//!
//! The DTOs exchanged with the platform backend, and the pure construction
//! of a checkout request from domain state.
//!
//! ## Request Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  POST /pos/checkout                                                     │
//! │  {                                                                      │
//! │    "idempotency_key": "550e8400-...",   ← fresh UUID v4 per attempt    │
//! │    "warehouse_id": "wh-downtown",                                       │
//! │    "items":    [{"barcode": "8901234", "quantity": 2}, ...],            │
//! │    "payments": [{"method": "CASH", "amount": "300.00"}, ...],           │
//! │    "discount_type": "PERCENTAGE",       ← omitted when no discount     │
//! │    "discount_value": "10",                                              │
//! │    "customer_name": "Asha Verma"        ← optional fields omitted      │
//! │  }                                                                      │
//! │                                                                         │
//! │  Items carry the BARCODE, not the client-held unit id: the server      │
//! │  resolves identity itself, so a stale catalog snapshot cannot sell     │
//! │  the wrong variant.                                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All DTOs use snake_case keys (the platform API's shape); money crosses
//! the wire as decimal strings and is parsed exactly into integer paise.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use meridian_core::{Cart, CustomerDetails, Discount, Money, SellableUnit, TaxRate, TenderList, TenderMethod};

use crate::error::{CheckoutError, CheckoutResult};

// =============================================================================
// Request DTOs
// =============================================================================

/// One cart line on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutItem {
    /// Barcode of the sellable unit. Identity is resolved server-side.
    pub barcode: String,

    /// Quantity sold.
    pub quantity: i64,
}

/// One tendered payment on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutPayment {
    /// Tender method ("CASH", "CARD", "UPI", "CREDIT").
    pub method: TenderMethod,

    /// Tendered amount as a decimal string ("300.00").
    pub amount: String,
}

/// The checkout request body.
///
/// Constructed once per submission; the idempotency key inside is minted at
/// construction time and never reused - including on user retries after a
/// failure, because the failed request may have landed server-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutRequest {
    /// Fresh UUID v4 per submission attempt.
    pub idempotency_key: String,

    /// Warehouse/store context (required).
    pub warehouse_id: String,

    /// Cart lines in insertion order.
    pub items: Vec<CheckoutItem>,

    /// Tenders in insertion order. The server is the sole arbiter of
    /// settlement order.
    pub payments: Vec<CheckoutPayment>,

    /// "PERCENTAGE" or "FLAT". Omitted when no discount is active.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_type: Option<String>,

    /// Percentage as an integer string, or flat amount as a decimal string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_value: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_mobile: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_address: Option<String>,
}

impl CheckoutRequest {
    /// Assembles a request from frozen domain state, minting a fresh
    /// idempotency key.
    ///
    /// Pure except for the key mint - no validation happens here. The state
    /// machine has already enforced `can_submit` and the warehouse context
    /// before this runs.
    pub fn from_parts(
        cart: &Cart,
        tenders: &TenderList,
        customer: &CustomerDetails,
        warehouse_id: &str,
    ) -> Self {
        let items = cart
            .lines()
            .iter()
            .map(|line| CheckoutItem {
                barcode: line.unit.barcode.clone(),
                quantity: line.quantity,
            })
            .collect();

        let payments = tenders
            .entries()
            .iter()
            .map(|entry| CheckoutPayment {
                method: entry.method,
                amount: entry.amount.to_decimal_string(),
            })
            .collect();

        let (discount_type, discount_value) = match cart.discount() {
            Discount::None => (None, None),
            Discount::Percentage(percent) => {
                (Some("PERCENTAGE".to_string()), Some(percent.to_string()))
            }
            Discount::Flat(amount) => (Some("FLAT".to_string()), Some(amount.to_decimal_string())),
        };

        CheckoutRequest {
            idempotency_key: Uuid::new_v4().to_string(),
            warehouse_id: warehouse_id.to_string(),
            items,
            payments,
            discount_type,
            discount_value,
            customer_name: customer.name.clone(),
            customer_mobile: customer.mobile.clone(),
            customer_email: customer.email.clone(),
            customer_address: customer.address.clone(),
        }
    }
}

// =============================================================================
// Response DTOs
// =============================================================================

/// The raw checkout response body.
///
/// Totals are the SERVER'S numbers - authoritative, and allowed to differ
/// from the client estimate in rounding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutResponse {
    pub success: bool,
    pub sale_id: String,
    pub invoice_number: String,
    pub subtotal: String,
    #[serde(default)]
    pub discount_amount: Option<String>,
    #[serde(default)]
    pub total_gst: Option<String>,
    pub total: String,
    pub total_items: i64,
    pub status: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub is_credit_sale: Option<bool>,
    #[serde(default)]
    pub credit_balance: Option<String>,
    #[serde(default)]
    pub pdf_url: Option<String>,
}

/// A structured error body from the server. Some endpoints use `message`,
/// some use `error`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ApiErrorBody {
    /// The best human-readable message available.
    pub fn into_message(self) -> Option<String> {
        self.message.or(self.error).filter(|m| !m.trim().is_empty())
    }
}

/// One catalog search hit on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogUnit {
    pub id: String,
    pub name: String,
    pub sku: String,
    pub barcode: String,

    /// Decimal price string ("99.50").
    pub price: String,

    /// Advisory stock snapshot.
    pub stock: i64,

    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub color: Option<String>,

    /// GST rate as a fraction (0.18 = 18%).
    pub tax_rate: f64,
}

impl CatalogUnit {
    /// Converts the wire DTO into a domain snapshot.
    pub fn into_sellable_unit(self) -> CheckoutResult<SellableUnit> {
        let price = Money::parse_decimal(&self.price)
            .map_err(|e| CheckoutError::InvalidResponse(format!("catalog price: {}", e)))?;

        Ok(SellableUnit {
            id: self.id,
            name: self.name,
            sku: self.sku,
            barcode: self.barcode,
            price_paise: price.paise(),
            cached_stock: self.stock,
            gst_rate_bps: TaxRate::from_fraction(self.tax_rate).bps(),
            category: self.category,
            size: self.size,
            color: self.color,
        })
    }
}

// =============================================================================
// Settled Sale
// =============================================================================

/// A successfully settled sale, with the server's authoritative numbers
/// parsed into integer paise.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SettledSale {
    pub sale_id: String,
    pub invoice_number: String,
    pub subtotal_paise: i64,
    pub discount_paise: i64,
    pub tax_paise: i64,
    pub total_paise: i64,
    pub total_items: i64,

    /// True when tendered < total and the shortfall was recorded as a
    /// customer-owed balance.
    pub is_credit_sale: bool,

    /// Outstanding balance for a credit sale; zero otherwise.
    pub credit_balance_paise: i64,

    /// Invoice PDF location, when the server rendered one.
    pub pdf_url: Option<String>,
}

impl SettledSale {
    /// Interprets a successful checkout response, parsing every decimal
    /// money field exactly.
    pub fn from_response(response: CheckoutResponse) -> CheckoutResult<Self> {
        let money = |label: &str, value: &str| -> CheckoutResult<Money> {
            Money::parse_decimal(value)
                .map_err(|e| CheckoutError::InvalidResponse(format!("{}: {}", label, e)))
        };

        let subtotal = money("subtotal", &response.subtotal)?;
        let total = money("total", &response.total)?;
        let discount = match response.discount_amount.as_deref() {
            Some(value) => money("discount_amount", value)?,
            None => Money::zero(),
        };
        let gst = match response.total_gst.as_deref() {
            Some(value) => money("total_gst", value)?,
            None => Money::zero(),
        };
        let credit_balance = match response.credit_balance.as_deref() {
            Some(value) => money("credit_balance", value)?,
            None => Money::zero(),
        };

        Ok(SettledSale {
            sale_id: response.sale_id,
            invoice_number: response.invoice_number,
            subtotal_paise: subtotal.paise(),
            discount_paise: discount.paise(),
            tax_paise: gst.paise(),
            total_paise: total.paise(),
            total_items: response.total_items,
            is_credit_sale: response.is_credit_sale.unwrap_or(false),
            credit_balance_paise: credit_balance.paise(),
            pdf_url: response.pdf_url,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
