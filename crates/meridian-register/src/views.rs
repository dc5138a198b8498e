//! # Surface Views
//!
//! Read-only, camelCase view types handed to rendering surfaces. Every value
//! in here is derived; surfaces never compute money themselves.
//!
//! ## Snapshot Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  RegisterSnapshot                                                       │
//! │  ├── cart: CartView                                                     │
//! │  │     ├── lines: [CartLineView]    unit, qty, lineTotal, gst           │
//! │  │     ├── discount: Discount                                           │
//! │  │     └── totals: TotalsView       subtotal/discount/tax/total paise   │
//! │  └── checkout: CheckoutView?        absent when no attempt is open      │
//! │        ├── step, canSubmit                                              │
//! │        ├── tenders: [TenderView]                                        │
//! │        ├── paidPaise / remainingPaise / changeDuePaise                  │
//! │        ├── customer: CustomerDetails                                    │
//! │        ├── settled: SettledSale?    once Succeeded                      │
//! │        └── failure: string?         once Failed                         │
//! │                                                                         │
//! │  Published on the watch channel after EVERY session mutation.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use meridian_checkout::SettledSale;
use meridian_core::{Cart, CartTotals, CustomerDetails, Discount, SellableUnit, TenderMethod};

use crate::checkout::{CheckoutAttempt, CheckoutStep};

/// The cart totals block surfaces render next to the line list.
pub type TotalsView = CartTotals;

// =============================================================================
// Cart Views
// =============================================================================

/// One cart line with its derived money, ready to render.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartLineView {
    /// The frozen unit snapshot.
    pub unit: SellableUnit,
    pub quantity: i64,
    /// Pre-tax line total (price × quantity).
    pub line_total_paise: i64,
    /// GST contribution of this line.
    pub gst_paise: i64,
}

/// The whole cart, lines in insertion order.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub discount: Discount,
    pub totals: TotalsView,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        CartView {
            lines: cart
                .lines()
                .iter()
                .map(|line| CartLineView {
                    unit: line.unit.clone(),
                    quantity: line.quantity,
                    line_total_paise: line.line_total().paise(),
                    gst_paise: line.gst().paise(),
                })
                .collect(),
            discount: cart.discount(),
            totals: TotalsView::from(cart),
        }
    }
}

// =============================================================================
// Checkout Views
// =============================================================================

/// One tender entry as rendered in the payment split.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TenderView {
    pub id: String,
    pub method: TenderMethod,
    pub amount_paise: i64,
}

/// The open checkout attempt as surfaces see it.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutView {
    pub step: CheckoutStep,
    pub tenders: Vec<TenderView>,
    pub customer: CustomerDetails,
    pub paid_paise: i64,
    /// Frozen total − paid. Negative when over-tendered.
    pub remaining_paise: i64,
    pub change_due_paise: i64,
    /// Whether the submit gate currently holds.
    pub can_submit: bool,
    /// The server's authoritative settlement, once `Succeeded`.
    pub settled: Option<SettledSale>,
    /// The failure reason, once `Failed`.
    pub failure: Option<String>,
}

impl From<&CheckoutAttempt> for CheckoutView {
    fn from(attempt: &CheckoutAttempt) -> Self {
        CheckoutView {
            step: attempt.step(),
            tenders: attempt
                .tenders()
                .entries()
                .iter()
                .map(|entry| TenderView {
                    id: entry.id.clone(),
                    method: entry.method,
                    amount_paise: entry.amount.paise(),
                })
                .collect(),
            customer: attempt.customer().clone(),
            paid_paise: attempt.paid().paise(),
            remaining_paise: attempt.remaining().paise(),
            change_due_paise: attempt.change_due().paise(),
            can_submit: attempt.can_submit(),
            settled: attempt.settled().cloned(),
            failure: attempt.failure().map(str::to_string),
        }
    }
}

// =============================================================================
// Register Snapshot
// =============================================================================

/// The complete read-only state published on the watch channel.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RegisterSnapshot {
    pub cart: CartView,
    /// Present while a checkout attempt is open.
    pub checkout: Option<CheckoutView>,
}

impl RegisterSnapshot {
    /// Captures the current session state.
    pub fn capture(cart: &Cart, attempt: Option<&CheckoutAttempt>) -> Self {
        RegisterSnapshot {
            cart: CartView::from(cart),
            checkout: attempt.map(CheckoutView::from),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
