//! # Payment Allocator
//!
//! Splits the cart total across an ordered list of tenders and decides when
//! checkout submission is permitted.
//!
//! ## Tender Allocation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Multi-Tender Allocation                             │
//! │                                                                         │
//! │  Cart total: ₹500.00                                                   │
//! │                                                                         │
//! │  add_entry(CASH)    ──► CASH ₹500.00      remaining ₹0.00   ✅ submit  │
//! │                                                                         │
//! │  set_amount(₹300)   ──► CASH ₹300.00      remaining ₹200.00 ❌ submit  │
//! │                                                                         │
//! │  add_entry(CREDIT)  ──► CASH ₹300.00                                   │
//! │                         CREDIT ₹200.00    remaining ₹0.00   ✅ submit  │
//! │                                                                         │
//! │  set_amount(CREDIT, ₹0)                                                │
//! │                     ──► CASH ₹300.00                                   │
//! │                         CREDIT ₹0.00      remaining ₹200.00 ✅ submit  │
//! │                         (CREDIT present = shortfall becomes a          │
//! │                          customer-owed balance, a "credit sale")        │
//! │                                                                         │
//! │  RULE: submit requires at least one entry AND                          │
//! │        (remaining exactly zero OR a CREDIT entry present).              │
//! │        Integer paise make the 0.01-rupee epsilon exact.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The list stores no totals of its own; every operation that needs the cart
//! total takes it as a parameter, so the allocator can never disagree with
//! the cart about what is owed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::TenderMethod;

// =============================================================================
// Tender Entry
// =============================================================================

/// One tendered payment: a method plus an amount.
///
/// Multiple entries of the same method are permitted (two CASH tenders is a
/// real scenario: two people splitting a bill).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TenderEntry {
    /// Client-generated identity (UUID v4).
    pub id: String,

    /// The payment instrument.
    pub method: TenderMethod,

    /// Tendered amount. Editable until submission begins; no clamping here -
    /// over/under-tender is caught by the submit gate, not by edits.
    pub amount: Money,

    /// When this entry was added.
    #[ts(as = "String")]
    pub added_at: DateTime<Utc>,
}

// =============================================================================
// Tender List
// =============================================================================

/// The ordered list of tenders for one checkout attempt.
///
/// Order is insertion order and is preserved on the wire; the server is the
/// sole arbiter of settlement order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TenderList {
    entries: Vec<TenderEntry>,
}

impl TenderList {
    /// Creates an empty tender list.
    pub fn new() -> Self {
        TenderList::default()
    }

    /// Appends a new entry and returns its id.
    ///
    /// The amount defaults to the current remaining balance clamped to ≥ 0 -
    /// the full total when the list is empty. The caller may edit it
    /// afterwards with [`TenderList::set_amount`].
    pub fn add_entry(&mut self, method: TenderMethod, cart_total: Money) -> String {
        let amount = self.remaining(cart_total).max(Money::zero());
        let entry = TenderEntry {
            id: Uuid::new_v4().to_string(),
            method,
            amount,
            added_at: Utc::now(),
        };
        let id = entry.id.clone();
        self.entries.push(entry);
        id
    }

    /// Deletes the entry with the given id.
    pub fn remove_entry(&mut self, id: &str) -> CoreResult<()> {
        let initial_len = self.entries.len();
        self.entries.retain(|e| e.id != id);

        if self.entries.len() == initial_len {
            Err(CoreError::TenderNotFound(id.to_string()))
        } else {
            Ok(())
        }
    }

    /// Overwrites the tendered amount of the entry with the given id.
    ///
    /// No clamping: the user can over- or under-tender freely; validation
    /// happens at submit time.
    pub fn set_amount(&mut self, id: &str, amount: Money) -> CoreResult<()> {
        match self.entries.iter_mut().find(|e| e.id == id) {
            Some(entry) => {
                entry.amount = amount;
                Ok(())
            }
            None => Err(CoreError::TenderNotFound(id.to_string())),
        }
    }

    // =========================================================================
    // Derived Values
    // =========================================================================

    /// The entries in insertion order.
    pub fn entries(&self) -> &[TenderEntry] {
        &self.entries
    }

    /// Checks if no payments have been entered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Σ tendered amounts.
    pub fn paid(&self) -> Money {
        self.entries.iter().map(|e| e.amount).fold(Money::zero(), |a, b| a + b)
    }

    /// `cart_total − paid`. Negative when over-tendered.
    pub fn remaining(&self, cart_total: Money) -> Money {
        cart_total - self.paid()
    }

    /// `max(paid − cart_total, 0)`. Display only - the submit gate still
    /// requires the books to balance.
    pub fn change_due(&self, cart_total: Money) -> Money {
        (self.paid() - cart_total).max(Money::zero())
    }

    /// Checks for a CREDIT entry, the only method allowed to leave a
    /// non-zero remaining balance ("pay later").
    pub fn has_credit(&self) -> bool {
        self.entries.iter().any(|e| e.method.is_credit())
    }

    /// The submit gate: true iff at least one entry exists AND the remaining
    /// balance is exactly zero OR a CREDIT entry is present.
    pub fn can_submit(&self, cart_total: Money) -> bool {
        if self.entries.is_empty() {
            return false;
        }
        self.remaining(cart_total).is_zero() || self.has_credit()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const TOTAL: Money = Money::from_paise(50_000); // ₹500.00

    #[test]
    fn test_empty_list_cannot_submit() {
        let tenders = TenderList::new();
        assert!(!tenders.can_submit(TOTAL));
        assert!(!tenders.can_submit(Money::zero()));
    }

    #[test]
    fn test_first_entry_defaults_to_full_total() {
        let mut tenders = TenderList::new();
        tenders.add_entry(TenderMethod::Cash, TOTAL);

        assert_eq!(tenders.paid(), TOTAL);
        assert!(tenders.remaining(TOTAL).is_zero());
        assert!(tenders.can_submit(TOTAL));
    }

    #[test]
    fn test_second_entry_defaults_to_remaining() {
        let mut tenders = TenderList::new();
        let cash = tenders.add_entry(TenderMethod::Cash, TOTAL);
        tenders.set_amount(&cash, Money::from_paise(30_000)).unwrap();

        tenders.add_entry(TenderMethod::Upi, TOTAL);

        // UPI entry picked up the ₹200.00 shortfall
        assert_eq!(tenders.entries()[1].amount.paise(), 20_000);
        assert!(tenders.can_submit(TOTAL));
    }

    #[test]
    fn test_overtendered_default_clamps_to_zero() {
        let mut tenders = TenderList::new();
        let cash = tenders.add_entry(TenderMethod::Cash, TOTAL);
        tenders.set_amount(&cash, Money::from_paise(60_000)).unwrap();

        tenders.add_entry(TenderMethod::Card, TOTAL);
        assert_eq!(tenders.entries()[1].amount, Money::zero());
    }

    #[test]
    fn test_shortfall_without_credit_blocks_submit() {
        let mut tenders = TenderList::new();
        let cash = tenders.add_entry(TenderMethod::Cash, TOTAL);
        tenders.set_amount(&cash, Money::from_paise(30_000)).unwrap();

        // ₹300.00 against ₹500.00, no credit entry
        assert_eq!(tenders.remaining(TOTAL).paise(), 20_000);
        assert!(!tenders.can_submit(TOTAL));
    }

    #[test]
    fn test_shortfall_with_credit_entry_permits_submit() {
        let mut tenders = TenderList::new();
        let cash = tenders.add_entry(TenderMethod::Cash, TOTAL);
        tenders.set_amount(&cash, Money::from_paise(30_000)).unwrap();

        let credit = tenders.add_entry(TenderMethod::Credit, TOTAL);
        tenders.set_amount(&credit, Money::zero()).unwrap();

        // remaining ₹200.00 but a CREDIT entry exists: pay-later sale
        assert_eq!(tenders.remaining(TOTAL).paise(), 20_000);
        assert!(tenders.can_submit(TOTAL));
    }

    #[test]
    fn test_overtender_without_credit_blocks_submit() {
        let mut tenders = TenderList::new();
        let cash = tenders.add_entry(TenderMethod::Cash, TOTAL);
        tenders.set_amount(&cash, Money::from_paise(60_000)).unwrap();

        assert!(tenders.remaining(TOTAL).is_negative());
        assert!(!tenders.can_submit(TOTAL));
        assert_eq!(tenders.change_due(TOTAL).paise(), 10_000);
    }

    #[test]
    fn test_duplicate_methods_permitted() {
        let mut tenders = TenderList::new();
        let first = tenders.add_entry(TenderMethod::Cash, TOTAL);
        tenders.set_amount(&first, Money::from_paise(20_000)).unwrap();
        tenders.add_entry(TenderMethod::Cash, TOTAL);

        assert_eq!(tenders.entries().len(), 2);
        assert!(tenders.can_submit(TOTAL));
    }

    #[test]
    fn test_remove_entry() {
        let mut tenders = TenderList::new();
        let id = tenders.add_entry(TenderMethod::Cash, TOTAL);

        tenders.remove_entry(&id).unwrap();
        assert!(tenders.is_empty());

        assert!(matches!(tenders.remove_entry(&id), Err(CoreError::TenderNotFound(_))));
        assert!(matches!(
            tenders.set_amount("ghost", Money::zero()),
            Err(CoreError::TenderNotFound(_))
        ));
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut tenders = TenderList::new();
        let cash = tenders.add_entry(TenderMethod::Cash, TOTAL);
        tenders.set_amount(&cash, Money::from_paise(10_000)).unwrap();
        tenders.add_entry(TenderMethod::Card, TOTAL);
        tenders.add_entry(TenderMethod::Credit, TOTAL);

        let methods: Vec<TenderMethod> = tenders.entries().iter().map(|e| e.method).collect();
        assert_eq!(methods, vec![TenderMethod::Cash, TenderMethod::Card, TenderMethod::Credit]);
    }
}
