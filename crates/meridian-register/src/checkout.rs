//! # Checkout State Machine
//!
//! One checkout attempt, from customer capture to settlement.
//!
//! ## State Transitions
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Checkout Attempt Lifecycle                           │
//! │                                                                         │
//! │   begin_checkout (cart frozen)                                          │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  CollectingCustomer ──proceed_to_payment()──► CollectingPayment        │
//! │   (optional details)                            (tender edits)          │
//! │                                                      │                  │
//! │                                              begin_submit()             │
//! │                                         (gate: can_submit + warehouse)  │
//! │                                                      │                  │
//! │                                                      ▼                  │
//! │                              ┌────────────────  Submitting  ──────┐    │
//! │                              │                 (all edits         │    │
//! │                              ▼                  rejected)         ▼    │
//! │                          Succeeded                             Failed  │
//! │                     (server totals, credit                  (reason)   │
//! │                      balance, PDF URL)                          │      │
//! │                              │                       retry() ───┘      │
//! │                              ▼                  (tenders preserved,    │
//! │                      complete_sale                NEW key on next      │
//! │                     (cart clears HERE,            submit)              │
//! │                      never earlier)                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - The cart snapshot is frozen at `begin`; cart edits during an attempt are
//!   rejected upstream so the snapshot cannot silently diverge
//! - Every submission carries a freshly minted idempotency key, retries
//!   included - the failed request may have landed server-side
//! - Failure never touches the cart; only the explicit success exit or an
//!   explicit cancel clears it

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use meridian_checkout::{CheckoutRequest, SettledSale};
use meridian_core::{validation, Cart, CustomerDetails, Money, TenderList, TenderMethod};

use crate::error::{RegisterError, RegisterResult};

// =============================================================================
// Checkout Step
// =============================================================================

/// Where in the checkout flow the attempt currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutStep {
    /// Optional customer detail entry.
    CollectingCustomer,
    /// Tender entries being added and edited.
    CollectingPayment,
    /// Request in flight; every edit is rejected.
    Submitting,
    /// Settled; exposes the server's authoritative numbers.
    Succeeded,
    /// Submission failed; resumable via retry or cancel.
    Failed,
}

impl CheckoutStep {
    /// True while the network request is unresolved.
    #[inline]
    pub const fn is_in_flight(&self) -> bool {
        matches!(self, CheckoutStep::Submitting)
    }
}

// =============================================================================
// Checkout Attempt
// =============================================================================

/// One checkout attempt over a frozen cart snapshot.
///
/// Owned by the session; surfaces only ever see it through `CheckoutView`.
#[derive(Debug, Clone)]
pub struct CheckoutAttempt {
    /// The cart frozen at `begin`. Totals for the submit gate come from
    /// here, never from the live cart.
    cart: Cart,
    customer: CustomerDetails,
    tenders: TenderList,
    step: CheckoutStep,
    settled: Option<SettledSale>,
    failure: Option<String>,
    started_at: DateTime<Utc>,
}

impl CheckoutAttempt {
    /// Freezes the cart and starts a new attempt in `CollectingCustomer`.
    ///
    /// An empty cart has nothing to check out and is refused.
    pub fn begin(cart: Cart) -> RegisterResult<Self> {
        if cart.is_empty() {
            return Err(RegisterError::cart("Cannot start checkout with an empty cart"));
        }

        debug!(
            lines = cart.line_count(),
            total_paise = cart.total().paise(),
            "Checkout attempt started"
        );

        Ok(CheckoutAttempt {
            cart,
            customer: CustomerDetails::default(),
            tenders: TenderList::new(),
            step: CheckoutStep::CollectingCustomer,
            settled: None,
            failure: None,
            started_at: Utc::now(),
        })
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The frozen cart snapshot.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Customer details entered so far.
    pub fn customer(&self) -> &CustomerDetails {
        &self.customer
    }

    /// Tenders entered so far, in insertion order.
    pub fn tenders(&self) -> &TenderList {
        &self.tenders
    }

    /// Current step.
    pub fn step(&self) -> CheckoutStep {
        self.step
    }

    /// The settled sale, once `Succeeded`.
    pub fn settled(&self) -> Option<&SettledSale> {
        self.settled.as_ref()
    }

    /// The failure reason, once `Failed`.
    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    /// When the attempt started.
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    // =========================================================================
    // Derived Values
    // =========================================================================

    /// Σ tendered amounts.
    pub fn paid(&self) -> Money {
        self.tenders.paid()
    }

    /// Frozen total − paid.
    pub fn remaining(&self) -> Money {
        self.tenders.remaining(self.cart.total())
    }

    /// Cash to hand back on over-tender. Display only.
    pub fn change_due(&self) -> Money {
        self.tenders.change_due(self.cart.total())
    }

    /// The submit gate, evaluated against the frozen total.
    pub fn can_submit(&self) -> bool {
        self.tenders.can_submit(self.cart.total())
    }

    // =========================================================================
    // Customer & Payment Collection
    // =========================================================================

    /// Replaces the customer details. Legal in both collecting states;
    /// present fields are validated, absent ones are fine.
    pub fn set_customer(&mut self, customer: CustomerDetails) -> RegisterResult<()> {
        match self.step {
            CheckoutStep::CollectingCustomer | CheckoutStep::CollectingPayment => {
                customer.validate()?;
                self.customer = customer;
                Ok(())
            }
            _ => Err(RegisterError::checkout_state(
                "Customer details can only be edited before submission",
            )),
        }
    }

    /// Advances from customer capture to payment collection. Customer
    /// details are optional, so this never blocks on them.
    pub fn proceed_to_payment(&mut self) -> RegisterResult<()> {
        if self.step != CheckoutStep::CollectingCustomer {
            return Err(RegisterError::checkout_state(
                "Already past customer collection",
            ));
        }
        self.step = CheckoutStep::CollectingPayment;
        Ok(())
    }

    /// Adds a tender entry defaulted to the remaining balance; returns its
    /// id for later edits.
    pub fn add_tender(&mut self, method: TenderMethod) -> RegisterResult<String> {
        self.ensure_collecting_payment()?;
        Ok(self.tenders.add_entry(method, self.cart.total()))
    }

    /// Deletes a tender entry.
    pub fn remove_tender(&mut self, id: &str) -> RegisterResult<()> {
        self.ensure_collecting_payment()?;
        self.tenders.remove_entry(id)?;
        Ok(())
    }

    /// Overwrites a tendered amount. No clamping; the submit gate decides.
    pub fn set_tender_amount(&mut self, id: &str, amount: Money) -> RegisterResult<()> {
        self.ensure_collecting_payment()?;
        self.tenders.set_amount(id, amount)?;
        Ok(())
    }

    fn ensure_collecting_payment(&self) -> RegisterResult<()> {
        if self.step != CheckoutStep::CollectingPayment {
            return Err(RegisterError::checkout_state(
                "Payments can only be edited while collecting payment",
            ));
        }
        Ok(())
    }

    // =========================================================================
    // Submission
    // =========================================================================

    /// Checks every gate, freezes the tender list, moves to `Submitting`,
    /// and returns the request to send - with its freshly minted key.
    ///
    /// On any gate failure the state does not change and the caller may fix
    /// the problem and try again.
    pub fn begin_submit(&mut self, warehouse_id: &str) -> RegisterResult<CheckoutRequest> {
        self.ensure_collecting_payment()?;
        validation::validate_warehouse_id(warehouse_id)?;

        if self.tenders.is_empty() {
            return Err(RegisterError::payment("No payment has been entered"));
        }
        if !self.can_submit() {
            return Err(RegisterError::payment(format!(
                "Payments do not balance: {} remaining (add a payment or a credit entry)",
                self.remaining()
            )));
        }
        self.customer.validate()?;

        self.step = CheckoutStep::Submitting;
        let request =
            CheckoutRequest::from_parts(&self.cart, &self.tenders, &self.customer, warehouse_id);

        debug!(
            idempotency_key = %request.idempotency_key,
            paid_paise = self.paid().paise(),
            "Checkout submission gated through"
        );
        Ok(request)
    }

    /// Applies a successful settlement. Only legal in `Submitting`.
    pub fn resolve_success(&mut self, sale: SettledSale) -> RegisterResult<()> {
        self.ensure_submitting()?;
        self.step = CheckoutStep::Succeeded;
        self.settled = Some(sale);
        self.failure = None;
        Ok(())
    }

    /// Applies a failed submission. Only legal in `Submitting`. The cart and
    /// tenders are untouched; the attempt parks in `Failed`.
    pub fn resolve_failure(&mut self, reason: impl Into<String>) -> RegisterResult<()> {
        self.ensure_submitting()?;
        self.step = CheckoutStep::Failed;
        self.failure = Some(reason.into());
        Ok(())
    }

    fn ensure_submitting(&self) -> RegisterResult<()> {
        if self.step != CheckoutStep::Submitting {
            return Err(RegisterError::checkout_state("No submission is in flight"));
        }
        Ok(())
    }

    /// Returns from `Failed` to `CollectingPayment`, tenders preserved. The
    /// next `begin_submit` mints a new idempotency key.
    pub fn retry(&mut self) -> RegisterResult<()> {
        if self.step != CheckoutStep::Failed {
            return Err(RegisterError::checkout_state(
                "Only a failed submission can be retried",
            ));
        }
        self.step = CheckoutStep::CollectingPayment;
        self.failure = None;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use meridian_core::SellableUnit;

    fn test_unit(id: &str, price_paise: i64) -> SellableUnit {
        SellableUnit {
            id: id.to_string(),
            name: format!("Unit {}", id),
            sku: format!("SKU-{}", id),
            barcode: format!("890{}", id),
            price_paise,
            cached_stock: 10,
            gst_rate_bps: 1800,
            category: None,
            size: None,
            color: None,
        }
    }

    fn test_attempt() -> CheckoutAttempt {
        // ₹100.00 × 2 at 18% GST: total ₹236.00
        let mut cart = Cart::new();
        let unit = test_unit("1", 10_000);
        cart.add_unit(&unit).unwrap();
        cart.add_unit(&unit).unwrap();
        CheckoutAttempt::begin(cart).unwrap()
    }

    fn paid_attempt() -> CheckoutAttempt {
        let mut attempt = test_attempt();
        attempt.proceed_to_payment().unwrap();
        attempt.add_tender(TenderMethod::Cash).unwrap();
        attempt
    }

    fn settled_sale() -> SettledSale {
        SettledSale {
            sale_id: "sale-1".to_string(),
            invoice_number: "INV-1".to_string(),
            subtotal_paise: 20_000,
            discount_paise: 0,
            tax_paise: 3_600,
            total_paise: 23_600,
            total_items: 2,
            is_credit_sale: false,
            credit_balance_paise: 0,
            pdf_url: None,
        }
    }

    #[test]
    fn test_empty_cart_refused() {
        let err = CheckoutAttempt::begin(Cart::new()).unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::CartError);
    }

    #[test]
    fn test_happy_path_transitions() {
        let mut attempt = test_attempt();
        assert_eq!(attempt.step(), CheckoutStep::CollectingCustomer);

        attempt.proceed_to_payment().unwrap();
        assert_eq!(attempt.step(), CheckoutStep::CollectingPayment);

        attempt.add_tender(TenderMethod::Cash).unwrap();
        let request = attempt.begin_submit("wh-01").unwrap();
        assert_eq!(attempt.step(), CheckoutStep::Submitting);
        assert_eq!(request.items.len(), 1);
        assert_eq!(request.payments.len(), 1);

        attempt.resolve_success(settled_sale()).unwrap();
        assert_eq!(attempt.step(), CheckoutStep::Succeeded);
        assert_eq!(attempt.settled().unwrap().invoice_number, "INV-1");
    }

    #[test]
    fn test_tender_edits_only_while_collecting_payment() {
        let mut attempt = test_attempt();

        // Still collecting customer
        assert!(attempt.add_tender(TenderMethod::Cash).is_err());

        attempt.proceed_to_payment().unwrap();
        let id = attempt.add_tender(TenderMethod::Cash).unwrap();
        attempt.set_tender_amount(&id, Money::from_paise(23_600)).unwrap();

        attempt.begin_submit("wh-01").unwrap();

        // In flight: every edit rejected
        assert!(attempt.add_tender(TenderMethod::Card).is_err());
        assert!(attempt.set_tender_amount(&id, Money::zero()).is_err());
        assert!(attempt.remove_tender(&id).is_err());
        assert!(attempt.set_customer(CustomerDetails::default()).is_err());
    }

    #[test]
    fn test_begin_submit_gates() {
        let mut attempt = test_attempt();
        attempt.proceed_to_payment().unwrap();

        // No payment entered
        let err = attempt.begin_submit("wh-01").unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::PaymentError);
        assert_eq!(attempt.step(), CheckoutStep::CollectingPayment);

        // Shortfall without credit
        let id = attempt.add_tender(TenderMethod::Cash).unwrap();
        attempt.set_tender_amount(&id, Money::from_paise(10_000)).unwrap();
        let err = attempt.begin_submit("wh-01").unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::PaymentError);

        // Missing warehouse
        attempt.set_tender_amount(&id, Money::from_paise(23_600)).unwrap();
        let err = attempt.begin_submit("").unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::ValidationError);

        // All gates pass; state only changes now
        assert_eq!(attempt.step(), CheckoutStep::CollectingPayment);
        attempt.begin_submit("wh-01").unwrap();
        assert_eq!(attempt.step(), CheckoutStep::Submitting);
    }

    #[test]
    fn test_credit_shortfall_submits() {
        let mut attempt = test_attempt();
        attempt.proceed_to_payment().unwrap();

        let cash = attempt.add_tender(TenderMethod::Cash).unwrap();
        attempt.set_tender_amount(&cash, Money::from_paise(3_600)).unwrap();
        let credit = attempt.add_tender(TenderMethod::Credit).unwrap();
        attempt.set_tender_amount(&credit, Money::zero()).unwrap();

        assert_eq!(attempt.remaining().paise(), 20_000);
        assert!(attempt.can_submit());
        attempt.begin_submit("wh-01").unwrap();
    }

    #[test]
    fn test_retry_preserves_tenders_and_mints_fresh_key() {
        let mut attempt = paid_attempt();
        let first = attempt.begin_submit("wh-01").unwrap();

        attempt.resolve_failure("Network error: connection refused").unwrap();
        assert_eq!(attempt.step(), CheckoutStep::Failed);
        assert_eq!(attempt.failure(), Some("Network error: connection refused"));

        attempt.retry().unwrap();
        assert_eq!(attempt.step(), CheckoutStep::CollectingPayment);
        assert!(attempt.failure().is_none());
        assert_eq!(attempt.tenders().entries().len(), 1);

        let second = attempt.begin_submit("wh-01").unwrap();
        assert_ne!(first.idempotency_key, second.idempotency_key);
        assert_eq!(first.payments[0].amount, second.payments[0].amount);
    }

    #[test]
    fn test_retry_only_from_failed() {
        let mut attempt = paid_attempt();
        assert!(attempt.retry().is_err());

        attempt.begin_submit("wh-01").unwrap();
        assert!(attempt.retry().is_err());

        attempt.resolve_success(settled_sale()).unwrap();
        assert!(attempt.retry().is_err());
    }

    #[test]
    fn test_resolution_only_while_submitting() {
        let mut attempt = paid_attempt();
        assert!(attempt.resolve_success(settled_sale()).is_err());
        assert!(attempt.resolve_failure("nope").is_err());
    }

    #[test]
    fn test_customer_validation() {
        let mut attempt = test_attempt();

        let bad = CustomerDetails {
            mobile: Some("not-a-number".to_string()),
            ..CustomerDetails::default()
        };
        assert!(attempt.set_customer(bad).is_err());

        let good = CustomerDetails {
            name: Some("Asha Verma".to_string()),
            mobile: Some("+919876543210".to_string()),
            ..CustomerDetails::default()
        };
        attempt.set_customer(good).unwrap();
        assert_eq!(attempt.customer().name.as_deref(), Some("Asha Verma"));
    }
}
