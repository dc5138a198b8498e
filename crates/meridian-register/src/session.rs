//! # Register Session
//!
//! The per-device state container: one cart, at most one checkout attempt,
//! one mutex.
//!
//! ## Ownership & Locking
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      RegisterSession                                    │
//! │                                                                         │
//! │   Mutex<RegisterInner>          Arc<dyn CheckoutSubmit>                 │
//! │   ├── cart: Cart                (ApiClient in production,               │
//! │   └── attempt: Option<...>       scripted fake in tests)                │
//! │                                                                         │
//! │   watch::Sender<RegisterSnapshot>                                       │
//! │   └── send_replace after EVERY mutation; surfaces subscribe()           │
//! │                                                                         │
//! │  LOCK DISCIPLINE for submit():                                          │
//! │                                                                         │
//! │    lock ──► begin_submit (gate + freeze + Submitting) ──► unlock        │
//! │                          │                                              │
//! │                          ▼  (no lock held)                              │
//! │              await gateway.submit_checkout(request)                     │
//! │                          │                                              │
//! │    lock ──► resolve_success / resolve_failure ──► unlock               │
//! │                                                                         │
//! │  The lock is NEVER held across the network await. Mutations during     │
//! │  Submitting are refused by the state machine, so the frozen snapshot   │
//! │  cannot diverge while the request is in flight.                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Cart Locking During Checkout
//! While an attempt exists the cart is read-only: the attempt holds a frozen
//! clone, and allowing live edits would let the display drift from what is
//! being charged. Every cart mutation returns `CHECKOUT_STATE` until the
//! attempt ends.

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::watch;
use tracing::{debug, info, warn};

use meridian_checkout::CheckoutSubmit;
use meridian_checkout::SettledSale;
use meridian_core::{Cart, CustomerDetails, Discount, Money, SellableUnit, TenderMethod};

use crate::checkout::{CheckoutAttempt, CheckoutStep};
use crate::error::{RegisterError, RegisterResult};
use crate::views::RegisterSnapshot;

// =============================================================================
// Session State
// =============================================================================

/// Everything behind the one mutex.
#[derive(Debug)]
struct RegisterInner {
    cart: Cart,
    attempt: Option<CheckoutAttempt>,
}

/// The per-device register session.
///
/// Constructed once per device/session and threaded explicitly - there is no
/// global instance. Surfaces hold it behind an `Arc` and talk to nothing
/// else.
pub struct RegisterSession {
    inner: Mutex<RegisterInner>,
    gateway: Arc<dyn CheckoutSubmit>,
    warehouse_id: String,
    snapshot_tx: watch::Sender<RegisterSnapshot>,
}

impl RegisterSession {
    /// Creates a session with an empty cart and no open attempt.
    pub fn new(gateway: Arc<dyn CheckoutSubmit>, warehouse_id: impl Into<String>) -> Self {
        let cart = Cart::new();
        let (snapshot_tx, _) = watch::channel(RegisterSnapshot::capture(&cart, None));

        RegisterSession {
            inner: Mutex::new(RegisterInner { cart, attempt: None }),
            gateway,
            warehouse_id: warehouse_id.into(),
            snapshot_tx,
        }
    }

    /// Subscribes to snapshot updates. The receiver immediately holds the
    /// current snapshot; every mutation publishes a fresh one.
    pub fn subscribe(&self) -> watch::Receiver<RegisterSnapshot> {
        self.snapshot_tx.subscribe()
    }

    /// One-shot read of the current state.
    pub fn snapshot(&self) -> RegisterSnapshot {
        let inner = self.lock();
        RegisterSnapshot::capture(&inner.cart, inner.attempt.as_ref())
    }

    fn lock(&self) -> MutexGuard<'_, RegisterInner> {
        // Mutex poisoning means a panic mid-mutation; the session state
        // cannot be trusted afterwards.
        self.inner.lock().expect("register mutex poisoned")
    }

    fn publish(&self, inner: &RegisterInner) {
        self.snapshot_tx
            .send_replace(RegisterSnapshot::capture(&inner.cart, inner.attempt.as_ref()));
    }

    // =========================================================================
    // Cart Operations (refused while a checkout attempt is open)
    // =========================================================================

    fn ensure_cart_unlocked(inner: &RegisterInner) -> RegisterResult<()> {
        if inner.attempt.is_some() {
            return Err(RegisterError::checkout_state(
                "Cart is locked while a checkout is in progress",
            ));
        }
        Ok(())
    }

    /// Adds one of the given unit to the cart.
    pub fn add_unit(&self, unit: &SellableUnit) -> RegisterResult<()> {
        let mut inner = self.lock();
        Self::ensure_cart_unlocked(&inner)?;
        inner.cart.add_unit(unit)?;
        debug!(unit_id = %unit.id, sku = %unit.sku, "Unit added to cart");
        self.publish(&inner);
        Ok(())
    }

    /// Removes a line entirely.
    pub fn remove_unit(&self, unit_id: &str) -> RegisterResult<()> {
        let mut inner = self.lock();
        Self::ensure_cart_unlocked(&inner)?;
        inner.cart.remove_unit(unit_id)?;
        self.publish(&inner);
        Ok(())
    }

    /// Replaces a line quantity; zero or less removes the line.
    pub fn set_quantity(&self, unit_id: &str, qty: i64) -> RegisterResult<()> {
        let mut inner = self.lock();
        Self::ensure_cart_unlocked(&inner)?;
        inner.cart.set_quantity(unit_id, qty)?;
        self.publish(&inner);
        Ok(())
    }

    /// Replaces the active cart discount.
    pub fn set_discount(&self, discount: Discount) -> RegisterResult<()> {
        let mut inner = self.lock();
        Self::ensure_cart_unlocked(&inner)?;
        inner.cart.set_discount(discount);
        self.publish(&inner);
        Ok(())
    }

    /// Clears the discount back to none.
    pub fn clear_discount(&self) -> RegisterResult<()> {
        let mut inner = self.lock();
        Self::ensure_cart_unlocked(&inner)?;
        inner.cart.clear_discount();
        self.publish(&inner);
        Ok(())
    }

    /// Empties the cart (lines and discount).
    pub fn clear_cart(&self) -> RegisterResult<()> {
        let mut inner = self.lock();
        Self::ensure_cart_unlocked(&inner)?;
        inner.cart.clear();
        self.publish(&inner);
        Ok(())
    }

    // =========================================================================
    // Checkout Lifecycle
    // =========================================================================

    fn attempt_mut<'a>(
        inner: &'a mut MutexGuard<'_, RegisterInner>,
    ) -> RegisterResult<&'a mut CheckoutAttempt> {
        inner
            .attempt
            .as_mut()
            .ok_or_else(|| RegisterError::checkout_state("No checkout is in progress"))
    }

    /// Freezes the cart and opens an attempt in `CollectingCustomer`.
    pub fn begin_checkout(&self) -> RegisterResult<()> {
        let mut inner = self.lock();
        if inner.attempt.is_some() {
            return Err(RegisterError::checkout_state("A checkout is already in progress"));
        }
        inner.attempt = Some(CheckoutAttempt::begin(inner.cart.clone())?);
        self.publish(&inner);
        Ok(())
    }

    /// Replaces the customer details on the open attempt.
    pub fn set_customer(&self, customer: CustomerDetails) -> RegisterResult<()> {
        let mut inner = self.lock();
        Self::attempt_mut(&mut inner)?.set_customer(customer)?;
        self.publish(&inner);
        Ok(())
    }

    /// Advances from customer capture to payment collection.
    pub fn proceed_to_payment(&self) -> RegisterResult<()> {
        let mut inner = self.lock();
        Self::attempt_mut(&mut inner)?.proceed_to_payment()?;
        self.publish(&inner);
        Ok(())
    }

    /// Adds a tender entry; returns its id for later edits.
    pub fn add_tender(&self, method: TenderMethod) -> RegisterResult<String> {
        let mut inner = self.lock();
        let id = Self::attempt_mut(&mut inner)?.add_tender(method)?;
        self.publish(&inner);
        Ok(id)
    }

    /// Deletes a tender entry.
    pub fn remove_tender(&self, id: &str) -> RegisterResult<()> {
        let mut inner = self.lock();
        Self::attempt_mut(&mut inner)?.remove_tender(id)?;
        self.publish(&inner);
        Ok(())
    }

    /// Overwrites a tendered amount.
    pub fn set_tender_amount(&self, id: &str, amount: Money) -> RegisterResult<()> {
        let mut inner = self.lock();
        Self::attempt_mut(&mut inner)?.set_tender_amount(id, amount)?;
        self.publish(&inner);
        Ok(())
    }

    /// Submits the open attempt to the gateway.
    ///
    /// Gates and freezes under the lock, awaits the network WITHOUT the
    /// lock, then applies the outcome under the lock again. On failure the
    /// attempt parks in `Failed` and the error is also returned so the
    /// calling surface can toast it immediately.
    pub async fn submit(&self) -> RegisterResult<()> {
        let request = {
            let mut inner = self.lock();
            let request = Self::attempt_mut(&mut inner)?.begin_submit(&self.warehouse_id)?;
            self.publish(&inner);
            request
        };

        let outcome = self.gateway.submit_checkout(&request).await;

        let mut inner = self.lock();
        let attempt = Self::attempt_mut(&mut inner)?;
        let result = match outcome {
            Ok(sale) => {
                info!(sale_id = %sale.sale_id, invoice = %sale.invoice_number, "Sale settled");
                attempt.resolve_success(sale)?;
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, retryable = err.is_retryable(), "Checkout submission failed");
                let register_err = RegisterError::from(err);
                attempt.resolve_failure(register_err.message.clone())?;
                Err(register_err)
            }
        };
        self.publish(&inner);
        result
    }

    /// Returns a `Failed` attempt to `CollectingPayment`, tenders intact.
    pub fn retry(&self) -> RegisterResult<()> {
        let mut inner = self.lock();
        Self::attempt_mut(&mut inner)?.retry()?;
        self.publish(&inner);
        Ok(())
    }

    /// Discards the open attempt without touching the cart. Refused while a
    /// submission is in flight - once submitted, the attempt must resolve.
    /// Also refused after settlement: the sale already exists server-side,
    /// and dropping the attempt would leave the sold lines in the cart to be
    /// checked out a second time. A settled attempt exits via
    /// [`RegisterSession::complete_sale`].
    pub fn abandon_checkout(&self) -> RegisterResult<()> {
        let mut inner = self.lock();
        let attempt = Self::attempt_mut(&mut inner)?;
        match attempt.step() {
            CheckoutStep::Submitting => {
                return Err(RegisterError::checkout_state(
                    "Cannot abandon while a submission is in flight",
                ))
            }
            CheckoutStep::Succeeded => {
                return Err(RegisterError::checkout_state(
                    "Sale is already settled; complete it instead",
                ))
            }
            _ => {}
        }
        inner.attempt = None;
        self.publish(&inner);
        Ok(())
    }

    /// Ends the attempt AND clears the cart. The explicit "give up on this
    /// sale" exit from `Failed`; refused while in flight.
    pub fn cancel_and_clear(&self) -> RegisterResult<()> {
        let mut inner = self.lock();
        let attempt = Self::attempt_mut(&mut inner)?;
        if attempt.step().is_in_flight() {
            return Err(RegisterError::checkout_state(
                "Cannot cancel while a submission is in flight",
            ));
        }
        inner.attempt = None;
        inner.cart.clear();
        self.publish(&inner);
        Ok(())
    }

    /// The explicit success exit: returns the settled sale, clears the cart,
    /// and ends the attempt. This is the ONLY path that clears the cart on
    /// success.
    pub fn complete_sale(&self) -> RegisterResult<SettledSale> {
        let mut inner = self.lock();
        let sale = match inner.attempt.as_ref().and_then(|a| a.settled()) {
            Some(sale) => sale.clone(),
            None => {
                return Err(RegisterError::checkout_state(
                    "No settled sale to complete",
                ))
            }
        };

        inner.attempt = None;
        inner.cart.clear();
        self.publish(&inner);

        info!(invoice = %sale.invoice_number, "Sale completed, cart cleared");
        Ok(sale)
    }
}

impl std::fmt::Debug for RegisterSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterSession")
            .field("warehouse_id", &self.warehouse_id)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Integration-Style Tests (scripted gateway fake)
// =============================================================================
