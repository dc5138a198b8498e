//! # meridian-register: Register Session + Checkout State Machine
//!
//! The per-device session layer: the ONLY crate rendering surfaces talk to.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   Meridian Cart & Checkout Engine                       │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   Rendering Surfaces (UI)                       │   │
//! │  └───────┬─────────────────────────────────────────────▲───────────┘   │
//! │          │ operations (Result<T, RegisterError>)       │ snapshots     │
//! │  ┌───────▼─────────────────────────────────────────────┴───────────┐   │
//! │  │              ★ meridian-register (THIS CRATE) ★                 │   │
//! │  │                                                                 │   │
//! │  │   RegisterSession ── owns ──► Cart + Option<CheckoutAttempt>   │   │
//! │  │        │                      (one std::sync::Mutex)           │   │
//! │  │        │ publishes                                             │   │
//! │  │        └──► watch::Sender<RegisterSnapshot>                    │   │
//! │  │                                                                 │   │
//! │  │   CheckoutAttempt: CollectingCustomer → CollectingPayment →    │   │
//! │  │                    Submitting → Succeeded | Failed (→ retry)   │   │
//! │  └───────┬─────────────────────────────────────────────────────────┘   │
//! │          │ Arc<dyn CheckoutSubmit>                                     │
//! │  ┌───────▼─────────────────────────────────────────────────────────┐   │
//! │  │   meridian-checkout (ApiClient)  /  meridian-core (pure logic)  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`session`] - The `RegisterSession` state container
//! - [`checkout`] - The `CheckoutAttempt` state machine
//! - [`views`] - Read-only camelCase views for surfaces
//! - [`error`] - The serializable `{ code, message }` error surfaces see
//!
//! ## Design Principles
//!
//! 1. **Single writer**: one mutex around cart + attempt; no other locking
//! 2. **Lock never crosses the network await**: submit gates under the lock,
//!    awaits without it, resolves under it again
//! 3. **Frozen snapshots**: the attempt clones the cart at begin; cart edits
//!    are refused until the attempt ends
//! 4. **The cart survives failure**: only the explicit success exit or an
//!    explicit cancel clears it

// =============================================================================
// Module Declarations
// =============================================================================

pub mod checkout;
pub mod error;
pub mod session;
pub mod views;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use checkout::{CheckoutAttempt, CheckoutStep};
pub use error::{ErrorCode, RegisterError, RegisterResult};
pub use session::RegisterSession;
pub use views::{CartLineView, CartView, CheckoutView, RegisterSnapshot, TenderView, TotalsView};
