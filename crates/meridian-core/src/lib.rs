//! # meridian-core: Pure Business Logic for the Meridian Cart & Checkout Engine
//!
//! This crate is the **heart** of the Meridian point of sale. It contains all
//! cart, discount, tax, and tender logic as pure functions with zero I/O
//! dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   Meridian Cart & Checkout Engine                       │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   Rendering Surfaces (UI)                       │   │
//! │  │    Catalog Search ──► Cart ──► Tender Split ──► Settlement     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ read-only snapshots                    │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                   meridian-register                             │   │
//! │  │    RegisterSession, CheckoutAttempt state machine               │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ meridian-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   cart    │  │  tender   │  │   │
//! │  │   │ Sellable  │  │   Money   │  │   Cart    │  │TenderList │  │   │
//! │  │   │   Unit    │  │  GST calc │  │ CartLine  │  │ can_submit│  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • PURE FUNCTIONS                         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (SellableUnit, TenderMethod, CustomerDetails)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`cart`] - Cart, CartLine and derived totals
//! - [`discount`] - The single cart-level discount and its math
//! - [`tender`] - Multi-tender payment allocation and the submit gate
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation rules
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every derived value is recomputed from current
//!    state - nothing cached, nothing stale
//! 2. **No I/O**: Network, file system, clock-driven behaviour is FORBIDDEN
//!    here (timestamps are recorded, never acted upon)
//! 3. **Integer Money**: All monetary values are in paise (i64) to avoid
//!    float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use meridian_core::money::Money;
//! use meridian_core::discount::Discount;
//!
//! // Create money from paise (never from floats!)
//! let subtotal = Money::from_paise(20_000); // ₹200.00
//!
//! // A 10% discount, rounded half-up to the whole rupee
//! let discount = Discount::percentage(10).unwrap();
//! assert_eq!(discount.amount_off(subtotal).paise(), 2_000); // ₹20.00
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod discount;
pub mod error;
pub mod money;
pub mod tender;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use meridian_core::Money` instead of
// `use meridian_core::money::Money`

pub use cart::{Cart, CartLine, CartTotals};
pub use discount::Discount;
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use tender::{TenderEntry, TenderList};
pub use types::*;
