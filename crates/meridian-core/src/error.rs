//! # Error Types
//!
//! Domain-specific error types for meridian-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  meridian-core errors (this file)                                      │
//! │  ├── CoreError        - Cart / tender rule violations                  │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  meridian-checkout errors (separate crate)                             │
//! │  └── CheckoutError    - Transport and protocol failures                │
//! │                                                                         │
//! │  meridian-register errors (separate crate)                             │
//! │  └── RegisterError    - What rendering surfaces see (serialized)       │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → RegisterError → Surface           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (SKU, id, etc.)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations in the cart and tender
/// state. They should be caught and translated to user-friendly messages.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The cached stock snapshot for a unit is zero, so the add was refused.
    ///
    /// ## When This Occurs
    /// - The catalog snapshot says the variant has no stock left
    ///
    /// ## Important
    /// The cached stock is advisory only. The server re-validates real stock
    /// at checkout; this guard just saves an obviously doomed round trip.
    #[error("{name} ({sku}) is out of stock")]
    OutOfStock { name: String, sku: String },

    /// The referenced unit has no line in the cart.
    ///
    /// ## When This Occurs
    /// - Removing or re-quantifying a line that was already removed
    /// - A stale unit id from a surface that missed a snapshot update
    #[error("Unit not in cart: {0}")]
    UnitNotInCart(String),

    /// The referenced tender entry does not exist.
    #[error("Tender entry not found: {0}")]
    TenderNotFound(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustBeNonNegative { field: String },

    /// Invalid format (e.g., malformed amount, malformed mobile number).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
