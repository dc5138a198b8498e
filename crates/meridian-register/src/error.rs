//! # Register Error Type
//!
//! The error shape rendering surfaces receive.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow to Surfaces                               │
//! │                                                                         │
//! │  Surface                      Register Session                          │
//! │  ───────                      ────────────────                         │
//! │                                                                         │
//! │  session.add_unit(&unit)                                               │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Result<T, RegisterError>                                        │  │
//! │  │         │                                                        │  │
//! │  │  CoreError::OutOfStock ──────────► OUT_OF_STOCK ────────────────►│  │
//! │  │  CoreError::Validation ──────────► VALIDATION_ERROR ────────────►│  │
//! │  │  CheckoutError::Rejected ────────► SUBMISSION_ERROR ────────────►│  │
//! │  │  wrong-state entry point ────────► CHECKOUT_STATE ──────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  try {                                                                  │
//! │    await session.addUnit(unit)                                          │
//! │  } catch (e) {                                                          │
//! │    // e.code    = "OUT_OF_STOCK"                                        │
//! │    // e.message = "Cotton Tee (TEE-M-BLU) is out of stock"              │
//! │  }                                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Surfaces branch on the machine-readable `code`; the `message` is already
//! display-ready.

use serde::Serialize;
use ts_rs::TS;

use meridian_checkout::CheckoutError;
use meridian_core::{CoreError, ValidationError};

/// Convenience type alias for Results with RegisterError.
pub type RegisterResult<T> = Result<T, RegisterError>;

/// Error returned from every session operation.
///
/// ## Serialization
/// This is what a surface receives when an operation fails:
/// ```json
/// {
///   "code": "CHECKOUT_STATE",
///   "message": "Cart is locked while a checkout is in progress"
/// }
/// ```
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RegisterError {
    /// Machine-readable error code for programmatic handling.
    pub code: ErrorCode,

    /// Human-readable error message for display.
    pub message: String,
}

/// Error codes surfaces can branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// The cached stock snapshot blocked an add.
    OutOfStock,

    /// Input validation failed (customer details, warehouse, query).
    ValidationError,

    /// Cart operation failed (unknown line, empty cart).
    CartError,

    /// The operation is not legal in the current checkout state.
    CheckoutState,

    /// The server rejected the submission or it could not be delivered.
    SubmissionError,

    /// Tender operation failed (unknown entry, unsatisfied submit gate).
    PaymentError,
}

impl RegisterError {
    /// Creates a new register error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        RegisterError {
            code,
            message: message.into(),
        }
    }

    /// An operation arrived in a checkout state that does not permit it.
    pub fn checkout_state(message: impl Into<String>) -> Self {
        RegisterError::new(ErrorCode::CheckoutState, message)
    }

    /// A cart-level rule refused the operation.
    pub fn cart(message: impl Into<String>) -> Self {
        RegisterError::new(ErrorCode::CartError, message)
    }

    /// The submit gate or a tender edit refused the operation.
    pub fn payment(message: impl Into<String>) -> Self {
        RegisterError::new(ErrorCode::PaymentError, message)
    }
}

impl std::fmt::Display for RegisterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for RegisterError {}

// =============================================================================
// Conversions from Lower Layers
// =============================================================================

impl From<CoreError> for RegisterError {
    fn from(err: CoreError) -> Self {
        let code = match &err {
            CoreError::OutOfStock { .. } => ErrorCode::OutOfStock,
            CoreError::UnitNotInCart(_) => ErrorCode::CartError,
            CoreError::TenderNotFound(_) => ErrorCode::PaymentError,
            CoreError::Validation(_) => ErrorCode::ValidationError,
        };
        RegisterError::new(code, err.to_string())
    }
}

impl From<ValidationError> for RegisterError {
    fn from(err: ValidationError) -> Self {
        RegisterError::new(ErrorCode::ValidationError, err.to_string())
    }
}

impl From<CheckoutError> for RegisterError {
    fn from(err: CheckoutError) -> Self {
        RegisterError::new(ErrorCode::SubmissionError, err.to_string())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
