//! # Checkout Error Types
//!
//! Error types for the protocol client.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Checkout Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │   Transport     │  │     Protocol            │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  Network        │  │  InvalidResponse        │ │
//! │  │  InvalidUrl     │  │  Timeout        │  │  Rejected               │ │
//! │  │  ConfigLoad/    │  │                 │  │                         │ │
//! │  │  SaveFailed     │  │                 │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  Transport errors and 5xx rejections are RETRYABLE - but only by an    │
//! │  explicit user decision, and always under a fresh idempotency key.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Result type alias for checkout protocol operations.
pub type CheckoutResult<T> = Result<T, CheckoutError>;

/// Checkout protocol error type.
///
/// ## Design Principles
/// - Each variant includes enough context for debugging
/// - Errors are categorized for different handling strategies
/// - All errors are `Send + Sync` for async compatibility
#[derive(Debug, Error)]
pub enum CheckoutError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid checkout configuration.
    #[error("Invalid checkout configuration: {0}")]
    InvalidConfig(String),

    /// Invalid API base URL.
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),

    /// Failed to load config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Failed to save config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// The request could not be sent or the connection dropped mid-flight.
    #[error("Network error: {0}")]
    Network(String),

    /// The request timed out client-side. The attempt resolves to Failed
    /// instead of wedging the session in Submitting forever.
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    // =========================================================================
    // Protocol Errors
    // =========================================================================
    /// The server answered with a body we could not interpret.
    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),

    /// The server rejected the checkout (stock conflict, validation error,
    /// missing warehouse, ...). Carries the server's message when available.
    #[error("Checkout rejected ({status}): {message}")]
    Rejected { status: u16, message: String },
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<url::ParseError> for CheckoutError {
    fn from(err: url::ParseError) -> Self {
        CheckoutError::InvalidUrl(err.to_string())
    }
}

impl From<serde_json::Error> for CheckoutError {
    fn from(err: serde_json::Error) -> Self {
        CheckoutError::InvalidResponse(err.to_string())
    }
}

impl From<std::io::Error> for CheckoutError {
    fn from(err: std::io::Error) -> Self {
        CheckoutError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for CheckoutError {
    fn from(err: toml::de::Error) -> Self {
        CheckoutError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for CheckoutError {
    fn from(err: toml::ser::Error) -> Self {
        CheckoutError::ConfigSaveFailed(err.to_string())
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl CheckoutError {
    /// Returns true if a retry of the same logical checkout could plausibly
    /// succeed.
    ///
    /// Informational only: the client never retries by itself, and a retry
    /// always mints a fresh idempotency key.
    ///
    /// ## Retryable
    /// - Network failures and timeouts
    /// - 5xx rejections (the server fell over, not the request)
    ///
    /// ## Non-Retryable
    /// - Configuration errors
    /// - 4xx rejections (the request itself is wrong)
    /// - Unparseable responses
    pub fn is_retryable(&self) -> bool {
        match self {
            CheckoutError::Network(_) | CheckoutError::Timeout(_) => true,
            CheckoutError::Rejected { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            CheckoutError::InvalidConfig(_)
                | CheckoutError::InvalidUrl(_)
                | CheckoutError::ConfigLoadFailed(_)
                | CheckoutError::ConfigSaveFailed(_)
        )
    }
}
