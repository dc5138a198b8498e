//! # Validation Module
//!
//! Input validation rules for the cart & checkout engine.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Rendering Surface                                            │
//! │  ├── Basic format checks (empty, length)                               │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Field rules for customer details and store context                │
//! │  └── Runs before the state machine advances - no network call          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Server                                                       │
//! │  ├── Stock re-validation                                               │
//! │  └── Authoritative totals and settlement rules                         │
//! │                                                                         │
//! │  Defense in depth: multiple layers catch different errors              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a catalog search query.
///
/// ## Rules
/// - Can be empty (returns all/default results)
/// - Maximum 100 characters
///
/// ## Returns
/// The trimmed query string.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.len() > 100 {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: 100,
        });
    }

    Ok(query.to_string())
}

/// Validates a customer name.
///
/// ## Rules
/// - Must not be empty when present
/// - Must be at most 120 characters
pub fn validate_customer_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "customer name".to_string(),
        });
    }

    if name.len() > 120 {
        return Err(ValidationError::TooLong {
            field: "customer name".to_string(),
            max: 120,
        });
    }

    Ok(())
}

/// Validates a mobile number.
///
/// ## Rules
/// - Optional leading `+`
/// - Digits only, 7 to 15 of them (ITU E.164 bounds)
pub fn validate_mobile(mobile: &str) -> ValidationResult<()> {
    let mobile = mobile.trim();
    let digits = mobile.strip_prefix('+').unwrap_or(mobile);

    if digits.is_empty() {
        return Err(ValidationError::Required {
            field: "mobile".to_string(),
        });
    }

    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "mobile".to_string(),
            reason: "must contain only digits (optionally prefixed with +)".to_string(),
        });
    }

    if digits.len() < 7 || digits.len() > 15 {
        return Err(ValidationError::OutOfRange {
            field: "mobile digits".to_string(),
            min: 7,
            max: 15,
        });
    }

    Ok(())
}

/// Validates an email address shape.
///
/// ## Rules
/// - One `@` with non-empty local and domain parts
/// - Domain must contain a dot
///
/// Full RFC 5322 validation is the server's problem; this catches typos.
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::Required {
            field: "email".to_string(),
        });
    }

    if email.len() > 254 {
        return Err(ValidationError::TooLong {
            field: "email".to_string(),
            max: 254,
        });
    }

    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && domain.contains('.') && !domain.starts_with('.')
        }
        None => false,
    };

    if !valid {
        return Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "must look like name@domain.tld".to_string(),
        });
    }

    Ok(())
}

/// Validates a postal address.
///
/// ## Rules
/// - Must not be empty when present
/// - Must be at most 500 characters
pub fn validate_address(address: &str) -> ValidationResult<()> {
    let address = address.trim();

    if address.is_empty() {
        return Err(ValidationError::Required {
            field: "address".to_string(),
        });
    }

    if address.len() > 500 {
        return Err(ValidationError::TooLong {
            field: "address".to_string(),
            max: 500,
        });
    }

    Ok(())
}

/// Validates the warehouse/store context required by the checkout request.
pub fn validate_warehouse_id(warehouse_id: &str) -> ValidationResult<()> {
    if warehouse_id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "warehouse".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_search_query() {
        assert_eq!(validate_search_query("  coke  ").unwrap(), "coke");
        assert_eq!(validate_search_query("").unwrap(), "");
        assert!(validate_search_query(&"x".repeat(101)).is_err());
    }

    #[test]
    fn test_validate_customer_name() {
        assert!(validate_customer_name("Asha Verma").is_ok());
        assert!(validate_customer_name("").is_err());
        assert!(validate_customer_name("   ").is_err());
        assert!(validate_customer_name(&"A".repeat(121)).is_err());
    }

    #[test]
    fn test_validate_mobile() {
        assert!(validate_mobile("9876543210").is_ok());
        assert!(validate_mobile("+919876543210").is_ok());

        assert!(validate_mobile("").is_err());
        assert!(validate_mobile("+").is_err());
        assert!(validate_mobile("98-76").is_err());
        assert!(validate_mobile("123").is_err()); // too short
        assert!(validate_mobile("1234567890123456").is_err()); // too long
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("asha@example.com").is_ok());

        assert!(validate_email("").is_err());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("asha@").is_err());
        assert!(validate_email("asha@nodot").is_err());
    }

    #[test]
    fn test_validate_address() {
        assert!(validate_address("42 MG Road, Bengaluru").is_ok());
        assert!(validate_address("").is_err());
        assert!(validate_address(&"A".repeat(501)).is_err());
    }

    #[test]
    fn test_validate_warehouse_id() {
        assert!(validate_warehouse_id("wh-01").is_ok());
        assert!(validate_warehouse_id("").is_err());
        assert!(validate_warehouse_id("   ").is_err());
    }
}
