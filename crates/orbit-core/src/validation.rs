//! # Validation Module
//!
//! Input validation for the manual entry path and for scan codes.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Scanner path:                                                          │
//! │  └── digits-only by construction (the classifier buffers nothing else) │
//! │      validate_scan_code is a defense for codes arriving from outside    │
//! │      the classifier (e.g., replayed from a stored order)                │
//! │                                                                         │
//! │  Manual path:                                                           │
//! │  └── THIS MODULE: operator-typed quantity and price checked before     │
//! │      any draft is touched                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use orbit_core::validation::{validate_quantity, validate_scan_code};
//!
//! validate_quantity(5).unwrap();
//! validate_scan_code("8901234").unwrap();
//! assert!(validate_scan_code("89A12").is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::{MAX_CODE_LENGTH, MAX_LINE_QUANTITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Validators
// =============================================================================

/// Validates an order line quantity.
///
/// ## Rules
/// - Must be at least 1
/// - Must not exceed [`MAX_LINE_QUANTITY`](crate::MAX_LINE_QUANTITY)
pub fn validate_quantity(quantity: u32) -> ValidationResult<()> {
    if quantity == 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if quantity > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: i64::from(MAX_LINE_QUANTITY),
        });
    }

    Ok(())
}

/// Validates a unit price.
///
/// ## Rules
/// - Must not be negative (zero is allowed: comped items exist)
pub fn validate_unit_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::MustBePositive {
            field: "unit_price".to_string(),
        });
    }

    Ok(())
}

/// Validates a scan code arriving from outside the classifier.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most [`MAX_CODE_LENGTH`](crate::MAX_CODE_LENGTH) characters
/// - Must contain only ASCII digits
pub fn validate_scan_code(code: &str) -> ValidationResult<()> {
    if code.is_empty() {
        return Err(ValidationError::Required {
            field: "code".to_string(),
        });
    }

    if code.len() > MAX_CODE_LENGTH {
        return Err(ValidationError::OutOfRange {
            field: "code".to_string(),
            min: 1,
            max: MAX_CODE_LENGTH as i64,
        });
    }

    if !code.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "code".to_string(),
            reason: "must contain only digits".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
