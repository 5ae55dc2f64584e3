//! # Error Types
//!
//! Domain-specific error types for orbit-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  orbit-core errors (this file)                                         │
//! │  ├── CoreError        - Resolution and draft-operation failures        │
//! │  └── ValidationError  - Input validation failures (manual entry path)  │
//! │                                                                         │
//! │  Not errors at all (by design):                                        │
//! │  ├── AmbiguousInput   - discarded scan buffers are silent, never        │
//! │  │                      surfaced, to avoid noise on ordinary typing     │
//! │  └── TimerRace        - stale timer tokens are a guarded no-op in       │
//! │                         orbit-scan, never a crash                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (code, product name, etc.)
//! 3. Errors are enum variants, never String
//! 4. No error here is fatal: the pipeline returns to idle after any outcome

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors are surfaced to the operator through the notification
/// contract; the order draft is guaranteed unchanged when any of them occurs.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A recognized code matched nothing in the catalog snapshot.
    ///
    /// ## When This Occurs
    /// - The scanned barcode belongs to a product not yet in the catalog
    /// - The code was a human burst that happened to look scanner-like
    #[error("No product matches code {0}")]
    UnknownCode(String),

    /// A recognized code matched a product that is not available for sale.
    ///
    /// ## When This Occurs
    /// - The product was deactivated (soft delete) after its label was printed
    #[error("Product '{name}' is inactive and cannot be added")]
    InactiveProduct { name: String },

    /// A draft operation was requested while no composition surface is open.
    #[error("No order composition in progress")]
    CompositionClosed,

    /// The draft has reached its maximum number of line items.
    #[error("Order cannot have more than {max} lines")]
    DraftTooLarge { max: usize },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur on the manual entry path, where the operator types quantity
/// and price by hand. The scanner path never produces them: its input is
/// digits-only by construction.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., non-digit characters in a code).
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
