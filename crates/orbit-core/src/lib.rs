//! # orbit-core: Pure Business Logic for the Orbit POS Scanner Pipeline
//!
//! This crate is the **heart** of the scanner ingestion feature. It contains
//! all business logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Scanner Ingestion Architecture                       │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Order-Entry Console (external)                  │   │
//! │  │    Raw key events ──► composition surface ──► order submission  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    orbit-scan (pipeline)                        │   │
//! │  │    ScanClassifier ──► ScanRouter ──► resolve ──► accumulate     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ orbit-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐   │   │
//! │  │   │   types   │  │   money   │  │  catalog  │  │   order   │   │   │
//! │  │   │  Product  │  │   Money   │  │  resolve  │  │   Draft   │   │   │
//! │  │   │  status   │  │   cents   │  │  snapshot │  │   lines   │   │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘   │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO TIMERS • NO NETWORK • PURE FUNCTIONS              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, ProductStatus)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`catalog`] - Catalog snapshot and code resolution
//! - [`order`] - Order draft and the merge-or-append accumulator
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, timers are FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in cents (i64) to avoid float errors
//! 4. **Immutable Drafts**: Accumulation produces a new draft value, never an
//!    in-place mutation - stale timer callbacks can never corrupt a draft they
//!    no longer own

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod error;
pub mod money;
pub mod order;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use orbit_core::Money` instead of
// `use orbit_core::money::Money`

pub use catalog::{CatalogSnapshot, RecognizedCode};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use order::{AddOutcome, OrderDraft, OrderLine};
pub use types::{Product, ProductStatus};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum line items allowed in a single order draft
///
/// ## Business Reason
/// Prevents runaway drafts and keeps the composition surface responsive.
pub const MAX_ORDER_LINES: usize = 100;

/// Maximum quantity of a single line item
///
/// ## Business Reason
/// Prevents accidental over-ordering on the manual entry path
/// (e.g., typing 1000 instead of 10).
pub const MAX_LINE_QUANTITY: u32 = 999;

/// Maximum length accepted for a scanned code before it is rejected as noise.
pub const MAX_CODE_LENGTH: usize = 32;
