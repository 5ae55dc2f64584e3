//! # Order Draft & Line Accumulator
//!
//! The in-progress order and the merge-or-append operation that is the only
//! way scanned products enter it.
//!
//! ## Merge-or-Append Semantics
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Scanned-Product Accumulation                         │
//! │                                                                         │
//! │  Product arrives from resolver                                          │
//! │          │                                                              │
//! │          ▼                                                              │
//! │  line with same product_id already in draft?                            │
//! │     │ yes                        │ no                                   │
//! │     ▼                            ▼                                      │
//! │  new draft, that line's       new draft, line appended with qty 1       │
//! │  quantity + 1                    │                                      │
//! │     │                            ▼                                      │
//! │     │                    draft was empty AND product has a category?    │
//! │     │                       │ yes → service_type = category             │
//! │     │                       │ no  → service_type untouched              │
//! │     ▼                            ▼                                      │
//! │  QuantityIncreased            LineAdded                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Immutable-Update Discipline
//! Every accumulation produces a **new** draft value; the previous value is
//! never mutated in place. The router swaps the new value in atomically, so
//! a stale timer callback holding yesterday's draft can never corrupt the
//! live one.
//!
//! ## The Manual Path Does Not Merge
//! `append_manual` always appends, even for a product already in the draft.
//! That asymmetry matches observed production behavior and is preserved
//! deliberately; see DESIGN.md before "fixing" it.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::Product;
use crate::validation::{validate_quantity, validate_unit_price};
use crate::MAX_ORDER_LINES;

// =============================================================================
// Order Line
// =============================================================================

/// A line item in an order draft.
///
/// Product data is frozen at the moment of adding: if the catalog price
/// changes afterwards, the line keeps the price the customer was quoted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    /// Product ID (frozen reference).
    pub product_id: String,

    /// Product name at time of adding (frozen).
    pub product_name: String,

    /// SKU at time of adding (frozen).
    pub sku: String,

    /// Quantity ordered. Always >= 1.
    pub quantity: u32,

    /// Unit price in cents at time of adding (frozen, non-negative).
    pub unit_price: Money,

    /// Free-form operator notes for this line.
    pub notes: String,
}

impl OrderLine {
    /// Creates the line a first scan of a product produces.
    fn from_scan(product: &Product) -> Self {
        OrderLine {
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            sku: product.sku.clone(),
            quantity: 1,
            unit_price: product.price,
            notes: String::new(),
        }
    }

    /// Line total (unit price x quantity).
    pub fn line_total(&self) -> Money {
        self.unit_price * self.quantity
    }
}

// =============================================================================
// Add Outcome
// =============================================================================

/// What the accumulator did with a scanned product.
///
/// The router uses this to phrase the success notification: operators need
/// to know whether a beep meant "new line" or "same line, one more".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum AddOutcome {
    /// A new line was appended with quantity 1.
    LineAdded {
        product_id: String,
        product_name: String,
    },
    /// An existing line's quantity was incremented by exactly 1.
    QuantityIncreased {
        product_id: String,
        product_name: String,
        /// The line's quantity after the increment.
        quantity: u32,
    },
}

// =============================================================================
// Order Draft
// =============================================================================

/// The in-progress order being composed.
///
/// ## Invariants
/// - `service_type` is set once, from the first line ever added to an empty
///   draft, and never overwritten by later lines
/// - every line's quantity is >= 1
/// - lines keep their insertion order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
    /// Draft identifier (UUID v4), assigned when composition begins.
    pub id: String,

    /// Customer the order is for. Filled in by the operator, not by scans.
    pub customer_name: String,

    /// Free-form order notes.
    pub notes: String,

    /// Requested pickup date, if any.
    #[ts(as = "Option<String>")]
    pub pickup_date: Option<NaiveDate>,

    /// Service type, derived from the first line's category. Set once.
    pub service_type: Option<String>,

    /// Line items, in insertion order.
    pub lines: Vec<OrderLine>,

    /// When composition began.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl OrderDraft {
    /// Creates an empty draft. Called when the composition surface opens.
    pub fn new() -> Self {
        OrderDraft {
            id: Uuid::new_v4().to_string(),
            customer_name: String::new(),
            notes: String::new(),
            pickup_date: None,
            service_type: None,
            lines: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Applies merge-or-append for a scanned product, yielding a new draft.
    ///
    /// ## Behavior
    /// - Product already in draft: that line's quantity + 1, all other
    ///   lines unchanged
    /// - Product not in draft: new line appended with quantity 1; if the
    ///   draft was empty and the product carries a category, `service_type`
    ///   is set from it
    ///
    /// This never mutates `self`; the caller swaps in the returned draft.
    pub fn add_scanned(&self, product: &Product) -> (OrderDraft, AddOutcome) {
        let mut next = self.clone();

        if let Some(line) = next.lines.iter_mut().find(|l| l.product_id == product.id) {
            line.quantity += 1;
            let outcome = AddOutcome::QuantityIncreased {
                product_id: line.product_id.clone(),
                product_name: line.product_name.clone(),
                quantity: line.quantity,
            };
            return (next, outcome);
        }

        let was_empty = next.lines.is_empty();
        next.lines.push(OrderLine::from_scan(product));

        if was_empty && next.service_type.is_none() {
            next.service_type = product.category_name.clone();
        }

        let outcome = AddOutcome::LineAdded {
            product_id: product.id.clone(),
            product_name: product.name.clone(),
        };
        (next, outcome)
    }

    /// Appends a manually entered line, yielding a new draft.
    ///
    /// Unlike [`add_scanned`](Self::add_scanned), this ALWAYS appends - a
    /// product already in the draft gets a second line. Quantity and unit
    /// price come from operator input and are validated here.
    pub fn append_manual(
        &self,
        product: &Product,
        quantity: u32,
        unit_price: Money,
        notes: &str,
    ) -> CoreResult<OrderDraft> {
        validate_quantity(quantity)?;
        validate_unit_price(unit_price)?;

        if self.lines.len() >= MAX_ORDER_LINES {
            return Err(CoreError::DraftTooLarge {
                max: MAX_ORDER_LINES,
            });
        }

        let mut next = self.clone();
        let was_empty = next.lines.is_empty();
        next.lines.push(OrderLine {
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            sku: product.sku.clone(),
            quantity,
            unit_price,
            notes: notes.to_string(),
        });

        if was_empty && next.service_type.is_none() {
            next.service_type = product.category_name.clone();
        }

        Ok(next)
    }

    /// Number of line items.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Total quantity across all lines.
    pub fn total_quantity(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Draft subtotal (sum of line totals).
    pub fn subtotal(&self) -> Money {
        self.lines
            .iter()
            .fold(Money::zero(), |acc, l| acc + l.line_total())
    }

    /// Checks if the draft has no lines yet.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl Default for OrderDraft {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
