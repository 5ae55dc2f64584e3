//! # Domain Types
//!
//! Core domain types shared across the scanner pipeline.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │  ProductStatus  │   │  OrderLine      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  (order.rs)     │       │
//! │  │  id             │   │  Active         │   │                 │       │
//! │  │  sku / barcode  │   │  Inactive       │   │                 │       │
//! │  │  price (Money)  │   └─────────────────┘   └─────────────────┘       │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! A product carries two scannable identities:
//! - `barcode`: the printed label a hardware scanner reads
//! - `id`: the internal identifier, which some stores print on shelf labels
//!   as a short numeric code; the resolver string-compares scanned codes
//!   against it as a fallback

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Product Status
// =============================================================================

/// Availability of a product for sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    /// Product may be added to orders.
    Active,
    /// Product exists in the catalog but is withheld from sale (soft delete).
    Inactive,
}

impl Default for ProductStatus {
    fn default() -> Self {
        ProductStatus::Active
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product from the catalog snapshot.
///
/// This is a read-only view: the surrounding application materializes and
/// refreshes the catalog; this core never mutates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Internal identifier. May be numeric ("7") on legacy catalogs;
    /// always compared as a string.
    pub id: String,

    /// Display name shown on the composition surface.
    pub name: String,

    /// Stock Keeping Unit - business identifier.
    pub sku: String,

    /// Printed barcode, if the product carries one.
    pub barcode: Option<String>,

    /// Unit price in cents.
    pub price: Money,

    /// Whether the product may currently be sold.
    pub status: ProductStatus,

    /// Category the product belongs to, used to derive an order's
    /// service type from its first line.
    pub category_name: Option<String>,
}

impl Product {
    /// Checks if the product is available for sale.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.status == ProductStatus::Active
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn product(status: ProductStatus) -> Product {
        Product {
            id: "7".to_string(),
            name: "Business Cards 100pk".to_string(),
            sku: "BC-100".to_string(),
            barcode: Some("8901234".to_string()),
            price: Money::from_cents(2500),
            status,
            category_name: Some("Printing".to_string()),
        }
    }

    #[test]
    fn test_status_default_is_active() {
        assert_eq!(ProductStatus::default(), ProductStatus::Active);
    }

    #[test]
    fn test_is_active() {
        assert!(product(ProductStatus::Active).is_active());
        assert!(!product(ProductStatus::Inactive).is_active());
    }
}
