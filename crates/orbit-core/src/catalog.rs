//! # Catalog Snapshot & Code Resolution
//!
//! Matches recognized scan codes against an in-memory catalog snapshot.
//!
//! ## Resolution Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Code Resolution                                    │
//! │                                                                         │
//! │  RecognizedCode("8901234")                                              │
//! │          │                                                              │
//! │          ▼                                                              │
//! │  1. exact match on product.barcode ──────────┐                          │
//! │          │ no match                          │                          │
//! │          ▼                                   │                          │
//! │  2. string compare against product.id ──────┤                          │
//! │          │ no match                          │ match                    │
//! │          ▼                                   ▼                          │
//! │   Err(UnknownCode)                 status == Active?                    │
//! │                                      │yes        │no                   │
//! │                                      ▼           ▼                     │
//! │                                 Ok(&Product)  Err(InactiveProduct)      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The snapshot is read-only. Freshness is the surrounding application's
//! concern: it hands a new snapshot to the router whenever the catalog
//! changes. Resolution never performs I/O, so it is safe to call from the
//! classifier's commit path.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CoreError, CoreResult};
use crate::types::Product;

// =============================================================================
// Recognized Code
// =============================================================================

/// A digit string the classifier judged to have originated from a scanner.
///
/// This is the classifier's sole output, produced only on a confirmed
/// commit. It is opaque: nothing downstream re-inspects the timing evidence
/// that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecognizedCode(String);

impl RecognizedCode {
    /// Wraps a committed digit buffer.
    pub fn new(digits: impl Into<String>) -> Self {
        RecognizedCode(digits.into())
    }

    /// Returns the code as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecognizedCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// Catalog Snapshot
// =============================================================================

/// An immutable, in-memory view of the product catalog.
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    products: Vec<Product>,
}

impl CatalogSnapshot {
    /// Builds a snapshot from a materialized product list.
    pub fn new(products: Vec<Product>) -> Self {
        CatalogSnapshot { products }
    }

    /// Number of products in the snapshot.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Checks whether the snapshot is empty.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Looks up a product by internal identifier.
    ///
    /// Used by the manual entry path, where the operator picks a product
    /// from a list rather than scanning it.
    pub fn product_by_id(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Resolves a recognized code against the snapshot.
    ///
    /// ## Matching Rules
    /// 1. Exact equality against `barcode`
    /// 2. Fallback: string comparison against the internal `id`
    ///
    /// ## Errors
    /// - [`CoreError::UnknownCode`] when nothing matches
    /// - [`CoreError::InactiveProduct`] when the match is withheld from sale
    ///
    /// The caller's draft is untouched on either error.
    pub fn resolve(&self, code: &RecognizedCode) -> CoreResult<&Product> {
        let found = self
            .products
            .iter()
            .find(|p| p.barcode.as_deref() == Some(code.as_str()))
            .or_else(|| self.products.iter().find(|p| p.id == code.as_str()));

        let product = found.ok_or_else(|| CoreError::UnknownCode(code.to_string()))?;

        if !product.is_active() {
            return Err(CoreError::InactiveProduct {
                name: product.name.clone(),
            });
        }

        Ok(product)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
