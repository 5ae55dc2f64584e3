//! # Notification Contract
//!
//! The narrow interface through which scan outcomes reach the operator.
//!
//! The pipeline never renders anything; it hands leveled, human-readable
//! messages to whatever surface the host application provides (toast layer,
//! status bar, headless log). No structured return value is required.

use serde::{Deserialize, Serialize};
use tracing::{error, info};

// =============================================================================
// Notification
// =============================================================================

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotifyLevel {
    Success,
    Error,
}

// =============================================================================
// Notifier Trait
// =============================================================================

/// Accepts leveled messages for the operator.
///
/// Implementations must be cheap and non-blocking: notifications are emitted
/// from the synchronous commit path, after the draft has already been
/// updated.
pub trait Notifier {
    /// Surfaces a success message ("item added", "quantity increased").
    fn success(&self, message: &str);

    /// Surfaces an error message ("unknown code", "product inactive").
    fn error(&self, message: &str);
}

// =============================================================================
// Tracing-Backed Implementation
// =============================================================================

/// A [`Notifier`] that writes to the `tracing` log.
///
/// Used headless (tests, soak rigs) and as a fallback when the host has not
/// wired a visual surface yet.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn success(&self, message: &str) {
        info!(target: "orbit_scan::notify", "{message}");
    }

    fn error(&self, message: &str) {
        error!(target: "orbit_scan::notify", "{message}");
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
