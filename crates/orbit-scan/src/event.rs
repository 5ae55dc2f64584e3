//! # Key Event Model
//!
//! The raw input the classifier observes: one keystroke, with the identity
//! of the field it landed in and a monotonic timestamp.
//!
//! ## Why Instant, not wall-clock?
//! Scanner-vs-human discrimination hinges on inter-key gaps measured in
//! tens of milliseconds. `std::time::Instant` is monotonic and immune to
//! NTP adjustments; wall-clock time is neither.

use std::time::Instant;

// =============================================================================
// Key
// =============================================================================

/// A single key press, reduced to what the classifier cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    /// A printable character. Only ASCII digits ever enter the buffer.
    Char(char),
    /// The Enter key - the scanner's terminator.
    Enter,
    /// Any other named key (Tab, Escape, arrows...). Never observed.
    Other,
}

// =============================================================================
// Key Target
// =============================================================================

/// The kind of form control a keystroke landed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Ordinary text input (customer name, search box...).
    Text,
    /// Numeric input, e.g. the line-quantity field. An unconfirmed Enter
    /// here passes through as ordinary field submission, like any
    /// non-opaque target.
    Numeric,
    /// Multi-line text area. The classifier never observes these.
    Textarea,
    /// Selection control. The classifier never observes these.
    Select,
}

/// Where a keystroke landed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyTarget {
    /// No focused form control - the key went to the page itself.
    /// This is where scanner bursts usually land on the idle page.
    Page,
    /// A focused form control.
    Field { id: String, kind: FieldKind },
}

impl KeyTarget {
    /// Checks whether this target is opaque to the classifier.
    pub fn is_opaque(&self) -> bool {
        matches!(
            self,
            KeyTarget::Field {
                kind: FieldKind::Textarea | FieldKind::Select,
                ..
            }
        )
    }
}

// =============================================================================
// Key Event
// =============================================================================

/// One raw keyboard event as delivered by the host application.
#[derive(Debug, Clone)]
pub struct KeyEvent {
    /// The key that was pressed.
    pub key: Key,

    /// Monotonic timestamp captured at delivery.
    pub timestamp: Instant,

    /// The form control (or page) the keystroke landed in.
    pub target: KeyTarget,
}

impl KeyEvent {
    /// Convenience constructor for a digit keystroke.
    pub fn digit(c: char, timestamp: Instant, target: KeyTarget) -> Self {
        KeyEvent {
            key: Key::Char(c),
            timestamp,
            target,
        }
    }

    /// Convenience constructor for an Enter keystroke.
    pub fn enter(timestamp: Instant, target: KeyTarget) -> Self {
        KeyEvent {
            key: Key::Enter,
            timestamp,
            target,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
