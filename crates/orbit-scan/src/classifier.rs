//! # Scan Classifier
//!
//! The keystroke state machine. Watches digits and Enter keys and decides -
//! from timing evidence alone - whether they came from a hardware scanner.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Classifier States                                  │
//! │                                                                         │
//! │            digit                        inactivity deadline             │
//! │  ┌──────┐ ───────► ┌──────────────┐ ──────────────────────► ┌──────┐   │
//! │  │ Idle │          │ Accumulating │      (silent abort)      │ Idle │   │
//! │  └──────┘ ◄─────── └──────────────┘                         └──────┘   │
//! │              Enter        │                                             │
//! │                           │ digit: append, refresh deadline             │
//! │                           │   gap < 30ms        → streak + 1            │
//! │                           │   30ms ≤ gap < 100ms → streak unchanged     │
//! │                           │   gap ≥ 100ms       → streak = 0            │
//! │                           ▼                                             │
//! │              Enter: confirmed iff streak ≥ 3 OR length ≥ 8              │
//! │                ├── confirmed     → emit RecognizedCode, suppress Enter  │
//! │                └── not confirmed → discard silently, Enter proceeds     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Why These Rules Work
//! Scanners emit digits at machine speed in a tight burst terminated by
//! Enter; humans are slower and less uniform. The length-8 override exists
//! because some scanners are slow on their first read after waking yet still
//! produce long codes; without it a slow first read would be misclassified
//! as typing.
//!
//! ## Timing Constants
//! The thresholds in [`ScanTuning`] were tuned against the deployed scanner
//! hardware. Do not retune them without hardware validation.
//!
//! ## No Timers Here
//! The classifier never sleeps. It exposes the armed inactivity deadline via
//! [`pending_timer`](ScanClassifier::pending_timer) and the host hands the
//! expiry back through [`handle_timeout`](ScanClassifier::handle_timeout)
//! with a generation token; a stale token is a silent no-op.

use std::time::{Duration, Instant};

use tracing::{debug, trace};

use orbit_core::RecognizedCode;

use crate::event::{Key, KeyEvent};
use crate::timer::{PendingTimer, TimerKind, TimerToken, TokenSource};

// =============================================================================
// Tuning
// =============================================================================

/// Named timing/confidence constants for the scan pipeline.
///
/// Tuned against the deployed scanner model; treat as fixed configuration,
/// not free parameters.
#[derive(Debug, Clone, Copy)]
pub struct ScanTuning {
    /// A gap below this counts as machine-speed ("fast").
    pub fast_key_threshold: Duration,

    /// Buffer is discarded after this much silence.
    pub inactivity_timeout: Duration,

    /// Consecutive fast keys needed to confirm a scanner burst.
    pub confidence_streak: u32,

    /// Buffers at least this long commit regardless of speed.
    pub long_code_length: usize,

    /// How long the router waits for the composition surface to become
    /// ready after opening it from the idle page.
    pub settle_delay: Duration,
}

impl Default for ScanTuning {
    fn default() -> Self {
        ScanTuning {
            fast_key_threshold: Duration::from_millis(30),
            inactivity_timeout: Duration::from_millis(100),
            confidence_streak: 3,
            long_code_length: 8,
            settle_delay: Duration::from_millis(250),
        }
    }
}

// =============================================================================
// Dispositions
// =============================================================================

/// What the classifier did with one key event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyDisposition {
    /// Key not observed (opaque target, non-digit, or Enter while idle).
    /// Native behavior proceeds.
    Ignored,

    /// Digit absorbed into the live buffer. Native behavior proceeds, so
    /// the digit still appears in whatever field has focus.
    Buffered,

    /// Confirmed commit. The Enter key's default effect MUST be suppressed
    /// by the host; the code is the classifier's output.
    Committed(RecognizedCode),

    /// Unconfirmed Enter: the buffer was discarded silently and the Enter
    /// key's default effect proceeds (ordinary field submission).
    PassThrough,
}

/// Result of handing an expired inactivity timer back to the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeoutOutcome {
    /// The live buffer was discarded; the classifier is idle again.
    BufferDiscarded,
    /// The token no longer matches: the deadline was invalidated after the
    /// host armed its timer. Nothing happened.
    Stale,
}

// =============================================================================
// Classifier
// =============================================================================

/// Ephemeral state while digits are accumulating.
#[derive(Debug)]
struct Buffer {
    /// Digits seen so far. Only '0'-'9' are ever pushed.
    digits: String,
    /// Timestamp of the most recent digit.
    last_key_at: Instant,
    /// Consecutive fast keys, counting the burst's opening key.
    fast_streak: u32,
    /// Armed inactivity deadline.
    deadline: Instant,
    /// Token the deadline was armed under.
    token: TimerToken,
}

#[derive(Debug)]
enum State {
    Idle,
    Accumulating(Buffer),
}

/// The keystroke state machine.
///
/// One classifier instance exists per listening context; a context switch
/// destroys it (and with it any live buffer) via the owning router.
#[derive(Debug)]
pub struct ScanClassifier {
    tuning: ScanTuning,
    tokens: TokenSource,
    state: State,
}

impl ScanClassifier {
    /// Creates an idle classifier.
    pub fn new(tuning: ScanTuning) -> Self {
        ScanClassifier {
            tuning,
            tokens: TokenSource::default(),
            state: State::Idle,
        }
    }

    /// Feeds one key event through the state machine.
    pub fn handle_key(&mut self, event: &KeyEvent) -> KeyDisposition {
        // Textarea and selection controls are invisible to the classifier,
        // regardless of state.
        if event.target.is_opaque() {
            return KeyDisposition::Ignored;
        }

        match event.key {
            Key::Char(c) if c.is_ascii_digit() => self.on_digit(c, event.timestamp),
            Key::Enter => self.on_enter(),
            // Non-digit printables never enter the buffer and never disturb it.
            _ => KeyDisposition::Ignored,
        }
    }

    /// The armed inactivity deadline, if a buffer is live.
    pub fn pending_timer(&self) -> Option<PendingTimer> {
        match &self.state {
            State::Idle => None,
            State::Accumulating(buf) => Some(PendingTimer {
                kind: TimerKind::InactivityReset,
                token: buf.token,
                deadline: buf.deadline,
            }),
        }
    }

    /// Handles an expired inactivity timer.
    ///
    /// A stale token (deadline refreshed or context torn down after the
    /// host armed its timer) is a silent no-op - never a crash, never a
    /// mutation of state the timer no longer owns.
    pub fn handle_timeout(&mut self, token: TimerToken) -> TimeoutOutcome {
        if !self.tokens.is_live(token) {
            trace!("stale inactivity timer ignored");
            return TimeoutOutcome::Stale;
        }

        if let State::Accumulating(buf) = &self.state {
            trace!(buffered = buf.digits.len(), "inactivity timeout, buffer discarded");
        }
        self.tokens.invalidate();
        self.state = State::Idle;
        TimeoutOutcome::BufferDiscarded
    }

    /// The live buffer contents, for visual mirroring only.
    pub fn buffer(&self) -> Option<&str> {
        match &self.state {
            State::Idle => None,
            State::Accumulating(buf) => Some(&buf.digits),
        }
    }

    /// Discards any live buffer and invalidates outstanding timers.
    /// Called on context teardown.
    pub fn reset(&mut self) {
        self.tokens.invalidate();
        self.state = State::Idle;
    }

    // -------------------------------------------------------------------------
    // Transitions
    // -------------------------------------------------------------------------

    fn on_digit(&mut self, c: char, at: Instant) -> KeyDisposition {
        match &mut self.state {
            State::Idle => {
                let token = self.tokens.next();
                // The opening key of a burst counts toward the streak: a
                // scanner's three-digit code arrives as three fast keys.
                self.state = State::Accumulating(Buffer {
                    digits: c.to_string(),
                    last_key_at: at,
                    fast_streak: 1,
                    deadline: at + self.tuning.inactivity_timeout,
                    token,
                });
                trace!("buffer opened");
            }
            State::Accumulating(buf) => {
                let gap = at.saturating_duration_since(buf.last_key_at);
                if gap < self.tuning.fast_key_threshold {
                    buf.fast_streak += 1;
                } else if gap >= self.tuning.inactivity_timeout {
                    // The host's timer should have fired first; under
                    // jitter it may not have. Treat the buffer as a fresh
                    // start for confidence purposes but keep the digits.
                    buf.fast_streak = 0;
                }
                buf.digits.push(c);
                buf.last_key_at = at;
                buf.deadline = at + self.tuning.inactivity_timeout;
                // Refresh, not merely re-arm: the old deadline's token dies.
                buf.token = self.tokens.next();
                trace!(
                    len = buf.digits.len(),
                    streak = buf.fast_streak,
                    gap_ms = gap.as_millis() as u64,
                    "digit buffered"
                );
            }
        }
        KeyDisposition::Buffered
    }

    fn on_enter(&mut self) -> KeyDisposition {
        let buf = match std::mem::replace(&mut self.state, State::Idle) {
            State::Idle => return KeyDisposition::Ignored,
            State::Accumulating(buf) => buf,
        };
        self.tokens.invalidate();

        let confirmed = buf.fast_streak >= self.tuning.confidence_streak
            || buf.digits.len() >= self.tuning.long_code_length;

        if confirmed {
            debug!(code = %buf.digits, streak = buf.fast_streak, "scan committed");
            KeyDisposition::Committed(RecognizedCode::new(buf.digits))
        } else {
            // Ambiguous short/slow input is never surfaced; the Enter key
            // keeps its native effect (e.g., quantity-field submission).
            trace!(len = buf.digits.len(), streak = buf.fast_streak, "ambiguous buffer discarded");
            KeyDisposition::PassThrough
        }
    }
}

impl Default for ScanClassifier {
    fn default() -> Self {
        Self::new(ScanTuning::default())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
