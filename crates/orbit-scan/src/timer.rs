//! # Timer Tokens
//!
//! Explicit, generation-checked deadlines instead of ad hoc delayed
//! callbacks.
//!
//! ## The Race This Prevents
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  t=0ms    digit arrives, inactivity deadline armed (token 4)            │
//! │  t=60ms   operator closes the composition surface                       │
//! │           └── context teardown bumps the generation (token 5)           │
//! │  t=100ms  the host's timer for token 4 fires anyway                     │
//! │           └── handle_timer(4): 4 != 5 → STALE, silent no-op             │
//! │                                                                         │
//! │  Without the token check, the late callback would abort a buffer (or    │
//! │  dispatch a code) belonging to a context that no longer exists.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The classifier and router never own wall-clock timers. They expose the
//! currently armed [`PendingTimer`]; the host sleeps until its deadline and
//! hands the timer back. Any state change that invalidates the deadline
//! bumps the generation, so a late hand-back is recognizably stale.

use std::time::Instant;

/// Opaque generation token identifying one armed deadline.
///
/// Tokens are only comparable for equality; a mismatch means the deadline
/// was invalidated after the host armed its timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken(pub(crate) u64);

/// Which deadline a pending timer belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Classifier inactivity timeout: the buffer is discarded when it fires.
    InactivityReset,
    /// Router settle delay after opening the composition surface from the
    /// idle page: the pending code is dispatched when it fires.
    SettleDelay,
}

/// A deadline the host must arm a single-shot timer for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingTimer {
    pub kind: TimerKind,
    pub token: TimerToken,
    pub deadline: Instant,
}

/// Monotonic token source. Bumping it invalidates every outstanding token.
#[derive(Debug, Default)]
pub(crate) struct TokenSource(u64);

impl TokenSource {
    /// Issues a fresh token, invalidating all previously issued ones.
    pub(crate) fn next(&mut self) -> TimerToken {
        self.0 += 1;
        TimerToken(self.0)
    }

    /// Invalidates outstanding tokens without issuing a new one.
    pub(crate) fn invalidate(&mut self) {
        self.0 += 1;
    }

    /// Checks a token handed back by the host against the current generation.
    pub(crate) fn is_live(&self, token: TimerToken) -> bool {
        token.0 == self.0
    }
}
