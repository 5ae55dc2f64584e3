//! # Scan Driver
//!
//! Hosts a [`ScanRouter`] behind a command channel and owns the real
//! single-shot timers the router only describes.
//!
//! ## Host Loop
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Driver Loop                                      │
//! │                                                                         │
//! │   host app ──ScanCommand──► mpsc ──► ┌─────────────────────────┐       │
//! │   (key events, open/close)           │  select! {              │       │
//! │                                      │    cmd  = rx.recv()     │       │
//! │                                      │    _    = sleep_until(  │       │
//! │                                      │        router deadline) │       │
//! │                                      │  }                      │       │
//! │                                      └─────────────────────────┘       │
//! │                                                                         │
//! │  One command or expiry is processed to completion before the next is    │
//! │  considered - the single-threaded model the pipeline assumes.           │
//! │                                                                         │
//! │  After every step the loop re-queries router.next_timer(): deadlines    │
//! │  are refreshed by digits and invalidated by teardown, and the expiry    │
//! │  hand-back carries the generation token, so a sleep armed for a dead    │
//! │  deadline lands as a stale no-op inside the router.                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Under `tokio::test(start_paused = true)` the sleeps run on virtual time,
//! so the whole timing-sensitive pipeline is testable deterministically.

use tokio::sync::{mpsc, oneshot};
use tokio::time;
use tracing::debug;

use orbit_core::OrderDraft;

use crate::event::KeyEvent;
use crate::notify::Notifier;
use crate::router::{CompositionSurface, ScanRouter};

// =============================================================================
// Commands
// =============================================================================

/// Commands the host application sends to the driver.
#[derive(Debug)]
pub enum ScanCommand {
    /// A raw keyboard event to classify.
    Key(KeyEvent),

    /// The composition surface became visible.
    OpenComposition,

    /// The composition surface closed; replies with the finished draft so
    /// the host can submit it.
    CloseComposition(oneshot::Sender<Option<OrderDraft>>),

    /// Snapshot of the draft under composition, if any.
    Draft(oneshot::Sender<Option<OrderDraft>>),

    /// Stop the loop.
    Shutdown,
}

// =============================================================================
// Driver
// =============================================================================

/// Tokio host for a [`ScanRouter`].
pub struct ScanDriver<N: Notifier, S: CompositionSurface> {
    router: ScanRouter<N, S>,
    rx: mpsc::Receiver<ScanCommand>,
}

impl<N: Notifier, S: CompositionSurface> ScanDriver<N, S> {
    /// Wraps a router and a command receiver into a driver.
    pub fn new(router: ScanRouter<N, S>, rx: mpsc::Receiver<ScanCommand>) -> Self {
        ScanDriver { router, rx }
    }

    /// Runs until [`ScanCommand::Shutdown`] or channel closure, then
    /// returns the router for inspection.
    pub async fn run(mut self) -> ScanRouter<N, S> {
        debug!("scan driver started");
        loop {
            match self.router.next_timer() {
                Some(timer) => {
                    tokio::select! {
                        cmd = self.rx.recv() => {
                            if !self.apply(cmd) {
                                break;
                            }
                        }
                        _ = time::sleep_until(time::Instant::from_std(timer.deadline)) => {
                            // The token inside `timer` guards against the
                            // deadline having been refreshed while we slept.
                            self.router.handle_timer(timer);
                        }
                    }
                }
                None => {
                    let cmd = self.rx.recv().await;
                    if !self.apply(cmd) {
                        break;
                    }
                }
            }
        }
        debug!("scan driver stopped");
        self.router
    }

    /// Applies one command; returns false when the loop should stop.
    fn apply(&mut self, cmd: Option<ScanCommand>) -> bool {
        match cmd {
            None | Some(ScanCommand::Shutdown) => false,
            Some(ScanCommand::Key(event)) => {
                self.router.handle_key(&event);
                true
            }
            Some(ScanCommand::OpenComposition) => {
                self.router.begin_composition();
                true
            }
            Some(ScanCommand::CloseComposition(reply)) => {
                let draft = self.router.end_composition();
                let _ = reply.send(draft);
                true
            }
            Some(ScanCommand::Draft(reply)) => {
                let _ = reply.send(self.router.draft().cloned());
                true
            }
        }
    }
}
