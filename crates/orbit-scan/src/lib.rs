//! # orbit-scan: Barcode Scanner Ingestion Pipeline
//!
//! Watches the raw keyboard event stream and decides - from timing evidence
//! alone - whether a run of characters came from a hardware barcode scanner
//! or from a human typing on the same physical keyboard, then routes
//! recognized codes into the order draft.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Scanner Ingestion Pipeline                          │
//! │                                                                         │
//! │  raw KeyEvent                                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌──────────────┐   RecognizedCode   ┌──────────────┐                  │
//! │  │ScanClassifier│ ─────────────────► │  ScanRouter  │                  │
//! │  │  (timing FSM)│                    │(Composing or │                  │
//! │  └──────────────┘                    │    Idle)     │                  │
//! │                                      └──────┬───────┘                  │
//! │                                             │                           │
//! │              ┌──────────────────────────────┼─────────────┐            │
//! │              ▼                              ▼             ▼            │
//! │      CatalogSnapshot               OrderDraft        Notifier          │
//! │      (resolve code)             (merge-or-append)  (success/error)     │
//! │                                                                         │
//! │  The optional ScanDriver hosts the router on tokio and owns the real    │
//! │  single-shot timers; the router and classifier never sleep.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`event`] - the raw key-event model (key, target field, timestamp)
//! - [`classifier`] - the timing state machine and its tuning constants
//! - [`router`] - context ownership and pipeline wiring
//! - [`timer`] - generation-checked deadlines replacing ad hoc callbacks
//! - [`notify`] - the operator notification contract
//! - [`driver`] - tokio host loop for the router
//!
//! ## Design Principles
//!
//! 1. **One listener**: exactly one of {Composing, Idle} observes the
//!    keystream at any instant; context switches tear down before set up
//! 2. **No hidden timers**: every deadline is an explicit value with a
//!    generation token; stale expirations are silent no-ops
//! 3. **Synchronous commits**: a confirmed scan's downstream effects run to
//!    completion before the next event is considered
//! 4. **No I/O on the hot path**: resolution reads an in-memory snapshot;
//!    rendering and persistence live in the host

pub mod classifier;
pub mod driver;
pub mod event;
pub mod notify;
pub mod router;
pub mod timer;

pub use classifier::{KeyDisposition, ScanClassifier, ScanTuning, TimeoutOutcome};
pub use driver::{ScanCommand, ScanDriver};
pub use event::{FieldKind, Key, KeyEvent, KeyTarget};
pub use notify::{Notifier, NotifyLevel, TracingNotifier};
pub use router::{CompositionSurface, DispatchOutcome, KeyOutcome, ScanRouter};
pub use timer::{PendingTimer, TimerKind, TimerToken};
