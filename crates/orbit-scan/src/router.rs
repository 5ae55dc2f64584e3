//! # Scan Router
//!
//! Owns exactly one of the two mutually exclusive listening contexts and
//! wires classifier output to resolution, accumulation, and notification.
//!
//! ## Context Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Listening Contexts                                  │
//! │                                                                         │
//! │  ┌───────────────────────────┐      ┌───────────────────────────┐      │
//! │  │        Composing          │      │          Idle             │      │
//! │  │  (surface open)           │      │  (no surface open)        │      │
//! │  │                           │      │                           │      │
//! │  │  observes: Page, Text,    │      │  observes: Page only      │      │
//! │  │            Numeric        │      │  (typed search input is   │      │
//! │  │  owns: the OrderDraft     │      │   a human, not a scanner) │      │
//! │  │                           │      │                           │      │
//! │  │  commit → resolve →       │      │  commit → open surface →  │      │
//! │  │  merge-or-append → notify │      │  settle delay → dispatch  │      │
//! │  └───────────────────────────┘      └───────────────────────────┘      │
//! │                                                                         │
//! │  EXACTLY ONE context is live at any instant. Switching tears the old    │
//! │  one down first: buffer discarded, timers invalidated. A scan in        │
//! │  progress across a switch is abandoned, never carried over.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The contexts are a tagged union swapped atomically by
//! [`begin_composition`](ScanRouter::begin_composition) /
//! [`end_composition`](ScanRouter::end_composition) - never two registered
//! listeners racing for the same keystream.
//!
//! No network or rendering work happens here: resolution reads an
//! already-materialized catalog snapshot, and a confirmed scan's downstream
//! effects run synchronously to completion.

use std::time::Instant;

use tracing::{debug, trace};

use orbit_core::validation::validate_scan_code;
use orbit_core::{
    AddOutcome, CatalogSnapshot, CoreError, CoreResult, Money, OrderDraft, Product,
    RecognizedCode,
};

use crate::classifier::{KeyDisposition, ScanClassifier, ScanTuning};
use crate::event::KeyEvent;
use crate::notify::Notifier;
use crate::timer::{PendingTimer, TimerKind, TimerToken, TokenSource};

// =============================================================================
// Composition Surface Contract
// =============================================================================

/// The visibility toggle for the order-composition surface.
///
/// The router *writes* this (requesting an open from the idle context on a
/// confirmed scan); it learns about actual visibility changes through
/// `begin_composition` / `end_composition` calls from the host.
pub trait CompositionSurface {
    /// Asks the host to open the composition surface.
    fn request_open(&self);
}

// =============================================================================
// Outcomes
// =============================================================================

/// What the router did with one key event.
#[derive(Debug)]
pub enum KeyOutcome {
    /// Key not observed; native behavior proceeds.
    Ignored,

    /// Digit absorbed into the live buffer; native behavior proceeds.
    Buffered,

    /// Ambiguous buffer discarded on Enter; native behavior proceeds.
    Discarded,

    /// Confirmed scan, processed to completion while composing. The host
    /// MUST suppress the Enter key's default effect.
    Dispatched(DispatchOutcome),

    /// Confirmed scan from the idle page: surface opening requested,
    /// dispatch deferred until the settle deadline. Suppress Enter.
    Deferred,
}

impl KeyOutcome {
    /// Whether the host must suppress the key's default effect.
    pub fn suppresses_default(&self) -> bool {
        matches!(self, KeyOutcome::Dispatched(_) | KeyOutcome::Deferred)
    }
}

/// Result of pushing a recognized code through resolve → accumulate.
#[derive(Debug)]
pub enum DispatchOutcome {
    /// The draft was replaced with an updated value.
    Applied(AddOutcome),
    /// Resolution failed; the draft is untouched and the operator notified.
    Rejected(CoreError),
}

// =============================================================================
// Contexts
// =============================================================================

/// Deferred dispatch scheduled by the idle context.
#[derive(Debug)]
struct PendingDispatch {
    code: RecognizedCode,
    token: TimerToken,
    deadline: Instant,
}

/// The tagged union of listening contexts. Exactly one exists.
#[derive(Debug)]
enum Context {
    Idle {
        classifier: ScanClassifier,
    },
    Composing {
        classifier: ScanClassifier,
        draft: OrderDraft,
        pending: Option<PendingDispatch>,
    },
}

impl Context {
    /// Recycles the classifier out of a torn-down context.
    ///
    /// The classifier is reset, NOT recreated: its token generation spans
    /// the router's whole lifetime, so an inactivity deadline armed under a
    /// previous context can never carry the same token as one armed later.
    fn into_classifier(self) -> ScanClassifier {
        let mut classifier = match self {
            Context::Idle { classifier } | Context::Composing { classifier, .. } => classifier,
        };
        classifier.reset();
        classifier
    }
}

impl Default for Context {
    // Only exists so context switches can `mem::take`; never observed.
    fn default() -> Self {
        Context::Idle {
            classifier: ScanClassifier::default(),
        }
    }
}

// =============================================================================
// Router
// =============================================================================

/// The context owner for the scan pipeline.
///
/// Single-threaded and cooperative: one key event or timer expiry is
/// processed to completion before the next is considered, so no locking is
/// needed - the exclusive-context invariant replaces it.
pub struct ScanRouter<N: Notifier, S: CompositionSurface> {
    catalog: CatalogSnapshot,
    tuning: ScanTuning,
    notifier: N,
    surface: S,
    context: Context,
    settle_tokens: TokenSource,
}

impl<N: Notifier, S: CompositionSurface> ScanRouter<N, S> {
    /// Creates a router in the idle context.
    pub fn new(catalog: CatalogSnapshot, tuning: ScanTuning, notifier: N, surface: S) -> Self {
        ScanRouter {
            catalog,
            tuning,
            notifier,
            surface,
            context: Context::Idle {
                classifier: ScanClassifier::new(tuning),
            },
            settle_tokens: TokenSource::default(),
        }
    }

    /// Swaps in a fresh catalog snapshot. The host calls this whenever the
    /// surrounding application refreshes the catalog.
    pub fn replace_catalog(&mut self, catalog: CatalogSnapshot) {
        self.catalog = catalog;
    }

    // -------------------------------------------------------------------------
    // Context Switching
    // -------------------------------------------------------------------------

    /// Enters the composing context with a fresh empty draft.
    ///
    /// Called by the host when the composition surface actually opens.
    /// Idempotent while already composing. The idle context is torn down
    /// first: its buffer and timers die with it.
    pub fn begin_composition(&mut self) {
        if matches!(self.context, Context::Composing { .. }) {
            trace!("begin_composition while composing: no-op");
            return;
        }

        self.settle_tokens.invalidate();
        let classifier = std::mem::take(&mut self.context).into_classifier();
        self.context = Context::Composing {
            classifier,
            draft: OrderDraft::new(),
            pending: None,
        };
        debug!("composing context active");
    }

    /// Leaves the composing context, yielding the finished draft.
    ///
    /// The surrounding feature submits the draft exactly once; this core
    /// never does. A scan in progress (buffer or pending settle dispatch)
    /// is abandoned.
    pub fn end_composition(&mut self) -> Option<OrderDraft> {
        self.settle_tokens.invalidate();
        let previous = std::mem::take(&mut self.context);
        let (mut classifier, draft) = match previous {
            Context::Composing {
                classifier, draft, ..
            } => (classifier, Some(draft)),
            Context::Idle { classifier } => (classifier, None),
        };
        classifier.reset();
        self.context = Context::Idle { classifier };
        debug!("idle context active");
        draft
    }

    /// Checks which context is live.
    pub fn is_composing(&self) -> bool {
        matches!(self.context, Context::Composing { .. })
    }

    // -------------------------------------------------------------------------
    // Key Handling
    // -------------------------------------------------------------------------

    /// Feeds one raw key event through the active context.
    pub fn handle_key(&mut self, event: &KeyEvent) -> KeyOutcome {
        match &mut self.context {
            Context::Idle { classifier } => {
                // The idle page ignores keys typed into any visible input:
                // someone using the search box is a human, not a scanner.
                if !matches!(event.target, crate::event::KeyTarget::Page) {
                    return KeyOutcome::Ignored;
                }

                match classifier.handle_key(event) {
                    KeyDisposition::Ignored => KeyOutcome::Ignored,
                    KeyDisposition::Buffered => KeyOutcome::Buffered,
                    KeyDisposition::PassThrough => KeyOutcome::Discarded,
                    KeyDisposition::Committed(code) => {
                        self.defer_dispatch(code, event.timestamp);
                        KeyOutcome::Deferred
                    }
                }
            }
            Context::Composing {
                classifier, draft, ..
            } => match classifier.handle_key(event) {
                KeyDisposition::Ignored => KeyOutcome::Ignored,
                KeyDisposition::Buffered => KeyOutcome::Buffered,
                KeyDisposition::PassThrough => KeyOutcome::Discarded,
                KeyDisposition::Committed(code) => {
                    let outcome =
                        Self::dispatch(&self.catalog, &self.notifier, draft, code);
                    KeyOutcome::Dispatched(outcome)
                }
            },
        }
    }

    /// The live buffer contents, for visual mirroring only. The router
    /// never writes the mirrored value into any field.
    pub fn buffer(&self) -> Option<&str> {
        match &self.context {
            Context::Idle { classifier } | Context::Composing { classifier, .. } => {
                classifier.buffer()
            }
        }
    }

    /// The draft under composition, if any.
    pub fn draft(&self) -> Option<&OrderDraft> {
        match &self.context {
            Context::Idle { .. } => None,
            Context::Composing { draft, .. } => Some(draft),
        }
    }

    // -------------------------------------------------------------------------
    // Timer Handling
    // -------------------------------------------------------------------------

    /// The earliest deadline the host must arm a single-shot timer for.
    ///
    /// Re-query after every `handle_key` / `handle_timer` call: deadlines
    /// are refreshed or invalidated by state changes.
    pub fn next_timer(&self) -> Option<PendingTimer> {
        let classifier_timer = match &self.context {
            Context::Idle { classifier } | Context::Composing { classifier, .. } => {
                classifier.pending_timer()
            }
        };

        let settle_timer = match &self.context {
            Context::Composing {
                pending: Some(p), ..
            } => Some(PendingTimer {
                kind: TimerKind::SettleDelay,
                token: p.token,
                deadline: p.deadline,
            }),
            _ => None,
        };

        match (classifier_timer, settle_timer) {
            (Some(a), Some(b)) => Some(if a.deadline <= b.deadline { a } else { b }),
            (a, b) => a.or(b),
        }
    }

    /// Hands an expired timer back to whichever component armed it.
    ///
    /// Stale timers (invalidated after the host armed its sleep) are a
    /// silent no-op in every case: never a crash, never a mutation of a
    /// draft the timer no longer owns.
    pub fn handle_timer(&mut self, timer: PendingTimer) -> Option<DispatchOutcome> {
        match timer.kind {
            TimerKind::InactivityReset => {
                match &mut self.context {
                    Context::Idle { classifier } | Context::Composing { classifier, .. } => {
                        classifier.handle_timeout(timer.token);
                    }
                }
                None
            }
            TimerKind::SettleDelay => {
                if !self.settle_tokens.is_live(timer.token) {
                    trace!("stale settle timer ignored");
                    return None;
                }

                let Context::Composing {
                    draft, pending, ..
                } = &mut self.context
                else {
                    trace!("settle timer fired outside composing context");
                    return None;
                };

                let dispatch = pending.take()?;
                debug!(code = %dispatch.code, "settle delay elapsed, dispatching deferred scan");
                Some(Self::dispatch(
                    &self.catalog,
                    &self.notifier,
                    draft,
                    dispatch.code,
                ))
            }
        }
    }

    // -------------------------------------------------------------------------
    // Manual Entry Path
    // -------------------------------------------------------------------------

    /// Appends a manually entered line to the draft under composition.
    ///
    /// The operator picks the product from a list and types quantity and
    /// price by hand. Unlike the scanner path this ALWAYS appends - it
    /// never merges with an existing line for the same product.
    pub fn add_manual_line(
        &mut self,
        product_id: &str,
        quantity: u32,
        unit_price: Money,
        notes: &str,
    ) -> CoreResult<()> {
        let product = self
            .catalog
            .product_by_id(product_id)
            .cloned()
            .ok_or_else(|| CoreError::UnknownCode(product_id.to_string()))?;

        let Context::Composing { draft, .. } = &mut self.context else {
            return Err(CoreError::CompositionClosed);
        };

        *draft = draft.append_manual(&product, quantity, unit_price, notes)?;
        debug!(product_id, quantity, "manual line appended");
        Ok(())
    }

    /// Dispatches a code that did not come from the classifier - replayed
    /// from a stored order or typed into the code box by the operator.
    ///
    /// Classifier output is digits-only by construction; this input is not,
    /// so it is validated before the draft is touched.
    pub fn submit_code(&mut self, code: &str) -> CoreResult<DispatchOutcome> {
        validate_scan_code(code)?;

        let Context::Composing { draft, .. } = &mut self.context else {
            return Err(CoreError::CompositionClosed);
        };

        Ok(Self::dispatch(
            &self.catalog,
            &self.notifier,
            draft,
            RecognizedCode::new(code),
        ))
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    /// Schedules the deferred dispatch for a code committed on the idle page.
    fn defer_dispatch(&mut self, code: RecognizedCode, committed_at: Instant) {
        debug!(code = %code, "scan on idle page, opening composition surface");
        self.surface.request_open();

        let token = self.settle_tokens.next();
        let classifier = std::mem::take(&mut self.context).into_classifier();
        self.context = Context::Composing {
            classifier,
            draft: OrderDraft::new(),
            pending: Some(PendingDispatch {
                code,
                token,
                deadline: committed_at + self.tuning.settle_delay,
            }),
        };
    }

    /// Pushes a recognized code through resolve → merge-or-append → notify.
    ///
    /// Runs synchronously to completion; on failure the draft is untouched
    /// and the operator is notified exactly once.
    fn dispatch(
        catalog: &CatalogSnapshot,
        notifier: &N,
        draft: &mut OrderDraft,
        code: RecognizedCode,
    ) -> DispatchOutcome {
        let product = match catalog.resolve(&code).map(Product::clone) {
            Ok(product) => product,
            Err(err) => {
                notifier.error(&err.to_string());
                return DispatchOutcome::Rejected(err);
            }
        };

        let (next, outcome) = draft.add_scanned(&product);
        *draft = next;

        match &outcome {
            AddOutcome::LineAdded { product_name, .. } => {
                notifier.success(&format!("{product_name} added to order"));
            }
            AddOutcome::QuantityIncreased {
                product_name,
                quantity,
                ..
            } => {
                notifier.success(&format!("{product_name} quantity increased to {quantity}"));
            }
        }

        DispatchOutcome::Applied(outcome)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{FieldKind, KeyTarget};
    use crate::notify::NotifyLevel;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    #[derive(Debug, Clone, Default)]
    struct Recorder(Arc<Mutex<Vec<(NotifyLevel, String)>>>);

    impl Recorder {
        fn messages(&self) -> Vec<(NotifyLevel, String)> {
            self.0.lock().unwrap().clone()
        }
    }

    impl Notifier for Recorder {
        fn success(&self, message: &str) {
            self.0
                .lock()
                .unwrap()
                .push((NotifyLevel::Success, message.to_string()));
        }

        fn error(&self, message: &str) {
            self.0
                .lock()
                .unwrap()
                .push((NotifyLevel::Error, message.to_string()));
        }
    }

    #[derive(Debug, Clone, Default)]
    struct OpenCounter(Arc<AtomicUsize>);

    impl CompositionSurface for OpenCounter {
        fn request_open(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn catalog() -> CatalogSnapshot {
        CatalogSnapshot::new(vec![
            Product {
                id: "7".to_string(),
                name: "Business Cards 100pk".to_string(),
                sku: "BC-100".to_string(),
                barcode: Some("8901234".to_string()),
                price: Money::from_cents(2500),
                status: orbit_core::ProductStatus::Active,
                category_name: Some("Printing".to_string()),
            },
            Product {
                id: "9".to_string(),
                name: "Spiral Binding".to_string(),
                sku: "SB-01".to_string(),
                barcode: Some("4440002".to_string()),
                price: Money::from_cents(1200),
                status: orbit_core::ProductStatus::Active,
                category_name: Some("Binding".to_string()),
            },
            Product {
                id: "12".to_string(),
                name: "Laminated Badge".to_string(),
                sku: "LB-01".to_string(),
                barcode: Some("5550001".to_string()),
                price: Money::from_cents(900),
                status: orbit_core::ProductStatus::Inactive,
                category_name: None,
            },
        ])
    }

    fn router() -> (ScanRouter<Recorder, OpenCounter>, Recorder, OpenCounter) {
        let recorder = Recorder::default();
        let surface = OpenCounter::default();
        let router = ScanRouter::new(
            catalog(),
            ScanTuning::default(),
            recorder.clone(),
            surface.clone(),
        );
        (router, recorder, surface)
    }

    /// Scans `code` at scanner speed ending with Enter; returns the
    /// timestamp the Enter carried and the Enter's outcome.
    fn scan(
        router: &mut ScanRouter<Recorder, OpenCounter>,
        code: &str,
        start: Instant,
    ) -> (Instant, KeyOutcome) {
        let mut at = start;
        for c in code.chars() {
            router.handle_key(&KeyEvent::digit(c, at, KeyTarget::Page));
            at += Duration::from_millis(10);
        }
        let outcome = router.handle_key(&KeyEvent::enter(at, KeyTarget::Page));
        (at, outcome)
    }

    #[test]
    fn test_scan_while_composing_adds_line() {
        let (mut router, recorder, _) = router();
        router.begin_composition();

        let (_, outcome) = scan(&mut router, "8901234", Instant::now());
        assert!(outcome.suppresses_default());
        assert!(matches!(
            outcome,
            KeyOutcome::Dispatched(DispatchOutcome::Applied(AddOutcome::LineAdded { .. }))
        ));

        let draft = router.draft().unwrap();
        assert_eq!(draft.line_count(), 1);
        assert_eq!(draft.lines[0].product_id, "7");
        assert_eq!(draft.lines[0].quantity, 1);
        assert_eq!(draft.lines[0].unit_price, Money::from_cents(2500));
        assert_eq!(draft.service_type.as_deref(), Some("Printing"));

        let messages = recorder.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].0, NotifyLevel::Success);
    }

    #[test]
    fn test_repeat_scan_merges_quantity() {
        let (mut router, _, _) = router();
        router.begin_composition();

        let start = Instant::now();
        let (at, _) = scan(&mut router, "8901234", start);
        let (_, outcome) = scan(&mut router, "8901234", at + Duration::from_millis(500));

        assert!(matches!(
            outcome,
            KeyOutcome::Dispatched(DispatchOutcome::Applied(
                AddOutcome::QuantityIncreased { quantity: 2, .. }
            ))
        ));
        let draft = router.draft().unwrap();
        assert_eq!(draft.line_count(), 1);
        assert_eq!(draft.lines[0].quantity, 2);
    }

    #[test]
    fn test_two_distinct_scans_service_type_from_first() {
        let (mut router, _, _) = router();
        router.begin_composition();

        let start = Instant::now();
        let (at, _) = scan(&mut router, "8901234", start);
        scan(&mut router, "4440002", at + Duration::from_millis(500));

        let draft = router.draft().unwrap();
        assert_eq!(draft.line_count(), 2);
        assert_eq!(draft.service_type.as_deref(), Some("Printing"));
    }

    #[test]
    fn test_unknown_code_leaves_draft_unchanged() {
        let (mut router, recorder, _) = router();
        router.begin_composition();
        let before = router.draft().unwrap().clone();

        let (_, outcome) = scan(&mut router, "0009999", Instant::now());
        assert!(matches!(
            outcome,
            KeyOutcome::Dispatched(DispatchOutcome::Rejected(CoreError::UnknownCode(_)))
        ));
        assert_eq!(router.draft().unwrap(), &before);

        let messages = recorder.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].0, NotifyLevel::Error);
    }

    #[test]
    fn test_inactive_product_rejected() {
        let (mut router, recorder, _) = router();
        router.begin_composition();

        let (_, outcome) = scan(&mut router, "5550001", Instant::now());
        assert!(matches!(
            outcome,
            KeyOutcome::Dispatched(DispatchOutcome::Rejected(CoreError::InactiveProduct { .. }))
        ));
        assert!(router.draft().unwrap().is_empty());
        assert_eq!(recorder.messages()[0].0, NotifyLevel::Error);
    }

    #[test]
    fn test_idle_ignores_field_targets() {
        let (mut router, _, _) = router();
        let search = KeyTarget::Field {
            id: "search".to_string(),
            kind: FieldKind::Text,
        };

        let at = Instant::now();
        for (i, c) in "8901234".chars().enumerate() {
            let outcome = router.handle_key(&KeyEvent::digit(
                c,
                at + Duration::from_millis(10 * i as u64),
                search.clone(),
            ));
            assert!(matches!(outcome, KeyOutcome::Ignored));
        }
        assert!(router.buffer().is_none());
    }

    #[test]
    fn test_idle_scan_opens_surface_and_defers() {
        let (mut router, recorder, surface) = router();
        assert!(!router.is_composing());

        let (at, outcome) = scan(&mut router, "8901234", Instant::now());
        assert!(matches!(outcome, KeyOutcome::Deferred));
        assert!(outcome.suppresses_default());
        assert_eq!(surface.0.load(Ordering::SeqCst), 1);

        // Surface opening flipped the context; nothing dispatched yet.
        assert!(router.is_composing());
        assert!(router.draft().unwrap().is_empty());
        assert!(recorder.messages().is_empty());

        // The settle deadline is armed.
        let timer = router.next_timer().expect("settle timer armed");
        assert_eq!(timer.kind, TimerKind::SettleDelay);
        assert_eq!(timer.deadline, at + ScanTuning::default().settle_delay);

        // When it fires, the same merge-or-append outcome applies.
        let outcome = router.handle_timer(timer);
        assert!(matches!(
            outcome,
            Some(DispatchOutcome::Applied(AddOutcome::LineAdded { .. }))
        ));
        let draft = router.draft().unwrap();
        assert_eq!(draft.line_count(), 1);
        assert_eq!(draft.lines[0].product_id, "7");
        assert_eq!(draft.service_type.as_deref(), Some("Printing"));
        assert_eq!(recorder.messages().len(), 1);
    }

    #[test]
    fn test_settle_timer_stale_after_teardown() {
        let (mut router, recorder, _) = router();
        scan(&mut router, "8901234", Instant::now());
        let timer = router.next_timer().unwrap();

        // The operator closes the surface before the settle delay elapses.
        router.end_composition();
        assert!(router.handle_timer(timer).is_none());
        assert!(recorder.messages().is_empty());
        assert!(!router.is_composing());
    }

    #[test]
    fn test_context_switch_abandons_scan_in_progress() {
        let (mut router, _, _) = router();
        router.begin_composition();

        let at = Instant::now();
        router.handle_key(&KeyEvent::digit('8', at, KeyTarget::Page));
        router.handle_key(&KeyEvent::digit('9', at + Duration::from_millis(10), KeyTarget::Page));
        assert_eq!(router.buffer(), Some("89"));

        router.end_composition();
        assert!(router.buffer().is_none());

        // An Enter right after the switch finds nothing to commit.
        let outcome =
            router.handle_key(&KeyEvent::enter(at + Duration::from_millis(20), KeyTarget::Page));
        assert!(matches!(outcome, KeyOutcome::Ignored));
    }

    #[test]
    fn test_end_composition_yields_draft() {
        let (mut router, _, _) = router();
        router.begin_composition();
        scan(&mut router, "8901234", Instant::now());

        let draft = router.end_composition().expect("draft yielded");
        assert_eq!(draft.line_count(), 1);
        assert!(!router.is_composing());
        assert!(router.draft().is_none());

        // Ending again yields nothing.
        assert!(router.end_composition().is_none());
    }

    #[test]
    fn test_begin_composition_is_idempotent() {
        let (mut router, _, _) = router();
        router.begin_composition();
        scan(&mut router, "8901234", Instant::now());

        router.begin_composition();
        // The draft survived: no teardown happened.
        assert_eq!(router.draft().unwrap().line_count(), 1);
    }

    #[test]
    fn test_manual_add_requires_composition() {
        let (mut router, _, _) = router();
        let err = router
            .add_manual_line("7", 2, Money::from_cents(2000), "")
            .unwrap_err();
        assert!(matches!(err, CoreError::CompositionClosed));
    }

    #[test]
    fn test_manual_add_appends_without_merging() {
        let (mut router, _, _) = router();
        router.begin_composition();
        scan(&mut router, "8901234", Instant::now());

        router
            .add_manual_line("7", 2, Money::from_cents(2000), "rerun")
            .unwrap();

        let draft = router.draft().unwrap();
        assert_eq!(draft.line_count(), 2);
        assert_eq!(draft.lines[1].quantity, 2);
    }

    #[test]
    fn test_inactivity_timer_from_previous_context_is_stale() {
        let (mut router, _, _) = router();
        router.begin_composition();

        let at = Instant::now();
        router.handle_key(&KeyEvent::digit('1', at, KeyTarget::Page));
        let old = router.next_timer().unwrap();
        assert_eq!(old.kind, TimerKind::InactivityReset);

        // The surface closes and reopens before the host's timer fires.
        router.end_composition();
        router.begin_composition();
        router.handle_key(&KeyEvent::digit('9', at + Duration::from_millis(5), KeyTarget::Page));

        // The dangling expiry must not touch the new context's buffer.
        assert!(router.handle_timer(old).is_none());
        assert_eq!(router.buffer(), Some("9"));
    }

    #[test]
    fn test_submit_code_dispatches_like_a_scan() {
        let (mut router, recorder, _) = router();
        router.begin_composition();

        let outcome = router.submit_code("8901234").unwrap();
        assert!(matches!(
            outcome,
            DispatchOutcome::Applied(AddOutcome::LineAdded { .. })
        ));
        assert_eq!(router.draft().unwrap().line_count(), 1);

        // Same merge semantics as the scanner path (id fallback here).
        let outcome = router.submit_code("7").unwrap();
        assert!(matches!(
            outcome,
            DispatchOutcome::Applied(AddOutcome::QuantityIncreased { quantity: 2, .. })
        ));
        assert_eq!(recorder.messages().len(), 2);
    }

    #[test]
    fn test_submit_code_validates_before_dispatch() {
        let (mut router, recorder, _) = router();
        router.begin_composition();

        let err = router.submit_code("89A1").unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
        assert!(router.draft().unwrap().is_empty());
        assert!(recorder.messages().is_empty());
    }

    #[test]
    fn test_submit_code_requires_composition() {
        let (mut router, _, _) = router();
        let err = router.submit_code("8901234").unwrap_err();
        assert!(matches!(err, CoreError::CompositionClosed));
    }

    #[test]
    fn test_inactivity_timer_routed_to_active_classifier() {
        let (mut router, _, _) = router();
        router.begin_composition();

        let at = Instant::now();
        router.handle_key(&KeyEvent::digit('1', at, KeyTarget::Page));
        let timer = router.next_timer().unwrap();
        assert_eq!(timer.kind, TimerKind::InactivityReset);

        assert!(router.handle_timer(timer).is_none());
        assert!(router.buffer().is_none());
    }

    #[test]
    fn test_replace_catalog() {
        let (mut router, _, _) = router();
        router.begin_composition();
        router.replace_catalog(CatalogSnapshot::new(vec![]));

        let (_, outcome) = scan(&mut router, "8901234", Instant::now());
        assert!(matches!(
            outcome,
            KeyOutcome::Dispatched(DispatchOutcome::Rejected(CoreError::UnknownCode(_)))
        ));
    }
}
