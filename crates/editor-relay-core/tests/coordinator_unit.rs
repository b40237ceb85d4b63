// crates/editor-relay-core/tests/coordinator_unit.rs
// ============================================================================
// Module: Coordinator Unit Tests
// Description: Tests for submit, cancel, and wait-loop behavior.
// Purpose: Exercise the protocol driver against scripted stores and a
//          manual clock so every timing path is deterministic.
// ============================================================================

//! ## Overview
//! Validates submission gating, cancel pass-through, and the wait loop's
//! terminal, timeout, not-found, and store-unreachable outcomes.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::cell::Cell;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;
use std::time::Instant;

use editor_relay_core::Clock;
use editor_relay_core::CoordinatorError;
use editor_relay_core::LogLevel;
use editor_relay_core::MenuItemPayload;
use editor_relay_core::PayloadError;
use editor_relay_core::RequestCoordinator;
use editor_relay_core::RequestId;
use editor_relay_core::RequestKind;
use editor_relay_core::RequestPayload;
use editor_relay_core::RequestQueueStore;
use editor_relay_core::RequestResult;
use editor_relay_core::RequestSnapshot;
use editor_relay_core::RequestStatus;
use editor_relay_core::StoreError;
use editor_relay_core::Timestamp;
use editor_relay_core::WaitOutcome;
use editor_relay_core::WaitPolicy;

// ============================================================================
// SECTION: Test Helpers
// ============================================================================

/// Clock whose time advances only when the wait loop sleeps.
#[derive(Clone)]
struct ManualClock {
    base: Instant,
    elapsed: Rc<Cell<Duration>>,
}

impl ManualClock {
    fn new() -> Self {
        Self {
            base: Instant::now(),
            elapsed: Rc::new(Cell::new(Duration::ZERO)),
        }
    }

    fn elapsed(&self) -> Duration {
        self.elapsed.get()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.base + self.elapsed.get()
    }

    fn sleep(&self, duration: Duration) {
        self.elapsed.set(self.elapsed.get() + duration);
    }
}

type FetchScript = VecDeque<Result<Option<RequestSnapshot>, StoreError>>;

/// Store that replays a scripted fetch sequence and records every call.
#[derive(Default)]
struct ScriptedStore {
    fetch_script: RefCell<FetchScript>,
    inserts: RefCell<Vec<(RequestKind, i64)>>,
    cancel_result: Cell<bool>,
    logs: RefCell<Vec<(RequestKind, u64, LogLevel, String)>>,
}

impl ScriptedStore {
    fn with_fetches(script: Vec<Result<Option<RequestSnapshot>, StoreError>>) -> Self {
        Self {
            fetch_script: RefCell::new(script.into()),
            ..Self::default()
        }
    }
}

impl RequestQueueStore for ScriptedStore {
    fn insert(&self, payload: &RequestPayload, priority: i64) -> Result<RequestId, StoreError> {
        self.inserts.borrow_mut().push((payload.kind(), priority));
        RequestId::from_raw(7).ok_or_else(|| StoreError::Invalid("zero id".to_string()))
    }

    fn fetch(&self, _kind: RequestKind, _id: RequestId) -> Result<Option<RequestSnapshot>, StoreError> {
        self.fetch_script
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(StoreError::Unavailable("script exhausted".to_string())))
    }

    fn cancel_pending(&self, _kind: RequestKind, _id: RequestId) -> Result<bool, StoreError> {
        Ok(self.cancel_result.get())
    }

    fn list_pending(&self, _kind: RequestKind) -> Result<Vec<RequestSnapshot>, StoreError> {
        Ok(Vec::new())
    }

    fn append_log(
        &self,
        kind: RequestKind,
        id: RequestId,
        level: LogLevel,
        _source: &str,
        message: &str,
    ) -> Result<(), StoreError> {
        self.logs.borrow_mut().push((kind, id.get(), level, message.to_string()));
        Ok(())
    }
}

fn menu_payload() -> RequestPayload {
    RequestPayload::MenuItem(MenuItemPayload {
        menu_path: "Assets/Refresh".to_string(),
    })
}

fn snapshot(status: RequestStatus) -> RequestSnapshot {
    let completed = status.is_terminal();
    RequestSnapshot {
        id: RequestId::from_raw(7).expect("nonzero id"),
        payload: menu_payload(),
        priority: 0,
        status,
        created_at: Timestamp::from_unix_millis(1_000),
        started_at: None,
        completed_at: completed.then(|| Timestamp::from_unix_millis(2_000)),
        result: RequestResult::MenuItem {
            duration_seconds: 0.0,
            result: None,
        },
        error_message: None,
    }
}

fn coordinator(
    store: ScriptedStore,
    clock: &ManualClock,
) -> RequestCoordinator<ScriptedStore, ManualClock> {
    let policy = WaitPolicy {
        poll_interval: Duration::from_millis(500),
    };
    RequestCoordinator::with_clock(store, clock.clone(), policy)
}

// ============================================================================
// SECTION: Submission Tests
// ============================================================================

#[test]
fn submit_inserts_and_logs() {
    let clock = ManualClock::new();
    let coordinator = coordinator(ScriptedStore::default(), &clock);
    let id = coordinator.submit(&menu_payload(), 5).expect("submit succeeds");
    assert_eq!(id.get(), 7);
    assert_eq!(coordinator.store().inserts.borrow().as_slice(), &[(RequestKind::MenuItem, 5)]);
    let logs = coordinator.store().logs.borrow();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].2, LogLevel::Info);
}

#[test]
fn submit_rejects_invalid_payload_before_any_write() {
    let clock = ManualClock::new();
    let coordinator = coordinator(ScriptedStore::default(), &clock);
    let payload = RequestPayload::MenuItem(MenuItemPayload {
        menu_path: "   ".to_string(),
    });
    let error = coordinator.submit(&payload, 0).expect_err("blank menu path rejected");
    assert_eq!(error, CoordinatorError::InvalidPayload(PayloadError::EmptyMenuPath));
    assert!(coordinator.store().inserts.borrow().is_empty());
    assert!(coordinator.store().logs.borrow().is_empty());
}

// ============================================================================
// SECTION: Cancel Tests
// ============================================================================

#[test]
fn cancel_reports_pending_transition_and_logs() {
    let clock = ManualClock::new();
    let store = ScriptedStore::default();
    store.cancel_result.set(true);
    let coordinator = coordinator(store, &clock);
    let id = RequestId::from_raw(7).expect("nonzero id");
    assert!(coordinator.cancel(RequestKind::MenuItem, id).expect("cancel succeeds"));
    assert_eq!(coordinator.store().logs.borrow().len(), 1);
}

#[test]
fn cancel_of_claimed_request_is_false_and_silent() {
    let clock = ManualClock::new();
    let coordinator = coordinator(ScriptedStore::default(), &clock);
    let id = RequestId::from_raw(7).expect("nonzero id");
    assert!(!coordinator.cancel(RequestKind::MenuItem, id).expect("cancel succeeds"));
    assert!(coordinator.store().logs.borrow().is_empty());
}

// ============================================================================
// SECTION: Wait Loop Tests
// ============================================================================

#[test]
fn wait_returns_terminal_snapshot_after_in_flight_polls() {
    let clock = ManualClock::new();
    let store = ScriptedStore::with_fetches(vec![
        Ok(Some(snapshot(RequestStatus::Pending))),
        Ok(Some(snapshot(RequestStatus::InFlight("running".to_string())))),
        Ok(Some(snapshot(RequestStatus::InFlight("finalizing".to_string())))),
        Ok(Some(snapshot(RequestStatus::Completed))),
    ]);
    let coordinator = coordinator(store, &clock);
    let id = RequestId::from_raw(7).expect("nonzero id");
    let outcome = coordinator
        .wait_for_completion(RequestKind::MenuItem, id, Duration::from_secs(300))
        .expect("wait succeeds");
    match outcome {
        WaitOutcome::Terminal(snapshot) => assert_eq!(snapshot.status, RequestStatus::Completed),
        other => panic!("expected terminal outcome, got {other:?}"),
    }
    // Three sleeps separate the four polls.
    assert_eq!(clock.elapsed(), Duration::from_millis(1_500));
}

#[test]
fn wait_times_out_locally_without_touching_the_request() {
    let clock = ManualClock::new();
    let store = ScriptedStore::with_fetches(vec![
        Ok(Some(snapshot(RequestStatus::Pending)));
        10
    ]);
    let coordinator = coordinator(store, &clock);
    let id = RequestId::from_raw(7).expect("nonzero id");
    let outcome = coordinator
        .wait_for_completion(RequestKind::MenuItem, id, Duration::from_secs(2))
        .expect("wait succeeds");
    match outcome {
        WaitOutcome::LocalTimeout { waited } => assert!(waited >= Duration::from_secs(2)),
        other => panic!("expected local timeout, got {other:?}"),
    }
}

#[test]
fn wait_blocks_at_most_one_interval_past_the_budget() {
    let clock = ManualClock::new();
    let store = ScriptedStore::with_fetches(vec![
        Ok(Some(snapshot(RequestStatus::Pending)));
        16
    ]);
    let coordinator = coordinator(store, &clock);
    let id = RequestId::from_raw(7).expect("nonzero id");
    let budget = Duration::from_millis(1_700);
    let outcome = coordinator
        .wait_for_completion(RequestKind::MenuItem, id, budget)
        .expect("wait succeeds");
    assert!(matches!(outcome, WaitOutcome::LocalTimeout { .. }));
    assert!(clock.elapsed() <= budget + Duration::from_millis(500));
}

#[test]
fn wait_reports_missing_request() {
    let clock = ManualClock::new();
    let store = ScriptedStore::with_fetches(vec![Ok(None)]);
    let coordinator = coordinator(store, &clock);
    let id = RequestId::from_raw(7).expect("nonzero id");
    let outcome = coordinator
        .wait_for_completion(RequestKind::MenuItem, id, Duration::from_secs(300))
        .expect("wait succeeds");
    assert_eq!(outcome, WaitOutcome::NotFound);
    assert_eq!(clock.elapsed(), Duration::ZERO);
}

#[test]
fn wait_tolerates_transient_poll_failures() {
    let clock = ManualClock::new();
    let store = ScriptedStore::with_fetches(vec![
        Err(StoreError::Unavailable("database is locked".to_string())),
        Ok(Some(snapshot(RequestStatus::InFlight("processing".to_string())))),
        Ok(Some(snapshot(RequestStatus::Failed))),
    ]);
    let coordinator = coordinator(store, &clock);
    let id = RequestId::from_raw(7).expect("nonzero id");
    let outcome = coordinator
        .wait_for_completion(RequestKind::MenuItem, id, Duration::from_secs(300))
        .expect("wait succeeds");
    match outcome {
        WaitOutcome::Terminal(snapshot) => assert_eq!(snapshot.status, RequestStatus::Failed),
        other => panic!("expected terminal outcome, got {other:?}"),
    }
}

#[test]
fn wait_surfaces_unreachable_store_at_budget_exhaustion() {
    let clock = ManualClock::new();
    let store = ScriptedStore::with_fetches(vec![
        Err(StoreError::Unavailable("database is locked".to_string()));
        8
    ]);
    let coordinator = coordinator(store, &clock);
    let id = RequestId::from_raw(7).expect("nonzero id");
    let error = coordinator
        .wait_for_completion(RequestKind::MenuItem, id, Duration::from_secs(1))
        .expect_err("unreachable store surfaces");
    assert!(matches!(error, CoordinatorError::Store(StoreError::Unavailable(_))));
}
