// crates/editor-relay-core/src/runtime/coordinator.rs
// ============================================================================
// Module: Editor Relay Coordinator
// Description: Submit/poll/cancel protocol driver over a queue store.
// Purpose: Implement the client side of the shared-queue protocol: validate
//          and submit requests, poll for terminal status under a local
//          budget, and cancel still-pending work atomically.
// Dependencies: crate::core, crate::interfaces, crate::runtime::clock,
//               thiserror
// ============================================================================

//! ## Overview
//! [`RequestCoordinator`] owns no execution. It writes `pending` rows, reads
//! snapshots, and performs the one conditional write the protocol allows a
//! client: `pending` to `cancelled`. Completion is always the executor's
//! transition; the coordinator only observes it. A local wait budget bounds
//! blocking without ever mutating the row.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use thiserror::Error;

use crate::core::identifiers::RequestId;
use crate::core::request::PayloadError;
use crate::core::request::RequestKind;
use crate::core::request::RequestPayload;
use crate::core::request::RequestSnapshot;
use crate::interfaces::LogLevel;
use crate::interfaces::RequestQueueStore;
use crate::interfaces::StoreError;
use crate::runtime::clock::Clock;
use crate::runtime::clock::SystemClock;

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Default delay between status polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Default local wait budget for [`RequestCoordinator::wait_for_completion`].
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Log source label written by the coordinator.
const LOG_SOURCE: &str = "coordinator";

// ============================================================================
// SECTION: Policy and Outcomes
// ============================================================================

/// Polling policy for wait loops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    /// Delay between consecutive status polls.
    pub poll_interval: Duration,
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

/// Result of waiting on a request under a local budget.
///
/// # Invariants
/// - [`WaitOutcome::LocalTimeout`] is a client-side give-up only; the queue
///   row keeps whatever status the executor last wrote.
#[derive(Debug, Clone, PartialEq)]
pub enum WaitOutcome {
    /// The request reached a terminal status.
    Terminal(RequestSnapshot),
    /// The local budget elapsed before a terminal status was observed.
    LocalTimeout {
        /// Time spent waiting before giving up.
        waited: Duration,
    },
    /// The request disappeared or never existed.
    NotFound,
}

/// Coordinator operation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoordinatorError {
    /// Payload rejected before any store write.
    #[error("invalid payload: {0}")]
    InvalidPayload(#[from] PayloadError),
    /// Store operation failed.
    #[error("store failure: {0}")]
    Store(#[from] StoreError),
}

// ============================================================================
// SECTION: Coordinator
// ============================================================================

/// Client-side protocol driver over a [`RequestQueueStore`].
///
/// # Invariants
/// - Writes only `pending` rows and the conditional `pending` to `cancelled`
///   transition; every other status is the executor's.
/// - Wait loops block at most one poll interval beyond the budget.
#[derive(Debug)]
pub struct RequestCoordinator<S, C = SystemClock> {
    /// Queue backend.
    store: S,
    /// Injected time source.
    clock: C,
    /// Polling policy.
    policy: WaitPolicy,
}

impl<S: RequestQueueStore> RequestCoordinator<S, SystemClock> {
    /// Creates a coordinator over the system clock with default policy.
    pub fn new(store: S) -> Self {
        Self::with_clock(store, SystemClock, WaitPolicy::default())
    }
}

impl<S: RequestQueueStore, C: Clock> RequestCoordinator<S, C> {
    /// Creates a coordinator with an explicit clock and policy.
    pub fn with_clock(store: S, clock: C, policy: WaitPolicy) -> Self {
        Self { store, clock, policy }
    }

    /// Returns the queue backend.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Validates and submits a request, returning its identifier.
    ///
    /// A log entry records the submission; failure to log never fails the
    /// submission itself.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinatorError::InvalidPayload`] when validation rejects
    /// the payload and [`CoordinatorError::Store`] when the insert fails.
    pub fn submit(&self, payload: &RequestPayload, priority: i64) -> Result<RequestId, CoordinatorError> {
        payload.validate()?;
        let id = self.store.insert(payload, priority)?;
        let _ = self.store.append_log(
            payload.kind(),
            id,
            LogLevel::Info,
            LOG_SOURCE,
            "request submitted",
        );
        Ok(id)
    }

    /// Fetches the current snapshot of a request.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinatorError::Store`] when the read fails. A missing
    /// row is `Ok(None)`.
    pub fn status(&self, kind: RequestKind, id: RequestId) -> Result<Option<RequestSnapshot>, CoordinatorError> {
        Ok(self.store.fetch(kind, id)?)
    }

    /// Cancels a request if it is still pending.
    ///
    /// Returns `true` when the request transitioned to `cancelled`, `false`
    /// when the executor had already claimed it, it was already terminal, or
    /// it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinatorError::Store`] when the conditional update fails.
    pub fn cancel(&self, kind: RequestKind, id: RequestId) -> Result<bool, CoordinatorError> {
        let cancelled = self.store.cancel_pending(kind, id)?;
        if cancelled {
            let _ = self.store.append_log(
                kind,
                id,
                LogLevel::Info,
                LOG_SOURCE,
                "request cancelled before claim",
            );
        }
        Ok(cancelled)
    }

    /// Lists pending requests of one kind in claim order.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinatorError::Store`] when the read fails.
    pub fn list_pending(&self, kind: RequestKind) -> Result<Vec<RequestSnapshot>, CoordinatorError> {
        Ok(self.store.list_pending(kind)?)
    }

    /// Polls a request until it reaches a terminal status or the local
    /// budget elapses.
    ///
    /// The budget is checked after every poll, so the call blocks at most
    /// `timeout` plus one poll interval. Transient poll failures are
    /// tolerated mid-wait; only a failure on the final poll surfaces as an
    /// error, so an unreachable store is distinguishable from a slow
    /// executor.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinatorError::Store`] when the store was unreachable at
    /// budget exhaustion.
    pub fn wait_for_completion(
        &self,
        kind: RequestKind,
        id: RequestId,
        timeout: Duration,
    ) -> Result<WaitOutcome, CoordinatorError> {
        let started = self.clock.now();
        loop {
            let poll_error = match self.store.fetch(kind, id) {
                Ok(None) => return Ok(WaitOutcome::NotFound),
                Ok(Some(snapshot)) => {
                    if snapshot.status.is_terminal() {
                        return Ok(WaitOutcome::Terminal(snapshot));
                    }
                    None
                }
                Err(error) => Some(error),
            };
            let waited = self.clock.now().saturating_duration_since(started);
            if waited >= timeout {
                return match poll_error {
                    Some(error) => Err(CoordinatorError::Store(error)),
                    None => Ok(WaitOutcome::LocalTimeout { waited }),
                };
            }
            self.clock.sleep(self.policy.poll_interval);
        }
    }
}
