// crates/editor-relay-core/src/interfaces/mod.rs
// ============================================================================
// Module: Editor Relay Core Interfaces
// Description: Store abstraction implemented by queue backends.
// Purpose: Keep the coordinator independent of the concrete persistence layer
//          so deterministic in-memory stores can drive protocol tests.
// Dependencies: crate::core, thiserror
// ============================================================================

//! ## Overview
//! [`RequestQueueStore`] is the seam between the coordinator runtime and the
//! shared queue. The production backend is SQLite; tests substitute scripted
//! stores to exercise timeout and failure paths without a database.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::identifiers::RequestId;
use crate::core::request::RequestKind;
use crate::core::request::RequestPayload;
use crate::core::request::RequestSnapshot;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Store operation failures surfaced to the coordinator.
///
/// # Invariants
/// - Variants classify the failure; the payload carries backend detail for
///   diagnostics only.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Filesystem operation failed.
    #[error("store io failure: {0}")]
    Io(String),
    /// Backend query or statement failed.
    #[error("store backend failure: {0}")]
    Db(String),
    /// Stored data violated an integrity expectation.
    #[error("store corruption: {0}")]
    Corrupt(String),
    /// Persisted schema version does not match this build.
    #[error("store schema version mismatch: {0}")]
    VersionMismatch(String),
    /// Caller input rejected by the store.
    #[error("invalid store input: {0}")]
    Invalid(String),
    /// Store is temporarily unreachable.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

// ============================================================================
// SECTION: Execution Log
// ============================================================================

/// Severity of an execution log entry.
///
/// # Invariants
/// - Labels match the `log_level` column CHECK constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    /// Diagnostic detail.
    Debug,
    /// Routine lifecycle events.
    Info,
    /// Recoverable anomalies.
    Warning,
    /// Failures.
    Error,
}

impl LogLevel {
    /// Returns the stored column label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
        }
    }
}

// ============================================================================
// SECTION: Store Trait
// ============================================================================

/// Persistence seam for the shared request queue.
///
/// # Invariants
/// - `insert` writes status `pending` with null `started_at`/`completed_at`.
/// - `cancel_pending` flips `pending` to `cancelled` atomically and reports
///   whether a row transitioned; a request already claimed by the executor is
///   left untouched.
/// - Reads never mutate rows.
pub trait RequestQueueStore {
    /// Inserts a validated payload and returns the assigned identifier.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the write fails.
    fn insert(&self, payload: &RequestPayload, priority: i64) -> Result<RequestId, StoreError>;

    /// Fetches one request by kind and identifier.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the read fails. A missing row is
    /// `Ok(None)`, not an error.
    fn fetch(&self, kind: RequestKind, id: RequestId) -> Result<Option<RequestSnapshot>, StoreError>;

    /// Atomically cancels a still-pending request.
    ///
    /// Returns `true` when the row transitioned to `cancelled`, `false` when
    /// it was already claimed, already terminal, or does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the conditional update fails.
    fn cancel_pending(&self, kind: RequestKind, id: RequestId) -> Result<bool, StoreError>;

    /// Lists pending requests of one kind in claim order.
    ///
    /// Claim order is priority descending, then creation time ascending.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the read fails.
    fn list_pending(&self, kind: RequestKind) -> Result<Vec<RequestSnapshot>, StoreError>;

    /// Appends an execution log entry for a request.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the write fails.
    fn append_log(
        &self,
        kind: RequestKind,
        id: RequestId,
        level: LogLevel,
        source: &str,
        message: &str,
    ) -> Result<(), StoreError>;

    /// Probes whether the store is reachable.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the probe fails.
    fn readiness(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
