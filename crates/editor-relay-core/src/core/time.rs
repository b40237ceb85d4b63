// crates/editor-relay-core/src/core/time.rs
// ============================================================================
// Module: Editor Relay Time Model
// Description: Canonical timestamp representation for request rows.
// Purpose: Provide explicit time values stamped by the store and echoed in
//          snapshots.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Request rows carry unix-millisecond timestamps written by whichever side
//! performed the transition: the store stamps `created_at` at insertion, the
//! external executor stamps `started_at` and `completed_at`. The coordinator
//! never reads wall-clock time itself; its poll clock is injected separately.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Time Values
// ============================================================================

/// Canonical timestamp used in request rows and execution log entries.
///
/// # Invariants
/// - Values are unix epoch milliseconds; no validation is performed.
/// - Monotonicity across a row's lifecycle is the writer's responsibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Creates a timestamp from unix epoch milliseconds.
    #[must_use]
    pub const fn from_unix_millis(millis: i64) -> Self {
        Self(millis)
    }

    /// Returns the timestamp as unix epoch milliseconds.
    #[must_use]
    pub const fn unix_millis(self) -> i64 {
        self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
