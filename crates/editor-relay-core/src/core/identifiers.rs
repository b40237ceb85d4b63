// crates/editor-relay-core/src/core/identifiers.rs
// ============================================================================
// Module: Editor Relay Identifiers
// Description: Typed identifier for queued requests.
// Purpose: Provide a strongly typed, serializable request identifier with a
//          stable wire form.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Request identifiers are assigned by the queue store at insertion and are
//! immutable afterwards. They serialize as plain numbers on the wire and
//! enforce the non-zero, 1-based invariant at construction boundaries.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::num::NonZeroU64;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Identifier Types
// ============================================================================

/// Store-assigned identifier for a queued request.
///
/// # Invariants
/// - Always >= 1 (non-zero, 1-based; `SQLite` rowids start at 1).
/// - Immutable once assigned; uniqueness is guaranteed per kind by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(NonZeroU64);

impl RequestId {
    /// Creates a new request identifier from a non-zero value.
    #[must_use]
    pub const fn new(id: NonZeroU64) -> Self {
        Self(id)
    }

    /// Creates a request identifier from a raw value (returns `None` if zero).
    #[must_use]
    pub fn from_raw(raw: u64) -> Option<Self> {
        NonZeroU64::new(raw).map(Self)
    }

    /// Returns the raw identifier value (always >= 1).
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0.get()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.get().fmt(f)
    }
}
