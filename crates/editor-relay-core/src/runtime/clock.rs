// crates/editor-relay-core/src/runtime/clock.rs
// ============================================================================
// Module: Editor Relay Clock
// Description: Injectable monotonic time source.
// Purpose: Let wait loops observe and advance time deterministically in
//          tests while the production clock sleeps for real.
// Dependencies: std
// ============================================================================

//! ## Overview
//! [`Clock`] abstracts the two time operations the coordinator needs: read a
//! monotonic instant and sleep between polls. [`SystemClock`] is the
//! production implementation; tests supply manual clocks that advance on
//! `sleep`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;
use std::time::Instant;

// ============================================================================
// SECTION: Clock Trait
// ============================================================================

/// Monotonic time source for wait loops.
///
/// # Invariants
/// - `now` is monotonic with respect to `sleep`: after `sleep(d)`, `now`
///   reports at least `d` more elapsed time.
pub trait Clock {
    /// Returns the current monotonic instant.
    fn now(&self) -> Instant;

    /// Blocks for the given duration.
    fn sleep(&self, duration: Duration);
}

// ============================================================================
// SECTION: System Clock
// ============================================================================

/// Production clock backed by [`Instant`] and [`std::thread::sleep`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}
