// crates/editor-relay-core/src/runtime/mod.rs
// ============================================================================
// Module: Editor Relay Runtime
// Description: Coordinator runtime and clock abstraction.
// Purpose: Group the protocol driver and its time source.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! The runtime layer drives the submit/poll/cancel protocol over any
//! [`crate::interfaces::RequestQueueStore`]. Time is injected through
//! [`Clock`] so wait loops are deterministic under test.

// ============================================================================
// SECTION: Modules
// ============================================================================

/// Injectable time source.
pub mod clock;
/// Protocol coordination over a queue store.
pub mod coordinator;

// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use clock::Clock;
pub use clock::SystemClock;
pub use coordinator::CoordinatorError;
pub use coordinator::DEFAULT_POLL_INTERVAL;
pub use coordinator::DEFAULT_TIMEOUT;
pub use coordinator::RequestCoordinator;
pub use coordinator::WaitOutcome;
pub use coordinator::WaitPolicy;
