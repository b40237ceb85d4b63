// crates/editor-relay-core/src/lib.rs
// ============================================================================
// Module: Editor Relay Core
// Description: Domain types, store interfaces, and coordinator runtime.
// Purpose: Define the request/response coordination protocol shared by all
//          request kinds.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! Editor Relay drives an externally running Unity Editor through a shared
//! `SQLite` queue. This crate holds the protocol pieces that are independent
//! of any storage backend: the request data model, the queue store
//! interface, and the generic [`runtime::RequestCoordinator`] that submits
//! requests, polls for completion, and reports terminal outcomes.
//!
//! The external executor (the Unity Editor process) is out of scope; this
//! crate only ever writes `pending` rows and conditional `cancelled`
//! transitions. Every other status transition is observed, never produced.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use core::AssetRefreshPayload;
pub use core::HierarchyRequestType;
pub use core::ImportOptions;
pub use core::MenuItemPayload;
pub use core::PayloadError;
pub use core::RefreshType;
pub use core::RequestId;
pub use core::RequestKind;
pub use core::RequestPayload;
pub use core::RequestResult;
pub use core::RequestSnapshot;
pub use core::RequestStatus;
pub use core::SceneHierarchyPayload;
pub use core::TestPlatform;
pub use core::TestRequestType;
pub use core::TestRunPayload;
pub use core::Timestamp;
pub use interfaces::LogLevel;
pub use interfaces::RequestQueueStore;
pub use interfaces::StoreError;
pub use runtime::Clock;
pub use runtime::CoordinatorError;
pub use runtime::DEFAULT_POLL_INTERVAL;
pub use runtime::DEFAULT_TIMEOUT;
pub use runtime::RequestCoordinator;
pub use runtime::SystemClock;
pub use runtime::WaitOutcome;
pub use runtime::WaitPolicy;
