// crates/editor-relay-core/src/core/mod.rs
// ============================================================================
// Module: Editor Relay Domain Model
// Description: Request identifiers, payloads, statuses, and snapshots.
// Purpose: Provide the canonical data model for queued editor requests.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! The domain model mirrors the shared queue tables one row at a time: a
//! typed identifier, a kind-specific payload, a status from the protocol
//! state machine, and the timestamps/result fields the external executor
//! fills in. All types carry stable snake_case wire forms.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod identifiers;
pub mod request;
pub mod time;

// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use identifiers::RequestId;
pub use request::AssetRefreshPayload;
pub use request::HierarchyRequestType;
pub use request::ImportOptions;
pub use request::MenuItemPayload;
pub use request::PayloadError;
pub use request::RefreshType;
pub use request::RequestKind;
pub use request::RequestPayload;
pub use request::RequestResult;
pub use request::RequestSnapshot;
pub use request::RequestStatus;
pub use request::SceneHierarchyPayload;
pub use request::TestPlatform;
pub use request::TestRequestType;
pub use request::TestRunPayload;
pub use time::Timestamp;
