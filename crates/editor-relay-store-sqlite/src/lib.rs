// crates/editor-relay-store-sqlite/src/lib.rs
// ============================================================================
// Module: Editor Relay SQLite Store
// Description: Durable RequestQueueStore backed by SQLite WAL.
// Purpose: Persist the shared request queue the external executor consumes.
// Dependencies: editor-relay-core, rusqlite, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! `SQLite` implementation of the queue store. The database file is shared
//! with the external Unity Editor executor, which claims pending rows and
//! writes every status transition past `pending`. WAL mode keeps concurrent
//! reader/writer access safe across processes.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod store;

// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use store::SCHEMA_VERSION;
pub use store::SqliteQueueConfig;
pub use store::SqliteQueueError;
pub use store::SqliteQueueStore;
pub use store::SqliteStoreMode;
pub use store::SqliteSyncMode;
pub use store::VerifyReport;
