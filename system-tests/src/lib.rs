// system-tests/src/lib.rs
// ============================================================================
// Module: Editor Relay System Tests Library
// Description: Shared helpers for end-to-end protocol scenarios.
// Purpose: Provide a simulated Unity-side executor for system tests.
// Dependencies: editor-relay-core, rusqlite
// ============================================================================

//! ## Overview
//! This crate hosts the simulated executor used by the system tests in
//! `system-tests/tests`. The executor plays the Unity Editor's role: it
//! claims pending rows from the shared database in priority order and writes
//! the status transitions the client side may only observe.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod executor;
