// crates/editor-relay-cli/src/lib.rs
// ============================================================================
// Module: Editor Relay CLI Library
// Description: Shared helpers exposed to the CLI binary and its tests.
// Purpose: Host the i18n catalog behind a library target so integration
//          tests can exercise translation directly.
// Dependencies: std
// ============================================================================

//! ## Overview
//! The binary target carries the command dispatcher; this library holds the
//! localization layer it formats output through.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod i18n;
