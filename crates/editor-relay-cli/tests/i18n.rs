// crates/editor-relay-cli/tests/i18n.rs
// ============================================================================
// Module: CLI i18n Tests
// Description: Exercises the translation catalog and placeholder substitution.
// Purpose: Ensure CLI user-facing strings route through stable i18n helpers.
// Dependencies: editor-relay-cli i18n module and the `t!` macro.
// ============================================================================

//! ## Overview
//! Validates the Editor Relay CLI i18n catalog behavior:
//! - Message arguments capture key/value substitutions.
//! - Translation falls back to keys on misses.
//! - The [`t!`](editor_relay_cli::t) macro formats placeholders correctly.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use editor_relay_cli::i18n::Locale;
use editor_relay_cli::i18n::MessageArg;
use editor_relay_cli::i18n::SUPPORTED_LOCALES;
use editor_relay_cli::i18n::translate;
use editor_relay_cli::t;

// ============================================================================
// SECTION: Tests
// ============================================================================

/// Confirms message arguments capture key/value pairs.
#[test]
fn message_arg_new_captures_key_and_value() {
    let arg = MessageArg::new("path", "/tmp/coordination.db");
    assert_eq!(arg.key, "path");
    assert_eq!(arg.value, "/tmp/coordination.db");
}

/// Confirms catalog entries resolve and replace placeholders.
#[test]
fn translate_substitutes_placeholders() {
    let args = vec![MessageArg::new("kind", "menu_item"), MessageArg::new("id", "7")];
    let result = translate("submit.ok", args);
    assert_eq!(result, "Submitted menu_item request 7");
}

/// Confirms missing keys fall back to the key string.
#[test]
fn translate_falls_back_to_key() {
    let result = translate("missing.key", Vec::new());
    assert_eq!(result, "missing.key");
}

/// Confirms the macro forwards named arguments in order.
#[test]
fn t_macro_formats_named_arguments() {
    let rendered = t!("status.header", id = 3, kind = "test_run", status = "pending");
    assert_eq!(rendered, "Request 3 (test_run): pending");
}

/// Confirms every catalog key substitutes multiple counters.
#[test]
fn test_counts_render_all_counters() {
    let rendered = t!("summary.test.counts", passed = 11, failed = 1, skipped = 0, total = 12);
    assert_eq!(rendered, "Passed: 11, Failed: 1, Skipped: 0 (total 12)");
}

/// Confirms locale parsing tolerates case and region suffixes.
#[test]
fn locale_parse_is_tolerant() {
    assert_eq!(Locale::parse("CA"), Some(Locale::Ca));
    assert_eq!(Locale::parse("en-US"), Some(Locale::En));
    assert_eq!(Locale::parse("ca_ES.UTF-8"), Some(Locale::Ca));
    assert_eq!(Locale::parse(""), None);
    assert_eq!(Locale::parse("fr"), None);
}

/// Confirms the supported locale list is stable.
#[test]
fn supported_locales_are_ordered() {
    assert_eq!(SUPPORTED_LOCALES, &[Locale::En, Locale::Ca]);
}
