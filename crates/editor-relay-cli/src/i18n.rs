// crates/editor-relay-cli/src/i18n.rs
// ============================================================================
// Module: CLI Internationalization Helpers
// Description: Provides message catalog and translation utilities for the CLI.
// Purpose: Centralize user-facing strings for future localization support.
// Dependencies: Standard library collections and formatting utilities.
// ============================================================================

//! ## Overview
//! The Editor Relay CLI stores user-facing strings in a small translation
//! catalog to enforce consistent messaging and to prepare for future locales.
//! All runtime output should be routed through the [`t!`](crate::t) macro.
//!
//! ## Invariants
//! - The catalog is initialized once and read-only thereafter.
//! - Missing keys fall back to English and then to the key itself.
//! - Placeholder substitutions preserve deterministic order.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Supported CLI locales.
///
/// # Invariants
/// - Variants are stable for CLI parsing and catalog lookup.
/// - [`Locale::En`] is the default fallback locale.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Locale {
    /// English (default).
    En,
    /// Catalan.
    Ca,
}

impl Locale {
    /// Returns the canonical locale label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ca => "ca",
        }
    }

    /// Attempts to parse a locale value (case-insensitive, tolerant of region tags).
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }
        let normalized = value.to_ascii_lowercase();
        let lang = normalized.split(['-', '_']).next().unwrap_or("");
        match lang {
            "en" => Some(Self::En),
            "ca" => Some(Self::Ca),
            _ => None,
        }
    }
}

/// Ordered list of supported CLI locales.
///
/// # Invariants
/// - Ordering is stable for deterministic presentation.
pub const SUPPORTED_LOCALES: &[Locale] = &[Locale::En, Locale::Ca];

/// A formatted message argument captured by the [`macro@crate::t`] macro.
///
/// # Invariants
/// - `key` matches a placeholder name without braces (for example, `path`).
/// - `value` is preformatted and should be safe for display.
#[derive(Clone)]
pub struct MessageArg {
    /// The placeholder name used in message templates (e.g., `"path"`).
    pub key: &'static str,
    /// The formatted string value to substitute for this placeholder.
    pub value: String,
}

impl MessageArg {
    /// Constructs a new [`MessageArg`] from a key and displayable value.
    pub fn new(key: &'static str, value: impl Into<String>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }
}

// ============================================================================
// SECTION: Locale Selection
// ============================================================================

/// Global locale selection for CLI output.
static CURRENT_LOCALE: OnceLock<Locale> = OnceLock::new();

/// Sets the CLI locale. Only the first call wins.
pub fn set_locale(locale: Locale) {
    let _ = CURRENT_LOCALE.set(locale);
}

/// Returns the current CLI locale (defaults to English).
#[must_use]
pub fn current_locale() -> Locale {
    CURRENT_LOCALE.get().copied().unwrap_or(Locale::En)
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// Static English catalog entries loaded into the localized message bundle.
const CATALOG_EN: &[(&str, &str)] = &[
    ("main.version", "editor-relay {version}"),
    ("i18n.lang.invalid_env", "Invalid value for {env}: {value}. Expected 'en' or 'ca'."),
    (
        "i18n.disclaimer.machine_translated",
        "Note: non-English output is machine translated and may be inaccurate.",
    ),
    ("output.stream.stdout", "stdout"),
    ("output.stream.stderr", "stderr"),
    ("output.stream.unknown", "output"),
    ("output.write_failed", "Failed to write to {stream}: {error}"),
    ("config.load_failed", "Failed to load configuration: {error}"),
    ("store.open_failed", "Failed to open the coordination database: {error}"),
    ("store.cwd_failed", "Failed to resolve the working directory: {error}"),
    ("request.failed", "Request operation failed: {error}"),
    ("json.serialize_failed", "Failed to render JSON output: {error}"),
    ("submit.ok", "Submitted {kind} request {id}"),
    ("status.missing", "No {kind} request with id {id}"),
    ("status.header", "Request {id} ({kind}): {status}"),
    ("status.priority", "Priority: {priority}"),
    ("status.created", "Created at: {created}"),
    ("status.started", "Started at: {started}"),
    ("status.finished", "Completed at: {completed}"),
    ("status.error_message", "Error: {error}"),
    ("summary.duration", "Duration: {seconds}s"),
    ("summary.test.counts", "Passed: {passed}, Failed: {failed}, Skipped: {skipped} (total {total})"),
    ("summary.test.summary", "Summary: {summary}"),
    ("summary.menu.result", "Result: {result}"),
    ("summary.hierarchy.output", "Hierarchy written to {path}"),
    ("summary.refresh.result", "Result: {result}"),
    ("cancel.ok", "Cancelled {kind} request {id}"),
    ("cancel.denied", "Request {id} is not pending; nothing was cancelled"),
    ("wait.timeout", "Gave up after {seconds}s; request {id} is still queued for the editor"),
    ("wait.not_found", "Request {id} disappeared while waiting"),
    ("wait.store_failed", "Store became unreachable while waiting: {error}"),
    ("pending.empty", "No pending {kind} requests"),
    ("pending.line", "#{id} priority {priority} created {created}"),
    ("db.init.ok", "Coordination database ready at {path}"),
    ("db.verify.ok", "Store verification passed"),
    ("db.verify.failed", "Store verification failed"),
    ("db.verify.version", "Schema version: {version}"),
    ("db.verify.missing", "Missing tables: {tables}"),
    ("db.verify.count", "{table}: {rows} rows"),
    ("db.reset.ok", "Coordination database reset at {path}"),
    ("db.reset.refused", "Refusing to reset the coordination database without --yes"),
];

/// Static Catalan catalog entries loaded into the localized message bundle.
const CATALOG_CA: &[(&str, &str)] = &[
    ("main.version", "editor-relay {version}"),
    ("i18n.lang.invalid_env", "Valor no vàlid per a {env}: {value}. S'esperava 'en' o 'ca'."),
    (
        "i18n.disclaimer.machine_translated",
        "Nota: la sortida que no és en anglès està traduïda automàticament i pot ser inexacta.",
    ),
    ("output.stream.stdout", "stdout"),
    ("output.stream.stderr", "stderr"),
    ("output.stream.unknown", "sortida"),
    ("output.write_failed", "No s'ha pogut escriure a {stream}: {error}"),
    ("config.load_failed", "No s'ha pogut carregar la configuració: {error}"),
    ("store.open_failed", "No s'ha pogut obrir la base de dades de coordinació: {error}"),
    ("store.cwd_failed", "No s'ha pogut resoldre el directori de treball: {error}"),
    ("request.failed", "L'operació de la petició ha fallat: {error}"),
    ("json.serialize_failed", "No s'ha pogut generar la sortida JSON: {error}"),
    ("submit.ok", "S'ha enviat la petició {kind} {id}"),
    ("status.missing", "No hi ha cap petició {kind} amb id {id}"),
    ("status.header", "Petició {id} ({kind}): {status}"),
    ("status.priority", "Prioritat: {priority}"),
    ("status.created", "Creada: {created}"),
    ("status.started", "Iniciada: {started}"),
    ("status.finished", "Finalitzada: {completed}"),
    ("status.error_message", "Error: {error}"),
    ("summary.duration", "Durada: {seconds}s"),
    (
        "summary.test.counts",
        "Superades: {passed}, Fallades: {failed}, Omeses: {skipped} (total {total})",
    ),
    ("summary.test.summary", "Resum: {summary}"),
    ("summary.menu.result", "Resultat: {result}"),
    ("summary.hierarchy.output", "Jerarquia escrita a {path}"),
    ("summary.refresh.result", "Resultat: {result}"),
    ("cancel.ok", "S'ha cancel·lat la petició {kind} {id}"),
    ("cancel.denied", "La petició {id} no està pendent; no s'ha cancel·lat res"),
    (
        "wait.timeout",
        "S'ha abandonat després de {seconds}s; la petició {id} continua a la cua de l'editor",
    ),
    ("wait.not_found", "La petició {id} ha desaparegut mentre s'esperava"),
    ("wait.store_failed", "El magatzem ha esdevingut inaccessible mentre s'esperava: {error}"),
    ("pending.empty", "No hi ha peticions {kind} pendents"),
    ("pending.line", "#{id} prioritat {priority} creada {created}"),
    ("db.init.ok", "Base de dades de coordinació a punt a {path}"),
    ("db.verify.ok", "La verificació del magatzem ha passat"),
    ("db.verify.failed", "La verificació del magatzem ha fallat"),
    ("db.verify.version", "Versió de l'esquema: {version}"),
    ("db.verify.missing", "Taules que falten: {tables}"),
    ("db.verify.count", "{table}: {rows} files"),
    ("db.reset.ok", "S'ha reiniciat la base de dades de coordinació a {path}"),
    ("db.reset.refused", "Es rebutja reiniciar la base de dades de coordinació sense --yes"),
];

/// Returns the message catalog for the requested locale.
pub(crate) fn catalog_for(locale: Locale) -> &'static HashMap<&'static str, &'static str> {
    static CATALOG_EN_MAP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    static CATALOG_CA_MAP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    match locale {
        Locale::En => CATALOG_EN_MAP.get_or_init(|| CATALOG_EN.iter().copied().collect()),
        Locale::Ca => CATALOG_CA_MAP.get_or_init(|| CATALOG_CA.iter().copied().collect()),
    }
}

// ============================================================================
// SECTION: Translation
// ============================================================================

/// Translates `key` using the selected locale while substituting `args`.
#[must_use]
pub fn translate(key: &str, args: Vec<MessageArg>) -> String {
    let locale = current_locale();
    let template = catalog_for(locale)
        .get(key)
        .copied()
        .or_else(|| catalog_for(Locale::En).get(key).copied())
        .unwrap_or(key);
    if args.is_empty() {
        return template.to_string();
    }

    let mut result = template.to_string();
    for arg in args {
        let placeholder = format!("{{{}}}", arg.key);
        result = result.replace(&placeholder, &arg.value);
    }
    result
}

// ============================================================================
// SECTION: Macro
// ============================================================================

/// Formats a localized message from a key and named arguments.
///
/// # Arguments
///
/// - `$key` must match a catalog entry.
/// - Named arguments are substituted into `{placeholder}` positions.
///
/// # Returns
///
/// A localized [`String`] with placeholders substituted.
#[macro_export]
macro_rules! t {
    ($key:literal $(, $name:ident = $value:expr )* $(,)?) => {{
        let args = ::std::vec![
            $(
                $crate::i18n::MessageArg::new(stringify!($name), $value.to_string()),
            )*
        ];
        $crate::i18n::translate($key, args)
    }};
}
