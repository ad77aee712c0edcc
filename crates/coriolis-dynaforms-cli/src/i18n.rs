// crates/coriolis-dynaforms-cli/src/i18n.rs
// ============================================================================
// Module: CLI Internationalization Helpers
// Description: Provides message catalogs and translation utilities for the CLI.
// Purpose: Centralize user-facing strings so every command speaks en and pl.
// Dependencies: coriolis-dynaforms i18n locales, standard library collections.
// ============================================================================

//! ## Overview
//! The dynaforms CLI stores user-facing strings in small per-locale catalogs.
//! All runtime output should be routed through the [`t!`](crate::t) macro,
//! which reads the process-wide locale selected once at startup with
//! [`set_locale`].
//!
//! ## Invariants
//! - Catalogs are initialized once and read-only thereafter.
//! - Missing keys fall back to English and then to the key itself.
//! - Placeholder substitutions preserve deterministic order.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::sync::OnceLock;
use std::sync::atomic::AtomicU8;
use std::sync::atomic::Ordering;

pub use coriolis_dynaforms::i18n::Locale;
pub use coriolis_dynaforms::i18n::MessageArg;
pub use coriolis_dynaforms::i18n::SUPPORTED_LOCALES;

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// English catalog entries.
const CATALOG_EN: &[(&str, &str)] = &[
    ("main.version", "dynaforms {version}"),
    ("output.stream.stdout", "stdout"),
    ("output.stream.stderr", "stderr"),
    ("output.stream.unknown", "output"),
    ("output.write_failed", "Failed to write to {stream}: {error}"),
    ("output.serialize_failed", "Failed to serialize output: {error}"),
    ("input.kind.template", "template"),
    ("input.kind.answers", "answers"),
    ("input.read_failed", "Failed to read {kind} at {path}: {error}"),
    (
        "input.read_too_large",
        "Refusing to read {kind} at {path} because it is {size} bytes (limit {limit}).",
    ),
    ("config.load_failed", "Failed to load config: {error}"),
    ("config.validate.ok", "Config valid."),
    ("template.parse_failed", "Failed to parse template {path}: {error}"),
    ("template.invalid", "Template {path} has {count} violation(s):"),
    ("template.violation", "  - {field}: {rule}"),
    ("template.check.ok", "Template valid: {fields} form field(s), {nodes} node(s)."),
    ("answers.parse_failed", "Failed to parse answers JSON at {path}: {error}"),
    ("answers.not_object", "Answers at {path} must be a JSON object."),
    ("i18n.lang.invalid_env", "Invalid {env} value '{value}'; expected en or pl."),
    ("logging.init_failed", "Failed to initialize logging: {error}"),
];

/// Polish catalog entries.
const CATALOG_PL: &[(&str, &str)] = &[
    ("main.version", "dynaforms {version}"),
    ("output.stream.stdout", "stdout"),
    ("output.stream.stderr", "stderr"),
    ("output.stream.unknown", "wyjście"),
    ("output.write_failed", "Nie udało się zapisać do {stream}: {error}"),
    ("output.serialize_failed", "Nie udało się zserializować wyniku: {error}"),
    ("input.kind.template", "szablon"),
    ("input.kind.answers", "odpowiedzi"),
    ("input.read_failed", "Nie udało się odczytać ({kind}) {path}: {error}"),
    (
        "input.read_too_large",
        "Odmowa odczytu ({kind}) {path}: plik ma {size} bajtów (limit {limit}).",
    ),
    ("config.load_failed", "Nie udało się wczytać konfiguracji: {error}"),
    ("config.validate.ok", "Konfiguracja poprawna."),
    ("template.parse_failed", "Nie udało się przetworzyć szablonu {path}: {error}"),
    ("template.invalid", "Szablon {path} zawiera błędy ({count}):"),
    ("template.violation", "  - {field}: {rule}"),
    ("template.check.ok", "Szablon poprawny: pola formularza: {fields}, węzły: {nodes}."),
    ("answers.parse_failed", "Nie udało się przetworzyć odpowiedzi JSON {path}: {error}"),
    ("answers.not_object", "Odpowiedzi w {path} muszą być obiektem JSON."),
    ("i18n.lang.invalid_env", "Nieprawidłowa wartość {env} '{value}'; oczekiwano en lub pl."),
    ("logging.init_failed", "Nie udało się zainicjować logowania: {error}"),
];

/// Returns the indexed catalog for a locale.
#[must_use]
pub fn catalog_for(locale: Locale) -> &'static HashMap<&'static str, &'static str> {
    static CATALOG_EN_MAP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    static CATALOG_PL_MAP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    match locale {
        Locale::En => CATALOG_EN_MAP.get_or_init(|| CATALOG_EN.iter().copied().collect()),
        Locale::Pl => CATALOG_PL_MAP.get_or_init(|| CATALOG_PL.iter().copied().collect()),
    }
}

/// Returns the raw catalog entries for a locale, in declaration order.
#[must_use]
pub const fn catalog_entries_for(locale: Locale) -> &'static [(&'static str, &'static str)] {
    match locale {
        Locale::En => CATALOG_EN,
        Locale::Pl => CATALOG_PL,
    }
}

// ============================================================================
// SECTION: Locale Selection
// ============================================================================

/// Process-wide output locale (0 = English, 1 = Polish).
static CURRENT_LOCALE: AtomicU8 = AtomicU8::new(0);

/// Selects the locale used by [`translate`] and [`t!`](crate::t).
pub fn set_locale(locale: Locale) {
    let index = match locale {
        Locale::En => 0,
        Locale::Pl => 1,
    };
    CURRENT_LOCALE.store(index, Ordering::Relaxed);
}

/// Returns the locale selected with [`set_locale`].
#[must_use]
pub fn current_locale() -> Locale {
    match CURRENT_LOCALE.load(Ordering::Relaxed) {
        1 => Locale::Pl,
        _ => Locale::En,
    }
}

// ============================================================================
// SECTION: Translation
// ============================================================================

/// Translates `key` for an explicit locale while substituting `args`.
#[must_use]
pub fn translate_for(locale: Locale, key: &str, args: Vec<MessageArg>) -> String {
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

/// Translates `key` using the current locale while substituting `args`.
#[must_use]
pub fn translate(key: &str, args: Vec<MessageArg>) -> String {
    translate_for(current_locale(), key, args)
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
