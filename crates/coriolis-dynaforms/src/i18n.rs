// crates/coriolis-dynaforms/src/i18n.rs
// ============================================================================
// Module: Dynaforms Message Catalog
// Description: Localized strings emitted by the form engine itself.
// Purpose: Keep engine-owned output (Yes/No, placeholders) translatable.
// Dependencies: Standard library collections.
// ============================================================================

//! ## Overview
//! Most user-visible text comes from templates, but a handful of strings are
//! produced by the engine: boolean answers, the unknown-field label, the
//! encrypted upload annotation and the missing-translation placeholder. They
//! live in a small static catalog per locale.
//!
//! ## Invariants
//! - Catalogs are read-only and initialized lazily once.
//! - Missing keys fall back to English and then to the key itself.
//! - Placeholder substitutions preserve argument order.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Locales with an engine message catalog.
///
/// # Invariants
/// - [`Locale::En`] is the fallback catalog.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Locale {
    /// English (default).
    En,
    /// Polish.
    Pl,
}

impl Locale {
    /// Returns the canonical language code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Pl => "pl",
        }
    }

    /// Parses a locale code (case-insensitive, tolerant of region tags).
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase();
        let lang = normalized.split(['-', '_']).next().unwrap_or("");
        match lang {
            "en" => Some(Self::En),
            "pl" => Some(Self::Pl),
            _ => None,
        }
    }
}

/// Ordered list of locales with a catalog.
pub const SUPPORTED_LOCALES: &[Locale] = &[Locale::En, Locale::Pl];

/// A named argument substituted into a catalog template.
#[derive(Clone)]
pub struct MessageArg {
    /// Placeholder name without braces (for example, `key`).
    pub key: &'static str,
    /// Preformatted substitution value.
    pub value: String,
}

impl MessageArg {
    /// Constructs a new [`MessageArg`].
    pub fn new(key: &'static str, value: impl Into<String>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// English catalog entries.
const CATALOG_EN: &[(&str, &str)] = &[
    ("answer.yes", "Yes"),
    ("answer.no", "No"),
    ("answer.unknown_field", "Unknown field ({key})"),
    ("answer.file_upload.encrypted", "{filename} (encrypted)"),
    ("text.missing_translation", "MISSING TRANSLATION"),
];

/// Polish catalog entries.
const CATALOG_PL: &[(&str, &str)] = &[
    ("answer.yes", "Tak"),
    ("answer.no", "Nie"),
    ("answer.unknown_field", "Nieznane pole ({key})"),
    ("answer.file_upload.encrypted", "{filename} (zaszyfrowany)"),
    ("text.missing_translation", "BRAK TŁUMACZENIA"),
];

/// Returns the raw catalog entries for a locale, in declaration order.
#[must_use]
pub const fn catalog_entries_for(locale: Locale) -> &'static [(&'static str, &'static str)] {
    match locale {
        Locale::En => CATALOG_EN,
        Locale::Pl => CATALOG_PL,
    }
}

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

// ============================================================================
// SECTION: Translation
// ============================================================================

/// Translates `key` for `locale`, substituting `args` into `{placeholder}` slots.
#[must_use]
pub fn translate(locale: Locale, key: &str, args: Vec<MessageArg>) -> String {
    let template = catalog_for(locale)
        .get(key)
        .copied()
        .or_else(|| catalog_for(Locale::En).get(key).copied())
        .unwrap_or(key);
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

/// Formats an engine message for an explicit locale.
///
/// # Arguments
///
/// - `$locale` is a [`Locale`](crate::i18n::Locale).
/// - `$key` must match a catalog entry.
/// - Named arguments are substituted into `{placeholder}` positions.
#[macro_export]
macro_rules! t {
    ($locale:expr, $key:literal $(, $name:ident = $value:expr )* $(,)?) => {{
        let args = ::std::vec![
            $(
                $crate::i18n::MessageArg::new(stringify!($name), $value.to_string()),
            )*
        ];
        $crate::i18n::translate($locale, $key, args)
    }};
}
