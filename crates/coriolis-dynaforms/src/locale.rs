// crates/coriolis-dynaforms/src/locale.rs
// ============================================================================
// Module: Localizable Text
// Description: Plain or per-locale text values and their resolution rules.
// Purpose: Resolve template text against an explicit locale context.
// Dependencies: indexmap, serde
// ============================================================================

//! ## Overview
//! Labels, help texts, choice labels and content blocks are either a plain
//! string or a mapping of locale code to translation. Resolution takes the
//! active locale explicitly through [`LocaleContext`] instead of reading it
//! from process state.
//!
//! ## Invariants
//! - Translation maps keep their declared key order.
//! - When no supported variant matches, the first declared translation wins.

// ============================================================================
// SECTION: Imports
// ============================================================================

use indexmap::IndexMap;
use serde::Deserialize;
use serde::Serialize;

use crate::i18n::Locale;
use crate::t;

// ============================================================================
// SECTION: Localizable Text
// ============================================================================

/// Template text that is either plain or translated per locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LocalizableText {
    /// A single string used for every locale.
    Plain(String),
    /// Translations keyed by locale code, in declaration order.
    Localized(IndexMap<String, String>),
}

impl LocalizableText {
    /// Builds a plain text value.
    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self::Plain(text.into())
    }

    /// Builds a localized value from ordered `(locale, text)` pairs.
    #[must_use]
    pub fn localized<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self::Localized(entries.into_iter().map(|(key, value)| (key.into(), value.into())).collect())
    }
}

impl From<&str> for LocalizableText {
    fn from(value: &str) -> Self {
        Self::plain(value)
    }
}

impl From<String> for LocalizableText {
    fn from(value: String) -> Self {
        Self::Plain(value)
    }
}

// ============================================================================
// SECTION: Locale Context
// ============================================================================

/// Active locale plus the set of locales the caller supports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleContext {
    /// Requested locale code, lowercased with `-` separators.
    current: String,
    /// Supported locale codes, lowercased with `-` separators.
    supported: Vec<String>,
}

impl LocaleContext {
    /// Creates a context for `current` with the given supported locales.
    #[must_use]
    pub fn new<I, S>(current: &str, supported: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            current: normalize_code(current),
            supported: supported.into_iter().map(|code| normalize_code(code.as_ref())).collect(),
        }
    }

    /// Returns the requested locale code.
    #[must_use]
    pub fn current(&self) -> &str {
        &self.current
    }

    /// Returns the supported locale codes.
    #[must_use]
    pub fn supported(&self) -> &[String] {
        &self.supported
    }

    /// Resolves the requested locale to the closest supported variant.
    ///
    /// Tries the exact code, then the generic language, then any supported
    /// regional variant of that language.
    #[must_use]
    pub fn supported_variant(&self) -> Option<&str> {
        if self.current.is_empty() {
            return None;
        }
        let generic = self.current.split('-').next().unwrap_or_default();
        for candidate in [self.current.as_str(), generic] {
            if let Some(code) = self.supported.iter().find(|code| code.as_str() == candidate) {
                return Some(code);
            }
        }
        let regional = format!("{generic}-");
        self.supported.iter().find(|code| code.starts_with(&regional)).map(String::as_str)
    }

    /// Returns the engine catalog locale for this context (English fallback).
    #[must_use]
    pub fn catalog_locale(&self) -> Locale {
        self.supported_variant().and_then(Locale::parse).unwrap_or(Locale::En)
    }

    /// Resolves a localizable value to the text for this context.
    #[must_use]
    pub fn resolve(&self, text: &LocalizableText) -> String {
        match text {
            LocalizableText::Plain(value) => value.clone(),
            LocalizableText::Localized(translations) => {
                if let Some(variant) = self.supported_variant()
                    && let Some((_, value)) =
                        translations.iter().find(|(code, _)| normalize_code(code) == variant)
                {
                    return value.clone();
                }
                translations.first().map_or_else(
                    || t!(self.catalog_locale(), "text.missing_translation"),
                    |(_, value)| value.clone(),
                )
            }
        }
    }
}

/// Lowercases a locale code and unifies `_` separators to `-`.
fn normalize_code(code: &str) -> String {
    code.trim().to_ascii_lowercase().replace('_', "-")
}
