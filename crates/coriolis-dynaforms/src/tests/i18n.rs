// crates/coriolis-dynaforms/src/tests/i18n.rs
// ============================================================================
// Module: Engine i18n Tests
// Description: Unit tests for catalog parity and locale parsing.
// Purpose: Ensure engine strings stay consistent across supported locales.
// Dependencies: coriolis-dynaforms i18n module
// ============================================================================

//! ## Overview
//! Verifies the engine message catalogs stay in sync, locale parsing is
//! tolerant, and placeholders are substituted.

use std::collections::BTreeSet;

use crate::i18n::Locale;
use crate::i18n::MessageArg;
use crate::i18n::SUPPORTED_LOCALES;
use crate::i18n::catalog_entries_for;
use crate::i18n::catalog_for;
use crate::i18n::translate;

#[test]
fn catalogs_have_matching_keys() {
    assert!(SUPPORTED_LOCALES.contains(&Locale::En), "English must remain the baseline locale");
    let en_keys: BTreeSet<&'static str> = catalog_for(Locale::En).keys().copied().collect();
    for locale in SUPPORTED_LOCALES {
        let locale_keys: BTreeSet<&'static str> = catalog_for(*locale).keys().copied().collect();
        assert_eq!(en_keys, locale_keys, "locale catalogs must stay in parity ({locale:?})");
    }
}

#[test]
fn catalog_entries_have_no_duplicate_keys() {
    for locale in SUPPORTED_LOCALES {
        let entries = catalog_entries_for(*locale);
        let keys: BTreeSet<&str> = entries.iter().map(|(key, _)| *key).collect();
        assert_eq!(keys.len(), entries.len(), "duplicate catalog key ({locale:?})");
    }
}

#[test]
fn placeholders_match_across_locales() {
    for (key, en_text) in catalog_entries_for(Locale::En) {
        let pl_text = catalog_for(Locale::Pl).get(key).copied().expect("pl key exists");
        for placeholder in ["{key}", "{filename}"] {
            assert_eq!(
                en_text.contains(placeholder),
                pl_text.contains(placeholder),
                "placeholder {placeholder} mismatch for {key}"
            );
        }
    }
}

#[test]
fn locale_parse_accepts_region_tags_and_case() {
    assert_eq!(Locale::parse("en"), Some(Locale::En));
    assert_eq!(Locale::parse("EN"), Some(Locale::En));
    assert_eq!(Locale::parse("en-US"), Some(Locale::En));
    assert_eq!(Locale::parse("pl_PL"), Some(Locale::Pl));
    assert_eq!(Locale::parse(""), None);
    assert_eq!(Locale::parse("de"), None);
}

#[test]
fn translate_substitutes_placeholders() {
    let output = translate(Locale::Pl, "answer.unknown_field", vec![MessageArg::new("key", "kupon")]);
    assert_eq!(output, "Nieznane pole (kupon)");
}

#[test]
fn translate_falls_back_to_the_key() {
    assert_eq!(translate(Locale::Pl, "answer.not_a_key", Vec::new()), "answer.not_a_key");
}

#[test]
fn macro_formats_named_arguments() {
    let output = crate::t!(Locale::En, "answer.file_upload.encrypted", filename = "scan.pdf");
    assert_eq!(output, "scan.pdf (encrypted)");
}
