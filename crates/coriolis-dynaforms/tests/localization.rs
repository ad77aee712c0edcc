//! Localizable text resolution tests for coriolis-dynaforms.
// crates/coriolis-dynaforms/tests/localization.rs
// =============================================================================
// Module: Localization Tests
// Description: Locale variant matching and translation fallbacks.
// Purpose: Ensure text resolution is deterministic for every locale.
// =============================================================================

use coriolis_dynaforms::LocaleContext;
use coriolis_dynaforms::LocalizableText;
use coriolis_dynaforms::i18n::Locale;

mod common;

type TestResult = Result<(), String>;

/// Asserts that `text` resolves to `expected` under `ctx`.
fn assert_resolves(ctx: &LocaleContext, text: &LocalizableText, expected: &str) -> TestResult {
    let actual = ctx.resolve(text);
    if actual == expected {
        Ok(())
    } else {
        Err(format!("locale {}: expected '{expected}', got '{actual}'", ctx.current()))
    }
}

#[test]
fn plain_text_is_returned_unchanged() -> TestResult {
    assert_resolves(&common::locale("pl"), &LocalizableText::plain("Name"), "Name")
}

#[test]
fn exact_locale_match_wins() -> TestResult {
    let text = LocalizableText::localized([("en", "Name"), ("pl", "Imię")]);
    assert_resolves(&common::locale("pl"), &text, "Imię")?;
    assert_resolves(&common::locale("en"), &text, "Name")
}

#[test]
fn regional_codes_fall_back_to_the_generic_language() -> TestResult {
    let text = LocalizableText::localized([("en", "Name"), ("pl", "Imię")]);
    assert_resolves(&common::locale("pl-PL"), &text, "Imię")?;
    assert_resolves(&common::locale("en_US"), &text, "Name")
}

#[test]
fn generic_codes_match_a_supported_regional_variant() -> TestResult {
    let ctx = LocaleContext::new("pt", ["en", "pt-br"]);
    if ctx.supported_variant() != Some("pt-br") {
        return Err(format!("unexpected variant {:?}", ctx.supported_variant()));
    }
    let text = LocalizableText::localized([("en", "Name"), ("pt-br", "Nome")]);
    assert_resolves(&ctx, &text, "Nome")
}

#[test]
fn translation_keys_match_regardless_of_case_and_separator() -> TestResult {
    let ctx = LocaleContext::new("pt-BR", ["pt-BR", "en"]);
    assert_resolves(&ctx, &LocalizableText::localized([("en", "Hello"), ("pt-BR", "Olá")]), "Olá")?;
    let underscored = LocalizableText::localized([("en", "Hello"), ("PT_br", "Olá")]);
    assert_resolves(&ctx, &underscored, "Olá")
}

#[test]
fn unsupported_locale_uses_the_first_declared_translation() -> TestResult {
    let text = LocalizableText::localized([("pl", "Imię"), ("en", "Name")]);
    assert_resolves(&common::locale("de"), &text, "Imię")?;
    let missing = LocalizableText::localized([("de", "Name (de)"), ("en", "Name")]);
    assert_resolves(&common::locale("pl"), &missing, "Name (de)")
}

#[test]
fn empty_current_locale_uses_the_first_declared_translation() -> TestResult {
    let text = LocalizableText::localized([("pl", "Imię"), ("en", "Name")]);
    assert_resolves(&common::locale(""), &text, "Imię")
}

#[test]
fn empty_mapping_yields_a_localized_placeholder() -> TestResult {
    let empty = LocalizableText::localized(Vec::<(String, String)>::new());
    assert_resolves(&common::locale("en"), &empty, "MISSING TRANSLATION")?;
    assert_resolves(&common::locale("pl"), &empty, "BRAK TŁUMACZENIA")
}

#[test]
fn catalog_locale_falls_back_to_english() -> TestResult {
    if common::locale("pl-PL").catalog_locale() != Locale::Pl {
        return Err("pl-PL should use the Polish catalog".to_string());
    }
    if common::locale("de").catalog_locale() != Locale::En {
        return Err("unsupported locales should use the English catalog".to_string());
    }
    Ok(())
}

#[test]
fn localizable_text_deserializes_both_shapes() -> TestResult {
    let plain: LocalizableText =
        serde_json::from_str(r#""Name""#).map_err(|err| err.to_string())?;
    if plain != LocalizableText::plain("Name") {
        return Err("plain string shape mismatch".to_string());
    }
    let localized: LocalizableText =
        serde_json::from_str(r#"{"pl": "Imię", "en": "Name"}"#).map_err(|err| err.to_string())?;
    let LocalizableText::Localized(map) = localized else {
        return Err("expected localized shape".to_string());
    };
    if map.keys().collect::<Vec<_>>() != ["pl", "en"] {
        return Err("declaration order must be preserved".to_string());
    }
    Ok(())
}
