//! Configuration validation tests for coriolis-dynaforms.
// crates/coriolis-dynaforms/tests/config_validation.rs
// =============================================================================
// Module: Config Validation Tests
// Description: TOML loading, defaults and limit enforcement.
// Purpose: Ensure invalid configuration is rejected with the offending key.
// =============================================================================

use std::fs;

use coriolis_dynaforms::ConfigError;
use coriolis_dynaforms::DynaformsConfig;
use coriolis_dynaforms::MarkupRenderer;
use coriolis_dynaforms::config::MAX_CONFIG_FILE_SIZE;
use tempfile::TempDir;

type TestResult = Result<(), String>;

/// Assert that a result is an error containing a specific substring.
fn assert_invalid<T>(result: Result<T, ConfigError>, needle: &str) -> TestResult {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error '{message}' did not contain '{needle}'"))
            }
        }
        Ok(_) => Err("expected invalid config".to_string()),
    }
}

// ============================================================================
// SECTION: Defaults
// ============================================================================

#[test]
fn empty_config_uses_defaults() -> TestResult {
    let config = DynaformsConfig::from_toml_str("").map_err(|err| err.to_string())?;
    if config != DynaformsConfig::default() {
        return Err("empty config must equal defaults".to_string());
    }
    if config.locale.default != "en" || config.locale.supported != ["pl", "en"] {
        return Err(format!("unexpected locale defaults {:?}", config.locale));
    }
    let limits = config.template_limits();
    if limits.max_template_bytes != 1024 * 1024 || limits.max_fields != 256 {
        return Err(format!("unexpected limits {limits:?}"));
    }
    Ok(())
}

#[test]
fn default_renderer_styles_tables() -> TestResult {
    let config = DynaformsConfig::default();
    let html = config.markdown_renderer().render_markdown("| a |\n|---|\n| 1 |", false);
    if !html.starts_with(r#"<table class="table table-bordered table-striped table-hover">"#) {
        return Err(format!("unexpected table rendering {html}"));
    }
    Ok(())
}

#[test]
fn locale_context_prefers_the_requested_locale() -> TestResult {
    let config = DynaformsConfig::default();
    if config.locale_context(Some("pl-PL")).supported_variant() != Some("pl") {
        return Err("requested locale should be used".to_string());
    }
    if config.locale_context(None).current() != "en" {
        return Err("default locale should be used when none is requested".to_string());
    }
    if config.locale_context(Some("  ")).current() != "en" {
        return Err("blank requests should use the default locale".to_string());
    }
    Ok(())
}

// ============================================================================
// SECTION: Validation
// ============================================================================

#[test]
fn unknown_keys_are_rejected() -> TestResult {
    assert_invalid(DynaformsConfig::from_toml_str("[locale]\nfallback = \"en\"\n"), "fallback")
}

#[test]
fn default_locale_must_be_supported() -> TestResult {
    assert_invalid(
        DynaformsConfig::from_toml_str("[locale]\ndefault = \"de\"\nsupported = [\"pl\", \"en\"]\n"),
        "locale.default",
    )
}

#[test]
fn supported_locales_must_be_valid_and_unique() -> TestResult {
    assert_invalid(
        DynaformsConfig::from_toml_str("[locale]\nsupported = []\n"),
        "locale.supported must not be empty",
    )?;
    assert_invalid(
        DynaformsConfig::from_toml_str("[locale]\nsupported = [\"en\", \"e n\"]\n"),
        "invalid code",
    )?;
    assert_invalid(
        DynaformsConfig::from_toml_str("[locale]\nsupported = [\"en\", \"pl\", \"EN\"]\n"),
        "duplicate code",
    )
}

#[test]
fn regional_defaults_resolve_against_generic_locales() -> TestResult {
    DynaformsConfig::from_toml_str("[locale]\ndefault = \"en-GB\"\n")
        .map(|_| ())
        .map_err(|err| err.to_string())
}

#[test]
fn table_class_must_be_attribute_safe() -> TestResult {
    assert_invalid(
        DynaformsConfig::from_toml_str("[markup]\ntable_class = \"x\\\" onload=\\\"y\"\n"),
        "markup.table_class",
    )?;
    assert_invalid(
        DynaformsConfig::from_toml_str("[markup]\ntable_class = \" \"\n"),
        "markup.table_class",
    )
}

#[test]
fn limits_must_be_within_range() -> TestResult {
    assert_invalid(
        DynaformsConfig::from_toml_str("[limits]\nmax_fields = 0\n"),
        "limits.max_fields",
    )?;
    assert_invalid(
        DynaformsConfig::from_toml_str("[limits]\nmax_fields = 100000\n"),
        "limits.max_fields",
    )?;
    assert_invalid(
        DynaformsConfig::from_toml_str("[limits]\nmax_template_bytes = 0\n"),
        "limits.max_template_bytes",
    )?;
    assert_invalid(
        DynaformsConfig::from_toml_str("[limits]\nmax_template_bytes = 1073741824\n"),
        "limits.max_template_bytes",
    )
}

// ============================================================================
// SECTION: Loading
// ============================================================================

#[test]
fn load_reads_an_explicit_path() -> TestResult {
    let dir = TempDir::new().map_err(|err| err.to_string())?;
    let path = dir.path().join("dynaforms.toml");
    fs::write(&path, "[locale]\ndefault = \"pl\"\n\n[limits]\nmax_fields = 32\n")
        .map_err(|err| err.to_string())?;
    let config = DynaformsConfig::load(Some(path.as_path())).map_err(|err| err.to_string())?;
    if config.locale.default != "pl" || config.limits.max_fields != 32 {
        return Err(format!("unexpected config {config:?}"));
    }
    Ok(())
}

#[test]
fn load_fails_for_a_missing_explicit_path() -> TestResult {
    let dir = TempDir::new().map_err(|err| err.to_string())?;
    let path = dir.path().join("absent.toml");
    assert_invalid(DynaformsConfig::load(Some(path.as_path())), "config io error")
}

#[test]
fn load_rejects_oversized_files() -> TestResult {
    let dir = TempDir::new().map_err(|err| err.to_string())?;
    let path = dir.path().join("dynaforms.toml");
    let padding = format!("# {}\n", "x".repeat(MAX_CONFIG_FILE_SIZE));
    fs::write(&path, padding).map_err(|err| err.to_string())?;
    assert_invalid(DynaformsConfig::load(Some(path.as_path())), "exceeds size limit")
}

#[test]
fn load_rejects_non_utf8_files() -> TestResult {
    let dir = TempDir::new().map_err(|err| err.to_string())?;
    let path = dir.path().join("dynaforms.toml");
    fs::write(&path, [0xff_u8, 0xfe, 0x00]).map_err(|err| err.to_string())?;
    assert_invalid(DynaformsConfig::load(Some(path.as_path())), "utf-8")
}

#[test]
fn load_reports_toml_syntax_errors() -> TestResult {
    let dir = TempDir::new().map_err(|err| err.to_string())?;
    let path = dir.path().join("dynaforms.toml");
    fs::write(&path, "[locale\n").map_err(|err| err.to_string())?;
    assert_invalid(DynaformsConfig::load(Some(path.as_path())), "config parse error")
}
