// crates/coriolis-dynaforms/src/config.rs
// ============================================================================
// Module: Dynaforms Configuration
// Description: Configuration loading and validation for the form engine.
// Purpose: Provide strict TOML config parsing with hard limits.
// Dependencies: crate::{locale, markup, parser}, serde, thiserror, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with a strict size limit and
//! unknown-key rejection. An explicitly named file (argument or
//! `DYNAFORMS_CONFIG`) must exist; when neither is given and the default
//! `dynaforms.toml` is absent, built-in defaults are used.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::i18n::Locale;
use crate::locale::LocaleContext;
use crate::markup::MarkdownRenderer;
use crate::parser::DEFAULT_MAX_FIELDS;
use crate::parser::DEFAULT_MAX_TEMPLATE_BYTES;
use crate::parser::TemplateLimits;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
pub const DEFAULT_CONFIG_NAME: &str = "dynaforms.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "DYNAFORMS_CONFIG";
/// Maximum configuration file size in bytes.
pub const MAX_CONFIG_FILE_SIZE: usize = 64 * 1024;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Upper bound for `limits.max_template_bytes`.
pub const MAX_TEMPLATE_BYTES_LIMIT: usize = 16 * 1024 * 1024;
/// Upper bound for `limits.max_fields`.
pub const MAX_FIELDS_LIMIT: usize = 4096;
/// Maximum length of a locale code.
const MAX_LOCALE_CODE_LENGTH: usize = 16;
/// Default table class matching the Bootstrap table styles.
const DEFAULT_TABLE_CLASS: &str = "table table-bordered table-striped table-hover";

// ============================================================================
// SECTION: Config Types
// ============================================================================

/// Engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DynaformsConfig {
    /// Locale settings.
    #[serde(default)]
    pub locale: LocaleConfig,
    /// Markdown rendering settings.
    #[serde(default)]
    pub markup: MarkupConfig,
    /// Template parsing limits.
    #[serde(default)]
    pub limits: LimitsConfig,
}

/// Locale settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LocaleConfig {
    /// Locale used when a caller does not request one.
    #[serde(default = "default_locale")]
    pub default: String,
    /// Locales template translations are resolved against.
    #[serde(default = "default_supported_locales")]
    pub supported: Vec<String>,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            default: default_locale(),
            supported: default_supported_locales(),
        }
    }
}

/// Markdown rendering settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MarkupConfig {
    /// CSS class attached to rendered tables; `None` leaves tables bare.
    #[serde(default = "default_table_class")]
    pub table_class: Option<String>,
}

impl Default for MarkupConfig {
    fn default() -> Self {
        Self {
            table_class: default_table_class(),
        }
    }
}

/// Template parsing limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LimitsConfig {
    /// Maximum template size in bytes.
    #[serde(default = "default_max_template_bytes")]
    pub max_template_bytes: usize,
    /// Maximum number of field entries per template.
    #[serde(default = "default_max_fields")]
    pub max_fields: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_template_bytes: DEFAULT_MAX_TEMPLATE_BYTES,
            max_fields: DEFAULT_MAX_FIELDS,
        }
    }
}

// ============================================================================
// SECTION: Loading
// ============================================================================

impl DynaformsConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (resolved, explicit) = resolve_path(path)?;
        if !explicit && !resolved.exists() {
            return Ok(Self::default());
        }
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml_str(content)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.locale.validate()?;
        self.markup.validate()?;
        self.limits.validate()
    }

    /// Builds the locale context for `requested`, or the configured default.
    #[must_use]
    pub fn locale_context(&self, requested: Option<&str>) -> LocaleContext {
        let current = requested
            .filter(|code| !code.trim().is_empty())
            .unwrap_or(self.locale.default.as_str());
        LocaleContext::new(current, &self.locale.supported)
    }

    /// Returns the template parsing limits.
    #[must_use]
    pub const fn template_limits(&self) -> TemplateLimits {
        TemplateLimits {
            max_template_bytes: self.limits.max_template_bytes,
            max_fields: self.limits.max_fields,
        }
    }

    /// Builds the Markdown renderer for the configured table class.
    #[must_use]
    pub fn markdown_renderer(&self) -> MarkdownRenderer {
        self.markup.table_class.as_ref().map_or_else(MarkdownRenderer::new, |class| {
            MarkdownRenderer::with_table_class(class.as_str())
        })
    }
}

// ============================================================================
// SECTION: Validation
// ============================================================================

impl LocaleConfig {
    /// Validates locale codes.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.supported.is_empty() {
            return Err(ConfigError::Invalid("locale.supported must not be empty".to_string()));
        }
        for (index, code) in self.supported.iter().enumerate() {
            if !is_locale_code(code) {
                return Err(ConfigError::Invalid(format!(
                    "locale.supported contains invalid code `{code}`"
                )));
            }
            let normalized = code.to_ascii_lowercase().replace('_', "-");
            let duplicate = self.supported[.. index]
                .iter()
                .any(|other| other.to_ascii_lowercase().replace('_', "-") == normalized);
            if duplicate {
                return Err(ConfigError::Invalid(format!(
                    "locale.supported contains duplicate code `{code}`"
                )));
            }
        }
        if !is_locale_code(&self.default) {
            return Err(ConfigError::Invalid(format!(
                "locale.default `{}` is not a valid locale code",
                self.default
            )));
        }
        let context = LocaleContext::new(&self.default, &self.supported);
        if context.supported_variant().is_none() {
            return Err(ConfigError::Invalid(format!(
                "locale.default `{}` does not match any supported locale",
                self.default
            )));
        }
        Ok(())
    }
}

impl MarkupConfig {
    /// Validates the table class.
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(class) = &self.table_class {
            if class.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "markup.table_class must be non-empty when set".to_string(),
                ));
            }
            if class.contains(['"', '<', '>']) {
                return Err(ConfigError::Invalid(
                    "markup.table_class must not contain quotes or angle brackets".to_string(),
                ));
            }
        }
        Ok(())
    }
}

impl LimitsConfig {
    /// Validates limit ranges.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_template_bytes == 0 {
            return Err(ConfigError::Invalid(
                "limits.max_template_bytes must be greater than zero".to_string(),
            ));
        }
        if self.max_template_bytes > MAX_TEMPLATE_BYTES_LIMIT {
            return Err(ConfigError::Invalid(format!(
                "limits.max_template_bytes must be at most {MAX_TEMPLATE_BYTES_LIMIT}"
            )));
        }
        if self.max_fields == 0 {
            return Err(ConfigError::Invalid(
                "limits.max_fields must be greater than zero".to_string(),
            ));
        }
        if self.max_fields > MAX_FIELDS_LIMIT {
            return Err(ConfigError::Invalid(format!(
                "limits.max_fields must be at most {MAX_FIELDS_LIMIT}"
            )));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path; the flag is true when the path was named.
fn resolve_path(path: Option<&Path>) -> Result<(PathBuf, bool), ConfigError> {
    if let Some(path) = path {
        return Ok((path.to_path_buf(), true));
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok((PathBuf::from(env_path), true));
    }
    Ok((PathBuf::from(DEFAULT_CONFIG_NAME), false))
}

/// Returns true for `lang` or `lang-region` style codes.
fn is_locale_code(code: &str) -> bool {
    if code.is_empty() || code.len() > MAX_LOCALE_CODE_LENGTH {
        return false;
    }
    let mut parts = code.split(['-', '_']);
    let language_ok = parts.next().is_some_and(|lang| {
        (2 ..= 3).contains(&lang.len()) && lang.bytes().all(|byte| byte.is_ascii_alphabetic())
    });
    language_ok
        && parts.all(|part| !part.is_empty() && part.bytes().all(|byte| byte.is_ascii_alphanumeric()))
}

/// Returns the serde default for `locale.default`.
fn default_locale() -> String {
    Locale::En.as_str().to_string()
}

/// Returns the serde default for `locale.supported`.
fn default_supported_locales() -> Vec<String> {
    vec![Locale::Pl.as_str().to_string(), Locale::En.as_str().to_string()]
}

/// Returns the serde default for `markup.table_class`.
#[allow(clippy::unnecessary_wraps, reason = "Serde default functions return the field type.")]
fn default_table_class() -> Option<String> {
    Some(DEFAULT_TABLE_CLASS.to_string())
}

/// Returns the serde default for `limits.max_template_bytes`.
const fn default_max_template_bytes() -> usize {
    DEFAULT_MAX_TEMPLATE_BYTES
}

/// Returns the serde default for `limits.max_fields`.
const fn default_max_fields() -> usize {
    DEFAULT_MAX_FIELDS
}
