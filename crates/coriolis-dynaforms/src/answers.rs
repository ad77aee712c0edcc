// crates/coriolis-dynaforms/src/answers.rs
// ============================================================================
// Module: Answer Formatting
// Description: Submitted answer values to localized display strings.
// Purpose: Render answers for emails, exports and detail views.
// Dependencies: crate::{i18n, locale, runtime}, indexmap, serde, serde_json, thiserror, tracing
// ============================================================================

//! ## Overview
//! Answers are stored as JSON values keyed by prefixed field name. Formatting
//! maps them to `label -> display string`, looking up choice labels, turning
//! booleans into localized Yes/No and describing complex answers such as file
//! uploads. Answers without a matching field are kept under a localized
//! "Unknown field" label instead of being dropped.
//!
//! ## Invariants
//! - Known fields come first in field order, then leftovers in answer order.
//! - Inputs are never mutated.
//! - Empty display values are rendered as [`MISSING_ANSWER`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use indexmap::IndexMap;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use crate::locale::LocaleContext;
use crate::runtime::RuntimeField;
use crate::t;

// ============================================================================
// SECTION: Complex Answers
// ============================================================================

/// Display value for an absent or empty answer.
pub const MISSING_ANSWER: &str = "-";

/// Default `kind` of a complex answer object.
const DEFAULT_COMPLEX_KIND: &str = "file_upload";

/// Stored descriptor of an uploaded file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileUploadAnswer {
    /// Storage path or name of the uploaded file.
    pub filename: String,
    /// Whether the stored file is encrypted.
    #[serde(default)]
    pub encrypted: bool,
}

impl FileUploadAnswer {
    /// Returns the last path component of `filename`.
    #[must_use]
    pub fn base_name(&self) -> &str {
        self.filename.rsplit(['/', '\\']).next().unwrap_or(&self.filename)
    }

    /// Returns true when the file may be offered for download.
    #[must_use]
    pub const fn download_allowed(&self) -> bool {
        !self.encrypted
    }
}

/// Non-scalar answer stored as a JSON object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ComplexAnswer {
    /// File upload descriptor.
    FileUpload(FileUploadAnswer),
}

/// Answer object did not match any complex answer shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized complex answer: {0}")]
pub struct UnknownAnswerShapeError(String);

impl ComplexAnswer {
    /// Parses an answer object; a missing `kind` defaults to `file_upload`.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownAnswerShapeError`] when the value is not a known shape.
    pub fn parse(value: &Value) -> Result<Self, UnknownAnswerShapeError> {
        let Some(object) = value.as_object() else {
            return Err(UnknownAnswerShapeError("answer is not an object".to_string()));
        };
        let mut object = object.clone();
        object
            .entry("kind")
            .or_insert_with(|| Value::String(DEFAULT_COMPLEX_KIND.to_string()));
        serde_json::from_value(Value::Object(object))
            .map_err(|err| UnknownAnswerShapeError(err.to_string()))
    }

    /// Returns the localized display string.
    #[must_use]
    pub fn display(&self, locale: &LocaleContext) -> String {
        match self {
            Self::FileUpload(upload) => {
                let name = upload.base_name();
                if upload.encrypted {
                    t!(locale.catalog_locale(), "answer.file_upload.encrypted", filename = name)
                } else {
                    name.to_string()
                }
            }
        }
    }
}

// ============================================================================
// SECTION: Values
// ============================================================================

/// Formats one answer value, using `field` for choice label lookup.
#[must_use]
pub fn get_pretty_answer_value(
    answer: &Value,
    field: Option<&RuntimeField>,
    locale: &LocaleContext,
) -> String {
    let choices = field.filter(|field| field.is_choice_field());
    let text = match answer {
        Value::Null => String::new(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Object(_) => complex_display(item, field, locale),
                _ => scalar_display(item, choices),
            })
            .filter(|segment| !segment.trim().is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        Value::Bool(true) => t!(locale.catalog_locale(), "answer.yes"),
        Value::Bool(false) => t!(locale.catalog_locale(), "answer.no"),
        Value::Object(_) => complex_display(answer, field, locale),
        Value::Number(_) | Value::String(_) => scalar_display(answer, choices),
    };
    let trimmed = text.trim();
    if trimmed.is_empty() { MISSING_ANSWER.to_string() } else { trimmed.to_string() }
}

/// Formats a complex answer object, logging and blanking unknown shapes.
fn complex_display(answer: &Value, field: Option<&RuntimeField>, locale: &LocaleContext) -> String {
    match ComplexAnswer::parse(answer) {
        Ok(complex) => complex.display(locale),
        Err(err) => {
            warn!(
                field = field.map_or("", |field| field.name.as_str()),
                error = %err,
                "unrecognized answer shape"
            );
            String::new()
        }
    }
}

/// Formats a scalar, mapping string choice keys to their labels.
fn scalar_display(value: &Value, choices: Option<&RuntimeField>) -> String {
    match value {
        Value::String(key) => choices
            .and_then(|field| field.choice_label(key))
            .map_or_else(|| key.clone(), str::to_string),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

// ============================================================================
// SECTION: Answer Sets
// ============================================================================

/// Formats an answer set as `label -> display string`.
///
/// Every field in `fields` appears once, keyed by its label. Answers without
/// a field follow under the localized unknown-field label.
#[must_use]
pub fn get_pretty_answers(
    answers: &IndexMap<String, Value>,
    fields: &IndexMap<String, RuntimeField>,
    locale: &LocaleContext,
) -> IndexMap<String, String> {
    let mut pretty = IndexMap::with_capacity(answers.len().max(fields.len()));
    for (name, field) in fields {
        let value = answers
            .get(name)
            .map_or_else(|| MISSING_ANSWER.to_string(), |answer| {
                get_pretty_answer_value(answer, Some(field), locale)
            });
        pretty.insert(field.label.clone(), value);
    }
    for (key, answer) in answers.iter().filter(|(key, _)| !fields.contains_key(*key)) {
        let label = t!(locale.catalog_locale(), "answer.unknown_field", key = key);
        pretty.insert(label, get_pretty_answer_value(answer, None, locale));
    }
    pretty
}
