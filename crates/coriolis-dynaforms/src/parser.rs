// crates/coriolis-dynaforms/src/parser.rs
// ============================================================================
// Module: Dynaform Template Parser
// Description: JSON template decoding and structural validation.
// Purpose: Turn untrusted template text into validated schema nodes.
// Dependencies: crate::schema, indexmap, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Parsing happens in two stages. The document shape and every node's `kind`
//! are checked first and fail fast with [`SchemaParseError`]. Attribute
//! decoding and semantic validators then run over every entry and their
//! findings are aggregated into one [`SchemaValidationError`].
//!
//! Duplicate keys in the `fields` object are preserved while parsing so the
//! uniqueness check can see them; a plain JSON map would silently keep only
//! the last occurrence.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use indexmap::IndexMap;
use serde::Deserialize;
use serde::Deserializer;
use serde::de::MapAccess;
use serde::de::Visitor;
use serde_json::Value;
use thiserror::Error;

use crate::schema::NodeKind;
use crate::schema::SIMPLE_IDENTIFIER_PATTERN;
use crate::schema::SchemaNode;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Default maximum template size in bytes.
pub const DEFAULT_MAX_TEMPLATE_BYTES: usize = 1024 * 1024;
/// Default maximum number of entries in a template's `fields` object.
pub const DEFAULT_MAX_FIELDS: usize = 256;

/// Hard limits applied while parsing a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateLimits {
    /// Maximum template size in bytes.
    pub max_template_bytes: usize,
    /// Maximum number of field entries.
    pub max_fields: usize,
}

impl Default for TemplateLimits {
    fn default() -> Self {
        Self {
            max_template_bytes: DEFAULT_MAX_TEMPLATE_BYTES,
            max_fields: DEFAULT_MAX_FIELDS,
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Template could not be parsed into nodes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaParseError {
    /// Template exceeds the configured size limit.
    #[error("template exceeds size limit ({actual} > {limit} bytes)")]
    TooLarge {
        /// Template size in bytes.
        actual: usize,
        /// Configured limit in bytes.
        limit: usize,
    },
    /// Template declares more entries than allowed.
    #[error("template declares too many fields ({actual} > {limit})")]
    TooManyFields {
        /// Number of declared entries.
        actual: usize,
        /// Configured limit.
        limit: usize,
    },
    /// Template is not JSON of the expected top-level shape.
    #[error("template is not a valid dynaform document: {0}")]
    Json(String),
    /// A field entry is not a JSON object.
    #[error("field `{field}` must be a json object")]
    FieldNotObject {
        /// Offending field name.
        field: String,
    },
    /// A field entry has no string `kind`.
    #[error("field `{field}` has no `kind`")]
    MissingKind {
        /// Offending field name.
        field: String,
    },
    /// A field entry declares an unknown `kind`.
    #[error("field `{field}`: kind `{kind}` not recognized")]
    UnknownKind {
        /// Offending field name.
        field: String,
        /// Declared kind.
        kind: String,
    },
}

/// Rule violated by a template entry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViolationRule {
    /// Attributes are missing or have the wrong type.
    #[error("invalid attributes: {0}")]
    InvalidAttributes(String),
    /// A choice field declares no choices.
    #[error("must have at least one choice")]
    EmptyChoices,
    /// An identifier attribute does not match the simple identifier pattern.
    #[error("{attribute} value `{value}` must match {pattern}", pattern = SIMPLE_IDENTIFIER_PATTERN)]
    InvalidIdentifier {
        /// Attribute name.
        attribute: &'static str,
        /// Rejected value.
        value: String,
    },
    /// Encryption is enabled without any public key.
    #[error("encrypt requires at least one pubkey")]
    EncryptionWithoutKeys,
    /// Counter lower bound exceeds its upper bound.
    #[error("min_value {min} exceeds max_value {max}")]
    CounterBoundsInverted {
        /// Declared lower bound.
        min: i64,
        /// Declared upper bound.
        max: i64,
    },
    /// Counter initial value lies outside its bounds.
    #[error("initial value {initial} is outside the declared bounds")]
    CounterInitialOutOfBounds {
        /// Declared initial value.
        initial: i64,
    },
    /// A rendered field name is declared more than once.
    #[error("duplicated field name ({occurrences} occurrences)")]
    DuplicateName {
        /// Number of entries using the name.
        occurrences: usize,
    },
}

/// One validation finding tagged with the offending field name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("field `{field}`: {rule}")]
pub struct SchemaViolation {
    /// Field name as declared in the template.
    pub field: String,
    /// Violated rule.
    pub rule: ViolationRule,
}

/// Aggregated validation findings for one template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaValidationError {
    /// Findings in template order, duplicate-name findings last.
    violations: Vec<SchemaViolation>,
}

impl SchemaValidationError {
    /// Returns every finding.
    #[must_use]
    pub fn violations(&self) -> &[SchemaViolation] {
        &self.violations
    }

    /// Returns the findings for a single field.
    pub fn for_field<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a ViolationRule> {
        self.violations
            .iter()
            .filter(move |violation| violation.field == field)
            .map(|violation| &violation.rule)
    }
}

impl fmt::Display for SchemaValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("dynamic form is invalid: ")?;
        for (index, violation) in self.violations.iter().enumerate() {
            if index > 0 {
                f.write_str("; ")?;
            }
            violation.fmt(f)?;
        }
        Ok(())
    }
}

impl std::error::Error for SchemaValidationError {}

/// Failure of [`parse_template`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    /// Template shape or kinds are invalid.
    #[error(transparent)]
    Parse(#[from] SchemaParseError),
    /// Template is well-formed but semantically invalid.
    #[error(transparent)]
    Validation(#[from] SchemaValidationError),
}

// ============================================================================
// SECTION: Raw Document
// ============================================================================

/// Top-level template document.
#[derive(Deserialize)]
struct RawTemplate {
    /// Field entries, duplicates preserved.
    fields: FieldEntries,
}

/// Field entries in document order, including duplicate keys.
struct FieldEntries(Vec<(String, Value)>);

impl<'de> Deserialize<'de> for FieldEntries {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(FieldEntriesVisitor)
    }
}

/// Visitor collecting every key/value pair of the `fields` object.
struct FieldEntriesVisitor;

impl<'de> Visitor<'de> for FieldEntriesVisitor {
    type Value = FieldEntries;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("an object mapping field names to field definitions")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some(entry) = map.next_entry::<String, Value>()? {
            entries.push(entry);
        }
        Ok(FieldEntries(entries))
    }
}

// ============================================================================
// SECTION: Parsing
// ============================================================================

/// Parses and validates `template` into ordered schema nodes.
///
/// # Errors
///
/// Returns [`TemplateError::Parse`] for shape, kind or limit failures and
/// [`TemplateError::Validation`] with every semantic finding otherwise.
pub fn parse_template(
    template: &str,
    limits: &TemplateLimits,
) -> Result<IndexMap<String, SchemaNode>, TemplateError> {
    if template.len() > limits.max_template_bytes {
        return Err(SchemaParseError::TooLarge {
            actual: template.len(),
            limit: limits.max_template_bytes,
        }
        .into());
    }
    if !template.trim_start().starts_with('{') {
        return Err(SchemaParseError::Json("expected a json object".to_string()).into());
    }
    let raw: RawTemplate =
        serde_json::from_str(template).map_err(|err| SchemaParseError::Json(err.to_string()))?;
    let FieldEntries(entries) = raw.fields;
    if entries.len() > limits.max_fields {
        return Err(SchemaParseError::TooManyFields {
            actual: entries.len(),
            limit: limits.max_fields,
        }
        .into());
    }

    let mut typed = Vec::with_capacity(entries.len());
    for (name, value) in entries {
        let kind = entry_kind(&name, &value)?;
        typed.push((name, kind, value));
    }

    let mut violations = Vec::new();
    let names: Vec<(String, NodeKind)> =
        typed.iter().map(|(name, kind, _)| (name.clone(), *kind)).collect();
    let mut nodes = IndexMap::with_capacity(typed.len());
    for (name, kind, value) in typed {
        match SchemaNode::decode(kind, value) {
            Ok(node) => {
                violations.extend(node.local_violations().into_iter().map(|rule| SchemaViolation {
                    field: name.clone(),
                    rule,
                }));
                nodes.insert(name, node);
            }
            Err(err) => violations.push(SchemaViolation {
                field: name,
                rule: ViolationRule::InvalidAttributes(err.to_string()),
            }),
        }
    }
    violations.extend(duplicate_name_violations(&names));

    if violations.is_empty() {
        Ok(nodes)
    } else {
        Err(SchemaValidationError {
            violations,
        }
        .into())
    }
}

/// Reads and checks the `kind` discriminant of one entry.
fn entry_kind(name: &str, value: &Value) -> Result<NodeKind, SchemaParseError> {
    let Some(object) = value.as_object() else {
        return Err(SchemaParseError::FieldNotObject {
            field: name.to_string(),
        });
    };
    let Some(kind) = object.get("kind").and_then(Value::as_str) else {
        return Err(SchemaParseError::MissingKind {
            field: name.to_string(),
        });
    };
    NodeKind::parse(kind).ok_or_else(|| SchemaParseError::UnknownKind {
        field: name.to_string(),
        kind: kind.to_string(),
    })
}

/// Reports names repeated across entries when any occurrence is a form field.
fn duplicate_name_violations(names: &[(String, NodeKind)]) -> Vec<SchemaViolation> {
    let mut counts: IndexMap<&str, (usize, bool)> = IndexMap::new();
    for (name, kind) in names {
        let entry = counts.entry(name.as_str()).or_insert((0, false));
        entry.0 += 1;
        entry.1 |= kind.is_form_field();
    }
    counts
        .into_iter()
        .filter(|(_, (occurrences, rendered))| *occurrences > 1 && *rendered)
        .map(|(name, (occurrences, _))| SchemaViolation {
            field: name.to_string(),
            rule: ViolationRule::DuplicateName {
                occurrences,
            },
        })
        .collect()
}
