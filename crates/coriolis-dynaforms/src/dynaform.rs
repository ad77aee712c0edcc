// crates/coriolis-dynaforms/src/dynaform.rs
// ============================================================================
// Module: Dynaform
// Description: Validated form template with prefixed runtime bindings.
// Purpose: Entry point for building, rendering and keying dynamic forms.
// Dependencies: crate::{keys, parser, runtime, schema}, indexmap, serde_json, thiserror, tracing
// ============================================================================

//! ## Overview
//! A [`Dynaform`] is an immutable, validated template. Naming a form gives it
//! a prefix (`df__{name}__`) that is prepended to every rendered field so
//! several forms can share one submission without colliding.
//!
//! ## Invariants
//! - Rendered field names are unique within a form.
//! - Field, layout and answer orders follow template declaration order.
//! - [`Dynaform::strip_prefix`] and [`Dynaform::add_prefix`] are inverses for
//!   keys produced by [`Dynaform::get_fields`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use indexmap::IndexMap;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::keys::KeyResolver;
use crate::keys::UploadKeyReport;
use crate::keys::UploadRecipients;
use crate::keys::resolve_pubkeys;
use crate::parser::SchemaParseError;
use crate::parser::SchemaValidationError;
use crate::parser::TemplateError;
use crate::parser::TemplateLimits;
use crate::parser::parse_template;
use crate::runtime::LayoutObject;
use crate::runtime::RenderContext;
use crate::runtime::RuntimeField;
use crate::runtime::bind_node;
use crate::runtime::layout_node;
use crate::schema::FileField;
use crate::schema::SchemaNode;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Failure to build or submit a dynamic form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DynaformError {
    /// Template shape or kinds are invalid.
    #[error(transparent)]
    Parse(SchemaParseError),
    /// Template is well-formed but semantically invalid.
    #[error(transparent)]
    Validation(SchemaValidationError),
    /// Required encrypted uploads have no resolvable recipient.
    #[error("encrypted uploads have no recipients: {}", .fields.join(", "))]
    MissingRecipients {
        /// Prefixed names of the blocking fields.
        fields: Vec<String>,
    },
}

impl From<TemplateError> for DynaformError {
    fn from(value: TemplateError) -> Self {
        match value {
            TemplateError::Parse(err) => Self::Parse(err),
            TemplateError::Validation(err) => Self::Validation(err),
        }
    }
}

// ============================================================================
// SECTION: Prefix
// ============================================================================

/// Returns the field prefix for a form name (`""` when unnamed or empty).
#[must_use]
pub fn dynaform_prefix(name: Option<&str>) -> String {
    match name {
        Some(name) if !name.is_empty() => format!("df__{name}__"),
        _ => String::new(),
    }
}

// ============================================================================
// SECTION: Dynaform
// ============================================================================

/// Validated dynamic form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dynaform {
    /// Template nodes keyed by unprefixed name, in declaration order.
    fields: IndexMap<String, SchemaNode>,
    /// Prefix applied to rendered field names.
    prefix: String,
}

impl Dynaform {
    /// Builds a form from template JSON with default limits.
    ///
    /// # Errors
    ///
    /// Returns [`DynaformError::Parse`] or [`DynaformError::Validation`].
    pub fn build(name: Option<&str>, template: &str) -> Result<Self, DynaformError> {
        Self::build_with_limits(name, template, &TemplateLimits::default())
    }

    /// Builds a form from template JSON with explicit limits.
    ///
    /// # Errors
    ///
    /// Returns [`DynaformError::Parse`] or [`DynaformError::Validation`].
    pub fn build_with_limits(
        name: Option<&str>,
        template: &str,
        limits: &TemplateLimits,
    ) -> Result<Self, DynaformError> {
        let fields = parse_template(template, limits)?;
        let prefix = dynaform_prefix(name);
        debug!(prefix = %prefix, nodes = fields.len(), "dynaform built");
        Ok(Self {
            fields,
            prefix,
        })
    }

    /// Returns the rendered field prefix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns the template nodes keyed by unprefixed name.
    #[must_use]
    pub const fn fields(&self) -> &IndexMap<String, SchemaNode> {
        &self.fields
    }

    /// Returns the prefixed names of every form field, in order.
    #[must_use]
    pub fn form_element_names(&self) -> Vec<String> {
        self.fields
            .iter()
            .filter(|(_, node)| node.is_form_field())
            .map(|(name, _)| self.prefixed(name))
            .collect()
    }

    /// Binds every form field to a runtime descriptor keyed by prefixed name.
    #[must_use]
    pub fn get_fields(&self, ctx: &RenderContext<'_>) -> IndexMap<String, RuntimeField> {
        self.fields
            .iter()
            .filter_map(|(name, node)| {
                let prefixed = self.prefixed(name);
                bind_node(&prefixed, node, ctx).map(|field| (prefixed, field))
            })
            .collect()
    }

    /// Builds one layout directive per template node, in order.
    #[must_use]
    pub fn get_layout_objects(&self, ctx: &RenderContext<'_>) -> Vec<LayoutObject> {
        self.fields.iter().map(|(name, node)| layout_node(&self.prefixed(name), node, ctx)).collect()
    }

    /// Returns the upload attributes of every file field by prefixed name.
    #[must_use]
    pub fn upload_fields(&self) -> Vec<(String, &FileField)> {
        self.fields
            .iter()
            .filter_map(|(name, node)| match node {
                SchemaNode::File(file) => Some((self.prefixed(name), file)),
                _ => None,
            })
            .collect()
    }

    /// Resolves the recipients of every encrypted upload field.
    #[must_use]
    pub fn resolve_upload_recipients(&self, resolver: &dyn KeyResolver) -> UploadKeyReport {
        let fields = self
            .upload_fields()
            .into_iter()
            .filter(|(_, file)| file.encrypt)
            .map(|(field, file)| UploadRecipients {
                field,
                required: file.attributes.required,
                resolution: resolve_pubkeys(resolver, &file.pubkeys),
            })
            .collect();
        UploadKeyReport {
            fields,
        }
    }

    /// Removes the prefix from submitted answer keys for persistence.
    ///
    /// Keys without the prefix are kept unchanged.
    #[must_use]
    pub fn strip_prefix(&self, answers: &IndexMap<String, Value>) -> IndexMap<String, Value> {
        answers
            .iter()
            .map(|(key, value)| {
                let stripped = key.strip_prefix(self.prefix.as_str()).unwrap_or(key);
                (stripped.to_string(), value.clone())
            })
            .collect()
    }

    /// Prepends the prefix to stored answer keys.
    #[must_use]
    pub fn add_prefix(&self, answers: &IndexMap<String, Value>) -> IndexMap<String, Value> {
        answers.iter().map(|(key, value)| (self.prefixed(key), value.clone())).collect()
    }

    /// Returns `name` with the form prefix.
    fn prefixed(&self, name: &str) -> String {
        format!("{}{name}", self.prefix)
    }
}

/// Builds a form and binds its runtime fields in one step.
///
/// # Errors
///
/// Returns [`DynaformError`] when the template is invalid.
pub fn dynaform_to_fields(
    name: Option<&str>,
    template: &str,
    ctx: &RenderContext<'_>,
) -> Result<IndexMap<String, RuntimeField>, DynaformError> {
    Ok(Dynaform::build(name, template)?.get_fields(ctx))
}
