// crates/coriolis-dynaforms/src/template_schema.rs
// ============================================================================
// Module: Template Schema
// Description: JSON schema builder for dynamic form templates.
// Purpose: Provide a machine-readable description of the template format.
// Dependencies: crate::{markup, parser, schema}, serde_json
// ============================================================================

//! ## Overview
//! This module defines the JSON Schema (draft 2020-12) for form templates.
//! Authoring tools and editors use it for completion and pre-validation; the
//! parser remains the authority on semantic rules such as name uniqueness.

use serde_json::Value;
use serde_json::json;

use crate::markup::ContentFormat;
use crate::markup::TextFormat;
use crate::parser::DEFAULT_MAX_FIELDS;
use crate::schema::NodeKind;
use crate::schema::SIMPLE_IDENTIFIER_PATTERN;
use crate::schema::default_required;

/// Returns the JSON schema for dynamic form templates.
#[must_use]
pub fn template_schema() -> Value {
    json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "$id": "coriolis://dynaforms/schemas/template.schema.json",
        "title": "Coriolis Dynamic Form Template",
        "description": "Ordered set of typed form fields and content blocks.",
        "type": "object",
        "required": ["fields"],
        "properties": {
            "fields": {
                "type": "object",
                "maxProperties": DEFAULT_MAX_FIELDS,
                "additionalProperties": node_schema()
            }
        },
        "$defs": {
            "localizable_text": localizable_text_schema(),
            "text_format": text_format_schema()
        }
    })
}

/// Schema for one template node, discriminated by `kind`.
fn node_schema() -> Value {
    let mut variants = vec![template_node_schema()];
    for kind in [
        NodeKind::Char,
        NodeKind::Text,
        NodeKind::Url,
        NodeKind::Email,
        NodeKind::Phone,
        NodeKind::Checkbox,
    ] {
        variants.push(field_schema(kind, json!({}), &[]));
    }
    variants.push(counter_schema());
    for kind in [NodeKind::Select, NodeKind::Multiselect, NodeKind::Radio, NodeKind::Multicheckbox]
    {
        variants.push(choice_schema(kind));
    }
    variants.push(file_schema());
    json!({
        "type": "object",
        "required": ["kind"],
        "properties": {
            "kind": {
                "enum": NodeKind::ALL.iter().map(|kind| kind.as_str()).collect::<Vec<_>>()
            }
        },
        "oneOf": variants
    })
}

/// Schema for a plain or per-locale text value.
fn localizable_text_schema() -> Value {
    json!({
        "oneOf": [
            { "type": "string" },
            {
                "type": "object",
                "additionalProperties": { "type": "string" }
            }
        ]
    })
}

/// Schema for label and help text formats.
fn text_format_schema() -> Value {
    json!({
        "enum": [
            TextFormat::Text.as_str(),
            TextFormat::Html.as_str(),
            TextFormat::Markdown.as_str()
        ]
    })
}

/// Schema for `template` content blocks.
fn template_node_schema() -> Value {
    json!({
        "type": "object",
        "required": ["kind", "content"],
        "properties": {
            "kind": { "const": NodeKind::Template.as_str() },
            "content": { "$ref": "#/$defs/localizable_text" },
            "content_type": {
                "enum": [ContentFormat::Markdown.as_str(), ContentFormat::Html.as_str()],
                "default": ContentFormat::default().as_str()
            }
        }
    })
}

/// Schema for a form field kind with extra `properties` and `required` keys.
fn field_schema(kind: NodeKind, extra: Value, extra_required: &[&str]) -> Value {
    let mut properties = json!({
        "kind": { "const": kind.as_str() },
        "label": { "$ref": "#/$defs/localizable_text" },
        "label_type": {
            "$ref": "#/$defs/text_format",
            "default": TextFormat::default().as_str()
        },
        "help_text": { "$ref": "#/$defs/localizable_text" },
        "help_text_type": {
            "$ref": "#/$defs/text_format",
            "default": TextFormat::default().as_str()
        },
        "required": { "type": "boolean", "default": default_required() }
    });
    if let (Some(target), Value::Object(extra)) = (properties.as_object_mut(), extra) {
        target.extend(extra);
    }
    let mut required = vec!["kind", "label"];
    required.extend_from_slice(extra_required);
    json!({
        "type": "object",
        "required": required,
        "properties": properties
    })
}

/// Schema for `counter` fields.
fn counter_schema() -> Value {
    field_schema(
        NodeKind::Counter,
        json!({
            "initial": { "type": "integer", "default": 0 },
            "min_value": { "type": ["integer", "null"] },
            "max_value": { "type": ["integer", "null"] }
        }),
        &[],
    )
}

/// Schema for a choice field kind.
fn choice_schema(kind: NodeKind) -> Value {
    field_schema(
        kind,
        json!({
            "choices": {
                "type": "object",
                "minProperties": 1,
                "additionalProperties": { "$ref": "#/$defs/localizable_text" }
            }
        }),
        &["choices"],
    )
}

/// Schema for `file` upload fields.
fn file_schema() -> Value {
    let mut schema = field_schema(
        NodeKind::File,
        json!({
            "upload_prefix": { "type": "string", "pattern": SIMPLE_IDENTIFIER_PATTERN },
            "encrypt": { "type": "boolean", "default": false },
            "pubkeys": {
                "type": "array",
                "items": { "type": "string", "pattern": SIMPLE_IDENTIFIER_PATTERN },
                "default": []
            }
        }),
        &["upload_prefix"],
    );
    if let Some(object) = schema.as_object_mut() {
        object.insert(
            "if".to_string(),
            json!({ "properties": { "encrypt": { "const": true } }, "required": ["encrypt"] }),
        );
        object.insert(
            "then".to_string(),
            json!({ "required": ["pubkeys"], "properties": { "pubkeys": { "minItems": 1 } } }),
        );
    }
    schema
}
