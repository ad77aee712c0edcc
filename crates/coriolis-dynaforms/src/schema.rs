// crates/coriolis-dynaforms/src/schema.rs
// ============================================================================
// Module: Dynaform Schema Model
// Description: Closed set of template node kinds and their attributes.
// Purpose: Typed representation of one element of a dynamic form template.
// Dependencies: crate::{locale, markup}, indexmap, serde
// ============================================================================

//! ## Overview
//! Each entry of a template's `fields` object is one [`SchemaNode`]. The
//! `kind` discriminant selects the variant; every variant except
//! [`SchemaNode::Template`] renders as a form field and shares the
//! [`FieldAttributes`] block.
//!
//! ## Invariants
//! - Choice fields declare at least one choice.
//! - Upload prefixes and public key names are simple identifiers.
//! - Encrypted uploads name at least one public key.
//! - Counter bounds are ordered and contain the initial value.

// ============================================================================
// SECTION: Imports
// ============================================================================

use indexmap::IndexMap;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::locale::LocalizableText;
use crate::markup::ContentFormat;
use crate::markup::TextFormat;
use crate::parser::ViolationRule;

// ============================================================================
// SECTION: Identifiers
// ============================================================================

/// Pattern accepted for upload prefixes and public key names.
pub const SIMPLE_IDENTIFIER_PATTERN: &str = "^[A-Za-z0-9_-]+$";

/// Returns true when `value` matches [`SIMPLE_IDENTIFIER_PATTERN`].
#[must_use]
pub fn is_simple_identifier(value: &str) -> bool {
    !value.is_empty()
        && value.bytes().all(|byte| byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'-')
}

// ============================================================================
// SECTION: Node Kinds
// ============================================================================

/// Discriminant of a template node (`kind` in the template JSON).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// Static content block.
    Template,
    /// Single-line text input.
    Char,
    /// Multi-line text input.
    Text,
    /// URL input.
    Url,
    /// Email address input.
    Email,
    /// Phone number input.
    Phone,
    /// Single boolean checkbox.
    Checkbox,
    /// Integer counter.
    Counter,
    /// Single choice drop-down.
    Select,
    /// Multiple choice list box.
    Multiselect,
    /// Single choice radio buttons.
    Radio,
    /// Multiple choice checkboxes.
    Multicheckbox,
    /// File upload.
    File,
}

impl NodeKind {
    /// All kinds in wire-documentation order.
    pub const ALL: [Self; 13] = [
        Self::Char,
        Self::Text,
        Self::Url,
        Self::Email,
        Self::Phone,
        Self::Checkbox,
        Self::Counter,
        Self::Select,
        Self::Multiselect,
        Self::Radio,
        Self::Multicheckbox,
        Self::File,
        Self::Template,
    ];

    /// Returns the wire name of the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Template => "template",
            Self::Char => "char",
            Self::Text => "text",
            Self::Url => "url",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Checkbox => "checkbox",
            Self::Counter => "counter",
            Self::Select => "select",
            Self::Multiselect => "multiselect",
            Self::Radio => "radio",
            Self::Multicheckbox => "multicheckbox",
            Self::File => "file",
        }
    }

    /// Parses a wire name.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == value)
    }

    /// Returns true for kinds that render as an input field.
    #[must_use]
    pub const fn is_form_field(self) -> bool {
        !matches!(self, Self::Template)
    }

    /// Returns true for kinds that carry `choices`.
    #[must_use]
    pub const fn is_choice(self) -> bool {
        matches!(self, Self::Select | Self::Multiselect | Self::Radio | Self::Multicheckbox)
    }
}

// ============================================================================
// SECTION: Node Types
// ============================================================================

/// Returns the serde default for `required`.
pub(crate) const fn default_required() -> bool {
    true
}

/// Attributes shared by every form field kind.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FieldAttributes {
    /// Field label.
    pub label: LocalizableText,
    /// Format of `label`.
    #[serde(default)]
    pub label_type: TextFormat,
    /// Optional help text shown under the input.
    #[serde(default)]
    pub help_text: Option<LocalizableText>,
    /// Format of `help_text`.
    #[serde(default)]
    pub help_text_type: TextFormat,
    /// Whether an answer is required.
    #[serde(default = "default_required")]
    pub required: bool,
}

/// Static content block (`template`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TemplateNode {
    /// Block content.
    pub content: LocalizableText,
    /// Format of `content`.
    #[serde(default)]
    pub content_type: ContentFormat,
}

/// Integer counter field (`counter`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CounterField {
    /// Shared field attributes.
    #[serde(flatten)]
    pub attributes: FieldAttributes,
    /// Initial value.
    #[serde(default)]
    pub initial: i64,
    /// Optional inclusive lower bound.
    #[serde(default)]
    pub min_value: Option<i64>,
    /// Optional inclusive upper bound.
    #[serde(default)]
    pub max_value: Option<i64>,
}

/// Field offering a fixed set of choices.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChoiceField {
    /// Shared field attributes.
    #[serde(flatten)]
    pub attributes: FieldAttributes,
    /// Stable choice key to label, in declaration order.
    pub choices: IndexMap<String, LocalizableText>,
}

/// File upload field (`file`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FileField {
    /// Shared field attributes.
    #[serde(flatten)]
    pub attributes: FieldAttributes,
    /// Storage prefix for uploaded files.
    pub upload_prefix: String,
    /// Whether uploads are encrypted to `pubkeys`.
    #[serde(default)]
    pub encrypt: bool,
    /// Names of public keys uploads are encrypted to.
    #[serde(default)]
    pub pubkeys: Vec<String>,
}

/// One element of a dynamic form template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaNode {
    /// Static content block.
    Template(TemplateNode),
    /// Single-line text input.
    Char(FieldAttributes),
    /// Multi-line text input.
    Text(FieldAttributes),
    /// URL input.
    Url(FieldAttributes),
    /// Email address input.
    Email(FieldAttributes),
    /// Phone number input.
    Phone(FieldAttributes),
    /// Single boolean checkbox.
    Checkbox(FieldAttributes),
    /// Integer counter.
    Counter(CounterField),
    /// Single choice drop-down.
    Select(ChoiceField),
    /// Multiple choice list box.
    Multiselect(ChoiceField),
    /// Single choice radio buttons.
    Radio(ChoiceField),
    /// Multiple choice checkboxes.
    Multicheckbox(ChoiceField),
    /// File upload.
    File(FileField),
}

impl SchemaNode {
    /// Decodes the attributes of a node whose `kind` is already known.
    ///
    /// # Errors
    ///
    /// Returns the serde error when attributes are missing or malformed.
    pub fn decode(kind: NodeKind, value: Value) -> Result<Self, serde_json::Error> {
        Ok(match kind {
            NodeKind::Template => Self::Template(serde_json::from_value(value)?),
            NodeKind::Char => Self::Char(serde_json::from_value(value)?),
            NodeKind::Text => Self::Text(serde_json::from_value(value)?),
            NodeKind::Url => Self::Url(serde_json::from_value(value)?),
            NodeKind::Email => Self::Email(serde_json::from_value(value)?),
            NodeKind::Phone => Self::Phone(serde_json::from_value(value)?),
            NodeKind::Checkbox => Self::Checkbox(serde_json::from_value(value)?),
            NodeKind::Counter => Self::Counter(serde_json::from_value(value)?),
            NodeKind::Select => Self::Select(serde_json::from_value(value)?),
            NodeKind::Multiselect => Self::Multiselect(serde_json::from_value(value)?),
            NodeKind::Radio => Self::Radio(serde_json::from_value(value)?),
            NodeKind::Multicheckbox => Self::Multicheckbox(serde_json::from_value(value)?),
            NodeKind::File => Self::File(serde_json::from_value(value)?),
        })
    }

    /// Returns the node discriminant.
    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        match self {
            Self::Template(_) => NodeKind::Template,
            Self::Char(_) => NodeKind::Char,
            Self::Text(_) => NodeKind::Text,
            Self::Url(_) => NodeKind::Url,
            Self::Email(_) => NodeKind::Email,
            Self::Phone(_) => NodeKind::Phone,
            Self::Checkbox(_) => NodeKind::Checkbox,
            Self::Counter(_) => NodeKind::Counter,
            Self::Select(_) => NodeKind::Select,
            Self::Multiselect(_) => NodeKind::Multiselect,
            Self::Radio(_) => NodeKind::Radio,
            Self::Multicheckbox(_) => NodeKind::Multicheckbox,
            Self::File(_) => NodeKind::File,
        }
    }

    /// Returns true when the node renders as an input field.
    #[must_use]
    pub const fn is_form_field(&self) -> bool {
        self.kind().is_form_field()
    }

    /// Returns the shared field attributes, or `None` for content blocks.
    #[must_use]
    pub const fn attributes(&self) -> Option<&FieldAttributes> {
        match self {
            Self::Template(_) => None,
            Self::Char(attributes)
            | Self::Text(attributes)
            | Self::Url(attributes)
            | Self::Email(attributes)
            | Self::Phone(attributes)
            | Self::Checkbox(attributes) => Some(attributes),
            Self::Counter(counter) => Some(&counter.attributes),
            Self::Select(choice)
            | Self::Multiselect(choice)
            | Self::Radio(choice)
            | Self::Multicheckbox(choice) => Some(&choice.attributes),
            Self::File(file) => Some(&file.attributes),
        }
    }

    /// Runs the node-local validators and returns every violated rule.
    #[must_use]
    pub fn local_violations(&self) -> Vec<ViolationRule> {
        let mut violations = Vec::new();
        match self {
            Self::Select(choice)
            | Self::Multiselect(choice)
            | Self::Radio(choice)
            | Self::Multicheckbox(choice) => {
                if choice.choices.is_empty() {
                    violations.push(ViolationRule::EmptyChoices);
                }
            }
            Self::File(file) => {
                if !is_simple_identifier(&file.upload_prefix) {
                    violations.push(ViolationRule::InvalidIdentifier {
                        attribute: "upload_prefix",
                        value: file.upload_prefix.clone(),
                    });
                }
                for key in file.pubkeys.iter().filter(|key| !is_simple_identifier(key)) {
                    violations.push(ViolationRule::InvalidIdentifier {
                        attribute: "pubkeys",
                        value: key.clone(),
                    });
                }
                if file.encrypt && file.pubkeys.is_empty() {
                    violations.push(ViolationRule::EncryptionWithoutKeys);
                }
            }
            Self::Counter(counter) => {
                if let (Some(min), Some(max)) = (counter.min_value, counter.max_value)
                    && min > max
                {
                    violations.push(ViolationRule::CounterBoundsInverted {
                        min,
                        max,
                    });
                }
                let below = counter.min_value.is_some_and(|min| counter.initial < min);
                let above = counter.max_value.is_some_and(|max| counter.initial > max);
                if below || above {
                    violations.push(ViolationRule::CounterInitialOutOfBounds {
                        initial: counter.initial,
                    });
                }
            }
            Self::Template(_)
            | Self::Char(_)
            | Self::Text(_)
            | Self::Url(_)
            | Self::Email(_)
            | Self::Phone(_)
            | Self::Checkbox(_) => {}
        }
        violations
    }
}
