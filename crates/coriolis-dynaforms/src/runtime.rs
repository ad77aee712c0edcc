// crates/coriolis-dynaforms/src/runtime.rs
// ============================================================================
// Module: Runtime Field Binding
// Description: Schema node to runtime field descriptor translation.
// Purpose: Supply presentation layers with field classes, widgets and args.
// Dependencies: crate::{locale, markup, schema}, serde
// ============================================================================

//! ## Overview
//! A [`RuntimeField`] is what a presentation layer needs to construct an
//! input: the field class, the widget, and resolved constructor arguments.
//! Binding resolves localizable text through a [`RenderContext`] and applies
//! the declared text formats. Upload-specific attributes never reach the
//! runtime field; see [`crate::Dynaform::upload_fields`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;

use crate::locale::LocaleContext;
use crate::locale::LocalizableText;
use crate::markup::MarkupRenderer;
use crate::markup::RenderedText;
use crate::markup::TextFormat;
use crate::markup::transform_text;
use crate::schema::ChoiceField;
use crate::schema::FieldAttributes;
use crate::schema::NodeKind;
use crate::schema::SchemaNode;

// ============================================================================
// SECTION: Render Context
// ============================================================================

/// Locale and markup collaborators used while binding.
#[derive(Clone, Copy)]
pub struct RenderContext<'a> {
    /// Active locale.
    locale: &'a LocaleContext,
    /// Markdown renderer.
    markup: &'a dyn MarkupRenderer,
}

impl<'a> RenderContext<'a> {
    /// Creates a render context.
    #[must_use]
    pub fn new(locale: &'a LocaleContext, markup: &'a dyn MarkupRenderer) -> Self {
        Self {
            locale,
            markup,
        }
    }

    /// Returns the locale context.
    #[must_use]
    pub const fn locale(&self) -> &'a LocaleContext {
        self.locale
    }

    /// Resolves `text` for the active locale and applies `format`.
    #[must_use]
    pub fn render(&self, text: &LocalizableText, format: TextFormat) -> RenderedText {
        let resolved = self.locale.resolve(text);
        if resolved.is_empty() {
            return RenderedText {
                text: resolved,
                is_html: false,
            };
        }
        transform_text(&resolved, format, self.markup)
    }
}

// ============================================================================
// SECTION: Field Descriptors
// ============================================================================

/// Presentation field class constructed for a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldClass {
    /// Free text.
    Char,
    /// URL.
    Url,
    /// Email address.
    Email,
    /// Phone number.
    Phone,
    /// Boolean.
    Boolean,
    /// Integer.
    Integer,
    /// Single choice.
    Choice,
    /// Multiple choice.
    MultipleChoice,
    /// File upload.
    File,
}

impl FieldClass {
    /// Returns true for classes answered with choice keys.
    #[must_use]
    pub const fn is_choice(self) -> bool {
        matches!(self, Self::Choice | Self::MultipleChoice)
    }
}

/// Interaction widget used to render a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Widget {
    /// Single-line text box.
    TextInput,
    /// Multi-line text area.
    Textarea,
    /// URL text box.
    UrlInput,
    /// Email text box.
    EmailInput,
    /// Phone number text box.
    PhoneInput,
    /// Single checkbox.
    CheckboxInput,
    /// Number spinner.
    NumberInput,
    /// Drop-down.
    Select,
    /// Multi-select list box.
    SelectMultiple,
    /// Radio buttons.
    RadioSelect,
    /// Checkbox group.
    CheckboxSelectMultiple,
    /// File picker.
    FileInput,
}

/// Field class and widget for a form field kind; `None` for content blocks.
#[must_use]
pub const fn field_class_for(kind: NodeKind) -> Option<(FieldClass, Widget)> {
    match kind {
        NodeKind::Template => None,
        NodeKind::Char => Some((FieldClass::Char, Widget::TextInput)),
        NodeKind::Text => Some((FieldClass::Char, Widget::Textarea)),
        NodeKind::Url => Some((FieldClass::Url, Widget::UrlInput)),
        NodeKind::Email => Some((FieldClass::Email, Widget::EmailInput)),
        NodeKind::Phone => Some((FieldClass::Phone, Widget::PhoneInput)),
        NodeKind::Checkbox => Some((FieldClass::Boolean, Widget::CheckboxInput)),
        NodeKind::Counter => Some((FieldClass::Integer, Widget::NumberInput)),
        NodeKind::Select => Some((FieldClass::Choice, Widget::Select)),
        NodeKind::Multiselect => Some((FieldClass::MultipleChoice, Widget::SelectMultiple)),
        NodeKind::Radio => Some((FieldClass::Choice, Widget::RadioSelect)),
        NodeKind::Multicheckbox => {
            Some((FieldClass::MultipleChoice, Widget::CheckboxSelectMultiple))
        }
        NodeKind::File => Some((FieldClass::File, Widget::FileInput)),
    }
}

/// Constructor arguments for one rendered form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuntimeField {
    /// Prefixed field name.
    pub name: String,
    /// Template kind the field was bound from.
    pub kind: NodeKind,
    /// Field class to construct.
    pub field_class: FieldClass,
    /// Widget to render with.
    pub widget: Widget,
    /// Resolved label.
    pub label: String,
    /// Whether `label` is HTML.
    pub label_is_html: bool,
    /// Resolved help text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,
    /// Whether `help_text` is HTML.
    pub help_text_is_html: bool,
    /// Whether an answer is required.
    pub required: bool,
    /// Ordered `(key, label)` choices for choice fields.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<(String, String)>,
    /// Initial value for counters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial: Option<i64>,
    /// Inclusive lower bound for counters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_value: Option<i64>,
    /// Inclusive upper bound for counters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_value: Option<i64>,
}

impl RuntimeField {
    /// Returns true when answers are stored as choice keys.
    #[must_use]
    pub const fn is_choice_field(&self) -> bool {
        self.field_class.is_choice()
    }

    /// Returns the display label for a stored choice key, if non-empty.
    #[must_use]
    pub fn choice_label(&self, key: &str) -> Option<&str> {
        self.choices
            .iter()
            .find(|(choice_key, _)| choice_key == key)
            .map(|(_, label)| label.as_str())
            .filter(|label| !label.is_empty())
    }
}

// ============================================================================
// SECTION: Layout
// ============================================================================

/// Wrapper class applied to counter field layouts.
pub const COUNTER_WRAPPER_CLASS: &str = "counter-wrapper";

/// Presentation directive for one template node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LayoutObject {
    /// Raw HTML block.
    Html {
        /// Rendered content.
        content: String,
    },
    /// Placeholder for a bound field.
    Field {
        /// Prefixed field name.
        name: String,
        /// Optional wrapper CSS class.
        #[serde(skip_serializing_if = "Option::is_none")]
        wrapper_class: Option<String>,
    },
}

// ============================================================================
// SECTION: Binding
// ============================================================================

/// Binds one node to a runtime field under `name`; `None` for content blocks.
#[must_use]
pub fn bind_node(name: &str, node: &SchemaNode, ctx: &RenderContext<'_>) -> Option<RuntimeField> {
    let (field_class, widget) = field_class_for(node.kind())?;
    let attributes = node.attributes()?;
    let mut field = base_field(name, node.kind(), field_class, widget, attributes, ctx);
    match node {
        SchemaNode::Counter(counter) => {
            field.initial = Some(counter.initial);
            field.min_value = counter.min_value;
            field.max_value = counter.max_value;
        }
        SchemaNode::Select(choice)
        | SchemaNode::Multiselect(choice)
        | SchemaNode::Radio(choice)
        | SchemaNode::Multicheckbox(choice) => {
            field.choices = resolve_choices(choice, ctx);
        }
        SchemaNode::Template(_)
        | SchemaNode::Char(_)
        | SchemaNode::Text(_)
        | SchemaNode::Url(_)
        | SchemaNode::Email(_)
        | SchemaNode::Phone(_)
        | SchemaNode::Checkbox(_)
        | SchemaNode::File(_) => {}
    }
    Some(field)
}

/// Builds the layout directive for one node under `name`.
#[must_use]
pub fn layout_node(name: &str, node: &SchemaNode, ctx: &RenderContext<'_>) -> LayoutObject {
    match node {
        SchemaNode::Template(template) => LayoutObject::Html {
            content: ctx.render(&template.content, template.content_type.into()).text,
        },
        SchemaNode::Counter(_) => LayoutObject::Field {
            name: name.to_string(),
            wrapper_class: Some(COUNTER_WRAPPER_CLASS.to_string()),
        },
        SchemaNode::Char(_)
        | SchemaNode::Text(_)
        | SchemaNode::Url(_)
        | SchemaNode::Email(_)
        | SchemaNode::Phone(_)
        | SchemaNode::Checkbox(_)
        | SchemaNode::Select(_)
        | SchemaNode::Multiselect(_)
        | SchemaNode::Radio(_)
        | SchemaNode::Multicheckbox(_)
        | SchemaNode::File(_) => LayoutObject::Field {
            name: name.to_string(),
            wrapper_class: None,
        },
    }
}

/// Builds the descriptor fields shared by every kind.
fn base_field(
    name: &str,
    kind: NodeKind,
    field_class: FieldClass,
    widget: Widget,
    attributes: &FieldAttributes,
    ctx: &RenderContext<'_>,
) -> RuntimeField {
    let label = ctx.render(&attributes.label, attributes.label_type);
    let help_text =
        attributes.help_text.as_ref().map(|help| ctx.render(help, attributes.help_text_type));
    RuntimeField {
        name: name.to_string(),
        kind,
        field_class,
        widget,
        label: label.text,
        label_is_html: label.is_html,
        help_text_is_html: help_text.as_ref().is_some_and(|help| help.is_html),
        help_text: help_text.map(|help| help.text),
        required: attributes.required,
        choices: Vec::new(),
        initial: None,
        min_value: None,
        max_value: None,
    }
}

/// Resolves choice labels in declaration order.
fn resolve_choices(choice: &ChoiceField, ctx: &RenderContext<'_>) -> Vec<(String, String)> {
    choice
        .choices
        .iter()
        .map(|(key, label)| (key.clone(), ctx.locale().resolve(label)))
        .collect()
}
