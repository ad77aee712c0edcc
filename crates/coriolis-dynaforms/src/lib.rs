// crates/coriolis-dynaforms/src/lib.rs
// ============================================================================
// Module: Coriolis Dynaforms Library
// Description: Schema-driven dynamic form engine for event registration.
// Purpose: Parse, validate, bind and format dynamic form templates.
// Dependencies: indexmap, pulldown-cmark, serde, serde_json, thiserror, toml, tracing
// ============================================================================

//! ## Overview
//! `coriolis-dynaforms` turns a JSON template of typed fields into a
//! validated [`Dynaform`], binds it to runtime field descriptors for a
//! presentation layer, and formats submitted answers back into localized,
//! human-readable strings for emails, exports and detail views.
//!
//! The engine is synchronous and pure. Locale, Markdown rendering and public
//! key lookup are explicit collaborators ([`LocaleContext`],
//! [`MarkupRenderer`], [`KeyResolver`]).

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod answers;
pub mod config;
pub mod dynaform;
pub mod i18n;
pub mod keys;
pub mod locale;
pub mod markup;
pub mod parser;
pub mod runtime;
pub mod schema;
pub mod template_schema;

#[cfg(test)]
mod tests;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use answers::ComplexAnswer;
pub use answers::FileUploadAnswer;
pub use answers::MISSING_ANSWER;
pub use answers::get_pretty_answer_value;
pub use answers::get_pretty_answers;
pub use config::ConfigError;
pub use config::DynaformsConfig;
pub use dynaform::Dynaform;
pub use dynaform::DynaformError;
pub use dynaform::dynaform_prefix;
pub use dynaform::dynaform_to_fields;
pub use keys::InMemoryKeyStore;
pub use keys::KeyResolution;
pub use keys::KeyResolutionError;
pub use keys::KeyResolver;
pub use keys::PublicKey;
pub use keys::PublicKeyKind;
pub use keys::Recipient;
pub use keys::UploadKeyReport;
pub use keys::resolve_pubkeys;
pub use locale::LocaleContext;
pub use locale::LocalizableText;
pub use markup::MarkdownRenderer;
pub use markup::MarkupRenderer;
pub use markup::TextFormat;
pub use markup::transform_text;
pub use parser::SchemaParseError;
pub use parser::SchemaValidationError;
pub use parser::SchemaViolation;
pub use parser::TemplateLimits;
pub use parser::ViolationRule;
pub use runtime::FieldClass;
pub use runtime::LayoutObject;
pub use runtime::RenderContext;
pub use runtime::RuntimeField;
pub use runtime::Widget;
pub use schema::NodeKind;
pub use schema::SchemaNode;
pub use template_schema::template_schema;
