// crates/coriolis-dynaforms/tests/common/mod.rs
// =============================================================================
// Module: Dynaform Test Helpers
// Description: Shared fixtures for dynamic form integration tests.
// Purpose: Reduce duplication across integration tests for coriolis-dynaforms.
// =============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]

use coriolis_dynaforms::Dynaform;
use coriolis_dynaforms::DynaformError;
use coriolis_dynaforms::LocaleContext;
use coriolis_dynaforms::MarkdownRenderer;
use serde_json::Value;
use serde_json::json;

/// Supported locales used by the fixtures.
pub const SUPPORTED: [&str; 2] = ["pl", "en"];

/// Returns a locale context for `current` over [`SUPPORTED`].
pub fn locale(current: &str) -> LocaleContext {
    LocaleContext::new(current, SUPPORTED)
}

/// Returns a renderer without table styling.
pub const fn renderer() -> MarkdownRenderer {
    MarkdownRenderer::new()
}

/// Wraps field definitions into a template document string.
pub fn template(fields: &Value) -> String {
    json!({ "fields": fields }).to_string()
}

/// Builds a form from field definitions.
pub fn build(name: Option<&str>, fields: &Value) -> Result<Dynaform, DynaformError> {
    Dynaform::build(name, &template(fields))
}

/// Builds a form and converts the error to a string.
pub fn build_ok(name: Option<&str>, fields: &Value) -> Result<Dynaform, String> {
    build(name, fields).map_err(|err| err.to_string())
}

/// Returns a registration form exercising most kinds.
pub fn registration_fields() -> Value {
    json!({
        "intro": {
            "kind": "template",
            "content": {"en": "**Welcome**", "pl": "**Witamy**"},
            "content_type": "markdown"
        },
        "nickname": {"kind": "char", "label": {"en": "Nickname", "pl": "Pseudonim"}},
        "about": {"kind": "text", "label": "About you", "required": false},
        "homepage": {"kind": "url", "label": "Homepage", "required": false},
        "contact": {"kind": "email", "label": "Contact email"},
        "phone": {"kind": "phone", "label": "Phone"},
        "consent": {"kind": "checkbox", "label": "I agree"},
        "guests": {"kind": "counter", "label": "Guests", "min_value": 0, "max_value": 5},
        "shirt": {
            "kind": "select",
            "label": "Shirt size",
            "choices": {"s": "Small", "m": "Medium", "l": "Large"}
        },
        "diet": {
            "kind": "multicheckbox",
            "label": "Diet",
            "choices": {
                "vegan": {"en": "Vegan", "pl": "Wegańska"},
                "gluten": {"en": "Gluten free", "pl": "Bezglutenowa"}
            }
        },
        "track": {"kind": "radio", "label": "Track", "choices": {"a": "A", "b": "B"}},
        "langs": {"kind": "multiselect", "label": "Languages", "choices": {"en": "English"}},
        "receipt": {"kind": "file", "label": "Receipt", "upload_prefix": "receipts"}
    })
}
