// crates/coriolis-dynaforms/src/markup.rs
// ============================================================================
// Module: Markup Rendering
// Description: Text format handling and Markdown-to-HTML rendering.
// Purpose: Turn label, help text and content values into display strings.
// Dependencies: pulldown-cmark, serde
// ============================================================================

//! ## Overview
//! Template text declares a format: plain text passes through, HTML is
//! trusted verbatim, and Markdown is rendered to HTML through a
//! [`MarkupRenderer`]. Rendered Markdown consisting of a single paragraph has
//! its wrapping `<p>` removed so it can be used inline as a label.

// ============================================================================
// SECTION: Imports
// ============================================================================

use pulldown_cmark::Options;
use pulldown_cmark::Parser;
use pulldown_cmark::html;
use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Formats
// ============================================================================

/// Format of a label or help text value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextFormat {
    /// Plain text, passed through unchanged.
    #[default]
    Text,
    /// Trusted HTML.
    Html,
    /// Markdown rendered to HTML.
    Markdown,
}

/// Format of a template content block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentFormat {
    /// Markdown rendered to HTML.
    Markdown,
    /// Trusted HTML.
    #[default]
    Html,
}

impl TextFormat {
    /// Returns the wire name of the format.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Html => "html",
            Self::Markdown => "markdown",
        }
    }
}

impl ContentFormat {
    /// Returns the wire name of the format.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Markdown => "markdown",
            Self::Html => "html",
        }
    }
}

impl From<ContentFormat> for TextFormat {
    fn from(value: ContentFormat) -> Self {
        match value {
            ContentFormat::Markdown => Self::Markdown,
            ContentFormat::Html => Self::Html,
        }
    }
}

/// Text after format transformation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedText {
    /// Display string.
    pub text: String,
    /// Whether `text` is HTML that must not be escaped again.
    pub is_html: bool,
}

// ============================================================================
// SECTION: Renderer
// ============================================================================

/// Markdown rendering collaborator.
pub trait MarkupRenderer {
    /// Renders `source` Markdown to HTML.
    ///
    /// When `strip_wrapper` is set and the output is a single paragraph, the
    /// wrapping `<p>` element is removed.
    fn render_markdown(&self, source: &str, strip_wrapper: bool) -> String;
}

/// Default CommonMark renderer backed by `pulldown-cmark`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkdownRenderer {
    /// Optional CSS class attached to rendered tables.
    table_class: Option<String>,
}

impl MarkdownRenderer {
    /// Creates a renderer without table styling.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            table_class: None,
        }
    }

    /// Creates a renderer that tags every rendered `<table>` with `class`.
    #[must_use]
    pub fn with_table_class(class: impl Into<String>) -> Self {
        Self {
            table_class: Some(class.into()),
        }
    }
}

impl MarkupRenderer for MarkdownRenderer {
    fn render_markdown(&self, source: &str, strip_wrapper: bool) -> String {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_HEADING_ATTRIBUTES);
        let parser = Parser::new_ext(source, options);
        let mut output = String::with_capacity(source.len() + source.len() / 2);
        html::push_html(&mut output, parser);

        let mut text = output.trim().to_string();
        if let Some(class) = &self.table_class {
            text = text.replace("<table>", &format!("<table class=\"{class}\">"));
        }
        if strip_wrapper {
            return strip_single_paragraph(&text).to_string();
        }
        text
    }
}

/// Removes a wrapping `<p>` element when `html` holds exactly one paragraph.
///
/// This is a string check rather than an HTML parse: the text must start with
/// `<p>`, end with `</p>`, and contain no other closing paragraph tag.
#[must_use]
pub fn strip_single_paragraph(html: &str) -> &str {
    if let Some(inner) = html.strip_prefix("<p>").and_then(|rest| rest.strip_suffix("</p>"))
        && !inner.contains("</p>")
    {
        return inner;
    }
    html
}

// ============================================================================
// SECTION: Transformation
// ============================================================================

/// Applies `format` to `text`, rendering Markdown through `renderer`.
#[must_use]
pub fn transform_text(text: &str, format: TextFormat, renderer: &dyn MarkupRenderer) -> RenderedText {
    match format {
        TextFormat::Text => RenderedText {
            text: text.to_string(),
            is_html: false,
        },
        TextFormat::Html => RenderedText {
            text: text.to_string(),
            is_html: true,
        },
        TextFormat::Markdown => RenderedText {
            text: renderer.render_markdown(text, true),
            is_html: true,
        },
    }
}
