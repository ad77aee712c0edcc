//! Markup rendering tests for coriolis-dynaforms.
// crates/coriolis-dynaforms/tests/markup.rs
// =============================================================================
// Module: Markup Rendering Tests
// Description: Text formats, paragraph stripping and table styling.
// Purpose: Ensure labels and content blocks render predictably.
// =============================================================================

use coriolis_dynaforms::MarkdownRenderer;
use coriolis_dynaforms::MarkupRenderer;
use coriolis_dynaforms::TextFormat;
use coriolis_dynaforms::markup::strip_single_paragraph;
use coriolis_dynaforms::transform_text;

type TestResult = Result<(), String>;

/// Renderer that upper-cases its input.
struct ShoutingRenderer;

impl MarkupRenderer for ShoutingRenderer {
    fn render_markdown(&self, source: &str, _strip_wrapper: bool) -> String {
        source.to_uppercase()
    }
}

#[test]
fn single_paragraph_markdown_loses_its_wrapper() -> TestResult {
    let rendered = transform_text("Hello **world**", TextFormat::Markdown, &MarkdownRenderer::new());
    if rendered.text != "Hello <strong>world</strong>" || !rendered.is_html {
        return Err(format!("unexpected rendering {rendered:?}"));
    }
    Ok(())
}

#[test]
fn multi_paragraph_markdown_keeps_its_wrappers() -> TestResult {
    let rendered = transform_text("One\n\nTwo", TextFormat::Markdown, &MarkdownRenderer::new());
    if rendered.text != "<p>One</p>\n<p>Two</p>" {
        return Err(format!("unexpected rendering {:?}", rendered.text));
    }
    Ok(())
}

#[test]
fn render_markdown_keeps_wrapper_when_not_asked_to_strip() -> TestResult {
    let html = MarkdownRenderer::new().render_markdown("Hello", false);
    if html != "<p>Hello</p>" {
        return Err(format!("unexpected rendering {html:?}"));
    }
    Ok(())
}

#[test]
fn text_and_html_pass_through() -> TestResult {
    let renderer = MarkdownRenderer::new();
    let text = transform_text("<b>a</b> *b*", TextFormat::Text, &renderer);
    if text.text != "<b>a</b> *b*" || text.is_html {
        return Err("plain text must not be transformed".to_string());
    }
    let html = transform_text("<b>a</b>", TextFormat::Html, &renderer);
    if html.text != "<b>a</b>" || !html.is_html {
        return Err("html must pass through and be flagged".to_string());
    }
    Ok(())
}

#[test]
fn strip_single_paragraph_requires_exactly_one_paragraph() -> TestResult {
    let cases = [
        ("<p>a</p>", "a"),
        ("<p>a</p><p>b</p>", "<p>a</p><p>b</p>"),
        ("<div>a</div>", "<div>a</div>"),
        ("<p>a", "<p>a"),
    ];
    for (input, expected) in cases {
        let actual = strip_single_paragraph(input);
        if actual != expected {
            return Err(format!("{input}: expected {expected}, got {actual}"));
        }
    }
    Ok(())
}

#[test]
fn tables_receive_the_configured_class() -> TestResult {
    let renderer = MarkdownRenderer::with_table_class("table table-bordered");
    let html = renderer.render_markdown("| a | b |\n|---|---|\n| 1 | 2 |", true);
    if !html.starts_with(r#"<table class="table table-bordered">"#) {
        return Err(format!("table class missing: {html}"));
    }
    let bare = MarkdownRenderer::new().render_markdown("| a |\n|---|\n| 1 |", true);
    if !bare.starts_with("<table>") {
        return Err(format!("unexpected bare table: {bare}"));
    }
    Ok(())
}

#[test]
fn custom_renderers_are_used_for_markdown() -> TestResult {
    let rendered = transform_text("hi", TextFormat::Markdown, &ShoutingRenderer);
    if rendered.text != "HI" || !rendered.is_html {
        return Err(format!("unexpected rendering {rendered:?}"));
    }
    Ok(())
}
