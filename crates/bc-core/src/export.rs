//! Export: block tree → standalone HTML document.
//!
//! Each block becomes one element with an inline `style` attribute built by
//! the shared CSS mapping, so the exported page matches the on-screen
//! render. Preview and download both go through [`export_canvas`].

use crate::css::{block_declarations, position_declarations, to_inline_css};
use crate::model::*;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Options for HTML export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    /// Document `<title>`.
    pub title: String,
    /// Spaces per nesting level.
    pub indent_width: usize,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            title: "My Design".to_string(),
            indent_width: 2,
        }
    }
}

const RESET_CSS: &str = "\
    * {
      margin: 0;
      padding: 0;
      box-sizing: border-box;
    }
    body {
      position: relative;
      font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Oxygen, Ubuntu, Cantarell, sans-serif;
      background-color: #ffffff;
      color: #1a1a1a;
    }
";

/// Element tag for a block kind. Most kinds map to a tag of the same name;
/// `flex-container` and the free-form shapes become `div`, text becomes `p`.
pub fn html_tag(kind: BlockKind) -> &'static str {
    match kind {
        BlockKind::Section => "section",
        BlockKind::Header => "header",
        BlockKind::Footer => "footer",
        BlockKind::Card => "card",
        BlockKind::Button => "button",
        BlockKind::Input => "input",
        BlockKind::Form => "form",
        BlockKind::Navbar => "navbar",
        BlockKind::Modal => "modal",
        BlockKind::Sidebar => "sidebar",
        BlockKind::List => "list",
        BlockKind::Text | BlockKind::ShapeText => "p",
        BlockKind::Image => "img",
        BlockKind::Grid => "grid",
        BlockKind::FlexContainer
        | BlockKind::Frame
        | BlockKind::Rectangle
        | BlockKind::Circle => "div",
    }
}

/// Escape text or attribute content.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Serialize one block (and its visible subtree) at `depth`.
/// Hidden blocks serialize to an empty string.
#[must_use]
pub fn block_to_html(block: &Block, depth: usize) -> String {
    let mut out = String::new();
    emit_block(&mut out, block, depth, ExportOptions::default().indent_width);
    if out.ends_with('\n') {
        out.pop();
    }
    out
}

/// Wrap `blocks` in a complete HTML page.
#[must_use]
pub fn canvas_to_html(blocks: &[Block], options: &ExportOptions) -> String {
    let mut body = String::new();
    for block in blocks {
        emit_block(&mut body, block, 1, options.indent_width);
    }

    let mut out = String::with_capacity(body.len() + 1024);
    out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    out.push_str("  <meta charset=\"UTF-8\">\n");
    out.push_str(
        "  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
    );
    let _ = writeln!(out, "  <title>{}</title>", escape_html(&options.title));
    out.push_str("  <style>\n");
    out.push_str(RESET_CSS);
    out.push_str("  </style>\n</head>\n<body>\n");
    out.push_str(&body);
    out.push_str("</body>\n</html>\n");
    out
}

/// Export a whole canvas, titled with the canvas name.
#[must_use]
pub fn export_canvas(canvas: &Canvas) -> String {
    let options = ExportOptions {
        title: canvas.name.clone(),
        ..Default::default()
    };
    log::debug!("exporting canvas '{}' ({} top-level)", canvas.name, canvas.blocks.len());
    canvas_to_html(&canvas.blocks, &options)
}

// ─── Emitter ─────────────────────────────────────────────────────────────

fn indent(out: &mut String, depth: usize, width: usize) {
    for _ in 0..depth * width {
        out.push(' ');
    }
}

fn style_attr(block: &Block) -> String {
    let mut decls = if block.kind.is_free_form() {
        position_declarations(&block.style)
    } else {
        Vec::new()
    };
    decls.extend(block_declarations(&block.style, &block.content));

    if decls.is_empty() {
        String::new()
    } else {
        format!(" style=\"{}\"", escape_html(&to_inline_css(&decls)))
    }
}

fn text_or<'a>(content: &'a BlockContent, fallback: &'a str) -> &'a str {
    content.text().filter(|t| !t.is_empty()).unwrap_or(fallback)
}

fn emit_block(out: &mut String, block: &Block, depth: usize, width: usize) {
    if block.hidden {
        return;
    }

    let tag = html_tag(block.kind);
    let style = style_attr(block);
    indent(out, depth, width);

    match (&block.kind, &block.content) {
        (BlockKind::Button, content) => {
            let text = escape_html(text_or(content, "Button"));
            let _ = writeln!(out, "<{tag}{style}>{text}</{tag}>");
        }
        (BlockKind::Text, content) => {
            let text = escape_html(text_or(content, "Text content"));
            let _ = writeln!(out, "<{tag}{style}>{text}</{tag}>");
        }
        (BlockKind::ShapeText, content) => {
            let text = escape_html(text_or(content, "Text"));
            let _ = writeln!(out, "<{tag}{style}>{text}</{tag}>");
        }
        (BlockKind::Input, content) => {
            let placeholder = match content {
                BlockContent::Input { placeholder } => escape_html(placeholder),
                _ => String::new(),
            };
            let _ = writeln!(
                out,
                "<{tag}{style} type=\"text\" placeholder=\"{placeholder}\" />"
            );
        }
        (BlockKind::Image, content) => {
            let src = match content {
                BlockContent::Image { src } => escape_html(src),
                _ => String::new(),
            };
            let _ = writeln!(out, "<{tag}{style} src=\"{src}\" alt=\"Image\" />");
        }
        _ => {
            if block.children.iter().all(|c| c.hidden) {
                let _ = writeln!(out, "<{tag}{style}></{tag}>");
                return;
            }
            let _ = writeln!(out, "<{tag}{style}>");
            for child in &block.children {
                emit_block(out, child, depth + 1, width);
            }
            indent(out, depth, width);
            let _ = writeln!(out, "</{tag}>");
        }
    }
}
