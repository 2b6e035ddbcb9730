//! Render projection: block tree → nested visual nodes for the host UI.
//!
//! Two strategies share one node type. `Flow` lays blocks out as nested
//! document elements and uses the same CSS mapping as HTML export.
//! `FreeForm` places every block absolutely from its geometry and draws
//! resize handles on the selected block.

use crate::handles::{HANDLE_SIZE, HandlePosition};
use crate::hit::block_rect;
use bc_core::css::{self, Declaration};
use bc_core::export::html_tag;
use bc_core::factory::SHAPE_FILL;
use bc_core::id::BlockId;
use bc_core::model::*;
use kurbo::Rect;
use serde::{Deserialize, Serialize};

/// Shown inside containers that have no visible children.
pub const EMPTY_PLACEHOLDER: &str = "Empty block";

const SELECTION_OUTLINE: &str = "2px solid hsl(262 85% 65%)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RenderMode {
    /// Nested containers in document flow.
    Flow,
    /// Absolute positioning with pan/zoom and handles.
    #[default]
    FreeForm,
}

/// One resize handle box, positioned relative to its block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HandleBox {
    pub position: HandlePosition,
    pub cursor: &'static str,
    pub left: f64,
    pub top: f64,
    pub size: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderElement {
    /// Source block, absent for synthetic wrappers.
    pub key: Option<BlockId>,
    pub tag: &'static str,
    pub styles: Vec<Declaration>,
    pub attributes: Vec<(&'static str, String)>,
    pub children: Vec<RenderNode>,
    pub selected: bool,
    pub handles: Vec<HandleBox>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RenderNode {
    Element(RenderElement),
    Text { content: String },
    Placeholder { content: String },
}

impl RenderElement {
    pub fn new(tag: &'static str) -> Self {
        Self {
            key: None,
            tag,
            styles: Vec::new(),
            attributes: Vec::new(),
            children: Vec::new(),
            selected: false,
            handles: Vec::new(),
        }
    }

    pub fn with_key(mut self, id: BlockId) -> Self {
        self.key = Some(id);
        self
    }

    pub fn with_style(mut self, prop: &'static str, value: impl Into<String>) -> Self {
        self.styles.push((prop, value.into()));
        self
    }

    pub fn with_styles(mut self, decls: Vec<Declaration>) -> Self {
        self.styles.extend(decls);
        self
    }

    pub fn with_attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attributes.push((name, value.into()));
        self
    }

    pub fn with_child(mut self, child: RenderNode) -> Self {
        self.children.push(child);
        self
    }

    /// Value of the last declaration for `prop`.
    pub fn style(&self, prop: &str) -> Option<&str> {
        self.styles
            .iter()
            .rev()
            .find(|(p, _)| *p == prop)
            .map(|(_, v)| v.as_str())
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }
}

impl RenderNode {
    pub fn text(content: impl Into<String>) -> Self {
        RenderNode::Text {
            content: content.into(),
        }
    }

    pub fn as_element(&self) -> Option<&RenderElement> {
        match self {
            RenderNode::Element(el) => Some(el),
            _ => None,
        }
    }
}

impl From<RenderElement> for RenderNode {
    fn from(el: RenderElement) -> Self {
        RenderNode::Element(el)
    }
}

/// Settings for one projection pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub selection: Option<BlockId>,
    pub mode: RenderMode,
    /// Side of each drawn resize handle, in device pixels.
    pub handle_size: f64,
}

impl Projection {
    pub fn new(selection: Option<BlockId>, mode: RenderMode) -> Self {
        Self {
            selection,
            mode,
            handle_size: HANDLE_SIZE,
        }
    }

    pub fn with_handle_size(mut self, size: f64) -> Self {
        self.handle_size = size;
        self
    }

    /// Project the whole forest. Hidden blocks produce nothing.
    pub fn canvas(&self, canvas: &Canvas) -> Vec<RenderNode> {
        self.blocks(&canvas.blocks)
    }

    fn blocks(&self, blocks: &[Block]) -> Vec<RenderNode> {
        blocks.iter().filter_map(|b| self.block(b)).collect()
    }

    /// Project one block and its subtree, or `None` if hidden.
    pub fn block(&self, block: &Block) -> Option<RenderNode> {
        if block.hidden {
            return None;
        }
        let el = match self.mode {
            RenderMode::Flow => flow_element(block, self),
            RenderMode::FreeForm => free_form_element(block, self),
        };
        Some(el.into())
    }
}

/// Project the whole forest with default handle size.
pub fn render_canvas(
    canvas: &Canvas,
    selection: Option<BlockId>,
    mode: RenderMode,
) -> Vec<RenderNode> {
    Projection::new(selection, mode).canvas(canvas)
}

pub fn render_block(block: &Block, selection: Option<BlockId>, mode: RenderMode) -> Option<RenderNode> {
    Projection::new(selection, mode).block(block)
}

fn text_or<'a>(block: &'a Block, fallback: &'a str) -> &'a str {
    block.content.text().filter(|t| !t.is_empty()).unwrap_or(fallback)
}

// ─── Flow ────────────────────────────────────────────────────────────────

fn flow_element(block: &Block, p: &Projection) -> RenderElement {
    let selected = p.selection == Some(block.id);
    let mut el = RenderElement::new(html_tag(block.kind))
        .with_key(block.id)
        .with_styles(css::block_declarations(&block.style, &block.content));
    el.selected = selected;
    if selected {
        el = el
            .with_style("outline", SELECTION_OUTLINE)
            .with_style("outline-offset", "2px");
    }

    match (&block.kind, &block.content) {
        (BlockKind::Text, _) => el.with_child(RenderNode::text(text_or(block, "Text content"))),
        (BlockKind::ShapeText, _) => el.with_child(RenderNode::text(text_or(block, "Text"))),
        (BlockKind::Button, _) => el.with_child(RenderNode::text(text_or(block, "Button"))),
        (BlockKind::Input, BlockContent::Input { placeholder }) => el
            .with_attr("type", "text")
            .with_attr("placeholder", placeholder.clone()),
        (BlockKind::Input, _) => el.with_attr("type", "text"),
        (BlockKind::Image, content) => {
            let src = match content {
                BlockContent::Image { src } => src.clone(),
                _ => String::new(),
            };
            el.with_attr("src", src).with_attr("alt", block.label.clone())
        }
        _ => {
            let children = p.blocks(&block.children);
            if children.is_empty() {
                el.with_child(RenderNode::Placeholder {
                    content: EMPTY_PLACEHOLDER.to_string(),
                })
            } else {
                el.children = children;
                el
            }
        }
    }
}

// ─── Free-form ───────────────────────────────────────────────────────────

fn px(v: f64) -> String {
    format!("{}px", format_num(v))
}

fn free_form_element(block: &Block, p: &Projection) -> RenderElement {
    let selected = p.selection == Some(block.id);
    let rect = block_rect(&block.style);
    let style = &block.style;

    let border = if selected {
        format!("2px solid {SHAPE_FILL}")
    } else {
        css::border_css(style).unwrap_or_else(|| format!("1px solid {SHAPE_FILL}"))
    };
    let transform = match style.rotation {
        Some(deg) if deg != 0.0 => format!("rotate({}deg)", format_num(deg)),
        _ => "none".to_string(),
    };

    let mut el = RenderElement::new("div")
        .with_key(block.id)
        .with_style("position", "absolute")
        .with_style("left", px(rect.x0))
        .with_style("top", px(rect.y0))
        .with_style("width", px(rect.width()))
        .with_style("height", px(rect.height()))
        .with_style(
            "background-color",
            style.background_color.as_deref().unwrap_or(SHAPE_FILL),
        );
    if let Some(gradient) = &style.background_gradient {
        el = el.with_style("background-image", css::gradient_css(gradient));
    }
    el = el
        .with_style("border-radius", css::border_radius_css(style).unwrap_or_else(|| px(0.0)))
        .with_style("cursor", if block.locked { "default" } else { "move" })
        .with_style("opacity", format_num(style.opacity.unwrap_or(1.0)))
        .with_style("border", border)
        .with_style("box-shadow", css::shadow_css(style).unwrap_or_else(|| "none".into()))
        .with_style("transform", transform);
    el.selected = selected;

    if block.kind == BlockKind::ShapeText {
        let size = style.font_size.unwrap_or(14.0);
        let text = RenderElement::new("p")
            .with_style("padding", "8px")
            .with_style("font-size", px(size))
            .with_style("color", style.color.as_deref().unwrap_or("white"))
            .with_child(RenderNode::text(text_or(block, "Text")));
        el = el.with_child(text.into());
    }

    el.children.extend(p.blocks(&block.children));

    if selected {
        el.handles = handle_boxes(rect, p.handle_size);
    }
    el
}

/// Handle boxes in block-local coordinates, centred on each anchor.
fn handle_boxes(rect: Rect, size: f64) -> Vec<HandleBox> {
    let local = Rect::new(0.0, 0.0, rect.width(), rect.height());
    let half = size / 2.0;
    HandlePosition::ALL
        .iter()
        .map(|&position| {
            let anchor = position.anchor(local);
            HandleBox {
                position,
                cursor: position.cursor(),
                left: anchor.x - half,
                top: anchor.y - half,
                size,
            }
        })
        .collect()
}
