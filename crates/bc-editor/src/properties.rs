//! Properties panel edits.
//!
//! The panel sends raw `(key, input)` pairs. Each key maps to one style
//! field or one content field; the raw input goes through the lenient
//! property parsers, so malformed numbers become `0`. Percent-style inputs
//! (`opacity`, `strokeOpacity`, `shadowOpacity`) are 0 to 100 in the panel
//! and 0 to 1 in the style.

use bc_core::input::{parse_length, parse_number, parse_sides};
use bc_core::model::{BlockContent, BlockKind, BlockNode, BlockPatch, BlockStyle, Shadow, Stroke};
use serde::de::{DeserializeOwned, IntoDeserializer, value::Error as ValueError};

/// Shadow added when the panel turns shadows on for a block without one.
pub fn default_shadow() -> Shadow {
    Shadow::new(0.0, 4.0, 12.0, 0.0, "#000000", 0.1)
}

#[derive(Debug, Clone, PartialEq)]
pub enum PropertyEdit {
    Style(BlockStyle),
    Block(BlockPatch),
}

/// Lowercase keyword → enum, using the enum's serde names.
fn keyword<T: DeserializeOwned>(input: &str) -> Option<T> {
    T::deserialize(IntoDeserializer::<ValueError>::into_deserializer(input.trim())).ok()
}

fn percent(input: &str) -> f64 {
    parse_number(input) / 100.0
}

fn style(f: impl FnOnce(&mut BlockStyle)) -> Option<PropertyEdit> {
    let mut patch = BlockStyle::default();
    f(&mut patch);
    Some(PropertyEdit::Style(patch))
}

/// Translate one panel input into a patch for `node`.
///
/// Nested values (stroke, shadow) are merged with the node's current value,
/// so editing the stroke width keeps its color. Returns `None` for unknown
/// keys, unparseable keywords, and content fields the block kind lacks.
pub fn property_edit(node: &BlockNode, key: &str, value: &str) -> Option<PropertyEdit> {
    let text = value.to_string();
    match key {
        // ── Geometry ──
        "x" => style(|s| s.x = Some(parse_number(value))),
        "y" => style(|s| s.y = Some(parse_number(value))),
        "width" => style(|s| s.width = Some(parse_length(value))),
        "height" => style(|s| s.height = Some(parse_length(value))),
        "minHeight" => style(|s| s.min_height = Some(parse_number(value))),
        "rotation" => style(|s| s.rotation = Some(parse_number(value))),

        // ── Spacing ──
        "padding" => style(|s| s.padding = Some(parse_sides(value))),
        "margin" => style(|s| s.margin = Some(parse_sides(value))),
        "gap" => style(|s| s.gap = Some(parse_number(value))),

        // ── Fill & border ──
        "backgroundColor" => style(|s| s.background_color = Some(text)),
        "backgroundImage" => style(|s| s.background_image = Some(text)),
        "borderRadius" => style(|s| s.border_radius = Some(parse_number(value))),
        "borderColor" => style(|s| s.border_color = Some(text)),
        "borderWidth" => style(|s| s.border_width = Some(parse_number(value))),
        "opacity" => style(|s| s.opacity = Some(percent(value))),

        "strokeWidth" | "strokeColor" | "strokeOpacity" | "strokePosition" => {
            let mut stroke: Stroke = node.style.stroke.clone().unwrap_or_default();
            match key {
                "strokeWidth" => stroke.width = Some(parse_number(value)),
                "strokeColor" => stroke.color = Some(text),
                "strokeOpacity" => stroke.opacity = Some(percent(value)),
                _ => stroke.position = Some(keyword(value)?),
            }
            style(|s| s.stroke = Some(stroke))
        }

        "shadow" | "shadowX" | "shadowY" | "shadowBlur" | "shadowSpread" | "shadowColor"
        | "shadowOpacity" => {
            let mut shadow = node.style.shadow.clone().unwrap_or_else(default_shadow);
            match key {
                "shadow" => shadow.enabled = Some(value.trim() != "false"),
                "shadowX" => shadow.x = parse_number(value),
                "shadowY" => shadow.y = parse_number(value),
                "shadowBlur" => shadow.blur = parse_number(value),
                "shadowSpread" => shadow.spread = parse_number(value),
                "shadowColor" => shadow.color = text,
                _ => shadow.opacity = percent(value),
            }
            style(|s| s.shadow = Some(shadow))
        }

        // ── Typography ──
        "color" => style(|s| s.color = Some(text)),
        "fontSize" => style(|s| s.font_size = Some(parse_number(value))),
        "lineHeight" => style(|s| s.line_height = Some(parse_number(value))),
        "fontWeight" => {
            let weight = keyword(value)?;
            style(|s| s.font_weight = Some(weight))
        }
        "textAlign" => {
            let align = keyword(value)?;
            style(|s| s.text_align = Some(align))
        }

        // ── Layout ──
        "display" => {
            let display = keyword(value)?;
            style(|s| s.display = Some(display))
        }
        "flexDirection" => {
            let direction = keyword(value)?;
            style(|s| s.flex_direction = Some(direction))
        }
        "justifyContent" => style(|s| s.justify_content = Some(text)),
        "alignItems" => style(|s| s.align_items = Some(text)),

        // ── Block fields ──
        "label" => Some(PropertyEdit::Block(BlockPatch::label(text))),
        "text" | "placeholder" | "src" | "columns" => {
            let content = match (node.kind, key) {
                (BlockKind::Text, "text") => BlockContent::Text { text },
                (BlockKind::Button, "text") => BlockContent::Button { text },
                (BlockKind::ShapeText, "text") => BlockContent::ShapeText { text },
                (BlockKind::Input, "placeholder") => BlockContent::Input { placeholder: text },
                (BlockKind::Image, "src") => BlockContent::Image { src: text },
                (BlockKind::Grid, "columns") => BlockContent::Grid {
                    columns: parse_number(value).max(1.0) as u32,
                },
                _ => {
                    log::debug!("{key}: not editable on a {} block", node.kind);
                    return None;
                }
            };
            Some(PropertyEdit::Block(BlockPatch::content(content)))
        }

        _ => {
            log::debug!("unknown property {key}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bc_core::factory::create_block;
    use bc_core::model::{FontWeight, Length, Sides, StrokePosition};
    use pretty_assertions::assert_eq;

    fn node(kind: BlockKind) -> BlockNode {
        create_block(kind).into_parts().0
    }

    fn style_of(edit: Option<PropertyEdit>) -> BlockStyle {
        match edit {
            Some(PropertyEdit::Style(style)) => style,
            other => panic!("expected style edit, got {other:?}"),
        }
    }

    #[test]
    fn numeric_inputs_are_lenient() {
        let rect = node(BlockKind::Rectangle);
        assert_eq!(style_of(property_edit(&rect, "x", "42")).x, Some(42.0));
        assert_eq!(style_of(property_edit(&rect, "y", "abc")).y, Some(0.0));
        assert_eq!(
            style_of(property_edit(&rect, "width", "50%")).width,
            Some(Length::Percent(50.0))
        );
        assert_eq!(
            style_of(property_edit(&rect, "padding", "10 20")).padding,
            Some(Sides::symmetric(10.0, 20.0))
        );
        assert_eq!(style_of(property_edit(&rect, "opacity", "40")).opacity, Some(0.4));
    }

    #[test]
    fn stroke_edits_merge_with_current() {
        let mut rect = node(BlockKind::Rectangle);
        rect.style.stroke = Some(Stroke {
            color: Some("#ff0000".into()),
            ..Default::default()
        });
        let stroke = style_of(property_edit(&rect, "strokeWidth", "3"))
            .stroke
            .unwrap();
        assert_eq!(stroke.width, Some(3.0));
        assert_eq!(stroke.color.as_deref(), Some("#ff0000"));

        let stroke = style_of(property_edit(&rect, "strokePosition", "inside"))
            .stroke
            .unwrap();
        assert_eq!(stroke.position, Some(StrokePosition::Inside));
        assert_eq!(property_edit(&rect, "strokePosition", "diagonal"), None);
    }

    #[test]
    fn shadow_edits_start_from_default() {
        let rect = node(BlockKind::Rectangle);
        let shadow = style_of(property_edit(&rect, "shadowBlur", "20"))
            .shadow
            .unwrap();
        assert_eq!(shadow, Shadow { blur: 20.0, ..default_shadow() });

        let off = style_of(property_edit(&rect, "shadow", "false")).shadow.unwrap();
        assert!(!off.is_enabled());
    }

    #[test]
    fn keywords() {
        let text = node(BlockKind::Text);
        assert_eq!(
            style_of(property_edit(&text, "fontWeight", "semibold")).font_weight,
            Some(FontWeight::Semibold)
        );
        assert_eq!(property_edit(&text, "fontWeight", "heavy"), None);
    }

    #[test]
    fn content_follows_kind() {
        let button = node(BlockKind::Button);
        assert_eq!(
            property_edit(&button, "text", "Go"),
            Some(PropertyEdit::Block(BlockPatch::content(BlockContent::Button {
                text: "Go".into()
            })))
        );
        assert_eq!(property_edit(&button, "src", "x.png"), None);

        let grid = node(BlockKind::Grid);
        assert_eq!(
            property_edit(&grid, "columns", "0"),
            Some(PropertyEdit::Block(BlockPatch::content(BlockContent::Grid { columns: 1 })))
        );
    }

    #[test]
    fn label_and_unknown() {
        let card = node(BlockKind::Card);
        assert_eq!(
            property_edit(&card, "label", "Pricing"),
            Some(PropertyEdit::Block(BlockPatch::label("Pricing")))
        );
        assert_eq!(property_edit(&card, "zIndex", "3"), None);
    }
}
