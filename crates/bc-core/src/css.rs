//! Style → CSS declaration mapping shared by render and export.
//!
//! Bare numbers become pixel lengths. Opacity, line-height, and numeric
//! font weights stay unitless. Unset attributes produce nothing.

use crate::model::*;

/// One `property: value` pair.
pub type Declaration = (&'static str, String);

fn px(v: f64) -> String {
    format!("{}px", format_num(v))
}

/// `border-radius` value. Per-corner radii win, with unset corners taking
/// the uniform radius.
pub fn border_radius_css(style: &BlockStyle) -> Option<String> {
    if let Some(corners) = &style.border_radius_per_corner {
        let base = style.border_radius.unwrap_or(0.0);
        let pick = |c: Option<f64>| px(c.unwrap_or(base));
        return Some(format!(
            "{} {} {} {}",
            pick(corners.top_left),
            pick(corners.top_right),
            pick(corners.bottom_right),
            pick(corners.bottom_left)
        ));
    }
    style.border_radius.map(px)
}

/// Declarations for a style, in a stable order.
pub fn style_declarations(style: &BlockStyle) -> Vec<Declaration> {
    let mut out: Vec<Declaration> = Vec::new();

    // Fill
    if let Some(bg) = &style.background_color {
        out.push(("background-color", bg.clone()));
    }
    if let Some(gradient) = &style.background_gradient {
        out.push(("background-image", gradient_css(gradient)));
    } else if let Some(src) = &style.background_image {
        out.push(("background-image", format!("url(\"{src}\")")));
        out.push(("background-size", "cover".into()));
    }

    // Shape
    if let Some(radius) = border_radius_css(style) {
        out.push(("border-radius", radius));
    }

    // Typography color comes early, like a hand-written rule would
    if let Some(color) = &style.color {
        out.push(("color", color.clone()));
    }

    // Box
    if let Some(p) = &style.padding {
        out.push(("padding", p.to_css()));
    }
    if let Some(m) = &style.margin {
        out.push(("margin", m.to_css()));
    }
    if let Some(w) = &style.width {
        out.push(("width", w.to_css()));
    }
    if let Some(h) = &style.height {
        out.push(("height", h.to_css()));
    }
    if let Some(min_h) = style.min_height {
        out.push(("min-height", px(min_h)));
    }

    // Effects
    if let Some(shadow) = shadow_css(style) {
        out.push(("box-shadow", shadow));
    }
    if let Some(opacity) = style.opacity {
        out.push(("opacity", format_num(opacity)));
    }

    // Border: a stroke wins over the legacy color + width pair
    if let Some(border) = border_css(style) {
        out.push(("border", border));
    }

    // Typography
    if let Some(size) = style.font_size {
        out.push(("font-size", px(size)));
    }
    if let Some(weight) = style.font_weight {
        out.push(("font-weight", weight.numeric().to_string()));
    }
    if let Some(align) = style.text_align {
        out.push(("text-align", align.as_css().into()));
    }
    if let Some(lh) = style.line_height {
        out.push(("line-height", format_num(lh)));
    }

    // Layout
    if let Some(display) = style.display {
        out.push(("display", display.as_css().into()));
    }
    if let Some(dir) = style.flex_direction {
        out.push(("flex-direction", dir.as_css().into()));
    }
    if let Some(jc) = &style.justify_content {
        out.push(("justify-content", jc.clone()));
    }
    if let Some(ai) = &style.align_items {
        out.push(("align-items", ai.clone()));
    }
    if let Some(gap) = style.gap {
        out.push(("gap", px(gap)));
    }

    out
}

/// Style declarations plus those implied by the block's content
/// (grid column count).
pub fn block_declarations(style: &BlockStyle, content: &BlockContent) -> Vec<Declaration> {
    let mut out = style_declarations(style);
    if let BlockContent::Grid { columns } = content
        && *columns > 0
    {
        out.push(("grid-template-columns", format!("repeat({columns}, 1fr)")));
    }
    out
}

/// Absolute placement for free-form blocks: left/top from `x`/`y`
/// (default 0) and a rotation transform when rotated.
pub fn position_declarations(style: &BlockStyle) -> Vec<Declaration> {
    let mut out: Vec<Declaration> = vec![
        ("position", "absolute".into()),
        ("left", px(style.x.unwrap_or(0.0))),
        ("top", px(style.y.unwrap_or(0.0))),
    ];
    if let Some(deg) = style.rotation
        && deg != 0.0
    {
        out.push(("transform", format!("rotate({}deg)", format_num(deg))));
    }
    out
}

/// Serialize declarations as an inline style string: `a: 1px; b: red;`.
pub fn to_inline_css(decls: &[Declaration]) -> String {
    decls
        .iter()
        .map(|(prop, value)| format!("{prop}: {value};"))
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn gradient_css(gradient: &Gradient) -> String {
    let stops = |colors: &[ColorStop]| {
        colors
            .iter()
            .map(|s| format!("{} {}%", s.color, format_num(s.position)))
            .collect::<Vec<_>>()
            .join(", ")
    };
    match gradient {
        Gradient::Linear { angle, colors } => format!(
            "linear-gradient({}deg, {})",
            format_num(angle.unwrap_or(180.0)),
            stops(colors)
        ),
        Gradient::Radial { colors } => format!("radial-gradient(circle, {})", stops(colors)),
    }
}

/// `box-shadow` value: the enabled entries of `shadows`, or the single
/// `shadow` when no list is set.
pub fn shadow_css(style: &BlockStyle) -> Option<String> {
    let list: Vec<String> = match (&style.shadows, &style.shadow) {
        (Some(many), _) => many.iter().filter(|s| s.is_enabled()).map(Shadow::to_css).collect(),
        (None, Some(one)) if one.is_enabled() => vec![one.to_css()],
        _ => Vec::new(),
    };
    (!list.is_empty()).then(|| list.join(", "))
}

/// `border` shorthand from a stroke, or from the legacy color + width pair.
pub fn border_css(style: &BlockStyle) -> Option<String> {
    if let Some(stroke) = &style.stroke
        && let Some(width) = stroke.width
    {
        let line = if stroke.dash_array.as_ref().is_some_and(|d| !d.is_empty()) {
            "dashed"
        } else {
            "solid"
        };
        let raw = stroke.color.as_deref().unwrap_or("#000000");
        let color = match (stroke.opacity, Color::from_hex(raw)) {
            (Some(opacity), Some(c)) => c.to_rgba_css(opacity),
            _ => raw.to_string(),
        };
        return Some(format!("{} {line} {color}", px(width)));
    }

    match (&style.border_color, style.border_width) {
        (Some(color), Some(width)) if width > 0.0 => Some(format!("{} solid {color}", px(width))),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_style_has_no_declarations() {
        assert!(style_declarations(&BlockStyle::default()).is_empty());
        assert_eq!(to_inline_css(&[]), "");
    }

    #[test]
    fn units_and_unitless_values() {
        let style = BlockStyle {
            width: Some(Length::Pixels(300.0)),
            height: Some(Length::Auto),
            opacity: Some(0.5),
            line_height: Some(1.5),
            font_weight: Some(FontWeight::Semibold),
            font_size: Some(14.0),
            gap: Some(8.0),
            ..Default::default()
        };
        assert_eq!(
            to_inline_css(&style_declarations(&style)),
            "width: 300px; height: auto; opacity: 0.5; font-size: 14px; \
             font-weight: 600; line-height: 1.5; gap: 8px;"
        );
    }

    #[test]
    fn legacy_border_needs_both_parts() {
        let mut style = BlockStyle {
            border_color: Some("#e5e5e5".into()),
            ..Default::default()
        };
        assert_eq!(border_css(&style), None);
        style.border_width = Some(1.0);
        assert_eq!(border_css(&style).as_deref(), Some("1px solid #e5e5e5"));
    }

    #[test]
    fn stroke_wins_over_legacy_border() {
        let style = BlockStyle {
            border_color: Some("#e5e5e5".into()),
            border_width: Some(1.0),
            stroke: Some(Stroke {
                width: Some(2.0),
                color: Some("#ff0000".into()),
                opacity: Some(0.5),
                dash_array: Some(vec![4.0, 2.0]),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert_eq!(
            border_css(&style).as_deref(),
            Some("2px dashed rgba(255, 0, 0, 0.5)")
        );
    }

    #[test]
    fn shadows_skip_disabled_entries() {
        let mut off = Shadow::new(0.0, 0.0, 4.0, 0.0, "#000000", 1.0);
        off.enabled = Some(false);
        let on = Shadow::new(0.0, 1.0, 2.0, 0.0, "#000000", 0.1);
        let style = BlockStyle {
            shadows: Some(vec![off.clone(), on]),
            ..Default::default()
        };
        assert_eq!(
            shadow_css(&style).as_deref(),
            Some("0px 1px 2px 0px rgba(0, 0, 0, 0.1)")
        );

        let only_off = BlockStyle {
            shadow: Some(off),
            ..Default::default()
        };
        assert_eq!(shadow_css(&only_off), None);
    }

    #[test]
    fn per_corner_radius_falls_back_to_uniform() {
        let style = BlockStyle {
            border_radius: Some(4.0),
            border_radius_per_corner: Some(CornerRadii {
                top_left: Some(12.0),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert_eq!(
            style_declarations(&style),
            vec![("border-radius", "12px 4px 4px 4px".to_string())]
        );
    }

    #[test]
    fn gradients() {
        let linear = Gradient::Linear {
            angle: Some(90.0),
            colors: vec![
                ColorStop {
                    color: "#fff".into(),
                    position: 0.0,
                },
                ColorStop {
                    color: "#000".into(),
                    position: 100.0,
                },
            ],
        };
        assert_eq!(gradient_css(&linear), "linear-gradient(90deg, #fff 0%, #000 100%)");
    }

    #[test]
    fn grid_content_adds_columns() {
        let decls = block_declarations(&BlockStyle::default(), &BlockContent::Grid { columns: 3 });
        assert_eq!(decls, vec![("grid-template-columns", "repeat(3, 1fr)".to_string())]);
    }

    #[test]
    fn position_defaults_and_rotation() {
        let style = BlockStyle {
            x: Some(10.0),
            rotation: Some(45.0),
            ..Default::default()
        };
        assert_eq!(
            to_inline_css(&position_declarations(&style)),
            "position: absolute; left: 10px; top: 0px; transform: rotate(45deg);"
        );
    }
}
