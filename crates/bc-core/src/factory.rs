//! Block factory: palette kind → fresh, fully defaulted `Block`.
//!
//! The defaults table is a `match` over `BlockKind`, so adding a variant
//! without defaults does not compile. Every call builds new style and
//! content values; nothing is shared between blocks.

use crate::id::BlockId;
use crate::model::*;

/// Fill used for shapes drawn on the free-form canvas.
pub const SHAPE_FILL: &str = "hsl(262 85% 65%)";

/// Brand color used by the button and navbar defaults.
pub const PRIMARY: &str = "hsl(260 90% 56%)";

pub const DEFAULT_IMAGE_SRC: &str =
    "https://images.unsplash.com/photo-1618005182384-a83a8e7b9b47?w=500&h=400&fit=crop";

const BORDER: &str = "#e5e5e5";
const WHITE: &str = "#ffffff";
const MUTED_BG: &str = "#f5f5f5";

/// Fields applied on top of the defaults. Unset fields keep the default;
/// `style` is merged, not swapped in wholesale.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockOverrides {
    pub label: Option<String>,
    pub style: Option<BlockStyle>,
    pub content: Option<BlockContent>,
    pub hidden: Option<bool>,
    pub locked: Option<bool>,
}

impl BlockOverrides {
    pub fn style(style: BlockStyle) -> Self {
        Self {
            style: Some(style),
            ..Default::default()
        }
    }
}

/// Create a block of `kind` with its palette defaults.
pub fn create_block(kind: BlockKind) -> Block {
    create_block_with(kind, BlockOverrides::default())
}

/// Create a block of `kind`, then apply `overrides` (override wins).
///
/// Content overrides that do not fit `kind` are dropped with a warning.
pub fn create_block_with(kind: BlockKind, overrides: BlockOverrides) -> Block {
    let id = BlockId::with_prefix(&kind.slug().replace('-', "_"));
    let (label, mut style, content) = defaults(kind);

    let mut block = BlockNode {
        id,
        kind,
        label: label.to_string(),
        style: BlockStyle::default(),
        content,
        hidden: false,
        locked: false,
    };

    if let Some(label) = overrides.label {
        block.label = label;
    }
    if let Some(patch) = &overrides.style {
        style.merge(patch);
    }
    block.style = style;
    if let Some(content) = overrides.content {
        if content.fits(kind) {
            block.content = content;
        } else {
            log::warn!("dropping {content:?}: does not fit a {kind} block");
        }
    }
    if let Some(hidden) = overrides.hidden {
        block.hidden = hidden;
    }
    if let Some(locked) = overrides.locked {
        block.locked = locked;
    }

    log::debug!("created {kind} block {}", block.id);
    block.with_children(Vec::new())
}

/// Parse a palette payload and create the block. Unknown slugs are an error.
pub fn create_block_from_slug(slug: &str) -> crate::error::BuilderResult<Block> {
    Ok(create_block(slug.parse()?))
}

/// Label, style, and content defaults for `kind`.
fn defaults(kind: BlockKind) -> (&'static str, BlockStyle, BlockContent) {
    let bordered = |style: BlockStyle| BlockStyle {
        border_color: Some(BORDER.into()),
        border_width: Some(1.0),
        ..style
    };

    match kind {
        BlockKind::Section => (
            "Section",
            BlockStyle {
                background_color: Some(WHITE.into()),
                padding: Some(Sides::uniform(40.0)),
                min_height: Some(300.0),
                ..Default::default()
            },
            BlockContent::None,
        ),
        BlockKind::Header => (
            "Header",
            bordered(BlockStyle {
                background_color: Some(WHITE.into()),
                padding: Some(Sides::symmetric(16.0, 24.0)),
                display: Some(Display::Flex),
                justify_content: Some("space-between".into()),
                align_items: Some("center".into()),
                ..Default::default()
            }),
            BlockContent::None,
        ),
        BlockKind::Footer => (
            "Footer",
            bordered(BlockStyle {
                background_color: Some(MUTED_BG.into()),
                padding: Some(Sides::symmetric(40.0, 24.0)),
                ..Default::default()
            }),
            BlockContent::None,
        ),
        BlockKind::Card => (
            "Card",
            bordered(BlockStyle {
                background_color: Some(WHITE.into()),
                border_radius: Some(10.0),
                padding: Some(Sides::uniform(24.0)),
                width: Some(Length::Pixels(300.0)),
                min_height: Some(200.0),
                shadow: Some(Shadow::new(0.0, 2.0, 8.0, 0.0, "#000000", 0.04)),
                ..Default::default()
            }),
            BlockContent::None,
        ),
        BlockKind::Button => (
            "Button",
            BlockStyle {
                background_color: Some(PRIMARY.into()),
                color: Some(WHITE.into()),
                padding: Some(Sides::symmetric(10.0, 20.0)),
                border_radius: Some(6.0),
                width: Some(Length::Auto),
                height: Some(Length::Auto),
                ..Default::default()
            },
            BlockContent::Button {
                text: "Click me".into(),
            },
        ),
        BlockKind::Input => (
            "Input",
            BlockStyle {
                background_color: Some(WHITE.into()),
                border_color: Some("#d5d5d5".into()),
                border_width: Some(1.0),
                border_radius: Some(6.0),
                padding: Some(Sides::symmetric(10.0, 12.0)),
                width: Some(Length::Percent(100.0)),
                height: Some(Length::Pixels(40.0)),
                ..Default::default()
            },
            BlockContent::Input {
                placeholder: "Enter text...".into(),
            },
        ),
        BlockKind::Form => (
            "Form",
            BlockStyle {
                display: Some(Display::Flex),
                flex_direction: Some(FlexDirection::Column),
                gap: Some(16.0),
                width: Some(Length::Pixels(400.0)),
                ..Default::default()
            },
            BlockContent::None,
        ),
        BlockKind::Navbar => (
            "Navbar",
            BlockStyle {
                background_color: Some(PRIMARY.into()),
                color: Some(WHITE.into()),
                padding: Some(Sides::symmetric(12.0, 24.0)),
                display: Some(Display::Flex),
                justify_content: Some("space-between".into()),
                align_items: Some("center".into()),
                ..Default::default()
            },
            BlockContent::None,
        ),
        BlockKind::Modal => (
            "Modal",
            BlockStyle {
                background_color: Some(WHITE.into()),
                border_radius: Some(12.0),
                padding: Some(Sides::uniform(32.0)),
                width: Some(Length::Pixels(500.0)),
                shadow: Some(Shadow::new(0.0, 20.0, 40.0, 0.0, "#000000", 0.2)),
                ..Default::default()
            },
            BlockContent::None,
        ),
        BlockKind::Sidebar => (
            "Sidebar",
            bordered(BlockStyle {
                background_color: Some(MUTED_BG.into()),
                padding: Some(Sides::symmetric(24.0, 16.0)),
                width: Some(Length::Pixels(250.0)),
                min_height: Some(600.0),
                ..Default::default()
            }),
            BlockContent::None,
        ),
        BlockKind::List => (
            "List",
            BlockStyle {
                display: Some(Display::Flex),
                flex_direction: Some(FlexDirection::Column),
                gap: Some(8.0),
                width: Some(Length::Percent(100.0)),
                ..Default::default()
            },
            BlockContent::None,
        ),
        BlockKind::Text => (
            "Text",
            BlockStyle {
                color: Some("#000000".into()),
                font_size: Some(16.0),
                ..Default::default()
            },
            BlockContent::Text {
                text: "Your text here".into(),
            },
        ),
        BlockKind::Image => (
            "Image",
            BlockStyle {
                width: Some(Length::Pixels(300.0)),
                height: Some(Length::Pixels(200.0)),
                border_radius: Some(8.0),
                ..Default::default()
            },
            BlockContent::Image {
                src: DEFAULT_IMAGE_SRC.into(),
            },
        ),
        BlockKind::Grid => (
            "Grid",
            BlockStyle {
                display: Some(Display::Grid),
                gap: Some(16.0),
                width: Some(Length::Percent(100.0)),
                ..Default::default()
            },
            BlockContent::Grid { columns: 3 },
        ),
        BlockKind::FlexContainer => (
            "Flex Container",
            BlockStyle {
                display: Some(Display::Flex),
                gap: Some(16.0),
                width: Some(Length::Percent(100.0)),
                ..Default::default()
            },
            BlockContent::None,
        ),

        // Free-form canvas shapes
        BlockKind::Frame => (
            "Frame",
            bordered(BlockStyle {
                background_color: Some(WHITE.into()),
                ..BlockStyle::geometry(0.0, 0.0, 400.0, 300.0)
            }),
            BlockContent::None,
        ),
        BlockKind::Rectangle => (
            "Rectangle",
            BlockStyle {
                background_color: Some(SHAPE_FILL.into()),
                border_radius: Some(4.0),
                ..BlockStyle::geometry(0.0, 0.0, 100.0, 100.0)
            },
            BlockContent::None,
        ),
        BlockKind::Circle => (
            "Circle",
            BlockStyle {
                background_color: Some(SHAPE_FILL.into()),
                border_radius: Some(50.0),
                ..BlockStyle::geometry(0.0, 0.0, 100.0, 100.0)
            },
            BlockContent::None,
        ),
        BlockKind::ShapeText => (
            "Text",
            BlockStyle {
                color: Some("#000000".into()),
                font_size: Some(16.0),
                ..BlockStyle::geometry(0.0, 0.0, 160.0, 40.0)
            },
            BlockContent::ShapeText {
                text: "Text".into(),
            },
        ),
    }
}
