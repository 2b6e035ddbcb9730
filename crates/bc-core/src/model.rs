//! Core block-tree data model.
//!
//! A canvas is an ordered forest of `Block` values. Each block carries a
//! closed `BlockKind`, an all-optional `BlockStyle`, kind-specific
//! `BlockContent`, and its children in paint order. Sibling order is the only
//! ordering signal: later siblings paint on top and come later in the document.

use crate::error::BuilderError;
use crate::id::BlockId;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

// ─── Colors ──────────────────────────────────────────────────────────────

/// RGBA color. Stored as 4 × f32 [0.0, 1.0].
///
/// Style attributes keep author colors as CSS strings (`#fff`,
/// `hsl(260 90% 56%)`); this type is only used where a color has to be
/// combined with a separate opacity, e.g. shadows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

/// Helper to parse a single hex digit.
pub fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl Color {
    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Parse a hex color string: `#RGB`, `#RGBA`, `#RRGGBB`, `#RRGGBBAA`.
    /// The string may optionally start with `#`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let bytes = hex.as_bytes();

        let short = |i: usize| hex_val(bytes[i]).map(|v| (v * 17) as f32 / 255.0);
        let long = |i: usize| -> Option<f32> {
            Some((hex_val(bytes[i])? << 4 | hex_val(bytes[i + 1])?) as f32 / 255.0)
        };

        match bytes.len() {
            3 => Some(Self::rgba(short(0)?, short(1)?, short(2)?, 1.0)),
            4 => Some(Self::rgba(short(0)?, short(1)?, short(2)?, short(3)?)),
            6 => Some(Self::rgba(long(0)?, long(2)?, long(4)?, 1.0)),
            8 => Some(Self::rgba(long(0)?, long(2)?, long(4)?, long(6)?)),
            _ => None,
        }
    }

    /// Emit as a CSS `rgba()` value with the alpha scaled by `opacity`.
    pub fn to_rgba_css(&self, opacity: f64) -> String {
        let alpha = (f64::from(self.a) * opacity).clamp(0.0, 1.0);
        format!(
            "rgba({}, {}, {}, {})",
            (self.r * 255.0).round() as u8,
            (self.g * 255.0).round() as u8,
            (self.b * 255.0).round() as u8,
            format_num(alpha)
        )
    }
}

/// Format a number without a trailing `.0` (`10`, `0.5`, `12.25`).
pub fn format_num(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        let s = format!("{v:.4}");
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

// ─── Lengths & spacing ───────────────────────────────────────────────────

/// A width or height: pixels, `auto`, or a percentage of the container.
///
/// Serialized the way a properties panel writes it: a bare number for
/// pixels, `"auto"`, or `"50%"`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Length {
    Pixels(f64),
    Auto,
    Percent(f64),
}

impl Length {
    /// Pixel value, if this length is numeric.
    pub fn as_pixels(&self) -> Option<f64> {
        match self {
            Length::Pixels(v) => Some(*v),
            Length::Auto | Length::Percent(_) => None,
        }
    }

    /// CSS value with units (`300px`, `auto`, `100%`).
    pub fn to_css(&self) -> String {
        match self {
            Length::Pixels(v) => format!("{}px", format_num(*v)),
            Length::Auto => "auto".to_string(),
            Length::Percent(p) => format!("{}%", format_num(*p)),
        }
    }
}

impl From<f64> for Length {
    fn from(v: f64) -> Self {
        Length::Pixels(v)
    }
}

impl FromStr for Length {
    type Err = BuilderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::input::try_parse_length(s).ok_or_else(|| BuilderError::InvalidLength(s.to_string()))
    }
}

impl Serialize for Length {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Length::Pixels(v) => serializer.serialize_f64(*v),
            other => serializer.serialize_str(&other.to_css()),
        }
    }
}

impl<'de> Deserialize<'de> for Length {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(f64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(v) => Ok(Length::Pixels(v)),
            Raw::Text(s) => s.parse().map_err(de::Error::custom),
        }
    }
}

/// Four-sided spacing record (padding / margin), in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Sides {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Sides {
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    pub const fn uniform(v: f64) -> Self {
        Self::new(v, v, v, v)
    }

    /// Vertical / horizontal pair, like the two-value CSS shorthand.
    pub const fn symmetric(vertical: f64, horizontal: f64) -> Self {
        Self::new(vertical, horizontal, vertical, horizontal)
    }

    pub fn to_css(&self) -> String {
        format!(
            "{}px {}px {}px {}px",
            format_num(self.top),
            format_num(self.right),
            format_num(self.bottom),
            format_num(self.left)
        )
    }
}

/// Per-corner radii. Unset corners fall back to `border_radius` (or 0).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CornerRadii {
    pub top_left: Option<f64>,
    pub top_right: Option<f64>,
    pub bottom_right: Option<f64>,
    pub bottom_left: Option<f64>,
}

// ─── Fill, stroke, shadow ────────────────────────────────────────────────

/// A gradient stop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    pub color: String,
    /// Percentage along the gradient line, 0..100.
    pub position: f64,
}

/// Background gradient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Gradient {
    Linear {
        /// Degrees; CSS default is 180 (top → bottom).
        #[serde(default)]
        angle: Option<f64>,
        colors: Vec<ColorStop>,
    },
    Radial {
        colors: Vec<ColorStop>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrokePosition {
    Inside,
    #[default]
    Center,
    Outside,
}

/// Border stroke of the free-form variant.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Stroke {
    pub width: Option<f64>,
    pub color: Option<String>,
    pub opacity: Option<f64>,
    pub position: Option<StrokePosition>,
    pub dash_array: Option<Vec<f64>>,
}

/// Drop shadow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shadow {
    pub x: f64,
    pub y: f64,
    pub blur: f64,
    pub spread: f64,
    pub color: String,
    pub opacity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

impl Shadow {
    pub fn new(x: f64, y: f64, blur: f64, spread: f64, color: &str, opacity: f64) -> Self {
        Self {
            x,
            y,
            blur,
            spread,
            color: color.to_string(),
            opacity,
            enabled: None,
        }
    }

    /// Shadows are on unless explicitly disabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }

    /// CSS `box-shadow` value. Hex colors are combined with `opacity`;
    /// any other color notation falls back to black at `opacity`.
    pub fn to_css(&self) -> String {
        let color = Color::from_hex(&self.color).unwrap_or(Color::BLACK);
        format!(
            "{}px {}px {}px {}px {}",
            format_num(self.x),
            format_num(self.y),
            format_num(self.blur),
            format_num(self.spread),
            color.to_rgba_css(self.opacity)
        )
    }
}

// ─── Typography & layout enums ───────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    Normal,
    Medium,
    Semibold,
    Bold,
}

impl FontWeight {
    /// Numeric CSS weight.
    pub fn numeric(self) -> u16 {
        match self {
            FontWeight::Normal => 400,
            FontWeight::Medium => 500,
            FontWeight::Semibold => 600,
            FontWeight::Bold => 700,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

impl TextAlign {
    pub fn as_css(self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Display {
    Flex,
    Grid,
    Block,
}

impl Display {
    pub fn as_css(self) -> &'static str {
        match self {
            Display::Flex => "flex",
            Display::Grid => "grid",
            Display::Block => "block",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlexDirection {
    Row,
    Column,
}

impl FlexDirection {
    pub fn as_css(self) -> &'static str {
        match self {
            FlexDirection::Row => "row",
            FlexDirection::Column => "column",
        }
    }
}

// ─── Style ───────────────────────────────────────────────────────────────

/// Visual attributes of a block. Every field is optional; `None` means
/// "unset: inherit or use the author default", never an override.
///
/// The same struct doubles as a partial update: merging copies only the
/// `Some` fields of the patch.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BlockStyle {
    // Geometry (free-form absolute positioning, or flow sizing)
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<Length>,
    pub height: Option<Length>,
    pub min_height: Option<f64>,
    pub rotation: Option<f64>,

    // Spacing
    pub padding: Option<Sides>,
    pub margin: Option<Sides>,

    // Fill
    pub background_color: Option<String>,
    pub background_gradient: Option<Gradient>,
    pub background_image: Option<String>,

    // Border
    pub border_radius: Option<f64>,
    pub border_radius_per_corner: Option<CornerRadii>,
    pub stroke: Option<Stroke>,
    pub border_color: Option<String>,
    pub border_width: Option<f64>,

    // Effects
    pub shadow: Option<Shadow>,
    pub shadows: Option<Vec<Shadow>>,
    pub opacity: Option<f64>,

    // Typography
    pub color: Option<String>,
    pub font_size: Option<f64>,
    pub font_weight: Option<FontWeight>,
    pub text_align: Option<TextAlign>,
    pub line_height: Option<f64>,

    // Flex & grid
    pub display: Option<Display>,
    pub flex_direction: Option<FlexDirection>,
    pub justify_content: Option<String>,
    pub align_items: Option<String>,
    pub gap: Option<f64>,
}

macro_rules! merge_fields {
    ($dst:ident, $src:ident; $($field:ident),+ $(,)?) => {
        $(
            if $src.$field.is_some() {
                $dst.$field = $src.$field.clone();
            }
        )+
    };
}

impl BlockStyle {
    /// Merge `patch` into `self`, overwriting only the fields the patch sets.
    /// Applying the same patch twice is the same as applying it once.
    pub fn merge(&mut self, patch: &BlockStyle) {
        merge_fields!(self, patch;
            x, y, width, height, min_height, rotation,
            padding, margin,
            background_color, background_gradient, background_image,
            border_radius, border_radius_per_corner, stroke, border_color, border_width,
            shadow, shadows, opacity,
            color, font_size, font_weight, text_align, line_height,
            display, flex_direction, justify_content, align_items, gap,
        );
    }

    /// `self` with `patch` merged on top.
    #[must_use]
    pub fn merged(mut self, patch: &BlockStyle) -> Self {
        self.merge(patch);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == BlockStyle::default()
    }

    /// Free-form geometry patch: position and pixel size.
    pub fn geometry(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            width: Some(Length::Pixels(width)),
            height: Some(Length::Pixels(height)),
            ..Default::default()
        }
    }

    /// Position-only patch.
    pub fn position(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Default::default()
        }
    }
}

// ─── Block kinds & content ───────────────────────────────────────────────

/// The closed set of block variants. The first fifteen are flow-layout
/// primitives; the last four belong to the free-form canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlockKind {
    Section,
    Header,
    Footer,
    Card,
    Button,
    Input,
    Form,
    Navbar,
    Modal,
    Sidebar,
    List,
    Text,
    Image,
    Grid,
    FlexContainer,
    Frame,
    Rectangle,
    Circle,
    ShapeText,
}

impl BlockKind {
    pub const ALL: [BlockKind; 19] = [
        BlockKind::Section,
        BlockKind::Header,
        BlockKind::Footer,
        BlockKind::Card,
        BlockKind::Button,
        BlockKind::Input,
        BlockKind::Form,
        BlockKind::Navbar,
        BlockKind::Modal,
        BlockKind::Sidebar,
        BlockKind::List,
        BlockKind::Text,
        BlockKind::Image,
        BlockKind::Grid,
        BlockKind::FlexContainer,
        BlockKind::Frame,
        BlockKind::Rectangle,
        BlockKind::Circle,
        BlockKind::ShapeText,
    ];

    /// Kebab-case name used by palettes and serialized documents.
    pub fn slug(self) -> &'static str {
        match self {
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
            BlockKind::Text => "text",
            BlockKind::Image => "image",
            BlockKind::Grid => "grid",
            BlockKind::FlexContainer => "flex-container",
            BlockKind::Frame => "frame",
            BlockKind::Rectangle => "rectangle",
            BlockKind::Circle => "circle",
            BlockKind::ShapeText => "shape-text",
        }
    }

    /// Title-cased slug: `flex-container` → `Flex Container`.
    pub fn display_name(self) -> String {
        self.slug()
            .split('-')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Kinds only drawn on the free-form canvas.
    pub fn is_free_form(self) -> bool {
        matches!(
            self,
            BlockKind::Frame | BlockKind::Rectangle | BlockKind::Circle | BlockKind::ShapeText
        )
    }

    /// Kinds that render as replaced content instead of a child container.
    pub fn is_leaf_content(self) -> bool {
        matches!(
            self,
            BlockKind::Text | BlockKind::Button | BlockKind::Input | BlockKind::Image
        )
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for BlockKind {
    type Err = BuilderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BlockKind::ALL
            .into_iter()
            .find(|kind| kind.slug() == s)
            .ok_or_else(|| BuilderError::UnknownBlockKind(s.to_string()))
    }
}

/// Kind-specific content. Each variant carries only what its kind supports.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum BlockContent {
    #[default]
    None,
    Text {
        text: String,
    },
    Button {
        text: String,
    },
    Input {
        placeholder: String,
    },
    Image {
        src: String,
    },
    Grid {
        columns: u32,
    },
    ShapeText {
        text: String,
    },
}

impl BlockContent {
    /// Whether this content may be attached to a block of `kind`.
    pub fn fits(&self, kind: BlockKind) -> bool {
        match self {
            BlockContent::None => !matches!(
                kind,
                BlockKind::Text
                    | BlockKind::Button
                    | BlockKind::Input
                    | BlockKind::Image
                    | BlockKind::Grid
                    | BlockKind::ShapeText
            ),
            BlockContent::Text { .. } => kind == BlockKind::Text,
            BlockContent::Button { .. } => kind == BlockKind::Button,
            BlockContent::Input { .. } => kind == BlockKind::Input,
            BlockContent::Image { .. } => kind == BlockKind::Image,
            BlockContent::Grid { .. } => kind == BlockKind::Grid,
            BlockContent::ShapeText { .. } => kind == BlockKind::ShapeText,
        }
    }

    /// Display text for text-bearing content.
    pub fn text(&self) -> Option<&str> {
        match self {
            BlockContent::Text { text }
            | BlockContent::Button { text }
            | BlockContent::ShapeText { text } => Some(text),
            _ => None,
        }
    }
}

// ─── Blocks ──────────────────────────────────────────────────────────────

/// A block's own fields, without its children. This is what the tree store
/// keeps per arena slot; `Block` is the owned, nested form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockNode {
    pub id: BlockId,
    pub kind: BlockKind,
    pub label: String,
    #[serde(default)]
    pub style: BlockStyle,
    #[serde(default)]
    pub content: BlockContent,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub locked: bool,
}

impl BlockNode {
    pub fn new(id: BlockId, kind: BlockKind) -> Self {
        Self {
            id,
            kind,
            label: kind.display_name(),
            style: BlockStyle::default(),
            content: BlockContent::None,
            hidden: false,
            locked: false,
        }
    }

    /// Attach children, producing the nested form.
    pub fn with_children(self, children: Vec<Block>) -> Block {
        Block {
            id: self.id,
            kind: self.kind,
            label: self.label,
            style: self.style,
            content: self.content,
            hidden: self.hidden,
            locked: self.locked,
            children,
        }
    }
}

/// A node of the design tree together with its subtree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,
    pub kind: BlockKind,
    pub label: String,
    #[serde(default)]
    pub style: BlockStyle,
    #[serde(default)]
    pub content: BlockContent,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub children: Vec<Block>,
}

impl Block {
    /// A bare block of `kind` with the given id and no defaults applied.
    /// Use `factory::create_block` for palette-ready blocks.
    pub fn new(id: BlockId, kind: BlockKind) -> Self {
        BlockNode::new(id, kind).with_children(Vec::new())
    }

    #[must_use]
    pub fn with_child(mut self, child: Block) -> Self {
        self.children.push(child);
        self
    }

    /// Split into the node's own fields and its children.
    pub fn into_parts(self) -> (BlockNode, Vec<Block>) {
        let node = BlockNode {
            id: self.id,
            kind: self.kind,
            label: self.label,
            style: self.style,
            content: self.content,
            hidden: self.hidden,
            locked: self.locked,
        };
        (node, self.children)
    }

    /// Pre-order iterator over this block and all its descendants.
    pub fn iter(&self) -> impl Iterator<Item = &Block> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let next = stack.pop()?;
            stack.extend(next.children.iter().rev());
            Some(next)
        })
    }

    /// All ids in this subtree, pre-order.
    pub fn ids(&self) -> Vec<BlockId> {
        self.iter().map(|b| b.id).collect()
    }

    /// Number of nodes strictly below this block.
    pub fn descendant_count(&self) -> usize {
        self.iter().count() - 1
    }

    /// Depth-first search in this subtree.
    pub fn find(&self, id: BlockId) -> Option<&Block> {
        self.iter().find(|b| b.id == id)
    }
}

// ─── Canvas ──────────────────────────────────────────────────────────────

/// One step of a type scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeScale {
    pub size: f64,
    pub weight: u16,
    pub line_height: f64,
}

/// Named suggestions offered by pickers. Never enforced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignTokens {
    pub colors: BTreeMap<String, String>,
    pub spacing: BTreeMap<String, f64>,
    pub radius: BTreeMap<String, f64>,
    pub typography: BTreeMap<String, TypeScale>,
}

impl Default for DesignTokens {
    fn default() -> Self {
        let colors = [
            ("primary", "hsl(260 90% 56%)"),
            ("secondary", "hsl(0 0% 96%)"),
            ("accent", "hsl(260 90% 56%)"),
            ("background", "hsl(0 0% 100%)"),
            ("foreground", "hsl(12 8% 8%)"),
            ("muted", "hsl(0 0% 91%)"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let spacing = [
            ("xs", 4.0),
            ("sm", 8.0),
            ("md", 16.0),
            ("lg", 24.0),
            ("xl", 32.0),
            ("2xl", 48.0),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        let radius = [("none", 0.0), ("sm", 4.0), ("md", 10.0), ("lg", 16.0)]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();

        let typography = [
            ("heading", TypeScale { size: 32.0, weight: 700, line_height: 1.2 }),
            ("body", TypeScale { size: 16.0, weight: 400, line_height: 1.5 }),
            ("caption", TypeScale { size: 12.0, weight: 500, line_height: 1.4 }),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        Self {
            colors,
            spacing,
            radius,
            typography,
        }
    }
}

/// The root document: an ordered forest of blocks plus shared tokens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Canvas {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub blocks: Vec<Block>,
    #[serde(default)]
    pub design_tokens: DesignTokens,
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
}

impl Canvas {
    pub fn new(name: &str) -> Self {
        Self {
            id: BlockId::with_prefix("canvas").to_string(),
            name: name.to_string(),
            blocks: Vec::new(),
            design_tokens: DesignTokens::default(),
            width: Some(1200.0),
            height: None,
        }
    }

    /// Pre-order iterator over every block in the forest.
    pub fn iter(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter().flat_map(|b| b.iter())
    }

    pub fn find(&self, id: BlockId) -> Option<&Block> {
        self.iter().find(|b| b.id == id)
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new("My Project")
    }
}

// ─── Selection & patches ─────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionKind {
    #[default]
    Block,
}

/// A lookup key for the selected block. Never assumed valid: always
/// re-resolve it against the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedElement {
    pub id: BlockId,
    #[serde(rename = "type", default)]
    pub kind: SelectionKind,
}

impl SelectedElement {
    pub fn block(id: BlockId) -> Self {
        Self {
            id,
            kind: SelectionKind::Block,
        }
    }
}

/// Partial update of a block's non-style fields.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockPatch {
    pub label: Option<String>,
    pub hidden: Option<bool>,
    pub locked: Option<bool>,
    pub content: Option<BlockContent>,
}

impl BlockPatch {
    pub fn label(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Default::default()
        }
    }

    pub fn content(content: BlockContent) -> Self {
        Self {
            content: Some(content),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn color_from_hex_variants() {
        let c = Color::from_hex("#6C5CE7").unwrap();
        assert!((c.r - 108.0 / 255.0).abs() < 0.001);
        assert_eq!(c.a, 1.0);

        let short = Color::from_hex("fff").unwrap();
        assert_eq!(short, Color::rgba(1.0, 1.0, 1.0, 1.0));

        let with_alpha = Color::from_hex("#FF000080").unwrap();
        assert!((with_alpha.a - 128.0 / 255.0).abs() < 0.01);

        assert!(Color::from_hex("hsl(260 90% 56%)").is_none());
        assert!(Color::from_hex("#12345").is_none());
    }

    #[test]
    fn format_num_trims_trailing_zeros() {
        assert_eq!(format_num(10.0), "10");
        assert_eq!(format_num(0.5), "0.5");
        assert_eq!(format_num(-4.0), "-4");
        assert_eq!(format_num(1.0 / 3.0), "0.3333");
    }

    #[test]
    fn shadow_css_uses_hex_color_and_opacity() {
        let s = Shadow::new(0.0, 2.0, 8.0, 0.0, "#000000", 0.04);
        assert_eq!(s.to_css(), "0px 2px 8px 0px rgba(0, 0, 0, 0.04)");

        let tinted = Shadow::new(1.0, 1.0, 0.0, 0.0, "#ff0000", 0.5);
        assert_eq!(tinted.to_css(), "1px 1px 0px 0px rgba(255, 0, 0, 0.5)");
    }

    #[test]
    fn length_css_and_serde() {
        assert_eq!(Length::Pixels(300.0).to_css(), "300px");
        assert_eq!(Length::Auto.to_css(), "auto");
        assert_eq!(Length::Percent(100.0).to_css(), "100%");

        let json = serde_json::to_string(&vec![
            Length::Pixels(40.0),
            Length::Auto,
            Length::Percent(50.0),
        ])
        .unwrap();
        assert_eq!(json, r#"[40.0,"auto","50%"]"#);

        let back: Vec<Length> = serde_json::from_str(r#"[12, "auto", "25%", "8px"]"#).unwrap();
        assert_eq!(
            back,
            vec![
                Length::Pixels(12.0),
                Length::Auto,
                Length::Percent(25.0),
                Length::Pixels(8.0)
            ]
        );
        assert!(serde_json::from_str::<Length>(r#""wide""#).is_err());
    }

    #[test]
    fn style_merge_overwrites_only_set_fields() {
        let mut style = BlockStyle {
            background_color: Some("#fff".into()),
            font_size: Some(16.0),
            ..Default::default()
        };
        let patch = BlockStyle {
            font_size: Some(24.0),
            gap: Some(8.0),
            ..Default::default()
        };
        style.merge(&patch);

        assert_eq!(style.background_color.as_deref(), Some("#fff"));
        assert_eq!(style.font_size, Some(24.0));
        assert_eq!(style.gap, Some(8.0));
    }

    #[test]
    fn style_merge_is_idempotent() {
        let base = BlockStyle {
            padding: Some(Sides::uniform(4.0)),
            ..Default::default()
        };
        let patch = BlockStyle {
            padding: Some(Sides::symmetric(10.0, 20.0)),
            width: Some(Length::Auto),
            ..Default::default()
        };
        let once = base.clone().merged(&patch);
        let twice = base.merged(&patch).merged(&patch);
        assert_eq!(once, twice);
    }

    #[test]
    fn style_deserializes_partial_camel_case() {
        let style: BlockStyle =
            serde_json::from_str(r##"{"backgroundColor":"#000","fontWeight":"semibold","width":"100%"}"##)
                .unwrap();
        assert_eq!(style.background_color.as_deref(), Some("#000"));
        assert_eq!(style.font_weight, Some(FontWeight::Semibold));
        assert_eq!(style.width, Some(Length::Percent(100.0)));
        assert!(style.x.is_none());
    }

    #[test]
    fn kind_slugs_roundtrip() {
        for kind in BlockKind::ALL {
            assert_eq!(kind.slug().parse::<BlockKind>().unwrap(), kind);
        }
        assert_eq!(BlockKind::FlexContainer.display_name(), "Flex Container");
        assert_eq!(BlockKind::ShapeText.display_name(), "Shape Text");
        assert!(matches!(
            "carousel".parse::<BlockKind>(),
            Err(BuilderError::UnknownBlockKind(s)) if s == "carousel"
        ));
    }

    #[test]
    fn content_fits_only_its_kind() {
        let text = BlockContent::Text { text: "hi".into() };
        assert!(text.fits(BlockKind::Text));
        assert!(!text.fits(BlockKind::Button));
        assert!(BlockContent::None.fits(BlockKind::Section));
        assert!(!BlockContent::None.fits(BlockKind::Image));
    }

    #[test]
    fn block_iter_is_pre_order() {
        let tree = Block::new(BlockId::intern("m_root"), BlockKind::Section)
            .with_child(
                Block::new(BlockId::intern("m_a"), BlockKind::Card)
                    .with_child(Block::new(BlockId::intern("m_a1"), BlockKind::Text)),
            )
            .with_child(Block::new(BlockId::intern("m_b"), BlockKind::Button));

        let names: Vec<&str> = tree.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(names, vec!["m_root", "m_a", "m_a1", "m_b"]);
        assert_eq!(tree.descendant_count(), 3);
        assert_eq!(tree.find(BlockId::intern("m_a1")).unwrap().kind, BlockKind::Text);
    }

    #[test]
    fn design_tokens_defaults() {
        let tokens = DesignTokens::default();
        assert_eq!(tokens.colors["primary"], "hsl(260 90% 56%)");
        assert_eq!(tokens.spacing["2xl"], 48.0);
        assert_eq!(tokens.typography["heading"].weight, 700);
    }
}
