//! Resize handles: the eight anchors around a selected block.
//!
//! Anchors are computed in screen space from the block's canvas box under
//! the current viewport, so the grab radius stays constant at any zoom.

use crate::hit::block_rect;
use crate::viewport::Viewport;
use bc_core::model::BlockStyle;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Side length of a drawn handle, in device pixels.
pub const HANDLE_SIZE: f64 = 8.0;

/// Extra grab distance beyond the handle size.
pub const HANDLE_SLACK: f64 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandlePosition {
    #[serde(rename = "tl")]
    TopLeft,
    #[serde(rename = "tr")]
    TopRight,
    #[serde(rename = "br")]
    BottomRight,
    #[serde(rename = "bl")]
    BottomLeft,
    #[serde(rename = "t")]
    Top,
    #[serde(rename = "r")]
    Right,
    #[serde(rename = "b")]
    Bottom,
    #[serde(rename = "l")]
    Left,
}

impl HandlePosition {
    /// Corners first, then edge midpoints. Hit testing checks in this order.
    pub const ALL: [HandlePosition; 8] = [
        HandlePosition::TopLeft,
        HandlePosition::TopRight,
        HandlePosition::BottomRight,
        HandlePosition::BottomLeft,
        HandlePosition::Top,
        HandlePosition::Right,
        HandlePosition::Bottom,
        HandlePosition::Left,
    ];

    /// Anchor point on `rect`.
    pub fn anchor(self, rect: Rect) -> Point {
        let cx = rect.x0 + rect.width() / 2.0;
        let cy = rect.y0 + rect.height() / 2.0;
        match self {
            HandlePosition::TopLeft => Point::new(rect.x0, rect.y0),
            HandlePosition::TopRight => Point::new(rect.x1, rect.y0),
            HandlePosition::BottomRight => Point::new(rect.x1, rect.y1),
            HandlePosition::BottomLeft => Point::new(rect.x0, rect.y1),
            HandlePosition::Top => Point::new(cx, rect.y0),
            HandlePosition::Right => Point::new(rect.x1, cy),
            HandlePosition::Bottom => Point::new(cx, rect.y1),
            HandlePosition::Left => Point::new(rect.x0, cy),
        }
    }

    /// CSS cursor for hovering this handle.
    pub fn cursor(self) -> &'static str {
        match self {
            HandlePosition::TopLeft | HandlePosition::BottomRight => "nwse-resize",
            HandlePosition::TopRight | HandlePosition::BottomLeft => "nesw-resize",
            HandlePosition::Top | HandlePosition::Bottom => "ns-resize",
            HandlePosition::Left | HandlePosition::Right => "ew-resize",
        }
    }

    /// Whether dragging this handle moves the left edge.
    pub fn moves_left(self) -> bool {
        matches!(
            self,
            HandlePosition::TopLeft | HandlePosition::BottomLeft | HandlePosition::Left
        )
    }

    /// Whether dragging this handle moves the right edge.
    pub fn moves_right(self) -> bool {
        matches!(
            self,
            HandlePosition::TopRight | HandlePosition::BottomRight | HandlePosition::Right
        )
    }

    /// Whether dragging this handle moves the top edge.
    pub fn moves_top(self) -> bool {
        matches!(
            self,
            HandlePosition::TopLeft | HandlePosition::TopRight | HandlePosition::Top
        )
    }

    /// Whether dragging this handle moves the bottom edge.
    pub fn moves_bottom(self) -> bool {
        matches!(
            self,
            HandlePosition::BottomLeft | HandlePosition::BottomRight | HandlePosition::Bottom
        )
    }
}

/// Screen-space anchors of all eight handles for a block.
pub fn handle_anchors(style: &BlockStyle, viewport: &Viewport) -> [(HandlePosition, Point); 8] {
    let screen = viewport.rect_to_screen(block_rect(style));
    HandlePosition::ALL.map(|h| (h, h.anchor(screen)))
}

/// The handle whose screen anchor lies strictly within `radius` of
/// `pointer`, or `None`. First match in [`HandlePosition::ALL`] order wins.
pub fn handle_at(
    pointer: Point,
    style: &BlockStyle,
    viewport: &Viewport,
    radius: f64,
) -> Option<HandlePosition> {
    handle_anchors(style, viewport)
        .into_iter()
        .find(|(_, anchor)| anchor.distance(pointer) < radius)
        .map(|(handle, _)| handle)
}

/// Default grab radius: handle size plus slack.
pub fn default_radius() -> f64 {
    HANDLE_SIZE + HANDLE_SLACK
}
