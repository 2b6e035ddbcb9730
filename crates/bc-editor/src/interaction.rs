//! Pointer gesture state machine for the free-form canvas.
//!
//! One gesture is active at a time. Pointer events drive the transitions and
//! produce `BlockMutation`s; the caller applies them to the store. Panning is
//! the only gesture that touches the viewport directly.
//!
//! ```text
//! Idle ──down──▶ Panning | Resizing | Dragging | Creating
//!   ▲                          │
//!   └──────── up / leave ──────┘
//! ```

use crate::config::InteractionConfig;
use crate::input::InputEvent;
use crate::tools::ToolKind;
use bc_core::factory::{BlockOverrides, create_block_with};
use bc_core::id::BlockId;
use bc_core::model::{BlockKind, BlockStyle};
use bc_core::store::{BlockMutation, TreeStore};
use bc_render::{
    HandlePosition, Point, Rect, Vec2, Viewport, block_rect, find_block_at_position, handle_at,
};

// ─── Geometry ────────────────────────────────────────────────────────────

/// Convert a screen-space pointer delta into canvas units at `zoom` percent.
pub fn scale_delta(delta: Vec2, zoom: f64) -> Vec2 {
    delta * (100.0 / zoom)
}

/// New box for a resize that started at `start`, after the pointer moved
/// `delta` canvas units while holding `handle`.
///
/// Sides are floored at `min_size`. Dragged left and top edges move while
/// the opposite edge stays put, clamped or not.
pub fn resize_geometry(start: Rect, handle: HandlePosition, delta: Vec2, min_size: f64) -> Rect {
    let (mut x, mut width) = (start.x0, start.width());
    let (mut y, mut height) = (start.y0, start.height());

    if handle.moves_right() {
        width = (start.width() + delta.x).max(min_size);
    }
    if handle.moves_left() {
        width = (start.width() - delta.x).max(min_size);
        x = start.x0 + start.width() - width;
    }
    if handle.moves_bottom() {
        height = (start.height() + delta.y).max(min_size);
    }
    if handle.moves_top() {
        height = (start.height() - delta.y).max(min_size);
        y = start.y0 + start.height() - height;
    }

    Rect::from_origin_size((x, y), (width, height))
}

/// Normalized box spanned by a drag from `start` to `end`, in any direction.
pub fn creation_rect(start: Point, end: Point) -> Rect {
    Rect::from_points(start, end)
}

fn geometry_style(rect: Rect) -> BlockStyle {
    BlockStyle::geometry(rect.x0, rect.y0, rect.width(), rect.height())
}

// ─── Gesture ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    /// Screen-space drag of the viewport.
    Panning { last: Point },
    /// Moving a block. `last` is the previous pointer position on screen.
    Dragging { id: BlockId, last: Point },
    /// Resizing a block from the geometry it had when the gesture began.
    Resizing {
        id: BlockId,
        handle: HandlePosition,
        start_pointer: Point,
        start: Rect,
    },
    /// Drawing a new block. Points are in canvas space.
    Creating {
        kind: BlockKind,
        start: Point,
        current: Point,
    },
}

impl Gesture {
    pub fn name(&self) -> &'static str {
        match self {
            Gesture::Idle => "idle",
            Gesture::Panning { .. } => "panning",
            Gesture::Dragging { .. } => "dragging",
            Gesture::Resizing { .. } => "resizing",
            Gesture::Creating { .. } => "creating",
        }
    }

    /// CSS cursor the canvas should show while this gesture is active.
    pub fn cursor(&self) -> &'static str {
        match self {
            Gesture::Idle => "default",
            Gesture::Panning { .. } => "grabbing",
            Gesture::Dragging { .. } => "move",
            Gesture::Resizing { handle, .. } => handle.cursor(),
            Gesture::Creating { .. } => "crosshair",
        }
    }
}

/// What a gesture needs to see of the editor.
pub struct GestureContext<'a> {
    pub store: &'a TreeStore,
    pub viewport: &'a mut Viewport,
    pub tool: ToolKind,
    /// Temporary hand tool (space held).
    pub pan_key: bool,
    pub config: &'a InteractionConfig,
}

// ─── State machine ───────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct Interaction {
    gesture: Gesture,
}

impl Interaction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    /// Abort the active gesture. Already-applied moves and resizes stay.
    pub fn cancel(&mut self) {
        self.set(Gesture::Idle);
    }

    /// Canvas-space box of the block being drawn, if any.
    pub fn creation_preview(&self) -> Option<Rect> {
        match self.gesture {
            Gesture::Creating { start, current, .. } => Some(creation_rect(start, current)),
            _ => None,
        }
    }

    /// Feed one pointer event. Wheel and keyboard events are ignored here.
    pub fn handle(&mut self, event: &InputEvent, cx: &mut GestureContext<'_>) -> Vec<BlockMutation> {
        match event {
            InputEvent::PointerDown { x, y, .. } => self.pointer_down(Point::new(*x, *y), cx),
            InputEvent::PointerMove { x, y, .. } => self.pointer_move(Point::new(*x, *y), cx),
            InputEvent::PointerUp { x, y, .. } => self.pointer_up(Point::new(*x, *y), cx),
            InputEvent::PointerLeave => {
                self.cancel();
                vec![]
            }
            _ => vec![],
        }
    }

    fn set(&mut self, gesture: Gesture) {
        if self.gesture.name() != gesture.name() {
            log::trace!("gesture {} -> {}", self.gesture.name(), gesture.name());
        }
        self.gesture = gesture;
    }

    fn pointer_down(&mut self, pointer: Point, cx: &mut GestureContext<'_>) -> Vec<BlockMutation> {
        if cx.pan_key {
            self.set(Gesture::Panning { last: pointer });
            return vec![];
        }

        if let Some(selected) = cx.store.selected_block() {
            if !selected.locked && !selected.hidden {
                let radius = cx.config.handle_radius();
                if let Some(handle) = handle_at(pointer, &selected.style, cx.viewport, radius) {
                    self.set(Gesture::Resizing {
                        id: selected.id,
                        handle,
                        start_pointer: pointer,
                        start: block_rect(&selected.style),
                    });
                    return vec![];
                }
            }
        }

        let canvas = cx.viewport.to_canvas(pointer);
        let blocks = cx.store.blocks();
        if let Some(hit) = find_block_at_position(&blocks, canvas.x, canvas.y) {
            if !hit.locked {
                self.set(Gesture::Dragging {
                    id: hit.id,
                    last: pointer,
                });
            }
            return vec![BlockMutation::Select { id: Some(hit.id) }];
        }

        match cx.tool.creates() {
            Some(kind) => {
                self.set(Gesture::Creating {
                    kind,
                    start: canvas,
                    current: canvas,
                });
                vec![]
            }
            None if cx.tool == ToolKind::Select => vec![BlockMutation::Select { id: None }],
            None => vec![],
        }
    }

    fn pointer_move(&mut self, pointer: Point, cx: &mut GestureContext<'_>) -> Vec<BlockMutation> {
        match self.gesture {
            Gesture::Idle => vec![],
            Gesture::Panning { last } => {
                cx.viewport.pan_by(pointer - last);
                self.gesture = Gesture::Panning { last: pointer };
                vec![]
            }
            Gesture::Dragging { id, last } => {
                let Some(node) = cx.store.node(id) else {
                    self.cancel();
                    return vec![];
                };
                let delta = scale_delta(pointer - last, cx.viewport.zoom);
                let x = node.style.x.unwrap_or(0.0) + delta.x;
                let y = node.style.y.unwrap_or(0.0) + delta.y;
                self.gesture = Gesture::Dragging { id, last: pointer };
                vec![BlockMutation::UpdateStyle {
                    id,
                    style: BlockStyle::position(x, y),
                }]
            }
            Gesture::Resizing {
                id,
                handle,
                start_pointer,
                start,
            } => {
                if !cx.store.contains(id) {
                    self.cancel();
                    return vec![];
                }
                let delta = scale_delta(pointer - start_pointer, cx.viewport.zoom);
                let rect = resize_geometry(start, handle, delta, cx.config.min_resize);
                vec![BlockMutation::UpdateStyle {
                    id,
                    style: geometry_style(rect),
                }]
            }
            Gesture::Creating { kind, start, .. } => {
                self.gesture = Gesture::Creating {
                    kind,
                    start,
                    current: cx.viewport.to_canvas(pointer),
                };
                vec![]
            }
        }
    }

    fn pointer_up(&mut self, pointer: Point, cx: &mut GestureContext<'_>) -> Vec<BlockMutation> {
        let gesture = std::mem::take(&mut self.gesture);
        log::trace!("gesture {} -> idle", gesture.name());

        let Gesture::Creating { kind, start, .. } = gesture else {
            return vec![];
        };
        let rect = creation_rect(start, cx.viewport.to_canvas(pointer));
        let min = cx.config.min_create;
        if rect.width() <= min || rect.height() <= min {
            log::debug!("discarding {kind} draw: {:.0}x{:.0}", rect.width(), rect.height());
            return vec![];
        }

        let block = create_block_with(kind, drawn_overrides(kind, rect, cx.config));
        vec![BlockMutation::AddBlock {
            block,
            parent: None,
        }]
    }
}

/// Factory overrides for a block drawn into `rect`.
fn drawn_overrides(kind: BlockKind, rect: Rect, config: &InteractionConfig) -> BlockOverrides {
    let mut style = geometry_style(rect);
    match kind {
        BlockKind::Rectangle => {
            style.background_color = Some(config.shape_fill.clone());
        }
        BlockKind::Circle => {
            style.background_color = Some(config.shape_fill.clone());
            style.border_radius = Some(rect.width().min(rect.height()) / 2.0);
        }
        _ => {}
    }
    BlockOverrides::style(style)
}
