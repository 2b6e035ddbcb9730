//! The editor facade: store, viewport, tools and gestures behind one owner.
//!
//! Hosts (the wasm bridge, tests, native shells) feed normalized
//! `InputEvent`s in and read snapshots, render trees and exported HTML out.
//! Everything runs through `&mut self`, one event at a time.

use crate::config::InteractionConfig;
use crate::input::InputEvent;
use crate::interaction::{Gesture, GestureContext, Interaction};
use crate::properties::{PropertyEdit, property_edit};
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use crate::tools::ToolKind;
use bc_core::error::BuilderResult;
use bc_core::export::export_canvas;
use bc_core::factory::create_block;
use bc_core::id::BlockId;
use bc_core::model::{BlockKind, BlockPatch, BlockStyle, Canvas};
use bc_core::store::{BlockMutation, MoveDirection, TreeStore};
use bc_render::{Point, Projection, Rect, RenderMode, RenderNode, Vec2, Viewport, ZoomDirection};

pub struct Editor {
    store: TreeStore,
    viewport: Viewport,
    interaction: Interaction,
    tool: ToolKind,
    config: InteractionConfig,
    /// Space is held: pointer-downs pan instead of selecting.
    pan_key: bool,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new("My Project")
    }
}

impl Editor {
    pub fn new(name: &str) -> Self {
        Self::with_config(name, InteractionConfig::default())
    }

    pub fn with_config(name: &str, config: InteractionConfig) -> Self {
        Self::from_store(TreeStore::new(name), config)
    }

    /// Open an existing canvas. Fails if it repeats a block id.
    pub fn from_canvas(canvas: Canvas, config: InteractionConfig) -> BuilderResult<Self> {
        Ok(Self::from_store(TreeStore::from_canvas(canvas)?, config))
    }

    fn from_store(store: TreeStore, mut config: InteractionConfig) -> Self {
        let viewport = Viewport::with_limits(config.zoom);
        config.zoom = viewport.limits;
        Self {
            store,
            viewport,
            interaction: Interaction::new(),
            tool: ToolKind::default(),
            config,
            pan_key: false,
        }
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    pub fn store(&self) -> &TreeStore {
        &self.store
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn config(&self) -> &InteractionConfig {
        &self.config
    }

    pub fn tool(&self) -> ToolKind {
        self.tool
    }

    pub fn gesture(&self) -> &Gesture {
        self.interaction.gesture()
    }

    /// Bumped on every effective store change.
    pub fn revision(&self) -> u64 {
        self.store.revision()
    }

    pub fn snapshot(&self) -> Canvas {
        self.store.snapshot()
    }

    pub fn selected_id(&self) -> Option<BlockId> {
        self.store.selected_id()
    }

    /// CSS cursor for the canvas element.
    pub fn cursor(&self) -> &'static str {
        match self.interaction.gesture() {
            Gesture::Idle if self.pan_key => "grab",
            Gesture::Idle if self.tool.is_drawing() => "crosshair",
            gesture => gesture.cursor(),
        }
    }

    /// Canvas-space box of the block being drawn, if any.
    pub fn creation_preview(&self) -> Option<Rect> {
        self.interaction.creation_preview()
    }

    // ─── Input ───────────────────────────────────────────────────────────

    /// Process one input event. Returns whether the store, the viewport, or
    /// the active gesture changed, i.e. whether the host should re-render.
    pub fn handle_event(&mut self, event: &InputEvent) -> bool {
        let revision = self.store.revision();
        let viewport = self.viewport;
        let gesture = *self.interaction.gesture();

        match event {
            InputEvent::Wheel {
                x,
                y,
                dx,
                dy,
                modifiers,
            } => {
                if modifiers.command() {
                    let direction = if *dy < 0.0 {
                        ZoomDirection::In
                    } else {
                        ZoomDirection::Out
                    };
                    if *dy != 0.0 {
                        self.viewport.zoom_at(Point::new(*x, *y), direction);
                    }
                } else {
                    self.viewport.pan_by(Vec2::new(-dx, -dy));
                }
            }
            InputEvent::KeyDown { key, modifiers } => {
                let action = ShortcutMap::resolve(
                    key,
                    modifiers.ctrl,
                    modifiers.shift,
                    modifiers.alt,
                    modifiers.meta,
                );
                if let Some(action) = action {
                    self.run_action(action);
                }
            }
            InputEvent::KeyUp { key } => {
                if let Some(action) = ShortcutMap::resolve_release(key) {
                    self.run_action(action);
                }
            }
            _ => {
                let mut cx = GestureContext {
                    store: &self.store,
                    viewport: &mut self.viewport,
                    tool: self.tool,
                    pan_key: self.pan_key,
                    config: &self.config,
                };
                let mutations = self.interaction.handle(event, &mut cx);
                for mutation in mutations {
                    self.store.apply(mutation);
                }
            }
        }

        self.store.revision() != revision
            || self.viewport != viewport
            || *self.interaction.gesture() != gesture
    }

    /// Run a shortcut action against the current selection and viewport.
    pub fn run_action(&mut self, action: ShortcutAction) {
        log::debug!("action {action:?}");
        let selected = self.store.selected_id();
        match action {
            ShortcutAction::Tool(tool) => self.set_tool(tool),
            ShortcutAction::Delete => {
                if let Some(id) = selected {
                    self.store.remove_block(id);
                }
            }
            ShortcutAction::Duplicate => {
                if let Some(copy) = selected.and_then(|id| self.store.duplicate_block(id)) {
                    self.store.set_selection(Some(copy));
                }
            }
            ShortcutAction::ToggleVisibility => {
                if let Some(id) = selected {
                    self.store.toggle_block_visibility(id);
                }
            }
            ShortcutAction::ToggleLock => {
                if let Some(id) = selected {
                    self.store.toggle_block_lock(id);
                }
            }
            ShortcutAction::ZoomIn => {
                self.viewport.zoom_in();
            }
            ShortcutAction::ZoomOut => {
                self.viewport.zoom_out();
            }
            ShortcutAction::ZoomReset => self.viewport.reset_zoom(),
            ShortcutAction::PanStart => self.pan_key = true,
            ShortcutAction::PanEnd => {
                self.pan_key = false;
                if matches!(self.interaction.gesture(), Gesture::Panning { .. }) {
                    self.interaction.cancel();
                }
            }
            ShortcutAction::SendBackward => {
                if let Some(id) = selected {
                    self.store.move_block(id, MoveDirection::Up);
                }
            }
            ShortcutAction::BringForward => {
                if let Some(id) = selected {
                    self.store.move_block(id, MoveDirection::Down);
                }
            }
            ShortcutAction::Deselect => {
                self.interaction.cancel();
                self.store.clear_selection();
            }
        }
    }

    /// Switch tools. An in-progress draw is abandoned.
    pub fn set_tool(&mut self, tool: ToolKind) {
        if self.tool != tool {
            log::debug!("tool {} -> {tool}", self.tool);
            if matches!(self.interaction.gesture(), Gesture::Creating { .. }) {
                self.interaction.cancel();
            }
            self.tool = tool;
        }
    }

    /// Screen position of the canvas element's top-left corner.
    pub fn set_origin(&mut self, left: f64, top: f64) {
        self.viewport.set_origin(left, top);
    }

    pub fn zoom_in(&mut self) -> bool {
        self.viewport.zoom_in()
    }

    pub fn zoom_out(&mut self) -> bool {
        self.viewport.zoom_out()
    }

    pub fn reset_zoom(&mut self) {
        self.viewport.reset_zoom();
    }

    // ─── Palette & panels ────────────────────────────────────────────────

    /// Apply one mutation from a panel. Returns whether it took effect.
    pub fn apply(&mut self, mutation: BlockMutation) -> bool {
        self.store.apply(mutation)
    }

    /// Create a palette block and append it under `parent` (top level when
    /// `None`). Returns the new id, or `None` for an unknown parent.
    pub fn add_block(&mut self, kind: BlockKind, parent: Option<BlockId>) -> Option<BlockId> {
        let block = create_block(kind);
        let id = block.id;
        self.store.add_block(block, parent).then_some(id)
    }

    /// Like [`Editor::add_block`], from a palette drag payload.
    pub fn add_block_from_slug(
        &mut self,
        slug: &str,
        parent: Option<BlockId>,
    ) -> BuilderResult<Option<BlockId>> {
        Ok(self.add_block(slug.parse()?, parent))
    }

    pub fn select(&mut self, id: Option<BlockId>) -> bool {
        self.store.set_selection(id)
    }

    pub fn update_block(&mut self, id: BlockId, patch: &BlockPatch) -> bool {
        self.store.update_block(id, patch)
    }

    pub fn update_block_style(&mut self, id: BlockId, style: &BlockStyle) -> bool {
        self.store.update_block_style(id, style)
    }

    /// Merge `style` into the selected block. No-op without a selection.
    pub fn update_selected_style(&mut self, style: &BlockStyle) -> bool {
        match self.store.selected_id() {
            Some(id) => self.store.update_block_style(id, style),
            None => false,
        }
    }

    pub fn remove_block(&mut self, id: BlockId) -> bool {
        self.store.remove_block(id)
    }

    /// Deep-copy `id` with fresh ids and append the copy at the top level.
    pub fn duplicate_block(&mut self, id: BlockId) -> Option<BlockId> {
        self.store.duplicate_block(id)
    }

    pub fn move_block(&mut self, id: BlockId, direction: MoveDirection) -> bool {
        self.store.move_block(id, direction)
    }

    pub fn toggle_block_visibility(&mut self, id: BlockId) -> bool {
        self.store.toggle_block_visibility(id)
    }

    pub fn toggle_block_lock(&mut self, id: BlockId) -> bool {
        self.store.toggle_block_lock(id)
    }

    /// Apply one raw properties-panel input (`"width"`, `"240px"`) to `id`.
    pub fn set_property(&mut self, id: BlockId, key: &str, value: &str) -> bool {
        let Some(edit) = self.store.node(id).and_then(|node| property_edit(node, key, value))
        else {
            return false;
        };
        match edit {
            PropertyEdit::Style(style) => self.store.update_block_style(id, &style),
            PropertyEdit::Block(patch) => self.store.update_block(id, &patch),
        }
    }

    pub fn set_selected_property(&mut self, key: &str, value: &str) -> bool {
        match self.store.selected_id() {
            Some(id) => self.set_property(id, key, value),
            None => false,
        }
    }

    pub fn rename_canvas(&mut self, name: &str) {
        self.store.rename_canvas(name);
    }

    // ─── Output ──────────────────────────────────────────────────────────

    pub fn render(&self, mode: RenderMode) -> Vec<RenderNode> {
        Projection::new(self.store.selected_id(), mode)
            .with_handle_size(self.config.handle_size)
            .canvas(&self.store.snapshot())
    }

    /// Standalone HTML document for preview and download.
    pub fn export_html(&self) -> String {
        export_canvas(&self.store.snapshot())
    }
}
