//! WASM bridge for Blockcraft: exposes the editor core to the browser shell.
//!
//! Compiled via `wasm-pack build --target web`. The shell owns the palette,
//! the properties panel and the layers panel; all of them talk to one
//! `BuilderCanvas`. Structured values cross the boundary as JSON strings.

use bc_core::id::BlockId;
use bc_core::model::{BlockPatch, BlockStyle, Canvas};
use bc_core::store::{BlockMutation, MoveDirection};
use bc_editor::{Editor, InputEvent, InteractionConfig, Modifiers, ShortcutAction, ShortcutMap};
use bc_render::RenderMode;
use wasm_bindgen::prelude::*;

/// The main WASM-facing canvas controller.
///
/// Wraps the `Editor`; every call from the shell goes through here.
#[wasm_bindgen]
pub struct BuilderCanvas {
    editor: Editor,
}

impl Default for BuilderCanvas {
    fn default() -> Self {
        Self::new("My Project")
    }
}

#[wasm_bindgen]
impl BuilderCanvas {
    /// Create an empty canvas named `name`.
    #[wasm_bindgen(constructor)]
    pub fn new(name: &str) -> Self {
        console_error_panic_hook_setup();
        console_logger_setup();

        Self {
            editor: Editor::new(name),
        }
    }

    /// Replace the whole canvas with a JSON document. Resets gestures and
    /// the viewport.
    pub fn load_canvas_json(&mut self, json: &str) -> Result<(), JsValue> {
        let canvas: Canvas = serde_json::from_str(json).map_err(js_error)?;
        let config = self.editor.config().clone();
        self.editor = Editor::from_canvas(canvas, config).map_err(js_error)?;
        Ok(())
    }

    /// Apply interaction tuning from JSON (missing fields keep defaults).
    /// Keeps the blocks; resets selection, gestures and the viewport.
    pub fn set_config_json(&mut self, json: &str) -> Result<(), JsValue> {
        let config: InteractionConfig = serde_json::from_str(json).map_err(js_error)?;
        let canvas = self.editor.snapshot();
        self.editor = Editor::from_canvas(canvas, config).map_err(js_error)?;
        Ok(())
    }

    /// The canvas as JSON (the same shape `load_canvas_json` accepts).
    pub fn get_canvas_json(&self) -> String {
        to_json(&self.editor.snapshot())
    }

    /// Change counter; re-read snapshots when it moves.
    pub fn revision(&self) -> f64 {
        self.editor.revision() as f64
    }

    // ─── Pointer & wheel ─────────────────────────────────────────────────

    /// Screen position of the canvas element (its `getBoundingClientRect`).
    pub fn set_origin(&mut self, left: f64, top: f64) {
        self.editor.set_origin(left, top);
    }

    /// Handle pointer down. Returns true if a re-render is needed.
    pub fn handle_pointer_down(
        &mut self,
        x: f64,
        y: f64,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
    ) -> bool {
        let modifiers = mods(shift, ctrl, alt, meta);
        self.editor
            .handle_event(&InputEvent::PointerDown { x, y, modifiers })
    }

    /// Handle pointer move. Returns true if a re-render is needed.
    pub fn handle_pointer_move(
        &mut self,
        x: f64,
        y: f64,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
    ) -> bool {
        let modifiers = mods(shift, ctrl, alt, meta);
        self.editor
            .handle_event(&InputEvent::PointerMove { x, y, modifiers })
    }

    /// Handle pointer up. Returns true if a re-render is needed.
    pub fn handle_pointer_up(
        &mut self,
        x: f64,
        y: f64,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
    ) -> bool {
        let modifiers = mods(shift, ctrl, alt, meta);
        self.editor
            .handle_event(&InputEvent::PointerUp { x, y, modifiers })
    }

    pub fn handle_pointer_leave(&mut self) -> bool {
        self.editor.handle_event(&InputEvent::PointerLeave)
    }

    /// Wheel: ⌘/Ctrl zooms about the pointer, anything else pans.
    pub fn handle_wheel(
        &mut self,
        x: f64,
        y: f64,
        dx: f64,
        dy: f64,
        ctrl: bool,
        meta: bool,
    ) -> bool {
        let modifiers = mods(false, ctrl, false, meta);
        self.editor.handle_event(&InputEvent::Wheel {
            x,
            y,
            dx,
            dy,
            modifiers,
        })
    }

    /// Feed any `InputEvent` as JSON, e.g. `{"type":"pointerDown","x":1,"y":2}`.
    pub fn handle_event_json(&mut self, json: &str) -> Result<bool, JsValue> {
        let event: InputEvent = serde_json::from_str(json).map_err(js_error)?;
        Ok(self.editor.handle_event(&event))
    }

    // ─── Keyboard Shortcut API ───────────────────────────────────────────

    /// Handle a key-down. Returns a JSON string:
    /// `{"changed":bool, "action":"<action_name>", "tool":"<tool_name>"}`
    pub fn handle_key(&mut self, key: &str, ctrl: bool, shift: bool, alt: bool, meta: bool) -> String {
        let action = ShortcutMap::resolve(key, ctrl, shift, alt, meta);
        let modifiers = mods(shift, ctrl, alt, meta);
        let changed = self.editor.handle_event(&InputEvent::KeyDown {
            key: key.to_string(),
            modifiers,
        });

        serde_json::json!({
            "changed": changed,
            "action": action.map_or("none", action_to_name),
            "tool": self.editor.tool().name(),
        })
        .to_string()
    }

    pub fn handle_key_up(&mut self, key: &str) -> bool {
        self.editor.handle_event(&InputEvent::KeyUp {
            key: key.to_string(),
        })
    }

    // ─── Tools & view ────────────────────────────────────────────────────

    /// Switch tools by name (`"select"`, `"rectangle"`, …). Returns false for
    /// unknown names.
    pub fn set_tool(&mut self, name: &str) -> bool {
        match name.parse() {
            Ok(tool) => {
                self.editor.set_tool(tool);
                true
            }
            Err(e) => {
                log::warn!("{e}");
                false
            }
        }
    }

    pub fn get_tool_name(&self) -> String {
        self.editor.tool().name().to_string()
    }

    /// CSS cursor for the canvas element.
    pub fn get_cursor(&self) -> String {
        self.editor.cursor().to_string()
    }

    /// `{"panX":…, "panY":…, "zoom":…}` plus origin and limits.
    pub fn get_viewport_json(&self) -> String {
        let vp = self.editor.viewport();
        serde_json::json!({
            "panX": vp.pan_x,
            "panY": vp.pan_y,
            "zoom": vp.zoom,
            "originLeft": vp.origin_left,
            "originTop": vp.origin_top,
            "minZoom": vp.limits.min,
            "maxZoom": vp.limits.max,
        })
        .to_string()
    }

    pub fn zoom_in(&mut self) -> bool {
        self.editor.zoom_in()
    }

    pub fn zoom_out(&mut self) -> bool {
        self.editor.zoom_out()
    }

    pub fn reset_zoom(&mut self) {
        self.editor.reset_zoom();
    }

    /// Canvas-space box of the shape being drawn, or `null`.
    pub fn get_creation_preview_json(&self) -> String {
        match self.editor.creation_preview() {
            Some(r) => serde_json::json!({
                "x": r.x0,
                "y": r.y0,
                "width": r.width(),
                "height": r.height(),
            })
            .to_string(),
            None => "null".to_string(),
        }
    }

    // ─── Palette ─────────────────────────────────────────────────────────

    /// Drop a palette block (`"card"`, `"flex-container"`, …) at the top level
    /// or into `parent_id`. Returns the new block id, or `""` on failure.
    pub fn add_block(&mut self, kind: &str, parent_id: &str) -> String {
        let parent = match non_empty(parent_id) {
            Some(raw) => match known_id(raw) {
                Some(id) => Some(id),
                None => return String::new(),
            },
            None => None,
        };
        match self.editor.add_block_from_slug(kind, parent) {
            Ok(Some(id)) => id.as_str().to_string(),
            Ok(None) => String::new(),
            Err(e) => {
                log::warn!("{e}");
                String::new()
            }
        }
    }

    // ─── Selection ───────────────────────────────────────────────────────

    pub fn get_selected_id(&self) -> String {
        self.editor
            .selected_id()
            .map(|id| id.as_str().to_string())
            .unwrap_or_default()
    }

    /// Select a block by id; `""` clears. Returns false for unknown ids.
    pub fn select_by_id(&mut self, block_id: &str) -> bool {
        match non_empty(block_id) {
            Some(raw) => known_id(raw).is_some_and(|id| self.editor.select(Some(id))),
            None => self.editor.select(None),
        }
    }

    // ─── Properties Panel API ────────────────────────────────────────────

    /// The selected block (without children) as JSON, or `{}`.
    pub fn get_selected_block_json(&self) -> String {
        self.editor
            .selected_id()
            .and_then(|id| self.editor.store().node(id))
            .map_or_else(|| "{}".to_string(), |node| to_json(node))
    }

    /// Set one panel field on the selected block from raw input text
    /// (`"width"`, `"50%"`). Returns true if the block changed.
    pub fn set_block_prop(&mut self, key: &str, value: &str) -> bool {
        self.editor.set_selected_property(key, value)
    }

    /// Merge a partial style (JSON `BlockStyle`) into `block_id`.
    pub fn update_block_style_json(&mut self, block_id: &str, json: &str) -> Result<bool, JsValue> {
        let style: BlockStyle = serde_json::from_str(json).map_err(js_error)?;
        Ok(known_id(block_id).is_some_and(|id| self.editor.update_block_style(id, &style)))
    }

    /// Patch label / hidden / locked / content of `block_id` from JSON.
    pub fn update_block_json(&mut self, block_id: &str, json: &str) -> Result<bool, JsValue> {
        let patch: BlockPatch = serde_json::from_str(json).map_err(js_error)?;
        Ok(known_id(block_id).is_some_and(|id| self.editor.update_block(id, &patch)))
    }

    /// Apply a tagged `BlockMutation` (`{"op":"removeBlock","id":"…"}`).
    pub fn apply_mutation_json(&mut self, json: &str) -> Result<bool, JsValue> {
        let mutation: BlockMutation = serde_json::from_str(json).map_err(js_error)?;
        Ok(self.editor.apply(mutation))
    }

    // ─── Layers Panel API ────────────────────────────────────────────────

    pub fn remove_block(&mut self, block_id: &str) -> bool {
        known_id(block_id).is_some_and(|id| self.editor.remove_block(id))
    }

    /// Duplicate `block_id` as a new top-level block. Returns the copy's id or `""`.
    pub fn duplicate_block(&mut self, block_id: &str) -> String {
        known_id(block_id)
            .and_then(|id| self.editor.duplicate_block(id))
            .map(|copy| copy.as_str().to_string())
            .unwrap_or_default()
    }

    /// Move one step within the sibling list: `"up"` or `"down"`.
    pub fn move_block(&mut self, block_id: &str, direction: &str) -> bool {
        let direction = match direction {
            "up" => MoveDirection::Up,
            "down" => MoveDirection::Down,
            other => {
                log::warn!("unknown move direction '{other}'");
                return false;
            }
        };
        known_id(block_id).is_some_and(|id| self.editor.move_block(id, direction))
    }

    pub fn toggle_visibility(&mut self, block_id: &str) -> bool {
        known_id(block_id).is_some_and(|id| self.editor.toggle_block_visibility(id))
    }

    pub fn toggle_lock(&mut self, block_id: &str) -> bool {
        known_id(block_id).is_some_and(|id| self.editor.toggle_block_lock(id))
    }

    // ─── Output ──────────────────────────────────────────────────────────

    /// Render tree as JSON. `mode` is `"flow"` or `"free-form"` (default).
    pub fn render_json(&self, mode: &str) -> String {
        let mode = match mode {
            "flow" => RenderMode::Flow,
            _ => RenderMode::FreeForm,
        };
        to_json(&self.editor.render(mode))
    }

    /// Standalone HTML document for preview and download.
    pub fn export_html(&self) -> String {
        self.editor.export_html()
    }
}

// ─── Helpers ─────────────────────────────────────────────────────────────

fn mods(shift: bool, ctrl: bool, alt: bool, meta: bool) -> Modifiers {
    Modifiers {
        shift,
        ctrl,
        alt,
        meta,
    }
}

fn non_empty(s: &str) -> Option<&str> {
    (!s.is_empty()).then_some(s)
}

/// Id strings from the host are looked up, never interned.
fn known_id(block_id: &str) -> Option<BlockId> {
    let id = BlockId::lookup(block_id);
    if id.is_none() {
        log::debug!("no block '{block_id}'");
    }
    id
}

fn js_error(e: impl std::fmt::Display) -> JsValue {
    js_sys::Error::new(&e.to_string()).into()
}

fn to_json(value: &impl serde::Serialize) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        log::error!("serialization failed: {e}");
        "null".to_string()
    })
}

fn action_to_name(action: ShortcutAction) -> &'static str {
    match action {
        ShortcutAction::Tool(_) => "tool",
        ShortcutAction::Delete => "delete",
        ShortcutAction::Duplicate => "duplicate",
        ShortcutAction::ToggleVisibility => "toggleVisibility",
        ShortcutAction::ToggleLock => "toggleLock",
        ShortcutAction::ZoomIn => "zoomIn",
        ShortcutAction::ZoomOut => "zoomOut",
        ShortcutAction::ZoomReset => "zoomReset",
        ShortcutAction::PanStart => "panStart",
        ShortcutAction::PanEnd => "panEnd",
        ShortcutAction::SendBackward => "sendBackward",
        ShortcutAction::BringForward => "bringForward",
        ShortcutAction::Deselect => "deselect",
    }
}

// ─── Console logging ─────────────────────────────────────────────────────

/// Forwards `log` records to the browser console.
struct ConsoleLogger;

impl log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        #[cfg(target_arch = "wasm32")]
        {
            let msg: JsValue = format!("[{}] {}", record.target(), record.args()).into();
            match record.level() {
                log::Level::Error => web_sys::console::error_1(&msg),
                log::Level::Warn => web_sys::console::warn_1(&msg),
                log::Level::Info => web_sys::console::info_1(&msg),
                log::Level::Debug | log::Level::Trace => web_sys::console::debug_1(&msg),
            }
        }
    }

    fn flush(&self) {}
}

static LOGGER: ConsoleLogger = ConsoleLogger;

fn console_logger_setup() {
    // Already installed by an earlier canvas.
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(log::LevelFilter::Warn);
    }
}

/// Console verbosity: `"error"`, `"warn"`, `"info"`, `"debug"`, or `"trace"`.
#[wasm_bindgen]
pub fn set_log_level(level: &str) -> bool {
    match level.parse::<log::LevelFilter>() {
        Ok(filter) => {
            log::set_max_level(filter);
            true
        }
        Err(_) => false,
    }
}

// ─── Panic hook for WASM debugging ───────────────────────────────────────

fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("Blockcraft WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}

// ─── Standalone functions (no canvas needed) ─────────────────────────────

/// Palette entries as JSON: `[{"kind":"section","label":"Section"}, …]`.
#[wasm_bindgen]
pub fn palette_json() -> String {
    let entries: Vec<_> = bc_core::model::BlockKind::ALL
        .iter()
        .map(|kind| serde_json::json!({ "kind": kind.slug(), "label": kind.display_name() }))
        .collect();
    serde_json::Value::Array(entries).to_string()
}

/// Export a canvas JSON document to HTML without creating an editor.
#[wasm_bindgen]
pub fn export_canvas_json(json: &str) -> Result<String, JsValue> {
    let canvas: Canvas = serde_json::from_str(json).map_err(js_error)?;
    Ok(bc_core::export::export_canvas(&canvas))
}
