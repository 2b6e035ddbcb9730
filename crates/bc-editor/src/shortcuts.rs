//! Keyboard shortcut mapping.
//!
//! Maps key + modifier combos to semantic `ShortcutAction`s. The map lives
//! in Rust so the wasm bridge and native hosts resolve keys identically.
//!
//! Tool keys follow the toolbar: V select, R rectangle, O circle, T text,
//! L line, F frame. Space held down is the temporary hand tool.

use crate::tools::ToolKind;

/// What a resolved key combo asks the editor to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    // ── Tool switching ──
    Tool(ToolKind),

    // ── Edit ──
    Delete,
    Duplicate,
    ToggleVisibility,
    ToggleLock,

    // ── View ──
    ZoomIn,
    ZoomOut,
    ZoomReset,
    PanStart,
    PanEnd,

    // ── Z-order ──
    /// One step toward the start of the sibling list (painted earlier).
    SendBackward,
    /// One step toward the end of the sibling list (painted later).
    BringForward,

    // ── UI ──
    Deselect,
}

/// Key-event resolver. `ctrl` and `meta` are interchangeable as the
/// command modifier, so the same table serves macOS and everything else.
pub struct ShortcutMap;

/// Toolbar letter, case-insensitive.
fn tool_for_key(key: &str) -> Option<ToolKind> {
    let mut chars = key.chars();
    let (Some(c), None) = (chars.next(), chars.next()) else {
        return None;
    };
    ToolKind::ALL
        .into_iter()
        .find(|tool| tool.shortcut().eq_ignore_ascii_case(&c))
}

impl ShortcutMap {
    /// Resolve a key-down event to an action.
    ///
    /// `key` is the `KeyboardEvent.key` value (e.g. `"v"`, `"Delete"`).
    /// Unbound combos give `None`.
    pub fn resolve(
        key: &str,
        ctrl: bool,
        shift: bool,
        _alt: bool,
        meta: bool,
    ) -> Option<ShortcutAction> {
        let cmd = ctrl || meta;

        // ── ⌘⇧ then ⌘ ──
        if cmd && shift {
            return match key {
                "h" | "H" => Some(ShortcutAction::ToggleVisibility),
                "l" | "L" => Some(ShortcutAction::ToggleLock),
                _ => None,
            };
        }

        if cmd {
            return match key {
                "d" | "D" => Some(ShortcutAction::Duplicate),
                "=" | "+" => Some(ShortcutAction::ZoomIn),
                "-" => Some(ShortcutAction::ZoomOut),
                "0" => Some(ShortcutAction::ZoomReset),
                "[" => Some(ShortcutAction::SendBackward),
                "]" => Some(ShortcutAction::BringForward),
                _ => None,
            };
        }

        if shift {
            return None;
        }

        // ── Bare keys ──
        match key {
            "Delete" | "Backspace" => Some(ShortcutAction::Delete),
            "Escape" => Some(ShortcutAction::Deselect),
            " " => Some(ShortcutAction::PanStart),
            _ => tool_for_key(key).map(ShortcutAction::Tool),
        }
    }

    /// Resolve a key-up event. Only releasing space has a binding.
    pub fn resolve_release(key: &str) -> Option<ShortcutAction> {
        (key == " ").then_some(ShortcutAction::PanEnd)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_tool_shortcuts() {
        for tool in ToolKind::ALL {
            let key = tool.shortcut().to_ascii_lowercase().to_string();
            assert_eq!(
                ShortcutMap::resolve(&key, false, false, false, false),
                Some(ShortcutAction::Tool(tool)),
                "key {key}"
            );
        }
    }

    #[test]
    fn resolve_delete() {
        assert_eq!(
            ShortcutMap::resolve("Delete", false, false, false, false),
            Some(ShortcutAction::Delete)
        );
        assert_eq!(
            ShortcutMap::resolve("Backspace", false, false, false, false),
            Some(ShortcutAction::Delete)
        );
    }

    #[test]
    fn resolve_duplicate_and_zoom() {
        // Cmd+D and Ctrl+D
        assert_eq!(
            ShortcutMap::resolve("d", false, false, false, true),
            Some(ShortcutAction::Duplicate)
        );
        assert_eq!(
            ShortcutMap::resolve("d", true, false, false, false),
            Some(ShortcutAction::Duplicate)
        );
        assert_eq!(
            ShortcutMap::resolve("=", true, false, false, false),
            Some(ShortcutAction::ZoomIn)
        );
        assert_eq!(
            ShortcutMap::resolve("0", false, false, false, true),
            Some(ShortcutAction::ZoomReset)
        );
    }

    #[test]
    fn resolve_z_order() {
        assert_eq!(
            ShortcutMap::resolve("[", false, false, false, true),
            Some(ShortcutAction::SendBackward)
        );
        assert_eq!(
            ShortcutMap::resolve("]", true, false, false, false),
            Some(ShortcutAction::BringForward)
        );
    }

    #[test]
    fn resolve_layer_toggles() {
        assert_eq!(
            ShortcutMap::resolve("H", false, true, false, true),
            Some(ShortcutAction::ToggleVisibility)
        );
        assert_eq!(
            ShortcutMap::resolve("l", true, true, false, false),
            Some(ShortcutAction::ToggleLock)
        );
    }

    #[test]
    fn resolve_pan_and_escape() {
        assert_eq!(
            ShortcutMap::resolve(" ", false, false, false, false),
            Some(ShortcutAction::PanStart)
        );
        assert_eq!(ShortcutMap::resolve_release(" "), Some(ShortcutAction::PanEnd));
        assert_eq!(ShortcutMap::resolve_release("v"), None);
        assert_eq!(
            ShortcutMap::resolve("Escape", false, false, false, false),
            Some(ShortcutAction::Deselect)
        );
    }

    #[test]
    fn unbound_combos() {
        assert_eq!(ShortcutMap::resolve("q", false, false, false, false), None);
        assert_eq!(ShortcutMap::resolve("v", false, true, false, false), None);
        // Cmd+V is not a tool switch.
        assert_eq!(ShortcutMap::resolve("v", false, false, false, true), None);
    }
}
