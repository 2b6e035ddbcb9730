//! Input abstraction layer.
//!
//! Normalizes DOM pointer, wheel, and keyboard events into one
//! `InputEvent` enum consumed by the editor. Positions are screen-space
//! device pixels (`clientX` / `clientY`).

use bc_render::Point;
use serde::{Deserialize, Serialize};

/// Modifier keys held during an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    /// Platform command key: ⌘ on macOS, Ctrl elsewhere.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum InputEvent {
    PointerDown {
        x: f64,
        y: f64,
        #[serde(default)]
        modifiers: Modifiers,
    },
    PointerMove {
        x: f64,
        y: f64,
        #[serde(default)]
        modifiers: Modifiers,
    },
    PointerUp {
        x: f64,
        y: f64,
        #[serde(default)]
        modifiers: Modifiers,
    },
    /// Pointer left the canvas element.
    PointerLeave,
    /// Wheel or trackpad scroll at `(x, y)`.
    Wheel {
        x: f64,
        y: f64,
        dx: f64,
        dy: f64,
        #[serde(default)]
        modifiers: Modifiers,
    },
    KeyDown {
        /// `KeyboardEvent.key` (`"v"`, `"Delete"`, `" "`).
        key: String,
        #[serde(default)]
        modifiers: Modifiers,
    },
    KeyUp {
        key: String,
    },
}

impl InputEvent {
    pub fn pointer_down(x: f64, y: f64) -> Self {
        Self::PointerDown {
            x,
            y,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn pointer_move(x: f64, y: f64) -> Self {
        Self::PointerMove {
            x,
            y,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn pointer_up(x: f64, y: f64) -> Self {
        Self::PointerUp {
            x,
            y,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn key(key: &str) -> Self {
        Self::KeyDown {
            key: key.to_string(),
            modifiers: Modifiers::NONE,
        }
    }

    /// Extract position if this is a pointer or wheel event.
    pub fn position(&self) -> Option<Point> {
        match self {
            Self::PointerDown { x, y, .. }
            | Self::PointerMove { x, y, .. }
            | Self::PointerUp { x, y, .. }
            | Self::Wheel { x, y, .. } => Some(Point::new(*x, *y)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn json_from_host() {
        let ev: InputEvent =
            serde_json::from_str(r#"{"type":"pointerDown","x":10,"y":20}"#).unwrap();
        assert_eq!(ev, InputEvent::pointer_down(10.0, 20.0));

        let ev: InputEvent = serde_json::from_str(
            r#"{"type":"wheel","x":1,"y":2,"dx":0,"dy":-100,"modifiers":{"ctrl":true}}"#,
        )
        .unwrap();
        match ev {
            InputEvent::Wheel { dy, modifiers, .. } => {
                assert_eq!(dy, -100.0);
                assert!(modifiers.command());
                assert!(!modifiers.shift);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn positions() {
        assert_eq!(
            InputEvent::pointer_up(3.0, 4.0).position(),
            Some(Point::new(3.0, 4.0))
        );
        assert_eq!(InputEvent::PointerLeave.position(), None);
        assert_eq!(InputEvent::key("v").position(), None);
    }
}
