pub mod config;
pub mod editor;
pub mod input;
pub mod interaction;
pub mod properties;
pub mod shortcuts;
pub mod tools;

pub use config::InteractionConfig;
pub use editor::Editor;
pub use input::{InputEvent, Modifiers};
pub use interaction::{Gesture, Interaction, creation_rect, resize_geometry, scale_delta};
pub use properties::{PropertyEdit, property_edit};
pub use shortcuts::{ShortcutAction, ShortcutMap};
pub use tools::ToolKind;
