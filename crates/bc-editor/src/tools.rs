//! Canvas tools.
//!
//! The active tool decides what a pointer-down on empty canvas does:
//! the select tool clears the selection, drawing tools start a
//! drag-to-draw gesture. Pointer-downs on a block select it regardless
//! of the tool.

use bc_core::error::BuilderError;
use bc_core::model::BlockKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    #[default]
    Select,
    Rectangle,
    Circle,
    Text,
    Line,
    Frame,
}

impl ToolKind {
    pub const ALL: [ToolKind; 6] = [
        ToolKind::Select,
        ToolKind::Rectangle,
        ToolKind::Circle,
        ToolKind::Text,
        ToolKind::Line,
        ToolKind::Frame,
    ];

    /// Block kind a drag-to-draw gesture creates with this tool.
    /// `None` for tools that do not draw.
    pub fn creates(self) -> Option<BlockKind> {
        match self {
            ToolKind::Rectangle => Some(BlockKind::Rectangle),
            ToolKind::Circle => Some(BlockKind::Circle),
            ToolKind::Text => Some(BlockKind::ShapeText),
            ToolKind::Frame => Some(BlockKind::Frame),
            // No line block kind exists yet.
            ToolKind::Select | ToolKind::Line => None,
        }
    }

    pub fn is_drawing(self) -> bool {
        self.creates().is_some()
    }

    pub fn name(self) -> &'static str {
        match self {
            ToolKind::Select => "select",
            ToolKind::Rectangle => "rectangle",
            ToolKind::Circle => "circle",
            ToolKind::Text => "text",
            ToolKind::Line => "line",
            ToolKind::Frame => "frame",
        }
    }

    /// Single-key toolbar shortcut.
    pub fn shortcut(self) -> char {
        match self {
            ToolKind::Select => 'V',
            ToolKind::Rectangle => 'R',
            ToolKind::Circle => 'O',
            ToolKind::Text => 'T',
            ToolKind::Line => 'L',
            ToolKind::Frame => 'F',
        }
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ToolKind {
    type Err = BuilderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ToolKind::ALL
            .into_iter()
            .find(|t| t.name() == s)
            .ok_or_else(|| BuilderError::UnknownTool(s.to_string()))
    }
}
