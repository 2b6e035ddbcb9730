//! Interaction tuning knobs.

use bc_core::factory::SHAPE_FILL;
use bc_render::ZoomLimits;
use bc_render::handles::{HANDLE_SIZE, HANDLE_SLACK};
use serde::{Deserialize, Serialize};

/// Configuration for gestures on the free-form canvas.
///
/// Sizes are in canvas units unless noted otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InteractionConfig {
    /// Zoom bounds and step, in percent. Default: 10 / 400 / 10.
    pub zoom: ZoomLimits,

    /// Drawn handle size in device pixels. Default: **8**.
    pub handle_size: f64,

    /// Grab distance beyond the handle size, in device pixels. Default: **4**.
    pub handle_slack: f64,

    /// Resizing never shrinks a side below this. Default: **40**.
    pub min_resize: f64,

    /// A drawn box is only created when both sides exceed this. Default: **20**.
    pub min_create: f64,

    /// Fill for rectangles and circles drawn with a shape tool.
    pub shape_fill: String,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            zoom: ZoomLimits::default(),
            handle_size: HANDLE_SIZE,
            handle_slack: HANDLE_SLACK,
            min_resize: 40.0,
            min_create: 20.0,
            shape_fill: SHAPE_FILL.to_string(),
        }
    }
}

impl InteractionConfig {
    /// Screen-space radius within which a pointer grabs a handle.
    pub fn handle_radius(&self) -> f64 {
        self.handle_size + self.handle_slack
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = InteractionConfig::default();
        assert_eq!(config.handle_radius(), 12.0);
        assert_eq!(config.zoom.max, 400.0);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: InteractionConfig = serde_json::from_str(r#"{"minResize": 10}"#).unwrap();
        assert_eq!(config.min_resize, 10.0);
        assert_eq!(config.min_create, 20.0);
        assert_eq!(config.shape_fill, SHAPE_FILL);
    }

    #[test]
    fn zoom_limits_are_checked_on_load() {
        let zero = serde_json::from_str::<InteractionConfig>(r#"{"zoom":{"min":0,"max":400,"step":50}}"#);
        assert!(zero.is_err());
        let inverted =
            serde_json::from_str::<InteractionConfig>(r#"{"zoom":{"min":500,"max":100,"step":10}}"#);
        assert!(inverted.is_err());
    }
}
