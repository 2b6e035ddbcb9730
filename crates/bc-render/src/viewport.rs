//! Viewport: pan/zoom transform between screen and canvas space.
//!
//! Screen space is device pixels as reported by pointer events. Canvas space
//! is the coordinate system of `BlockStyle::x/y/width/height`. With origin
//! `o`, pan `p`, and scale `s = zoom / 100`:
//!
//! ```text
//! screen = o + p + canvas * s
//! canvas = (screen - o - p) / s
//! ```

use bc_core::error::{BuilderError, BuilderResult};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Zoom bounds and step, in percent. Always `0 < min <= max` with a
/// positive step; deserializing anything else is an error.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawZoomLimits")]
pub struct ZoomLimits {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

#[derive(Deserialize)]
struct RawZoomLimits {
    min: f64,
    max: f64,
    step: f64,
}

impl TryFrom<RawZoomLimits> for ZoomLimits {
    type Error = BuilderError;

    fn try_from(raw: RawZoomLimits) -> BuilderResult<Self> {
        ZoomLimits::new(raw.min, raw.max, raw.step)
    }
}

impl Default for ZoomLimits {
    fn default() -> Self {
        Self {
            min: 10.0,
            max: 400.0,
            step: 10.0,
        }
    }
}

impl ZoomLimits {
    pub fn new(min: f64, max: f64, step: f64) -> BuilderResult<Self> {
        let limits = Self { min, max, step };
        if limits.is_valid() {
            Ok(limits)
        } else {
            Err(BuilderError::InvalidZoomLimits { min, max, step })
        }
    }

    /// Finite, `0 < min <= max`, `step > 0`. NaN fails every comparison.
    pub fn is_valid(&self) -> bool {
        self.min > 0.0 && self.min <= self.max && self.max.is_finite() && self.step > 0.0
    }

    /// Never panics, even on limits built by hand with `min > max`.
    pub fn clamp(&self, zoom: f64) -> f64 {
        zoom.min(self.max).max(self.min)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoomDirection {
    In,
    Out,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub pan_x: f64,
    pub pan_y: f64,
    /// Percent; 100 = 1:1.
    pub zoom: f64,
    /// Screen position of the canvas element's top-left corner.
    pub origin_left: f64,
    pub origin_top: f64,
    pub limits: ZoomLimits,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            pan_x: 0.0,
            pan_y: 0.0,
            zoom: 100.0,
            origin_left: 0.0,
            origin_top: 0.0,
            limits: ZoomLimits::default(),
        }
    }
}

impl Viewport {
    /// Invalid limits fall back to the defaults. The starting zoom is 100%
    /// pulled into range.
    pub fn with_limits(limits: ZoomLimits) -> Self {
        let limits = if limits.is_valid() {
            limits
        } else {
            log::warn!("ignoring zoom limits {limits:?}, using defaults");
            ZoomLimits::default()
        };
        Self {
            zoom: limits.clamp(100.0),
            limits,
            ..Default::default()
        }
    }

    /// Canvas units → device pixels.
    pub fn scale(&self) -> f64 {
        self.zoom / 100.0
    }

    fn offset(&self) -> Vec2 {
        Vec2::new(self.origin_left + self.pan_x, self.origin_top + self.pan_y)
    }

    /// Pointer position → canvas point.
    pub fn to_canvas(&self, screen: Point) -> Point {
        ((screen - self.offset()).to_vec2() / self.scale()).to_point()
    }

    /// Canvas point → pointer position.
    pub fn to_screen(&self, canvas: Point) -> Point {
        (canvas.to_vec2() * self.scale()).to_point() + self.offset()
    }

    /// Canvas-space rectangle → screen-space rectangle.
    pub fn rect_to_screen(&self, rect: Rect) -> Rect {
        Rect::from_points(self.to_screen(rect.origin()), self.to_screen(Point::new(rect.x1, rect.y1)))
    }

    /// Set the canvas element's screen origin (after layout or scroll).
    pub fn set_origin(&mut self, left: f64, top: f64) {
        self.origin_left = left;
        self.origin_top = top;
    }

    pub fn pan_by(&mut self, delta: Vec2) {
        self.pan_x += delta.x;
        self.pan_y += delta.y;
    }

    /// Zoom one step about the pointer. Returns whether the zoom changed.
    pub fn zoom_at(&mut self, pointer: Point, direction: ZoomDirection) -> bool {
        let step = match direction {
            ZoomDirection::In => self.limits.step,
            ZoomDirection::Out => -self.limits.step,
        };
        self.set_zoom_about(pointer, self.zoom + step)
    }

    /// Set the zoom (clamped), keeping the canvas point under `pivot` fixed
    /// on screen. Returns whether the zoom changed.
    pub fn set_zoom_about(&mut self, pivot: Point, zoom: f64) -> bool {
        let new_zoom = self.limits.clamp(zoom);
        if new_zoom == self.zoom {
            return false;
        }
        let factor = new_zoom / self.zoom;

        // Pivot offset from the pan origin, in device pixels at the old zoom.
        let local = pivot - self.offset();
        self.pan_x -= local.x * (factor - 1.0);
        self.pan_y -= local.y * (factor - 1.0);
        self.zoom = new_zoom;
        log::trace!("zoom {:.0}% pan ({:.1}, {:.1})", self.zoom, self.pan_x, self.pan_y);
        true
    }

    /// Keyboard zoom in, about the canvas element's top-left corner.
    pub fn zoom_in(&mut self) -> bool {
        self.zoom_at(self.origin(), ZoomDirection::In)
    }

    /// Keyboard zoom out, about the canvas element's top-left corner.
    pub fn zoom_out(&mut self) -> bool {
        self.zoom_at(self.origin(), ZoomDirection::Out)
    }

    /// Back to 100% (or the nearest allowed zoom) with no pan.
    pub fn reset_zoom(&mut self) {
        self.zoom = self.limits.clamp(100.0);
        self.pan_x = 0.0;
        self.pan_y = 0.0;
    }

    fn origin(&self) -> Point {
        Point::new(self.origin_left, self.origin_top)
    }
}
