//! Pan/zoom view transform and screen↔world conversion.

use kurbo::{Point, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Minimum allowed zoom level.
pub const MIN_SCALE: f64 = 0.1;
/// Maximum allowed zoom level.
pub const MAX_SCALE: f64 = 20.0;

/// Pan offset plus zoom scale.
///
/// Zoom is kept visually centered on the canvas by an extra scale offset,
/// recomputed from the canvas size each conversion: half the difference
/// between the scaled canvas size and its unscaled size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Current pan translation, in pre-scale screen units.
    pub pan_offset: Vec2,
    /// Current zoom level; always within `[MIN_SCALE, MAX_SCALE]`.
    pub scale: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            pan_offset: Vec2::ZERO,
            scale: 1.0,
        }
    }
}

impl Viewport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Centering offset for the current scale and canvas size.
    pub fn scale_offset(&self, canvas_size: Size) -> Vec2 {
        Vec2::new(
            (canvas_size.width * self.scale - canvas_size.width) / 2.0,
            (canvas_size.height * self.scale - canvas_size.height) / 2.0,
        )
    }

    /// Convert a screen point (window coordinates) to world coordinates.
    pub fn to_world(&self, screen: Point, canvas_origin: Point, canvas_size: Size) -> Point {
        let offset = self.scale_offset(canvas_size);
        Point::new(
            (screen.x - canvas_origin.x - self.pan_offset.x * self.scale + offset.x) / self.scale,
            (screen.y - canvas_origin.y - self.pan_offset.y * self.scale + offset.y) / self.scale,
        )
    }

    /// Convert a world point to canvas-relative screen coordinates.
    ///
    /// The host adds the canvas origin (e.g. the sidebar offset) when
    /// positioning overlays such as the inline text editor.
    pub fn to_screen(&self, world: Point, canvas_size: Size) -> Point {
        let offset = self.scale_offset(canvas_size);
        Point::new(
            world.x * self.scale + self.pan_offset.x * self.scale - offset.x,
            world.y * self.scale + self.pan_offset.y * self.scale - offset.y,
        )
    }

    /// Pan by a delta.
    ///
    /// The delta is added as-is, not divided by scale, so perceived pan
    /// speed changes with zoom level. Preserved as observed.
    pub fn pan(&mut self, delta: Vec2) {
        self.pan_offset += delta;
    }

    /// Adjust zoom by an additive delta, clamped to the legal range.
    pub fn zoom(&mut self, delta: f64) {
        self.scale = (self.scale + delta).clamp(MIN_SCALE, MAX_SCALE);
    }

    /// Reset zoom to 100% without touching the pan offset.
    pub fn reset_zoom(&mut self) {
        self.scale = 1.0;
    }

    /// The current zoom formatted for display, e.g. "100%".
    pub fn zoom_percent(&self) -> String {
        format!("{:.0}%", self.scale * 100.0)
    }
}
