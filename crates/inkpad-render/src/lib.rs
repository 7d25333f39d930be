//! Inkpad Renderer
//!
//! Turns board state into a backend-agnostic display list: hand-drawn
//! strokes for lines and rectangles, filled ink outlines for freehand
//! strokes, text runs, and the transient eraser overlay.

pub mod ink;
pub mod renderer;
pub mod rough;

pub use ink::{stroke_outline, InkOptions};
pub use renderer::{
    build_frame, DrawCommand, Frame, RenderError, RenderResult, RenderSurface, TextOverlay,
};
pub use rough::{rough_passes, roughen, seed_from_id, ROUGHNESS, STROKE_PASSES};
