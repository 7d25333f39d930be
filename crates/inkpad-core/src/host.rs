//! Contracts the embedding shell fulfills for the board.

use kurbo::{Point, Size};

/// Sidebar width when collapsed, in screen pixels.
pub const SIDEBAR_COLLAPSED_WIDTH: f64 = 56.0;
/// Sidebar width when expanded.
pub const SIDEBAR_EXPANDED_WIDTH: f64 = 224.0;

/// Font size used by the inline text editor and text elements.
pub const TEXT_FONT_SIZE: f64 = 21.0;
/// Line height for a single line of text.
pub const TEXT_LINE_HEIGHT: f64 = 24.0;

/// Position and size of the drawing canvas within the window.
///
/// The origin moves when the sidebar expands or collapses; the board
/// subtracts it when converting pointer positions to world coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasGeometry {
    pub origin: Point,
    pub size: Size,
}

impl CanvasGeometry {
    pub fn new(origin: Point, size: Size) -> Self {
        Self { origin, size }
    }
}

impl Default for CanvasGeometry {
    fn default() -> Self {
        Self {
            origin: Point::new(SIDEBAR_COLLAPSED_WIDTH, 0.0),
            size: Size::new(1280.0, 720.0),
        }
    }
}

/// Kind of user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyKind {
    Success,
    Error,
}

/// User-facing notifications (toasts). Implemented by the shell.
pub trait Notifier {
    fn notify(&mut self, kind: NotifyKind, message: &str);
}

/// Discards all notifications. Useful for tests and headless use.
#[derive(Debug, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&mut self, _kind: NotifyKind, _message: &str) {}
}

/// Measures rendered text so the board can size text elements.
///
/// Measurement depends on the host's font stack, so the board asks
/// rather than guessing.
pub trait TextMeasurer {
    /// Width and height of `content` at the given font size.
    fn measure(&self, content: &str, font_size: f64) -> Size;
}

/// Heuristic measurer: average glyph width as a fraction of font size.
/// Good enough for tests and hosts without font metrics.
#[derive(Debug, Clone, Copy)]
pub struct ApproxTextMeasurer;

impl TextMeasurer for ApproxTextMeasurer {
    fn measure(&self, content: &str, font_size: f64) -> Size {
        let width = content.chars().count() as f64 * font_size * 0.6;
        Size::new(width, TEXT_LINE_HEIGHT)
    }
}
