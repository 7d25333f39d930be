//! Display-list frame construction.
//!
//! `build_frame` is a pure function of board state: it emits world-space
//! draw commands plus the viewport transform, and a backend rasterizes
//! them. Stroke widths are pre-divided by the zoom scale so strokes keep
//! a constant on-screen thickness once the transform is applied.

use crate::ink::{stroke_outline, InkOptions};
use crate::rough::{rough_passes, seed_from_id};
use inkpad_core::host::{TEXT_FONT_SIZE, TEXT_LINE_HEIGHT};
use inkpad_core::{Board, Cursor, Element, ERASER_RADIUS};
use kurbo::{Affine, BezPath, Circle, Point, Shape, Vec2};
use peniko::Color;
use thiserror::Error;

/// Renderer errors, surfaced by rasterizing backends.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Initialization failed: {0}")]
    InitFailed(String),
    #[error("Render failed: {0}")]
    RenderFailed(String),
    #[error("Surface error: {0}")]
    Surface(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// One drawing operation, in world coordinates.
#[derive(Debug, Clone)]
pub enum DrawCommand {
    FillPath {
        path: BezPath,
        color: Color,
    },
    StrokePath {
        path: BezPath,
        color: Color,
        /// Already divided by the viewport scale.
        width: f64,
    },
    FillText {
        /// Top-left anchor of the line.
        origin: Point,
        content: String,
        font_size: f64,
        color: Color,
    },
}

/// Placement of the host's inline text editor while writing.
#[derive(Debug, Clone, Copy)]
pub struct TextOverlay {
    /// Top-left position in window coordinates.
    pub position: Point,
    /// Font size after zoom.
    pub font_size: f64,
    pub color: Color,
}

/// Everything a backend needs to draw one frame.
#[derive(Debug, Clone)]
pub struct Frame {
    /// World-to-screen transform: scale about the origin, then translate
    /// by the scaled pan minus the centering offset.
    pub transform: Affine,
    pub commands: Vec<DrawCommand>,
    pub cursor: Cursor,
    /// Present while the inline text editor is open.
    pub text_overlay: Option<TextOverlay>,
}

/// Translucent fill for the eraser disc.
const ERASER_OVERLAY_COLOR: Color = Color::from_rgba8(120, 120, 120, 90);

/// Build the frame for the board's current state.
pub fn build_frame(board: &Board) -> Frame {
    let viewport = board.viewport();
    let canvas = board.canvas();
    let scale = viewport.scale;
    let offset = viewport.scale_offset(canvas.size);

    let transform = Affine::translate(Vec2::new(
        viewport.pan_offset.x * scale - offset.x,
        viewport.pan_offset.y * scale - offset.y,
    )) * Affine::scale(scale);

    let mut commands = Vec::new();
    for element in board.elements().iter() {
        // The element being typed into is drawn by the host's editor.
        if board.writing_element() == Some(element.id()) {
            continue;
        }
        push_element(&mut commands, element, scale);
    }

    if let Some(center) = board.eraser_position() {
        commands.push(DrawCommand::FillPath {
            path: Circle::new(center, ERASER_RADIUS).to_path(0.01),
            color: ERASER_OVERLAY_COLOR,
        });
    }

    let text_overlay = board.writing_element().and_then(|id| {
        let Element::Text(text) = board.elements().get(id)? else {
            return None;
        };
        let on_canvas = viewport.to_screen(text.origin, canvas.size);
        Some(TextOverlay {
            position: on_canvas + canvas.origin.to_vec2(),
            font_size: TEXT_FONT_SIZE * scale,
            color: text.style.color.into(),
        })
    });

    Frame {
        transform,
        commands,
        cursor: board.cursor(),
        text_overlay,
    }
}

fn push_element(commands: &mut Vec<DrawCommand>, element: &Element, scale: f64) {
    let color: Color = element.style().color.into();
    match element {
        Element::Line(line) => {
            let mut path = BezPath::new();
            path.move_to(line.start);
            path.line_to(line.end);
            push_rough(commands, &path, element, color, scale);
        }
        Element::Rectangle(rect) => {
            let mut path = BezPath::new();
            path.move_to(rect.p1);
            path.line_to(Point::new(rect.p2.x, rect.p1.y));
            path.line_to(rect.p2);
            path.line_to(Point::new(rect.p1.x, rect.p2.y));
            path.close_path();
            push_rough(commands, &path, element, color, scale);
        }
        Element::Freehand(stroke) => {
            let options = InkOptions::for_stroke_width(element.style().stroke_width);
            commands.push(DrawCommand::FillPath {
                path: stroke_outline(&stroke.points, &options),
                color,
            });
        }
        Element::Text(text) => {
            for (i, line) in text.content.split('\n').enumerate() {
                commands.push(DrawCommand::FillText {
                    origin: Point::new(
                        text.origin.x,
                        text.origin.y + i as f64 * TEXT_LINE_HEIGHT,
                    ),
                    content: line.to_string(),
                    font_size: TEXT_FONT_SIZE,
                    color,
                });
            }
        }
    }
}

fn push_rough(
    commands: &mut Vec<DrawCommand>,
    path: &BezPath,
    element: &Element,
    color: Color,
    scale: f64,
) {
    let seed = seed_from_id(element.id());
    let width = element.style().stroke_width / scale;
    for pass in rough_passes(path, scale, seed) {
        commands.push(DrawCommand::StrokePath {
            path: pass,
            color,
            width,
        });
    }
}

/// Backend seam: something that can rasterize a frame.
pub trait RenderSurface {
    fn render(&mut self, frame: &Frame) -> RenderResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rough::STROKE_PASSES;
    use inkpad_core::{
        ApproxTextMeasurer, InputEvent, MemoryStorage, Modifiers, MouseButton, NullNotifier, Tool,
    };

    fn board() -> Board {
        Board::new(
            Box::new(MemoryStorage::new()),
            Box::new(NullNotifier),
            Box::new(ApproxTextMeasurer),
        )
    }

    fn draw(board: &mut Board, tool: Tool, from: Point, to: Point) {
        board.set_tool(tool);
        board.handle_event(InputEvent::PointerDown {
            position: from,
            button: MouseButton::Left,
            modifiers: Modifiers::default(),
        });
        board.handle_event(InputEvent::PointerMove {
            position: to,
            modifiers: Modifiers::default(),
        });
        board.handle_event(InputEvent::PointerUp {
            position: to,
            button: MouseButton::Left,
        });
    }

    #[test]
    fn test_rough_elements_get_two_passes() {
        let mut b = board();
        draw(
            &mut b,
            Tool::Rectangle,
            Point::new(100.0, 100.0),
            Point::new(200.0, 180.0),
        );
        let frame = build_frame(&b);
        let strokes = frame
            .commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::StrokePath { .. }))
            .count();
        assert_eq!(strokes, STROKE_PASSES as usize);
    }

    #[test]
    fn test_stroke_width_counteracts_zoom() {
        let mut b = board();
        draw(
            &mut b,
            Tool::Line,
            Point::new(100.0, 100.0),
            Point::new(200.0, 100.0),
        );
        b.zoom(1.0); // scale 2.0

        let frame = build_frame(&b);
        match frame.commands.first() {
            Some(DrawCommand::StrokePath { width, .. }) => {
                assert!((width - 3.0 / 2.0).abs() < 1e-12);
            }
            other => panic!("expected stroke, got {:?}", other),
        }
    }

    #[test]
    fn test_freehand_becomes_filled_outline() {
        let mut b = board();
        draw(
            &mut b,
            Tool::Pencil,
            Point::new(100.0, 100.0),
            Point::new(180.0, 140.0),
        );
        let frame = build_frame(&b);
        assert!(frame
            .commands
            .iter()
            .any(|c| matches!(c, DrawCommand::FillPath { .. })));
        assert!(!frame
            .commands
            .iter()
            .any(|c| matches!(c, DrawCommand::StrokePath { .. })));
    }

    #[test]
    fn test_writing_element_is_suppressed_with_overlay() {
        let mut b = board();
        b.set_tool(Tool::Text);
        b.handle_event(InputEvent::PointerDown {
            position: Point::new(156.0, 100.0),
            button: MouseButton::Left,
            modifiers: Modifiers::default(),
        });
        assert!(b.is_writing());

        let frame = build_frame(&b);
        assert!(frame.commands.is_empty());
        let overlay = frame.text_overlay.expect("overlay while writing");
        // World (100, 100) back through the identity viewport plus the
        // default canvas origin.
        assert_eq!(overlay.position, Point::new(156.0, 100.0));
        assert_eq!(overlay.font_size, TEXT_FONT_SIZE);

        // After blur, the committed text renders as a text run.
        b.handle_event(InputEvent::EditorBlur {
            content: "one\ntwo".to_string(),
        });
        let frame = build_frame(&b);
        assert!(frame.text_overlay.is_none());
        let texts: Vec<_> = frame
            .commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::FillText {
                    origin, content, ..
                } => Some((*origin, content.clone())),
                _ => None,
            })
            .collect();
        assert_eq!(texts.len(), 2);
        assert_eq!(texts[0].1, "one");
        assert_eq!(texts[1].0.y - texts[0].0.y, TEXT_LINE_HEIGHT);
    }

    #[test]
    fn test_eraser_overlay_present_while_erasing() {
        let mut b = board();
        draw(
            &mut b,
            Tool::Rectangle,
            Point::new(100.0, 100.0),
            Point::new(200.0, 180.0),
        );
        b.set_tool(Tool::Eraser);
        b.handle_event(InputEvent::PointerMove {
            position: Point::new(400.0, 300.0),
            modifiers: Modifiers::default(),
        });

        let frame = build_frame(&b);
        let overlays = frame
            .commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::FillPath { .. }))
            .count();
        assert_eq!(overlays, 1);
    }

    #[test]
    fn test_transform_matches_viewport_math() {
        let mut b = board();
        b.zoom(0.5); // scale 1.5
        b.handle_event(InputEvent::Wheel {
            position: Point::new(0.0, 0.0),
            delta: kurbo::Vec2::new(-30.0, 10.0),
            modifiers: Modifiers::default(),
        });

        let frame = build_frame(&b);
        let world = Point::new(40.0, 70.0);
        let via_transform = frame.transform * world;
        let via_viewport = b.viewport().to_screen(world, b.canvas().size);
        assert!((via_transform.x - via_viewport.x).abs() < 1e-9);
        assert!((via_transform.y - via_viewport.y).abs() < 1e-9);
    }
}
