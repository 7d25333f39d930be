//! Pure geometry: distances, hit-testing, resize mapping, eraser collision.
//!
//! All functions operate in world coordinates. Hit tolerances are world
//! units, so the effective on-screen tolerance shrinks as the user zooms
//! in; that matches the observed behavior and is deliberately not scaled.

use crate::element::{Element, ElementCollection, ElementId, Freehand, Line, Rectangle, Text};
use kurbo::Point;

/// Proximity tolerance for hit-testing, in world units.
pub const HIT_TOLERANCE: f64 = 5.0;

/// Which part of an element is under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handle {
    /// Line start endpoint.
    Start,
    /// Line end endpoint.
    End,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    /// Interior (or edge of a box): grabbing moves the element.
    Inside,
    /// On a freehand stroke segment: grabbing moves the stroke.
    Edge,
}

impl Handle {
    /// Whether grabbing this handle starts a resize rather than a move.
    pub fn is_resize(&self) -> bool {
        !matches!(self, Handle::Inside | Handle::Edge)
    }
}

/// Pointer cursor to show for a handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cursor {
    #[default]
    Default,
    Move,
    /// Diagonal resize, north-west/south-east.
    NwseResize,
    /// Diagonal resize, north-east/south-west.
    NeswResize,
}

/// Euclidean distance between two points.
pub fn distance(a: Point, b: Point) -> f64 {
    ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
}

/// Distance from `p` to the segment `a`→`b` (closest point clamped to the
/// segment).
pub fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let len_sq = distance(a, b).powi(2);
    if len_sq == 0.0 {
        return distance(p, a);
    }
    let t = ((p.x - a.x) * (b.x - a.x) + (p.y - a.y) * (b.y - a.y)) / len_sq;
    let t = t.clamp(0.0, 1.0);
    let projection = Point::new(a.x + t * (b.x - a.x), a.y + t * (b.y - a.y));
    distance(p, projection)
}

/// Whether `p` lies on the segment `a`→`b`, within `tolerance`.
///
/// Uses a near-collinearity check (sum of endpoint distances against the
/// segment length) rather than projection, so at low tolerances it also
/// lightly accepts points just beyond the segment's extent.
pub fn on_segment(a: Point, b: Point, p: Point, tolerance: f64) -> bool {
    let offset = distance(a, b) - (distance(a, p) + distance(b, p));
    offset.abs() < tolerance
}

fn near_point(p: Point, target: Point) -> bool {
    (p.x - target.x).abs() < HIT_TOLERANCE && (p.y - target.y).abs() < HIT_TOLERANCE
}

/// Which part of `element` (if any) is under `point`.
pub fn hit_test(point: Point, element: &Element) -> Option<Handle> {
    match element {
        Element::Line(line) => hit_test_line(point, line),
        Element::Rectangle(rect) => {
            let (min, max) = rect.normalized_corners();
            hit_test_box(point, min, max)
        }
        Element::Freehand(stroke) => hit_test_stroke(point, stroke),
        Element::Text(text) => {
            let (min, max) = text.normalized_corners();
            hit_test_box(point, min, max)
        }
    }
}

fn hit_test_line(point: Point, line: &Line) -> Option<Handle> {
    // Endpoints take priority over the segment body.
    if near_point(point, line.start) {
        return Some(Handle::Start);
    }
    if near_point(point, line.end) {
        return Some(Handle::End);
    }
    on_segment(line.start, line.end, point, HIT_TOLERANCE).then_some(Handle::Inside)
}

fn hit_test_box(point: Point, min: Point, max: Point) -> Option<Handle> {
    // Corners take priority over edges.
    if near_point(point, min) {
        return Some(Handle::TopLeft);
    }
    if near_point(point, Point::new(max.x, min.y)) {
        return Some(Handle::TopRight);
    }
    if near_point(point, Point::new(min.x, max.y)) {
        return Some(Handle::BottomLeft);
    }
    if near_point(point, max) {
        return Some(Handle::BottomRight);
    }

    let near_edge = (point.y - min.y).abs() <= HIT_TOLERANCE
        || (point.y - max.y).abs() <= HIT_TOLERANCE
        || (point.x - min.x).abs() <= HIT_TOLERANCE
        || (point.x - max.x).abs() <= HIT_TOLERANCE;
    let within = point.x >= min.x && point.x <= max.x && point.y >= min.y && point.y <= max.y;
    (near_edge && within).then_some(Handle::Inside)
}

fn hit_test_stroke(point: Point, stroke: &Freehand) -> Option<Handle> {
    stroke
        .points
        .windows(2)
        .any(|w| on_segment(w[0], w[1], point, HIT_TOLERANCE))
        .then_some(Handle::Edge)
}

/// First element in storage order under `point`.
///
/// Storage order, not paint order: on overlap the earliest-created element
/// wins even if another is drawn on top of it. Preserved as observed.
pub fn first_hit(collection: &ElementCollection, point: Point) -> Option<(ElementId, Handle)> {
    collection
        .iter()
        .find_map(|element| hit_test(point, element).map(|h| (element.id(), h)))
}

/// Pointer cursor for a hit handle.
pub fn cursor_for(handle: Handle) -> Cursor {
    match handle {
        Handle::TopLeft | Handle::BottomRight | Handle::Start | Handle::End => Cursor::NwseResize,
        Handle::TopRight | Handle::BottomLeft => Cursor::NeswResize,
        Handle::Inside | Handle::Edge => Cursor::Move,
    }
}

/// New `(p1, p2)` geometry after dragging `handle` to `pointer`, holding
/// the opposite corner/endpoint fixed.
///
/// Returns `None` for handles that do not name a corner or endpoint; a
/// resize gesture can only have been started from one that does.
pub fn resized_geometry(pointer: Point, handle: Handle, p1: Point, p2: Point) -> Option<(Point, Point)> {
    match handle {
        Handle::TopLeft | Handle::Start => Some((pointer, p2)),
        Handle::TopRight => Some((Point::new(p1.x, pointer.y), Point::new(pointer.x, p2.y))),
        Handle::BottomLeft => Some((Point::new(pointer.x, p1.y), Point::new(p2.x, pointer.y))),
        Handle::BottomRight | Handle::End => Some((p1, pointer)),
        Handle::Inside | Handle::Edge => None,
    }
}

/// Whether the eraser disc at `point` with `radius` touches `element`.
pub fn eraser_hits(point: Point, radius: f64, element: &Element) -> bool {
    match element {
        Element::Line(line) => distance_to_segment(point, line.start, line.end) <= radius,
        Element::Rectangle(Rectangle { p1, p2, .. }) => box_edge_distance(point, *p1, *p2) <= radius,
        Element::Text(Text { origin, extent, .. }) => {
            box_edge_distance(point, *origin, *extent) <= radius
        }
        Element::Freehand(stroke) => stroke
            .points
            .windows(2)
            .any(|w| distance_to_segment(point, w[0], w[1]) <= radius),
    }
}

/// Minimum distance from `point` to any of the four edges of the box
/// spanned by `a` and `b` (normalized internally).
fn box_edge_distance(point: Point, a: Point, b: Point) -> f64 {
    let min = Point::new(a.x.min(b.x), a.y.min(b.y));
    let max = Point::new(a.x.max(b.x), a.y.max(b.y));
    let tr = Point::new(max.x, min.y);
    let bl = Point::new(min.x, max.y);
    [
        distance_to_segment(point, min, tr),
        distance_to_segment(point, tr, max),
        distance_to_segment(point, bl, max),
        distance_to_segment(point, min, bl),
    ]
    .into_iter()
    .fold(f64::INFINITY, f64::min)
}
