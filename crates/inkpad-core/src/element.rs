//! Element definitions for the whiteboard.

use kurbo::Point;
use peniko::Color;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Unique identifier for elements.
///
/// Ids are assigned at creation and never reused. Storage order in the
/// collection is a separate concern; consumers must never treat an id as
/// an index.
pub type ElementId = Uuid;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub fn red() -> Self {
        Self::new(224, 49, 49, 255)
    }

    pub fn blue() -> Self {
        Self::new(25, 113, 194, 255)
    }

    pub fn green() -> Self {
        Self::new(47, 158, 68, 255)
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Stroke size presets offered by the toolbar.
pub const STROKE_THIN: f64 = 2.0;
pub const STROKE_MEDIUM: f64 = 5.0;
pub const STROKE_THICK: f64 = 8.0;

/// Style properties for new elements.
///
/// Mutated by toolbar selection only; existing elements keep the style they
/// were created with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Style {
    /// Stroke (and text) color.
    pub color: SerializableColor,
    /// Stroke width in world units.
    pub stroke_width: f64,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            color: SerializableColor::black(),
            stroke_width: 3.0,
        }
    }
}

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Tool {
    Selection,
    Line,
    #[default]
    Rectangle,
    Pencil,
    Text,
    Eraser,
}

impl Tool {
    /// Whether the tool creates an element on pointer-down.
    pub fn is_drawing_tool(&self) -> bool {
        matches!(self, Tool::Line | Tool::Rectangle | Tool::Pencil | Tool::Text)
    }
}

/// Element errors. These indicate internal invariant violations, not user
/// input problems, and are never swallowed.
#[derive(Debug, Error, PartialEq)]
pub enum ElementError {
    #[error("tool {0:?} does not create elements")]
    InvalidElementType(Tool),
    #[error("update does not apply to a {0} element")]
    InvalidUpdate(&'static str),
    #[error("unknown element id {0}")]
    UnknownId(ElementId),
}

/// A straight line segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub id: ElementId,
    pub start: Point,
    pub end: Point,
    pub style: Style,
}

impl Line {
    pub fn new(start: Point, end: Point, style: Style) -> Self {
        Self {
            id: Uuid::new_v4(),
            start,
            end,
            style,
        }
    }

    pub fn midpoint(&self) -> Point {
        Point::new(
            (self.start.x + self.end.x) / 2.0,
            (self.start.y + self.end.y) / 2.0,
        )
    }

    /// Order the endpoints so `start` is lexicographically smaller.
    ///
    /// This gives resize handles a canonical meaning: `start` is always the
    /// leftmost endpoint (topmost for vertical lines).
    pub fn normalize(&mut self) {
        let keep = self.start.x < self.end.x
            || (self.start.x == self.end.x && self.start.y < self.end.y);
        if !keep {
            std::mem::swap(&mut self.start, &mut self.end);
        }
    }
}

/// An axis-aligned rectangle defined by two corners.
///
/// During a live drag the corners follow the gesture and may be inverted;
/// they are normalized to min/max order only when the gesture commits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    pub id: ElementId,
    pub p1: Point,
    pub p2: Point,
    pub style: Style,
}

impl Rectangle {
    pub fn new(p1: Point, p2: Point, style: Style) -> Self {
        Self {
            id: Uuid::new_v4(),
            p1,
            p2,
            style,
        }
    }

    /// Corners in min/max order without mutating the element.
    pub fn normalized_corners(&self) -> (Point, Point) {
        (
            Point::new(self.p1.x.min(self.p2.x), self.p1.y.min(self.p2.y)),
            Point::new(self.p1.x.max(self.p2.x), self.p1.y.max(self.p2.y)),
        )
    }

    pub fn normalize(&mut self) {
        let (min, max) = self.normalized_corners();
        self.p1 = min;
        self.p2 = max;
    }
}

/// A freehand pencil stroke.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Freehand {
    pub id: ElementId,
    pub points: Vec<Point>,
    pub style: Style,
}

impl Freehand {
    /// A stroke starts with a single point at the pointer-down position.
    pub fn new(start: Point, style: Style) -> Self {
        Self {
            id: Uuid::new_v4(),
            points: vec![start],
            style,
        }
    }

    pub fn add_point(&mut self, point: Point) {
        self.points.push(point);
    }
}

/// A text run anchored at its top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    pub id: ElementId,
    /// Top-left corner.
    pub origin: Point,
    /// Bottom-right corner, sized from the measured text when committed.
    pub extent: Point,
    pub content: String,
    pub style: Style,
}

impl Text {
    /// Text starts empty; content arrives when the inline editor blurs.
    pub fn new(origin: Point, style: Style) -> Self {
        Self {
            id: Uuid::new_v4(),
            origin,
            extent: origin,
            content: String::new(),
            style,
        }
    }

    /// Corners in min/max order without mutating the element.
    pub fn normalized_corners(&self) -> (Point, Point) {
        (
            Point::new(
                self.origin.x.min(self.extent.x),
                self.origin.y.min(self.extent.y),
            ),
            Point::new(
                self.origin.x.max(self.extent.x),
                self.origin.y.max(self.extent.y),
            ),
        )
    }
}

/// A geometry or content change applied through the collection.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementUpdate {
    /// Replace both corner/end points (line, rectangle, text box).
    Geometry(Point, Point),
    /// Append a sample to a freehand stroke.
    AppendPoint(Point),
    /// Replace all points of a freehand stroke (rigid move).
    MovePoints(Vec<Point>),
    /// Store committed text content and its measured size.
    TextContent {
        origin: Point,
        content: String,
        measured: (f64, f64),
    },
}

/// One drawable primitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Element {
    Line(Line),
    Rectangle(Rectangle),
    #[serde(rename = "pencil")]
    Freehand(Freehand),
    Text(Text),
}

impl Element {
    /// Create a zero-size element for the given drawing tool at `p1`.
    ///
    /// Pencil ignores `p2` and starts with a single point; text starts
    /// empty. Non-drawing tools are a caller bug.
    pub fn create(tool: Tool, p1: Point, p2: Point, style: Style) -> Result<Self, ElementError> {
        match tool {
            Tool::Line => Ok(Element::Line(Line::new(p1, p2, style))),
            Tool::Rectangle => Ok(Element::Rectangle(Rectangle::new(p1, p2, style))),
            Tool::Pencil => Ok(Element::Freehand(Freehand::new(p1, style))),
            Tool::Text => Ok(Element::Text(Text::new(p1, style))),
            Tool::Selection | Tool::Eraser => Err(ElementError::InvalidElementType(tool)),
        }
    }

    pub fn id(&self) -> ElementId {
        match self {
            Element::Line(e) => e.id,
            Element::Rectangle(e) => e.id,
            Element::Freehand(e) => e.id,
            Element::Text(e) => e.id,
        }
    }

    pub fn style(&self) -> &Style {
        match self {
            Element::Line(e) => &e.style,
            Element::Rectangle(e) => &e.style,
            Element::Freehand(e) => &e.style,
            Element::Text(e) => &e.style,
        }
    }

    /// Whether commit-time coordinate adjustment applies to this element.
    pub fn needs_normalization(&self) -> bool {
        matches!(self, Element::Line(_) | Element::Rectangle(_))
    }

    /// Canonicalize coordinates: rectangles to min/max corner order, lines
    /// to lexicographic endpoint order. Identity for pencil and text.
    /// Idempotent.
    pub fn normalize(&mut self) {
        match self {
            Element::Line(line) => line.normalize(),
            Element::Rectangle(rect) => rect.normalize(),
            Element::Freehand(_) | Element::Text(_) => {}
        }
    }

    fn apply(&mut self, update: ElementUpdate) -> Result<(), ElementError> {
        match (self, update) {
            (Element::Line(line), ElementUpdate::Geometry(p1, p2)) => {
                line.start = p1;
                line.end = p2;
                Ok(())
            }
            (Element::Rectangle(rect), ElementUpdate::Geometry(p1, p2)) => {
                rect.p1 = p1;
                rect.p2 = p2;
                Ok(())
            }
            (Element::Text(text), ElementUpdate::Geometry(p1, p2)) => {
                text.origin = p1;
                text.extent = p2;
                Ok(())
            }
            (Element::Freehand(stroke), ElementUpdate::AppendPoint(p)) => {
                stroke.add_point(p);
                Ok(())
            }
            (Element::Freehand(stroke), ElementUpdate::MovePoints(points)) => {
                stroke.points = points;
                Ok(())
            }
            (Element::Text(text), ElementUpdate::TextContent { origin, content, measured }) => {
                text.origin = origin;
                text.extent = Point::new(origin.x + measured.0, origin.y + measured.1);
                text.content = content;
                Ok(())
            }
            (el, _) => Err(ElementError::InvalidUpdate(el.kind_name())),
        }
    }

    fn kind_name(&self) -> &'static str {
        match self {
            Element::Line(_) => "line",
            Element::Rectangle(_) => "rectangle",
            Element::Freehand(_) => "pencil",
            Element::Text(_) => "text",
        }
    }
}

/// The ordered sequence of all current elements.
///
/// Serializes as a flat JSON array, which is also the persisted format.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementCollection {
    elements: Vec<Element>,
}

impl ElementCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Append a new element at the end of storage order.
    pub fn push(&mut self, element: Element) {
        self.elements.push(element);
    }

    /// Elements in storage order.
    pub fn iter(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter()
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id() == id)
    }

    fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| e.id() == id)
    }

    /// Apply an update to the element with the given id, preserving its id
    /// and style.
    pub fn update(&mut self, id: ElementId, update: ElementUpdate) -> Result<(), ElementError> {
        self.get_mut(id)
            .ok_or(ElementError::UnknownId(id))?
            .apply(update)
    }

    /// Normalize the element with the given id in place.
    pub fn normalize(&mut self, id: ElementId) -> Result<(), ElementError> {
        let element = self.get_mut(id).ok_or(ElementError::UnknownId(id))?;
        element.normalize();
        Ok(())
    }

    /// Remove every element the predicate rejects. Returns whether anything
    /// was removed.
    pub fn retain(&mut self, f: impl FnMut(&Element) -> bool) -> bool {
        let before = self.elements.len();
        self.elements.retain(f);
        self.elements.len() != before
    }
}

impl FromIterator<Element> for ElementCollection {
    fn from_iter<T: IntoIterator<Item = Element>>(iter: T) -> Self {
        Self {
            elements: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_per_tool() {
        let style = Style::default();
        let p1 = Point::new(10.0, 20.0);
        let p2 = Point::new(30.0, 40.0);

        assert!(matches!(
            Element::create(Tool::Line, p1, p2, style),
            Ok(Element::Line(_))
        ));
        assert!(matches!(
            Element::create(Tool::Rectangle, p1, p2, style),
            Ok(Element::Rectangle(_))
        ));

        // Pencil ignores p2 and starts with one point.
        if let Ok(Element::Freehand(stroke)) = Element::create(Tool::Pencil, p1, p2, style) {
            assert_eq!(stroke.points, vec![p1]);
        } else {
            panic!("expected freehand");
        }

        // Text starts empty at its origin.
        if let Ok(Element::Text(text)) = Element::create(Tool::Text, p1, p2, style) {
            assert!(text.content.is_empty());
            assert_eq!(text.origin, p1);
        } else {
            panic!("expected text");
        }
    }

    #[test]
    fn test_create_rejects_non_drawing_tools() {
        let p = Point::ZERO;
        assert_eq!(
            Element::create(Tool::Selection, p, p, Style::default()),
            Err(ElementError::InvalidElementType(Tool::Selection))
        );
        assert_eq!(
            Element::create(Tool::Eraser, p, p, Style::default()),
            Err(ElementError::InvalidElementType(Tool::Eraser))
        );
    }

    #[test]
    fn test_rectangle_normalize_orders_corners() {
        let mut rect = Rectangle::new(
            Point::new(100.0, 10.0),
            Point::new(20.0, 90.0),
            Style::default(),
        );
        rect.normalize();
        assert_eq!(rect.p1, Point::new(20.0, 10.0));
        assert_eq!(rect.p2, Point::new(100.0, 90.0));

        // Idempotent.
        let once = rect.clone();
        rect.normalize();
        assert_eq!(rect, once);
    }

    #[test]
    fn test_line_normalize_lexicographic() {
        let mut line = Line::new(
            Point::new(50.0, 0.0),
            Point::new(10.0, 100.0),
            Style::default(),
        );
        line.normalize();
        assert_eq!(line.start, Point::new(10.0, 100.0));
        assert_eq!(line.end, Point::new(50.0, 0.0));

        // Vertical line: smaller y first.
        let mut vertical = Line::new(
            Point::new(5.0, 80.0),
            Point::new(5.0, 20.0),
            Style::default(),
        );
        vertical.normalize();
        assert_eq!(vertical.start, Point::new(5.0, 20.0));
    }

    #[test]
    fn test_update_preserves_id_and_style() {
        let style = Style {
            color: SerializableColor::red(),
            stroke_width: STROKE_THICK,
        };
        let element =
            Element::create(Tool::Rectangle, Point::ZERO, Point::new(10.0, 10.0), style).unwrap();
        let id = element.id();

        let mut collection: ElementCollection = [element].into_iter().collect();
        collection
            .update(
                id,
                ElementUpdate::Geometry(Point::new(5.0, 5.0), Point::new(50.0, 50.0)),
            )
            .unwrap();

        let updated = collection.get(id).unwrap();
        assert_eq!(updated.id(), id);
        assert_eq!(*updated.style(), style);
    }

    #[test]
    fn test_update_kind_mismatch() {
        let element =
            Element::create(Tool::Rectangle, Point::ZERO, Point::ZERO, Style::default()).unwrap();
        let id = element.id();
        let mut collection: ElementCollection = [element].into_iter().collect();

        let err = collection
            .update(id, ElementUpdate::AppendPoint(Point::new(1.0, 1.0)))
            .unwrap_err();
        assert_eq!(err, ElementError::InvalidUpdate("rectangle"));
    }

    #[test]
    fn test_update_unknown_id() {
        let mut collection = ElementCollection::new();
        let id = Uuid::new_v4();
        assert_eq!(
            collection.update(id, ElementUpdate::AppendPoint(Point::ZERO)),
            Err(ElementError::UnknownId(id))
        );
    }

    #[test]
    fn test_serde_roundtrip_keeps_order() {
        let style = Style::default();
        let a = Element::create(Tool::Line, Point::ZERO, Point::new(1.0, 1.0), style).unwrap();
        let b = Element::create(Tool::Pencil, Point::new(2.0, 2.0), Point::ZERO, style).unwrap();
        let collection: ElementCollection = [a, b].into_iter().collect();

        let json = serde_json::to_string(&collection).unwrap();
        assert!(json.starts_with('['), "persists as a flat array: {json}");
        let back: ElementCollection = serde_json::from_str(&json).unwrap();
        assert_eq!(back, collection);
    }
}
