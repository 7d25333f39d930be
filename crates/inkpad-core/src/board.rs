//! The whiteboard: interaction state machine over history, viewport and
//! persistence.
//!
//! A gesture (pointer-down to pointer-up) produces exactly one history
//! entry: a `commit` at gesture start, then `overwrite` for every
//! subsequent sample, including the pointer-up finalization.

use crate::element::{
    Element, ElementCollection, ElementId, ElementUpdate, SerializableColor, Style, Tool,
};
use crate::geometry::{self, Cursor, Handle};
use crate::history::History;
use crate::host::{
    CanvasGeometry, Notifier, NotifyKind, TextMeasurer, TEXT_FONT_SIZE, TEXT_LINE_HEIGHT,
};
use crate::input::{InputEvent, InputState, Modifiers, MouseButton};
use crate::storage::{Storage, STORAGE_KEY};
use crate::viewport::Viewport;
use kurbo::{Point, Vec2};
use log::{debug, warn};

/// Eraser disc radius in world units.
pub const ERASER_RADIUS: f64 = 10.0;

/// How a grabbed element follows the pointer during a move gesture.
#[derive(Debug, Clone)]
enum Grab {
    /// Rectangle or text: the pointer offset from the anchor corner `p1`
    /// at grab time, plus the element's extent so it moves rigidly.
    /// `anchor` is the original `p1`, kept to detect a no-op move.
    Box {
        id: ElementId,
        anchor: Point,
        offset: Vec2,
        size: Vec2,
    },
    /// Line: the pointer offset from the midpoint, plus the half-extent
    /// towards each endpoint.
    Line {
        id: ElementId,
        offset: Vec2,
        half: Vec2,
    },
    /// Freehand stroke: one pointer offset per sample point.
    Points { id: ElementId, offsets: Vec<Vec2> },
}

/// Current interaction state.
#[derive(Debug, Clone)]
enum Action {
    Idle,
    Drawing { id: ElementId },
    Moving { grab: Grab },
    Resizing { id: ElementId, handle: Handle },
    /// Pan gesture; `start` is the pointer's world position at gesture
    /// start, re-evaluated against the live pan offset each sample.
    Panning { start: Point },
    Erasing,
    /// The inline text editor is open on this element. Only
    /// [`InputEvent::EditorBlur`] leaves this state.
    Writing { id: ElementId },
}

/// Top-level whiteboard state.
///
/// Hosts feed it [`InputEvent`]s and read back the element collection,
/// viewport and cursor to draw a frame.
pub struct Board {
    history: History,
    viewport: Viewport,
    canvas: CanvasGeometry,
    tool: Tool,
    style: Style,
    action: Action,
    input: InputState,
    cursor: Cursor,
    /// Last eraser position in world coordinates, while erasing.
    eraser_position: Option<Point>,
    storage: Box<dyn Storage>,
    notifier: Box<dyn Notifier>,
    measurer: Box<dyn TextMeasurer>,
}

impl Board {
    /// Create a board, restoring the saved drawing if one loads cleanly.
    /// Missing or corrupt saved data yields an empty board, never an error.
    pub fn new(
        storage: Box<dyn Storage>,
        notifier: Box<dyn Notifier>,
        measurer: Box<dyn TextMeasurer>,
    ) -> Self {
        let initial = match storage.load(STORAGE_KEY) {
            Ok(Some(elements)) => elements,
            Ok(None) => ElementCollection::new(),
            Err(e) => {
                warn!("Discarding unreadable saved drawing: {}", e);
                ElementCollection::new()
            }
        };
        Self {
            history: History::new(initial),
            viewport: Viewport::new(),
            canvas: CanvasGeometry::default(),
            tool: Tool::default(),
            style: Style::default(),
            action: Action::Idle,
            input: InputState::new(),
            cursor: Cursor::Default,
            eraser_position: None,
            storage,
            notifier,
            measurer,
        }
    }

    // --- accessors -------------------------------------------------------

    /// The current element collection, as the renderer should draw it.
    pub fn elements(&self) -> &ElementCollection {
        self.history.current()
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn canvas(&self) -> CanvasGeometry {
        self.canvas
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn style(&self) -> Style {
        self.style
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Eraser position in world coordinates, while an erase gesture is
    /// active. The renderer draws the eraser disc here.
    pub fn eraser_position(&self) -> Option<Point> {
        self.eraser_position
    }

    /// Id of the element currently open in the inline text editor.
    pub fn writing_element(&self) -> Option<ElementId> {
        match self.action {
            Action::Writing { id } => Some(id),
            _ => None,
        }
    }

    pub fn is_writing(&self) -> bool {
        matches!(self.action, Action::Writing { .. })
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // --- commands --------------------------------------------------------

    pub fn set_tool(&mut self, tool: Tool) {
        self.tool = tool;
        self.cursor = Cursor::Default;
        if tool != Tool::Eraser {
            self.eraser_position = None;
        }
    }

    pub fn set_color(&mut self, color: SerializableColor) {
        self.style.color = color;
    }

    pub fn set_stroke_width(&mut self, width: f64) {
        self.style.stroke_width = width;
    }

    /// The host calls this when the window or sidebar changes size.
    pub fn resize_canvas(&mut self, canvas: CanvasGeometry) {
        self.canvas = canvas;
    }

    pub fn undo(&mut self) {
        self.history.undo();
        self.persist();
    }

    pub fn redo(&mut self) {
        self.history.redo();
        self.persist();
    }

    pub fn zoom(&mut self, delta: f64) {
        self.viewport.zoom(delta);
    }

    pub fn reset_zoom(&mut self) {
        self.viewport.reset_zoom();
    }

    /// Persist the drawing and tell the user how it went.
    pub fn save(&mut self) {
        match self.storage.save(STORAGE_KEY, self.history.current()) {
            Ok(()) => self
                .notifier
                .notify(NotifyKind::Success, "Drawing saved successfully!"),
            Err(e) => {
                warn!("Failed to save drawing: {}", e);
                self.notifier
                    .notify(NotifyKind::Error, "Failed to save drawing");
            }
        }
    }

    /// Remove the persisted drawing and commit an empty collection.
    /// The clear itself is undoable.
    pub fn clear(&mut self) {
        if let Err(e) = self.storage.clear(STORAGE_KEY) {
            warn!("Failed to clear saved drawing: {}", e);
        }
        self.history.commit(ElementCollection::new());
        self.persist();
        self.notifier.notify(NotifyKind::Success, "Canvas cleared!");
    }

    // --- event handling --------------------------------------------------

    /// Feed one input event through the state machine.
    pub fn handle_event(&mut self, event: InputEvent) {
        self.input.observe(&event);
        match event {
            InputEvent::PointerDown {
                position, button, ..
            } => self.pointer_down(position, button),
            InputEvent::PointerMove { position, .. } => self.pointer_move(position),
            InputEvent::PointerUp { position, .. } => self.pointer_up(position),
            InputEvent::Wheel { delta, modifiers, .. } => self.wheel(delta, modifiers),
            InputEvent::KeyDown { key, modifiers } => self.key_down(&key, modifiers),
            InputEvent::KeyUp { .. } => {}
            InputEvent::EditorBlur { content } => self.editor_blur(content),
        }
    }

    fn to_world(&self, screen: Point) -> Point {
        self.viewport
            .to_world(screen, self.canvas.origin, self.canvas.size)
    }

    fn pointer_down(&mut self, position: Point, button: MouseButton) {
        // Only the editor's blur leaves the writing state.
        if self.is_writing() {
            return;
        }
        let world = self.to_world(position);

        if button == MouseButton::Middle
            || (button == MouseButton::Left && self.input.is_key_pressed(" "))
        {
            self.action = Action::Panning { start: world };
            return;
        }
        if button != MouseButton::Left {
            return;
        }

        match self.tool {
            Tool::Eraser => {
                // The first collision pass is the committed state; later
                // samples overwrite it so the whole sweep is one entry.
                let mut elements = self.history.current().clone();
                elements.retain(|el| !geometry::eraser_hits(world, ERASER_RADIUS, el));
                self.history.commit(elements);
                self.persist();
                self.eraser_position = Some(world);
                self.action = Action::Erasing;
            }
            Tool::Selection => {
                if let Some((id, handle)) = geometry::first_hit(self.history.current(), world) {
                    // Checkpoint the untouched collection so undo restores
                    // the pre-gesture state.
                    let snapshot = self.history.current().clone();
                    self.history.commit(snapshot);
                    self.persist();
                    if handle.is_resize() {
                        debug!("resize gesture on {} via {:?}", id, handle);
                        self.action = Action::Resizing { id, handle };
                    } else if let Some(grab) = self.grab_for(id, world) {
                        debug!("move gesture on {}", id);
                        self.action = Action::Moving { grab };
                    }
                }
            }
            tool => match Element::create(tool, world, world, self.style) {
                Ok(element) => {
                    let id = element.id();
                    let mut elements = self.history.current().clone();
                    elements.push(element);
                    self.history.commit(elements);
                    self.persist();
                    self.action = if tool == Tool::Text {
                        Action::Writing { id }
                    } else {
                        Action::Drawing { id }
                    };
                }
                Err(e) => warn!("Cannot start drawing with {:?}: {}", tool, e),
            },
        }
    }

    fn grab_for(&self, id: ElementId, pointer: Point) -> Option<Grab> {
        match self.history.current().get(id)? {
            Element::Freehand(stroke) => Some(Grab::Points {
                id,
                offsets: stroke.points.iter().map(|p| pointer - *p).collect(),
            }),
            Element::Line(line) => Some(Grab::Line {
                id,
                offset: pointer - line.midpoint(),
                half: (line.end - line.start) / 2.0,
            }),
            Element::Rectangle(rect) => Some(Grab::Box {
                id,
                anchor: rect.p1,
                offset: pointer - rect.p1,
                size: rect.p2 - rect.p1,
            }),
            Element::Text(text) => Some(Grab::Box {
                id,
                anchor: text.origin,
                offset: pointer - text.origin,
                size: text.extent - text.origin,
            }),
        }
    }

    fn pointer_move(&mut self, position: Point) {
        let world = self.to_world(position);
        match self.action.clone() {
            Action::Idle => {
                if self.tool == Tool::Selection {
                    self.cursor = match geometry::first_hit(self.history.current(), world) {
                        Some((_, handle)) => geometry::cursor_for(handle),
                        None => Cursor::Default,
                    };
                } else if self.tool == Tool::Eraser {
                    // Hover preview for the eraser disc.
                    self.eraser_position = Some(world);
                }
            }
            Action::Panning { start } => {
                // The pan feeds back into the next sample's world
                // conversion, as in the original interaction model.
                self.viewport.pan(world - start);
            }
            Action::Drawing { id } => {
                let mut elements = self.history.current().clone();
                let update = match elements.get(id) {
                    Some(Element::Freehand(_)) => ElementUpdate::AppendPoint(world),
                    Some(Element::Line(line)) => ElementUpdate::Geometry(line.start, world),
                    Some(Element::Rectangle(rect)) => ElementUpdate::Geometry(rect.p1, world),
                    _ => return,
                };
                if elements.update(id, update).is_ok() {
                    self.history.overwrite(elements);
                }
            }
            Action::Moving { grab } => {
                let mut elements = self.history.current().clone();
                let result = match grab {
                    Grab::Points { id, offsets } => {
                        let points = offsets.iter().map(|off| world - *off).collect();
                        elements.update(id, ElementUpdate::MovePoints(points))
                    }
                    Grab::Line { id, offset, half } => {
                        let mid = world - offset;
                        elements.update(id, ElementUpdate::Geometry(mid - half, mid + half))
                    }
                    Grab::Box {
                        id, offset, size, ..
                    } => {
                        let p1 = world - offset;
                        elements.update(id, ElementUpdate::Geometry(p1, p1 + size))
                    }
                };
                if result.is_ok() {
                    self.history.overwrite(elements);
                }
            }
            Action::Resizing { id, handle } => {
                let (p1, p2) = match self.history.current().get(id) {
                    Some(Element::Line(line)) => (line.start, line.end),
                    Some(Element::Rectangle(rect)) => (rect.p1, rect.p2),
                    Some(Element::Text(text)) => (text.origin, text.extent),
                    _ => return,
                };
                if let Some((p1, p2)) = geometry::resized_geometry(world, handle, p1, p2) {
                    let mut elements = self.history.current().clone();
                    if elements.update(id, ElementUpdate::Geometry(p1, p2)).is_ok() {
                        self.history.overwrite(elements);
                    }
                }
            }
            Action::Erasing => {
                self.eraser_position = Some(world);
                let mut elements = self.history.current().clone();
                if elements.retain(|el| !geometry::eraser_hits(world, ERASER_RADIUS, el)) {
                    self.history.overwrite(elements);
                }
            }
            Action::Writing { .. } => {}
        }
    }

    fn pointer_up(&mut self, position: Point) {
        let world = self.to_world(position);
        match std::mem::replace(&mut self.action, Action::Idle) {
            Action::Writing { id } => {
                // Still writing; the editor decides when this ends.
                self.action = Action::Writing { id };
            }
            Action::Drawing { id } | Action::Resizing { id, .. } => {
                let mut elements = self.history.current().clone();
                if elements.normalize(id).is_ok() {
                    self.history.overwrite(elements);
                }
                self.persist();
            }
            Action::Moving { grab } => {
                if let Grab::Box {
                    id, anchor, offset, ..
                } = grab
                {
                    // A click on a text element that never moved it
                    // reopens the editor instead of ending the gesture.
                    let is_text =
                        matches!(self.history.current().get(id), Some(Element::Text(_)));
                    if is_text && world - offset == anchor {
                        self.action = Action::Writing { id };
                        return;
                    }
                }
                self.persist();
            }
            Action::Erasing => {
                self.eraser_position = None;
                self.persist();
            }
            Action::Panning { .. } | Action::Idle => {}
        }
    }

    fn wheel(&mut self, delta: Vec2, modifiers: Modifiers) {
        if modifiers.command() {
            self.viewport.zoom(delta.y * -0.01);
        } else {
            self.viewport.pan_offset -= delta;
        }
    }

    fn key_down(&mut self, key: &str, modifiers: Modifiers) {
        if modifiers.command() && key.eq_ignore_ascii_case("z") {
            if modifiers.shift {
                self.redo();
            } else {
                self.undo();
            }
        }
    }

    fn editor_blur(&mut self, content: String) {
        let Action::Writing { id } = self.action else {
            return;
        };
        let origin = match self.history.current().get(id) {
            Some(Element::Text(text)) => text.origin,
            _ => {
                self.action = Action::Idle;
                return;
            }
        };
        let size = self.measurer.measure(&content, TEXT_FONT_SIZE);
        let mut elements = self.history.current().clone();
        match elements.update(
            id,
            ElementUpdate::TextContent {
                origin,
                content,
                measured: (size.width, TEXT_LINE_HEIGHT),
            },
        ) {
            Ok(()) => self.history.overwrite(elements),
            Err(e) => warn!("Failed to store text content: {}", e),
        }
        self.action = Action::Idle;
        self.persist();
    }

    /// Best-effort write-through; failures are logged, never surfaced.
    fn persist(&mut self) {
        if let Err(e) = self.storage.save(STORAGE_KEY, self.history.current()) {
            warn!("Failed to persist drawing: {}", e);
        }
    }
}
