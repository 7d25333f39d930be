//! End-to-end gesture tests: the board driven purely through synthetic
//! input events, the way a host shell would.

use inkpad_core::{
    ApproxTextMeasurer, Board, Element, ElementCollection, InputEvent, MemoryStorage, Modifiers,
    MouseButton, NullNotifier, Storage, Tool, STORAGE_KEY,
};
use kurbo::Point;
use std::sync::Arc;

fn board_with(storage: Arc<MemoryStorage>) -> Board {
    Board::new(
        Box::new(storage),
        Box::new(NullNotifier),
        Box::new(ApproxTextMeasurer),
    )
}

fn board() -> Board {
    board_with(Arc::new(MemoryStorage::new()))
}

/// Convert a world coordinate to the screen position that maps onto it
/// at the default viewport.
fn at(board: &Board, x: f64, y: f64) -> Point {
    Point::new(x + board.canvas().origin.x, y + board.canvas().origin.y)
}

fn pointer_down(board: &mut Board, pos: Point) {
    board.handle_event(InputEvent::PointerDown {
        position: pos,
        button: MouseButton::Left,
        modifiers: Modifiers::default(),
    });
}

fn pointer_move(board: &mut Board, pos: Point) {
    board.handle_event(InputEvent::PointerMove {
        position: pos,
        modifiers: Modifiers::default(),
    });
}

fn pointer_up(board: &mut Board, pos: Point) {
    board.handle_event(InputEvent::PointerUp {
        position: pos,
        button: MouseButton::Left,
    });
}

fn drag(board: &mut Board, from: Point, through: &[Point]) {
    pointer_down(board, from);
    for &p in through {
        pointer_move(board, p);
    }
    let last = through.last().copied().unwrap_or(from);
    pointer_up(board, last);
}

fn rect_geometry(board: &Board) -> (Point, Point) {
    match board.elements().iter().next().expect("no elements") {
        Element::Rectangle(r) => (r.p1, r.p2),
        other => panic!("expected rectangle, got {:?}", other),
    }
}

#[test]
fn draw_move_undo_redo_roundtrip() {
    let mut b = board();

    // Draw a rectangle from (10,10) to (60,50), sampling a few moves.
    b.set_tool(Tool::Rectangle);
    let from = at(&b, 10.0, 10.0);
    let through = [at(&b, 30.0, 20.0), at(&b, 60.0, 50.0)];
    drag(&mut b, from, &through);
    assert_eq!(b.elements().len(), 1);
    assert_eq!(rect_geometry(&b), (Point::new(10.0, 10.0), Point::new(60.0, 50.0)));

    // Grab its top edge with the selection tool and move it by (100, 100).
    b.set_tool(Tool::Selection);
    let from = at(&b, 35.0, 10.0);
    let through = [at(&b, 80.0, 60.0), at(&b, 135.0, 110.0)];
    drag(&mut b, from, &through);
    assert_eq!(rect_geometry(&b), (Point::new(110.0, 110.0), Point::new(160.0, 150.0)));

    // Undo the move, then the draw.
    b.undo();
    assert_eq!(rect_geometry(&b), (Point::new(10.0, 10.0), Point::new(60.0, 50.0)));
    b.undo();
    assert_eq!(b.elements().len(), 0);

    // Redo both.
    b.redo();
    assert_eq!(rect_geometry(&b), (Point::new(10.0, 10.0), Point::new(60.0, 50.0)));
    b.redo();
    assert_eq!(rect_geometry(&b), (Point::new(110.0, 110.0), Point::new(160.0, 150.0)));
}

#[test]
fn freehand_erase_is_one_undoable_checkpoint() {
    let mut b = board();

    // Draw a freehand stroke along y=0.
    b.set_tool(Tool::Pencil);
    let from = at(&b, 0.0, 0.0);
    let through = [at(&b, 40.0, 0.0), at(&b, 80.0, 0.0), at(&b, 120.0, 0.0)];
    drag(&mut b, from, &through);
    assert_eq!(b.elements().len(), 1);
    let entries_after_draw = 2; // initial empty + the stroke

    // Sweep the eraser across it with several samples.
    b.set_tool(Tool::Eraser);
    let from = at(&b, 60.0, 30.0);
    let through = [at(&b, 60.0, 15.0), at(&b, 60.0, 5.0), at(&b, 60.0, -5.0)];
    drag(&mut b, from, &through);
    assert_eq!(b.elements().len(), 0);

    // The whole sweep is a single checkpoint: one undo restores the
    // stroke, one redo removes it again.
    b.undo();
    assert_eq!(b.elements().len(), 1);
    b.redo();
    assert_eq!(b.elements().len(), 0);
    b.undo();
    assert_eq!(b.elements().len(), entries_after_draw - 1);
}

#[test]
fn drawing_survives_reload_through_storage() {
    let storage = Arc::new(MemoryStorage::new());
    {
        let mut b = board_with(storage.clone());
        b.set_tool(Tool::Line);
        let from = at(&b, 5.0, 5.0);
        let through = [at(&b, 50.0, 5.0)];
        drag(&mut b, from, &through);
        b.save();
    }

    let b = board_with(storage);
    assert_eq!(b.elements().len(), 1);
    match b.elements().iter().next().unwrap() {
        Element::Line(l) => {
            assert_eq!(l.start, Point::new(5.0, 5.0));
            assert_eq!(l.end, Point::new(50.0, 5.0));
        }
        other => panic!("expected line, got {:?}", other),
    }
}

#[test]
fn corrupt_saved_data_starts_empty() {
    let storage = Arc::new(MemoryStorage::new());
    storage.insert_raw(STORAGE_KEY, "{definitely not elements");

    let b = board_with(storage);
    assert_eq!(b.elements().len(), 0);
}

#[test]
fn gestures_mirror_to_storage_without_explicit_save() {
    let storage = Arc::new(MemoryStorage::new());
    let mut b = board_with(storage.clone());

    b.set_tool(Tool::Rectangle);
    let from = at(&b, 0.0, 0.0);
    let through = [at(&b, 20.0, 20.0)];
    drag(&mut b, from, &through);

    let persisted: ElementCollection = storage.load(STORAGE_KEY).unwrap().unwrap();
    assert_eq!(persisted.len(), 1);
}

#[test]
fn text_gesture_writes_measured_content() {
    let mut b = board();

    b.set_tool(Tool::Text);
    let pos = at(&b, 200.0, 100.0);
    pointer_down(&mut b, pos);
    pointer_up(&mut b, pos);
    assert!(b.is_writing());
    assert!(b.writing_element().is_some());

    b.handle_event(InputEvent::EditorBlur {
        content: "hello world".to_string(),
    });
    assert!(!b.is_writing());

    match b.elements().iter().next().unwrap() {
        Element::Text(t) => {
            assert_eq!(t.content, "hello world");
            assert_eq!(t.origin, Point::new(200.0, 100.0));
            assert_eq!(t.extent.y - t.origin.y, 24.0);
        }
        other => panic!("expected text, got {:?}", other),
    }

    // The whole create-and-type flow is one undoable step.
    b.undo();
    assert_eq!(b.elements().len(), 0);
}

#[test]
fn pan_and_zoom_shift_where_gestures_land() {
    let mut b = board();

    // Zoom out to 50% via the command-modified wheel.
    for _ in 0..50 {
        b.handle_event(InputEvent::Wheel {
            position: at(&b, 0.0, 0.0),
            delta: kurbo::Vec2::new(0.0, 1.0),
            modifiers: Modifiers {
                ctrl: true,
                ..Default::default()
            },
        });
    }
    assert!((b.viewport().scale - 0.5).abs() < 1e-9);

    // A click at the canvas center still maps to the same world point
    // (zoom is centered), so a rectangle drawn there lands around it.
    let size = b.canvas().size;
    let center = Point::new(
        b.canvas().origin.x + size.width / 2.0,
        b.canvas().origin.y + size.height / 2.0,
    );
    b.set_tool(Tool::Rectangle);
    drag(&mut b, center, &[Point::new(center.x + 10.0, center.y + 10.0)]);

    let (p1, _) = rect_geometry(&b);
    assert!((p1.x - size.width / 2.0).abs() < 1e-9);
    assert!((p1.y - size.height / 2.0).abs() < 1e-9);
}
