//! Inkpad Core Library
//!
//! Host-agnostic state and logic for the Inkpad freehand whiteboard:
//! elements, hit-testing, undo history, viewport transform, the
//! interaction state machine and persistence.

pub mod board;
pub mod element;
pub mod geometry;
pub mod history;
pub mod host;
pub mod input;
pub mod storage;
pub mod viewport;

pub use board::{Board, ERASER_RADIUS};
pub use element::{
    Element, ElementCollection, ElementId, ElementUpdate, SerializableColor, Style, Tool,
    STROKE_MEDIUM, STROKE_THICK, STROKE_THIN,
};
pub use geometry::{Cursor, Handle, HIT_TOLERANCE};
pub use history::History;
pub use host::{
    ApproxTextMeasurer, CanvasGeometry, Notifier, NotifyKind, NullNotifier, TextMeasurer,
};
pub use input::{InputEvent, InputState, Modifiers, MouseButton};
pub use storage::{MemoryStorage, Storage, StorageError, STORAGE_KEY};
pub use viewport::Viewport;

#[cfg(not(target_arch = "wasm32"))]
pub use storage::FileStorage;
