//! Input events injected by the host shell.
//!
//! The board never reads devices itself; the embedding layer translates
//! its native events into this stream and feeds them to
//! [`Board::handle_event`](crate::board::Board::handle_event).

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Modifier keys state, sampled by the host at event time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    /// True if either platform command modifier is held.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// A single input event. Pointer positions are in screen (window)
/// coordinates; the board converts to world coordinates itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum InputEvent {
    PointerDown {
        position: Point,
        button: MouseButton,
        modifiers: Modifiers,
    },
    PointerMove {
        position: Point,
        modifiers: Modifiers,
    },
    PointerUp {
        position: Point,
        button: MouseButton,
    },
    /// Wheel scroll. With a command modifier held this zooms, otherwise
    /// it pans.
    Wheel {
        position: Point,
        delta: Vec2,
        modifiers: Modifiers,
    },
    KeyDown {
        key: String,
        modifiers: Modifiers,
    },
    KeyUp {
        key: String,
    },
    /// The inline text editor lost focus; `content` is its final text.
    EditorBlur {
        content: String,
    },
}

/// Tracks held keys and buttons across events.
///
/// The board needs this for chorded gestures: space + left drag pans,
/// and moving a grabbed element only while the left button stays down.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Current pointer position in screen coordinates.
    pub pointer_position: Point,
    pressed_buttons: HashSet<MouseButton>,
    pressed_keys: HashSet<String>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update held-state bookkeeping from an event. The board calls this
    /// before its own dispatch so queries reflect the event being handled.
    pub fn observe(&mut self, event: &InputEvent) {
        match event {
            InputEvent::PointerDown {
                position, button, ..
            } => {
                self.pointer_position = *position;
                self.pressed_buttons.insert(*button);
            }
            InputEvent::PointerMove { position, .. } => {
                self.pointer_position = *position;
            }
            InputEvent::PointerUp { position, button } => {
                self.pointer_position = *position;
                self.pressed_buttons.remove(button);
            }
            InputEvent::Wheel { position, .. } => {
                self.pointer_position = *position;
            }
            InputEvent::KeyDown { key, .. } => {
                self.pressed_keys.insert(key.clone());
            }
            InputEvent::KeyUp { key } => {
                self.pressed_keys.remove(key);
            }
            InputEvent::EditorBlur { .. } => {}
        }
    }

    /// Check if a button is currently pressed.
    pub fn is_button_pressed(&self, button: MouseButton) -> bool {
        self.pressed_buttons.contains(&button)
    }

    /// Check if a key is currently pressed.
    pub fn is_key_pressed(&self, key: &str) -> bool {
        self.pressed_keys.contains(key)
    }
}
