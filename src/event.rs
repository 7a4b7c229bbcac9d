// src/event.rs

//! The canonical event stream handed to game logic.
//!
//! Every OS input, whatever its origin, is normalised into a `RogueEvent`.
//! For keystrokes `param1` carries either a named key code from [`key_codes`]
//! or a raw character code; for mouse kinds `param1`/`param2` are cell
//! coordinates, which may be negative or beyond the grid near its edges.

/// Named key codes carried in `param1` of a keystroke.
pub mod key_codes {
    pub const UP_ARROW: i32 = 63232;
    pub const DOWN_ARROW: i32 = 63233;
    pub const LEFT_ARROW: i32 = 63234;
    pub const RIGHT_ARROW: i32 = 63235;
    pub const ESCAPE_KEY: i32 = 0x1B;
    pub const RETURN_KEY: i32 = 0x0A;
    pub const DELETE_KEY: i32 = 0x7F;
    pub const TAB_KEY: i32 = 0x09;
    pub const NUMPAD_0: i32 = 48;

    /// Key code for keypad digit `digit` (0–9).
    pub const fn numpad(digit: u8) -> i32 {
        NUMPAD_0 + digit as i32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EventKind {
    Keystroke,
    MouseDown,
    MouseUp,
    RightMouseDown,
    RightMouseUp,
    MouseEnteredCell,
    /// No event available.
    #[default]
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RogueEvent {
    pub kind: EventKind,
    pub param1: i32,
    pub param2: i32,
    pub shift_key: bool,
    pub control_key: bool,
}

impl RogueEvent {
    pub fn keystroke(code: i32) -> Self {
        Self {
            kind: EventKind::Keystroke,
            param1: code,
            ..Self::default()
        }
    }

    pub fn mouse(kind: EventKind, cell_x: i32, cell_y: i32) -> Self {
        Self {
            kind,
            param1: cell_x,
            param2: cell_y,
            ..Self::default()
        }
    }

    /// Attaches the modifier state sampled for the current poll.
    pub fn with_modifiers(mut self, shift_key: bool, control_key: bool) -> Self {
        self.shift_key = shift_key;
        self.control_key = control_key;
        self
    }

    pub fn is_mouse_motion(&self) -> bool {
        self.kind == EventKind::MouseEnteredCell
    }
}
