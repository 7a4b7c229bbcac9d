// src/keys.rs

use bitflags::bitflags;

bitflags! {
    /// Represents the keyboard modifiers held at the time an event is sampled.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const SHIFT = 1 << 0;
        const CONTROL = 1 << 1;
        const ALT = 1 << 2; // Also known as Option on macOS
    }
}

/// Represents a physical key as reported by a display backend.
///
/// This is the backend-neutral key vocabulary; the input translator decides
/// which of these become canonical keystrokes. Printable characters normally
/// arrive through a separate text-input event, so `Char` is only meaningful
/// for keys that produce no text (e.g. Ctrl+letter).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeySymbol {
    // Alphanumeric keys
    Char(char),

    // Function keys
    F11,
    F12,

    // Navigation keys
    Left,
    Right,
    Up,
    Down,
    PageUp,
    PageDown,

    // Other common keys
    Enter,
    Backspace,
    Tab,
    Escape,

    // Keypad keys
    Keypad0,
    Keypad1,
    Keypad2,
    Keypad3,
    Keypad4,
    Keypad5,
    Keypad6,
    Keypad7,
    Keypad8,
    Keypad9,
    KeypadEnter,

    // Unidentified key
    #[default]
    Unknown,
}

impl KeySymbol {
    /// Returns the digit of a keypad number key, or `None` for any other key.
    pub fn keypad_digit(&self) -> Option<u8> {
        match self {
            KeySymbol::Keypad0 => Some(0),
            KeySymbol::Keypad1 => Some(1),
            KeySymbol::Keypad2 => Some(2),
            KeySymbol::Keypad3 => Some(3),
            KeySymbol::Keypad4 => Some(4),
            KeySymbol::Keypad5 => Some(5),
            KeySymbol::Keypad6 => Some(6),
            KeySymbol::Keypad7 => Some(7),
            KeySymbol::Keypad8 => Some(8),
            KeySymbol::Keypad9 => Some(9),
            _ => None,
        }
    }
}
