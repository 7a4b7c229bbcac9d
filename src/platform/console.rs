// src/platform/console.rs
//
// Defines the `Console` trait, the interface game logic drives the platform
// through.

use crate::color::Color;
use crate::event::RogueEvent;
use anyhow::Result;

/// A modifier key the game can ask about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    Shift,
    Control,
}

/// The operations game logic needs from a display platform.
///
/// A console abstracts over how input is gathered and how cells reach the
/// screen. Game logic plots cells, then blocks in
/// `next_key_or_mouse_event` (or peeks with `pause_for_milliseconds`)
/// and interprets the canonical events it gets back.
pub trait Console {
    /// Shows the current frame, waits `ms` milliseconds, and reports
    /// whether a key or mouse press is waiting. A waiting event is kept for
    /// the next `next_key_or_mouse_event`.
    fn pause_for_milliseconds(&mut self, ms: u64) -> Result<bool>;

    /// Blocks until a canonical event is available. `animate`, when given,
    /// runs once per idle tick before the frame is shown.
    fn next_key_or_mouse_event(
        &mut self,
        text_input: bool,
        animate: Option<&mut dyn FnMut(&mut Self)>,
    ) -> Result<RogueEvent>;

    /// Draws one character cell at grid position `(x, y)`.
    fn plot_char(&mut self, c: char, x: i32, y: i32, fore: Color, back: Color);

    /// Registers a text-input substitution.
    fn remap(&mut self, from: &str, to: &str);

    fn modifier_held(&self, modifier: Modifier) -> bool;

    /// Side channel for game notifications.
    fn notify_event(&mut self, event_id: i16, data1: i32, data2: i32, str1: &str, str2: &str);
}
