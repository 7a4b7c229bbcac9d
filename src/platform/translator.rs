// src/platform/translator.rs

//! Folds raw backend events into canonical game events.
//!
//! Translation happens in two phases. [`Translator::reduce`] pulls raw
//! events one at a time and folds them into a [`Reduction`]: an ordered
//! list of window/font side effects, plus at most one primary event and at
//! most one cell-entered event. It stops pulling as soon as a primary event
//! or a quit is seen, leaving later events queued for the next poll; mouse
//! motion never stops it, so a burst of motion collapses into one event.
//! The platform then applies the effects and emits quit, primary or motion,
//! in that order of priority.

use super::backends::{KeySymbol, Modifiers, MouseButton, RawEvent};
use super::remap::RemapTable;
use super::scaler::CellGeometry;
use crate::event::{key_codes, EventKind, RogueEvent};
use log::trace;

/// A window or font change requested while translating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// The OS resized the window; pick the font that fits it.
    Refit { width_px: u32, height_px: u32 },
    ZoomIn,
    ZoomOut,
    ToggleFullscreen,
}

/// Everything one poll folded out of the raw queue.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reduction {
    pub effects: Vec<Effect>,
    pub quit: bool,
    pub primary: Option<RogueEvent>,
    pub motion: Option<RogueEvent>,
}

/// Per-poll inputs that stay fixed while the queue is drained.
#[derive(Debug, Clone, Copy)]
pub struct PollContext {
    pub geometry: CellGeometry,
    pub modifiers: Modifiers,
    /// Text entry: remaps and zoom characters are disabled.
    pub text_input: bool,
}

/// Remembers the last cell a `MouseEnteredCell` was reported for.
#[derive(Debug, Clone, Default)]
pub struct Translator {
    last_cell: (i32, i32),
}

impl Translator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_cell(&self) -> (i32, i32) {
        self.last_cell
    }

    /// Restores the last reported cell after a cell-entered event was
    /// discarded, so the next motion into that cell is reported again.
    pub fn rewind_motion(&mut self, cell: (i32, i32)) {
        self.last_cell = cell;
    }

    /// Phase one: drains `events` until a primary event or a quit.
    pub fn reduce<I>(&mut self, events: &mut I, context: &PollContext, remaps: &RemapTable) -> Reduction
    where
        I: Iterator<Item = RawEvent>,
    {
        let mut reduction = Reduction::default();
        for raw in events {
            trace!("Translator: raw {:?}", raw);
            match raw {
                RawEvent::Quit => {
                    reduction.quit = true;
                    break;
                }
                RawEvent::Resized {
                    width_px,
                    height_px,
                } => reduction.effects.push(Effect::Refit {
                    width_px,
                    height_px,
                }),
                RawEvent::KeyDown { symbol } => {
                    reduction.effects.extend(key_effect(symbol, context.modifiers));
                    if let Some(code) = key_code(symbol, context.modifiers) {
                        reduction.primary = Some(RogueEvent::keystroke(code));
                        break;
                    }
                }
                RawEvent::TextInput { text } => {
                    let Some(c) = text.chars().next() else {
                        continue;
                    };
                    let c = if context.text_input { c } else { remaps.apply(c) };
                    if !c.is_ascii() {
                        trace!("Translator: dropping non-ASCII text {:?}", c);
                        continue;
                    }
                    if !context.text_input {
                        match c {
                            '=' | '+' => reduction.effects.push(Effect::ZoomIn),
                            '-' => reduction.effects.push(Effect::ZoomOut),
                            _ => {}
                        }
                    }
                    reduction.primary = Some(RogueEvent::keystroke(c as i32));
                    break;
                }
                RawEvent::MouseButton {
                    button,
                    pressed,
                    x,
                    y,
                } => {
                    let kind = match (button, pressed) {
                        (MouseButton::Left, true) => EventKind::MouseDown,
                        (MouseButton::Left, false) => EventKind::MouseUp,
                        (MouseButton::Right, true) => EventKind::RightMouseDown,
                        (MouseButton::Right, false) => EventKind::RightMouseUp,
                        _ => continue,
                    };
                    let (column, row) = context.geometry.pixel_to_cell(x, y);
                    reduction.primary = Some(RogueEvent::mouse(kind, column, row));
                    break;
                }
                RawEvent::MouseMotion { x, y } => {
                    let cell = context.geometry.pixel_to_cell(x, y);
                    if cell != self.last_cell {
                        self.last_cell = cell;
                        reduction.motion = Some(RogueEvent::mouse(EventKind::MouseEnteredCell, cell.0, cell.1));
                    }
                }
            }
        }
        reduction
    }
}

/// Side effect bound to a physical key, independent of whether the key
/// also produces a keystroke.
fn key_effect(symbol: KeySymbol, modifiers: Modifiers) -> Option<Effect> {
    match symbol {
        KeySymbol::PageUp => Some(Effect::ZoomIn),
        KeySymbol::PageDown => Some(Effect::ZoomOut),
        KeySymbol::F11 | KeySymbol::F12 => Some(Effect::ToggleFullscreen),
        KeySymbol::Enter if modifiers.contains(Modifiers::ALT) => Some(Effect::ToggleFullscreen),
        _ => None,
    }
}

/// Keystroke code for keys that produce no text input of their own.
///
/// Keypad digits only count with shift or control held: without a modifier
/// the same press also arrives as text and would fire twice.
fn key_code(symbol: KeySymbol, modifiers: Modifiers) -> Option<i32> {
    let code = match symbol {
        KeySymbol::Escape => key_codes::ESCAPE_KEY,
        KeySymbol::Up => key_codes::UP_ARROW,
        KeySymbol::Down => key_codes::DOWN_ARROW,
        KeySymbol::Left => key_codes::LEFT_ARROW,
        KeySymbol::Right => key_codes::RIGHT_ARROW,
        KeySymbol::Enter | KeySymbol::KeypadEnter => key_codes::RETURN_KEY,
        KeySymbol::Backspace => key_codes::DELETE_KEY,
        KeySymbol::Tab => key_codes::TAB_KEY,
        _ => {
            if modifiers.intersects(Modifiers::SHIFT | Modifiers::CONTROL) {
                if let Some(digit) = symbol.keypad_digit() {
                    return Some(key_codes::numpad(digit));
                }
            }
            if modifiers.contains(Modifiers::CONTROL) && symbol == KeySymbol::Char('n') {
                return Some('n' as i32);
            }
            return None;
        }
    };
    Some(code)
}
