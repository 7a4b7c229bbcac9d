// src/platform/backends/x11/event.rs
#![allow(non_snake_case)] // Allow non-snake case for X11 types

use super::window::Window;
use crate::keys::KeySymbol;
use crate::platform::backends::{MouseButton, RawEvent};

use log::{debug, info, trace};
use std::ptr;

// X11 library imports
use libc::{c_char, c_int, c_uint};
use x11::{keysym, xlib};

/// Buffer size for text obtained from `XLookupString`.
const KEY_TEXT_BUFFER_SIZE: usize = 32;

/// Translates one X11 event into zero or more raw platform events.
///
/// A key press becomes a `KeyDown` for the physical key followed, when the
/// key produced printable text the `KeyDown` does not already cover, by a
/// `TextInput`. Resizes update the
/// window's cached size and are only reported when the size really changed.
/// Expose events are handled by the driver before this is called.
pub fn translate_event(xevent: &mut xlib::XEvent, window: &mut Window) -> Vec<RawEvent> {
    // SAFETY: `type_` is the common discriminant of every XEvent variant.
    let event_type = unsafe { xevent.type_ };

    match event_type {
        xlib::ConfigureNotify => {
            // SAFETY: the discriminant confirms this is an XConfigureEvent.
            let configure_event = unsafe { xevent.configure };
            let (width_px, height_px) = (configure_event.width as u32, configure_event.height as u32);
            if window.update_dimensions(width_px, height_px) {
                debug!(
                    "XEvent: ConfigureNotify resize to {}x{} on window {}",
                    width_px, height_px, configure_event.window
                );
                vec![RawEvent::Resized { width_px, height_px }]
            } else {
                trace!("XEvent: ConfigureNotify (no size change) on window {}", configure_event.window);
                Vec::new()
            }
        }
        xlib::KeyPress => {
            // SAFETY: the discriminant confirms this is an XKeyEvent.
            let key_event = unsafe { &mut xevent.key };
            let mut key_text_buffer = [0u8; KEY_TEXT_BUFFER_SIZE];

            // SAFETY: `key_event` points into `xevent`; the buffer length is passed
            // alongside its pointer and no compose status is requested.
            let (count, base_keysym) = unsafe {
                let count = xlib::XLookupString(
                    key_event,
                    key_text_buffer.as_mut_ptr() as *mut c_char,
                    key_text_buffer.len() as c_int,
                    ptr::null_mut(),
                    ptr::null_mut(),
                );
                // Index 0 is the unshifted symbol of the physical key.
                (count, xlib::XLookupKeysym(key_event, 0))
            };

            let text = if count > 0 {
                String::from_utf8_lossy(&key_text_buffer[0..count as usize]).to_string()
            } else {
                String::new()
            };
            let symbol = keysym_to_symbol(base_keysym as c_uint);
            trace!(
                "XEvent: KeyPress (symbol: {:?}, keysym: {:X}, text: {:?}) on window {}",
                symbol,
                base_keysym,
                text,
                key_event.window
            );

            let mut events = vec![RawEvent::KeyDown { symbol }];
            if let Some(text) = key_text(symbol, key_event.state, text) {
                events.push(RawEvent::TextInput { text });
            }
            events
        }
        xlib::ButtonPress | xlib::ButtonRelease => {
            // SAFETY: the discriminant confirms this is an XButtonEvent.
            let button_event = unsafe { xevent.button };
            let button = button_from_x(button_event.button);
            trace!(
                "XEvent: Button{} (button: {:?}, x: {}, y: {})",
                if event_type == xlib::ButtonPress { "Press" } else { "Release" },
                button,
                button_event.x,
                button_event.y
            );
            vec![RawEvent::MouseButton {
                button,
                pressed: event_type == xlib::ButtonPress,
                x: button_event.x,
                y: button_event.y,
            }]
        }
        xlib::MotionNotify => {
            // SAFETY: the discriminant confirms this is an XMotionEvent.
            let motion_event = unsafe { xevent.motion };
            vec![RawEvent::MouseMotion {
                x: motion_event.x,
                y: motion_event.y,
            }]
        }
        xlib::ClientMessage => {
            // SAFETY: the discriminant confirms this is an XClientMessageEvent.
            let client_message_event = unsafe { xevent.client_message };
            if client_message_event.message_type == window.protocols_atom()
                && client_message_event.data.get_long(0) as xlib::Atom
                    == window.wm_delete_window_atom()
            {
                info!(
                    "XEvent: WM_DELETE_WINDOW received for window {}.",
                    client_message_event.window
                );
                vec![RawEvent::Quit]
            } else {
                trace!(
                    "XEvent: Ignored ClientMessage (type: {})",
                    client_message_event.message_type
                );
                Vec::new()
            }
        }
        other => {
            trace!("XEvent: Ignored event type {}", other);
            Vec::new()
        }
    }
}

/// Maps an unshifted X11 keysym onto a `KeySymbol`.
///
/// Keypad keys are recognised in both their navigation and digit forms, so
/// the mapping does not depend on NumLock.
pub fn keysym_to_symbol(keysym: c_uint) -> KeySymbol {
    match keysym {
        keysym::XK_Escape => KeySymbol::Escape,
        keysym::XK_Up => KeySymbol::Up,
        keysym::XK_Down => KeySymbol::Down,
        keysym::XK_Left => KeySymbol::Left,
        keysym::XK_Right => KeySymbol::Right,
        keysym::XK_Return => KeySymbol::Enter,
        keysym::XK_KP_Enter => KeySymbol::KeypadEnter,
        keysym::XK_BackSpace => KeySymbol::Backspace,
        keysym::XK_Tab => KeySymbol::Tab,
        keysym::XK_Page_Up => KeySymbol::PageUp,
        keysym::XK_Page_Down => KeySymbol::PageDown,
        keysym::XK_F11 => KeySymbol::F11,
        keysym::XK_F12 => KeySymbol::F12,
        keysym::XK_KP_0 | keysym::XK_KP_Insert => KeySymbol::Keypad0,
        keysym::XK_KP_1 | keysym::XK_KP_End => KeySymbol::Keypad1,
        keysym::XK_KP_2 | keysym::XK_KP_Down => KeySymbol::Keypad2,
        keysym::XK_KP_3 | keysym::XK_KP_Page_Down => KeySymbol::Keypad3,
        keysym::XK_KP_4 | keysym::XK_KP_Left => KeySymbol::Keypad4,
        keysym::XK_KP_5 | keysym::XK_KP_Begin => KeySymbol::Keypad5,
        keysym::XK_KP_6 | keysym::XK_KP_Right => KeySymbol::Keypad6,
        keysym::XK_KP_7 | keysym::XK_KP_Home => KeySymbol::Keypad7,
        keysym::XK_KP_8 | keysym::XK_KP_Up => KeySymbol::Keypad8,
        keysym::XK_KP_9 | keysym::XK_KP_Page_Up => KeySymbol::Keypad9,
        // Latin-1 keysyms coincide with their character codes.
        0x20..=0x7E => KeySymbol::Char((keysym as u8 as char).to_ascii_lowercase()),
        _ => KeySymbol::Unknown,
    }
}

/// Keeps key text only when it is printable; control characters (Return,
/// Tab, Ctrl+letter, ...) are already covered by the `KeyDown`.
/// Text a key press contributes alongside its `KeyDown`.
///
/// Presses with Control held, and Shift or Control with a keypad digit,
/// report no text: the `KeyDown` already yields their keystroke.
fn key_text(symbol: KeySymbol, state: c_uint, text: String) -> Option<String> {
    if state & xlib::ControlMask != 0 {
        return None;
    }
    if symbol.keypad_digit().is_some() && state & xlib::ShiftMask != 0 {
        return None;
    }
    printable_text(text)
}

fn printable_text(text: String) -> Option<String> {
    if !text.is_empty() && !text.chars().any(char::is_control) {
        Some(text)
    } else {
        None
    }
}

fn button_from_x(button: c_uint) -> MouseButton {
    match button {
        xlib::Button1 => MouseButton::Left,
        xlib::Button2 => MouseButton::Middle,
        xlib::Button3 => MouseButton::Right,
        xlib::Button4 => MouseButton::ScrollUp, // Conventionally scroll up
        xlib::Button5 => MouseButton::ScrollDown, // Conventionally scroll down
        other => MouseButton::Other(other as u8),
    }
}
