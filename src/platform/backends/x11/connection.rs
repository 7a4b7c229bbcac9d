// src/platform/backends/x11/connection.rs
#![allow(non_snake_case)] // Allow non-snake case for X11 types

use crate::keys::Modifiers;
use anyhow::{anyhow, Result};
use log::{debug, info, warn};
use std::mem;
use std::ptr;

// X11 library imports
use libc::{c_int, c_uint};
use x11::xlib;

/// Manages an X11 Display connection, ensuring it's closed on drop.
///
/// This struct wraps the raw `*mut xlib::Display` pointer and handles
/// opening and closing it.
#[derive(Debug)]
struct ManagedDisplay {
    ptr: *mut xlib::Display,
}

impl ManagedDisplay {
    /// Attempts to open a new connection to the X server named by `DISPLAY`.
    fn new() -> Result<Self> {
        // SAFETY: Passing NULL to XOpenDisplay selects the DISPLAY environment variable.
        let display_ptr = unsafe { xlib::XOpenDisplay(ptr::null()) };
        if display_ptr.is_null() {
            Err(anyhow!(
                "Failed to open X display. Check DISPLAY environment variable or X server status."
            ))
        } else {
            debug!("X display opened: {:p}", display_ptr);
            Ok(Self { ptr: display_ptr })
        }
    }

    #[inline]
    fn raw(&self) -> *mut xlib::Display {
        self.ptr
    }
}

impl Drop for ManagedDisplay {
    fn drop(&mut self) {
        if !self.ptr.is_null() {
            info!("Closing X11 display connection: {:p}", self.ptr);
            // SAFETY: `ptr` came from XOpenDisplay and is closed exactly once here.
            let status = unsafe { xlib::XCloseDisplay(self.ptr) };
            if status != 0 {
                warn!(
                    "XCloseDisplay returned non-zero status: {}. Display may not have closed cleanly.",
                    status
                );
            }
        }
    }
}

/// Represents and manages the connection to the X server.
///
/// Encapsulates the Xlib `Display` pointer together with the default screen,
/// its root window, visual, and depth. The connection is closed when this
/// struct is dropped.
#[derive(Debug)]
pub struct Connection {
    managed_display: ManagedDisplay,
    screen: c_int,
    root: xlib::Window,
    visual: *mut xlib::Visual,
    depth: c_int,
}

impl Connection {
    /// Establishes a new connection to the X server and looks up the default
    /// screen's root window, visual, and depth.
    pub fn new() -> Result<Self> {
        info!("Establishing X11 server connection.");

        let managed_display = ManagedDisplay::new()?;
        let display = managed_display.raw();

        // SAFETY: `display` is a valid, open display for the calls below.
        let (screen, root, visual, depth) = unsafe {
            let screen = xlib::XDefaultScreen(display);
            (
                screen,
                xlib::XRootWindow(display, screen),
                xlib::XDefaultVisual(display, screen),
                xlib::XDefaultDepth(display, screen),
            )
        };
        if visual.is_null() {
            // ManagedDisplay's Drop will close the display.
            return Err(anyhow!(
                "Failed to get default visual for screen {}.",
                screen
            ));
        }
        if depth != 24 && depth != 32 {
            return Err(anyhow!(
                "Unsupported X11 screen depth {}; a TrueColor visual (24 or 32 bit) is required.",
                depth
            ));
        }
        debug!(
            "Default screen {} (root: {}, depth: {}, visual: {:p})",
            screen, root, depth, visual
        );

        info!("X11 server connection established successfully.");
        Ok(Connection {
            managed_display,
            screen,
            root,
            visual,
            depth,
        })
    }

    /// Returns the raw X11 display pointer.
    ///
    /// The pointer is only valid while this `Connection` is alive.
    #[inline]
    pub fn display(&self) -> *mut xlib::Display {
        self.managed_display.raw()
    }

    #[inline]
    pub fn screen(&self) -> c_int {
        self.screen
    }

    #[inline]
    pub fn root(&self) -> xlib::Window {
        self.root
    }

    #[inline]
    pub fn visual(&self) -> *mut xlib::Visual {
        self.visual
    }

    #[inline]
    pub fn depth(&self) -> c_int {
        self.depth
    }

    /// Size of the default screen in pixels.
    pub fn screen_size(&self) -> (u32, u32) {
        // SAFETY: display and screen are valid for the lifetime of `self`.
        unsafe {
            (
                xlib::XDisplayWidth(self.display(), self.screen) as u32,
                xlib::XDisplayHeight(self.display(), self.screen) as u32,
            )
        }
    }

    /// Queries the modifier keys currently held, regardless of which window
    /// has focus or which event is being processed.
    pub fn query_modifiers(&self) -> Modifiers {
        // SAFETY: XQueryPointer only writes through the provided out-pointers.
        let mask = unsafe {
            let mut root_return: xlib::Window = 0;
            let mut child_return: xlib::Window = 0;
            let (mut root_x, mut root_y, mut win_x, mut win_y): (c_int, c_int, c_int, c_int) =
                mem::zeroed();
            let mut mask: c_uint = 0;
            xlib::XQueryPointer(
                self.display(),
                self.root,
                &mut root_return,
                &mut child_return,
                &mut root_x,
                &mut root_y,
                &mut win_x,
                &mut win_y,
                &mut mask,
            );
            mask
        };
        modifiers_from_state(mask)
    }
}

/// Converts an X11 key/button state mask into `Modifiers`.
pub fn modifiers_from_state(state: c_uint) -> Modifiers {
    let mut modifiers = Modifiers::empty();
    if state & xlib::ShiftMask != 0 {
        modifiers.insert(Modifiers::SHIFT);
    }
    if state & xlib::ControlMask != 0 {
        modifiers.insert(Modifiers::CONTROL);
    }
    if state & xlib::Mod1Mask != 0 {
        modifiers.insert(Modifiers::ALT); // Mod1Mask is typically Alt.
    }
    modifiers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_masks_map_to_modifiers() {
        assert_eq!(modifiers_from_state(0), Modifiers::empty());
        assert_eq!(
            modifiers_from_state(xlib::ShiftMask | xlib::ControlMask),
            Modifiers::SHIFT | Modifiers::CONTROL
        );
        assert_eq!(
            modifiers_from_state(xlib::Mod1Mask | xlib::Mod4Mask | xlib::LockMask),
            Modifiers::ALT
        );
    }
}
