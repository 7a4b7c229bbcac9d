// src/platform/backends/x11/window.rs
#![allow(non_snake_case)] // Allow non-snake case for X11 types

use super::connection::Connection;
use anyhow::{anyhow, Context, Result};
use image::RgbaImage;
use log::{debug, error, info, trace, warn};
use std::ffi::CString;
use std::mem;

// X11 library imports
use libc::{c_char, c_int, c_long, c_uint, c_ulong};
use x11::xlib;

/// `_NET_WM_STATE` client message action that flips a state on or off.
const NET_WM_STATE_TOGGLE: c_long = 2;

/// Represents the X11 window and its associated properties.
///
/// Tracks the window ID, the atoms needed to talk to the window manager, and
/// the last known size. Cleanup of the server-side window is explicit via
/// `cleanup`, which the owning driver calls before the `Connection` closes.
#[derive(Debug)]
pub struct Window {
    id: xlib::Window,
    wm_delete_window: xlib::Atom, // Atom for WM_DELETE_WINDOW protocol
    protocols_atom: xlib::Atom,   // Atom for WM_PROTOCOLS
    net_wm_state: xlib::Atom,
    net_wm_state_fullscreen: xlib::Atom,
    current_pixel_width: u32,
    current_pixel_height: u32,
}

impl Window {
    /// Creates and maps a new X11 window centered on the default screen.
    ///
    /// The window listens for the events the platform translates (keys,
    /// buttons, motion, structure changes, exposure) and participates in the
    /// `WM_DELETE_WINDOW` protocol so the close button arrives as an event.
    pub fn new(connection: &Connection, title: &str, width_px: u32, height_px: u32) -> Result<Self> {
        info!("Creating X11 window '{}': {}x{}px", title, width_px, height_px);
        let display = connection.display();
        let (screen_w, screen_h) = connection.screen_size();
        let x = (screen_w.saturating_sub(width_px) / 2) as c_int;
        let y = (screen_h.saturating_sub(height_px) / 2) as c_int;

        // SAFETY: Xlib FFI calls on a valid, open display.
        let window_id = unsafe {
            let mut attributes: xlib::XSetWindowAttributes = mem::zeroed();
            attributes.background_pixel = xlib::XBlackPixel(display, connection.screen());
            attributes.event_mask = xlib::ExposureMask
                | xlib::KeyPressMask
                | xlib::ButtonPressMask
                | xlib::ButtonReleaseMask
                | xlib::PointerMotionMask
                | xlib::StructureNotifyMask;

            xlib::XCreateWindow(
                display,
                connection.root(),
                x,
                y,
                width_px as c_uint,
                height_px as c_uint,
                0, // border width
                connection.depth(),
                xlib::InputOutput as c_uint,
                connection.visual(),
                xlib::CWBackPixel | xlib::CWEventMask,
                &mut attributes,
            )
        };
        if window_id == 0 {
            return Err(anyhow!("XCreateWindow failed"));
        }
        debug!("X window created (ID: {}) at ({}, {})", window_id, x, y);

        let window = Self {
            id: window_id,
            wm_delete_window: intern_atom(connection, "WM_DELETE_WINDOW"),
            protocols_atom: intern_atom(connection, "WM_PROTOCOLS"),
            net_wm_state: intern_atom(connection, "_NET_WM_STATE"),
            net_wm_state_fullscreen: intern_atom(connection, "_NET_WM_STATE_FULLSCREEN"),
            current_pixel_width: width_px,
            current_pixel_height: height_px,
        };

        if window.wm_delete_window != 0 && window.protocols_atom != 0 {
            // SAFETY: valid display and window; the protocol array outlives the call.
            unsafe {
                xlib::XSetWMProtocols(display, window.id, [window.wm_delete_window].as_mut_ptr(), 1);
            }
            debug!("WM_PROTOCOLS (WM_DELETE_WINDOW) registered.");
        } else {
            warn!("Failed to get WM_DELETE_WINDOW or WM_PROTOCOLS atom. Window close events might not be received.");
        }

        window.set_title(connection, title)?;
        window.set_position_hint(connection, x, y);

        // SAFETY: valid display and window.
        unsafe {
            xlib::XMapWindow(display, window.id);
            xlib::XFlush(display);
        }
        Ok(window)
    }

    /// Sets the window title, both the legacy property and `_NET_WM_NAME`.
    pub fn set_title(&self, connection: &Connection, title: &str) -> Result<()> {
        let display = connection.display();
        let title_cstr = CString::new(title).context("Failed to create CString for title")?;
        let net_wm_name = intern_atom(connection, "_NET_WM_NAME");
        let utf8_string = intern_atom(connection, "UTF8_STRING");
        // SAFETY: valid display and window; the CString outlives the calls.
        unsafe {
            xlib::XStoreName(display, self.id, title_cstr.as_ptr() as *mut c_char);
            if net_wm_name != 0 && utf8_string != 0 {
                xlib::XChangeProperty(
                    display,
                    self.id,
                    net_wm_name,
                    utf8_string,
                    8, // format: 8-bit for UTF8_STRING
                    xlib::PropModeReplace,
                    title_cstr.as_ptr() as *const u8,
                    title_cstr.as_bytes().len() as c_int,
                );
            }
        }
        trace!("Window title set to: {}", title);
        Ok(())
    }

    /// Sets `_NET_WM_ICON` from an RGBA image.
    pub fn set_icon(&self, connection: &Connection, icon: &RgbaImage) {
        let net_wm_icon = intern_atom(connection, "_NET_WM_ICON");
        if net_wm_icon == 0 {
            warn!("_NET_WM_ICON atom unavailable; window icon not set.");
            return;
        }
        let data = icon_property_data(icon);
        // SAFETY: format-32 properties are passed as an array of C longs.
        unsafe {
            xlib::XChangeProperty(
                connection.display(),
                self.id,
                net_wm_icon,
                xlib::XA_CARDINAL,
                32,
                xlib::PropModeReplace,
                data.as_ptr() as *const u8,
                data.len() as c_int,
            );
        }
        debug!("Window icon set ({}x{}).", icon.width(), icon.height());
    }

    /// Resizes the window, leaving its position alone.
    pub fn resize(&mut self, connection: &Connection, width_px: u32, height_px: u32) {
        debug!(
            "Resizing window {} to {}x{}",
            self.id, width_px, height_px
        );
        // SAFETY: valid display and window.
        unsafe {
            xlib::XResizeWindow(connection.display(), self.id, width_px as c_uint, height_px as c_uint);
            xlib::XFlush(connection.display());
        }
        self.update_dimensions(width_px, height_px);
    }

    /// Asks the window manager to flip `_NET_WM_STATE_FULLSCREEN`.
    pub fn toggle_fullscreen(&self, connection: &Connection) -> Result<()> {
        if self.net_wm_state == 0 || self.net_wm_state_fullscreen == 0 {
            return Err(anyhow!("Window manager does not support _NET_WM_STATE_FULLSCREEN"));
        }
        // SAFETY: the event is fully initialised before being sent to the root window.
        unsafe {
            let mut event: xlib::XEvent = mem::zeroed();
            event.client_message.type_ = xlib::ClientMessage;
            event.client_message.window = self.id;
            event.client_message.message_type = self.net_wm_state;
            event.client_message.format = 32;
            let longs = event.client_message.data.as_longs_mut();
            longs[0] = NET_WM_STATE_TOGGLE;
            longs[1] = self.net_wm_state_fullscreen as c_long;
            longs[2] = 0;
            longs[3] = 1; // source indication: normal application
            xlib::XSendEvent(
                connection.display(),
                connection.root(),
                xlib::False,
                xlib::SubstructureRedirectMask | xlib::SubstructureNotifyMask,
                &mut event,
            );
            xlib::XFlush(connection.display());
        }
        info!("Requested fullscreen toggle for window {}", self.id);
        Ok(())
    }

    /// Destroys the X11 window. Idempotent.
    pub fn cleanup(&mut self, connection: &Connection) {
        if self.id != 0 && !connection.display().is_null() {
            info!("Destroying X11 window (ID: {}).", self.id);
            // SAFETY: valid display and window.
            unsafe {
                xlib::XDestroyWindow(connection.display(), self.id);
                xlib::XFlush(connection.display());
            }
            self.id = 0;
        }
    }

    fn set_position_hint(&self, connection: &Connection, x: c_int, y: c_int) {
        // SAFETY: valid display and window; hints are zero-initialised.
        unsafe {
            let mut size_hints: xlib::XSizeHints = mem::zeroed();
            size_hints.flags = xlib::PPosition;
            size_hints.x = x;
            size_hints.y = y;
            xlib::XSetWMNormalHints(connection.display(), self.id, &mut size_hints);
        }
    }

    // --- Getter methods ---

    #[inline]
    pub fn id(&self) -> xlib::Window {
        self.id
    }

    #[inline]
    pub fn wm_delete_window_atom(&self) -> xlib::Atom {
        self.wm_delete_window
    }

    #[inline]
    pub fn protocols_atom(&self) -> xlib::Atom {
        self.protocols_atom
    }

    /// Returns the last known dimensions (width, height) of the window in pixels.
    #[inline]
    pub fn current_dimensions_pixels(&self) -> (u32, u32) {
        (self.current_pixel_width, self.current_pixel_height)
    }

    /// Updates the cached dimensions, returning whether they changed.
    pub fn update_dimensions(&mut self, width_px: u32, height_px: u32) -> bool {
        if self.current_pixel_width != width_px || self.current_pixel_height != height_px {
            debug!(
                "Updating cached window dimensions from {}x{} to {}x{}",
                self.current_pixel_width, self.current_pixel_height, width_px, height_px
            );
            self.current_pixel_width = width_px;
            self.current_pixel_height = height_px;
            true
        } else {
            false
        }
    }
}

/// Logs if the window was never cleaned up. It cannot call Xlib itself
/// because it has no access to the `Connection`.
impl Drop for Window {
    fn drop(&mut self) {
        if self.id != 0 {
            error!(
                "Window (ID: {}) dropped without explicit cleanup. Associated X server resources may be leaked.",
                self.id
            );
        }
    }
}

fn intern_atom(connection: &Connection, name: &str) -> xlib::Atom {
    match CString::new(name) {
        // SAFETY: valid display; `only_if_exists` is False so the atom is created on demand.
        Ok(name_cstr) => unsafe {
            xlib::XInternAtom(connection.display(), name_cstr.as_ptr(), xlib::False)
        },
        Err(_) => 0,
    }
}

/// Lays out an image as `_NET_WM_ICON` data: width, height, then one
/// ARGB pixel per C long.
fn icon_property_data(icon: &RgbaImage) -> Vec<c_ulong> {
    let mut data = Vec::with_capacity(2 + (icon.width() * icon.height()) as usize);
    data.push(icon.width() as c_ulong);
    data.push(icon.height() as c_ulong);
    data.extend(icon.pixels().map(|p| {
        let [r, g, b, a] = p.0;
        ((a as c_ulong) << 24) | ((r as c_ulong) << 16) | ((g as c_ulong) << 8) | b as c_ulong
    }));
    data
}
