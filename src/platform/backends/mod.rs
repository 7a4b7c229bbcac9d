// src/platform/backends/mod.rs

//! Defines the `DisplayDriver` trait for backend implementations (X11,
//! headless) and the raw types exchanged across it: `RawEvent`,
//! `MouseButton`, and the `Surface` back buffer.

pub use crate::keys::{KeySymbol, Modifiers};
use anyhow::Result;
use image::RgbaImage;

pub mod headless;
pub mod x11;

/// Represents a native event popped from the backend's queue, before any
/// translation into canonical game events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawEvent {
    /// The user asked the application to close (window close button, WM).
    Quit,
    /// The window's drawable area changed size.
    Resized { width_px: u32, height_px: u32 },
    /// A key went down. Fires for every key, printable or not.
    KeyDown { symbol: KeySymbol },
    /// Text produced by a key press, after keyboard layout and shift
    /// handling. Only printable text is reported here.
    TextInput { text: String },
    /// A mouse button was pressed or released at a pixel position.
    MouseButton {
        button: MouseButton,
        pressed: bool,
        x: i32,
        y: i32,
    },
    /// The pointer moved to a pixel position.
    MouseMotion { x: i32, y: i32 },
}

/// Represents mouse buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
    ScrollUp,
    ScrollDown,
    Other(u8),
}

/// A mutable view of the driver's back buffer.
///
/// Pixels are `0x00RRGGBB`, row-major, `width * height` long.
#[derive(Debug)]
pub struct Surface<'a> {
    pub pixels: &'a mut [u32],
    pub width: u32,
    pub height: u32,
}

impl Surface<'_> {
    /// Fills the whole surface with one pixel value.
    pub fn clear(&mut self, pixel: u32) {
        self.pixels.fill(pixel);
    }

    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x < self.width && y < self.height {
            self.pixels.get((y * self.width + x) as usize).copied()
        } else {
            None
        }
    }
}

/// Defines the interface to the operating system's window and event queue.
///
/// A `DisplayDriver` is responsible for:
/// 1.  Owning at most one window and a client-side back buffer the size of it.
/// 2.  Handing out native events one at a time, without blocking.
/// 3.  Answering global queries (modifier state, usable display area).
/// 4.  Providing the monotonic clock and sleep used to pace the event loop.
///
/// All translation of native events into game events happens above this
/// trait, so a driver stays a thin wrapper over the platform API.
pub trait DisplayDriver {
    /// Size of the display area available to a window, in pixels.
    fn usable_area(&self) -> Result<(u32, u32)>;

    /// Creates the window, centered on the display, with the given title,
    /// size, and optional icon. Also allocates a back buffer of that size.
    fn create_window(
        &mut self,
        title: &str,
        width_px: u32,
        height_px: u32,
        icon: Option<&RgbaImage>,
    ) -> Result<()>;

    /// Resizes the existing window in place (its position is kept) and
    /// reallocates the back buffer to match.
    fn resize_window(&mut self, width_px: u32, height_px: u32) -> Result<()>;

    fn has_window(&self) -> bool;

    /// Current window size in pixels, `(0, 0)` when there is no window.
    fn window_size(&self) -> (u32, u32);

    /// Switches between windowed and desktop-fullscreen mode.
    fn toggle_fullscreen(&mut self) -> Result<()>;

    /// Pops the next queued native event, or `None` when the queue is empty.
    /// Never blocks.
    fn poll_event(&mut self) -> Option<RawEvent>;

    /// Modifier keys held right now, independent of any particular event.
    fn modifiers(&self) -> Modifiers;

    fn surface_mut(&mut self) -> Surface<'_>;

    /// Pushes the back buffer to the window.
    fn present(&mut self) -> Result<()>;

    /// Milliseconds elapsed on a monotonic clock.
    fn ticks_ms(&self) -> u64;

    fn delay_ms(&mut self, ms: u64);
}
