// src/platform/backends/x11/mod.rs

//! X11 `DisplayDriver` built directly on Xlib.
//!
//! Features:
//! - One resizable window, centered at creation, with title and icon
//! - Native events translated into `RawEvent`s (see `event.rs`)
//! - A client-side back buffer presented via `XPutImage`
//! - Desktop fullscreen toggling through the window manager

pub mod connection;
pub mod event;
pub mod window;

use self::connection::Connection;
use self::window::Window;
use super::{DisplayDriver, Modifiers, RawEvent, Surface};

use anyhow::{anyhow, Context, Result};
use image::RgbaImage;
use log::{debug, info, trace};
use std::collections::VecDeque;
use std::mem;
use std::ptr;
use std::time::{Duration, Instant};

use libc::{c_char, c_int, c_uint};
use x11::xlib;

const BYTES_PER_PIXEL: c_int = 4;

pub struct X11Driver {
    // Released in `Drop` before `connection` closes the display.
    window: Option<Window>,
    gc: xlib::GC,
    framebuffer: Vec<u32>,
    pending: VecDeque<RawEvent>,
    epoch: Instant,
    connection: Connection,
}

impl X11Driver {
    /// Connects to the X server. No window is created until
    /// `create_window` is called.
    pub fn new() -> Result<Self> {
        info!("X11Driver::new() - Initializing X11 display");
        let connection = Connection::new().context("Failed to initialize X11 connection")?;
        Ok(Self {
            window: None,
            gc: ptr::null_mut(),
            framebuffer: Vec::new(),
            pending: VecDeque::new(),
            epoch: Instant::now(),
            connection,
        })
    }

    fn reallocate_framebuffer(&mut self, width_px: u32, height_px: u32) {
        self.framebuffer = vec![0; width_px as usize * height_px as usize];
    }

    fn window(&self) -> Result<&Window> {
        self.window
            .as_ref()
            .ok_or_else(|| anyhow!("X11Driver: no window has been created"))
    }
}

impl DisplayDriver for X11Driver {
    fn usable_area(&self) -> Result<(u32, u32)> {
        Ok(self.connection.screen_size())
    }

    fn create_window(
        &mut self,
        title: &str,
        width_px: u32,
        height_px: u32,
        icon: Option<&RgbaImage>,
    ) -> Result<()> {
        if self.window.is_some() {
            return Err(anyhow!("X11Driver: window already exists"));
        }
        let window = Window::new(&self.connection, title, width_px, height_px)
            .context("Failed to create X11 window")?;
        if let Some(icon) = icon {
            window.set_icon(&self.connection, icon);
        }

        // SAFETY: valid display and freshly created window.
        let gc = unsafe { xlib::XCreateGC(self.connection.display(), window.id(), 0, ptr::null_mut()) };
        if gc.is_null() {
            let mut window = window;
            window.cleanup(&self.connection);
            return Err(anyhow!("XCreateGC failed"));
        }

        self.gc = gc;
        self.window = Some(window);
        self.reallocate_framebuffer(width_px, height_px);
        info!("X11Driver: created window {}x{}", width_px, height_px);
        Ok(())
    }

    fn resize_window(&mut self, width_px: u32, height_px: u32) -> Result<()> {
        let window = self
            .window
            .as_mut()
            .ok_or_else(|| anyhow!("X11Driver: resize requested without a window"))?;
        window.resize(&self.connection, width_px, height_px);
        self.reallocate_framebuffer(width_px, height_px);
        Ok(())
    }

    fn has_window(&self) -> bool {
        self.window.is_some()
    }

    fn window_size(&self) -> (u32, u32) {
        self.window
            .as_ref()
            .map(Window::current_dimensions_pixels)
            .unwrap_or((0, 0))
    }

    fn toggle_fullscreen(&mut self) -> Result<()> {
        // The resulting size change arrives later as a ConfigureNotify.
        self.window()?.toggle_fullscreen(&self.connection)
    }

    fn poll_event(&mut self) -> Option<RawEvent> {
        loop {
            if let Some(event) = self.pending.pop_front() {
                return Some(event);
            }
            let display = self.connection.display();
            // SAFETY: XPending never blocks; XNextEvent is only called when an
            // event is queued, so it returns immediately.
            let mut xevent: xlib::XEvent = unsafe {
                if xlib::XPending(display) == 0 {
                    return None;
                }
                let mut xevent: xlib::XEvent = mem::zeroed();
                xlib::XNextEvent(display, &mut xevent);
                xevent
            };

            // SAFETY: `type_` is the common discriminant of every XEvent variant.
            if unsafe { xevent.type_ } == xlib::Expose {
                // SAFETY: the discriminant confirms this is an XExposeEvent.
                if unsafe { xevent.expose.count } == 0 {
                    trace!("XEvent: Expose - re-presenting back buffer");
                    if let Err(e) = self.present() {
                        debug!("Present after expose failed: {:#}", e);
                    }
                }
                continue;
            }

            let Some(window) = self.window.as_mut() else {
                continue;
            };
            for raw in event::translate_event(&mut xevent, window) {
                if let RawEvent::Resized {
                    width_px,
                    height_px,
                } = raw
                {
                    self.framebuffer = vec![0; width_px as usize * height_px as usize];
                }
                self.pending.push_back(raw);
            }
        }
    }

    fn modifiers(&self) -> Modifiers {
        self.connection.query_modifiers()
    }

    fn surface_mut(&mut self) -> Surface<'_> {
        let (width, height) = self.window_size();
        Surface {
            pixels: &mut self.framebuffer,
            width,
            height,
        }
    }

    fn present(&mut self) -> Result<()> {
        let window_id = self.window()?.id();
        let (width_px, height_px) = self.window_size();
        if width_px == 0 || height_px == 0 {
            return Ok(());
        }
        let display = self.connection.display();

        // SAFETY: the XImage borrows `framebuffer`, which holds exactly
        // width*height 32-bit pixels and outlives the image; the data pointer
        // is detached before XDestroyImage so Xlib does not free our buffer.
        unsafe {
            let image = xlib::XCreateImage(
                display,
                self.connection.visual(),
                self.connection.depth() as c_uint,
                xlib::ZPixmap,
                0,
                self.framebuffer.as_mut_ptr() as *mut c_char,
                width_px,
                height_px,
                32, // bitmap_pad
                width_px as c_int * BYTES_PER_PIXEL,
            );
            if image.is_null() {
                return Err(anyhow!("Failed to create XImage"));
            }

            xlib::XPutImage(
                display,
                window_id,
                self.gc,
                image,
                0,
                0,
                0,
                0,
                width_px,
                height_px,
            );

            (*image).data = ptr::null_mut();
            xlib::XDestroyImage(image);
            xlib::XFlush(display);
        }
        Ok(())
    }

    fn ticks_ms(&self) -> u64 {
        self.epoch.elapsed().as_millis() as u64
    }

    fn delay_ms(&mut self, ms: u64) {
        std::thread::sleep(Duration::from_millis(ms));
    }
}

impl Drop for X11Driver {
    fn drop(&mut self) {
        info!("X11Driver::drop() - Cleaning up");
        // SAFETY: the GC and window belong to this still-open connection.
        unsafe {
            if !self.gc.is_null() {
                xlib::XFreeGC(self.connection.display(), self.gc);
                self.gc = ptr::null_mut();
            }
        }
        if let Some(mut window) = self.window.take() {
            window.cleanup(&self.connection);
        }
        // `connection` closes the display when it is dropped after this.
    }
}
