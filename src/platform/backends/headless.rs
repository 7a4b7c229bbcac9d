// src/platform/backends/headless.rs

//! Headless display driver.
//!
//! Keeps a back buffer and a scripted event queue but never talks to a
//! display server. The clock is virtual: `delay_ms` advances it instead of
//! sleeping, so pacing logic runs at full speed.

use super::{DisplayDriver, Modifiers, RawEvent, Surface};
use anyhow::{anyhow, Result};
use image::RgbaImage;
use log::{debug, info, trace};
use std::collections::VecDeque;

/// Display area reported when none is configured (a 1080p screen).
const DEFAULT_USABLE_AREA: (u32, u32) = (1920, 1080);

/// A window operation, recorded for inspection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowOp {
    Created { width_px: u32, height_px: u32, has_icon: bool },
    Resized { width_px: u32, height_px: u32 },
    Fullscreen(bool),
}

#[derive(Debug)]
pub struct HeadlessDriver {
    usable_area: (u32, u32),
    window: Option<(u32, u32)>,
    windowed_size: (u32, u32),
    fullscreen: bool,
    framebuffer: Vec<u32>,
    events: VecDeque<RawEvent>,
    modifiers: Modifiers,
    ticks_ms: u64,
    presents: usize,
    polls: usize,
    window_ops: Vec<WindowOp>,
}

impl Default for HeadlessDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessDriver {
    pub fn new() -> Self {
        Self::with_usable_area(DEFAULT_USABLE_AREA.0, DEFAULT_USABLE_AREA.1)
    }

    pub fn with_usable_area(width_px: u32, height_px: u32) -> Self {
        info!("HeadlessDriver::new() with usable area {}x{}", width_px, height_px);
        Self {
            usable_area: (width_px, height_px),
            window: None,
            windowed_size: (0, 0),
            fullscreen: false,
            framebuffer: Vec::new(),
            events: VecDeque::new(),
            modifiers: Modifiers::empty(),
            ticks_ms: 0,
            presents: 0,
            polls: 0,
            window_ops: Vec::new(),
        }
    }

    /// Queues a native event to be returned by a later `poll_event`.
    pub fn push_event(&mut self, event: RawEvent) {
        self.events.push_back(event);
    }

    pub fn push_events(&mut self, events: impl IntoIterator<Item = RawEvent>) {
        self.events.extend(events);
    }

    /// Sets the modifier state reported by `modifiers()`.
    pub fn set_modifiers(&mut self, modifiers: Modifiers) {
        self.modifiers = modifiers;
    }

    /// Simulates the user or window manager resizing the window: the size
    /// changes and a `Resized` event is queued.
    pub fn user_resize(&mut self, width_px: u32, height_px: u32) {
        self.set_size(width_px, height_px);
        self.events.push_back(RawEvent::Resized {
            width_px,
            height_px,
        });
    }

    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    pub fn presents(&self) -> usize {
        self.presents
    }

    /// Number of `poll_event` calls made so far, including empty ones.
    pub fn polls(&self) -> usize {
        self.polls
    }

    pub fn window_ops(&self) -> &[WindowOp] {
        &self.window_ops
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    fn set_size(&mut self, width_px: u32, height_px: u32) {
        self.window = Some((width_px, height_px));
        self.framebuffer = vec![0; (width_px as usize) * (height_px as usize)];
    }
}

impl DisplayDriver for HeadlessDriver {
    fn usable_area(&self) -> Result<(u32, u32)> {
        Ok(self.usable_area)
    }

    fn create_window(
        &mut self,
        title: &str,
        width_px: u32,
        height_px: u32,
        icon: Option<&RgbaImage>,
    ) -> Result<()> {
        if self.window.is_some() {
            return Err(anyhow!("HeadlessDriver: window already exists"));
        }
        info!(
            "HeadlessDriver: create window '{}' {}x{}",
            title, width_px, height_px
        );
        self.set_size(width_px, height_px);
        self.windowed_size = (width_px, height_px);
        self.window_ops.push(WindowOp::Created {
            width_px,
            height_px,
            has_icon: icon.is_some(),
        });
        Ok(())
    }

    fn resize_window(&mut self, width_px: u32, height_px: u32) -> Result<()> {
        if self.window.is_none() {
            return Err(anyhow!("HeadlessDriver: resize requested without a window"));
        }
        debug!("HeadlessDriver: resize window to {}x{}", width_px, height_px);
        self.set_size(width_px, height_px);
        self.windowed_size = (width_px, height_px);
        self.window_ops.push(WindowOp::Resized {
            width_px,
            height_px,
        });
        Ok(())
    }

    fn has_window(&self) -> bool {
        self.window.is_some()
    }

    fn window_size(&self) -> (u32, u32) {
        self.window.unwrap_or((0, 0))
    }

    fn toggle_fullscreen(&mut self) -> Result<()> {
        if self.window.is_none() {
            return Err(anyhow!("HeadlessDriver: fullscreen requested without a window"));
        }
        self.fullscreen = !self.fullscreen;
        let (width_px, height_px) = if self.fullscreen {
            self.usable_area
        } else {
            self.windowed_size
        };
        // Like a real window manager, the mode switch is reported as a resize.
        self.user_resize(width_px, height_px);
        self.window_ops.push(WindowOp::Fullscreen(self.fullscreen));
        Ok(())
    }

    fn poll_event(&mut self) -> Option<RawEvent> {
        self.polls += 1;
        let event = self.events.pop_front();
        if let Some(event) = &event {
            trace!("HeadlessDriver: poll -> {:?}", event);
        }
        event
    }

    fn modifiers(&self) -> Modifiers {
        self.modifiers
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
        self.presents += 1;
        Ok(())
    }

    fn ticks_ms(&self) -> u64 {
        self.ticks_ms
    }

    fn delay_ms(&mut self, ms: u64) {
        self.ticks_ms += ms;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn events_come_back_in_order() {
        let mut driver = HeadlessDriver::new();
        driver.push_event(RawEvent::Quit);
        driver.push_event(RawEvent::MouseMotion { x: 1, y: 2 });
        assert_eq!(driver.poll_event(), Some(RawEvent::Quit));
        assert_eq!(driver.poll_event(), Some(RawEvent::MouseMotion { x: 1, y: 2 }));
        assert_eq!(driver.poll_event(), None);
        assert_eq!(driver.polls(), 3);
    }

    #[test]
    fn window_size_tracks_create_and_resize() -> Result<()> {
        let mut driver = HeadlessDriver::new();
        assert!(!driver.has_window());
        assert_eq!(driver.window_size(), (0, 0));

        driver.create_window("test", 100, 50, None)?;
        assert_eq!(driver.window_size(), (100, 50));
        assert_eq!(driver.surface_mut().pixels.len(), 5000);

        driver.resize_window(40, 20)?;
        assert_eq!(driver.window_size(), (40, 20));
        assert_eq!(driver.surface_mut().pixels.len(), 800);
        assert!(driver.create_window("again", 1, 1, None).is_err());
        Ok(())
    }

    #[test]
    fn fullscreen_toggles_between_usable_area_and_windowed_size() -> Result<()> {
        let mut driver = HeadlessDriver::with_usable_area(800, 600);
        driver.create_window("test", 100, 50, None)?;
        driver.toggle_fullscreen()?;
        assert!(driver.is_fullscreen());
        assert_eq!(driver.window_size(), (800, 600));
        assert_eq!(
            driver.poll_event(),
            Some(RawEvent::Resized {
                width_px: 800,
                height_px: 600
            })
        );
        driver.toggle_fullscreen()?;
        assert_eq!(driver.window_size(), (100, 50));
        Ok(())
    }

    #[test]
    fn delay_advances_the_virtual_clock() {
        let mut driver = HeadlessDriver::new();
        driver.delay_ms(36);
        driver.delay_ms(4);
        assert_eq!(driver.ticks_ms(), 40);
    }
}
