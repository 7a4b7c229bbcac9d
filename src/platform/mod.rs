// src/platform/mod.rs
//
// The platform context: one window, one font, and the canonical event stream.

use crate::color::Color;
use crate::config::Config;
use crate::event::{key_codes, RogueEvent};
use crate::glyph::font_index;
use crate::keys::Modifiers;
use crate::renderer;
use anyhow::{Context, Result};
use log::*;

pub mod atlas;
pub mod backends;
pub mod console;
pub mod pacing;
pub mod remap;
pub mod scaler;
pub mod translator;

#[cfg(test)]
mod tests;

use self::atlas::AtlasSource;
use self::backends::DisplayDriver;
use self::console::{Console, Modifier};
use self::remap::RemapTable;
use self::scaler::{fit_font_size, CellGeometry, FontScaler};
use self::translator::{Effect, PollContext, Translator};

/// Repaints the whole grid after the back buffer was cleared.
pub type RedrawHook<P> = Box<dyn FnMut(&mut P)>;

/// All mutable platform state, owned by the caller.
///
/// `D` is the OS seam (window, event queue, clock) and `A` supplies font
/// atlases and the icon. Every operation goes through `&mut self`; there is
/// no process-wide state besides the configuration.
pub struct Platform<D: DisplayDriver, A: AtlasSource> {
    driver: D,
    source: A,
    scaler: FontScaler,
    translator: Translator,
    remaps: RemapTable,
    /// One canonical event found by `wait_short`, never a cell-entered event.
    lookahead: Option<RogueEvent>,
    title: String,
    pause_between_polls_ms: u64,
    quit_requested: bool,
    redraw_requested: bool,
    redraw_hook: Option<RedrawHook<Self>>,
}

impl<D: DisplayDriver, A: AtlasSource> Platform<D, A> {
    /// Picks the font size, loads its atlas, registers configured remaps,
    /// and opens the window.
    ///
    /// Without a configured font size, the largest size whose grid fits the
    /// usable display area, less the configured margins, is used.
    pub fn new(mut driver: D, mut source: A, config: &Config) -> Result<Self> {
        let (columns, rows) = (config.grid.columns, config.grid.rows);
        let font_size = match config.window.font_size {
            Some(font_size) => font_size,
            None => {
                let (width_px, height_px) = driver
                    .usable_area()
                    .context("Failed to query usable display area")?;
                let font_size = fit_font_size(
                    columns,
                    rows,
                    width_px.saturating_sub(config.window.margin_width_px),
                    height_px.saturating_sub(config.window.margin_height_px),
                );
                info!(
                    "Platform: usable area {}x{} fits font size {}",
                    width_px, height_px, font_size
                );
                font_size
            }
        };

        let scaler = FontScaler::new(columns, rows, font_size, &mut source)?;
        let mut remaps = RemapTable::new();
        for remap in &config.remaps {
            remaps.register(&remap.from, &remap.to);
        }

        let mut platform = Self {
            driver,
            source,
            scaler,
            translator: Translator::new(),
            remaps,
            lookahead: None,
            title: config.window.title.clone(),
            pause_between_polls_ms: config.performance.pause_between_polls_ms,
            quit_requested: false,
            redraw_requested: false,
            redraw_hook: None,
        };
        platform.ensure_window().context("Failed to create window")?;
        Ok(platform)
    }

    /// Creates or resizes the window for the current font, then refreshes.
    pub fn ensure_window(&mut self) -> Result<()> {
        self.scaler
            .ensure_window(&mut self.driver, &mut self.source, &self.title)?;
        self.refresh();
        Ok(())
    }

    /// Installs the game's repaint routine. From then on every refresh
    /// (zoom, resize, fullscreen) calls it right after clearing, instead of
    /// raising the redraw request.
    pub fn set_redraw_hook(&mut self, hook: RedrawHook<Self>) {
        self.redraw_hook = Some(hook);
    }

    /// Clears the back buffer to black and has the game redraw it.
    fn refresh(&mut self) {
        self.driver.surface_mut().clear(0);
        match self.redraw_hook.take() {
            Some(mut hook) => {
                debug!("Platform: surface refreshed, redrawing");
                hook(self);
                self.redraw_hook = Some(hook);
            }
            None => {
                self.redraw_requested = true;
                debug!("Platform: surface refreshed, redraw requested");
            }
        }
    }

    /// Current pixel layout of the grid in the window.
    pub fn geometry(&self) -> CellGeometry {
        self.scaler.geometry(self.driver.window_size())
    }

    pub fn window_padding(&self) -> (i32, i32) {
        let geometry = self.geometry();
        (geometry.pad_x, geometry.pad_y)
    }

    /// Drains the OS queue into at most one canonical event.
    ///
    /// Geometry and modifiers are sampled once up front and apply to every
    /// raw event of this poll.
    pub fn poll_event(&mut self, text_input: bool) -> Result<Option<RogueEvent>> {
        let context = PollContext {
            geometry: self.geometry(),
            modifiers: self.driver.modifiers(),
            text_input,
        };
        let driver = &mut self.driver;
        let mut raw_events = std::iter::from_fn(|| driver.poll_event());
        let reduction = self
            .translator
            .reduce(&mut raw_events, &context, &self.remaps);

        for effect in reduction.effects {
            self.apply_effect(effect)?;
        }

        let shift = context.modifiers.contains(Modifiers::SHIFT);
        let control = context.modifiers.contains(Modifiers::CONTROL);
        if reduction.quit {
            info!("Platform: quit requested");
            self.quit_requested = true;
            return Ok(Some(
                RogueEvent::keystroke(key_codes::ESCAPE_KEY).with_modifiers(shift, control),
            ));
        }
        let event = reduction
            .primary
            .or(reduction.motion)
            .map(|event| event.with_modifiers(shift, control));
        if let Some(event) = &event {
            trace!("Platform: event {:?}", event);
        }
        Ok(event)
    }

    fn apply_effect(&mut self, effect: Effect) -> Result<()> {
        debug!("Platform: applying {:?}", effect);
        match effect {
            Effect::Refit {
                width_px,
                height_px,
            } => {
                let font_size = self.scaler.fit_font_size(width_px, height_px);
                info!(
                    "Platform: window resized to {}x{}, font size {}",
                    width_px, height_px, font_size
                );
                self.scaler.load_font(&mut self.source, font_size)?;
                self.refresh();
            }
            Effect::ZoomIn => {
                if let Some(font_size) = self.scaler.larger() {
                    self.scaler.load_font(&mut self.source, font_size)?;
                    self.ensure_window()?;
                }
            }
            Effect::ZoomOut => {
                if let Some(font_size) = self.scaler.smaller() {
                    self.scaler.load_font(&mut self.source, font_size)?;
                    self.ensure_window()?;
                }
            }
            Effect::ToggleFullscreen => {
                if let Err(e) = self.driver.toggle_fullscreen() {
                    warn!("Platform: fullscreen toggle failed: {:#}", e);
                }
                self.refresh();
            }
        }
        Ok(())
    }

    /// Draws one character cell into the back buffer.
    pub fn plot_char(&mut self, c: char, x: i32, y: i32, fore: Color, back: Color) {
        let geometry = self.geometry();
        let mut surface = self.driver.surface_mut();
        renderer::plot_cell(
            &mut surface,
            self.scaler.atlas(),
            &geometry,
            font_index(c),
            x,
            y,
            fore,
            back,
        );
    }

    pub fn remap(&mut self, from: &str, to: &str) -> bool {
        self.remaps.register(from, to)
    }

    pub fn modifier_held(&self, modifier: Modifier) -> bool {
        let modifiers = self.driver.modifiers();
        match modifier {
            Modifier::Shift => modifiers.contains(Modifiers::SHIFT),
            Modifier::Control => modifiers.contains(Modifiers::CONTROL),
        }
    }

    pub fn notify_event(&mut self, event_id: i16, data1: i32, data2: i32, str1: &str, str2: &str) {
        trace!(
            "Platform: notify event {} ({}, {}, {:?}, {:?})",
            event_id,
            data1,
            data2,
            str1,
            str2
        );
    }

    /// Whether a quit signal has been seen. Stays set once raised.
    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    /// Returns and clears the pending redraw request.
    pub fn take_redraw_request(&mut self) -> bool {
        std::mem::take(&mut self.redraw_requested)
    }

    pub fn font_size(&self) -> u8 {
        self.scaler.font_size()
    }

    pub fn grid(&self) -> (u32, u32) {
        self.scaler.grid()
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    pub fn source(&self) -> &A {
        &self.source
    }
}

impl<D: DisplayDriver, A: AtlasSource> Console for Platform<D, A> {
    fn pause_for_milliseconds(&mut self, ms: u64) -> Result<bool> {
        self.wait_short(ms)
    }

    fn next_key_or_mouse_event(
        &mut self,
        text_input: bool,
        animate: Option<&mut dyn FnMut(&mut Self)>,
    ) -> Result<RogueEvent> {
        self.wait_for_event(text_input, animate)
    }

    fn plot_char(&mut self, c: char, x: i32, y: i32, fore: Color, back: Color) {
        Platform::plot_char(self, c, x, y, fore, back);
    }

    fn remap(&mut self, from: &str, to: &str) {
        Platform::remap(self, from, to);
    }

    fn modifier_held(&self, modifier: Modifier) -> bool {
        Platform::modifier_held(self, modifier)
    }

    fn notify_event(&mut self, event_id: i16, data1: i32, data2: i32, str1: &str, str2: &str) {
        Platform::notify_event(self, event_id, data1, data2, str1, str2);
    }
}
