// src/platform/pacing.rs

//! The blocking and non-blocking waits game logic paces itself with.
//!
//! `wait_short` peeks for input and parks what it finds in the one-event
//! lookahead slot; `wait_for_event` hands that event out first and otherwise
//! polls once per tick, sleeping whatever is left of the tick budget.

use super::atlas::AtlasSource;
use super::backends::DisplayDriver;
use super::Platform;
use crate::event::RogueEvent;
use anyhow::Result;
use log::{trace, warn};

impl<D: DisplayDriver, A: AtlasSource> Platform<D, A> {
    /// Presents the back buffer, sleeps `ms`, and polls once unless the
    /// lookahead slot is already full. Returns whether the slot holds an
    /// event. Cell-entered events are never kept; the cell is reported again
    /// by the next poll that sees motion inside it.
    pub fn wait_short(&mut self, ms: u64) -> Result<bool> {
        self.present_frame();
        self.driver.delay_ms(ms);
        if self.lookahead.is_none() {
            let reported = self.translator.last_cell();
            match self.poll_event(false)? {
                Some(event) if event.is_mouse_motion() => {
                    trace!("Platform: discarding {:?} during short wait", event);
                    self.translator.rewind_motion(reported);
                }
                event => self.lookahead = event,
            }
        }
        Ok(self.lookahead.is_some())
    }

    /// Blocks until a canonical event is available.
    ///
    /// An event left in the lookahead slot is returned without polling.
    /// Otherwise each tick runs `animate` (if any), presents, and polls,
    /// then sleeps out the rest of the tick budget.
    pub fn wait_for_event(
        &mut self,
        text_input: bool,
        mut animate: Option<&mut dyn FnMut(&mut Self)>,
    ) -> Result<RogueEvent> {
        self.present_frame();
        if let Some(event) = self.lookahead.take() {
            trace!("Platform: returning buffered {:?}", event);
            return Ok(event);
        }

        loop {
            let tick_start = self.driver.ticks_ms();
            if let Some(animate) = animate.as_deref_mut() {
                animate(self);
            }
            self.present_frame();

            if let Some(event) = self.poll_event(text_input)? {
                return Ok(event);
            }

            let elapsed = self.driver.ticks_ms().saturating_sub(tick_start);
            if elapsed < self.pause_between_polls_ms {
                self.driver.delay_ms(self.pause_between_polls_ms - elapsed);
            }
        }
    }

    /// Whether `wait_short` left an event for the next `wait_for_event`.
    pub fn has_buffered_event(&self) -> bool {
        self.lookahead.is_some()
    }

    fn present_frame(&mut self) {
        if let Err(e) = self.driver.present() {
            warn!("Failed to present frame: {:#}", e);
        }
    }
}
