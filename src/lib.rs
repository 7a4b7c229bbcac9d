// src/lib.rs

//! Input/output platform for a grid-based, text-rendered game.
//!
//! Raw window-system events become one canonical event stream
//! ([`event::RogueEvent`]); character cells become pixels in a resizable
//! window drawn from a scalable bitmap font. [`platform::Platform`] owns all
//! of it and is driven through the [`platform::console::Console`] trait.

pub mod color;
pub mod config;
pub mod event;
pub mod glyph;
pub mod keys;
pub mod platform;
pub mod renderer;
