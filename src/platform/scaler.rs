// src/platform/scaler.rs

//! Font and window sizing.
//!
//! The grid is fixed at `columns × rows` cells; only the font size varies.
//! The window is sized to the grid at the current font size, and whenever
//! the window ends up larger (user resize, fullscreen) the grid is centered
//! in it. Everything that converts between pixels and cells goes through
//! [`CellGeometry`], so mouse hit-testing and glyph placement always agree.

use super::atlas::{atlas_dimensions, AtlasSource, GlyphAtlas, MAX_FONT_SIZE, MIN_FONT_SIZE};
use super::backends::DisplayDriver;
use crate::glyph::ATLAS_GRID;
use anyhow::{Context, Result};
use log::{debug, info};

/// Largest font size whose grid fits in `width_px × height_px`, judged by
/// the nominal atlas dimensions. Falls back to the smallest size when
/// nothing fits.
pub fn fit_font_size(columns: u32, rows: u32, width_px: u32, height_px: u32) -> u8 {
    let mut font_size = MAX_FONT_SIZE;
    while font_size > MIN_FONT_SIZE {
        let (atlas_width, atlas_height) = atlas_dimensions(font_size);
        if atlas_width / ATLAS_GRID * columns <= width_px
            && atlas_height / ATLAS_GRID * rows <= height_px
        {
            break;
        }
        font_size -= 1;
    }
    font_size
}

/// Pixel layout of the grid inside the current window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellGeometry {
    pub cell_width: i32,
    pub cell_height: i32,
    /// Pixel offset of cell (0, 0). Negative when the window is smaller
    /// than the grid.
    pub pad_x: i32,
    pub pad_y: i32,
}

impl CellGeometry {
    /// Cell under a pixel. Division truncates toward zero, so pixels just
    /// left of or above the grid still land in column or row 0; callers
    /// bounds-check the result.
    pub fn pixel_to_cell(&self, x: i32, y: i32) -> (i32, i32) {
        (
            (x - self.pad_x) / self.cell_width,
            (y - self.pad_y) / self.cell_height,
        )
    }

    /// Top-left pixel of a cell.
    pub fn cell_origin(&self, column: i32, row: i32) -> (i32, i32) {
        (
            self.cell_width * column + self.pad_x,
            self.cell_height * row + self.pad_y,
        )
    }
}

/// Owns the font size and the atlas loaded for it.
#[derive(Debug)]
pub struct FontScaler {
    columns: u32,
    rows: u32,
    font_size: u8,
    atlas: GlyphAtlas,
}

impl FontScaler {
    /// Creates the scaler and loads the atlas for `font_size`, clamped into
    /// the valid range.
    pub fn new<A: AtlasSource>(columns: u32, rows: u32, font_size: u8, source: &mut A) -> Result<Self> {
        let font_size = font_size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE);
        let atlas = source
            .load_font(font_size)
            .with_context(|| format!("Failed to load font size {}", font_size))?;
        info!("FontScaler: {}x{} grid at font size {}", columns, rows, font_size);
        Ok(Self {
            columns,
            rows,
            font_size,
            atlas,
        })
    }

    #[inline]
    pub fn font_size(&self) -> u8 {
        self.font_size
    }

    #[inline]
    pub fn atlas(&self) -> &GlyphAtlas {
        &self.atlas
    }

    #[inline]
    pub fn grid(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }

    pub fn fit_font_size(&self, width_px: u32, height_px: u32) -> u8 {
        fit_font_size(self.columns, self.rows, width_px, height_px)
    }

    /// Switches to `font_size`, loading its atlas unless it is the one
    /// already loaded.
    pub fn load_font<A: AtlasSource>(&mut self, source: &mut A, font_size: u8) -> Result<()> {
        let font_size = font_size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE);
        self.font_size = font_size;
        if self.atlas.font_size() == font_size {
            debug!("FontScaler: font size {} already loaded", font_size);
            return Ok(());
        }
        self.atlas = source
            .load_font(font_size)
            .with_context(|| format!("Failed to load font size {}", font_size))?;
        info!("FontScaler: switched to font size {}", font_size);
        Ok(())
    }

    /// Next larger font size, or `None` at the largest.
    pub fn larger(&self) -> Option<u8> {
        (self.font_size < MAX_FONT_SIZE).then(|| self.font_size + 1)
    }

    /// Next smaller font size, or `None` at the smallest.
    pub fn smaller(&self) -> Option<u8> {
        (self.font_size > MIN_FONT_SIZE).then(|| self.font_size - 1)
    }

    /// Pixel size of the whole grid at the loaded font.
    pub fn grid_size_px(&self) -> (u32, u32) {
        (
            self.atlas.cell_width() * self.columns,
            self.atlas.cell_height() * self.rows,
        )
    }

    /// Geometry for a window of the given size. Padding is recomputed from
    /// scratch on every call.
    pub fn geometry(&self, window_size: (u32, u32)) -> CellGeometry {
        let (grid_width, grid_height) = self.grid_size_px();
        CellGeometry {
            cell_width: self.atlas.cell_width() as i32,
            cell_height: self.atlas.cell_height() as i32,
            pad_x: (window_size.0 as i32 - grid_width as i32) / 2,
            pad_y: (window_size.1 as i32 - grid_height as i32) / 2,
        }
    }

    /// Creates the window sized to the grid, with the icon, or resizes the
    /// existing one in place.
    pub fn ensure_window<D: DisplayDriver, A: AtlasSource>(
        &self,
        driver: &mut D,
        source: &mut A,
        title: &str,
    ) -> Result<()> {
        let (width_px, height_px) = self.grid_size_px();
        if driver.has_window() {
            debug!("FontScaler: resizing window to {}x{}", width_px, height_px);
            driver.resize_window(width_px, height_px)
        } else {
            let icon = source.load_icon().context("Failed to load window icon")?;
            driver.create_window(title, width_px, height_px, Some(&icon))
        }
    }
}
