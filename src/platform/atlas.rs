// src/platform/atlas.rs

//! Glyph atlases and the assets they are loaded from.
//!
//! A font is a PNG holding a 16×16 grid of glyph cells; the cell size is the
//! image size divided by 16. Thirteen sizes exist, `font-1.png` through
//! `font-13.png`, with fixed nominal dimensions listed in [`FONT_WIDTHS`] and
//! [`FONT_HEIGHTS`].

use crate::glyph::ATLAS_GRID;
use anyhow::{anyhow, Context, Result};
use image::RgbaImage;
use log::{debug, info};
use std::path::{Path, PathBuf};

pub const MIN_FONT_SIZE: u8 = 1;
pub const MAX_FONT_SIZE: u8 = 13;

/// Atlas pixel widths, indexed by `font size - 1`.
pub const FONT_WIDTHS: [u32; 13] = [112, 128, 144, 160, 176, 192, 208, 224, 240, 256, 272, 288, 304];
/// Atlas pixel heights, indexed by `font size - 1`.
pub const FONT_HEIGHTS: [u32; 13] = [176, 208, 240, 272, 304, 336, 368, 400, 432, 464, 496, 528, 528];

/// Nominal atlas dimensions for a font size, clamped into the valid range.
pub fn atlas_dimensions(font_size: u8) -> (u32, u32) {
    let index = (font_size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE) - 1) as usize;
    (FONT_WIDTHS[index], FONT_HEIGHTS[index])
}

/// A loaded glyph atlas together with the font size it was loaded for.
#[derive(Debug, Clone)]
pub struct GlyphAtlas {
    font_size: u8,
    image: RgbaImage,
}

impl GlyphAtlas {
    /// Wraps an atlas image, rejecting images that are not a whole 16×16
    /// grid of non-empty cells.
    pub fn new(font_size: u8, image: RgbaImage) -> Result<Self> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 || width % ATLAS_GRID != 0 || height % ATLAS_GRID != 0 {
            return Err(anyhow!(
                "Glyph atlas for font size {} is {}x{}; both dimensions must be non-zero multiples of {}",
                font_size,
                width,
                height,
                ATLAS_GRID
            ));
        }
        Ok(Self { font_size, image })
    }

    #[inline]
    pub fn font_size(&self) -> u8 {
        self.font_size
    }

    #[inline]
    pub fn cell_width(&self) -> u32 {
        self.image.width() / ATLAS_GRID
    }

    #[inline]
    pub fn cell_height(&self) -> u32 {
        self.image.height() / ATLAS_GRID
    }

    #[inline]
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }
}

/// Supplies font atlases and the window icon.
pub trait AtlasSource {
    fn load_font(&mut self, font_size: u8) -> Result<GlyphAtlas>;
    fn load_icon(&mut self) -> Result<RgbaImage>;
}

/// Reads assets from `<data directory>/assets/`.
#[derive(Debug, Clone)]
pub struct AssetDirectory {
    assets: PathBuf,
}

impl AssetDirectory {
    pub fn new(data_directory: &Path) -> Self {
        Self {
            assets: data_directory.join("assets"),
        }
    }

    pub fn font_path(&self, font_size: u8) -> PathBuf {
        self.assets.join(format!("font-{}.png", font_size))
    }

    pub fn icon_path(&self) -> PathBuf {
        self.assets.join("icon.png")
    }
}

fn load_rgba(path: &Path) -> Result<RgbaImage> {
    let image = image::open(path).with_context(|| format!("Failed to load image {}", path.display()))?;
    Ok(image.to_rgba8())
}

impl AtlasSource for AssetDirectory {
    fn load_font(&mut self, font_size: u8) -> Result<GlyphAtlas> {
        let path = self.font_path(font_size);
        info!("Loading font atlas {}", path.display());
        let atlas = GlyphAtlas::new(font_size, load_rgba(&path)?)
            .with_context(|| format!("Invalid font atlas {}", path.display()))?;
        debug!(
            "Font atlas {} loaded: cell {}x{}",
            font_size,
            atlas.cell_width(),
            atlas.cell_height()
        );
        Ok(atlas)
    }

    fn load_icon(&mut self) -> Result<RgbaImage> {
        let path = self.icon_path();
        debug!("Loading window icon {}", path.display());
        load_rgba(&path)
    }
}

/// Atlas source that synthesises atlases with the nominal dimensions and
/// counts how often it is asked for one.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct MemoryAtlasSource {
    pub font_loads: Vec<u8>,
    pub icon_loads: usize,
}

#[cfg(test)]
impl AtlasSource for MemoryAtlasSource {
    fn load_font(&mut self, font_size: u8) -> Result<GlyphAtlas> {
        self.font_loads.push(font_size);
        let (width, height) = atlas_dimensions(font_size);
        // Left half of every cell is opaque white, right half transparent.
        let cell_width = width / ATLAS_GRID;
        let image = RgbaImage::from_fn(width, height, |x, _| {
            if x % cell_width < cell_width / 2 {
                image::Rgba([255, 255, 255, 255])
            } else {
                image::Rgba([0, 0, 0, 0])
            }
        });
        GlyphAtlas::new(font_size, image)
    }

    fn load_icon(&mut self) -> Result<RgbaImage> {
        self.icon_loads += 1;
        Ok(RgbaImage::new(2, 2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn atlas_cells_are_a_sixteenth_of_the_image() -> Result<()> {
        let atlas = GlyphAtlas::new(5, RgbaImage::new(176, 304))?;
        assert_eq!(atlas.font_size(), 5);
        assert_eq!((atlas.cell_width(), atlas.cell_height()), (11, 19));
        Ok(())
    }

    #[test]
    fn atlas_dimensions_must_divide_by_sixteen() {
        assert!(GlyphAtlas::new(1, RgbaImage::new(100, 176)).is_err());
        assert!(GlyphAtlas::new(1, RgbaImage::new(112, 0)).is_err());
    }

    #[test]
    fn nominal_dimensions_follow_the_table() {
        assert_eq!(atlas_dimensions(1), (112, 176));
        assert_eq!(atlas_dimensions(6), (192, 336));
        assert_eq!(atlas_dimensions(13), (304, 528));
        assert_eq!(atlas_dimensions(0), (112, 176));
        assert_eq!(atlas_dimensions(40), (304, 528));
    }

    #[test]
    fn asset_paths_live_under_the_assets_directory() {
        let assets = AssetDirectory::new(Path::new("/opt/brogue"));
        assert_eq!(assets.font_path(7), PathBuf::from("/opt/brogue/assets/font-7.png"));
        assert_eq!(assets.icon_path(), PathBuf::from("/opt/brogue/assets/icon.png"));
    }

    #[test]
    fn missing_assets_are_errors() {
        let mut assets = AssetDirectory::new(Path::new("/nonexistent/rogue-platform"));
        assert!(assets.load_font(3).is_err());
        assert!(assets.load_icon().is_err());
    }
}
