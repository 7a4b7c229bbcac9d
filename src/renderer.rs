// src/renderer.rs

//! Draws grid cells into a driver's back buffer.
//!
//! A cell is drawn in one pass: the destination rectangle is filled with
//! the background color, then the glyph is blended over it with the atlas
//! color multiplied by the foreground color. Pixels falling outside the
//! surface are skipped.

use crate::color::{pack_rgb, unpack_rgb, Color};
use crate::glyph::ATLAS_GRID;
use crate::platform::atlas::GlyphAtlas;
use crate::platform::backends::Surface;
use crate::platform::scaler::CellGeometry;

/// Source rectangle `(x, y, width, height)` of an atlas index.
pub fn source_rect(atlas: &GlyphAtlas, index: u8) -> (u32, u32, u32, u32) {
    let (cell_width, cell_height) = (atlas.cell_width(), atlas.cell_height());
    (
        (index as u32 % ATLAS_GRID) * cell_width,
        (index as u32 / ATLAS_GRID) * cell_height,
        cell_width,
        cell_height,
    )
}

/// Draws atlas glyph `index` at grid cell `(column, row)`.
pub fn plot_cell(
    surface: &mut Surface<'_>,
    atlas: &GlyphAtlas,
    geometry: &CellGeometry,
    index: u8,
    column: i32,
    row: i32,
    fore: Color,
    back: Color,
) {
    let (src_x, src_y, width, height) = source_rect(atlas, index);
    let (dest_x, dest_y) = geometry.cell_origin(column, row);
    let (fore_r, fore_g, fore_b) = fore.to_rgb8();
    let (back_r, back_g, back_b) = back.to_rgb8();
    let image = atlas.image();

    for dy in 0..height {
        let y = dest_y + dy as i32;
        if y < 0 || y >= surface.height as i32 {
            continue;
        }
        for dx in 0..width {
            let x = dest_x + dx as i32;
            if x < 0 || x >= surface.width as i32 {
                continue;
            }
            let [r, g, b, a] = image.get_pixel(src_x + dx, src_y + dy).0;
            let pixel = pack_rgb(
                blend(tint(r, fore_r), back_r, a),
                blend(tint(g, fore_g), back_g, a),
                blend(tint(b, fore_b), back_b, a),
            );
            let offset = y as usize * surface.width as usize + x as usize;
            surface.pixels[offset] = pixel;
        }
    }
}

#[inline]
fn tint(channel: u8, modulation: u8) -> u8 {
    (channel as u32 * modulation as u32 / 255) as u8
}

#[inline]
fn blend(src: u8, dst: u8, alpha: u8) -> u8 {
    let alpha = alpha as u32;
    ((src as u32 * alpha + dst as u32 * (255 - alpha)) / 255) as u8
}

/// Reads back the channels of one surface pixel.
pub fn pixel_rgb(surface: &Surface<'_>, x: u32, y: u32) -> Option<(u8, u8, u8)> {
    surface.pixel(x, y).map(unpack_rgb)
}
