// src/color.rs

//! Defines the `Color` type used by the game-facing plotting API and its
//! conversion to 8-bit channels and packed surface pixels.

/// Largest channel value in the game's color scale.
pub const CHANNEL_MAX: i16 = 100;

/// An RGB color in the game's 0–100 scale.
///
/// Channels outside 0–100 are clamped when converted, so callers may pass
/// intermediate values from color arithmetic without pre-clamping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub red: i16,
    pub green: i16,
    pub blue: i16,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0);
    pub const WHITE: Color = Color::new(CHANNEL_MAX, CHANNEL_MAX, CHANNEL_MAX);

    pub const fn new(red: i16, green: i16, blue: i16) -> Self {
        Self { red, green, blue }
    }

    /// Maps each channel linearly from 0–100 onto 0–255.
    pub fn to_rgb8(&self) -> (u8, u8, u8) {
        (
            scale_channel(self.red),
            scale_channel(self.green),
            scale_channel(self.blue),
        )
    }
}

/// Packs 8-bit channels into a `0x00RRGGBB` surface pixel.
#[inline]
pub fn pack_rgb(r: u8, g: u8, b: u8) -> u32 {
    ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

/// Splits a `0x00RRGGBB` surface pixel into its 8-bit channels.
#[inline]
pub fn unpack_rgb(pixel: u32) -> (u8, u8, u8) {
    ((pixel >> 16) as u8, (pixel >> 8) as u8, pixel as u8)
}

fn scale_channel(value: i16) -> u8 {
    let clamped = value.clamp(0, CHANNEL_MAX) as u32;
    (clamped * 255 / CHANNEL_MAX as u32) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channels_map_linearly_onto_eight_bits() {
        assert_eq!(Color::new(0, 50, 100).to_rgb8(), (0, 127, 255));
        assert_eq!(Color::new(10, 20, 30).to_rgb8(), (25, 51, 76));
    }

    #[test]
    fn out_of_range_channels_are_clamped() {
        assert_eq!(Color::new(-20, 150, 100).to_rgb8(), (0, 255, 255));
    }

    #[test]
    fn pixels_pack_and_unpack_as_xrgb() {
        let pixel = pack_rgb(0x12, 0x34, 0x56);
        assert_eq!(pixel, 0x0012_3456);
        assert_eq!(unpack_rgb(pixel), (0x12, 0x34, 0x56));
    }
}
