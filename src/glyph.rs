// src/glyph.rs

//! Maps characters onto cells of the 16×16 glyph atlas.
//!
//! The atlas is indexed by a single byte. Code points 0–127 map to themselves;
//! a fixed set of special symbols map to hand-placed slots in the upper half of
//! the atlas, and everything else renders as `'?'`.

/// Number of glyph cells along each edge of the atlas.
pub const ATLAS_GRID: u32 = 16;

/// Atlas index used for characters the atlas cannot display.
pub const FALLBACK_INDEX: u8 = b'?';

/// The special symbols the atlas carries outside the ASCII range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecialGlyph {
    MiddleDot,
    FourDots,
    Diamond,
    FlippedV,
    Aries,
    Eszett,
    Ankh,
    MusicNote,
    Circle,
    LightningBolt,
    FilledCircle,
    Neuter,
    UAcute,
    Currency,
    UpArrow,
    DownArrow,
    LeftArrow,
    RightArrow,
    Omega,
    CircleBars,
    FilledCircleBars,
}

impl SpecialGlyph {
    pub const ALL: [SpecialGlyph; 21] = [
        SpecialGlyph::MiddleDot,
        SpecialGlyph::FourDots,
        SpecialGlyph::Diamond,
        SpecialGlyph::FlippedV,
        SpecialGlyph::Aries,
        SpecialGlyph::Eszett,
        SpecialGlyph::Ankh,
        SpecialGlyph::MusicNote,
        SpecialGlyph::Circle,
        SpecialGlyph::LightningBolt,
        SpecialGlyph::FilledCircle,
        SpecialGlyph::Neuter,
        SpecialGlyph::UAcute,
        SpecialGlyph::Currency,
        SpecialGlyph::UpArrow,
        SpecialGlyph::DownArrow,
        SpecialGlyph::LeftArrow,
        SpecialGlyph::RightArrow,
        SpecialGlyph::Omega,
        SpecialGlyph::CircleBars,
        SpecialGlyph::FilledCircleBars,
    ];

    /// The Unicode scalar the game uses for this symbol.
    pub const fn codepoint(self) -> char {
        match self {
            SpecialGlyph::MiddleDot => '\u{00B7}',
            SpecialGlyph::FourDots => '\u{2237}',
            SpecialGlyph::Diamond => '\u{25C7}',
            SpecialGlyph::FlippedV => '\u{22CF}',
            SpecialGlyph::Aries => '\u{2648}',
            SpecialGlyph::Eszett => '\u{00DF}',
            SpecialGlyph::Ankh => '\u{2640}',
            SpecialGlyph::MusicNote => '\u{266A}',
            SpecialGlyph::Circle => '\u{26AA}',
            SpecialGlyph::LightningBolt => '\u{03DF}',
            SpecialGlyph::FilledCircle => '\u{25CF}',
            SpecialGlyph::Neuter => '\u{26B2}',
            SpecialGlyph::UAcute => '\u{00DA}',
            SpecialGlyph::Currency => '\u{00A4}',
            SpecialGlyph::UpArrow => '\u{2191}',
            SpecialGlyph::DownArrow => '\u{2193}',
            SpecialGlyph::LeftArrow => '\u{2190}',
            SpecialGlyph::RightArrow => '\u{2192}',
            SpecialGlyph::Omega => '\u{03A9}',
            SpecialGlyph::CircleBars => '\u{29F2}',
            SpecialGlyph::FilledCircleBars => '\u{29F3}',
        }
    }

    /// The atlas slot holding this symbol's bitmap.
    pub const fn atlas_index(self) -> u8 {
        match self {
            SpecialGlyph::MiddleDot => 0x80,
            SpecialGlyph::FourDots => 0x81,
            SpecialGlyph::Diamond => 0x82,
            SpecialGlyph::FlippedV => 0x83,
            SpecialGlyph::Aries => 0x84,
            SpecialGlyph::Eszett => 0xDF,
            SpecialGlyph::Ankh => 0x85,
            SpecialGlyph::MusicNote => 0x86,
            SpecialGlyph::Circle => 0x87,
            SpecialGlyph::LightningBolt => 0x99,
            SpecialGlyph::FilledCircle => 0x89,
            SpecialGlyph::Neuter => 0x8A,
            SpecialGlyph::UAcute => 0xDA,
            SpecialGlyph::Currency => 0xA4,
            SpecialGlyph::UpArrow => 0x90,
            SpecialGlyph::DownArrow => 0x91,
            SpecialGlyph::LeftArrow => 0x92,
            SpecialGlyph::RightArrow => 0x93,
            SpecialGlyph::Omega => 0x96,
            SpecialGlyph::CircleBars => 0x8C,
            SpecialGlyph::FilledCircleBars => 0x8D,
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        Self::ALL.iter().copied().find(|glyph| glyph.codepoint() == c)
    }
}

/// Resolves a character to its atlas index.
pub fn font_index(c: char) -> u8 {
    if c.is_ascii() {
        return c as u8;
    }
    SpecialGlyph::from_char(c)
        .map(SpecialGlyph::atlas_index)
        .unwrap_or(FALLBACK_INDEX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn ascii_maps_to_itself() {
        assert_eq!(font_index('\0'), 0);
        assert_eq!(font_index('@'), b'@');
        assert_eq!(font_index('\u{7F}'), 0x7F);
    }

    #[test]
    fn special_symbols_map_to_their_atlas_slots() {
        assert_eq!(font_index('\u{00B7}'), 0x80);
        assert_eq!(font_index('\u{00DF}'), 0xDF);
        assert_eq!(font_index('\u{03DF}'), 0x99);
        assert_eq!(font_index('\u{00DA}'), 0xDA);
        assert_eq!(font_index('\u{00A4}'), 0xA4);
        assert_eq!(font_index('\u{2192}'), 0x93);
        assert_eq!(font_index('\u{29F3}'), 0x8D);
        assert_eq!(font_index('\u{26AA}'), 0x87);
        assert_eq!(font_index('\u{26AC}'), b'?');
    }

    #[test]
    fn unknown_characters_render_as_question_mark() {
        assert_eq!(font_index('\u{00E9}'), b'?');
        assert_eq!(font_index('\u{1F600}'), b'?');
    }

    #[test]
    fn special_table_is_unambiguous() {
        let codepoints: HashSet<char> = SpecialGlyph::ALL.iter().map(|g| g.codepoint()).collect();
        let slots: HashSet<u8> = SpecialGlyph::ALL.iter().map(|g| g.atlas_index()).collect();
        assert_eq!(codepoints.len(), SpecialGlyph::ALL.len());
        assert_eq!(slots.len(), SpecialGlyph::ALL.len());
        assert!(slots.iter().all(|slot| *slot >= 0x80));
    }
}
