// src/platform/remap.rs

//! Literal character substitutions for text input.

use log::{debug, warn};

/// Most substitutions the table will hold.
pub const MAX_REMAPS: usize = 128;

/// An ordered list of `(from, to)` character pairs. The first pair whose
/// `from` matches wins; unmatched characters pass through unchanged.
#[derive(Debug, Clone, Default)]
pub struct RemapTable {
    pairs: Vec<(char, char)>,
}

impl RemapTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a substitution from the first character of `from` to the
    /// first character of `to`. Returns `false` when the pair was ignored,
    /// either because the table is full or a string was empty.
    pub fn register(&mut self, from: &str, to: &str) -> bool {
        let (Some(from_char), Some(to_char)) = (from.chars().next(), to.chars().next()) else {
            warn!("Ignoring remap {:?} -> {:?}: empty character", from, to);
            return false;
        };
        if self.pairs.len() >= MAX_REMAPS {
            warn!(
                "Remap table full ({} entries); ignoring {:?} -> {:?}",
                MAX_REMAPS, from_char, to_char
            );
            return false;
        }
        debug!("Remap registered: {:?} -> {:?}", from_char, to_char);
        self.pairs.push((from_char, to_char));
        true
    }

    pub fn apply(&self, c: char) -> char {
        self.pairs
            .iter()
            .find(|(from, _)| *from == c)
            .map_or(c, |(_, to)| *to)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn first_registered_pair_wins() {
        let mut table = RemapTable::new();
        assert!(table.register("a", "x"));
        assert!(table.register("a", "y"));
        assert_eq!(table.apply('a'), 'x');
    }

    #[test]
    fn unmatched_characters_pass_through() {
        let mut table = RemapTable::new();
        table.register("y", "z");
        assert_eq!(table.apply('q'), 'q');
        assert_eq!(table.apply('y'), 'z');
    }

    #[test]
    fn only_the_first_character_of_each_string_counts() {
        let mut table = RemapTable::new();
        table.register("hjkl", "wasd");
        assert_eq!(table.apply('h'), 'w');
        assert_eq!(table.apply('j'), 'j');
    }

    #[test]
    fn empty_strings_are_ignored() {
        let mut table = RemapTable::new();
        assert!(!table.register("", "x"));
        assert!(!table.register("x", ""));
        assert!(table.is_empty());
    }

    #[test]
    fn registrations_beyond_capacity_are_ignored() {
        let mut table = RemapTable::new();
        for _ in 0..MAX_REMAPS {
            assert!(table.register("a", "b"));
        }
        assert!(!table.register("c", "d"));
        assert_eq!(table.len(), MAX_REMAPS);
        assert_eq!(table.apply('c'), 'c');
    }
}
