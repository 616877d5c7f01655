use derive_more::{Display, Error};
use std::{ops::Not, str::FromStr};

/// The color of a backgammon piece.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[derive(test_strategy::Arbitrary)]
#[repr(u8)]
pub enum Color {
    #[display(fmt = "white")]
    White,
    #[display(fmt = "red")]
    Red,
}

impl Color {
    /// An iterator over both colors, white first.
    #[inline(always)]
    pub fn iter() -> impl DoubleEndedIterator<Item = Self> + ExactSizeIterator {
        [Color::White, Color::Red].into_iter()
    }

    /// The direction this color travels along the origins.
    #[inline(always)]
    pub const fn direction(&self) -> i8 {
        match self {
            Color::White => 1,
            Color::Red => -1,
        }
    }

    /// The single letter abbreviation used in board state strings.
    #[inline(always)]
    pub const fn abbrev(&self) -> char {
        match self {
            Color::White => 'W',
            Color::Red => 'R',
        }
    }

    /// The color abbreviated by `c`, if any.
    #[inline(always)]
    pub fn from_abbrev(c: char) -> Option<Self> {
        match c {
            'W' => Some(Color::White),
            'R' => Some(Color::Red),
            _ => None,
        }
    }
}

impl Not for Color {
    type Output = Self;

    #[inline(always)]
    fn not(self) -> Self {
        match self {
            Color::White => Color::Red,
            Color::Red => Color::White,
        }
    }
}

/// The reason why parsing [`Color`] failed.
#[derive(Debug, Display, Clone, Eq, PartialEq, Error)]
#[display(fmt = "failed to parse color")]
pub struct ParseColorError;

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "white" | "W" => Ok(Color::White),
            "red" | "R" => Ok(Color::Red),
            _ => Err(ParseColorError),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_strategy::proptest;

    #[proptest]
    fn color_implements_not_operator(c: Color) {
        assert_eq!(!!c, c);
        assert_ne!(!c, c);
    }

    #[proptest]
    fn opposite_colors_travel_in_opposite_directions(c: Color) {
        assert_eq!(c.direction(), -(!c).direction());
    }

    #[proptest]
    fn abbreviation_identifies_color(c: Color) {
        assert_eq!(Color::from_abbrev(c.abbrev()), Some(c));
    }

    #[proptest]
    fn parsing_printed_color_is_an_identity(c: Color) {
        assert_eq!(c.to_string().parse(), Ok(c));
        assert_eq!(c.abbrev().to_string().parse(), Ok(c));
    }

    #[proptest]
    fn parsing_color_fails_for_unknown_names(
        #[filter(!["white", "red", "W", "R"].contains(&#s.as_str()))] s: String,
    ) {
        assert_eq!(s.parse::<Color>(), Err(ParseColorError));
    }

    #[test]
    fn iter_yields_white_first() {
        assert_eq!(Color::iter().collect::<Vec<_>>(), [Color::White, Color::Red]);
    }
}
