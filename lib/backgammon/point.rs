use crate::backgammon::{Color, Origin};
use derive_more::Display;

/// A color relative position on the board, counted from that color's home.
///
/// A piece on point `p` is exactly `p` pips away from bearing off.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
#[display(fmt = "{_0}")]
pub struct Point(#[cfg_attr(test, strategy(1u8..=24))] u8);

/// The [`Origin`] of every [`Point`] for each color.
const ORIGINS: [[Origin; 24]; 2] = {
    let mut table = [[Origin::new(0); 24]; 2];
    let mut i = 0;
    while i < 24 {
        table[Color::White as usize][i] = Origin::new(23 - i as u8);
        table[Color::Red as usize][i] = Origin::new(i as u8);
        i += 1;
    }

    table
};

impl Point {
    /// The pip distance of a piece on the bar.
    pub const BAR: u8 = 25;

    /// The highest point of the home quadrant.
    pub const HOME: u8 = 6;

    /// Constructs [`Point`] from its number.
    ///
    /// # Panics
    ///
    /// Panics if `p` is not in the range `1..=24`.
    #[inline(always)]
    pub const fn new(p: u8) -> Self {
        assert!(p >= 1 && p <= 24, "point out of range");
        Point(p)
    }

    /// This point's number.
    #[inline(always)]
    pub const fn get(&self) -> u8 {
        self.0
    }

    /// The [`Origin`] of this point for a given color.
    #[inline(always)]
    pub const fn origin(&self, c: Color) -> Origin {
        ORIGINS[c as usize][self.0 as usize - 1]
    }

    /// Whether this point lies in the home quadrant.
    #[inline(always)]
    pub const fn is_home(&self) -> bool {
        self.0 <= Self::HOME
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_strategy::proptest;

    #[proptest]
    fn point_origins_are_inverse_of_origin_points(p: Point, c: Color) {
        assert_eq!(p.origin(c).point(c), p);
    }

    #[proptest]
    fn home_quadrant_spans_six_points(p: Point) {
        assert_eq!(p.is_home(), p.get() <= 6);
    }

    #[proptest]
    fn home_quadrants_are_on_opposite_sides(#[filter(#p.is_home())] p: Point, c: Color) {
        assert!(!p.origin(c).point(!c).is_home());
    }

    #[test]
    #[should_panic]
    fn new_panics_if_point_is_zero() {
        Point::new(0);
    }
}
