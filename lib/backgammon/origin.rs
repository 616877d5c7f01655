use crate::backgammon::{Color, Face, Point};
use derive_more::Display;

/// A color independent index into the 24 slots of the board.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
#[display(fmt = "{_0}")]
pub struct Origin(#[cfg_attr(test, strategy(0u8..24))] u8);

/// The [`Point`] each color assigns to every [`Origin`].
const POINTS: [[Point; 24]; 2] = {
    let mut table = [[Point::new(1); 24]; 2];
    let mut i = 0;
    while i < 24 {
        table[Color::White as usize][i] = Point::new(24 - i as u8);
        table[Color::Red as usize][i] = Point::new(i as u8 + 1);
        i += 1;
    }

    table
};

impl Origin {
    /// The number of origins on the board.
    pub const COUNT: usize = 24;

    /// Constructs [`Origin`] from its index.
    ///
    /// # Panics
    ///
    /// Panics if `i` is not in the range `0..24`.
    #[inline(always)]
    pub const fn new(i: u8) -> Self {
        assert!(i < Self::COUNT as u8, "origin out of range");
        Origin(i)
    }

    /// Constructs [`Origin`] from a move coordinate, or `None` if out of range.
    ///
    /// Note that `-1` stands for the bar in move coordinates and is therefore not an origin.
    #[inline(always)]
    pub fn try_new(i: i8) -> Option<Self> {
        u8::try_from(i)
            .ok()
            .filter(|&i| i < Self::COUNT as u8)
            .map(Origin)
    }

    /// This origin's index.
    #[inline(always)]
    pub const fn get(&self) -> u8 {
        self.0
    }

    /// This origin's index as a `usize`.
    #[inline(always)]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }

    /// An iterator over all origins in ascending order.
    #[inline(always)]
    pub fn iter() -> impl DoubleEndedIterator<Item = Self> + ExactSizeIterator {
        (0..Self::COUNT as u8).map(Origin)
    }

    /// The [`Point`] a color assigns to this origin.
    #[inline(always)]
    pub const fn point(&self, c: Color) -> Point {
        POINTS[c as usize][self.index()]
    }

    /// The origin reached by a piece of a given color moving `face` pips from here.
    ///
    /// Returns `None` if the piece would leave the board.
    #[inline(always)]
    pub fn offset(&self, c: Color, face: Face) -> Option<Self> {
        Origin::try_new(self.0 as i8 + face.get() as i8 * c.direction())
    }
}
