use arrayvec::ArrayVec;
use derive_more::{Display, Error};
use std::str::FromStr;

/// Represents a die value outside of `1..=6`.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Hash, Error)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
#[display(fmt = "`{_0}` is not a valid die face")]
pub struct InvalidRoll(#[error(not(source))] pub u8);

/// The value of a single die.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[derive(test_strategy::Arbitrary)]
#[display(fmt = "{_0}")]
pub struct Face(#[strategy(1u8..=6)] u8);

impl Face {
    /// Constructs [`Face`] if `n` is a valid die value.
    #[inline(always)]
    pub fn new(n: u8) -> Result<Self, InvalidRoll> {
        match n {
            1..=6 => Ok(Face(n)),
            _ => Err(InvalidRoll(n)),
        }
    }

    /// The die value.
    #[inline(always)]
    pub const fn get(&self) -> u8 {
        self.0
    }

    /// An iterator over all faces in ascending order.
    #[inline(always)]
    pub fn iter() -> impl DoubleEndedIterator<Item = Self> + ExactSizeIterator {
        (1..=6).map(Face)
    }
}

impl TryFrom<u8> for Face {
    type Error = InvalidRoll;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        Face::new(n)
    }
}

impl FromStr for Face {
    type Err = InvalidRoll;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Face::new(s.parse().map_err(|_| InvalidRoll(0))?)
    }
}

/// A roll of two dice.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
#[display(fmt = "{_0}-{_1}")]
pub struct Roll(pub Face, pub Face);

impl Roll {
    /// Whether both dice show the same face.
    #[inline(always)]
    pub fn is_double(&self) -> bool {
        self.0 == self.1
    }

    /// The faces that may be played, doubles counting twice.
    #[inline(always)]
    pub fn faces(&self) -> ArrayVec<Face, 4> {
        if self.is_double() {
            ArrayVec::from([self.0; 4])
        } else {
            [self.0, self.1].into_iter().collect()
        }
    }

    /// The largest face of this roll.
    #[inline(always)]
    pub fn max(&self) -> Face {
        self.0.max(self.1)
    }

    /// An iterator over the 21 distinct rolls.
    pub fn iter() -> impl Iterator<Item = Self> {
        Face::iter().flat_map(|a| Face::iter().filter(move |&b| b <= a).map(move |b| Roll(a, b)))
    }
}

/// The reason why parsing [`Roll`] failed.
#[derive(Debug, Display, Clone, Eq, PartialEq, Error)]
#[display(fmt = "failed to parse roll")]
pub struct ParseRollError;

impl From<InvalidRoll> for ParseRollError {
    fn from(_: InvalidRoll) -> Self {
        ParseRollError
    }
}

impl FromStr for Roll {
    type Err = ParseRollError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (a, b) = s.split_once('-').ok_or(ParseRollError)?;
        Ok(Roll(a.parse()?, b.parse()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_strategy::proptest;

    #[proptest]
    fn new_accepts_only_die_values(n: u8) {
        assert_eq!(Face::new(n).is_ok(), (1..=6).contains(&n));
    }

    #[proptest]
    fn new_fails_with_invalid_roll(#[filter(!(1..=6).contains(&#n))] n: u8) {
        assert_eq!(Face::new(n), Err(InvalidRoll(n)));
    }

    #[proptest]
    fn parsing_printed_face_is_an_identity(f: Face) {
        assert_eq!(f.to_string().parse(), Ok(f));
    }

    #[proptest]
    fn doubles_are_played_four_times(f: Face) {
        assert_eq!(&Roll(f, f).faces()[..], &[f; 4]);
    }

    #[proptest]
    fn non_doubles_are_played_once_each(a: Face, #[filter(#a != #b)] b: Face) {
        assert_eq!(&Roll(a, b).faces()[..], &[a, b]);
    }

    #[proptest]
    fn max_returns_the_largest_face(r: Roll) {
        assert_eq!(r.max(), r.faces().into_iter().max().unwrap());
    }

    #[proptest]
    fn parsing_printed_roll_is_an_identity(r: Roll) {
        assert_eq!(r.to_string().parse(), Ok(r));
    }

    #[test]
    fn there_are_twenty_one_distinct_rolls() {
        assert_eq!(Roll::iter().count(), 21);
        assert_eq!(Roll::iter().filter(Roll::is_double).count(), 6);
    }
}
