use crate::backgammon::{Board, BoardError, Color, Face, Move, MoveError, MoveKind, Position};
use crate::backgammon::Roll;
use arrayvec::ArrayVec;
use derive_more::{DebugCustom, Deref, Display, IntoIterator};
use std::collections::HashSet;

/// The moves played for a single [`Roll`], in order.
#[derive(DebugCustom, Display, Default, Clone, Eq, PartialEq, Hash, Deref, IntoIterator)]
#[debug(fmt = "Sequence({self})")]
#[display(
    fmt = "{}",
    "self.iter().map(Move::to_string).collect::<ArrayVec<_, 4>>().join(\" \")"
)]
pub struct Sequence(
    #[deref(forward)]
    #[into_iterator(owned, ref)]
    ArrayVec<Move, 4>,
);

impl Sequence {
    /// The number of moves in this sequence.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// If this sequence has no moves, which means the roll could not be played.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the moves in this sequence.
    #[inline]
    pub fn iter(&self) -> <&Self as IntoIterator>::IntoIter {
        self.into_iter()
    }

    /// Plays every move in order.
    pub fn apply(&self, pos: &mut Position) -> Result<(), MoveError> {
        for m in self {
            m.apply(pos)?;
        }

        Ok(())
    }

    /// Reverts every move in reverse order.
    pub fn undo(&self, pos: &mut Position) -> Result<(), BoardError> {
        for m in self.iter().rev() {
            m.undo(pos)?;
        }

        Ok(())
    }
}

fn walk(
    pos: &mut Position,
    c: Color,
    faces: &[Face],
    played: &mut Sequence,
    leaves: &mut Vec<(Board, Sequence)>,
) -> Result<(), MoveError> {
    let moves = match faces.split_first() {
        Some((&f, _)) if pos.winner().is_none() => pos.moves(c, f, MoveKind::ANY),
        _ => ArrayVec::new(),
    };

    if moves.is_empty() {
        leaves.push((*pos.board(), played.clone()));
        return Ok(());
    }

    for m in moves {
        m.apply(pos)?;
        played.0.push(m);
        walk(pos, c, &faces[1..], played, leaves)?;
        played.0.pop();
        m.undo(pos)?;
    }

    Ok(())
}

/// Every distinct way a color may play a [`Roll`].
///
/// As many dice as possible must be played and, if only one die of a non-double can be played,
/// the larger one must be used when possible. Sequences reaching the same board are only
/// returned once. A roll that cannot be played at all yields a single empty sequence.
///
/// The position is restored to its original state before returning.
pub fn sequences(pos: &mut Position, c: Color, roll: Roll) -> Result<Vec<Sequence>, MoveError> {
    let Roll(a, b) = roll;
    let orders: ArrayVec<ArrayVec<Face, 4>, 2> = if roll.is_double() {
        [roll.faces()].into_iter().collect()
    } else {
        [[a, b], [b, a]]
            .into_iter()
            .map(|faces| faces.into_iter().collect())
            .collect()
    };

    let mut leaves = Vec::new();
    for faces in &orders {
        walk(pos, c, faces, &mut Sequence::default(), &mut leaves)?;
    }

    let longest = leaves.iter().map(|(_, s)| s.len()).max().unwrap_or(0);
    leaves.retain(|(_, s)| s.len() == longest);

    let larger = |s: &Sequence| s.first().map(Move::face) == Some(roll.max());
    if longest == 1 && !roll.is_double() && leaves.iter().any(|(_, s)| larger(s)) {
        leaves.retain(|(_, s)| larger(s));
    }

    let mut seen = HashSet::new();
    Ok(leaves
        .into_iter()
        .filter(|(board, _)| seen.insert(*board))
        .map(|(_, s)| s)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backgammon::{Origin, Regular};
    use test_strategy::proptest;

    #[test]
    fn opening_rolls_have_the_known_number_of_plays() {
        let mut pos = Position::default();
        for (roll, plays) in [("2-1", 15), ("3-1", 16), ("6-5", 7), ("6-6", 11), ("1-1", 42)] {
            let roll: Roll = roll.parse().unwrap();
            assert_eq!(sequences(&mut pos, Color::White, roll).unwrap().len(), plays);
            assert_eq!(sequences(&mut pos, Color::Red, roll).unwrap().len(), plays);
        }
    }

    #[test]
    fn only_the_larger_die_is_played_if_not_both_can_be() {
        let mut pos: Position =
            "0|0|1:W|0:|0:|0:|0:|0:|0:|2:R|0:|0:|0:|0:|0:|0:|0:|0:|0:|0:|0:|0:|0:|0:|0:|0:|14|13"
                .parse()
                .unwrap();

        let six = Face::new(6).unwrap();
        let one = Face::new(1).unwrap();

        let expected = Move::Regular(Regular {
            color: Color::White,
            origin: Origin::new(0),
            face: six,
            dest: Origin::new(6),
            hit: false,
        });

        for roll in [Roll(six, one), Roll(one, six)] {
            let sequences = sequences(&mut pos, Color::White, roll).unwrap();
            assert_eq!(sequences.len(), 1);
            assert_eq!(&sequences[0][..], &[expected]);
        }
    }

    #[test]
    fn doubles_may_be_played_four_times_through_to_bearoff() {
        let mut pos: Position =
            "0|0|1:W|0:|0:|0:|0:|0:|0:|2:R|0:|0:|0:|0:|0:|0:|0:|0:|0:|0:|0:|0:|0:|0:|0:|0:|14|13"
                .parse()
                .unwrap();

        let six = Face::new(6).unwrap();
        let sequences = sequences(&mut pos, Color::White, Roll(six, six)).unwrap();
        assert_eq!(sequences.len(), 1);
        assert_eq!(sequences[0].to_string(), "0:6 6:6 12:6 18:6");

        let mut next = pos.clone();
        sequences[0].apply(&mut next).unwrap();
        assert_eq!(next.winner(), Some(Color::White));
    }

    #[test]
    fn unplayable_rolls_yield_an_empty_sequence() {
        let mut pos: Position =
            "1|0|2:R|2:R|2:R|2:R|2:R|2:R|0:|0:|0:|0:|0:|0:|0:|0:|0:|0:|0:|0:|0:|0:|0:|0:|0:|0:|14|3"
                .parse()
                .unwrap();

        for roll in Roll::iter() {
            assert_eq!(
                sequences(&mut pos, Color::White, roll),
                Ok(vec![Sequence::default()])
            );
        }
    }

    #[proptest]
    fn sequences_restore_the_position(mut pos: Position, c: Color, roll: Roll) {
        let before = pos.clone();
        sequences(&mut pos, c, roll)?;
        assert_eq!(pos, before);
    }

    #[proptest]
    fn sequences_play_as_many_dice_as_possible(mut pos: Position, c: Color, roll: Roll) {
        let sequences = sequences(&mut pos, c, roll)?;
        let len = sequences[0].len();
        assert!(sequences.iter().all(|s| s.len() == len));
        assert!(len <= roll.faces().len());
    }

    #[proptest]
    fn sequences_reach_distinct_boards(mut pos: Position, c: Color, roll: Roll) {
        let mut boards = HashSet::new();
        for s in sequences(&mut pos, c, roll)? {
            let mut next = pos.clone();
            s.apply(&mut next)?;
            assert!(boards.insert(*next.board()));
        }
    }

    #[proptest]
    fn sequences_are_played_with_the_faces_rolled(mut pos: Position, c: Color, roll: Roll) {
        for s in sequences(&mut pos, c, roll)? {
            let mut rolled = roll.faces();
            for m in &s {
                assert_eq!(m.color(), c);
                let i = rolled.iter().position(|&f| f == m.face());
                rolled.remove(i.unwrap());
            }
        }
    }

    #[proptest]
    fn undo_reverts_apply(mut pos: Position, c: Color, roll: Roll) {
        let before = pos.clone();
        for s in sequences(&mut pos, c, roll)? {
            s.apply(&mut pos)?;
            s.undo(&mut pos)?;
            assert_eq!(pos, before);
        }
    }
}
