use crate::backgammon::{BoardError, Color, Face, InvalidRoll, Origin, Point, Position};
use bitflags::bitflags;
use derive_more::{Display, Error, From};
use std::{fmt, str::FromStr};

/// The reason why a move is illegal in a given [`Position`].
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Hash, Error)]
pub enum IllegalMove {
    #[display(fmt = "{_0} has a piece on the bar that must come in first")]
    PieceOnBar(#[error(not(source))] Color),
    #[display(fmt = "{_0} has no piece on the bar")]
    NoPieceOnBar(#[error(not(source))] Color),
    #[display(fmt = "{_0} has no piece on point {_1}")]
    NoPieceOnSlot(Color, Point),
    #[display(fmt = "point {_1} is occupied by the opponent of {_0}")]
    OccupiedSlot(Color, Point),
    #[display(fmt = "{_0} may not bear off with pieces outside of home")]
    MayNotBearoff(#[error(not(source))] Color),
    #[display(fmt = "{_0} may not bear off from point {_1} while there are pieces behind it")]
    PieceBehind(Color, Point),
}

/// The reason why a move could not be made.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Hash, Error, From)]
pub enum MoveError {
    InvalidRoll(InvalidRoll),
    #[from(ignore)]
    #[display(fmt = "`{_0}` is neither an origin nor the bar")]
    InvalidOrigin(#[error(not(source))] i8),
    IllegalMove(IllegalMove),
    #[from(ignore)]
    #[display(fmt = "`{_0}` does not match the position it is applied to")]
    StaleMove(#[error(not(source))] Coords),
    BoardError(BoardError),
}

bitflags! {
    /// Characteristics of a [`Move`].
    pub struct MoveKind: u8 {
        const COME_IN =     0b00000001;
        const REGULAR =     0b00000010;
        const BEAROFF =     0b00000100;
        const HIT =         0b00001000;
        const ANY =         0b00000111;
    }
}

/// Enters a piece from the bar.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ComeIn {
    pub color: Color,
    pub face: Face,
    pub dest: Origin,
    pub hit: bool,
}

impl ComeIn {
    /// The [`Origin`] a piece of a given color enters at.
    #[inline(always)]
    pub fn entry(c: Color, face: Face) -> Origin {
        Point::new(Point::BAR - face.get()).origin(c)
    }

    fn check(pos: &Position, c: Color, face: Face) -> Result<Build, IllegalMove> {
        let dest = ComeIn::entry(c, face);
        if !pos.board().has_bar(c) {
            Err(IllegalMove::NoPieceOnBar(c))
        } else if !pos.board().can_occupy(c, dest) {
            Err(IllegalMove::OccupiedSlot(c, dest.point(c)))
        } else {
            Ok(Build::ComeIn(c, face))
        }
    }

    fn apply(&self, pos: &mut Position) -> Result<(), BoardError> {
        if self.hit {
            let p = pos.pop_origin(self.dest)?;
            pos.push_bar(p);
        }

        let p = pos.pop_bar(self.color)?;
        pos.push_origin(self.dest, p);
        Ok(())
    }

    fn undo(&self, pos: &mut Position) -> Result<(), BoardError> {
        let p = pos.pop_origin(self.dest)?;
        pos.push_bar(p);

        if self.hit {
            let p = pos.pop_bar(!self.color)?;
            pos.push_origin(self.dest, p);
        }

        Ok(())
    }
}

/// Moves a piece between two origins.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Regular {
    pub color: Color,
    pub origin: Origin,
    pub face: Face,
    pub dest: Origin,
    pub hit: bool,
}

impl Regular {
    fn check(
        pos: &Position,
        c: Color,
        origin: Origin,
        face: Face,
        dest: Origin,
    ) -> Result<Build, IllegalMove> {
        if pos.board().can_occupy(c, dest) {
            Ok(Build::Regular(c, origin, face, dest))
        } else {
            Err(IllegalMove::OccupiedSlot(c, dest.point(c)))
        }
    }

    fn apply(&self, pos: &mut Position) -> Result<(), BoardError> {
        if self.hit {
            let p = pos.pop_origin(self.dest)?;
            pos.push_bar(p);
        }

        let p = pos.pop_origin(self.origin)?;
        pos.push_origin(self.dest, p);
        Ok(())
    }

    fn undo(&self, pos: &mut Position) -> Result<(), BoardError> {
        let p = pos.pop_origin(self.dest)?;
        pos.push_origin(self.origin, p);

        if self.hit {
            let p = pos.pop_bar(!self.color)?;
            pos.push_origin(self.dest, p);
        }

        Ok(())
    }
}

/// Bears a piece off the board.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Bearoff {
    pub color: Color,
    pub origin: Origin,
    pub face: Face,
}

impl Bearoff {
    fn check(pos: &mut Position, c: Color, origin: Origin, face: Face) -> Result<Build, IllegalMove> {
        let point = origin.point(c);
        if !pos.may_bearoff(c) {
            Err(IllegalMove::MayNotBearoff(c))
        } else if face.get() > point.get() && pos.has_piece_behind(c, origin) {
            Err(IllegalMove::PieceBehind(c, point))
        } else {
            Ok(Build::Bearoff(c, origin, face))
        }
    }

    fn apply(&self, pos: &mut Position) -> Result<(), BoardError> {
        let p = pos.pop_origin(self.origin)?;
        pos.push_home(p);
        Ok(())
    }

    fn undo(&self, pos: &mut Position) -> Result<(), BoardError> {
        let p = pos.pop_home(self.color)?;
        pos.push_origin(self.origin, p);
        Ok(())
    }
}

/// A move that passed the legality check, ready to be built.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Build {
    ComeIn(Color, Face),
    Regular(Color, Origin, Face, Origin),
    Bearoff(Color, Origin, Face),
}

impl Build {
    /// Materializes the [`Move`] in the position it was checked against.
    pub fn build(self, pos: &Position) -> Move {
        match self {
            Build::ComeIn(color, face) => {
                let dest = ComeIn::entry(color, face);
                let hit = pos.board().occupies(!color, dest);
                Move::ComeIn(ComeIn {
                    color,
                    face,
                    dest,
                    hit,
                })
            }

            Build::Regular(color, origin, face, dest) => {
                let hit = pos.board().occupies(!color, dest);
                Move::Regular(Regular {
                    color,
                    origin,
                    face,
                    dest,
                    hit,
                })
            }

            Build::Bearoff(color, origin, face) => Move::Bearoff(Bearoff {
                color,
                origin,
                face,
            }),
        }
    }
}

/// A backgammon move.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Move {
    ComeIn(ComeIn),
    Regular(Regular),
    Bearoff(Bearoff),
}

impl Move {
    /// Checks whether moving a piece of a color from `origin` by `face` pips is legal.
    ///
    /// The origin `-1` stands for the bar.
    /// The board is never modified, only the analysis bound to it may be populated.
    pub fn check(pos: &mut Position, c: Color, origin: i8, face: u8) -> Result<Build, MoveError> {
        let face = Face::new(face)?;

        if origin == -1 {
            return Ok(ComeIn::check(pos, c, face)?);
        }

        let origin = Origin::try_new(origin).ok_or(MoveError::InvalidOrigin(origin))?;

        if pos.board().has_bar(c) {
            return Err(IllegalMove::PieceOnBar(c).into());
        } else if !pos.board().occupies(c, origin) {
            return Err(IllegalMove::NoPieceOnSlot(c, origin.point(c)).into());
        }

        match origin.offset(c, face) {
            Some(dest) => Ok(Regular::check(pos, c, origin, face, dest)?),
            None => Ok(Bearoff::check(pos, c, origin, face)?),
        }
    }

    /// Checks and builds a move.
    pub fn new(pos: &mut Position, c: Color, origin: i8, face: u8) -> Result<Self, MoveError> {
        Ok(Move::check(pos, c, origin, face)?.build(pos))
    }

    /// The [`Color`] of the piece moved.
    pub fn color(&self) -> Color {
        match self {
            Move::ComeIn(m) => m.color,
            Move::Regular(m) => m.color,
            Move::Bearoff(m) => m.color,
        }
    }

    /// The [`Face`] played.
    pub fn face(&self) -> Face {
        match self {
            Move::ComeIn(m) => m.face,
            Move::Regular(m) => m.face,
            Move::Bearoff(m) => m.face,
        }
    }

    /// The source [`Origin`], or `None` if coming in from the bar.
    pub fn whence(&self) -> Option<Origin> {
        match self {
            Move::ComeIn(_) => None,
            Move::Regular(m) => Some(m.origin),
            Move::Bearoff(m) => Some(m.origin),
        }
    }

    /// The destination [`Origin`], or `None` if bearing off.
    pub fn whither(&self) -> Option<Origin> {
        match self {
            Move::ComeIn(m) => Some(m.dest),
            Move::Regular(m) => Some(m.dest),
            Move::Bearoff(_) => None,
        }
    }

    /// The source in move coordinates, `-1` standing for the bar.
    pub fn origin(&self) -> i8 {
        self.whence().map_or(-1, |o| o.get() as i8)
    }

    /// Whether this move hits an opposing blot.
    pub fn is_hit(&self) -> bool {
        match self {
            Move::ComeIn(m) => m.hit,
            Move::Regular(m) => m.hit,
            Move::Bearoff(_) => false,
        }
    }

    /// Applies this move to a position.
    ///
    /// The move is checked against the position first and, unless it is exactly the move
    /// built there, nothing is modified.
    pub fn apply(&self, pos: &mut Position) -> Result<(), MoveError> {
        if Move::new(pos, self.color(), self.origin(), self.face().get())? != *self {
            return Err(MoveError::StaleMove(Coords::from(*self)));
        }

        match self {
            Move::ComeIn(m) => m.apply(pos)?,
            Move::Regular(m) => m.apply(pos)?,
            Move::Bearoff(m) => m.apply(pos)?,
        }

        Ok(())
    }

    /// Reverts this move, restoring the position it was built for.
    pub fn undo(&self, pos: &mut Position) -> Result<(), BoardError> {
        match self {
            Move::ComeIn(m) => m.undo(pos),
            Move::Regular(m) => m.undo(pos),
            Move::Bearoff(m) => m.undo(pos),
        }
    }
}

impl From<Move> for MoveKind {
    fn from(m: Move) -> Self {
        let kind = match m {
            Move::ComeIn(_) => MoveKind::COME_IN,
            Move::Regular(_) => MoveKind::REGULAR,
            Move::Bearoff(_) => MoveKind::BEAROFF,
        };

        if m.is_hit() {
            kind | MoveKind::HIT
        } else {
            kind
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&Coords::from(*self), f)
    }
}

/// A move in `origin:face` coordinates.
///
/// The origin `-1` stands for the bar.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
#[display(fmt = "{_0}:{_1}")]
pub struct Coords(
    #[cfg_attr(test, strategy(-1i8..24))] pub i8,
    #[cfg_attr(test, strategy(1u8..=6))] pub u8,
);

impl From<Move> for Coords {
    fn from(m: Move) -> Self {
        Coords(m.origin(), m.face().get())
    }
}

/// The reason why parsing [`Coords`] failed.
#[derive(Debug, Display, Clone, Eq, PartialEq, Error)]
#[display(fmt = "failed to parse move coordinates")]
pub struct ParseCoordsError;

impl FromStr for Coords {
    type Err = ParseCoordsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (origin, face) = s.split_once(':').ok_or(ParseCoordsError)?;
        match (origin.parse(), face.parse()) {
            (Ok(origin), Ok(face)) => Ok(Coords(origin, face)),
            _ => Err(ParseCoordsError),
        }
    }
}
