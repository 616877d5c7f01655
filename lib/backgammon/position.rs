use crate::backgammon::{Analyzer, Blot, Board, BoardError, Change, Color, Face, Origin};
use crate::backgammon::{Build, Move, MoveError, MoveKind, ParseBoardError, Piece, Place};
use crate::backgammon::{Point, Prime};
use arrayvec::ArrayVec;
use derive_more::{DebugCustom, Display};
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use tracing::trace;

use proptest::{collection::vec, prelude::*, sample::Selector};

/// A [`Board`] bound to the [`Analyzer`] that caches its statistics.
///
/// Every mutation goes through this type, which keeps the analyzer in sync with the board.
#[derive(DebugCustom, Display, Default, Clone, Eq)]
#[debug(fmt = "Position({board})")]
#[display(fmt = "{board}")]
pub struct Position {
    board: Board,
    analyzer: Analyzer,
}

impl Hash for Position {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.board.hash(state)
    }
}

impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        self.board == other.board
    }
}

impl Arbitrary for Position {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        vec(any::<(Face, Selector)>(), 0..256)
            .prop_map(|plies| {
                let mut pos = Position::default();
                let mut turn = Color::White;

                for (f, selector) in plies {
                    if pos.winner().is_some() {
                        break;
                    }

                    let moves = pos.moves(turn, f, MoveKind::ANY);
                    if let Some(m) = selector.try_select(moves) {
                        if m.apply(&mut pos).is_err() {
                            break;
                        }
                    }

                    turn = !turn;
                }

                Position::new(pos.board)
            })
            .boxed()
    }
}

impl From<Board> for Position {
    fn from(board: Board) -> Self {
        Position::new(board)
    }
}

impl Position {
    /// Binds a fresh [`Analyzer`] to a [`Board`].
    pub fn new(board: Board) -> Self {
        Position {
            board,
            analyzer: Analyzer::default(),
        }
    }

    /// The underlying [`Board`].
    #[inline(always)]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The [`Analyzer`] bound to the board.
    #[inline(always)]
    pub fn analyzer(&self) -> &Analyzer {
        &self.analyzer
    }

    /// The color that has borne off all of its pieces, if any.
    #[inline(always)]
    pub fn winner(&self) -> Option<Color> {
        self.board.winner()
    }

    /// Pushes a piece onto an [`Origin`].
    pub fn push_origin(&mut self, o: Origin, p: Piece) {
        self.board.push_origin(o, p);
        let count = self.board.count(o);
        self.analyzer
            .observe(Change::Push(Place::Origin(o), p.color(), count));
    }

    /// Pops a piece from an [`Origin`].
    pub fn pop_origin(&mut self, o: Origin) -> Result<Piece, BoardError> {
        let p = self.board.pop_origin(o)?;
        let count = self.board.count(o);
        self.analyzer
            .observe(Change::Pop(Place::Origin(o), p.color(), count));
        Ok(p)
    }

    /// Pushes a piece onto the bar.
    pub fn push_bar(&mut self, p: Piece) {
        self.board.push_bar(p);
        let count = self.board.bar(p.color());
        self.analyzer.observe(Change::Push(Place::Bar, p.color(), count));
    }

    /// Pops a piece of a color from the bar.
    pub fn pop_bar(&mut self, c: Color) -> Result<Piece, BoardError> {
        let p = self.board.pop_bar(c)?;
        let count = self.board.bar(c);
        self.analyzer.observe(Change::Pop(Place::Bar, c, count));
        Ok(p)
    }

    /// Pushes a piece home.
    pub fn push_home(&mut self, p: Piece) {
        self.board.push_home(p);
        let count = self.board.home(p.color());
        self.analyzer.observe(Change::Push(Place::Home, p.color(), count));
    }

    /// Pops a piece of a color from home.
    pub fn pop_home(&mut self, c: Color) -> Result<Piece, BoardError> {
        let p = self.board.pop_home(c)?;
        let count = self.board.home(c);
        self.analyzer.observe(Change::Pop(Place::Home, c, count));
        Ok(p)
    }

    /// Origins occupied by a color, in ascending order.
    pub fn origins_occupied(&mut self, c: Color) -> &[Origin] {
        self.analyzer.origins_occupied(&self.board, c)
    }

    /// Points occupied by a color, in ascending order.
    pub fn points_occupied(&mut self, c: Color) -> &[Point] {
        self.analyzer.points_occupied(&self.board, c)
    }

    /// Origins held by a color, in ascending order.
    pub fn origins_held(&mut self, c: Color) -> &[Origin] {
        self.analyzer.origins_held(&self.board, c)
    }

    /// Points held by a color, in ascending order.
    pub fn points_held(&mut self, c: Color) -> &[Point] {
        self.analyzer.points_held(&self.board, c)
    }

    /// Whether a color holds an [`Origin`] with two or more pieces.
    pub fn is_held(&mut self, c: Color, o: Origin) -> bool {
        self.analyzer.is_held(&self.board, c, o)
    }

    pub fn min_origin(&mut self, c: Color) -> Option<Origin> {
        self.analyzer.min_origin(&self.board, c)
    }

    pub fn max_origin(&mut self, c: Color) -> Option<Origin> {
        self.analyzer.max_origin(&self.board, c)
    }

    pub fn min_point(&mut self, c: Color) -> Option<Point> {
        self.analyzer.min_point(&self.board, c)
    }

    pub fn max_point(&mut self, c: Color) -> Option<Point> {
        self.analyzer.max_point(&self.board, c)
    }

    /// The total number of pips a color needs to bear off every piece.
    pub fn pip_count(&mut self, c: Color) -> u16 {
        self.analyzer.pip_count(&self.board, c)
    }

    /// Whether a color may bear off.
    pub fn may_bearoff(&mut self, c: Color) -> bool {
        self.analyzer.may_bearoff(&self.board, c)
    }

    /// Whether a color has any piece farther from home than the given [`Origin`].
    pub fn has_piece_behind(&mut self, c: Color, o: Origin) -> bool {
        self.analyzer.has_piece_behind(&self.board, c, o)
    }

    /// Whether no more contact between the colors is possible.
    pub fn is_disengaged(&mut self) -> bool {
        self.analyzer.is_disengaged(&self.board)
    }

    /// The blots of a color, in ascending order of origin.
    pub fn blots(&mut self, c: Color) -> &[Blot] {
        self.analyzer.blots(&self.board, c)
    }

    /// The primes of a color, in ascending order of points.
    pub fn primes(&mut self, c: Color) -> Vec<Prime> {
        self.analyzer.primes(&self.board, c)
    }

    /// Checks whether a move is legal in this position.
    pub fn check(&mut self, c: Color, origin: i8, face: u8) -> Result<Build, MoveError> {
        Move::check(self, c, origin, face)
    }

    /// The legal moves of a color for a die [`Face`], filtered by [`MoveKind`].
    pub fn moves(&mut self, c: Color, f: Face, kind: MoveKind) -> ArrayVec<Move, 15> {
        let origins: ArrayVec<i8, 15> = if self.board.has_bar(c) {
            [-1].into_iter().collect()
        } else {
            self.origins_occupied(c)
                .iter()
                .map(|o| o.get() as i8)
                .collect()
        };

        origins
            .into_iter()
            .filter_map(|o| Move::new(self, c, o, f.get()).ok())
            .filter(|&m| kind.intersects(m.into()))
            .collect()
    }

    /// Plays a move if legal in this position.
    pub fn play(&mut self, c: Color, origin: i8, face: u8) -> Result<Move, MoveError> {
        let m = Move::new(self, c, origin, face)?;
        trace!(color = %c, coords = %m, "playing move");
        m.apply(self)?;
        Ok(m)
    }

    /// Reverts a move previously played in this position.
    pub fn undo(&mut self, m: Move) -> Result<(), BoardError> {
        trace!(color = %m.color(), coords = %m, "reverting move");
        m.undo(self)
    }
}

impl FromStr for Position {
    type Err = ParseBoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Position::new(s.parse()?))
    }
}
