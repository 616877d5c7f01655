use crate::backgammon::{Color, Origin, CHECKERS};
use derive_more::{Display, Error};
use std::fmt::{self, Write};
use std::{ops::Index, str::FromStr};

/// A backgammon piece.
///
/// Pieces of the same color are interchangeable.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Hash)]
#[display(fmt = "{_0}")]
pub struct Piece(pub Color);

impl Piece {
    /// This piece's [`Color`].
    #[inline(always)]
    pub const fn color(&self) -> Color {
        self.0
    }
}

/// A stack of pieces of a single color on an [`Origin`].
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Slot {
    color: Option<Color>,
    count: u8,
}

impl Slot {
    /// The [`Color`] of the pieces in this slot, if any.
    #[inline(always)]
    pub fn color(&self) -> Option<Color> {
        self.color
    }

    /// The number of pieces in this slot.
    #[inline(always)]
    pub fn count(&self) -> u8 {
        self.count
    }

    /// Whether this slot holds no pieces.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Whether this slot holds pieces of the given [`Color`].
    #[inline(always)]
    pub fn is(&self, c: Color) -> bool {
        self.color == Some(c)
    }
}

/// Renders as `<count>:<color>`, the color being empty for empty slots.
impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.count)?;
        if let Some(c) = self.color {
            f.write_char(c.abbrev())?;
        }

        Ok(())
    }
}

/// A place on the board where pieces are pushed to or popped from.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Place {
    Origin(Origin),
    Bar,
    Home,
}

/// A mutation of the board, as seen by an observer.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Change {
    /// A piece was pushed, followed by the new number of pieces in that place.
    Push(Place, Color, u8),
    /// A piece was popped, followed by the new number of pieces in that place.
    Pop(Place, Color, u8),
}

impl Change {
    /// The [`Color`] of the piece moved.
    #[inline(always)]
    pub fn color(&self) -> Color {
        match *self {
            Change::Push(_, c, _) | Change::Pop(_, c, _) => c,
        }
    }
}

/// The reason why popping a piece failed.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Hash, Error)]
pub enum BoardError {
    #[display(fmt = "no piece on origin {_0}")]
    EmptySlot(#[error(not(source))] Origin),
    #[display(fmt = "no {_0} piece on the bar")]
    EmptyBar(#[error(not(source))] Color),
    #[display(fmt = "no {_0} piece home")]
    EmptyHome(#[error(not(source))] Color),
}

/// The backgammon board.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct Board {
    slots: [Slot; Origin::COUNT],
    bar: [u8; 2],
    home: [u8; 2],
}

/// The standard starting layout.
impl Default for Board {
    fn default() -> Self {
        Self::setup()
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board({self})")
    }
}

impl Board {
    /// A board with no pieces at all.
    pub fn empty() -> Self {
        Board {
            slots: [Slot::default(); Origin::COUNT],
            bar: [0; 2],
            home: [0; 2],
        }
    }

    /// A board in the standard starting layout.
    pub fn setup() -> Self {
        use Color::*;

        let mut board = Board::empty();
        for (i, color, count) in [
            (0, White, 2),
            (11, White, 5),
            (16, White, 3),
            (18, White, 5),
            (23, Red, 2),
            (12, Red, 5),
            (7, Red, 3),
            (5, Red, 5),
        ] {
            board.slots[i] = Slot {
                color: Some(color),
                count,
            };
        }

        board
    }

    /// The [`Slot`] on an [`Origin`].
    #[inline(always)]
    pub fn slot(&self, o: Origin) -> Slot {
        self.slots[o.index()]
    }

    /// The number of pieces on an [`Origin`].
    #[inline(always)]
    pub fn count(&self, o: Origin) -> u8 {
        self.slots[o.index()].count
    }

    /// The [`Color`] of the pieces on an [`Origin`], if any.
    #[inline(always)]
    pub fn color_on(&self, o: Origin) -> Option<Color> {
        self.slots[o.index()].color
    }

    /// Whether a color has pieces on an [`Origin`].
    #[inline(always)]
    pub fn occupies(&self, c: Color, o: Origin) -> bool {
        self.slots[o.index()].is(c)
    }

    /// Whether a piece of the given color may land on an [`Origin`].
    ///
    /// That is the case unless two or more opposing pieces are there.
    #[inline(always)]
    pub fn can_occupy(&self, c: Color, o: Origin) -> bool {
        let slot = self.slots[o.index()];
        !(slot.is(!c) && slot.count > 1)
    }

    /// The number of pieces of a color on the bar.
    #[inline(always)]
    pub fn bar(&self, c: Color) -> u8 {
        self.bar[c as usize]
    }

    /// Whether a color has pieces on the bar.
    #[inline(always)]
    pub fn has_bar(&self, c: Color) -> bool {
        self.bar[c as usize] > 0
    }

    /// The number of pieces of a color borne off.
    #[inline(always)]
    pub fn home(&self, c: Color) -> u8 {
        self.home[c as usize]
    }

    /// The total number of pieces of a color, on the board, the bar and home.
    pub fn pieces(&self, c: Color) -> u8 {
        let on_board: u8 = self.iter().filter(|(_, s)| s.is(c)).map(|(_, s)| s.count).sum();
        on_board + self.bar(c) + self.home(c)
    }

    /// The color that has borne off all of its pieces, if any.
    pub fn winner(&self) -> Option<Color> {
        Color::iter().find(|&c| self.home(c) == CHECKERS)
    }

    /// An iterator over all slots in ascending order of [`Origin`].
    #[inline(always)]
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (Origin, Slot)> + '_ {
        Origin::iter().map(|o| (o, self.slots[o.index()]))
    }

    /// Pushes a piece onto an [`Origin`].
    ///
    /// The origin must not be occupied by the other color, any piece there must have been hit first.
    #[inline(always)]
    pub fn push_origin(&mut self, o: Origin, p: Piece) {
        let slot = &mut self.slots[o.index()];
        debug_assert!(slot.color.map_or(true, |c| c == p.color()));
        slot.color = Some(p.color());
        slot.count += 1;
    }

    /// Pops a piece from an [`Origin`].
    #[inline(always)]
    pub fn pop_origin(&mut self, o: Origin) -> Result<Piece, BoardError> {
        let slot = &mut self.slots[o.index()];
        let c = match slot.color {
            Some(c) if slot.count > 0 => c,
            _ => return Err(BoardError::EmptySlot(o)),
        };

        slot.count -= 1;
        if slot.count == 0 {
            slot.color = None;
        }

        Ok(Piece(c))
    }

    /// Pushes a piece onto the bar.
    #[inline(always)]
    pub fn push_bar(&mut self, p: Piece) {
        self.bar[p.color() as usize] += 1;
    }

    /// Pops a piece of a color from the bar.
    #[inline(always)]
    pub fn pop_bar(&mut self, c: Color) -> Result<Piece, BoardError> {
        let bar = &mut self.bar[c as usize];
        *bar = bar.checked_sub(1).ok_or(BoardError::EmptyBar(c))?;
        Ok(Piece(c))
    }

    /// Pushes a piece home.
    #[inline(always)]
    pub fn push_home(&mut self, p: Piece) {
        self.home[p.color() as usize] += 1;
    }

    /// Pops a piece of a color from home.
    #[inline(always)]
    pub fn pop_home(&mut self, c: Color) -> Result<Piece, BoardError> {
        let home = &mut self.home[c as usize];
        *home = home.checked_sub(1).ok_or(BoardError::EmptyHome(c))?;
        Ok(Piece(c))
    }
}

/// Retrieves the [`Slot`] on a given [`Origin`].
impl Index<Origin> for Board {
    type Output = Slot;

    #[inline(always)]
    fn index(&self, o: Origin) -> &Self::Output {
        &self.slots[o.index()]
    }
}

/// Renders the board state string.
///
/// The bar counts, white first, followed by every slot in ascending order of origin, followed by
/// the home counts, all separated by `|`.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}|", self.bar[0], self.bar[1])?;

        for slot in &self.slots {
            write!(f, "{slot}|")?;
        }

        write!(f, "{}|{}", self.home[0], self.home[1])
    }
}

/// The reason why parsing the board state string failed.
#[derive(Debug, Display, Clone, Eq, PartialEq, Error)]
pub enum ParseBoardError {
    #[display(fmt = "expected 28 fields separated by `|`")]
    InvalidSyntax,
    #[display(fmt = "failed to parse piece count")]
    InvalidCount,
    #[display(fmt = "failed to parse piece color")]
    InvalidColor,
    #[display(fmt = "non-empty slot without a color")]
    MissingColor,
    #[display(fmt = "more than 15 {_0} pieces")]
    TooManyPieces(#[error(not(source))] Color),
}

fn parse_count(s: &str) -> Result<u8, ParseBoardError> {
    match s.parse() {
        Ok(n) if n <= CHECKERS => Ok(n),
        _ => Err(ParseBoardError::InvalidCount),
    }
}

impl FromStr for Slot {
    type Err = ParseBoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (count, color) = s.split_once(':').ok_or(ParseBoardError::InvalidSyntax)?;
        let count = parse_count(count)?;

        let mut chars = color.chars();
        let color = match (chars.next(), chars.next()) {
            (None, _) => None,
            (Some(c), None) => Some(Color::from_abbrev(c).ok_or(ParseBoardError::InvalidColor)?),
            _ => return Err(ParseBoardError::InvalidColor),
        };

        match (count, color) {
            (0, None) => Ok(Slot::default()),
            (0, Some(_)) => Err(ParseBoardError::InvalidColor),
            (_, None) => Err(ParseBoardError::MissingColor),
            (count, color) => Ok(Slot { color, count }),
        }
    }
}

impl FromStr for Board {
    type Err = ParseBoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<_> = s.split('|').collect();
        let [white_bar, red_bar, slots @ .., white_home, red_home] = &fields[..] else {
            return Err(ParseBoardError::InvalidSyntax);
        };

        if slots.len() != Origin::COUNT {
            return Err(ParseBoardError::InvalidSyntax);
        }

        let mut board = Board::empty();
        board.bar = [parse_count(white_bar)?, parse_count(red_bar)?];
        board.home = [parse_count(white_home)?, parse_count(red_home)?];
        for (slot, s) in board.slots.iter_mut().zip(slots) {
            *slot = s.parse()?;
        }

        for c in Color::iter() {
            let on_board: u32 = board.iter().filter(|(_, s)| s.is(c)).map(|(_, s)| s.count as u32).sum();
            if on_board + board.bar(c) as u32 + board.home(c) as u32 > CHECKERS as u32 {
                return Err(ParseBoardError::TooManyPieces(c));
            }
        }

        Ok(board)
    }
}
