use crate::backgammon::{Board, Change, Color, Origin, Place, Point, CHECKERS};
use arrayvec::ArrayVec;
use tracing::trace;

/// A single piece exposed to being hit.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Blot {
    pub origin: Origin,
    pub point: Point,
    /// Pips between the blot and the nearest piece that may hit it, if any.
    pub distance: Option<u8>,
    /// Number of attackers within reach of a single die.
    pub direct: u8,
    /// Number of attackers within reach of two dice, but not one.
    pub indirect: u8,
}

/// A run of two or more consecutive held points.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Prime {
    /// The lowest point of the run.
    pub start: Point,
    pub size: u8,
}

fn insert<T: Ord, const N: usize>(v: &mut ArrayVec<T, N>, x: T) {
    if let Err(i) = v.binary_search(&x) {
        v.insert(i, x);
    }
}

fn remove<T: Ord, const N: usize>(v: &mut ArrayVec<T, N>, x: T) {
    if let Ok(i) = v.binary_search(&x) {
        v.remove(i);
    }
}

/// The occupancy of the board by one color.
///
/// All aggregates are derived together from a single scan and are kept sorted in ascending order.
#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub struct Occupancy {
    origins: ArrayVec<Origin, { Origin::COUNT }>,
    points: ArrayVec<Point, { Origin::COUNT }>,
    held_origins: ArrayVec<Origin, { Origin::COUNT }>,
    held_points: ArrayVec<Point, { Origin::COUNT }>,
    held: [bool; Origin::COUNT],
    min_origin: Option<Origin>,
    max_origin: Option<Origin>,
    min_point: Option<Point>,
    max_point: Option<Point>,
}

impl Occupancy {
    /// Computes the occupancy of a color from scratch.
    pub fn scan(board: &Board, c: Color) -> Self {
        let mut occupancy = Occupancy::default();

        for (o, slot) in board.iter().filter(|(_, s)| s.is(c)) {
            occupancy.origins.push(o);
            if slot.count() > 1 {
                occupancy.held_origins.push(o);
                occupancy.held[o.index()] = true;
            }
        }

        occupancy.points = occupancy.origins.iter().map(|o| o.point(c)).collect();
        occupancy.points.sort_unstable();
        occupancy.held_points = occupancy.held_origins.iter().map(|o| o.point(c)).collect();
        occupancy.held_points.sort_unstable();
        occupancy.min_origin = occupancy.origins.first().copied();
        occupancy.max_origin = occupancy.origins.last().copied();
        occupancy.align(c);

        occupancy
    }

    /// Origins occupied, in ascending order.
    #[inline(always)]
    pub fn origins(&self) -> &[Origin] {
        &self.origins
    }

    /// Points occupied, in ascending order.
    #[inline(always)]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Origins held by two or more pieces, in ascending order.
    #[inline(always)]
    pub fn held_origins(&self) -> &[Origin] {
        &self.held_origins
    }

    /// Points held by two or more pieces, in ascending order.
    #[inline(always)]
    pub fn held_points(&self) -> &[Point] {
        &self.held_points
    }

    /// Whether an origin is held by two or more pieces.
    #[inline(always)]
    pub fn is_held(&self, o: Origin) -> bool {
        self.held[o.index()]
    }

    #[inline(always)]
    pub fn min_origin(&self) -> Option<Origin> {
        self.min_origin
    }

    #[inline(always)]
    pub fn max_origin(&self) -> Option<Origin> {
        self.max_origin
    }

    #[inline(always)]
    pub fn min_point(&self) -> Option<Point> {
        self.min_point
    }

    #[inline(always)]
    pub fn max_point(&self) -> Option<Point> {
        self.max_point
    }

    /// Derives the extreme points from the extreme origins.
    ///
    /// White counts points down as origins go up, red counts them up.
    fn align(&mut self, c: Color) {
        let (lowest, highest) = match c {
            Color::White => (self.max_origin, self.min_origin),
            Color::Red => (self.min_origin, self.max_origin),
        };

        self.min_point = lowest.map(|o| o.point(c));
        self.max_point = highest.map(|o| o.point(c));
    }

    /// An empty origin received its first piece.
    fn occupy(&mut self, c: Color, o: Origin) {
        insert(&mut self.origins, o);
        insert(&mut self.points, o.point(c));

        if self.min_origin.map_or(true, |m| o < m) {
            self.min_origin = Some(o);
        }

        if self.max_origin.map_or(true, |m| o > m) {
            self.max_origin = Some(o);
        }

        self.align(c);
    }

    /// An origin lost its last piece.
    fn vacate(&mut self, c: Color, o: Origin) {
        remove(&mut self.origins, o);
        remove(&mut self.points, o.point(c));

        if self.min_origin == Some(o) {
            self.min_origin = self.origins.first().copied();
        }

        if self.max_origin == Some(o) {
            self.max_origin = self.origins.last().copied();
        }

        self.align(c);
    }

    /// A blot received a second piece.
    fn hold(&mut self, c: Color, o: Origin) {
        insert(&mut self.held_origins, o);
        insert(&mut self.held_points, o.point(c));
        self.held[o.index()] = true;
    }

    /// A held origin was reduced to a blot.
    fn release(&mut self, c: Color, o: Origin) {
        remove(&mut self.held_origins, o);
        remove(&mut self.held_points, o.point(c));
        self.held[o.index()] = false;
    }
}

/// Aggregates that depend on too much of the board to be patched.
#[derive(Debug, Default, Clone, Eq, PartialEq)]
struct Memo {
    pip_count: Option<u16>,
    may_bearoff: Option<bool>,
    blots: Option<ArrayVec<Blot, { CHECKERS as usize }>>,
}

/// Derived statistics of a [`Board`], cached across queries.
///
/// The analyzer holds no board data of its own, instead every query takes the board it is bound
/// to and every mutation of that board must be reported through [`Analyzer::observe`].
#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub struct Analyzer {
    occupancy: [Option<Occupancy>; 2],
    memo: [Memo; 2],
    disengaged: Option<bool>,
}

impl Analyzer {
    /// The cached [`Occupancy`] of a color, if populated.
    #[inline(always)]
    pub fn cached(&self, c: Color) -> Option<&Occupancy> {
        self.occupancy[c as usize].as_ref()
    }

    /// The [`Occupancy`] of a color, populated on demand.
    #[inline(always)]
    pub fn occupancy(&mut self, board: &Board, c: Color) -> &Occupancy {
        self.occupancy[c as usize].get_or_insert_with(|| {
            trace!(color = %c, "populating occupancy");
            Occupancy::scan(board, c)
        })
    }

    /// Patches the cache after a mutation of the bound board.
    pub fn observe(&mut self, change: Change) {
        let c = change.color();

        let memo = &mut self.memo[c as usize];
        memo.pip_count = None;
        memo.may_bearoff = None;

        // Exposure to hits depends on where the opponent is.
        for memo in &mut self.memo {
            memo.blots = None;
        }

        self.disengaged = None;

        let Some(occupancy) = &mut self.occupancy[c as usize] else {
            return;
        };

        match change {
            Change::Push(Place::Origin(o), _, 1) => occupancy.occupy(c, o),
            Change::Push(Place::Origin(o), _, 2) => occupancy.hold(c, o),
            Change::Pop(Place::Origin(o), _, 1) => occupancy.release(c, o),
            Change::Pop(Place::Origin(o), _, 0) => occupancy.vacate(c, o),
            _ => {}
        }
    }

    /// Origins occupied by a color, in ascending order.
    pub fn origins_occupied(&mut self, board: &Board, c: Color) -> &[Origin] {
        self.occupancy(board, c).origins()
    }

    /// Points occupied by a color, in ascending order.
    pub fn points_occupied(&mut self, board: &Board, c: Color) -> &[Point] {
        self.occupancy(board, c).points()
    }

    /// Origins held by a color, in ascending order.
    pub fn origins_held(&mut self, board: &Board, c: Color) -> &[Origin] {
        self.occupancy(board, c).held_origins()
    }

    /// Points held by a color, in ascending order.
    pub fn points_held(&mut self, board: &Board, c: Color) -> &[Point] {
        self.occupancy(board, c).held_points()
    }

    /// Whether a color holds an origin.
    pub fn is_held(&mut self, board: &Board, c: Color, o: Origin) -> bool {
        self.occupancy(board, c).is_held(o)
    }

    /// The lowest origin occupied by a color.
    pub fn min_origin(&mut self, board: &Board, c: Color) -> Option<Origin> {
        self.occupancy(board, c).min_origin()
    }

    /// The highest origin occupied by a color.
    pub fn max_origin(&mut self, board: &Board, c: Color) -> Option<Origin> {
        self.occupancy(board, c).max_origin()
    }

    /// The point occupied by a color closest to its home.
    pub fn min_point(&mut self, board: &Board, c: Color) -> Option<Point> {
        self.occupancy(board, c).min_point()
    }

    /// The point occupied by a color farthest from its home.
    pub fn max_point(&mut self, board: &Board, c: Color) -> Option<Point> {
        self.occupancy(board, c).max_point()
    }

    /// The total number of pips a color needs to bear off every piece.
    pub fn pip_count(&mut self, board: &Board, c: Color) -> u16 {
        if let Some(pips) = self.memo[c as usize].pip_count {
            return pips;
        }

        let on_board: u16 = self
            .occupancy(board, c)
            .origins()
            .iter()
            .map(|&o| board.count(o) as u16 * o.point(c).get() as u16)
            .sum();

        let pips = on_board + board.bar(c) as u16 * Point::BAR as u16;
        self.memo[c as usize].pip_count = Some(pips);
        pips
    }

    /// Whether every piece of a color still in play is in its home quadrant.
    pub fn may_bearoff(&mut self, board: &Board, c: Color) -> bool {
        if let Some(may) = self.memo[c as usize].may_bearoff {
            return may;
        }

        let may = !board.has_bar(c) && self.max_point(board, c).map_or(true, |p| p.is_home());
        self.memo[c as usize].may_bearoff = Some(may);
        may
    }

    /// Whether a color has any piece farther from home than the given origin.
    pub fn has_piece_behind(&mut self, board: &Board, c: Color, o: Origin) -> bool {
        board.has_bar(c) || self.max_point(board, c).is_some_and(|p| p > o.point(c))
    }

    /// Whether the colors have moved past each other so no more hits are possible.
    pub fn is_disengaged(&mut self, board: &Board) -> bool {
        if let Some(disengaged) = self.disengaged {
            return disengaged;
        }

        let disengaged = !board.has_bar(Color::White)
            && !board.has_bar(Color::Red)
            && match (
                self.min_origin(board, Color::White),
                self.max_origin(board, Color::Red),
            ) {
                (Some(white), Some(red)) => white > red,
                _ => true,
            };

        *self.disengaged.insert(disengaged)
    }

    /// The blots of a color, in ascending order of origin.
    pub fn blots(&mut self, board: &Board, c: Color) -> &[Blot] {
        let blots = match self.memo[c as usize].blots.take() {
            Some(blots) => blots,
            None => self.expose(board, c),
        };

        self.memo[c as usize].blots.insert(blots)
    }

    fn expose(&mut self, board: &Board, c: Color) -> ArrayVec<Blot, { CHECKERS as usize }> {
        let attackers = self.occupancy(board, !c).origins.clone();
        let bar = board.has_bar(!c).then_some(Point::BAR);

        self.occupancy(board, c)
            .origins()
            .iter()
            .filter(|&&o| board.count(o) == 1)
            .map(|&o| {
                let target = o.point(!c).get();
                let mut blot = Blot {
                    origin: o,
                    point: o.point(c),
                    distance: None,
                    direct: 0,
                    indirect: 0,
                };

                let distances = attackers
                    .iter()
                    .map(|a| a.point(!c).get())
                    .chain(bar)
                    .filter(|&p| p > target)
                    .map(|p| p - target);

                for d in distances {
                    blot.distance = Some(blot.distance.map_or(d, |m| m.min(d)));
                    match d {
                        1..=6 => blot.direct += 1,
                        7..=12 => blot.indirect += 1,
                        _ => {}
                    }
                }

                blot
            })
            .collect()
    }

    /// The primes of a color, in ascending order of points.
    pub fn primes(&mut self, board: &Board, c: Color) -> Vec<Prime> {
        let mut primes = Vec::new();
        let mut run: Option<Prime> = None;

        for &p in self.points_held(board, c) {
            match &mut run {
                Some(r) if r.start.get() + r.size == p.get() => r.size += 1,
                _ => {
                    primes.extend(run.take().filter(|r| r.size > 1));
                    run = Some(Prime { start: p, size: 1 });
                }
            }
        }

        primes.extend(run.filter(|r| r.size > 1));
        primes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backgammon::{Face, MoveKind, Piece, Position};
    use proptest::{collection::vec, prelude::*, sample::Selector};
    use test_strategy::proptest;

    fn warm(pos: &mut Position) {
        for c in Color::iter() {
            pos.origins_occupied(c);
            pos.pip_count(c);
            pos.may_bearoff(c);
            pos.blots(c);
        }

        pos.is_disengaged();
    }

    fn assert_consistent(pos: &Position) {
        for c in Color::iter() {
            if let Some(cached) = pos.analyzer().cached(c) {
                assert_eq!(cached, &Occupancy::scan(pos.board(), c));
            }
        }
    }

    #[proptest]
    fn cache_agrees_with_full_scan_after_every_mutation(
        #[filter(#pos.board().winner().is_none())] mut pos: Position,
        #[strategy(vec(any::<(Color, Face, Selector, bool)>(), 1..64))] plies: Vec<(
            Color,
            Face,
            Selector,
            bool,
        )>,
    ) {
        warm(&mut pos);
        let mut played = Vec::new();

        for (c, f, selector, undo) in plies {
            match played.pop() {
                Some(m) if undo => pos.undo(m)?,
                m => {
                    played.extend(m);
                    let moves = pos.moves(c, f, MoveKind::ANY);
                    if let Some(&m) = selector.try_select(moves.iter()) {
                        m.apply(&mut pos)?;
                        played.push(m);
                    }
                }
            }

            assert_consistent(&pos);
            warm(&mut pos);
        }
    }

    #[proptest]
    fn scalars_agree_with_fresh_analyzer(mut pos: Position, c: Color) {
        warm(&mut pos);
        let mut fresh = Analyzer::default();
        let board = *pos.board();

        assert_eq!(pos.pip_count(c), fresh.pip_count(&board, c));
        assert_eq!(pos.may_bearoff(c), fresh.may_bearoff(&board, c));
        assert_eq!(pos.is_disengaged(), fresh.is_disengaged(&board));
        assert_eq!(pos.blots(c), fresh.blots(&board, c));
    }

    #[proptest]
    fn observe_is_a_noop_on_the_group_if_not_populated(c: Color, o: Origin) {
        let mut analyzer = Analyzer::default();
        analyzer.observe(Change::Push(Place::Origin(o), c, 1));
        assert_eq!(analyzer.cached(c), None);
    }

    #[test]
    fn scan_of_setup_matches_standard_layout() {
        let board = Board::setup();
        let white = Occupancy::scan(&board, Color::White);
        let red = Occupancy::scan(&board, Color::Red);

        assert_eq!(white.origins(), [0, 11, 16, 18].map(Origin::new));
        assert_eq!(white.points(), [6, 8, 13, 24].map(Point::new));
        assert_eq!(red.origins(), [5, 7, 12, 23].map(Origin::new));
        assert_eq!(red.points(), [6, 8, 13, 24].map(Point::new));
        assert_eq!(white.held_origins(), white.origins());
        assert_eq!(white.min_point(), Some(Point::new(6)));
        assert_eq!(white.max_point(), Some(Point::new(24)));
        assert_eq!(red.min_origin(), Some(Origin::new(5)));
        assert_eq!(red.max_origin(), Some(Origin::new(23)));
    }

    #[test]
    fn vacating_the_extreme_origin_updates_extreme_points() {
        let mut pos = Position::default();
        warm(&mut pos);

        for _ in 0..2 {
            let p = pos.pop_origin(Origin::new(0)).unwrap();
            pos.push_bar(p);
        }

        assert_eq!(pos.min_origin(Color::White), Some(Origin::new(11)));
        assert_eq!(pos.max_point(Color::White), Some(Point::new(13)));

        for _ in 0..5 {
            let p = pos.pop_origin(Origin::new(5)).unwrap();
            pos.push_home(p);
        }

        assert_eq!(pos.min_origin(Color::Red), Some(Origin::new(7)));
        assert_eq!(pos.min_point(Color::Red), Some(Point::new(8)));
        assert_consistent(&pos);
    }

    #[test]
    fn occupying_beyond_the_extreme_origin_updates_extreme_points() {
        let mut pos = Position::default();
        warm(&mut pos);

        let p = pos.pop_origin(Origin::new(18)).unwrap();
        pos.push_origin(Origin::new(22), p);
        assert_eq!(pos.max_origin(Color::White), Some(Origin::new(22)));
        assert_eq!(pos.min_point(Color::White), Some(Point::new(2)));
        assert!(!pos.is_held(Color::White, Origin::new(22)));
        assert_eq!(pos.blots(Color::White).len(), 1);

        pos.push_origin(Origin::new(22), Piece(Color::White));
        assert!(pos.is_held(Color::White, Origin::new(22)));
        assert_eq!(pos.blots(Color::White).len(), 0);
        assert_consistent(&pos);
    }

    #[test]
    fn pip_count_of_setup_is_167() {
        let mut pos = Position::default();
        assert_eq!(pos.pip_count(Color::White), 167);
        assert_eq!(pos.pip_count(Color::Red), 167);
    }

    #[test]
    fn pip_count_includes_the_bar() {
        let mut pos = Position::default();
        let p = pos.pop_origin(Origin::new(0)).unwrap();
        pos.push_bar(p);
        assert_eq!(pos.pip_count(Color::White), 168);
    }

    #[test]
    fn setup_is_engaged_and_may_not_bear_off() {
        let mut pos = Position::default();
        assert!(!pos.is_disengaged());
        assert!(!pos.may_bearoff(Color::White));
        assert!(!pos.may_bearoff(Color::Red));
    }

    #[test]
    fn colors_past_each_other_are_disengaged() {
        let mut pos: Position = "0|0|0:|2:R|0:|0:|0:|0:|0:|0:|0:|0:|0:|0:|0:|0:|0:|0:|0:|0:|0:|0:|2:W|0:|0:|0:|13|13"
            .parse()
            .unwrap();

        assert!(pos.is_disengaged());
        assert!(pos.may_bearoff(Color::White));
        assert!(pos.may_bearoff(Color::Red));

        let p = pos.pop_origin(Origin::new(1)).unwrap();
        pos.push_bar(p);
        assert!(!pos.is_disengaged());
        assert!(!pos.may_bearoff(Color::Red));
    }

    #[test]
    fn blots_count_direct_and_indirect_shots() {
        let mut pos: Position = "0|1|1:W|0:|0:|0:|0:|0:|0:|0:|0:|0:|0:|0:|0:|0:|0:|0:|0:|0:|0:|0:|1:W|0:|2:R|0:|13|12"
            .parse()
            .unwrap();

        assert_eq!(
            pos.blots(Color::White),
            [
                Blot {
                    origin: Origin::new(0),
                    point: Point::new(24),
                    distance: Some(22),
                    direct: 0,
                    indirect: 0,
                },
                Blot {
                    origin: Origin::new(20),
                    point: Point::new(4),
                    distance: Some(2),
                    direct: 2,
                    indirect: 0,
                },
            ]
        );

        assert!(pos.blots(Color::Red).is_empty());
    }

    #[test]
    fn primes_are_runs_of_held_points() {
        let mut pos: Position = "0|0|0:|0:|0:|0:|0:|0:|0:|0:|0:|0:|0:|0:|0:|0:|0:|0:|0:|0:|2:W|2:W|2:W|1:W|2:W|2:W|4|15"
            .parse()
            .unwrap();

        assert_eq!(
            pos.primes(Color::White),
            [
                Prime {
                    start: Point::new(1),
                    size: 2
                },
                Prime {
                    start: Point::new(4),
                    size: 3
                },
            ]
        );
    }

    #[proptest]
    fn has_piece_behind_matches_max_point(mut pos: Position, c: Color, o: Origin) {
        let behind = pos
            .board()
            .iter()
            .any(|(a, s)| s.is(c) && a.point(c) > o.point(c));

        assert_eq!(
            pos.has_piece_behind(c, o),
            behind || pos.board().has_bar(c)
        );
    }
}
