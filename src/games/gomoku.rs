//! Five-in-a-row (also known as gomoku or caro) on a square board of configurable size.
//!
//! Players alternate placing a stone on any empty tile, starting with [Player::A].
//! The first player to get `win_length` stones in a row, horizontally, vertically or diagonally, wins.
//! If the board fills up without such a line the game is a draw.
//!
//! Coordinates are 1-based, `x` is the column and `y` the row.
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::ops::ControlFlow;
use std::str::FromStr;

use internal_iterator::InternalIterator;
use itertools::Itertools;
use nom::branch::alt;
use nom::bytes::complete::tag;
use nom::character::complete::{char, one_of, space0, u8 as parse_u8};
use nom::combinator::{all_consuming, map};
use nom::multi::many1;
use nom::sequence::{delimited, preceded, separated_pair, terminated};
use nom::IResult;

use crate::board::{
    AvailableMovesIterator, Board, BoardDone, BoardMoves, ConfigError, Outcome, PlayError, Player,
};

/// The default radius of the neighbourhood used by [Board::candidate_moves],
/// `1` means the surrounding 3x3 square.
pub const DEFAULT_CANDIDATE_RADIUS: u8 = 1;

/// The board size used by [GomokuBoard::default].
pub const DEFAULT_SIZE: u8 = 10;

/// The four line directions through a tile, the opposite directions are covered by walking both ways.
const DIRECTIONS: [(i32, i32); 4] = [(1, 0), (0, 1), (1, 1), (1, -1)];

/// A 1-based board coordinate. Ordering is row-major.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Coord {
    // field order matters for the derived row-major ordering
    y: u8,
    x: u8,
}

impl Coord {
    /// Construct a coordinate. This does not check whether it is on any particular board,
    /// playing an out-of-range coordinate results in [PlayError::UnavailableMove].
    pub fn new(x: u8, y: u8) -> Self {
        Coord { y, x }
    }

    pub fn x(self) -> u8 {
        self.x
    }

    pub fn y(self) -> u8 {
        self.y
    }

    /// The number of moves a king would need to go from `self` to `other`.
    pub fn diagonal_distance(self, other: Coord) -> u8 {
        let dx = self.x.abs_diff(other.x);
        let dy = self.y.abs_diff(other.y);
        dx.max(dy)
    }
}

/// The default win length for a board of the given size:
/// five in a row for boards of at least 5x5, three in a row for smaller ones.
pub fn default_win_length(size: u8) -> u8 {
    if size >= 5 {
        5
    } else {
        3
    }
}

#[derive(Clone, Eq, PartialEq, Hash)]
pub struct GomokuBoard {
    size: u8,
    win_length: u8,
    candidate_radius: u8,
    tiles: Vec<Option<Player>>,

    next_player: Player,
    outcome: Option<Outcome>,
    last_move: Option<Coord>,
    stones: u16,
}

impl Default for GomokuBoard {
    fn default() -> Self {
        GomokuBoard::empty(DEFAULT_SIZE, default_win_length(DEFAULT_SIZE))
    }
}

impl GomokuBoard {
    /// An empty `size x size` board with the [default_win_length].
    pub fn new(size: u8) -> Result<Self, ConfigError> {
        Self::with_win_length(size, default_win_length(size))
    }

    /// An empty `size x size` board where `win_length` stones in a row are needed to win.
    pub fn with_win_length(size: u8, win_length: u8) -> Result<Self, ConfigError> {
        if size == 0 {
            return Err(ConfigError::InvalidSize { size });
        }
        if win_length == 0 || win_length > size {
            return Err(ConfigError::InvalidWinLength { size, win_length });
        }
        Ok(Self::empty(size, win_length))
    }

    /// Use `radius` for [Board::candidate_moves] instead of [DEFAULT_CANDIDATE_RADIUS].
    /// The radius must be at least 1, a winning move is then always a candidate.
    pub fn with_candidate_radius(mut self, radius: u8) -> Result<Self, ConfigError> {
        if radius == 0 {
            return Err(ConfigError::InvalidCandidateRadius(radius));
        }
        self.candidate_radius = radius;
        Ok(self)
    }

    fn empty(size: u8, win_length: u8) -> Self {
        let area = size as usize * size as usize;
        GomokuBoard {
            size,
            win_length,
            candidate_radius: DEFAULT_CANDIDATE_RADIUS,
            tiles: vec![None; area],
            next_player: Player::A,
            outcome: None,
            last_move: None,
            stones: 0,
        }
    }

    pub fn size(&self) -> u8 {
        self.size
    }

    pub fn win_length(&self) -> u8 {
        self.win_length
    }

    pub fn candidate_radius(&self) -> u8 {
        self.candidate_radius
    }

    /// The most recently played move, `None` if no move has been played on this board yet.
    pub fn last_move(&self) -> Option<Coord> {
        self.last_move
    }

    /// The number of occupied tiles.
    pub fn stone_count(&self) -> u16 {
        self.stones
    }

    pub fn is_full(&self) -> bool {
        self.stones as usize == self.tiles.len()
    }

    /// The player that won the game, `None` while the game is running or if it ended in a draw.
    pub fn winner(&self) -> Option<Player> {
        self.outcome.and_then(Outcome::winner)
    }

    /// Whether `coord` lies on this board.
    pub fn contains(&self, coord: Coord) -> bool {
        (1..=self.size).contains(&coord.x) && (1..=self.size).contains(&coord.y)
    }

    /// Panics if `coord` is not on this board.
    pub fn tile(&self, coord: Coord) -> Option<Player> {
        self.tiles[self.index(coord)]
    }

    /// All coordinates of this board in row-major order.
    pub fn coords(&self) -> impl Iterator<Item = Coord> {
        let size = self.size;
        (1..=size).flat_map(move |y| (1..=size).map(move |x| Coord::new(x, y)))
    }

    /// All empty tiles in row-major order.
    /// Unlike [BoardMoves::available_moves] this does not check whether the game is done.
    pub fn legal_moves(&self) -> Vec<Coord> {
        self.coords().filter(|&c| self.tile(c).is_none()).collect()
    }

    /// The empty tiles that have an occupied tile within `radius` (in [Coord::diagonal_distance]),
    /// in row-major order. Empty for a board without stones.
    pub fn adjacent_moves(&self, radius: u8) -> Vec<Coord> {
        let size = self.size as usize;
        let radius = radius as usize;
        let mut near = vec![false; self.tiles.len()];

        for (i, tile) in self.tiles.iter().enumerate() {
            if tile.is_none() {
                continue;
            }
            let (x, y) = (i % size, i / size);
            for ny in y.saturating_sub(radius)..=(y + radius).min(size - 1) {
                for nx in x.saturating_sub(radius)..=(x + radius).min(size - 1) {
                    near[ny * size + nx] = true;
                }
            }
        }

        self.coords()
            .zip(near)
            .filter(|&(c, near)| near && self.tile(c).is_none())
            .map(|(c, _)| c)
            .collect()
    }

    /// Encode this board as one value per tile in row-major order:
    /// `1.0` for [Player::A], `-1.0` for [Player::B] and `0.0` for empty tiles.
    pub fn to_input(&self) -> Vec<f32> {
        self.tiles
            .iter()
            .map(|tile| match tile {
                Some(player) => player.sign::<f32>(Player::A),
                None => 0.0,
            })
            .collect()
    }

    fn index(&self, coord: Coord) -> usize {
        assert!(self.contains(coord), "{} is not on a {}x{} board", coord, self.size, self.size);
        (coord.y as usize - 1) * self.size as usize + (coord.x as usize - 1)
    }

    fn tile_at(&self, x: i32, y: i32) -> Option<Player> {
        let size = self.size as i32;
        if (1..=size).contains(&x) && (1..=size).contains(&y) {
            self.tile(Coord::new(x as u8, y as u8))
        } else {
            None
        }
    }

    /// The number of consecutive `player` stones starting next to `start` in direction `(dx, dy)`,
    /// capped at `win_length - 1`.
    fn run_length(&self, start: Coord, player: Player, dx: i32, dy: i32) -> u8 {
        let (mut x, mut y) = (start.x as i32, start.y as i32);
        let mut count = 0;
        while count < self.win_length - 1 {
            x += dx;
            y += dy;
            if self.tile_at(x, y) != Some(player) {
                break;
            }
            count += 1;
        }
        count
    }

    /// Whether there is a line of at least `win_length` stones of `player` through `coord`,
    /// assuming `coord` itself holds a stone of `player`.
    /// Only looks at the `2 * win_length - 1` tiles centered on `coord` in each direction.
    fn wins_through(&self, coord: Coord, player: Player) -> bool {
        DIRECTIONS.iter().any(|&(dx, dy)| {
            let forward = self.run_length(coord, player, dx, dy) as u32;
            let backward = self.run_length(coord, player, -dx, -dy) as u32;
            1 + forward + backward >= self.win_length as u32
        })
    }

    /// Full scan for a line, used for boards that were not built move by move.
    fn find_outcome(&self) -> Result<Option<Outcome>, ParseBoardError> {
        let winners: Vec<Player> = self
            .coords()
            .filter_map(|c| self.tile(c).filter(|&p| self.wins_through(c, p)))
            .unique()
            .collect();

        match winners.as_slice() {
            [] if self.is_full() => Ok(Some(Outcome::Draw)),
            [] => Ok(None),
            &[winner] => Ok(Some(Outcome::WonBy(winner))),
            _ => Err(ParseBoardError::MultipleWinners),
        }
    }
}

impl Board for GomokuBoard {
    type Move = Coord;

    fn next_player(&self) -> Player {
        self.next_player
    }

    fn is_available_move(&self, mv: Self::Move) -> Result<bool, BoardDone> {
        self.check_done()?;
        Ok(self.contains(mv) && self.tile(mv).is_none())
    }

    fn play(&mut self, mv: Self::Move) -> Result<(), PlayError> {
        self.check_can_play(mv)?;

        let player = self.next_player;
        let index = self.index(mv);
        self.tiles[index] = Some(player);
        self.stones += 1;
        self.last_move = Some(mv);

        self.outcome = if self.wins_through(mv, player) {
            Some(Outcome::WonBy(player))
        } else if self.is_full() {
            Some(Outcome::Draw)
        } else {
            None
        };

        self.next_player = player.other();
        Ok(())
    }

    fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    fn candidate_moves(&self) -> Result<Vec<Self::Move>, BoardDone> {
        self.check_done()?;
        if self.stones == 0 {
            Ok(self.legal_moves())
        } else {
            Ok(self.adjacent_moves(self.candidate_radius))
        }
    }
}

impl<'a> BoardMoves<'a, GomokuBoard> for GomokuBoard {
    type AvailableMovesIterator = AvailableMovesIterator<'a, GomokuBoard>;

    fn available_moves(&'a self) -> Result<Self::AvailableMovesIterator, BoardDone> {
        AvailableMovesIterator::new(self)
    }
}

impl InternalIterator for AvailableMovesIterator<'_, GomokuBoard> {
    type Item = Coord;

    fn try_for_each<R, F>(self, mut f: F) -> ControlFlow<R>
    where
        F: FnMut(Self::Item) -> ControlFlow<R>,
    {
        let board = self.board();
        for coord in board.coords() {
            if board.tile(coord).is_none() {
                f(coord)?;
            }
        }
        ControlFlow::Continue(())
    }

    fn count(self) -> usize {
        let board = self.board();
        board.tiles.len() - board.stones as usize
    }
}

fn tile_to_char(tile: Option<Player>) -> char {
    match tile {
        Some(player) => player.to_char(),
        None => '.',
    }
}

impl Debug for Coord {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Coord({}, {})", self.x, self.y)
    }
}

impl Display for Coord {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl Debug for GomokuBoard {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "GomokuBoard {{ size: {}, win_length: {}, candidate_radius: {}, next_player: {:?}, outcome: {:?}, last_move: {:?}, tiles: \"{}\" }}",
            self.size,
            self.win_length,
            self.candidate_radius,
            self.next_player,
            self.outcome,
            self.last_move,
            self.tiles.iter().map(|&t| tile_to_char(t)).collect::<String>(),
        )
    }
}

impl Display for GomokuBoard {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for y in 1..=self.size {
            let row = (1..=self.size).map(|x| tile_to_char(self.tile(Coord::new(x, y))));
            writeln!(f, "{}", row.format(" "))?;
        }
        writeln!(f, "win: {}", self.win_length)?;
        if self.candidate_radius != DEFAULT_CANDIDATE_RADIUS {
            writeln!(f, "radius: {}", self.candidate_radius)?;
        }
        match self.outcome {
            None => writeln!(f, "next: {}", self.next_player.to_char()),
            Some(Outcome::WonBy(player)) => writeln!(f, "won by: {}", player.to_char()),
            Some(Outcome::Draw) => writeln!(f, "draw"),
        }
    }
}

/// Error returned when parsing a [Coord] or [GomokuBoard] fails.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseBoardError {
    InvalidCoord(String),
    InvalidRow(String),
    NotSquare { rows: usize, columns: usize },
    /// Player A moves first, so A has either as many stones as B or one more.
    InvalidStoneCount { a: usize, b: usize },
    MultipleWinners,
    Config(ConfigError),
}

impl Display for ParseBoardError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseBoardError::InvalidCoord(s) => write!(f, "invalid coordinate {:?}", s),
            ParseBoardError::InvalidRow(s) => write!(f, "invalid board row {:?}", s),
            ParseBoardError::NotSquare { rows, columns } => {
                write!(f, "board is not square, {} rows and {} columns", rows, columns)
            }
            ParseBoardError::InvalidStoneCount { a, b } => {
                write!(f, "impossible stone counts, a: {}, b: {}", a, b)
            }
            ParseBoardError::MultipleWinners => write!(f, "both players have a winning line"),
            ParseBoardError::Config(e) => write!(f, "{}", e),
        }
    }
}

impl Error for ParseBoardError {}

impl From<ConfigError> for ParseBoardError {
    fn from(e: ConfigError) -> Self {
        ParseBoardError::Config(e)
    }
}

fn pair(input: &str) -> IResult<&str, (u8, u8)> {
    separated_pair(
        preceded(space0, parse_u8),
        preceded(space0, char(',')),
        preceded(space0, parse_u8),
    )(input)
}

fn coord(input: &str) -> IResult<&str, Coord> {
    let parenthesized = delimited(char('('), terminated(pair, space0), char(')'));
    map(alt((parenthesized, pair)), |(x, y)| Coord::new(x, y))(input)
}

fn row(input: &str) -> IResult<&str, Vec<Option<Player>>> {
    let tile = map(one_of(".ab"), |c| match c {
        'a' => Some(Player::A),
        'b' => Some(Player::B),
        _ => None,
    });
    preceded(space0, many1(terminated(tile, space0)))(input)
}

/// A `key: value` line like `win: 5`.
fn setting(input: &str) -> IResult<&str, (&str, u8)> {
    separated_pair(
        alt((tag("win"), tag("radius"))),
        delimited(space0, char(':'), space0),
        parse_u8,
    )(input)
}

impl FromStr for Coord {
    type Err = ParseBoardError;

    /// Parse `"x,y"` or `"(x, y)"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        all_consuming(delimited(space0, coord, space0))(s)
            .map(|(_, c)| c)
            .map_err(|_| ParseBoardError::InvalidCoord(s.to_owned()))
    }
}

impl FromStr for GomokuBoard {
    type Err = ParseBoardError;

    /// Parse the format written by [Display]: one line per row with `a`, `b` or `.` per tile,
    /// optionally followed by `win: N` and `radius: R` lines.
    /// Without those lines the [default_win_length] and [DEFAULT_CANDIDATE_RADIUS] are used.
    /// The `next:`/`won by:`/`draw` footer is ignored and recomputed.
    /// The resulting board has no [GomokuBoard::last_move].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut rows = vec![];
        let mut win_length = None;
        let mut candidate_radius = None;

        for line in s.lines().map(str::trim).filter(|line| !line.is_empty()) {
            if line.starts_with("next") || line.starts_with("won") || line == "draw" {
                continue;
            }
            if let Ok((_, (key, value))) = all_consuming(setting)(line) {
                match key {
                    "win" => win_length = Some(value),
                    _ => candidate_radius = Some(value),
                }
                continue;
            }
            let (_, row) = all_consuming(row)(line).map_err(|_| ParseBoardError::InvalidRow(line.to_owned()))?;
            rows.push(row);
        }

        let size = rows.len();
        if let Some(bad) = rows.iter().find(|r| r.len() != size) {
            return Err(ParseBoardError::NotSquare {
                rows: size,
                columns: bad.len(),
            });
        }
        let size = u8::try_from(size).map_err(|_| ConfigError::InvalidSize { size: u8::MAX })?;

        let win_length = win_length.unwrap_or_else(|| default_win_length(size));
        let mut board = GomokuBoard::with_win_length(size, win_length)?
            .with_candidate_radius(candidate_radius.unwrap_or(DEFAULT_CANDIDATE_RADIUS))?;
        board.tiles = rows.into_iter().flatten().collect();

        let a = board.tiles.iter().filter(|&&t| t == Some(Player::A)).count();
        let b = board.tiles.iter().filter(|&&t| t == Some(Player::B)).count();
        board.next_player = match a.checked_sub(b) {
            Some(0) => Player::A,
            Some(1) => Player::B,
            _ => return Err(ParseBoardError::InvalidStoneCount { a, b }),
        };
        board.stones = (a + b) as u16;
        board.outcome = board.find_outcome()?;

        Ok(board)
    }
}
