use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::hash::Hash;

use internal_iterator::InternalIterator;
use rand::Rng;

/// One of the two players.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Player {
    A,
    B,
}

/// The absolute outcome for a game.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Outcome {
    WonBy(Player),
    Draw,
}

/// Error returned when asking for moves on a board that is already done.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct BoardDone;

/// Error returned by [Board::play].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum PlayError {
    /// The board is already done, no more moves can be played.
    BoardDone,
    /// The move is out of range or the target tile is already occupied.
    UnavailableMove,
}

/// The main trait of this crate. Represents the state of a game.
/// Each game implementation is supposed to provide it's own constructors to allow for customizable start positions.
pub trait Board: 'static + Debug + Display + Clone + Eq + Hash + Send + Sync
where
    for<'a> Self: BoardMoves<'a, Self>,
{
    /// The type used to represent moves on this board.
    type Move: Debug + Display + Eq + Ord + Hash + Copy + Send + Sync;

    /// Return the next player to make a move.
    /// If the board is done this is the player that did not play the last move for consistency.
    fn next_player(&self) -> Player;

    /// Return whether the given move is available.
    fn is_available_move(&self, mv: Self::Move) -> Result<bool, BoardDone>;

    /// Pick a random move from the `available_moves` with a uniform distribution.
    /// Can be overridden for better performance.
    fn random_available_move(&self, rng: &mut impl Rng) -> Result<Self::Move, BoardDone> {
        let count = self.available_moves()?.count();
        let index = rng.gen_range(0..count);
        // SAFETY: unwrap is safe because the index is less than the
        // length of the iterator.
        Ok(self.available_moves()?.nth(index).unwrap())
    }

    /// Play the move `mv`, modifying this board.
    fn play(&mut self, mv: Self::Move) -> Result<(), PlayError>;

    /// Clone this board, play `mv` on it and return the new board.
    fn clone_and_play(&self, mv: Self::Move) -> Result<Self, PlayError> {
        let mut next = self.clone();
        next.play(mv)?;
        Ok(next)
    }

    /// Play a random available move, see [Board::random_available_move].
    fn play_random_available_move(&mut self, rng: &mut impl Rng) -> Result<(), BoardDone> {
        let mv = self.random_available_move(rng)?;
        // SAFETY: the move was just generated as available on this board
        self.play(mv).unwrap();
        Ok(())
    }

    /// The outcome of this board, is `None` when this games is not done yet.
    fn outcome(&self) -> Option<Outcome>;

    /// Whether this games is done.
    fn is_done(&self) -> bool {
        self.outcome().is_some()
    }

    /// Return `Err(BoardDone)` if this board is done.
    fn check_done(&self) -> Result<(), BoardDone> {
        if self.is_done() {
            Err(BoardDone)
        } else {
            Ok(())
        }
    }

    /// Check whether `mv` can be played on this board, without actually playing it.
    fn check_can_play(&self, mv: Self::Move) -> Result<(), PlayError> {
        if self.is_available_move(mv)? {
            Ok(())
        } else {
            Err(PlayError::UnavailableMove)
        }
    }

    /// The subset of the available moves that is worth considering during search,
    /// in a deterministic order. Is always nonempty for a board that is not done.
    ///
    /// The default implementation returns all available moves.
    fn candidate_moves(&self) -> Result<Vec<Self::Move>, BoardDone> {
        Ok(self.available_moves()?.collect())
    }
}

/// A helper trait to get the correct lifetimes for [BoardMoves::available_moves].
/// This is a workaround to get generic associated types, See <https://github.com/rust-lang/rust/issues/44265>.
pub trait BoardMoves<'a, B: Board> {
    type AvailableMovesIterator: InternalIterator<Item = B::Move>;

    /// Return an iterator over available moves, is always nonempty. No guarantees are made about the ordering except
    /// that it stays consistent when the board is not modified.
    fn available_moves(&'a self) -> Result<Self::AvailableMovesIterator, BoardDone>;
}

/// A convenient type to use for the iterator returned by [BoardMoves::available_moves].
/// Games implement [InternalIterator] for their own instantiation of it.
#[derive(Debug)]
pub struct AvailableMovesIterator<'a, B: Board> {
    board: &'a B,
}

impl<'a, B: Board> AvailableMovesIterator<'a, B> {
    pub fn new(board: &'a B) -> Result<Self, BoardDone> {
        board.check_done()?;
        Ok(AvailableMovesIterator { board })
    }

    pub fn board(&self) -> &'a B {
        self.board
    }
}

/// Error returned when a board or search is constructed with parameters that cannot work.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ConfigError {
    /// The board size is zero or too large to be addressed.
    InvalidSize { size: u8 },
    /// The win length is zero or longer than the board side.
    InvalidWinLength { size: u8, win_length: u8 },
    /// The candidate move radius is zero, which would leave no candidates next to the stones.
    InvalidCandidateRadius(u8),
    /// The search was asked to run zero iterations.
    ZeroIterations,
    /// The exploration weight is negative or not finite.
    InvalidExplorationWeight(f32),
}

impl Player {
    pub const BOTH: [Player; 2] = [Player::A, Player::B];

    pub fn other(self) -> Player {
        match self {
            Player::A => Player::B,
            Player::B => Player::A,
        }
    }

    pub fn index(self) -> u8 {
        match self {
            Player::A => 0,
            Player::B => 1,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Player::A => 'a',
            Player::B => 'b',
        }
    }

    pub fn sign<V: num_traits::One + std::ops::Neg<Output = V>>(self, pov: Player) -> V {
        if self == pov {
            V::one()
        } else {
            -V::one()
        }
    }
}

impl Outcome {
    /// The winning player, `None` for a draw.
    pub fn winner(self) -> Option<Player> {
        match self {
            Outcome::WonBy(player) => Some(player),
            Outcome::Draw => None,
        }
    }
}

impl From<BoardDone> for PlayError {
    fn from(_: BoardDone) -> Self {
        PlayError::BoardDone
    }
}

impl Display for BoardDone {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "the board is done, there are no moves left to play")
    }
}

impl Error for BoardDone {}

impl Display for PlayError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PlayError::BoardDone => "cannot play a move on a board that is done",
            PlayError::UnavailableMove => "the move is out of range or the tile is already occupied",
        };
        write!(f, "{}", s)
    }
}

impl Error for PlayError {}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match *self {
            ConfigError::InvalidSize { size } => write!(f, "invalid board size {}", size),
            ConfigError::InvalidWinLength { size, win_length } => write!(
                f,
                "win length {} does not fit on a {}x{} board",
                win_length, size, size
            ),
            ConfigError::InvalidCandidateRadius(radius) => {
                write!(f, "candidate radius must be at least 1, got {}", radius)
            }
            ConfigError::ZeroIterations => write!(f, "the search needs at least one iteration"),
            ConfigError::InvalidExplorationWeight(weight) => {
                write!(f, "exploration weight must be finite and non-negative, got {}", weight)
            }
        }
    }
}

impl Error for ConfigError {}
