//! The simplest possible opponent: `RandomBot`.
use std::fmt::{Debug, Formatter};

use rand::Rng;

use crate::ai::Bot;
use crate::board::{Board, BoardDone};

/// Bot that chooses moves uniformly at random,
/// either among all available moves or only among the [Board::candidate_moves].
pub struct RandomBot<R: Rng> {
    rng: R,
    candidates_only: bool,
}

impl<R: Rng> Debug for RandomBot<R> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "RandomBot {{ candidates_only: {} }}", self.candidates_only)
    }
}

impl<R: Rng> RandomBot<R> {
    /// Pick among all available moves.
    pub fn new(rng: R) -> Self {
        RandomBot {
            rng,
            candidates_only: false,
        }
    }

    /// Pick among the candidate moves only, which for gomoku means playing next to existing stones.
    pub fn near_stones(rng: R) -> Self {
        RandomBot {
            rng,
            candidates_only: true,
        }
    }
}

impl<B: Board, R: Rng> Bot<B> for RandomBot<R> {
    fn select_move(&mut self, board: &B) -> Result<B::Move, BoardDone> {
        if self.candidates_only {
            let candidates = board.candidate_moves()?;
            Ok(candidates[self.rng.gen_range(0..candidates.len())])
        } else {
            board.random_available_move(&mut self.rng)
        }
    }
}
