//! Policies used to pick moves during the simulation phase of [MCTS](crate::ai::mcts).
use std::cmp::Reverse;
use std::fmt::{Debug, Formatter};

use decorum::N32;
use rand::Rng;

use crate::board::Board;
use crate::wdl::NonPov;

/// Picks the moves played during a rollout.
pub trait RolloutPolicy<B: Board>: Debug {
    /// Pick one of `candidates` to play on `board`.
    /// `candidates` is never empty and only contains moves that are available on `board`.
    fn choose_move(&mut self, board: &B, candidates: &[B::Move], rng: &mut impl Rng) -> B::Move;
}

/// Evaluates a board, typically backed by some learned model living outside of this crate.
pub trait Scorer<B: Board> {
    /// The value of `board` in `[-1, 1]` from the POV of `board.next_player()`.
    /// Only called for boards that are not done. A NaN value ranks below every other move.
    fn score(&mut self, board: &B) -> f32;
}

impl<B: Board, F: FnMut(&B) -> f32> Scorer<B> for F {
    fn score(&mut self, board: &B) -> f32 {
        self(board)
    }
}

/// Uniformly random choice among the candidates.
#[derive(Debug, Default, Copy, Clone)]
pub struct RandomRollout;

impl<B: Board> RolloutPolicy<B> for RandomRollout {
    fn choose_move(&mut self, _: &B, candidates: &[B::Move], rng: &mut impl Rng) -> B::Move {
        candidates[rng.gen_range(0..candidates.len())]
    }
}

/// Deterministically plays the candidate whose resulting board is best for the mover according to a [Scorer].
/// Finished boards are valued by their outcome instead of the scorer.
pub struct ScoredRollout<S> {
    scorer: S,
}

impl<S> ScoredRollout<S> {
    pub fn new(scorer: S) -> Self {
        ScoredRollout { scorer }
    }

    pub fn scorer(&self) -> &S {
        &self.scorer
    }
}

impl<S> Debug for ScoredRollout<S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "ScoredRollout")
    }
}

impl<B: Board, S: Scorer<B>> RolloutPolicy<B> for ScoredRollout<S> {
    fn choose_move(&mut self, board: &B, candidates: &[B::Move], _: &mut impl Rng) -> B::Move {
        let mover = board.next_player();
        let scorer = &mut self.scorer;

        let (_, mv) = candidates
            .iter()
            .map(|&mv| {
                // SAFETY: unwrap is safe because candidates are available on `board`
                let child = board.clone_and_play(mv).unwrap();
                let value = match child.outcome() {
                    Some(outcome) => outcome.pov(mover).sign::<f32>(),
                    // the scorer sees the child from the opponent POV
                    None => -scorer.score(&child),
                };
                let value = if value.is_nan() { f32::NEG_INFINITY } else { value };
                (value, mv)
            })
            .enumerate()
            // first candidate wins ties
            .max_by_key(|&(i, (value, _))| (N32::from_inner(value), Reverse(i)))
            .map(|(_, pair)| pair)
            // SAFETY: unwrap is safe because candidates is not empty
            .unwrap();

        mv
    }
}
