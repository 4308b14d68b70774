//! Utilities to generate a `Board` in a given or random state.
use rand::Rng;

use crate::ai::rollout::{RandomRollout, RolloutPolicy};
use crate::board::{Board, BoardDone, Outcome, PlayError};

/// Play the given moves, starting from `start`.
pub fn board_with_moves<B: Board>(start: B, moves: &[B::Move]) -> Result<B, PlayError> {
    let mut curr = start;
    for &mv in moves {
        curr.play(mv)?;
    }
    Ok(curr)
}

/// Generate a `Board` that is not done yet by playing `n` random candidate moves on `start`.
/// Starts over whenever the game ends before or at the `n`-th move,
/// so this loops forever if no game from `start` can last longer than that.
pub fn random_board_with_moves<B: Board>(start: &B, n: u32, rng: &mut impl Rng) -> B {
    assert!(!start.is_done(), "Start board is done:\n{}", start);

    'new_try: loop {
        let mut board = start.clone();
        for _ in 0..n {
            match play_random_candidate(&mut board, rng) {
                Ok(()) => {}
                Err(BoardDone) => continue 'new_try,
            }
        }
        if !board.is_done() {
            return board;
        }
    }
}

/// Play a single game from `start` by picking random candidate moves,
/// and return every board where a move was picked together with the final outcome of the game.
///
/// This is the kind of data an external value model can be fitted on.
pub fn random_game_samples<B: Board>(start: &B, rng: &mut impl Rng) -> Vec<(B, Outcome)> {
    let mut boards = vec![];
    let mut board = start.clone();

    loop {
        match board.outcome() {
            Some(outcome) => return boards.into_iter().map(|b| (b, outcome)).collect(),
            None => {
                boards.push(board.clone());
                // SAFETY: unwrap is safe because the board is not done
                play_random_candidate(&mut board, rng).unwrap();
            }
        }
    }
}

fn play_random_candidate<B: Board>(board: &mut B, rng: &mut impl Rng) -> Result<(), BoardDone> {
    let candidates = board.candidate_moves()?;
    let mv = RandomRollout.choose_move(&*board, &candidates, rng);
    // SAFETY: unwrap is safe because candidates are available
    board.play(mv).unwrap();
    Ok(())
}
