use crate::ai::rollout::Scorer;
use crate::board::{Board, Player};
use crate::games::gomoku::{Coord, GomokuBoard};
use crate::wdl::NonPov;

/// Scores a board by looking at every window of `win_length` tiles along the rows, columns and diagonals.
/// A window that only contains stones of a single player counts for that player, weighted exponentially
/// in the number of stones. The difference is squashed into `[-1, 1]` with `tanh`.
#[derive(Debug, Copy, Clone)]
pub struct LineHeuristic {
    /// Ratio between the weight of a window with `n + 1` stones and one with `n` stones.
    pub growth: f32,
    /// Weight difference that maps to `tanh(1)`.
    pub scale: f32,
}

impl Default for LineHeuristic {
    fn default() -> Self {
        LineHeuristic {
            growth: 4.0,
            scale: 64.0,
        }
    }
}

impl LineHeuristic {
    /// The summed window weights for player A and B.
    pub fn window_weights(&self, board: &GomokuBoard) -> [f32; 2] {
        let size = board.size() as i32;
        let len = board.win_length() as i32;
        let mut totals = [0.0; 2];

        for start in board.coords() {
            for (dx, dy) in [(1, 0), (0, 1), (1, 1), (1, -1)] {
                let end_x = start.x() as i32 + dx * (len - 1);
                let end_y = start.y() as i32 + dy * (len - 1);
                if !(1..=size).contains(&end_x) || !(1..=size).contains(&end_y) {
                    continue;
                }

                let mut counts = [0; 2];
                for i in 0..len {
                    let x = start.x() as i32 + dx * i;
                    let y = start.y() as i32 + dy * i;
                    if let Some(player) = board.tile(Coord::new(x as u8, y as u8)) {
                        counts[player.index() as usize] += 1;
                    }
                }

                match counts {
                    [0, 0] => {}
                    [n, 0] => totals[0] += self.growth.powi(n - 1),
                    [0, n] => totals[1] += self.growth.powi(n - 1),
                    _ => {}
                }
            }
        }

        totals
    }
}

impl Scorer<GomokuBoard> for LineHeuristic {
    fn score(&mut self, board: &GomokuBoard) -> f32 {
        if let Some(outcome) = board.outcome() {
            return outcome.pov(board.next_player()).sign::<f32>();
        }

        let [a, b] = self.window_weights(board);
        let value_a = ((a - b) / self.scale).tanh();
        match board.next_player() {
            Player::A => value_a,
            Player::B => -value_a,
        }
    }
}
