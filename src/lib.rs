#![warn(missing_debug_implementations)]
#![allow(clippy::new_without_default)]

//! A five-in-a-row (gomoku) engine with a [Monte Carlo Tree Search](https://en.wikipedia.org/wiki/Monte_Carlo_tree_search)
//! move selector.
//!
//! The game itself is implemented as [GomokuBoard](crate::games::gomoku::GomokuBoard), on top of the generic
//! [Board](crate::board::Board) trait, so the search and utilities only depend on that trait.
//!
//! # Features
//!
//! * [GomokuBoard](crate::games::gomoku::GomokuBoard): square boards of any size with a configurable win length,
//!     move validation, incremental win detection and a compact text format.
//! * Game-playing algorithms:
//!     * [RandomBot](crate::ai::simple::RandomBot), which simply picks a random move.
//!     * [MCTSBot](crate::ai::mcts::MCTSBot) and [choose_move](crate::ai::mcts::choose_move),
//!         which pick the best move as found by MCTS with UCB selection.
//! * Pluggable rollout policies, see [rollout](crate::ai::rollout), including one guided by an external [Scorer](crate::ai::rollout::Scorer).
//! * Random board and self-play sample generation, see [board_gen](crate::util::board_gen).
//! * A bot vs bot game runner to compare playing strength, see [bot_game](crate::util::bot_game).
//!
//! # Examples
//!
//! ## List the available moves on a board and play a random one.
//!
//! ```
//! # use gomoku_mcts::board::{BoardMoves, Board};
//! # use gomoku_mcts::games::gomoku::GomokuBoard;
//! # use internal_iterator::InternalIterator;
//! # let mut rng = rand::thread_rng();
//! let mut board = GomokuBoard::new(7).unwrap();
//! println!("{}", board);
//!
//! board.available_moves().unwrap().for_each(|mv| {
//!     println!("{}", mv)
//! });
//!
//! let mv = board.random_available_move(&mut rng).unwrap();
//! println!("Picked move {}", mv);
//! board.play(mv).unwrap();
//! println!("{}", board);
//! ```
//!
//! ## Get the best move according to MCTS
//!
//! ```
//! # use gomoku_mcts::ai::mcts::MCTSBot;
//! # use gomoku_mcts::ai::Bot;
//! # use gomoku_mcts::games::gomoku::{Coord, GomokuBoard};
//! # use gomoku_mcts::board::Board;
//! # use rand::thread_rng;
//! let mut board = GomokuBoard::new(7).unwrap();
//! board.play(Coord::new(4, 4)).unwrap();
//! println!("{}", board);
//!
//! let mut bot = MCTSBot::new(300, 1.5, thread_rng()).unwrap();
//! println!("{:?}", bot.select_move(&board))
//! ```

pub mod board;
pub mod wdl;

pub mod ai;

pub mod games;

pub mod heuristic;

pub mod util;
