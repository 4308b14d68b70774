//! Hand-written board evaluation functions.
pub mod gomoku;
