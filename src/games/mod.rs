//! Game implementations of [Board](crate::board::Board).
pub mod gomoku;
