//! Board model and Reversi rules consumed by the strategies.

pub mod rules;
pub mod state;

pub use rules::{Board, BoardError, Placement};
pub use state::{
    Cell,
    Move,
    ReversiBoard,
    Scores,
    Side,
    DEFAULT_BOARD_SIZE,
    MAX_BOARD_SIZE,
    MIN_BOARD_SIZE,
};
