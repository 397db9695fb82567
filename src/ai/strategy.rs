use derive_more::{Display, Error, From};

use super::agent::StrategyKind;
use crate::game::{Board, BoardError, Move, Side};

/// Picks one legal move for a fixed side.
///
/// Implementations must leave the caller's board untouched; any lookahead
/// happens on a private copy.
pub trait MoveStrategy<B: Board> {
    fn side(&self) -> Side;

    fn kind(&self) -> StrategyKind;

    fn get_move(&mut self, board: &B) -> Result<Move, StrategyError>;
}

#[derive(Debug, Display, Error, From)]
pub enum StrategyError {
    #[display("{side} has no legal move")]
    NoLegalMoves { side: Side },
    #[display("input closed before a valid move was entered")]
    InputClosed,
    #[display("failed to read move: {_0}")]
    #[from]
    Io(#[error(source)] std::io::Error),
    #[display("{kind} strategy is not available here")]
    Unsupported { kind: StrategyKind },
    #[display("board rejected move: {_0}")]
    #[from]
    Board(#[error(source)] BoardError),
}
