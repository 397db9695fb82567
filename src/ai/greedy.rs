use tracing::debug;

use super::agent::StrategyKind;
use super::strategy::{MoveStrategy, StrategyError};
use crate::game::{Board, Move, Side};

/// One-ply lookahead: play the move that leaves `side` with the most pieces.
///
/// A later move replaces the current best only on a strictly higher score,
/// so the first move in enumeration order wins ties. The first legal move
/// is always a candidate, even when its score is zero.
pub struct GreedyStrategy {
    side: Side,
}

impl GreedyStrategy {
    pub fn new(side: Side) -> Self {
        Self { side }
    }

    /// The chosen move and the score it leaves for `side`.
    pub fn best_move<B: Board>(&self, board: &B) -> Result<(Move, u32), StrategyError> {
        let mut work = board.clone();
        let mut best: Option<(Move, u32)> = None;

        for mv in board.calc_valid_moves(self.side) {
            let undo = work.make_move(self.side, mv)?;
            let score = work.calc_scores().get(self.side);
            work.undo_move(undo);

            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((mv, score));
            }
        }

        best.ok_or(StrategyError::NoLegalMoves { side: self.side })
    }
}

impl<B: Board> MoveStrategy<B> for GreedyStrategy {
    fn side(&self) -> Side {
        self.side
    }

    fn kind(&self) -> StrategyKind {
        StrategyKind::Greedy
    }

    fn get_move(&mut self, board: &B) -> Result<Move, StrategyError> {
        let (mv, score) = self.best_move(board)?;
        debug!(side = %self.side, %mv, score, "greedy move");
        Ok(mv)
    }
}
