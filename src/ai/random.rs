use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::debug;

use super::agent::StrategyKind;
use super::strategy::{MoveStrategy, StrategyError};
use crate::game::{Board, Move, Side};

/// Uniform choice over the legal moves.
pub struct RandomStrategy {
    side: Side,
    rng: SmallRng,
}

impl RandomStrategy {
    pub fn new(side: Side) -> Self {
        Self {
            side,
            rng: SmallRng::from_entropy(),
        }
    }

    pub fn with_seed(side: Side, seed: u64) -> Self {
        Self {
            side,
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl<B: Board> MoveStrategy<B> for RandomStrategy {
    fn side(&self) -> Side {
        self.side
    }

    fn kind(&self) -> StrategyKind {
        StrategyKind::Random
    }

    fn get_move(&mut self, board: &B) -> Result<Move, StrategyError> {
        let moves = board.calc_valid_moves(self.side);
        let mv = *moves
            .choose(&mut self.rng)
            .ok_or(StrategyError::NoLegalMoves { side: self.side })?;
        debug!(side = %self.side, %mv, candidates = moves.len(), "random move");
        Ok(mv)
    }
}
