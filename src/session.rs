//! Plays complete games between two strategies.

use derive_more::{Display, Error, From};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::ai::{MoveStrategy, StrategyError};
use crate::game::{Board, BoardError, Move, Scores, Side};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum GameEvent {
    MovePlayed {
        side: Side,
        mv: Move,
        flipped: u32,
    },
    TurnPassed {
        side: Side,
    },
    GameOver {
        scores: Scores,
        #[serde(skip_serializing_if = "Option::is_none")]
        winner: Option<Side>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameRecord<B> {
    pub board: B,
    pub scores: Scores,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner: Option<Side>,
    pub turns: usize,
    pub events: Vec<GameEvent>,
}

#[derive(Debug, Display, Error, From)]
pub enum SessionError {
    #[display("strategy failed: {_0}")]
    #[from]
    Strategy(#[error(source)] StrategyError),
    #[display("{side} chose illegal move {mv}: {source}")]
    IllegalMove {
        side: Side,
        mv: Move,
        source: BoardError,
    },
    #[display("expected a strategy for {expected}, got one for {actual}")]
    SideMismatch { expected: Side, actual: Side },
    #[display("game did not finish within {turns} turns")]
    TurnLimit { turns: usize },
}

fn check_side<B: Board>(strategy: &dyn MoveStrategy<B>, expected: Side) -> Result<(), SessionError> {
    let actual = strategy.side();
    if actual != expected {
        return Err(SessionError::SideMismatch { expected, actual });
    }
    Ok(())
}

/// Plays from `board` with X to move until neither side can move.
/// A side without a legal move passes.
pub fn play_game<B: Board>(
    mut board: B,
    x_player: &mut dyn MoveStrategy<B>,
    o_player: &mut dyn MoveStrategy<B>,
) -> Result<GameRecord<B>, SessionError> {
    check_side(x_player, Side::X)?;
    check_side(o_player, Side::O)?;

    // Every move fills a cell, and a pass is always followed by a move.
    let max_moves = board.size() * board.size();
    let max_turns = 2 * max_moves + 1;
    let mut events = Vec::new();
    let mut side = Side::X;
    let mut turns = 0;
    let mut moves = 0;

    while board.game_continues() {
        if moves >= max_moves || turns >= max_turns {
            return Err(SessionError::TurnLimit { turns });
        }
        turns += 1;

        if board.calc_valid_moves(side).is_empty() {
            debug!(%side, "no legal move, passing");
            events.push(GameEvent::TurnPassed { side });
            side = side.opponent();
            continue;
        }

        let (mv, kind) = match side {
            Side::X => (x_player.get_move(&board)?, x_player.kind()),
            Side::O => (o_player.get_move(&board)?, o_player.kind()),
        };

        let before = board.calc_scores().get(side);
        board
            .make_move(side, mv)
            .map_err(|source| SessionError::IllegalMove { side, mv, source })?;
        let flipped = board.calc_scores().get(side).saturating_sub(before + 1);

        debug!(%side, %mv, flipped, strategy = %kind, "move played");
        events.push(GameEvent::MovePlayed { side, mv, flipped });
        moves += 1;
        side = side.opponent();
    }

    let scores = board.calc_scores();
    let winner = scores.leader();
    info!(x = scores.x, o = scores.o, winner = ?winner, turns, "game over");
    events.push(GameEvent::GameOver { scores, winner });

    Ok(GameRecord {
        board,
        scores,
        winner,
        turns,
        events,
    })
}
