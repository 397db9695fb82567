use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::agent::{AgentConfig, StrategyKind};
use super::strategy::{MoveStrategy, StrategyError};
use crate::game::{Board, Move, Scores, Side};

/// Plies explored by [`MinimaxStrategy`] unless configured otherwise.
pub const SEARCH_DEPTH: u8 = 5;

/// Score and move for one node of the search tree. `mv` is `None` at
/// leaves and at nodes resolved by a pass.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Evaluation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mv: Option<Move>,
    pub score: i32,
}

/// Result of expanding one node's legal moves.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum SearchOutcome {
    /// The side to move had no legal move.
    NoCandidate,
    Candidate(Evaluation),
}

impl SearchOutcome {
    pub fn best_move(&self) -> Option<Move> {
        match self {
            SearchOutcome::Candidate(evaluation) => evaluation.mv,
            SearchOutcome::NoCandidate => None,
        }
    }

    pub fn score(&self) -> Option<i32> {
        match self {
            SearchOutcome::Candidate(evaluation) => Some(evaluation.score),
            SearchOutcome::NoCandidate => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchStats {
    pub nodes: u64,
    pub depth_reached: u8,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchReport {
    pub outcome: SearchOutcome,
    pub stats: SearchStats,
}

/// `+1` if `maximizer` strictly leads, `-1` if its opponent does, `0` on a tie.
pub fn terminal_score(scores: &Scores, maximizer: Side) -> i32 {
    match scores.leader() {
        Some(leader) if leader == maximizer => 1,
        Some(_) => -1,
        None => 0,
    }
}

/// Evaluates `board` to `depth` plies with `maximizer` as the maximizing
/// player. `maximizing` says whose turn it is at the root.
///
/// The board is walked with make/undo and is left as it was found.
pub fn minimax<B: Board>(
    board: &mut B,
    depth: u8,
    maximizing: bool,
    maximizer: Side,
) -> Result<(Evaluation, SearchStats), StrategyError> {
    let mut search = Search::new(maximizer, depth);
    let evaluation = search.evaluate(board, depth, maximizing)?;
    Ok((evaluation, search.stats))
}

struct Search {
    maximizer: Side,
    max_depth: u8,
    stats: SearchStats,
}

impl Search {
    fn new(maximizer: Side, max_depth: u8) -> Self {
        Self {
            maximizer,
            max_depth,
            stats: SearchStats::default(),
        }
    }

    fn visit(&mut self, depth_remaining: u8) {
        self.stats.nodes += 1;
        let ply = self.max_depth.saturating_sub(depth_remaining);
        if ply > self.stats.depth_reached {
            self.stats.depth_reached = ply;
        }
    }

    fn is_terminal<B: Board>(board: &B, depth_remaining: u8) -> bool {
        depth_remaining == 0 || !board.game_continues()
    }

    fn leaf<B: Board>(&self, board: &B) -> Evaluation {
        Evaluation {
            mv: None,
            score: terminal_score(&board.calc_scores(), self.maximizer),
        }
    }

    fn evaluate<B: Board>(
        &mut self,
        board: &mut B,
        depth_remaining: u8,
        maximizing: bool,
    ) -> Result<Evaluation, StrategyError> {
        self.visit(depth_remaining);
        if Self::is_terminal(board, depth_remaining) {
            return Ok(self.leaf(board));
        }

        match self.expand(board, depth_remaining, maximizing)? {
            SearchOutcome::Candidate(evaluation) => Ok(evaluation),
            // The game continues, so the opponent can move: pass and spend the ply.
            SearchOutcome::NoCandidate => {
                let reply = self.evaluate(board, depth_remaining - 1, !maximizing)?;
                Ok(Evaluation {
                    mv: None,
                    score: reply.score,
                })
            }
        }
    }

    /// Tries every legal move of the side to move. Ties keep the earliest move.
    fn expand<B: Board>(
        &mut self,
        board: &mut B,
        depth_remaining: u8,
        maximizing: bool,
    ) -> Result<SearchOutcome, StrategyError> {
        let side = if maximizing {
            self.maximizer
        } else {
            self.maximizer.opponent()
        };
        let mut best = SearchOutcome::NoCandidate;

        for mv in board.calc_valid_moves(side) {
            let undo = board.make_move(side, mv)?;
            let child = self.evaluate(board, depth_remaining - 1, !maximizing);
            board.undo_move(undo);
            let candidate = Evaluation {
                mv: Some(mv),
                score: child?.score,
            };

            let improves = match best {
                SearchOutcome::NoCandidate => true,
                SearchOutcome::Candidate(current) if maximizing => candidate.score > current.score,
                SearchOutcome::Candidate(current) => candidate.score < current.score,
            };
            if improves {
                best = SearchOutcome::Candidate(candidate);
            }
        }

        Ok(best)
    }
}

/// Fixed-depth minimax without pruning.
pub struct MinimaxStrategy {
    side: Side,
    maximizer: Side,
    depth: u8,
}

impl MinimaxStrategy {
    /// Searches `SEARCH_DEPTH` plies with `side` as the maximizing player.
    pub fn new(side: Side) -> Self {
        Self {
            side,
            maximizer: side,
            depth: SEARCH_DEPTH,
        }
    }

    pub fn from_config(side: Side, config: &AgentConfig) -> Self {
        Self::new(side)
            .with_depth(config.depth)
            .with_maximizer(config.maximizer.unwrap_or(side))
    }

    pub fn with_depth(mut self, depth: u8) -> Self {
        self.depth = depth.max(1);
        self
    }

    pub fn with_maximizer(mut self, maximizer: Side) -> Self {
        self.maximizer = maximizer;
        self
    }

    pub fn depth(&self) -> u8 {
        self.depth
    }

    /// Runs the search from `board` with `side` to move.
    pub fn search<B: Board>(&self, board: &B) -> Result<SearchReport, StrategyError> {
        let mut work = board.clone();
        let mut search = Search::new(self.maximizer, self.depth);
        let maximizing = self.side == self.maximizer;

        search.visit(self.depth);
        let outcome = if Search::is_terminal(&work, self.depth) {
            SearchOutcome::Candidate(search.leaf(&work))
        } else {
            search.expand(&mut work, self.depth, maximizing)?
        };

        trace!(nodes = search.stats.nodes, "search finished");
        Ok(SearchReport {
            outcome,
            stats: search.stats,
        })
    }
}

impl<B: Board> MoveStrategy<B> for MinimaxStrategy {
    fn side(&self) -> Side {
        self.side
    }

    fn kind(&self) -> StrategyKind {
        StrategyKind::Minimax
    }

    fn get_move(&mut self, board: &B) -> Result<Move, StrategyError> {
        if board.calc_valid_moves(self.side).is_empty() {
            return Err(StrategyError::NoLegalMoves { side: self.side });
        }

        let report = self.search(board)?;
        let mv = report
            .outcome
            .best_move()
            .ok_or(StrategyError::NoLegalMoves { side: self.side })?;
        debug!(
            side = %self.side,
            %mv,
            score = ?report.outcome.score(),
            nodes = report.stats.nodes,
            depth = report.stats.depth_reached,
            "minimax move"
        );
        Ok(mv)
    }
}
