use std::str::FromStr;

use derive_more::Display;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::greedy::GreedyStrategy;
use super::human::HumanStrategy;
use super::minimax::{MinimaxStrategy, SEARCH_DEPTH};
use super::random::RandomStrategy;
use super::strategy::{MoveStrategy, StrategyError};
use crate::game::{Board, Move, Side};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Display)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    #[display("random")]
    Random,
    #[display("greedy")]
    Greedy,
    #[display("minimax")]
    Minimax,
    #[display("human")]
    Human,
}

impl FromStr for StrategyKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "random" | "rand" => Ok(StrategyKind::Random),
            "greedy" => Ok(StrategyKind::Greedy),
            "minimax" | "ai" => Ok(StrategyKind::Minimax),
            "human" | "person" => Ok(StrategyKind::Human),
            _ => Err(()),
        }
    }
}

fn default_depth() -> u8 {
    SEARCH_DEPTH
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AgentConfig {
    #[serde(default = "default_depth")]
    pub depth: u8,
    /// Side minimax maximizes for. Defaults to the side it plays.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximizer: Option<Side>,
    /// Fixed seed for the random strategy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl AgentConfig {
    pub fn with_depth(mut self, depth: u8) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_maximizer(mut self, maximizer: Side) -> Self {
        self.maximizer = Some(maximizer);
        self
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            depth: SEARCH_DEPTH,
            maximizer: None,
            seed: None,
        }
    }
}

/// A chosen move with whatever the strategy learned while choosing it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AgentDecision {
    pub side: Side,
    pub strategy: StrategyKind,
    pub mv: Move,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evaluation: Option<i32>,
    pub nodes: u64,
    pub depth_reached: u8,
}

fn random_strategy(side: Side, config: &AgentConfig) -> RandomStrategy {
    match config.seed {
        Some(seed) => RandomStrategy::with_seed(side, seed),
        None => RandomStrategy::new(side),
    }
}

/// Builds a boxed strategy for `side`. `Human` reads from stdin.
pub fn build_strategy<B: Board + 'static>(
    kind: StrategyKind,
    side: Side,
    config: &AgentConfig,
) -> Box<dyn MoveStrategy<B>> {
    match kind {
        StrategyKind::Random => Box::new(random_strategy(side, config)),
        StrategyKind::Greedy => Box::new(GreedyStrategy::new(side)),
        StrategyKind::Minimax => Box::new(MinimaxStrategy::from_config(side, config)),
        StrategyKind::Human => Box::new(HumanStrategy::stdio(side)),
    }
}

/// Picks a move for `side` and reports how it was found. Interactive
/// strategies are rejected.
pub fn decide<B: Board>(
    kind: StrategyKind,
    side: Side,
    board: &B,
    config: &AgentConfig,
) -> Result<AgentDecision, StrategyError> {
    let decision = match kind {
        StrategyKind::Random => {
            let mv = random_strategy(side, config).get_move(board)?;
            AgentDecision {
                side,
                strategy: kind,
                mv,
                evaluation: None,
                nodes: 1,
                depth_reached: 1,
            }
        }
        StrategyKind::Greedy => {
            let (mv, score) = GreedyStrategy::new(side).best_move(board)?;
            AgentDecision {
                side,
                strategy: kind,
                mv,
                evaluation: Some(score as i32),
                nodes: board.calc_valid_moves(side).len() as u64,
                depth_reached: 1,
            }
        }
        StrategyKind::Minimax => {
            if board.calc_valid_moves(side).is_empty() {
                return Err(StrategyError::NoLegalMoves { side });
            }
            let report = MinimaxStrategy::from_config(side, config).search(board)?;
            let mv = report
                .outcome
                .best_move()
                .ok_or(StrategyError::NoLegalMoves { side })?;
            AgentDecision {
                side,
                strategy: kind,
                mv,
                evaluation: report.outcome.score(),
                nodes: report.stats.nodes,
                depth_reached: report.stats.depth_reached,
            }
        }
        StrategyKind::Human => return Err(StrategyError::Unsupported { kind }),
    };

    debug!(side = %side, strategy = %kind, mv = %decision.mv, "decision made");
    Ok(decision)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::ReversiBoard;

    #[test]
    fn strategy_names_parse_with_aliases() {
        assert_eq!("Random".parse::<StrategyKind>(), Ok(StrategyKind::Random));
        assert_eq!("rand".parse::<StrategyKind>(), Ok(StrategyKind::Random));
        assert_eq!("ai".parse::<StrategyKind>(), Ok(StrategyKind::Minimax));
        assert_eq!("person".parse::<StrategyKind>(), Ok(StrategyKind::Human));
        assert!("alphabeta".parse::<StrategyKind>().is_err());
        assert_eq!(StrategyKind::Greedy.to_string(), "greedy");
    }

    #[test]
    fn display_names_round_trip_through_from_str() {
        for kind in [
            StrategyKind::Random,
            StrategyKind::Greedy,
            StrategyKind::Minimax,
            StrategyKind::Human,
        ] {
            assert_eq!(kind.to_string().parse::<StrategyKind>(), Ok(kind));
        }
    }

    #[test]
    fn config_fills_missing_fields_from_defaults() {
        let config: AgentConfig = serde_json::from_str(r#"{ "seed": 9 }"#).expect("valid json");
        assert_eq!(config.depth, SEARCH_DEPTH);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.maximizer, None);

        let config: AgentConfig =
            serde_json::from_str(r#"{ "depth": 2, "maximizer": "O" }"#).expect("valid json");
        assert_eq!(config, AgentConfig::default().with_depth(2).with_maximizer(Side::O));
    }

    #[test]
    fn built_strategies_report_their_kind_and_side() {
        let config = AgentConfig::default().with_seed(3);
        for kind in [StrategyKind::Random, StrategyKind::Greedy, StrategyKind::Minimax] {
            let strategy = build_strategy::<ReversiBoard>(kind, Side::O, &config);
            assert_eq!(strategy.kind(), kind);
            assert_eq!(strategy.side(), Side::O);
        }
    }

    #[test]
    fn minimax_decision_carries_search_stats() {
        let board = ReversiBoard::new(4).expect("4x4 is supported");
        let config = AgentConfig::default().with_depth(3);
        let decision =
            decide(StrategyKind::Minimax, Side::X, &board, &config).expect("X can move");

        assert!(board.calc_valid_moves(Side::X).contains(&decision.mv));
        assert_eq!(decision.depth_reached, 3);
        assert!(decision.nodes > 1);
        assert!(decision.evaluation.is_some());
    }

    #[test]
    fn greedy_decision_reports_resulting_score() {
        let board = ReversiBoard::new(8).expect("8x8 is supported");
        let decision = decide(StrategyKind::Greedy, Side::X, &board, &AgentConfig::default())
            .expect("X can move");
        assert_eq!(decision.evaluation, Some(4));
        assert_eq!(decision.nodes, 4);
    }

    #[test]
    fn human_is_not_decidable() {
        let board = ReversiBoard::new(4).expect("4x4 is supported");
        let err = decide(StrategyKind::Human, Side::X, &board, &AgentConfig::default())
            .expect_err("human needs a prompt");
        assert!(matches!(err, StrategyError::Unsupported { kind: StrategyKind::Human }));
        assert_eq!(err.to_string(), "human strategy is not available here");
    }
}
