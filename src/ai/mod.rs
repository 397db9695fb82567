//! Move-selection strategies.

pub mod agent;
pub mod greedy;
pub mod human;
pub mod minimax;
pub mod random;
pub mod strategy;

pub use agent::{build_strategy, decide, AgentConfig, AgentDecision, StrategyKind};
pub use greedy::GreedyStrategy;
pub use human::HumanStrategy;
pub use minimax::{
    minimax, terminal_score, Evaluation, MinimaxStrategy, SearchOutcome, SearchReport,
    SearchStats, SEARCH_DEPTH,
};
pub use random::RandomStrategy;
pub use strategy::{MoveStrategy, StrategyError};
