pub mod ai;
pub mod game;
pub mod session;

use gloo_timers::future::TimeoutFuture;
use serde::Serialize;
use serde_wasm_bindgen::{from_value, to_value, Serializer};
use std::str::FromStr;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;
use web_sys::js_sys::Promise;

pub use ai::{
    build_strategy, decide, minimax, terminal_score, AgentConfig, AgentDecision, Evaluation,
    GreedyStrategy, HumanStrategy, MinimaxStrategy, MoveStrategy, RandomStrategy, SearchOutcome,
    SearchReport, SearchStats, StrategyError, StrategyKind, SEARCH_DEPTH,
};
pub use game::{
    Board, BoardError, Cell, Move, Placement, ReversiBoard, Scores, Side, DEFAULT_BOARD_SIZE,
    MAX_BOARD_SIZE, MIN_BOARD_SIZE,
};
pub use session::{play_game, GameEvent, GameRecord, SessionError};

#[cfg(all(feature = "wee_alloc", target_arch = "wasm32"))]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn start() {
    set_panic_hook();
    web_sys::console::log_1(&"reversi agents loaded".into());
}

fn board_to_js_error(error: BoardError) -> JsValue {
    to_value(&error).unwrap_or_else(|serialize_err| JsValue::from_str(&serialize_err.to_string()))
}

fn display_to_js_error<E: std::fmt::Display>(error: E) -> JsValue {
    JsValue::from_str(&error.to_string())
}

fn parse_side(side: &str) -> Result<Side, JsValue> {
    Side::from_str(side).map_err(|_| JsValue::from_str(&format!("unknown side '{side}'")))
}

fn parse_strategy(strategy: Option<&str>) -> Result<StrategyKind, JsValue> {
    match strategy {
        None => Ok(StrategyKind::Minimax),
        Some(value) => StrategyKind::from_str(value)
            .map_err(|_| JsValue::from_str(&format!("unknown strategy '{value}'"))),
    }
}

fn parse_config(config_json: Option<&str>) -> Result<AgentConfig, JsValue> {
    match config_json {
        Some(json) => serde_json::from_str(json).map_err(display_to_js_error),
        None => Ok(AgentConfig::default()),
    }
}

/// Cells must stay `null` rather than `undefined` on the JS side.
fn board_to_js(board: &ReversiBoard) -> Result<JsValue, JsValue> {
    board
        .serialize(&Serializer::json_compatible())
        .map_err(JsValue::from)
}

fn board_from_js(state: JsValue) -> Result<ReversiBoard, JsValue> {
    let board: ReversiBoard = from_value(state).map_err(JsValue::from)?;
    board.validate().map_err(board_to_js_error)?;
    Ok(board)
}

#[derive(Serialize)]
struct AiMoveResponse {
    decision: AgentDecision,
    placement: Placement,
    scores: Scores,
    game_continues: bool,
}

/// A live board plus the agent configuration used for computer moves.
#[wasm_bindgen]
pub struct ReversiEngine {
    board: ReversiBoard,
    config: AgentConfig,
}

#[wasm_bindgen]
impl ReversiEngine {
    #[wasm_bindgen(constructor)]
    pub fn new(size: Option<usize>, config_json: Option<String>) -> Result<ReversiEngine, JsValue> {
        let board = ReversiBoard::new(size.unwrap_or(DEFAULT_BOARD_SIZE)).map_err(board_to_js_error)?;
        let config = parse_config(config_json.as_deref())?;
        Ok(ReversiEngine { board, config })
    }

    pub fn state_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.board).map_err(display_to_js_error)
    }

    pub fn set_state_json(&mut self, json: &str) -> Result<(), JsValue> {
        let board: ReversiBoard = serde_json::from_str(json).map_err(display_to_js_error)?;
        board.validate().map_err(board_to_js_error)?;
        self.board = board;
        Ok(())
    }

    pub fn valid_moves_json(&self, side: &str) -> Result<String, JsValue> {
        let side = parse_side(side)?;
        serde_json::to_string(&self.board.calc_valid_moves(side)).map_err(display_to_js_error)
    }

    pub fn scores_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.board.calc_scores()).map_err(display_to_js_error)
    }

    pub fn game_continues(&self) -> bool {
        self.board.game_continues()
    }

    pub fn render(&self) -> String {
        self.board.to_string()
    }

    pub fn apply_move(&mut self, side: &str, x: usize, y: usize) -> Result<String, JsValue> {
        let side = parse_side(side)?;
        let placement = self
            .board
            .make_move(side, Move::new(x, y))
            .map_err(board_to_js_error)?;
        serde_json::to_string(&placement).map_err(display_to_js_error)
    }

    pub fn apply_ai_move(&mut self, side: &str, strategy: Option<String>) -> Result<String, JsValue> {
        let side = parse_side(side)?;
        let kind = parse_strategy(strategy.as_deref())?;

        let decision = decide(kind, side, &self.board, &self.config).map_err(display_to_js_error)?;
        let placement = self
            .board
            .make_move(side, decision.mv)
            .map_err(board_to_js_error)?;

        let response = AiMoveResponse {
            decision,
            placement,
            scores: self.board.calc_scores(),
            game_continues: self.board.game_continues(),
        };
        serde_json::to_string(&response).map_err(display_to_js_error)
    }

    /// Resolves to an `AgentDecision` JSON string after `delay_ms`. The board is not changed.
    pub fn think_ai(&self, side: String, strategy: Option<String>, delay_ms: Option<u32>) -> Promise {
        let board = self.board.clone();
        let config = self.config.clone();
        let delay = delay_ms.unwrap_or(0);

        future_to_promise(async move {
            let side = parse_side(&side)?;
            let kind = parse_strategy(strategy.as_deref())?;
            if delay > 0 {
                TimeoutFuture::new(delay).await;
            }
            let decision = decide(kind, side, &board, &config).map_err(display_to_js_error)?;
            let json = serde_json::to_string(&decision).map_err(display_to_js_error)?;
            Ok(JsValue::from_str(&json))
        })
    }
}

/// Returns a fresh board with the four centre pieces placed.
#[wasm_bindgen(js_name = "createBoard")]
pub fn create_board(size: Option<usize>) -> Result<JsValue, JsValue> {
    let board = ReversiBoard::new(size.unwrap_or(DEFAULT_BOARD_SIZE)).map_err(board_to_js_error)?;
    board_to_js(&board)
}

#[wasm_bindgen(js_name = "validateBoard")]
pub fn validate_board(state: JsValue) -> Result<(), JsValue> {
    board_from_js(state).map(|_| ())
}

#[wasm_bindgen(js_name = "computeMove")]
pub fn compute_move(
    state: JsValue,
    side: String,
    strategy: Option<String>,
    config_json: Option<String>,
) -> Result<JsValue, JsValue> {
    let board = board_from_js(state)?;
    let side = parse_side(&side)?;
    let kind = parse_strategy(strategy.as_deref())?;
    let config = parse_config(config_json.as_deref())?;
    let decision = decide(kind, side, &board, &config).map_err(display_to_js_error)?;
    to_value(&decision).map_err(JsValue::from)
}

#[cfg(feature = "console_error_panic_hook")]
fn set_panic_hook() {
    console_error_panic_hook::set_once();
}

#[cfg(not(feature = "console_error_panic_hook"))]
fn set_panic_hook() {}
