use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};

use super::state::{Cell, Move, ReversiBoard, Scores, Side};

const DIRECTIONS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Display, Error)]
#[serde(tag = "type")]
pub enum BoardError {
    #[display("move ({x}, {y}) is outside a {size}x{size} board")]
    OutOfBounds { x: usize, y: usize, size: usize },
    #[display("cell ({x}, {y}) is already occupied")]
    Occupied { x: usize, y: usize },
    #[display("move ({x}, {y}) does not flank any opponent piece")]
    NoFlips { x: usize, y: usize },
    #[display("unsupported board size {size}")]
    InvalidSize { size: usize },
    #[display("expected {expected} cells, found {actual}")]
    CellCountMismatch { expected: usize, actual: usize },
}

/// What the move-selection strategies need from a board.
///
/// `make_move` hands back an undo record, and `undo_move` must restore the
/// exact prior position so a search can walk sibling branches on one copy.
pub trait Board: Clone {
    type Undo;

    fn size(&self) -> usize;

    /// Legal moves for `side`, in a stable order (`x` outer, `y` inner).
    fn calc_valid_moves(&self, side: Side) -> Vec<Move>;

    fn is_valid_move(&self, side: Side, mv: Move) -> bool;

    fn make_move(&mut self, side: Side, mv: Move) -> Result<Self::Undo, BoardError>;

    fn undo_move(&mut self, undo: Self::Undo);

    fn calc_scores(&self) -> Scores;

    /// False once neither side has a legal move.
    fn game_continues(&self) -> bool {
        !self.calc_valid_moves(Side::X).is_empty() || !self.calc_valid_moves(Side::O).is_empty()
    }
}

/// A piece placed by `make_move` together with every piece it flipped.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Placement {
    pub side: Side,
    pub mv: Move,
    pub flipped: Vec<Move>,
}

impl ReversiBoard {
    fn step(&self, from: Move, dx: isize, dy: isize) -> Option<Move> {
        let x = from.x.checked_add_signed(dx)?;
        let y = from.y.checked_add_signed(dy)?;
        self.in_bounds(x, y).then_some(Move::new(x, y))
    }

    /// Opponent pieces bracketed between `mv` and another `side` piece along one direction.
    fn run_in_direction(&self, side: Side, mv: Move, dx: isize, dy: isize) -> Vec<Move> {
        let opponent = Cell::Taken(side.opponent());
        let mut run = Vec::new();
        let mut cursor = self.step(mv, dx, dy);

        while let Some(pos) = cursor {
            match self.get(pos) {
                cell if cell == opponent => {
                    run.push(pos);
                    cursor = self.step(pos, dx, dy);
                }
                Cell::Taken(_) => return run,
                Cell::Empty => break,
            }
        }

        Vec::new()
    }

    /// Every piece `side` would flip by playing `mv`. Empty when the move is illegal.
    pub fn flips_for(&self, side: Side, mv: Move) -> Vec<Move> {
        if !self.in_bounds(mv.x, mv.y) || self.get(mv) != Cell::Empty {
            return Vec::new();
        }
        DIRECTIONS
            .iter()
            .flat_map(|&(dx, dy)| self.run_in_direction(side, mv, dx, dy))
            .collect()
    }
}

impl Board for ReversiBoard {
    type Undo = Placement;

    fn size(&self) -> usize {
        self.size
    }

    fn calc_valid_moves(&self, side: Side) -> Vec<Move> {
        let mut moves = Vec::new();
        for x in 0..self.size {
            for y in 0..self.size {
                let mv = Move::new(x, y);
                if self.is_valid_move(side, mv) {
                    moves.push(mv);
                }
            }
        }
        moves
    }

    fn is_valid_move(&self, side: Side, mv: Move) -> bool {
        if !self.in_bounds(mv.x, mv.y) || self.get(mv) != Cell::Empty {
            return false;
        }
        DIRECTIONS
            .iter()
            .any(|&(dx, dy)| !self.run_in_direction(side, mv, dx, dy).is_empty())
    }

    fn make_move(&mut self, side: Side, mv: Move) -> Result<Placement, BoardError> {
        if !self.in_bounds(mv.x, mv.y) {
            return Err(BoardError::OutOfBounds {
                x: mv.x,
                y: mv.y,
                size: self.size,
            });
        }
        if self.get(mv) != Cell::Empty {
            return Err(BoardError::Occupied { x: mv.x, y: mv.y });
        }

        let flipped = self.flips_for(side, mv);
        if flipped.is_empty() {
            return Err(BoardError::NoFlips { x: mv.x, y: mv.y });
        }

        self.set(mv, Cell::Taken(side));
        for pos in &flipped {
            self.set(*pos, Cell::Taken(side));
        }

        Ok(Placement { side, mv, flipped })
    }

    fn undo_move(&mut self, undo: Placement) {
        self.set(undo.mv, Cell::Empty);
        let restored = Cell::Taken(undo.side.opponent());
        for pos in undo.flipped {
            self.set(pos, restored);
        }
    }

    fn calc_scores(&self) -> Scores {
        Scores {
            x: self.count(Side::X),
            o: self.count(Side::O),
        }
    }
}
