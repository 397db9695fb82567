use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::rules::BoardError;

pub const DEFAULT_BOARD_SIZE: usize = 8;
pub const MIN_BOARD_SIZE: usize = 4;
pub const MAX_BOARD_SIZE: usize = 16;

/// One of the two players. X moves first.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Display)]
pub enum Side {
    #[display("X")]
    X,
    #[display("O")]
    O,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::X => Side::O,
            Side::O => Side::X,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Side::X => 'X',
            Side::O => 'O',
        }
    }
}

impl FromStr for Side {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "x" => Ok(Side::X),
            "o" => Ok(Side::O),
            _ => Err(()),
        }
    }
}

/// A zero-based board coordinate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Display)]
#[display("({x}, {y})")]
pub struct Move {
    pub x: usize,
    pub y: usize,
}

impl Move {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// Serialized as `null`, `"X"` or `"O"`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(from = "Option<Side>", into = "Option<Side>")]
pub enum Cell {
    #[default]
    Empty,
    Taken(Side),
}

impl Cell {
    pub fn side(self) -> Option<Side> {
        match self {
            Cell::Empty => None,
            Cell::Taken(side) => Some(side),
        }
    }
}

impl From<Option<Side>> for Cell {
    fn from(value: Option<Side>) -> Self {
        value.map_or(Cell::Empty, Cell::Taken)
    }
}

impl From<Cell> for Option<Side> {
    fn from(cell: Cell) -> Self {
        cell.side()
    }
}

/// Piece counts per side.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Scores {
    pub x: u32,
    pub o: u32,
}

impl Scores {
    pub fn get(&self, side: Side) -> u32 {
        match side {
            Side::X => self.x,
            Side::O => self.o,
        }
    }

    /// The side with strictly more pieces, `None` on a tie.
    pub fn leader(&self) -> Option<Side> {
        match self.x.cmp(&self.o) {
            std::cmp::Ordering::Greater => Some(Side::X),
            std::cmp::Ordering::Less => Some(Side::O),
            std::cmp::Ordering::Equal => None,
        }
    }
}

/// Square Reversi grid. Cells are stored row-major by `y`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReversiBoard {
    pub size: usize,
    pub cells: Vec<Cell>,
}

impl ReversiBoard {
    /// Creates a board with the four centre pieces placed.
    pub fn new(size: usize) -> Result<Self, BoardError> {
        if !Self::size_supported(size) {
            return Err(BoardError::InvalidSize { size });
        }
        Ok(Self::opening(size))
    }

    fn opening(size: usize) -> Self {
        let mut board = Self {
            size,
            cells: vec![Cell::Empty; size * size],
        };
        let m = size / 2;
        board.set(Move::new(m - 1, m - 1), Cell::Taken(Side::X));
        board.set(Move::new(m, m), Cell::Taken(Side::X));
        board.set(Move::new(m - 1, m), Cell::Taken(Side::O));
        board.set(Move::new(m, m - 1), Cell::Taken(Side::O));
        board
    }

    pub fn empty(size: usize) -> Result<Self, BoardError> {
        if !Self::size_supported(size) {
            return Err(BoardError::InvalidSize { size });
        }
        Ok(Self {
            size,
            cells: vec![Cell::Empty; size * size],
        })
    }

    /// Builds a board from text rows. `X`/`O` are pieces, anything else is empty.
    /// Row `i` of the input is `y == i`.
    pub fn from_rows(rows: &[&str]) -> Result<Self, BoardError> {
        let mut board = Self::empty(rows.len())?;
        for (y, row) in rows.iter().enumerate() {
            let symbols: Vec<char> = row.chars().filter(|c| !c.is_whitespace()).collect();
            if symbols.len() != board.size {
                return Err(BoardError::CellCountMismatch {
                    expected: board.size,
                    actual: symbols.len(),
                });
            }
            for (x, symbol) in symbols.into_iter().enumerate() {
                let cell = match symbol.to_ascii_uppercase() {
                    'X' => Cell::Taken(Side::X),
                    'O' => Cell::Taken(Side::O),
                    _ => Cell::Empty,
                };
                board.set(Move::new(x, y), cell);
            }
        }
        Ok(board)
    }

    pub fn sample() -> Self {
        Self::opening(DEFAULT_BOARD_SIZE)
    }

    fn size_supported(size: usize) -> bool {
        size % 2 == 0 && (MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&size)
    }

    pub fn in_bounds(&self, x: usize, y: usize) -> bool {
        x < self.size && y < self.size
    }

    pub fn get(&self, mv: Move) -> Cell {
        if !self.in_bounds(mv.x, mv.y) {
            return Cell::Empty;
        }
        self.cells[mv.y * self.size + mv.x]
    }

    pub(crate) fn set(&mut self, mv: Move, cell: Cell) {
        let size = self.size;
        self.cells[mv.y * size + mv.x] = cell;
    }

    pub fn count(&self, side: Side) -> u32 {
        self.cells
            .iter()
            .filter(|cell| **cell == Cell::Taken(side))
            .count() as u32
    }

    /// Checks a deserialized board for a supported size and a matching cell count.
    pub fn validate(&self) -> Result<(), BoardError> {
        if !Self::size_supported(self.size) {
            return Err(BoardError::InvalidSize { size: self.size });
        }
        let expected = self.size * self.size;
        if self.cells.len() != expected {
            return Err(BoardError::CellCountMismatch {
                expected,
                actual: self.cells.len(),
            });
        }
        Ok(())
    }
}

impl Default for ReversiBoard {
    fn default() -> Self {
        Self::sample()
    }
}

impl fmt::Display for ReversiBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  ")?;
        for x in 0..self.size {
            write!(f, "{:>2}", x + 1)?;
        }
        writeln!(f)?;
        for y in 0..self.size {
            write!(f, "{:>2}", y + 1)?;
            for x in 0..self.size {
                let symbol = match self.get(Move::new(x, y)) {
                    Cell::Empty => '.',
                    Cell::Taken(side) => side.symbol(),
                };
                write!(f, " {symbol}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
