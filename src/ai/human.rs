use std::io::{self, BufRead, Stdout, StdinLock, Write};

use tracing::debug;

use super::agent::StrategyKind;
use super::strategy::{MoveStrategy, StrategyError};
use crate::game::{Board, Move, Side};

/// Reads moves typed as two one-based digits, x first (`"35"` is `(2, 4)`).
///
/// Bad or illegal input is reported on `output` and the prompt repeats.
pub struct HumanStrategy<R, W> {
    side: Side,
    input: R,
    output: W,
}

impl HumanStrategy<StdinLock<'static>, Stdout> {
    pub fn stdio(side: Side) -> Self {
        Self::new(side, io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> HumanStrategy<R, W> {
    pub fn new(side: Side, input: R, output: W) -> Self {
        Self {
            side,
            input,
            output,
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

fn parse_move(line: &str, size: usize) -> Option<Move> {
    let line = line.trim().to_lowercase();
    let digits: Vec<usize> = line
        .chars()
        .map(|c| c.to_digit(10).map(|d| d as usize))
        .collect::<Option<_>>()?;

    match digits.as_slice() {
        &[x, y] if (1..=size).contains(&x) && (1..=size).contains(&y) => Some(Move::new(x - 1, y - 1)),
        _ => None,
    }
}

impl<B: Board, R: BufRead, W: Write> MoveStrategy<B> for HumanStrategy<R, W> {
    fn side(&self) -> Side {
        self.side
    }

    fn kind(&self) -> StrategyKind {
        StrategyKind::Human
    }

    fn get_move(&mut self, board: &B) -> Result<Move, StrategyError> {
        loop {
            write!(self.output, "{}, enter your move: ", self.side)?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Err(StrategyError::InputClosed);
            }

            match parse_move(&line, board.size()) {
                Some(mv) if board.is_valid_move(self.side, mv) => {
                    debug!(side = %self.side, %mv, "human move");
                    return Ok(mv);
                }
                Some(_) => writeln!(self.output, "Not a valid move.")?,
                None => writeln!(self.output, "Bad input. Type valid x digit, then the y digit.")?,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::ReversiBoard;
    use std::io::Cursor;

    fn human(input: &str) -> HumanStrategy<Cursor<Vec<u8>>, Vec<u8>> {
        HumanStrategy::new(Side::X, Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn parses_one_based_digits() {
        assert_eq!(parse_move("35\n", 8), Some(Move::new(2, 4)));
        assert_eq!(parse_move("  11 ", 4), Some(Move::new(0, 0)));
        assert_eq!(parse_move("09", 8), None);
        assert_eq!(parse_move("55", 4), None);
        assert_eq!(parse_move("3", 8), None);
        assert_eq!(parse_move("a5", 8), None);
        assert_eq!(parse_move("345", 8), None);
    }

    #[test]
    fn reprompts_until_a_legal_move() {
        let board = ReversiBoard::new(8).expect("8x8 is supported");
        let mut strategy = human("hello\n11\n35\n");

        let mv = strategy.get_move(&board).expect("third line is legal");
        assert_eq!(mv, Move::new(2, 4));

        let transcript = String::from_utf8(strategy.into_output()).expect("utf8 output");
        assert_eq!(transcript.matches("X, enter your move: ").count(), 3);
        assert!(transcript.contains("Bad input. Type valid x digit, then the y digit."));
        assert!(transcript.contains("Not a valid move."));
    }

    #[test]
    fn closed_input_is_an_error() {
        let board = ReversiBoard::new(4).expect("4x4 is supported");
        let mut strategy = human("99\n");
        let err = strategy
            .get_move(&board)
            .expect_err("input ends before a legal move");
        assert!(matches!(err, StrategyError::InputClosed));
    }
}
