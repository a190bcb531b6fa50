//! Game rules for tic-tac-toe.
//!
//! Pure functions for evaluating a board. Rules are kept apart from board
//! storage so the board can delegate to them and tests can exercise them
//! on arbitrary positions.

pub mod draw;
pub mod win;

pub use draw::is_full;
pub use win::{LINES, winner, winning_line};

use crate::board::Board;
use crate::types::Condition;
use tracing::instrument;

/// Derives the condition of a board.
///
/// A win is checked before a draw, so a full board with a completed line
/// reports the win.
#[instrument(skip(board))]
pub fn condition(board: &Board) -> Condition {
    if let Some(mark) = winner(board) {
        return Condition::won_by(mark);
    }
    if is_full(board) {
        Condition::Draw
    } else {
        Condition::NotEnd
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Mark, Square};

    const E: Square = Square::Empty;
    const X: Square = Square::Occupied(Mark::X);
    const O: Square = Square::Occupied(Mark::O);

    #[test]
    fn test_empty_board_not_end() {
        assert_eq!(condition(&Board::new()), Condition::NotEnd);
    }

    #[test]
    fn test_full_board_with_line_reports_win() {
        // X O X / O X O / O X X
        let board = Board::from_squares([X, O, X, O, X, O, O, X, X]);
        assert_eq!(condition(&board), Condition::XWon);
    }

    #[test]
    fn test_full_board_without_line_is_draw() {
        // X O X / X O O / O X X
        let board = Board::from_squares([X, O, X, X, O, O, O, X, X]);
        assert_eq!(condition(&board), Condition::Draw);
    }

    #[test]
    fn test_partial_board_not_end() {
        let board = Board::from_squares([X, O, E, E, X, E, E, E, O]);
        assert_eq!(condition(&board), Condition::NotEnd);
    }
}
