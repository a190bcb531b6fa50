//! Win detection logic for tic-tac-toe.

use crate::board::Board;
use crate::types::{Mark, Move};
use tracing::instrument;

/// The 8 winning lines as board indices.
pub const LINES: [[usize; 3]; 8] = [
    // Rows
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    // Columns
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    // Diagonals
    [0, 4, 8],
    [2, 4, 6],
];

/// Returns the owner of `line`, if all three cells hold the same mark.
fn line_owner(board: &Board, line: [usize; 3]) -> Option<Mark> {
    let squares = board.squares();
    let [a, b, c] = line;
    let mark = squares[a].mark()?;
    (squares[b].mark() == Some(mark) && squares[c].mark() == Some(mark)).then_some(mark)
}

/// Checks if there is a winner on the board.
///
/// Returns `Some(mark)` if a mark owns a full line, `None` otherwise.
/// Lines owned by both marks at once cannot arise from legal play; debug
/// builds assert against it and release builds report the first line in
/// scan order.
#[instrument(skip(board))]
pub fn winner(board: &Board) -> Option<Mark> {
    let mut owners = LINES.iter().filter_map(|&line| line_owner(board, line));
    let first = owners.next()?;
    debug_assert!(
        owners.all(|other| other == first),
        "both marks own a winning line"
    );
    Some(first)
}

/// Returns the first fully owned line, if any.
#[instrument(skip(board))]
pub fn winning_line(board: &Board) -> Option<[Move; 3]> {
    LINES
        .iter()
        .find(|&&line| line_owner(board, line).is_some())
        .map(|&line| line.map(|index| Move::ALL[index]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Square;

    fn board_with(mark: Mark, cells: &[usize]) -> Board {
        let mut squares = [Square::Empty; 9];
        for &cell in cells {
            squares[cell] = Square::Occupied(mark);
        }
        Board::from_squares(squares)
    }

    #[test]
    fn test_no_winner_empty_board() {
        assert_eq!(winner(&Board::new()), None);
        assert_eq!(winning_line(&Board::new()), None);
    }

    #[test]
    fn test_winner_top_row() {
        let board = board_with(Mark::X, &[0, 1, 2]);
        assert_eq!(winner(&board), Some(Mark::X));
    }

    #[test]
    fn test_winner_diagonal() {
        let board = board_with(Mark::O, &[2, 4, 6]);
        assert_eq!(winner(&board), Some(Mark::O));
        let line = winning_line(&board).map(|l| l.map(Move::index));
        assert_eq!(line, Some([2, 4, 6]));
    }

    #[test]
    fn test_winner_column() {
        let board = board_with(Mark::X, &[1, 4, 7]);
        assert_eq!(winner(&board), Some(Mark::X));
    }

    #[test]
    fn test_no_winner_incomplete() {
        let board = board_with(Mark::X, &[0, 1, 5]);
        assert_eq!(winner(&board), None);
    }
}
