//! The 3x3 board and move application.

use crate::error::GameError;
use crate::rules;
use crate::types::{Condition, Mark, Move, Square};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// 3x3 tic-tac-toe board.
///
/// Boards are values: [`Board::apply`] returns a new board and leaves the
/// original untouched, so earlier positions of a game stay inspectable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Board {
    /// Squares in row-major order (0-8).
    squares: [Square; 9],
}

impl Board {
    /// Creates a new empty board.
    pub fn new() -> Self {
        Self {
            squares: [Square::Empty; 9],
        }
    }

    /// Creates a board from arbitrary squares.
    ///
    /// The position is not validated; see [`Board::is_consistent`].
    pub fn from_squares(squares: [Square; 9]) -> Self {
        Self { squares }
    }

    /// Returns all squares in row-major order.
    pub fn squares(&self) -> &[Square; 9] {
        &self.squares
    }

    /// Gets the square addressed by `mv`.
    pub fn get(&self, mv: Move) -> Square {
        self.squares[mv.index()]
    }

    /// Checks if the square addressed by `mv` is empty.
    pub fn is_empty(&self, mv: Move) -> bool {
        self.get(mv) == Square::Empty
    }

    /// Counts the squares holding `mark`.
    pub fn count(&self, mark: Mark) -> usize {
        self.squares
            .iter()
            .filter(|s| **s == Square::Occupied(mark))
            .count()
    }

    /// Checks if the board is full.
    pub fn is_full(&self) -> bool {
        rules::is_full(self)
    }

    /// Returns true if X has as many marks as O or exactly one more.
    ///
    /// Holds for every board reached through [`Board::apply`].
    pub fn is_consistent(&self) -> bool {
        let (x, o) = (self.count(Mark::X), self.count(Mark::O));
        x == o || x == o + 1
    }

    /// Derives the current condition from the board contents.
    pub fn condition(&self) -> Condition {
        rules::condition(self)
    }

    /// Returns the mark due to move, or `None` once the game is over.
    ///
    /// X moves whenever both marks have the same count.
    pub fn to_move(&self) -> Option<Mark> {
        if self.condition().is_terminal() {
            return None;
        }
        if self.count(Mark::X) == self.count(Mark::O) {
            Some(Mark::X)
        } else {
            Some(Mark::O)
        }
    }

    /// Returns every empty cell, or nothing once the game is over.
    #[instrument(skip(self))]
    pub fn legal_moves(&self) -> Vec<Move> {
        if self.condition().is_terminal() {
            return Vec::new();
        }
        Move::ALL
            .iter()
            .copied()
            .filter(|mv| self.is_empty(*mv))
            .collect()
    }

    /// Places `mark` on the cell addressed by `mv` and returns the new board.
    ///
    /// # Errors
    ///
    /// - [`GameError::GameOver`] if the board is already terminal.
    /// - [`GameError::IllegalMove`] if the cell is occupied.
    /// - [`GameError::WrongTurn`] if `mark` is not the mark due to move.
    #[instrument(skip_all, fields(position = %mv, mark = %mark))]
    pub fn apply(&self, mv: Move, mark: Mark) -> Result<Board, GameError> {
        let condition = self.condition();
        if condition.is_terminal() {
            return Err(GameError::GameOver(condition));
        }

        if !self.is_empty(mv) {
            return Err(GameError::IllegalMove(mv));
        }

        if self.to_move() != Some(mark) {
            return Err(GameError::WrongTurn(mark));
        }

        let mut next = *self;
        next.squares[mv.index()] = Square::Occupied(mark);
        debug!(condition = %next.condition(), "Move applied");
        Ok(next)
    }

    /// Formats the board as a human-readable string.
    ///
    /// Empty cells show their 1-based number so they can be typed in.
    pub fn display(&self) -> String {
        let mut result = String::new();
        for row in 0..3 {
            for col in 0..3 {
                let pos = row * 3 + col;
                let symbol = match self.squares[pos] {
                    Square::Empty => (pos + 1).to_string(),
                    Square::Occupied(mark) => mark.to_string(),
                };
                result.push_str(&symbol);
                if col < 2 {
                    result.push('|');
                }
            }
            if row < 2 {
                result.push_str("\n-+-+-\n");
            }
        }
        result
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display())
    }
}
