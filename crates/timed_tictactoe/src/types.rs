//! Core domain types for tic-tac-toe.

use crate::error::GameError;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Mark placed by a player.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
)]
pub enum Mark {
    /// Mark X (moves first).
    X,
    /// Mark O (moves second).
    O,
}

impl Mark {
    /// Returns the opposing mark.
    pub fn opponent(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }
}

/// A square on the tic-tac-toe board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Square {
    /// Empty square.
    #[default]
    Empty,
    /// Square occupied by a mark.
    Occupied(Mark),
}

impl Square {
    /// Returns the mark in this square, if any.
    pub fn mark(self) -> Option<Mark> {
        match self {
            Square::Empty => None,
            Square::Occupied(mark) => Some(mark),
        }
    }
}

impl std::fmt::Display for Square {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Square::Empty => write!(f, " "),
            Square::Occupied(mark) => write!(f, "{}", mark),
        }
    }
}

/// A cell index on the board (0-8, row-major).
///
/// A `Move` can only be built from an index in range, so every value
/// addresses a real cell. Whether the cell is free is a question for
/// the board it is applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct Move(u8);

impl Move {
    /// All 9 cells in row-major order.
    pub const ALL: [Move; 9] = [
        Move(0),
        Move(1),
        Move(2),
        Move(3),
        Move(4),
        Move(5),
        Move(6),
        Move(7),
        Move(8),
    ];

    /// Creates a move from a board index.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::OutOfBounds`] if `index` is greater than 8.
    #[instrument]
    pub fn new(index: usize) -> Result<Self, GameError> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or(GameError::OutOfBounds(index))
    }

    /// Creates a move from a row and column (each 0-2).
    pub fn at(row: usize, col: usize) -> Result<Self, GameError> {
        if row >= 3 || col >= 3 {
            return Err(GameError::OutOfBounds(row * 3 + col));
        }
        Self::new(row * 3 + col)
    }

    /// Returns the board index (0-8).
    pub fn index(self) -> usize {
        usize::from(self.0)
    }

    /// Returns the row (0-2).
    pub fn row(self) -> usize {
        self.index() / 3
    }

    /// Returns the column (0-2).
    pub fn col(self) -> usize {
        self.index() % 3
    }
}

impl TryFrom<usize> for Move {
    type Error = GameError;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        Self::new(index)
    }
}

impl From<Move> for usize {
    fn from(mv: Move) -> Self {
        mv.index()
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Terminal or ongoing condition of a board.
///
/// Always derived from board contents, never stored.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
pub enum Condition {
    /// The game is still in progress.
    #[display("in progress")]
    NotEnd,
    /// X owns a full line.
    #[display("X won")]
    XWon,
    /// O owns a full line.
    #[display("O won")]
    OWon,
    /// The board is full and nobody owns a line.
    #[display("draw")]
    Draw,
}

impl Condition {
    /// Returns the winning condition for `mark`.
    pub fn won_by(mark: Mark) -> Self {
        match mark {
            Mark::X => Condition::XWon,
            Mark::O => Condition::OWon,
        }
    }

    /// Returns true once no further moves are accepted.
    pub fn is_terminal(self) -> bool {
        self != Condition::NotEnd
    }

    /// Returns the winning mark, if any.
    pub fn winner(self) -> Option<Mark> {
        match self {
            Condition::XWon => Some(Mark::X),
            Condition::OWon => Some(Mark::O),
            Condition::NotEnd | Condition::Draw => None,
        }
    }
}
