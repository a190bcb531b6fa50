//! Errors returned by the rules engine and by players.

use crate::types::{Condition, Mark, Move};

/// Error that can occur when applying a move or asking a player for one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum GameError {
    /// The move addresses a cell that is already occupied.
    #[display("Cell {} is already occupied", _0)]
    IllegalMove(#[error(not(source))] Move),

    /// The game already reached a terminal condition.
    #[display("Game is already over ({})", _0)]
    GameOver(#[error(not(source))] Condition),

    /// The player did not produce a move before its deadline.
    #[display("Deadline exceeded before a move was produced")]
    DeadlineExceeded,

    /// The mark is not the one due to move on this board.
    #[display("It's not {}'s turn", _0)]
    WrongTurn(#[error(not(source))] Mark),

    /// The index does not address a cell (0-8).
    #[display("Position {} out of bounds (must be 0-8)", _0)]
    OutOfBounds(#[error(not(source))] usize),

    /// The input source feeding a player was closed.
    #[display("Player input closed")]
    InputClosed,
}

impl GameError {
    /// Returns true for errors the orchestrator handles by asking again.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            GameError::IllegalMove(_) | GameError::WrongTurn(_) | GameError::OutOfBounds(_)
        )
    }
}
