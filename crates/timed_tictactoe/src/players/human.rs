//! Human player fed by lines of text.

use crate::board::Board;
use crate::error::GameError;
use crate::player::Player;
use crate::types::{Mark, Move};
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, instrument, warn};

/// Human player reading cell numbers from an input channel.
///
/// Cells are numbered 1-9, matching [`Board::display`]. Whatever feeds the
/// channel (a terminal, a test, a UI) is up to the caller.
pub struct HumanPlayer {
    name: String,
    input_rx: mpsc::UnboundedReceiver<String>,
}

impl HumanPlayer {
    /// Creates a new human player.
    pub fn new(name: impl Into<String>, input_rx: mpsc::UnboundedReceiver<String>) -> Self {
        Self {
            name: name.into(),
            input_rx,
        }
    }

    /// Parses a 1-based cell number.
    fn parse(line: &str) -> Option<Move> {
        let number: usize = line.trim().parse().ok()?;
        Move::new(number.checked_sub(1)?).ok()
    }
}

#[async_trait::async_trait]
impl Player for HumanPlayer {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(skip(self, board), fields(player = %self.name))]
    async fn play(
        &mut self,
        board: &Board,
        _mark: Mark,
        deadline: Instant,
    ) -> Result<Move, GameError> {
        let condition = board.condition();
        if condition.is_terminal() {
            return Err(GameError::GameOver(condition));
        }

        if Instant::now() >= deadline {
            return Err(GameError::DeadlineExceeded);
        }

        loop {
            let line = tokio::select! {
                biased;
                _ = tokio::time::sleep_until(deadline) => return Err(GameError::DeadlineExceeded),
                line = self.input_rx.recv() => line.ok_or(GameError::InputClosed)?,
            };

            match Self::parse(&line) {
                Some(mv) if board.is_empty(mv) => {
                    debug!(position = %mv, "Human chose cell");
                    return Ok(mv);
                }
                Some(mv) => warn!(position = %mv, "Cell already occupied, waiting for another"),
                None => warn!(input = %line.trim(), "Not a cell number (1-9)"),
            }
        }
    }
}
