//! Player contract and deadline-aware invocation.

use crate::board::Board;
use crate::error::GameError;
use crate::types::{Mark, Move};
use tokio::time::Instant;
use tracing::{debug, instrument, warn};

/// Trait for players that can make moves.
///
/// Implementations range from humans typing cell numbers to automated
/// strategies. A player is asked for one move at a time and must answer
/// before the deadline it is given.
#[async_trait::async_trait]
pub trait Player: Send {
    /// Returns the player's display name.
    fn name(&self) -> &str;

    /// Chooses a move for `mark` on `board`.
    ///
    /// The board must not be terminal; implementations fail with
    /// [`GameError::GameOver`] otherwise. The call may take time to
    /// "think" but must return no later than `deadline`, failing with
    /// [`GameError::DeadlineExceeded`] if it cannot.
    async fn play(&mut self, board: &Board, mark: Mark, deadline: Instant)
    -> Result<Move, GameError>;

    /// Returns the player's illustration, if it has one.
    fn illustration(&self) -> Option<&dyn HasIllustration> {
        None
    }
}

/// Presentation-only capability: an image representing the player.
pub trait HasIllustration {
    /// Returns the image reference (a URL).
    fn image(&self) -> &str;
}

/// Asks `player` for a move and enforces the deadline.
///
/// Fails immediately if the deadline already passed or the board is
/// terminal. The player future is dropped when the deadline fires, so a
/// late answer is never returned. A move on an occupied cell is rejected.
#[instrument(skip(player, board), fields(player = %player.name()))]
pub async fn play_with_deadline<P>(
    player: &mut P,
    board: &Board,
    mark: Mark,
    deadline: Instant,
) -> Result<Move, GameError>
where
    P: Player + ?Sized,
{
    if Instant::now() >= deadline {
        warn!("Deadline already expired");
        return Err(GameError::DeadlineExceeded);
    }

    let condition = board.condition();
    if condition.is_terminal() {
        return Err(GameError::GameOver(condition));
    }

    let mv = match tokio::time::timeout_at(deadline, player.play(board, mark, deadline)).await {
        Ok(result) => result?,
        Err(_) => {
            warn!("Player did not answer before the deadline");
            return Err(GameError::DeadlineExceeded);
        }
    };

    if !board.is_empty(mv) {
        warn!(position = %mv, "Player chose an occupied cell");
        return Err(GameError::IllegalMove(mv));
    }

    debug!(position = %mv, "Player answered");
    Ok(mv)
}
