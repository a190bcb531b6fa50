//! Builds players from configuration.

use crate::config::{PlayerConfig, PlayerKind};
use timed_tictactoe::{HumanPlayer, Mark, Player, RandomPlayer};
use tokio::sync::mpsc;
use tracing::{info, instrument};

/// A player ready to seat, plus the input channel if it is human.
pub struct Seat {
    /// The player.
    pub player: Box<dyn Player>,
    /// Feeds typed lines to a human player.
    pub input_tx: Option<mpsc::UnboundedSender<String>>,
}

/// Builds the player described by `config` for `mark`.
#[instrument(skip(config), fields(kind = ?config.kind()))]
pub fn build_seat(config: &PlayerConfig, mark: Mark) -> Seat {
    match config.kind() {
        PlayerKind::Random => {
            let player = match config.seed() {
                Some(seed) => RandomPlayer::with_seed(*seed),
                None => RandomPlayer::new(),
            };
            let player = player.with_think_time(config.think_time());
            let player = match config.name() {
                Some(name) => player.with_name(name.clone()),
                None => player,
            };
            info!(%mark, name = %player.name(), "Seated random player");
            Seat {
                player: Box::new(player),
                input_tx: None,
            }
        }
        PlayerKind::Human => {
            let (input_tx, input_rx) = mpsc::unbounded_channel();
            let name = config
                .name()
                .clone()
                .unwrap_or_else(|| format!("Human {}", mark));
            info!(%mark, %name, "Seated human player");
            Seat {
                player: Box::new(HumanPlayer::new(name, input_rx)),
                input_tx: Some(input_tx),
            }
        }
    }
}
