//! Game orchestration between players.

use crate::board::Board;
use crate::error::GameError;
use crate::player::{Player, play_with_deadline};
use crate::types::{Condition, Mark, Move};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, info, instrument, warn};

/// What to do when a player misses its deadline.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TimeoutPolicy {
    /// The late player loses the game.
    #[default]
    Forfeit,
    /// Ask the same player again with a fresh deadline.
    Retry,
    /// Stop the game and return the error.
    Abort,
}

/// Match rules applied by the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchSettings {
    /// Time each player gets per request.
    #[serde(rename = "turn_timeout_ms", with = "millis")]
    turn_timeout: Duration,
    /// Policy for missed deadlines.
    timeout_policy: TimeoutPolicy,
    /// Requests per turn before giving up on a player.
    max_attempts: u32,
}

impl MatchSettings {
    /// Creates match settings.
    pub fn new(turn_timeout: Duration, timeout_policy: TimeoutPolicy, max_attempts: u32) -> Self {
        Self {
            turn_timeout,
            timeout_policy,
            max_attempts: max_attempts.max(1),
        }
    }
}

impl Default for MatchSettings {
    fn default() -> Self {
        Self::new(Duration::from_secs(5), TimeoutPolicy::Forfeit, 3)
    }
}

mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}

/// How a game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// The board reached a terminal condition.
    Finished(Condition),
    /// A player missed its deadline and lost.
    Forfeit {
        /// The mark that forfeited.
        loser: Mark,
    },
    /// A player kept sending rejected moves and lost.
    Disqualified {
        /// The mark that was disqualified.
        loser: Mark,
    },
}

impl Outcome {
    /// Returns the winner if there is one.
    pub fn winner(&self) -> Option<Mark> {
        match self {
            Outcome::Finished(condition) => condition.winner(),
            Outcome::Forfeit { loser } | Outcome::Disqualified { loser } => {
                Some(loser.opponent())
            }
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Finished(condition) => write!(f, "{}", condition),
            Outcome::Forfeit { loser } => {
                write!(f, "{} won ({} forfeited on time)", loser.opponent(), loser)
            }
            Outcome::Disqualified { loser } => {
                write!(f, "{} won ({} disqualified for illegal moves)", loser.opponent(), loser)
            }
        }
    }
}

/// Messages sent from orchestrator to UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    /// A player was asked for a move.
    TurnStarted {
        /// Mark to play.
        mark: Mark,
        /// Player name.
        name: String,
    },
    /// A move was applied.
    MoveMade {
        /// Mark played.
        mark: Mark,
        /// Player name.
        name: String,
        /// Cell played.
        mv: Move,
    },
    /// Board after a move.
    BoardChanged(Board),
    /// A move was refused and the player is asked again.
    MoveRejected {
        /// Mark whose move was refused.
        mark: Mark,
        /// Why.
        reason: GameError,
    },
    /// A player missed its deadline.
    TimedOut {
        /// Mark that timed out.
        mark: Mark,
    },
    /// Game ended.
    GameOver(Outcome),
}

/// Every position of a finished game.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct GameRecord {
    /// Boards from empty to final, one per applied move plus the start.
    boards: Vec<Board>,
    /// Applied moves in order.
    moves: Vec<Move>,
    /// How the game ended.
    outcome: Outcome,
}

impl GameRecord {
    /// Returns the last board.
    pub fn final_board(&self) -> Board {
        self.boards.last().copied().unwrap_or_default()
    }
}

/// Result of one turn.
enum Turn {
    Played(Move),
    Lost(Outcome),
}

/// Orchestrates gameplay between two players.
pub struct Orchestrator {
    player_x: Box<dyn Player>,
    player_o: Box<dyn Player>,
    settings: MatchSettings,
    event_tx: mpsc::UnboundedSender<GameEvent>,
}

impl Orchestrator {
    /// Creates a new orchestrator.
    pub fn new(
        player_x: Box<dyn Player>,
        player_o: Box<dyn Player>,
        settings: MatchSettings,
        event_tx: mpsc::UnboundedSender<GameEvent>,
    ) -> Self {
        Self {
            player_x,
            player_o,
            settings,
            event_tx,
        }
    }

    /// Returns the player holding `mark`.
    pub fn player(&self, mark: Mark) -> &dyn Player {
        match mark {
            Mark::X => self.player_x.as_ref(),
            Mark::O => self.player_o.as_ref(),
        }
    }

    fn player_mut(&mut self, mark: Mark) -> &mut dyn Player {
        match mark {
            Mark::X => self.player_x.as_mut(),
            Mark::O => self.player_o.as_mut(),
        }
    }

    /// Sends an event; a UI that stopped listening does not stop the game.
    fn emit(&self, event: GameEvent) {
        if self.event_tx.send(event).is_err() {
            debug!("Event receiver dropped");
        }
    }

    /// Runs one game from an empty board to its outcome.
    ///
    /// # Errors
    ///
    /// Returns the player's error when it cannot be handled by the
    /// match settings: input closed, a missed deadline under
    /// [`TimeoutPolicy::Abort`], or too many missed deadlines under
    /// [`TimeoutPolicy::Retry`]. Rejected moves never end the game with an
    /// error; a player out of attempts loses by [`Outcome::Disqualified`].
    #[instrument(skip(self), fields(x = %self.player_x.name(), o = %self.player_o.name()))]
    pub async fn run(&mut self) -> Result<GameRecord, GameError> {
        info!("Starting game orchestration");

        let mut board = Board::new();
        let mut boards = vec![board];
        let mut moves = Vec::new();

        let outcome = loop {
            let Some(mark) = board.to_move() else {
                break Outcome::Finished(board.condition());
            };

            match self.take_turn(&board, mark).await? {
                Turn::Played(mv) => {
                    board = board.apply(mv, mark)?;
                    boards.push(board);
                    moves.push(mv);
                    let name = self.player(mark).name().to_string();
                    self.emit(GameEvent::MoveMade { mark, name, mv });
                    self.emit(GameEvent::BoardChanged(board));
                }
                Turn::Lost(outcome) => break outcome,
            }
        };

        info!(%outcome, moves = moves.len(), "Game over");
        self.emit(GameEvent::GameOver(outcome));
        Ok(GameRecord {
            boards,
            moves,
            outcome,
        })
    }

    /// Asks the player holding `mark` for a move, applying the match settings.
    ///
    /// Returns [`Turn::Lost`] when the player forfeits on time or runs out
    /// of attempts with rejected moves.
    async fn take_turn(&mut self, board: &Board, mark: Mark) -> Result<Turn, GameError> {
        let settings = self.settings;
        let name = self.player(mark).name().to_string();
        let mut attempt = 0;

        loop {
            attempt += 1;
            self.emit(GameEvent::TurnStarted {
                mark,
                name: name.clone(),
            });
            debug!(player = %name, %mark, attempt, "Waiting for move");

            let deadline = Instant::now() + settings.turn_timeout;
            let result = play_with_deadline(self.player_mut(mark), board, mark, deadline).await;

            let error = match result {
                Ok(mv) => return Ok(Turn::Played(mv)),
                Err(error) => error,
            };

            let retry = match error {
                GameError::DeadlineExceeded => {
                    warn!(player = %name, %mark, "Player missed deadline");
                    self.emit(GameEvent::TimedOut { mark });
                    match settings.timeout_policy {
                        TimeoutPolicy::Forfeit => {
                            return Ok(Turn::Lost(Outcome::Forfeit { loser: mark }));
                        }
                        TimeoutPolicy::Retry => true,
                        TimeoutPolicy::Abort => false,
                    }
                }
                ref e if e.is_recoverable() => {
                    warn!(player = %name, %mark, error = %e, "Move rejected");
                    self.emit(GameEvent::MoveRejected {
                        mark,
                        reason: error,
                    });
                    if attempt >= settings.max_attempts {
                        warn!(player = %name, %mark, attempt, "Out of attempts, disqualified");
                        return Ok(Turn::Lost(Outcome::Disqualified { loser: mark }));
                    }
                    true
                }
                _ => false,
            };

            if !retry || attempt >= settings.max_attempts {
                return Err(error);
            }
        }
    }
}
