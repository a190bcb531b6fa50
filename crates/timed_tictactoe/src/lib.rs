//! Timed tic-tac-toe - rules engine and pluggable players
//!
//! A 3x3 board that enforces move legality and reports its condition, plus
//! a contract for players (human or automated) that must answer before a
//! deadline.
//!
//! # Architecture
//!
//! - **Board**: immutable 3x3 grid; [`Board::apply`] returns a new board
//! - **Rules**: win/draw detection deriving a [`Condition`]
//! - **Player**: async [`Player`] trait, called through [`play_with_deadline`]
//! - **Orchestrator**: alternates two players until the game ends
//!
//! # Example
//!
//! ```no_run
//! use timed_tictactoe::{MatchSettings, Orchestrator, RandomPlayer};
//!
//! # async fn example() -> Result<(), timed_tictactoe::GameError> {
//! let (event_tx, _event_rx) = tokio::sync::mpsc::unbounded_channel();
//! let mut orchestrator = Orchestrator::new(
//!     Box::new(RandomPlayer::new()),
//!     Box::new(RandomPlayer::new()),
//!     MatchSettings::default(),
//!     event_tx,
//! );
//! let record = orchestrator.run().await?;
//! println!("{}", record.outcome());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod board;
mod error;
mod orchestrator;
mod player;
mod players;
mod types;

pub mod rules;

// Crate-level exports - Game types
pub use board::Board;
pub use types::{Condition, Mark, Move, Square};

// Crate-level exports - Errors
pub use error::GameError;

// Crate-level exports - Player contract
pub use player::{HasIllustration, Player, play_with_deadline};
pub use players::{HumanPlayer, RandomPlayer, ThinkTime};

// Crate-level exports - Orchestration
pub use orchestrator::{GameEvent, GameRecord, MatchSettings, Orchestrator, Outcome, TimeoutPolicy};
