//! Command-line interface for timed_tictactoe.

use crate::config::PlayerKind;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use timed_tictactoe::TimeoutPolicy;

/// Timed Tic-Tac-Toe - pit players against each other under a deadline
#[derive(Parser, Debug)]
#[command(name = "timed_tictactoe")]
#[command(about = "Tic-tac-toe matches between deadline-bound players", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play one game in the terminal
    Play(PlayArgs),

    /// Print the default match configuration as TOML
    PrintConfig,
}

/// Options for a single game.
#[derive(Args, Debug, Clone)]
pub struct PlayArgs {
    /// Path to a TOML match configuration
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Player holding X
    #[arg(long, value_enum)]
    pub x: Option<PlayerKind>,

    /// Player holding O
    #[arg(long, value_enum)]
    pub o: Option<PlayerKind>,

    /// Seed for random players (O uses seed + 1)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Time each player gets per move, in milliseconds
    #[arg(long)]
    pub turn_timeout_ms: Option<u64>,

    /// What happens when a player misses its deadline (forfeit, retry, abort)
    #[arg(long)]
    pub policy: Option<TimeoutPolicy>,

    /// Print the game record as JSON when the game ends
    #[arg(long)]
    pub json: bool,
}
