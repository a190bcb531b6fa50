//! Timed Tic-Tac-Toe - terminal match runner
//!
//! Seats two players from configuration and plays one game, printing the
//! board after every move.

#![warn(missing_docs)]

mod cli;
mod config;
mod console;
mod seats;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command, PlayArgs};
use config::MatchConfig;
use console::Console;
use seats::{Seat, build_seat};
use std::collections::HashMap;
use std::io::BufRead;
use timed_tictactoe::{Board, Mark, Orchestrator};
use tokio::sync::mpsc;
use tracing::{debug, info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    initialize_tracing();

    match cli.command {
        Command::Play(args) => run_play(args).await,
        Command::PrintConfig => print_config(),
    }
}

/// Logs go to stderr so they never mix with the board on stdout.
fn initialize_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,timed_tictactoe=info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Print the default configuration
fn print_config() -> Result<()> {
    print!("{}", MatchConfig::default().to_toml()?);
    Ok(())
}

/// Play one game
#[instrument(skip_all)]
async fn run_play(args: PlayArgs) -> Result<()> {
    let config = MatchConfig::resolve(&args)?;
    info!(settings = ?config.settings(), "Starting match");

    let Seat {
        player: player_x,
        input_tx: x_input,
    } = build_seat(config.player_x(), Mark::X);
    let Seat {
        player: player_o,
        input_tx: o_input,
    } = build_seat(config.player_o(), Mark::O);

    println!("{}", Console::introduce(Mark::X, player_x.as_ref()));
    println!("{}", Console::introduce(Mark::O, player_o.as_ref()));
    println!("\n{}\n", Board::new());

    let human_inputs: HashMap<Mark, mpsc::UnboundedSender<String>> =
        [(Mark::X, x_input), (Mark::O, o_input)]
            .into_iter()
            .filter_map(|(mark, tx)| tx.map(|tx| (mark, tx)))
            .collect();
    let console = Console::new(human_inputs);

    let (line_tx, line_rx) = mpsc::unbounded_channel();
    if console.has_humans() {
        spawn_stdin_reader(line_tx);
    }

    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let mut orchestrator = Orchestrator::new(player_x, player_o, *config.settings(), event_tx);
    let game = tokio::spawn(async move { orchestrator.run().await });

    console.run(event_rx, line_rx).await;
    let record = game.await??;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&record)?);
    }
    Ok(())
}

/// Forwards stdin lines from a plain thread.
///
/// A blocking read cannot be cancelled, so it lives outside the runtime and
/// dies with the process.
fn spawn_stdin_reader(line_tx: mpsc::UnboundedSender<String>) {
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if line_tx.send(line).is_err() {
                break;
            }
        }
        debug!("Stdin closed");
    });
}
