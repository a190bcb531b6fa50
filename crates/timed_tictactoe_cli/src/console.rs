//! Plain-text rendering of game events and routing of typed input.

use std::collections::HashMap;
use timed_tictactoe::{GameEvent, Mark, Player};
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Routes stdin lines to human players and prints game events.
pub struct Console {
    human_inputs: HashMap<Mark, mpsc::UnboundedSender<String>>,
    turn: Option<Mark>,
}

impl Console {
    /// Creates a console for the given human input channels.
    pub fn new(human_inputs: HashMap<Mark, mpsc::UnboundedSender<String>>) -> Self {
        Self {
            human_inputs,
            turn: None,
        }
    }

    /// Returns true if any seat is played from the keyboard.
    pub fn has_humans(&self) -> bool {
        !self.human_inputs.is_empty()
    }

    /// Formats the line introducing a player.
    pub fn introduce(mark: Mark, player: &dyn Player) -> String {
        match player.illustration() {
            Some(illustration) => {
                format!("{} ({}) [{}]", player.name(), mark, illustration.image())
            }
            None => format!("{} ({})", player.name(), mark),
        }
    }

    /// Renders one event as text, or `None` if it has nothing to show.
    pub fn render(&mut self, event: &GameEvent) -> Option<String> {
        match event {
            GameEvent::TurnStarted { mark, name } => {
                self.turn = Some(*mark);
                self.human_inputs
                    .contains_key(mark)
                    .then(|| format!("{} ({}), pick a cell 1-9:", name, mark))
            }
            GameEvent::MoveMade { mark, name, mv } => {
                Some(format!("{} ({}) plays cell {}", name, mark, mv.index() + 1))
            }
            GameEvent::BoardChanged(board) => Some(format!("\n{}\n", board)),
            GameEvent::MoveRejected { mark, reason } => {
                Some(format!("Move by {} rejected: {}", mark, reason))
            }
            GameEvent::TimedOut { mark } => Some(format!("{} ran out of time", mark)),
            GameEvent::GameOver(outcome) => {
                self.turn = None;
                Some(format!("Game over: {}", outcome))
            }
        }
    }

    /// Sends a typed line to the human whose turn it is.
    pub fn route(&self, line: String) {
        let Some(tx) = self.turn.and_then(|mark| self.human_inputs.get(&mark)) else {
            debug!(input = %line.trim(), "Input outside a human turn ignored");
            return;
        };
        if tx.send(line).is_err() {
            warn!("Human player no longer listening");
        }
    }

    /// Prints events and routes input until the game is over.
    pub async fn run(
        mut self,
        mut event_rx: mpsc::UnboundedReceiver<GameEvent>,
        mut line_rx: mpsc::UnboundedReceiver<String>,
    ) {
        loop {
            tokio::select! {
                event = event_rx.recv() => {
                    let Some(event) = event else { break };
                    if let Some(text) = self.render(&event) {
                        println!("{}", text);
                    }
                    if matches!(event, GameEvent::GameOver(_)) {
                        break;
                    }
                }
                Some(line) = line_rx.recv() => self.route(line),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use timed_tictactoe::{Board, Move, Outcome, Condition};

    #[test]
    fn test_render_move_is_one_based() {
        let mut console = Console::new(HashMap::new());
        let event = GameEvent::MoveMade {
            mark: Mark::X,
            name: "Random Player".to_string(),
            mv: Move::new(0).unwrap(),
        };
        assert_eq!(
            console.render(&event).as_deref(),
            Some("Random Player (X) plays cell 1")
        );
        let over = GameEvent::GameOver(Outcome::Finished(Condition::Draw));
        assert_eq!(console.render(&over).as_deref(), Some("Game over: draw"));
        assert!(console.render(&GameEvent::BoardChanged(Board::new())).is_some());
    }

    #[test]
    fn test_routes_only_during_human_turn() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut console = Console::new(HashMap::from([(Mark::O, tx)]));

        console.route("1".to_string());
        assert!(rx.try_recv().is_err());

        let prompt = console.render(&GameEvent::TurnStarted {
            mark: Mark::X,
            name: "Bot".to_string(),
        });
        assert!(prompt.is_none());
        console.route("2".to_string());
        assert!(rx.try_recv().is_err());

        let prompt = console.render(&GameEvent::TurnStarted {
            mark: Mark::O,
            name: "Alice".to_string(),
        });
        assert_eq!(prompt.as_deref(), Some("Alice (O), pick a cell 1-9:"));
        console.route("3".to_string());
        assert_eq!(rx.try_recv().ok().as_deref(), Some("3"));
    }
}
