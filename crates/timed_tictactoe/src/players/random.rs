//! Reference player that picks a random legal cell.

use crate::board::Board;
use crate::error::GameError;
use crate::player::{HasIllustration, Player};
use crate::types::{Mark, Move};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, instrument};

const GOPHERS: [&str; 3] = [
    "https://raw.githubusercontent.com/zayac/tictactoe/master/player/random/gopher-0.png",
    "https://raw.githubusercontent.com/zayac/tictactoe/master/player/random/gopher-1.png",
    "https://raw.githubusercontent.com/zayac/tictactoe/master/player/random/gopher-2.png",
];

/// How long a player pretends to think before answering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThinkTime {
    budget: Duration,
    margin: Duration,
}

impl ThinkTime {
    /// Creates a think time of `budget`, ending at least `margin` before the deadline.
    pub fn new(budget: Duration, margin: Duration) -> Self {
        Self { budget, margin }
    }

    /// Answers as soon as the move is chosen.
    pub fn instant() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    /// Returns the thinking budget.
    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// Returns the safety margin kept before the deadline.
    pub fn margin(&self) -> Duration {
        self.margin
    }

    /// Returns when thinking should stop for a call made at `now`.
    ///
    /// Never later than `deadline - margin`, never earlier than `now`.
    pub fn stop_at(&self, now: Instant, deadline: Instant) -> Instant {
        let latest = deadline.checked_sub(self.margin).unwrap_or(now);
        (now + self.budget).min(latest).max(now)
    }
}

impl Default for ThinkTime {
    fn default() -> Self {
        Self::new(Duration::from_secs(2), Duration::from_secs(1))
    }
}

/// A random player of tic-tac-toe.
#[derive(Debug)]
pub struct RandomPlayer {
    name: String,
    rng: StdRng,
    image: &'static str,
    think: ThinkTime,
}

impl RandomPlayer {
    /// Creates a random player seeded from the operating system.
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_os_rng())
    }

    /// Creates a random player with a deterministic seed.
    #[instrument]
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(mut rng: StdRng) -> Self {
        let image = GOPHERS[rng.random_range(0..GOPHERS.len())];
        Self {
            name: "Random Player".to_string(),
            rng,
            image,
            think: ThinkTime::default(),
        }
    }

    /// Replaces the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Replaces the think time.
    pub fn with_think_time(mut self, think: ThinkTime) -> Self {
        self.think = think;
        self
    }

    /// Returns the think time.
    pub fn think_time(&self) -> ThinkTime {
        self.think
    }
}

impl Default for RandomPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl HasIllustration for RandomPlayer {
    fn image(&self) -> &str {
        self.image
    }
}

#[async_trait::async_trait]
impl Player for RandomPlayer {
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

        let now = Instant::now();
        if now >= deadline {
            return Err(GameError::DeadlineExceeded);
        }
        let stop_thinking = self.think.stop_at(now, deadline);

        // Non-terminal boards always have an empty cell.
        let legal = board.legal_moves();
        let mv = *legal
            .choose(&mut self.rng)
            .ok_or(GameError::GameOver(condition))?;
        debug!(position = %mv, options = legal.len(), "Random move chosen");

        // Pretend to keep thinking.
        tokio::time::sleep_until(stop_thinking).await;

        Ok(mv)
    }

    fn illustration(&self) -> Option<&dyn HasIllustration> {
        Some(self)
    }
}
