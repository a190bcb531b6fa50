//! Tests for orchestrating full games between players.

use std::time::Duration;
use timed_tictactoe::{
    Board, Condition, GameError, GameEvent, HumanPlayer, Mark, MatchSettings, Move,
    Orchestrator, Outcome, Player, RandomPlayer, ThinkTime, TimeoutPolicy,
};
use tokio::sync::mpsc;
use tokio::time::Instant;

/// Never answers before its deadline.
struct Stalling;

#[async_trait::async_trait]
impl Player for Stalling {
    fn name(&self) -> &str {
        "Stalling"
    }

    async fn play(&mut self, _board: &Board, _mark: Mark, _deadline: Instant) -> Result<Move, GameError> {
        std::future::pending().await
    }
}

/// Always answers the same cell.
struct Stubborn(Move);

#[async_trait::async_trait]
impl Player for Stubborn {
    fn name(&self) -> &str {
        "Stubborn"
    }

    async fn play(&mut self, _board: &Board, _mark: Mark, _deadline: Instant) -> Result<Move, GameError> {
        Ok(self.0)
    }
}

/// Stalls a fixed number of times, then plays the first free cell.
struct SlowStarter {
    stalls: u32,
}

#[async_trait::async_trait]
impl Player for SlowStarter {
    fn name(&self) -> &str {
        "Slow Starter"
    }

    async fn play(&mut self, board: &Board, _mark: Mark, _deadline: Instant) -> Result<Move, GameError> {
        if self.stalls > 0 {
            self.stalls -= 1;
            std::future::pending::<()>().await;
        }
        board.legal_moves().first().copied().ok_or(GameError::DeadlineExceeded)
    }
}

fn random(seed: u64) -> Box<dyn Player> {
    Box::new(RandomPlayer::with_seed(seed).with_think_time(ThinkTime::instant()))
}

fn settings(policy: TimeoutPolicy) -> MatchSettings {
    MatchSettings::new(Duration::from_secs(1), policy, 3)
}

#[tokio::test(start_paused = true)]
async fn test_random_players_finish() {
    for seed in 0..20 {
        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        let mut orchestrator = Orchestrator::new(
            random(seed),
            random(seed + 100),
            settings(TimeoutPolicy::Abort),
            event_tx,
        );

        let record = orchestrator.run().await.expect("game completes");

        let Outcome::Finished(condition) = *record.outcome() else {
            panic!("random players never forfeit");
        };
        assert!(condition.is_terminal());
        assert_eq!(record.final_board().condition(), condition);
        assert_eq!(record.boards().len(), record.moves().len() + 1);
        assert_eq!(record.boards()[0], Board::new());

        // Marks alternate starting with X, and every board is balanced.
        for (turn, (before, after)) in record
            .boards()
            .iter()
            .zip(record.boards().iter().skip(1))
            .enumerate()
        {
            let mark = if turn % 2 == 0 { Mark::X } else { Mark::O };
            assert_eq!(after.count(mark), before.count(mark) + 1);
            assert!(after.is_consistent());
        }

        let mut last = None;
        while let Ok(event) = event_rx.try_recv() {
            last = Some(event);
        }
        assert_eq!(last, Some(GameEvent::GameOver(*record.outcome())));
    }
}

#[tokio::test(start_paused = true)]
async fn test_default_think_time_respects_turn_timeout() {
    let (event_tx, _event_rx) = mpsc::unbounded_channel();
    let mut orchestrator = Orchestrator::new(
        Box::new(RandomPlayer::with_seed(1)),
        Box::new(RandomPlayer::with_seed(2)),
        MatchSettings::new(Duration::from_millis(1_500), TimeoutPolicy::Abort, 1),
        event_tx,
    );
    let record = orchestrator.run().await.expect("no player times out");
    assert!(matches!(record.outcome(), Outcome::Finished(_)));
}

#[tokio::test(start_paused = true)]
async fn test_forfeit_on_timeout() {
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let mut orchestrator = Orchestrator::new(
        random(1),
        Box::new(Stalling),
        settings(TimeoutPolicy::Forfeit),
        event_tx,
    );

    let record = orchestrator.run().await.expect("forfeit is an outcome");

    assert_eq!(*record.outcome(), Outcome::Forfeit { loser: Mark::O });
    assert_eq!(record.outcome().winner(), Some(Mark::X));
    assert_eq!(record.moves().len(), 1);

    let mut timed_out = false;
    while let Ok(event) = event_rx.try_recv() {
        timed_out |= event == GameEvent::TimedOut { mark: Mark::O };
    }
    assert!(timed_out);
}

#[tokio::test(start_paused = true)]
async fn test_abort_on_timeout() {
    let (event_tx, _event_rx) = mpsc::unbounded_channel();
    let mut orchestrator = Orchestrator::new(
        Box::new(Stalling),
        random(1),
        settings(TimeoutPolicy::Abort),
        event_tx,
    );
    assert_eq!(orchestrator.run().await, Err(GameError::DeadlineExceeded));
}

#[tokio::test(start_paused = true)]
async fn test_retry_on_timeout() {
    let (event_tx, _event_rx) = mpsc::unbounded_channel();
    let mut orchestrator = Orchestrator::new(
        Box::new(SlowStarter { stalls: 2 }),
        random(3),
        settings(TimeoutPolicy::Retry),
        event_tx,
    );
    let record = orchestrator.run().await.expect("third attempt succeeds");
    assert_eq!(record.moves()[0], Move::new(0).unwrap());
}

#[tokio::test(start_paused = true)]
async fn test_retry_gives_up_after_max_attempts() {
    let (event_tx, _event_rx) = mpsc::unbounded_channel();
    let mut orchestrator = Orchestrator::new(
        Box::new(SlowStarter { stalls: 3 }),
        random(3),
        settings(TimeoutPolicy::Retry),
        event_tx,
    );
    assert_eq!(orchestrator.run().await, Err(GameError::DeadlineExceeded));
}

#[tokio::test(start_paused = true)]
async fn test_illegal_moves_reprompt_then_disqualify() {
    let center = Move::new(4).unwrap();
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let mut orchestrator = Orchestrator::new(
        Box::new(Stubborn(center)),
        Box::new(Stubborn(center)),
        settings(TimeoutPolicy::Forfeit),
        event_tx,
    );

    let record = orchestrator.run().await.expect("illegal play ends in an outcome");
    assert_eq!(*record.outcome(), Outcome::Disqualified { loser: Mark::O });
    assert_eq!(record.outcome().winner(), Some(Mark::X));
    assert_eq!(record.moves(), &vec![center]);

    let rejections = std::iter::from_fn(|| event_rx.try_recv().ok())
        .filter(|event| matches!(event, GameEvent::MoveRejected { mark: Mark::O, .. }))
        .count();
    assert_eq!(rejections, 3);
}

#[tokio::test(start_paused = true)]
async fn test_human_scripted_game() {
    let (input_tx, input_rx) = mpsc::unbounded_channel();
    let (o_tx, o_rx) = mpsc::unbounded_channel();
    let (event_tx, _event_rx) = mpsc::unbounded_channel();

    // X: 1 2 3 (top row), O: 5 9. Cells are 1-based.
    for line in ["1", "2", "3"] {
        input_tx.send(line.to_string()).unwrap();
    }
    for line in ["5", "9"] {
        o_tx.send(line.to_string()).unwrap();
    }

    let mut orchestrator = Orchestrator::new(
        Box::new(HumanPlayer::new("Alice", input_rx)),
        Box::new(HumanPlayer::new("Bob", o_rx)),
        settings(TimeoutPolicy::Abort),
        event_tx,
    );

    let record = orchestrator.run().await.expect("scripted game completes");
    assert_eq!(*record.outcome(), Outcome::Finished(Condition::XWon));
    let played: Vec<usize> = record.moves().iter().map(|mv| mv.index()).collect();
    assert_eq!(played, vec![0, 4, 1, 8, 2]);
    assert_eq!(orchestrator.player(Mark::X).name(), "Alice");
}

#[tokio::test(start_paused = true)]
async fn test_closed_input_ends_game_with_error() {
    let (input_tx, input_rx) = mpsc::unbounded_channel::<String>();
    drop(input_tx);
    let (event_tx, _event_rx) = mpsc::unbounded_channel();
    let mut orchestrator = Orchestrator::new(
        Box::new(HumanPlayer::new("Alice", input_rx)),
        random(1),
        settings(TimeoutPolicy::Forfeit),
        event_tx,
    );
    assert_eq!(orchestrator.run().await, Err(GameError::InputClosed));
}

#[tokio::test(start_paused = true)]
async fn test_record_serializes() {
    let (event_tx, _event_rx) = mpsc::unbounded_channel();
    let mut orchestrator =
        Orchestrator::new(random(7), random(8), settings(TimeoutPolicy::Abort), event_tx);
    let record = orchestrator.run().await.unwrap();

    let json = serde_json::to_string(&record).unwrap();
    let back: timed_tictactoe::GameRecord = serde_json::from_str(&json).unwrap();
    assert_eq!(back, record);
}
