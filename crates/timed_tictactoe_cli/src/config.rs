//! Match configuration loaded from TOML and command-line overrides.

use crate::cli::PlayArgs;
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use timed_tictactoe::{MatchSettings, ThinkTime};
use tracing::{debug, info, instrument};

/// Kind of player seated at a mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PlayerKind {
    /// Reference random player.
    #[default]
    Random,
    /// Human typing cell numbers on stdin.
    Human,
}

/// Configuration for one seat.
#[derive(Debug, Clone, Default, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Which player implementation to use.
    kind: PlayerKind,
    /// Display name; the player's own default when absent.
    name: Option<String>,
    /// Seed for random players; seeded from the OS when absent.
    seed: Option<u64>,
    /// Thinking budget for random players, in milliseconds.
    think_ms: Option<u64>,
    /// Margin kept before the deadline by random players, in milliseconds.
    margin_ms: Option<u64>,
}

impl PlayerConfig {
    /// Creates a seat of the given kind with default options.
    pub fn of_kind(kind: PlayerKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    /// Returns the think time, filling gaps with the player default.
    pub fn think_time(&self) -> ThinkTime {
        let default = ThinkTime::default();
        ThinkTime::new(
            self.think_ms
                .map(Duration::from_millis)
                .unwrap_or(default.budget()),
            self.margin_ms
                .map(Duration::from_millis)
                .unwrap_or(default.margin()),
        )
    }
}

/// Full configuration of a match.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Match rules.
    settings: MatchSettings,
    /// Player holding X.
    player_x: PlayerConfig,
    /// Player holding O.
    player_o: PlayerConfig,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            settings: MatchSettings::new(
                Duration::from_secs(60),
                timed_tictactoe::TimeoutPolicy::Forfeit,
                3,
            ),
            player_x: PlayerConfig::of_kind(PlayerKind::Human),
            player_o: PlayerConfig::of_kind(PlayerKind::Random),
        }
    }
}

impl MatchConfig {
    /// Loads configuration from TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(ConfigStage::Read, e))?;

        let config = Self::from_toml(&content)?;
        info!(
            x = ?config.player_x.kind,
            o = ?config.player_o.kind,
            "Config loaded successfully"
        );
        Ok(config)
    }

    /// Parses configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::new(ConfigStage::Parse, e))
    }

    /// Renders configuration as TOML text.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self)
            .map_err(|e| ConfigError::new(ConfigStage::Render, e))
    }

    /// Loads the file named by `args`, or defaults, then applies flag overrides.
    #[instrument(skip(args))]
    pub fn resolve(args: &PlayArgs) -> Result<Self, ConfigError> {
        let mut config = match args.config.as_deref() {
            Some(path) => Self::from_file(path)?,
            None => {
                debug!("No config file given, using defaults");
                Self::default()
            }
        };
        config.apply_overrides(args);
        Ok(config)
    }

    /// Applies command-line flags on top of file values.
    pub fn apply_overrides(&mut self, args: &PlayArgs) {
        if let Some(kind) = args.x {
            self.player_x.kind = kind;
        }
        if let Some(kind) = args.o {
            self.player_o.kind = kind;
        }
        if let Some(seed) = args.seed {
            self.player_x.seed = Some(seed);
            self.player_o.seed = Some(seed.wrapping_add(1));
        }

        let turn_timeout = args
            .turn_timeout_ms
            .map(Duration::from_millis)
            .unwrap_or(*self.settings.turn_timeout());
        let policy = args.policy.unwrap_or(*self.settings.timeout_policy());
        self.settings = MatchSettings::new(turn_timeout, policy, *self.settings.max_attempts());
    }
}

/// Step of config handling that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ConfigStage {
    /// Reading the file from disk.
    #[display("read")]
    Read,
    /// Parsing TOML into a match config.
    #[display("parse")]
    Parse,
    /// Rendering a match config as TOML.
    #[display("render")]
    Render,
}

/// Match configuration error, tagged with where it was raised.
#[derive(Debug, Clone, Display, Error)]
#[display("Config {} failed: {} ({}:{})", stage, message, file, line)]
pub struct ConfigError {
    /// Failed step.
    pub stage: ConfigStage,
    /// Underlying cause.
    pub message: String,
    /// Line that raised the error.
    pub line: u32,
    /// File that raised the error.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates an error for `stage`, recording the caller's location.
    #[track_caller]
    pub fn new(stage: ConfigStage, cause: impl std::fmt::Display) -> Self {
        let location = std::panic::Location::caller();
        Self {
            stage,
            message: cause.to_string(),
            line: location.line(),
            file: location.file(),
        }
    }
}
