//! CLI command implementations for critmass.

pub(crate) mod chain;
pub(crate) mod run;
pub(crate) mod tournament;

mod output;

use std::fmt;
use std::path::PathBuf;

use clap::ValueEnum;
use critmass::bot::Strategy;
use critmass::config::{ConfigError, MatchConfig};
use critmass::tournament::TournamentError;
use critmass::EngineError;

/// Output format for the `run` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Output format for the `tournament` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum TournamentFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
    /// CSV format.
    Csv,
}

/// CLI error type.
#[derive(Debug)]
pub(crate) struct CliError {
    message: String,
}

impl CliError {
    /// Create a new CLI error.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<EngineError> for CliError {
    fn from(e: EngineError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<TournamentError> for CliError {
    fn from(e: TournamentError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::new(format!("JSON serialization failed: {e}"))
    }
}

/// Flags shared by `run` and `tournament` that override the config file.
#[derive(Debug, Clone, Default, clap::Args)]
pub(crate) struct MatchOverrides {
    /// TOML match config (flags below take precedence)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Board rows (3-20)
    #[arg(long)]
    rows: Option<u8>,

    /// Board columns (3-20)
    #[arg(long)]
    cols: Option<u8>,

    /// Random seed (default: config value, else random)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Strategy for each player, in seat order (2-4 entries)
    #[arg(short = 'p', long = "player", value_enum)]
    players: Vec<Strategy>,

    /// Moves before a game is called a draw
    #[arg(long)]
    max_moves: Option<u32>,
}

impl MatchOverrides {
    /// Load the config file (or defaults), apply flags and validate.
    pub(crate) fn resolve(&self) -> Result<MatchConfig, CliError> {
        let mut config = match &self.config {
            Some(path) => MatchConfig::load(path)?,
            None => MatchConfig::default(),
        };
        if let Some(rows) = self.rows {
            config.rows = rows;
        }
        if let Some(cols) = self.cols {
            config.cols = cols;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if !self.players.is_empty() {
            config.players.clone_from(&self.players);
        }
        if let Some(max_moves) = self.max_moves {
            config.max_moves = max_moves;
        }
        config.validate()?;
        Ok(config)
    }
}

/// Seed from the config, or from the clock.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn seed_or_random(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(|| {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(42)
    })
}
