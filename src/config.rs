//! Match configuration loaded from TOML.
//!
//! ```toml
//! rows = 6
//! cols = 9
//! players = ["greedy", "random"]
//! max_chain_steps = 10000
//! max_moves = 2000
//! seed = 42
//! ```
//!
//! Every field is optional; missing fields take the defaults above (with no
//! fixed seed).

use std::path::Path;

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::bot::Strategy;
use crate::game::{Board, BATCH_MAX_STEPS, MAX_PLAYERS, MIN_PLAYERS};
use crate::tournament::TournamentConfig;

/// Configuration error.
#[derive(Debug, Display, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[display("Failed to read config {path}: {source}")]
    Io {
        /// Path that failed.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The file is not valid TOML for [`MatchConfig`].
    #[display("Failed to parse config {path}: {source}")]
    Parse {
        /// Path that failed.
        path: String,
        /// Underlying parse error.
        source: toml::de::Error,
    },
    /// The values parse but describe an impossible match.
    #[display("Invalid config: {reason}")]
    Invalid {
        /// What is wrong.
        reason: String,
    },
}

/// Settings for a match or tournament.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MatchConfig {
    /// Board rows (3..=20).
    pub rows: u8,
    /// Board columns (3..=20).
    pub cols: u8,
    /// Strategy for each seat, players numbered from 1.
    pub players: Vec<Strategy>,
    /// Chain step cap per move.
    pub max_chain_steps: usize,
    /// Moves before the game is declared a draw.
    pub max_moves: u32,
    /// Fixed seed; random when absent.
    pub seed: Option<u64>,
}

impl Default for MatchConfig {
    fn default() -> Self {
        let tournament = TournamentConfig::default();
        Self {
            rows: tournament.rows,
            cols: tournament.cols,
            players: vec![Strategy::Greedy, Strategy::Random],
            max_chain_steps: BATCH_MAX_STEPS,
            max_moves: tournament.max_moves,
            seed: None,
        }
    }
}

impl MatchConfig {
    /// Load and validate a config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    #[instrument]
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config: Self = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        config.validate()?;
        debug!(?config, "loaded match config");
        Ok(config)
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Err(e) = Board::new(self.rows, self.cols) {
            return Err(ConfigError::Invalid {
                reason: e.to_string(),
            });
        }
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&self.players.len()) {
            return Err(ConfigError::Invalid {
                reason: format!(
                    "{} players configured (must be {MIN_PLAYERS}..={MAX_PLAYERS})",
                    self.players.len()
                ),
            });
        }
        if self.max_chain_steps == 0 {
            return Err(ConfigError::Invalid {
                reason: "max_chain_steps must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// The tournament settings this config describes.
    #[must_use]
    pub fn tournament(&self) -> TournamentConfig {
        TournamentConfig {
            rows: self.rows,
            cols: self.cols,
            max_chain_steps: self.max_chain_steps,
            max_moves: self.max_moves,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(MatchConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: MatchConfig =
            toml::from_str("rows = 8\nplayers = [\"random\", \"random\", \"greedy\"]")
                .unwrap();
        assert_eq!(config.rows, 8);
        assert_eq!(config.cols, 9);
        assert_eq!(
            config.players,
            vec![Strategy::Random, Strategy::Random, Strategy::Greedy]
        );
        assert_eq!(config.max_chain_steps, BATCH_MAX_STEPS);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(toml::from_str::<MatchConfig>("colour = \"red\"").is_err());
    }

    #[test]
    fn test_invalid_values() {
        let config = MatchConfig {
            rows: 30,
            ..MatchConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { .. })));

        let config = MatchConfig {
            players: vec![Strategy::Greedy],
            ..MatchConfig::default()
        };
        assert!(config.validate().is_err());

        let config = MatchConfig {
            max_chain_steps: 0,
            ..MatchConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_tournament_conversion() {
        let config = MatchConfig {
            rows: 5,
            cols: 7,
            max_moves: 99,
            ..MatchConfig::default()
        };
        let t = config.tournament();
        assert_eq!((t.rows, t.cols, t.max_moves), (5, 7, 99));
    }
}
