//! Tournament runner for critmass games.
//!
//! Provides a pure function interface: `(seed, lineup) -> GameResult`
//!
//! The tournament runner handles:
//! - Seating 2-4 bots as players `1..=n`
//! - Driving `choose_move → apply` until the game ends or a cap is hit
//! - Running many independent games in parallel with rayon
//!
//! Parallelism is across games only. Each game is single-threaded and fully
//! deterministic for a given seed.

mod rng;

pub use rng::Rng;

use derive_more::{Display, Error};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::bot::{choose_move, Strategy};
use crate::error::EngineError;
use crate::game::{GameState, PlayerId, BATCH_MAX_STEPS, MAX_PLAYERS, MIN_PLAYERS};

/// Configuration for tournament games.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TournamentConfig {
    /// Board rows.
    pub rows: u8,
    /// Board columns.
    pub cols: u8,
    /// Chain step cap per move.
    pub max_chain_steps: usize,
    /// Moves before the game is declared a draw.
    pub max_moves: u32,
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self {
            rows: 6,
            cols: 9,
            max_chain_steps: BATCH_MAX_STEPS,
            max_moves: 2_000,
        }
    }
}

/// How a game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GameEnd {
    /// One player eliminated everyone else.
    Won,
    /// Every player lost their charge at once.
    Stalemate,
    /// `max_moves` reached without a winner.
    MoveLimit,
    /// A chain hit its step cap; the game is abandoned as a draw.
    ChainLimit,
}

/// Final result of a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameResult {
    /// The seed used for this game.
    pub seed: u64,
    /// The winning player (None for any kind of draw).
    pub winner: Option<PlayerId>,
    /// How the game ended.
    pub end: GameEnd,
    /// Total moves played.
    pub moves_played: u32,
    /// Elimination order (first eliminated is index 0).
    pub elimination_order: Vec<PlayerId>,
    /// Most rounds in any single chain reaction.
    pub longest_chain: usize,
    /// Chains that hit the step cap.
    pub safety_limit_hits: u32,
}

/// Error type for tournament operations.
#[derive(Debug, Clone, Display, Error)]
pub enum TournamentError {
    /// Not enough players (minimum 2).
    #[display("Too few players: {count} (minimum 2)")]
    TooFewPlayers {
        /// Players supplied.
        count: usize,
    },
    /// Too many players (maximum 4).
    #[display("Too many players: {count} (maximum 4)")]
    TooManyPlayers {
        /// Players supplied.
        count: usize,
    },
    /// The engine rejected the setup or a bot move.
    #[display("Engine error: {source}")]
    Engine {
        /// Underlying engine error.
        source: EngineError,
    },
    /// The worker pool could not be built.
    #[display("Thread pool error: {message}")]
    ThreadPool {
        /// Builder error text.
        message: String,
    },
}

impl From<EngineError> for TournamentError {
    fn from(source: EngineError) -> Self {
        Self::Engine { source }
    }
}

fn check_lineup(lineup: &[Strategy]) -> Result<(), TournamentError> {
    if lineup.len() < MIN_PLAYERS {
        return Err(TournamentError::TooFewPlayers {
            count: lineup.len(),
        });
    }
    if lineup.len() > MAX_PLAYERS {
        return Err(TournamentError::TooManyPlayers {
            count: lineup.len(),
        });
    }
    Ok(())
}

/// Run a complete game with the given seed and bot lineup.
///
/// This is the main entry point - a pure function from inputs to result.
///
/// # Arguments
///
/// * `seed` - Seed for every bot's RNG stream
/// * `lineup` - Strategy for players `1..=lineup.len()` (2-4 players)
/// * `config` - Board size and caps
///
/// # Errors
///
/// Returns an error for a bad lineup or board size, or if a bot produces a
/// move the engine rejects.
pub fn run_game(
    seed: u64,
    lineup: &[Strategy],
    config: &TournamentConfig,
) -> Result<GameResult, TournamentError> {
    play_game(seed, lineup, config).map(|(result, _)| result)
}

/// Like [`run_game`], but also hands back the final [`GameState`].
///
/// # Errors
///
/// Same as [`run_game`].
#[instrument(skip(lineup, config))]
pub fn play_game(
    seed: u64,
    lineup: &[Strategy],
    config: &TournamentConfig,
) -> Result<(GameResult, GameState), TournamentError> {
    check_lineup(lineup)?;

    // Lineup length is at most MAX_PLAYERS
    #[allow(clippy::cast_possible_truncation)]
    let players: Vec<PlayerId> = (1..=lineup.len() as PlayerId).collect();
    let mut rngs: Vec<Rng> = players
        .iter()
        .map(|&p| Rng::for_player(seed, p))
        .collect();

    let mut state =
        GameState::new(config.rows, config.cols, &players, config.max_chain_steps)?.start()?;
    let mut longest_chain = 0usize;
    let mut safety_limit_hits = 0u32;

    let end = loop {
        if state.is_finished() {
            break if state.winner().is_some() {
                GameEnd::Won
            } else {
                GameEnd::Stalemate
            };
        }
        if state.moves_played() >= config.max_moves {
            break GameEnd::MoveLimit;
        }
        let Some(player) = state.current_player() else {
            break GameEnd::Stalemate;
        };

        let seat = usize::from(player - 1);
        let Some(coord) = choose_move(&state, player, lineup[seat], &mut rngs[seat]) else {
            // No legal cell is impossible while the player holds charge; treat
            // as a stalemate rather than spin.
            break GameEnd::Stalemate;
        };

        let turn = state.apply(player, coord)?;
        longest_chain = longest_chain.max(turn.chain.len());
        state = turn.state;

        if turn.chain.safety_limit_reached {
            safety_limit_hits += 1;
            warn!(seed, moves = state.moves_played(), "chain cap hit, abandoning game");
            break GameEnd::ChainLimit;
        }
    };

    let winner = match end {
        GameEnd::Won => state.winner(),
        _ => None,
    };
    debug!(seed, ?winner, ?end, moves = state.moves_played(), "game over");

    let result = GameResult {
        seed,
        winner,
        end,
        moves_played: state.moves_played(),
        elimination_order: state.eliminated().to_vec(),
        longest_chain,
        safety_limit_hits,
    };
    Ok((result, state))
}

/// Run one game per seed in parallel.
///
/// `threads` bounds the number of concurrent games; `None` uses one worker
/// per CPU. Results come back in seed order.
///
/// # Errors
///
/// Returns an error if any game fails, or if the pool cannot be built.
pub fn run_batch(
    seeds: &[u64],
    lineup: &[Strategy],
    config: &TournamentConfig,
    threads: Option<usize>,
) -> Result<Vec<GameResult>, TournamentError> {
    check_lineup(lineup)?;

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    let pool = builder.build().map_err(|e| TournamentError::ThreadPool {
        message: e.to_string(),
    })?;

    pool.install(|| {
        seeds
            .par_iter()
            .map(|&seed| run_game(seed, lineup, config))
            .collect()
    })
}
