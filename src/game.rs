//! Game layer for critmass.
//!
//! Implements the board simulation and its rules:
//! - Board with position-derived thresholds and copy-on-write rows
//! - Move validation
//! - Discharge rounds with exact charge conservation
//! - Chain reactions with dual early-termination policy
//! - Turn order and elimination

pub mod board;
pub mod chain;
pub mod explosion;
pub mod invariants;
pub mod player;
pub mod state;
pub mod turn;
pub mod validate;

pub use board::{create_board, place, threshold, Board, Cell, Coord, MAX_DIMENSION, MIN_DIMENSION};
pub use chain::{
    movements, resolve_chain, ChainOutcome, ChainStep, Movement, BATCH_MAX_STEPS,
    INTERACTIVE_MAX_STEPS,
};
pub use explosion::{exploding_cells, resolve_round, split_outflow};
pub use invariants::{assert_invariants, check_invariants, check_roster, InvariantViolation};
pub use player::{validate_player_id, PlayerId, Roster, MAX_PLAYERS, MIN_PLAYERS};
pub use state::{GameState, Turn};
pub use turn::{active_players, settle, Settlement};
pub use validate::{elimination_active, validate_move, GamePhase, MoveAdvice, MoveWarning};
