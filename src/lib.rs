// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
//! Critmass: a deterministic chain-reaction grid conquest engine.
//!
//! Two to four players take turns depositing charge on a grid. A cell that
//! reaches its critical mass discharges into its neighbors, possibly
//! triggering further discharges. The engine validates, applies and resolves
//! moves; it never renders, persists or picks moves itself.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   Tournament Runner  /  Bots        │
//! ├─────────────────────────────────────┤
//! │   GameState (validate → place →     │
//! │   resolve_chain → settle)           │
//! ├─────────────────────────────────────┤
//! │   Board (persistent, shared rows)   │
//! └─────────────────────────────────────┘
//! ```
//!
//! Every board and roster is an immutable value, so independent games can
//! run on as many threads as needed with no locking.

pub mod bot;
pub mod config;
pub mod error;
pub mod game;
pub mod tournament;

pub use error::{EngineError, EngineResult};

// Re-export key game types at crate root for convenience
pub use game::{
    active_players, create_board, place, resolve_chain, settle, validate_move, Board, Cell,
    ChainOutcome, ChainStep, Coord, GamePhase, GameState, PlayerId, Roster,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_operations_compose() {
        let board = create_board(3, 3).unwrap();
        let board = place(&board, Coord::new(0, 0), 1).unwrap();
        let board = place(&board, Coord::new(0, 0), 1).unwrap();
        let outcome = resolve_chain(&board, 1, game::INTERACTIVE_MAX_STEPS);
        assert_eq!(outcome.steps.len(), 1);
        assert_eq!(active_players(&outcome.final_board), vec![1]);
    }
}
