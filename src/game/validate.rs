//! Move validation.
//!
//! Checks run in a fixed order and the first failure wins:
//! phase, resolution lock, turn order, elimination, bounds, ownership.

use serde::Serialize;

use crate::error::{EngineError, EngineResult};
use crate::game::{Board, Coord, PlayerId, Roster};

/// Lifecycle phase of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GamePhase {
    /// Created but not yet started.
    Setup,
    /// Accepting moves.
    Playing,
    /// A chain reaction is being resolved.
    Resolving,
    /// A winner (or stalemate) has been decided.
    Finished,
}

/// Non-blocking hints attached to an accepted move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct MoveAdvice {
    /// The placement will bring the cell to its threshold.
    pub would_explode: bool,
    /// No move has been played yet in this game.
    pub is_first_move: bool,
}

/// Advisory warning kinds, for callers that prefer a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MoveWarning {
    /// See [`MoveAdvice::would_explode`].
    WouldExplode,
    /// See [`MoveAdvice::is_first_move`].
    FirstMove,
}

impl MoveAdvice {
    /// The set flags as a list of warnings.
    #[must_use]
    pub fn warnings(&self) -> Vec<MoveWarning> {
        let mut warnings = Vec::new();
        if self.would_explode {
            warnings.push(MoveWarning::WouldExplode);
        }
        if self.is_first_move {
            warnings.push(MoveWarning::FirstMove);
        }
        warnings
    }
}

/// Whether the elimination rule is in force.
///
/// Elimination only applies once every player has had at least one turn;
/// before that a player with no charge simply has not moved yet.
#[must_use]
pub fn elimination_active(moves_played: u32, roster_len: usize) -> bool {
    usize::try_from(moves_played).map_or(true, |moves| moves > roster_len)
}

/// Validate a placement request.
///
/// # Errors
///
/// In check order:
/// 1. [`EngineError::GameNotActive`] in `Setup` or `Finished`.
/// 2. [`EngineError::ResolutionInProgress`] in `Resolving`.
/// 3. [`EngineError::NotYourTurn`] if `requester` is not the current player.
/// 4. [`EngineError::EliminatedPlayer`] if every player has moved and
///    `requester` holds no charge.
/// 5. [`EngineError::OutOfBounds`] if `coord` is off the board.
/// 6. [`EngineError::OpponentCell`] if another player owns the cell.
pub fn validate_move(
    board: &Board,
    roster: &Roster,
    requester: PlayerId,
    coord: Coord,
    phase: GamePhase,
    moves_played: u32,
) -> EngineResult<MoveAdvice> {
    match phase {
        GamePhase::Setup | GamePhase::Finished => return Err(EngineError::GameNotActive),
        GamePhase::Resolving => return Err(EngineError::ResolutionInProgress),
        GamePhase::Playing => {}
    }

    if roster.current() != Some(requester) {
        return Err(EngineError::NotYourTurn { player: requester });
    }

    if elimination_active(moves_played, roster.len()) && board.charge_of(requester) == 0 {
        return Err(EngineError::EliminatedPlayer { player: requester });
    }

    let cell = board.get(coord).ok_or(EngineError::OutOfBounds { coord })?;

    if cell.owner.is_some_and(|owner| owner != requester) {
        return Err(EngineError::OpponentCell { coord });
    }

    Ok(MoveAdvice {
        would_explode: cell.charge + 1 >= u32::from(cell.threshold),
        is_first_move: moves_played == 0,
    })
}
