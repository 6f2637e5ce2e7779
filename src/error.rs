//! Error types for the chain-reaction engine.
//!
//! Every variant is recoverable. Validation and placement return these as
//! typed results; callers decide whether to reject input, show a message or
//! retry.

use derive_more::{Display, Error};

use crate::game::{Coord, PlayerId};

/// Errors produced by board construction, placement and move validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum EngineError {
    /// Board dimensions outside `[MIN_DIMENSION, MAX_DIMENSION]`.
    #[display("invalid board dimensions {rows}x{cols} (each must be in 3..=20)")]
    InvalidDimensions {
        /// Requested row count.
        rows: u8,
        /// Requested column count.
        cols: u8,
    },
    /// Player id outside `1..=MAX_PLAYERS`.
    #[display("invalid player id {player}")]
    InvalidPlayerId {
        /// The rejected id.
        player: PlayerId,
    },
    /// Roster with fewer than 2 or more than 4 players.
    #[display("invalid roster size {size} (must be 2..=4)")]
    InvalidRosterSize {
        /// Number of players supplied.
        size: usize,
    },
    /// The same player appears twice in a roster.
    #[display("player {player} appears more than once in the roster")]
    DuplicatePlayer {
        /// The repeated id.
        player: PlayerId,
    },
    /// Placement onto a cell another player owns.
    #[display("cell {coord} is owned by player {owner}")]
    CellOwnershipConflict {
        /// Target cell.
        coord: Coord,
        /// Current owner of the cell.
        owner: PlayerId,
    },
    /// Coordinate outside the board.
    #[display("cell {coord} is out of bounds")]
    OutOfBounds {
        /// Rejected coordinate.
        coord: Coord,
    },
    /// A player tried to move out of turn.
    #[display("it is not player {player}'s turn")]
    NotYourTurn {
        /// The requesting player.
        player: PlayerId,
    },
    /// The game is not in the `Playing` phase.
    #[display("game is not active")]
    GameNotActive,
    /// A chain reaction is still being resolved.
    #[display("a chain reaction is still resolving")]
    ResolutionInProgress,
    /// The requesting player has no charge left after everyone has moved.
    #[display("player {player} has been eliminated")]
    EliminatedPlayer {
        /// The eliminated player.
        player: PlayerId,
    },
    /// A cell was given charge without an owner.
    #[display("cell {coord} holds charge but has no owner")]
    UnownedCharge {
        /// Offending cell.
        coord: Coord,
    },
    /// Target cell belongs to an opponent (validation-time counterpart of
    /// [`EngineError::CellOwnershipConflict`]).
    #[display("cell {coord} belongs to an opponent")]
    OpponentCell {
        /// Target cell.
        coord: Coord,
    },
}

/// Result alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = EngineError::InvalidDimensions { rows: 2, cols: 30 };
        assert_eq!(
            err.to_string(),
            "invalid board dimensions 2x30 (each must be in 3..=20)"
        );

        let err = EngineError::OutOfBounds {
            coord: Coord::new(5, 1),
        };
        assert_eq!(err.to_string(), "cell (5, 1) is out of bounds");
    }

    #[test]
    fn test_is_std_error() {
        fn takes_error(_: &dyn std::error::Error) {}
        takes_error(&EngineError::GameNotActive);
    }
}
