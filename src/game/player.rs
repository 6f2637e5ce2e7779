//! Player identifiers and the turn roster.

use std::sync::Arc;

use crate::error::{EngineError, EngineResult};

/// Unique identifier for a player.
pub type PlayerId = u8;

/// Maximum number of players in a game.
pub const MAX_PLAYERS: usize = 4;

/// Minimum number of players in a game.
pub const MIN_PLAYERS: usize = 2;

/// Check that `player` is in `1..=MAX_PLAYERS`.
///
/// # Errors
///
/// Returns [`EngineError::InvalidPlayerId`] otherwise.
pub fn validate_player_id(player: PlayerId) -> EngineResult<()> {
    if player == 0 || usize::from(player) > MAX_PLAYERS {
        return Err(EngineError::InvalidPlayerId { player });
    }
    Ok(())
}

/// Ordered, duplicate-free turn order plus a pointer to the player to move.
///
/// A roster only ever shrinks. Like [`Board`](crate::game::Board) it is a
/// cheap-to-clone persistent value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    players: Arc<[PlayerId]>,
    current: usize,
}

impl Roster {
    /// Create a roster with the first player to move.
    ///
    /// # Errors
    ///
    /// - [`EngineError::InvalidRosterSize`] unless 2..=4 players are given.
    /// - [`EngineError::InvalidPlayerId`] for an id outside `1..=4`.
    /// - [`EngineError::DuplicatePlayer`] if an id repeats.
    pub fn new(players: &[PlayerId]) -> EngineResult<Self> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&players.len()) {
            return Err(EngineError::InvalidRosterSize {
                size: players.len(),
            });
        }
        for (i, &player) in players.iter().enumerate() {
            validate_player_id(player)?;
            if players[..i].contains(&player) {
                return Err(EngineError::DuplicatePlayer { player });
            }
        }
        Ok(Self {
            players: players.into(),
            current: 0,
        })
    }

    /// Build a roster from settled turn-manager output.
    ///
    /// The index is clamped to zero for an empty roster.
    pub(crate) fn from_parts(players: Vec<PlayerId>, current: usize) -> Self {
        let current = if players.is_empty() { 0 } else { current };
        Self {
            players: players.into(),
            current,
        }
    }

    /// Players in turn order.
    #[must_use]
    pub fn players(&self) -> &[PlayerId] {
        &self.players
    }

    /// Index of the player to move.
    #[must_use]
    pub const fn current_index(&self) -> usize {
        self.current
    }

    /// The player to move, if any remain.
    #[must_use]
    pub fn current(&self) -> Option<PlayerId> {
        self.players.get(self.current).copied()
    }

    /// Number of players still in the roster.
    #[must_use]
    pub fn len(&self) -> usize {
        self.players.len()
    }

    /// Whether the roster is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Whether `player` is still in the roster.
    #[must_use]
    pub fn contains(&self, player: PlayerId) -> bool {
        self.players.contains(&player)
    }
}
