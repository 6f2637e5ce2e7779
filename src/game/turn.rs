//! Turn advancement and elimination.

use std::collections::BTreeSet;

use tracing::{debug, info};

use crate::game::validate::elimination_active;
use crate::game::{Board, PlayerId};

/// Players holding charge on `board`, ascending and duplicate-free.
#[must_use]
pub fn active_players(board: &Board) -> Vec<PlayerId> {
    board
        .cells()
        .filter(|cell| cell.charge > 0)
        .filter_map(|cell| cell.owner)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Turn manager output after a chain has settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settlement {
    /// Roster after removing eliminated players, order preserved.
    pub roster: Vec<PlayerId>,
    /// Index into `roster` of the player to move next.
    pub next_index: usize,
    /// The game is over.
    pub finished: bool,
    /// The sole survivor, if the game finished with one.
    pub winner: Option<PlayerId>,
}

impl Settlement {
    /// Players present in `before` but absent from this settlement's roster,
    /// in `before` order.
    #[must_use]
    pub fn eliminated_from(&self, before: &[PlayerId]) -> Vec<PlayerId> {
        before
            .iter()
            .copied()
            .filter(|p| !self.roster.contains(p))
            .collect()
    }
}

/// Work out who moves next once a chain reaction has settled.
///
/// - Until every player has moved once (`moves_played > roster.len()`), no one
///   is removed and the turn simply rotates.
/// - With at most one active player the game finishes; the survivor, if any,
///   wins.
/// - Otherwise players without charge are dropped and the turn goes to the
///   first survivor after `current_index` in the *old* roster, wrapping. This
///   holds even when the mover eliminated themselves.
#[must_use]
pub fn settle(
    board: &Board,
    roster: &[PlayerId],
    current_index: usize,
    moves_played: u32,
) -> Settlement {
    if roster.is_empty() {
        return Settlement {
            roster: Vec::new(),
            next_index: 0,
            finished: true,
            winner: None,
        };
    }

    let rotate = || Settlement {
        roster: roster.to_vec(),
        next_index: (current_index + 1) % roster.len(),
        finished: false,
        winner: None,
    };

    if !elimination_active(moves_played, roster.len()) {
        return rotate();
    }

    let active = active_players(board);

    if active.len() <= 1 {
        let winner = active.first().copied();
        info!(?winner, "game finished");
        return Settlement {
            roster: active,
            next_index: 0,
            finished: true,
            winner,
        };
    }

    let survivors: Vec<PlayerId> = roster
        .iter()
        .copied()
        .filter(|p| active.contains(p))
        .collect();

    if survivors.len() == roster.len() {
        return rotate();
    }

    let successor = (1..=roster.len())
        .map(|offset| roster[(current_index + offset) % roster.len()])
        .find(|p| survivors.contains(p));
    let next_index = successor
        .and_then(|p| survivors.iter().position(|&s| s == p))
        .unwrap_or(0);

    let finished = survivors.len() <= 1;
    let winner = if finished { survivors.first().copied() } else { None };
    info!(
        eliminated = ?roster.iter().filter(|p| !survivors.contains(p)).collect::<Vec<_>>(),
        remaining = survivors.len(),
        "players eliminated"
    );
    debug!(next_index, "turn advanced after elimination");

    Settlement {
        roster: survivors,
        next_index,
        finished,
        winner,
    }
}
