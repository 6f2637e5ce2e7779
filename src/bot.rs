//! Move selection for computer players.
//!
//! Bots sit outside the engine. They read a [`GameState`], try moves on
//! shared copies of the board through the same public operations a UI uses,
//! and hand back a coordinate. The live game is never touched.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::game::{resolve_chain, Board, Coord, GameState, PlayerId};
use crate::tournament::Rng;

/// Score bonus for a move that wipes out every opponent.
const WIN_BONUS: i64 = 1_000_000;

/// Step cap for hypothetical chains; a truncated look-ahead is still a fair
/// estimate.
const LOOKAHEAD_MAX_STEPS: usize = 200;

/// Move-selection heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Uniformly random legal move.
    Random,
    /// One-ply material maximiser.
    Greedy,
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::Random => f.write_str("random"),
            Strategy::Greedy => f.write_str("greedy"),
        }
    }
}

/// Who controls a seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerKind {
    /// Moves come from outside (UI, network, test).
    Human,
    /// Moves come from a bot.
    Ai(Strategy),
}

impl PlayerKind {
    /// The bot strategy, if this seat is computer-controlled.
    #[must_use]
    pub const fn strategy(&self) -> Option<Strategy> {
        match self {
            PlayerKind::Human => None,
            PlayerKind::Ai(strategy) => Some(*strategy),
        }
    }
}

/// Cells `player` may place on: empty or already theirs, row-major.
#[must_use]
pub fn legal_moves(board: &Board, player: PlayerId) -> Vec<Coord> {
    board
        .cells()
        .filter(|cell| cell.owner.is_none_or(|owner| owner == player))
        .map(|cell| cell.coord)
        .collect()
}

/// Material balance from `player`'s point of view.
fn material(board: &Board, player: PlayerId) -> (i64, i64) {
    let mut own = 0i64;
    let mut other = 0i64;
    for cell in board.cells() {
        match cell.owner {
            Some(owner) if owner == player => own += i64::from(cell.charge),
            Some(_) => other += i64::from(cell.charge),
            None => {}
        }
    }
    (own, other)
}

/// Score the board after `player` places at `coord`.
fn evaluate(board: &Board, player: PlayerId, coord: Coord) -> Option<i64> {
    let placed = board.place(coord, player).ok()?;
    let outcome = resolve_chain(&placed, player, LOOKAHEAD_MAX_STEPS);
    let (_, before_other) = material(board, player);
    let (own, other) = material(&outcome.final_board, player);

    let mut score = own - other;
    if before_other > 0 && other == 0 {
        score += WIN_BONUS;
    }
    Some(score)
}

/// Pick a move for `player` using `strategy`.
///
/// Returns `None` if `player` has no legal cell.
#[must_use]
pub fn choose_move(
    state: &GameState,
    player: PlayerId,
    strategy: Strategy,
    rng: &mut Rng,
) -> Option<Coord> {
    let board = state.board();
    let moves = legal_moves(board, player);
    if moves.is_empty() {
        return None;
    }

    match strategy {
        Strategy::Random => moves.get(rng.next_index(moves.len())).copied(),
        Strategy::Greedy => {
            let mut best = i64::MIN;
            let mut ties: Vec<Coord> = Vec::new();
            for coord in moves {
                let Some(score) = evaluate(board, player, coord) else {
                    continue;
                };
                if score > best {
                    best = score;
                    ties.clear();
                }
                if score == best {
                    ties.push(coord);
                }
            }
            ties.get(rng.next_index(ties.len())).copied()
        }
    }
}
