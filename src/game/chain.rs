//! Chain reaction driver.
//!
//! Repeats discharge rounds until the board is stable, a game-deciding
//! capture happens, or the step cap is hit.
//!
//! # Early termination
//!
//! The first round after which at most one player still holds charge sets
//! `game_won_early`. What happens next depends on the board the chain started
//! from:
//!
//! - several active players at the start: the capture decided the game, so
//!   the loop stops immediately even if over-threshold cells remain;
//! - one active player at the start (solo or sandbox play): nothing new was
//!   decided, so the cascade runs on to stability or the cap.

use serde::Serialize;
use tracing::{debug, warn};

use crate::game::explosion::{exploding_cells, resolve_round, split_outflow};
use crate::game::turn::active_players;
use crate::game::{Board, Coord, PlayerId};

/// Step cap for interactive play.
pub const INTERACTIVE_MAX_STEPS: usize = 100;

/// Step cap for batch and tournament play.
pub const BATCH_MAX_STEPS: usize = 10_000;

/// One unit-flow from an exploding cell to a neighbor.
///
/// Produced for animation playback only; the engine never reads these back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Movement {
    /// Exploding cell.
    pub from: Coord,
    /// Receiving neighbor.
    pub to: Coord,
    /// Owner of the exploding cell.
    pub owner: Option<PlayerId>,
    /// Units sent along this edge.
    pub amount: u32,
}

/// One discharge round.
#[derive(Debug, Clone)]
pub struct ChainStep {
    /// Zero-based round number within the chain.
    pub index: usize,
    /// Cells that discharged, in row-major order.
    pub exploded: Vec<Coord>,
    /// Board after the round.
    pub board: Board,
    /// Source-to-neighbor flows, for animation.
    pub movements: Vec<Movement>,
}

/// Result of driving a chain to completion.
#[derive(Debug, Clone)]
pub struct ChainOutcome {
    /// Every round that ran, in order.
    pub steps: Vec<ChainStep>,
    /// Board after the last round (the input board if nothing exploded).
    pub final_board: Board,
    /// The cap was hit while over-threshold cells remained.
    ///
    /// Running exactly `max_steps` rounds is not enough on its own: a chain
    /// that settles on its last permitted round, or one stopped by a decided
    /// capture, leaves this `false`.
    pub safety_limit_reached: bool,
    /// At some round at most one player held charge.
    pub game_won_early: bool,
}

impl ChainOutcome {
    /// Number of rounds that ran.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether no round ran.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Describe every source-to-neighbor flow for `exploding` on `board`.
#[must_use]
pub fn movements(board: &Board, exploding: &[Coord]) -> Vec<Movement> {
    let mut result = Vec::with_capacity(exploding.len() * 4);
    for cell in exploding.iter().filter_map(|&coord| board.get(coord)) {
        let neighbors: Vec<Coord> = board.neighbors(cell.coord).collect();
        let slots = u32::try_from(neighbors.len()).unwrap_or(0);
        let shares = split_outflow(u32::from(cell.threshold), slots);
        result.extend(neighbors.into_iter().zip(shares).map(|(to, amount)| Movement {
            from: cell.coord,
            to,
            owner: cell.owner,
            amount,
        }));
    }
    result
}

/// Resolve the chain reaction started by `trigger`'s placement.
///
/// Runs at most `max_steps` rounds. A stable input board yields no steps and
/// a `final_board` that is the input by reference.
#[must_use]
pub fn resolve_chain(board: &Board, trigger: PlayerId, max_steps: usize) -> ChainOutcome {
    let started_contested = active_players(board).len() > 1;
    let mut current = board.clone();
    let mut steps = Vec::new();
    let mut game_won_early = false;
    let mut decided = false;

    while steps.len() < max_steps {
        let exploding = exploding_cells(&current);
        if exploding.is_empty() {
            break;
        }

        let flows = movements(&current, &exploding);
        let next = resolve_round(&current, &exploding);
        debug_assert_eq!(next.total_charge(), current.total_charge());

        steps.push(ChainStep {
            index: steps.len(),
            exploded: exploding,
            board: next.clone(),
            movements: flows,
        });
        current = next;

        if !game_won_early && active_players(&current).len() <= 1 {
            game_won_early = true;
            if started_contested {
                decided = true;
                break;
            }
        }
    }

    let safety_limit_reached =
        !decided && steps.len() >= max_steps && !exploding_cells(&current).is_empty();

    if safety_limit_reached {
        warn!(trigger, max_steps, "chain reaction hit the step cap");
    }
    debug!(
        trigger,
        steps = steps.len(),
        game_won_early,
        decided,
        "chain resolved"
    );

    ChainOutcome {
        steps,
        final_board: current,
        safety_limit_reached,
        game_won_early,
    }
}
