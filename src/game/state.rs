//! Game state management.
//!
//! [`GameState`] is an immutable value owned by the caller. Every operation
//! returns a new state; the old one stays valid, which is all undo, replay
//! and hypothetical search need.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::error::{EngineError, EngineResult};
use crate::game::chain::{resolve_chain, ChainOutcome, INTERACTIVE_MAX_STEPS};
use crate::game::invariants::assert_invariants;
use crate::game::turn::settle;
use crate::game::validate::{validate_move, GamePhase, MoveAdvice};
use crate::game::{Board, Coord, PlayerId, Roster};

/// Complete game state.
#[derive(Debug, Clone)]
pub struct GameState {
    board: Board,
    roster: Roster,
    phase: GamePhase,
    moves_played: u32,
    max_chain_steps: usize,
    winner: Option<PlayerId>,
    /// Players in the order they were removed.
    eliminated: Arc<[PlayerId]>,
}

/// Everything produced by one accepted move.
#[derive(Debug, Clone)]
pub struct Turn {
    /// The state after the move settled.
    pub state: GameState,
    /// The chain reaction the move triggered.
    pub chain: ChainOutcome,
    /// Advisory flags from validation.
    pub advice: MoveAdvice,
    /// Players removed by this move, in roster order.
    pub eliminated: Vec<PlayerId>,
}

impl GameState {
    /// Create a game in the `Setup` phase.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidDimensions`] for a bad board size and the
    /// [`Roster::new`] errors for a bad player list.
    pub fn new(
        rows: u8,
        cols: u8,
        players: &[PlayerId],
        max_chain_steps: usize,
    ) -> EngineResult<Self> {
        let board = Board::new(rows, cols)?;
        let roster = Roster::new(players)?;
        Ok(Self {
            board,
            roster,
            phase: GamePhase::Setup,
            moves_played: 0,
            max_chain_steps,
            winner: None,
            eliminated: Arc::from([]),
        })
    }

    /// Create a game with the interactive chain cap.
    ///
    /// # Errors
    ///
    /// Same as [`GameState::new`].
    pub fn interactive(rows: u8, cols: u8, players: &[PlayerId]) -> EngineResult<Self> {
        Self::new(rows, cols, players, INTERACTIVE_MAX_STEPS)
    }

    /// Move from `Setup` to `Playing`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::GameNotActive`] unless the game is in `Setup`.
    pub fn start(&self) -> EngineResult<Self> {
        if self.phase != GamePhase::Setup {
            return Err(EngineError::GameNotActive);
        }
        Ok(Self {
            phase: GamePhase::Playing,
            ..self.clone()
        })
    }

    /// Current board.
    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// Current roster.
    #[must_use]
    pub const fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Moves accepted so far.
    #[must_use]
    pub const fn moves_played(&self) -> u32 {
        self.moves_played
    }

    /// Chain step cap used for every move.
    #[must_use]
    pub const fn max_chain_steps(&self) -> usize {
        self.max_chain_steps
    }

    /// Winner, once the game has finished with a sole survivor.
    #[must_use]
    pub const fn winner(&self) -> Option<PlayerId> {
        self.winner
    }

    /// Players in elimination order.
    #[must_use]
    pub fn eliminated(&self) -> &[PlayerId] {
        &self.eliminated
    }

    /// The player to move, while the game is running.
    #[must_use]
    pub fn current_player(&self) -> Option<PlayerId> {
        match self.phase {
            GamePhase::Playing => self.roster.current(),
            _ => None,
        }
    }

    /// Whether the game has finished.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.phase == GamePhase::Finished
    }

    /// Check a move without applying it.
    ///
    /// # Errors
    ///
    /// See [`validate_move`].
    pub fn validate(&self, player: PlayerId, coord: Coord) -> EngineResult<MoveAdvice> {
        validate_move(
            &self.board,
            &self.roster,
            player,
            coord,
            self.phase,
            self.moves_played,
        )
    }

    /// Apply a move: validate, place, resolve the chain and settle the turn.
    ///
    /// `self` is left untouched.
    ///
    /// # Errors
    ///
    /// Any [`validate_move`] error; nothing is applied in that case.
    #[instrument(skip(self), fields(moves_played = self.moves_played))]
    pub fn apply(&self, player: PlayerId, coord: Coord) -> EngineResult<Turn> {
        let advice = self.validate(player, coord)?;

        // Resolution is synchronous; no state in `GamePhase::Resolving` is
        // ever observable from here.
        let placed = self.board.place(coord, player)?;
        let chain = resolve_chain(&placed, player, self.max_chain_steps);
        let moves_played = self.moves_played.saturating_add(1);

        let before = self.roster.players();
        let settlement = settle(
            &chain.final_board,
            before,
            self.roster.current_index(),
            moves_played,
        );
        let eliminated = settlement.eliminated_from(before);
        let all_eliminated: Arc<[PlayerId]> = self
            .eliminated
            .iter()
            .chain(&eliminated)
            .copied()
            .collect();

        let phase = if settlement.finished {
            GamePhase::Finished
        } else {
            GamePhase::Playing
        };

        let state = Self {
            board: chain.final_board.clone(),
            roster: Roster::from_parts(settlement.roster, settlement.next_index),
            phase,
            moves_played,
            max_chain_steps: self.max_chain_steps,
            winner: settlement.winner,
            eliminated: all_eliminated,
        };
        assert_invariants(&state.board);

        debug!(
            steps = chain.len(),
            next = ?state.current_player(),
            finished = state.is_finished(),
            "move applied"
        );

        Ok(Turn {
            state,
            chain,
            advice,
            eliminated,
        })
    }
}
