#![no_main]

//! Full game turn fuzzer.
//!
//! Feeds arbitrary (player, cell) requests through `GameState::apply`,
//! including illegal ones:
//! 1. Rejected requests must leave the state untouched
//! 2. Accepted requests must produce a well-formed state
//! 3. Charge grows by exactly one per accepted move
//!
//! This catches integration bugs between validation, resolution and turn
//! order that the component tests miss.

use arbitrary::Arbitrary;
use critmass::game::{check_invariants, check_roster, Coord, GameState};
use libfuzzer_sys::fuzz_target;

/// A fuzzer-generated move request.
#[derive(Arbitrary, Debug, Clone, Copy)]
struct FuzzMove {
    player: u8,
    row: u8,
    col: u8,
}

/// Structured input for game turn fuzzing.
#[derive(Arbitrary, Debug)]
struct GameTurnInput {
    rows: u8,
    cols: u8,
    players: u8,
    moves: Vec<FuzzMove>,
}

fuzz_target!(|input: GameTurnInput| {
    let rows = 3 + input.rows % 6;
    let cols = 3 + input.cols % 6;
    let count = 2 + input.players % 3;
    let players: Vec<u8> = (1..=count).collect();

    let Ok(game) = GameState::interactive(rows, cols, &players) else {
        return;
    };
    let Ok(mut state) = game.start() else {
        return;
    };

    for m in input.moves.iter().take(200) {
        // Bias toward in-range requests so games actually progress
        let coord = Coord::new(m.row % (rows + 1), m.col % (cols + 1));
        let before = state.board().clone();

        match state.apply(m.player % 6, coord) {
            Ok(turn) => {
                let next = turn.state;
                assert!(check_invariants(next.board()).is_empty());
                assert!(check_roster(next.roster()).is_empty());
                assert_eq!(next.board().total_charge(), before.total_charge() + 1);
                assert_eq!(next.moves_played(), state.moves_played() + 1);
                state = next;
            }
            Err(_) => {
                assert!(critmass::game::Board::ptr_eq(&before, state.board()));
            }
        }

        if state.is_finished() {
            break;
        }
    }
});
