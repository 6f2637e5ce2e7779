//! Worked chain-reaction and turn-order scenarios through the public API.
//!
//! Run with: cargo test chain_scenarios

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use critmass::game::{
    active_players, check_invariants, create_board, place, resolve_chain, resolve_round, settle,
    validate_move, Board, Coord, GamePhase, GameState, Roster, INTERACTIVE_MAX_STEPS,
};
use critmass::EngineError;

fn c(row: u8, col: u8) -> Coord {
    Coord::new(row, col)
}

fn board_with(rows: u8, cols: u8, cells: &[(u8, u8, u32, u8)]) -> Board {
    cells
        .iter()
        .fold(create_board(rows, cols).unwrap(), |board, &(r, col, charge, owner)| {
            board.with_cell(c(r, col), charge, Some(owner)).unwrap()
        })
}

#[test]
fn test_corner_double_placement_discharges_once() {
    let board = create_board(3, 3).unwrap();
    let board = place(&board, c(0, 0), 1).unwrap();
    let board = place(&board, c(0, 0), 1).unwrap();
    assert_eq!(board.get(c(0, 0)).unwrap().charge, 2);

    let outcome = resolve_chain(&board, 1, INTERACTIVE_MAX_STEPS);
    assert_eq!(outcome.steps.len(), 1);
    assert_eq!(outcome.steps[0].exploded, vec![c(0, 0)]);

    let end = &outcome.final_board;
    let corner = end.get(c(0, 0)).unwrap();
    assert_eq!((corner.charge, corner.owner), (0, None));
    let right = end.get(c(0, 1)).unwrap();
    assert_eq!((right.charge, right.owner), (1, Some(1)));
    let below = end.get(c(1, 0)).unwrap();
    assert_eq!((below.charge, below.owner), (1, Some(1)));
    assert_eq!(end.total_charge(), 2);
}

#[test]
fn test_movements_describe_every_edge() {
    let board = board_with(3, 3, &[(1, 1, 4, 2)]);
    let outcome = resolve_chain(&board, 2, INTERACTIVE_MAX_STEPS);
    let step = &outcome.steps[0];
    let targets: Vec<Coord> = step.movements.iter().map(|m| m.to).collect();
    assert_eq!(targets, vec![c(0, 1), c(2, 1), c(1, 0), c(1, 2)]);
    assert!(step.movements.iter().all(|m| m.amount == 1 && m.owner == Some(2)));
}

#[test]
fn test_multiplayer_capture_stops_with_residual_critical_cell() {
    // Player 1's corner captures player 2's only cell, which lands at its
    // threshold.
    let board = board_with(3, 3, &[(0, 0, 2, 1), (0, 1, 2, 2)]);
    let outcome = resolve_chain(&board, 1, INTERACTIVE_MAX_STEPS);

    assert!(outcome.game_won_early);
    assert!(!outcome.safety_limit_reached);
    assert_eq!(outcome.steps.len(), 1);
    let captured = outcome.final_board.get(c(0, 1)).unwrap();
    assert_eq!((captured.charge, captured.owner), (3, Some(1)));
    assert!(captured.is_critical());
    assert_eq!(active_players(&outcome.final_board), vec![1]);
}

#[test]
fn test_solo_cascade_runs_to_stability() {
    let board = board_with(3, 3, &[(0, 0, 2, 1), (0, 1, 2, 1), (1, 0, 2, 1)]);
    let outcome = resolve_chain(&board, 1, INTERACTIVE_MAX_STEPS);

    assert!(outcome.game_won_early);
    assert!(outcome.steps.len() > 1);
    assert!(!outcome.safety_limit_reached);
    assert!(outcome.final_board.cells().all(|cell| !cell.is_critical()));
    assert_eq!(outcome.final_board.total_charge(), 6);
}

#[test]
fn test_simultaneous_capture_goes_to_later_source() {
    // (0,1) sits between player 1's corner and player 2's corner; player 2's
    // source comes later in row-major order.
    let board = board_with(3, 3, &[(0, 0, 2, 1), (0, 2, 2, 2), (2, 2, 1, 1)]);
    let next = resolve_round(&board, &[c(0, 0), c(0, 2)]);
    let middle = next.get(c(0, 1)).unwrap();
    assert_eq!((middle.charge, middle.owner), (2, Some(2)));
    assert_eq!(next.total_charge(), board.total_charge());
}

#[test]
fn test_four_to_two_remaps_next_index() {
    let board = board_with(4, 4, &[(0, 0, 1, 1), (3, 3, 1, 3)]);
    let settlement = settle(&board, &[1, 2, 3, 4], 2, 10);
    assert_eq!(settlement.roster, vec![1, 3]);
    assert_eq!(settlement.next_index, 0);
    assert!(!settlement.finished);
    assert_eq!(settlement.eliminated_from(&[1, 2, 3, 4]), vec![2, 4]);
}

#[test]
fn test_no_elimination_before_everyone_moves() {
    let board = board_with(3, 3, &[(0, 0, 1, 1)]);
    let settlement = settle(&board, &[1, 2], 0, 1);
    assert_eq!(settlement.roster, vec![1, 2]);
    assert_eq!(settlement.next_index, 1);
    assert!(!settlement.finished);
}

#[test]
fn test_validation_order_and_errors() {
    let roster = Roster::new(&[1, 2]).unwrap();
    let board = board_with(3, 3, &[(0, 0, 1, 2)]);

    assert_eq!(
        validate_move(&board, &roster, 1, c(0, 1), GamePhase::Setup, 0),
        Err(EngineError::GameNotActive)
    );
    assert_eq!(
        validate_move(&board, &roster, 1, c(0, 1), GamePhase::Resolving, 0),
        Err(EngineError::ResolutionInProgress)
    );
    assert_eq!(
        validate_move(&board, &roster, 2, c(0, 1), GamePhase::Playing, 0),
        Err(EngineError::NotYourTurn { player: 2 })
    );
    assert_eq!(
        validate_move(&board, &roster, 1, c(3, 0), GamePhase::Playing, 0),
        Err(EngineError::OutOfBounds { coord: c(3, 0) })
    );
    assert_eq!(
        validate_move(&board, &roster, 1, c(0, 0), GamePhase::Playing, 0),
        Err(EngineError::OpponentCell { coord: c(0, 0) })
    );
    assert!(validate_move(&board, &roster, 1, c(1, 1), GamePhase::Playing, 0).is_ok());
}

#[test]
fn test_full_game_to_victory() {
    let game = GameState::interactive(3, 3, &[1, 2]).unwrap().start().unwrap();
    let game = game.apply(1, c(0, 0)).unwrap().state;
    let game = game.apply(2, c(2, 2)).unwrap().state;
    let game = game.apply(1, c(0, 0)).unwrap().state;
    assert!(!game.is_finished());
    assert_eq!(game.current_player(), Some(2));

    // Player 2 feeds their corner; it discharges into empty cells.
    let game = game.apply(2, c(2, 2)).unwrap().state;
    assert!(check_invariants(game.board()).is_empty());
    assert_eq!(game.board().total_charge(), 4);
    assert_eq!(game.moves_played(), 4);
    assert_eq!(game.current_player(), Some(1));
}
