#![no_main]

//! Chain resolution fuzzer.
//!
//! Builds an arbitrary board (charges may start above threshold) and checks
//! that every round of the resulting chain conserves charge and keeps the
//! board well-formed.

use arbitrary::Arbitrary;
use critmass::game::{check_invariants, create_board, resolve_chain, Coord};
use libfuzzer_sys::fuzz_target;

/// One seeded cell.
#[derive(Arbitrary, Debug)]
struct SeedCell {
    row: u8,
    col: u8,
    charge: u8,
    owner: u8,
}

/// Structured input for chain fuzzing.
#[derive(Arbitrary, Debug)]
struct ChainInput {
    rows: u8,
    cols: u8,
    cells: Vec<SeedCell>,
    trigger: u8,
    max_steps: u8,
}

fuzz_target!(|input: ChainInput| {
    let rows = 3 + input.rows % 18;
    let cols = 3 + input.cols % 18;
    let Ok(mut board) = create_board(rows, cols) else {
        return;
    };

    for cell in input.cells.iter().take(64) {
        let coord = Coord::new(cell.row % rows, cell.col % cols);
        let owner = 1 + cell.owner % 4;
        if let Ok(next) = board.with_cell(coord, u32::from(cell.charge % 16), Some(owner)) {
            board = next;
        }
    }

    let total = board.total_charge();
    let trigger = 1 + input.trigger % 4;
    let outcome = resolve_chain(&board, trigger, usize::from(input.max_steps));

    assert!(outcome.steps.len() <= usize::from(input.max_steps));
    for step in &outcome.steps {
        assert_eq!(step.board.total_charge(), total, "charge not conserved");
        let violations = check_invariants(&step.board);
        assert!(violations.is_empty(), "invariant violations: {violations:?}");
    }
    assert_eq!(outcome.final_board.total_charge(), total);
    if outcome.safety_limit_reached {
        assert_eq!(outcome.steps.len(), usize::from(input.max_steps));
    }
});
