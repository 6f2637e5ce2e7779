//! Board invariants - sanity checks that detect bugs.
//!
//! These should NEVER trigger on a board produced by the engine. A violation
//! means a resolver or placement bug, not a gameplay condition.

use derive_more::{Display, Error};

use crate::game::board::threshold;
use crate::game::{Board, Coord, Roster};

/// Invariant violation error.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("Invariant violation: {message}")]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

/// Check all board invariants.
///
/// Returns a list of violations found, or empty if all invariants hold.
#[must_use]
pub fn check_invariants(board: &Board) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();

    for row in 0..board.rows() {
        let Some(cells) = board.row(row) else {
            violations.push(InvariantViolation {
                message: format!("Row {row} is missing"),
            });
            continue;
        };
        if cells.len() != usize::from(board.cols()) {
            violations.push(InvariantViolation {
                message: format!(
                    "Row {row} has {} cells, expected {}",
                    cells.len(),
                    board.cols()
                ),
            });
        }

        for (col, cell) in (0u8..).zip(cells) {
            let expected = Coord::new(row, col);
            if cell.coord != expected {
                violations.push(InvariantViolation {
                    message: format!("Cell stored at {expected} claims {}", cell.coord),
                });
            }

            // Owner is set exactly when charge is non-zero
            if cell.owner.is_none() != (cell.charge == 0) {
                violations.push(InvariantViolation {
                    message: format!(
                        "Cell {} has charge {} but owner {:?}",
                        cell.coord, cell.charge, cell.owner
                    ),
                });
            }

            let positional = threshold(row, col, board.rows(), board.cols());
            if cell.threshold != positional {
                violations.push(InvariantViolation {
                    message: format!(
                        "Cell {} has threshold {} but its position gives {positional}",
                        cell.coord, cell.threshold
                    ),
                });
            }
        }
    }

    violations
}

/// Check roster invariants: no duplicates and an in-range turn pointer.
#[must_use]
pub fn check_roster(roster: &Roster) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    let players = roster.players();

    for (i, player) in players.iter().enumerate() {
        if players[..i].contains(player) {
            violations.push(InvariantViolation {
                message: format!("Player {player} appears twice in the roster"),
            });
        }
    }

    if !players.is_empty() && roster.current_index() >= players.len() {
        violations.push(InvariantViolation {
            message: format!(
                "Turn index {} out of range for {} players",
                roster.current_index(),
                players.len()
            ),
        });
    }

    violations
}

/// Assert all board invariants hold, panicking if any are violated.
///
/// Only active in debug builds. No-op in release builds.
///
/// # Panics
///
/// Panics with detailed message if any invariant is violated.
#[cfg(debug_assertions)]
pub fn assert_invariants(board: &Board) {
    let violations = check_invariants(board);
    if !violations.is_empty() {
        let messages: Vec<_> = violations.iter().map(|v| v.message.as_str()).collect();
        panic!("Board invariant violations:\n  - {}", messages.join("\n  - "));
    }
}

/// No-op in release builds.
#[cfg(not(debug_assertions))]
pub fn assert_invariants(_board: &Board) {}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::game::Cell;

    #[test]
    fn test_violation_is_displayable_error() {
        fn takes_error(_: &dyn std::error::Error) {}
        let violation = InvariantViolation {
            message: "row 2 has 4 cells".to_string(),
        };
        takes_error(&violation);
        assert_eq!(violation.to_string(), "Invariant violation: row 2 has 4 cells");
    }

    #[test]
    fn test_fresh_board_passes() {
        let board = Board::new(6, 9).unwrap();
        assert!(check_invariants(&board).is_empty());
    }

    #[test]
    fn test_played_board_passes() {
        let board = Board::new(3, 3).unwrap();
        let board = board.place(Coord::new(1, 1), 2).unwrap();
        let board = board.place(Coord::new(0, 2), 1).unwrap();
        assert!(check_invariants(&board).is_empty());
    }

    #[test]
    fn test_owner_without_charge_detected() {
        let board = Board::new(3, 3).unwrap();
        let mut rows: Vec<Arc<[Cell]>> = board.shared_rows().to_vec();
        let mut row = rows[0].to_vec();
        row[1].owner = Some(1);
        rows[0] = row.into();
        let broken = Board::from_rows(3, 3, rows);

        let violations = check_invariants(&broken);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("owner"));
    }

    #[test]
    fn test_charge_without_owner_detected() {
        let board = Board::new(3, 3).unwrap();
        let mut rows: Vec<Arc<[Cell]>> = board.shared_rows().to_vec();
        let mut row = rows[2].to_vec();
        row[2].charge = 1;
        rows[2] = row.into();
        let broken = Board::from_rows(3, 3, rows);

        assert_eq!(check_invariants(&broken).len(), 1);
    }

    #[test]
    fn test_wrong_threshold_detected() {
        let board = Board::new(3, 3).unwrap();
        let mut rows: Vec<Arc<[Cell]>> = board.shared_rows().to_vec();
        let mut row = rows[1].to_vec();
        row[1].threshold = 3;
        rows[1] = row.into();
        let broken = Board::from_rows(3, 3, rows);

        let violations = check_invariants(&broken);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("threshold"));
    }

    #[test]
    fn test_misplaced_cell_detected() {
        let board = Board::new(3, 3).unwrap();
        let mut rows: Vec<Arc<[Cell]>> = board.shared_rows().to_vec();
        rows.swap(0, 2);
        let broken = Board::from_rows(3, 3, rows);
        assert!(!check_invariants(&broken).is_empty());
    }

    #[test]
    fn test_roster_checks() {
        let roster = Roster::new(&[1, 2, 3]).unwrap();
        assert!(check_roster(&roster).is_empty());

        let broken = Roster::from_parts(vec![1, 2], 2);
        assert_eq!(check_roster(&broken).len(), 1);

        let dup = Roster::from_parts(vec![1, 1], 0);
        assert_eq!(check_roster(&dup).len(), 1);
    }

    #[test]
    #[should_panic(expected = "Board invariant violations")]
    #[cfg(debug_assertions)]
    fn test_assert_invariants_panics() {
        let board = Board::new(3, 3).unwrap();
        let mut rows: Vec<Arc<[Cell]>> = board.shared_rows().to_vec();
        let mut row = rows[0].to_vec();
        row[0].charge = 4;
        rows[0] = row.into();
        assert_invariants(&Board::from_rows(3, 3, rows));
    }
}
