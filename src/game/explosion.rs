//! Discharge round resolution.
//!
//! One round takes every over-threshold cell at once, keeps each cell's
//! surplus above its threshold in place and spreads the threshold amount over
//! its neighbors. Charge is conserved exactly.
//!
//! The round is applied in two passes so the result does not depend on the
//! order cells are visited:
//! 1. every exploding cell drops to its remainder;
//! 2. accumulated inflow is added to every receiving cell, whose owner
//!    becomes the last contributing source in row-major order.

use std::sync::Arc;

use crate::game::{Board, Cell, Coord, PlayerId};

/// Coordinates of every cell at or above its threshold, in row-major order.
#[must_use]
pub fn exploding_cells(board: &Board) -> Vec<Coord> {
    board
        .cells()
        .filter(|cell| cell.is_critical())
        .map(|cell| cell.coord)
        .collect()
}

/// Split `outflow` over `slots` targets as evenly as possible.
///
/// The first `outflow % slots` targets receive one extra unit. On the
/// rectangular board the threshold always equals the neighbor count so every
/// share is 1; the remainder handling is for other adjacency shapes.
#[must_use]
pub fn split_outflow(outflow: u32, slots: u32) -> impl Iterator<Item = u32> {
    let (base, extra) = if slots == 0 {
        (0, 0)
    } else {
        (outflow / slots, outflow % slots)
    };
    (0..slots).map(move |i| if i < extra { base + 1 } else { base })
}

/// Pending changes for one cell during a round.
#[derive(Debug, Clone, Copy, Default)]
struct Delta {
    /// The cell is a source this round.
    exploding: bool,
    /// Charge left behind by a source.
    remainder: u32,
    /// Total charge received.
    inflow: u32,
    /// Owner of the last source that sent charge here.
    capturer: Option<PlayerId>,
}

/// Resolve one discharge round.
///
/// `exploding` is normally [`exploding_cells`] of `board`. It is sorted and
/// de-duplicated first; entries that are off the board or below threshold are
/// ignored. With nothing to explode the input board is returned by reference.
///
/// Total charge is identical before and after.
#[must_use]
pub fn resolve_round(board: &Board, exploding: &[Coord]) -> Board {
    let mut sources: Vec<&Cell> = exploding
        .iter()
        .filter_map(|&coord| board.get(coord))
        .filter(|cell| cell.is_critical())
        .collect();
    sources.sort_by_key(|cell| cell.coord);
    sources.dedup_by_key(|cell| cell.coord);

    if sources.is_empty() {
        return board.clone();
    }

    let cols = usize::from(board.cols());
    let index = |coord: Coord| usize::from(coord.row) * cols + usize::from(coord.col);
    let mut deltas = vec![Delta::default(); usize::from(board.rows()) * cols];

    // Row-major fold: a later source overwrites `capturer` on shared targets.
    for source in &sources {
        let outflow = u32::from(source.threshold);
        let slot = &mut deltas[index(source.coord)];
        slot.exploding = true;
        slot.remainder = source.charge - outflow;

        let neighbors: Vec<Coord> = board.neighbors(source.coord).collect();
        let slots = u32::try_from(neighbors.len()).unwrap_or(0);
        for (target, share) in neighbors.into_iter().zip(split_outflow(outflow, slots)) {
            let slot = &mut deltas[index(target)];
            slot.inflow += share;
            slot.capturer = source.owner;
        }
    }

    let touched_rows: Vec<bool> = deltas
        .chunks(cols)
        .map(|row| row.iter().any(|d| d.exploding || d.inflow > 0))
        .collect();

    let grid: Vec<Arc<[Cell]>> = board
        .shared_rows()
        .iter()
        .zip(deltas.chunks(cols))
        .zip(touched_rows)
        .map(|((row, row_deltas), touched)| {
            if !touched {
                return Arc::clone(row);
            }
            row.iter()
                .zip(row_deltas)
                .map(|(cell, delta)| apply_delta(*cell, delta))
                .collect()
        })
        .collect();

    Board::from_rows(board.rows(), board.cols(), grid)
}

fn apply_delta(mut cell: Cell, delta: &Delta) -> Cell {
    // Pass 1
    if delta.exploding {
        cell.charge = delta.remainder;
        if cell.charge == 0 {
            cell.owner = None;
        }
    }
    // Pass 2
    if delta.inflow > 0 {
        cell.charge += delta.inflow;
        cell.owner = delta.capturer;
    }
    cell
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_with(rows: u8, cols: u8, cells: &[(u8, u8, u32, PlayerId)]) -> Board {
        let mut board = Board::blank(rows, cols);
        for &(row, col, charge, owner) in cells {
            board = board
                .with_cell(Coord::new(row, col), charge, Some(owner))
                .unwrap();
        }
        board
    }

    #[test]
    fn test_split_outflow_even() {
        assert_eq!(split_outflow(4, 4).collect::<Vec<_>>(), vec![1, 1, 1, 1]);
        assert_eq!(split_outflow(2, 2).collect::<Vec<_>>(), vec![1, 1]);
    }

    #[test]
    fn test_split_outflow_remainder_goes_first() {
        assert_eq!(split_outflow(5, 3).collect::<Vec<_>>(), vec![2, 2, 1]);
        assert_eq!(split_outflow(2, 3).collect::<Vec<_>>(), vec![1, 1, 0]);
        assert_eq!(split_outflow(7, 0).count(), 0);
    }

    #[test]
    fn test_exploding_cells_row_major() {
        let board = board_with(3, 3, &[(2, 2, 2, 1), (0, 0, 2, 1), (1, 1, 3, 2)]);
        assert_eq!(
            exploding_cells(&board),
            vec![Coord::new(0, 0), Coord::new(2, 2)]
        );
    }

    #[test]
    fn test_corner_explosion() {
        let board = board_with(3, 3, &[(0, 0, 2, 1)]);
        let next = resolve_round(&board, &exploding_cells(&board));

        let corner = next.get(Coord::new(0, 0)).unwrap();
        assert_eq!(corner.charge, 0);
        assert_eq!(corner.owner, None);
        assert_eq!(next.get(Coord::new(0, 1)).unwrap().charge, 1);
        assert_eq!(next.get(Coord::new(0, 1)).unwrap().owner, Some(1));
        assert_eq!(next.get(Coord::new(1, 0)).unwrap().charge, 1);
        assert_eq!(next.get(Coord::new(1, 0)).unwrap().owner, Some(1));
        assert_eq!(next.total_charge(), board.total_charge());
    }

    #[test]
    fn test_surplus_stays_with_owner() {
        let board = board_with(3, 3, &[(0, 0, 3, 2)]);
        let next = resolve_round(&board, &exploding_cells(&board));
        let corner = next.get(Coord::new(0, 0)).unwrap();
        assert_eq!(corner.charge, 1);
        assert_eq!(corner.owner, Some(2));
        assert_eq!(next.total_charge(), 3);
    }

    #[test]
    fn test_captures_opponent_cell() {
        let board = board_with(3, 3, &[(0, 0, 2, 1), (0, 1, 2, 2)]);
        // (0,1) is an edge cell with threshold 3, so only the corner fires.
        let next = resolve_round(&board, &exploding_cells(&board));
        let captured = next.get(Coord::new(0, 1)).unwrap();
        assert_eq!(captured.charge, 3);
        assert_eq!(captured.owner, Some(1));
    }

    #[test]
    fn test_simultaneous_capture_last_writer_wins() {
        // (0,1) receives from (0,0) [player 1] and (0,2) [player 2].
        // (0,2) comes later in row-major order, so player 2 wins the cell.
        let board = board_with(3, 3, &[(0, 0, 2, 1), (0, 2, 2, 2)]);
        let next = resolve_round(&board, &exploding_cells(&board));
        let middle = next.get(Coord::new(0, 1)).unwrap();
        assert_eq!(middle.charge, 2);
        assert_eq!(middle.owner, Some(2));
    }

    #[test]
    fn test_order_of_input_does_not_matter() {
        let board = board_with(3, 3, &[(0, 0, 2, 1), (0, 2, 2, 2), (2, 0, 2, 1)]);
        let forward = resolve_round(&board, &exploding_cells(&board));
        let mut reversed = exploding_cells(&board);
        reversed.reverse();
        let backward = resolve_round(&board, &reversed);
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_exploding_cell_also_receives() {
        // Corner (0,0) and edge (0,1) both fire and feed each other.
        let board = board_with(3, 3, &[(0, 0, 2, 1), (0, 1, 3, 2)]);
        let next = resolve_round(&board, &exploding_cells(&board));

        let corner = next.get(Coord::new(0, 0)).unwrap();
        assert_eq!(corner.charge, 1);
        assert_eq!(corner.owner, Some(2));

        let edge = next.get(Coord::new(0, 1)).unwrap();
        assert_eq!(edge.charge, 1);
        assert_eq!(edge.owner, Some(1));

        assert_eq!(next.total_charge(), board.total_charge());
    }

    #[test]
    fn test_empty_set_returns_same_reference() {
        let board = board_with(3, 3, &[(1, 1, 1, 1)]);
        let next = resolve_round(&board, &[]);
        assert!(Board::ptr_eq(&board, &next));
    }

    #[test]
    fn test_below_threshold_entries_ignored() {
        let board = board_with(3, 3, &[(1, 1, 1, 1)]);
        let next = resolve_round(&board, &[Coord::new(1, 1), Coord::new(7, 7)]);
        assert!(Board::ptr_eq(&board, &next));
    }

    #[test]
    fn test_duplicates_ignored() {
        let board = board_with(3, 3, &[(0, 0, 2, 1)]);
        let once = resolve_round(&board, &[Coord::new(0, 0)]);
        let twice = resolve_round(&board, &[Coord::new(0, 0), Coord::new(0, 0)]);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_untouched_rows_shared() {
        let board = board_with(5, 5, &[(0, 0, 2, 1), (4, 4, 1, 2)]);
        let next = resolve_round(&board, &exploding_cells(&board));
        assert!(!Board::row_ptr_eq(&board, &next, 0));
        assert!(!Board::row_ptr_eq(&board, &next, 1));
        assert!(Board::row_ptr_eq(&board, &next, 2));
        assert!(Board::row_ptr_eq(&board, &next, 3));
        assert!(Board::row_ptr_eq(&board, &next, 4));
    }

    #[test]
    fn test_interior_explosion_conserves() {
        let board = board_with(
            4,
            4,
            &[(1, 1, 5, 1), (1, 2, 4, 2), (2, 1, 3, 3), (0, 0, 2, 4)],
        );
        let before = board.total_charge();
        let next = resolve_round(&board, &exploding_cells(&board));
        assert_eq!(next.total_charge(), before);
        for cell in next.cells() {
            assert_eq!(cell.owner.is_none(), cell.charge == 0, "{}", cell.coord);
        }
    }
}
