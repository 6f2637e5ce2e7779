//! Board, cell and coordinate types.
//!
//! A [`Board`] is a persistent value: rows live behind [`Arc`] and every
//! mutation returns a new board that shares untouched rows with its input.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::game::player::{validate_player_id, PlayerId};

/// Smallest allowed row or column count.
pub const MIN_DIMENSION: u8 = 3;

/// Largest allowed row or column count.
pub const MAX_DIMENSION: u8 = 20;

/// A cell position on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Coord {
    /// Row index (0 is the top row).
    pub row: u8,
    /// Column index (0 is the left column).
    pub col: u8,
}

impl Coord {
    /// Create a new coordinate.
    #[must_use]
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// Get in-bounds neighbor coordinates in the fixed order up, down, left, right.
    ///
    /// Returns a fixed-size array and count to avoid heap allocation.
    /// The array contains valid coordinates in indices 0..count.
    #[must_use]
    #[inline]
    pub fn neighbors(&self, rows: u8, cols: u8) -> ([Coord; 4], u8) {
        let mut result = [Coord::new(0, 0); 4];
        let mut count = 0u8;

        if self.row > 0 {
            result[count as usize] = Coord::new(self.row - 1, self.col); // up
            count += 1;
        }
        if self.row < rows.saturating_sub(1) {
            result[count as usize] = Coord::new(self.row + 1, self.col); // down
            count += 1;
        }
        if self.col > 0 {
            result[count as usize] = Coord::new(self.row, self.col - 1); // left
            count += 1;
        }
        if self.col < cols.saturating_sub(1) {
            result[count as usize] = Coord::new(self.row, self.col + 1); // right
            count += 1;
        }

        (result, count)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Critical mass of a cell: the number of in-bounds orthogonal neighbors.
///
/// Corners give 2, non-corner border cells 3, interior cells 4.
#[must_use]
pub const fn threshold(row: u8, col: u8, rows: u8, cols: u8) -> u8 {
    let mut count = 4;
    if row == 0 {
        count -= 1;
    }
    if row >= rows.saturating_sub(1) {
        count -= 1;
    }
    if col == 0 {
        count -= 1;
    }
    if col >= cols.saturating_sub(1) {
        count -= 1;
    }
    count
}

/// A single board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// Position of this cell.
    pub coord: Coord,
    /// Units of charge held (0 when empty).
    pub charge: u32,
    /// Owning player; `None` exactly when `charge == 0`.
    pub owner: Option<PlayerId>,
    /// Charge at which the cell discharges.
    pub threshold: u8,
}

impl Cell {
    /// Create an empty cell at `coord` on a `rows` x `cols` board.
    #[must_use]
    pub const fn empty(coord: Coord, rows: u8, cols: u8) -> Self {
        Self {
            coord,
            charge: 0,
            owner: None,
            threshold: threshold(coord.row, coord.col, rows, cols),
        }
    }

    /// Whether the cell holds no charge.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.charge == 0
    }

    /// Whether the cell is at or above its threshold.
    #[must_use]
    pub const fn is_critical(&self) -> bool {
        self.charge >= self.threshold as u32
    }
}

/// The game board.
///
/// Cloning is O(1). Two boards produced from one another share every row the
/// producing operation did not touch.
#[derive(Debug, Clone)]
pub struct Board {
    rows: u8,
    cols: u8,
    /// Row table; each row is an immutable shared slice of cells.
    grid: Arc<[Arc<[Cell]>]>,
}

impl Board {
    /// Create an empty board.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidDimensions`] if either dimension is
    /// outside `[MIN_DIMENSION, MAX_DIMENSION]`.
    pub fn new(rows: u8, cols: u8) -> EngineResult<Self> {
        let valid = MIN_DIMENSION..=MAX_DIMENSION;
        if !valid.contains(&rows) || !valid.contains(&cols) {
            return Err(EngineError::InvalidDimensions { rows, cols });
        }
        Ok(Self::blank(rows, cols))
    }

    /// Build an empty board without dimension checks.
    pub(crate) fn blank(rows: u8, cols: u8) -> Self {
        let grid: Vec<Arc<[Cell]>> = (0..rows)
            .map(|row| {
                (0..cols)
                    .map(|col| Cell::empty(Coord::new(row, col), rows, cols))
                    .collect()
            })
            .collect();
        Self {
            rows,
            cols,
            grid: grid.into(),
        }
    }

    /// Assemble a board from a complete row table.
    pub(crate) fn from_rows(rows: u8, cols: u8, grid: Vec<Arc<[Cell]>>) -> Self {
        Self {
            rows,
            cols,
            grid: grid.into(),
        }
    }

    /// Number of rows.
    #[must_use]
    pub const fn rows(&self) -> u8 {
        self.rows
    }

    /// Number of columns.
    #[must_use]
    pub const fn cols(&self) -> u8 {
        self.cols
    }

    /// Check if a coordinate is within the board.
    #[must_use]
    pub const fn in_bounds(&self, coord: Coord) -> bool {
        coord.row < self.rows && coord.col < self.cols
    }

    /// Get the cell at `coord`.
    #[must_use]
    pub fn get(&self, coord: Coord) -> Option<&Cell> {
        self.grid
            .get(usize::from(coord.row))
            .and_then(|row| row.get(usize::from(coord.col)))
    }

    /// Get one row of cells.
    #[must_use]
    pub fn row(&self, row: u8) -> Option<&[Cell]> {
        self.grid.get(usize::from(row)).map(|r| &r[..])
    }

    /// Shared handles to all rows, for builders that reuse untouched rows.
    pub(crate) fn shared_rows(&self) -> &[Arc<[Cell]>] {
        &self.grid
    }

    /// Iterate over every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.grid.iter().flat_map(|row| row.iter())
    }

    /// In-bounds neighbors of `coord` in the order up, down, left, right.
    ///
    /// Empty when `coord` itself is off the board.
    pub fn neighbors(&self, coord: Coord) -> impl Iterator<Item = Coord> {
        let (adjacent, count) = if self.in_bounds(coord) {
            coord.neighbors(self.rows, self.cols)
        } else {
            ([coord; 4], 0)
        };
        adjacent.into_iter().take(usize::from(count))
    }

    /// Sum of charge over the whole board.
    #[must_use]
    pub fn total_charge(&self) -> u64 {
        self.cells().map(|c| u64::from(c.charge)).sum()
    }

    /// Total charge held by one player.
    #[must_use]
    pub fn charge_of(&self, player: PlayerId) -> u64 {
        self.cells()
            .filter(|c| c.owner == Some(player))
            .map(|c| u64::from(c.charge))
            .sum()
    }

    /// Whether two boards are the same value by reference.
    #[must_use]
    pub fn ptr_eq(a: &Board, b: &Board) -> bool {
        Arc::ptr_eq(&a.grid, &b.grid)
    }

    /// Whether row `row` is the same shared allocation in both boards.
    #[must_use]
    pub fn row_ptr_eq(a: &Board, b: &Board, row: u8) -> bool {
        match (a.grid.get(usize::from(row)), b.grid.get(usize::from(row))) {
            (Some(x), Some(y)) => Arc::ptr_eq(x, y),
            _ => false,
        }
    }

    /// Deposit one unit of charge for `player` at `coord`.
    ///
    /// Returns a new board; only the target row is reallocated.
    ///
    /// # Errors
    ///
    /// - [`EngineError::InvalidPlayerId`] if `player` is not a valid id.
    /// - [`EngineError::OutOfBounds`] if `coord` is outside the board.
    /// - [`EngineError::CellOwnershipConflict`] if another player owns the cell.
    pub fn place(&self, coord: Coord, player: PlayerId) -> EngineResult<Board> {
        validate_player_id(player)?;
        let cell = self.get(coord).ok_or(EngineError::OutOfBounds { coord })?;
        if let Some(owner) = cell.owner {
            if owner != player {
                return Err(EngineError::CellOwnershipConflict { coord, owner });
            }
        }

        let row_idx = usize::from(coord.row);
        let mut row: Vec<Cell> = self.grid[row_idx].to_vec();
        let target = &mut row[usize::from(coord.col)];
        target.charge += 1;
        target.owner = Some(player);

        let mut grid: Vec<Arc<[Cell]>> = self.grid.to_vec();
        grid[row_idx] = row.into();
        Ok(Self::from_rows(self.rows, self.cols, grid))
    }

    /// Return a copy of this board with one cell overwritten.
    ///
    /// Intended for setting up positions in tests and tools. The owner is
    /// cleared when `charge` is 0. Charge may exceed the threshold.
    ///
    /// # Errors
    ///
    /// - [`EngineError::OutOfBounds`] if `coord` is outside the board.
    /// - [`EngineError::UnownedCharge`] if `charge > 0` with no owner.
    /// - [`EngineError::InvalidPlayerId`] if the owner is not a valid id.
    pub fn with_cell(
        &self,
        coord: Coord,
        charge: u32,
        owner: Option<PlayerId>,
    ) -> EngineResult<Board> {
        if !self.in_bounds(coord) {
            return Err(EngineError::OutOfBounds { coord });
        }
        if charge > 0 {
            let player = owner.ok_or(EngineError::UnownedCharge { coord })?;
            validate_player_id(player)?;
        }
        let row_idx = usize::from(coord.row);
        let mut row: Vec<Cell> = self.grid[row_idx].to_vec();
        let target = &mut row[usize::from(coord.col)];
        target.charge = charge;
        target.owner = if charge == 0 { None } else { owner };

        let mut grid: Vec<Arc<[Cell]>> = self.grid.to_vec();
        grid[row_idx] = row.into();
        Ok(Self::from_rows(self.rows, self.cols, grid))
    }
}

impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        self.rows == other.rows
            && self.cols == other.cols
            && (Board::ptr_eq(self, other) || self.cells().eq(other.cells()))
    }
}

impl Eq for Board {}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.grid.iter() {
            let mut first = true;
            for cell in row.iter() {
                if !first {
                    f.write_str(" ")?;
                }
                first = false;
                match cell.owner {
                    Some(owner) if cell.charge > 0 => write!(f, "{}{}", cell.charge, owner)?,
                    _ => f.write_str(" .")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Create an empty board.
///
/// # Errors
///
/// Returns [`EngineError::InvalidDimensions`] if either dimension is outside
/// `[3, 20]`.
pub fn create_board(rows: u8, cols: u8) -> EngineResult<Board> {
    Board::new(rows, cols)
}

/// Deposit one unit of charge for `player` at `coord`. See [`Board::place`].
///
/// # Errors
///
/// Same as [`Board::place`].
pub fn place(board: &Board, coord: Coord, player: PlayerId) -> EngineResult<Board> {
    board.place(coord, player)
}
