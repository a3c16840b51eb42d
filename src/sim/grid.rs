//! Square tile grid
//!
//! Cells are stored row-major. A value of 0 is an empty cell; every other
//! value is a power of two no larger than [`MAX_TILE`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_TILE, MIN_GRID_SIZE};
use crate::error::EngineError;

/// Tile value (0 = empty)
pub type Tile = u64;

/// Position of a cell as (row, col)
pub type Cell = (usize, usize);

/// An N×N board of tiles
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<Tile>>", into = "Vec<Vec<Tile>>")]
pub struct Grid {
    size: usize,
    cells: Vec<Tile>,
}

impl Grid {
    /// Create an empty grid of the given size
    pub fn new(size: usize) -> Result<Self, EngineError> {
        if size < MIN_GRID_SIZE {
            return Err(EngineError::InvalidGridSize(size));
        }
        Ok(Self {
            size,
            cells: vec![0; size * size],
        })
    }

    /// Build a grid from rows, checking shape and tile values
    pub fn from_rows<R: AsRef<[Tile]>>(rows: &[R]) -> Result<Self, EngineError> {
        let size = rows.len();
        let mut grid = Self::new(size)?;
        for (row, cells) in rows.iter().enumerate() {
            let cells = cells.as_ref();
            if cells.len() != size {
                return Err(EngineError::NonSquareGrid {
                    row,
                    len: cells.len(),
                    expected: size,
                });
            }
            for (col, &value) in cells.iter().enumerate() {
                if value != 0 && (!value.is_power_of_two() || value > MAX_TILE) {
                    return Err(EngineError::InvalidTile { row, col, value });
                }
                grid.set(row, col, value);
            }
        }
        Ok(grid)
    }

    /// Side length
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Tile {
        self.cells[row * self.size + col]
    }

    #[inline]
    pub(crate) fn set(&mut self, row: usize, col: usize, value: Tile) {
        self.cells[row * self.size + col] = value;
    }

    /// Borrow one row
    #[inline]
    pub fn row(&self, row: usize) -> &[Tile] {
        let start = row * self.size;
        &self.cells[start..start + self.size]
    }

    #[inline]
    pub(crate) fn row_mut(&mut self, row: usize) -> &mut [Tile] {
        let start = row * self.size;
        &mut self.cells[start..start + self.size]
    }

    /// Copy out as nested rows
    pub fn rows(&self) -> Vec<Vec<Tile>> {
        self.cells.chunks(self.size).map(<[Tile]>::to_vec).collect()
    }

    /// All tiles in row-major order
    pub fn tiles(&self) -> &[Tile] {
        &self.cells
    }

    /// Empty cells in row-major order
    pub fn empty_cells(&self) -> Vec<Cell> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, v)| **v == 0)
            .map(|(i, _)| (i / self.size, i % self.size))
            .collect()
    }

    pub fn has_empty(&self) -> bool {
        self.cells.contains(&0)
    }

    pub fn count_empty(&self) -> usize {
        self.cells.iter().filter(|v| **v == 0).count()
    }

    /// Largest tile on the board (0 if empty)
    pub fn max_tile(&self) -> Tile {
        self.cells.iter().copied().max().unwrap_or(0)
    }

    /// Sum of all tile values (saturating)
    pub fn tile_sum(&self) -> Tile {
        self.cells.iter().fold(0, |sum: Tile, v| sum.saturating_add(*v))
    }

    /// Swap rows and columns
    pub fn transpose(&self) -> Self {
        let mut out = self.clone();
        for row in 0..self.size {
            for col in 0..self.size {
                out.set(col, row, self.get(row, col));
            }
        }
        out
    }

    /// Reverse every row (left-right mirror)
    pub fn mirror(&self) -> Self {
        let mut out = self.clone();
        for row in 0..self.size {
            out.row_mut(row).reverse();
        }
        out
    }

    /// True when no move can change the board: no empty cell and no
    /// horizontally or vertically adjacent pair that can merge.
    pub fn is_terminal(&self) -> bool {
        if self.has_empty() {
            return false;
        }
        for row in 0..self.size {
            for col in 0..self.size {
                let value = self.get(row, col);
                if col + 1 < self.size && can_merge(value, self.get(row, col + 1)) {
                    return false;
                }
                if row + 1 < self.size && can_merge(value, self.get(row + 1, col)) {
                    return false;
                }
            }
        }
        true
    }
}

/// Two tiles merge when they are equal, non-empty and below the tile cap
#[inline]
pub(crate) fn can_merge(a: Tile, b: Tile) -> bool {
    a == b && a != 0 && a < MAX_TILE
}

impl TryFrom<Vec<Vec<Tile>>> for Grid {
    type Error = EngineError;

    fn try_from(rows: Vec<Vec<Tile>>) -> Result<Self, Self::Error> {
        Self::from_rows(&rows)
    }
}

impl From<Grid> for Vec<Vec<Tile>> {
    fn from(grid: Grid) -> Self {
        grid.rows()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.max_tile().max(1).to_string().len();
        for row in 0..self.size {
            for (col, value) in self.row(row).iter().enumerate() {
                if col > 0 {
                    write!(f, " ")?;
                }
                if *value == 0 {
                    write!(f, "{:>width$}", ".")?;
                } else {
                    write!(f, "{value:>width$}")?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Free-function form of [`Grid::is_terminal`]
#[inline]
pub fn is_terminal(grid: &Grid) -> bool {
    grid.is_terminal()
}
