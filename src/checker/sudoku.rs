//! Sudoku rows, columns and subgrids as work units.

use super::UnitChecker;
use crate::error::GridError;
use crate::types::Band;

/// An `N × N` sudoku grid with `N` a perfect square.
///
/// A unit is valid when it holds no repeated value. Values are range-checked
/// at construction, so checks never index out of bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SudokuGrid {
    cells: Vec<Vec<u32>>,
    dimension: usize,
    box_side: usize,
}

impl SudokuGrid {
    /// Validates and wraps a grid given as rows.
    pub fn new(cells: Vec<Vec<u32>>) -> Result<Self, GridError> {
        let dimension = cells.len();
        if dimension == 0 {
            return Err(GridError::Empty);
        }
        let box_side = dimension.isqrt();
        if box_side * box_side != dimension {
            return Err(GridError::NotPerfectSquare(dimension));
        }
        for (r, row) in cells.iter().enumerate() {
            if row.len() != dimension {
                return Err(GridError::RaggedRow {
                    row: r + 1,
                    len: row.len(),
                    expected: dimension,
                });
            }
            for (c, &value) in row.iter().enumerate() {
                if value == 0 || value as usize > dimension {
                    return Err(GridError::ValueOutOfRange {
                        row: r + 1,
                        col: c + 1,
                        value,
                        max: dimension,
                    });
                }
            }
        }
        Ok(Self {
            cells,
            dimension,
            box_side,
        })
    }

    /// Side length `N`.
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Side length of one subgrid, `√N`.
    #[must_use]
    pub fn box_side(&self) -> usize {
        self.box_side
    }

    /// Rows of the grid.
    #[must_use]
    pub fn rows(&self) -> &[Vec<u32>] {
        &self.cells
    }

    /// Top-left corner `(row, col)` of subgrid `index`, numbered row-major.
    #[must_use]
    pub fn subgrid_origin(&self, index: usize) -> (usize, usize) {
        let n = self.box_side;
        ((index / n) * n, (index % n) * n)
    }

    /// Returns true if row `row` has no repeated value.
    ///
    /// A row past the edge of the grid is invalid.
    #[must_use]
    pub fn check_row(&self, row: usize) -> bool {
        self.cells
            .get(row)
            .is_some_and(|cells| all_distinct(self.dimension, cells.iter().copied()))
    }

    /// Returns true if column `col` has no repeated value.
    ///
    /// A column past the edge of the grid is invalid.
    #[must_use]
    pub fn check_column(&self, col: usize) -> bool {
        col < self.dimension && all_distinct(self.dimension, self.cells.iter().map(|row| row[col]))
    }

    /// Returns true if subgrid `index` has no repeated value.
    ///
    /// Subgrids are numbered row-major; an index of `N` or more is invalid.
    #[must_use]
    pub fn check_subgrid(&self, index: usize) -> bool {
        if index >= self.dimension {
            return false;
        }
        let (top, left) = self.subgrid_origin(index);
        let n = self.box_side;
        let values = self.cells[top..top + n]
            .iter()
            .flat_map(|row| row[left..left + n].iter().copied());
        all_distinct(self.dimension, values)
    }
}

fn all_distinct(dimension: usize, values: impl Iterator<Item = u32>) -> bool {
    let mut seen = vec![false; dimension];
    for value in values {
        let slot = &mut seen[value as usize - 1];
        if *slot {
            return false;
        }
        *slot = true;
    }
    true
}

impl UnitChecker for SudokuGrid {
    fn check_unit(&self, dimension: usize, band: Band, local: usize) -> bool {
        if dimension != self.dimension {
            return false;
        }
        match band {
            Band::Row => self.check_row(local),
            Band::Column => self.check_column(local),
            Band::Subgrid => self.check_subgrid(local),
        }
    }
}
