//! The per-unit check behind the scheduler.
//!
//! The scheduler knows nothing about what a unit means. It hands each claimed
//! unit to a [`UnitChecker`] as `(dimension, band, local)` and only looks at
//! the boolean that comes back.

pub mod sudoku;

pub use sudoku::SudokuGrid;

use crate::types::Band;

/// A pure predicate over work units.
///
/// Implementations must be deterministic and free of side effects; they are
/// called concurrently from every worker over shared read-only data.
pub trait UnitChecker: Sync {
    /// Returns true if unit `local` of `band` is valid in a grid of `dimension`.
    fn check_unit(&self, dimension: usize, band: Band, local: usize) -> bool;
}

impl<F> UnitChecker for F
where
    F: Fn(usize, Band, usize) -> bool + Sync,
{
    fn check_unit(&self, dimension: usize, band: Band, local: usize) -> bool {
        self(dimension, band, local)
    }
}
