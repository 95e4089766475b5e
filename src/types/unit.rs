//! Work space layout: three contiguous bands of `N` units each.
//!
//! Global ids `[0, N)` are rows, `[N, 2N)` are columns and `[2N, 3N)` are
//! subgrids. The mapping from id to `(band, local)` is fixed for a dimension.

use super::UnitId;
use core::fmt;
use serde::{Deserialize, Serialize};

/// The band a work unit belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Band {
    /// One row of the grid.
    Row,
    /// One column of the grid.
    Column,
    /// One square subgrid.
    Subgrid,
}

impl Band {
    /// All bands in id order.
    pub const ALL: [Self; 3] = [Self::Row, Self::Column, Self::Subgrid];

    /// Returns the position of this band in the work space (0, 1 or 2).
    #[must_use]
    pub const fn ordinal(self) -> usize {
        match self {
            Self::Row => 0,
            Self::Column => 1,
            Self::Subgrid => 2,
        }
    }

    /// Returns the lowercase label used in log lines.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Row => "row",
            Self::Column => "column",
            Self::Subgrid => "subgrid",
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A unit resolved to its band and zero-based index inside the band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnitLocation {
    /// Band of the unit.
    pub band: Band,
    /// Zero-based index within the band.
    pub local: usize,
}

impl UnitLocation {
    /// Creates a location.
    #[must_use]
    pub const fn new(band: Band, local: usize) -> Self {
        Self { band, local }
    }
}

impl fmt::Display for UnitLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.band, self.local + 1)
    }
}

/// The full set of `3 × N` units for a grid of dimension `N`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkSpace {
    dimension: usize,
}

impl WorkSpace {
    /// Creates the work space for a grid of the given dimension.
    #[must_use]
    pub const fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    /// Returns the grid dimension `N`.
    #[must_use]
    pub const fn dimension(&self) -> usize {
        self.dimension
    }

    /// Returns the number of units, `3 × N`.
    #[must_use]
    pub const fn total_units(&self) -> usize {
        self.dimension * 3
    }

    /// Resolves a global id to its band and local index.
    ///
    /// Returns `None` for ids outside `[0, 3N)`.
    #[must_use]
    pub const fn locate(&self, unit: UnitId) -> Option<UnitLocation> {
        let n = self.dimension;
        let id = unit.index();
        if id < n {
            Some(UnitLocation::new(Band::Row, id))
        } else if id < 2 * n {
            Some(UnitLocation::new(Band::Column, id - n))
        } else if id < 3 * n {
            Some(UnitLocation::new(Band::Subgrid, id - 2 * n))
        } else {
            None
        }
    }

    /// Inverse of [`locate`](Self::locate).
    ///
    /// Returns `None` when `local` is not below `N`.
    #[must_use]
    pub const fn unit_at(&self, location: UnitLocation) -> Option<UnitId> {
        if location.local >= self.dimension {
            return None;
        }
        Some(UnitId::new(location.band.ordinal() * self.dimension + location.local))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bands_partition_the_space() {
        let space = WorkSpace::new(4);
        assert_eq!(space.total_units(), 12);

        let bands: Vec<Band> = (0..12)
            .map(|i| space.locate(UnitId::new(i)).expect("in range").band)
            .collect();
        assert_eq!(&bands[0..4], &[Band::Row; 4]);
        assert_eq!(&bands[4..8], &[Band::Column; 4]);
        assert_eq!(&bands[8..12], &[Band::Subgrid; 4]);
        assert_eq!(space.locate(UnitId::new(12)), None);
    }

    #[test]
    fn locate_and_unit_at_agree() {
        let space = WorkSpace::new(9);
        for i in 0..space.total_units() {
            let id = UnitId::new(i);
            let loc = space.locate(id).expect("in range");
            assert_eq!(space.unit_at(loc), Some(id));
        }
        assert_eq!(space.unit_at(UnitLocation::new(Band::Row, 9)), None);
    }

    #[test]
    fn location_labels_are_one_based() {
        let space = WorkSpace::new(4);
        let loc = space.locate(UnitId::new(5)).expect("in range");
        assert_eq!(loc, UnitLocation::new(Band::Column, 1));
        assert_eq!(loc.to_string(), "column 2");
    }

    #[test]
    fn empty_space_locates_nothing() {
        let space = WorkSpace::new(0);
        assert_eq!(space.total_units(), 0);
        assert_eq!(space.locate(UnitId::new(0)), None);
    }
}
