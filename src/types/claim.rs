//! Claims: contiguous unit ranges granted to one worker per allocator call.

use super::UnitId;
use core::fmt;
use core::ops::Range;
use serde::{Deserialize, Serialize};

/// A half-open range `[start, start + size)` of unit ids.
///
/// A claim of size zero means the work space is exhausted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Claim {
    start: usize,
    size: usize,
}

impl Claim {
    /// Creates a claim.
    #[must_use]
    pub const fn new(start: usize, size: usize) -> Self {
        Self { start, size }
    }

    /// The claim returned once no work remains.
    #[must_use]
    pub const fn empty(at: usize) -> Self {
        Self::new(at, 0)
    }

    /// First unit of the claim.
    #[must_use]
    pub const fn start(&self) -> usize {
        self.start
    }

    /// Number of units in the claim.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// One past the last unit of the claim.
    #[must_use]
    pub const fn end(&self) -> usize {
        self.start + self.size
    }

    /// Returns true if this claim signals that no work remains.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns the claimed index range.
    #[must_use]
    pub const fn range(&self) -> Range<usize> {
        self.start..self.end()
    }

    /// Iterates the claimed units in increasing order.
    pub fn units(&self) -> impl Iterator<Item = UnitId> + use<> {
        self.range().map(UnitId::new)
    }

    /// Returns true if the two claims share any unit.
    #[must_use]
    pub const fn overlaps(&self, other: &Self) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.start < other.end()
            && other.start < self.end()
    }
}

impl fmt::Display for Claim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end())
    }
}
