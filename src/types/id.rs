//! Identifier types for workers and work units.
//!
//! Both wrap a zero-based index. Human-facing labels (log lines, reports) are
//! one-based, matching how threads and rows are numbered in the output.

use core::fmt;
use serde::{Deserialize, Serialize};

/// Identifier of one worker thread in a run.
///
/// The index doubles as the worker's slot in the bounded-waiting registry, so
/// it must be below the lock's capacity.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkerId(usize);

impl WorkerId {
    /// Creates a worker id from its zero-based index.
    #[inline]
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the zero-based index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }

    /// Returns the one-based number used in log lines.
    #[inline]
    #[must_use]
    pub const fn number(self) -> usize {
        self.0 + 1
    }
}

impl fmt::Debug for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WorkerId({})", self.0)
    }
}

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Thread {}", self.number())
    }
}

/// Global identifier of one work unit in `[0, 3N)`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitId(usize);

impl UnitId {
    /// Creates a unit id from its global index.
    #[inline]
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the global index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Debug for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UnitId({})", self.0)
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "U{}", self.0)
    }
}

impl From<usize> for UnitId {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn worker_labels_are_one_based() {
        let id = WorkerId::new(0);
        assert_eq!(id.index(), 0);
        assert_eq!(id.number(), 1);
        assert_eq!(id.to_string(), "Thread 1");
        assert_eq!(format!("{id:?}"), "WorkerId(0)");
    }

    #[test]
    fn unit_id_serializes_transparently() {
        let json = serde_json::to_string(&UnitId::new(7)).expect("serialize");
        assert_eq!(json, "7");
        let back: UnitId = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, UnitId::new(7));
    }
}
