//! Cooperative cancellation signal and the run verdict.
//!
//! Cancellation here is a flag, not an interrupt: workers poll it at the head
//! of their loop and between units, and leave on their own. The first worker
//! to raise the signal records why; later raises are no-ops.

use super::{UnitId, UnitLocation, WorkerId};
use core::fmt;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};

/// Why a run was cancelled: the first failing unit observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelCause {
    /// Worker that found the failing unit.
    pub worker: WorkerId,
    /// Global id of the failing unit.
    pub unit: UnitId,
    /// Band and local index of the failing unit.
    pub location: UnitLocation,
}

impl fmt::Display for CancelCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} found {} invalid", self.worker, self.location)
    }
}

/// Process-wide cancellation flag shared by all workers of a run.
#[derive(Debug, Default)]
pub struct CancelSignal {
    raised: AtomicBool,
    cause: OnceLock<CancelCause>,
}

impl CancelSignal {
    /// Creates a signal in the lowered state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raises the signal.
    ///
    /// Returns `true` if this call was the one that raised it. Only the winning
    /// call's cause is retained.
    pub fn raise(&self, cause: CancelCause) -> bool {
        let won = self
            .raised
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok();
        if won {
            let _ = self.cause.set(cause);
        }
        won
    }

    /// Returns true once any worker has raised the signal.
    #[inline]
    #[must_use]
    pub fn is_raised(&self) -> bool {
        self.raised.load(Ordering::Acquire)
    }

    /// Returns the cause recorded by the first raise, if any.
    #[must_use]
    pub fn cause(&self) -> Option<CancelCause> {
        self.cause.get().copied()
    }
}

/// Overall outcome of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    /// Every unit checked out.
    Valid,
    /// At least one unit failed.
    Invalid,
}

impl Verdict {
    /// Maps a check result to a verdict.
    #[must_use]
    pub const fn from_bool(valid: bool) -> Self {
        if valid { Self::Valid } else { Self::Invalid }
    }

    /// Returns true for [`Verdict::Valid`].
    #[must_use]
    pub const fn is_valid(self) -> bool {
        matches!(self, Self::Valid)
    }

    /// Returns the lowercase label used in log lines.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Valid => "valid",
            Self::Invalid => "invalid",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Band;
    use std::sync::Arc;

    fn cause(worker: usize, unit: usize) -> CancelCause {
        CancelCause {
            worker: WorkerId::new(worker),
            unit: UnitId::new(unit),
            location: UnitLocation::new(Band::Row, unit),
        }
    }

    #[test]
    fn first_raise_wins() {
        let signal = CancelSignal::new();
        assert!(!signal.is_raised());
        assert_eq!(signal.cause(), None);

        assert!(signal.raise(cause(0, 1)));
        assert!(!signal.raise(cause(1, 2)));
        assert!(signal.is_raised());
        assert_eq!(signal.cause(), Some(cause(0, 1)));
    }

    #[test]
    fn concurrent_raises_keep_one_cause() {
        let signal = Arc::new(CancelSignal::new());
        let winners: usize = std::thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|i| {
                    let signal = Arc::clone(&signal);
                    s.spawn(move || usize::from(signal.raise(cause(i, i))))
                })
                .collect();
            handles.into_iter().map(|h| h.join().expect("join")).sum()
        });
        assert_eq!(winners, 1);
        let recorded = signal.cause().expect("cause recorded");
        assert_eq!(recorded.worker.index(), recorded.unit.index());
    }

    #[test]
    fn cause_display() {
        let c = CancelCause {
            worker: WorkerId::new(1),
            unit: UnitId::new(5),
            location: UnitLocation::new(Band::Column, 1),
        };
        assert_eq!(c.to_string(), "Thread 2 found column 2 invalid");
    }

    #[test]
    fn verdict_labels() {
        assert!(Verdict::from_bool(true).is_valid());
        assert_eq!(Verdict::from_bool(false).to_string(), "invalid");
    }
}
