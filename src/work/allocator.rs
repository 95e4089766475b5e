//! The progress counter shared by all workers.
//!
//! Claiming is a plain read-compute-write of the counter with no internal
//! synchronization. Exclusivity is the caller's job, expressed in the API by
//! requiring a [`LockGuard`] for every claim.

use crate::sync::{LockGuard, RawLock};
use crate::types::{Claim, WorkSpace};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Hands out contiguous claims over `[0, 3N)` until the space is exhausted.
#[derive(Debug)]
pub struct WorkAllocator {
    space: WorkSpace,
    claimed: AtomicUsize,
}

impl WorkAllocator {
    /// Creates an allocator with nothing claimed.
    #[must_use]
    pub fn new(space: WorkSpace) -> Self {
        Self {
            space,
            claimed: AtomicUsize::new(0),
        }
    }

    /// The work space being distributed.
    #[must_use]
    pub fn space(&self) -> WorkSpace {
        self.space
    }

    /// Total number of units, `3 × N`.
    #[must_use]
    pub fn total_units(&self) -> usize {
        self.space.total_units()
    }

    /// Units claimed so far (not necessarily checked).
    #[must_use]
    pub fn claimed(&self) -> usize {
        self.claimed.load(Ordering::Relaxed)
    }

    /// Returns true once every unit has been claimed.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.claimed() >= self.total_units()
    }

    /// Claims the next `increment` units, clipped to what remains.
    ///
    /// The caller must hold the lock that guards this allocator; `_held` is
    /// that proof. An empty claim means no work remains.
    pub fn claim_next<L: RawLock + ?Sized>(
        &self,
        _held: &LockGuard<'_, L>,
        increment: usize,
    ) -> Claim {
        let total = self.total_units();
        let start = self.claimed.load(Ordering::Relaxed);
        if start >= total {
            return Claim::empty(start);
        }
        let size = increment.min(total - start);
        self.claimed.store(start + size, Ordering::Relaxed);
        Claim::new(start, size)
    }
}
