//! Test-and-set spin lock.

use super::RawLock;
use crate::types::WorkerId;
use std::sync::atomic::{AtomicBool, Ordering};

/// A single atomic flag acquired by test-and-set in a tight loop.
///
/// There is no fairness: under contention a worker can lose the race
/// indefinitely. The latency recorder is how that shows up, not something this
/// type tries to prevent.
#[derive(Debug, Default)]
pub struct SpinLock {
    locked: AtomicBool,
}

impl SpinLock {
    /// Creates an unlocked spin lock.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            locked: AtomicBool::new(false),
        }
    }

    /// Returns true if some worker currently holds the lock.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.locked.load(Ordering::Relaxed)
    }

    /// Attempts a single test-and-set.
    #[must_use]
    pub fn try_acquire(&self) -> bool {
        !self.locked.swap(true, Ordering::Acquire)
    }
}

impl RawLock for SpinLock {
    fn acquire(&self, _worker: WorkerId) {
        while self.locked.swap(true, Ordering::Acquire) {
            std::hint::spin_loop();
        }
    }

    fn release(&self, _worker: WorkerId) {
        self.locked.store(false, Ordering::Release);
    }
}
