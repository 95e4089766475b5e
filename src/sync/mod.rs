//! Hand-built mutual exclusion primitives.
//!
//! Two interchangeable locks sit behind [`RawLock`]:
//!
//! - [`SpinLock`]: a single test-and-set flag; simplest, no fairness.
//! - [`BoundedFairLock`]: compare-and-swap plus a waiter registry; a waiting
//!   worker is served within one rotation of the registry.
//!
//! Both busy-wait. Neither parks the thread, because the fairness bound of the
//! registry lock is defined in terms of CAS contention, not an OS queue.
//!
//! [`LockGuard`] pairs every acquire with exactly one release, including on
//! early-exit and unwinding paths.

pub mod bounded;
pub mod spin;

pub use bounded::{BoundedFairLock, WaiterRegistry};
pub use spin::SpinLock;

use crate::types::WorkerId;
use core::fmt;
use serde::{Deserialize, Serialize};

/// A raw mutual exclusion primitive keyed by worker id.
///
/// `release` must only be called by the worker that currently owns the lock.
/// Prefer [`RawLock::lock`], which returns a guard that releases on drop.
pub trait RawLock: Sync {
    /// Spins until `worker` owns the lock.
    fn acquire(&self, worker: WorkerId);

    /// Relinquishes ownership held by `worker`.
    fn release(&self, worker: WorkerId);

    /// Acquires the lock and returns a guard that releases it when dropped.
    fn lock(&self, worker: WorkerId) -> LockGuard<'_, Self>
    where
        Self: Sized,
    {
        self.acquire(worker);
        LockGuard { lock: self, worker }
    }
}

/// Proof that a worker holds a [`RawLock`]. Releases on drop.
#[must_use = "the lock is released as soon as the guard is dropped"]
pub struct LockGuard<'a, L: RawLock + ?Sized> {
    lock: &'a L,
    worker: WorkerId,
}

impl<L: RawLock + ?Sized> LockGuard<'_, L> {
    /// The worker holding the lock.
    #[must_use]
    pub fn worker(&self) -> WorkerId {
        self.worker
    }
}

impl<L: RawLock + ?Sized> Drop for LockGuard<'_, L> {
    fn drop(&mut self) {
        self.lock.release(self.worker);
    }
}

impl<L: RawLock + ?Sized> fmt::Debug for LockGuard<'_, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LockGuard")
            .field("worker", &self.worker)
            .finish()
    }
}

/// Selects which lock a run uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum LockKind {
    /// Test-and-set spin lock.
    Spin,
    /// Bounded-waiting compare-and-swap lock.
    #[default]
    #[serde(alias = "bounded")]
    #[cfg_attr(feature = "cli", value(alias = "bounded"))]
    BoundedFair,
}

impl LockKind {
    /// Returns the kebab-case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Spin => "spin",
            Self::BoundedFair => "bounded-fair",
        }
    }
}

impl fmt::Display for LockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A lock of either kind, dispatched statically.
#[derive(Debug)]
pub enum Lock {
    /// See [`SpinLock`].
    Spin(SpinLock),
    /// See [`BoundedFairLock`].
    BoundedFair(BoundedFairLock),
}

impl Lock {
    /// Builds the lock selected by `kind` for up to `workers` workers.
    #[must_use]
    pub fn new(kind: LockKind, workers: usize) -> Self {
        match kind {
            LockKind::Spin => Self::Spin(SpinLock::new()),
            LockKind::BoundedFair => Self::BoundedFair(BoundedFairLock::with_capacity(workers)),
        }
    }

    /// Returns the kind of this lock.
    #[must_use]
    pub const fn kind(&self) -> LockKind {
        match self {
            Self::Spin(_) => LockKind::Spin,
            Self::BoundedFair(_) => LockKind::BoundedFair,
        }
    }
}

impl RawLock for Lock {
    #[inline]
    fn acquire(&self, worker: WorkerId) {
        match self {
            Self::Spin(lock) => lock.acquire(worker),
            Self::BoundedFair(lock) => lock.acquire(worker),
        }
    }

    #[inline]
    fn release(&self, worker: WorkerId) {
        match self {
            Self::Spin(lock) => lock.release(worker),
            Self::BoundedFair(lock) => lock.release(worker),
        }
    }
}
