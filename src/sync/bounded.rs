//! Bounded-waiting compare-and-swap lock.
//!
//! A worker announces itself in a [`WaiterRegistry`] before contending. On
//! release the owner scans the registry starting just past its own slot and
//! hands the lock to the first waiter it finds instead of freeing it. Every
//! acquisition, granted or won by a direct CAS, moves the scan pointer past
//! the new owner. A handed-off lock
//! is left in the `GRANTED` state, so no newcomer can CAS it away before the
//! grantee finalizes ownership.
//!
//! The bound is "served within one rotation": a registered waiter sees at most
//! `capacity - 1` grants to others before its own. It is not FIFO.

use super::RawLock;
use crate::types::WorkerId;
use std::sync::atomic::{AtomicBool, AtomicU8, AtomicU64, AtomicUsize, Ordering};

const FREE: u8 = 0;
const HELD: u8 = 1;
const GRANTED: u8 = 2;

const NO_OWNER: usize = usize::MAX;

/// Fixed-capacity table of waiting flags indexed by worker, plus the rotating
/// next-to-serve pointer.
///
/// The capacity is a hard limit chosen at construction. Worker indices at or
/// above it are a programming error and panic.
#[derive(Debug)]
pub struct WaiterRegistry {
    waiting: Box<[AtomicBool]>,
    count: AtomicUsize,
    next: AtomicUsize,
}

impl WaiterRegistry {
    /// Creates a registry with one slot per worker.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "waiter registry needs at least one slot");
        Self {
            waiting: (0..capacity).map(|_| AtomicBool::new(false)).collect(),
            count: AtomicUsize::new(0),
            next: AtomicUsize::new(0),
        }
    }

    /// Number of slots.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.waiting.len()
    }

    fn slot(&self, worker: WorkerId) -> &AtomicBool {
        let index = worker.index();
        assert!(
            index < self.waiting.len(),
            "{worker:?} exceeds waiter registry capacity {}",
            self.waiting.len()
        );
        &self.waiting[index]
    }

    /// Marks `worker` as waiting.
    pub fn register(&self, worker: WorkerId) {
        self.slot(worker).store(true, Ordering::SeqCst);
        self.count.fetch_add(1, Ordering::SeqCst);
    }

    /// Returns true while `worker` is registered and not yet granted.
    #[must_use]
    pub fn is_waiting(&self, worker: WorkerId) -> bool {
        self.slot(worker).load(Ordering::SeqCst)
    }

    /// Removes `worker` from the registry after it has entered.
    pub fn withdraw(&self, worker: WorkerId) {
        self.slot(worker).store(false, Ordering::SeqCst);
        self.count.fetch_sub(1, Ordering::SeqCst);
    }

    /// Number of registered waiters, granted or not.
    #[must_use]
    pub fn waiters(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Finds the first waiting slot at or after the rotating pointer.
    ///
    /// Only the current lock owner calls this.
    #[must_use]
    pub fn next_waiter(&self) -> Option<WorkerId> {
        let capacity = self.waiting.len();
        let start = self.next.load(Ordering::Relaxed);
        (0..capacity)
            .map(|offset| (start + offset) % capacity)
            .find(|&index| self.waiting[index].load(Ordering::SeqCst))
            .map(WorkerId::new)
    }

    /// Moves the pointer just past `worker`, so the next scan starts there.
    ///
    /// Only the current lock owner calls this.
    pub fn serve_after(&self, worker: WorkerId) {
        let capacity = self.waiting.len();
        self.next
            .store((worker.index() + 1) % capacity, Ordering::Relaxed);
    }

    /// Clears `worker`'s flag, handing it the lock, and moves the pointer past it.
    ///
    /// Only the current lock owner calls this.
    pub fn grant(&self, worker: WorkerId) {
        self.serve_after(worker);
        self.slot(worker).store(false, Ordering::SeqCst);
    }
}

/// Lock with bounded waiting built from CAS and a [`WaiterRegistry`].
#[derive(Debug)]
pub struct BoundedFairLock {
    state: AtomicU8,
    registry: WaiterRegistry,
    owner: AtomicUsize,
    handoffs: AtomicU64,
    direct: AtomicU64,
}

impl BoundedFairLock {
    /// Creates a free lock for workers `0..capacity`.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            state: AtomicU8::new(FREE),
            registry: WaiterRegistry::with_capacity(capacity),
            owner: AtomicUsize::new(NO_OWNER),
            handoffs: AtomicU64::new(0),
            direct: AtomicU64::new(0),
        }
    }

    /// The waiter registry.
    #[must_use]
    pub fn registry(&self) -> &WaiterRegistry {
        &self.registry
    }

    /// Number of acquisitions completed through a release hand-off.
    #[must_use]
    pub fn handoffs(&self) -> u64 {
        self.handoffs.load(Ordering::Relaxed)
    }

    /// Number of acquisitions won by a direct CAS on a free lock.
    #[must_use]
    pub fn direct_entries(&self) -> u64 {
        self.direct.load(Ordering::Relaxed)
    }

    /// Returns the current owner, if any.
    #[must_use]
    pub fn owner(&self) -> Option<WorkerId> {
        match self.owner.load(Ordering::Relaxed) {
            NO_OWNER => None,
            index => Some(WorkerId::new(index)),
        }
    }

    fn try_take_free(&self) -> bool {
        self.state.load(Ordering::Relaxed) == FREE
            && self
                .state
                .compare_exchange(FREE, HELD, Ordering::Acquire, Ordering::Relaxed)
                .is_ok()
    }
}

impl RawLock for BoundedFairLock {
    fn acquire(&self, worker: WorkerId) {
        self.registry.register(worker);

        let mut direct = false;
        while self.registry.is_waiting(worker) {
            if self.try_take_free() {
                direct = true;
                break;
            }
            std::hint::spin_loop();
        }

        self.registry.withdraw(worker);

        if direct {
            // The pointer sits just past the owner on every entry path.
            self.registry.serve_after(worker);
            self.direct.fetch_add(1, Ordering::Relaxed);
        } else {
            // Granted: the releaser left the word at GRANTED for us alone.
            while self
                .state
                .compare_exchange(GRANTED, HELD, Ordering::Acquire, Ordering::Relaxed)
                .is_err()
            {
                std::hint::spin_loop();
            }
            self.handoffs.fetch_add(1, Ordering::Relaxed);
        }

        self.owner.store(worker.index(), Ordering::Relaxed);
    }

    fn release(&self, worker: WorkerId) {
        debug_assert_eq!(
            self.owner(),
            Some(worker),
            "release by a worker that does not own the lock"
        );
        self.owner.store(NO_OWNER, Ordering::Relaxed);

        if self.registry.waiters() > 0 {
            if let Some(next) = self.registry.next_waiter() {
                self.state.store(GRANTED, Ordering::Release);
                self.registry.grant(next);
                return;
            }
        }

        self.state.store(FREE, Ordering::Release);
    }
}
