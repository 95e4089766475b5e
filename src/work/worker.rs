//! One worker's loop as an explicit state machine.
//!
//! ```text
//! Requesting ──▶ InCriticalSection ──▶ Processing(claim) ──▶ Requesting
//!     │                 │                     │
//!     ▼                 ▼                     ▼
//! Cancelled         Terminated            Cancelled
//! ```
//!
//! The lock guard is owned by the `InCriticalSection` phase itself and is
//! dropped when that phase ends, before a unit is checked or the cancel signal
//! is acted on, so no exit path can leave the lock held.
//!
//! Under a static [`Distribution`](super::Distribution), `Requesting` takes the
//! next planned claim directly and the worker never touches the lock.

use super::Scheduler;
use crate::checker::UnitChecker;
use crate::observability::{EventKind, EventLog, LatencyRecorder, RunClock};
use crate::sync::{Lock, LockGuard, RawLock};
use crate::types::{CancelCause, Claim, Verdict, WorkerId};
use serde::{Deserialize, Serialize};
use std::sync::atomic::Ordering;
use std::time::Instant;
use tracing::{debug, info, trace};

/// Position of a worker in its loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    /// About to ask for the next claim.
    Requesting,
    /// Holding the lock; about to claim.
    InCriticalSection,
    /// Checking the units of a claim, lock released.
    Processing(Claim),
    /// No work remained.
    Terminated,
    /// Stopped early because some unit failed.
    Cancelled,
}

impl WorkerState {
    /// Returns true for `Terminated` and `Cancelled`.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Terminated | Self::Cancelled)
    }
}

/// How a worker left its loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkerExit {
    /// Found the work space exhausted.
    Terminated,
    /// Observed cancellation or raised it.
    Cancelled,
}

/// Everything a worker recorded, handed back at join.
#[derive(Debug, Clone)]
pub struct WorkerOutput {
    /// The worker.
    pub worker: WorkerId,
    /// How it stopped.
    pub exit: WorkerExit,
    /// Its event log.
    pub log: EventLog,
    /// Its lock latency samples.
    pub latency: LatencyRecorder,
    /// Non-empty claims it was granted, in order.
    pub claims: Vec<Claim>,
    /// Units it actually checked.
    pub units_checked: usize,
}

/// [`WorkerState`] plus what each state owns. The guard only exists inside
/// `InCriticalSection`, so leaving that state is what releases the lock.
enum Phase<'s> {
    Requesting,
    InCriticalSection {
        guard: LockGuard<'s, Lock>,
        entered_at: Instant,
    },
    Processing(Claim),
    Terminated,
    Cancelled,
}

impl Phase<'_> {
    const fn state(&self) -> WorkerState {
        match self {
            Self::Requesting => WorkerState::Requesting,
            Self::InCriticalSection { .. } => WorkerState::InCriticalSection,
            Self::Processing(claim) => WorkerState::Processing(*claim),
            Self::Terminated => WorkerState::Terminated,
            Self::Cancelled => WorkerState::Cancelled,
        }
    }
}

pub(crate) struct Worker<'s, 'c, C: UnitChecker + ?Sized> {
    id: WorkerId,
    shared: &'s Scheduler<'c, C>,
    clock: &'s RunClock,
    /// Fixed claims for the static distributions; `None` when claiming.
    plan: Option<std::vec::IntoIter<Claim>>,
    log: EventLog,
    latency: LatencyRecorder,
    claims: Vec<Claim>,
    units_checked: usize,
}

impl<'s, 'c, C: UnitChecker + ?Sized> Worker<'s, 'c, C> {
    pub(crate) fn new(id: WorkerId, shared: &'s Scheduler<'c, C>, clock: &'s RunClock) -> Self {
        let config = &shared.config;
        let plan = config
            .distribution
            .plan(config.work_space(), config.threads, id)
            .map(Vec::into_iter);
        Self {
            id,
            shared,
            clock,
            plan,
            log: EventLog::new(id),
            latency: LatencyRecorder::new(),
            claims: Vec::new(),
            units_checked: 0,
        }
    }

    pub(crate) fn run(mut self) -> WorkerOutput {
        let mut phase = Phase::Requesting;
        let exit = loop {
            trace!(worker = self.id.number(), state = ?phase.state(), "step");
            phase = match phase {
                Phase::Requesting => self.next_claim(),
                Phase::InCriticalSection { guard, entered_at } => self.claim(guard, entered_at),
                Phase::Processing(claim) => self.process(claim),
                Phase::Terminated => break WorkerExit::Terminated,
                Phase::Cancelled => break WorkerExit::Cancelled,
            };
        };
        debug!(
            worker = self.id.number(),
            ?exit,
            claims = self.claims.len(),
            units = self.units_checked,
            "worker finished"
        );

        WorkerOutput {
            worker: self.id,
            exit,
            log: self.log,
            latency: self.latency,
            claims: self.claims,
            units_checked: self.units_checked,
        }
    }

    fn stamp(&mut self, kind: EventKind, at: Instant) {
        self.log.record(kind, self.clock.offset(at));
    }

    fn next_claim(&mut self) -> Phase<'s> {
        if self.shared.cancel.is_raised() {
            return Phase::Cancelled;
        }
        let Some(plan) = self.plan.as_mut() else {
            return self.request();
        };
        match plan.next() {
            Some(claim) => {
                self.claims.push(claim);
                Phase::Processing(claim)
            }
            None => Phase::Terminated,
        }
    }

    fn request(&mut self) -> Phase<'s> {
        let shared = self.shared;
        let requested_at = Instant::now();
        self.stamp(EventKind::Requested, requested_at);

        let guard = shared.lock.lock(self.id);

        let entered_at = Instant::now();
        self.latency.record_entry(entered_at - requested_at);
        Phase::InCriticalSection { guard, entered_at }
    }

    fn claim(&mut self, guard: LockGuard<'s, Lock>, entered_at: Instant) -> Phase<'s> {
        self.stamp(EventKind::Entered, entered_at);

        let claim = self
            .shared
            .allocator
            .claim_next(&guard, self.shared.config.task_increment);

        let left_at = Instant::now();
        self.latency.record_exit(left_at - entered_at);
        self.stamp(EventKind::Left, left_at);
        drop(guard);

        if claim.is_empty() {
            return Phase::Terminated;
        }
        debug!(
            worker = self.id.number(),
            start = claim.start(),
            size = claim.size(),
            "claimed units"
        );
        self.claims.push(claim);
        Phase::Processing(claim)
    }

    fn process(&mut self, claim: Claim) -> Phase<'s> {
        let space = self.shared.allocator.space();
        let located = claim
            .units()
            .filter_map(|unit| space.locate(unit).map(|location| (unit, location)));

        for (unit, location) in located {
            if self.shared.cancel.is_raised() {
                trace!(worker = self.id.number(), %unit, "cancel observed");
                return Phase::Cancelled;
            }

            self.stamp(EventKind::Grabbed { unit, location }, Instant::now());
            let verdict = Verdict::from_bool(self.shared.checker.check_unit(
                space.dimension(),
                location.band,
                location.local,
            ));
            self.units_checked += 1;
            self.stamp(
                EventKind::Completed {
                    unit,
                    location,
                    verdict,
                },
                Instant::now(),
            );
            trace!(worker = self.id.number(), %location, %verdict, "checked unit");

            if !verdict.is_valid() {
                self.shared.valid.store(false, Ordering::Release);
                let cause = CancelCause {
                    worker: self.id,
                    unit,
                    location,
                };
                if self.shared.cancel.raise(cause) {
                    info!(%cause, "unit failed, cancelling run");
                }
                return Phase::Cancelled;
            }
        }

        Phase::Requesting
    }
}
