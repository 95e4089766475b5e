//! The orchestrator of one run.
//!
//! [`Scheduler`] is the explicit context every worker borrows: the allocator,
//! the lock, the cancel signal and the validity flag live here rather than in
//! globals. A run spawns `K` scoped threads once, joins them once, then merges
//! their logs and latency samples single-threaded.

use super::worker::{Worker, WorkerOutput};
use crate::checker::UnitChecker;
use crate::config::RunConfig;
use crate::error::{Error, Result};
use crate::observability::{EventLog, LatencyRecorder, RunClock, RunReport, WorkerSummary};
use crate::sync::Lock;
use crate::types::{CancelSignal, Verdict, WorkerId};
use crate::work::WorkAllocator;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use tracing::info;

/// Shared state of one run, borrowed by every worker.
pub struct Scheduler<'c, C: UnitChecker + ?Sized> {
    pub(crate) config: RunConfig,
    pub(crate) allocator: WorkAllocator,
    pub(crate) lock: Lock,
    pub(crate) cancel: CancelSignal,
    pub(crate) valid: AtomicBool,
    pub(crate) checker: &'c C,
}

impl<C: UnitChecker + ?Sized> std::fmt::Debug for Scheduler<'_, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("config", &self.config)
            .field("allocator", &self.allocator)
            .field("lock", &self.lock)
            .field("cancel", &self.cancel)
            .field("valid", &self.valid)
            .finish_non_exhaustive()
    }
}

impl<'c, C: UnitChecker + ?Sized> Scheduler<'c, C> {
    /// Validates `config` and prepares a run over `checker`.
    pub fn new(config: RunConfig, checker: &'c C) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            allocator: WorkAllocator::new(config.work_space()),
            lock: Lock::new(config.lock, config.threads),
            cancel: CancelSignal::new(),
            valid: AtomicBool::new(true),
            checker,
            config,
        })
    }

    /// The configuration of this run.
    #[must_use]
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Runs every worker to a terminal state and builds the report.
    ///
    /// A panicking worker does not abort the others; it is reported as
    /// [`Error::WorkerPanicked`] after all threads have joined.
    pub fn run(self) -> Result<RunReport> {
        let clock = RunClock::start();
        info!(
            threads = self.config.threads,
            dimension = self.config.dimension,
            task_increment = self.config.task_increment,
            lock = %self.config.lock,
            distribution = %self.config.distribution,
            "run started"
        );

        let outputs = self.spawn_and_join(&clock)?;
        let elapsed = clock.elapsed();

        let verdict = Verdict::from_bool(self.valid.load(Ordering::Acquire));
        let entry = LatencyRecorder::entry_stats(outputs.iter().map(|o| &o.latency));
        let exit = LatencyRecorder::exit_stats(outputs.iter().map(|o| &o.latency));
        let workers = outputs.iter().map(WorkerSummary::from).collect();
        let events = EventLog::merge(outputs.into_iter().map(|o| o.log));

        info!(
            %verdict,
            elapsed_us = elapsed.as_micros() as u64,
            claimed = self.allocator.claimed(),
            "run finished"
        );

        Ok(RunReport {
            config: self.config,
            started_at: clock.started_at(),
            events,
            verdict,
            elapsed,
            entry_latency: entry,
            exit_latency: exit,
            workers,
            cancelled_by: self.cancel.cause(),
        })
    }

    fn spawn_and_join(&self, clock: &RunClock) -> Result<Vec<WorkerOutput>> {
        thread::scope(|scope| {
            let mut handles = Vec::with_capacity(self.config.threads);
            let mut spawn_error = None;

            for index in 0..self.config.threads {
                let id = WorkerId::new(index);
                let spawned = thread::Builder::new()
                    .name(format!("workclaim-{}", id.number()))
                    .spawn_scoped(scope, move || Worker::new(id, self, clock).run());
                match spawned {
                    Ok(handle) => handles.push((id, handle)),
                    Err(source) => {
                        // Workers already running drain the space on their own.
                        spawn_error = Some(Error::Spawn { worker: id, source });
                        break;
                    }
                }
            }

            let mut outputs = Vec::with_capacity(handles.len());
            let mut panicked = None;
            for (id, handle) in handles {
                match handle.join() {
                    Ok(output) => outputs.push(output),
                    Err(_) => {
                        panicked.get_or_insert(id);
                    }
                }
            }

            if let Some(err) = spawn_error {
                return Err(err);
            }
            if let Some(id) = panicked {
                return Err(Error::WorkerPanicked(id));
            }
            Ok(outputs)
        })
    }
}
