//! The run report.
//!
//! Rendered with `Display`, a report reads as a plain run transcript:
//! every event line in time order, the verdict, total time and the four lock
//! latency figures. Serialized with serde, it carries the same data plus the
//! per-worker summaries.

use super::{LatencyStats, LogEvent, as_micros_f64};
use crate::config::RunConfig;
use crate::types::{CancelCause, Claim, Verdict, WorkerId};
use crate::work::{WorkerExit, WorkerOutput};
use chrono::{DateTime, Local};
use core::fmt;
use serde::Serialize;
use std::time::Duration;

/// What one worker did during the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkerSummary {
    /// The worker.
    pub worker: WorkerId,
    /// How it stopped.
    pub exit: WorkerExit,
    /// Non-empty claims it was granted.
    pub claims: Vec<Claim>,
    /// Units it checked.
    pub units_checked: usize,
}

impl From<&WorkerOutput> for WorkerSummary {
    fn from(output: &WorkerOutput) -> Self {
        Self {
            worker: output.worker,
            exit: output.exit,
            claims: output.claims.clone(),
            units_checked: output.units_checked,
        }
    }
}

/// Outcome of a run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub(crate) config: RunConfig,
    pub(crate) started_at: DateTime<Local>,
    pub(crate) events: Vec<LogEvent>,
    pub(crate) verdict: Verdict,
    #[serde(rename = "elapsed_us", with = "super::micros")]
    pub(crate) elapsed: Duration,
    pub(crate) entry_latency: LatencyStats,
    pub(crate) exit_latency: LatencyStats,
    pub(crate) workers: Vec<WorkerSummary>,
    pub(crate) cancelled_by: Option<CancelCause>,
}

impl RunReport {
    /// Configuration the run used.
    #[must_use]
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Wall-clock start of the run.
    #[must_use]
    pub fn started_at(&self) -> DateTime<Local> {
        self.started_at
    }

    /// All events, ordered by timestamp.
    #[must_use]
    pub fn events(&self) -> &[LogEvent] {
        &self.events
    }

    /// Valid only if no checked unit failed.
    #[must_use]
    pub fn verdict(&self) -> Verdict {
        self.verdict
    }

    /// Wall-clock duration from start to the last join.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Request-to-entry latency over all workers.
    #[must_use]
    pub fn entry_latency(&self) -> LatencyStats {
        self.entry_latency
    }

    /// Entry-to-exit latency over all workers.
    #[must_use]
    pub fn exit_latency(&self) -> LatencyStats {
        self.exit_latency
    }

    /// Per-worker summaries, by worker index.
    #[must_use]
    pub fn workers(&self) -> &[WorkerSummary] {
        &self.workers
    }

    /// The first failing unit, if the run was cancelled.
    #[must_use]
    pub fn cancelled_by(&self) -> Option<CancelCause> {
        self.cancelled_by
    }

    /// Every non-empty claim granted during the run, ordered by start.
    #[must_use]
    pub fn claims(&self) -> Vec<Claim> {
        let mut claims: Vec<Claim> = self
            .workers
            .iter()
            .flat_map(|w| w.claims.iter().copied())
            .collect();
        claims.sort_by_key(Claim::start);
        claims
    }

    /// Total units checked across workers.
    #[must_use]
    pub fn units_checked(&self) -> usize {
        self.workers.iter().map(|w| w.units_checked).sum()
    }

    /// Renders the event log as text lines.
    pub fn log_lines(&self) -> impl Iterator<Item = String> + '_ {
        self.events
            .iter()
            .map(|event| event.line(self.started_at).to_string())
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for event in &self.events {
            writeln!(f, "{}", event.line(self.started_at))?;
        }
        let verdict = if self.verdict.is_valid() {
            "Valid Sudoku"
        } else {
            "Invalid Sudoku"
        };
        writeln!(f, "{verdict}")?;
        writeln!(
            f,
            "Time taken to check the validity of the Sudoku: {} microseconds",
            as_micros_f64(self.elapsed)
        )?;
        writeln!(
            f,
            "Average time taken by a thread to enter the CS: {} microseconds",
            self.entry_latency.mean_micros()
        )?;
        writeln!(
            f,
            "Average time taken by a thread to exit the CS: {} microseconds",
            self.exit_latency.mean_micros()
        )?;
        writeln!(
            f,
            "Worst-case time taken by a thread to enter the CS: {} microseconds",
            self.entry_latency.max_micros()
        )?;
        writeln!(
            f,
            "Worst-case time taken by a thread to exit the CS: {} microseconds",
            self.exit_latency.max_micros()
        )
    }
}
