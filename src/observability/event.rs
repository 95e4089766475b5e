//! Timestamped worker events and their global merge.

use crate::types::{UnitId, UnitLocation, Verdict, WorkerId};
use chrono::{DateTime, Local};
use core::fmt;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Wall-clock format for log lines: hours through microseconds.
const TIME_FORMAT: &str = "%H:%M:%S%.6f";

/// Shared time base for one run.
///
/// Events carry a monotonic offset from [`RunClock::start`]; the wall-clock
/// label is reconstructed from the start time when rendering, so ordering never
/// depends on the system clock stepping.
#[derive(Debug, Clone, Copy)]
pub struct RunClock {
    epoch: Instant,
    wall: DateTime<Local>,
}

impl RunClock {
    /// Starts a clock now.
    #[must_use]
    pub fn start() -> Self {
        Self {
            epoch: Instant::now(),
            wall: Local::now(),
        }
    }

    /// Offset of `instant` from the start of the run.
    #[must_use]
    pub fn offset(&self, instant: Instant) -> Duration {
        instant.saturating_duration_since(self.epoch)
    }

    /// Offset of the current instant from the start of the run.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.offset(Instant::now())
    }

    /// Wall-clock time the run started.
    #[must_use]
    pub fn started_at(&self) -> DateTime<Local> {
        self.wall
    }

    /// Time since the run started.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.epoch.elapsed()
    }
}

/// What happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EventKind {
    /// The worker asked for the lock.
    Requested,
    /// The worker entered the critical section.
    Entered,
    /// The worker is leaving the critical section.
    Left,
    /// The worker started checking a unit.
    Grabbed {
        /// Global unit id.
        unit: UnitId,
        /// Band and local index.
        location: UnitLocation,
    },
    /// The worker finished checking a unit.
    Completed {
        /// Global unit id.
        unit: UnitId,
        /// Band and local index.
        location: UnitLocation,
        /// Result of the check.
        verdict: Verdict,
    },
}

/// One entry of a worker's log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEvent {
    /// Worker that recorded the event.
    pub worker: WorkerId,
    /// What happened.
    #[serde(flatten)]
    pub kind: EventKind,
    /// Offset from the start of the run.
    #[serde(rename = "at_us", with = "super::micros")]
    pub at: Duration,
}

impl LogEvent {
    /// Renders the event as a log line, labelling time relative to `started_at`.
    #[must_use]
    pub fn line(&self, started_at: DateTime<Local>) -> EventLine<'_> {
        EventLine {
            event: self,
            started_at,
        }
    }
}

/// Display adapter produced by [`LogEvent::line`].
#[derive(Debug)]
pub struct EventLine<'a> {
    event: &'a LogEvent,
    started_at: DateTime<Local>,
}

impl fmt::Display for EventLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let worker = self.event.worker;
        let time = chrono::Duration::from_std(self.event.at)
            .ok()
            .and_then(|offset| self.started_at.checked_add_signed(offset))
            .unwrap_or(self.started_at)
            .format(TIME_FORMAT);
        match self.event.kind {
            EventKind::Requested => write!(f, "{worker} requests to enter CS at {time}"),
            EventKind::Entered => write!(f, "{worker} entered CS at {time}"),
            EventKind::Left => write!(f, "{worker} leaves CS at {time}"),
            EventKind::Grabbed { location, .. } => write!(f, "{worker} grabs {location} at {time}"),
            EventKind::Completed {
                location, verdict, ..
            } => write!(
                f,
                "{worker} completes checking {location} at {time} and finds it as {verdict}"
            ),
        }
    }
}

/// Append-only event sequence owned by one worker.
#[derive(Debug, Clone)]
pub struct EventLog {
    worker: WorkerId,
    events: Vec<LogEvent>,
}

impl EventLog {
    /// Creates an empty log for `worker`.
    #[must_use]
    pub fn new(worker: WorkerId) -> Self {
        Self {
            worker,
            events: Vec::new(),
        }
    }

    /// Appends an event stamped at `at`.
    pub fn record(&mut self, kind: EventKind, at: Duration) {
        self.events.push(LogEvent {
            worker: self.worker,
            kind,
            at,
        });
    }

    /// Worker that owns this log.
    #[must_use]
    pub fn worker(&self) -> WorkerId {
        self.worker
    }

    /// Events in the order they were recorded.
    #[must_use]
    pub fn events(&self) -> &[LogEvent] {
        &self.events
    }

    /// Number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns true if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Concatenates per-worker logs and orders them by timestamp.
    ///
    /// The sort is stable: events with equal timestamps keep the order of
    /// `logs` and, within one log, recording order.
    #[must_use]
    pub fn merge(logs: impl IntoIterator<Item = Self>) -> Vec<LogEvent> {
        let mut merged: Vec<LogEvent> = logs.into_iter().flat_map(|log| log.events).collect();
        merged.sort_by_key(|event| event.at);
        merged
    }
}
