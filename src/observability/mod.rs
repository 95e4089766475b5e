//! Run instrumentation: event log, lock latency and the final report.
//!
//! Everything recorded during a run is owned by the worker that recorded it.
//! Nothing here is shared between threads; the scheduler merges per-worker
//! buffers once all workers have joined.
//!
//! - [`event`]: Timestamped per-worker events and the merged log
//! - [`latency`]: Entry/exit latency samples and their reduction
//! - [`report`]: The run report and its human-readable rendering

pub mod event;
pub mod latency;
pub mod report;

pub use event::{EventKind, EventLog, LogEvent, RunClock};
pub use latency::{LatencyRecorder, LatencyStats};
pub use report::{RunReport, WorkerSummary};

use std::time::Duration;

/// Converts a duration to fractional microseconds.
#[must_use]
pub fn as_micros_f64(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1_000_000.0
}

/// Serde adapter that writes a [`Duration`] as whole microseconds.
pub(crate) mod micros {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        u64::try_from(value.as_micros())
            .unwrap_or(u64::MAX)
            .serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Duration::from_micros)
    }
}
