//! Lock latency samples and their reduction.
//!
//! Two populations are recorded per worker: *entry* (request to entering the
//! critical section) and *exit* (entering to leaving it). Samples stay with the
//! worker during the run and are reduced to [`LatencyStats`] after join.

use super::as_micros_f64;
use core::fmt;
use serde::{Serialize, Serializer};
use std::time::Duration;

/// Per-worker latency samples.
#[derive(Debug, Clone, Default)]
pub struct LatencyRecorder {
    entry: Vec<Duration>,
    exit: Vec<Duration>,
}

impl LatencyRecorder {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records time spent waiting for the lock.
    pub fn record_entry(&mut self, waited: Duration) {
        self.entry.push(waited);
    }

    /// Records time spent inside the critical section.
    pub fn record_exit(&mut self, held: Duration) {
        self.exit.push(held);
    }

    /// Entry samples in recording order.
    #[must_use]
    pub fn entry_samples(&self) -> &[Duration] {
        &self.entry
    }

    /// Exit samples in recording order.
    #[must_use]
    pub fn exit_samples(&self) -> &[Duration] {
        &self.exit
    }

    /// Reduces the entry population of every recorder.
    #[must_use]
    pub fn entry_stats<'a>(recorders: impl IntoIterator<Item = &'a Self>) -> LatencyStats {
        recorders
            .into_iter()
            .flat_map(|r| r.entry.iter().copied())
            .collect()
    }

    /// Reduces the exit population of every recorder.
    #[must_use]
    pub fn exit_stats<'a>(recorders: impl IntoIterator<Item = &'a Self>) -> LatencyStats {
        recorders
            .into_iter()
            .flat_map(|r| r.exit.iter().copied())
            .collect()
    }
}

/// Sum, count and worst case of one latency population.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LatencyStats {
    /// Number of samples.
    pub count: u64,
    /// Sum of all samples.
    pub total: Duration,
    /// Largest single sample.
    pub max: Duration,
}

impl LatencyStats {
    /// Adds one sample.
    pub fn observe(&mut self, sample: Duration) {
        self.count += 1;
        self.total = self.total.saturating_add(sample);
        self.max = self.max.max(sample);
    }

    /// Combines two reductions.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        Self {
            count: self.count + other.count,
            total: self.total.saturating_add(other.total),
            max: self.max.max(other.max),
        }
    }

    /// Mean sample in microseconds; zero for an empty population.
    #[must_use]
    pub fn mean_micros(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        as_micros_f64(self.total) / self.count as f64
    }

    /// Worst-case sample in microseconds.
    #[must_use]
    pub fn max_micros(&self) -> f64 {
        as_micros_f64(self.max)
    }
}

impl FromIterator<Duration> for LatencyStats {
    fn from_iter<I: IntoIterator<Item = Duration>>(iter: I) -> Self {
        let mut stats = Self::default();
        for sample in iter {
            stats.observe(sample);
        }
        stats
    }
}

impl fmt::Display for LatencyStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "n={} mean={:.3}us max={:.3}us",
            self.count,
            self.mean_micros(),
            self.max_micros()
        )
    }
}

impl Serialize for LatencyStats {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("LatencyStats", 4)?;
        state.serialize_field("count", &self.count)?;
        state.serialize_field("total_us", &as_micros_f64(self.total))?;
        state.serialize_field("mean_us", &self.mean_micros())?;
        state.serialize_field("max_us", &self.max_micros())?;
        state.end()
    }
}
