//! Single-threaded reference check.
//!
//! Walks `[0, 3N)` in order on the calling thread and stops at the first
//! failing unit. No lock, no claims, no cancellation: this is the oracle the
//! concurrent verdict is compared against.

use crate::checker::UnitChecker;
use crate::types::{UnitId, UnitLocation, Verdict, WorkSpace};
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::debug;

/// Result of a sequential check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SequentialReport {
    /// Valid only if every unit passed.
    pub verdict: Verdict,
    /// Units checked before stopping.
    pub units_checked: usize,
    /// The first failing unit, if any.
    pub first_invalid: Option<(UnitId, UnitLocation)>,
    /// Time spent checking.
    #[serde(rename = "elapsed_us", with = "crate::observability::micros")]
    pub elapsed: Duration,
}

/// Checks every unit of a grid of `dimension` in id order.
pub fn check_all<C: UnitChecker + ?Sized>(checker: &C, dimension: usize) -> SequentialReport {
    let space = WorkSpace::new(dimension);
    let started = Instant::now();
    let mut units_checked = 0;
    let mut first_invalid = None;

    for unit in (0..space.total_units()).map(UnitId::new) {
        let Some(location) = space.locate(unit) else {
            break;
        };
        units_checked += 1;
        if !checker.check_unit(dimension, location.band, location.local) {
            first_invalid = Some((unit, location));
            break;
        }
    }

    let elapsed = started.elapsed();
    debug!(units_checked, ?first_invalid, "sequential check finished");
    SequentialReport {
        verdict: Verdict::from_bool(first_invalid.is_none()),
        units_checked,
        first_invalid,
        elapsed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Band;

    #[test]
    fn stops_at_first_failure() {
        let checker = |_: usize, band: Band, local: usize| !(band == Band::Column && local == 1);
        let report = check_all(&checker, 4);
        assert_eq!(report.verdict, Verdict::Invalid);
        assert_eq!(report.units_checked, 6);
        assert_eq!(
            report.first_invalid,
            Some((UnitId::new(5), UnitLocation::new(Band::Column, 1)))
        );
    }

    #[test]
    fn all_valid_checks_everything() {
        let report = check_all(&|_: usize, _: Band, _: usize| true, 9);
        assert_eq!(report.verdict, Verdict::Valid);
        assert_eq!(report.units_checked, 27);
        assert_eq!(report.first_invalid, None);
    }
}
