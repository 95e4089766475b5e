//! Shared helpers for the integration tests.

#![allow(dead_code)]

use tracing_subscriber::EnvFilter;
use workclaim::{Band, EventKind, LogEvent, RunReport};

pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_test_writer()
        .try_init();
}

/// Phase tracking macro for structured test logging.
#[macro_export]
macro_rules! test_phase {
    ($name:expr) => {
        tracing::info!(test = $name, "=== TEST START ===");
    };
}

pub fn solved_4x4() -> Vec<Vec<u32>> {
    vec![
        vec![1, 2, 3, 4],
        vec![3, 4, 1, 2],
        vec![2, 1, 4, 3],
        vec![4, 3, 2, 1],
    ]
}

pub fn solved_9x9() -> Vec<Vec<u32>> {
    vec![
        vec![5, 3, 4, 6, 7, 8, 9, 1, 2],
        vec![6, 7, 2, 1, 9, 5, 3, 4, 8],
        vec![1, 9, 8, 3, 4, 2, 5, 6, 7],
        vec![8, 5, 9, 7, 6, 1, 4, 2, 3],
        vec![4, 2, 6, 8, 5, 3, 7, 9, 1],
        vec![7, 1, 3, 9, 2, 4, 8, 5, 6],
        vec![9, 6, 1, 5, 3, 7, 2, 8, 4],
        vec![2, 8, 7, 4, 1, 9, 6, 3, 5],
        vec![3, 4, 5, 2, 8, 6, 1, 7, 9],
    ]
}

/// A 9x9 grid whose first row has two cells swapped: the row is still a
/// permutation, but two columns and a subgrid are not.
pub fn broken_9x9() -> Vec<Vec<u32>> {
    let mut grid = solved_9x9();
    grid[0].swap(0, 4);
    grid
}

pub fn count(report: &RunReport, pred: impl Fn(&LogEvent) -> bool) -> usize {
    report.events().iter().filter(|e| pred(e)).count()
}

pub fn is_requested(e: &LogEvent) -> bool {
    matches!(e.kind, EventKind::Requested)
}

pub fn is_grabbed(e: &LogEvent) -> bool {
    matches!(e.kind, EventKind::Grabbed { .. })
}

pub fn is_completed(e: &LogEvent) -> bool {
    matches!(e.kind, EventKind::Completed { .. })
}

pub fn assert_time_ordered(report: &RunReport) {
    for pair in report.events().windows(2) {
        assert!(
            pair[0].at <= pair[1].at,
            "events out of order: {:?} then {:?}",
            pair[0],
            pair[1]
        );
    }
}

/// Checker that fails exactly one unit.
pub fn fails_only(band: Band, local: usize) -> impl Fn(usize, Band, usize) -> bool + Sync {
    move |_: usize, b: Band, l: usize| !(b == band && l == local)
}
