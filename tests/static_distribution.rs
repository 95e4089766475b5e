//! Chunk and mixed distributions against the sequential check.

#[macro_use]
mod common;
use common::*;

use proptest::prelude::*;
use workclaim::sequential;
use workclaim::{
    Band, Claim, Distribution, EventKind, RunConfig, Scheduler, SudokuGrid, Verdict, WorkerExit,
};

const STATIC: [Distribution; 2] = [Distribution::Chunk, Distribution::Mixed];

#[test]
fn static_verdicts_match_sequential() {
    init_test_logging();
    test_phase!("static_verdicts_match_sequential");

    for cells in [solved_9x9(), broken_9x9(), solved_4x4()] {
        let grid = SudokuGrid::new(cells).expect("grid");
        let dimension = grid.dimension();
        let reference = sequential::check_all(&grid, dimension);

        for distribution in STATIC {
            for threads in [1, 2, 3, 7, 30] {
                let config = RunConfig::new(threads, dimension, 1).with_distribution(distribution);
                let report = Scheduler::new(config, &grid)
                    .expect("config")
                    .run()
                    .expect("run");
                assert_eq!(
                    report.verdict(),
                    reference.verdict,
                    "{distribution} with {threads} threads"
                );
            }
        }
    }
}

#[test]
fn static_runs_never_take_the_lock() {
    init_test_logging();
    test_phase!("static_runs_never_take_the_lock");

    let checker = |_: usize, _: Band, _: usize| true;
    for distribution in STATIC {
        let config = RunConfig::new(3, 4, 4).with_distribution(distribution);
        let report = Scheduler::new(config, &checker)
            .expect("config")
            .run()
            .expect("run");

        assert_eq!(report.verdict(), Verdict::Valid);
        assert_eq!(report.units_checked(), 12);
        assert_eq!(count(&report, is_requested), 0);
        assert_eq!(
            count(&report, |e| matches!(e.kind, EventKind::Entered | EventKind::Left)),
            0
        );
        assert_eq!(report.entry_latency().count, 0);
        assert!(report.entry_latency().mean_micros().abs() < f64::EPSILON);
        assert_eq!(count(&report, is_grabbed), 12);
        assert!(
            report
                .workers()
                .iter()
                .all(|w| w.exit == WorkerExit::Terminated && w.units_checked == 4)
        );
        assert_time_ordered(&report);
    }
}

#[test]
fn chunk_and_mixed_assign_the_planned_units() {
    let checker = |_: usize, _: Band, _: usize| true;

    let chunk = Scheduler::new(
        RunConfig::new(5, 4, 1).with_distribution(Distribution::Chunk),
        &checker,
    )
    .expect("config")
    .run()
    .expect("run");
    let sizes: Vec<usize> = chunk
        .workers()
        .iter()
        .map(|w| w.claims.iter().map(Claim::size).sum())
        .collect();
    assert_eq!(sizes, vec![2, 2, 2, 2, 4]);

    let mixed = Scheduler::new(
        RunConfig::new(5, 4, 1).with_distribution(Distribution::Mixed),
        &checker,
    )
    .expect("config")
    .run()
    .expect("run");
    for summary in mixed.workers() {
        let w = summary.worker.index();
        assert!(summary.claims.iter().all(|c| c.start() % 5 == w));
    }
    assert_eq!(mixed.units_checked(), 12);
}

#[test]
fn static_run_stops_on_failure() {
    let grid = SudokuGrid::new(broken_9x9()).expect("grid");
    for distribution in STATIC {
        let config = RunConfig::new(1, 9, 1).with_distribution(distribution);
        let report = Scheduler::new(config, &grid)
            .expect("config")
            .run()
            .expect("run");
        let reference = sequential::check_all(&grid, 9);

        // One worker walks units in id order under both plans.
        assert_eq!(report.units_checked(), reference.units_checked);
        assert_eq!(
            report.cancelled_by().map(|c| (c.unit, c.location)),
            reference.first_invalid
        );
        assert_eq!(report.workers()[0].exit, WorkerExit::Cancelled);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn static_plans_cover_the_space(
        threads in 1usize..=12,
        dimension in 1usize..=16,
        mixed in any::<bool>()
    ) {
        let distribution = if mixed { Distribution::Mixed } else { Distribution::Chunk };
        let checker = |_: usize, _: Band, _: usize| true;
        let config = RunConfig::new(threads, dimension, 1).with_distribution(distribution);
        let report = Scheduler::new(config, &checker).unwrap().run().unwrap();

        let mut next = 0;
        for claim in report.claims() {
            prop_assert_eq!(claim.start(), next);
            next = claim.end();
        }
        prop_assert_eq!(next, 3 * dimension);
        prop_assert_eq!(report.units_checked(), 3 * dimension);
    }
}
