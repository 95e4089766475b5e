//! Property tests for claim conservation and cancellation.

mod common;
use common::*;

use proptest::prelude::*;
use workclaim::types::WorkSpace;
use workclaim::{Band, EventKind, LockKind, RunConfig, Scheduler, UnitId, Verdict};

fn lock_kind() -> impl Strategy<Value = LockKind> {
    prop_oneof![Just(LockKind::Spin), Just(LockKind::BoundedFair)]
}

fn run_shape() -> impl Strategy<Value = (usize, usize, usize, LockKind)> {
    (1usize..=6, 1usize..=16, 1usize..=40, lock_kind())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn claims_partition_the_work_space(
        (threads, dimension, increment, lock) in run_shape()
    ) {
        init_test_logging();
        let config = RunConfig::new(threads, dimension, increment).with_lock(lock);
        let checker = |_: usize, _: Band, _: usize| true;
        let report = Scheduler::new(config, &checker).unwrap().run().unwrap();

        let total = 3 * dimension;
        let claims = report.claims();
        let mut next = 0;
        for claim in &claims {
            prop_assert_eq!(claim.start(), next);
            prop_assert!(!claim.is_empty());
            if claim.end() < total {
                prop_assert_eq!(claim.size(), increment);
            }
            next = claim.end();
        }
        prop_assert_eq!(next, total);
        prop_assert_eq!(report.units_checked(), total);
        prop_assert_eq!(report.verdict(), Verdict::Valid);
        prop_assert_eq!(count(&report, is_requested), claims.len() + threads);
        prop_assert_eq!(report.entry_latency().count, report.exit_latency().count);
        assert_time_ordered(&report);
    }

    #[test]
    fn single_failure_is_the_reported_cause(
        (threads, dimension, increment, lock) in run_shape(),
        pick in any::<prop::sample::Index>()
    ) {
        init_test_logging();
        let space = WorkSpace::new(dimension);
        let failing = UnitId::new(pick.index(space.total_units()));
        let location = space.locate(failing).unwrap();

        let config = RunConfig::new(threads, dimension, increment).with_lock(lock);
        let checker = fails_only(location.band, location.local);
        let report = Scheduler::new(config, &checker).unwrap().run().unwrap();

        prop_assert_eq!(report.verdict(), Verdict::Invalid);
        let cause = report.cancelled_by().unwrap();
        prop_assert_eq!(cause.unit, failing);
        prop_assert_eq!(cause.location, location);
        prop_assert!(report.units_checked() <= space.total_units());
        prop_assert_eq!(count(&report, is_grabbed), report.units_checked());

        let failed_checks = count(&report, |e| {
            matches!(e.kind, EventKind::Completed { verdict: Verdict::Invalid, .. })
        });
        prop_assert_eq!(failed_checks, 1);
    }
}
