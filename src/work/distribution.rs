//! How the work space is split between workers.
//!
//! [`Distribution::Claimed`] is the dynamic scheme: workers take chunks from
//! the shared counter inside the critical section. The two static schemes fix
//! every worker's units before the run starts and never touch the lock:
//!
//! - [`Distribution::Chunk`]: worker `w` of `K` gets one contiguous block of
//!   `⌊3N / K⌋` units starting at `w × ⌊3N / K⌋`; the last worker also takes
//!   the remainder.
//! - [`Distribution::Mixed`]: worker `w` gets every `K`th unit starting at `w`.
//!
//! Static plans cover the flat `[0, 3N)` space, so all three bands are shared
//! by every worker whatever `K` is.

use crate::types::{Claim, WorkSpace, WorkerId};
use core::fmt;
use serde::{Deserialize, Serialize};

/// Strategy for assigning units to workers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum Distribution {
    /// Chunks of `task_increment` units claimed under the lock.
    #[default]
    Claimed,
    /// One contiguous block per worker, fixed up front.
    Chunk,
    /// Units dealt round-robin, fixed up front.
    Mixed,
}

impl Distribution {
    /// Every distribution, dynamic first.
    pub const ALL: [Self; 3] = [Self::Claimed, Self::Chunk, Self::Mixed];

    /// Returns the kebab-case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Claimed => "claimed",
            Self::Chunk => "chunk",
            Self::Mixed => "mixed",
        }
    }

    /// Returns true for the schemes that never take the lock.
    #[must_use]
    pub const fn is_static(self) -> bool {
        !matches!(self, Self::Claimed)
    }

    /// The fixed claims of `worker` among `workers`, in the order they are
    /// processed. `None` for [`Distribution::Claimed`], whose claims are only
    /// known at run time.
    ///
    /// A worker outside `0..workers` gets an empty plan.
    #[must_use]
    pub fn plan(self, space: WorkSpace, workers: usize, worker: WorkerId) -> Option<Vec<Claim>> {
        let total = space.total_units();
        let index = worker.index();
        if workers == 0 || index >= workers {
            return self.is_static().then(Vec::new);
        }

        match self {
            Self::Claimed => None,
            Self::Chunk => {
                let size = total / workers;
                let start = index * size;
                let end = if index + 1 == workers {
                    total
                } else {
                    start + size
                };
                let claim = Claim::new(start, end - start);
                Some(if claim.is_empty() {
                    Vec::new()
                } else {
                    vec![claim]
                })
            }
            Self::Mixed => Some(
                (index..total)
                    .step_by(workers)
                    .map(|unit| Claim::new(unit, 1))
                    .collect(),
            ),
        }
    }
}

impl fmt::Display for Distribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plans(distribution: Distribution, dimension: usize, workers: usize) -> Vec<Vec<Claim>> {
        (0..workers)
            .map(|w| {
                distribution
                    .plan(WorkSpace::new(dimension), workers, WorkerId::new(w))
                    .expect("static plan")
            })
            .collect()
    }

    #[test]
    fn claimed_has_no_plan() {
        let space = WorkSpace::new(4);
        assert_eq!(Distribution::Claimed.plan(space, 3, WorkerId::new(0)), None);
        assert_eq!(Distribution::Claimed.plan(space, 3, WorkerId::new(5)), None);
        assert!(!Distribution::Claimed.is_static());
    }

    #[test]
    fn chunk_gives_remainder_to_last_worker() {
        assert_eq!(
            plans(Distribution::Chunk, 4, 5),
            vec![
                vec![Claim::new(0, 2)],
                vec![Claim::new(2, 2)],
                vec![Claim::new(4, 2)],
                vec![Claim::new(6, 2)],
                vec![Claim::new(8, 4)],
            ]
        );
    }

    #[test]
    fn chunk_with_more_workers_than_units() {
        let plans = plans(Distribution::Chunk, 1, 5);
        assert!(plans[..4].iter().all(Vec::is_empty));
        assert_eq!(plans[4], vec![Claim::new(0, 3)]);
    }

    #[test]
    fn mixed_deals_round_robin() {
        let plans = plans(Distribution::Mixed, 4, 5);
        let units: Vec<Vec<usize>> = plans
            .iter()
            .map(|plan| plan.iter().map(Claim::start).collect())
            .collect();
        assert_eq!(
            units,
            vec![
                vec![0, 5, 10],
                vec![1, 6, 11],
                vec![2, 7],
                vec![3, 8],
                vec![4, 9],
            ]
        );
    }

    #[test]
    fn foreign_worker_gets_nothing() {
        let space = WorkSpace::new(4);
        assert_eq!(Distribution::Mixed.plan(space, 2, WorkerId::new(2)), Some(vec![]));
        assert_eq!(Distribution::Chunk.plan(space, 0, WorkerId::new(0)), Some(vec![]));
    }

    #[test]
    fn names_round_trip_through_serde() {
        for distribution in Distribution::ALL {
            let json = serde_json::to_string(&distribution).expect("serialize");
            assert_eq!(json, format!("\"{distribution}\""));
            let back: Distribution = serde_json::from_str(&json).expect("deserialize");
            assert_eq!(back, distribution);
        }
    }
}
