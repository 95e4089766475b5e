//! Workclaim: chunked work claiming over hand-built locks.
//!
//! # Overview
//!
//! A fixed pool of worker threads repeatedly contends for a critical section,
//! claims a contiguous range of work units from a shared counter, releases the
//! lock and then checks each claimed unit on its own. The first failing unit
//! cancels every worker cooperatively. Each worker records its own event log
//! and lock latencies; the scheduler merges them once all workers have joined.
//!
//! # Core Guarantees
//!
//! - **Mutual exclusion**: the progress counter only moves under a held [`LockGuard`]
//! - **Work conservation**: claims are disjoint and cover `[0, 3N)` exactly once
//! - **Bounded waiting**: [`BoundedFairLock`] grants a waiter within one registry rotation
//! - **No orphaned locks**: the guard is dropped before any unit is checked
//! - **Cooperative cancellation**: workers poll [`CancelSignal`] at loop head and between units
//!
//! # Module Structure
//!
//! - [`types`]: Core types (worker ids, unit ids, bands, claims, cancellation)
//! - [`sync`]: Spin and bounded-waiting locks behind the [`RawLock`] trait
//! - [`work`]: Work allocator, distributions, worker state machine and scheduler
//! - [`observability`]: Event log, latency recorder and run report
//! - [`checker`]: The [`UnitChecker`] seam and the sudoku implementation
//! - [`sequential`]: Single-threaded reference check
//! - [`config`]: Run configuration and file loading
//! - [`error`](mod@error): Error types
//!
//! # Example
//!
//! ```
//! use workclaim::{Band, LockKind, RunConfig, Scheduler};
//!
//! let config = RunConfig::new(3, 4, 4).with_lock(LockKind::BoundedFair);
//! let checker = |_dim: usize, _band: Band, _local: usize| true;
//! let report = Scheduler::new(config, &checker)?.run()?;
//! assert!(report.verdict().is_valid());
//! # Ok::<(), workclaim::Error>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::module_inception)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]

pub mod checker;
pub mod config;
pub mod error;
pub mod observability;
pub mod sequential;
pub mod sync;
pub mod types;
pub mod work;

pub use checker::{SudokuGrid, UnitChecker};
pub use config::{MAX_WORKERS, RunConfig, RunOverrides};
#[cfg(feature = "config-file")]
pub use config::RunFile;
pub use error::{ConfigError, Error, GridError, Result};
pub use observability::{
    EventKind, EventLog, LatencyRecorder, LatencyStats, LogEvent, RunClock, RunReport, WorkerSummary,
};
pub use sync::{BoundedFairLock, Lock, LockGuard, LockKind, RawLock, SpinLock};
pub use sequential::SequentialReport;
pub use types::{
    Band, CancelCause, CancelSignal, Claim, UnitId, UnitLocation, Verdict, WorkSpace, WorkerId,
};
pub use work::{
    Distribution, Scheduler, WorkAllocator, WorkerExit, WorkerOutput, WorkerState,
};
