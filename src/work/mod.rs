//! Work distribution: allocator, worker loop and scheduler.
//!
//! - [`allocator`]: The shared progress counter and its claim transition
//! - [`distribution`]: Dynamic claiming versus fixed chunk and mixed plans
//! - [`worker`]: One worker's state machine
//! - [`scheduler`]: Spawns, joins and merges a run

pub mod allocator;
pub mod distribution;
pub mod scheduler;
pub mod worker;

pub use allocator::WorkAllocator;
pub use distribution::Distribution;
pub use scheduler::Scheduler;
pub use worker::{WorkerExit, WorkerOutput, WorkerState};
