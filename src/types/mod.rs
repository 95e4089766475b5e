//! Core types for the work-claiming facility.
//!
//! - [`id`]: Identifier types (`WorkerId`, `UnitId`)
//! - [`unit`]: Work space bands and unit location
//! - [`claim`]: Contiguous claims handed out by the allocator
//! - [`cancel`]: Cooperative cancellation signal and verdict

pub mod cancel;
pub mod claim;
pub mod id;
pub mod unit;

pub use cancel::{CancelCause, CancelSignal, Verdict};
pub use claim::Claim;
pub use id::{UnitId, WorkerId};
pub use unit::{Band, UnitLocation, WorkSpace};
