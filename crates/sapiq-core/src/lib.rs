//! sapiq-core
//!
//! A family of in-process task queues that coordinate externally supplied
//! handler functions:
//!
//! - **S**afe: each element's result is readable by any number of
//!   concurrent readers, all observing the same value.
//! - **A**synchronous: up to a configurable limit of elements execute
//!   simultaneously.
//! - **P**eriodic / immediate: dispatch is either paced by a fixed
//!   interval or proceeds as soon as prerequisites are met.
//! - **I**ndexed: each element is keyed by a name; admissions of a waiting
//!   name coalesce, and at most one element per name executes at a time.
//! - **P**riority (optional): smallest priority first, FIFO within a
//!   priority, with upgrade-only priority changes while waiting.
//!
//! The four combinations are [`SapipQueue`], [`SaipQueue`], [`SapiQueue`]
//! and [`SaiQueue`], all generic over a [`Payload`] type (`String` by
//! default, `Vec<u8>` for byte workloads).
//!
//! Module map:
//! - cell: write-once multi-reader result latch
//! - list: the two waiting-set structures (FIFO and priority)
//! - dispatch: the shared dispatcher core
//! - queue: the four public variants
//! - handler: handler and error-hook seams
//! - observability: locked snapshots
//! - error: crate-level error types

mod cell;
mod dispatch;
pub mod error;
pub mod handler;
pub mod list;
pub mod observability;
pub mod payload;
pub mod queue;

pub use cell::ResultHandle;
pub use error::{BoxError, HandlerError, QueueError};
pub use handler::{ErrorFunc, Handler};
pub use list::{Entry, IndexedList, IndexedPriorityList, PriorityEntry};
pub use observability::QueueStats;
pub use payload::Payload;
pub use queue::{SaiQueue, SaipQueue, SapiQueue, SapipQueue};
