//! Core scheduling abstractions and concurrency accounting.

pub mod batch;
pub mod error;
pub mod executor;
pub mod scheduler;
pub mod slot;

#[cfg(feature = "tokio-runtime")]
pub use batch::{run_all, run_items};
pub use batch::{run_all_settled_with, run_all_with, run_items_with, run_sequential};
pub use error::{AggregateError, SchedulerError, TaskError};
pub use executor::TaskExecutor;
pub use scheduler::{BoundedScheduler, SchedulerStats, Spawn};
pub use slot::{SlotState, TaskHandle, TaskId, TaskSlot};
