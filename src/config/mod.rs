//! Configuration models for schedulers.

pub mod scheduler;

pub use scheduler::{SchedulerConfig, CONCURRENCY_ENV, DEFAULT_CONCURRENCY};
