//! # Bounded Scheduler
//!
//! A bounded-concurrency task scheduler for async workloads.
//!
//! Callers hand the scheduler any number of independent units of work at once; the
//! scheduler runs at most `limit` of them simultaneously and parks the rest in a FIFO
//! queue. Every completion frees a slot and pulls the oldest waiting task forward, so
//! the queue drains itself without any external driver.
//!
//! ## Core Problem Solved
//!
//! Fanning out thousands of futures at once overwhelms whatever sits behind them:
//!
//! - **Connection Pools**: a database pool of 50 connections cannot serve 20000 queries at once
//! - **Rate-Limited Backends**: upstream APIs reject bursts beyond a fixed concurrency
//! - **Sequential Fallbacks Are Slow**: awaiting items one by one wastes the available parallelism
//!
//! ## Key Features
//!
//! - **Hard Concurrency Cap**: the number of running tasks never exceeds `limit`
//! - **FIFO Admission**: waiting tasks are admitted strictly in submission order
//! - **Non-Blocking Submit**: `submit` enqueues in O(1) and returns a handle to await
//! - **Failure Isolation**: an error or panic only resolves that task's own handle
//! - **Batch Drivers**: `run_all` keeps input order and fails the batch on the first error
//!
//! ## BoundedScheduler
//!
//! ```rust,ignore
//! use bounded_scheduler::core::BoundedScheduler;
//!
//! let scheduler = BoundedScheduler::new(50)?;
//!
//! let handles: Vec<_> = (1..=20_000u64)
//!     .map(|item| scheduler.submit(move || async move {
//!         tokio::time::sleep(Duration::from_millis(10)).await;
//!         Ok::<_, anyhow::Error>(item * 2)
//!     }))
//!     .collect();
//!
//! for handle in handles {
//!     let doubled = handle.await?;
//! }
//! ```
//!
//! ## Batch Drivers
//!
//! ```rust,ignore
//! use bounded_scheduler::core::{run_all, run_sequential};
//!
//! let tasks = items.iter().map(|&item| move || process_item(item));
//! let results = run_all(tasks, 50).await?;
//! ```
//!
//! For complete examples, see:
//! - `tests/scheduler_test.rs` - Admission, bound and isolation tests
//! - `tests/batch_test.rs` - Batch driver scenarios

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Core scheduling abstractions and concurrency accounting.
pub mod core;
/// Configuration models for schedulers.
pub mod config;
/// Builders to construct schedulers from configuration.
pub mod builders;
/// Runtime adapters for executing admitted work.
pub mod runtime;
/// Shared utilities.
pub mod util;
