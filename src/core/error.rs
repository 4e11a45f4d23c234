//! Error types for scheduler operations.

use thiserror::Error;

use super::TaskId;

/// Errors produced by the scheduler itself.
///
/// Only construction can fail during normal operation; the slot variants flag
/// protocol violations that indicate a bug in the caller or the scheduler.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// Concurrency limit must be at least one.
    #[error("invalid concurrency limit {0}: must be greater than 0")]
    InvalidLimit(usize),
    /// Configuration could not be parsed or validated.
    #[error("invalid configuration: {0}")]
    Configuration(String),
    /// No async runtime is available to execute tasks.
    #[error("runtime unavailable: {0}")]
    Runtime(String),
    /// A slot was started after it had already left the pending state.
    #[error("task {0} already started")]
    AlreadyStarted(TaskId),
    /// A slot's outcome was resolved more than once.
    #[error("task {0} already resolved")]
    AlreadyResolved(TaskId),
}

impl SchedulerError {
    /// Whether this error was raised while validating scheduler configuration.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(self, Self::InvalidLimit(_) | Self::Configuration(_))
    }
}

/// Failure of a single task, delivered only to that task's handle.
#[derive(Debug, Error)]
pub enum TaskError {
    /// The task's work returned an error.
    #[error("task {id} failed: {source}")]
    Failed {
        /// Identifier of the failed task.
        id: TaskId,
        /// Error returned by the work.
        #[source]
        source: anyhow::Error,
    },
    /// The task's work panicked.
    #[error("task {id} panicked: {message}")]
    Panicked {
        /// Identifier of the panicked task.
        id: TaskId,
        /// Panic payload rendered as text.
        message: String,
    },
    /// The outcome was dropped before being resolved, e.g. on runtime shutdown.
    #[error("task {id} abandoned before completion")]
    Abandoned {
        /// Identifier of the abandoned task.
        id: TaskId,
    },
}

impl TaskError {
    /// Identifier of the task this error belongs to.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        match self {
            Self::Failed { id, .. } | Self::Panicked { id, .. } | Self::Abandoned { id } => *id,
        }
    }
}

/// Failure of a batch run.
#[derive(Debug, Error)]
pub enum AggregateError {
    /// The scheduler for the batch could not be constructed.
    #[error("batch not started: {0}")]
    Configuration(#[from] SchedulerError),
    /// The first task failure observed; sibling outcomes are discarded.
    #[error("batch task {index} failed: {source}")]
    Task {
        /// Position of the failed task in the submitted batch.
        index: usize,
        /// The task's own error.
        #[source]
        source: TaskError,
    },
}
