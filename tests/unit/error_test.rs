//! Tests for error types

use bounded_scheduler::core::{AggregateError, SchedulerError, TaskError};

#[test]
fn test_invalid_limit_error() {
    let err = SchedulerError::InvalidLimit(0);
    assert_eq!(
        format!("{}", err),
        "invalid concurrency limit 0: must be greater than 0"
    );
}

#[test]
fn test_already_resolved_error() {
    let err = SchedulerError::AlreadyResolved(4);
    assert_eq!(format!("{}", err), "task 4 already resolved");
}

#[test]
fn test_panicked_task_error() {
    let err = TaskError::Panicked {
        id: 2,
        message: "index out of bounds".into(),
    };
    assert_eq!(format!("{}", err), "task 2 panicked: index out of bounds");
}

#[test]
fn test_failed_task_keeps_source() {
    let err = TaskError::Failed {
        id: 1,
        source: anyhow::anyhow!("db timeout"),
    };
    let source = std::error::Error::source(&err).expect("source present");
    assert_eq!(source.to_string(), "db timeout");
}

#[test]
fn test_aggregate_error_wraps_first_failure() {
    let err = AggregateError::Task {
        index: 3,
        source: TaskError::Abandoned { id: 3 },
    };
    assert_eq!(
        format!("{}", err),
        "batch task 3 failed: task 3 abandoned before completion"
    );
}

#[test]
fn test_aggregate_error_from_scheduler_error() {
    let err: AggregateError = SchedulerError::InvalidLimit(0).into();
    assert!(matches!(
        err,
        AggregateError::Configuration(SchedulerError::InvalidLimit(0))
    ));
}
