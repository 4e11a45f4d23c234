//! Tests for builder modules

use bounded_scheduler::builders::{build_scheduler, SchedulerBuilder};
use bounded_scheduler::config::{SchedulerConfig, DEFAULT_CONCURRENCY};
use bounded_scheduler::core::SchedulerError;
use bounded_scheduler::runtime::TokioSpawner;

#[test]
fn test_scheduler_builder_defaults() {
    let builder = SchedulerBuilder::new();
    assert_eq!(builder.config().concurrency, DEFAULT_CONCURRENCY);

    let builder = builder.with_concurrency(7);
    assert_eq!(builder.config().concurrency, 7);
}

#[tokio::test]
async fn test_build_scheduler_from_config() {
    let cfg = SchedulerConfig::with_concurrency(3);
    let scheduler = build_scheduler(&cfg, TokioSpawner::current().unwrap()).unwrap();
    assert_eq!(scheduler.limit(), 3);
    assert!(scheduler.is_idle());
}

#[tokio::test]
async fn test_builder_on_current_runtime() {
    let scheduler = SchedulerBuilder::from_config(SchedulerConfig::with_concurrency(2))
        .build_on_current_runtime()
        .unwrap();
    let handle = scheduler.submit(|| async { Ok::<_, anyhow::Error>("ok") });
    assert_eq!(handle.await.unwrap(), "ok");
}

#[test]
fn test_builder_rejects_zero_concurrency() {
    let result = SchedulerBuilder::new()
        .with_concurrency(0)
        .build_on_current_runtime();
    assert!(matches!(result, Err(SchedulerError::InvalidLimit(0))));
}
