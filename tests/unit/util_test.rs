//! Tests for utility functions

use bounded_scheduler::core::BoundedScheduler;
use bounded_scheduler::util::{init_tracing, init_tracing_with_default};

#[tokio::test]
async fn test_tracing_init_is_idempotent() {
    init_tracing_with_default("bounded_scheduler=debug");
    init_tracing();

    // Scheduler logging must work with a subscriber installed.
    let scheduler = BoundedScheduler::new(1).unwrap();
    let handle = scheduler.submit(|| async { Ok::<_, anyhow::Error>(1) });
    assert_eq!(handle.await.unwrap(), 1);
    assert!(tracing::dispatcher::has_been_set());
}
