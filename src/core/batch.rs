//! Batch drivers built on top of [`BoundedScheduler`].
//!
//! `run_all` submits every task to a fresh scheduler and gathers the results in
//! input order. The first failure observed fails the whole batch: results of
//! siblings that already finished are discarded, and siblings still running are
//! left to finish on their own since the scheduler has no cancellation.
//!
//! `run_sequential` is the unscheduled baseline that awaits one task at a time.

use std::future::Future;

use futures::stream::{FuturesUnordered, StreamExt};
use futures::FutureExt;

use crate::core::{
    AggregateError, BoundedScheduler, SchedulerError, Spawn, TaskError, TaskExecutor, TaskHandle,
    TaskId,
};

/// Run every task with at most `limit` in flight, returning results in input order.
///
/// # Errors
///
/// Returns [`AggregateError::Configuration`] when `limit` is zero, and
/// [`AggregateError::Task`] carrying the first task failure to complete.
pub async fn run_all_with<S, I, F, Fut, T, E>(
    spawner: S,
    tasks: I,
    limit: usize,
) -> Result<Vec<T>, AggregateError>
where
    S: Spawn + Send + Sync + 'static,
    I: IntoIterator<Item = F>,
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
    T: Send + 'static,
    E: Into<anyhow::Error>,
{
    let scheduler = BoundedScheduler::with_spawner(limit, spawner)?;
    let handles = submit_batch(&scheduler, tasks);
    collect_ordered(handles).await
}

/// Run every task on the ambient tokio runtime with at most `limit` in flight.
///
/// # Errors
///
/// Same as [`run_all_with`], plus [`SchedulerError::Runtime`] (as
/// [`AggregateError::Configuration`]) outside a tokio runtime.
#[cfg(feature = "tokio-runtime")]
pub async fn run_all<I, F, Fut, T, E>(tasks: I, limit: usize) -> Result<Vec<T>, AggregateError>
where
    I: IntoIterator<Item = F>,
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
    T: Send + 'static,
    E: Into<anyhow::Error>,
{
    let scheduler = BoundedScheduler::new(limit)?;
    let handles = submit_batch(&scheduler, tasks);
    collect_ordered(handles).await
}

/// Run every task with at most `limit` in flight and keep every outcome.
///
/// Unlike [`run_all_with`], a failing task does not fail the batch; each
/// position of the returned vector holds that task's own outcome.
///
/// # Errors
///
/// Returns [`SchedulerError::InvalidLimit`] when `limit` is zero.
pub async fn run_all_settled_with<S, I, F, Fut, T, E>(
    spawner: S,
    tasks: I,
    limit: usize,
) -> Result<Vec<Result<T, TaskError>>, SchedulerError>
where
    S: Spawn + Send + Sync + 'static,
    I: IntoIterator<Item = F>,
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
    T: Send + 'static,
    E: Into<anyhow::Error>,
{
    let scheduler = BoundedScheduler::with_spawner(limit, spawner)?;
    let handles = submit_batch(&scheduler, tasks);
    Ok(futures::future::join_all(handles).await)
}

/// Process every item through `executor` with at most `limit` in flight.
///
/// # Errors
///
/// Same as [`run_all_with`].
pub async fn run_items_with<S, I, P, T, X>(
    spawner: S,
    items: I,
    executor: X,
    limit: usize,
) -> Result<Vec<T>, AggregateError>
where
    S: Spawn + Send + Sync + 'static,
    I: IntoIterator<Item = P>,
    P: Send + 'static,
    T: Send + 'static,
    X: TaskExecutor<P, T>,
{
    let tasks = items.into_iter().map(|item| {
        let executor = executor.clone();
        move || async move { executor.execute(item).await }
    });
    run_all_with(spawner, tasks, limit).await
}

/// Process every item through `executor` on the ambient tokio runtime.
///
/// # Errors
///
/// Same as [`run_all`].
#[cfg(feature = "tokio-runtime")]
pub async fn run_items<I, P, T, X>(items: I, executor: X, limit: usize) -> Result<Vec<T>, AggregateError>
where
    I: IntoIterator<Item = P>,
    P: Send + 'static,
    T: Send + 'static,
    X: TaskExecutor<P, T>,
{
    let tasks = items.into_iter().map(|item| {
        let executor = executor.clone();
        move || async move { executor.execute(item).await }
    });
    run_all(tasks, limit).await
}

/// Await each task before starting the next.
///
/// No scheduler is involved, so the `id` of a [`TaskError::Failed`] returned
/// here is the task's position in `tasks`, the same value as `index`.
///
/// # Errors
///
/// Returns [`AggregateError::Task`] for the first failing task; later tasks
/// never start.
pub async fn run_sequential<I, F, Fut, T, E>(tasks: I) -> Result<Vec<T>, AggregateError>
where
    I: IntoIterator<Item = F>,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Into<anyhow::Error>,
{
    let tasks = tasks.into_iter();
    let mut results = Vec::with_capacity(tasks.size_hint().0);
    for (index, task) in tasks.enumerate() {
        match task().await {
            Ok(value) => results.push(value),
            Err(e) => {
                let source = TaskError::Failed {
                    id: index as TaskId,
                    source: e.into(),
                };
                tracing::debug!("sequential batch failed at task {}: {}", index, source);
                return Err(AggregateError::Task { index, source });
            }
        }
    }
    Ok(results)
}

fn submit_batch<S, I, F, Fut, T, E>(scheduler: &BoundedScheduler<S>, tasks: I) -> Vec<TaskHandle<T>>
where
    S: Spawn + Send + Sync + 'static,
    I: IntoIterator<Item = F>,
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
    T: Send + 'static,
    E: Into<anyhow::Error>,
{
    let handles: Vec<_> = tasks.into_iter().map(|task| scheduler.submit(task)).collect();
    tracing::debug!(
        "batch of {} tasks submitted (limit={})",
        handles.len(),
        scheduler.limit()
    );
    handles
}

/// Await all handles, keeping input order and short-circuiting on the first failure.
async fn collect_ordered<T>(handles: Vec<TaskHandle<T>>) -> Result<Vec<T>, AggregateError> {
    let mut results: Vec<Option<T>> = std::iter::repeat_with(|| None).take(handles.len()).collect();
    let mut in_flight: FuturesUnordered<_> = handles
        .into_iter()
        .enumerate()
        .map(|(index, handle)| handle.map(move |outcome| (index, outcome)))
        .collect();

    while let Some((index, outcome)) = in_flight.next().await {
        match outcome {
            Ok(value) => results[index] = Some(value),
            Err(source) => {
                tracing::debug!("batch failed at task {}: {}", index, source);
                return Err(AggregateError::Task { index, source });
            }
        }
    }
    Ok(results.into_iter().flatten().collect())
}
