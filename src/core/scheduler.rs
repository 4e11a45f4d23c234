//! Bounded scheduler and the admission pump that drives it.

use std::collections::VecDeque;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::core::slot::Admissible;
use crate::core::{SchedulerError, TaskHandle, TaskId, TaskSlot};

/// Abstraction for spawning task execution on a runtime.
pub trait Spawn {
    /// Spawn an async task that returns a future.
    fn spawn<F>(&self, fut: F)
    where
        F: Future<Output = ()> + Send + 'static;
}

/// Point-in-time view of a scheduler's accounting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SchedulerStats {
    /// Maximum concurrently running tasks.
    pub limit: usize,
    /// Tasks currently running.
    pub running: usize,
    /// Tasks waiting for admission.
    pub pending: usize,
    /// Total tasks submitted.
    pub submitted: u64,
    /// Total tasks that completed successfully.
    pub completed: u64,
    /// Total tasks that failed or panicked.
    pub failed: u64,
}

/// State mutated only inside the admission critical section.
struct AdmissionState {
    pending: VecDeque<Box<dyn Admissible>>,
    running: usize,
}

#[derive(Default)]
struct Counters {
    next_id: AtomicU64,
    completed: AtomicU64,
    failed: AtomicU64,
}

struct Shared<S> {
    limit: usize,
    state: Mutex<AdmissionState>,
    counters: Counters,
    spawner: S,
}

/// Scheduler that runs at most `limit` submitted tasks at once.
///
/// Submissions beyond the limit wait in a FIFO queue. The pending queue and the
/// running count live behind a single `parking_lot::Mutex`, so the
/// check-and-increment performed on admission is atomic no matter how many
/// submissions and completions race.
///
/// Cloning is cheap and yields another handle onto the same scheduler.
pub struct BoundedScheduler<S> {
    shared: Arc<Shared<S>>,
}

impl<S> Clone for BoundedScheduler<S> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<S> std::fmt::Debug for BoundedScheduler<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundedScheduler")
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}

impl<S> BoundedScheduler<S> {
    /// Create a scheduler that executes admitted work through `spawner`.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::InvalidLimit`] when `limit` is zero.
    pub fn with_spawner(limit: usize, spawner: S) -> Result<Self, SchedulerError> {
        if limit == 0 {
            return Err(SchedulerError::InvalidLimit(limit));
        }
        Ok(Self {
            shared: Arc::new(Shared {
                limit,
                state: Mutex::new(AdmissionState {
                    pending: VecDeque::new(),
                    running: 0,
                }),
                counters: Counters::default(),
                spawner,
            }),
        })
    }

    /// Maximum number of concurrently running tasks.
    #[must_use]
    pub fn limit(&self) -> usize {
        self.shared.limit
    }

    /// Snapshot of the scheduler's accounting.
    ///
    /// A task is released and counted before its handle resolves, so once a
    /// handle has yielded its outcome that task no longer shows as running.
    #[must_use]
    pub fn stats(&self) -> SchedulerStats {
        let (running, pending) = {
            let state = self.shared.state.lock();
            (state.running, state.pending.len())
        };
        let counters = &self.shared.counters;
        SchedulerStats {
            limit: self.shared.limit,
            running,
            pending,
            submitted: counters.next_id.load(Ordering::Relaxed),
            completed: counters.completed.load(Ordering::Relaxed),
            failed: counters.failed.load(Ordering::Relaxed),
        }
    }

    /// Whether nothing is running or waiting.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        let state = self.shared.state.lock();
        state.running == 0 && state.pending.is_empty()
    }
}

impl<S> BoundedScheduler<S>
where
    S: Spawn + Send + Sync + 'static,
{
    /// Submit a task and return a handle resolving to its outcome.
    ///
    /// Never blocks: the task is appended to the pending queue and the admission
    /// step runs once. The task starts immediately if a slot is free.
    pub fn submit<T, F, Fut, E>(&self, work: F) -> TaskHandle<T>
    where
        T: Send + 'static,
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        E: Into<anyhow::Error>,
    {
        let id: TaskId = self.shared.counters.next_id.fetch_add(1, Ordering::Relaxed);
        let (slot, handle) = TaskSlot::new(id, work);
        {
            let mut state = self.shared.state.lock();
            state.pending.push_back(Box::new(slot));
            tracing::trace!("task {} enqueued (pending={})", id, state.pending.len());
        }
        Shared::pump(&self.shared);
        handle
    }
}

impl<S> Shared<S>
where
    S: Spawn + Send + Sync + 'static,
{
    /// Admit pending slots until the limit is reached or the queue is empty.
    fn pump(this: &Arc<Self>) {
        while let Some(slot) = this.admit_next() {
            Self::launch(this, slot);
        }
    }

    /// The backpressure gate: pop the oldest slot and claim a running place for
    /// it, as one critical section.
    fn admit_next(&self) -> Option<Box<dyn Admissible>> {
        let mut state = self.state.lock();
        if state.running >= self.limit {
            return None;
        }
        let slot = state.pending.pop_front()?;
        state.running += 1;
        tracing::debug!(
            "admitted task {} (running={}, pending={})",
            slot.id(),
            state.running,
            state.pending.len()
        );
        Some(slot)
    }

    fn launch(this: &Arc<Self>, slot: Box<dyn Admissible>) {
        let settled = Arc::clone(this);
        let run = slot.into_run(Box::new(move |succeeded| settled.release(succeeded)));
        let shared = Arc::clone(this);
        this.spawner.spawn(async move {
            run.await;
            Self::pump(&shared);
        });
    }

    fn release(&self, succeeded: bool) {
        if succeeded {
            self.counters.completed.fetch_add(1, Ordering::Relaxed);
        } else {
            self.counters.failed.fetch_add(1, Ordering::Relaxed);
        }
        let mut state = self.state.lock();
        state.running -= 1;
        tracing::debug!(
            "released slot (running={}, pending={})",
            state.running,
            state.pending.len()
        );
    }
}

#[cfg(feature = "tokio-runtime")]
impl BoundedScheduler<crate::runtime::TokioSpawner> {
    /// Create a scheduler on the ambient tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::InvalidLimit`] when `limit` is zero and
    /// [`SchedulerError::Runtime`] when called outside a tokio runtime.
    pub fn new(limit: usize) -> Result<Self, SchedulerError> {
        if limit == 0 {
            return Err(SchedulerError::InvalidLimit(limit));
        }
        Self::with_spawner(limit, crate::runtime::TokioSpawner::current()?)
    }
}
