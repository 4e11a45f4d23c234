//! Task slots and the handles their submitters await.

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::channel::oneshot;
use futures::future::BoxFuture;
use futures::FutureExt;

use crate::core::{SchedulerError, TaskError};

/// Identifier assigned to every submitted task, in submission order.
pub type TaskId = u64;

/// Type-erased work owned by a slot until it runs.
pub(crate) type Work<T> = Box<dyn FnOnce() -> BoxFuture<'static, Result<T, TaskError>> + Send>;

/// Callback told whether a slot succeeded, invoked before its handle resolves.
pub(crate) type Settle = Box<dyn FnOnce(bool) + Send>;

/// Lifecycle of a slot. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum SlotState {
    /// Waiting in the scheduler's queue.
    Pending,
    /// Admitted and executing.
    Running,
    /// Outcome delivered to the handle.
    Completed,
}

/// One unit of work plus the channel reporting its outcome.
pub struct TaskSlot<T> {
    id: TaskId,
    state: SlotState,
    work: Option<Work<T>>,
    outcome: Option<oneshot::Sender<Result<T, TaskError>>>,
}

impl<T> std::fmt::Debug for TaskSlot<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskSlot")
            .field("id", &self.id)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl<T: Send + 'static> TaskSlot<T> {
    /// Create a pending slot and the handle that observes its outcome.
    pub fn new<F, Fut, E>(id: TaskId, work: F) -> (Self, TaskHandle<T>)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        E: Into<anyhow::Error>,
    {
        let (tx, rx) = oneshot::channel();
        // The closure runs inside the returned future so a panic while building
        // the work's future is caught together with panics while polling it.
        let boxed: Work<T> = Box::new(move || {
            async move {
                work()
                    .await
                    .map_err(|e| TaskError::Failed { id, source: e.into() })
            }
            .boxed()
        });
        let slot = Self {
            id,
            state: SlotState::Pending,
            work: Some(boxed),
            outcome: Some(tx),
        };
        (slot, TaskHandle { id, rx })
    }

    /// Slot identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> SlotState {
        self.state
    }

    /// Move the slot to `Running` and hand out its work.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::AlreadyStarted`] if the slot is not pending.
    pub fn start(&mut self) -> Result<BoxFuture<'static, Result<T, TaskError>>, SchedulerError> {
        if self.state != SlotState::Pending {
            return Err(SchedulerError::AlreadyStarted(self.id));
        }
        let work = self
            .work
            .take()
            .ok_or(SchedulerError::AlreadyStarted(self.id))?;
        self.state = SlotState::Running;
        Ok(work())
    }

    /// Deliver the outcome to the handle and mark the slot `Completed`.
    ///
    /// A handle that was dropped simply never observes the outcome.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::AlreadyResolved`] on a second resolution.
    pub fn resolve(&mut self, outcome: Result<T, TaskError>) -> Result<(), SchedulerError> {
        let tx = self
            .outcome
            .take()
            .ok_or(SchedulerError::AlreadyResolved(self.id))?;
        self.state = SlotState::Completed;
        if tx.send(outcome).is_err() {
            tracing::trace!("task {} outcome discarded: handle dropped", self.id);
        }
        Ok(())
    }

    /// Run the slot to completion and resolve its handle.
    ///
    /// `settle` runs once the work has finished but before the outcome is sent,
    /// so anything it records is visible to whoever awaits the handle. Returns
    /// whether the task succeeded.
    pub(crate) async fn execute<R>(mut self, settle: R) -> bool
    where
        R: FnOnce(bool),
    {
        let work = match self.start() {
            Ok(work) => work,
            Err(e) => {
                tracing::error!("refusing to execute slot: {}", e);
                settle(false);
                return false;
            }
        };
        let id = self.id;
        let outcome = AssertUnwindSafe(work)
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| {
                Err(TaskError::Panicked {
                    id,
                    message: panic_message(panic.as_ref()),
                })
            });
        let succeeded = outcome.is_ok();
        settle(succeeded);
        if let Err(e) = self.resolve(outcome) {
            tracing::error!("slot protocol violated: {}", e);
        }
        succeeded
    }
}

/// A slot whose result type has been erased so slots of any type share one queue.
pub(crate) trait Admissible: Send {
    /// Slot identifier.
    fn id(&self) -> TaskId;
    /// Consume the slot into a future that runs it, calling `settle` before the
    /// handle is resolved.
    fn into_run(self: Box<Self>, settle: Settle) -> BoxFuture<'static, ()>;
}

impl<T: Send + 'static> Admissible for TaskSlot<T> {
    fn id(&self) -> TaskId {
        self.id
    }

    fn into_run(self: Box<Self>, settle: Settle) -> BoxFuture<'static, ()> {
        (*self).execute(settle).map(drop).boxed()
    }
}

/// Future resolving to a submitted task's outcome, exactly once.
#[derive(Debug)]
#[must_use = "dropping a handle discards the task's outcome"]
pub struct TaskHandle<T> {
    id: TaskId,
    rx: oneshot::Receiver<Result<T, TaskError>>,
}

impl<T> TaskHandle<T> {
    /// Identifier of the task this handle observes.
    pub const fn id(&self) -> TaskId {
        self.id
    }
}

impl<T> Future for TaskHandle<T> {
    type Output = Result<T, TaskError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let id = self.id;
        match self.rx.poll_unpin(cx) {
            Poll::Ready(Ok(outcome)) => Poll::Ready(outcome),
            Poll::Ready(Err(oneshot::Canceled)) => Poll::Ready(Err(TaskError::Abandoned { id })),
            Poll::Pending => Poll::Pending,
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    panic
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".into())
}
