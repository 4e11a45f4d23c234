//! Item executor abstraction used by the batch drivers.

use async_trait::async_trait;

/// Abstraction for processing one input item into a result.
///
/// The executor holds the business logic applied to every item of a batch; the
/// batch driver decides how many items are processed at once.
///
/// # Example
///
/// ```rust,ignore
/// use async_trait::async_trait;
/// use bounded_scheduler::core::TaskExecutor;
///
/// #[derive(Clone)]
/// struct Doubler;
///
/// #[async_trait]
/// impl TaskExecutor<u64, u64> for Doubler {
///     async fn execute(&self, item: u64) -> anyhow::Result<u64> {
///         tokio::time::sleep(std::time::Duration::from_millis(10)).await;
///         Ok(item * 2)
///     }
/// }
/// ```
#[async_trait]
pub trait TaskExecutor<P, T>: Send + Sync + Clone + 'static
where
    P: Send + 'static,
    T: Send + 'static,
{
    /// Process a single item.
    ///
    /// # Errors
    ///
    /// Any error is wrapped into a [`TaskError::Failed`](crate::core::TaskError::Failed)
    /// for this item only.
    async fn execute(&self, item: P) -> anyhow::Result<T>;
}
