//! Builders to construct bounded schedulers from configuration.

use crate::config::SchedulerConfig;
use crate::core::{BoundedScheduler, SchedulerError, Spawn};

/// Build a scheduler from configuration using the provided spawner.
///
/// # Errors
///
/// Returns [`SchedulerError::InvalidLimit`] when the configuration is invalid.
pub fn build_scheduler<S>(
    cfg: &SchedulerConfig,
    spawner: S,
) -> Result<BoundedScheduler<S>, SchedulerError>
where
    S: Spawn + Send + Sync + 'static,
{
    cfg.validate()?;
    tracing::debug!("building scheduler (concurrency={})", cfg.concurrency);
    BoundedScheduler::with_spawner(cfg.concurrency, spawner)
}

/// Step-by-step construction of a [`BoundedScheduler`].
#[derive(Debug, Clone, Default)]
pub struct SchedulerBuilder {
    config: SchedulerConfig,
}

impl SchedulerBuilder {
    /// Start from the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration.
    #[must_use]
    pub const fn from_config(config: SchedulerConfig) -> Self {
        Self { config }
    }

    /// Set the concurrency limit.
    #[must_use]
    pub const fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.config.concurrency = concurrency;
        self
    }

    /// Configuration accumulated so far.
    #[must_use]
    pub const fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Build the scheduler on `spawner`.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::InvalidLimit`] when the concurrency is zero.
    pub fn build<S>(self, spawner: S) -> Result<BoundedScheduler<S>, SchedulerError>
    where
        S: Spawn + Send + Sync + 'static,
    {
        build_scheduler(&self.config, spawner)
    }

    /// Build the scheduler on the ambient tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::InvalidLimit`] when the concurrency is zero and
    /// [`SchedulerError::Runtime`] outside a tokio runtime.
    #[cfg(feature = "tokio-runtime")]
    pub fn build_on_current_runtime(
        self,
    ) -> Result<BoundedScheduler<crate::runtime::TokioSpawner>, SchedulerError> {
        self.config.validate()?;
        self.build(crate::runtime::TokioSpawner::current()?)
    }
}
