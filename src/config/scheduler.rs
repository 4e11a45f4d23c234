//! Scheduler configuration structures.

use serde::{Deserialize, Serialize};

use crate::core::SchedulerError;

/// Environment variable read by [`SchedulerConfig::from_env`].
pub const CONCURRENCY_ENV: &str = "BOUNDED_SCHEDULER_CONCURRENCY";

/// Concurrency used when none is configured; sized like a typical DB pool.
pub const DEFAULT_CONCURRENCY: usize = 50;

/// Scheduler configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Maximum concurrently running tasks.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

const fn default_concurrency() -> usize {
    DEFAULT_CONCURRENCY
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

impl SchedulerConfig {
    /// Configuration with the given concurrency limit.
    #[must_use]
    pub const fn with_concurrency(concurrency: usize) -> Self {
        Self { concurrency }
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::InvalidLimit`] when `concurrency` is zero.
    pub fn validate(&self) -> Result<(), SchedulerError> {
        if self.concurrency == 0 {
            return Err(SchedulerError::InvalidLimit(self.concurrency));
        }
        Ok(())
    }

    /// Parse configuration from a JSON string and validate.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::Configuration`] on malformed JSON and
    /// [`SchedulerError::InvalidLimit`] on a zero limit.
    pub fn from_json_str(input: &str) -> Result<Self, SchedulerError> {
        let cfg: Self = serde_json::from_str(input)
            .map_err(|e| SchedulerError::Configuration(format!("parse error: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load configuration from the process environment, reading a `.env` file
    /// first if one exists. Unset values fall back to defaults.
    ///
    /// # Errors
    ///
    /// Same as [`SchedulerConfig::from_lookup`].
    pub fn from_env() -> Result<Self, SchedulerError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!("loaded environment from {}", path.display());
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::Configuration`] when a value is not a
    /// non-negative integer and [`SchedulerError::InvalidLimit`] on zero.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SchedulerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let concurrency = match lookup(CONCURRENCY_ENV) {
            Some(raw) => raw.trim().parse::<usize>().map_err(|e| {
                SchedulerError::Configuration(format!("{CONCURRENCY_ENV}=`{raw}`: {e}"))
            })?,
            None => DEFAULT_CONCURRENCY,
        };
        let cfg = Self { concurrency };
        cfg.validate()?;
        Ok(cfg)
    }
}
