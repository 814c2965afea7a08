//! # Config
//!
//! [`SchedulerConfig`] holds everything a [`PeriodicScheduler`][crate::scheduler::PeriodicScheduler]
//! needs besides its acquirer and publisher. Only the period is required; it can be built in code
//! or deserialized from whatever format the application already uses:
//!
//! ```rust
//! # use std::time::Duration;
//! # use doppel::config::{SchedulerConfig, StopPolicy};
//! let config = SchedulerConfig::with_period(Duration::from_secs(10));
//! assert!(config.run_immediately);
//! assert_eq!(StopPolicy::DiscardOnStop, config.stop_policy);
//! ```
//!
//! Serialized, the period is expressed in whole milliseconds under `period_ms`:
//!
//! ```json
//! {
//!     "period_ms": 10000,
//!     "thread_name": "sensor-scan",
//!     "run_immediately": false,
//!     "stop_policy": "publish_if_ready"
//! }
//! ```

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DurationMilliSeconds};

pub const DEFAULT_THREAD_NAME: &str = "doppel-scheduler";

/// What happens to a snapshot whose acquisition finishes after stop was requested.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopPolicy {
    /// Drop the late snapshot. The publisher keeps whatever was current when stop was requested.
    #[default]
    DiscardOnStop,
    /// Publish the late snapshot before the scheduler thread exits.
    PublishIfReady,
}

#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchedulerConfig {
    /// Interval between cycle start times. Must be non-zero and small enough to add to an
    /// [`Instant`].
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    #[serde(rename = "period_ms")]
    pub period: Duration,
    /// Name given to the dedicated acquisition thread.
    #[serde(default = "default_thread_name")]
    pub thread_name: String,
    /// Run the first cycle as soon as the scheduler starts instead of one period later.
    #[serde(default = "default_run_immediately")]
    pub run_immediately: bool,
    #[serde(default)]
    pub stop_policy: StopPolicy,
}

impl SchedulerConfig {
    pub fn with_period(period: Duration) -> Self {
        Self {
            period,
            thread_name: default_thread_name(),
            run_immediately: default_run_immediately(),
            stop_policy: StopPolicy::default(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.period.is_zero() {
            return Err(ConfigError::ZeroPeriod);
        }
        if Instant::now().checked_add(self.period).is_none() {
            return Err(ConfigError::PeriodTooLong(self.period));
        }
        if self.thread_name.is_empty() || self.thread_name.contains('\0') {
            return Err(ConfigError::InvalidThreadName(self.thread_name.clone()));
        }

        Ok(())
    }
}

fn default_thread_name() -> String {
    DEFAULT_THREAD_NAME.to_string()
}

fn default_run_immediately() -> bool {
    true
}

/// Error returned when a [`SchedulerConfig`] can't be used to drive a scheduler.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("The scheduler period must be greater than zero")]
    ZeroPeriod,
    #[error("The scheduler period {0:?} is too long to schedule")]
    PeriodTooLong(Duration),
    #[error("Invalid scheduler thread name `{0:?}`, must be non-empty and contain no NUL bytes")]
    InvalidThreadName(String),
}
