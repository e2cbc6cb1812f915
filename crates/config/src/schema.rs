//! Settings schema for the page-object model.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Model-wide settings.
///
/// Durations are plain integers so the file format stays obvious:
/// seconds for the coarse timeouts, milliseconds for the poll interval.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Default timeout for container-scoped waits, in seconds.
    pub wait_timeout_secs: u64,
    /// Fixed polling interval for the wait engine, in milliseconds.
    pub poll_interval_ms: u64,
    /// Timeout for page-load completion waits, in seconds.
    pub page_load_timeout_secs: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            wait_timeout_secs: 15,
            poll_interval_ms: 500,
            page_load_timeout_secs: 30,
        }
    }
}

impl ModelConfig {
    /// Reject settings the wait engine cannot operate with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.wait_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "wait_timeout_secs must be greater than zero".into(),
            ));
        }
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "poll_interval_ms must be greater than zero".into(),
            ));
        }
        if self.page_load_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "page_load_timeout_secs must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}
