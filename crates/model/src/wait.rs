//! Named coordinators and the polling wait engine.

use std::{
    borrow::Cow,
    fmt, thread,
    time::{Duration, Instant},
};

use {pagekit_config::ModelConfig, tracing::debug};

use crate::{driver::SearchContext, error::ModelError};

/// Timeout policy for container-scoped waits, captured once from
/// configuration when a tree's root is constructed.
#[derive(Debug, Clone, Copy)]
pub struct WaitSettings {
    /// Default timeout for condition waits.
    pub timeout: Duration,
    /// Fixed polling interval.
    pub poll_interval: Duration,
    /// Timeout budget for page-load completion waits.
    pub page_load_timeout: Duration,
}

impl From<&ModelConfig> for WaitSettings {
    fn from(config: &ModelConfig) -> Self {
        Self {
            timeout: Duration::from_secs(config.wait_timeout_secs),
            poll_interval: Duration::from_millis(config.poll_interval_ms),
            page_load_timeout: Duration::from_secs(config.page_load_timeout_secs),
        }
    }
}

impl Default for WaitSettings {
    fn default() -> Self {
        Self::from(&ModelConfig::default())
    }
}

/// A named, retryable condition evaluated against a search context.
///
/// `Ok(Some(_))` means the condition is satisfied, `Ok(None)` means not
/// yet, and `Err` is a fault raised while evaluating. The name exists
/// purely for diagnostics.
pub struct Coordinator<T> {
    description: Cow<'static, str>,
    check: Box<dyn Fn(&dyn SearchContext) -> Result<Option<T>, ModelError>>,
}

impl<T> Coordinator<T> {
    pub fn new(
        description: impl Into<Cow<'static, str>>,
        check: impl Fn(&dyn SearchContext) -> Result<Option<T>, ModelError> + 'static,
    ) -> Self {
        Self {
            description: description.into(),
            check: Box::new(check),
        }
    }

    /// Evaluate the condition against `context` once.
    pub fn apply(&self, context: &dyn SearchContext) -> Result<Option<T>, ModelError> {
        (self.check)(context)
    }

    /// Diagnostic name of the condition.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }
}

impl Coordinator<bool> {
    /// Wrap a boolean predicate; `false` maps to "not yet satisfied".
    pub fn predicate(
        description: impl Into<Cow<'static, str>>,
        predicate: impl Fn(&dyn SearchContext) -> Result<bool, ModelError> + 'static,
    ) -> Self {
        Self::new(description, move |context| {
            Ok(predicate(context)?.then_some(true))
        })
    }
}

impl<T> fmt::Display for Coordinator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description)
    }
}

/// Blocking wait engine: polls a coordinator at a fixed interval until
/// it is satisfied, a fatal fault occurs, or the timeout elapses.
///
/// Timeout is the only cancellation mechanism. Transient faults are
/// retried; the most recent one is attached to the timeout failure.
pub struct Wait {
    timeout: Duration,
    poll_interval: Duration,
}

impl Wait {
    #[must_use]
    pub fn new(settings: WaitSettings) -> Self {
        Self {
            timeout: settings.timeout,
            poll_interval: settings.poll_interval,
        }
    }

    /// A wait with an explicit timeout (page-load waits use the longer
    /// page-load budget).
    #[must_use]
    pub fn with_timeout(timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            timeout,
            poll_interval,
        }
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Poll `coordinator` against `context` until it returns a
    /// satisfied result or the timeout elapses.
    ///
    /// The coordinator is always evaluated at least once, even with a
    /// zero timeout.
    pub fn until<T>(
        &self,
        context: &dyn SearchContext,
        coordinator: &Coordinator<T>,
    ) -> Result<T, ModelError> {
        let deadline = Instant::now() + self.timeout;
        let mut last_fault: Option<ModelError> = None;

        loop {
            match coordinator.apply(context) {
                Ok(Some(value)) => return Ok(value),
                Ok(None) => {
                    last_fault = None;
                },
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    debug!(condition = %coordinator, error = %e, "condition faulted, retrying");
                    last_fault = Some(e);
                },
            }

            if Instant::now() >= deadline {
                return Err(ModelError::WaitTimeout {
                    condition: coordinator.description().to_string(),
                    timeout: self.timeout,
                    last_fault: last_fault.map(Box::new),
                });
            }

            thread::sleep(self.poll_interval);
        }
    }
}
