//! Model error types.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur during container operations.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Malformed construction input. Always a caller bug; never retried.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A guarded operation was attempted on a container whose context is
    /// known stale. The caller must obtain a fresh container.
    #[error("container vacated by '{origin}': refusing guarded operation '{operation}'")]
    ContainerVacated { operation: String, origin: String },

    /// A coordinator ran against a context lacking the required
    /// capability. Programming error; never retried.
    #[error("unsupported context: {0}")]
    UnsupportedContext(String),

    /// A load/readiness condition was not satisfied. The message is the
    /// caller's diagnostic text, preserved verbatim; `cause` is present
    /// when evaluating the condition faulted.
    #[error("page not loaded: {message}")]
    PageNotLoaded {
        message: String,
        #[source]
        cause: Option<Box<ModelError>>,
    },

    /// The wait engine's timeout elapsed before the named condition was
    /// satisfied. Carries the most recent transient fault, if any.
    #[error("timed out after {timeout:?} waiting for {condition}")]
    WaitTimeout {
        condition: String,
        timeout: Duration,
        #[source]
        last_fault: Option<Box<ModelError>>,
    },

    /// No constructor is registered for the requested container variant.
    /// A configuration contract error, not a recoverable condition.
    #[error("unknown container variant: {0}")]
    UnknownVariant(String),

    /// A runtime fault surfaced by the wrapped automation driver.
    #[error("driver fault: {0}")]
    Driver(String),
}

impl ModelError {
    /// Whether the wait engine must abort instead of retrying.
    ///
    /// Programming and contract errors cannot be cured by polling;
    /// driver faults and unmet conditions can.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::InvalidArgument(_)
                | Self::ContainerVacated { .. }
                | Self::UnsupportedContext(_)
                | Self::UnknownVariant(_)
        )
    }
}
