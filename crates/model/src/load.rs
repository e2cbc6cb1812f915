//! Page-load completion detection.
//!
//! Pages with complex loading behavior (single-page applications,
//! AJAX-heavy flows) expose scenario-specific completion detection
//! through [`DetectsLoadCompletion`]. The generic coordinator and the
//! one-shot [`check_condition`] primitive build on that capability.

use crate::{
    container::Container,
    driver::SearchContext,
    error::ModelError,
    wait::{Coordinator, Wait},
};

/// Implemented by contexts that model pages with complex loading
/// behavior.
pub trait DetectsLoadCompletion {
    /// Whether the page has finished loading.
    fn is_load_complete(&self) -> Result<bool, ModelError>;
}

/// Coordinator that reports page-load completion.
///
/// The supplied context must expose [`DetectsLoadCompletion`]; a
/// context without the capability is a programming error, reported as
/// [`ModelError::UnsupportedContext`] rather than a timeout.
#[must_use]
pub fn page_load_is_complete() -> Coordinator<bool> {
    Coordinator::new("page to finish loading", |context| {
        match context.load_detector() {
            Some(detector) => Ok(detector.is_load_complete()?.then_some(true)),
            None => Err(ModelError::UnsupportedContext(format!(
                "context '{}' does not detect load completion",
                context.describe()
            ))),
        }
    })
}

/// Assert a load condition now, without polling.
///
/// A faulting coordinator fails with [`ModelError::PageNotLoaded`]
/// carrying the fault as its cause; an unsatisfied result fails with
/// `PageNotLoaded` and no cause. `message` is preserved verbatim in
/// either case.
pub fn check_condition<T>(
    context: &dyn SearchContext,
    condition: &Coordinator<T>,
    message: &str,
) -> Result<T, ModelError> {
    match condition.apply(context) {
        Ok(Some(value)) => Ok(value),
        Ok(None) => Err(ModelError::PageNotLoaded {
            message: message.to_string(),
            cause: None,
        }),
        Err(fault) => Err(ModelError::PageNotLoaded {
            message: message.to_string(),
            cause: Some(Box::new(fault)),
        }),
    }
}

/// Block until `container` reports load completion, polling with the
/// tree's page-load timeout budget.
pub fn await_load(container: &dyn Container) -> Result<(), ModelError> {
    let settings = container.core().settings();
    let wait = Wait::with_timeout(settings.page_load_timeout, settings.poll_interval);
    let context: &dyn SearchContext = container;
    wait.until(context, &page_load_is_complete()).map(|_| ())
}
