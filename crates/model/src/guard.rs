//! Interception layer: guarded dispatch over a container.
//!
//! A [`Guarded`] wrapper fronts every externally visible operation with
//! the same sequence: reject the call if the container (or any
//! ancestor) has been vacated, walk the focus chain from the root down,
//! then delegate to the real implementation. A fixed set of structural
//! operations bypasses guarding entirely so diagnostics and cleanup
//! still work on a vacated tree.

use std::rc::Rc;

use tracing::debug;

use crate::{
    container::{Container, VacateMarker},
    driver::{ContextHandle, Locator, SessionRef},
    error::ModelError,
    factory,
    wait::Wait,
};

/// A container behind guarded dispatch.
///
/// `Guarded` does not implement [`Container`], so a guarded instance
/// can never be fed back through [`Guarded::enhance`] under a second
/// layer of wrapping; re-enhancement is a clone sharing the same inner
/// container.
#[derive(Clone)]
pub struct Guarded {
    inner: Rc<dyn Container>,
}

impl Guarded {
    /// Wrap `container` for guarded dispatch.
    #[must_use]
    pub fn enhance(container: Rc<dyn Container>) -> Self {
        Self { inner: container }
    }

    /// The wrapped container. Part of the bypass set: the dispatch
    /// decision itself must remain reachable on a vacated container.
    #[must_use]
    pub fn inner(&self) -> &Rc<dyn Container> {
        &self.inner
    }

    /// Run a guarded domain operation against the focused container.
    ///
    /// `operation` names the call in failure diagnostics. The body is
    /// never invoked when the container is vacated.
    pub fn run<R>(
        &self,
        operation: &str,
        body: impl FnOnce(&dyn Container) -> Result<R, ModelError>,
    ) -> Result<R, ModelError> {
        if let Some(marker) = self.inner.vacater() {
            return Err(ModelError::ContainerVacated {
                operation: operation.to_string(),
                origin: marker.origin().to_string(),
            });
        }
        self.inner.focus_chain()?;
        debug!(
            variant = self.inner.variant(),
            operation, "dispatching guarded operation"
        );
        body(self.inner.as_ref())
    }

    // Guarded operations.

    /// Find the first element within this container's context.
    pub fn find_element(&self, by: &Locator) -> Result<Option<ContextHandle>, ModelError> {
        self.run("find_element", |container| container.find_element(by))
    }

    /// Find all elements within this container's context.
    pub fn find_elements(&self, by: &Locator) -> Result<Vec<ContextHandle>, ModelError> {
        self.run("find_elements", |container| container.find_elements(by))
    }

    /// Resolve the container's own context element.
    pub fn wrapped_element(&self) -> Result<ContextHandle, ModelError> {
        self.run("wrapped_element", |container| container.wrapped_element())
    }

    // Bypass set: structural operations, safely callable even on a
    // vacated container. Any structural helper added to the public
    // surface must be delegated here without `run`, or it will be
    // incorrectly guarded.

    /// The container's search context.
    #[must_use]
    pub fn context(&self) -> ContextHandle {
        Rc::clone(self.inner.core().context())
    }

    /// The shared driver session.
    #[must_use]
    pub fn session(&self) -> SessionRef {
        Rc::clone(self.inner.core().session())
    }

    /// The parent container, absent for roots.
    #[must_use]
    pub fn parent(&self) -> Option<Rc<dyn Container>> {
        self.inner.core().parent().cloned()
    }

    /// The root of the ancestor chain.
    #[must_use]
    pub fn root(&self) -> &dyn Container {
        self.inner.as_ref().root()
    }

    /// The marker carried by this container or its root-ward chain.
    #[must_use]
    pub fn vacater(&self) -> Option<VacateMarker> {
        self.inner.vacater()
    }

    /// Whether this container or any ancestor has been vacated.
    #[must_use]
    pub fn is_vacated(&self) -> bool {
        self.inner.is_vacated()
    }

    /// Record `marker` here and on every ancestor.
    pub fn mark_vacated(&self, marker: VacateMarker) {
        self.inner.mark_vacated(marker);
    }

    /// Create a child container of the named variant, with this
    /// container as parent. The child is returned already guarded.
    pub fn create_child(&self, variant: &str, context: ContextHandle) -> Result<Guarded, ModelError> {
        factory::new_child(variant, context, Rc::clone(&self.inner))
    }

    /// The container-scoped wait handle.
    #[must_use]
    pub fn wait(&self) -> &Wait {
        self.inner.core().wait()
    }
}
