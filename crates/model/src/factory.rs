//! Child container construction through a startup-resolved registry.
//!
//! Every container variant exposes the same two-argument constructor
//! shape (context, optional parent). The registry maps variant names to
//! those constructors so child creation can be dispatched by name
//! without the factory knowing the variant at compile time.

use std::{collections::HashMap, rc::Rc};

use tracing::debug;

use crate::{
    container::{Container, Frame, Page, PageComponent},
    driver::ContextHandle,
    error::ModelError,
    guard::Guarded,
};

/// The uniform construction contract every variant implements.
pub type ChildConstructor =
    fn(ContextHandle, Option<Rc<dyn Container>>) -> Result<Rc<dyn Container>, ModelError>;

/// Registry of container variant constructors, resolved at startup.
pub struct ContainerRegistry {
    constructors: HashMap<&'static str, ChildConstructor>,
}

impl ContainerRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            constructors: HashMap::new(),
        }
    }

    /// A registry holding the built-in variants: `page`, `frame`, and
    /// `component`.
    #[must_use]
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register("page", Page::construct);
        registry.register("frame", Frame::construct);
        registry.register("component", PageComponent::construct);
        registry
    }

    /// Register `constructor` under `variant`, replacing any previous
    /// entry.
    pub fn register(&mut self, variant: &'static str, constructor: ChildConstructor) {
        self.constructors.insert(variant, constructor);
    }

    /// Construct a container of the named variant bound to `context`
    /// and `parent`.
    ///
    /// Constructor failures propagate as their original error, never
    /// wrapped. An unregistered variant is a contract error
    /// ([`ModelError::UnknownVariant`]), not a recoverable condition.
    pub fn construct(
        &self,
        variant: &str,
        context: ContextHandle,
        parent: Option<Rc<dyn Container>>,
    ) -> Result<Rc<dyn Container>, ModelError> {
        let constructor = self
            .constructors
            .get(variant)
            .ok_or_else(|| ModelError::UnknownVariant(variant.to_string()))?;
        debug!(variant, "constructing container");
        constructor(context, parent)
    }
}

impl Default for ContainerRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

/// Construct a child of `variant` with `parent` as its parent, using
/// the parent tree's registry. The child is returned already
/// intercepted, so guarding is unavoidable by construction.
pub fn new_child(
    variant: &str,
    context: ContextHandle,
    parent: Rc<dyn Container>,
) -> Result<Guarded, ModelError> {
    let registry = Rc::clone(parent.core().registry());
    let child = registry.construct(variant, context, Some(parent))?;
    Ok(Guarded::enhance(child))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{FakeContext, RecordingSession, test_tree};

    fn failing_constructor(
        _context: ContextHandle,
        _parent: Option<Rc<dyn Container>>,
    ) -> Result<Rc<dyn Container>, ModelError> {
        Err(ModelError::InvalidArgument("banner context missing".into()))
    }

    #[test]
    fn standard_registry_constructs_builtin_variants() {
        let (page, _frame, _component, session) = test_tree();
        let registry = ContainerRegistry::standard();

        for variant in ["frame", "component"] {
            let child = registry
                .construct(
                    variant,
                    FakeContext::new("child", &session),
                    Some(Rc::clone(&page) as Rc<dyn Container>),
                )
                .unwrap();
            assert_eq!(child.variant(), variant);
        }
    }

    #[test]
    fn unknown_variant_is_a_contract_error() {
        let (page, _frame, _component, session) = test_tree();
        let registry = ContainerRegistry::standard();

        let result = registry.construct(
            "carousel",
            FakeContext::new("child", &session),
            Some(page as Rc<dyn Container>),
        );
        match result {
            Err(ModelError::UnknownVariant(variant)) => assert_eq!(variant, "carousel"),
            other => panic!("expected UnknownVariant, got {other:?}"),
        }
    }

    #[test]
    fn constructor_errors_propagate_unwrapped() {
        let (page, _frame, _component, session) = test_tree();
        let mut registry = ContainerRegistry::new();
        registry.register("banner", failing_constructor);

        let result = registry.construct(
            "banner",
            FakeContext::new("child", &session),
            Some(page as Rc<dyn Container>),
        );
        match result {
            Err(ModelError::InvalidArgument(message)) => {
                assert_eq!(message, "banner context missing");
            },
            other => panic!("expected the constructor's own error, got {other:?}"),
        }
    }

    #[test]
    fn new_child_binds_invoking_container_as_parent() {
        let (page, _frame, _component, session) = test_tree();

        let child = new_child(
            "component",
            FakeContext::new("panel", &session),
            Rc::clone(&page) as Rc<dyn Container>,
        )
        .unwrap();

        let parent = child.parent().expect("child should have a parent");
        assert!(std::ptr::addr_eq(Rc::as_ptr(&parent), Rc::as_ptr(&page)));
    }

    #[test]
    fn new_child_rejects_unregistered_variant() {
        let session = RecordingSession::new();
        let page = Page::with_settings(
            FakeContext::new("doc", &session),
            crate::testutil::tree_settings(),
            Rc::new(ContainerRegistry::new()),
        );

        let result = new_child(
            "component",
            FakeContext::new("panel", &session),
            page as Rc<dyn Container>,
        );
        assert!(matches!(result, Err(ModelError::UnknownVariant(_))));
    }
}
