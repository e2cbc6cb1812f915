//! Container tree: pages, frames, and nested components over a live
//! driver session.
//!
//! Every container owns a search context, keeps a non-owning
//! back-reference to its parent, and shares the tree's single driver
//! session. Invalidation ("vacating") is recorded where it originates
//! and pushed onto every ancestor, so a stale subtree is detectable
//! from any node without traversal at read time.

use std::{
    cell::{OnceCell, RefCell},
    fmt,
    rc::Rc,
};

use tracing::debug;

use crate::{
    driver::{ContextHandle, Locator, SearchContext, SessionRef},
    error::ModelError,
    factory::ContainerRegistry,
    wait::{Wait, WaitSettings},
};

/// Marker recorded at the container where context invalidation
/// originated, and pushed onto every ancestor. Cleared only by
/// constructing a new tree.
#[derive(Debug, Clone)]
pub struct VacateMarker {
    origin: String,
}

impl VacateMarker {
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
        }
    }

    /// The operation that invalidated the context.
    #[must_use]
    pub fn origin(&self) -> &str {
        &self.origin
    }
}

impl fmt::Display for VacateMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.origin)
    }
}

/// Bookkeeping state shared by every container variant.
///
/// The session handle is derived from the context at construction and
/// is identical across every node of one tree. Wait settings and the
/// child registry are captured at the root and inherited downward.
pub struct ContainerCore {
    context: ContextHandle,
    session: SessionRef,
    parent: Option<Rc<dyn Container>>,
    vacated: RefCell<Option<VacateMarker>>,
    wait: OnceCell<Wait>,
    settings: WaitSettings,
    registry: Rc<ContainerRegistry>,
}

impl ContainerCore {
    /// Core for a root (page) container.
    #[must_use]
    pub fn new_root(
        context: ContextHandle,
        settings: WaitSettings,
        registry: Rc<ContainerRegistry>,
    ) -> Self {
        let session = context.session();
        Self {
            context,
            session,
            parent: None,
            vacated: RefCell::new(None),
            wait: OnceCell::new(),
            settings,
            registry,
        }
    }

    /// Core for a non-root container. Wait settings and the registry
    /// are inherited from the parent's tree.
    #[must_use]
    pub fn new_child(context: ContextHandle, parent: Rc<dyn Container>) -> Self {
        let session = context.session();
        let settings = parent.core().settings();
        let registry = Rc::clone(parent.core().registry());
        Self {
            context,
            session,
            parent: Some(parent),
            vacated: RefCell::new(None),
            wait: OnceCell::new(),
            settings,
            registry,
        }
    }

    #[must_use]
    pub fn context(&self) -> &ContextHandle {
        &self.context
    }

    #[must_use]
    pub fn session(&self) -> &SessionRef {
        &self.session
    }

    #[must_use]
    pub fn parent(&self) -> Option<&Rc<dyn Container>> {
        self.parent.as_ref()
    }

    #[must_use]
    pub fn settings(&self) -> WaitSettings {
        self.settings
    }

    #[must_use]
    pub fn registry(&self) -> &Rc<ContainerRegistry> {
        &self.registry
    }

    /// Lazily-built wait handle; the default timeout was captured once
    /// when the tree's root was constructed.
    pub fn wait(&self) -> &Wait {
        self.wait.get_or_init(|| Wait::new(self.settings))
    }

    pub(crate) fn record_vacater(&self, marker: VacateMarker) {
        *self.vacated.borrow_mut() = Some(marker);
    }

    pub(crate) fn local_vacater(&self) -> Option<VacateMarker> {
        self.vacated.borrow().clone()
    }
}

/// A node in the page-object tree wrapping a region of the document.
///
/// Concrete variants define [`focus_self`](Container::focus_self); the
/// structural protocol (focus chaining, vacate propagation, root
/// lookup) is shared.
pub trait Container: SearchContext {
    /// Shared bookkeeping state for this container.
    fn core(&self) -> &ContainerCore;

    /// Make this container's own context the driver's active focus.
    /// Must be idempotent when the context is already focused.
    fn focus_self(&self) -> Result<(), ModelError>;

    /// Variant name for diagnostics.
    fn variant(&self) -> &'static str;

    /// Focus the ancestor chain top-down, then this container.
    ///
    /// The full chain is walked on every call; each variant's own
    /// idempotence keeps the redundant switches harmless under
    /// interleaved navigation.
    fn focus_chain(&self) -> Result<(), ModelError> {
        if let Some(parent) = self.core().parent() {
            parent.focus_chain()?;
        }
        self.focus_self()
    }

    /// Record `marker` on this container and push the same marker onto
    /// every existing ancestor, up to the root. Repeated calls are
    /// safe; each call still walks to the root.
    fn mark_vacated(&self, marker: VacateMarker) {
        debug!(
            variant = self.variant(),
            origin = marker.origin(),
            "marking container vacated"
        );
        self.core().record_vacater(marker.clone());
        let mut next = self.core().parent().cloned();
        while let Some(node) = next {
            node.core().record_vacater(marker.clone());
            next = node.core().parent().cloned();
        }
    }

    /// The marker carried by this container or its root-ward chain.
    fn vacater(&self) -> Option<VacateMarker> {
        if let Some(marker) = self.core().local_vacater() {
            return Some(marker);
        }
        let mut next = self.core().parent().cloned();
        while let Some(node) = next {
            if let Some(marker) = node.core().local_vacater() {
                return Some(marker);
            }
            next = node.core().parent().cloned();
        }
        None
    }

    /// Whether this container or any ancestor has been vacated.
    fn is_vacated(&self) -> bool {
        self.vacater().is_some()
    }

    /// Resolve this container's own context element via the reflexive
    /// locator.
    fn wrapped_element(&self) -> Result<ContextHandle, ModelError> {
        self.core()
            .context()
            .find_element(&Locator::self_ref())?
            .ok_or_else(|| {
                ModelError::Driver(format!(
                    "reflexive lookup returned no element for {} context",
                    self.variant()
                ))
            })
    }
}

impl dyn Container {
    /// The container at the top of the ancestor chain (the one with no
    /// parent).
    #[must_use]
    pub fn root(&self) -> &dyn Container {
        let mut node: &dyn Container = self;
        while let Some(parent) = node.core().parent() {
            node = parent.as_ref();
        }
        node
    }
}

impl fmt::Debug for dyn Container + '_ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.variant())
    }
}

/// Parent validation for non-root containers: the parent must be
/// present. The root-side rule lives in [`Page::validate_parent`]; the
/// two branches are deliberately separate.
fn require_parent(
    parent: Option<Rc<dyn Container>>,
    variant: &str,
) -> Result<Rc<dyn Container>, ModelError> {
    parent.ok_or_else(|| {
        ModelError::InvalidArgument(format!("{variant} containers require a parent"))
    })
}

/// Root container modeling a top-level document.
pub struct Page {
    core: ContainerCore,
}

impl Page {
    /// Construct a root page bound to `context` with settings from
    /// discovered configuration and the standard variant registry.
    #[must_use]
    pub fn new(context: ContextHandle) -> Rc<Self> {
        let config = pagekit_config::discover_and_load();
        Self::with_settings(
            context,
            WaitSettings::from(&config),
            Rc::new(ContainerRegistry::standard()),
        )
    }

    /// Construct a root page with explicit wait settings and child
    /// registry.
    #[must_use]
    pub fn with_settings(
        context: ContextHandle,
        settings: WaitSettings,
        registry: Rc<ContainerRegistry>,
    ) -> Rc<Self> {
        Rc::new(Self {
            core: ContainerCore::new_root(context, settings, registry),
        })
    }

    /// Registry constructor. A page is always a tree root and rejects a
    /// supplied parent.
    pub fn construct(
        context: ContextHandle,
        parent: Option<Rc<dyn Container>>,
    ) -> Result<Rc<dyn Container>, ModelError> {
        Self::validate_parent(parent.as_ref())?;
        Ok(Self::with_settings(
            context,
            WaitSettings::default(),
            Rc::new(ContainerRegistry::standard()),
        ))
    }

    /// Root-side parent validation: a page takes no parent.
    fn validate_parent(parent: Option<&Rc<dyn Container>>) -> Result<(), ModelError> {
        match parent {
            None => Ok(()),
            Some(_) => Err(ModelError::InvalidArgument(
                "page containers are tree roots and take no parent".into(),
            )),
        }
    }
}

impl Container for Page {
    fn core(&self) -> &ContainerCore {
        &self.core
    }

    fn focus_self(&self) -> Result<(), ModelError> {
        self.core.session().focus_default()
    }

    fn variant(&self) -> &'static str {
        "page"
    }
}

impl SearchContext for Page {
    fn find_element(&self, by: &Locator) -> Result<Option<ContextHandle>, ModelError> {
        self.core.context().find_element(by)
    }

    fn find_elements(&self, by: &Locator) -> Result<Vec<ContextHandle>, ModelError> {
        self.core.context().find_elements(by)
    }

    fn session(&self) -> SessionRef {
        Rc::clone(self.core.session())
    }

    fn describe(&self) -> &str {
        "page"
    }
}

/// Container bound to a frame element; focusing switches the driver
/// into the frame's document.
pub struct Frame {
    core: ContainerCore,
}

impl Frame {
    #[must_use]
    pub fn new(context: ContextHandle, parent: Rc<dyn Container>) -> Rc<Self> {
        Rc::new(Self {
            core: ContainerCore::new_child(context, parent),
        })
    }

    /// Registry constructor. Frames are never roots.
    pub fn construct(
        context: ContextHandle,
        parent: Option<Rc<dyn Container>>,
    ) -> Result<Rc<dyn Container>, ModelError> {
        let parent = require_parent(parent, "frame")?;
        Ok(Self::new(context, parent))
    }
}

impl Container for Frame {
    fn core(&self) -> &ContainerCore {
        &self.core
    }

    fn focus_self(&self) -> Result<(), ModelError> {
        self.core.session().focus_frame(self.core.context().as_ref())
    }

    fn variant(&self) -> &'static str {
        "frame"
    }
}

impl SearchContext for Frame {
    fn find_element(&self, by: &Locator) -> Result<Option<ContextHandle>, ModelError> {
        self.core.context().find_element(by)
    }

    fn find_elements(&self, by: &Locator) -> Result<Vec<ContextHandle>, ModelError> {
        self.core.context().find_elements(by)
    }

    fn session(&self) -> SessionRef {
        Rc::clone(self.core.session())
    }

    fn describe(&self) -> &str {
        "frame"
    }
}

/// Container bound to an element subtree within the currently focused
/// document. Focusing is a no-op: the enclosing page or frame already
/// holds driver focus.
pub struct PageComponent {
    core: ContainerCore,
}

impl PageComponent {
    #[must_use]
    pub fn new(context: ContextHandle, parent: Rc<dyn Container>) -> Rc<Self> {
        Rc::new(Self {
            core: ContainerCore::new_child(context, parent),
        })
    }

    /// Registry constructor. Components are never roots.
    pub fn construct(
        context: ContextHandle,
        parent: Option<Rc<dyn Container>>,
    ) -> Result<Rc<dyn Container>, ModelError> {
        let parent = require_parent(parent, "component")?;
        Ok(Self::new(context, parent))
    }
}

impl Container for PageComponent {
    fn core(&self) -> &ContainerCore {
        &self.core
    }

    fn focus_self(&self) -> Result<(), ModelError> {
        Ok(())
    }

    fn variant(&self) -> &'static str {
        "component"
    }
}

impl SearchContext for PageComponent {
    fn find_element(&self, by: &Locator) -> Result<Option<ContextHandle>, ModelError> {
        self.core.context().find_element(by)
    }

    fn find_elements(&self, by: &Locator) -> Result<Vec<ContextHandle>, ModelError> {
        self.core.context().find_elements(by)
    }

    fn session(&self) -> SessionRef {
        Rc::clone(self.core.session())
    }

    fn describe(&self) -> &str {
        "component"
    }
}
