//! Shared fake driver for unit tests: a recording session and stub
//! search contexts, so tests can observe focus traffic without a
//! browser.

use std::{
    cell::{Cell, RefCell},
    rc::Rc,
    time::Duration,
};

use crate::{
    container::{Container, ContainerCore, Frame, Page, PageComponent},
    driver::{ContextHandle, DriverSession, Locator, SearchContext, SessionRef},
    error::ModelError,
    factory::ContainerRegistry,
    load::DetectsLoadCompletion,
    wait::WaitSettings,
};

/// Wait settings small enough for fast test runs.
pub fn tree_settings() -> WaitSettings {
    WaitSettings {
        timeout: Duration::from_millis(250),
        poll_interval: Duration::from_millis(1),
        page_load_timeout: Duration::from_millis(250),
    }
}

/// Records every focus switch the model requests, in order.
pub struct RecordingSession {
    pub focus_log: RefCell<Vec<String>>,
    pub fail_frame_focus: Cell<bool>,
}

impl RecordingSession {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            focus_log: RefCell::new(Vec::new()),
            fail_frame_focus: Cell::new(false),
        })
    }
}

impl DriverSession for RecordingSession {
    fn focus_default(&self) -> Result<(), ModelError> {
        self.focus_log.borrow_mut().push("default".into());
        Ok(())
    }

    fn focus_frame(&self, frame: &dyn SearchContext) -> Result<(), ModelError> {
        if self.fail_frame_focus.get() {
            return Err(ModelError::Driver("frame detached".into()));
        }
        self.focus_log
            .borrow_mut()
            .push(format!("frame:{}", frame.describe()));
        Ok(())
    }
}

/// A fake searchable region bound to a recording session. Finds
/// succeed and produce children named `<parent>:<selector>`.
pub struct FakeContext {
    name: String,
    session: Rc<RecordingSession>,
}

impl FakeContext {
    pub fn new(name: &str, session: &Rc<RecordingSession>) -> Rc<Self> {
        Rc::new(Self {
            name: name.to_string(),
            session: Rc::clone(session),
        })
    }
}

fn selector_of(by: &Locator) -> &str {
    match by {
        Locator::Css(selector) | Locator::XPath(selector) => selector,
    }
}

impl SearchContext for FakeContext {
    fn find_element(&self, by: &Locator) -> Result<Option<ContextHandle>, ModelError> {
        let child = FakeContext::new(&format!("{}:{}", self.name, selector_of(by)), &self.session);
        Ok(Some(child))
    }

    fn find_elements(&self, by: &Locator) -> Result<Vec<ContextHandle>, ModelError> {
        let child: ContextHandle =
            FakeContext::new(&format!("{}:{}", self.name, selector_of(by)), &self.session);
        Ok(vec![child])
    }

    fn session(&self) -> SessionRef {
        Rc::clone(&self.session) as SessionRef
    }

    fn describe(&self) -> &str {
        &self.name
    }
}

/// A three-level tree (page → frame → component) over a recording
/// session. Context names: `doc`, `frame-el`, `panel`.
pub fn test_tree() -> (
    Rc<Page>,
    Rc<Frame>,
    Rc<PageComponent>,
    Rc<RecordingSession>,
) {
    let session = RecordingSession::new();
    let page = Page::with_settings(
        FakeContext::new("doc", &session),
        tree_settings(),
        Rc::new(ContainerRegistry::standard()),
    );
    let frame = Frame::new(
        FakeContext::new("frame-el", &session),
        Rc::clone(&page) as Rc<dyn Container>,
    );
    let component = PageComponent::new(
        FakeContext::new("panel", &session),
        Rc::clone(&frame) as Rc<dyn Container>,
    );
    (page, frame, component, session)
}

/// A document context whose load detector reports complete after
/// `remaining` negative polls.
pub struct LoadingDocument {
    name: String,
    session: Rc<RecordingSession>,
    remaining: Cell<u32>,
    pub polls: Cell<u32>,
}

impl LoadingDocument {
    pub fn new(session: &Rc<RecordingSession>, remaining: u32) -> Rc<Self> {
        Rc::new(Self {
            name: "loading-doc".to_string(),
            session: Rc::clone(session),
            remaining: Cell::new(remaining),
            polls: Cell::new(0),
        })
    }
}

impl DetectsLoadCompletion for LoadingDocument {
    fn is_load_complete(&self) -> Result<bool, ModelError> {
        self.polls.set(self.polls.get() + 1);
        if self.remaining.get() == 0 {
            Ok(true)
        } else {
            self.remaining.set(self.remaining.get() - 1);
            Ok(false)
        }
    }
}

impl SearchContext for LoadingDocument {
    fn find_element(&self, _by: &Locator) -> Result<Option<ContextHandle>, ModelError> {
        Ok(None)
    }

    fn find_elements(&self, _by: &Locator) -> Result<Vec<ContextHandle>, ModelError> {
        Ok(Vec::new())
    }

    fn session(&self) -> SessionRef {
        Rc::clone(&self.session) as SessionRef
    }

    fn load_detector(&self) -> Option<&dyn DetectsLoadCompletion> {
        Some(self)
    }

    fn describe(&self) -> &str {
        &self.name
    }
}

/// A root container variant that forwards load detection to its
/// [`LoadingDocument`] context, the way a concrete page class would.
pub struct LoadingPage {
    core: ContainerCore,
    document: Rc<LoadingDocument>,
}

pub fn loading_page(document: Rc<LoadingDocument>) -> Rc<LoadingPage> {
    let core = ContainerCore::new_root(
        Rc::clone(&document) as ContextHandle,
        tree_settings(),
        Rc::new(ContainerRegistry::standard()),
    );
    Rc::new(LoadingPage { core, document })
}

impl Container for LoadingPage {
    fn core(&self) -> &ContainerCore {
        &self.core
    }

    fn focus_self(&self) -> Result<(), ModelError> {
        self.core.session().focus_default()
    }

    fn variant(&self) -> &'static str {
        "loading-page"
    }
}

impl SearchContext for LoadingPage {
    fn find_element(&self, by: &Locator) -> Result<Option<ContextHandle>, ModelError> {
        self.core.context().find_element(by)
    }

    fn find_elements(&self, by: &Locator) -> Result<Vec<ContextHandle>, ModelError> {
        self.core.context().find_elements(by)
    }

    fn session(&self) -> SessionRef {
        Rc::clone(self.core.session())
    }

    fn load_detector(&self) -> Option<&dyn DetectsLoadCompletion> {
        Some(self.document.as_ref())
    }

    fn describe(&self) -> &str {
        "loading page"
    }
}
