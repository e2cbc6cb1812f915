//! Boundary traits for the wrapped browser-automation driver.
//!
//! The model never speaks a wire protocol itself. A driver integration
//! supplies two things: searchable regions of the document
//! ([`SearchContext`]) and the session-level focus switches a container
//! variant needs ([`DriverSession`]). Handles are `Rc`, not `Arc`: one
//! remote session can only be focused on one context at a time, so a
//! container tree belongs to a single logical thread and the handle
//! types refuse to cross thread boundaries.

use std::{fmt, rc::Rc};

use crate::{error::ModelError, load::DetectsLoadCompletion};

/// Shared handle to a searchable region (document, frame, or element
/// subtree).
pub type ContextHandle = Rc<dyn SearchContext>;

/// Shared handle to the single browser-automation session behind a
/// container tree.
pub type SessionRef = Rc<dyn DriverSession>;

/// An opaque element locator. Locator syntax is owned by the driver;
/// the model only carries the value through and prints it in
/// diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    Css(String),
    XPath(String),
}

impl Locator {
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    pub fn xpath(expression: impl Into<String>) -> Self {
        Self::XPath(expression.into())
    }

    /// Reflexive locator addressing the context element itself.
    #[must_use]
    pub fn self_ref() -> Self {
        Self::XPath(".".into())
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Css(selector) => write!(f, "css({selector})"),
            Self::XPath(expression) => write!(f, "xpath({expression})"),
        }
    }
}

/// A region of the document that can be searched for elements.
///
/// Implemented by driver integrations for their document, frame, and
/// element handles, and by every container in the model tree (a
/// container searches within its own context).
pub trait SearchContext {
    /// Find the first element matching `by`, or `None` when nothing
    /// matches.
    fn find_element(&self, by: &Locator) -> Result<Option<ContextHandle>, ModelError>;

    /// Find all elements matching `by`, in document order. Empty when
    /// nothing matches.
    fn find_elements(&self, by: &Locator) -> Result<Vec<ContextHandle>, ModelError>;

    /// Derive the shared session handle this context belongs to.
    fn session(&self) -> SessionRef;

    /// Capability hook for page-load detection. Contexts that do not
    /// model load behavior return `None`.
    fn load_detector(&self) -> Option<&dyn DetectsLoadCompletion> {
        None
    }

    /// Diagnostic name used in failure messages.
    fn describe(&self) -> &str {
        "search context"
    }
}

impl fmt::Debug for dyn SearchContext + '_ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// Session-level focus operations a container variant needs to make its
/// context the driver's active focus.
pub trait DriverSession {
    /// Focus the session on the top-level document.
    fn focus_default(&self) -> Result<(), ModelError>;

    /// Focus the session on the document inside the given frame element.
    fn focus_frame(&self, frame: &dyn SearchContext) -> Result<(), ModelError>;
}
