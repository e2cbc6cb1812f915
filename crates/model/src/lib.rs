//! Structural core of a page-object model for browser-driven UI tests.
//!
//! Containers form a tree over searchable regions of a live document:
//! pages at the root, frames and nested components below. The model
//! tracks when a container's context has been vacated, re-focuses the
//! driver along the root-to-target path before every guarded
//! operation, and layers polling waits over named load-completion
//! conditions.
//!
//! The browser itself stays behind the [`driver`] boundary traits; any
//! driver integration that can find elements and switch focus can host
//! a container tree.
//!
//! # Example
//!
//! ```ignore
//! use pagekit_model::{Guarded, Locator, Page};
//!
//! let page = Guarded::enhance(Page::new(document_context));
//! let frame = page.create_child("frame", frame_context)?;
//! let field = frame.find_element(&Locator::css("input[name=q]"))?;
//! ```

pub mod container;
pub mod driver;
pub mod error;
pub mod factory;
pub mod guard;
pub mod load;
pub mod wait;

#[cfg(test)]
pub(crate) mod testutil;

pub use {
    container::{Container, ContainerCore, Frame, Page, PageComponent, VacateMarker},
    driver::{ContextHandle, DriverSession, Locator, SearchContext, SessionRef},
    error::ModelError,
    factory::{ChildConstructor, ContainerRegistry, new_child},
    guard::Guarded,
    load::{DetectsLoadCompletion, await_load, check_condition, page_load_is_complete},
    wait::{Coordinator, Wait, WaitSettings},
};
