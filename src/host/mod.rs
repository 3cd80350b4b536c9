//! Host Display System - The capability boundary.
//!
//! The runtime never renders anything itself. It drives a [`Host`] through a
//! narrow set of calls and treats element handles as opaque.
//!
//! One host is installed per thread, in the same way the DOM is ambient in a
//! browser:
//!
//! ```ignore
//! let host = MemoryHost::install();
//! let root = create_root(host.create_element("div"));
//! ```
//!
//! All mutations made by the runtime go through [`HostAdapter`], which is only
//! used by the composition engine, the reconcilers and the root controller.

mod adapter;
mod memory;

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::{Error, Result};
use crate::types::{ElementId, Value};

pub(crate) use adapter::HostAdapter;
pub use memory::{MemoryHost, Mutation};

/// Operations the runtime needs from a display system.
pub trait Host {
    /// Create a detached element.
    fn create_element(&self, tag: &str) -> ElementId;

    /// Assign a property.
    fn set_property(&self, element: ElementId, name: &str, value: &Value);

    /// Append `child` as the last child of `parent`, detaching it from any previous parent.
    fn append_child(&self, parent: ElementId, child: ElementId);

    /// Insert `child` before `reference`, or append when `reference` is `None`.
    fn insert_before(&self, parent: ElementId, child: ElementId, reference: Option<ElementId>);

    /// Detach `element` from its parent. No-op when detached.
    fn remove_child(&self, element: ElementId);

    /// The element following `element` under the same parent.
    fn next_sibling(&self, element: ElementId) -> Option<ElementId>;

    /// The parent `element` is attached to.
    fn parent(&self, element: ElementId) -> Option<ElementId>;
}

// =============================================================================
// Installed Host
// =============================================================================

thread_local! {
    static HOST: RefCell<Option<Rc<dyn Host>>> = const { RefCell::new(None) };
}

/// Install the host used by every node built on this thread.
pub fn install_host(host: Rc<dyn Host>) {
    HOST.with(|slot| {
        *slot.borrow_mut() = Some(host);
    });
}

/// Remove the installed host, returning it.
pub fn uninstall_host() -> Option<Rc<dyn Host>> {
    HOST.with(|slot| slot.borrow_mut().take())
}

/// The installed host.
pub fn current_host() -> Result<Rc<dyn Host>> {
    HOST.with(|slot| slot.borrow().clone()).ok_or(Error::NoHost)
}
