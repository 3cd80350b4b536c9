//! Mutation adapter between the runtime and the installed host.
//!
//! Every host call made by the runtime goes through here so host mutation
//! stays an explicit operation, traced when `trace_host_mutations` is on.

use std::rc::Rc;

use super::{current_host, Host};
use crate::config::config;
use crate::error::Result;
use crate::types::{ElementId, Value};

#[derive(Clone)]
pub(crate) struct HostAdapter {
    host: Rc<dyn Host>,
    trace: bool,
}

impl HostAdapter {
    pub(crate) fn current() -> Result<Self> {
        Ok(Self {
            host: current_host()?,
            trace: config().trace_host_mutations,
        })
    }

    pub(crate) fn create_element(&self, tag: &str) -> ElementId {
        let element = self.host.create_element(tag);
        if self.trace {
            tracing::trace!(%element, tag, "host create");
        }
        element
    }

    pub(crate) fn set_property(&self, element: ElementId, name: &str, value: &Value) {
        if self.trace {
            tracing::trace!(%element, name, ?value, "host set property");
        }
        self.host.set_property(element, name, value);
    }

    pub(crate) fn append_child(&self, parent: ElementId, child: ElementId) {
        if self.trace {
            tracing::trace!(%parent, %child, "host append");
        }
        self.host.append_child(parent, child);
    }

    /// Insert before `anchor` when it is still a child of `parent`, else append.
    pub(crate) fn insert_at(&self, parent: ElementId, child: ElementId, anchor: Option<ElementId>) {
        let anchor = anchor.filter(|a| self.host.parent(*a) == Some(parent));
        if self.trace {
            tracing::trace!(%parent, %child, ?anchor, "host insert");
        }
        match anchor {
            Some(reference) => self.host.insert_before(parent, child, Some(reference)),
            None => self.host.append_child(parent, child),
        }
    }

    pub(crate) fn remove(&self, element: ElementId) {
        if self.trace {
            tracing::trace!(%element, "host remove");
        }
        self.host.remove_child(element);
    }

    pub(crate) fn next_sibling(&self, element: ElementId) -> Option<ElementId> {
        self.host.next_sibling(element)
    }

    pub(crate) fn parent(&self, element: ElementId) -> Option<ElementId> {
        self.host.parent(element)
    }
}
