//! Mount API - Root containers and their mounted trees.
//!
//! A root owns exactly one slot in a host container. Rendering replaces what
//! the slot holds: the previous tree is torn down completely before the next
//! one is attached.
//!
//! # Example
//!
//! ```ignore
//! let host = MemoryHost::install();
//! let root = create_root(host.create_element("div"));
//!
//! root.render(create_component(Counter, (), ())?)?;
//! root.render(create_component(Goodbye, (), ())?)?; // Counter destroyed first
//!
//! root.unmount(); // container empty, every subscription released
//! ```
//!
//! Roots created for the same container share the slot, so rendering through
//! one replaces what another mounted.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::engine::Node;
use crate::error::{Error, Result};
use crate::host::HostAdapter;
use crate::types::ElementId;

thread_local! {
    /// Mounted node per container element. Entries exist only while something is mounted.
    static ROOTS: RefCell<HashMap<ElementId, Node>> = RefCell::new(HashMap::new());
}

/// Handle to a container's mount slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Root {
    container: ElementId,
}

/// Get the root for `container`.
pub fn create_root(container: ElementId) -> Root {
    Root { container }
}

/// Forget every mounted tree on this thread without destroying them.
pub(crate) fn reset_roots() {
    ROOTS.with(|roots| roots.borrow_mut().clear());
}

impl Root {
    pub fn container(&self) -> ElementId {
        self.container
    }

    /// The node currently mounted, if any.
    pub fn mounted(&self) -> Option<Node> {
        ROOTS.with(|roots| roots.borrow().get(&self.container).cloned())
    }

    /// Mount `node`, destroying whatever was mounted before.
    ///
    /// Rendering the node that is already mounted does nothing.
    pub fn render(&self, node: Node) -> Result<()> {
        if node.is_destroyed() {
            return Err(Error::Destroyed);
        }
        let host = HostAdapter::current()?;

        if let Some(current) = self.mounted() {
            if current.ptr_eq(&node) {
                tracing::debug!(container = %self.container, "node already mounted");
                return Ok(());
            }
            self.unmount();
        }

        // Tearing down the previous tree may have taken `node` with it.
        if node.is_destroyed() {
            return Err(Error::Destroyed);
        }

        host.append_child(self.container, node.element());
        tracing::debug!(
            container = %self.container,
            element = %node.element(),
            "mounted"
        );
        let replaced = ROOTS.with(|roots| roots.borrow_mut().insert(self.container, node));
        if let Some(stale) = replaced {
            stale.destroy();
        }
        Ok(())
    }

    /// Destroy the mounted node and release the container's slot. No-op when
    /// nothing is mounted.
    pub fn unmount(&self) {
        let mounted = ROOTS.with(|roots| roots.borrow_mut().remove(&self.container));
        if let Some(node) = mounted {
            tracing::debug!(
                container = %self.container,
                element = %node.element(),
                "unmounting"
            );
            node.destroy();
        }
    }
}

#[cfg(test)]
fn mounted_count() -> usize {
    ROOTS.with(|roots| roots.borrow().len())
}
