//! Node - One unit of composition.
//!
//! A node owns a lifecycle and a context scope, and either owns a host
//! element or delegates to the node that provides one. Cloning a node clones
//! the handle, not the subtree.
//!
//! Parents hold strong handles to the children they adopt until they are
//! destroyed, so a child's own subscribers can keep a weak handle to it.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use super::owner;
use crate::context::{Context, ContextScope};
use crate::lifecycle::{CleanupSignal, Lifecycle};
use crate::types::{ElementId, NodeFlags};

struct NodeInner {
    element: ElementId,
    delegate: RefCell<Option<Node>>,
    lifecycle: Lifecycle,
    scope: ContextScope,
    flags: Cell<NodeFlags>,
    adopted: Rc<RefCell<Vec<Node>>>,
}

/// Handle to a composed node.
#[derive(Clone)]
pub struct Node {
    inner: Rc<NodeInner>,
}

impl Node {
    pub(crate) fn new(element: ElementId, flags: NodeFlags) -> Self {
        let node = Self {
            inner: Rc::new(NodeInner {
                element,
                delegate: RefCell::new(None),
                lifecycle: Lifecycle::new(),
                scope: ContextScope::new(),
                flags: Cell::new(flags),
                adopted: Rc::new(RefCell::new(Vec::new())),
            }),
        };

        let scope = node.inner.scope.clone();
        let adopted = node.inner.adopted.clone();
        node.inner.lifecycle.on_destroy(move || {
            scope.close();
            let released = std::mem::take(&mut *adopted.borrow_mut());
            drop(released);
        });
        owner::claim(&node.inner.lifecycle);
        node
    }

    /// The host element this node renders as.
    ///
    /// Components and switchers report the element of the node they delegate to.
    pub fn element(&self) -> ElementId {
        match self.inner.delegate.borrow().as_ref() {
            Some(delegate) => delegate.element(),
            None => self.inner.element,
        }
    }

    /// Tear down this node and everything chained to it. Idempotent.
    pub fn destroy(&self) {
        self.inner.lifecycle.destroy();
    }

    pub fn is_destroyed(&self) -> bool {
        self.inner.lifecycle.is_destroyed()
    }

    pub fn flags(&self) -> NodeFlags {
        let flags = self.inner.flags.get();
        if self.is_destroyed() {
            flags | NodeFlags::DESTROYED
        } else {
            flags
        }
    }

    /// Observe-only view of this node's lifecycle.
    pub fn cleanup(&self) -> CleanupSignal {
        self.inner.lifecycle.signal()
    }

    /// This node's context.
    pub fn context(&self) -> Context {
        Context::new(self.inner.scope.clone())
    }

    pub fn ptr_eq(&self, other: &Node) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    // =========================================================================
    // Crate internals
    // =========================================================================

    pub(crate) fn lifecycle(&self) -> &Lifecycle {
        &self.inner.lifecycle
    }

    pub(crate) fn insert_flags(&self, flags: NodeFlags) {
        self.inner.flags.set(self.inner.flags.get() | flags);
    }

    /// Take ownership of `child`: its lifecycle ends with ours and its context
    /// reads through ours.
    pub(crate) fn adopt(&self, child: &Node) {
        self.inner.lifecycle.chain(&child.inner.lifecycle);
        child.inner.scope.link_parent(&self.inner.scope);
        if self.is_destroyed() || self.ptr_eq(child) {
            return;
        }
        let mut adopted = self.inner.adopted.borrow_mut();
        adopted.retain(|c| !c.is_destroyed());
        if !adopted.iter().any(|c| c.ptr_eq(child)) {
            adopted.push(child.clone());
        }
    }

    #[cfg(test)]
    pub(crate) fn adopted_count(&self) -> usize {
        self.inner
            .adopted
            .borrow()
            .iter()
            .filter(|c| !c.is_destroyed())
            .count()
    }

    /// Render as `target` from now on.
    pub(crate) fn delegate_to(&self, target: &Node) {
        *self.inner.delegate.borrow_mut() = Some(target.clone());
    }

    pub(crate) fn delegate(&self) -> Option<Node> {
        self.inner.delegate.borrow().clone()
    }

    pub(crate) fn downgrade(&self) -> WeakNode {
        WeakNode {
            inner: Rc::downgrade(&self.inner),
        }
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("element", &self.element())
            .field("flags", &self.flags())
            .finish()
    }
}

/// Non-owning node handle for closures the node itself keeps alive.
#[derive(Clone)]
pub(crate) struct WeakNode {
    inner: Weak<NodeInner>,
}

impl WeakNode {
    pub(crate) fn upgrade(&self) -> Option<Node> {
        self.inner.upgrade().map(|inner| Node { inner })
    }
}
