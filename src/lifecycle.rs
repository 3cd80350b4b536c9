//! Lifecycle Signals - Single-fire teardown with explicit chaining.
//!
//! Every node owns one [`Lifecycle`]. Destroying it:
//! 1. Runs registered destroy handlers in registration order
//! 2. Destroys every chained child lifecycle, in chain order
//!
//! Destroy is idempotent: the second call is a no-op. Handlers registered and
//! children chained after the fact are run/destroyed immediately, so nothing
//! attached to a dead lifecycle can outlive it.
//!
//! Composition functions receive a [`CleanupSignal`], a read-only view that
//! can observe teardown but not trigger it.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::source::Subscription;

struct LifecycleInner {
    destroyed: Cell<bool>,
    handlers: RefCell<Vec<Box<dyn FnOnce()>>>,
    children: RefCell<Vec<Lifecycle>>,
}

/// Owned, at-most-once teardown trigger.
#[derive(Clone)]
pub struct Lifecycle {
    inner: Rc<LifecycleInner>,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl Lifecycle {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(LifecycleInner {
                destroyed: Cell::new(false),
                handlers: RefCell::new(Vec::new()),
                children: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Register a handler to run on destroy.
    pub fn on_destroy(&self, handler: impl FnOnce() + 'static) {
        if self.is_destroyed() {
            handler();
            return;
        }
        self.inner.handlers.borrow_mut().push(Box::new(handler));
    }

    /// Unsubscribe `subscription` on destroy.
    pub fn bind(&self, subscription: Subscription) {
        self.on_destroy(move || subscription.unsubscribe());
    }

    /// Destroy `child` whenever this lifecycle is destroyed.
    ///
    /// Children that already died on their own are pruned here.
    pub fn chain(&self, child: &Lifecycle) {
        if self.ptr_eq(child) {
            return;
        }
        if self.is_destroyed() {
            child.destroy();
            return;
        }
        let mut children = self.inner.children.borrow_mut();
        children.retain(|c| !c.is_destroyed());
        if !children.iter().any(|c| c.ptr_eq(child)) {
            children.push(child.clone());
        }
    }

    /// Fire the signal. Only the first call has any effect.
    pub fn destroy(&self) {
        if self.inner.destroyed.replace(true) {
            return;
        }

        let handlers = std::mem::take(&mut *self.inner.handlers.borrow_mut());
        for handler in handlers {
            handler();
        }

        let children = std::mem::take(&mut *self.inner.children.borrow_mut());
        for child in children {
            child.destroy();
        }
    }

    pub fn is_destroyed(&self) -> bool {
        self.inner.destroyed.get()
    }

    /// Read-only view for composition functions.
    pub fn signal(&self) -> CleanupSignal {
        CleanupSignal {
            lifecycle: self.clone(),
        }
    }

    pub fn ptr_eq(&self, other: &Lifecycle) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    pub(crate) fn child_count(&self) -> usize {
        self.inner
            .children
            .borrow()
            .iter()
            .filter(|c| !c.is_destroyed())
            .count()
    }
}

// =============================================================================
// CleanupSignal
// =============================================================================

/// Observe-only handle to a node's lifecycle.
#[derive(Clone)]
pub struct CleanupSignal {
    lifecycle: Lifecycle,
}

impl CleanupSignal {
    pub fn on_destroy(&self, handler: impl FnOnce() + 'static) {
        self.lifecycle.on_destroy(handler);
    }

    pub fn bind(&self, subscription: Subscription) {
        self.lifecycle.bind(subscription);
    }

    pub fn is_destroyed(&self) -> bool {
        self.lifecycle.is_destroyed()
    }
}
