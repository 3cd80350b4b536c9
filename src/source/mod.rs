//! Value Sources - Push-based streams.
//!
//! Everything reactive in the runtime is built from three primitives:
//! - push a value ([`Subject::next`])
//! - subscribe ([`Source::subscribe`])
//! - complete or cancel ([`Subject::complete`], [`Subscription::unsubscribe`])
//!
//! # Pattern: Explicit Cancellation
//!
//! Dropping a [`Subscription`] does NOT cancel it. Subscriptions live until they
//! are unsubscribed, either by hand or by binding them to a lifecycle:
//!
//! ```ignore
//! let sub = source.subscribe(|value| println!("{value}"));
//! cleanup.bind(sub); // released when the node is destroyed
//! ```
//!
//! # Delivery
//!
//! Delivery is synchronous and in emission order. Subjects and operator chains
//! run on rxrust local subjects; the types here are the thin, cloneable layer
//! the engine binds to lifecycles. An observer may unsubscribe while a value is
//! being delivered. It must not push into, or subscribe to, the subject that is
//! delivering to it.

mod operators;
mod rx;
mod signal;
mod subject;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

pub use subject::{BehaviorSubject, Subject};

// =============================================================================
// Observer
// =============================================================================

/// The receiving end of a subscription: a `next` callback and a `complete` callback.
pub struct Observer<T> {
    next: Rc<dyn Fn(&T)>,
    complete: Rc<dyn Fn()>,
}

impl<T> Clone for Observer<T> {
    fn clone(&self) -> Self {
        Self {
            next: self.next.clone(),
            complete: self.complete.clone(),
        }
    }
}

impl<T: 'static> Observer<T> {
    /// Observer reacting to values only.
    pub fn new(next: impl Fn(&T) + 'static) -> Self {
        Self {
            next: Rc::new(next),
            complete: Rc::new(|| {}),
        }
    }

    /// Attach a completion callback.
    pub fn on_complete(mut self, complete: impl Fn() + 'static) -> Self {
        self.complete = Rc::new(complete);
        self
    }

    /// Deliver a value.
    pub fn next(&self, value: &T) {
        (self.next)(value);
    }

    /// Signal completion.
    pub fn complete(&self) {
        (self.complete)();
    }
}

// =============================================================================
// Subscription
// =============================================================================

struct SubscriptionInner {
    closed: Cell<bool>,
    teardown: RefCell<Vec<Box<dyn FnOnce()>>>,
}

/// Handle to an active subscription.
///
/// Clones share state: unsubscribing any clone closes all of them.
#[derive(Clone)]
pub struct Subscription {
    inner: Rc<SubscriptionInner>,
}

impl Subscription {
    /// Subscription whose teardown runs once on unsubscribe.
    pub fn new(teardown: impl FnOnce() + 'static) -> Self {
        let sub = Self::empty();
        sub.add(teardown);
        sub
    }

    /// Subscription with nothing to release.
    pub fn empty() -> Self {
        Self {
            inner: Rc::new(SubscriptionInner {
                closed: Cell::new(false),
                teardown: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Subscription that is already closed.
    pub fn closed() -> Self {
        let sub = Self::empty();
        sub.inner.closed.set(true);
        sub
    }

    /// Add teardown logic. Runs immediately if already closed.
    pub fn add(&self, teardown: impl FnOnce() + 'static) {
        if self.inner.closed.get() {
            teardown();
            return;
        }
        self.inner.teardown.borrow_mut().push(Box::new(teardown));
    }

    /// Close `child` together with this subscription.
    pub fn add_child(&self, child: Subscription) {
        self.add(move || child.unsubscribe());
    }

    /// Cancel the subscription. Idempotent.
    pub fn unsubscribe(&self) {
        if self.inner.closed.replace(true) {
            return;
        }
        let teardown = std::mem::take(&mut *self.inner.teardown.borrow_mut());
        for f in teardown {
            f();
        }
    }

    /// Whether the subscription has been cancelled.
    pub fn is_closed(&self) -> bool {
        self.inner.closed.get()
    }
}

// =============================================================================
// Source
// =============================================================================

/// Cloneable, type-erased subscribable stream.
///
/// Every call to [`Source::subscribe`] produces an independent subscription;
/// whether subscribers share emissions depends on what the source wraps
/// (a [`Subject`] fans out, an operator chain keeps per-subscription state).
pub struct Source<T> {
    subscribe: Rc<dyn Fn(Observer<T>) -> Subscription>,
}

impl<T> Clone for Source<T> {
    fn clone(&self) -> Self {
        Self {
            subscribe: self.subscribe.clone(),
        }
    }
}

impl<T: 'static> Source<T> {
    /// Build a source from a subscribe function.
    pub fn new(subscribe: impl Fn(Observer<T>) -> Subscription + 'static) -> Self {
        Self {
            subscribe: Rc::new(subscribe),
        }
    }

    /// Subscribe with a full observer.
    pub fn subscribe_observer(&self, observer: Observer<T>) -> Subscription {
        (self.subscribe)(observer)
    }

    /// Subscribe to values.
    pub fn subscribe(&self, next: impl Fn(&T) + 'static) -> Subscription {
        self.subscribe_observer(Observer::new(next))
    }

    /// Source that completes immediately without emitting.
    pub fn empty() -> Self {
        Source::new(|observer| {
            observer.complete();
            Subscription::closed()
        })
    }

    /// Source that never emits and never completes.
    pub fn never() -> Self {
        Source::new(|_| Subscription::empty())
    }
}

impl<T: Clone + 'static> Source<T> {
    /// Emit each value synchronously on subscribe, then complete.
    pub fn of(values: impl IntoIterator<Item = T>) -> Self {
        let values: Rc<Vec<T>> = Rc::new(values.into_iter().collect());
        Source::new(move |observer| {
            for value in values.iter() {
                observer.next(value);
            }
            observer.complete();
            Subscription::closed()
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
