//! Multicast subjects.
//!
//! [`Subject`] broadcasts each pushed value to every current observer.
//! [`BehaviorSubject`] also remembers the latest value and replays it to
//! new observers.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::rx::{self, RxSubject};
use super::{Observer, Source, Subscription};

#[derive(Default)]
struct SubjectState {
    closed: Cell<bool>,
    observers: Cell<usize>,
}

/// Hot multicast stream without replay, backed by an rxrust local subject.
pub struct Subject<T: Clone + 'static> {
    rx: RxSubject<T>,
    state: Rc<SubjectState>,
}

impl<T: Clone + 'static> Clone for Subject<T> {
    fn clone(&self) -> Self {
        Self {
            rx: self.rx.clone(),
            state: self.state.clone(),
        }
    }
}

impl<T: Clone + 'static> Default for Subject<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + 'static> Subject<T> {
    pub fn new() -> Self {
        Self {
            rx: rx::subject(),
            state: Rc::new(SubjectState::default()),
        }
    }

    /// Push a value to every current observer.
    ///
    /// Ignored once the subject completed.
    pub fn next(&self, value: T) {
        if self.state.closed.get() {
            return;
        }
        rx::push(&self.rx, value);
    }

    /// Complete every observer and refuse further values.
    pub fn complete(&self) {
        if self.state.closed.replace(true) {
            return;
        }
        self.state.observers.set(0);
        rx::finish(&self.rx);
    }

    /// Subscribe with a full observer.
    ///
    /// Subscribing to a completed subject completes the observer immediately.
    pub fn subscribe_observer(&self, observer: Observer<T>) -> Subscription {
        if self.state.closed.get() {
            observer.complete();
            return Subscription::closed();
        }

        let sub = rx::subscribe(&self.rx, observer);
        self.state.observers.set(self.state.observers.get() + 1);
        let state = self.state.clone();
        sub.add(move || {
            if !state.closed.get() {
                state.observers.set(state.observers.get().saturating_sub(1));
            }
        });
        sub
    }

    /// Subscribe to values.
    pub fn subscribe(&self, next: impl Fn(&T) + 'static) -> Subscription {
        self.subscribe_observer(Observer::new(next))
    }

    /// Number of live observers.
    pub fn observer_count(&self) -> usize {
        self.state.observers.get()
    }

    /// Whether the subject completed.
    pub fn is_closed(&self) -> bool {
        self.state.closed.get()
    }

    /// Type-erased view sharing this subject's emissions.
    pub fn as_source(&self) -> Source<T> {
        let subject = self.clone();
        Source::new(move |observer| subject.subscribe_observer(observer))
    }
}

impl<T: Clone + 'static> From<&Subject<T>> for Source<T> {
    fn from(subject: &Subject<T>) -> Self {
        subject.as_source()
    }
}

// =============================================================================
// BehaviorSubject
// =============================================================================

/// Subject holding a current value, replayed to each new observer.
pub struct BehaviorSubject<T: Clone + 'static> {
    subject: Subject<T>,
    current: Rc<RefCell<T>>,
}

impl<T: Clone + 'static> Clone for BehaviorSubject<T> {
    fn clone(&self) -> Self {
        Self {
            subject: self.subject.clone(),
            current: self.current.clone(),
        }
    }
}

impl<T: Clone + 'static> BehaviorSubject<T> {
    pub fn new(initial: T) -> Self {
        Self {
            subject: Subject::new(),
            current: Rc::new(RefCell::new(initial)),
        }
    }

    /// Latest value.
    pub fn value(&self) -> T {
        self.current.borrow().clone()
    }

    /// Replace the current value and broadcast it.
    pub fn next(&self, value: T) {
        if self.subject.is_closed() {
            return;
        }
        *self.current.borrow_mut() = value.clone();
        self.subject.next(value);
    }

    pub fn complete(&self) {
        self.subject.complete();
    }

    /// Subscribe with a full observer; the current value is delivered first.
    pub fn subscribe_observer(&self, observer: Observer<T>) -> Subscription {
        let sub = self.subject.subscribe_observer(observer.clone());
        if !sub.is_closed() {
            let current = self.value();
            observer.next(&current);
        }
        sub
    }

    pub fn subscribe(&self, next: impl Fn(&T) + 'static) -> Subscription {
        self.subscribe_observer(Observer::new(next))
    }

    pub fn observer_count(&self) -> usize {
        self.subject.observer_count()
    }

    pub fn is_closed(&self) -> bool {
        self.subject.is_closed()
    }

    pub fn as_source(&self) -> Source<T> {
        let subject = self.clone();
        Source::new(move |observer| subject.subscribe_observer(observer))
    }
}

impl<T: Clone + 'static> From<&BehaviorSubject<T>> for Source<T> {
    fn from(subject: &BehaviorSubject<T>) -> Self {
        subject.as_source()
    }
}

// =============================================================================
// Tests
// =============================================================================
