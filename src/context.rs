//! Context Channel - Downward-only scoped key/value propagation.
//!
//! Each node owns a [`ContextScope`]. A scope holds one latest-value cell per
//! key and links to its parent scope by reference (read-through, never copied).
//!
//! # Resolution
//!
//! Every write gets a thread-wide sequence number. A reader at scope S sees,
//! for a key, the write with the highest sequence among S and all of S's
//! ancestors. So:
//! - writes at S reach S and every descendant
//! - writes at S never reach S's ancestors
//! - when S and an ancestor both write, the later write wins
//!
//! # Late linking
//!
//! Nodes are built bottom-up: a component reads its context before its node is
//! attached to a parent. Readers subscribe to the scope's link event and, once
//! the parent is linked, replay the newest in-scope value and follow the
//! parent's updates from then on.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use crate::source::{Observer, Source, Subject, Subscription};

thread_local! {
    /// Monotonic write counter shared by every scope on this thread.
    static WRITE_SEQUENCE: Cell<u64> = const { Cell::new(0) };
}

fn next_sequence() -> u64 {
    WRITE_SEQUENCE.with(|seq| {
        let next = seq.get() + 1;
        seq.set(next);
        next
    })
}

/// Restart the write counter. Scopes written before the reset must not be reused.
pub(crate) fn reset_sequence() {
    WRITE_SEQUENCE.with(|seq| seq.set(0));
}

#[derive(Clone)]
struct Entry {
    seq: u64,
    value: Rc<dyn Any>,
}

struct ContextCell {
    latest: RefCell<Option<Entry>>,
    updates: Subject<Entry>,
}

struct ScopeInner {
    parent: RefCell<Option<ContextScope>>,
    cells: RefCell<HashMap<String, Rc<ContextCell>>>,
    linked: Subject<ContextScope>,
    closed: Cell<bool>,
}

/// One node's context store.
#[derive(Clone)]
pub(crate) struct ContextScope {
    inner: Rc<ScopeInner>,
}

impl ContextScope {
    pub(crate) fn new() -> Self {
        Self {
            inner: Rc::new(ScopeInner {
                parent: RefCell::new(None),
                cells: RefCell::new(HashMap::new()),
                linked: Subject::new(),
                closed: Cell::new(false),
            }),
        }
    }

    /// Read through `parent` from now on.
    pub(crate) fn link_parent(&self, parent: &ContextScope) {
        if Rc::ptr_eq(&self.inner, &parent.inner) {
            return;
        }
        if self
            .parent()
            .is_some_and(|current| Rc::ptr_eq(&current.inner, &parent.inner))
        {
            return;
        }
        let previous = self.inner.parent.replace(Some(parent.clone()));
        if previous.is_some() {
            tracing::warn!("context scope re-linked to a new parent");
        }
        self.inner.linked.next(parent.clone());
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.inner.closed.get()
    }

    /// Complete every cell and stop accepting writes.
    pub(crate) fn close(&self) {
        if self.inner.closed.replace(true) {
            return;
        }
        let cells: Vec<Rc<ContextCell>> = self.inner.cells.borrow().values().cloned().collect();
        for cell in cells {
            cell.updates.complete();
        }
        self.inner.linked.complete();
        self.inner.parent.replace(None);
    }

    fn cell(&self, key: &str) -> Rc<ContextCell> {
        if let Some(cell) = self.inner.cells.borrow().get(key) {
            return cell.clone();
        }
        let cell = Rc::new(ContextCell {
            latest: RefCell::new(None),
            updates: Subject::new(),
        });
        self.inner
            .cells
            .borrow_mut()
            .insert(key.to_string(), cell.clone());
        cell
    }

    fn parent(&self) -> Option<ContextScope> {
        self.inner.parent.borrow().clone()
    }

    fn write(&self, key: &str, value: Rc<dyn Any>) {
        if self.is_closed() {
            tracing::debug!(key, "context write on a destroyed scope ignored");
            return;
        }
        let entry = Entry {
            seq: next_sequence(),
            value,
        };
        let cell = self.cell(key);
        *cell.latest.borrow_mut() = Some(entry.clone());
        cell.updates.next(entry);
    }

    /// Newest entry for `key` across this scope and its ancestors.
    fn latest_in_scope(&self, key: &str) -> Option<Entry> {
        let mut best: Option<Entry> = None;
        let mut scope = Some(self.clone());
        while let Some(current) = scope {
            let own = current
                .inner
                .cells
                .borrow()
                .get(key)
                .and_then(|cell| cell.latest.borrow().clone());
            if let Some(entry) = own {
                if best.as_ref().is_none_or(|b| entry.seq > b.seq) {
                    best = Some(entry);
                }
            }
            scope = current.parent();
        }
        best
    }

    /// Follow updates for `key` on this scope and, transitively, its ancestors.
    ///
    /// Does not replay; callers replay through `latest_in_scope`.
    fn follow(&self, key: &str, sink: Rc<dyn Fn(&Entry)>, done: Rc<dyn Fn()>) -> Subscription {
        let all = Subscription::empty();
        let cell = self.cell(key);

        let on_entry = sink.clone();
        let on_close = all.clone();
        all.add_child(cell.updates.subscribe_observer(
            Observer::new(move |entry: &Entry| on_entry(entry)).on_complete(move || {
                done();
                on_close.unsubscribe();
            }),
        ));

        match self.parent() {
            Some(parent) => {
                all.add_child(parent.follow(key, sink, Rc::new(|| {})));
            }
            None => {
                let key = key.to_string();
                let composite = all.clone();
                all.add_child(self.inner.linked.subscribe(move |parent: &ContextScope| {
                    if let Some(entry) = parent.latest_in_scope(&key) {
                        sink(&entry);
                    }
                    composite.add_child(parent.follow(&key, sink.clone(), Rc::new(|| {})));
                }));
            }
        }
        all
    }
}

// =============================================================================
// Context handle
// =============================================================================

/// Context access handed to composition functions.
#[derive(Clone)]
pub struct Context {
    scope: ContextScope,
}

impl Context {
    pub(crate) fn new(scope: ContextScope) -> Self {
        Self { scope }
    }

    /// Publish the latest value for `key` to this node and its descendants.
    pub fn set<T: Clone + 'static>(&self, key: impl Into<String>, value: T) {
        let key = key.into();
        tracing::trace!(key = %key, "context set");
        self.scope.write(&key, Rc::new(value));
    }

    /// Stream of in-scope values for `key`.
    ///
    /// Yields the latest value immediately when one exists, then every update.
    /// Yields nothing before the first write. Completes when this node is destroyed.
    pub fn get<T: Clone + 'static>(&self, key: impl Into<String>) -> Source<T> {
        let key: Rc<str> = Rc::from(key.into());
        let scope = self.scope.clone();
        Source::new(move |observer: Observer<T>| {
            if scope.is_closed() {
                observer.complete();
                return Subscription::closed();
            }

            let last_seq = Rc::new(Cell::new(0u64));
            let sink: Rc<dyn Fn(&Entry)> = {
                let observer = observer.clone();
                let key = key.clone();
                Rc::new(move |entry: &Entry| {
                    if entry.seq <= last_seq.get() {
                        return;
                    }
                    last_seq.set(entry.seq);
                    match entry.value.downcast_ref::<T>() {
                        Some(value) => observer.next(value),
                        None => tracing::warn!(
                            key = %key,
                            expected = std::any::type_name::<T>(),
                            "context value has a different type; skipped"
                        ),
                    }
                })
            };

            if let Some(entry) = scope.latest_in_scope(&key) {
                sink(&entry);
            }
            let done: Rc<dyn Fn()> = Rc::new(move || observer.complete());
            scope.follow(&key, sink, done)
        })
    }

    /// Current in-scope value for `key`, if any.
    pub fn peek<T: Clone + 'static>(&self, key: &str) -> Option<T> {
        self.scope
            .latest_in_scope(key)
            .and_then(|entry| entry.value.downcast_ref::<T>().cloned())
    }
}
