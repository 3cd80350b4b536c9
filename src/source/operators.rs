//! Stream operators.
//!
//! A small set: enough to derive props from sources and to bind streams to a
//! lifecycle. Each subscription to an operator chain gets its own rxrust subject
//! fed by the upstream source, and the rxrust operator runs on that subject.
//! Stateful operators (`scan`, `distinct_until_changed`) keep their state per
//! subscription.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::rx::{self, RxSubject};
use super::{Observer, Source, Subscription};
use crate::lifecycle::CleanupSignal;

impl<T: Clone + 'static> Source<T> {
    /// Per-subscription rxrust chain: `chain` wires a fresh subject to the
    /// downstream observer, then the upstream source feeds that subject.
    fn lift<U: 'static>(
        &self,
        chain: impl Fn(RxSubject<T>, Observer<U>) -> Subscription + 'static,
    ) -> Source<U> {
        let upstream = self.clone();
        Source::new(move |observer: Observer<U>| {
            let input = rx::subject::<T>();
            let downstream = chain(input.clone(), observer);
            let feed = upstream.subscribe_observer(rx::feed(input));
            downstream.add_child(feed);
            downstream
        })
    }

    /// Transform each value.
    pub fn map<U: 'static>(&self, f: impl Fn(&T) -> U + 'static) -> Source<U> {
        let f = Rc::new(f);
        self.lift(move |input, observer| {
            let f = f.clone();
            rx::map(input, move |value: T| f(&value), observer)
        })
    }

    /// Forward only values matching `predicate`.
    pub fn filter(&self, predicate: impl Fn(&T) -> bool + 'static) -> Source<T> {
        let predicate = Rc::new(predicate);
        self.lift(move |input, observer| {
            let predicate = predicate.clone();
            rx::filter(input, move |value: &T| predicate(value), observer)
        })
    }

    /// Transform each value, dropping `None`.
    pub fn filter_map<U: 'static>(&self, f: impl Fn(&T) -> Option<U> + 'static) -> Source<U> {
        let f = Rc::new(f);
        self.lift(move |input, observer: Observer<U>| {
            let f = f.clone();
            let downstream = observer.clone();
            let present = Observer::new(move |value: &Option<U>| {
                if let Some(mapped) = value {
                    downstream.next(mapped);
                }
            })
            .on_complete(move || observer.complete());
            rx::map(input, move |value: T| f(&value), present)
        })
    }

    /// Fold values into an accumulator, emitting it after each step.
    pub fn scan<U: Clone + 'static>(
        &self,
        seed: U,
        f: impl Fn(&U, &T) -> U + 'static,
    ) -> Source<U> {
        let f = Rc::new(f);
        self.lift(move |input, observer| {
            let f = f.clone();
            let acc = RefCell::new(seed.clone());
            rx::map(
                input,
                move |value: T| {
                    let next = f(&acc.borrow(), &value);
                    *acc.borrow_mut() = next.clone();
                    next
                },
                observer,
            )
        })
    }

    /// Run a side effect for each value, then forward it.
    pub fn tap(&self, f: impl Fn(&T) + 'static) -> Source<T> {
        let f = Rc::new(f);
        self.lift(move |input, observer| {
            let f = f.clone();
            rx::map(
                input,
                move |value: T| {
                    f(&value);
                    value
                },
                observer,
            )
        })
    }

    /// Complete when `cleanup` fires, releasing the upstream subscription.
    pub fn take_until(&self, cleanup: &CleanupSignal) -> Source<T> {
        let upstream = self.clone();
        let cleanup = cleanup.clone();
        Source::new(move |observer: Observer<T>| {
            if cleanup.is_destroyed() {
                observer.complete();
                return Subscription::closed();
            }

            let notifier = rx::subject::<()>();
            let until = notifier.clone();
            let sub = upstream
                .lift(move |input, observer| rx::take_until(input, until.clone(), observer))
                .subscribe_observer(observer);

            let release = sub.clone();
            cleanup.on_destroy(move || {
                rx::push(&notifier, ());
                release.unsubscribe();
            });
            sub
        })
    }

    /// Run `f` once when the subscription ends, by completion or by unsubscribe.
    pub fn finalize(&self, f: impl Fn() + 'static) -> Source<T> {
        let upstream = self.clone();
        let f = Rc::new(f);
        Source::new(move |observer: Observer<T>| {
            let ran = Rc::new(Cell::new(false));
            let run_once = {
                let f = f.clone();
                let ran = ran.clone();
                Rc::new(move || {
                    if !ran.replace(true) {
                        f();
                    }
                })
            };

            let downstream = observer.clone();
            let on_complete = run_once.clone();
            let sub = upstream.subscribe_observer(
                Observer::new(move |value: &T| downstream.next(value)).on_complete(move || {
                    observer.complete();
                    on_complete();
                }),
            );
            sub.add(move || run_once());
            sub
        })
    }
}

impl<T: Clone + PartialEq + 'static> Source<T> {
    /// Suppress values equal to the previous one.
    pub fn distinct_until_changed(&self) -> Source<T> {
        self.lift(|input, observer| {
            let last: RefCell<Option<T>> = RefCell::new(None);
            rx::filter(
                input,
                move |value: &T| {
                    if last.borrow().as_ref() == Some(value) {
                        return false;
                    }
                    *last.borrow_mut() = Some(value.clone());
                    true
                },
                observer,
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::Lifecycle;
    use crate::source::Subject;

    fn collect<T: Clone + 'static>(source: &Source<T>) -> (Rc<RefCell<Vec<T>>>, Subscription) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = seen.clone();
        let sub = source.subscribe(move |v: &T| seen_clone.borrow_mut().push(v.clone()));
        (seen, sub)
    }

    #[test]
    fn test_map_and_filter() {
        let subject = Subject::new();
        let source = subject.as_source().map(|v: &i32| v * 10).filter(|v| *v > 10);
        let (seen, _sub) = collect(&source);

        subject.next(1);
        subject.next(2);
        subject.next(3);

        assert_eq!(*seen.borrow(), vec![20, 30]);
    }

    #[test]
    fn test_filter_map_drops_none_and_completes() {
        let completed = Rc::new(Cell::new(false));
        let completed_clone = completed.clone();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = seen.clone();

        Source::of([1, 2, 3, 4])
            .filter_map(|v: &i32| (v % 2 == 0).then(|| v * 100))
            .subscribe_observer(
                Observer::new(move |v: &i32| seen_clone.borrow_mut().push(*v))
                    .on_complete(move || completed_clone.set(true)),
            );

        assert_eq!(*seen.borrow(), vec![200, 400]);
        assert!(completed.get());
    }

    #[test]
    fn test_scan_state_is_per_subscription() {
        let subject = Subject::<()>::new();
        let counter = subject.as_source().scan(0, |acc, _| acc + 1);
        let (first, _a) = collect(&counter);

        subject.next(());
        subject.next(());
        let (second, _b) = collect(&counter);
        subject.next(());

        assert_eq!(*first.borrow(), vec![1, 2, 3]);
        assert_eq!(*second.borrow(), vec![1], "a new subscription starts from the seed");
    }

    #[test]
    fn test_distinct_until_changed() {
        let source = Source::of([true, true, false, false, true]).distinct_until_changed();
        let (seen, _sub) = collect(&source);

        assert_eq!(*seen.borrow(), vec![true, false, true]);
    }

    #[test]
    fn test_take_until_completes_on_cleanup() {
        let lifecycle = Lifecycle::new();
        let subject = Subject::new();
        let completed = Rc::new(Cell::new(0));
        let completed_clone = completed.clone();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = seen.clone();

        subject.as_source().take_until(&lifecycle.signal()).subscribe_observer(
            Observer::new(move |v: &i32| seen_clone.borrow_mut().push(*v))
                .on_complete(move || completed_clone.set(completed_clone.get() + 1)),
        );

        subject.next(1);
        lifecycle.destroy();
        subject.next(2);

        assert_eq!(*seen.borrow(), vec![1]);
        assert_eq!(completed.get(), 1);
        assert_eq!(subject.observer_count(), 0, "upstream released on cleanup");
    }

    #[test]
    fn test_take_until_after_destroy_completes_immediately() {
        let lifecycle = Lifecycle::new();
        lifecycle.destroy();
        let subject = Subject::<i32>::new();

        let sub = subject.as_source().take_until(&lifecycle.signal()).subscribe(|_| {});

        assert!(sub.is_closed());
        assert_eq!(subject.observer_count(), 0);
    }

    #[test]
    fn test_finalize_runs_once_on_unsubscribe() {
        let subject = Subject::<i32>::new();
        let finalized = Rc::new(Cell::new(0));
        let finalized_clone = finalized.clone();
        let source = subject
            .as_source()
            .finalize(move || finalized_clone.set(finalized_clone.get() + 1));

        let sub = source.subscribe(|_| {});
        assert_eq!(finalized.get(), 0);
        sub.unsubscribe();
        sub.unsubscribe();

        assert_eq!(finalized.get(), 1);
    }

    #[test]
    fn test_finalize_runs_on_completion() {
        let finalized = Rc::new(Cell::new(0));
        let finalized_clone = finalized.clone();
        let sub = Source::of([1])
            .finalize(move || finalized_clone.set(finalized_clone.get() + 1))
            .subscribe(|_| {});
        sub.unsubscribe();

        assert_eq!(finalized.get(), 1, "completion then unsubscribe finalizes once");
    }

    #[test]
    fn test_tap_sees_every_value() {
        let tapped = Rc::new(Cell::new(0));
        let tapped_clone = tapped.clone();
        let source = Source::of([1, 2]).tap(move |_| tapped_clone.set(tapped_clone.get() + 1));

        let (seen, _sub) = collect(&source);

        assert_eq!(tapped.get(), 2);
        assert_eq!(*seen.borrow(), vec![1, 2]);
    }
}
