//! rxrust bridge.
//!
//! Multicast delivery and operator chains run on rxrust's local
//! (single-threaded) subjects. Values cross the bridge by clone. The error
//! channel is unused and typed `()`.

use rxrust::prelude::*;

use super::{Observer as Sink, Subscription as Handle};

/// Local rxrust subject for values of `T`.
pub(super) type RxSubject<T> = LocalSubject<'static, T, ()>;

pub(super) fn subject<T: Clone + 'static>() -> RxSubject<T> {
    LocalSubject::new()
}

pub(super) fn push<T: Clone + 'static>(subject: &RxSubject<T>, value: T) {
    subject.clone().next(value);
}

pub(super) fn finish<T: Clone + 'static>(subject: &RxSubject<T>) {
    subject.clone().complete();
}

/// Observer pushing everything it receives into `subject`.
pub(super) fn feed<T: Clone + 'static>(subject: RxSubject<T>) -> Sink<T> {
    let done = subject.clone();
    Sink::new(move |value: &T| push(&subject, value.clone())).on_complete(move || finish(&done))
}

/// Subscribe `$sink` to an rxrust stream of `$item`, returning a crate subscription.
macro_rules! deliver {
    ($stream:expr, $sink:expr, $item:ty) => {{
        let sink: Sink<$item> = $sink;
        let next = sink.clone();
        let mut subscription = $stream.subscribe_all(
            move |value: $item| next.next(&value),
            |_: ()| {},
            move || sink.complete(),
        );
        Handle::new(move || subscription.unsubscribe())
    }};
}

pub(super) fn subscribe<T: Clone + 'static>(subject: &RxSubject<T>, sink: Sink<T>) -> Handle {
    deliver!(subject.clone(), sink, T)
}

pub(super) fn map<T, U, F>(input: RxSubject<T>, f: F, sink: Sink<U>) -> Handle
where
    T: Clone + 'static,
    U: 'static,
    F: Fn(T) -> U + 'static,
{
    deliver!(input.map(f), sink, U)
}

pub(super) fn filter<T, F>(input: RxSubject<T>, predicate: F, sink: Sink<T>) -> Handle
where
    T: Clone + 'static,
    F: Fn(&T) -> bool + 'static,
{
    deliver!(input.filter(predicate), sink, T)
}

pub(super) fn take_until<T: Clone + 'static>(
    input: RxSubject<T>,
    notifier: RxSubject<()>,
    sink: Sink<T>,
) -> Handle {
    deliver!(input.take_until(notifier), sink, T)
}
