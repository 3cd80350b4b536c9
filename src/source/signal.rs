//! Bridge from spark-signals into push-based sources.
//!
//! A signal is pull-based; wrapping it in an effect turns every change into a
//! push. Each subscription owns one effect and stops it on unsubscribe.

use spark_signals::{effect, Signal};

use super::{Source, Subscription};

impl<T: Clone + PartialEq + 'static> Source<T> {
    /// Emit the signal's current value on subscribe and every change after it.
    pub fn from_signal(signal: Signal<T>) -> Self {
        Source::new(move |observer| {
            let signal = signal.clone();
            let stop = effect(move || {
                let value = signal.get();
                observer.next(&value);
            });
            Subscription::new(stop)
        })
    }
}

impl<T: Clone + PartialEq + 'static> From<Signal<T>> for Source<T> {
    fn from(signal: Signal<T>) -> Self {
        Source::from_signal(signal)
    }
}
