use crate::{Dispatcher, EventKind, Observable, Observer};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// An [`Observable`] that can be handed to several threads.
///
/// Clones point at the same value. Assignments and subscription changes are
/// serialized behind one lock; notifications still run on the dispatcher and
/// never hold it.
pub struct SharedObservable<T> {
    inner: Arc<Mutex<Observable<T>>>,
}

impl<T> SharedObservable<T> {
    pub fn new(value: T) -> Self {
        Self::from_observable(Observable::new(value))
    }

    pub fn with_dispatcher(value: T, dispatcher: Dispatcher) -> Self {
        Self::from_observable(Observable::with_dispatcher(value, dispatcher))
    }

    pub fn from_observable(observable: Observable<T>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(observable)),
        }
    }

    /// Read the current value under the lock.
    ///
    /// `f` runs while the lock is held: calling back into this same shared
    /// value (`set`, `subscribe`, `get`, ...) from inside `f` deadlocks.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(self.lock().value())
    }

    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.with(T::clone)
    }

    pub fn subscribe(&self, observer: Observer<T>) {
        self.lock().subscribe(observer);
    }

    pub fn unsubscribe(&self, observer: &Observer<T>) {
        self.lock().unsubscribe(observer);
    }

    pub fn unsubscribe_all(&self, event: Option<EventKind>) {
        self.lock().unsubscribe_all(event);
    }

    pub fn observer_count(&self, event: EventKind) -> usize {
        self.lock().observer_count(event)
    }

    // Handlers never run under this lock; a poisoned guard still holds a
    // consistent table.
    pub(crate) fn lock(&self) -> MutexGuard<'_, Observable<T>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: 'static> SharedObservable<T> {
    pub fn observe<Target, H>(
        &self,
        event: EventKind,
        target: &Arc<Target>,
        handler: H,
    ) -> Observer<T>
    where
        Target: Send + Sync + 'static,
        H: Fn(&Target, T, T) + Send + Sync + 'static,
    {
        self.lock().observe(event, target, handler)
    }
}

impl<T: Clone + Send + 'static> SharedObservable<T> {
    pub fn set(&self, value: T) {
        self.lock().set(value);
    }
}

impl<T> Clone for SharedObservable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> From<Observable<T>> for SharedObservable<T> {
    fn from(observable: Observable<T>) -> Self {
        Self::from_observable(observable)
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for SharedObservable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SharedObservable").field(&*self.lock()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::SharedObservable;
    use crate::EventKind;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Default)]
    struct Counter {
        hits: AtomicUsize,
    }

    impl Counter {
        fn hit(&self, _new: u32, _previous: u32) {
            self.hits.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn clones_share_value_and_table() {
        let counter = Arc::new(Counter::default());
        let shared = SharedObservable::new(1u32);
        let other = shared.clone();

        other.observe(EventKind::DidChange, &counter, Counter::hit);

        assert_eq!(shared.observer_count(EventKind::DidChange), 1);
        assert_eq!(shared.get(), 1);
        assert_eq!(other.with(|v| v + 1), 2);
    }

    #[test]
    fn concurrent_writers_all_land() {
        let shared = SharedObservable::new(0u32);
        let writers: Vec<_> = (1..=8)
            .map(|n| {
                let shared = shared.clone();
                std::thread::spawn(move || shared.set(n))
            })
            .collect();
        for writer in writers {
            writer.join().expect("writer thread");
        }

        assert!((1..=8).contains(&shared.get()));
    }
}
