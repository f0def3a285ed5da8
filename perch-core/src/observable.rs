use crate::{CaseIterable, Dispatcher, EventKind, Observer};
use std::collections::BTreeMap;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// A value that tells its observers when it is about to change and when it
/// has changed.
///
/// Every call to [`Observable::set`] notifies, even when the new value equals
/// the old one. Callers that want to skip redundant writes compare first.
pub struct Observable<T> {
    value: T,
    observers: BTreeMap<EventKind, Vec<Observer<T>>>,
    dispatcher: Dispatcher,
}

impl<T> Observable<T> {
    pub fn new(value: T) -> Self {
        Self::with_dispatcher(value, Dispatcher::default())
    }

    /// Create an observable whose notifications run on `dispatcher`.
    pub fn with_dispatcher(value: T, dispatcher: Dispatcher) -> Self {
        let observers = EventKind::ALL_CASES
            .iter()
            .map(|event| (*event, Vec::new()))
            .collect();
        Self {
            value,
            observers,
            dispatcher,
        }
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    /// The execution context this observable's notifications are spawned on.
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Register `observer` under its event kind.
    ///
    /// Subscribing the same observer twice keeps two entries; both fire.
    pub fn subscribe(&mut self, observer: Observer<T>) {
        let event = observer.event();
        let list = self.list_mut(event);
        list.push(observer);
        tracing::debug!(
            target: "perch-core::Observable",
            "subscribed {:?} observer ({} total)",
            event,
            list.len()
        );
    }

    /// Remove every entry that is `observer` itself (or a clone of it).
    pub fn unsubscribe(&mut self, observer: &Observer<T>) {
        let event = observer.event();
        let list = self.list_mut(event);
        let before = list.len();
        list.retain(|existing| !existing.ptr_eq(observer));
        tracing::debug!(
            target: "perch-core::Observable",
            "unsubscribed {:?} observer ({} removed)",
            event,
            before - list.len()
        );
    }

    /// Clear one event kind's observers, or all of them with `None`.
    pub fn unsubscribe_all(&mut self, event: Option<EventKind>) {
        match event {
            Some(event) => self.list_mut(event).clear(),
            None => self.observers.values_mut().for_each(Vec::clear),
        }
    }

    pub fn observer_count(&self, event: EventKind) -> usize {
        self.list(event).len()
    }

    fn list(&self, event: EventKind) -> &Vec<Observer<T>> {
        self.observers
            .get(&event)
            .unwrap_or_else(|| missing_entry(event))
    }

    fn list_mut(&mut self, event: EventKind) -> &mut Vec<Observer<T>> {
        self.observers
            .get_mut(&event)
            .unwrap_or_else(|| missing_entry(event))
    }
}

impl<T: 'static> Observable<T> {
    /// Build an observer for `target`, subscribe it, and hand it back for a
    /// later [`Observable::unsubscribe`].
    pub fn observe<Target, H>(
        &mut self,
        event: EventKind,
        target: &Arc<Target>,
        handler: H,
    ) -> Observer<T>
    where
        Target: Send + Sync + 'static,
        H: Fn(&Target, T, T) + Send + Sync + 'static,
    {
        let observer = Observer::new(event, target, handler);
        self.subscribe(observer.clone());
        observer
    }
}

impl<T: Clone + Send + 'static> Observable<T> {
    /// Replace the value.
    ///
    /// Will-change observers are scheduled with `(value, current)` before the
    /// replacement; did-change observers with `(value, replaced)` after it.
    /// Returns once everything is scheduled, not once it has run.
    pub fn set(&mut self, value: T) {
        tracing::debug!(
            target: "perch-core::Observable",
            "set: {} will-change, {} did-change observers",
            self.observer_count(EventKind::WillChange),
            self.observer_count(EventKind::DidChange)
        );
        self.notify(EventKind::WillChange, &value, &self.value);
        let previous = std::mem::replace(&mut self.value, value);
        self.notify(EventKind::DidChange, &self.value, &previous);
    }

    fn notify(&self, event: EventKind, new: &T, previous: &T) {
        for observer in self.list(event) {
            let observer = observer.clone();
            let new = new.clone();
            let previous = previous.clone();
            self.dispatcher.spawn(move || observer.dispatch(new, previous));
        }
    }
}

fn missing_entry(event: EventKind) -> ! {
    panic!(
        "observer table has no entry for {:?}; every event kind is populated at construction",
        event
    )
}

impl<T> Drop for Observable<T> {
    fn drop(&mut self) {
        self.unsubscribe_all(None);
    }
}

impl<T> Deref for Observable<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.value
    }
}

impl<T> From<T> for Observable<T> {
    fn from(value: T) -> Self {
        Observable::new(value)
    }
}

impl<T: Default> Default for Observable<T> {
    fn default() -> Self {
        Observable::new(T::default())
    }
}

impl<T: fmt::Display> fmt::Display for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.value, f)
    }
}

impl<T: fmt::Debug> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observable")
            .field("value", &self.value)
            .field("will_change", &self.observer_count(EventKind::WillChange))
            .field("did_change", &self.observer_count(EventKind::DidChange))
            .finish()
    }
}
