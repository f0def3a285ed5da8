use crate::EventKind;
use std::fmt;
use std::sync::{Arc, Weak};

/// A handler bound to a target it does not own.
trait Binding<T>: Send + Sync {
    fn is_alive(&self) -> bool;

    /// Run the handler if the target still exists. Returns whether it ran.
    fn invoke(&self, new: T, previous: T) -> bool;
}

struct Bound<Target, H> {
    target: Weak<Target>,
    handler: H,
}

impl<T, Target, H> Binding<T> for Bound<Target, H>
where
    Target: Send + Sync,
    H: Fn(&Target, T, T) + Send + Sync,
{
    fn is_alive(&self) -> bool {
        self.target.strong_count() > 0
    }

    fn invoke(&self, new: T, previous: T) -> bool {
        match self.target.upgrade() {
            Some(target) => {
                (self.handler)(&target, new, previous);
                true
            }
            None => false,
        }
    }
}

struct Inner<T> {
    event: EventKind,
    binding: Box<dyn Binding<T>>,
}

/// A subscription record: an event kind, a weakly held target, and the handler
/// to run against that target.
///
/// Cloning an `Observer` yields another handle to the same subscription, so
/// the clone unsubscribes the original. Two observers built separately are
/// always distinct, even from identical arguments.
pub struct Observer<T> {
    inner: Arc<Inner<T>>,
}

impl<T: 'static> Observer<T> {
    /// Bind `handler` to `target` for `event`.
    ///
    /// The target is held weakly. `handler` is usually a method path:
    ///
    /// ```
    /// use perch_core::{EventKind, Observer};
    /// use std::sync::Arc;
    ///
    /// struct Thermostat;
    ///
    /// impl Thermostat {
    ///     fn reading_changed(&self, new: f64, previous: f64) {
    ///         println!("{previous} -> {new}");
    ///     }
    /// }
    ///
    /// let thermostat = Arc::new(Thermostat);
    /// let observer = Observer::new(EventKind::DidChange, &thermostat, Thermostat::reading_changed);
    /// assert!(observer.is_alive());
    /// ```
    pub fn new<Target, H>(event: EventKind, target: &Arc<Target>, handler: H) -> Self
    where
        Target: Send + Sync + 'static,
        H: Fn(&Target, T, T) + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(Inner {
                event,
                binding: Box::new(Bound {
                    target: Arc::downgrade(target),
                    handler,
                }),
            }),
        }
    }
}

impl<T> Observer<T> {
    pub fn event(&self) -> EventKind {
        self.inner.event
    }

    /// Whether the target is still alive.
    pub fn is_alive(&self) -> bool {
        self.inner.binding.is_alive()
    }

    /// Identity comparison.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Run the handler with `(new, previous)` against the live target.
    ///
    /// A dropped target turns this into a no-op.
    pub fn dispatch(&self, new: T, previous: T) {
        if !self.inner.binding.invoke(new, previous) {
            tracing::trace!(
                target: "perch-core::Observer",
                "{:?} target dropped; skipping dispatch",
                self.inner.event
            );
        }
    }
}

impl<T> Clone for Observer<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for Observer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observer")
            .field("event", &self.inner.event)
            .field("alive", &self.is_alive())
            .finish_non_exhaustive()
    }
}
