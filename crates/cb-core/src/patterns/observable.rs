//! Observer / Observable pattern.
//!
//! * An **Observable** notifies registered **Observer**s whenever it changes
//!   state.
//! * Observers react by calling `update()`.
//!
//! Observables are shared across threads (pricing runs on a rayon pool), so
//! the observer list lives behind a `Mutex` and observers must be
//! `Send + Sync`.

use std::sync::{Arc, Mutex, Weak};

/// An object that can notify interested parties when it changes.
///
/// All methods take `&self` to support shared ownership.
pub trait Observable {
    /// Register an observer to receive future change notifications.
    fn register_observer(&self, observer: Weak<dyn Observer>);

    /// Remove a previously registered observer.
    fn unregister_observer(&self, observer: &Weak<dyn Observer>);

    /// Notify all currently registered observers that this object has changed.
    fn notify_observers(&self);
}

/// An object that reacts to changes in [`Observable`]s it has subscribed to.
pub trait Observer: Send + Sync {
    /// Called by every observable this observer is registered with when that
    /// observable changes state.
    fn update(&self);
}

/// Standard observer-list management, embeddable in any observable type.
#[derive(Default)]
pub struct ObservableImpl {
    observers: Mutex<Vec<Weak<dyn Observer>>>,
}

impl std::fmt::Debug for ObservableImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObservableImpl")
            .field("observers", &self.len())
            .finish()
    }
}

impl ObservableImpl {
    /// Create a new, empty observable implementation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer.  Registering the same observer twice is a no-op.
    pub fn register(&self, observer: Weak<dyn Observer>) {
        let mut observers = self.observers.lock().expect("observer list poisoned");
        if !observers.iter().any(|o| Weak::ptr_eq(o, &observer)) {
            observers.push(observer);
        }
    }

    /// Remove an observer (by pointer equality of the `Weak`).
    pub fn unregister(&self, observer: &Weak<dyn Observer>) {
        self.observers
            .lock()
            .expect("observer list poisoned")
            .retain(|o| !Weak::ptr_eq(o, observer));
    }

    /// Notify all live observers, pruning dead `Weak` references.
    pub fn notify(&self) {
        // Upgrade under the lock, call out after releasing it so an observer
        // may re-register without deadlocking.
        let live: Vec<Arc<dyn Observer>> = {
            let mut observers = self.observers.lock().expect("observer list poisoned");
            observers.retain(|w| w.strong_count() > 0);
            observers.iter().filter_map(Weak::upgrade).collect()
        };
        for obs in live {
            obs.update();
        }
    }

    /// Number of registered (possibly dead) observers.
    pub fn len(&self) -> usize {
        self.observers.lock().expect("observer list poisoned").len()
    }

    /// Whether no observer is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct CountingObserver {
        count: AtomicU32,
    }

    impl Observer for CountingObserver {
        fn update(&self) {
            self.count.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn counting() -> Arc<CountingObserver> {
        Arc::new(CountingObserver {
            count: AtomicU32::new(0),
        })
    }

    #[test]
    fn register_and_notify() {
        let obs = counting();
        let observable = ObservableImpl::new();
        observable.register(Arc::downgrade(&obs) as Weak<dyn Observer>);
        observable.notify();
        observable.notify();
        assert_eq!(obs.count.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn duplicate_registration_ignored() {
        let obs = counting();
        let weak = Arc::downgrade(&obs) as Weak<dyn Observer>;
        let observable = ObservableImpl::new();
        observable.register(weak.clone());
        observable.register(weak);
        observable.notify();
        assert_eq!(obs.count.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn dead_observer_pruned() {
        let observable = ObservableImpl::new();
        {
            let obs = counting();
            observable.register(Arc::downgrade(&obs) as Weak<dyn Observer>);
        }
        observable.notify();
        assert!(observable.is_empty());
    }

    #[test]
    fn unregister() {
        let obs = counting();
        let weak = Arc::downgrade(&obs) as Weak<dyn Observer>;
        let observable = ObservableImpl::new();
        observable.register(weak.clone());
        observable.unregister(&weak);
        observable.notify();
        assert_eq!(obs.count.load(Ordering::Relaxed), 0);
    }
}
