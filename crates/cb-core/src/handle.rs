//! `Handle<T>`: a shared, observable reference to a value.
//!
//! A `Handle<T>` points at a *link*: a slot holding an optional `Arc<T>` plus
//! the list of observers interested in it.  Cloning a handle shares the link,
//! so when a [`RelinkableHandle`] re-points the slot, every clone sees the new
//! value and every registered observer is notified.
//!
//! | Role | Type |
//! |------|------|
//! | read-only view, optionally empty | `Handle<T>` |
//! | owner allowed to relink | `RelinkableHandle<T>` |

use crate::patterns::observable::{Observable, ObservableImpl, Observer};
use std::sync::{Arc, RwLock, Weak};

struct Link<T: ?Sized> {
    target: RwLock<Option<Arc<T>>>,
    observers: ObservableImpl,
}

impl<T: ?Sized> Link<T> {
    fn new(target: Option<Arc<T>>) -> Self {
        Self {
            target: RwLock::new(target),
            observers: ObservableImpl::new(),
        }
    }
}

/// A shared, optionally-empty reference to a value of type `T`.
///
/// `T` may be unsized, so curves are usually held as
/// `Handle<dyn YieldTermStructure>`.
pub struct Handle<T: ?Sized> {
    link: Arc<Link<T>>,
}

impl<T: ?Sized> Clone for Handle<T> {
    fn clone(&self) -> Self {
        Self {
            link: Arc::clone(&self.link),
        }
    }
}

impl<T: ?Sized> Handle<T> {
    /// Create a handle linked to `value`.
    pub fn new(value: Arc<T>) -> Self {
        Self {
            link: Arc::new(Link::new(Some(value))),
        }
    }

    /// Create an empty handle.
    pub fn empty() -> Self {
        Self {
            link: Arc::new(Link::new(None)),
        }
    }

    /// Return `true` if the handle is currently unlinked.
    pub fn is_empty(&self) -> bool {
        self.link
            .target
            .read()
            .expect("handle lock poisoned")
            .is_none()
    }

    /// Snapshot of the current target, or `None` when empty.
    ///
    /// The snapshot stays valid even if the handle is relinked afterwards.
    pub fn current(&self) -> Option<Arc<T>> {
        self.link
            .target
            .read()
            .expect("handle lock poisoned")
            .clone()
    }
}

impl<T: ?Sized> Default for Handle<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: ?Sized> Observable for Handle<T> {
    fn register_observer(&self, observer: Weak<dyn Observer>) {
        self.link.observers.register(observer);
    }

    fn unregister_observer(&self, observer: &Weak<dyn Observer>) {
        self.link.observers.unregister(observer);
    }

    fn notify_observers(&self) {
        self.link.observers.notify();
    }
}

impl<T: ?Sized> std::fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            write!(f, "Handle(empty)")
        } else {
            write!(f, "Handle(linked)")
        }
    }
}

/// A [`Handle`] whose target can be replaced at runtime.
///
/// Relinking notifies every observer registered through any clone of the
/// handle returned by [`handle`](Self::handle).
pub struct RelinkableHandle<T: ?Sized> {
    handle: Handle<T>,
}

impl<T: ?Sized> Clone for RelinkableHandle<T> {
    fn clone(&self) -> Self {
        Self {
            handle: self.handle.clone(),
        }
    }
}

impl<T: ?Sized> RelinkableHandle<T> {
    /// Create a relinkable handle linked to `value`.
    pub fn new(value: Arc<T>) -> Self {
        Self {
            handle: Handle::new(value),
        }
    }

    /// Create an initially empty relinkable handle.
    pub fn empty() -> Self {
        Self {
            handle: Handle::empty(),
        }
    }

    /// Re-point the handle at `value` and notify observers.
    pub fn link_to(&self, value: Arc<T>) {
        *self
            .handle
            .link
            .target
            .write()
            .expect("handle lock poisoned") = Some(value);
        self.handle.notify_observers();
    }

    /// Detach the handle from its target and notify observers.
    pub fn unlink(&self) {
        *self
            .handle
            .link
            .target
            .write()
            .expect("handle lock poisoned") = None;
        self.handle.notify_observers();
    }

    /// A read-only view sharing this handle's link.
    pub fn handle(&self) -> Handle<T> {
        self.handle.clone()
    }
}

impl<T: ?Sized> Default for RelinkableHandle<T> {
    fn default() -> Self {
        Self::empty()
    }
}
