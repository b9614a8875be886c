//! Lazy calculation cache.
//!
//! A [`LazyCache`] holds the result of an expensive computation and hands
//! it out until someone calls [`invalidate`](LazyCache::invalidate), usually
//! an [`Observer::update`](crate::patterns::observable::Observer::update)
//! triggered by a change in one of the inputs.
//!
//! The cache can be *frozen*: while frozen, invalidations are ignored and the
//! last computed value keeps being served.
//!
//! The calculation runs without the cache lock held, so it may itself fan out
//! to worker threads that read the same cache.

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::Mutex;

/// Thread-safe cache for a lazily computed value.
///
/// # Example
/// ```
/// use cb_core::LazyCache;
///
/// let cache: LazyCache<f64> = LazyCache::new();
/// let v = cache.get_or_try_calculate(|| Ok::<_, cb_core::Error>(42.0)).unwrap();
/// assert_eq!(v, 42.0);
/// assert!(cache.is_calculated());
/// cache.invalidate();
/// assert!(!cache.is_calculated());
/// ```
#[derive(Debug)]
pub struct LazyCache<T> {
    value: Mutex<Option<T>>,
    freeze_count: AtomicU32,
    // bumped by every effective invalidation
    generation: AtomicU64,
}

impl<T> Default for LazyCache<T> {
    fn default() -> Self {
        Self {
            value: Mutex::new(None),
            freeze_count: AtomicU32::new(0),
            generation: AtomicU64::new(0),
        }
    }
}

impl<T: Clone> LazyCache<T> {
    /// Create an empty (stale) cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached value, computing it with `calculate` if stale.
    ///
    /// A failed calculation leaves the cache stale and returns the error.  A
    /// value whose calculation overlapped an invalidation is returned but not
    /// stored.
    pub fn get_or_try_calculate<E, F>(&self, calculate: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        let generation = {
            let guard = self.value.lock().expect("lazy cache poisoned");
            if let Some(v) = guard.as_ref() {
                return Ok(v.clone());
            }
            self.generation.load(Ordering::SeqCst)
        };
        let v = calculate()?;
        let mut guard = self.value.lock().expect("lazy cache poisoned");
        if self.generation.load(Ordering::SeqCst) == generation {
            *guard = Some(v.clone());
        }
        Ok(v)
    }

    /// Mark the cached value as stale unless the cache is frozen.
    ///
    /// Returns `true` if a cached value was discarded.
    pub fn invalidate(&self) -> bool {
        if self.is_frozen() {
            return false;
        }
        let mut guard = self.value.lock().expect("lazy cache poisoned");
        self.generation.fetch_add(1, Ordering::SeqCst);
        guard.take().is_some()
    }

    /// Whether a value is currently cached.
    pub fn is_calculated(&self) -> bool {
        self.value.lock().expect("lazy cache poisoned").is_some()
    }

    /// Ignore invalidations until a matching [`unfreeze`](Self::unfreeze).
    pub fn freeze(&self) {
        self.freeze_count.fetch_add(1, Ordering::SeqCst);
    }

    /// Undo one call to [`freeze`](Self::freeze).
    pub fn unfreeze(&self) {
        let _ = self
            .freeze_count
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |c| c.checked_sub(1));
    }

    /// Return `true` if invalidations are currently ignored.
    pub fn is_frozen(&self) -> bool {
        self.freeze_count.load(Ordering::SeqCst) > 0
    }
}
