//! Guards: a value together with whatever protects it.
//!
//! The three guards differ only in how their lock is owned, which decides
//! what happens when the guard is cloned:
//!
//! - [`ValueGuard`] embeds the lock by value. A clone copies the value and
//!   gets a fresh, unlocked, lock of its own.
//! - [`SharedGuard`] keeps the lock and the value behind one [`Arc`]. Clones
//!   share both, so they contend for the same lock.
//! - [`Unguarded`] shares the value like [`SharedGuard`] but has no lock.
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use crate::spin::SpinLock;

/// A value guarded by a spinlock that is copied along with it.
///
/// Cloning a `ValueGuard` produces an independent guard: the two copies never
/// exclude each other and changes made through one are invisible to the other.
///
/// # Examples
///
/// ```
/// use tsmap::guard::ValueGuard;
///
/// let guard = ValueGuard::new(1);
/// let copy = guard.clone();
///
/// copy.store(2);
/// assert_eq!(guard.load(), 1);
/// assert_eq!(copy.load(), 2);
/// ```
pub struct ValueGuard<T> {
    lock: SpinLock<T>,
}

impl<T> ValueGuard<T> {
    pub fn new(value: T) -> Self {
        Self {
            lock: SpinLock::new(value),
        }
    }

    /// Runs `f` with exclusive access to this copy of the value.
    pub fn with_lock<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        self.lock.with_lock(f)
    }

    pub fn into_inner(self) -> T {
        self.lock.into_inner()
    }
}

impl<T: Clone> ValueGuard<T> {
    /// Returns a copy of the value.
    pub fn load(&self) -> T {
        self.lock.load()
    }

    /// Replaces the value.
    pub fn store(&self, value: T) {
        self.lock.store(value)
    }
}

impl<T: Clone> Clone for ValueGuard<T> {
    fn clone(&self) -> Self {
        Self::new(self.load())
    }
}

impl<T: Default> Default for ValueGuard<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> fmt::Debug for ValueGuard<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueGuard")
            .field("lock", &self.lock)
            .finish()
    }
}

/// A value guarded by a spinlock, where both live in a single shared
/// allocation.
///
/// Clones refer to the same lock and the same value, so every critical section
/// on any clone excludes every other one.
///
/// # Examples
///
/// ```
/// use tsmap::guard::SharedGuard;
///
/// let guard = SharedGuard::new(1);
/// let clone = guard.clone();
///
/// clone.store(2);
/// assert_eq!(guard.load(), 2);
/// assert!(guard.shares_lock_with(&clone));
/// ```
pub struct SharedGuard<T> {
    lock: Arc<SpinLock<T>>,
}

impl<T> SharedGuard<T> {
    pub fn new(value: T) -> Self {
        Self {
            lock: Arc::new(SpinLock::new(value)),
        }
    }

    /// Runs `f` with exclusive access to the shared value.
    pub fn with_lock<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        self.lock.with_lock(f)
    }

    /// Returns whether both guards contend for the same lock.
    pub fn shares_lock_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.lock, &other.lock)
    }
}

impl<T: Clone> SharedGuard<T> {
    /// Returns a copy of the value.
    pub fn load(&self) -> T {
        self.lock.load()
    }

    /// Replaces the value.
    pub fn store(&self, value: T) {
        self.lock.store(value)
    }
}

impl<T> Clone for SharedGuard<T> {
    fn clone(&self) -> Self {
        Self {
            lock: Arc::clone(&self.lock),
        }
    }
}

impl<T: Default> Default for SharedGuard<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> fmt::Debug for SharedGuard<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedGuard")
            .field("lock", &self.lock)
            .field("clones", &Arc::strong_count(&self.lock))
            .finish()
    }
}

/// A shared value with no lock at all.
///
/// Structurally the same as [`SharedGuard`], minus the synchronization. It is
/// neither `Send` nor `Sync`, so it can only be shared within one thread.
pub struct Unguarded<T> {
    value: Rc<RefCell<T>>,
}

impl<T> Unguarded<T> {
    pub fn new(value: T) -> Self {
        Self {
            value: Rc::new(RefCell::new(value)),
        }
    }

    /// Runs `f` with mutable access to the shared value.
    ///
    /// # Panics
    ///
    /// Panics if called again from within `f`.
    pub fn with<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        f(&mut *self.value.borrow_mut())
    }
}

impl<T: Clone> Unguarded<T> {
    pub fn load(&self) -> T {
        self.value.borrow().clone()
    }

    pub fn store(&self, value: T) {
        *self.value.borrow_mut() = value;
    }
}

impl<T> Clone for Unguarded<T> {
    fn clone(&self) -> Self {
        Self {
            value: Rc::clone(&self.value),
        }
    }
}

impl<T: Default> Default for Unguarded<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> fmt::Debug for Unguarded<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Unguarded")
            .field("clones", &Rc::strong_count(&self.value))
            .finish_non_exhaustive()
    }
}
