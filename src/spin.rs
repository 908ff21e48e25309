//! Test-and-set spinlocks.
//!
//! See [`RawSpinLock`] for the bare lock and [`SpinLock`] for a lock that
//! guards a single value.
use std::cell::UnsafeCell;
use std::fmt;
use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};

use crate::sync::{spin_loop, thread_local, AtomicBool, AtomicUsize, Ordering};

/// Marks a lock that no thread holds.
const NO_HOLDER: usize = 0;

static NEXT_THREAD_TOKEN: std::sync::atomic::AtomicUsize = std::sync::atomic::AtomicUsize::new(1);

thread_local! {
    static THREAD_TOKEN: usize =
        NEXT_THREAD_TOKEN.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
}

/// Returns a non-zero token that is unique to the calling thread.
fn current_thread_token() -> usize {
    THREAD_TOKEN.with(|token| *token)
}

/// A test-and-set spinlock with explicit [`acquire`](RawSpinLock::acquire) and
/// [`release`](RawSpinLock::release) operations.
///
/// Acquisition busy-waits until a compare-and-swap moves the lock from
/// unlocked to locked. There is no fairness and no recursion: a thread must
/// never acquire a lock that it already holds.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use std::thread;
/// use tsmap::spin::RawSpinLock;
///
/// let lock = Arc::new(RawSpinLock::new());
///
/// lock.acquire();
/// let clone = lock.clone();
/// let handle = thread::spawn(move || {
///     clone.acquire();
///     clone.release();
/// });
/// lock.release();
///
/// handle.join().unwrap();
/// assert!(!lock.is_locked());
/// ```
pub struct RawSpinLock {
    locked: AtomicBool,
    holder: AtomicUsize,
}

impl RawSpinLock {
    /// Creates a new, unlocked, spinlock.
    pub fn new() -> Self {
        Self {
            locked: AtomicBool::new(false),
            holder: AtomicUsize::new(NO_HOLDER),
        }
    }

    /// Spins until the lock is acquired by the calling thread.
    ///
    /// # Panics
    ///
    /// Panics if the calling thread already holds the lock, which would
    /// otherwise spin forever.
    pub fn acquire(&self) {
        let token = current_thread_token();
        // Only the holder itself ever stores its own token, so observing it
        // here means this thread has not released the lock yet.
        if self.holder.load(Ordering::Relaxed) == token {
            panic!("spinlock re-acquired by the thread that already holds it");
        }
        while self
            .locked
            .compare_exchange_weak(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            while self.locked.load(Ordering::Relaxed) {
                spin_loop();
            }
        }
        self.holder.store(token, Ordering::Relaxed);
    }

    /// Attempts to acquire the lock without spinning, returning whether it
    /// succeeded.
    pub fn try_acquire(&self) -> bool {
        let acquired = self
            .locked
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_ok();
        if acquired {
            self.holder.store(current_thread_token(), Ordering::Relaxed);
        }
        acquired
    }

    /// Releases the lock.
    ///
    /// The caller must be the current holder. This is not checked.
    ///
    /// # Panics
    ///
    /// Panics if the lock is not held.
    pub fn release(&self) {
        self.holder.store(NO_HOLDER, Ordering::Relaxed);
        if !self.locked.swap(false, Ordering::Release) {
            panic!("released a spinlock that was not locked");
        }
    }

    /// Returns whether some thread currently holds the lock.
    pub fn is_locked(&self) -> bool {
        self.locked.load(Ordering::Relaxed)
    }
}

impl Default for RawSpinLock {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RawSpinLock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawSpinLock")
            .field("locked", &self.is_locked())
            .finish()
    }
}

/// A spinlock guarding a single value.
///
/// Every access acquires the lock immediately before touching the value and
/// releases it on every exit path, including unwinding. The closure passed to
/// [`with_lock`](SpinLock::with_lock) must not block.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use std::thread;
/// use tsmap::spin::SpinLock;
///
/// let counter = Arc::new(SpinLock::new(0));
/// let handles: Vec<_> = (0..4)
///     .map(|_| {
///         let counter = counter.clone();
///         thread::spawn(move || {
///             for _ in 0..100 {
///                 counter.with_lock(|n| *n += 1);
///             }
///         })
///     })
///     .collect();
///
/// for handle in handles {
///     handle.join().unwrap();
/// }
/// assert_eq!(counter.load(), 400);
/// ```
pub struct SpinLock<T> {
    raw: RawSpinLock,
    value: UnsafeCell<T>,
}

// SAFETY: The value is only reachable through `SpinGuard`, and at most one
// guard exists at a time. `T: Send` is required because the value may be
// accessed, and dropped, from whichever thread holds the lock.
unsafe impl<T: Send> Send for SpinLock<T> {}
unsafe impl<T: Send> Sync for SpinLock<T> {}

impl<T> SpinLock<T> {
    /// Creates a new, unlocked, spinlock guarding `value`.
    pub fn new(value: T) -> Self {
        Self {
            raw: RawSpinLock::new(),
            value: UnsafeCell::new(value),
        }
    }

    /// Spins until the lock is acquired and returns a guard that releases it
    /// when dropped.
    ///
    /// # Panics
    ///
    /// Panics if the calling thread already holds the lock.
    pub fn lock(&self) -> SpinGuard<'_, T> {
        self.raw.acquire();
        SpinGuard {
            lock: self,
            _not_send: PhantomData,
        }
    }

    /// Runs `f` with exclusive access to the guarded value.
    pub fn with_lock<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let mut guard = self.lock();
        f(&mut *guard)
    }

    /// Returns whether some thread currently holds the lock.
    pub fn is_locked(&self) -> bool {
        self.raw.is_locked()
    }

    /// Returns a mutable reference to the value. No locking is needed since
    /// the borrow is exclusive.
    pub fn get_mut(&mut self) -> &mut T {
        self.value.get_mut()
    }

    /// Consumes the lock, returning the guarded value.
    pub fn into_inner(self) -> T {
        self.value.into_inner()
    }
}

impl<T: Clone> SpinLock<T> {
    /// Returns a copy of the guarded value.
    pub fn load(&self) -> T {
        self.with_lock(|value| value.clone())
    }

    /// Replaces the guarded value with `value`.
    pub fn store(&self, value: T) {
        let old = self.with_lock(|current| std::mem::replace(current, value));
        // Dropped outside of the critical section.
        drop(old);
    }
}

impl<T: Default> Default for SpinLock<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> fmt::Debug for SpinLock<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpinLock")
            .field("locked", &self.is_locked())
            .finish_non_exhaustive()
    }
}

/// Exclusive access to the value of a [`SpinLock`], released on drop.
///
/// The lock remembers which thread acquired it, so the guard must be dropped
/// on that thread:
///
/// ```compile_fail
/// use std::thread;
/// use tsmap::spin::SpinLock;
///
/// let lock = SpinLock::new(0);
/// let guard = lock.lock();
/// thread::scope(|s| {
///     s.spawn(move || drop(guard));
/// });
/// ```
///
/// Sharing a guard between threads hands out `&T` to each of them, which is
/// only allowed when `T: Sync`:
///
/// ```compile_fail
/// use std::cell::Cell;
/// use std::thread;
/// use tsmap::spin::SpinLock;
///
/// let lock = SpinLock::new(Cell::new(0));
/// let guard = lock.lock();
/// thread::scope(|s| {
///     s.spawn(|| guard.set(1));
/// });
/// ```
pub struct SpinGuard<'a, T> {
    lock: &'a SpinLock<T>,
    _not_send: PhantomData<*const ()>,
}

// SAFETY: A shared guard only gives out `&T`.
unsafe impl<T: Sync> Sync for SpinGuard<'_, T> {}

impl<T> Deref for SpinGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        // SAFETY: The guard holds the lock.
        unsafe { &*self.lock.value.get() }
    }
}

impl<T> DerefMut for SpinGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        // SAFETY: The guard holds the lock.
        unsafe { &mut *self.lock.value.get() }
    }
}

impl<T> Drop for SpinGuard<'_, T> {
    fn drop(&mut self) {
        self.lock.raw.release();
    }
}
