#[cfg(feature = "shuttle")]
pub(crate) use shuttle::{
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Condvar, Mutex,
    },
    thread, thread_local,
};
#[cfg(not(feature = "shuttle"))]
pub(crate) use std::{
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Condvar, Mutex,
    },
    thread, thread_local,
};

/// Hint that the caller is busy-waiting.
///
/// Under `shuttle` every spin yields to the scheduler, otherwise a spinning
/// thread could starve the holder of the lock it is waiting on.
#[inline]
pub(crate) fn spin_loop() {
    #[cfg(feature = "shuttle")]
    shuttle::thread::yield_now();
    #[cfg(not(feature = "shuttle"))]
    std::hint::spin_loop();
}
