use std::sync::Arc;

use tsmap::spin::RawSpinLock;

#[cfg(not(feature = "shuttle"))]
#[test]
fn raw_lock_protects_a_critical_section() {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::thread;

    let lock = Arc::new(RawSpinLock::new());
    let inside = Arc::new(AtomicBool::new(false));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let lock = lock.clone();
            let inside = inside.clone();
            thread::spawn(move || {
                for _ in 0..1_000 {
                    lock.acquire();
                    assert!(!inside.swap(true, Ordering::SeqCst));
                    inside.store(false, Ordering::SeqCst);
                    lock.release();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
    assert!(!lock.is_locked());
}

#[cfg(feature = "shuttle")]
#[test]
fn increments_are_not_lost_in_any_schedule() {
    use super::common::{NUM_ITERATIONS, NUM_PREEMPTIONS, NUM_THREADS};
    use tsmap::spin::SpinLock;

    shuttle::check_pct(
        || {
            let counter = Arc::new(SpinLock::new(0));
            let handles: Vec<_> = (0..NUM_THREADS)
                .map(|_| {
                    let counter = counter.clone();
                    shuttle::thread::spawn(move || {
                        counter.with_lock(|n| {
                            let current = *n;
                            shuttle::thread::yield_now();
                            *n = current + 1;
                        });
                    })
                })
                .collect();
            for handle in handles {
                handle.join().unwrap();
            }
            assert_eq!(counter.load(), NUM_THREADS);
        },
        NUM_ITERATIONS,
        NUM_PREEMPTIONS,
    );
}

#[cfg(feature = "shuttle")]
#[test]
fn raw_lock_is_exclusive_in_any_schedule() {
    use super::common::{NUM_ITERATIONS, NUM_THREADS};
    use shuttle::sync::atomic::{AtomicBool, Ordering};

    shuttle::check_random(
        || {
            let lock = Arc::new(RawSpinLock::new());
            let inside = Arc::new(AtomicBool::new(false));
            let handles: Vec<_> = (0..NUM_THREADS)
                .map(|_| {
                    let lock = lock.clone();
                    let inside = inside.clone();
                    shuttle::thread::spawn(move || {
                        lock.acquire();
                        assert!(!inside.swap(true, Ordering::SeqCst));
                        inside.store(false, Ordering::SeqCst);
                        lock.release();
                    })
                })
                .collect();
            for handle in handles {
                handle.join().unwrap();
            }
        },
        NUM_ITERATIONS,
    );
}
