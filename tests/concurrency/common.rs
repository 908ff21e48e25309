// Not every helper is used with and without the `shuttle` feature.
#![allow(dead_code)]

use tsmap::dictionary::Dictionary;
use tsmap_utils::workload::{disjoint_keys, insert_range};

pub const NUM_ITERATIONS: usize = 250;
pub const NUM_PREEMPTIONS: usize = 3;
pub const NUM_THREADS: usize = 3;
pub const KEYS_PER_THREAD: usize = 5;

/// Has `NUM_THREADS` shuttle threads each insert a disjoint range of keys
/// through their own clone of `dict`, and returns the clones.
pub fn insert_disjoint_in_model<D>(dict: &D) -> Vec<D>
where
    D: Dictionary<Key = u64, Value = u64> + Clone + Send + 'static,
{
    let handles: Vec<_> = (0..NUM_THREADS)
        .map(|index| {
            let mut dict = dict.clone();
            shuttle::thread::spawn(move || {
                insert_range(&mut dict, index, KEYS_PER_THREAD);
                dict
            })
        })
        .collect();

    handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect()
}

/// Asserts that `dict` contains every key inserted by every thread.
///
/// # Panics
///
/// Panics if an insert was lost.
pub fn assert_no_lost_inserts<D>(dict: &D, num_threads: usize, keys_per_thread: usize)
where
    D: Dictionary<Key = u64, Value = u64>,
{
    assert_eq!(dict.len(), num_threads * keys_per_thread);
    for index in 0..num_threads {
        for key in disjoint_keys(index, keys_per_thread) {
            assert_eq!(dict.get(&key), Some(index as u64));
        }
    }
}
