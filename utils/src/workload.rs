//! Workloads run against a [`Dictionary`].
use std::thread;

use tsmap::dictionary::Dictionary;

use crate::Input;

/// Inserts every key-value pair of the input.
pub fn insert_all<D>(dict: &mut D, input: &Input<D::Key, D::Value>)
where
    D: Dictionary,
    D::Key: Clone,
{
    for (key, value) in input.pairs() {
        dict.set(key.clone(), Some(value.clone()));
    }
}

/// Removes every key of the input, in its removal order, and returns how many
/// of them were present.
pub fn remove_all_keys<D>(dict: &mut D, input: &Input<D::Key, D::Value>) -> usize
where
    D: Dictionary,
    D::Key: Clone,
{
    input
        .removal_order()
        .iter()
        .filter(|key| dict.remove(key).is_some())
        .count()
}

/// The benchmarked workload: inserts every pair of the input, then removes
/// every key again in the input's (shuffled) removal order.
///
/// Returns the number of keys that were removed.
pub fn insert_then_remove<D>(dict: &mut D, input: &Input<D::Key, D::Value>) -> usize
where
    D: Dictionary,
    D::Key: Clone,
{
    insert_all(dict, input);
    remove_all_keys(dict, input)
}

/// Returns the keys that thread `index` inserts in a disjoint-insert workload.
pub fn disjoint_keys(index: usize, keys_per_thread: usize) -> std::ops::Range<u64> {
    let start = (index * keys_per_thread) as u64;
    start..start + keys_per_thread as u64
}

/// Inserts the disjoint range of keys that belongs to thread `index`, each
/// mapped to `index`.
pub fn insert_range<D>(dict: &mut D, index: usize, keys_per_thread: usize)
where
    D: Dictionary<Key = u64, Value = u64>,
{
    for key in disjoint_keys(index, keys_per_thread) {
        dict.insert(key, index as u64);
    }
}

/// Spawns `num_threads` threads, each inserting its own disjoint range of keys
/// through its own clone of `dict`, and returns the clones once all threads
/// are done.
///
/// For containers whose clones share their map, every returned clone, and
/// `dict` itself, holds `num_threads * keys_per_thread` entries afterwards.
pub fn insert_disjoint<D>(dict: &D, num_threads: usize, keys_per_thread: usize) -> Vec<D>
where
    D: Dictionary<Key = u64, Value = u64> + Clone + Send + 'static,
{
    let handles: Vec<_> = (0..num_threads)
        .map(|index| {
            let mut dict = dict.clone();
            thread::spawn(move || {
                insert_range(&mut dict, index, keys_per_thread);
                dict
            })
        })
        .collect();

    handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect()
}
