// Clones of a `ValueGuardDict` each own their own lock and map, so a workload
// that shares one container through clones loses updates. These tests check
// that the flaw is still there.
use tsmap::dictionary::{Dictionary, ValueGuardDict};
use tsmap_utils::workload::disjoint_keys;

use super::common::*;

type Dict = ValueGuardDict<u64, u64>;

/// Asserts that each clone only saw the keys inserted through it.
fn assert_clones_diverged(dict: &Dict, clones: &[Dict], keys_per_thread: usize) {
    assert!(dict.is_empty());
    for (index, clone) in clones.iter().enumerate() {
        assert_eq!(clone.len(), keys_per_thread);
        for key in disjoint_keys(index, keys_per_thread) {
            assert_eq!(clone.get(&key), Some(index as u64));
        }
    }
}

#[cfg(not(feature = "shuttle"))]
#[test]
fn disjoint_inserts_are_lost() {
    const NUM_THREADS: usize = 4;
    const KEYS_PER_THREAD: usize = 1_000;

    let dict = Dict::new();
    let clones = tsmap_utils::workload::insert_disjoint(&dict, NUM_THREADS, KEYS_PER_THREAD);

    assert_clones_diverged(&dict, &clones, KEYS_PER_THREAD);
    assert!(clones
        .iter()
        .all(|clone| clone.len() < NUM_THREADS * KEYS_PER_THREAD));
}

#[cfg(feature = "shuttle")]
#[test]
fn disjoint_inserts_are_lost_in_every_schedule() {
    shuttle::check_random(
        || {
            let dict = Dict::new();
            let clones = insert_disjoint_in_model(&dict);
            assert_clones_diverged(&dict, &clones, KEYS_PER_THREAD);
        },
        NUM_ITERATIONS,
    );
}
