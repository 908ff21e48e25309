use tsmap::dictionary::{Dictionary, SharedGuardDict};

use super::common::*;

type Dict = SharedGuardDict<u64, u64>;

#[cfg(not(feature = "shuttle"))]
#[test]
fn disjoint_inserts_are_not_lost() {
    const NUM_THREADS: usize = 8;
    const KEYS_PER_THREAD: usize = 2_000;

    let dict = Dict::new();
    let clones = tsmap_utils::workload::insert_disjoint(&dict, NUM_THREADS, KEYS_PER_THREAD);

    assert_no_lost_inserts(&dict, NUM_THREADS, KEYS_PER_THREAD);
    for clone in &clones {
        assert!(clone.shares_map_with(&dict));
        assert_eq!(clone.len(), NUM_THREADS * KEYS_PER_THREAD);
    }
}

#[cfg(not(feature = "shuttle"))]
#[test]
fn concurrent_removals_return_each_value_once() {
    use std::thread;

    const NUM_KEYS: u64 = 4_000;

    let mut dict = Dict::new();
    for key in 0..NUM_KEYS {
        dict.insert(key, key);
    }

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let mut dict = dict.clone();
            thread::spawn(move || (0..NUM_KEYS).filter(|key| dict.remove(key).is_some()).count())
        })
        .collect();

    let removed: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
    assert_eq!(removed, NUM_KEYS as usize);
    assert!(dict.is_empty());
}

#[cfg(feature = "shuttle")]
#[test]
fn disjoint_inserts_are_not_lost_in_any_schedule() {
    shuttle::check_pct(
        || {
            let dict = Dict::new();
            insert_disjoint_in_model(&dict);
            assert_no_lost_inserts(&dict, NUM_THREADS, KEYS_PER_THREAD);
        },
        NUM_ITERATIONS,
        NUM_PREEMPTIONS,
    );
}
