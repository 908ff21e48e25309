use std::collections::HashMap;

use tsmap::dictionary::{Dictionary, QueueDict};
use tsmap::queue::QueueConfig;

use super::common::*;

type Dict = QueueDict<u64, u64>;

fn dict() -> Dict {
    QueueDict::with_config(HashMap::new(), QueueConfig::new(2).unwrap())
}

#[cfg(not(feature = "shuttle"))]
#[test]
fn disjoint_inserts_are_not_lost() {
    const NUM_THREADS: usize = 4;
    const KEYS_PER_THREAD: usize = 1_000;

    let dict = dict();
    let clones = tsmap_utils::workload::insert_disjoint(&dict, NUM_THREADS, KEYS_PER_THREAD);

    assert_no_lost_inserts(&dict, NUM_THREADS, KEYS_PER_THREAD);
    for clone in &clones {
        assert!(clone.shares_map_with(&dict));
    }
}

#[cfg(not(feature = "shuttle"))]
#[test]
fn readers_see_writes_in_submission_order() {
    use std::thread;

    let mut dict = dict();
    dict.insert(0, 0);

    let reader = {
        let dict = dict.clone();
        thread::spawn(move || {
            let mut last = 0;
            for _ in 0..1_000 {
                let value = dict.get(&0).unwrap();
                assert!(value >= last, "read {} after {}", value, last);
                last = value;
            }
        })
    };

    for value in 1..=1_000 {
        dict.insert(0, value);
    }
    reader.join().unwrap();
    dict.flush();
    assert_eq!(dict.get(&0), Some(1_000));
}

#[cfg(feature = "shuttle")]
#[test]
fn disjoint_inserts_are_not_lost_in_any_schedule() {
    shuttle::check_random(
        || {
            let dict = dict();
            insert_disjoint_in_model(&dict);
            assert_no_lost_inserts(&dict, NUM_THREADS, KEYS_PER_THREAD);
        },
        NUM_ITERATIONS,
    );
}

#[cfg(feature = "shuttle")]
#[test]
fn removals_are_ordered_after_inserts_in_any_schedule() {
    shuttle::check_pct(
        || {
            let dict = dict();
            let handles: Vec<_> = (0..NUM_THREADS as u64)
                .map(|key| {
                    let mut dict = dict.clone();
                    shuttle::thread::spawn(move || {
                        dict.insert(key, key);
                        assert_eq!(dict.remove(&key), Some(key));
                    })
                })
                .collect();
            for handle in handles {
                handle.join().unwrap();
            }
            assert!(dict.is_empty());
        },
        NUM_ITERATIONS,
        NUM_PREEMPTIONS,
    );
}
