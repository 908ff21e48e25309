use std::thread;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use tsmap::dictionary::{Dictionary, QueueDict, SharedGuardDict, ValueGuardDict};

const NUM_THREADS: usize = 4;
const KEYS_PER_THREAD: usize = 10_000;

/// Has each thread insert its own range of keys through its own clone of a
/// new container, and returns the number of entries the original sees.
fn insert_through_clones<D>() -> usize
where
    D: Dictionary<Key = usize, Value = usize> + Clone + Send + 'static,
{
    let dict = D::new();
    let handles: Vec<_> = (0..NUM_THREADS)
        .map(|i| {
            let mut dict = dict.clone();
            thread::spawn(move || {
                for key in (i * KEYS_PER_THREAD)..((i + 1) * KEYS_PER_THREAD) {
                    dict.insert(key, i);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
    dict.len()
}

fn report(name: &str, len: usize) {
    let expected = NUM_THREADS * KEYS_PER_THREAD;
    if len == expected {
        info!(name, len, expected, "every insert is visible");
    } else {
        warn!(name, len, expected, "inserts were lost");
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    report("SharedGuardDict", insert_through_clones::<SharedGuardDict<usize, usize>>());
    report("QueueDict", insert_through_clones::<QueueDict<usize, usize>>());
    report("ValueGuardDict", insert_through_clones::<ValueGuardDict<usize, usize>>());
}
