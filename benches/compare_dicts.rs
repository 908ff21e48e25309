use std::collections::HashMap;

use criterion::{criterion_group, criterion_main, Criterion};

use tsmap::dictionary::{QueueDict, SharedGuardDict, UnguardedDict, UnsyncDict, ValueGuardDict};
use tsmap_utils::{init_tracing, register_cases, BenchConfig};

// Fewer and smaller inputs than the per-container benchmarks, since every
// container runs in one process.
const MAX_SIZE: usize = 1 << 12;

fn criterion_benchmark(c: &mut Criterion) {
    init_tracing();
    let config = BenchConfig::default().with_sizes(1, MAX_SIZE);

    register_cases::<HashMap<u64, u64>>(c, "Dictionaries/HashMap", &config);
    register_cases::<UnsyncDict<u64, u64>>(c, "Dictionaries/UnsyncDict", &config);
    register_cases::<QueueDict<u64, u64>>(c, "Dictionaries/QueueDict", &config);
    register_cases::<ValueGuardDict<u64, u64>>(c, "Dictionaries/ValueGuardDict", &config);
    register_cases::<SharedGuardDict<u64, u64>>(c, "Dictionaries/SharedGuardDict", &config);
    register_cases::<UnguardedDict<u64, u64>>(c, "Dictionaries/UnguardedDict", &config);
}

criterion_group! {
    all_dictionaries,
    criterion_benchmark,
}
criterion_main! {
    all_dictionaries
}
