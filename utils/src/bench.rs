//! Registration of benchmark cases with `criterion`.
use criterion::{black_box, BatchSize, BenchmarkId, Criterion, Throughput};
use tracing::info;
use tracing_subscriber::EnvFilter;

use tsmap::dictionary::Dictionary;

use crate::{workload, BenchConfig, Input};

/// Installs a `tracing` subscriber that honours `RUST_LOG`. Does nothing if
/// one is already installed.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}

/// Registers a group of benchmark cases named `name`, one per input size of
/// `config`, that each run [`workload::insert_then_remove`] on a new `D`.
///
/// # Panics
///
/// Panics if `config` is invalid.
pub fn register_cases<D>(c: &mut Criterion, name: &str, config: &BenchConfig)
where
    D: Dictionary<Key = u64, Value = u64>,
{
    if let Err(err) = config.validate() {
        panic!("cannot benchmark {}: {}", name, err);
    }

    let sizes = config.sizes();
    info!(name, sizes = sizes.len(), seed = config.seed(), "registering benchmark cases");

    let mut group = c.benchmark_group(name);
    group.sample_size(config.sample_size());
    for size in sizes {
        let input = Input::random(size, config.seed());
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(
            BenchmarkId::new("insert then remove", size),
            &input,
            |b, input| {
                b.iter_batched(
                    D::new,
                    |mut dict| {
                        black_box(workload::insert_then_remove(&mut dict, input));
                        // Dropped outside of the measurement.
                        dict
                    },
                    BatchSize::SmallInput,
                )
            },
        );
    }
    group.finish();
}
