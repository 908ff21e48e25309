//! Inputs, workloads and benchmark registration for `tsmap` containers.
pub mod bench;
pub mod workload;

mod config;
mod error;
mod input;

pub use bench::{init_tracing, register_cases};
pub use config::BenchConfig;
pub use error::Error;
pub use input::Input;
