use thiserror::Error;

/// Errors raised while configuring a container.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("a dispatch queue needs a concurrency limit of at least 2, got {0}")]
    ConcurrencyLimit(usize),
}
