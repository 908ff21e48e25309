use thiserror::Error;

/// Errors raised while preparing a benchmark.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("got {keys} keys but {values} values")]
    LengthMismatch { keys: usize, values: usize },

    #[error("removal order has {order} keys but the input has {keys}")]
    RemovalOrder { keys: usize, order: usize },

    #[error("invalid input sizes: {min}..={max}")]
    InvalidSizes { min: usize, max: usize },

    #[error("criterion needs at least 10 samples per case, got {0}")]
    SampleSize(usize),
}
