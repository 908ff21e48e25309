use crate::Error;

const DEFAULT_MIN_SIZE: usize = 1;
const DEFAULT_MAX_SIZE: usize = 1 << 14;
const DEFAULT_SEED: u64 = 0x5eed;
const DEFAULT_SAMPLE_SIZE: usize = 20;
const MIN_SAMPLE_SIZE: usize = 10;

/// Parameters of a benchmark run.
///
/// Input sizes are the powers of two from `min_size` up to and including
/// `max_size`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BenchConfig {
    min_size: usize,
    max_size: usize,
    seed: u64,
    sample_size: usize,
}

impl BenchConfig {
    /// Sets the smallest and largest input size.
    pub fn with_sizes(mut self, min_size: usize, max_size: usize) -> Self {
        self.min_size = min_size;
        self.max_size = max_size;
        self
    }

    /// Sets the seed that inputs are generated from.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the number of samples criterion collects per case.
    pub fn with_sample_size(mut self, sample_size: usize) -> Self {
        self.sample_size = sample_size;
        self
    }

    /// Checks that the configuration describes at least one input size.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSizes`] if the smallest size is zero or no power
    /// of two lies between the two sizes, and [`Error::SampleSize`] if there are too few
    /// samples for criterion.
    pub fn validate(&self) -> Result<(), Error> {
        if self.min_size == 0 || self.sizes().is_empty() {
            return Err(Error::InvalidSizes {
                min: self.min_size,
                max: self.max_size,
            });
        }
        if self.sample_size < MIN_SAMPLE_SIZE {
            return Err(Error::SampleSize(self.sample_size));
        }
        Ok(())
    }

    /// Returns the input sizes, smallest first.
    pub fn sizes(&self) -> Vec<usize> {
        let mut sizes = Vec::new();
        let mut size = self.min_size.max(1).next_power_of_two();
        while size <= self.max_size {
            sizes.push(size);
            size = match size.checked_mul(2) {
                Some(next) => next,
                None => break,
            };
        }
        sizes
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn sample_size(&self) -> usize {
        self.sample_size
    }
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            min_size: DEFAULT_MIN_SIZE,
            max_size: DEFAULT_MAX_SIZE,
            seed: DEFAULT_SEED,
            sample_size: DEFAULT_SAMPLE_SIZE,
        }
    }
}
