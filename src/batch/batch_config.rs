use crate::error::Seq2PatError;

/// A configuration object for batched mining.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BatchConfig {
    /// Number of rows mined together in one batch. Must be positive.
    pub batch_size: usize,
    /// Factor applied to the frequency threshold of each batch, in `(0, 1]` (default: `0.2`).
    ///
    /// Small factors make the batched result converge to the unbatched one. Factors close to
    /// `1.0` are faster, but can miss patterns that are frequent overall and infrequent in
    /// some batch.
    pub discount_factor: f64,
    /// Number of parallel workers (default: `2`). Negative values count back from the number
    /// of available CPUs: `-1` uses all of them, `-2` all but one. Zero is invalid.
    pub n_jobs: i32,
    /// Seed of the row shuffle (default: `0`).
    pub seed: u64,
}

impl From<usize> for BatchConfig {
    fn from(value: usize) -> Self {
        BatchConfig::new(value)
    }
}

impl BatchConfig {
    /// Create a new [`BatchConfig`] with default discount factor, worker count and seed.
    pub fn new(batch_size: usize) -> BatchConfig {
        BatchConfig {
            batch_size,
            discount_factor: 0.2,
            n_jobs: 2,
            seed: 0,
        }
    }

    pub fn validate(&self) -> Result<(), Seq2PatError> {
        if self.batch_size == 0 {
            return Err(Seq2PatError::InvalidBatchSize);
        }
        if self.n_jobs == 0 {
            return Err(Seq2PatError::InvalidJobs);
        }
        if !(self.discount_factor > 0.0 && self.discount_factor <= 1.0) {
            return Err(Seq2PatError::InvalidDiscountFactor(self.discount_factor));
        }
        Ok(())
    }

    /// The number of worker threads this configuration asks for, given `available` CPUs.
    pub fn worker_count(&self, available: usize) -> usize {
        if self.n_jobs > 0 {
            self.n_jobs as usize
        } else {
            let available = available as i64;
            (available + 1 + i64::from(self.n_jobs)).max(1) as usize
        }
    }

    /// Relaxed frequency fraction used inside each batch.
    pub fn batch_threshold(&self, min_frequency: f64) -> f64 {
        (min_frequency * self.discount_factor).max(1.0 / self.batch_size as f64)
    }
}
