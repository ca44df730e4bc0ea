use crate::batch::BatchConfig;
use crate::error::Seq2PatError;

/// A configuration object for a [`crate::session::Seq2Pat`] mining session.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Seq2PatConfig {
    /// Bound the distance between the first and the last matched event of every pattern
    /// occurrence to `max_span - 1` (default: `Some(10)`). Must be greater than `1`; `None`
    /// disables the bound.
    pub max_span: Option<usize>,
    /// Mine in shuffled batches (default: `None`, which batches automatically only for very
    /// large sessions).
    pub batch: Option<BatchConfig>,
    /// Run unbatched searches on a dedicated worker thread that is torn down after each call
    /// (default: `true`).
    ///
    /// Cancellation triggers registered on the calling thread are not visible to the worker.
    /// Disable isolation to mine under `cancel_this::on_timeout` and similar guards.
    pub isolate: bool,
    /// Cancel unbatched searches once they expand more than the given number of prefixes
    /// (default: `usize::MAX`).
    pub max_expanded_prefixes: usize,
}

impl Default for Seq2PatConfig {
    fn default() -> Self {
        Seq2PatConfig::new()
    }
}

impl From<BatchConfig> for Seq2PatConfig {
    fn from(value: BatchConfig) -> Self {
        Seq2PatConfig {
            batch: Some(value),
            ..Seq2PatConfig::new()
        }
    }
}

impl Seq2PatConfig {
    /// Create a new [`Seq2PatConfig`] with `max_span = 10`, no explicit batching and
    /// isolation enabled.
    pub fn new() -> Seq2PatConfig {
        Seq2PatConfig {
            max_span: Some(10),
            batch: None,
            isolate: true,
            max_expanded_prefixes: usize::MAX,
        }
    }

    pub fn validate(&self) -> Result<(), Seq2PatError> {
        if let Some(max_span) = self.max_span
            && max_span <= 1
        {
            return Err(Seq2PatError::InvalidMaxSpan(max_span));
        }
        if let Some(batch) = &self.batch {
            batch.validate()?;
        }
        Ok(())
    }
}
