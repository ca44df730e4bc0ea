use crate::constraint::ConstraintKind;
use cancel_this::Cancelled;

/// All the ways a mining session, an encoding run, or a data load can fail.
///
/// Validation errors are always reported before any search starts. Once a search is
/// running, the only possible failures are cancellation and worker pool errors.
#[derive(Debug, thiserror::Error)]
pub enum Seq2PatError {
    // Input validation.
    #[error("sequences cannot be empty")]
    EmptySequences,
    #[error("sequence at row {row} is empty")]
    EmptySequence { row: usize },
    #[error("item at row {row}, column {column} is not a valid item (integers must be positive)")]
    InvalidItem { row: usize, column: usize },
    #[error("attribute values cannot be empty")]
    EmptyAttribute,
    #[error("attribute values at row {row} are empty")]
    EmptyAttributeRow { row: usize },
    #[error(
        "each sequence should match given attributes in event length \
         (row {row}: expected {expected}, found {found})"
    )]
    RowLengthMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("attribute has {found} rows, but there are {expected} sequences")]
    RowCountMismatch { expected: usize, found: usize },
    #[error("max_span must be greater than 1 (found {0})")]
    InvalidMaxSpan(usize),
    #[error("the batch_size must be greater than zero")]
    InvalidBatchSize,
    #[error("the n_jobs cannot be zero")]
    InvalidJobs,
    #[error("the discount_factor must be in (0, 1] (found {0})")]
    InvalidDiscountFactor(f64),

    // Constraint store.
    #[error("{0:?} constraint is already defined on this attribute")]
    DuplicateConstraint(ConstraintKind),
    #[error("no {0:?} constraint to remove on this attribute")]
    ConstraintNotFound(ConstraintKind),

    // Thresholds.
    #[error("frequency fraction must be in (0, 1] (found {0})")]
    FrequencyFractionOutOfRange(f64),
    #[error(
        "frequency fraction {fraction} selects less than one of {rows} rows; \
         it should be no less than 1/(number of sequences)"
    )]
    FrequencyFractionTooSmall { fraction: f64, rows: usize },
    #[error("frequency must be in [1, {rows}] (found {count})")]
    FrequencyCountOutOfRange { count: i64, rows: usize },

    // Feature encoding.
    #[error("patterns carry a trailing frequency, but drop_pattern_frequency is disabled")]
    PatternCarriesFrequency,
    #[error("pattern {0} is empty")]
    EmptyPattern(usize),

    // Text input.
    #[error("cannot read input: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot parse `{token}` at line {line}")]
    Parse { line: usize, token: String },

    // Execution.
    #[error("cannot start mining workers: {0}")]
    WorkerPool(String),
    #[error("mining cancelled: {0}")]
    Cancelled(Cancelled),
}

impl From<Cancelled> for Seq2PatError {
    fn from(value: Cancelled) -> Self {
        Seq2PatError::Cancelled(value)
    }
}

impl From<rayon::ThreadPoolBuildError> for Seq2PatError {
    fn from(value: rayon::ThreadPoolBuildError) -> Self {
        Seq2PatError::WorkerPool(value.to_string())
    }
}
