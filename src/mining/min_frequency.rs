use crate::error::Seq2PatError;

/// Tolerance used when turning a fraction into a row count, so that `0.4 * 5` counts
/// as two rows and not three.
const ROUNDING_SLACK: f64 = 1e-9;

/// Minimum number of sequences a pattern must occur in.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MinFrequency {
    /// Absolute row count in `[1, rows]`.
    Count(i64),
    /// Fraction of rows in `(0, 1]` that selects at least one row.
    Fraction(f64),
}

impl MinFrequency {
    /// Validate the threshold against `rows` sequences and convert it to a row count.
    ///
    /// Fractions are rounded up, so a pattern is frequent when
    /// `count >= ceil(fraction * rows)`.
    pub fn row_count(&self, rows: usize) -> Result<usize, Seq2PatError> {
        match *self {
            MinFrequency::Count(count) => {
                if count < 1 || count as u64 > rows as u64 {
                    Err(Seq2PatError::FrequencyCountOutOfRange { count, rows })
                } else {
                    Ok(count as usize)
                }
            }
            MinFrequency::Fraction(fraction) => {
                let fraction = validate_fraction(fraction)?;
                let exact = fraction * rows as f64;
                if exact + ROUNDING_SLACK < 1.0 {
                    return Err(Seq2PatError::FrequencyFractionTooSmall { fraction, rows });
                }
                Ok(((exact - ROUNDING_SLACK).ceil() as usize).clamp(1, rows))
            }
        }
    }

    /// Validate the threshold against `rows` sequences and express it as a fraction.
    pub fn fraction(&self, rows: usize) -> Result<f64, Seq2PatError> {
        match *self {
            MinFrequency::Count(_) => {
                let count = self.row_count(rows)?;
                Ok(count as f64 / rows as f64)
            }
            MinFrequency::Fraction(fraction) => {
                self.row_count(rows)?;
                Ok(fraction)
            }
        }
    }
}

/// Fractions outside `(0, 1]` (including `NaN`) are rejected.
pub(crate) fn validate_fraction(fraction: f64) -> Result<f64, Seq2PatError> {
    if fraction > 0.0 && fraction <= 1.0 {
        Ok(fraction)
    } else {
        Err(Seq2PatError::FrequencyFractionOutOfRange(fraction))
    }
}

/// Convert a (possibly relaxed) fraction into a row count for a batch of `rows` sequences.
/// Unlike [`MinFrequency::row_count`], this never fails: the result is at least one row.
pub(crate) fn relaxed_row_count(fraction: f64, rows: usize) -> usize {
    let exact = fraction * rows as f64;
    ((exact - ROUNDING_SLACK).ceil().max(1.0) as usize).min(rows.max(1))
}

impl From<f64> for MinFrequency {
    fn from(value: f64) -> Self {
        MinFrequency::Fraction(value)
    }
}

impl From<i32> for MinFrequency {
    fn from(value: i32) -> Self {
        MinFrequency::Count(i64::from(value))
    }
}

impl From<i64> for MinFrequency {
    fn from(value: i64) -> Self {
        MinFrequency::Count(value)
    }
}

impl From<u32> for MinFrequency {
    fn from(value: u32) -> Self {
        MinFrequency::Count(i64::from(value))
    }
}

impl From<usize> for MinFrequency {
    fn from(value: usize) -> Self {
        MinFrequency::Count(i64::try_from(value).unwrap_or(i64::MAX))
    }
}
