use crate::constraint::{Constraint, ConstraintKind};
use crate::error::Seq2PatError;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

static NEXT_ATTRIBUTE_ID: AtomicUsize = AtomicUsize::new(0);

/// Identifies an [`Attribute`] inside a [`crate::constraint::ConstraintStore`].
///
/// Ids are issued once per constructed attribute. Clones of an attribute share its id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AttributeId(usize);

/// Numeric values aligned with the events of each sequence (one row per sequence).
///
/// Cloning is cheap: the values are shared.
#[derive(Clone, Debug)]
pub struct Attribute {
    id: AttributeId,
    values: Arc<Vec<Vec<i64>>>,
    min: i64,
    max: i64,
}

impl Attribute {
    /// Create a new attribute. Every row must be non-empty.
    pub fn new(values: Vec<Vec<i64>>) -> Result<Attribute, Seq2PatError> {
        if values.is_empty() {
            return Err(Seq2PatError::EmptyAttribute);
        }
        if let Some(row) = values.iter().position(|it| it.is_empty()) {
            return Err(Seq2PatError::EmptyAttributeRow { row });
        }

        let flat = values.iter().flatten().copied();
        let min = flat.clone().min().unwrap_or_default();
        let max = flat.max().unwrap_or_default();

        Ok(Attribute {
            id: AttributeId(NEXT_ATTRIBUTE_ID.fetch_add(1, Ordering::Relaxed)),
            values: Arc::new(values),
            min,
            max,
        })
    }

    /// Synthetic attribute holding the event index `0..len` of every row.
    pub fn positions(row_lengths: &[usize]) -> Result<Attribute, Seq2PatError> {
        let values = row_lengths
            .iter()
            .map(|len| (0..*len as i64).collect())
            .collect();
        Attribute::new(values)
    }

    pub fn id(&self) -> AttributeId {
        self.id
    }

    pub fn values(&self) -> &[Vec<i64>] {
        &self.values
    }

    pub fn row(&self, row: usize) -> &[i64] {
        &self.values[row]
    }

    pub fn num_rows(&self) -> usize {
        self.values.len()
    }

    /// Smallest value over all rows.
    pub fn min(&self) -> i64 {
        self.min
    }

    /// Largest value over all rows.
    pub fn max(&self) -> i64 {
        self.max
    }

    /// Check that this attribute has exactly one value per event of each sequence.
    pub fn check_aligned(&self, row_lengths: &[usize]) -> Result<(), Seq2PatError> {
        if self.values.len() != row_lengths.len() {
            return Err(Seq2PatError::RowCountMismatch {
                expected: row_lengths.len(),
                found: self.values.len(),
            });
        }
        for (row, (values, expected)) in self.values.iter().zip(row_lengths).enumerate() {
            if values.len() != *expected {
                return Err(Seq2PatError::RowLengthMismatch {
                    row,
                    expected: *expected,
                    found: values.len(),
                });
            }
        }
        Ok(())
    }

    /// Restricts the mean of the pattern's values.
    pub fn average(&self) -> Constraint {
        Constraint::new(self.clone(), ConstraintKind::Average)
    }

    /// Restricts the difference between every two consecutive values of a pattern.
    pub fn gap(&self) -> Constraint {
        Constraint::new(self.clone(), ConstraintKind::Gap)
    }

    /// Restricts the median of the pattern's values.
    pub fn median(&self) -> Constraint {
        Constraint::new(self.clone(), ConstraintKind::Median)
    }

    /// Restricts the difference between the largest and the smallest value of a pattern.
    pub fn span(&self) -> Constraint {
        Constraint::new(self.clone(), ConstraintKind::Span)
    }
}
