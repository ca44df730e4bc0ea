use crate::constraint::{Constraint, ConstraintKind};
use crate::error::Seq2PatError;

/// A self-contained description of one mining run.
///
/// The configuration owns private copies of the (encoded) sequences and of the attribute
/// values of every constraint, restricted to the selected rows. This allows independent runs
/// (such as the chunks of a batched run) to proceed without sharing anything mutable.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MiningConfig {
    /// Sequences of item ids. Ids are positive, `0` never matches.
    pub sequences: Vec<Vec<u32>>,
    /// Constraints with at least one bound, aligned with `sequences`.
    pub constraints: Vec<MiningConstraint>,
    /// A prefix is frequent when it occurs in at least this many rows (default: `1`).
    pub min_row_count: usize,
    /// Cancel the search once it expands more than the given number of prefixes
    /// (default: `usize::MAX`).
    pub max_expanded_prefixes: usize,
}

/// A bounded constraint together with the per-row data the search uses to prune.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MiningConstraint {
    pub kind: ConstraintKind,
    pub lower: Option<i64>,
    pub upper: Option<i64>,
    rows: Vec<RowSummary>,
}

/// Attribute values of one row plus suffix statistics.
///
/// Every suffix vector has `len + 1` entries: entry `j` summarizes `values[j..]`, so entry
/// `len` describes the empty suffix.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
struct RowSummary {
    values: Vec<i64>,
    suffix_min: Vec<i64>,
    suffix_max: Vec<i64>,
    /// Number of values `>= lower` in the suffix (median only).
    suffix_meeting_lower: Vec<u32>,
    /// Number of values `<= upper` in the suffix (median only).
    suffix_meeting_upper: Vec<u32>,
    non_decreasing: bool,
}

impl MiningConfig {
    /// Configuration over all rows of `sequences`.
    pub fn new(
        sequences: &[Vec<u32>],
        constraints: &[Constraint],
        min_row_count: usize,
    ) -> Result<MiningConfig, Seq2PatError> {
        let rows: Vec<usize> = (0..sequences.len()).collect();
        MiningConfig::for_rows(sequences, constraints, &rows, min_row_count)
    }

    /// Configuration over the given `rows` of `sequences`, in the given order.
    ///
    /// Attribute values of every constraint are selected with the same row indices, so the
    /// correspondence between a sequence and its attribute values is preserved.
    pub fn for_rows(
        sequences: &[Vec<u32>],
        constraints: &[Constraint],
        rows: &[usize],
        min_row_count: usize,
    ) -> Result<MiningConfig, Seq2PatError> {
        let row_lengths: Vec<usize> = sequences.iter().map(|it| it.len()).collect();
        for constraint in constraints {
            constraint.attribute().check_aligned(&row_lengths)?;
        }

        let constraints = constraints
            .iter()
            .filter(|it| !it.is_unbounded())
            .map(|it| MiningConstraint::new(it, rows))
            .collect();

        Ok(MiningConfig {
            sequences: rows.iter().map(|r| sequences[*r].clone()).collect(),
            constraints,
            min_row_count: min_row_count.max(1),
            max_expanded_prefixes: usize::MAX,
        })
    }

    pub fn num_rows(&self) -> usize {
        self.sequences.len()
    }
}

impl MiningConstraint {
    fn new(constraint: &Constraint, rows: &[usize]) -> MiningConstraint {
        let attribute = constraint.attribute();
        let lower = constraint.lower();
        let upper = constraint.upper();
        let rows = rows
            .iter()
            .map(|r| RowSummary::new(attribute.row(*r), lower, upper))
            .collect();
        MiningConstraint {
            kind: constraint.kind(),
            lower,
            upper,
            rows,
        }
    }

    pub fn value(&self, row: usize, position: usize) -> i64 {
        self.rows[row].values[position]
    }

    /// Check the difference `to - from` against both bounds, computed in `i128`
    /// (same as [`Constraint::check_difference`]).
    pub fn check_difference(&self, from: i64, to: i64) -> bool {
        let difference = i128::from(to) - i128::from(from);
        self.lower.is_none_or(|lb| difference >= i128::from(lb))
            && self.upper.is_none_or(|ub| difference <= i128::from(ub))
    }

    pub fn row_len(&self, row: usize) -> usize {
        self.rows[row].values.len()
    }

    /// Smallest value strictly after `position`, `None` if there is none.
    pub fn min_after(&self, row: usize, position: usize) -> Option<i64> {
        let summary = &self.rows[row];
        (position + 1 < summary.values.len()).then(|| summary.suffix_min[position + 1])
    }

    /// Largest value strictly after `position`, `None` if there is none.
    pub fn max_after(&self, row: usize, position: usize) -> Option<i64> {
        let summary = &self.rows[row];
        (position + 1 < summary.values.len()).then(|| summary.suffix_max[position + 1])
    }

    /// Number of values after `position` that are `>= lower`.
    pub fn meeting_lower_after(&self, row: usize, position: usize) -> u32 {
        self.rows[row]
            .suffix_meeting_lower
            .get(position + 1)
            .copied()
            .unwrap_or(0)
    }

    /// Number of values after `position` that are `<= upper`.
    pub fn meeting_upper_after(&self, row: usize, position: usize) -> u32 {
        self.rows[row]
            .suffix_meeting_upper
            .get(position + 1)
            .copied()
            .unwrap_or(0)
    }

    pub fn is_non_decreasing(&self, row: usize) -> bool {
        self.rows[row].non_decreasing
    }
}

impl RowSummary {
    fn new(values: &[i64], lower: Option<i64>, upper: Option<i64>) -> RowSummary {
        let len = values.len();
        let mut suffix_min = vec![i64::MAX; len + 1];
        let mut suffix_max = vec![i64::MIN; len + 1];
        let mut suffix_meeting_lower = vec![0u32; len + 1];
        let mut suffix_meeting_upper = vec![0u32; len + 1];
        for j in (0..len).rev() {
            let value = values[j];
            suffix_min[j] = suffix_min[j + 1].min(value);
            suffix_max[j] = suffix_max[j + 1].max(value);
            suffix_meeting_lower[j] =
                suffix_meeting_lower[j + 1] + u32::from(lower.is_some_and(|lb| value >= lb));
            suffix_meeting_upper[j] =
                suffix_meeting_upper[j + 1] + u32::from(upper.is_some_and(|ub| value <= ub));
        }
        RowSummary {
            values: values.to_vec(),
            suffix_min,
            suffix_max,
            suffix_meeting_lower,
            suffix_meeting_upper,
            non_decreasing: values.windows(2).all(|w| w[0] <= w[1]),
        }
    }
}
