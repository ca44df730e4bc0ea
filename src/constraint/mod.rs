//! Attributes and the aggregate constraints declared over them.
//!
//! An [`Attribute`] assigns a number to every event of every sequence. A [`Constraint`]
//! bounds one statistic of the attribute values picked out by a pattern occurrence:
//!
//! - [`ConstraintKind::Average`]: the arithmetic mean.
//! - [`ConstraintKind::Gap`]: every difference between two consecutive values.
//! - [`ConstraintKind::Median`]: the median (mean of the two middle values for even counts).
//! - [`ConstraintKind::Span`]: the difference between the largest and the smallest value.
//!
//! Bounds are inclusive and either side can be left open. Everything is evaluated in exact
//! integer arithmetic (averages and medians are compared after multiplying the bound).
//!
//! # Example
//!
//! ```no_run
//! use seq2pat::constraint::{Attribute, ConstraintStore};
//!
//! let price = Attribute::new(vec![vec![5, 5, 3, 8, 2], vec![1, 3, 3]]).unwrap();
//! let mut store = ConstraintStore::new(vec![5, 3]);
//! let handle = store.add(price.average().between(3, 4)).unwrap();
//! store.remove(handle).unwrap();
//! ```

mod attribute;
mod store;

#[cfg(test)]
mod tests;

pub use attribute::{Attribute, AttributeId};
pub use store::{ConstraintHandle, ConstraintStore};

/// The statistic restricted by a [`Constraint`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConstraintKind {
    Average,
    Gap,
    Median,
    Span,
}

/// Bounds on one statistic of an attribute.
#[derive(Clone, Debug)]
pub struct Constraint {
    attribute: Attribute,
    kind: ConstraintKind,
    lower: Option<i64>,
    upper: Option<i64>,
}

impl Constraint {
    /// An unbounded constraint. Use [`Attribute::average`] and friends instead.
    pub fn new(attribute: Attribute, kind: ConstraintKind) -> Constraint {
        Constraint {
            attribute,
            kind,
            lower: None,
            upper: None,
        }
    }

    /// Set an inclusive lower bound.
    pub fn at_least(mut self, lower: i64) -> Constraint {
        self.lower = Some(lower);
        self
    }

    /// Set an inclusive upper bound.
    pub fn at_most(mut self, upper: i64) -> Constraint {
        self.upper = Some(upper);
        self
    }

    /// Set both bounds, `lower <= statistic <= upper`.
    pub fn between(self, lower: i64, upper: i64) -> Constraint {
        self.at_least(lower).at_most(upper)
    }

    pub fn attribute(&self) -> &Attribute {
        &self.attribute
    }

    pub fn kind(&self) -> ConstraintKind {
        self.kind
    }

    pub fn lower(&self) -> Option<i64> {
        self.lower
    }

    pub fn upper(&self) -> Option<i64> {
        self.upper
    }

    /// True if neither bound is set.
    pub fn is_unbounded(&self) -> bool {
        self.lower.is_none() && self.upper.is_none()
    }

    /// Check a scalar statistic against both bounds.
    pub fn check_value(&self, value: i64) -> bool {
        self.lower.is_none_or(|lb| value >= lb) && self.upper.is_none_or(|ub| value <= ub)
    }

    /// Check the difference `to - from` against both bounds. The difference of two `i64`
    /// values can exceed the `i64` range, so it is computed in `i128`.
    pub fn check_difference(&self, from: i64, to: i64) -> bool {
        let difference = i128::from(to) - i128::from(from);
        self.lower.is_none_or(|lb| difference >= i128::from(lb))
            && self.upper.is_none_or(|ub| difference <= i128::from(ub))
    }

    /// Evaluate the constraint on the values picked out by one pattern occurrence.
    ///
    /// An empty slice satisfies every constraint. A single value satisfies every gap
    /// constraint.
    pub fn is_satisfied_by(&self, values: &[i64]) -> bool {
        if values.is_empty() {
            return true;
        }
        match self.kind {
            ConstraintKind::Average => {
                let n = values.len() as i128;
                let sum: i128 = values.iter().map(|v| i128::from(*v)).sum();
                self.lower.is_none_or(|lb| sum >= i128::from(lb) * n)
                    && self.upper.is_none_or(|ub| sum <= i128::from(ub) * n)
            }
            ConstraintKind::Gap => values.windows(2).all(|w| self.check_difference(w[0], w[1])),
            ConstraintKind::Median => {
                let mut sorted = values.to_vec();
                sorted.sort_unstable();
                let mid = sorted.len() / 2;
                if sorted.len() % 2 == 1 {
                    self.check_value(sorted[mid])
                } else {
                    // Compare the doubled median to avoid fractions.
                    let doubled = i128::from(sorted[mid - 1]) + i128::from(sorted[mid]);
                    self.lower.is_none_or(|lb| doubled >= 2 * i128::from(lb))
                        && self.upper.is_none_or(|ub| doubled <= 2 * i128::from(ub))
                }
            }
            ConstraintKind::Span => {
                let min = values.iter().min().copied().unwrap_or_default();
                let max = values.iter().max().copied().unwrap_or_default();
                self.check_difference(min, max)
            }
        }
    }

    /// Evaluate the constraint on the attribute values of `row` at the given positions.
    pub fn is_satisfied_at(&self, row: usize, positions: &[usize]) -> bool {
        let values = self.attribute.row(row);
        let picked: Vec<i64> = positions.iter().map(|p| values[*p]).collect();
        self.is_satisfied_by(&picked)
    }
}
