use crate::constraint::ConstraintKind;
use crate::mining::{MiningConfig, MiningConstraint};

/// One occurrence of a prefix inside a row: the position of its last item and the running
/// aggregate of every constraint over the matched values.
///
/// Two occurrences with the same last position and the same aggregates behave identically
/// for every extension, which is why embeddings are deduplicated by value.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Embedding {
    pub last: usize,
    aggregates: Vec<Aggregate>,
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
enum Aggregate {
    /// Gap only looks at the last matched value, which is read from `Embedding::last`.
    Gap,
    Sum(i128),
    Range { min: i64, max: i64 },
    Median {
        lower: Option<Tally>,
        upper: Option<Tally>,
    },
}

/// Counts matched values on both sides of a median bound.
///
/// Values are oriented so that the bound is always a lower bound: an upper bound `ub` on the
/// median is a lower bound `-ub` on the median of the negated values. Negation happens in
/// `i128`, where `-i64::MIN` is representable.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
struct Tally {
    meeting: u32,
    missing: u32,
    /// Smallest value that meets the bound.
    min_meeting: i128,
    /// Largest value that misses the bound.
    max_missing: i128,
}

impl Tally {
    fn new(value: i128, bound: i128) -> Tally {
        let mut tally = Tally {
            meeting: 0,
            missing: 0,
            min_meeting: i128::MAX,
            max_missing: i128::MIN,
        };
        tally.push(value, bound);
        tally
    }

    fn push(&mut self, value: i128, bound: i128) {
        if value >= bound {
            self.meeting += 1;
            self.min_meeting = self.min_meeting.min(value);
        } else {
            self.missing += 1;
            self.max_missing = self.max_missing.max(value);
        }
    }

    /// The median of the pushed values is at least `bound`.
    ///
    /// With more values on the meeting side, the middle value (or both middle values) meets
    /// the bound. With a tie, the two middle values are `max_missing` and `min_meeting`.
    fn is_satisfied(&self, bound: i128) -> bool {
        if self.meeting != self.missing {
            return self.meeting > self.missing;
        }
        self.meeting > 0 && self.max_missing + self.min_meeting >= 2 * bound
    }

    /// Some extension by at most `available_meeting` values meeting the bound could
    /// still satisfy it.
    fn is_alive(&self, available_meeting: u32) -> bool {
        self.meeting + available_meeting >= self.missing
    }
}

impl Embedding {
    /// An embedding of a single item at `position`, or `None` if no extension of it can
    /// satisfy the constraints.
    pub fn start(config: &MiningConfig, row: usize, position: usize) -> Option<Embedding> {
        let aggregates = config
            .constraints
            .iter()
            .map(|constraint| {
                let value = constraint.value(row, position);
                let wide = i128::from(value);
                match constraint.kind {
                    ConstraintKind::Gap => Aggregate::Gap,
                    ConstraintKind::Average => Aggregate::Sum(wide),
                    ConstraintKind::Span => Aggregate::Range {
                        min: value,
                        max: value,
                    },
                    ConstraintKind::Median => Aggregate::Median {
                        lower: constraint.lower.map(|lb| Tally::new(wide, i128::from(lb))),
                        upper: constraint.upper.map(|ub| Tally::new(-wide, -i128::from(ub))),
                    },
                }
            })
            .collect();

        let embedding = Embedding {
            last: position,
            aggregates,
        };
        embedding.is_alive(config, row, 1).then_some(embedding)
    }

    /// Append the item at `position` (which must be after `self.last`). The result has
    /// `length` items. Returns `None` when a gap bound is violated or the new embedding
    /// cannot be completed into a satisfying occurrence.
    pub fn extend(
        &self,
        config: &MiningConfig,
        row: usize,
        position: usize,
        length: usize,
    ) -> Option<Embedding> {
        let mut aggregates = Vec::with_capacity(self.aggregates.len());
        for (constraint, aggregate) in config.constraints.iter().zip(&self.aggregates) {
            let value = constraint.value(row, position);
            let next = match aggregate {
                Aggregate::Gap => {
                    if !constraint.check_difference(constraint.value(row, self.last), value) {
                        return None;
                    }
                    Aggregate::Gap
                }
                Aggregate::Sum(sum) => Aggregate::Sum(sum + i128::from(value)),
                Aggregate::Range { min, max } => Aggregate::Range {
                    min: (*min).min(value),
                    max: (*max).max(value),
                },
                Aggregate::Median { lower, upper } => {
                    let mut lower = lower.clone();
                    let mut upper = upper.clone();
                    let wide = i128::from(value);
                    if let (Some(tally), Some(lb)) = (lower.as_mut(), constraint.lower) {
                        tally.push(wide, i128::from(lb));
                    }
                    if let (Some(tally), Some(ub)) = (upper.as_mut(), constraint.upper) {
                        tally.push(-wide, -i128::from(ub));
                    }
                    Aggregate::Median { lower, upper }
                }
            };
            aggregates.push(next);
        }

        let embedding = Embedding {
            last: position,
            aggregates,
        };
        embedding.is_alive(config, row, length).then_some(embedding)
    }

    /// True if no position at or after `position` can extend this embedding.
    ///
    /// This only fires for attributes that never decrease along the row (such as event
    /// indices or timestamps), where a violated span or gap upper bound stays violated.
    pub fn is_beyond_horizon(&self, config: &MiningConfig, row: usize, position: usize) -> bool {
        config
            .constraints
            .iter()
            .zip(&self.aggregates)
            .any(|(constraint, aggregate)| {
                let Some(ub) = constraint.upper else {
                    return false;
                };
                if !constraint.is_non_decreasing(row) {
                    return false;
                }
                let value = i128::from(constraint.value(row, position));
                let ub = i128::from(ub);
                match aggregate {
                    Aggregate::Range { min, .. } => value - i128::from(*min) > ub,
                    Aggregate::Gap => value - i128::from(constraint.value(row, self.last)) > ub,
                    _ => false,
                }
            })
    }

    /// True if this occurrence (with `length` items) satisfies every constraint.
    pub fn is_satisfied(&self, config: &MiningConfig, length: usize) -> bool {
        let n = length as i128;
        config
            .constraints
            .iter()
            .zip(&self.aggregates)
            .all(|(constraint, aggregate)| match aggregate {
                Aggregate::Gap => true,
                Aggregate::Sum(sum) => {
                    constraint.lower.is_none_or(|lb| *sum >= i128::from(lb) * n)
                        && constraint.upper.is_none_or(|ub| *sum <= i128::from(ub) * n)
                }
                Aggregate::Range { min, max } => constraint.check_difference(*min, *max),
                Aggregate::Median { lower, upper } => {
                    let lower_ok = match (lower, constraint.lower) {
                        (Some(tally), Some(lb)) => tally.is_satisfied(i128::from(lb)),
                        _ => true,
                    };
                    let upper_ok = match (upper, constraint.upper) {
                        (Some(tally), Some(ub)) => tally.is_satisfied(-i128::from(ub)),
                        _ => true,
                    };
                    lower_ok && upper_ok
                }
            })
    }

    /// False if no extension of this occurrence can satisfy every constraint.
    ///
    /// Each constraint is tested on its own, assuming the best possible choice of the
    /// remaining values in the row. This over-approximates the live embeddings, so no
    /// satisfying occurrence is ever pruned.
    fn is_alive(&self, config: &MiningConfig, row: usize, length: usize) -> bool {
        config
            .constraints
            .iter()
            .zip(&self.aggregates)
            .all(|(constraint, aggregate)| {
                self.is_constraint_alive(constraint, aggregate, row, length)
            })
    }

    fn is_constraint_alive(
        &self,
        constraint: &MiningConstraint,
        aggregate: &Aggregate,
        row: usize,
        length: usize,
    ) -> bool {
        let remaining = constraint.row_len(row) - self.last - 1;
        match aggregate {
            Aggregate::Gap => true,
            Aggregate::Sum(sum) => {
                let sum = *sum;
                let n = length as i128;
                let extended = n + remaining as i128;
                // The mean over any extension lies between the current mean and the mean
                // obtained by taking every remaining value at its extreme.
                let lower_ok = constraint.lower.is_none_or(|lb| {
                    let lb = i128::from(lb);
                    sum >= lb * n
                        || constraint.max_after(row, self.last).is_some_and(|best| {
                            sum + remaining as i128 * i128::from(best) >= lb * extended
                        })
                });
                let upper_ok = constraint.upper.is_none_or(|ub| {
                    let ub = i128::from(ub);
                    sum <= ub * n
                        || constraint.min_after(row, self.last).is_some_and(|best| {
                            sum + remaining as i128 * i128::from(best) <= ub * extended
                        })
                });
                lower_ok && upper_ok
            }
            Aggregate::Range { min, max } => {
                let upper_ok = constraint
                    .upper
                    .is_none_or(|ub| i128::from(*max) - i128::from(*min) <= i128::from(ub));
                let lower_ok = constraint.lower.is_none_or(|lb| {
                    let widest_max = constraint
                        .max_after(row, self.last)
                        .map_or(*max, |it| it.max(*max));
                    let widest_min = constraint
                        .min_after(row, self.last)
                        .map_or(*min, |it| it.min(*min));
                    i128::from(widest_max) - i128::from(widest_min) >= i128::from(lb)
                });
                upper_ok && lower_ok
            }
            Aggregate::Median { lower, upper } => {
                let lower_ok = lower.as_ref().is_none_or(|tally| {
                    tally.is_alive(constraint.meeting_lower_after(row, self.last))
                });
                let upper_ok = upper.as_ref().is_none_or(|tally| {
                    tally.is_alive(constraint.meeting_upper_after(row, self.last))
                });
                lower_ok && upper_ok
            }
        }
    }
}
