//! Dichotomic pattern mining.
//!
//! Given a positive and a negative group of sequences (for example, sessions that ended with
//! a purchase and sessions that did not), patterns are mined separately in each group and
//! then combined into a single list with one of the [`DichotomicAggregation`] operations.

use crate::error::Seq2PatError;
use crate::item::Item;
use crate::mining::{MinFrequency, Pattern};
use crate::session::Seq2Pat;
use log::info;
use std::collections::{BTreeMap, BTreeSet};

#[cfg(test)]
mod tests;

/// How the patterns of the two groups are combined.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DichotomicAggregation {
    /// Patterns frequent in at least one group.
    Union,
    /// Patterns frequent in both groups.
    Intersection,
    /// Patterns frequent only in the positive group.
    UniquePositive,
    /// Patterns frequent only in the negative group.
    UniqueNegative,
}

impl DichotomicAggregation {
    pub const ALL: [DichotomicAggregation; 4] = [
        DichotomicAggregation::Union,
        DichotomicAggregation::Intersection,
        DichotomicAggregation::UniquePositive,
        DichotomicAggregation::UniqueNegative,
    ];
}

/// Combine two pattern lists by item content. Frequencies are ignored and the result is
/// sorted by ascending items without duplicates.
pub fn aggregate<T: Item>(
    positive: &[Pattern<T>],
    negative: &[Pattern<T>],
    aggregation: DichotomicAggregation,
) -> Vec<Vec<T>> {
    let positive: BTreeSet<&Vec<T>> = positive.iter().map(|it| &it.items).collect();
    let negative: BTreeSet<&Vec<T>> = negative.iter().map(|it| &it.items).collect();
    let result: Vec<&Vec<T>> = match aggregation {
        DichotomicAggregation::Union => positive.union(&negative).copied().collect(),
        DichotomicAggregation::Intersection => {
            positive.intersection(&negative).copied().collect()
        }
        DichotomicAggregation::UniquePositive => {
            positive.difference(&negative).copied().collect()
        }
        DichotomicAggregation::UniqueNegative => {
            negative.difference(&positive).copied().collect()
        }
    };
    result.into_iter().cloned().collect()
}

/// Mine both groups (each with its own constraints and threshold) and compute every
/// aggregation of the two results.
pub fn dichotomic_pattern_mining<T: Item>(
    positive: &Seq2Pat<T>,
    negative: &Seq2Pat<T>,
    min_frequency_positive: impl Into<MinFrequency>,
    min_frequency_negative: impl Into<MinFrequency>,
) -> Result<BTreeMap<DichotomicAggregation, Vec<Vec<T>>>, Seq2PatError> {
    let positive_patterns = positive.get_patterns(min_frequency_positive)?;
    let negative_patterns = negative.get_patterns(min_frequency_negative)?;
    info!(
        "Dichotomic mining found {} positive and {} negative patterns.",
        positive_patterns.len(),
        negative_patterns.len()
    );

    Ok(DichotomicAggregation::ALL
        .into_iter()
        .map(|aggregation| {
            let patterns = aggregate(&positive_patterns, &negative_patterns, aggregation);
            (aggregation, patterns)
        })
        .collect())
}
