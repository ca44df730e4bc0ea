//! Frequent sequential pattern mining under aggregate constraints.
//!
//! The search grows patterns one item at a time (depth-first prefix growth). For every row,
//! each prefix keeps the set of its live occurrences ([`Embedding`]): the position of the
//! last matched item and a running aggregate per constraint. An occurrence is discarded as
//! soon as no extension of it can satisfy some constraint, and a prefix is discarded as soon
//! as fewer than [`MiningConfig::min_row_count`] rows keep a live occurrence.
//!
//! A prefix is reported as a [`Pattern`] when it has at least two items and at least
//! `min_row_count` rows contain an occurrence that satisfies every constraint. Its frequency
//! is the number of such rows.
//!
//! The search is exposed as a [`computation_process::Generator`] ([`PrefixGrowth`]), so it
//! can be interrupted, resumed, and (with the `serde` feature) persisted. The [`mine`]
//! function runs it to completion and sorts the result.
//!
//! # Example
//!
//! ```no_run
//! use seq2pat::mining::{MiningConfig, mine};
//!
//! let sequences = vec![vec![1, 3, 2, 1, 4], vec![3, 2, 1], vec![3, 1, 3, 4]];
//! let config = MiningConfig::new(&sequences, &[], 2).unwrap();
//! let patterns = mine(config).unwrap();
//! assert_eq!(patterns[0].items, vec![3, 1]);
//! ```

use cancel_this::Cancellable;
use computation_process::{Generator, Stateful};
use log::info;
use std::cmp::Ordering;

#[cfg(test)]
mod tests;

mod embedding;
mod min_frequency;
mod mining_config;
mod prefix_growth;

pub use embedding::Embedding;
pub use min_frequency::MinFrequency;
pub(crate) use min_frequency::{relaxed_row_count, validate_fraction};
pub use mining_config::{MiningConfig, MiningConstraint};
pub use prefix_growth::{PrefixGrowthState, PrefixGrowthStep};

/// Depth-first prefix-growth search yielding every reported pattern (in search order).
pub type PrefixGrowth = Generator<MiningConfig, PrefixGrowthState, Pattern<u32>, PrefixGrowthStep>;

/// A frequent pattern: its items and the number of rows in which it occurs as a
/// constraint-satisfying subsequence.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pattern<T> {
    pub items: Vec<T>,
    pub frequency: usize,
}

impl<T> Pattern<T> {
    pub fn new(items: Vec<T>, frequency: usize) -> Pattern<T> {
        Pattern { items, frequency }
    }

    /// Translate the items of this pattern, keeping the frequency.
    pub fn map<R>(self, f: impl FnMut(T) -> R) -> Pattern<R> {
        Pattern {
            items: self.items.into_iter().map(f).collect(),
            frequency: self.frequency,
        }
    }
}

/// Output order: most frequent first, ties broken by ascending item content.
pub fn compare_patterns<T: Ord>(a: &Pattern<T>, b: &Pattern<T>) -> Ordering {
    b.frequency
        .cmp(&a.frequency)
        .then_with(|| a.items.cmp(&b.items))
}

/// Sort patterns into the output order, see [`compare_patterns`].
pub fn sort_patterns<T: Ord>(patterns: &mut [Pattern<T>]) {
    patterns.sort_by(compare_patterns);
}

/// Strip the frequencies, keeping only the item content.
pub fn drop_frequency<T: Clone>(patterns: &[Pattern<T>]) -> Vec<Vec<T>> {
    patterns.iter().map(|it| it.items.clone()).collect()
}

/// Run the prefix-growth search to completion and return sorted patterns.
pub fn mine(config: MiningConfig) -> Cancellable<Vec<Pattern<u32>>> {
    info!(
        "Mining {} rows with {} constraints (min row count: {}).",
        config.num_rows(),
        config.constraints.len(),
        config.min_row_count
    );
    let state = PrefixGrowthState::from(&config);
    let mut patterns = Vec::new();
    for pattern in PrefixGrowth::configure(config, state) {
        patterns.push(pattern?);
    }
    sort_patterns(&mut patterns);
    info!("Mining found {} patterns.", patterns.len());
    Ok(patterns)
}
