//! Pattern occurrence features.
//!
//! [`FeatureEncoder::encode`] turns a list of patterns into a 0/1 matrix with one row per
//! sequence and one column per pattern. A cell is `1` when the verifier finds the pattern in
//! the sequence subject to all given constraints.
//!
//! # Example
//!
//! ```no_run
//! use seq2pat::encoding::{FeatureEncoder, PatternList};
//!
//! let sequences = vec![vec!["A", "A", "B", "A", "D"], vec!["C", "B", "A"]];
//! let patterns = PatternList::Bare(vec![vec!["A", "D"], vec!["B", "A"]]);
//! let table = FeatureEncoder::new().encode(&sequences, patterns, &[]).unwrap();
//! assert_eq!(table.rows, vec![vec![1, 1], vec![0, 1]]);
//! ```

use crate::constraint::Constraint;
use crate::error::Seq2PatError;
use crate::item::{Item, ItemAlphabet, validate_sequences};
use crate::mining::Pattern;
use crate::verifier::{SubsequenceVerifier, VerifierStrategy};
use log::{debug, info};

#[cfg(test)]
mod tests;

/// Patterns to encode.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PatternList<T> {
    /// Mining output, still carrying frequencies.
    Mined(Vec<Pattern<T>>),
    /// Item lists without frequencies.
    Bare(Vec<Vec<T>>),
}

impl<T> From<Vec<Pattern<T>>> for PatternList<T> {
    fn from(value: Vec<Pattern<T>>) -> Self {
        PatternList::Mined(value)
    }
}

impl<T> From<Vec<Vec<T>>> for PatternList<T> {
    fn from(value: Vec<Vec<T>>) -> Self {
        PatternList::Bare(value)
    }
}

/// A configuration object for feature encoding.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FeatureEncoder {
    /// The verifier deciding each cell (default: local with a window of 10 events).
    pub verifier: VerifierStrategy,
    /// Accept mined patterns and ignore their frequencies (default: `true`). When disabled,
    /// only bare patterns are accepted.
    pub drop_pattern_frequency: bool,
}

impl Default for FeatureEncoder {
    fn default() -> Self {
        FeatureEncoder::new()
    }
}

impl From<VerifierStrategy> for FeatureEncoder {
    fn from(value: VerifierStrategy) -> Self {
        FeatureEncoder {
            verifier: value,
            ..FeatureEncoder::new()
        }
    }
}

/// One row per sequence, one 0/1 column per pattern.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FeatureTable<T> {
    pub sequences: Vec<Vec<T>>,
    /// Column names, `feature_0` to `feature_{k-1}`.
    pub columns: Vec<String>,
    pub rows: Vec<Vec<u8>>,
}

impl<T> FeatureTable<T> {
    pub fn num_features(&self) -> usize {
        self.columns.len()
    }

    /// All values of one feature column.
    pub fn column(&self, feature: usize) -> Vec<u8> {
        self.rows.iter().map(|it| it[feature]).collect()
    }
}

impl FeatureEncoder {
    /// Create a new [`FeatureEncoder`] using the local verifier with a window of 10 events.
    pub fn new() -> FeatureEncoder {
        FeatureEncoder {
            verifier: VerifierStrategy::default(),
            drop_pattern_frequency: true,
        }
    }

    /// Encode `patterns` over `sequences`. Every constraint must be aligned with
    /// `sequences` (one attribute value per event).
    pub fn encode<T: Item>(
        &self,
        sequences: &[Vec<T>],
        patterns: impl Into<PatternList<T>>,
        constraints: &[Constraint],
    ) -> Result<FeatureTable<T>, Seq2PatError> {
        validate_sequences(sequences)?;
        let row_lengths: Vec<usize> = sequences.iter().map(|it| it.len()).collect();
        for constraint in constraints {
            constraint.attribute().check_aligned(&row_lengths)?;
        }
        let patterns = self.bare_patterns(patterns.into())?;

        let alphabet = ItemAlphabet::from_rows(sequences.iter().chain(patterns.iter()));
        let encoded_patterns: Vec<Vec<u32>> =
            patterns.iter().map(|it| alphabet.encode(it)).collect();

        info!(
            "Encoding {} patterns over {} sequences ({:?}).",
            patterns.len(),
            sequences.len(),
            self.verifier
        );

        let mut rows = Vec::with_capacity(sequences.len());
        for (row, sequence) in sequences.iter().enumerate() {
            let sequence = alphabet.encode(sequence);
            let mut features = Vec::with_capacity(encoded_patterns.len());
            for pattern in &encoded_patterns {
                let found = self
                    .verifier
                    .contains(&sequence, row, pattern, constraints)?;
                features.push(u8::from(found));
            }
            debug!("[row:{}] Features: {:?}.", row, features);
            rows.push(features);
        }

        Ok(FeatureTable {
            sequences: sequences.to_vec(),
            columns: (0..patterns.len()).map(|i| format!("feature_{i}")).collect(),
            rows,
        })
    }

    fn bare_patterns<T: Item>(&self, patterns: PatternList<T>) -> Result<Vec<Vec<T>>, Seq2PatError> {
        let patterns = match patterns {
            PatternList::Mined(_) if !self.drop_pattern_frequency => {
                return Err(Seq2PatError::PatternCarriesFrequency);
            }
            PatternList::Mined(patterns) => patterns.into_iter().map(|it| it.items).collect(),
            PatternList::Bare(patterns) => patterns,
        };
        if let Some(index) = patterns.iter().position(|it| it.is_empty()) {
            return Err(Seq2PatError::EmptyPattern(index));
        }
        Ok(patterns)
    }
}
