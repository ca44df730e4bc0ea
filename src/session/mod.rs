//! Mining sessions.
//!
//! A [`Seq2Pat`] session owns a validated sequence collection and its constraint store.
//! Creating a session registers a span constraint on the event index (see
//! [`Seq2PatConfig::max_span`]), which bounds the length of pattern occurrences and keeps the
//! search tractable. Each call to [`Seq2Pat::get_patterns`] runs an independent search.
//!
//! # Example
//!
//! ```no_run
//! use seq2pat::constraint::Attribute;
//! use seq2pat::session::Seq2Pat;
//!
//! let mut seq2pat = Seq2Pat::new(vec![
//!     vec!["A", "A", "B", "A", "D"],
//!     vec!["C", "B", "A"],
//!     vec!["C", "A", "C", "D"],
//! ])
//! .unwrap();
//!
//! let price = Attribute::new(vec![vec![5, 5, 3, 8, 2], vec![1, 3, 3], vec![4, 5, 2, 1]]).unwrap();
//! seq2pat.add_constraint(price.average().between(3, 4)).unwrap();
//!
//! let patterns = seq2pat.get_patterns(2).unwrap();
//! assert_eq!(patterns[0].items, vec!["A", "D"]);
//! ```

use crate::batch::{AUTO_BATCH_ROW_THRESHOLD, AUTO_BATCH_SIZE, BatchConfig, mine_batched};
use crate::constraint::{Attribute, Constraint, ConstraintHandle, ConstraintStore};
use crate::error::Seq2PatError;
use crate::item::{Item, ItemAlphabet, validate_sequences};
use crate::mining::{MinFrequency, MiningConfig, Pattern, mine, sort_patterns};
use crate::item_type_name;
use log::{debug, info};


mod session_config;

pub use session_config::Seq2PatConfig;

/// A mining session over one sequence collection.
pub struct Seq2Pat<T: Item> {
    sequences: Vec<Vec<T>>,
    alphabet: ItemAlphabet<T>,
    encoded: Vec<Vec<u32>>,
    store: ConstraintStore,
    config: Seq2PatConfig,
    max_span: Option<ConstraintHandle>,
}

impl<T: Item> Seq2Pat<T> {
    /// Create a session with the default [`Seq2PatConfig`].
    pub fn new(sequences: Vec<Vec<T>>) -> Result<Seq2Pat<T>, Seq2PatError> {
        Seq2Pat::with_config(sequences, Seq2PatConfig::new())
    }

    pub fn with_config(
        sequences: Vec<Vec<T>>,
        config: Seq2PatConfig,
    ) -> Result<Seq2Pat<T>, Seq2PatError> {
        validate_sequences(&sequences)?;
        config.validate()?;

        let alphabet = ItemAlphabet::from_rows(&sequences);
        let encoded: Vec<Vec<u32>> = sequences.iter().map(|it| alphabet.encode(it)).collect();
        let row_lengths: Vec<usize> = sequences.iter().map(|it| it.len()).collect();

        let mut store = ConstraintStore::new(row_lengths);
        let max_span = match config.max_span {
            Some(max_span) => {
                let positions = Attribute::positions(store.row_lengths())?;
                let bound = i64::try_from(max_span - 1).unwrap_or(i64::MAX);
                Some(store.add(positions.span().at_most(bound))?)
            }
            None => None,
        };

        info!(
            "Created session with {} rows over {} distinct `{}` items (max_span: {:?}).",
            sequences.len(),
            alphabet.len(),
            item_type_name::<T>(),
            config.max_span
        );

        Ok(Seq2Pat {
            sequences,
            alphabet,
            encoded,
            store,
            config,
            max_span,
        })
    }

    pub fn sequences(&self) -> &[Vec<T>] {
        &self.sequences
    }

    pub fn num_rows(&self) -> usize {
        self.sequences.len()
    }

    pub fn config(&self) -> &Seq2PatConfig {
        &self.config
    }

    pub fn constraints(&self) -> &ConstraintStore {
        &self.store
    }

    /// Handle of the automatically registered event index span constraint, if any.
    pub fn max_span_constraint(&self) -> Option<ConstraintHandle> {
        self.max_span
    }

    /// Register a constraint, see [`ConstraintStore::add`].
    pub fn add_constraint(
        &mut self,
        constraint: Constraint,
    ) -> Result<ConstraintHandle, Seq2PatError> {
        self.store.add(constraint)
    }

    /// Remove a registered constraint, see [`ConstraintStore::remove`].
    pub fn remove_constraint(
        &mut self,
        handle: ConstraintHandle,
    ) -> Result<Constraint, Seq2PatError> {
        let removed = self.store.remove(handle)?;
        if self.max_span == Some(handle) {
            self.max_span = None;
        }
        Ok(removed)
    }

    /// Mine all patterns of at least two items that satisfy every registered constraint in
    /// at least `min_frequency` rows.
    ///
    /// Patterns are sorted by decreasing frequency, ties by ascending items.
    pub fn get_patterns(
        &self,
        min_frequency: impl Into<MinFrequency>,
    ) -> Result<Vec<Pattern<T>>, Seq2PatError> {
        let min_frequency = min_frequency.into();
        let rows = self.num_rows();
        let min_row_count = min_frequency.row_count(rows)?;
        let constraints: Vec<Constraint> = self.store.constraints().cloned().collect();

        let batch = self.config.batch.clone().or_else(|| {
            (rows > AUTO_BATCH_ROW_THRESHOLD).then(|| BatchConfig::new(AUTO_BATCH_SIZE))
        });

        let patterns = match batch {
            Some(batch) => {
                let fraction = min_frequency.fraction(rows)?;
                mine_batched(&self.encoded, &constraints, fraction, &batch)?
            }
            None => {
                let mut config = MiningConfig::new(&self.encoded, &constraints, min_row_count)?;
                config.max_expanded_prefixes = self.config.max_expanded_prefixes;
                if self.config.isolate {
                    run_isolated(config)?
                } else {
                    mine(config)?
                }
            }
        };

        let mut patterns: Vec<Pattern<T>> = patterns
            .into_iter()
            .map(|it| Pattern::new(self.alphabet.decode(&it.items), it.frequency))
            .collect();
        sort_patterns(&mut patterns);
        Ok(patterns)
    }
}

/// Run one search on a dedicated single-thread pool and block until it returns. The pool and
/// all memory owned by the search are released before this function returns.
fn run_isolated(config: MiningConfig) -> Result<Vec<Pattern<u32>>, Seq2PatError> {
    let worker = rayon::ThreadPoolBuilder::new()
        .num_threads(1)
        .thread_name(|_| "seq2pat-miner".to_string())
        .build()?;
    debug!("Started isolated mining worker.");
    let patterns = worker.install(|| mine(config))?;
    Ok(patterns)
}
