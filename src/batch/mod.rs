//! Batched mining for large sequence collections.
//!
//! Rows are shuffled with a seeded generator and split into contiguous batches. Each batch is
//! mined independently with a relaxed threshold (see [`BatchConfig::batch_threshold`]) on a
//! local `rayon` pool. Pattern counts are then summed over all batches and filtered with the
//! original threshold over all rows.
//!
//! Since a batch only reports the patterns that pass its relaxed threshold, a pattern can be
//! undercounted when it is rare in some batch. Small discount factors make this unlikely.
//!
//! # Example
//!
//! ```no_run
//! use seq2pat::batch::{BatchConfig, mine_batched};
//!
//! let sequences = vec![vec![1, 3, 2, 1, 4], vec![3, 2, 1], vec![3, 1, 3, 4]];
//! let patterns = mine_batched(&sequences, &[], 0.5, &BatchConfig::new(2)).unwrap();
//! ```

use crate::constraint::Constraint;
use crate::error::Seq2PatError;
use crate::mining::{MinFrequency, MiningConfig, Pattern, mine, relaxed_row_count, sort_patterns};
use log::{debug, info};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rayon::prelude::*;
use std::collections::BTreeMap;


mod batch_config;

pub use batch_config::BatchConfig;

/// Sessions with more rows than this are mined in batches even without a batch configuration.
pub const AUTO_BATCH_ROW_THRESHOLD: usize = 100_000;

/// Batch size used when batching is turned on automatically.
pub const AUTO_BATCH_SIZE: usize = 10_000;

/// Mine `sequences` in shuffled batches and aggregate the counts.
///
/// `min_frequency` is a fraction of all rows. Every constraint must be aligned with
/// `sequences`; no positional span constraint is added here.
pub fn mine_batched(
    sequences: &[Vec<u32>],
    constraints: &[Constraint],
    min_frequency: f64,
    config: &BatchConfig,
) -> Result<Vec<Pattern<u32>>, Seq2PatError> {
    config.validate()?;
    let min_row_count = MinFrequency::Fraction(min_frequency).row_count(sequences.len())?;

    let order = shuffled_rows(sequences.len(), config.seed);
    let batches: Vec<&[usize]> = order.chunks(config.batch_size).collect();
    let threshold = config.batch_threshold(min_frequency);
    let workers = config.worker_count(num_cpus());

    info!(
        "Mining {} rows in {} batches of {} on {} workers (batch threshold: {:.4}).",
        sequences.len(),
        batches.len(),
        config.batch_size,
        workers,
        threshold
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|index| format!("seq2pat-batch-{index}"))
        .build()?;

    let results = pool.install(|| {
        batches
            .par_iter()
            .enumerate()
            .map(|(index, rows)| mine_batch(index, sequences, constraints, rows, threshold))
            .collect::<Result<Vec<_>, Seq2PatError>>()
    })?;

    let patterns = aggregate_patterns(results, min_row_count);
    info!(
        "Batched mining found {} patterns (min row count: {}).",
        patterns.len(),
        min_row_count
    );
    Ok(patterns)
}

fn mine_batch(
    index: usize,
    sequences: &[Vec<u32>],
    constraints: &[Constraint],
    rows: &[usize],
    threshold: f64,
) -> Result<Vec<Pattern<u32>>, Seq2PatError> {
    let min_row_count = relaxed_row_count(threshold, rows.len());
    let config = MiningConfig::for_rows(sequences, constraints, rows, min_row_count)?;
    let patterns = mine(config)?;
    debug!(
        "[batch:{}] {} rows produced {} patterns (min row count: {}).",
        index,
        rows.len(),
        patterns.len(),
        min_row_count
    );
    Ok(patterns)
}

/// Sum the frequencies of equal patterns across batches and keep those occurring in at least
/// `min_row_count` rows, sorted into the output order.
pub fn aggregate_patterns<T, I>(batches: I, min_row_count: usize) -> Vec<Pattern<T>>
where
    T: Ord,
    I: IntoIterator<Item = Vec<Pattern<T>>>,
{
    let mut counts: BTreeMap<Vec<T>, usize> = BTreeMap::new();
    for pattern in batches.into_iter().flatten() {
        *counts.entry(pattern.items).or_default() += pattern.frequency;
    }
    let mut patterns: Vec<Pattern<T>> = counts
        .into_iter()
        .filter(|(_, frequency)| *frequency >= min_row_count)
        .map(|(items, frequency)| Pattern::new(items, frequency))
        .collect();
    sort_patterns(&mut patterns);
    patterns
}

/// A permutation of `0..rows` determined by `seed`.
pub fn shuffled_rows(rows: usize, seed: u64) -> Vec<usize> {
    let mut order: Vec<usize> = (0..rows).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    order.shuffle(&mut rng);
    order
}

fn num_cpus() -> usize {
    std::thread::available_parallelism()
        .map(|it| it.get())
        .unwrap_or(1)
}
