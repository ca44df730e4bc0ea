//! Tests of the prefix-growth search on integer sequences.
//!
//! Besides small hand-checked examples, every mining result is compared with an exhaustive
//! enumeration of all index subsets of every row ([`enumerate_patterns`]).

#[cfg(feature = "serde")]
mod serialization_tests;

use crate::constraint::{Attribute, Constraint};
use crate::error::Seq2PatError;
use crate::mining::{MinFrequency, MiningConfig, Pattern, PrefixGrowth, PrefixGrowthState, mine};
use crate::mining::{relaxed_row_count, sort_patterns};
use crate::test_utils::{attribute, init_logger};
use cancel_this::Cancellable;
use computation_process::Stateful;
use std::collections::{BTreeMap, BTreeSet};

/// All patterns of at least two items (with exact frequencies) obtained by checking every
/// subset of positions of every row. Rows must be short.
pub fn enumerate_patterns(
    sequences: &[Vec<u32>],
    constraints: &[Constraint],
    min_row_count: usize,
) -> Vec<Pattern<u32>> {
    let mut counts: BTreeMap<Vec<u32>, usize> = BTreeMap::new();
    for (row, sequence) in sequences.iter().enumerate() {
        assert!(sequence.len() <= 16, "Row {row} is too long to enumerate.");
        let mut found: BTreeSet<Vec<u32>> = BTreeSet::new();
        for mask in 1u32..(1 << sequence.len()) {
            if mask.count_ones() < 2 {
                continue;
            }
            let positions: Vec<usize> = (0..sequence.len())
                .filter(|i| mask & (1 << i) != 0)
                .collect();
            if constraints
                .iter()
                .all(|it| it.is_satisfied_at(row, &positions))
            {
                found.insert(positions.iter().map(|p| sequence[*p]).collect());
            }
        }
        for items in found {
            *counts.entry(items).or_default() += 1;
        }
    }
    let mut patterns: Vec<Pattern<u32>> = counts
        .into_iter()
        .filter(|(_, frequency)| *frequency >= min_row_count)
        .map(|(items, frequency)| Pattern::new(items, frequency))
        .collect();
    sort_patterns(&mut patterns);
    patterns
}

/// The running example with integer items: `A = 1`, `B = 2`, `C = 3`, `D = 4`.
fn example_sequences() -> Vec<Vec<u32>> {
    vec![vec![1, 1, 2, 1, 4], vec![3, 2, 1], vec![3, 1, 3, 4]]
}

fn example_price() -> Attribute {
    attribute(vec![vec![5, 5, 3, 8, 2], vec![1, 3, 3], vec![4, 5, 2, 1]])
}

fn items(patterns: &[Pattern<u32>]) -> Vec<(Vec<u32>, usize)> {
    patterns
        .iter()
        .map(|it| (it.items.clone(), it.frequency))
        .collect()
}

#[test]
fn unconstrained_example() -> Cancellable<()> {
    init_logger();
    let config = MiningConfig::new(&example_sequences(), &[], 2).unwrap();
    let patterns = mine(config)?;
    assert_eq!(
        items(&patterns),
        vec![(vec![1, 4], 2), (vec![2, 1], 2), (vec![3, 1], 2)]
    );
    Ok(())
}

#[test]
fn gap_lower_bound_keeps_every_pattern() -> Cancellable<()> {
    init_logger();
    let price = example_price();
    let constraints = vec![price.gap().at_least(-6)];
    let config = MiningConfig::new(&example_sequences(), &constraints, 2).unwrap();
    let patterns = mine(config)?;
    assert_eq!(
        items(&patterns),
        vec![(vec![1, 4], 2), (vec![2, 1], 2), (vec![3, 1], 2)]
    );
    Ok(())
}

#[test]
fn average_constraint_example() -> Cancellable<()> {
    init_logger();
    // A C B A D / C B A / C A C D
    let sequences = vec![vec![1, 3, 2, 1, 4], vec![3, 2, 1], vec![3, 1, 3, 4]];
    let price = example_price();

    let config = MiningConfig::new(&sequences, &[], 2).unwrap();
    let all = mine(config)?;
    assert_eq!(all[0], Pattern::new(vec![3, 1], 3));
    assert_eq!(all.len(), 9);

    let constraints = vec![price.average().between(3, 5)];
    let config = MiningConfig::new(&sequences, &constraints, 2).unwrap();
    assert_eq!(
        items(&mine(config)?),
        vec![(vec![1, 3], 2), (vec![1, 4], 2), (vec![3, 1, 4], 2)]
    );
    Ok(())
}

#[test]
fn frequency_counts_satisfying_rows_only() -> Cancellable<()> {
    init_logger();
    // Every row contains [1, 2], but only the occurrence in row 0 has a small span.
    let sequences = vec![vec![1, 2], vec![1, 9, 2], vec![1, 2]];
    let time = attribute(vec![vec![0, 1], vec![0, 1, 5], vec![0, 3]]);
    let constraints = vec![time.span().at_most(2)];

    let config = MiningConfig::new(&sequences, &constraints, 1).unwrap();
    let patterns = mine(config)?;
    assert_eq!(items(&patterns), vec![(vec![1, 2], 1), (vec![1, 9], 1)]);
    assert_eq!(patterns, enumerate_patterns(&sequences, &constraints, 1));
    Ok(())
}

#[test]
fn extreme_attribute_values_do_not_overflow() -> Cancellable<()> {
    init_logger();
    // Differences and sums of the first row leave the `i64` range.
    let sequences = vec![vec![1, 2], vec![1, 2]];
    let values = attribute(vec![vec![i64::MIN, i64::MAX], vec![0, 1]]);
    let cases = vec![
        (values.gap().at_most(5), 1),
        (values.gap().at_least(i64::MIN), 2),
        (values.span().at_least(1), 2),
        (values.span().at_most(i64::MAX), 1),
        (values.average().at_least(0), 1),
        (values.median().at_most(0), 1),
        (values.median().between(i64::MIN, i64::MAX), 2),
    ];
    for (constraint, frequency) in cases {
        let constraints = vec![constraint];
        let config = MiningConfig::new(&sequences, &constraints, 1).unwrap();
        let patterns = mine(config)?;
        assert_eq!(
            items(&patterns),
            vec![(vec![1, 2], frequency)],
            "Unexpected patterns for {constraints:?}."
        );
        assert_eq!(patterns, enumerate_patterns(&sequences, &constraints, 1));
    }
    Ok(())
}

/// Mine under each constraint set of `chain`, where every set is looser than the previous
/// one, and check that patterns are never lost and frequencies never drop.
fn assert_monotone(
    sequences: &[Vec<u32>],
    chain: &[Vec<Constraint>],
    min_row_count: usize,
) -> Cancellable<()> {
    let mut previous: Option<Vec<Pattern<u32>>> = None;
    for constraints in chain {
        let config = MiningConfig::new(sequences, constraints, min_row_count).unwrap();
        let patterns = mine(config)?;
        let found: BTreeMap<Vec<u32>, usize> = patterns
            .iter()
            .map(|it| (it.items.clone(), it.frequency))
            .collect();
        for pattern in previous.iter().flatten() {
            let frequency = found.get(&pattern.items).copied().unwrap_or(0);
            assert!(
                frequency >= pattern.frequency,
                "{:?} dropped from {} to {} under {constraints:?}.",
                pattern.items,
                pattern.frequency,
                frequency
            );
        }
        previous = Some(patterns);
    }
    Ok(())
}

#[test]
fn looser_bounds_never_lose_patterns() -> Cancellable<()> {
    init_logger();
    let sequences = example_sequences();
    let price = example_price();
    let chains = vec![
        vec![
            vec![price.average().between(3, 4)],
            vec![price.average().between(2, 5)],
            vec![price.average().at_least(2)],
            vec![],
        ],
        vec![
            vec![price.gap().between(-1, 1)],
            vec![price.gap().between(-3, 3)],
            vec![price.gap().at_least(-3)],
            vec![],
        ],
        vec![
            vec![price.median().between(3, 4)],
            vec![price.median().between(2, 6)],
            vec![price.median().at_most(6)],
            vec![],
        ],
        vec![
            vec![price.span().between(1, 2)],
            vec![price.span().between(0, 4)],
            vec![price.span().at_most(4)],
            vec![],
        ],
        vec![
            vec![price.average().between(3, 4), price.span().at_most(3)],
            vec![price.average().between(3, 4)],
            vec![],
        ],
    ];
    for chain in &chains {
        for min_row_count in [1, 2] {
            assert_monotone(&sequences, chain, min_row_count)?;
        }
    }

    // The tightest average bound still leaves something to lose.
    let constraints = vec![price.average().between(3, 4)];
    let config = MiningConfig::new(&sequences, &constraints, 1).unwrap();
    assert!(!mine(config)?.is_empty());
    Ok(())
}

#[test]
fn unbounded_constraints_are_ignored() {
    init_logger();
    let price = example_price();
    let constraints = vec![price.median()];
    let config = MiningConfig::new(&example_sequences(), &constraints, 2).unwrap();
    assert!(config.constraints.is_empty());
}

#[test]
fn misaligned_constraint_is_rejected() {
    init_logger();
    let short = attribute(vec![vec![1, 2], vec![1, 2, 3], vec![1, 2, 3, 4]]);
    let constraints = vec![short.average().at_least(1)];
    assert!(matches!(
        MiningConfig::new(&example_sequences(), &constraints, 2),
        Err(Seq2PatError::RowLengthMismatch { row: 0, .. })
    ));
}

#[test]
fn rows_are_selected_together_with_attributes() -> Cancellable<()> {
    init_logger();
    let price = example_price();
    let constraints = vec![price.average().between(3, 4)];
    // Rows 2 and 0, in this order.
    let config = MiningConfig::for_rows(&example_sequences(), &constraints, &[2, 0], 2).unwrap();
    assert_eq!(config.sequences, vec![vec![3, 1, 3, 4], vec![1, 1, 2, 1, 4]]);
    assert_eq!(items(&mine(config)?), vec![(vec![1, 4], 2)]);
    Ok(())
}

#[test]
fn search_can_be_limited() {
    init_logger();
    let mut config = MiningConfig::new(&example_sequences(), &[], 1).unwrap();
    config.max_expanded_prefixes = 2;
    assert!(mine(config).is_err());
}

#[test]
fn generator_reports_patterns_incrementally() -> Cancellable<()> {
    init_logger();
    let config = MiningConfig::new(&example_sequences(), &[], 2).unwrap();
    let state = PrefixGrowthState::from(&config);
    let mut generator = PrefixGrowth::configure(config.clone(), state);

    let first = generator.next().expect("At least one pattern is expected.")?;
    let mut rest = Vec::new();
    for pattern in generator {
        rest.push(pattern?);
    }
    rest.push(first);
    sort_patterns(&mut rest);
    assert_eq!(rest, mine(config)?);
    Ok(())
}

#[test]
fn frequency_thresholds() {
    assert_eq!(MinFrequency::Fraction(0.4).row_count(5).unwrap(), 2);
    assert_eq!(MinFrequency::Fraction(1.0).row_count(3).unwrap(), 3);
    assert_eq!(MinFrequency::Fraction(0.5).row_count(3).unwrap(), 2);
    assert_eq!(MinFrequency::from(2).row_count(3).unwrap(), 2);
    assert_eq!(MinFrequency::from(2).fraction(4).unwrap(), 0.5);

    assert!(matches!(
        MinFrequency::Fraction(0.4).row_count(2),
        Err(Seq2PatError::FrequencyFractionTooSmall { rows: 2, .. })
    ));
    assert!(matches!(
        MinFrequency::Fraction(-1.0).row_count(3),
        Err(Seq2PatError::FrequencyFractionOutOfRange(_))
    ));
    assert!(matches!(
        MinFrequency::Fraction(1.5).row_count(3),
        Err(Seq2PatError::FrequencyFractionOutOfRange(_))
    ));
    assert!(matches!(
        MinFrequency::Count(0).row_count(3),
        Err(Seq2PatError::FrequencyCountOutOfRange { count: 0, rows: 3 })
    ));
    assert!(matches!(
        MinFrequency::Count(4).row_count(3),
        Err(Seq2PatError::FrequencyCountOutOfRange { count: 4, rows: 3 })
    ));

    assert_eq!(relaxed_row_count(0.04, 10), 1);
    assert_eq!(relaxed_row_count(0.5, 3), 2);
    assert_eq!(relaxed_row_count(1.0, 0), 1);
}
