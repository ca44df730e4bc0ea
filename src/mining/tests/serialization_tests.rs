//! Tests for serialization of the prefix-growth search.
//!
//! A generator is serialized after it reports its first pattern. The deserialized generator
//! must report exactly the remaining patterns.

use crate::mining::tests::{example_price, example_sequences};
use crate::mining::{MiningConfig, Pattern, PrefixGrowth, PrefixGrowthState, mine, sort_patterns};
use crate::test_utils::init_logger;
use cancel_this::Cancellable;
use computation_process::Stateful;

fn resume_after_first_pattern(config: MiningConfig) -> Cancellable<Vec<Pattern<u32>>> {
    let state = PrefixGrowthState::from(&config);
    let mut generator = PrefixGrowth::configure(config, state);

    let mut patterns = Vec::new();
    if let Some(first) = generator.next() {
        patterns.push(first?);
    }

    let json = serde_json::to_string(&generator).expect("Failed to serialize PrefixGrowth");
    let resumed: PrefixGrowth =
        serde_json::from_str(&json).expect("Failed to deserialize PrefixGrowth");

    for pattern in resumed {
        patterns.push(pattern?);
    }
    sort_patterns(&mut patterns);
    Ok(patterns)
}

#[test]
fn test_resume_unconstrained() -> Cancellable<()> {
    init_logger();
    let config = MiningConfig::new(&example_sequences(), &[], 1).unwrap();
    assert_eq!(resume_after_first_pattern(config.clone())?, mine(config)?);
    Ok(())
}

#[test]
fn test_resume_constrained() -> Cancellable<()> {
    init_logger();
    let price = example_price();
    let constraints = vec![
        price.median().between(3, 4),
        price.span().at_most(6),
        price.gap().at_least(-6),
    ];
    let config = MiningConfig::new(&example_sequences(), &constraints, 1).unwrap();
    assert_eq!(resume_after_first_pattern(config.clone())?, mine(config)?);
    Ok(())
}

#[test]
fn test_config_roundtrip() {
    init_logger();
    let price = example_price();
    let constraints = vec![price.average().between(3, 4)];
    let config = MiningConfig::new(&example_sequences(), &constraints, 2).unwrap();
    let json = serde_json::to_string(&config).expect("Failed to serialize MiningConfig");
    let restored: MiningConfig =
        serde_json::from_str(&json).expect("Failed to deserialize MiningConfig");
    assert_eq!(restored.sequences, config.sequences);
    assert_eq!(restored.min_row_count, 2);
    assert_eq!(restored.constraints.len(), 1);
    assert_eq!(restored.constraints[0].lower, Some(3));
}
