use crate::encoding::{FeatureEncoder, PatternList};
use crate::error::Seq2PatError;
use crate::mining::Pattern;
use crate::session::Seq2Pat;
use crate::test_utils::{attribute, init_logger, shopping_price, shopping_sequences};
use crate::verifier::{ConstraintProgramming, RollingWindow, VerifierStrategy};

fn strings(patterns: &[&[&str]]) -> Vec<Vec<String>> {
    patterns
        .iter()
        .map(|it| it.iter().map(|item| item.to_string()).collect())
        .collect()
}

#[test]
fn unconstrained_features() -> Result<(), Seq2PatError> {
    init_logger();
    let patterns = strings(&[&["A", "D"], &["B", "A"], &["C", "A"]]);
    let table = FeatureEncoder::new().encode(&shopping_sequences(), patterns, &[])?;
    assert_eq!(table.columns, vec!["feature_0", "feature_1", "feature_2"]);
    assert_eq!(table.rows, vec![vec![1, 1, 0], vec![0, 1, 1], vec![1, 0, 1]]);
    assert_eq!(table.column(2), vec![0, 1, 1]);
    assert_eq!(table.num_features(), 3);
    assert_eq!(table.sequences, shopping_sequences());
    Ok(())
}

#[test]
fn constrained_features_with_both_verifiers() -> Result<(), Seq2PatError> {
    init_logger();
    let constraints = vec![shopping_price().median().between(3, 4)];
    for verifier in [
        VerifierStrategy::Local(RollingWindow::new(10)),
        VerifierStrategy::Global(ConstraintProgramming::new()),
    ] {
        let encoder = FeatureEncoder::from(verifier);
        let patterns = strings(&[&["A", "D"]]);
        let table = encoder.encode(&shopping_sequences(), patterns, &constraints)?;
        assert_eq!(table.rows, vec![vec![1], vec![0], vec![1]]);
    }
    Ok(())
}

#[test]
fn mined_patterns_are_encoded() -> Result<(), Seq2PatError> {
    init_logger();
    let mut seq2pat = Seq2Pat::new(shopping_sequences())?;
    let constraint = shopping_price().average().between(3, 4);
    seq2pat.add_constraint(constraint.clone())?;
    let patterns = seq2pat.get_patterns(2)?;

    let table = FeatureEncoder::new().encode(seq2pat.sequences(), patterns, &[constraint])?;
    // Every mined pattern is found in exactly `frequency` rows.
    assert_eq!(table.rows, vec![vec![1], vec![0], vec![1]]);
    Ok(())
}

#[test]
fn unknown_items_never_match() -> Result<(), Seq2PatError> {
    init_logger();
    let patterns = strings(&[&["A", "Z"], &["Z"]]);
    let table = FeatureEncoder::new().encode(&shopping_sequences(), patterns, &[])?;
    assert_eq!(table.rows, vec![vec![0, 0], vec![0, 0], vec![0, 0]]);
    Ok(())
}

#[test]
fn pattern_list_validation() {
    init_logger();
    let mined = vec![Pattern::new(vec!["A".to_string(), "D".to_string()], 2)];
    let encoder = FeatureEncoder {
        drop_pattern_frequency: false,
        ..FeatureEncoder::new()
    };
    assert!(matches!(
        encoder.encode(&shopping_sequences(), mined.clone(), &[]),
        Err(Seq2PatError::PatternCarriesFrequency)
    ));
    assert!(FeatureEncoder::new()
        .encode(&shopping_sequences(), PatternList::Mined(mined), &[])
        .is_ok());

    let patterns = strings(&[&["A"], &[]]);
    assert!(matches!(
        FeatureEncoder::new().encode(&shopping_sequences(), patterns, &[]),
        Err(Seq2PatError::EmptyPattern(1))
    ));
}

#[test]
fn misaligned_constraints_are_rejected() {
    init_logger();
    let short = attribute(vec![vec![1, 2], vec![1, 2, 3]]);
    let patterns = strings(&[&["A", "D"]]);
    assert!(matches!(
        FeatureEncoder::new().encode(
            &shopping_sequences(),
            patterns,
            &[short.average().at_least(1)]
        ),
        Err(Seq2PatError::RowCountMismatch {
            expected: 3,
            found: 2
        })
    ));
}
