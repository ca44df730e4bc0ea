use crate::dichotomic::{DichotomicAggregation, aggregate, dichotomic_pattern_mining};
use crate::error::Seq2PatError;
use crate::mining::Pattern;
use crate::session::Seq2Pat;
use crate::test_utils::{init_logger, string_sequences};

fn patterns(items: &[&[&'static str]]) -> Vec<Pattern<&'static str>> {
    items.iter().map(|it| Pattern::new(it.to_vec(), 2)).collect()
}

#[test]
fn aggregations_by_item_content() {
    init_logger();
    let positive = patterns(&[&["A", "D"], &["C", "A"]]);
    let negative = patterns(&[&["A", "D"], &["B", "A"]]);

    assert_eq!(
        aggregate(&positive, &negative, DichotomicAggregation::Union),
        vec![vec!["A", "D"], vec!["B", "A"], vec!["C", "A"]]
    );
    assert_eq!(
        aggregate(&positive, &negative, DichotomicAggregation::Intersection),
        vec![vec!["A", "D"]]
    );
    assert_eq!(
        aggregate(&positive, &negative, DichotomicAggregation::UniquePositive),
        vec![vec!["C", "A"]]
    );
    assert_eq!(
        aggregate(&positive, &negative, DichotomicAggregation::UniqueNegative),
        vec![vec!["B", "A"]]
    );
}

#[test]
fn frequencies_do_not_affect_aggregation() {
    init_logger();
    let positive = vec![Pattern::new(vec![1u32, 2], 5)];
    let negative = vec![Pattern::new(vec![1u32, 2], 3)];
    assert_eq!(
        aggregate(&positive, &negative, DichotomicAggregation::Intersection),
        vec![vec![1, 2]]
    );
    assert!(aggregate(&positive, &negative, DichotomicAggregation::UniquePositive).is_empty());
}

#[test]
fn mining_both_groups() -> Result<(), Seq2PatError> {
    init_logger();
    let positive = Seq2Pat::new(string_sequences(&[
        &["A", "A", "B", "A", "D"],
        &["C", "B", "A"],
        &["C", "A", "C", "D"],
    ]))?;
    let negative = Seq2Pat::new(string_sequences(&[
        &["A", "D"],
        &["C", "B", "A"],
        &["B", "A", "D"],
    ]))?;

    let result = dichotomic_pattern_mining(&positive, &negative, 2, 2)?;
    assert_eq!(result.len(), 4);

    let words = |aggregation: DichotomicAggregation| -> Vec<String> {
        result[&aggregation].iter().map(|it| it.concat()).collect()
    };
    assert_eq!(words(DichotomicAggregation::Union), vec!["AD", "BA", "CA"]);
    assert_eq!(words(DichotomicAggregation::Intersection), vec!["AD", "BA"]);
    assert_eq!(words(DichotomicAggregation::UniquePositive), vec!["CA"]);
    assert!(words(DichotomicAggregation::UniqueNegative).is_empty());
    Ok(())
}
