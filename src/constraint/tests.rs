use crate::constraint::{Attribute, ConstraintKind, ConstraintStore};
use crate::error::Seq2PatError;
use crate::test_utils::{attribute, init_logger, shopping_price};

#[test]
fn statistics_on_picked_values() {
    init_logger();
    let values = attribute(vec![vec![1, 2, 3, 4]]);

    // Mean of [1, 2, 4] is 7/3.
    assert!(values.average().between(2, 3).is_satisfied_by(&[1, 2, 4]));
    assert!(!values.average().at_least(3).is_satisfied_by(&[1, 2, 4]));

    assert!(values.gap().between(1, 2).is_satisfied_by(&[1, 2, 4]));
    assert!(!values.gap().at_most(1).is_satisfied_by(&[1, 2, 4]));
    assert!(values.gap().at_least(-1).is_satisfied_by(&[4, 3]));
    assert!(values.gap().between(5, 6).is_satisfied_by(&[4]));

    // Median of an even count is the mean of the middle values: (2 + 3) / 2 = 2.5.
    assert!(values.median().between(2, 3).is_satisfied_by(&[4, 2, 3, 1]));
    assert!(!values.median().at_least(3).is_satisfied_by(&[4, 2, 3, 1]));
    assert!(!values.median().at_most(2).is_satisfied_by(&[4, 2, 3, 1]));
    assert!(values.median().between(3, 3).is_satisfied_by(&[9, 3, 1]));

    assert!(values.span().at_most(3).is_satisfied_by(&[4, 1, 2]));
    assert!(!values.span().at_most(2).is_satisfied_by(&[4, 1, 2]));

    assert!(values.span().between(5, 6).is_satisfied_by(&[]));
}

#[test]
fn statistics_at_positions() {
    init_logger();
    let price = shopping_price();
    // Row 0 prices are [5, 5, 3, 8, 2], positions 1 and 4 pick [5, 2].
    assert!(price.average().between(3, 4).is_satisfied_at(0, &[1, 4]));
    assert!(!price.average().between(3, 4).is_satisfied_at(0, &[0, 3]));
    assert!(price.gap().between(-6, -1).is_satisfied_at(0, &[3, 4]));
}

#[test]
fn builder_bounds() {
    let price = shopping_price();
    let constraint = price.span().at_most(3);
    assert_eq!(constraint.kind(), ConstraintKind::Span);
    assert_eq!(constraint.lower(), None);
    assert_eq!(constraint.upper(), Some(3));
    assert!(!constraint.is_unbounded());
    assert!(price.median().is_unbounded());
    assert_eq!(price.min(), 1);
    assert_eq!(price.max(), 8);
    assert_eq!(constraint.attribute().id(), price.id());
}

#[test]
fn attribute_validation() {
    assert!(matches!(
        Attribute::new(vec![]),
        Err(Seq2PatError::EmptyAttribute)
    ));
    assert!(matches!(
        Attribute::new(vec![vec![1], vec![]]),
        Err(Seq2PatError::EmptyAttributeRow { row: 1 })
    ));

    let positions = Attribute::positions(&[3, 1]).unwrap();
    assert_eq!(positions.values(), &[vec![0, 1, 2], vec![0]]);
    assert!(positions.check_aligned(&[3, 1]).is_ok());
    assert!(matches!(
        positions.check_aligned(&[3, 2]),
        Err(Seq2PatError::RowLengthMismatch {
            row: 1,
            expected: 2,
            found: 1
        })
    ));
    assert!(matches!(
        positions.check_aligned(&[3]),
        Err(Seq2PatError::RowCountMismatch {
            expected: 1,
            found: 2
        })
    ));
}

#[test]
fn store_add_and_remove() {
    init_logger();
    let price = shopping_price();
    let mut store = ConstraintStore::new(vec![5, 3, 4]);

    let average = store.add(price.average().between(3, 4)).unwrap();
    let gap = store.add(price.gap().at_most(5)).unwrap();
    assert_eq!(store.len(), 2);
    assert_eq!(store.attributes().count(), 1);

    // One constraint of each kind per attribute.
    assert!(matches!(
        store.add(price.average().at_least(1)),
        Err(Seq2PatError::DuplicateConstraint(ConstraintKind::Average))
    ));
    // A clone is the same attribute.
    assert!(store.add(price.clone().gap().at_least(0)).is_err());
    // A fresh attribute with equal values is a different attribute.
    let other = attribute(price.values().to_vec());
    assert!(store.add(other.gap().at_least(0)).is_ok());
    assert_eq!(store.attributes().count(), 2);

    let removed = store.remove(average).unwrap();
    assert_eq!(removed.kind(), ConstraintKind::Average);
    assert!(store.get(average).is_none());
    assert!(matches!(
        store.remove(average),
        Err(Seq2PatError::ConstraintNotFound(ConstraintKind::Average))
    ));

    store.remove(gap).unwrap();
    assert_eq!(store.attributes().count(), 1);
    assert_eq!(store.len(), 1);
}

#[test]
fn store_rejects_misaligned_attribute() {
    init_logger();
    let mut store = ConstraintStore::new(vec![5, 3, 4]);
    let short = attribute(vec![vec![5, 5, 3, 8], vec![1, 3, 3], vec![4, 5, 2, 1]]);
    assert!(matches!(
        store.add(short.average().at_least(1)),
        Err(Seq2PatError::RowLengthMismatch { row: 0, .. })
    ));
    assert!(store.is_empty());
}
