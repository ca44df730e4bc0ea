use crate::constraint::{Constraint, ConstraintKind};
use crate::solver::{CpModel, VarId};
use crate::verifier::SubsequenceVerifier;
use cancel_this::Cancellable;
use log::trace;

/// Global verifier: decides the existence of a satisfying occurrence anywhere in the
/// sequence by solving a constraint model.
///
/// The model has one index variable per pattern position. Index variables are pairwise
/// different, ordered, and select the pattern item through an element constraint. Every
/// constraint then adds variables for the selected attribute values and bounds its statistic.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConstraintProgramming {
    /// Cancel a single check once its search visits more than the given number of nodes
    /// (default: `None`, unlimited).
    pub max_nodes: Option<usize>,
}

impl ConstraintProgramming {
    pub fn new() -> ConstraintProgramming {
        ConstraintProgramming::default()
    }

    /// Build the model deciding whether `pattern` occurs in `sequence` (row `row`) subject to
    /// `constraints`.
    pub fn build_model(
        &self,
        sequence: &[u32],
        row: usize,
        pattern: &[u32],
        constraints: &[Constraint],
    ) -> CpModel {
        let mut model = CpModel::new();
        if let Some(max_nodes) = self.max_nodes {
            model.max_nodes = max_nodes;
        }

        let last_index = sequence.len() as i64 - 1;
        let items: Vec<i64> = sequence.iter().map(|it| i64::from(*it)).collect();
        let indices: Vec<VarId> = pattern
            .iter()
            .map(|item| {
                let index = model.new_var(0..=last_index);
                let target = model.new_var([i64::from(*item)]);
                model.add_element(index, items.clone(), target);
                index
            })
            .collect();
        model.add_all_different(indices.clone());
        for pair in indices.windows(2) {
            model.add_less_or_equal(pair[0], pair[1]);
        }

        for constraint in constraints.iter().filter(|it| !it.is_unbounded()) {
            let values = constraint.attribute().row(row).to_vec();
            let selected: Vec<VarId> = indices
                .iter()
                .map(|index| {
                    let value = model.new_var(values.iter().copied());
                    model.add_element(*index, values.clone(), value);
                    value
                })
                .collect();
            add_statistic(&mut model, constraint, &selected, &values);
        }

        model
    }
}

/// Bound the statistic of `constraint` over the `selected` value variables.
fn add_statistic(
    model: &mut CpModel,
    constraint: &Constraint,
    selected: &[VarId],
    values: &[i64],
) {
    let lower = constraint.lower().map(i128::from);
    let upper = constraint.upper().map(i128::from);
    let n = selected.len() as i64;
    match constraint.kind() {
        ConstraintKind::Average => {
            let terms = selected.iter().map(|it| (1, *it)).collect();
            model.add_linear(
                terms,
                lower.map(|lb| lb * i128::from(n)),
                upper.map(|ub| ub * i128::from(n)),
            );
        }
        ConstraintKind::Gap => {
            for pair in selected.windows(2) {
                model.add_linear(vec![(1, pair[1]), (-1, pair[0])], lower, upper);
            }
        }
        ConstraintKind::Median => {
            // A sorted copy of the selected values: `sorted[i] == selected[order[i]]`, where
            // `order` is a permutation and `sorted` is non-decreasing.
            let positions = 0..=(n - 1);
            let sorted: Vec<VarId> = (0..selected.len())
                .map(|_| model.new_var(values.iter().copied()))
                .collect();
            let order: Vec<VarId> = (0..selected.len())
                .map(|_| model.new_var(positions.clone()))
                .collect();
            for (value, index) in sorted.iter().zip(&order) {
                model.add_var_element(*index, selected.to_vec(), *value);
            }
            model.add_all_different(order);
            for pair in sorted.windows(2) {
                model.add_less_or_equal(pair[0], pair[1]);
            }

            let mid = selected.len() / 2;
            if selected.len() % 2 == 1 {
                model.add_linear(vec![(1, sorted[mid])], lower, upper);
            } else {
                model.add_linear(
                    vec![(1, sorted[mid - 1]), (1, sorted[mid])],
                    lower.map(|lb| 2 * lb),
                    upper.map(|ub| 2 * ub),
                );
            }
        }
        ConstraintKind::Span => {
            let max = model.new_var(values.iter().copied());
            let min = model.new_var(values.iter().copied());
            model.add_max_equality(max, selected.to_vec());
            model.add_min_equality(min, selected.to_vec());
            model.add_linear(vec![(1, max), (-1, min)], lower, upper);
        }
    }
}

impl SubsequenceVerifier for ConstraintProgramming {
    fn contains(
        &self,
        sequence: &[u32],
        row: usize,
        pattern: &[u32],
        constraints: &[Constraint],
    ) -> Cancellable<bool> {
        if pattern.is_empty() {
            return Ok(true);
        }
        if sequence.is_empty() {
            return Ok(false);
        }
        let model = self.build_model(sequence, row, pattern, constraints);
        let solution = model.solve()?;
        trace!(
            "[row:{}] Pattern {:?} is {}.",
            row,
            pattern,
            if solution.is_some() { "feasible" } else { "infeasible" }
        );
        Ok(solution.is_some())
    }
}
