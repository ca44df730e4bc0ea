use crate::solver::{Domain, VarId};
use std::collections::BTreeSet;

/// Result of one propagation round.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Propagation {
    Unchanged,
    Changed,
    Failed,
}

impl Propagation {
    fn from_change(changed: bool) -> Propagation {
        if changed {
            Propagation::Changed
        } else {
            Propagation::Unchanged
        }
    }
}

/// A constraint over model variables.
///
/// Propagation only removes values that cannot be part of any solution. The search checks
/// every complete assignment with [`Propagator::is_satisfied`], so propagation is allowed to
/// be weaker than the constraint.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Propagator {
    /// All variables take pairwise different values.
    AllDifferent(Vec<VarId>),
    /// `array[index] == target` for a constant array.
    Element {
        index: VarId,
        array: Vec<i64>,
        target: VarId,
    },
    /// `array[index] == target` for an array of variables.
    VarElement {
        index: VarId,
        array: Vec<VarId>,
        target: VarId,
    },
    /// `lower <= sum(coefficient * variable) <= upper`. Bounds are wide enough to hold a
    /// multiple of any `i64` value.
    Linear {
        terms: Vec<(i64, VarId)>,
        lower: Option<i128>,
        upper: Option<i128>,
    },
    /// `target == max(vars)`.
    MaxEquality { target: VarId, vars: Vec<VarId> },
    /// `target == min(vars)`.
    MinEquality { target: VarId, vars: Vec<VarId> },
}

impl Propagator {
    pub fn propagate(&self, domains: &mut [Domain]) -> Propagation {
        let result = match self {
            Propagator::AllDifferent(vars) => all_different(vars, domains),
            Propagator::Element {
                index,
                array,
                target,
            } => element(*index, array, *target, domains),
            Propagator::VarElement {
                index,
                array,
                target,
            } => var_element(*index, array, *target, domains),
            Propagator::Linear {
                terms,
                lower,
                upper,
            } => linear(terms, *lower, *upper, domains),
            Propagator::MaxEquality { target, vars } => extreme(*target, vars, domains, true),
            Propagator::MinEquality { target, vars } => extreme(*target, vars, domains, false),
        };
        if result != Propagation::Failed && self.vars().any(|v| domains[v.0].is_empty()) {
            Propagation::Failed
        } else {
            result
        }
    }

    /// Check a complete assignment.
    pub fn is_satisfied(&self, values: &[i64]) -> bool {
        let value = |var: &VarId| values[var.0];
        match self {
            Propagator::AllDifferent(vars) => {
                let distinct: BTreeSet<i64> = vars.iter().map(value).collect();
                distinct.len() == vars.len()
            }
            Propagator::Element {
                index,
                array,
                target,
            } => usize::try_from(value(index))
                .ok()
                .and_then(|i| array.get(i))
                .is_some_and(|v| *v == value(target)),
            Propagator::VarElement {
                index,
                array,
                target,
            } => usize::try_from(value(index))
                .ok()
                .and_then(|i| array.get(i))
                .is_some_and(|v| value(v) == value(target)),
            Propagator::Linear {
                terms,
                lower,
                upper,
            } => {
                let sum: i128 = terms
                    .iter()
                    .map(|(c, v)| i128::from(*c) * i128::from(value(v)))
                    .sum();
                lower.is_none_or(|lb| sum >= lb) && upper.is_none_or(|ub| sum <= ub)
            }
            Propagator::MaxEquality { target, vars } => {
                vars.iter().map(value).max() == Some(value(target))
            }
            Propagator::MinEquality { target, vars } => {
                vars.iter().map(value).min() == Some(value(target))
            }
        }
    }

    fn vars(&self) -> Box<dyn Iterator<Item = VarId> + '_> {
        match self {
            Propagator::AllDifferent(vars) => Box::new(vars.iter().copied()),
            Propagator::Element { index, target, .. } => Box::new([*index, *target].into_iter()),
            Propagator::VarElement {
                index,
                array,
                target,
            } => Box::new([*index, *target].into_iter().chain(array.iter().copied())),
            Propagator::Linear { terms, .. } => Box::new(terms.iter().map(|(_, v)| *v)),
            Propagator::MaxEquality { target, vars } | Propagator::MinEquality { target, vars } => {
                Box::new(std::iter::once(*target).chain(vars.iter().copied()))
            }
        }
    }
}

/// Remove the values of fixed variables from all other variables.
fn all_different(vars: &[VarId], domains: &mut [Domain]) -> Propagation {
    let mut changed = false;
    let mut seen = BTreeSet::new();
    for var in vars {
        if let Some(value) = domains[var.0].fixed_value()
            && !seen.insert(value)
        {
            return Propagation::Failed;
        }
    }
    for var in vars {
        if domains[var.0].is_fixed() {
            continue;
        }
        for value in &seen {
            changed |= domains[var.0].remove(*value);
        }
    }
    Propagation::from_change(changed)
}

fn element(index: VarId, array: &[i64], target: VarId, domains: &mut [Domain]) -> Propagation {
    let target_domain = domains[target.0].clone();
    let mut changed = domains[index.0].retain(|i| {
        usize::try_from(*i)
            .ok()
            .and_then(|i| array.get(i))
            .is_some_and(|v| target_domain.contains(*v))
    });
    let reachable: BTreeSet<i64> = domains[index.0]
        .values()
        .iter()
        .filter_map(|i| usize::try_from(*i).ok().and_then(|i| array.get(i)).copied())
        .collect();
    changed |= domains[target.0].retain(|v| reachable.contains(v));
    Propagation::from_change(changed)
}

fn var_element(
    index: VarId,
    array: &[VarId],
    target: VarId,
    domains: &mut [Domain],
) -> Propagation {
    let target_domain = domains[target.0].clone();
    let compatible = |i: &i64, domains: &[Domain]| {
        usize::try_from(*i)
            .ok()
            .and_then(|i| array.get(i))
            .is_some_and(|var| {
                domains[var.0]
                    .values()
                    .iter()
                    .any(|v| target_domain.contains(*v))
            })
    };
    let keep: Vec<i64> = {
        let view: &[Domain] = domains;
        view[index.0]
            .values()
            .iter()
            .filter(|i| compatible(i, view))
            .copied()
            .collect()
    };
    let mut changed = domains[index.0].retain(|i| keep.contains(i));

    let mut reachable = BTreeSet::new();
    for i in domains[index.0].values() {
        if let Some(var) = usize::try_from(*i).ok().and_then(|i| array.get(i)) {
            reachable.extend(domains[var.0].values().iter().copied());
        }
    }
    changed |= domains[target.0].retain(|v| reachable.contains(v));

    if let Some(i) = domains[index.0].fixed_value()
        && let Some(var) = usize::try_from(i).ok().and_then(|i| array.get(i))
    {
        let target_domain = domains[target.0].clone();
        changed |= domains[var.0].retain(|v| target_domain.contains(*v));
    }
    Propagation::from_change(changed)
}

/// Bounds propagation of a linear constraint.
fn linear(
    terms: &[(i64, VarId)],
    lower: Option<i128>,
    upper: Option<i128>,
    domains: &mut [Domain],
) -> Propagation {
    let mut changed = false;
    for (k, (coefficient, var)) in terms.iter().enumerate() {
        let c = i128::from(*coefficient);
        if c == 0 {
            continue;
        }
        let (mut rest_min, mut rest_max) = (0i128, 0i128);
        for (j, (other_coefficient, other)) in terms.iter().enumerate() {
            if j == k {
                continue;
            }
            let (Some(lo), Some(hi)) = (domains[other.0].min(), domains[other.0].max()) else {
                return Propagation::Failed;
            };
            let (a, b) = (
                i128::from(*other_coefficient) * i128::from(lo),
                i128::from(*other_coefficient) * i128::from(hi),
            );
            rest_min += a.min(b);
            rest_max += a.max(b);
        }

        let mut lo = i128::from(i64::MIN);
        let mut hi = i128::from(i64::MAX);
        if let Some(ub) = upper {
            // c * x <= ub - rest_min
            let slack = ub - rest_min;
            if c > 0 {
                hi = hi.min(floor_div(slack, c));
            } else {
                lo = lo.max(ceil_div(slack, c));
            }
        }
        if let Some(lb) = lower {
            // c * x >= lb - rest_max
            let slack = lb - rest_max;
            if c > 0 {
                lo = lo.max(ceil_div(slack, c));
            } else {
                hi = hi.min(floor_div(slack, c));
            }
        }
        changed |= domains[var.0].retain(|v| i128::from(*v) >= lo && i128::from(*v) <= hi);
        if domains[var.0].is_empty() {
            return Propagation::Failed;
        }
    }
    Propagation::from_change(changed)
}

/// Bounds propagation of `target == max(vars)` (or `min` when `is_max` is false).
fn extreme(target: VarId, vars: &[VarId], domains: &mut [Domain], is_max: bool) -> Propagation {
    // Work on negated values for `min`, so that only the `max` case needs to be written.
    // Negation happens in `i128`, where `-i64::MIN` is representable.
    let sign: i128 = if is_max { 1 } else { -1 };
    let bounds = |domain: &Domain| {
        let (Some(lo), Some(hi)) = (domain.min(), domain.max()) else {
            return None;
        };
        let (lo, hi) = (i128::from(lo), i128::from(hi));
        if is_max { Some((lo, hi)) } else { Some((-hi, -lo)) }
    };

    let mut floor = i128::MIN;
    let mut ceiling = i128::MIN;
    for var in vars {
        let Some((lo, hi)) = bounds(&domains[var.0]) else {
            return Propagation::Failed;
        };
        floor = floor.max(lo);
        ceiling = ceiling.max(hi);
    }

    let mut changed = domains[target.0].retain(|v| {
        let v = i128::from(*v) * sign;
        v >= floor && v <= ceiling
    });
    let Some((_, target_hi)) = bounds(&domains[target.0]) else {
        return Propagation::Failed;
    };
    for var in vars {
        changed |= domains[var.0].retain(|v| i128::from(*v) * sign <= target_hi);
    }
    Propagation::from_change(changed)
}

fn floor_div(a: i128, b: i128) -> i128 {
    let q = a / b;
    if a % b != 0 && ((a < 0) != (b < 0)) {
        q - 1
    } else {
        q
    }
}

fn ceil_div(a: i128, b: i128) -> i128 {
    -floor_div(-a, b)
}
