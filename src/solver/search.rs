use crate::solver::{CpModel, Domain};
use cancel_this::{Cancelled, is_cancelled};
use computation_process::Incomplete::Suspended;
use computation_process::{Completable, ComputationStep};
use log::trace;

/// Open nodes of a depth-first search over variable domains.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchState {
    open: Vec<Vec<Domain>>,
    explored: usize,
}

impl SearchState {
    /// Number of search nodes visited so far.
    pub fn explored(&self) -> usize {
        self.explored
    }
}

impl From<&CpModel> for SearchState {
    fn from(value: &CpModel) -> Self {
        SearchState {
            open: vec![value.domains().to_vec()],
            explored: 0,
        }
    }
}

/// One node per step: propagate, then either report a solution, drop the node, or branch on
/// the unfixed variable with the smallest domain (values in ascending order).
pub struct DepthFirstSearch;

impl ComputationStep<CpModel, SearchState, Option<Vec<i64>>> for DepthFirstSearch {
    fn step(context: &CpModel, state: &mut SearchState) -> Completable<Option<Vec<i64>>> {
        let Some(mut domains) = state.open.pop() else {
            trace!(
                "[node:{}] Search space exhausted without a solution.",
                state.explored
            );
            return Ok(None);
        };

        if state.explored >= context.max_nodes {
            return Err(Cancelled::new("CpModel::max_nodes").into());
        }
        state.explored += 1;
        is_cancelled!()?;

        if !context.propagate(&mut domains) {
            return Err(Suspended);
        }

        let branch = domains
            .iter()
            .enumerate()
            .filter(|(_, domain)| !domain.is_fixed())
            .min_by_key(|(_, domain)| domain.len())
            .map(|(var, _)| var);

        let Some(var) = branch else {
            let values: Vec<i64> = domains.iter().filter_map(|it| it.min()).collect();
            if context.is_satisfied(&values) {
                trace!("[node:{}] Found a solution.", state.explored);
                return Ok(Some(values));
            }
            return Err(Suspended);
        };

        for value in domains[var].values().iter().rev() {
            let mut child = domains.clone();
            child[var] = Domain::fixed(*value);
            state.open.push(child);
        }
        Err(Suspended)
    }
}
