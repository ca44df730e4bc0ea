//! A small finite-domain constraint solver.
//!
//! The solver supports integer variables with explicit finite domains and the global
//! constraints needed to model constrained subsequence matching: all-different, element
//! (over constants or variables), linear bounds and min/max equality. Satisfiability is
//! decided by a depth-first search with propagation at every node ([`CpSearch`]).
//!
//! # Example
//!
//! ```no_run
//! use seq2pat::solver::CpModel;
//!
//! let mut model = CpModel::new();
//! let x = model.new_var(0..=3);
//! let y = model.new_var(0..=3);
//! model.add_less_than(x, y);
//! model.add_linear(vec![(1, x), (1, y)], Some(5), None);
//! let solution = model.solve().unwrap().unwrap();
//! assert_eq!((solution[x.index()], solution[y.index()]), (2, 3));
//! ```

use cancel_this::Cancellable;
use computation_process::{Algorithm, Computation};


mod domain;
mod propagator;
mod search;

pub use domain::Domain;
pub use propagator::{Propagation, Propagator};
pub use search::{DepthFirstSearch, SearchState};

/// Depth-first search returning the first solution (or `None` if the model is infeasible).
pub type CpSearch = Computation<CpModel, SearchState, Option<Vec<i64>>, DepthFirstSearch>;

/// A variable of a [`CpModel`]. Its index is also its position in a solution vector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VarId(usize);

impl VarId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Variables with their initial domains and the constraints between them.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CpModel {
    domains: Vec<Domain>,
    propagators: Vec<Propagator>,
    /// Cancel the search once it visits more than the given number of nodes
    /// (default: `usize::MAX`).
    pub max_nodes: usize,
}

impl Default for CpModel {
    fn default() -> Self {
        CpModel::new()
    }
}

impl CpModel {
    pub fn new() -> CpModel {
        CpModel {
            domains: Vec::new(),
            propagators: Vec::new(),
            max_nodes: usize::MAX,
        }
    }

    /// A new variable that can take any of the given values.
    pub fn new_var(&mut self, values: impl IntoIterator<Item = i64>) -> VarId {
        self.domains.push(Domain::new(values));
        VarId(self.domains.len() - 1)
    }

    pub fn domains(&self) -> &[Domain] {
        &self.domains
    }

    pub fn propagators(&self) -> &[Propagator] {
        &self.propagators
    }

    pub fn add(&mut self, propagator: Propagator) {
        self.propagators.push(propagator);
    }

    pub fn add_all_different(&mut self, vars: Vec<VarId>) {
        self.add(Propagator::AllDifferent(vars));
    }

    /// `array[index] == target`.
    pub fn add_element(&mut self, index: VarId, array: Vec<i64>, target: VarId) {
        self.add(Propagator::Element {
            index,
            array,
            target,
        });
    }

    /// `array[index] == target`, where the array holds variables.
    pub fn add_var_element(&mut self, index: VarId, array: Vec<VarId>, target: VarId) {
        self.add(Propagator::VarElement {
            index,
            array,
            target,
        });
    }

    /// `lower <= sum(coefficient * var) <= upper`.
    pub fn add_linear(
        &mut self,
        terms: Vec<(i64, VarId)>,
        lower: Option<i128>,
        upper: Option<i128>,
    ) {
        self.add(Propagator::Linear {
            terms,
            lower,
            upper,
        });
    }

    pub fn add_less_or_equal(&mut self, x: VarId, y: VarId) {
        self.add_linear(vec![(1, x), (-1, y)], None, Some(0));
    }

    pub fn add_less_than(&mut self, x: VarId, y: VarId) {
        self.add_linear(vec![(1, x), (-1, y)], None, Some(-1));
    }

    pub fn add_max_equality(&mut self, target: VarId, vars: Vec<VarId>) {
        self.add(Propagator::MaxEquality { target, vars });
    }

    pub fn add_min_equality(&mut self, target: VarId, vars: Vec<VarId>) {
        self.add(Propagator::MinEquality { target, vars });
    }

    /// Run all propagators until nothing changes. Returns `false` if some domain became
    /// empty.
    pub fn propagate(&self, domains: &mut [Domain]) -> bool {
        loop {
            let mut changed = false;
            for propagator in &self.propagators {
                match propagator.propagate(domains) {
                    Propagation::Failed => return false,
                    Propagation::Changed => changed = true,
                    Propagation::Unchanged => (),
                }
            }
            if !changed {
                return true;
            }
        }
    }

    /// Check a complete assignment against every constraint.
    pub fn is_satisfied(&self, values: &[i64]) -> bool {
        values.len() == self.domains.len()
            && values
                .iter()
                .zip(&self.domains)
                .all(|(value, domain)| domain.contains(*value))
            && self.propagators.iter().all(|it| it.is_satisfied(values))
    }

    /// Find one solution, indexed by [`VarId::index`].
    pub fn solve(self) -> Cancellable<Option<Vec<i64>>> {
        let state = SearchState::from(&self);
        CpSearch::run(self, state)
    }
}
