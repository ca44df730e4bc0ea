//! Exact checks of "does pattern `P` occur in sequence `S` subject to constraints `C`?".
//!
//! Two interchangeable strategies are available:
//!
//! - [`RollingWindow`] enumerates all occurrences inside bounded windows of the sequence.
//!   It is exponential in the window size, but windows are short in practice.
//! - [`ConstraintProgramming`] builds a constraint model over the whole sequence and solves
//!   it with [`crate::solver`].
//!
//! With a window at least as long as the sequence, both strategies return the same answer
//! for every combination of constraints.
//!
//! Sequences and patterns are given as item ids (see [`crate::item::ItemAlphabet`]). The
//! `row` argument selects the attribute values of each constraint.

use crate::constraint::Constraint;
use cancel_this::Cancellable;


mod constraint_programming;
mod rolling_window;

pub use constraint_programming::ConstraintProgramming;
pub use rolling_window::RollingWindow;

/// Decides constrained subsequence containment for one row.
pub trait SubsequenceVerifier {
    fn contains(
        &self,
        sequence: &[u32],
        row: usize,
        pattern: &[u32],
        constraints: &[Constraint],
    ) -> Cancellable<bool>;
}

/// A verifier selected at run time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VerifierStrategy {
    Local(RollingWindow),
    Global(ConstraintProgramming),
}

impl Default for VerifierStrategy {
    /// Local verification with a window of 10 events.
    fn default() -> Self {
        VerifierStrategy::Local(RollingWindow::new(10))
    }
}

impl VerifierStrategy {
    /// Local verification for a window size, global verification for `None`.
    pub fn for_max_span(max_span: Option<usize>) -> VerifierStrategy {
        match max_span {
            Some(window) => VerifierStrategy::Local(RollingWindow::new(window)),
            None => VerifierStrategy::Global(ConstraintProgramming::new()),
        }
    }
}

impl SubsequenceVerifier for VerifierStrategy {
    fn contains(
        &self,
        sequence: &[u32],
        row: usize,
        pattern: &[u32],
        constraints: &[Constraint],
    ) -> Cancellable<bool> {
        match self {
            VerifierStrategy::Local(it) => it.contains(sequence, row, pattern, constraints),
            VerifierStrategy::Global(it) => it.contains(sequence, row, pattern, constraints),
        }
    }
}

/// Classic two-pointer test: `pattern` is an (unconstrained) subsequence of `sequence`.
pub fn is_subsequence(pattern: &[u32], sequence: &[u32]) -> bool {
    let mut remaining = pattern.iter().peekable();
    for item in sequence {
        if remaining.peek() == Some(&item) {
            remaining.next();
        }
    }
    remaining.peek().is_none()
}
