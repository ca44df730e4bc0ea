use crate::constraint::{Attribute, AttributeId, Constraint, ConstraintKind};
use crate::error::Seq2PatError;
use log::debug;
use std::collections::BTreeMap;

/// Returned by [`ConstraintStore::add`], used to remove the constraint later.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConstraintHandle {
    pub attribute: AttributeId,
    pub kind: ConstraintKind,
}

struct AttributeEntry {
    attribute: Attribute,
    constraints: BTreeMap<ConstraintKind, Constraint>,
}

/// Per-session registry `attribute -> {kind -> constraint}`.
///
/// At most one constraint of each kind can exist on one attribute, and every registered
/// attribute is aligned with the sequences the store was created for.
pub struct ConstraintStore {
    row_lengths: Vec<usize>,
    entries: BTreeMap<AttributeId, AttributeEntry>,
}

impl ConstraintStore {
    /// An empty store for sequences with the given lengths.
    pub fn new(row_lengths: Vec<usize>) -> ConstraintStore {
        ConstraintStore {
            row_lengths,
            entries: BTreeMap::new(),
        }
    }

    pub fn row_lengths(&self) -> &[usize] {
        &self.row_lengths
    }

    /// Register a constraint.
    ///
    /// Fails when the same kind is already registered on the attribute, or when the attribute
    /// does not have one value per sequence event. A failed call leaves the store unchanged.
    pub fn add(&mut self, constraint: Constraint) -> Result<ConstraintHandle, Seq2PatError> {
        let handle = ConstraintHandle {
            attribute: constraint.attribute().id(),
            kind: constraint.kind(),
        };

        if let Some(entry) = self.entries.get(&handle.attribute)
            && entry.constraints.contains_key(&handle.kind)
        {
            return Err(Seq2PatError::DuplicateConstraint(handle.kind));
        }
        constraint.attribute().check_aligned(&self.row_lengths)?;

        debug!(
            "Registered {:?} constraint on {:?} (bounds: {:?}..={:?}).",
            handle.kind,
            handle.attribute,
            constraint.lower(),
            constraint.upper()
        );

        self.entries
            .entry(handle.attribute)
            .or_insert_with(|| AttributeEntry {
                attribute: constraint.attribute().clone(),
                constraints: BTreeMap::new(),
            })
            .constraints
            .insert(handle.kind, constraint);

        Ok(handle)
    }

    /// Remove a previously added constraint. The attribute entry is dropped together with
    /// its last constraint.
    pub fn remove(&mut self, handle: ConstraintHandle) -> Result<Constraint, Seq2PatError> {
        let entry = self
            .entries
            .get_mut(&handle.attribute)
            .ok_or(Seq2PatError::ConstraintNotFound(handle.kind))?;
        let removed = entry
            .constraints
            .remove(&handle.kind)
            .ok_or(Seq2PatError::ConstraintNotFound(handle.kind))?;
        if entry.constraints.is_empty() {
            self.entries.remove(&handle.attribute);
        }
        Ok(removed)
    }

    pub fn get(&self, handle: ConstraintHandle) -> Option<&Constraint> {
        self.entries
            .get(&handle.attribute)
            .and_then(|it| it.constraints.get(&handle.kind))
    }

    /// All registered attributes, in registration id order.
    pub fn attributes(&self) -> impl Iterator<Item = &Attribute> {
        self.entries.values().map(|it| &it.attribute)
    }

    /// All registered constraints, grouped by attribute.
    pub fn constraints(&self) -> impl Iterator<Item = &Constraint> {
        self.entries.values().flat_map(|it| it.constraints.values())
    }

    pub fn len(&self) -> usize {
        self.entries.values().map(|it| it.constraints.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
