use crate::mining::{Embedding, MiningConfig, Pattern};
use cancel_this::{Cancellable, Cancelled, is_cancelled};
use computation_process::Incomplete::Suspended;
use computation_process::{Completable, GeneratorStep};
use log::{debug, info, trace};
use std::collections::{BTreeMap, BTreeSet};

/// Internal state of the prefix-growth search.
///
/// The search is a depth-first traversal over prefixes. The stack holds prefixes that are
/// known to be frequent but were not extended yet.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PrefixGrowthState {
    seeded: bool,
    expanded: usize,
    to_extend: Vec<Prefix>,
}

/// A partial pattern with all its live occurrences.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
struct Prefix {
    items: Vec<u32>,
    occurrences: Vec<RowOccurrences>,
    /// Number of rows with an occurrence satisfying every constraint.
    satisfied_rows: usize,
}

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
struct RowOccurrences {
    row: usize,
    embeddings: Vec<Embedding>,
}

/// Step implementation of the prefix-growth search. Each step extends one prefix and
/// reports it when it is a valid pattern.
pub struct PrefixGrowthStep;

impl PrefixGrowthState {
    pub fn new() -> PrefixGrowthState {
        PrefixGrowthState::default()
    }

    /// Number of prefixes extended so far.
    pub fn expanded(&self) -> usize {
        self.expanded
    }
}

impl From<&MiningConfig> for PrefixGrowthState {
    fn from(_value: &MiningConfig) -> Self {
        PrefixGrowthState::new()
    }
}

impl GeneratorStep<MiningConfig, PrefixGrowthState, Pattern<u32>> for PrefixGrowthStep {
    fn step(
        context: &MiningConfig,
        state: &mut PrefixGrowthState,
    ) -> Completable<Option<Pattern<u32>>> {
        if !state.seeded {
            let mut roots = single_item_prefixes(context)?;
            info!(
                "Search started with {} frequent items over {} rows (min row count: {}).",
                roots.len(),
                context.num_rows(),
                context.min_row_count
            );
            roots.reverse();
            state.to_extend = roots;
            state.seeded = true;
            return Err(Suspended);
        }

        let Some(prefix) = state.to_extend.pop() else {
            info!(
                "Search finished after extending {} prefixes.",
                state.expanded
            );
            return Ok(None);
        };

        if state.expanded >= context.max_expanded_prefixes {
            debug!(
                "[prefix:{}] Search canceled (exceeded prefix count).",
                state.expanded
            );
            return Err(Cancelled::new("MiningConfig::max_expanded_prefixes").into());
        }
        state.expanded += 1;

        let children = extend_prefix(context, &prefix)?;
        debug!(
            "[prefix:{}] {:?} in {} rows ({} satisfying); {} extensions; {} pending.",
            state.expanded,
            prefix.items,
            prefix.occurrences.len(),
            prefix.satisfied_rows,
            children.len(),
            state.to_extend.len()
        );
        // Push in reverse so that the smallest extension is processed first.
        state.to_extend.extend(children.into_iter().rev());

        if prefix.items.len() >= 2 && prefix.satisfied_rows >= context.min_row_count {
            Ok(Some(Pattern::new(prefix.items, prefix.satisfied_rows)))
        } else {
            Err(Suspended)
        }
    }
}

/// Prefixes consisting of a single frequent item, sorted by item.
fn single_item_prefixes(context: &MiningConfig) -> Cancellable<Vec<Prefix>> {
    let mut candidates: BTreeMap<u32, Vec<RowOccurrences>> = BTreeMap::new();
    for (row, sequence) in context.sequences.iter().enumerate() {
        is_cancelled!()?;
        let mut by_item: BTreeMap<u32, BTreeSet<Embedding>> = BTreeMap::new();
        for (position, item) in sequence.iter().enumerate() {
            if let Some(embedding) = Embedding::start(context, row, position) {
                by_item.entry(*item).or_default().insert(embedding);
            }
        }
        collect_row(&mut candidates, row, by_item);
    }
    Ok(frequent_prefixes(context, &[], candidates))
}

/// All frequent one-item extensions of `prefix`, sorted by the appended item.
fn extend_prefix(context: &MiningConfig, prefix: &Prefix) -> Cancellable<Vec<Prefix>> {
    let length = prefix.items.len() + 1;
    let mut candidates: BTreeMap<u32, Vec<RowOccurrences>> = BTreeMap::new();
    for occurrences in &prefix.occurrences {
        is_cancelled!()?;
        let row = occurrences.row;
        let sequence = &context.sequences[row];
        let mut by_item: BTreeMap<u32, BTreeSet<Embedding>> = BTreeMap::new();
        for embedding in &occurrences.embeddings {
            for position in (embedding.last + 1)..sequence.len() {
                if embedding.is_beyond_horizon(context, row, position) {
                    break;
                }
                if let Some(next) = embedding.extend(context, row, position, length) {
                    by_item.entry(sequence[position]).or_default().insert(next);
                }
            }
        }
        collect_row(&mut candidates, row, by_item);
    }
    trace!(
        "Prefix {:?} has {} candidate extensions.",
        prefix.items,
        candidates.len()
    );
    Ok(frequent_prefixes(context, &prefix.items, candidates))
}

fn collect_row(
    candidates: &mut BTreeMap<u32, Vec<RowOccurrences>>,
    row: usize,
    by_item: BTreeMap<u32, BTreeSet<Embedding>>,
) {
    for (item, embeddings) in by_item {
        candidates.entry(item).or_default().push(RowOccurrences {
            row,
            embeddings: embeddings.into_iter().collect(),
        });
    }
}

/// Keep candidates that still occur in enough rows, counting the rows that already
/// satisfy every constraint.
fn frequent_prefixes(
    context: &MiningConfig,
    items: &[u32],
    candidates: BTreeMap<u32, Vec<RowOccurrences>>,
) -> Vec<Prefix> {
    let length = items.len() + 1;
    candidates
        .into_iter()
        .filter(|(_, occurrences)| occurrences.len() >= context.min_row_count)
        .map(|(item, occurrences)| {
            let satisfied_rows = occurrences
                .iter()
                .filter(|it| it.embeddings.iter().any(|e| e.is_satisfied(context, length)))
                .count();
            let mut extended = items.to_vec();
            extended.push(item);
            Prefix {
                items: extended,
                occurrences,
                satisfied_rows,
            }
        })
        .collect()
}
