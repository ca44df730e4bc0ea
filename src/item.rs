//! Pattern items and their dense integer encoding.
//!
//! The search engine works over `u32` item ids. Any [`Item`] type is translated into these
//! ids through an [`ItemAlphabet`], which assigns ids `1..=n` in ascending item order
//! (`0` is reserved). Since the mapping preserves order, sorting patterns by ids and sorting
//! them by the original items gives the same result.

use crate::error::Seq2PatError;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Debug;
use std::hash::Hash;

/// A value that can appear in a sequence.
///
/// Strings and characters are always valid. Integer items must be positive, because
/// zero is reserved by the encoding.
pub trait Item: Clone + Ord + Hash + Debug + Send + Sync + 'static {
    fn is_valid_item(&self) -> bool {
        true
    }
}

impl Item for String {}
impl Item for &'static str {}
impl Item for char {}

macro_rules! positive_integer_item {
    ($($t:ty),*) => {
        $(impl Item for $t {
            fn is_valid_item(&self) -> bool {
                *self > 0
            }
        })*
    };
}

positive_integer_item!(u8, u16, u32, u64, usize, i8, i16, i32, i64);

/// Check the shape of a sequence collection: non-empty, no empty rows, valid items only.
pub fn validate_sequences<T: Item>(sequences: &[Vec<T>]) -> Result<(), Seq2PatError> {
    if sequences.is_empty() {
        return Err(Seq2PatError::EmptySequences);
    }
    for (row, sequence) in sequences.iter().enumerate() {
        if sequence.is_empty() {
            return Err(Seq2PatError::EmptySequence { row });
        }
        if let Some(column) = sequence.iter().position(|it| !it.is_valid_item()) {
            return Err(Seq2PatError::InvalidItem { row, column });
        }
    }
    Ok(())
}

/// Order-preserving bijection between items and ids `1..=len`.
#[derive(Clone, Debug)]
pub struct ItemAlphabet<T: Item> {
    to_id: BTreeMap<T, u32>,
    to_item: Vec<T>,
}

impl<T: Item> ItemAlphabet<T> {
    /// Build an alphabet from every item that appears in `rows`.
    pub fn from_rows<'a, I>(rows: I) -> ItemAlphabet<T>
    where
        I: IntoIterator<Item = &'a Vec<T>>,
    {
        let items: BTreeSet<T> = rows.into_iter().flatten().cloned().collect();
        let to_item: Vec<T> = items.into_iter().collect();
        let to_id = to_item
            .iter()
            .enumerate()
            .map(|(index, item)| (item.clone(), (index + 1) as u32))
            .collect();
        ItemAlphabet { to_id, to_item }
    }

    pub fn len(&self) -> usize {
        self.to_item.len()
    }

    pub fn is_empty(&self) -> bool {
        self.to_item.is_empty()
    }

    /// Id of `item`, or `None` if the item was never seen.
    pub fn id(&self, item: &T) -> Option<u32> {
        self.to_id.get(item).copied()
    }

    /// The item behind `id`, or `None` for `0` and ids past the end.
    pub fn item(&self, id: u32) -> Option<&T> {
        let index = usize::try_from(id).ok()?.checked_sub(1)?;
        self.to_item.get(index)
    }

    /// Encode a row. Unknown items are mapped to `0`, which never matches anything.
    pub fn encode(&self, row: &[T]) -> Vec<u32> {
        row.iter().map(|it| self.id(it).unwrap_or(0)).collect()
    }

    /// Decode a row of ids produced by this alphabet. Ids outside the alphabet are skipped.
    pub fn decode(&self, ids: &[u32]) -> Vec<T> {
        ids.iter().filter_map(|id| self.item(*id)).cloned().collect()
    }
}
