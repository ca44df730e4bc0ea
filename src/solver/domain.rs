/// A finite set of integers, kept sorted and free of duplicates.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Domain {
    values: Vec<i64>,
}

impl Domain {
    pub fn new(values: impl IntoIterator<Item = i64>) -> Domain {
        let mut values: Vec<i64> = values.into_iter().collect();
        values.sort_unstable();
        values.dedup();
        Domain { values }
    }

    pub fn fixed(value: i64) -> Domain {
        Domain {
            values: vec![value],
        }
    }

    pub fn values(&self) -> &[i64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn is_fixed(&self) -> bool {
        self.values.len() == 1
    }

    /// The only value of a fixed domain.
    pub fn fixed_value(&self) -> Option<i64> {
        if self.is_fixed() {
            self.values.first().copied()
        } else {
            None
        }
    }

    pub fn min(&self) -> Option<i64> {
        self.values.first().copied()
    }

    pub fn max(&self) -> Option<i64> {
        self.values.last().copied()
    }

    pub fn contains(&self, value: i64) -> bool {
        self.values.binary_search(&value).is_ok()
    }

    /// Keep only values matching `keep`. Returns `true` if something was removed.
    pub fn retain(&mut self, keep: impl FnMut(&i64) -> bool) -> bool {
        let before = self.values.len();
        self.values.retain(keep);
        self.values.len() != before
    }

    /// Remove everything outside `lower..=upper`. Returns `true` if something was removed.
    pub fn restrict(&mut self, lower: i64, upper: i64) -> bool {
        self.retain(|v| *v >= lower && *v <= upper)
    }

    pub fn remove(&mut self, value: i64) -> bool {
        match self.values.binary_search(&value) {
            Ok(index) => {
                self.values.remove(index);
                true
            }
            Err(_) => false,
        }
    }
}
