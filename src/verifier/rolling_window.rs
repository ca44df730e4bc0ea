use crate::constraint::Constraint;
use crate::verifier::{SubsequenceVerifier, is_subsequence};
use cancel_this::{Cancellable, is_cancelled};
use log::trace;

/// Local verifier: looks for a satisfying occurrence inside windows of at most `window`
/// consecutive events.
///
/// Sequences no longer than the window are checked as a whole. Otherwise every window
/// position `0..=len - window` is checked in order. Within a window, all occurrences of the
/// pattern are enumerated and tested against every constraint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RollingWindow {
    pub window: usize,
}

impl RollingWindow {
    pub fn new(window: usize) -> RollingWindow {
        RollingWindow { window }
    }

    /// Start offsets and width of all windows over a sequence of length `len`.
    fn windows(&self, len: usize) -> (std::ops::RangeInclusive<usize>, usize) {
        let window = self.window.max(1);
        if len <= window {
            (0..=0, len)
        } else {
            (0..=(len - window), window)
        }
    }
}

impl SubsequenceVerifier for RollingWindow {
    fn contains(
        &self,
        sequence: &[u32],
        row: usize,
        pattern: &[u32],
        constraints: &[Constraint],
    ) -> Cancellable<bool> {
        let (starts, width) = self.windows(sequence.len());
        for start in starts {
            is_cancelled!()?;
            let window = &sequence[start..start + width];
            if !is_subsequence(pattern, window) {
                continue;
            }
            if constraints.is_empty() {
                return Ok(true);
            }
            let mut occurrences = Occurrences::new(window, pattern);
            while let Some(positions) = occurrences.next_positions() {
                let absolute: Vec<usize> = positions.iter().map(|p| p + start).collect();
                if constraints
                    .iter()
                    .all(|it| it.is_satisfied_at(row, &absolute))
                {
                    trace!("[row:{}] Satisfying occurrence at {:?}.", row, absolute);
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }
}

/// Enumerates every increasing index tuple `i_1 < ... < i_k` with `window[i_j] == pattern[j]`,
/// in lexicographic order, using an explicit backtracking stack.
struct Occurrences<'a> {
    window: &'a [u32],
    pattern: &'a [u32],
    chosen: Vec<usize>,
    /// First window index to try for the next pattern position.
    resume: usize,
    exhausted: bool,
}

impl<'a> Occurrences<'a> {
    fn new(window: &'a [u32], pattern: &'a [u32]) -> Occurrences<'a> {
        Occurrences {
            window,
            pattern,
            chosen: Vec::with_capacity(pattern.len()),
            resume: 0,
            exhausted: pattern.is_empty(),
        }
    }

    fn next_positions(&mut self) -> Option<&[usize]> {
        if self.exhausted {
            return None;
        }
        // Leave the previously reported occurrence before searching for the next one.
        if self.chosen.len() == self.pattern.len() && !self.backtrack() {
            return None;
        }
        loop {
            let k = self.chosen.len();
            if k == self.pattern.len() {
                return Some(&self.chosen);
            }
            let remaining = self.pattern.len() - k;
            let found = (self.resume..self.window.len())
                .take_while(|j| j + remaining <= self.window.len())
                .find(|j| self.window[*j] == self.pattern[k]);
            match found {
                Some(j) => {
                    self.chosen.push(j);
                    self.resume = j + 1;
                }
                None => {
                    if !self.backtrack() {
                        return None;
                    }
                }
            }
        }
    }

    /// Undo the last choice and continue after it. Returns `false` once nothing is left.
    fn backtrack(&mut self) -> bool {
        match self.chosen.pop() {
            Some(last) => {
                self.resume = last + 1;
                true
            }
            None => {
                self.exhausted = true;
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Occurrences;

    #[test]
    fn occurrences_are_enumerated_in_order() {
        let window = [1, 2, 1, 2];
        let mut occurrences = Occurrences::new(&window, &[1, 2]);
        let mut found = Vec::new();
        while let Some(positions) = occurrences.next_positions() {
            found.push(positions.to_vec());
        }
        assert_eq!(found, vec![vec![0, 1], vec![0, 3], vec![2, 3]]);
    }

    #[test]
    fn missing_pattern_has_no_occurrences() {
        let window = [2, 1];
        let mut occurrences = Occurrences::new(&window, &[1, 2]);
        assert!(occurrences.next_positions().is_none());
        assert!(occurrences.next_positions().is_none());
    }
}
