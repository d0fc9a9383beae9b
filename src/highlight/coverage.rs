//! Covered-range bookkeeping for overlap checks

use std::collections::BTreeMap;

/// A set of byte offsets, stored as disjoint half-open intervals
///
/// Inserting merges with anything the new range overlaps or touches, so
/// the map always holds disjoint intervals keyed by start.
#[derive(Debug, Default, Clone)]
pub struct Coverage {
    intervals: BTreeMap<usize, usize>,
}

impl Coverage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Does `[start, end)` share any offset with the covered set?
    pub fn overlaps(&self, start: usize, end: usize) -> bool {
        // The only candidate is the last interval starting before `end`
        match self.intervals.range(..end).next_back() {
            Some((_, &covered_end)) => covered_end > start,
            None => false,
        }
    }

    /// Add `[start, end)` to the covered set
    pub fn insert(&mut self, start: usize, end: usize) {
        let mut merged_start = start;
        let mut merged_end = end;

        let touching: Vec<usize> = self
            .intervals
            .range(..=end)
            .rev()
            .take_while(|(_, covered_end)| **covered_end >= start)
            .map(|(&covered_start, _)| covered_start)
            .collect();

        for key in touching {
            if let Some(covered_end) = self.intervals.remove(&key) {
                merged_start = merged_start.min(key);
                merged_end = merged_end.max(covered_end);
            }
        }

        self.intervals.insert(merged_start, merged_end);
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Number of disjoint intervals
    pub fn len(&self) -> usize {
        self.intervals.len()
    }
}
