//! Encounter-ordered value counting shared by facets and charts.

use std::collections::HashMap;

/// Counts occurrences of string values, remembering first-seen order.
#[derive(Debug, Default)]
pub struct ValueTally<'a> {
    slots: HashMap<&'a str, usize>,
    counts: Vec<(&'a str, usize)>,
}

impl<'a> ValueTally<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, value: &'a str) {
        match self.slots.get(value) {
            Some(slot) => self.counts[*slot].1 += 1,
            None => {
                self.slots.insert(value, self.counts.len());
                self.counts.push((value, 1));
            }
        }
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Values by descending count; ties keep first-seen order.
    pub fn into_sorted(self) -> Vec<(&'a str, usize)> {
        let mut counts = self.counts;
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        counts
    }
}
