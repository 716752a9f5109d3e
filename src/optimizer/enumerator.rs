//! Lazy Cartesian product over slot groups.
//!
//! The first group is the outermost dimension, the last group the innermost.
//! Tuples with fewer than `min_occupied` real items are dropped before they
//! are yielded.

use std::ops::Range;

use crate::optimizer::combination::{Combination, Pick};
use crate::optimizer::partition::SlotGroup;

#[derive(Debug, Clone)]
pub struct Enumerator<'g, 'a> {
    groups: &'g [SlotGroup<'a>],
    min_occupied: usize,
    outer: Range<usize>,
}

impl<'g, 'a> Enumerator<'g, 'a> {
    pub fn new(groups: &'g [SlotGroup<'a>], min_occupied: usize) -> Self {
        let outer_len = groups.first().map_or(0, SlotGroup::len);
        Self {
            groups,
            min_occupied,
            outer: 0..outer_len,
        }
    }

    /// Restrict the first group to the candidate indices in `range`.
    pub fn with_outer_range(self, range: Range<usize>) -> Self {
        let outer_len = self.groups.first().map_or(0, SlotGroup::len);
        let start = range.start.min(outer_len);
        let end = range.end.min(outer_len);
        Self {
            outer: start..end.max(start),
            ..self
        }
    }

    /// Number of raw tuples before the occupancy filter.
    pub fn upper_bound(&self) -> usize {
        if self.groups.is_empty() {
            return 0;
        }
        self.groups
            .iter()
            .skip(1)
            .fold(self.outer.len(), |acc, group| acc.saturating_mul(group.len()))
    }

    /// A fresh pass over the space. Each call starts from the beginning.
    pub fn iter(&self) -> Combinations<'g, 'a> {
        let exhausted = self.groups.is_empty()
            || self.outer.is_empty()
            || self.groups.iter().any(SlotGroup::is_empty);
        let mut indices = vec![0; self.groups.len()];
        if let Some(first) = indices.first_mut() {
            *first = self.outer.start;
        }
        Combinations {
            groups: self.groups,
            min_occupied: self.min_occupied,
            outer_end: self.outer.end,
            indices,
            exhausted,
        }
    }
}

impl<'g, 'a> IntoIterator for &Enumerator<'g, 'a> {
    type Item = Combination<'a>;
    type IntoIter = Combinations<'g, 'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[derive(Debug, Clone)]
pub struct Combinations<'g, 'a> {
    groups: &'g [SlotGroup<'a>],
    min_occupied: usize,
    outer_end: usize,
    indices: Vec<usize>,
    exhausted: bool,
}

impl<'g, 'a> Combinations<'g, 'a> {
    fn occupied(&self) -> usize {
        self.groups
            .iter()
            .zip(&self.indices)
            .filter(|(group, index)| group.candidates[**index].is_some())
            .count()
    }

    fn current(&self) -> Combination<'a> {
        let picks = self
            .groups
            .iter()
            .zip(&self.indices)
            .map(|(group, &index)| Pick {
                slot: group.slot,
                item: group.candidates[index],
            })
            .collect();
        Combination::new(picks)
    }

    /// Odometer step, innermost dimension first.
    fn advance(&mut self) {
        for position in (0..self.indices.len()).rev() {
            self.indices[position] += 1;
            let limit = if position == 0 {
                self.outer_end
            } else {
                self.groups[position].len()
            };
            if self.indices[position] < limit {
                return;
            }
            if position == 0 {
                self.exhausted = true;
                return;
            }
            self.indices[position] = 0;
        }
    }
}

impl<'g, 'a> Iterator for Combinations<'g, 'a> {
    type Item = Combination<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.exhausted {
            let keep = self.occupied() >= self.min_occupied;
            let combination = keep.then(|| self.current());
            self.advance();
            if combination.is_some() {
                return combination;
            }
        }
        None
    }
}
