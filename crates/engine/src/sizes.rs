//! Per-row / per-column sizes with cached prefix sums.
//!
//! `offset(i)` is the sum of sizes before item `i`. Prefix sums are computed
//! lazily; a resize only invalidates the suffix starting at the resized item,
//! so dragging a border near the end of a large grid stays cheap, and a drag
//! near the start pays for one rescan on the next read.

use std::cell::{Cell, RefCell};

#[derive(Debug, Clone)]
pub struct SizeTrack {
    default: f32,
    sizes: Vec<f32>,
    /// prefix[i] = sum(sizes[..i]); len == sizes.len() + 1
    prefix: RefCell<Vec<f32>>,
    /// prefix[..=valid_upto] is up to date
    valid_upto: Cell<usize>,
}

impl SizeTrack {
    pub fn new(default: f32, count: usize) -> Self {
        Self {
            default,
            sizes: vec![default; count],
            prefix: RefCell::new(vec![0.0; count + 1]),
            valid_upto: Cell::new(0),
        }
    }

    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    pub fn default_size(&self) -> f32 {
        self.default
    }

    pub fn get(&self, index: usize) -> Option<f32> {
        self.sizes.get(index).copied()
    }

    pub fn sizes(&self) -> &[f32] {
        &self.sizes
    }

    /// Set one size. Returns false when out of range or unchanged.
    pub fn set(&mut self, index: usize, size: f32) -> bool {
        match self.sizes.get_mut(index) {
            Some(slot) if (*slot - size).abs() > f32::EPSILON => {
                *slot = size;
                self.invalidate_from(index);
                true
            }
            _ => false,
        }
    }

    /// Drop every override and resize to `count` default-sized items.
    pub fn reset(&mut self, count: usize) {
        self.sizes = vec![self.default; count];
        self.prefix.get_mut().resize(count + 1, 0.0);
        self.valid_upto.set(0);
    }

    pub fn push(&mut self) {
        self.sizes.push(self.default);
        self.prefix.get_mut().push(0.0);
        // The new tail entry is derived from the old total, which is still valid.
    }

    pub fn insert(&mut self, index: usize) {
        let index = index.min(self.sizes.len());
        self.sizes.insert(index, self.default);
        self.prefix.get_mut().push(0.0);
        self.invalidate_from(index);
    }

    pub fn remove(&mut self, index: usize) -> Option<f32> {
        if index >= self.sizes.len() {
            return None;
        }
        let removed = self.sizes.remove(index);
        self.prefix.get_mut().pop();
        self.invalidate_from(index);
        Some(removed)
    }

    fn invalidate_from(&self, index: usize) {
        if index < self.valid_upto.get() {
            self.valid_upto.set(index);
        }
    }

    fn ensure(&self, upto: usize) {
        let upto = upto.min(self.sizes.len());
        let start = self.valid_upto.get();
        if start >= upto {
            return;
        }
        let mut prefix = self.prefix.borrow_mut();
        for i in start..upto {
            prefix[i + 1] = prefix[i] + self.sizes[i];
        }
        self.valid_upto.set(upto);
    }

    /// Start offset of item `index`. `offset(len())` is the total.
    pub fn offset(&self, index: usize) -> f32 {
        let index = index.min(self.sizes.len());
        self.ensure(index);
        self.prefix.borrow()[index]
    }

    pub fn total(&self) -> f32 {
        self.offset(self.sizes.len())
    }

    /// Index of the item covering `pos` (start <= pos < start + size).
    pub fn index_at(&self, pos: f32) -> Option<usize> {
        if pos < 0.0 || self.sizes.is_empty() {
            return None;
        }
        self.ensure(self.sizes.len());
        let prefix = self.prefix.borrow();
        if pos >= prefix[self.sizes.len()] {
            return None;
        }
        // First prefix entry strictly greater than pos, minus one.
        let idx = prefix.partition_point(|&p| p <= pos);
        Some(idx.saturating_sub(1).min(self.sizes.len() - 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_offsets_uniform() {
        let track = SizeTrack::new(10.0, 5);
        assert_eq!(track.offset(0), 0.0);
        assert_eq!(track.offset(3), 30.0);
        assert_eq!(track.total(), 50.0);
        assert_eq!(track.index_at(0.0), Some(0));
        assert_eq!(track.index_at(9.99), Some(0));
        assert_eq!(track.index_at(10.0), Some(1));
        assert_eq!(track.index_at(50.0), None);
        assert_eq!(track.index_at(-1.0), None);
    }

    #[test]
    fn test_set_invalidates_suffix_only() {
        let mut track = SizeTrack::new(10.0, 5);
        assert_eq!(track.total(), 50.0);
        assert!(track.set(2, 25.0));
        assert_eq!(track.valid_upto.get(), 2);
        assert_eq!(track.offset(2), 20.0);
        assert_eq!(track.offset(3), 45.0);
        assert_eq!(track.total(), 65.0);
        assert_eq!(track.index_at(44.0), Some(2));
        assert!(!track.set(2, 25.0));
        assert!(!track.set(9, 25.0));
    }

    #[test]
    fn test_insert_remove_push() {
        let mut track = SizeTrack::new(10.0, 3);
        track.set(1, 30.0);
        track.insert(0);
        assert_eq!(track.len(), 4);
        assert_eq!(track.offset(2), 20.0);
        assert_eq!(track.remove(2), Some(30.0));
        assert_eq!(track.total(), 30.0);
        track.push();
        assert_eq!(track.total(), 40.0);
        track.reset(2);
        assert_eq!(track.total(), 20.0);
    }

    proptest! {
        #[test]
        fn prop_prefix_matches_naive_sum(
            sizes in proptest::collection::vec(1.0f32..50.0, 1..40),
            edits in proptest::collection::vec((0usize..40, 1.0f32..50.0), 0..10),
        ) {
            let mut track = SizeTrack::new(10.0, sizes.len());
            for (i, s) in sizes.iter().enumerate() {
                track.set(i, *s);
            }
            let mut naive = sizes.clone();
            for (i, s) in edits {
                if i < naive.len() {
                    track.set(i, s);
                    naive[i] = s;
                }
                let mut acc = 0.0f32;
                for (k, v) in naive.iter().enumerate() {
                    prop_assert!((track.offset(k) - acc).abs() < 0.01);
                    acc += v;
                }
            }
        }
    }
}
