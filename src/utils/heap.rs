/*!
# Binary Max-Heap

A priority queue of `(value, score)` entries with `insert` and `remove_max`
in `O(log n)`. Part of the core toolkit for score-driven heuristics; the
current matchers keep their candidate sets in other structures, but callers
composing their own selection strategies use this heap.
*/

use crate::edge::Weight;

/// A binary max-heap over scored values, backed by a dense `Vec`.
///
/// Ties between equal scores are broken arbitrarily (heap order), so callers
/// that need determinism across equal scores must disambiguate in the score.
///
/// # Examples
/// ```
/// use wmatch::utils::MaxHeap;
///
/// let mut heap = MaxHeap::new();
/// heap.insert("low", 1);
/// heap.insert("high", 10);
/// heap.insert("mid", 5);
///
/// assert_eq!(heap.remove_max(), Some(("high", 10)));
/// assert_eq!(heap.remove_max(), Some(("mid", 5)));
/// assert_eq!(heap.remove_max(), Some(("low", 1)));
/// assert_eq!(heap.remove_max(), None);
/// ```
#[derive(Debug, Clone)]
pub struct MaxHeap<V> {
    items: Vec<(V, Weight)>,
}

impl<V> Default for MaxHeap<V> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<V> MaxHeap<V> {
    /// Creates an empty heap.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty heap with pre-allocated space for `cap` entries.
    pub fn with_capacity(cap: usize) -> Self {
        Self {
            items: Vec::with_capacity(cap),
        }
    }

    /// Returns the number of entries in the heap.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the heap holds no entries.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the entry with the maximum score without removing it.
    pub fn peek_max(&self) -> Option<(&V, Weight)> {
        self.items.first().map(|(v, s)| (v, *s))
    }

    /// Inserts a value with the given score in `O(log n)`.
    pub fn insert(&mut self, value: V, score: Weight) {
        self.items.push((value, score));
        self.sift_up(self.items.len() - 1);
    }

    /// Removes and returns the entry with the maximum score in `O(log n)`.
    pub fn remove_max(&mut self) -> Option<(V, Weight)> {
        if self.items.is_empty() {
            return None;
        }
        let last = self.items.len() - 1;
        self.items.swap(0, last);
        let max = self.items.pop();
        if !self.items.is_empty() {
            self.sift_down(0);
        }
        max
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let parent = (i - 1) / 2;
            if self.items[parent].1 >= self.items[i].1 {
                break;
            }
            self.items.swap(parent, i);
            i = parent;
        }
    }

    fn sift_down(&mut self, mut i: usize) {
        loop {
            let left = 2 * i + 1;
            let right = left + 1;
            let mut largest = i;
            if left < self.items.len() && self.items[left].1 > self.items[largest].1 {
                largest = left;
            }
            if right < self.items.len() && self.items[right].1 > self.items[largest].1 {
                largest = right;
            }
            if largest == i {
                break;
            }
            self.items.swap(i, largest);
            i = largest;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg64Mcg;

    #[test]
    fn empty_heap() {
        let mut heap: MaxHeap<u32> = MaxHeap::new();
        assert!(heap.is_empty());
        assert_eq!(heap.peek_max(), None);
        assert_eq!(heap.remove_max(), None);
    }

    #[test]
    fn orders_by_score() {
        let mut heap = MaxHeap::with_capacity(4);
        for (v, s) in [(0u32, 3), (1, 9), (2, 1), (3, 7)] {
            heap.insert(v, s);
        }
        assert_eq!(heap.len(), 4);
        assert_eq!(heap.peek_max(), Some((&1, 9)));

        let drained: Vec<_> = std::iter::from_fn(|| heap.remove_max()).collect();
        assert_eq!(drained, vec![(1, 9), (3, 7), (0, 3), (2, 1)]);
    }

    #[test]
    fn random_interleaved_operations() {
        let rng = &mut Pcg64Mcg::seed_from_u64(7);

        for _ in 0..20 {
            let mut heap = MaxHeap::new();
            let mut reference: Vec<Weight> = Vec::new();

            for _ in 0..200 {
                if reference.is_empty() || rng.random_bool(0.6) {
                    let score = rng.random_range(0..50);
                    heap.insert((), score);
                    reference.push(score);
                } else {
                    let (_, score) = heap.remove_max().unwrap();
                    let max_pos = (0..reference.len())
                        .max_by_key(|&i| reference[i])
                        .unwrap();
                    assert_eq!(score, reference.swap_remove(max_pos));
                }
                assert_eq!(heap.len(), reference.len());
            }

            while let Some((_, score)) = heap.remove_max() {
                let max_pos = (0..reference.len())
                    .max_by_key(|&i| reference[i])
                    .unwrap();
                assert_eq!(score, reference.swap_remove(max_pos));
            }
            assert!(reference.is_empty());
        }
    }
}
