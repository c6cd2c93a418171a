//! Bounded Top-K hit collector.
//!
//! A min-heap of at most `K` hits whose root is the weakest retained hit, so a
//! candidate only has to beat the root to get in. Ranking is a total order
//! (score descending, then `db_id` ascending, then `query_id` ascending), which
//! makes the retained set independent of insertion order and of how worker
//! collectors are merged.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

/// One scored (query channel, database sequence) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Hit {
    pub db_id: usize,
    pub query_id: usize,
    pub score: i64,
}

impl Hit {
    pub fn new(db_id: usize, query_id: usize, score: i64) -> Self {
        Self {
            db_id,
            query_id,
            score,
        }
    }
}

/// `Hit` ordered so that `Greater` means "ranks better".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Ranked(Hit);

impl Ord for Ranked {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .score
            .cmp(&other.0.score)
            .then_with(|| other.0.db_id.cmp(&self.0.db_id))
            .then_with(|| other.0.query_id.cmp(&self.0.query_id))
    }
}

impl PartialOrd for Ranked {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Clone)]
pub struct TopK {
    capacity: usize,
    heap: BinaryHeap<Reverse<Ranked>>,
}

impl TopK {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            heap: BinaryHeap::with_capacity(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Insert while below capacity, otherwise replace the weakest hit if
    /// `hit` ranks strictly better. Returns whether `hit` was retained.
    pub fn add(&mut self, hit: Hit) -> bool {
        if self.capacity == 0 {
            return false;
        }
        let candidate = Ranked(hit);
        if self.heap.len() < self.capacity {
            self.heap.push(Reverse(candidate));
            return true;
        }
        match self.heap.peek_mut() {
            Some(mut weakest) if candidate > weakest.0 => {
                *weakest = Reverse(candidate);
                true
            }
            _ => false,
        }
    }

    /// Weakest retained hit.
    pub fn min(&self) -> Option<Hit> {
        self.heap.peek().map(|r| r.0.0)
    }

    /// Fold another collector in; the result is the top K of the union.
    pub fn merge(mut self, other: TopK) -> TopK {
        let (mut big, small) = if self.heap.len() >= other.heap.len() {
            (std::mem::take(&mut self), other)
        } else {
            (other, self)
        };
        big.capacity = big.capacity.max(small.capacity);
        for Reverse(Ranked(hit)) in small.heap {
            big.add(hit);
        }
        big
    }

    /// Retained hits, best first.
    pub fn sorted(&self) -> Vec<Hit> {
        self.clone().into_sorted()
    }

    /// Retained hits, best first.
    pub fn into_sorted(self) -> Vec<Hit> {
        // Ascending order of Reverse<Ranked> is best-first.
        self.heap
            .into_sorted_vec()
            .into_iter()
            .map(|Reverse(Ranked(hit))| hit)
            .collect()
    }
}

impl Default for TopK {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounded_and_sorted() {
        let mut topk = TopK::new(3);
        for (db_id, score) in [(0, 5), (1, 9), (2, 1), (3, 7), (4, 9), (5, 2)] {
            topk.add(Hit::new(db_id, 0, score));
            assert!(topk.len() <= 3);
        }
        let scores: Vec<(usize, i64)> = topk.into_sorted().iter().map(|h| (h.db_id, h.score)).collect();
        assert_eq!(scores, vec![(1, 9), (4, 9), (3, 7)]);
    }

    #[test]
    fn test_ties_prefer_lower_ids() {
        let mut topk = TopK::new(2);
        topk.add(Hit::new(7, 0, 4));
        topk.add(Hit::new(3, 1, 4));
        // Same score, higher db id: rejected.
        assert!(!topk.add(Hit::new(9, 0, 4)));
        // Lower db id than the weakest (7, 0): replaces it.
        assert!(topk.add(Hit::new(3, 0, 4)));
        let hits = topk.into_sorted();
        assert_eq!(hits, vec![Hit::new(3, 0, 4), Hit::new(3, 1, 4)]);
    }

    #[test]
    fn test_min_and_zero_capacity() {
        let mut empty = TopK::new(0);
        assert!(!empty.add(Hit::new(0, 0, 100)));
        assert!(empty.is_empty());

        let mut topk = TopK::new(2);
        topk.add(Hit::new(0, 0, 10));
        topk.add(Hit::new(1, 0, -3));
        assert_eq!(topk.min(), Some(Hit::new(1, 0, -3)));
    }

    #[test]
    fn test_merge_equals_single_collector() {
        let hits: Vec<Hit> = (0..50).map(|i| Hit::new(i, i % 3, ((i * 37) % 11) as i64)).collect();
        let mut all = TopK::new(5);
        let mut left = TopK::new(5);
        let mut right = TopK::new(5);
        for (i, h) in hits.iter().enumerate() {
            all.add(*h);
            if i % 2 == 0 {
                left.add(*h);
            } else {
                right.add(*h);
            }
        }
        assert_eq!(left.merge(right).into_sorted(), all.into_sorted());
    }
}
