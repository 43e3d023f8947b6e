//! Bounded retention of the best-scoring candidates.

use std::cmp::Ordering;

/// Keeps the `k` lowest-scoring entries seen so far.
///
/// Entries with equal scores keep their arrival order, so the earliest
/// candidate wins exact ties. Evicted entries are dropped immediately.
#[derive(Debug, Clone)]
pub struct TopK<T> {
    capacity: usize,
    entries: Vec<(f64, T)>,
}

impl<T> TopK<T> {
    /// Creates an empty set retaining at most `k` entries.
    pub fn new(k: usize) -> Self {
        Self {
            capacity: k,
            entries: Vec::with_capacity(k.min(64)),
        }
    }

    /// Returns the number of retained entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no entries are retained.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the worst retained score, if any.
    pub fn worst_score(&self) -> Option<f64> {
        self.entries.last().map(|(score, _)| *score)
    }

    /// Offers an entry; it is kept only while it ranks among the k lowest scores.
    pub fn push(&mut self, score: f64, value: T) {
        if self.capacity == 0 {
            return;
        }
        // First position with a strictly greater score, so equal scores
        // stay behind the entry that arrived first.
        let pos = self.entries.partition_point(|(existing, _)| {
            existing.partial_cmp(&score).unwrap_or(Ordering::Equal) != Ordering::Greater
        });
        if pos >= self.capacity {
            return;
        }
        self.entries.insert(pos, (score, value));
        self.entries.truncate(self.capacity);
    }

    /// Iterates retained entries in ascending score order.
    pub fn iter(&self) -> impl Iterator<Item = &(f64, T)> {
        self.entries.iter()
    }

    /// Consumes the set, returning entries in ascending score order.
    pub fn into_sorted_vec(self) -> Vec<(f64, T)> {
        self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_k_lowest() {
        let mut top = TopK::new(3);
        for score in [5.0, 1.0, 4.0, 2.0, 3.0] {
            top.push(score, score as i32);
        }

        let kept: Vec<f64> = top.into_sorted_vec().iter().map(|(s, _)| *s).collect();
        assert_eq!(kept, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_ascending_order() {
        let mut top = TopK::new(10);
        for score in [9.0, 3.0, 7.0, 1.0] {
            top.push(score, ());
        }

        let scores: Vec<f64> = top.iter().map(|(s, _)| *s).collect();
        assert_eq!(scores, vec![1.0, 3.0, 7.0, 9.0]);
    }

    #[test]
    fn test_tie_keeps_earliest() {
        let mut top = TopK::new(2);
        top.push(1.0, "first");
        top.push(1.0, "second");
        top.push(1.0, "third");

        let kept = top.into_sorted_vec();
        assert_eq!(kept[0].1, "first");
        assert_eq!(kept[1].1, "second");
    }

    #[test]
    fn test_tie_on_eviction_boundary() {
        let mut top = TopK::new(1);
        top.push(2.0, "a");
        top.push(2.0, "b");

        let kept = top.into_sorted_vec();
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].1, "a");
    }

    #[test]
    fn test_zero_capacity() {
        let mut top: TopK<i32> = TopK::new(0);
        top.push(1.0, 1);

        assert!(top.is_empty());
        assert_eq!(top.worst_score(), None);
    }

    #[test]
    fn test_worst_score_tracks_boundary() {
        let mut top = TopK::new(2);
        assert_eq!(top.worst_score(), None);

        top.push(4.0, ());
        assert_eq!(top.worst_score(), Some(4.0));

        top.push(6.0, ());
        assert_eq!(top.worst_score(), Some(6.0));

        top.push(1.0, ());
        assert_eq!(top.worst_score(), Some(4.0));
    }
}
