//! Queue position history
//!
//! Stack of queue indices visited before the current one. Serves both
//! "previous" (pop restores the exact prior position, shuffled or not)
//! and shuffle's avoidance of already visited tracks.

use std::collections::VecDeque;

/// Bounded stack of visited queue indices
///
/// When full, the oldest entry is discarded.
#[derive(Debug, Clone)]
pub struct History {
    /// Visited indices (most recent = back)
    indices: VecDeque<usize>,

    /// Maximum history size
    max_size: usize,
}

impl History {
    /// Create new history with specified maximum size
    pub fn new(max_size: usize) -> Self {
        Self {
            indices: VecDeque::new(),
            max_size: max_size.max(1),
        }
    }

    /// Push a visited index
    ///
    /// Returns `true` if the oldest entry was discarded to make room.
    pub fn push(&mut self, index: usize) -> bool {
        let evicted = if self.indices.len() >= self.max_size {
            self.indices.pop_front();
            true
        } else {
            false
        };
        self.indices.push_back(index);
        evicted
    }

    /// Pop most recent index
    pub fn pop(&mut self) -> Option<usize> {
        self.indices.pop_back()
    }

    /// Most recent index (without removing)
    pub fn peek(&self) -> Option<usize> {
        self.indices.back().copied()
    }

    /// Entries from position `start` onwards (oldest first)
    pub fn since(&self, start: usize) -> impl Iterator<Item = usize> + '_ {
        self.indices.iter().skip(start).copied()
    }

    /// Fix up entries after the queue entry at `removed` was deleted
    ///
    /// Entries pointing at the removed slot are dropped, later ones shift down.
    pub fn remove_index(&mut self, removed: usize) {
        self.indices.retain(|&index| index != removed);
        for index in &mut self.indices {
            if *index > removed {
                *index -= 1;
            }
        }
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn clear(&mut self) {
        self.indices.clear();
    }

    /// Get maximum history size
    pub fn max_size(&self) -> usize {
        self.max_size
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(1000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_pop_is_lifo() {
        let mut history = History::new(10);
        history.push(3);
        history.push(1);
        history.push(4);

        assert_eq!(history.pop(), Some(4));
        assert_eq!(history.pop(), Some(1));
        assert_eq!(history.peek(), Some(3));
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn bounded_size_discards_oldest() {
        let mut history = History::new(2);
        assert!(!history.push(0));
        assert!(!history.push(1));
        assert!(history.push(2));

        assert_eq!(history.since(0).collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn remove_index_drops_and_shifts() {
        let mut history = History::new(10);
        for index in [0, 2, 1, 3] {
            history.push(index);
        }

        history.remove_index(1);

        assert_eq!(history.since(0).collect::<Vec<_>>(), vec![0, 1, 2]);
    }

    #[test]
    fn since_skips_earlier_entries() {
        let mut history = History::default();
        for index in 0..5 {
            history.push(index);
        }

        assert_eq!(history.since(3).collect::<Vec<_>>(), vec![3, 4]);
        assert_eq!(history.since(9).count(), 0);
    }

    #[test]
    fn zero_capacity_is_raised_to_one() {
        let mut history = History::new(0);
        history.push(7);
        assert_eq!(history.max_size(), 1);
        assert_eq!(history.pop(), Some(7));
    }
}
