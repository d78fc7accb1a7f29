//! A fixed-capacity priority queue that keeps the `k` entries with the smallest priority.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::r#type::IndexableNum;

/// A wrapper around an item and its priority for use in the binary heap.
///
/// Ordered by priority, then by insertion sequence, so that among equal priorities the most
/// recently inserted entry is the maximum and is evicted first.
#[derive(Debug, Clone)]
struct Entry<T, N: IndexableNum> {
    priority: N,
    seq: u64,
    item: T,
}

impl<T, N: IndexableNum> PartialEq for Entry<T, N> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T, N: IndexableNum> Eq for Entry<T, N> {}

impl<T, N: IndexableNum> Ord for Entry<T, N> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority
            .cmp_coord(&other.priority)
            .then(self.seq.cmp(&other.seq))
    }
}

impl<T, N: IndexableNum> PartialOrd for Entry<T, N> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A max-ordered priority queue holding at most `capacity` entries.
///
/// The entry with the largest priority is the one consulted by [`peek_max`][Self::peek_max]
/// and removed by [`evict_max`][Self::evict_max]. Inserting into a full queue only succeeds
/// when the new priority is strictly smaller than the current maximum.
#[derive(Debug, Clone)]
pub struct BoundedPriorityQueue<T, N: IndexableNum> {
    capacity: usize,
    heap: BinaryHeap<Entry<T, N>>,
    next_seq: u64,
}

impl<T, N: IndexableNum> BoundedPriorityQueue<T, N> {
    /// Create an empty queue that retains at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            // +1 so that a full queue never reallocates on evict-then-push
            heap: BinaryHeap::with_capacity(capacity.saturating_add(1).min(1024)),
            next_seq: 0,
        }
    }

    /// The maximum number of entries retained.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The number of entries currently held.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Returns `true` if the queue holds no entries.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Returns `true` once `capacity` entries are held.
    pub fn is_full(&self) -> bool {
        self.heap.len() >= self.capacity
    }

    /// The priority of the worst (largest) entry, if any.
    pub fn peek_max(&self) -> Option<N> {
        self.heap.peek().map(|entry| entry.priority)
    }

    /// Remove and return the worst entry.
    pub fn evict_max(&mut self) -> Option<(T, N)> {
        self.heap.pop().map(|entry| (entry.item, entry.priority))
    }

    /// Offer an entry to the queue.
    ///
    /// Below capacity the entry is always kept. At capacity it replaces the current maximum
    /// only when `priority` is strictly smaller. Returns whether the entry was kept.
    pub fn insert(&mut self, item: T, priority: N) -> bool {
        if self.capacity == 0 {
            return false;
        }

        if self.is_full() {
            match self.peek_max() {
                Some(max) if priority < max => {
                    self.heap.pop();
                }
                _ => return false,
            }
        }

        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Entry {
            priority,
            seq,
            item,
        });
        true
    }

    /// Consume the queue, returning its entries in ascending priority order.
    ///
    /// Entries with equal priority keep their insertion order.
    pub fn into_sorted_vec(self) -> Vec<(T, N)> {
        self.heap
            .into_sorted_vec()
            .into_iter()
            .map(|entry| (entry.item, entry.priority))
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn keeps_the_smallest_entries() {
        let mut queue = BoundedPriorityQueue::new(3);
        for (item, priority) in [('a', 5.), ('b', 1.), ('c', 9.), ('d', 3.), ('e', 2.)] {
            queue.insert(item, priority);
        }
        assert_eq!(queue.len(), 3);
        assert_eq!(queue.peek_max(), Some(3.));
        assert_eq!(
            queue.into_sorted_vec(),
            vec![('b', 1.), ('e', 2.), ('d', 3.)]
        );
    }

    #[test]
    fn full_queue_rejects_equal_priority() {
        let mut queue = BoundedPriorityQueue::new(2);
        assert!(queue.insert("first", 1f64));
        assert!(queue.insert("second", 4f64));
        assert!(!queue.insert("third", 4f64));
        assert!(!queue.insert("fourth", 7f64));
        assert!(queue.insert("fifth", 0.5f64));
        assert_eq!(
            queue.into_sorted_vec(),
            vec![("fifth", 0.5), ("first", 1.)]
        );
    }

    #[test]
    fn ties_drain_in_insertion_order() {
        let mut queue = BoundedPriorityQueue::new(4);
        queue.insert(0, 2f32);
        queue.insert(1, 1f32);
        queue.insert(2, 2f32);
        queue.insert(3, 1f32);
        let items: Vec<_> = queue.into_sorted_vec().into_iter().map(|(i, _)| i).collect();
        assert_eq!(items, vec![1, 3, 0, 2]);
    }

    #[test]
    fn evict_max_pops_the_latest_of_equal_priorities() {
        let mut queue = BoundedPriorityQueue::new(3);
        queue.insert('x', 3f64);
        queue.insert('y', 3f64);
        queue.insert('z', 1f64);
        assert_eq!(queue.evict_max(), Some(('y', 3.)));
        assert_eq!(queue.evict_max(), Some(('x', 3.)));
        assert_eq!(queue.evict_max(), Some(('z', 1.)));
        assert_eq!(queue.evict_max(), None);
        assert!(queue.is_empty());
    }

    #[test]
    fn zero_capacity() {
        let mut queue = BoundedPriorityQueue::<(), f64>::new(0);
        assert!(queue.is_full());
        assert!(!queue.insert((), 0.));
        assert_eq!(queue.peek_max(), None);
        assert!(queue.into_sorted_vec().is_empty());
    }
}
