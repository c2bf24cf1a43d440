//! # Binary-heap priority queue.
//!
//! [`HeapPriorityQueue`] keeps entries in a binary min-heap over a `Vec`,
//! ordered by the shared law (ascending key, ties by registration order).
//! Enqueue and dequeue are O(log n); re-keying scans for the entry in O(n)
//! and then fixes the heap with a single sift.
//!
//! The heap is the strategy of choice when keys arrive in arbitrary order
//! and the queue gets large: it never shifts contiguous ranges the way the
//! sorted strategies do.

use std::cmp::Ordering;

use crate::error::QueueError;
use crate::queues::{priority_cmp, require_key, Queue};
use crate::tasks::Registered;

/// Key-ordered queue backed by a binary min-heap.
///
/// Rejects keyless tasks at enqueue time.
pub struct HeapPriorityQueue {
    items: Vec<Registered>,
}

impl HeapPriorityQueue {
    /// Creates an empty heap.
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Moves the entry at `pos` up until its parent orders before it.
    /// Returns the entry's final position.
    fn sift_up(&mut self, mut pos: usize) -> usize {
        while pos > 0 {
            let parent = (pos - 1) / 2;
            if priority_cmp(&self.items[pos], &self.items[parent]) == Ordering::Less {
                self.items.swap(pos, parent);
                pos = parent;
            } else {
                break;
            }
        }
        pos
    }

    /// Moves the entry at `pos` down until both children order after it.
    fn sift_down(&mut self, mut pos: usize) {
        loop {
            let left = 2 * pos + 1;
            if left >= self.items.len() {
                break;
            }
            let mut child = left;
            let right = left + 1;
            if right < self.items.len()
                && priority_cmp(&self.items[right], &self.items[left]) == Ordering::Less
            {
                child = right;
            }
            if priority_cmp(&self.items[child], &self.items[pos]) == Ordering::Less {
                self.items.swap(pos, child);
                pos = child;
            } else {
                break;
            }
        }
    }
}

impl Queue for HeapPriorityQueue {
    fn enqueue(&mut self, task: Registered) -> Result<(), QueueError> {
        require_key(&task)?;
        self.items.push(task);
        self.sift_up(self.items.len() - 1);
        Ok(())
    }

    fn dequeue(&mut self) -> Result<Registered, QueueError> {
        if self.items.is_empty() {
            return Err(QueueError::Empty);
        }
        let last = self.items.len() - 1;
        self.items.swap(0, last);
        let task = self.items.pop().ok_or(QueueError::Empty)?;
        if !self.items.is_empty() {
            self.sift_down(0);
        }
        Ok(task)
    }

    fn len(&self) -> usize {
        self.items.len()
    }

    fn set_key(&mut self, id: i64, key: f64) {
        let Some(pos) = self.items.iter().position(|e| e.id() == id) else {
            return;
        };
        self.items[pos].set_key(key);
        // one direction suffices: a raised key sinks, a lowered key rises
        if self.sift_up(pos) == pos {
            self.sift_down(pos);
        }
    }
}

impl Default for HeapPriorityQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queues::testing::{drain_ids, reg};

    #[test]
    fn test_ascending_key_order() {
        let mut queue = HeapPriorityQueue::new();
        for (id, key) in [(1, 9.0), (2, -4.0), (3, 2.5), (4, 0.0), (5, 2.4)] {
            queue.enqueue(reg(id, Some(key))).unwrap();
        }
        assert_eq!(drain_ids(&mut queue), vec![2, 4, 5, 3, 1]);
    }

    #[test]
    fn test_keyless_task_is_rejected() {
        let mut queue = HeapPriorityQueue::new();
        let err = queue.enqueue(reg(11, None)).unwrap_err();
        assert!(matches!(err, QueueError::KeyRequired { id: 11 }));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_set_key_moves_entry_to_front() {
        let mut queue = HeapPriorityQueue::new();
        for id in 1..=5 {
            queue.enqueue(reg(id, Some(id as f64))).unwrap();
        }
        queue.set_key(5, -1.0);
        assert_eq!(drain_ids(&mut queue), vec![5, 1, 2, 3, 4]);
    }

    #[test]
    fn test_set_key_moves_entry_to_back() {
        let mut queue = HeapPriorityQueue::new();
        for id in 1..=5 {
            queue.enqueue(reg(id, Some(id as f64))).unwrap();
        }
        queue.set_key(1, 10.0);
        assert_eq!(drain_ids(&mut queue), vec![2, 3, 4, 5, 1]);
    }

    #[test]
    fn test_set_key_unknown_id_is_ignored() {
        let mut queue = HeapPriorityQueue::new();
        queue.enqueue(reg(1, Some(1.0))).unwrap();
        queue.set_key(42, 0.0);
        assert_eq!(drain_ids(&mut queue), vec![1]);
    }

    #[test]
    fn test_rekey_onto_existing_key_keeps_registration_order() {
        let mut queue = HeapPriorityQueue::new();
        queue.enqueue(reg(1, Some(1.0))).unwrap();
        queue.enqueue(reg(2, Some(2.0))).unwrap();
        queue.enqueue(reg(3, Some(3.0))).unwrap();
        // id 3 now ties with id 1; the older registration still wins
        queue.set_key(3, 1.0);
        assert_eq!(drain_ids(&mut queue), vec![1, 3, 2]);
    }
}
