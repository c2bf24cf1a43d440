//! # Sorted-vector priority queue.
//!
//! [`SortedVecPriorityQueue`] stores entries in a plain `Vec`, descending by
//! the shared law, so the next task to run always sits at the tail. Dequeue
//! is a `Vec::pop` in O(1) with no head index and no compaction; enqueue
//! binary-searches for the insertion point and shifts the suffix.
//!
//! The mirror image of
//! [`SortedArrayPriorityQueue`](crate::SortedArrayPriorityQueue): same order,
//! simpler storage, at the cost of shifting on every insert near the tail.

use std::cmp::Ordering;

use crate::error::QueueError;
use crate::queues::{priority_cmp, require_key, Queue};
use crate::tasks::Registered;

/// Key-ordered queue over a descending sorted `Vec`.
///
/// Rejects keyless tasks at enqueue time.
pub struct SortedVecPriorityQueue {
    entries: Vec<Registered>,
}

impl SortedVecPriorityQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Creates an empty queue with space reserved for `capacity` tasks.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Inserts an already-keyed entry, keeping the vector descending.
    fn insert(&mut self, task: Registered) {
        // ties: the newer entry (greater id) sits left of its elders, so the
        // elders pop first
        let at = self
            .entries
            .partition_point(|e| priority_cmp(e, &task) == Ordering::Greater);
        self.entries.insert(at, task);
    }
}

impl Queue for SortedVecPriorityQueue {
    fn enqueue(&mut self, task: Registered) -> Result<(), QueueError> {
        require_key(&task)?;
        self.insert(task);
        Ok(())
    }

    fn dequeue(&mut self) -> Result<Registered, QueueError> {
        self.entries.pop().ok_or(QueueError::Empty)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn set_key(&mut self, id: i64, key: f64) {
        let Some(pos) = self.entries.iter().position(|e| e.id() == id) else {
            return;
        };
        let mut task = self.entries.remove(pos);
        task.set_key(key);
        self.insert(task);
    }
}

impl Default for SortedVecPriorityQueue {
    fn default() -> Self {
        Self::new()
    }
}
