//! # Array-backed LIFO queue.
//!
//! [`ArrayLifo`] is a stack: the most recently enqueued task is dequeued
//! first. Push and pop are amortized O(1); the backing `Vec` doubles on
//! overflow. Keys are accepted and ignored.
//!
//! Useful for depth-first workloads, where the freshest work should run
//! before older, broader work.

use crate::error::QueueError;
use crate::queues::Queue;
use crate::tasks::Registered;

/// Last-in-first-out queue over a growable stack.
pub struct ArrayLifo {
    entries: Vec<Registered>,
}

impl ArrayLifo {
    /// Creates an empty stack.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Creates an empty stack with space reserved for `capacity` tasks.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }
}

impl Queue for ArrayLifo {
    fn enqueue(&mut self, task: Registered) -> Result<(), QueueError> {
        self.entries.push(task);
        Ok(())
    }

    fn dequeue(&mut self) -> Result<Registered, QueueError> {
        self.entries.pop().ok_or(QueueError::Empty)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

impl Default for ArrayLifo {
    fn default() -> Self {
        Self::new()
    }
}
