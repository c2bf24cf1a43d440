//! # Circular FIFO queue.
//!
//! [`CircularFifo`] keeps tasks in arrival order inside a growable ring
//! buffer. Enqueue and dequeue are O(1); when the ring fills up, capacity
//! doubles and the live range is relinearized to the front of the new buffer.
//!
//! This is the dispatcher's default strategy. Keys are accepted and ignored.

use crate::error::QueueError;
use crate::queues::Queue;
use crate::tasks::Registered;

const INITIAL_CAPACITY: usize = 16;

/// First-in-first-out queue over a growable ring buffer.
///
/// The live range occupies `len` slots starting at `head`, wrapping at the
/// end of the buffer. Dequeued slots are cleared so task handles drop as soon
/// as they leave the queue.
pub struct CircularFifo {
    slots: Vec<Option<Registered>>,
    head: usize,
    len: usize,
}

impl CircularFifo {
    /// Creates an empty queue with the default initial capacity.
    pub fn new() -> Self {
        Self::with_capacity(INITIAL_CAPACITY)
    }

    /// Creates an empty queue with the given initial capacity (minimum 1).
    pub fn with_capacity(capacity: usize) -> Self {
        let mut slots = Vec::new();
        slots.resize_with(capacity.max(1), || None);
        Self {
            slots,
            head: 0,
            len: 0,
        }
    }

    /// Doubles the ring, relinearizing the live range to index 0.
    fn grow(&mut self) {
        let cap = self.slots.len();
        let mut next: Vec<Option<Registered>> = Vec::new();
        next.resize_with(cap * 2, || None);
        for (i, slot) in next.iter_mut().take(self.len).enumerate() {
            *slot = self.slots[(self.head + i) % cap].take();
        }
        self.slots = next;
        self.head = 0;
    }
}

impl Queue for CircularFifo {
    fn enqueue(&mut self, task: Registered) -> Result<(), QueueError> {
        if self.len == self.slots.len() {
            self.grow();
        }
        let tail = (self.head + self.len) % self.slots.len();
        self.slots[tail] = Some(task);
        self.len += 1;
        Ok(())
    }

    fn dequeue(&mut self) -> Result<Registered, QueueError> {
        if self.len == 0 {
            return Err(QueueError::Empty);
        }
        let task = self.slots[self.head].take().ok_or(QueueError::Empty)?;
        self.head = (self.head + 1) % self.slots.len();
        self.len -= 1;
        Ok(task)
    }

    fn len(&self) -> usize {
        self.len
    }
}

impl Default for CircularFifo {
    fn default() -> Self {
        Self::new()
    }
}
