//! # Sorted-array priority queue.
//!
//! [`SortedArrayPriorityQueue`] keeps its live entries contiguous and sorted
//! ascending by the shared law, behind a head index. Dequeue just advances
//! the head in O(1), leaving a dead prefix; enqueue binary-searches for the
//! insertion point and shifts the tail. When the tail hits capacity the live
//! range is compacted back to the front, and the buffer doubles only when
//! every slot is live.
//!
//! Compare [`SortedVecPriorityQueue`](crate::SortedVecPriorityQueue), which
//! stores the same order descending and never needs compaction.

use std::cmp::Ordering;

use crate::error::QueueError;
use crate::queues::{priority_cmp, require_key, Queue};
use crate::tasks::Registered;

const INITIAL_CAPACITY: usize = 16;

/// Key-ordered queue over ascending sorted slots with a dead prefix.
///
/// Rejects keyless tasks at enqueue time.
pub struct SortedArrayPriorityQueue {
    slots: Vec<Option<Registered>>,
    head: usize,
    len: usize,
}

impl SortedArrayPriorityQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            head: 0,
            len: 0,
        }
    }

    /// Creates an empty queue with the given initial capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut slots = Vec::new();
        slots.resize_with(capacity, || None);
        Self {
            slots,
            head: 0,
            len: 0,
        }
    }

    /// Ensures one free slot past the live range.
    ///
    /// Compacts the dead prefix first; doubles the buffer only when every
    /// slot is live.
    fn make_room(&mut self) {
        if self.head + self.len < self.slots.len() {
            return;
        }
        if self.len == self.slots.len() {
            let mut next: Vec<Option<Registered>> = Vec::new();
            next.resize_with((self.slots.len() * 2).max(INITIAL_CAPACITY), || None);
            for (i, slot) in next.iter_mut().take(self.len).enumerate() {
                *slot = self.slots[self.head + i].take();
            }
            self.slots = next;
        } else {
            for i in 0..self.len {
                self.slots[i] = self.slots[self.head + i].take();
            }
        }
        self.head = 0;
    }

    /// Inserts an already-keyed entry at its sorted position.
    fn insert(&mut self, task: Registered) {
        self.make_room();

        // first live offset that orders after the new entry; ties land after
        // their elders because the law includes the id
        let mut lo = 0;
        let mut hi = self.len;
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            let after = match self.slots[self.head + mid].as_ref() {
                Some(existing) => priority_cmp(existing, &task) == Ordering::Greater,
                None => true,
            };
            if after {
                hi = mid;
            } else {
                lo = mid + 1;
            }
        }

        let mut i = self.len;
        while i > lo {
            self.slots[self.head + i] = self.slots[self.head + i - 1].take();
            i -= 1;
        }
        self.slots[self.head + lo] = Some(task);
        self.len += 1;
    }
}

impl Queue for SortedArrayPriorityQueue {
    fn enqueue(&mut self, task: Registered) -> Result<(), QueueError> {
        require_key(&task)?;
        self.insert(task);
        Ok(())
    }

    fn dequeue(&mut self) -> Result<Registered, QueueError> {
        if self.len == 0 {
            return Err(QueueError::Empty);
        }
        let task = self.slots[self.head].take().ok_or(QueueError::Empty)?;
        self.head += 1;
        self.len -= 1;
        if self.len == 0 {
            self.head = 0;
        }
        Ok(task)
    }

    fn len(&self) -> usize {
        self.len
    }

    fn set_key(&mut self, id: i64, key: f64) {
        let found = (0..self.len).find(|&i| {
            self.slots[self.head + i]
                .as_ref()
                .is_some_and(|e| e.id() == id)
        });
        let Some(offset) = found else {
            return;
        };
        let Some(mut task) = self.slots[self.head + offset].take() else {
            return;
        };
        // close the gap, then reinsert through the ordinary path
        for i in offset..self.len - 1 {
            self.slots[self.head + i] = self.slots[self.head + i + 1].take();
        }
        self.len -= 1;
        task.set_key(key);
        self.insert(task);
    }
}

impl Default for SortedArrayPriorityQueue {
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
        let mut queue = SortedArrayPriorityQueue::new();
        for (id, key) in [(1, 3.0), (2, 1.0), (3, 2.0), (4, 1.5)] {
            queue.enqueue(reg(id, Some(key))).unwrap();
        }
        assert_eq!(drain_ids(&mut queue), vec![2, 4, 3, 1]);
    }

    #[test]
    fn test_compaction_and_growth_keep_order() {
        let mut queue = SortedArrayPriorityQueue::with_capacity(4);
        for (id, key) in [(1, 10.0), (2, 20.0), (3, 30.0), (4, 40.0)] {
            queue.enqueue(reg(id, Some(key))).unwrap();
        }
        // leave a dead prefix, then force a compaction and a doubling
        assert_eq!(queue.dequeue().unwrap().id(), 1);
        assert_eq!(queue.dequeue().unwrap().id(), 2);
        queue.enqueue(reg(5, Some(5.0))).unwrap(); // compaction path
        queue.enqueue(reg(6, Some(35.0))).unwrap();
        queue.enqueue(reg(7, Some(100.0))).unwrap(); // growth path
        assert_eq!(queue.len(), 5);
        assert_eq!(drain_ids(&mut queue), vec![5, 3, 6, 4, 7]);
    }

    #[test]
    fn test_keyless_task_is_rejected() {
        let mut queue = SortedArrayPriorityQueue::new();
        let err = queue.enqueue(reg(9, None)).unwrap_err();
        assert!(matches!(err, QueueError::KeyRequired { id: 9 }));
    }

    #[test]
    fn test_set_key_repositions_within_live_range() {
        let mut queue = SortedArrayPriorityQueue::new();
        for id in 1..=4 {
            queue.enqueue(reg(id, Some(id as f64))).unwrap();
        }
        queue.dequeue().unwrap(); // head moves off zero
        queue.set_key(4, 0.0);
        queue.set_key(999, 0.0); // unknown id: ignored
        assert_eq!(drain_ids(&mut queue), vec![4, 2, 3]);
    }
}
