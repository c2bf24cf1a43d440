//! # Queue strategies for pending tasks.
//!
//! The dispatcher stores registered tasks in a [`Queue`] until a concurrency
//! slot frees up. The strategy decides which task runs next:
//!
//! | Strategy | Order | Backing storage |
//! |---|---|---|
//! | [`CircularFifo`] | first in, first out | growable ring buffer |
//! | [`ArrayLifo`] | last in, first out | growable stack |
//! | [`HeapPriorityQueue`] | ascending key | binary min-heap |
//! | [`SortedArrayPriorityQueue`] | ascending key | sorted slots with a dead prefix |
//! | [`SortedVecPriorityQueue`] | ascending key | descending `Vec`, popped from the tail |
//!
//! ## Ordering law
//! Every key-ordered strategy obeys the same law: repeated dequeues yield
//! entries in non-decreasing key order, and entries with equal keys come out
//! in registration order (ascending id). Keys are compared with
//! [`f64::total_cmp`], so NaN keys are a defined, if odd, input: they sort
//! after every finite key and `+inf`.
//!
//! ## Rules
//! - Strategies are **not** thread-safe on their own; the dispatcher wraps
//!   every call in its own lock. The `Send` bound only lets the boxed
//!   strategy move into the dispatcher.
//! - Dequeue on an empty queue is an error ([`QueueError::Empty`]), never a
//!   default value.
//! - Key-ordered strategies reject keyless tasks at enqueue time with
//!   [`QueueError::KeyRequired`]; FIFO/LIFO accept any task and ignore keys.

mod fifo;
mod heap;
mod lifo;
mod sorted_array;
mod sorted_vec;

pub use fifo::CircularFifo;
pub use heap::HeapPriorityQueue;
pub use lifo::ArrayLifo;
pub use sorted_array::SortedArrayPriorityQueue;
pub use sorted_vec::SortedVecPriorityQueue;

use std::cmp::Ordering;

use crate::error::QueueError;
use crate::tasks::Registered;

/// # Storage strategy for pending tasks.
///
/// The dispatcher owns the queue behind a lock and is the only caller; an
/// implementation just has to keep its own ordering promise.
///
/// # Example
/// ```
/// use std::collections::VecDeque;
/// use taskgate::{Queue, QueueError, Registered};
///
/// /// Unbounded FIFO that ignores keys.
/// struct SimpleFifo(VecDeque<Registered>);
///
/// impl Queue for SimpleFifo {
///     fn enqueue(&mut self, task: Registered) -> Result<(), QueueError> {
///         self.0.push_back(task);
///         Ok(())
///     }
///
///     fn dequeue(&mut self) -> Result<Registered, QueueError> {
///         self.0.pop_front().ok_or(QueueError::Empty)
///     }
///
///     fn len(&self) -> usize {
///         self.0.len()
///     }
/// }
/// ```
pub trait Queue: Send {
    /// Stores a registered task.
    ///
    /// Key-ordered strategies fail with [`QueueError::KeyRequired`] when the
    /// entry carries no key; the dispatcher then discards the registration
    /// without consuming its id.
    fn enqueue(&mut self, task: Registered) -> Result<(), QueueError>;

    /// Removes and returns the next task according to the strategy's order.
    ///
    /// Fails with [`QueueError::Empty`] when there is nothing to dequeue.
    fn dequeue(&mut self) -> Result<Registered, QueueError>;

    /// Returns the number of stored tasks.
    fn len(&self) -> usize;

    /// Returns `true` when nothing is stored.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Replaces the key of the entry with the given id, repositioning it.
    ///
    /// Unknown ids are ignored (the task may already be running or done).
    /// The default is a no-op for strategies that do not order by key.
    fn set_key(&mut self, _id: i64, _key: f64) {}
}

/// Ordering shared by every key-ordered strategy: ascending key, ties broken
/// by ascending id (registration order).
///
/// Entries without keys never reach a key-ordered strategy; the id fallback
/// only keeps the function total.
pub(crate) fn priority_cmp(a: &Registered, b: &Registered) -> Ordering {
    match (a.key(), b.key()) {
        (Some(ka), Some(kb)) => ka.total_cmp(&kb).then_with(|| a.id().cmp(&b.id())),
        _ => a.id().cmp(&b.id()),
    }
}

/// Rejects keyless entries on behalf of key-ordered strategies.
pub(crate) fn require_key(task: &Registered) -> Result<(), QueueError> {
    if task.key().is_none() {
        return Err(QueueError::KeyRequired { id: task.id() });
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::tasks::{Registered, TaskFn, TaskRef};

    use super::Queue;

    pub(crate) fn reg(id: i64, key: Option<f64>) -> Registered {
        let task: TaskRef = TaskFn::arc(|_: i64| async {});
        Registered::new(id, key, task)
    }

    pub(crate) fn drain_ids(queue: &mut dyn Queue) -> Vec<i64> {
        let mut ids = Vec::new();
        while let Ok(entry) = queue.dequeue() {
            ids.push(entry.id());
        }
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{drain_ids, reg};
    use super::*;

    /// Same keyed input must drain identically from every key-ordered strategy.
    #[test]
    fn test_key_ordered_strategies_agree() {
        let input: Vec<(i64, f64)> = vec![
            (1, 4.0),
            (2, 1.5),
            (3, 4.0),
            (4, -2.0),
            (5, 0.0),
            (6, 1.5),
            (7, 100.0),
        ];
        let expected = vec![4, 5, 2, 6, 1, 3, 7];

        let mut strategies: Vec<Box<dyn Queue>> = vec![
            Box::new(HeapPriorityQueue::new()),
            Box::new(SortedArrayPriorityQueue::new()),
            Box::new(SortedVecPriorityQueue::new()),
        ];
        for queue in &mut strategies {
            for (id, key) in &input {
                queue
                    .enqueue(reg(*id, Some(*key)))
                    .unwrap_or_else(|e| panic!("enqueue of {id} failed: {e}"));
            }
            assert_eq!(drain_ids(queue.as_mut()), expected);
        }
    }

    #[test]
    fn test_equal_keys_drain_in_registration_order() {
        let mut strategies: Vec<Box<dyn Queue>> = vec![
            Box::new(HeapPriorityQueue::new()),
            Box::new(SortedArrayPriorityQueue::new()),
            Box::new(SortedVecPriorityQueue::new()),
        ];
        for queue in &mut strategies {
            for id in 1..=6 {
                queue.enqueue(reg(id, Some(7.0))).unwrap();
            }
            assert_eq!(drain_ids(queue.as_mut()), vec![1, 2, 3, 4, 5, 6]);
        }
    }

    /// Re-keying must reposition identically in every key-ordered strategy.
    #[test]
    fn test_rekey_agrees_across_strategies() {
        let mut strategies: Vec<Box<dyn Queue>> = vec![
            Box::new(HeapPriorityQueue::new()),
            Box::new(SortedArrayPriorityQueue::new()),
            Box::new(SortedVecPriorityQueue::new()),
        ];
        for queue in &mut strategies {
            for (id, key) in [(1, 1.0), (2, 2.0), (3, 3.0)] {
                queue.enqueue(reg(id, Some(key))).unwrap();
            }
            // the last registration jumps the line and dequeues first
            queue.set_key(3, 0.5);
            assert_eq!(drain_ids(queue.as_mut()), vec![3, 1, 2]);
        }
    }

    #[test]
    fn test_every_strategy_fails_empty_dequeue() {
        let mut strategies: Vec<Box<dyn Queue>> = vec![
            Box::new(CircularFifo::new()),
            Box::new(ArrayLifo::new()),
            Box::new(HeapPriorityQueue::new()),
            Box::new(SortedArrayPriorityQueue::new()),
            Box::new(SortedVecPriorityQueue::new()),
        ];
        for queue in &mut strategies {
            assert!(matches!(queue.dequeue(), Err(QueueError::Empty)));
            // drained queues fail the same way as never-used ones
            queue.enqueue(reg(1, Some(1.0))).unwrap();
            queue.dequeue().unwrap();
            assert!(matches!(queue.dequeue(), Err(QueueError::Empty)));
            assert!(queue.is_empty());
        }
    }

    #[test]
    fn test_nan_keys_sort_last() {
        let mut queue = HeapPriorityQueue::new();
        queue.enqueue(reg(1, Some(f64::NAN))).unwrap();
        queue.enqueue(reg(2, Some(f64::INFINITY))).unwrap();
        queue.enqueue(reg(3, Some(0.0))).unwrap();
        assert_eq!(drain_ids(&mut queue), vec![3, 2, 1]);
    }
}
