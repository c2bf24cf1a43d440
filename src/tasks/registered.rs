//! # Registration envelope for queued tasks.
//!
//! [`Registered`] pairs a task with the identity the dispatcher assigned at
//! enqueue time. It is what queue strategies store and hand back.
//!
//! ## Rules
//! - Ids are unique per dispatcher and strictly increase from 1.
//! - The key is a snapshot of [`Task::key`](crate::Task::key) taken at
//!   registration; the task itself is never asked again.
//! - Only key-ordered queues mutate the key, through [`Registered::set_key`],
//!   while they own the entry.

use crate::tasks::task::TaskRef;

/// A task together with its registration id and key snapshot.
///
/// Queue strategies receive `Registered` values from
/// [`Dispatcher::enqueue`](crate::Dispatcher::enqueue) and return them from
/// dequeue. Custom [`Queue`](crate::Queue) implementations may inspect the id
/// and key, and update the key when asked to re-key an entry.
pub struct Registered {
    id: i64,
    key: Option<f64>,
    task: TaskRef,
}

impl Registered {
    pub(crate) fn new(id: i64, key: Option<f64>, task: TaskRef) -> Self {
        Self { id, key, task }
    }

    /// Returns the registration id (unique, starting at 1).
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Returns the current scheduling key, if any.
    pub fn key(&self) -> Option<f64> {
        self.key
    }

    /// Replaces the scheduling key.
    ///
    /// Called by key-ordered queues when
    /// [`Dispatcher::set_key`](crate::Dispatcher::set_key) repositions an entry.
    /// The stored task's own [`Task::key`](crate::Task::key) is not consulted
    /// again and keeps reporting its original value.
    pub fn set_key(&mut self, key: f64) {
        self.key = Some(key);
    }

    /// Returns the task handle.
    pub fn task(&self) -> &TaskRef {
        &self.task
    }

    /// Splits the envelope into the parts the launch path needs.
    pub(crate) fn into_parts(self) -> (i64, TaskRef) {
        (self.id, self.task)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::TaskFn;

    fn noop() -> TaskRef {
        TaskFn::arc(|_: i64| async {})
    }

    #[test]
    fn test_key_snapshot_is_independent() {
        let mut reg = Registered::new(3, Some(1.0), noop());
        assert_eq!(reg.id(), 3);
        assert_eq!(reg.key(), Some(1.0));

        reg.set_key(9.5);
        assert_eq!(reg.key(), Some(9.5));
        // the underlying task still reports whatever it was built with
        assert_eq!(reg.task().key(), None);
    }

    #[test]
    fn test_into_parts() {
        let reg = Registered::new(7, None, noop());
        let (id, _task) = reg.into_parts();
        assert_eq!(id, 7);
    }
}
