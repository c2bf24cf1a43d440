//! # Task abstraction.
//!
//! This module defines the [`Task`] trait and the common handle type
//! [`TaskRef`], an `Arc<dyn Task>` suitable for sharing across the dispatcher.
//!
//! A task receives the registration id it was assigned at enqueue time; the
//! dispatcher never inspects what the task does with it.

use std::sync::Arc;

use async_trait::async_trait;

/// Shared reference to a task (`Arc<dyn Task>`).
pub type TaskRef = Arc<dyn Task>;

/// # Asynchronous unit of work.
///
/// A `Task` has an async [`run`](Task::run) method that receives the
/// registration id assigned by [`Dispatcher::enqueue`](crate::Dispatcher::enqueue).
/// The outcome of `run` is the task's own concern: the dispatcher only tracks
/// that the unit finished and its concurrency slot is free again.
///
/// [`key`](Task::key) is the capability query for key-ordered queues: returning
/// `Some(key)` makes the task admissible to the priority strategies. The key is
/// read exactly once, at enqueue time; repositioning a task later goes through
/// [`Dispatcher::set_key`](crate::Dispatcher::set_key).
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use taskgate::Task;
///
/// struct Demo;
///
/// #[async_trait]
/// impl Task for Demo {
///     async fn run(&self, id: i64) {
///         println!("task {id} running");
///     }
///
///     fn key(&self) -> Option<f64> {
///         Some(2.5)
///     }
/// }
/// ```
#[async_trait]
pub trait Task: Send + Sync + 'static {
    /// Executes the unit of work.
    ///
    /// ### Parameters
    /// - `id`: the registration id assigned at enqueue time (unique, starting at 1)
    async fn run(&self, id: i64);

    /// Returns the scheduling key, if this task has one.
    ///
    /// The default is `None`: the task can only be placed into queues that do
    /// not order by key (FIFO/LIFO). Key-ordered queues reject keyless tasks
    /// at enqueue time with [`QueueError::KeyRequired`](crate::QueueError::KeyRequired).
    fn key(&self) -> Option<f64> {
        None
    }
}
