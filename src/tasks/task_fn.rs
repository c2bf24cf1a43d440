//! # Function-backed task (`TaskFn`)
//!
//! [`TaskFn`] wraps a closure `F: Fn(i64) -> Fut`, producing a fresh future per
//! run. This avoids shared mutable state: if the closure needs shared state,
//! capture an `Arc<...>` explicitly.
//!
//! ## Example
//! ```rust
//! use taskgate::{TaskFn, TaskRef};
//!
//! let plain: TaskRef = TaskFn::arc(|id: i64| async move {
//!     println!("task {id}");
//! });
//! assert_eq!(plain.key(), None);
//!
//! let keyed: TaskRef = TaskFn::keyed_arc(1.5, |_id: i64| async {});
//! assert_eq!(keyed.key(), Some(1.5));
//! ```

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::tasks::task::Task;

/// Function-backed task implementation.
///
/// Wraps a closure that *creates* a new future per run, plus an optional
/// scheduling key reported through [`Task::key`].
#[derive(Debug)]
pub struct TaskFn<F> {
    f: F,
    key: Option<f64>,
}

impl<F> TaskFn<F> {
    /// Creates a new keyless function-backed task.
    ///
    /// Prefer [`TaskFn::arc`] when you immediately need a [`TaskRef`](crate::TaskRef).
    pub fn new(f: F) -> Self {
        Self { f, key: None }
    }

    /// Creates a new function-backed task carrying a scheduling key.
    pub fn keyed(key: f64, f: F) -> Self {
        Self { f, key: Some(key) }
    }

    /// Creates a keyless task and returns it as a shared handle.
    ///
    /// ## Example
    /// ```rust
    /// use taskgate::{TaskFn, TaskRef};
    ///
    /// let t: TaskRef = TaskFn::arc(|_id: i64| async {});
    /// assert!(t.key().is_none());
    /// ```
    pub fn arc(f: F) -> Arc<Self> {
        Arc::new(Self::new(f))
    }

    /// Creates a keyed task and returns it as a shared handle.
    pub fn keyed_arc(key: f64, f: F) -> Arc<Self> {
        Arc::new(Self::keyed(key, f))
    }
}

#[async_trait]
impl<F, Fut> Task for TaskFn<F>
where
    F: Fn(i64) -> Fut + Send + Sync + 'static, // Fn, not FnOnce: one closure, many runs
    Fut: Future<Output = ()> + Send + 'static,
{
    async fn run(&self, id: i64) {
        (self.f)(id).await;
    }

    fn key(&self) -> Option<f64> {
        self.key
    }
}
