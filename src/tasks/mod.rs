//! # Task abstractions and registration envelope.
//!
//! This module provides the core task-related types:
//! - [`Task`] - trait for implementing async units of work
//! - [`TaskFn`] - function-based task implementation
//! - [`TaskRef`] - shared reference to a task (`Arc<dyn Task>`)
//! - [`Registered`] - a task paired with its registration id and key snapshot

mod registered;
mod task;
mod task_fn;

pub use registered::Registered;
pub use task::{Task, TaskRef};
pub use task_fn::TaskFn;
