//! Error types used by the dispatcher and queue strategies.
//!
//! This module defines two error enums:
//!
//! - [`DispatchError`] — errors raised by the dispatcher surface itself.
//! - [`QueueError`] — errors raised by queue strategies on misuse.
//!
//! Both types provide helper methods (`as_label`, `as_message`) for logging/metrics.
//! Failures *inside* task bodies are deliberately not represented here: the
//! dispatcher treats task outcomes as opaque.

use thiserror::Error;

/// # Errors produced by queue strategies.
///
/// These are caller mistakes, surfaced synchronously from the call that made them.
/// There is no transient/retryable class: every variant means the call was wrong,
/// not that the system is busy.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum QueueError {
    /// Dequeue was called on an empty queue.
    #[error("queue is empty")]
    Empty,

    /// A task without a scheduling key was enqueued into a key-ordered queue.
    #[error("task {id} has no key; this queue orders by key")]
    KeyRequired {
        /// Registration id the task would have received.
        id: i64,
    },
}

impl QueueError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use taskgate::QueueError;
    ///
    /// assert_eq!(QueueError::Empty.as_label(), "queue_empty");
    /// assert_eq!(QueueError::KeyRequired { id: 7 }.as_label(), "queue_key_required");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            QueueError::Empty => "queue_empty",
            QueueError::KeyRequired { .. } => "queue_key_required",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            QueueError::Empty => "queue is empty".to_string(),
            QueueError::KeyRequired { id } => format!("task {id} requires a key"),
        }
    }
}

/// # Errors produced by the dispatcher surface.
///
/// Queue misuse bubbles up through [`DispatchError::Queue`]; the only error the
/// dispatcher adds on its own is the re-entrant start.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum DispatchError {
    /// `run` was called while another dispatch loop was still active.
    #[error("dispatcher is already running")]
    AlreadyStarted,

    /// A queue strategy rejected the call.
    #[error(transparent)]
    Queue(#[from] QueueError),
}

impl DispatchError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use taskgate::{DispatchError, QueueError};
    ///
    /// assert_eq!(DispatchError::AlreadyStarted.as_label(), "dispatch_already_started");
    ///
    /// let err = DispatchError::from(QueueError::Empty);
    /// assert_eq!(err.as_label(), "queue_empty");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            DispatchError::AlreadyStarted => "dispatch_already_started",
            DispatchError::Queue(e) => e.as_label(),
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            DispatchError::AlreadyStarted => "dispatcher is already running".to_string(),
            DispatchError::Queue(e) => e.as_message(),
        }
    }
}
