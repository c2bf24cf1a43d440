//! # Simple logging consumer for debugging and demos.
//!
//! [`LogWriter`] drains an event receiver and prints each event to stdout in
//! a human-readable format. This is primarily useful for development,
//! debugging, and examples.
//!
//! ## Output format
//! ```text
//! [enqueued] id=1 queued=3
//! [started]
//! [launched] id=1 in_flight=1
//! [completed] id=1
//! [limit] max_concurrent=4
//! [stop-requested]
//! [stopped]
//! ```
//!
//! ## Example
//! ```no_run
//! # use taskgate::{DispatchConfig, Dispatcher, LogWriter};
//! let dispatcher = Dispatcher::new(DispatchConfig::default());
//! let printer = LogWriter::attach(dispatcher.subscribe());
//! // printer is a JoinHandle; it ends when the dispatcher is dropped
//! ```

use tokio::sync::broadcast::error::RecvError;
use tokio::sync::broadcast::Receiver;
use tokio::task::JoinHandle;

use crate::events::{Event, EventKind};

/// Simple stdout logging consumer.
///
/// Enabled via the `logging` feature. Prints human-readable event
/// descriptions to stdout for debugging and demonstration purposes.
///
/// Not intended for production use; subscribe to the dispatcher directly
/// for structured logging or metrics collection.
pub struct LogWriter;

impl LogWriter {
    /// Spawns a consumer that prints every event from `rx` until the channel
    /// closes. Lagged receivers skip ahead and keep printing.
    pub fn attach(mut rx: Receiver<Event>) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(e) => Self::write(&e),
                    Err(RecvError::Lagged(_)) => continue,
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }

    fn write(e: &Event) {
        match e.kind {
            EventKind::DispatchStarted => {
                println!("[started]");
            }
            EventKind::StopRequested => {
                println!("[stop-requested]");
            }
            EventKind::DispatchStopped => {
                println!("[stopped]");
            }
            EventKind::LimitChanged => {
                if let Some(limit) = e.limit {
                    println!("[limit] max_concurrent={limit}");
                }
            }
            EventKind::TaskEnqueued => {
                if let (Some(id), Some(queued)) = (e.id, e.queued) {
                    println!("[enqueued] id={id} queued={queued}");
                }
            }
            EventKind::TaskLaunched => {
                if let (Some(id), Some(in_flight)) = (e.id, e.in_flight) {
                    println!("[launched] id={id} in_flight={in_flight}");
                }
            }
            EventKind::TaskCompleted => {
                if let Some(id) = e.id {
                    println!("[completed] id={id}");
                }
            }
        }
    }
}
