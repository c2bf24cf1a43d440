//! # Events emitted by the dispatcher.
//!
//! The [`EventKind`] enum classifies event types across two categories:
//! - **Lifecycle events**: dispatch loop state (started, stop requested, stopped)
//! - **Task events**: a task's path through the dispatcher (enqueued, launched, completed)
//!
//! The [`Event`] struct carries optional metadata such as the task id and
//! queue/gate counters observed at publish time.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases
//! monotonically. Use `seq` to restore the exact order when events are
//! delivered out of order.
//!
//! ## Example
//! ```rust
//! use taskgate::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::TaskEnqueued).with_id(3).with_queued(2);
//!
//! assert_eq!(ev.kind, EventKind::TaskEnqueued);
//! assert_eq!(ev.id, Some(3));
//! assert_eq!(ev.queued, Some(2));
//! ```

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of dispatcher events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Lifecycle events ===
    /// A dispatch loop took ownership and started draining the queue.
    ///
    /// Sets:
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    DispatchStarted,

    /// `stop` signaled an active dispatch loop.
    ///
    /// Sets:
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    StopRequested,

    /// The dispatch loop wound down (stop or fatal queue misuse).
    ///
    /// Already-launched tasks may still be running; undequeued tasks stay
    /// queued for the next start.
    ///
    /// Sets:
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    DispatchStopped,

    /// The concurrency ceiling was changed.
    ///
    /// Sets:
    /// - `limit`: the new (clamped) ceiling
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    LimitChanged,

    // === Task events ===
    /// A task was registered and stored in the queue.
    ///
    /// Sets:
    /// - `id`: registration id
    /// - `queued`: queue length right after the insert
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    TaskEnqueued,

    /// A task was dequeued and its unit spawned.
    ///
    /// Sets:
    /// - `id`: registration id
    /// - `in_flight`: running units right after admission
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    TaskLaunched,

    /// A task's unit finished and released its concurrency slot.
    ///
    /// Published whether the body returned or panicked; the dispatcher does
    /// not distinguish task outcomes.
    ///
    /// Sets:
    /// - `id`: registration id
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    TaskCompleted,
}

/// Dispatcher event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Registration id, if the event concerns a single task.
    pub id: Option<i64>,
    /// Queue length observed at publish time.
    pub queued: Option<usize>,
    /// Number of running units observed at publish time.
    pub in_flight: Option<usize>,
    /// Concurrency ceiling carried by [`EventKind::LimitChanged`].
    pub limit: Option<usize>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            id: None,
            queued: None,
            in_flight: None,
            limit: None,
        }
    }

    /// Attaches a registration id.
    #[inline]
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    /// Attaches the observed queue length.
    #[inline]
    pub fn with_queued(mut self, queued: usize) -> Self {
        self.queued = Some(queued);
        self
    }

    /// Attaches the observed number of running units.
    #[inline]
    pub fn with_in_flight(mut self, in_flight: usize) -> Self {
        self.in_flight = Some(in_flight);
        self
    }

    /// Attaches a concurrency ceiling.
    #[inline]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}
