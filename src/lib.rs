//! # taskgate
//!
//! **Taskgate** is a bounded-concurrency task dispatcher for Rust.
//!
//! It accepts async tasks from any thread, holds them in a pluggable queue
//! strategy, and launches at most `max_concurrent` of them at once. The crate
//! is designed as a building block for crawlers, batch runners, and anything
//! else that needs "run these, but never more than N at a time".
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │   TaskRef    │   │   TaskRef    │   │   TaskRef    │
//!     │(user task #1)│   │(user task #2)│   │(user task #3)│
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            │ enqueue          │ enqueue          │ enqueue
//!            ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Dispatcher                                                       │
//! │  - assigns ids (1, 2, 3, ...)                                     │
//! │  - Queue strategy (FIFO / LIFO / key-ordered, swappable)          │
//! │  - Gate (concurrency ceiling with RAII slot permits)              │
//! │  - Bus (broadcast events)                                         │
//! └──────┬──────────────────┬──────────────────┬──────────────────────┘
//!        ▼ spawn            ▼ spawn            ▼ spawn
//!   ┌──────────┐       ┌──────────┐       ┌──────────┐
//!   │   unit   │       │   unit   │       │   unit   │  at most
//!   │task.run()│       │task.run()│       │task.run()│  max_concurrent
//!   └────┬─────┘       └────┬─────┘       └────┬─────┘
//!        │                  │                  │
//!        └── permit drop ───┴── wakes the loop ┘
//!                           │
//!                           ▼
//!              Bus (TaskCompleted, capacity: DispatchConfig::bus_capacity)
//! ```
//!
//! ### Dispatch flow
//! ```text
//! enqueue(task) ──► id = last_id + 1 ──► Queue::enqueue(Registered{id, key, task})
//!                                        (wakes the loop if it is parked)
//!
//! run() {
//!   install a fresh CancellationToken, publish DispatchStarted
//!   loop {
//!     ├─► exit if stop() was called
//!     ├─► wait until the queue is non-empty        (cancellable)
//!     ├─► wait until in_flight < max_concurrent    (cancellable)
//!     ├─► dequeue the head (the strategy decides which task that is)
//!     └─► tokio::spawn(unit): task.run(id) ─► release slot ─► TaskCompleted
//!   }
//!   publish DispatchStopped
//! }
//!
//! stop() ──► cancel the token; in-flight units finish on their own and
//!            undequeued tasks stay queued for the next run()
//! ```
//!
//! ## Features
//! | Area               | Description                                                      | Key types / traits                    |
//! |--------------------|------------------------------------------------------------------|---------------------------------------|
//! | **Dispatching**    | Bounded-concurrency launch loop with start/stop lifecycle.       | [`Dispatcher`]                        |
//! | **Queue strategies**| FIFO, LIFO, and three key-ordered structures behind one trait.  | [`Queue`], [`CircularFifo`], [`ArrayLifo`], [`HeapPriorityQueue`], [`SortedArrayPriorityQueue`], [`SortedVecPriorityQueue`] |
//! | **Tasks**          | Define tasks as trait impls or plain closures.                   | [`Task`], [`TaskRef`], [`TaskFn`]     |
//! | **Events**         | Observe the dispatcher through a broadcast stream.               | [`Event`], [`EventKind`]              |
//! | **Errors**         | Typed errors for queue and lifecycle misuse.                     | [`QueueError`], [`DispatchError`]     |
//! | **Configuration**  | Centralize dispatcher settings.                                  | [`DispatchConfig`]                    |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use taskgate::{DispatchConfig, Dispatcher, TaskFn, TaskRef};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut cfg = DispatchConfig::default();
//!     cfg.max_concurrent = 4;
//!
//!     let dispatcher = Arc::new(Dispatcher::new(cfg));
//!
//!     // Print events to stdout (optional)
//!     #[cfg(feature = "logging")]
//!     let _printer = {
//!         use taskgate::LogWriter;
//!         LogWriter::attach(dispatcher.subscribe())
//!     };
//!
//!     // Define a simple task; one closure can be enqueued many times
//!     let hello: TaskRef = TaskFn::arc(|id: i64| async move {
//!         println!("hello from task {id}");
//!     });
//!     for _ in 0..8 {
//!         dispatcher.enqueue(hello.clone())?;
//!     }
//!
//!     // Run the dispatch loop on the runtime and let it drain the queue
//!     let runner = {
//!         let d = Arc::clone(&dispatcher);
//!         tokio::spawn(async move { d.run().await })
//!     };
//!     tokio::time::sleep(Duration::from_millis(100)).await;
//!
//!     dispatcher.stop();
//!     runner.await??;
//!     Ok(())
//! }
//! ```
mod config;
mod core;
mod error;
mod events;
mod queues;
mod tasks;

// ---- Public re-exports ----

pub use config::DispatchConfig;
pub use core::Dispatcher;
pub use error::{DispatchError, QueueError};
pub use events::{Event, EventKind};
pub use queues::{
    ArrayLifo, CircularFifo, HeapPriorityQueue, Queue, SortedArrayPriorityQueue,
    SortedVecPriorityQueue,
};
pub use tasks::{Registered, Task, TaskFn, TaskRef};

// Optional: expose a simple built-in logging consumer (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
mod subscribers;
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
