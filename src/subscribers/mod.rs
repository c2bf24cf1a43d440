//! # Event consumers for the dispatcher.
//!
//! Anything can consume events by calling
//! [`Dispatcher::subscribe`](crate::Dispatcher::subscribe) and draining the
//! returned receiver. This module holds the built-in consumers.
//!
//! ## Architecture
//! ```text
//! Event flow:
//!   Dispatcher ── publish(Event) ──► Bus ──► broadcast to all receivers
//!                                               │
//!                                               ├──► LogWriter (stdout, `logging` feature)
//!                                               └──► your own recv loop
//! ```
//!
//! ## Consuming events directly
//! ```no_run
//! # use taskgate::{DispatchConfig, Dispatcher, EventKind};
//! # async fn demo() {
//! let dispatcher = Dispatcher::new(DispatchConfig::default());
//! let mut rx = dispatcher.subscribe();
//! while let Ok(event) = rx.recv().await {
//!     if event.kind == EventKind::TaskCompleted {
//!         // count completions, update metrics, ...
//!     }
//! }
//! # }
//! ```

mod log;

pub use log::LogWriter;
