//! Dispatcher events: types and broadcast bus.
//!
//! This module groups the event **data model** and the **bus** used to
//! publish/subscribe to events emitted by the dispatch loop, the enqueue
//! path, and running units.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `Dispatcher::enqueue`, `Dispatcher::stop`,
//!   `Dispatcher::set_max_concurrent`, the dispatch loop, unit completion.
//! - **Consumers**: anything holding a receiver from
//!   [`Dispatcher::subscribe`](crate::Dispatcher::subscribe), such as the
//!   optional `LogWriter`.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
