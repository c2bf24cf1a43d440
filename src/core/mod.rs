//! Runtime core: the dispatch loop and its concurrency gate.
//!
//! The only public API from this module is [`Dispatcher`], which owns task
//! registration, queueing, and bounded launching.
//!
//! Internal modules:
//! - [`dispatcher`]: the loop itself plus enqueue/stop/limit entry points;
//! - [`gate`]: concurrency ceiling with RAII slot permits;
//! - [`unit`]: wraps one task run, releasing the slot even on panic.

mod dispatcher;
mod gate;
mod unit;

pub use dispatcher::Dispatcher;
