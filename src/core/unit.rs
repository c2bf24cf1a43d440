//! # Run a single launched task to completion.
//!
//! Each admitted task is spawned as one unit: the task body, the
//! [`SlotPermit`] it runs under, and the completion event.
//!
//! ## Rules
//! - The permit is released **before** the completion event is published, so
//!   an observer seeing [`EventKind::TaskCompleted`] knows the slot is free.
//! - A panicking body is caught with `catch_unwind`; the slot is released and
//!   the completion event still fires. The panic itself is swallowed: task
//!   outcomes are opaque to the dispatcher.

use futures::FutureExt;
use std::panic::AssertUnwindSafe;

use crate::core::gate::SlotPermit;
use crate::events::{Bus, Event, EventKind};
use crate::tasks::TaskRef;

/// Drives one task body and accounts for its slot.
pub(crate) async fn run(id: i64, task: TaskRef, permit: SlotPermit, bus: Bus) {
    let body = task.run(id);
    let _ = AssertUnwindSafe(body).catch_unwind().await;

    drop(permit);
    bus.publish(Event::new(EventKind::TaskCompleted).with_id(id));
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tokio_util::sync::CancellationToken;

    use super::*;
    use crate::core::gate::Gate;
    use crate::tasks::{TaskFn, TaskRef};

    #[tokio::test]
    async fn test_completion_releases_slot_and_publishes() {
        let gate = Arc::new(Gate::new(1));
        let bus = Bus::new(8);
        let mut rx = bus.subscribe();

        let token = CancellationToken::new();
        let permit = gate.acquire(&token).await.unwrap();
        let task: TaskRef = TaskFn::arc(|_: i64| async {});

        run(7, task, permit, bus).await;

        assert_eq!(gate.in_flight(), 0);
        let ev = rx.recv().await.unwrap();
        assert_eq!(ev.kind, EventKind::TaskCompleted);
        assert_eq!(ev.id, Some(7));
    }

    #[tokio::test]
    async fn test_panicking_body_still_releases_slot() {
        let gate = Arc::new(Gate::new(1));
        let bus = Bus::new(8);
        let mut rx = bus.subscribe();

        let token = CancellationToken::new();
        let permit = gate.acquire(&token).await.unwrap();
        let task: TaskRef = TaskFn::arc(|_: i64| async {
            panic!("task blew up");
        });

        run(3, task, permit, bus).await;

        assert_eq!(gate.in_flight(), 0);
        let ev = rx.recv().await.unwrap();
        assert_eq!(ev.kind, EventKind::TaskCompleted);
        assert_eq!(ev.id, Some(3));
    }
}
