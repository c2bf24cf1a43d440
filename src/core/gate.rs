//! # Concurrency gate: the adjustable ceiling on running units.
//!
//! [`Gate`] tracks how many units are in flight and admits new ones only
//! while the count stays under the ceiling. Admission hands out a
//! [`SlotPermit`]; dropping the permit releases the slot and wakes the
//! dispatch loop if it was parked at the ceiling.
//!
//! ## Wake-up protocol
//! The loop re-checks the predicate under the lock, registers interest
//! *before* parking, and parks only when the gate is full:
//! ```text
//! acquire:                      release (permit drop):
//!   create notified future        in_flight -= 1
//!   lock state                    if waiting { waiting = false; notify }
//!   if in_flight < limit:
//!     in_flight += 1 → permit
//!   else:
//!     waiting = true → park
//! ```
//! `Notify` stores a permit when nobody is parked yet, so a release that
//! lands between the predicate check and the park is never lost.
//!
//! ## Rules
//! - The ceiling is clamped to at least 1; a zero ceiling would never admit.
//! - Raising the ceiling wakes a parked loop; lowering it only affects the
//!   next admission check and never interrupts running units.
//! - The dispatch loop is the only acquirer, so one `waiting` flag and
//!   `notify_one` are enough.

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

/// Shared admission state for one dispatcher.
pub(crate) struct Gate {
    state: Mutex<GateState>,
    wake: Notify,
}

#[derive(Debug)]
struct GateState {
    /// Current ceiling, always >= 1.
    limit: usize,
    /// Units holding a [`SlotPermit`].
    in_flight: usize,
    /// The dispatch loop is parked waiting for a free slot.
    waiting: bool,
}

impl Gate {
    pub(crate) fn new(limit: usize) -> Self {
        Self {
            state: Mutex::new(GateState {
                limit: limit.max(1),
                in_flight: 0,
                waiting: false,
            }),
            wake: Notify::new(),
        }
    }

    /// Waits for a free slot and claims it.
    ///
    /// Returns `None` when `token` fires before a slot frees up.
    pub(crate) async fn acquire(self: &Arc<Self>, token: &CancellationToken) -> Option<SlotPermit> {
        loop {
            let notified = self.wake.notified();
            {
                let mut st = self.lock_state();
                if st.in_flight < st.limit {
                    st.in_flight += 1;
                    st.waiting = false;
                    return Some(SlotPermit {
                        gate: Arc::clone(self),
                    });
                }
                st.waiting = true;
            }
            tokio::select! {
                _ = token.cancelled() => return None,
                _ = notified => {}
            }
        }
    }

    /// Replaces the ceiling, clamped to at least 1, and returns the value
    /// actually installed. Raising the ceiling wakes a parked loop.
    pub(crate) fn set_limit(&self, limit: usize) -> usize {
        let limit = limit.max(1);
        let wake = {
            let mut st = self.lock_state();
            let raised = limit > st.limit;
            st.limit = limit;
            if raised && st.waiting {
                st.waiting = false;
                true
            } else {
                false
            }
        };
        if wake {
            self.wake.notify_one();
        }
        limit
    }

    pub(crate) fn limit(&self) -> usize {
        self.lock_state().limit
    }

    pub(crate) fn in_flight(&self) -> usize {
        self.lock_state().in_flight
    }

    /// Returns a slot claimed by `acquire`.
    fn release(&self) {
        let wake = {
            let mut st = self.lock_state();
            st.in_flight -= 1;
            let parked = st.waiting;
            st.waiting = false;
            parked
        };
        if wake {
            self.wake.notify_one();
        }
    }

    /// State updates are single assignments, so a poisoned lock still holds
    /// coherent counters; recover the guard instead of propagating.
    fn lock_state(&self) -> MutexGuard<'_, GateState> {
        self.state.lock().unwrap_or_else(|p| p.into_inner())
    }
}

/// RAII claim on one concurrency slot.
///
/// Dropping the permit releases the slot, whether the unit finished cleanly
/// or unwound from a panic.
pub(crate) struct SlotPermit {
    gate: Arc<Gate>,
}

impl Drop for SlotPermit {
    fn drop(&mut self) {
        self.gate.release();
    }
}
