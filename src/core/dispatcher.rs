//! # Dispatcher: registration, queueing, and bounded launching of tasks.
//!
//! The [`Dispatcher`] owns the queue strategy, the concurrency [`Gate`], the
//! event bus, and the lifecycle of the dispatch loop.
//!
//! ## Key responsibilities
//! - assign each enqueued task a unique, strictly increasing id (from 1)
//! - hold pending tasks in the configured [`Queue`] strategy
//! - run at most `max_concurrent` units at once, adjustable at runtime
//! - wake the loop on enqueue and on slot release without losing a wake-up
//!
//! ## High-level architecture
//! ```text
//! Producers (any thread):                  One dispatch loop (run):
//!   enqueue(task) ──► [lock] queue.enqueue │ loop {
//!                     id = last + 1        │   park until queue non-empty ◄── wake on enqueue
//!                     wake loop ───────────┼─► park until a slot frees   ◄── wake on permit drop
//!                                          │   dequeue head, tokio::spawn(unit)
//!   stop() ──► cancel token ───────────────┼─► exit at either park, or at loop top
//!                                          │ }
//!
//! Unit (spawned):
//!   task.run(id) → catch_unwind → drop SlotPermit (wakes loop) → TaskCompleted
//! ```
//!
//! ## Rules
//! - At most one loop runs at a time: a second `run` fails with
//!   [`DispatchError::AlreadyStarted`].
//! - `stop` is an idempotent signal: it never kills in-flight units and
//!   leaves undequeued tasks in place for the next `run`.
//! - Each `run` installs a fresh cancellation token, so a stopped dispatcher
//!   can be started again.
//! - Both parks re-check their predicate after every wake; `Notify`'s stored
//!   permit covers wake-ups that land between a check and the park.
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
//!     cfg.max_concurrent = 2;
//!
//!     let dispatcher = Arc::new(Dispatcher::new(cfg));
//!
//!     let hello: TaskRef = TaskFn::arc(|id: i64| async move {
//!         println!("task {id} running");
//!     });
//!     dispatcher.enqueue(hello.clone())?;
//!     dispatcher.enqueue(hello)?;
//!
//!     let runner = {
//!         let d = Arc::clone(&dispatcher);
//!         tokio::spawn(async move { d.run().await })
//!     };
//!
//!     tokio::time::sleep(Duration::from_millis(50)).await;
//!     dispatcher.stop();
//!     runner.await??;
//!     Ok(())
//! }
//! ```

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::{broadcast, Notify};
use tokio_util::sync::CancellationToken;

use crate::config::DispatchConfig;
use crate::core::gate::{Gate, SlotPermit};
use crate::core::unit;
use crate::error::DispatchError;
use crate::events::{Bus, Event, EventKind};
use crate::queues::{CircularFifo, Queue};
use crate::tasks::{Registered, TaskRef};

/// Queue strategy plus the registration bookkeeping guarded with it.
struct QueueState {
    strategy: Box<dyn Queue>,
    /// Last id handed out; the next registration gets `last_id + 1`.
    last_id: i64,
    /// The dispatch loop is parked waiting for the queue to become non-empty.
    waiting: bool,
    /// Greatest queue length ever observed at enqueue time.
    high_water: usize,
}

/// Cancellation handle of the active run, if any.
struct Lifecycle {
    token: Option<CancellationToken>,
}

/// Accepts tasks, assigns ids, and launches queued work under a concurrency
/// ceiling.
///
/// All methods take `&self`; share the dispatcher across tasks or threads
/// with an `Arc`. [`enqueue`](Dispatcher::enqueue) and
/// [`stop`](Dispatcher::stop) are synchronous and never block beyond a short
/// critical section; [`run`](Dispatcher::run) is the loop itself and resolves
/// only when stopped.
pub struct Dispatcher {
    queue: Mutex<QueueState>,
    /// Wakes the loop parked on an empty queue.
    queue_wake: Notify,
    gate: Arc<Gate>,
    lifecycle: Mutex<Lifecycle>,
    /// Held for the whole of `run`; `try_lock` failure is a re-entrant start.
    run_lock: tokio::sync::Mutex<()>,
    bus: Bus,
}

impl Dispatcher {
    /// Creates a dispatcher with the default FIFO queue.
    pub fn new(cfg: DispatchConfig) -> Self {
        Self::with_queue(cfg, Box::new(CircularFifo::new()))
    }

    /// Creates a dispatcher with the given queue strategy.
    ///
    /// ### Parameters
    /// - `cfg`: concurrency ceiling and bus capacity (both clamped to >= 1)
    /// - `queue`: any [`Queue`] implementation, e.g.
    ///   [`HeapPriorityQueue`](crate::HeapPriorityQueue) for key order
    pub fn with_queue(cfg: DispatchConfig, queue: Box<dyn Queue>) -> Self {
        Self {
            queue: Mutex::new(QueueState {
                strategy: queue,
                last_id: 0,
                waiting: false,
                high_water: 0,
            }),
            queue_wake: Notify::new(),
            gate: Arc::new(Gate::new(cfg.effective_max_concurrent())),
            lifecycle: Mutex::new(Lifecycle { token: None }),
            run_lock: tokio::sync::Mutex::new(()),
            bus: Bus::new(cfg.effective_bus_capacity()),
        }
    }

    /// Registers a task and stores it in the queue.
    ///
    /// Returns the assigned id (unique per dispatcher, strictly increasing
    /// from 1). Safe to call from any thread, running or stopped; an idle
    /// loop is woken. The task's [`key`](crate::Task::key) is read once,
    /// before the queue lock is taken.
    ///
    /// ### Errors
    /// [`QueueError::KeyRequired`](crate::QueueError::KeyRequired) when a
    /// keyless task meets a key-ordered queue. A rejected task consumes no id.
    pub fn enqueue(&self, task: TaskRef) -> Result<i64, DispatchError> {
        let key = task.key();
        let (id, queued, wake) = {
            let mut qs = self.queue_state();
            let id = qs.last_id + 1;
            qs.strategy.enqueue(Registered::new(id, key, task))?;
            qs.last_id = id;
            let queued = qs.strategy.len();
            if queued > qs.high_water {
                qs.high_water = queued;
            }
            let wake = qs.waiting;
            qs.waiting = false;
            (id, queued, wake)
        };
        if wake {
            self.queue_wake.notify_one();
        }
        self.bus
            .publish(Event::new(EventKind::TaskEnqueued).with_id(id).with_queued(queued));
        Ok(id)
    }

    /// Runs the dispatch loop until [`stop`](Dispatcher::stop) is called.
    ///
    /// Resolves with `Ok(())` on stop. The only error paths are a re-entrant
    /// start ([`DispatchError::AlreadyStarted`]) and a queue strategy that
    /// reports entries it cannot dequeue.
    ///
    /// Stopping does not wait for in-flight units; they keep running on the
    /// runtime and release their slots as they finish. To restart, await this
    /// future (or its join handle) after calling `stop`, then call `run`
    /// again: a fresh cancellation token is installed on every entry.
    pub async fn run(&self) -> Result<(), DispatchError> {
        let _owner = self
            .run_lock
            .try_lock()
            .map_err(|_| DispatchError::AlreadyStarted)?;

        let token = CancellationToken::new();
        self.lifecycle_state().token = Some(token.clone());
        self.bus.publish(Event::new(EventKind::DispatchStarted));

        let result = self.dispatch(&token).await;

        self.lifecycle_state().token = None;
        self.bus.publish(Event::new(EventKind::DispatchStopped));
        result
    }

    /// Signals the active dispatch loop to wind down.
    ///
    /// Idempotent: extra calls, and calls while stopped, are no-ops.
    /// In-flight units are left running; undequeued tasks stay queued.
    pub fn stop(&self) {
        let token = self.lifecycle_state().token.take();
        if let Some(token) = token {
            self.bus.publish(Event::new(EventKind::StopRequested));
            token.cancel();
        }
    }

    /// Replaces the concurrency ceiling, clamped to at least 1.
    ///
    /// Takes effect at the next admission check: raising the ceiling wakes a
    /// loop parked at the old one, lowering never interrupts running units.
    pub fn set_max_concurrent(&self, limit: usize) {
        let effective = self.gate.set_limit(limit);
        self.bus
            .publish(Event::new(EventKind::LimitChanged).with_limit(effective));
    }

    /// Replaces the key of a still-queued task, repositioning it in
    /// key-ordered strategies.
    ///
    /// Ignored for unknown ids (the task may already run or be done) and a
    /// no-op under strategies that do not order by key.
    pub fn set_key(&self, id: i64, key: f64) {
        self.queue_state().strategy.set_key(id, key);
    }

    /// Current concurrency ceiling.
    pub fn max_concurrent(&self) -> usize {
        self.gate.limit()
    }

    /// Number of units currently holding a slot. Stale the moment it returns.
    pub fn in_flight(&self) -> usize {
        self.gate.in_flight()
    }

    /// Number of queued tasks. Stale the moment it returns.
    pub fn queued(&self) -> usize {
        self.queue_state().strategy.len()
    }

    /// Greatest queue length ever observed at enqueue time.
    pub fn high_water(&self) -> usize {
        self.queue_state().high_water
    }

    /// True from a loop's start until [`stop`](Dispatcher::stop) is called
    /// or the loop exits, whichever comes first.
    pub fn is_running(&self) -> bool {
        self.lifecycle_state().token.is_some()
    }

    /// Creates a receiver for the dispatcher's [`Event`] stream.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.bus.subscribe()
    }

    /// The loop: wait for work, wait for a slot, launch. Exits on
    /// cancellation at any of the three checkpoints.
    async fn dispatch(&self, token: &CancellationToken) -> Result<(), DispatchError> {
        loop {
            if token.is_cancelled() {
                return Ok(());
            }
            if !self.wait_for_work(token).await {
                return Ok(());
            }
            let Some(permit) = self.gate.acquire(token).await else {
                return Ok(());
            };

            // the loop is the only dequeuer, so the non-empty observation
            // still holds unless the strategy misreports its length
            let next = self.queue_state().strategy.dequeue();
            match next {
                Ok(task) => self.launch(task, permit),
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Parks until the queue is non-empty. Returns `false` on cancellation.
    async fn wait_for_work(&self, token: &CancellationToken) -> bool {
        loop {
            let notified = self.queue_wake.notified();
            {
                let mut qs = self.queue_state();
                if !qs.strategy.is_empty() {
                    qs.waiting = false;
                    return true;
                }
                qs.waiting = true;
            }
            tokio::select! {
                _ = token.cancelled() => return false,
                _ = notified => {}
            }
        }
    }

    /// Spawns the unit for a dequeued task; the permit travels with it.
    fn launch(&self, task: Registered, permit: SlotPermit) {
        let (id, task) = task.into_parts();
        self.bus.publish(
            Event::new(EventKind::TaskLaunched)
                .with_id(id)
                .with_in_flight(self.gate.in_flight()),
        );
        tokio::spawn(unit::run(id, task, permit, self.bus.clone()));
    }

    /// State updates are single assignments, so a poisoned lock still holds
    /// coherent state; recover the guard instead of propagating.
    fn queue_state(&self) -> MutexGuard<'_, QueueState> {
        self.queue.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn lifecycle_state(&self) -> MutexGuard<'_, Lifecycle> {
        self.lifecycle.lock().unwrap_or_else(|p| p.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use tokio::sync::{Barrier, Semaphore};

    use super::*;
    use crate::error::QueueError;
    use crate::queues::HeapPriorityQueue;
    use crate::tasks::TaskFn;

    fn fifo_dispatcher(max_concurrent: usize) -> Arc<Dispatcher> {
        let cfg = DispatchConfig {
            max_concurrent,
            ..DispatchConfig::default()
        };
        Arc::new(Dispatcher::new(cfg))
    }

    fn heap_dispatcher() -> Arc<Dispatcher> {
        Arc::new(Dispatcher::with_queue(
            DispatchConfig::default(),
            Box::new(HeapPriorityQueue::new()),
        ))
    }

    fn counting_task(counter: &Arc<AtomicUsize>) -> TaskRef {
        let counter = Arc::clone(counter);
        TaskFn::arc(move |_: i64| {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        })
    }

    /// Polls `cond` until it holds or the deadline passes.
    async fn wait_until(deadline_ms: u64, mut cond: impl FnMut() -> bool) -> bool {
        let deadline = tokio::time::Instant::now() + Duration::from_millis(deadline_ms);
        while !cond() {
            if tokio::time::Instant::now() >= deadline {
                return false;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        true
    }

    #[test]
    fn test_ids_start_at_one_and_increase() {
        let d = fifo_dispatcher(1);
        let task: TaskRef = TaskFn::arc(|_: i64| async {});
        assert_eq!(d.enqueue(task.clone()).unwrap(), 1);
        assert_eq!(d.enqueue(task.clone()).unwrap(), 2);
        assert_eq!(d.enqueue(task).unwrap(), 3);
        assert_eq!(d.queued(), 3);
        assert_eq!(d.high_water(), 3);
    }

    #[test]
    fn test_ids_unique_under_concurrent_producers() {
        let d = fifo_dispatcher(1);
        let ids = Mutex::new(Vec::new());

        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    let task: TaskRef = TaskFn::arc(|_: i64| async {});
                    for _ in 0..50 {
                        let id = d.enqueue(task.clone()).unwrap();
                        ids.lock().unwrap().push(id);
                    }
                });
            }
        });

        let mut ids = ids.into_inner().unwrap();
        ids.sort_unstable();
        let expected: Vec<i64> = (1..=400).collect();
        assert_eq!(ids, expected, "ids must be unique and gap-free");
    }

    #[test]
    fn test_rejected_enqueue_consumes_no_id() {
        let d = heap_dispatcher();
        let keyless: TaskRef = TaskFn::arc(|_: i64| async {});
        let err = d.enqueue(keyless).unwrap_err();
        assert!(matches!(
            err,
            DispatchError::Queue(QueueError::KeyRequired { id: 1 })
        ));

        let keyed: TaskRef = TaskFn::keyed_arc(1.0, |_: i64| async {});
        assert_eq!(d.enqueue(keyed).unwrap(), 1);
    }

    #[tokio::test]
    async fn test_run_drains_queued_and_late_tasks() {
        let d = fifo_dispatcher(2);
        let done = Arc::new(AtomicUsize::new(0));
        for _ in 0..3 {
            d.enqueue(counting_task(&done)).unwrap();
        }

        let runner = {
            let d = Arc::clone(&d);
            tokio::spawn(async move { d.run().await })
        };
        assert!(wait_until(1000, || d.is_running()).await);

        // the loop parks once the first three are through; these must wake it
        for _ in 0..2 {
            d.enqueue(counting_task(&done)).unwrap();
        }

        assert!(wait_until(2000, || done.load(Ordering::SeqCst) == 5).await);
        assert!(wait_until(1000, || d.in_flight() == 0).await);
        assert_eq!(d.queued(), 0);

        d.stop();
        runner.await.unwrap().unwrap();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_ceiling_is_never_exceeded() {
        let d = fifo_dispatcher(3);
        let active = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let done = Arc::new(AtomicUsize::new(0));

        for _ in 0..20 {
            let active = Arc::clone(&active);
            let peak = Arc::clone(&peak);
            let done = Arc::clone(&done);
            let task: TaskRef = TaskFn::arc(move |_: i64| {
                let active = Arc::clone(&active);
                let peak = Arc::clone(&peak);
                let done = Arc::clone(&done);
                async move {
                    let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(10)).await;
                    active.fetch_sub(1, Ordering::SeqCst);
                    done.fetch_add(1, Ordering::SeqCst);
                }
            });
            d.enqueue(task).unwrap();
        }

        let runner = {
            let d = Arc::clone(&d);
            tokio::spawn(async move { d.run().await })
        };
        assert!(wait_until(5000, || done.load(Ordering::SeqCst) == 20).await);
        assert!(
            peak.load(Ordering::SeqCst) <= 3,
            "peak {} exceeded the ceiling",
            peak.load(Ordering::SeqCst)
        );

        d.stop();
        runner.await.unwrap().unwrap();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_lowered_ceiling_applies_to_next_admissions() {
        let d = fifo_dispatcher(3);
        let gate_sem = Arc::new(Semaphore::new(0));
        let active = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let done = Arc::new(AtomicUsize::new(0));

        for _ in 0..5 {
            let gate_sem = Arc::clone(&gate_sem);
            let active = Arc::clone(&active);
            let peak = Arc::clone(&peak);
            let done = Arc::clone(&done);
            let task: TaskRef = TaskFn::arc(move |_: i64| {
                let gate_sem = Arc::clone(&gate_sem);
                let active = Arc::clone(&active);
                let peak = Arc::clone(&peak);
                let done = Arc::clone(&done);
                async move {
                    let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    gate_sem.acquire().await.unwrap().forget();
                    active.fetch_sub(1, Ordering::SeqCst);
                    done.fetch_add(1, Ordering::SeqCst);
                }
            });
            d.enqueue(task).unwrap();
        }

        let runner = {
            let d = Arc::clone(&d);
            tokio::spawn(async move { d.run().await })
        };

        // three launch and block on the semaphore; lower the ceiling under them
        assert!(wait_until(2000, || active.load(Ordering::SeqCst) == 3).await);
        d.set_max_concurrent(1);
        peak.store(0, Ordering::SeqCst);
        gate_sem.add_permits(5);

        assert!(wait_until(5000, || done.load(Ordering::SeqCst) == 5).await);
        assert!(
            peak.load(Ordering::SeqCst) <= 1,
            "admissions after the change overlapped"
        );

        d.stop();
        runner.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_raised_ceiling_wakes_the_parked_loop() {
        let d = fifo_dispatcher(1);
        let barrier = Arc::new(Barrier::new(2));
        let done = Arc::new(AtomicUsize::new(0));

        for _ in 0..2 {
            let barrier = Arc::clone(&barrier);
            let done = Arc::clone(&done);
            let task: TaskRef = TaskFn::arc(move |_: i64| {
                let barrier = Arc::clone(&barrier);
                let done = Arc::clone(&done);
                async move {
                    barrier.wait().await;
                    done.fetch_add(1, Ordering::SeqCst);
                }
            });
            d.enqueue(task).unwrap();
        }

        let runner = {
            let d = Arc::clone(&d);
            tokio::spawn(async move { d.run().await })
        };

        // with a ceiling of 1 the pair deadlocks on the barrier; the raise
        // must wake the loop parked at the gate and admit the second unit
        assert!(wait_until(1000, || d.in_flight() == 1).await);
        d.set_max_concurrent(2);

        assert!(wait_until(2000, || done.load(Ordering::SeqCst) == 2).await);
        d.stop();
        runner.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_second_run_is_rejected() {
        let d = fifo_dispatcher(1);
        let runner = {
            let d = Arc::clone(&d);
            tokio::spawn(async move { d.run().await })
        };
        assert!(wait_until(1000, || d.is_running()).await);

        let err = d.run().await.unwrap_err();
        assert!(matches!(err, DispatchError::AlreadyStarted));

        d.stop();
        runner.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_stop_preserves_queue_and_restart_resumes() {
        let d = fifo_dispatcher(1);
        let release = Arc::new(Semaphore::new(0));
        let done = Arc::new(AtomicUsize::new(0));

        for _ in 0..2 {
            let release = Arc::clone(&release);
            let done = Arc::clone(&done);
            let task: TaskRef = TaskFn::arc(move |_: i64| {
                let release = Arc::clone(&release);
                let done = Arc::clone(&done);
                async move {
                    release.acquire().await.unwrap().forget();
                    done.fetch_add(1, Ordering::SeqCst);
                }
            });
            d.enqueue(task).unwrap();
        }

        let first = {
            let d = Arc::clone(&d);
            tokio::spawn(async move { d.run().await })
        };
        assert!(wait_until(1000, || d.in_flight() == 1).await);

        d.stop();
        d.stop(); // idempotent
        first.await.unwrap().unwrap();
        assert_eq!(d.queued(), 1, "undequeued task must survive the stop");

        // the in-flight unit outlives the loop and finishes on its own
        release.add_permits(2);
        assert!(wait_until(1000, || done.load(Ordering::SeqCst) == 1).await);

        let second = {
            let d = Arc::clone(&d);
            tokio::spawn(async move { d.run().await })
        };
        assert!(wait_until(2000, || done.load(Ordering::SeqCst) == 2).await);
        assert_eq!(d.queued(), 0);

        d.stop();
        second.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_key_order_drives_launch_order() {
        let d = heap_dispatcher();
        let order = Arc::new(Mutex::new(Vec::new()));

        for (key, _) in [(5.0, ()), (1.0, ()), (3.0, ())] {
            let order = Arc::clone(&order);
            let task: TaskRef = TaskFn::keyed_arc(key, move |id: i64| {
                let order = Arc::clone(&order);
                async move {
                    order.lock().unwrap().push(id);
                }
            });
            d.enqueue(task).unwrap();
        }

        let runner = {
            let d = Arc::clone(&d);
            tokio::spawn(async move { d.run().await })
        };
        assert!(wait_until(2000, || order.lock().unwrap().len() == 3).await);
        assert_eq!(*order.lock().unwrap(), vec![2, 3, 1]);

        d.stop();
        runner.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_set_key_repositions_queued_task() {
        let d = heap_dispatcher();
        let order = Arc::new(Mutex::new(Vec::new()));

        for id in 1..=4 {
            let order = Arc::clone(&order);
            let task: TaskRef = TaskFn::keyed_arc(id as f64, move |id: i64| {
                let order = Arc::clone(&order);
                async move {
                    order.lock().unwrap().push(id);
                }
            });
            d.enqueue(task).unwrap();
        }
        d.set_key(4, 0.0);

        let runner = {
            let d = Arc::clone(&d);
            tokio::spawn(async move { d.run().await })
        };
        assert!(wait_until(2000, || order.lock().unwrap().len() == 4).await);
        assert_eq!(*order.lock().unwrap(), vec![4, 1, 2, 3]);

        d.stop();
        runner.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_event_stream_for_one_task() {
        let d = fifo_dispatcher(1);
        let mut rx = d.subscribe();
        let done = Arc::new(AtomicUsize::new(0));

        d.enqueue(counting_task(&done)).unwrap();
        let runner = {
            let d = Arc::clone(&d);
            tokio::spawn(async move { d.run().await })
        };
        assert!(wait_until(2000, || done.load(Ordering::SeqCst) == 1).await);
        d.stop();
        runner.await.unwrap().unwrap();

        let mut kinds = Vec::new();
        let mut last_seq = None;
        while let Ok(ev) = rx.try_recv() {
            if let Some(prev) = last_seq {
                assert!(ev.seq > prev, "seq must increase");
            }
            last_seq = Some(ev.seq);
            kinds.push(ev.kind);
        }

        for expected in [
            EventKind::TaskEnqueued,
            EventKind::DispatchStarted,
            EventKind::TaskLaunched,
            EventKind::TaskCompleted,
            EventKind::StopRequested,
            EventKind::DispatchStopped,
        ] {
            assert!(kinds.contains(&expected), "missing {expected:?} in {kinds:?}");
        }
    }

    #[tokio::test]
    async fn test_misreporting_strategy_fails_the_run() {
        /// Claims one entry but can never produce it.
        struct Misreporting;

        impl Queue for Misreporting {
            fn enqueue(&mut self, _task: Registered) -> Result<(), QueueError> {
                Ok(())
            }
            fn dequeue(&mut self) -> Result<Registered, QueueError> {
                Err(QueueError::Empty)
            }
            fn len(&self) -> usize {
                1
            }
        }

        let d = Dispatcher::with_queue(DispatchConfig::default(), Box::new(Misreporting));
        let err = d.run().await.unwrap_err();
        assert!(matches!(err, DispatchError::Queue(QueueError::Empty)));
        assert_eq!(d.in_flight(), 0, "the reserved slot must be released");
        assert!(!d.is_running());
    }

    #[tokio::test]
    async fn test_high_water_survives_draining() {
        let d = fifo_dispatcher(1);
        let done = Arc::new(AtomicUsize::new(0));
        for _ in 0..3 {
            d.enqueue(counting_task(&done)).unwrap();
        }
        assert_eq!(d.high_water(), 3);

        let runner = {
            let d = Arc::clone(&d);
            tokio::spawn(async move { d.run().await })
        };
        assert!(wait_until(2000, || done.load(Ordering::SeqCst) == 3).await);
        d.stop();
        runner.await.unwrap().unwrap();

        assert_eq!(d.queued(), 0);
        assert_eq!(d.high_water(), 3, "high water is a peak, not a snapshot");
    }
}
