//! # Example: priorities
//!
//! Key-ordered dispatch with a single worker slot, so jobs run strictly in
//! ascending key order no matter how they were enqueued.
//!
//! Demonstrates how to:
//! - Swap the queue strategy with [`Dispatcher::with_queue`].
//! - Enqueue keyed closures via [`TaskFn::keyed_arc`].
//! - Reposition a queued job with [`Dispatcher::set_key`].
//! - Handle the rejection of a keyless task.
//!
//! ## Flow
//! ```text
//! enqueue(deploy key=3) ─┐
//! enqueue(compile key=1) ├─► HeapPriorityQueue
//! enqueue(test key=2)    │
//! enqueue(notify key=9) ─┘
//! enqueue(keyless)      ──► Err(KeyRequired), no id consumed
//! set_key(notify, 0)    ──► notify moves to the front
//!
//! run() with max_concurrent = 1:
//!     notify ─► compile ─► test ─► deploy
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example priorities --features logging
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use taskgate::{
    DispatchConfig, Dispatcher, HeapPriorityQueue, LogWriter, TaskFn, TaskRef,
};

fn job(label: &'static str, key: f64, done: &Arc<AtomicUsize>) -> TaskRef {
    let done = Arc::clone(done);
    TaskFn::keyed_arc(key, move |id: i64| {
        let done = Arc::clone(&done);
        async move {
            println!("[job] {label} (id={id})");
            tokio::time::sleep(Duration::from_millis(150)).await;
            done.fetch_add(1, Ordering::SeqCst);
        }
    })
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. One worker slot keeps the launch order identical to the key order
    let cfg = DispatchConfig::default();
    let dispatcher = Arc::new(Dispatcher::with_queue(
        cfg,
        Box::new(HeapPriorityQueue::new()),
    ));

    // 2. Print the event stream
    let printer = LogWriter::attach(dispatcher.subscribe());

    // 3. Enqueue jobs in scrambled key order
    let done = Arc::new(AtomicUsize::new(0));
    dispatcher.enqueue(job("deploy", 3.0, &done))?; // id=1
    dispatcher.enqueue(job("compile", 1.0, &done))?; // id=2
    dispatcher.enqueue(job("test", 2.0, &done))?; // id=3
    dispatcher.enqueue(job("notify", 9.0, &done))?; // id=4

    // 4. A keyless task cannot enter a key-ordered queue
    let keyless: TaskRef = TaskFn::arc(|_: i64| async {});
    if let Err(e) = dispatcher.enqueue(keyless) {
        println!("[rejected] {e}");
    }

    // 5. Promote "notify" to the front while it is still queued
    dispatcher.set_key(4, 0.0);

    // 6. Drain the queue, then wind down
    let runner = {
        let d = Arc::clone(&dispatcher);
        tokio::spawn(async move { d.run().await })
    };
    while done.load(Ordering::SeqCst) < 4 {
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    dispatcher.stop();
    runner.await??;
    drop(dispatcher);
    let _ = printer.await;
    Ok(())
}
