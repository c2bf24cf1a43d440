//! # Example: walk
//!
//! Walks a directory tree with a bounded number of concurrent directory
//! readers. Each task reads one directory and enqueues a child task per
//! subdirectory it finds, so the queue feeds itself until the tree is done.
//!
//! Demonstrates how to:
//! - Define tasks that enqueue more tasks as they discover work.
//! - Bound how many directories are open at once with `max_concurrent`.
//! - Detect drain with an external counter, then stop the loop.
//!
//! ## Flow
//! ```text
//! enqueue(root dir) ──► Dispatcher::run()
//!     ├─► unit: read_dir(root)
//!     │     ├─► enqueue(child dir)  (pending += 1)
//!     │     ├─► enqueue(child dir)  (pending += 1)
//!     │     └─► pending -= 1
//!     ├─► unit: read_dir(child) ...        at most 8 open at once
//!     └─► last unit drops pending to 0 ──► notify main
//!
//! main: wait for pending == 0 ──► print totals ──► stop() ──► join
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example walk --features logging -- /path/to/dir
//! ```

use std::env;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::Result;
use taskgate::{DispatchConfig, Dispatcher, LogWriter, TaskFn, TaskRef};
use tokio::fs;
use tokio::sync::Notify;

/// Shared walk counters. `pending` counts enqueued-but-unfinished directory
/// tasks; the task that drops it to zero notifies `drained`.
struct WalkState {
    pending: AtomicUsize,
    dirs: AtomicUsize,
    files: AtomicUsize,
    drained: Notify,
}

/// Builds the task for one directory. Children are enqueued before this
/// task's own `pending` decrement, so the counter can never dip to zero
/// while work remains.
fn dir_task(path: PathBuf, dispatcher: Arc<Dispatcher>, state: Arc<WalkState>) -> TaskRef {
    TaskFn::arc(move |_: i64| {
        let path = path.clone();
        let dispatcher = Arc::clone(&dispatcher);
        let state = Arc::clone(&state);
        async move {
            if let Ok(mut entries) = fs::read_dir(&path).await {
                while let Ok(Some(entry)) = entries.next_entry().await {
                    match entry.file_type().await {
                        Ok(ft) if ft.is_dir() => {
                            state.dirs.fetch_add(1, Ordering::SeqCst);
                            state.pending.fetch_add(1, Ordering::SeqCst);
                            let child = dir_task(
                                entry.path(),
                                Arc::clone(&dispatcher),
                                Arc::clone(&state),
                            );
                            if dispatcher.enqueue(child).is_err() {
                                state.pending.fetch_sub(1, Ordering::SeqCst);
                            }
                        }
                        Ok(_) => {
                            state.files.fetch_add(1, Ordering::SeqCst);
                        }
                        Err(_) => {}
                    }
                }
            }
            if state.pending.fetch_sub(1, Ordering::SeqCst) == 1 {
                state.drained.notify_one();
            }
        }
    })
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Root directory from the command line, current directory by default
    let root = PathBuf::from(env::args().nth(1).unwrap_or_else(|| ".".into()));

    // 2. At most 8 directories open at once
    let mut cfg = DispatchConfig::default();
    cfg.max_concurrent = 8;
    let dispatcher = Arc::new(Dispatcher::new(cfg));

    // 3. Print the event stream while we walk
    let printer = LogWriter::attach(dispatcher.subscribe());

    // 4. Seed the walk with the root directory
    let state = Arc::new(WalkState {
        pending: AtomicUsize::new(1),
        dirs: AtomicUsize::new(0),
        files: AtomicUsize::new(0),
        drained: Notify::new(),
    });
    dispatcher.enqueue(dir_task(root, Arc::clone(&dispatcher), Arc::clone(&state)))?;

    // 5. Run the dispatch loop on the runtime
    let runner = {
        let d = Arc::clone(&dispatcher);
        tokio::spawn(async move { d.run().await })
    };

    // 6. Wait for the last directory task to finish, then report
    state.drained.notified().await;
    println!(
        "[walk] dirs={} files={} peak_queue={}",
        state.dirs.load(Ordering::SeqCst) + 1,
        state.files.load(Ordering::SeqCst),
        dispatcher.high_water(),
    );

    // 7. Wind down
    dispatcher.stop();
    runner.await??;
    drop(dispatcher);
    let _ = printer.await;
    Ok(())
}
