//! The reactor pool (C7/C8): `K` worker reactors, each its own OS thread
//! running a single-threaded Tokio runtime forever, with round-robin
//! dispatch via an atomic counter. This reproduces the source's literal
//! "one listener reactor + K worker reactors" model rather than handing
//! scheduling over to Tokio's default work-stealing runtime.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::thread::JoinHandle;
use tokio::runtime::{Builder, Handle};
use tokio::sync::oneshot;

use crate::debug_log;

/// A fixed pool of worker reactors. Each owns one OS thread and one
/// `current_thread` Tokio runtime; connections are handed off to a
/// reactor's [`Handle`] chosen by a monotonic counter modulo `K`.
pub struct ReactorPool {
    handles: Vec<Handle>,
    shutdowns: Vec<oneshot::Sender<()>>,
    joins: Vec<JoinHandle<()>>,
    counter: AtomicUsize,
}

impl ReactorPool {
    /// Spins up `count` worker reactor threads and blocks until each has
    /// reported its runtime handle back.
    pub fn start(count: usize) -> Self {
        let mut handles = Vec::with_capacity(count);
        let mut shutdowns = Vec::with_capacity(count);
        let mut joins = Vec::with_capacity(count);

        for i in 0..count {
            let (handle_tx, handle_rx) = mpsc::channel();
            let (shutdown_tx, shutdown_rx) = oneshot::channel();

            let join = std::thread::Builder::new()
                .name(format!("waypost-worker-{i}"))
                .spawn(move || {
                    let rt = Builder::new_current_thread()
                        .enable_all()
                        .build()
                        .expect("build worker reactor runtime");
                    let _ = handle_tx.send(rt.handle().clone());
                    rt.block_on(async move {
                        let _ = shutdown_rx.await;
                    });
                    debug_log!("worker reactor {} stopped", i);
                })
                .expect("spawn worker reactor thread");

            let handle = handle_rx.recv().expect("receive worker reactor handle");
            handles.push(handle);
            shutdowns.push(shutdown_tx);
            joins.push(join);
        }

        Self { handles, shutdowns, joins, counter: AtomicUsize::new(0) }
    }

    /// The next worker reactor in round-robin order. Fairness is not
    /// guaranteed under contention, only round-robin order in its absence.
    pub fn next_handle(&self) -> Handle {
        let i = self.counter.fetch_add(1, Ordering::Relaxed) % self.handles.len();
        self.handles[i].clone()
    }

    /// Signals every worker reactor to stop and joins all threads.
    pub fn stop_and_join(self) {
        for tx in self.shutdowns {
            let _ = tx.send(());
        }
        for join in self.joins {
            let _ = join.join();
        }
    }
}
