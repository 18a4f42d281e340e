//! Worker logic for the executor

use std::panic::{self, AssertUnwindSafe};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::thread;

use crossbeam::utils::Backoff;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, error};

use super::task::BoxedTask;
use crate::metrics::MetricsCollector;
use crate::queue::DeQueue;
use crate::stealer;

/// State shared by the executor handle and all of its workers.
pub struct Shared {
    pub(crate) global: DeQueue<BoxedTask>,
    pub(crate) locals: Vec<DeQueue<BoxedTask>>,
    pub(crate) threshold: usize,
    pub(crate) done: AtomicBool,
    pub(crate) metrics_collector: Option<Arc<dyn MetricsCollector>>,
}

impl Shared {
    pub(crate) fn new(
        capacity: usize,
        threshold: usize,
        metrics_collector: Option<Arc<dyn MetricsCollector>>,
    ) -> Self {
        Self {
            global: DeQueue::new(),
            locals: (0..capacity).map(|_| DeQueue::new()).collect(),
            threshold,
            done: AtomicBool::new(false),
            metrics_collector,
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.locals.len()
    }

    pub(crate) fn metrics(&self) -> Option<&dyn MetricsCollector> {
        self.metrics_collector.as_deref()
    }

    /// Picks a worker other than `except` uniformly at random, or `None` when the
    /// pool has no other worker.
    pub(crate) fn pick_victim<R: Rng + ?Sized>(&self, rng: &mut R, except: usize) -> Option<usize> {
        let peers = self.capacity().checked_sub(1).filter(|&n| n > 0)?;
        let victim = rng.gen_range(0..peers);
        Some(if victim >= except { victim + 1 } else { victim })
    }

    fn should_exit(&self, id: usize) -> bool {
        self.done.load(Ordering::Acquire)
            && self.global.is_empty()
            && self.locals[id].close_if_empty()
    }

    /// Pops and runs everything in worker `id`'s local queue. Returns how many
    /// tasks were run.
    fn execute_local(&self, id: usize) -> usize {
        let mut executed = 0;
        while let Some(task) = self.locals[id].pop_bottom() {
            self.metrics().map(|m| m.on_task_started());

            // A panicking task leaves its future incomplete; the worker carries on.
            if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| task.execute())) {
                error!(worker = id, "task panicked: {}", panic_message(payload.as_ref()));
            }

            self.metrics().map(|m| m.on_task_completed());
            executed += 1;
        }
        executed
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("<non-string panic payload>")
}

/// The step a scheduling discipline runs between draining the global queue and
/// executing the local one.
pub trait Redistribute: Send + Sync + 'static {
    fn redistribute(&self, id: usize, shared: &Shared, rng: &mut SmallRng);
}

pub struct WorkerHandle {
    id: usize,
    thread: Option<thread::JoinHandle<()>>,
}

impl WorkerHandle {
    pub fn new(id: usize, thread: thread::JoinHandle<()>) -> Self {
        Self {
            id,
            thread: Some(thread),
        }
    }

    pub fn join(&mut self) {
        if let Some(handle) = self.thread.take() {
            if handle.join().is_err() {
                error!(worker = self.id, "worker thread panicked");
            }
        }
    }
}

/// Worker thread main loop.
///
/// Exits only once shutdown has been requested and both the global queue and this
/// worker's local queue are empty.
pub fn worker_loop<M: Redistribute>(id: usize, shared: Arc<Shared>, mode: M) {
    let mut rng = SmallRng::from_entropy();
    let backoff = Backoff::new();

    shared.metrics().map(|m| m.on_worker_started());
    debug!(worker = id, "worker started");

    loop {
        if shared.should_exit(id) {
            break;
        }

        stealer::drain(&shared.global, &shared.locals[id], shared.threshold);
        mode.redistribute(id, &shared, &mut rng);

        if shared.execute_local(id) == 0 {
            backoff.snooze();
        } else {
            backoff.reset();
        }
    }

    shared.metrics().map(|m| m.on_worker_stopped());
    debug!(worker = id, "worker exited");
}
