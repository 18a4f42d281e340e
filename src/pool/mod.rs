pub mod future;
pub mod modes;
pub mod task;
mod worker;

use std::sync::{atomic::Ordering, Arc};
use std::thread;

use tracing::info;

use crate::errors::{PoolError, Result};
use crate::metrics::MetricsCollector;
use future::Future;
use modes::{SchedulingMode, WorkBalancingMode, WorkStealingMode};
use task::{bind_task, Task};
use worker::{worker_loop, Shared, WorkerHandle};

/// Number of workers used when none is configured.
pub const DEFAULT_NUM_THREADS: usize = 4;
/// Items pulled from the global queue per pass (and per steal) when none is configured.
pub const DEFAULT_THRESHOLD: usize = 16;
/// Minimum size gap for a balancing exchange when none is configured.
pub const DEFAULT_THRESHOLD_BALANCE: usize = 4;

/// A fixed pool of workers fed through a global queue and scheduled by `M`.
///
/// Submitting never blocks. [`shutdown`](Executor::shutdown) consumes the executor
/// and returns once every task submitted before it has run. Dropping an executor
/// has the same effect.
pub struct Executor<M: SchedulingMode> {
    shared: Arc<Shared>,
    workers: Vec<WorkerHandle>,
    mode: M,
}

impl<M: SchedulingMode> Executor<M> {
    fn spawn(shared: Shared, mode: M) -> Result<Self> {
        let shared = Arc::new(shared);
        let capacity = shared.capacity();
        let mut executor = Executor {
            shared,
            workers: Vec::with_capacity(capacity),
            mode,
        };

        for id in 0..capacity {
            let shared = Arc::clone(&executor.shared);
            let mode = executor.mode.clone();
            // On error the executor is dropped, which stops the workers spawned so far.
            let handle = thread::Builder::new()
                .name(format!("dequepool-worker-{id}"))
                .spawn(move || worker_loop(id, shared, mode))?;
            executor.workers.push(WorkerHandle::new(id, handle));
        }

        info!(
            mode = executor.mode(),
            capacity,
            threshold = executor.shared.threshold,
            "executor started"
        );
        Ok(executor)
    }

    /// Queues `task` and returns a future for its result.
    pub fn submit<T>(&self, task: Task<T>) -> Future<T>
    where
        T: Send + Sync + 'static,
    {
        let (task, future) = bind_task(task);
        self.shared.global.push_bottom(task);
        self.shared.metrics().map(|m| m.on_task_submitted());
        future
    }

    pub fn submit_callable<F, T>(&self, f: F) -> Future<T>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + Sync + 'static,
    {
        self.submit(Task::callable(f))
    }

    pub fn submit_runnable<F>(&self, f: F) -> Future<()>
    where
        F: FnOnce() + Send + 'static,
    {
        self.submit(Task::runnable(f))
    }

    /// Waits for all queued work to finish and stops the workers.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        if self.workers.is_empty() {
            return;
        }
        self.shared.done.store(true, Ordering::Release);
        for worker in &mut self.workers {
            worker.join();
        }
        self.workers.clear();
        info!(mode = self.mode(), "executor shut down");
    }

    /// Number of workers.
    pub fn capacity(&self) -> usize {
        self.shared.capacity()
    }

    pub fn threshold(&self) -> usize {
        self.shared.threshold
    }

    pub fn mode(&self) -> &'static str {
        self.mode.mode()
    }

    /// Snapshot of tasks waiting in the global queue and every local queue.
    pub fn pending(&self) -> usize {
        self.shared.global.size() + self.shared.locals.iter().map(|q| q.size()).sum::<usize>()
    }
}

impl Executor<WorkBalancingMode> {
    pub fn threshold_balance(&self) -> usize {
        self.mode.threshold_balance()
    }
}

impl<M: SchedulingMode> Drop for Executor<M> {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Creates a work-stealing executor with `capacity` workers, each pulling up to
/// `threshold` tasks per pass from the global queue or a victim.
pub fn new_work_stealing_executor(
    capacity: usize,
    threshold: usize,
) -> Result<Executor<WorkStealingMode>> {
    ExecutorBuilder::new()
        .num_threads(capacity)
        .threshold(threshold)
        .set_work_stealing()
        .build()
}

/// Creates a work-balancing executor with `capacity` workers. Each pulls up to
/// `threshold_queue` tasks per pass from the global queue, and balances with a peer
/// only when their sizes differ by more than `threshold_balance`.
pub fn new_work_balancing_executor(
    capacity: usize,
    threshold_queue: usize,
    threshold_balance: usize,
) -> Result<Executor<WorkBalancingMode>> {
    ExecutorBuilder::new()
        .num_threads(capacity)
        .threshold(threshold_queue)
        .set_work_balancing(threshold_balance)
        .build()
}

/// States for the ExecutorBuilder
pub struct DefaultModeState; // no discipline selected
pub struct WorkStealingState;
pub struct WorkBalancingState {
    threshold_balance: usize,
}

/// Typed-state builder: a discipline must be chosen before `build` is available.
pub struct ExecutorBuilder<S = DefaultModeState> {
    num_threads: usize,
    threshold: usize,
    metrics_collector: Option<Arc<dyn MetricsCollector>>,
    state: S,
}

impl<S> ExecutorBuilder<S> {
    pub fn num_threads(mut self, n: usize) -> Self {
        self.num_threads = n;
        self
    }

    /// Items a worker pulls from the global queue per pass, and the attempt
    /// budget of a steal.
    pub fn threshold(mut self, threshold: usize) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_metrics_collector(mut self, collector: Arc<dyn MetricsCollector>) -> Self {
        self.metrics_collector = Some(collector);
        self
    }

    fn with_state<N>(self, state: N) -> ExecutorBuilder<N> {
        ExecutorBuilder {
            num_threads: self.num_threads,
            threshold: self.threshold,
            metrics_collector: self.metrics_collector,
            state,
        }
    }

    fn shared(self) -> Result<Shared> {
        if self.num_threads == 0 {
            return Err(PoolError::InvalidCapacity(self.num_threads));
        }
        if self.threshold == 0 {
            return Err(PoolError::InvalidThreshold { name: "threshold" });
        }
        Ok(Shared::new(
            self.num_threads,
            self.threshold,
            self.metrics_collector,
        ))
    }
}

impl ExecutorBuilder<DefaultModeState> {
    pub fn new() -> Self {
        Self {
            num_threads: DEFAULT_NUM_THREADS,
            threshold: DEFAULT_THRESHOLD,
            metrics_collector: None,
            state: DefaultModeState,
        }
    }

    pub fn set_work_stealing(self) -> ExecutorBuilder<WorkStealingState> {
        self.with_state(WorkStealingState)
    }

    pub fn set_work_balancing(self, threshold_balance: usize) -> ExecutorBuilder<WorkBalancingState> {
        self.with_state(WorkBalancingState { threshold_balance })
    }
}

impl Default for ExecutorBuilder<DefaultModeState> {
    fn default() -> Self {
        Self::new()
    }
}

impl ExecutorBuilder<WorkStealingState> {
    pub fn build(self) -> Result<Executor<WorkStealingMode>> {
        Executor::spawn(self.shared()?, WorkStealingMode)
    }
}

impl ExecutorBuilder<WorkBalancingState> {
    pub fn build(self) -> Result<Executor<WorkBalancingMode>> {
        let mode = WorkBalancingMode::new(self.state.threshold_balance);
        Executor::spawn(self.shared()?, mode)
    }
}
