//! Metrics collection for the executor.
//!
//! This module defines the `MetricsCollector` trait for collecting metrics about the
//! executor's activity, as well as a default implementation backed by atomic counters.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// A trait for collecting metrics from the executor.
///
/// Implementations of this trait provide hooks to track key events in the executor,
/// such as task submission, execution, redistribution and worker lifecycle changes.
pub trait MetricsCollector: Send + Sync {
    /// Called when a task is submitted to the global queue.
    fn on_task_submitted(&self);
    /// Called when a worker starts executing a task.
    fn on_task_started(&self);
    /// Called when a task has run to completion.
    fn on_task_completed(&self);
    /// Called when a worker thread starts.
    fn on_worker_started(&self);
    /// Called when a worker thread exits.
    fn on_worker_stopped(&self);
    /// Called after a steal moved `count` tasks from a victim's queue.
    fn on_tasks_stolen(&self, _count: usize) {}
    /// Called after a balancing exchange moved `count` tasks between two queues.
    fn on_tasks_balanced(&self, _count: usize) {}
}

/// Stores metrics for the executor using atomic counters.
#[derive(Debug, Default)]
pub struct ExecutorMetrics {
    /// Number of tasks submitted but not yet started.
    pub queued_tasks: AtomicUsize,
    /// Number of tasks currently being executed.
    pub running_tasks: AtomicUsize,
    /// Total number of tasks that have completed.
    pub completed_tasks: AtomicUsize,
    /// Number of worker threads currently alive.
    pub active_threads: AtomicUsize,
    /// Total number of tasks moved by steals.
    pub stolen_tasks: AtomicUsize,
    /// Total number of tasks moved by balancing exchanges.
    pub balanced_tasks: AtomicUsize,
}

impl ExecutorMetrics {
    /// Creates a new `ExecutorMetrics` instance with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }
}

/// A default implementation of `MetricsCollector` using atomic counters.
///
/// It is backed by an `Arc<ExecutorMetrics>` so the counters can be read while the
/// executor is running.
pub struct AtomicMetricsCollector {
    /// Shared metrics storage.
    pub metrics: Arc<ExecutorMetrics>,
}

impl AtomicMetricsCollector {
    /// Creates a collector that updates the counters in `metrics`.
    pub fn new(metrics: Arc<ExecutorMetrics>) -> Self {
        Self { metrics }
    }
}

impl MetricsCollector for AtomicMetricsCollector {
    /// Increments the count of queued tasks.
    fn on_task_submitted(&self) {
        self.metrics.queued_tasks.fetch_add(1, Ordering::SeqCst);
    }

    /// Moves one task from the queued count to the running count.
    fn on_task_started(&self) {
        self.metrics.queued_tasks.fetch_sub(1, Ordering::SeqCst);
        self.metrics.running_tasks.fetch_add(1, Ordering::SeqCst);
    }

    /// Moves one task from the running count to the completed count.
    fn on_task_completed(&self) {
        self.metrics.running_tasks.fetch_sub(1, Ordering::SeqCst);
        self.metrics.completed_tasks.fetch_add(1, Ordering::SeqCst);
    }

    /// Increments the count of active threads.
    fn on_worker_started(&self) {
        self.metrics.active_threads.fetch_add(1, Ordering::SeqCst);
    }

    /// Decrements the count of active threads.
    fn on_worker_stopped(&self) {
        self.metrics.active_threads.fetch_sub(1, Ordering::SeqCst);
    }

    /// Adds `count` to the total of stolen tasks.
    fn on_tasks_stolen(&self, count: usize) {
        self.metrics.stolen_tasks.fetch_add(count, Ordering::SeqCst);
    }

    /// Adds `count` to the total of tasks moved by balancing.
    fn on_tasks_balanced(&self, count: usize) {
        self.metrics.balanced_tasks.fetch_add(count, Ordering::SeqCst);
    }
}
