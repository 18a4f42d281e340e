//! # Macros for `dequepool`
//!
//! Shorthand for submitting tasks, building executors and logging metrics.

/// Submits a closure as a callable or a runnable task.
///
/// # Examples
/// ```rust
/// use dequepool::{new_work_stealing_executor, submit};
///
/// let executor = new_work_stealing_executor(2, 4).unwrap();
///
/// let value = submit!(executor, call: || 1 + 1);
/// let effect = submit!(executor, run: || println!("side effect"));
///
/// assert_eq!(value.get(), Some(&2));
/// assert_eq!(effect.get(), None);
/// executor.shutdown();
/// ```
#[macro_export]
macro_rules! submit {
    ($executor:expr, call: $task:expr) => {
        $executor.submit_callable($task)
    };
    ($executor:expr, run: $task:expr) => {
        $executor.submit_runnable($task)
    };
}

/// Logs the current metrics of the executor at `info` level.
///
/// # Example
/// ```rust
/// use dequepool::{metrics::{ExecutorMetrics, AtomicMetricsCollector}, ExecutorBuilder, log_metrics};
/// use std::sync::Arc;
///
/// let metrics = Arc::new(ExecutorMetrics::new());
/// let collector = Arc::new(AtomicMetricsCollector::new(metrics.clone()));
/// let executor = ExecutorBuilder::new()
///     .with_metrics_collector(collector)
///     .set_work_stealing()
///     .build()
///     .unwrap();
///
/// log_metrics!(metrics);
/// executor.shutdown();
/// ```
#[macro_export]
macro_rules! log_metrics {
    ($metrics:expr) => {
        $crate::__tracing::info!(
            queued = $metrics.queued_tasks.load(::std::sync::atomic::Ordering::SeqCst),
            running = $metrics.running_tasks.load(::std::sync::atomic::Ordering::SeqCst),
            completed = $metrics.completed_tasks.load(::std::sync::atomic::Ordering::SeqCst),
            active_threads = $metrics.active_threads.load(::std::sync::atomic::Ordering::SeqCst),
            stolen = $metrics.stolen_tasks.load(::std::sync::atomic::Ordering::SeqCst),
            balanced = $metrics.balanced_tasks.load(::std::sync::atomic::Ordering::SeqCst),
            "executor metrics"
        )
    };
}

/// Creates an executor for either discipline.
///
/// # Examples
/// ```rust
/// use dequepool::create_executor;
///
/// let stealing = create_executor!(num_threads: 4, threshold: 8, work_stealing).unwrap();
/// let balancing = create_executor!(num_threads: 4, threshold: 8, work_balancing: 2).unwrap();
/// stealing.shutdown();
/// balancing.shutdown();
/// ```
#[macro_export]
macro_rules! create_executor {
    (num_threads: $num:expr, threshold: $threshold:expr, work_stealing) => {
        $crate::new_work_stealing_executor($num, $threshold)
    };
    (num_threads: $num:expr, threshold: $threshold:expr, work_balancing: $balance:expr) => {
        $crate::new_work_balancing_executor($num, $threshold, $balance)
    };
}
