//! # dequepool
//!
//! `dequepool` is a task-parallel executor built on lock-guarded double-ended
//! queues. Submitted tasks land in a global queue; each worker pulls batches of them
//! into its own local queue and runs them, using one of two scheduling disciplines to
//! spread the load:
//!
//! - **Work-stealing**: a worker that finds itself idle takes tasks from the top of a
//!   randomly chosen peer's queue.
//! - **Work-balancing**: a worker now and then evens out its backlog with a randomly
//!   chosen peer, whether or not it is idle.
//!
//! ## Features
//! - Value-returning (callable) and side-effecting (runnable) tasks.
//! - One-shot futures that can be read any number of times.
//! - Graceful shutdown that runs every task submitted before it.
//! - Metrics hooks for monitoring executor activity.
//!
//! ## Usage
//!
//! ### Work-Stealing
//! ```rust
//! use dequepool::new_work_stealing_executor;
//!
//! // 4 workers, each pulling up to 8 tasks at a time
//! let executor = new_work_stealing_executor(4, 8).unwrap();
//!
//! let future = executor.submit_callable(|| 6 * 7);
//! assert_eq!(future.get(), Some(&42));
//!
//! executor.shutdown();
//! ```
//!
//! ### Work-Balancing
//! ```rust
//! use dequepool::ExecutorBuilder;
//!
//! let executor = ExecutorBuilder::new()
//!     .num_threads(8)
//!     .threshold(16)
//!     .set_work_balancing(4)
//!     .build()
//!     .unwrap();
//!
//! // Runnables complete with no value.
//! let futures: Vec<_> = (0..10)
//!     .map(|i| executor.submit_runnable(move || println!("Task {} executed", i)))
//!     .collect();
//!
//! for future in &futures {
//!     assert_eq!(future.get(), None);
//! }
//!
//! executor.shutdown();
//! ```
//!
//! ### Collecting Metrics
//! ```rust
//! use dequepool::{metrics::{ExecutorMetrics, AtomicMetricsCollector}, ExecutorBuilder};
//! use std::sync::{atomic::Ordering, Arc};
//!
//! let metrics = Arc::new(ExecutorMetrics::new());
//! let collector = Arc::new(AtomicMetricsCollector::new(metrics.clone()));
//!
//! let executor = ExecutorBuilder::new()
//!     .with_metrics_collector(collector)
//!     .set_work_stealing()
//!     .build()
//!     .unwrap();
//!
//! for i in 0..5 {
//!     executor.submit_runnable(move || println!("Task {} executed", i));
//! }
//! executor.shutdown();
//!
//! assert_eq!(metrics.completed_tasks.load(Ordering::SeqCst), 5);
//! ```

mod balancer;
mod errors;
mod macros;
pub mod metrics;
pub mod nbody;
pub mod pool;
mod queue;
mod stealer;

pub use errors::{PoolError, Result};
pub use pool::future::Future;
pub use pool::modes::{SchedulingMode, WorkBalancingMode, WorkStealingMode};
pub use pool::task::Task;
pub use pool::{new_work_balancing_executor, new_work_stealing_executor, Executor, ExecutorBuilder};
pub use queue::DeQueue;

#[doc(hidden)]
pub use tracing as __tracing;
