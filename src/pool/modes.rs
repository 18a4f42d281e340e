//! Scheduling disciplines for the executor.
//!
//! A mode decides what a worker does between pulling a batch from the global queue
//! and running its local queue: steal from a peer when idle, or periodically even
//! out its backlog with a peer.

use rand::rngs::SmallRng;
use tracing::trace;

use super::worker::{Redistribute, Shared};
use crate::{balancer, stealer};

/// A scheduling discipline an [`Executor`](super::Executor) can run.
///
/// This trait is sealed: the two disciplines below are the only implementations.
pub trait SchedulingMode: Redistribute + Clone {
    /// Returns the name of the scheduling discipline.
    fn mode(&self) -> &'static str;
}

/// Work-stealing.
///
/// A worker whose local queue is still empty after draining the global queue picks a
/// random peer and makes up to `threshold` attempts to take tasks from the top of that
/// peer's queue.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkStealingMode;

impl SchedulingMode for WorkStealingMode {
    fn mode(&self) -> &'static str {
        "WorkStealing"
    }
}

impl Redistribute for WorkStealingMode {
    fn redistribute(&self, id: usize, shared: &Shared, rng: &mut SmallRng) {
        let local = &shared.locals[id];
        if !local.is_empty() {
            return;
        }
        let Some(victim) = shared.pick_victim(rng, id) else {
            return;
        };

        let stolen = stealer::steal(&shared.locals[victim], local, shared.threshold);
        if stolen > 0 {
            trace!(worker = id, victim, stolen, "stole tasks");
            shared.metrics().map(|m| m.on_tasks_stolen(stolen));
        }
    }
}

/// Work-balancing.
///
/// On every pass a worker balances with probability `1 / (local_size + 1)`. A balance
/// picks a random peer and, when the two queue sizes differ by more than
/// `threshold_balance`, moves half the difference from the larger to the smaller.
#[derive(Debug, Clone, Copy)]
pub struct WorkBalancingMode {
    threshold_balance: usize,
}

impl WorkBalancingMode {
    pub fn new(threshold_balance: usize) -> Self {
        Self { threshold_balance }
    }

    pub fn threshold_balance(&self) -> usize {
        self.threshold_balance
    }
}

impl SchedulingMode for WorkBalancingMode {
    fn mode(&self) -> &'static str {
        "WorkBalancing"
    }
}

impl Redistribute for WorkBalancingMode {
    fn redistribute(&self, id: usize, shared: &Shared, rng: &mut SmallRng) {
        let local = &shared.locals[id];
        if !balancer::should_balance(rng, local.size()) {
            return;
        }
        let Some(victim) = shared.pick_victim(rng, id) else {
            return;
        };

        let moved = balancer::balance(local, &shared.locals[victim], self.threshold_balance);
        if moved > 0 {
            trace!(worker = id, victim, moved, "balanced queues");
            shared.metrics().map(|m| m.on_tasks_balanced(moved));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{AtomicMetricsCollector, ExecutorMetrics, MetricsCollector};
    use crate::pool::task::{bind_task, Task};
    use rand::SeedableRng;
    use std::sync::atomic::Ordering;
    use std::sync::Arc;

    fn fill(shared: &Shared, sizes: &[usize]) {
        for (queue, &n) in shared.locals.iter().zip(sizes) {
            for _ in 0..n {
                let (task, _) = bind_task(Task::runnable(|| {}));
                queue.push_bottom(task);
            }
        }
    }

    fn shared_with(sizes: &[usize], threshold: usize) -> Shared {
        let shared = Shared::new(sizes.len(), threshold, None);
        fill(&shared, sizes);
        shared
    }

    fn metered_shared_with(sizes: &[usize], threshold: usize) -> (Shared, Arc<ExecutorMetrics>) {
        let metrics = Arc::new(ExecutorMetrics::new());
        let collector: Arc<dyn MetricsCollector> =
            Arc::new(AtomicMetricsCollector::new(Arc::clone(&metrics)));
        let shared = Shared::new(sizes.len(), threshold, Some(collector));
        fill(&shared, sizes);
        (shared, metrics)
    }

    #[test]
    fn idle_worker_steals_up_to_threshold() {
        let shared = shared_with(&[0, 10], 3);
        let mut rng = SmallRng::seed_from_u64(1);
        WorkStealingMode.redistribute(0, &shared, &mut rng);
        assert_eq!(shared.locals[0].size(), 3);
        assert_eq!(shared.locals[1].size(), 7);
    }

    #[test]
    fn busy_worker_does_not_steal() {
        let shared = shared_with(&[1, 10], 3);
        let mut rng = SmallRng::seed_from_u64(1);
        WorkStealingMode.redistribute(0, &shared, &mut rng);
        assert_eq!(shared.locals[0].size(), 1);
        assert_eq!(shared.locals[1].size(), 10);
    }

    #[test]
    fn empty_worker_always_balances_with_its_only_peer() {
        let shared = shared_with(&[0, 10], 1);
        let mut rng = SmallRng::seed_from_u64(1);
        WorkBalancingMode::new(3).redistribute(0, &shared, &mut rng);
        assert_eq!(shared.locals[0].size(), 5);
        assert_eq!(shared.locals[1].size(), 5);
    }

    #[test]
    fn lone_worker_keeps_its_queue() {
        let shared = shared_with(&[4], 1);
        let mut rng = SmallRng::seed_from_u64(1);
        WorkStealingMode.redistribute(0, &shared, &mut rng);
        WorkBalancingMode::new(0).redistribute(0, &shared, &mut rng);
        assert_eq!(shared.locals[0].size(), 4);
    }

    #[test]
    fn steals_are_counted() {
        let (shared, metrics) = metered_shared_with(&[0, 10], 3);
        let mut rng = SmallRng::seed_from_u64(1);
        WorkStealingMode.redistribute(0, &shared, &mut rng);
        assert_eq!(metrics.stolen_tasks.load(Ordering::SeqCst), 3);
        assert_eq!(metrics.balanced_tasks.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn balance_transfers_are_counted() {
        let (shared, metrics) = metered_shared_with(&[0, 10], 3);
        let mut rng = SmallRng::seed_from_u64(1);
        WorkBalancingMode::new(3).redistribute(0, &shared, &mut rng);
        assert_eq!(metrics.balanced_tasks.load(Ordering::SeqCst), 5);
        assert_eq!(metrics.stolen_tasks.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn empty_exchanges_are_not_counted() {
        let (shared, metrics) = metered_shared_with(&[0, 0], 3);
        let mut rng = SmallRng::seed_from_u64(1);
        WorkStealingMode.redistribute(0, &shared, &mut rng);
        WorkBalancingMode::new(3).redistribute(0, &shared, &mut rng);
        assert_eq!(metrics.stolen_tasks.load(Ordering::SeqCst), 0);
        assert_eq!(metrics.balanced_tasks.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn mode_names() {
        assert_eq!(WorkStealingMode.mode(), "WorkStealing");
        assert_eq!(WorkBalancingMode::new(2).mode(), "WorkBalancing");
    }
}
