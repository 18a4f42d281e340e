use dequepool::{
    log_metrics,
    metrics::{AtomicMetricsCollector, ExecutorMetrics},
    ExecutorBuilder,
};
use std::sync::{atomic::Ordering, Arc};

#[test]
fn test_metrics_count_the_lifecycle() {
    let metrics = Arc::new(ExecutorMetrics::new());
    let collector = Arc::new(AtomicMetricsCollector::new(metrics.clone()));

    let executor = ExecutorBuilder::new()
        .num_threads(4)
        .threshold(4)
        .with_metrics_collector(collector)
        .set_work_stealing()
        .build()
        .unwrap();

    let futures: Vec<_> = (0..500).map(|i| executor.submit_callable(move || i)).collect();
    executor.shutdown();

    assert!(futures.iter().all(|f| f.is_done()));
    assert_eq!(metrics.completed_tasks.load(Ordering::SeqCst), 500);
    assert_eq!(metrics.queued_tasks.load(Ordering::SeqCst), 0);
    assert_eq!(metrics.running_tasks.load(Ordering::SeqCst), 0);
    assert_eq!(metrics.active_threads.load(Ordering::SeqCst), 0);
    log_metrics!(metrics);
}

#[test]
fn test_balancing_with_large_drain_budget_completes() {
    let metrics = Arc::new(ExecutorMetrics::new());
    let collector = Arc::new(AtomicMetricsCollector::new(metrics.clone()));

    let executor = ExecutorBuilder::new()
        .num_threads(4)
        .threshold(10_000)
        .with_metrics_collector(collector)
        .set_work_balancing(0)
        .build()
        .unwrap();

    let futures: Vec<_> = (0..5_000)
        .map(|_| {
            executor.submit_runnable(|| {
                std::thread::sleep(std::time::Duration::from_micros(50));
            })
        })
        .collect();
    executor.shutdown();

    assert!(futures.iter().all(|f| f.is_done()));
    assert_eq!(metrics.completed_tasks.load(Ordering::SeqCst), 5_000);
    assert_eq!(metrics.queued_tasks.load(Ordering::SeqCst), 0);
}
