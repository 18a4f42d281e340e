use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use dequepool::{new_work_balancing_executor, new_work_stealing_executor, Executor, SchedulingMode};

/// A CPU-bound task whose cost varies with its index.
fn cpu_task(i: u64) -> u64 {
    let n = if i % 64 == 0 { 20_000 } else { 200 };
    (0..n).map(|x| x ^ i).sum()
}

fn run_tasks<M: SchedulingMode>(executor: Executor<M>, num_tasks: u64) {
    let futures: Vec<_> = (0..num_tasks)
        .map(|i| executor.submit_callable(move || cpu_task(i)))
        .collect();

    for f in &futures {
        let _ = f.get();
    }
    executor.shutdown();
}

fn benchmark_work_stealing(c: &mut Criterion) {
    let mut group = c.benchmark_group("work_stealing");
    group.sample_size(10);

    let num_threads = 4;
    let num_tasks = 10_000;

    for threshold in [1, 16, 256] {
        group.bench_function(format!("work_stealing_10k_tasks_threshold_{threshold}"), |b| {
            b.iter_batched(
                || new_work_stealing_executor(num_threads, threshold).unwrap(),
                |executor| run_tasks(executor, num_tasks),
                BatchSize::LargeInput,
            )
        });
    }

    group.finish();
}

fn benchmark_work_balancing(c: &mut Criterion) {
    let mut group = c.benchmark_group("work_balancing");
    group.sample_size(10);

    let num_threads = 4;
    let num_tasks = 10_000;

    for threshold_balance in [0, 8, 64] {
        group.bench_function(
            format!("work_balancing_10k_tasks_balance_{threshold_balance}"),
            |b| {
                b.iter_batched(
                    || new_work_balancing_executor(num_threads, 16, threshold_balance).unwrap(),
                    |executor| run_tasks(executor, num_tasks),
                    BatchSize::LargeInput,
                )
            },
        );
    }

    group.finish();
}

fn benchmark_sequential(c: &mut Criterion) {
    let mut group = c.benchmark_group("sequential");
    group.sample_size(10);

    group.bench_function("sequential_10k_tasks", |b| {
        b.iter(|| (0..10_000).map(cpu_task).sum::<u64>())
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_work_stealing,
    benchmark_work_balancing,
    benchmark_sequential
);
criterion_main!(benches);
