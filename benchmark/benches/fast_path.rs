use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fair_pool::ResourcePool;
use std::sync::Arc;
use std::time::Duration;

/// Uncontended paths: grab and return a free resource with nobody queued.
fn bench_uncontended(c: &mut Criterion) {
    let mut group = c.benchmark_group("uncontended");
    group.sample_size(100);
    group.measurement_time(Duration::from_secs(3));

    group.bench_function("try_acquire_release", |b| {
        let pool = ResourcePool::new(vec![(); 1]).unwrap();
        b.iter(|| {
            let held = pool.try_acquire().unwrap();
            black_box(&held);
        });
    });

    group.bench_function("acquire_release", |b| {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let pool = ResourcePool::new(vec![(); 1]).unwrap();
        b.iter(|| {
            rt.block_on(async {
                let held = pool.acquire().await.unwrap();
                black_box(&held);
            });
        });
    });

    group.bench_function("value_pool_roundtrip", |b| {
        let pool = ResourcePool::new(vec![String::from("resource")]).unwrap();
        b.iter(|| {
            let held = pool.try_acquire().unwrap();
            black_box(held.len());
        });
    });

    group.finish();
}

/// One resource threaded through a line of waiters, hand-off by hand-off.
fn bench_handoff_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("handoff_chain");
    group.sample_size(50);
    group.measurement_time(Duration::from_secs(5));

    group.bench_function("64_waiters", |b| {
        let rt = tokio::runtime::Runtime::new().unwrap();
        b.iter(|| {
            rt.block_on(async {
                let pool = Arc::new(ResourcePool::new(vec![0u64]).unwrap());
                let held = pool.try_acquire().unwrap();

                let tasks: Vec<_> = (0..64)
                    .map(|_| {
                        let pool = Arc::clone(&pool);
                        tokio::spawn(async move {
                            let _held = pool.acquire_owned().await.unwrap();
                        })
                    })
                    .collect();

                tokio::task::yield_now().await;
                drop(held);

                for task in tasks {
                    task.await.unwrap();
                }
            });
        });
    });

    group.finish();
}

criterion_group!(benches, bench_uncontended, bench_handoff_chain);
criterion_main!(benches);
