//! Task store benchmarks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use taskd_store::{InMemoryTaskStore, PageRequest, TaskStore};
use taskd_types::{TaskDraft, TaskId, TaskStatus};

fn seeded_store(n: usize) -> (InMemoryTaskStore, Vec<TaskId>) {
    let store = InMemoryTaskStore::new();
    let ids = (0..n)
        .map(|i| {
            store
                .create(TaskDraft::new(format!("task-{i}"), TaskStatus::Pending))
                .unwrap()
                .id
        })
        .collect();
    (store, ids)
}

/// Benchmark appends into a growing store.
fn bench_create(c: &mut Criterion) {
    let store = InMemoryTaskStore::new();
    c.bench_function("create", |b| {
        b.iter(|| {
            let task = store
                .create(black_box(TaskDraft::new("bench", TaskStatus::Pending)))
                .unwrap();
            black_box(task);
        });
    });
}

/// Benchmark point lookups at several store sizes.
fn bench_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("get");

    for size in [1_000, 10_000, 100_000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let (store, ids) = seeded_store(size);
            let mut i = 0;
            b.iter(|| {
                let task = store.get(black_box(&ids[i % ids.len()])).unwrap();
                i += 1;
                black_box(task);
            });
        });
    }

    group.finish();
}

/// Benchmark swap-delete; each iteration deletes one task and re-creates one.
fn bench_delete(c: &mut Criterion) {
    let mut group = c.benchmark_group("delete");

    for size in [1_000, 100_000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let (store, mut ids) = seeded_store(size);
            let mut i = 0;
            b.iter(|| {
                let slot = i % ids.len();
                store.delete(black_box(&ids[slot])).unwrap();
                ids[slot] = store
                    .create(TaskDraft::new("replacement", TaskStatus::Done))
                    .unwrap()
                    .id;
                i += 7;
            });
        });
    }

    group.finish();
}

/// Benchmark listing one full page from the front and the back of the store.
fn bench_list(c: &mut Criterion) {
    let mut group = c.benchmark_group("list");
    let (store, _) = seeded_store(100_000);

    for page in [1_i64, 500, 1_000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(page), page, |b, &page| {
            b.iter(|| {
                let result = store.list(black_box(PageRequest::new(page))).unwrap();
                black_box(result);
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_create, bench_get, bench_delete, bench_list);
criterion_main!(benches);
