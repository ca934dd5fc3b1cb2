//! Criterion micro-benchmarks for row allocation, per-row views and bulk
//! column operations.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use inertia_core::{FieldId, RowId};
use inertia_soa::{ColumnStore, StoreConfig, StoreHandle};
use inertia_test_utils::fixtures::kinematic_fields;

const SCALE: FieldId = FieldId(0);
const X: FieldId = FieldId(1);
const V: FieldId = FieldId(2);
const A: FieldId = FieldId(3);

fn make_store(capacity: usize) -> ColumnStore {
    ColumnStore::with_fields(StoreConfig::new(capacity), kinematic_fields()).unwrap()
}

fn make_handle_10k() -> StoreHandle {
    let handle = StoreHandle::new(make_store(10_000));
    for _ in 0..10_000 {
        handle.take().unwrap();
    }
    handle
}

/// Benchmark: take 10K rows from an empty store, growing from capacity 0.
fn bench_take_with_growth_10k(c: &mut Criterion) {
    c.bench_function("take_with_growth_10k", |b| {
        b.iter_batched(
            || make_store(0),
            |mut store| {
                for _ in 0..10_000 {
                    black_box(store.take().unwrap());
                }
                store
            },
            BatchSize::SmallInput,
        );
    });
}

/// Benchmark: take 10K rows from a preallocated store.
fn bench_take_preallocated_10k(c: &mut Criterion) {
    c.bench_function("take_preallocated_10k", |b| {
        b.iter_batched(
            || make_store(10_000),
            |mut store| {
                for _ in 0..10_000 {
                    black_box(store.take().unwrap());
                }
                store
            },
            BatchSize::SmallInput,
        );
    });
}

/// Benchmark: read then write one 2-vector through a row view.
fn bench_view_get_set(c: &mut Criterion) {
    let handle = make_handle_10k();
    let view = handle.view(RowId(5_000)).unwrap();
    c.bench_function("view_get_set", |b| {
        b.iter(|| {
            let x = view.get::<f64>(X).unwrap();
            view.set(X, &[x[0] + 1.0, x[1]]).unwrap();
            black_box(x[0]);
        });
    });
}

/// Benchmark: semi-implicit Euler over 10K rows with bulk column ops.
fn bench_slice_euler_10k(c: &mut Criterion) {
    let handle = make_handle_10k();
    let rows = handle.occupied().unwrap();
    rows.fill(A, 1.0).unwrap();
    c.bench_function("slice_euler_10k", |b| {
        b.iter(|| {
            rows.axpy(1e-3, A, V).unwrap();
            rows.axpy(1e-3, V, X).unwrap();
        });
    });
}

/// Benchmark: per-row scaled accumulation over 10K rows.
fn bench_slice_scale_add_10k(c: &mut Criterion) {
    let handle = make_handle_10k();
    let rows = handle.occupied().unwrap();
    c.bench_function("slice_scale_add_10k", |b| {
        b.iter(|| {
            rows.scale_add_rows(SCALE, A, V).unwrap();
        });
    });
}

criterion_group!(
    benches,
    bench_take_with_growth_10k,
    bench_take_preallocated_10k,
    bench_view_get_set,
    bench_slice_euler_10k,
    bench_slice_scale_add_10k
);
criterion_main!(benches);
