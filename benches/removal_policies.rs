//! Removal Policy Benchmarks
//!
//! Compares the three removal policies across store sizes:
//! - `store/*`: the in-memory structure alone
//! - `db/*`: through the database, with the log in the configured mode
//!
//! ## Running
//!
//! ```bash
//! cargo bench --bench removal_policies
//! cargo bench --bench removal_policies -- "store/shift_compact"
//! ENTRYSTORE_BENCH_DURABILITY=always cargo bench --bench removal_policies -- "db/"
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use entrystore::{Database, EntryStore, RemovalPolicy};
use std::sync::Arc;
use tempfile::TempDir;

/// Store sizes for scaling benchmarks.
const STORE_SIZES: &[u64] = &[100, 1_000, 10_000, 100_000];

const POLICIES: &[(RemovalPolicy, &str)] = &[
    (RemovalPolicy::LeaveGap, "leave_gap"),
    (RemovalPolicy::ShiftCompact, "shift_compact"),
    (RemovalPolicy::SwapCompact, "swap_compact"),
];

/// Durability for the `db/*` group, from `ENTRYSTORE_BENCH_DURABILITY`.
fn open_db(dir: &TempDir) -> Arc<Database> {
    let builder = Database::builder().path(dir.path());
    let builder = match std::env::var("ENTRYSTORE_BENCH_DURABILITY").as_deref() {
        Ok("always") => builder.always(),
        Ok("cache") => builder.cache(),
        _ => builder.standard(),
    };
    builder.open().unwrap()
}

fn filled_store(n: u64) -> EntryStore {
    let mut store = EntryStore::new();
    for v in 0..n {
        store.append(v + 1).unwrap();
    }
    store
}

/// Remove at the front: the worst case for shift-compact.
fn store_remove_front(c: &mut Criterion) {
    let mut group = c.benchmark_group("store");
    group.throughput(Throughput::Elements(1));

    for &size in STORE_SIZES {
        for &(policy, name) in POLICIES {
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, &size| {
                b.iter_batched_ref(
                    || filled_store(size),
                    |store| store.remove(policy, black_box(0)).unwrap(),
                    criterion::BatchSize::LargeInput,
                )
            });
        }
    }

    group.finish();
}

/// Drain a store one removal at a time from position 0.
fn store_drain(c: &mut Criterion) {
    let mut group = c.benchmark_group("store_drain");
    let size = 10_000;
    group.throughput(Throughput::Elements(size));

    for &(policy, name) in POLICIES {
        if policy == RemovalPolicy::LeaveGap {
            // Never shrinks
            continue;
        }
        group.bench_function(name, |b| {
            b.iter_batched_ref(
                || filled_store(size),
                |store| {
                    while !store.is_empty() {
                        store.remove(policy, 0).unwrap();
                    }
                },
                criterion::BatchSize::LargeInput,
            )
        });
    }

    group.finish();
}

/// One append followed by one removal at position 0, through the database.
fn db_append_remove(c: &mut Criterion) {
    let mut group = c.benchmark_group("db");
    group.throughput(Throughput::Elements(2));

    for &size in &[1_000u64, 10_000] {
        for &(policy, name) in POLICIES {
            let dir = TempDir::new().unwrap();
            let db = open_db(&dir);
            for v in 0..size {
                db.append(v + 1).unwrap();
            }

            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                let mut next = size;
                b.iter(|| {
                    next += 1;
                    db.append(black_box(next)).unwrap();
                    db.remove(policy, black_box(0)).unwrap();
                })
            });
        }
    }

    group.finish();
}

criterion_group!(benches, store_remove_front, store_drain, db_append_remove);
criterion_main!(benches);
