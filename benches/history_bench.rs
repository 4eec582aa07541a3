//! Criterion benchmarks for the time history's hot paths.
//!
//! Key metrics:
//! - Insert throughput (`add`) at various capacities
//! - Exact-match and interpolated `get` latency
//! - Concurrent insert/query throughput under contention
//!
//! Run with: cargo bench --bench history_bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use fusion_core::history::TimeHistory;
use fusion_core::quantity::Scalar;
use fusion_core::timestamped_value::TimestampedValue;
use fusion_core::units::registry::RADIAN;
use std::sync::Arc;
use std::thread;

/// Benchmark `add` at a range of capacities, to see whether insert cost
/// scales with the slot count (it shouldn't — inserts are O(1)).
fn history_add_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("history_add");

    for capacity in [16usize, 256, 1000] {
        group.bench_with_input(
            BenchmarkId::new("add", capacity),
            &capacity,
            |b, &capacity| {
                let history: TimeHistory<Scalar> = TimeHistory::new(capacity, Scalar::default());
                let mut t = 0i64;
                b.iter(|| {
                    history.add(Scalar::new(black_box(t as f32), RADIAN), t);
                    t += 1;
                });
            },
        );
    }

    group.finish();
}

/// Benchmark exact-timestamp `get` against the most recently inserted
/// sample, the cheapest lookup path.
fn history_get_exact_match(c: &mut Criterion) {
    let history: TimeHistory<Scalar> = TimeHistory::new(1000, Scalar::default());
    for t in 0..1000i64 {
        history.add(Scalar::new(t as f32, RADIAN), t);
    }

    let mut out = TimestampedValue::empty(Scalar::default());
    c.bench_function("history_get_exact_match", |b| {
        b.iter(|| {
            history.get(black_box(999), &mut out);
        });
    });
}

/// Benchmark an interpolated `get`, which requires walking back to the
/// bracketing pair and running `Scalar::interpolate`.
fn history_get_interpolated(c: &mut Criterion) {
    let history: TimeHistory<Scalar> = TimeHistory::new(1000, Scalar::default());
    for t in (0..10_000i64).step_by(10) {
        history.add(Scalar::new(t as f32, RADIAN), t);
    }

    let mut out = TimestampedValue::empty(Scalar::default());
    c.bench_function("history_get_interpolated", |b| {
        b.iter(|| {
            history.get(black_box(9_995), &mut out);
        });
    });
}

/// Benchmark concurrent insert/query throughput with a single writer and
/// several concurrent readers contending on the same mutex.
fn history_concurrent_contention(c: &mut Criterion) {
    let mut group = c.benchmark_group("history_concurrent");

    for reader_count in [1usize, 4, 8] {
        group.bench_with_input(
            BenchmarkId::new("readers", reader_count),
            &reader_count,
            |b, &reader_count| {
                b.iter(|| {
                    let history = Arc::new(TimeHistory::<Scalar>::new(256, Scalar::default()));

                    let writer_history = Arc::clone(&history);
                    let writer = thread::spawn(move || {
                        for t in 0..1_000i64 {
                            writer_history.add(Scalar::new(t as f32, RADIAN), t);
                        }
                    });

                    let readers: Vec<_> = (0..reader_count)
                        .map(|_| {
                            let reader_history = Arc::clone(&history);
                            thread::spawn(move || {
                                let mut out = TimestampedValue::empty(Scalar::default());
                                for _ in 0..1_000 {
                                    let _ = reader_history.get(black_box(500), &mut out);
                                }
                            })
                        })
                        .collect();

                    writer.join().unwrap();
                    for reader in readers {
                        reader.join().unwrap();
                    }
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    history_add_throughput,
    history_get_exact_match,
    history_get_interpolated,
    history_concurrent_contention
);
criterion_main!(benches);
