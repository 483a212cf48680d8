//! Benchmarks for the SPSC queue.
//!
//! Compares tickflow's SPSC ring buffer against crossbeam-queue's
//! ArrayQueue on the same workloads.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use crossbeam_queue::ArrayQueue;
use tickflow::spsc;

/// Message sizes to benchmark
#[allow(unused)]
#[derive(Debug, Clone, Copy)]
struct Small(u64);

#[allow(unused)]
#[derive(Debug, Clone, Copy)]
struct Medium([u64; 16]); // 128 bytes

// ============================================================================
// Single-threaded latency benchmarks
// ============================================================================

fn bench_single_thread_latency(c: &mut Criterion) {
    let mut group = c.benchmark_group("spsc_single_thread_latency");

    // --- Small message (8 bytes) ---
    group.bench_function("tickflow/u64", |b| {
        let (mut tx, mut rx) = spsc::RingBuffer::<Small, 1024>::new();
        b.iter(|| {
            tx.push(black_box(Small(42))).unwrap();
            black_box(rx.pop().unwrap())
        });
    });

    group.bench_function("crossbeam_array/u64", |b| {
        let q = ArrayQueue::<Small>::new(1024);
        b.iter(|| {
            q.push(black_box(Small(42))).unwrap();
            black_box(q.pop().unwrap())
        });
    });

    // --- Medium message (128 bytes) ---
    group.bench_function("tickflow/128b", |b| {
        let (mut tx, mut rx) = spsc::RingBuffer::<Medium, 1024>::new();
        let msg = Medium([0; 16]);
        b.iter(|| {
            tx.push(black_box(msg)).unwrap();
            black_box(rx.pop().unwrap())
        });
    });

    group.bench_function("crossbeam_array/128b", |b| {
        let q = ArrayQueue::<Medium>::new(1024);
        let msg = Medium([0; 16]);
        b.iter(|| {
            q.push(black_box(msg)).unwrap();
            black_box(q.pop().unwrap())
        });
    });

    group.finish();
}

// ============================================================================
// Throughput benchmarks (burst send then receive)
// ============================================================================

fn bench_burst_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("spsc_burst_throughput");

    for batch_size in [100usize, 1000] {
        group.throughput(Throughput::Elements(batch_size as u64));

        group.bench_with_input(
            BenchmarkId::new("tickflow", batch_size),
            &batch_size,
            |b, &n| {
                let (mut tx, mut rx) = spsc::RingBuffer::<u64, 2048>::new();
                b.iter(|| {
                    for i in 0..n {
                        tx.push(black_box(i as u64)).unwrap();
                    }
                    for _ in 0..n {
                        black_box(rx.pop().unwrap());
                    }
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("crossbeam_array", batch_size),
            &batch_size,
            |b, &n| {
                let q = ArrayQueue::<u64>::new(2048);
                b.iter(|| {
                    for i in 0..n {
                        q.push(black_box(i as u64)).unwrap();
                    }
                    for _ in 0..n {
                        black_box(q.pop().unwrap());
                    }
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_single_thread_latency, bench_burst_throughput);
criterion_main!(benches);
