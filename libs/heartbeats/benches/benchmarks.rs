//! Benchmarks for the heartbeats library
//!
//! Run with: cargo bench -p heartbeats

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use heartbeats::{rate, CallbackDispatch, HeartbeatContext, LogMode, TextSink, Window};
use std::io;
use std::sync::Arc;
use std::thread;

/// Benchmark single-threaded heartbeat issue
fn bench_heartbeat(c: &mut Criterion) {
    let mut group = c.benchmark_group("heartbeat");
    group.throughput(Throughput::Elements(1));

    for capacity in [1usize, 20, 1000] {
        group.bench_function(format!("no_sink_capacity_{}", capacity), |b| {
            let ctx = HeartbeatContext::new(capacity).unwrap();
            let mut t = 0u64;
            b.iter(|| {
                let record = ctx.heartbeat(black_box(t), 1, t, t + 1000).unwrap();
                t += 1000;
                black_box(record)
            })
        });
    }

    group.bench_function("text_sink", |b| {
        let ctx = HeartbeatContext::builder()
            .capacity(20)
            .sink(TextSink::new(io::sink()))
            .build()
            .unwrap();
        let mut t = 0u64;
        b.iter(|| {
            let record = ctx.heartbeat(t, 1, t, t + 1000).unwrap();
            t += 1000;
            black_box(record)
        })
    });

    group.bench_function("snapshot_dispatch", |b| {
        let ctx = HeartbeatContext::builder()
            .capacity(20)
            .dispatch(CallbackDispatch::Snapshot)
            .log_mode(LogMode::Off)
            .on_window_complete(|window: &Window| {
                black_box(window.totals());
            })
            .build()
            .unwrap();
        let mut t = 0u64;
        b.iter(|| {
            let record = ctx.heartbeat(t, 1, t, t + 1000).unwrap();
            t += 1000;
            black_box(record)
        })
    });

    group.finish();
}

/// Benchmark contended issue from several threads
fn bench_contended(c: &mut Criterion) {
    let mut group = c.benchmark_group("contended");
    const PER_THREAD: u64 = 1000;

    for threads in [2u64, 4, 8] {
        group.throughput(Throughput::Elements(threads * PER_THREAD));
        group.bench_function(format!("{}_threads", threads), |b| {
            b.iter(|| {
                let ctx = Arc::new(HeartbeatContext::new(64).unwrap());
                let handles: Vec<_> = (0..threads)
                    .map(|worker| {
                        let ctx = Arc::clone(&ctx);
                        thread::spawn(move || {
                            for i in 0..PER_THREAD {
                                ctx.heartbeat(worker, 1, i, i + 1).unwrap();
                            }
                        })
                    })
                    .collect();
                for handle in handles {
                    handle.join().unwrap();
                }
                black_box(ctx.windowed_rate())
            })
        });
    }

    group.finish();
}

/// Benchmark rate calculations over a full window
fn bench_rates(c: &mut Criterion) {
    let mut group = c.benchmark_group("rates");

    let ctx = HeartbeatContext::new(1000).unwrap();
    for i in 0..1000u64 {
        ctx.heartbeat(i, 1, i * 1000, (i + 1) * 1000).unwrap();
    }
    let window = ctx.snapshot();

    group.bench_function("windowed_rate_running_totals", |b| {
        b.iter(|| black_box(ctx.windowed_rate()))
    });

    group.bench_function("windowed_rate_span_scan", |b| {
        b.iter(|| black_box(rate::windowed_rate(black_box(&window))))
    });

    group.bench_function("stats", |b| b.iter(|| black_box(ctx.stats())));

    group.finish();
}

criterion_group!(benches, bench_heartbeat, bench_contended, bench_rates);
criterion_main!(benches);
