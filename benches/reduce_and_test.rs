//! Reduction and significance test benchmark
//!
//! Measures the per-series cost of outlier trimming, the two delta tests and
//! full report assembly for a typical two-configuration run.
//!
//! # Run Instructions
//!
//! ```bash
//! cargo bench --bench reduce_and_test
//! ```

use benchdelta::collection::Collection;
use benchdelta::config::CompareConfig;
use benchdelta::delta::{mann_whitney_u_test, welch_t_test};
use benchdelta::metric::reduce;
use benchdelta::table::assemble;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

/// Deterministic noisy samples around `base` with one slow outlier
fn samples(base: f64, n: usize) -> Vec<f64> {
    let mut values: Vec<f64> = (0..n)
        .map(|i| base + ((i * 37) % 17) as f64 - 8.0)
        .collect();
    if n > 2 {
        values[n / 2] = base * 3.0;
    }
    values
}

fn log(base: u64, benchmarks: usize, runs: usize) -> String {
    let mut text = String::new();
    for run in 0..runs {
        for b in 0..benchmarks {
            let ns = base + (b as u64) * 100 + ((run * 37) % 17) as u64;
            text.push_str(&format!("BenchmarkCase{} 1000 {} ns/op 12 B/op\n", b, ns));
        }
    }
    text
}

fn bench_reduce(c: &mut Criterion) {
    let mut group = c.benchmark_group("reduce");

    for n in [5, 20, 100, 1000] {
        let values = samples(1000.0, n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &values, |b, values| {
            b.iter(|| black_box(reduce(black_box(values))));
        });
    }

    group.finish();
}

/// Exact distribution below 50 combined samples, normal approximation above
fn bench_mann_whitney(c: &mut Criterion) {
    let mut group = c.benchmark_group("mann_whitney_u_test");

    for n in [5, 20, 25, 100] {
        let old = samples(1000.0, n);
        let new = samples(990.0, n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| black_box(mann_whitney_u_test(black_box(&old), black_box(&new))));
        });
    }

    group.finish();
}

fn bench_welch(c: &mut Criterion) {
    let old = samples(13_600_000.0, 20);
    let new = samples(11_800_000.0, 20);

    c.bench_function("welch_t_test", |b| {
        b.iter(|| black_box(welch_t_test(black_box(&old), black_box(&new))));
    });
}

fn bench_assemble(c: &mut Criterion) {
    let mut collection = Collection::new();
    collection.ingest("old", &log(10_000, 50, 10));
    collection.ingest("new", &log(9_500, 50, 10));
    collection.finalize();
    let config = CompareConfig {
        geomean: true,
        ..CompareConfig::default()
    };

    c.bench_function("assemble_50x10", |b| {
        b.iter(|| black_box(assemble(black_box(&collection), &config)));
    });
}

criterion_group!(
    benches,
    bench_reduce,
    bench_mann_whitney,
    bench_welch,
    bench_assemble
);
criterion_main!(benches);
