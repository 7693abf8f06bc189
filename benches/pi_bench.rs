//! Criterion benchmarks for the counting engines.
//!
//! Run with `cargo bench`. The interesting comparisons are the engine
//! families against each other at the same x, and the φ cache hit rate
//! (phi with a warm per-call cache vs. the tiny closed form).

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use primepi::{phi, pi_with, Algorithm};

fn bench_pi_engines(c: &mut Criterion) {
    let mut group = c.benchmark_group("pi_1e8");
    for (name, alg) in [
        ("lmo", Algorithm::Lmo),
        ("deleglise_rivat", Algorithm::DelegliseRivat2),
        ("gourdon", Algorithm::Gourdon),
    ] {
        group.bench_function(name, |b| {
            b.iter(|| pi_with(alg, black_box(100_000_000), 1))
        });
    }
    group.finish();
}

fn bench_phi(c: &mut Criterion) {
    c.bench_function("phi_1e10_a1000", |b| {
        b.iter(|| phi(black_box(10_000_000_000), 1000, 1))
    });
}

criterion_group!(benches, bench_pi_engines, bench_phi);
criterion_main!(benches);
