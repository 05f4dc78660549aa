//! Criterion micro-benchmarks for hash map operations.

use std::hint::black_box;

use ax_bench::{keyed_map, spread_keys};
use ax_core::stuff::U64;
use ax_core::{Map, Traverse};
use ax_map::Hmap;
use criterion::{criterion_group, criterion_main, Criterion};

/// Benchmark: insert 10K distinct keys into a fresh map.
fn bench_put_10k(c: &mut Criterion) {
    let keys = spread_keys(10_000);
    c.bench_function("hmap_put_10k", |b| {
        b.iter(|| {
            let mut m = Hmap::new(U64, U64);
            for &k in &keys {
                m.put(k, k).unwrap();
            }
            black_box(m);
        });
    });
}

/// Benchmark: hit and miss lookups in a 10K map.
fn bench_find(c: &mut Criterion) {
    let m = keyed_map(10_000);
    let keys = spread_keys(20_000);
    c.bench_function("hmap_find_hit_10k", |b| {
        b.iter(|| {
            let mut sum = 0u64;
            for k in &keys[..10_000] {
                sum += m.value(black_box(k)).copied().unwrap_or(0);
            }
            black_box(sum);
        });
    });
    c.bench_function("hmap_find_miss_10k", |b| {
        b.iter(|| {
            let mut misses = 0u32;
            for k in &keys[10_000..] {
                misses += u32::from(m.find(black_box(k)) == m.end());
            }
            black_box(misses);
        });
    });
}

/// Benchmark: remove and re-insert one key in a 10K map.
fn bench_remove_put(c: &mut Criterion) {
    let mut m = keyed_map(10_000);
    let key = spread_keys(1)[0];
    c.bench_function("hmap_remove_put_10k", |b| {
        b.iter(|| {
            let v = m.remove(black_box(&key)).unwrap();
            m.put(key, v).unwrap();
        });
    });
}

criterion_group!(benches, bench_put_10k, bench_find, bench_remove_put);
criterion_main!(benches);
