//! Benchmarks for the TinyLFU admission policy
//!
//! Measures the record + admit cycle the enclosing cache pays on every miss,
//! with and without the doorkeeper in front of the counters.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use tinylfu_sketch::TinyLfu;

fn generate_keys(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("key_{}", i % 500)).collect()
}

fn bench_record(c: &mut Criterion) {
    let mut group = c.benchmark_group("admission_record");
    let keys = generate_keys(10_000);

    group.throughput(Throughput::Elements(10_000));

    group.bench_function("TinyLfu", |b| {
        b.iter(|| {
            let mut policy = TinyLfu::new(4, 4096, 1, 40_960).unwrap();
            for key in &keys {
                policy.record(black_box(key));
            }
            policy
        })
    });

    group.bench_function("TinyLfu+doorkeeper", |b| {
        b.iter(|| {
            let mut policy = TinyLfu::new(4, 4096, 1, 40_960).unwrap().with_doorkeeper(4096);
            for key in &keys {
                policy.record(black_box(key));
            }
            policy
        })
    });

    group.finish();
}

fn bench_admit(c: &mut Criterion) {
    let mut group = c.benchmark_group("admission_admit");
    let keys = generate_keys(10_000);

    let mut policy = TinyLfu::new(4, 4096, 1, 40_960).unwrap();
    for key in &keys {
        policy.record(key);
    }

    group.throughput(Throughput::Elements(1000));

    group.bench_function("admit", |b| {
        b.iter(|| {
            let mut admitted = 0usize;
            for pair in keys.chunks(2).take(1000) {
                if policy.admit(black_box(&pair[0]), black_box(&pair[1])) {
                    admitted += 1;
                }
            }
            admitted
        })
    });

    group.bench_function("admit_with_jitter", |b| {
        b.iter(|| {
            let mut admitted = 0usize;
            for pair in keys.chunks(2).take(1000) {
                if policy.admit_with_jitter(black_box(&pair[0]), black_box(&pair[1])) {
                    admitted += 1;
                }
            }
            admitted
        })
    });

    group.finish();
}

criterion_group!(benches, bench_record, bench_admit);
criterion_main!(benches);
