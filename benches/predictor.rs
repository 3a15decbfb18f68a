//! Predictor throughput benchmarks.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use paqhp::{Encoder, Predictor};

fn sample_text(n: usize) -> Vec<u8> {
    b"the cat sat on the mat. the quick brown fox jumps over the lazy dog. "
        .iter().cycle().take(n).cloned().collect()
}

fn bench_predictor(c: &mut Criterion) {
    let data = sample_text(64 * 1024);
    let mut group = c.benchmark_group("predictor");
    group.throughput(Throughput::Bytes(data.len() as u64));
    group.sample_size(10);
    group.bench_function("update_64k_text", |b| {
        b.iter(|| {
            let mut p = Predictor::new(2);
            for &byte in data.iter() {
                for i in (0..8).rev() {
                    black_box(p.p());
                    p.update(((byte >> i) & 1) as i32);
                }
            }
        })
    });
    group.finish();
}

fn bench_encoder(c: &mut Criterion) {
    let data = sample_text(64 * 1024);
    let mut group = c.benchmark_group("encoder");
    group.throughput(Throughput::Bytes(data.len() as u64));
    group.sample_size(10);
    group.bench_function("compress_64k_text", |b| {
        b.iter(|| {
            black_box(Encoder::new(2).encode(&data))
        })
    });
    group.finish();
}

criterion_group!(benches, bench_predictor, bench_encoder);
criterion_main!(benches);
