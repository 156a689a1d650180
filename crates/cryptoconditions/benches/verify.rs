//! Decode and verify benchmarks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use cryptoconditions::{read_fulfillment, Verifier};
use cryptoconditions_testkit::fixtures;
use cryptoconditions_testkit::vectors::all_vectors;

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");
    for v in all_vectors() {
        let bytes = v.fulfillment_bytes().unwrap_or_default();
        group.bench_with_input(BenchmarkId::from_parameter(&v.name), &bytes, |b, bytes| {
            b.iter(|| read_fulfillment(black_box(bytes)))
        });
    }
    group.finish();
}

fn bench_verify(c: &mut Criterion) {
    let verifier = Verifier::default();
    let mut group = c.benchmark_group("verify");

    let cases = [
        ("ed25519", fixtures::ed25519(0x42, b"hello"), b"hello".to_vec()),
        ("rsa_2048", fixtures::rsa(b"hello rsa"), b"hello rsa".to_vec()),
        ("prefix_ying_yang", fixtures::ying_yang(), b"Yang".to_vec()),
        ("threshold_two_of_three", fixtures::two_of_three(), b"Yang".to_vec()),
    ];
    for (name, fulfillment, message) in cases {
        let condition = fulfillment.condition().clone();
        group.bench_function(name, |b| {
            b.iter(|| verifier.verify(black_box(&fulfillment), &condition, black_box(&message)))
        });
    }
    group.finish();
}

fn bench_verify_encoded(c: &mut Criterion) {
    let verifier = Verifier::default();
    let fulfillment = fixtures::two_of_three();
    let encoded = fulfillment.to_bytes();
    let condition = fulfillment.condition().to_bytes();

    c.bench_function("verify_encoded/threshold_two_of_three", |b| {
        b.iter(|| verifier.verify_encoded(black_box(&encoded), black_box(&condition), b"Yang"))
    });
}

criterion_group!(benches, bench_decode, bench_verify, bench_verify_encoded);
criterion_main!(benches);
