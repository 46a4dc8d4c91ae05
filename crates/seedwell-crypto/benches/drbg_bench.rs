//! Generator throughput benchmarks.
//!
//! Run with: cargo bench -p seedwell-crypto

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use seedwell_crypto::random::FactoryConfig;
use seedwell_crypto::{RandomFactory, RandomSpec, RandomSpecBuilder, SoftwareProvider};
use seedwell_types::{DigestLength, DigestSpec, KeyLength, SymKeySpec};
use std::sync::Arc;

fn factory() -> RandomFactory {
    let config = FactoryConfig {
        health_tested_entropy: false,
        ..FactoryConfig::default()
    };
    RandomFactory::with_config(Arc::new(SoftwareProvider), config)
}

fn bench_specs() -> Vec<RandomSpec> {
    vec![
        RandomSpecBuilder::hash(DigestSpec::sha2(DigestLength::Len256)),
        RandomSpecBuilder::hash(DigestSpec::sha2(DigestLength::Len512)),
        RandomSpecBuilder::hmac(DigestSpec::sha2(DigestLength::Len256)),
        RandomSpecBuilder::ctr(SymKeySpec::aes(KeyLength::Len256)),
        RandomSpecBuilder::x931(SymKeySpec::aes(KeyLength::Len128)),
    ]
}

fn bench_generate(c: &mut Criterion) {
    let factory = factory();
    let mut group = c.benchmark_group("generate");

    for spec in bench_specs() {
        let mut rng = factory.create_random(&spec).unwrap();
        for size in [32usize, 4096] {
            group.throughput(Throughput::Bytes(size as u64));
            let mut buf = vec![0u8; size];
            group.bench_with_input(BenchmarkId::new(spec.name(), size), &size, |b, _| {
                b.iter(|| rng.fill_bytes(&mut buf).unwrap());
            });
        }
    }

    group.finish();
}

fn bench_prediction_resistance(c: &mut Criterion) {
    let factory = factory();
    let mut group = c.benchmark_group("prediction-resistant");

    let spec = RandomSpecBuilder::hash_resist(DigestSpec::sha2(DigestLength::Len256));
    let mut rng = factory.create_random(&spec).unwrap();
    let mut buf = [0u8; 32];
    group.bench_function(spec.name(), |b| {
        b.iter(|| rng.fill_bytes(&mut buf).unwrap());
    });

    group.finish();
}

fn bench_instantiate(c: &mut Criterion) {
    let factory = factory();
    let mut group = c.benchmark_group("instantiate");

    for spec in bench_specs() {
        group.bench_function(spec.name(), |b| {
            b.iter(|| factory.create_random(&spec).unwrap());
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_generate,
    bench_prediction_resistance,
    bench_instantiate
);
criterion_main!(benches);
