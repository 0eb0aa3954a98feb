// Copyright 2025 The Doorman Authors
// SPDX-License-Identifier: Apache-2.0

//! Assignment throughput over large keys.

#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use doorman::{Doorman, Probability};

fn probs(values: &[f64]) -> Vec<Probability> {
    values.iter().copied().map(Probability::new).collect()
}

fn bench_assign_bytes(c: &mut Criterion) {
    let doorman = Doorman::new(
        "AAAAAAAAAAAAAAAAAAAAAA==",
        probs(&[0.10, 0.40, 0.40, 0.05, 0.05]),
    )
    .unwrap();
    let key: Vec<u8> = (0..1024 * 1024).map(|i| (i % 256) as u8).collect();

    let mut group = c.benchmark_group("assign");
    group.throughput(Throughput::Bytes(key.len() as u64));
    group.bench_function("assign_bytes_1mib", |b| {
        b.iter(|| doorman.assign_bytes(&[black_box(key.as_slice())]));
    });
    group.finish();
}

criterion_group!(benches, bench_assign_bytes);
criterion_main!(benches);
