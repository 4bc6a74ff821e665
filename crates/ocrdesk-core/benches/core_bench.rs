// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the intake gate and size-label formatting, which
// run on every file the shell offers.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use ocrdesk_core::{IntakePolicy, size_label, validate};

fn bench_validate(c: &mut Criterion) {
    let policy = IntakePolicy::default();

    c.bench_function("validate (accepted png)", |b| {
        b.iter(|| validate(black_box(&policy), black_box("image/png"), black_box(2_000_000)));
    });

    c.bench_function("validate (rejected pdf)", |b| {
        b.iter(|| {
            validate(
                black_box(&policy),
                black_box("application/pdf"),
                black_box(2_000_000),
            )
        });
    });
}

fn bench_size_label(c: &mut Criterion) {
    c.bench_function("size_label (B / KB / MB)", |b| {
        b.iter(|| {
            black_box(size_label(black_box(512.0)));
            black_box(size_label(black_box(1536.0)));
            black_box(size_label(black_box(1_572_864.0)));
        });
    });
}

criterion_group!(benches, bench_validate, bench_size_label);
criterion_main!(benches);
