// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the per-image pipeline in the docbin-image crate:
// grayscale reduction at several worker counts and adaptive thresholding on a
// synthetic page-sized buffer.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use docbin_core::ThresholdParams;
use docbin_image::{AdaptiveThresholder, GrayscaleReducer, PixelBuffer};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// A 1240x1754 (A4 at 150 DPI) RGB page: light paper with dark text-like
/// stripes every 24 rows.
fn synthetic_page() -> PixelBuffer {
    let (width, height) = (1240u32, 1754u32);
    let mut samples = Vec::with_capacity(width as usize * height as usize * 3);
    for y in 0..height {
        for x in 0..width {
            let ink = y % 24 < 3 && x % 40 < 30;
            let value = if ink { 40 } else { 225 - ((x + y) % 16) as u8 };
            samples.extend_from_slice(&[value, value, value]);
        }
    }
    PixelBuffer::new(width, height, 3, samples).expect("fixture dimensions are consistent")
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn bench_grayscale(c: &mut Criterion) {
    let page = synthetic_page();
    let mut group = c.benchmark_group("grayscale_reduction (1240x1754)");

    for workers in [1usize, 2, 4, 8] {
        group.bench_with_input(BenchmarkId::from_parameter(workers), &workers, |b, &workers| {
            let reducer = GrayscaleReducer::new(workers);
            b.iter(|| black_box(reducer.reduce(black_box(&page)).expect("rgb input")));
        });
    }
    group.finish();
}

fn bench_threshold(c: &mut Criterion) {
    let gray = GrayscaleReducer::new(1)
        .reduce(&synthetic_page())
        .expect("rgb input");
    let thresholder = AdaptiveThresholder::new(ThresholdParams::default(), 1);

    c.bench_function("adaptive_threshold (1240x1754)", |b| {
        b.iter(|| black_box(thresholder.binarize(black_box(&gray)).expect("gray input")));
    });
}

criterion_group!(benches, bench_grayscale, bench_threshold);
criterion_main!(benches);
