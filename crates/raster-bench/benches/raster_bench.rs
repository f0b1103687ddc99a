//! Benchmarks for raster operations.
//!
//! Run with: `cargo bench`

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::{rngs::StdRng, SeedableRng};
use std::hint::black_box;

use raster_core::{ImageBuffer, Rgba8, SamplingMethod};
use raster_ops::{adjust, dither, filter, transform};

fn test_image(size: u32) -> ImageBuffer {
    let mut img = ImageBuffer::new(size, size);
    for y in 0..size {
        for x in 0..size {
            let r = (x * 255 / size) as u8;
            let g = (y * 255 / size) as u8;
            img.set_pixel(x, y, Rgba8::new(r, g, r ^ g, 255));
        }
    }
    img
}

/// Benchmark per-pixel adjustments.
fn bench_adjust(c: &mut Criterion) {
    let mut group = c.benchmark_group("adjust");
    let img = test_image(256);
    group.throughput(Throughput::Elements(img.pixel_count() as u64));

    group.bench_function("contrast", |b| {
        b.iter(|| {
            let mut work = img.clone();
            adjust::change_contrast(&mut work, black_box(1.4));
            work
        })
    });

    group.bench_function("saturation", |b| {
        b.iter(|| {
            let mut work = img.clone();
            adjust::change_saturation(&mut work, black_box(0.3));
            work
        })
    });

    group.finish();
}

/// Benchmark the three dithering algorithms.
fn bench_dither(c: &mut Criterion) {
    let mut group = c.benchmark_group("dither");
    let img = test_image(256);
    group.throughput(Throughput::Elements(img.pixel_count() as u64));

    for nbits in [1u32, 4] {
        group.bench_with_input(BenchmarkId::new("random", nbits), &nbits, |b, &n| {
            let mut rng = StdRng::seed_from_u64(0);
            b.iter(|| {
                let mut work = img.clone();
                dither::random_dither(&mut work, n, &mut rng).unwrap();
                work
            })
        });

        group.bench_with_input(BenchmarkId::new("ordered", nbits), &nbits, |b, &n| {
            b.iter(|| {
                let mut work = img.clone();
                dither::ordered_dither(&mut work, n).unwrap();
                work
            })
        });

        group.bench_with_input(BenchmarkId::new("floyd_steinberg", nbits), &nbits, |b, &n| {
            b.iter(|| {
                let mut work = img.clone();
                dither::floyd_steinberg_dither(&mut work, n).unwrap();
                work
            })
        });
    }

    group.finish();
}

/// Benchmark convolution at increasing kernel sizes.
fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter");
    let img = test_image(128);
    group.throughput(Throughput::Elements(img.pixel_count() as u64));

    for n in [3usize, 5, 9] {
        group.bench_with_input(BenchmarkId::new("blur", n), &n, |b, &n| {
            b.iter(|| filter::blur(black_box(&img), n).unwrap())
        });
    }

    group.bench_function("edge_detect", |b| {
        b.iter(|| filter::edge_detect(black_box(&img)))
    });

    group.finish();
}

/// Benchmark resampling with each sampling method.
fn bench_resample(c: &mut Criterion) {
    let mut group = c.benchmark_group("resample");
    let base = test_image(128);

    for method in SamplingMethod::ALL {
        let img = base.clone().with_sampling_method(method);

        group.bench_with_input(BenchmarkId::new("scale_2x", method), &img, |b, img| {
            b.iter(|| transform::scale(black_box(img), 2.0, 2.0).unwrap())
        });

        group.bench_with_input(BenchmarkId::new("rotate", method), &img, |b, img| {
            b.iter(|| transform::rotate(black_box(img), 0.5, 128, 128).unwrap())
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_adjust,
    bench_dither,
    bench_filter,
    bench_resample,
);

criterion_main!(benches);
