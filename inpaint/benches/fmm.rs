//! Benchmarks for fast marching inpainting.
//! Run with: cargo bench -p inpaint --bench fmm

use std::hint::black_box;

use common::Buffer2;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use inpaint::{inpaint, inpaint_batch, InpaintConfig, InpaintJob};

fn pattern(size: usize) -> Buffer2<f32> {
    Buffer2::from_fn(size, size, |x, y| ((x * 7 + y * 13) % 256) as f32)
}

fn disc(size: usize) -> Buffer2<bool> {
    let center = size as f64 * 0.5;
    let radius = size as f64 * 0.25;
    Buffer2::from_fn(size, size, |x, y| {
        let dx = x as f64 - center;
        let dy = y as f64 - center;
        dx * dx + dy * dy <= radius * radius
    })
}

fn bench_inpaint(c: &mut Criterion) {
    let mut group = c.benchmark_group("inpaint_disc");
    group.sample_size(20);

    for size in [64, 128, 256] {
        let image = pattern(size);
        let mask = disc(size);
        let masked = mask.iter().filter(|&&m| m).count();

        group.throughput(Throughput::Elements(masked as u64));
        for radius in [1, 5] {
            let config = InpaintConfig::default().with_radius(radius);
            group.bench_with_input(
                BenchmarkId::new(format!("radius_{}", radius), format!("{}x{}", size, size)),
                &(&image, &mask),
                |b, (image, mask)| {
                    b.iter(|| black_box(inpaint(black_box(image), black_box(mask), &config)));
                },
            );
        }
    }

    group.finish();
}

fn bench_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("inpaint_batch");
    group.sample_size(10);

    let jobs: Vec<InpaintJob> = (0..8)
        .map(|_| InpaintJob::new(pattern(128), disc(128)))
        .collect();
    let config = InpaintConfig::default();

    group.bench_function("8x128x128", |b| {
        b.iter(|| black_box(inpaint_batch(black_box(&jobs), &config)));
    });

    group.finish();
}

criterion_group!(benches, bench_inpaint, bench_batch);
criterion_main!(benches);
