mod common;

use std::hint::black_box;

use clumpy::rng::HashRng;
use clumpy::sampling::PoissonDiskSampling;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn poisson_hash_rng_benches(c: &mut Criterion) {
    let extent = common::EXTENT;
    let mut group = c.benchmark_group("sampling/poisson_disk/hash_rng");

    for &radius in &common::RADII {
        let sampling = PoissonDiskSampling::new(radius);
        common::expect_samples(&mut group, &sampling, extent);

        group.bench_with_input(BenchmarkId::from_parameter(radius), &radius, |b, _| {
            b.iter(|| {
                let pts = sampling.generate(black_box(extent), &mut HashRng::new(987));
                black_box(pts.len());
            });
        });
    }

    group.finish();
}

fn poisson_std_rng_benches(c: &mut Criterion) {
    let extent = common::EXTENT;
    let mut group = c.benchmark_group("sampling/poisson_disk/std_rng");

    for &radius in &common::RADII {
        let sampling = PoissonDiskSampling::new(radius);
        common::expect_samples(&mut group, &sampling, extent);

        let mut rng = StdRng::seed_from_u64(0xC0FFEEu64 ^ (radius as u64));
        group.bench_with_input(BenchmarkId::from_parameter(radius), &radius, |b, _| {
            b.iter(|| {
                let pts = sampling.generate(black_box(extent), &mut rng);
                black_box(pts.len());
            });
        });
    }

    group.finish();
}

fn poisson_aspect_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("sampling/poisson_disk/aspect");

    for (w, h) in [(500.0, 250.0), (2048.0, 64.0), (64.0, 2048.0)] {
        let extent = Vec2::new(w, h);
        let sampling = PoissonDiskSampling::new(4.0);
        common::expect_samples(&mut group, &sampling, extent);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{w}x{h}")),
            &extent,
            |b, &extent| {
                b.iter(|| black_box(sampling.generate(extent, &mut HashRng::new(1)).len()));
            },
        );
    }

    group.finish();
}

criterion_group! {
    name = benches;
    config = common::sampler_criterion();
    targets = poisson_hash_rng_benches, poisson_std_rng_benches, poisson_aspect_benches
}
criterion_main!(benches);
