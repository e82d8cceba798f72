use std::time::Duration;

use clumpy::rng::HashRng;
use clumpy::sampling::PoissonDiskSampling;
use criterion::measurement::WallTime;
use criterion::{BenchmarkGroup, Criterion, Throughput};
use glam::Vec2;

/// Square domain shared by the radius sweeps.
pub const EXTENT: Vec2 = Vec2::new(1024.0, 1024.0);

/// Radii from sparse to dense; each halving roughly quadruples the sample count.
pub const RADII: [f32; 6] = [64.0, 32.0, 16.0, 8.0, 4.0, 2.0];

/// Short runs: the densest sweep still finishes in a few seconds per radius.
pub fn sampler_criterion() -> Criterion {
    Criterion::default()
        .configure_from_args()
        .sample_size(20)
        .warm_up_time(Duration::from_millis(500))
        .measurement_time(Duration::from_secs(3))
}

/// Sets the group throughput to the number of samples `sampling` accepts over `extent`.
pub fn expect_samples(
    group: &mut BenchmarkGroup<'_, WallTime>,
    sampling: &PoissonDiskSampling,
    extent: Vec2,
) {
    let accepted = sampling.generate(extent, &mut HashRng::new(0)).len();
    group.throughput(Throughput::Elements(accepted.max(1) as u64));
}
