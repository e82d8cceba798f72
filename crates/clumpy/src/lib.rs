#![forbid(unsafe_code)]
//! clumpy: point-cloud and image-array generation for plotting companions.
//!
//! Modules:
//! - sampling: Poisson disk (Bridson) point sampling with an acceleration grid
//! - rng: counter-based hash generator giving seed-reproducible draws
//! - array: `.npy` reading and writing
//! - raster: typed point-list and image views over arrays
//! - noise: gradient noise with analytic derivatives
//! - ops: culling, splatting, curl, advection, SDF preview
//!
//! Every operation is a pure transformation of its inputs; no state survives a call.
pub mod array;
pub mod error;
pub mod noise;
pub mod ops;
pub mod raster;
pub mod rng;
pub mod sampling;

/// Convenient re-exports for common types. Import with `use clumpy::prelude::*;`.
pub mod prelude {
    pub use crate::array::{ArrayData, NpyArray};
    pub use crate::error::{Error, Result};
    pub use crate::noise::{NoiseTable, Viewport};
    pub use crate::ops::{
        advect_points, cull_points, curl_2d, splat_pixels, splat_points, visualize_sdf,
        AdvectOptions, CullOutcome, CurlRange, SdfColorMode, SplatKernel, SplatOptions,
    };
    pub use crate::raster::{
        points_from_array, points_to_array, ByteImage, ScalarImage, VectorImage,
    };
    pub use crate::rng::{randhash, HashRng};
    pub use crate::sampling::{PoissonDiskSampling, DEFAULT_MAX_ATTEMPTS};
}
