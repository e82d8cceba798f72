//! Per-command array kernels: each is a stateless transformation of images and point lists.
pub mod advect;
pub mod cull;
pub mod curl;
pub mod sdf;
pub mod splat;

pub use advect::{advect_points, AdvectOptions};
pub use cull::{cull_points, CullOutcome};
pub use curl::{curl_2d, CurlRange};
pub use sdf::{visualize_sdf, SdfColorMode};
pub use splat::{splat_pixels, splat_points, SplatKernel, SplatOptions};
