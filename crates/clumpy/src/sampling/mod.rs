//! Point sampling over a rectangular domain `[0, width) x [0, height)`.
//!
//! The only strategy is Poisson disk sampling; see [`poisson_disk`].
pub mod poisson_disk;

pub use poisson_disk::{generate, try_generate, PoissonDiskSampling, DEFAULT_MAX_ATTEMPTS};
