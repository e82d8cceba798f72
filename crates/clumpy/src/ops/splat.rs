//! Rasterising point lists into 8-bit images.
use std::fmt;
use std::str::FromStr;

use glam::Vec2;
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::raster::{texel_of, ByteImage};

/// Footprint drawn around each point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SplatKernel {
    /// Linear falloff from the centre to the kernel edge.
    Distance,
    /// Gaussian falloff, sigma of a quarter kernel size.
    Gaussian,
    /// Solid disk.
    Circle,
}

impl SplatKernel {
    /// Weight in `[0, 1]` at distance `d` from the centre of a kernel with radius `radius`.
    fn weight(self, d: f32, radius: f32) -> f32 {
        match self {
            SplatKernel::Distance => (1.0 - d / radius).max(0.0),
            SplatKernel::Gaussian => {
                if d > radius {
                    return 0.0;
                }
                let sigma = radius * 0.5;
                (-(d * d) / (2.0 * sigma * sigma)).exp()
            }
            SplatKernel::Circle => {
                if d <= radius {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }
}

impl FromStr for SplatKernel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "distance" => Ok(SplatKernel::Distance),
            "gaussian" => Ok(SplatKernel::Gaussian),
            "circle" => Ok(SplatKernel::Circle),
            other => Err(Error::InvalidInput(format!(
                "kernel type must be distance/gaussian/circle, got '{other}'"
            ))),
        }
    }
}

impl fmt::Display for SplatKernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SplatKernel::Distance => "distance",
            SplatKernel::Gaussian => "gaussian",
            SplatKernel::Circle => "circle",
        };
        f.write_str(name)
    }
}

/// Kernel configuration for [`splat_points`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SplatOptions {
    pub kernel: SplatKernel,
    /// Kernel width in pixels; must be odd.
    pub size: u32,
    /// Peak intensity in `[0, 1]`, scaled to 255.
    pub alpha: f32,
}

impl SplatOptions {
    pub fn new(kernel: SplatKernel, size: u32) -> Self {
        Self {
            kernel,
            size,
            alpha: 1.0,
        }
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.size % 2 == 0 {
            return Err(Error::InvalidInput(format!(
                "kernel size must be an odd integer, got {}",
                self.size
            )));
        }
        if !(0.0..=1.0).contains(&self.alpha) {
            return Err(Error::InvalidInput(format!(
                "alpha must be in [0, 1], got {}",
                self.alpha
            )));
        }
        Ok(())
    }
}

/// Sets the texel under each point to 255. Returns how many points landed in the image.
pub fn splat_pixels(points: &[Vec2], image: &mut ByteImage) -> usize {
    let mut drawn = 0;
    for &p in points {
        if let Some((x, y)) = texel_of(p, image.width, image.height) {
            image.pixel_mut(x, y).fill(255);
            drawn += 1;
        }
    }
    drawn
}

/// Draws every point into a new single-channel `width x height` image.
///
/// Overlapping footprints keep the brighter value. A kernel of size 1 covers exactly the
/// texel under the point.
pub fn splat_points(
    points: &[Vec2],
    width: usize,
    height: usize,
    options: &SplatOptions,
) -> Result<ByteImage> {
    options.validate()?;

    let mut image = ByteImage::new(width, height, 1);
    let half = (options.size / 2) as i64;
    let radius = options.size as f32 * 0.5;
    let peak = 255.0 * options.alpha;

    info!(
        "Drawing {} points with {} kernel of size {}.",
        points.len(),
        options.kernel,
        options.size
    );

    let mut skipped = 0usize;
    for p in points {
        if !p.is_finite() {
            skipped += 1;
            continue;
        }
        let (cx, cy) = (p.x.floor() as i64, p.y.floor() as i64);
        let mut touched = false;

        for dy in -half..=half {
            for dx in -half..=half {
                let (x, y) = (cx + dx, cy + dy);
                if x < 0 || y < 0 || x >= width as i64 || y >= height as i64 {
                    continue;
                }
                let d = ((dx * dx + dy * dy) as f32).sqrt();
                let value = (peak * options.kernel.weight(d, radius)).round() as u8;
                let texel = &mut image.pixel_mut(x as usize, y as usize)[0];
                *texel = (*texel).max(value);
                touched = true;
            }
        }

        if !touched {
            skipped += 1;
        }
    }

    if skipped > 0 {
        warn!("{} points fell outside the {}x{} image.", skipped, width, height);
    }

    Ok(image)
}
