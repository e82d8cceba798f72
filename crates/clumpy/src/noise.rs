//! Gradient noise with analytic derivatives.
//!
//! A [`NoiseTable`] holds the permutation and gradient tables for one seed. It is built once
//! per invocation and passed by reference, so independent renders never share state.
use std::f32::consts::TAU;
use std::fmt;
use std::str::FromStr;

use glam::{IVec2, Vec2, Vec3};
use tracing::info;

use crate::error::{Error, Result};
use crate::raster::ScalarImage;
use crate::rng::HashRng;

const TABLE_SIZE: usize = 256;
const TABLE_MASK: i32 = TABLE_SIZE as i32 - 1;

/// Permutation and unit-gradient tables.
#[derive(Clone)]
pub struct NoiseTable {
    perm: [u8; TABLE_SIZE],
    grad: [Vec2; TABLE_SIZE],
}

impl fmt::Debug for NoiseTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NoiseTable")
            .field("perm", &&self.perm[..8])
            .finish_non_exhaustive()
    }
}

impl NoiseTable {
    /// Shuffles the permutation with the counter hash stream starting at `seed`.
    pub fn new(seed: u32) -> Self {
        let mut perm = [0u8; TABLE_SIZE];
        for (i, p) in perm.iter_mut().enumerate() {
            *p = i as u8;
        }

        let mut rng = HashRng::new(seed);
        for i in (1..TABLE_SIZE).rev() {
            let j = (rng.next_f32_in(0.0, (i + 1) as f32) as usize).min(i);
            perm.swap(i, j);
        }

        let mut grad = [Vec2::ZERO; TABLE_SIZE];
        for (i, g) in grad.iter_mut().enumerate() {
            let theta = TAU * i as f32 / TABLE_SIZE as f32;
            *g = Vec2::new(theta.cos(), theta.sin());
        }

        Self { perm, grad }
    }

    #[inline]
    fn gradient(&self, v: IVec2) -> Vec2 {
        let inner = self.perm[(v.x & TABLE_MASK) as usize] as i32;
        let hash = self.perm[(inner.wrapping_add(v.y) & TABLE_MASK) as usize];
        self.grad[hash as usize]
    }

    /// Noise value in `.x` and its partial derivatives in `.yz`.
    ///
    /// `seed` shifts the lattice, so one table yields several decorrelated layers. Values
    /// stay well inside `[-1, 1]`; lattice points are always zero.
    pub fn gradient_noise(&self, p: Vec2, seed: i32) -> Vec3 {
        let cell = p.floor();
        // Only the low bits survive the table mask, so lattice coordinates wrap.
        let i = cell.as_ivec2().wrapping_add(IVec2::splat(seed));
        let f = p - cell;

        // quintic fade
        let u = f * f * f * (f * (f * 6.0 - 15.0) + 10.0);
        let du = 30.0 * f * f * (f * (f - 2.0) + 1.0);

        let ga = self.gradient(i);
        let gb = self.gradient(i.wrapping_add(IVec2::new(1, 0)));
        let gc = self.gradient(i.wrapping_add(IVec2::new(0, 1)));
        let gd = self.gradient(i.wrapping_add(IVec2::new(1, 1)));

        let va = ga.dot(f);
        let vb = gb.dot(f - Vec2::new(1.0, 0.0));
        let vc = gc.dot(f - Vec2::new(0.0, 1.0));
        let vd = gd.dot(f - Vec2::new(1.0, 1.0));

        let k = va - vb - vc + vd;
        let value = va + u.x * (vb - va) + u.y * (vc - va) + u.x * u.y * k;
        let derivatives = ga
            + u.x * (gb - ga)
            + u.y * (gc - ga)
            + u.x * u.y * (ga - gb - gc + gd)
            + du * (Vec2::new(u.y, u.x) * k + Vec2::new(vb, vc) - va);

        Vec3::new(value, derivatives.x, derivatives.y)
    }
}

/// Rectangle of noise space mapped onto the output image, `left,bottom,right,top`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Viewport {
    pub left: f32,
    pub bottom: f32,
    pub right: f32,
    pub top: f32,
}

impl Viewport {
    pub fn new(left: f32, bottom: f32, right: f32, top: f32) -> Self {
        Self {
            left,
            bottom,
            right,
            top,
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(-1.0, -1.0, 1.0, 1.0)
    }
}

impl FromStr for Viewport {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let values = s
            .split(',')
            .map(|v| v.trim().parse::<f32>())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| Error::InvalidInput(format!("bad viewport '{s}': {e}")))?;
        match values[..] {
            [left, bottom, right, top] => Ok(Self::new(left, bottom, right, top)),
            _ => Err(Error::InvalidInput(format!(
                "viewport needs four comma-separated numbers, got '{s}'"
            ))),
        }
    }
}

/// Renders one octave of gradient noise at `frequency` into a `width x height` image.
///
/// Pixel centres are sampled; row 0 is the top edge of the viewport.
pub fn render(
    width: usize,
    height: usize,
    viewport: &Viewport,
    frequency: f32,
    seed: i32,
) -> ScalarImage {
    info!(
        "gradient_noise {}x{} [{},{},{},{}] {} {}",
        width,
        height,
        viewport.left,
        viewport.bottom,
        viewport.right,
        viewport.top,
        frequency,
        seed
    );

    let table = NoiseTable::new(seed as u32);
    let mut image = ScalarImage::new(width, height);

    let dx = (viewport.right - viewport.left) / width as f32;
    let dy = (viewport.top - viewport.bottom) / height as f32;
    let sx = viewport.left + dx * 0.5;
    let sy = viewport.top - dy * 0.5;

    for (row, line) in image.pixels.chunks_exact_mut(width.max(1)).enumerate() {
        let y = sy - row as f32 * dy;
        for (col, texel) in line.iter_mut().enumerate() {
            let x = sx + col as f32 * dx;
            *texel += table.gradient_noise(Vec2::new(x, y) * frequency, seed).x;
        }
    }

    image
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permutation_is_a_shuffle() {
        let table = NoiseTable::new(42);
        let mut seen = [false; TABLE_SIZE];
        for &p in &table.perm {
            seen[p as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
        assert_ne!(table.perm, NoiseTable::new(43).perm);
        assert_eq!(table.perm, NoiseTable::new(42).perm);
    }

    #[test]
    fn gradients_are_unit_length() {
        let table = NoiseTable::new(0);
        for g in &table.grad {
            assert!((g.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn lattice_points_are_zero() {
        let table = NoiseTable::new(7);
        for (x, y) in [(0.0, 0.0), (3.0, -2.0), (-5.0, 11.0)] {
            assert_eq!(table.gradient_noise(Vec2::new(x, y), 3).x, 0.0);
        }
    }

    #[test]
    fn values_stay_in_unit_range() {
        let table = NoiseTable::new(1);
        for i in 0..400 {
            let p = Vec2::new(i as f32 * 0.173, i as f32 * -0.091);
            let v = table.gradient_noise(p, 0).x;
            assert!((-1.0..=1.0).contains(&v), "{v}");
        }
    }

    #[test]
    fn derivatives_match_finite_differences() {
        let table = NoiseTable::new(9);
        let h = 1e-3;
        for p in [Vec2::new(0.3, 0.4), Vec2::new(2.6, -1.25), Vec2::new(-3.7, 5.55)] {
            let n = table.gradient_noise(p, 0);
            let ddx = (table.gradient_noise(p + Vec2::new(h, 0.0), 0).x
                - table.gradient_noise(p - Vec2::new(h, 0.0), 0).x)
                / (2.0 * h);
            let ddy = (table.gradient_noise(p + Vec2::new(0.0, h), 0).x
                - table.gradient_noise(p - Vec2::new(0.0, h), 0).x)
                / (2.0 * h);
            assert!((n.y - ddx).abs() < 1e-2, "d/dx {} vs {}", n.y, ddx);
            assert!((n.z - ddy).abs() < 1e-2, "d/dy {} vs {}", n.z, ddy);
        }
    }

    #[test]
    fn extreme_seeds_wrap_the_lattice() {
        for seed in [i32::MAX, i32::MIN, -1] {
            let image = render(4, 4, &Viewport::default(), 3.0, seed);
            assert!(image.pixels.iter().all(|v| v.is_finite() && (-1.0..=1.0).contains(v)));
        }

        // Seeds 256 apart select the same table cells.
        let table = NoiseTable::new(0);
        let p = Vec2::new(0.37, -1.62);
        assert_eq!(
            table.gradient_noise(p, i32::MAX),
            table.gradient_noise(p, i32::MAX - 256)
        );
        assert_eq!(
            table.gradient_noise(p, i32::MIN),
            table.gradient_noise(p, i32::MIN + 256)
        );
    }

    #[test]
    fn viewport_parses_four_numbers() {
        let vp: Viewport = "-1.0,-1.0,+1.0,+1.0".parse().unwrap();
        assert_eq!(vp, Viewport::default());
        assert!("1,2,3".parse::<Viewport>().is_err());
        assert!("a,b,c,d".parse::<Viewport>().is_err());
    }

    #[test]
    fn render_is_deterministic_and_sized() {
        let a = render(16, 8, &Viewport::default(), 3.0, 42);
        let b = render(16, 8, &Viewport::default(), 3.0, 42);
        assert_eq!((a.width, a.height), (16, 8));
        assert_eq!(a.pixels.len(), 128);
        assert_eq!(a, b);
        assert!(a.pixels.iter().any(|&v| v != 0.0));
    }
}
