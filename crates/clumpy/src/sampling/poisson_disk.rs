//! Poisson disk position sampling (Bridson's algorithm).
//!
//! Generates a maximal set of points in `[0, width) x [0, height)` such that no two points
//! are closer than `radius`. Candidates are drawn from the annulus `[radius, 2 * radius]`
//! around a random active sample; a uniform grid with cells of `radius / sqrt(2)` limits
//! the distance checks to nearby samples.
//!
//! With a [`HashRng`] the output is a pure function of `(width, height, radius, seed)`.
//! Draws happen in a fixed order: the seed point's `x` then `y`, then for every outer
//! iteration one active-list pick followed by `(x, y)` pairs for the annulus attempts.
use std::f32::consts::SQRT_2;

use glam::Vec2;
use rand::RngCore;
use tracing::debug;

use crate::error::{Error, Result};
use crate::rng::{scaled_draw, HashRng, RSCALE};

/// Proposals tried around an active sample before it is retired.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 30;

/// Poisson disk sampling strategy.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PoissonDiskSampling {
    /// Minimum distance between samples in domain units.
    pub radius: f32,
    /// Annulus proposals per active sample before it is removed from the active list.
    pub max_attempts: u32,
}

impl PoissonDiskSampling {
    /// Create a new PoissonDiskSampling with specified radius and 30 attempts per sample.
    pub fn new(radius: f32) -> Self {
        Self {
            radius,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Sets the number of attempts per active sample.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Checks the preconditions of [`generate`](Self::generate) for the given domain.
    pub fn validate(&self, extent: Vec2) -> Result<()> {
        if !(extent.x.is_finite() && extent.y.is_finite() && extent.x > 0.0 && extent.y > 0.0) {
            return Err(Error::InvalidInput(format!(
                "domain must be finite and > 0 in both dimensions, got {}x{}",
                extent.x, extent.y
            )));
        }
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(Error::InvalidInput(format!(
                "minimum radius must be finite and > 0, got {}",
                self.radius
            )));
        }
        if self.max_attempts == 0 {
            return Err(Error::InvalidInput("max_attempts must be > 0".into()));
        }
        Ok(())
    }

    /// Upper bound on the number of samples for `extent`: one per acceleration grid cell.
    pub fn capacity(&self, extent: Vec2) -> usize {
        let (cols, rows, _) = AccelerationGrid::dimensions(self.radius, extent);
        cols * rows
    }

    /// Generates samples in `[0, extent.x) x [0, extent.y)`, in acceptance order.
    ///
    /// Never fails; invalid parameters (see [`validate`](Self::validate)) yield no samples.
    pub fn generate(&self, extent: Vec2, rng: &mut dyn RngCore) -> Vec<Vec2> {
        if self.validate(extent).is_err() {
            return Vec::new();
        }

        PoissonDiskSampler::new(self.radius, extent, self.max_attempts).run(rng)
    }
}

/// Generates Poisson disk samples for `width x height` with the counter hash stream
/// starting at `seed`.
///
/// Callers are responsible for passing positive, finite arguments; see [`try_generate`].
pub fn generate(width: f32, height: f32, min_radius: f32, seed: u32) -> Vec<Vec2> {
    let mut rng = HashRng::new(seed);
    PoissonDiskSampling::new(min_radius).generate(Vec2::new(width, height), &mut rng)
}

/// Like [`generate`], but rejects non-positive or non-finite arguments up front.
pub fn try_generate(width: f32, height: f32, min_radius: f32, seed: u32) -> Result<Vec<Vec2>> {
    let sampling = PoissonDiskSampling::new(min_radius);
    let extent = Vec2::new(width, height);
    sampling.validate(extent)?;
    Ok(sampling.generate(extent, &mut HashRng::new(seed)))
}

/// Uniform grid mapping each cell to the index of the sample inside it.
///
/// Cells are `radius / sqrt(2)` wide, so a cell's diagonal equals the separation radius
/// and no cell can ever hold two accepted samples.
struct AccelerationGrid {
    cols: usize,
    rows: usize,
    inv_cell: f32,
    cells: Vec<Option<usize>>,
}

impl AccelerationGrid {
    fn dimensions(radius: f32, extent: Vec2) -> (usize, usize, f32) {
        let cell_size = radius / SQRT_2;
        let inv_cell = 1.0 / cell_size;
        let cols = ((extent.x * inv_cell).ceil() as usize).max(1);
        let rows = ((extent.y * inv_cell).ceil() as usize).max(1);
        (cols, rows, inv_cell)
    }

    fn new(radius: f32, extent: Vec2) -> Self {
        let (cols, rows, inv_cell) = Self::dimensions(radius, extent);

        Self {
            cols,
            rows,
            inv_cell,
            cells: vec![None; cols * rows],
        }
    }

    #[inline]
    fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    fn col(&self, x: f32) -> usize {
        ((x * self.inv_cell) as usize).min(self.cols - 1)
    }

    #[inline]
    fn row(&self, y: f32) -> usize {
        ((y * self.inv_cell) as usize).min(self.rows - 1)
    }

    fn insert(&mut self, p: Vec2, index: usize) {
        let idx = self.row(p.y) * self.cols + self.col(p.x);
        self.cells[idx] = Some(index);
    }

    /// Sample indices in the cells overlapping the box `p +- radius`, clamped to the grid.
    fn neighbours(&self, p: Vec2, radius: f32) -> impl Iterator<Item = usize> + '_ {
        let (c0, c1) = (self.col(p.x - radius), self.col(p.x + radius));
        let (r0, r1) = (self.row(p.y - radius), self.row(p.y + radius));

        (r0..=r1).flat_map(move |row| {
            self.cells[row * self.cols + c0..=row * self.cols + c1]
                .iter()
                .filter_map(|cell| *cell)
        })
    }
}

/// One sampling run. Owns grid, active list and samples; nothing outlives [`run`](Self::run).
struct PoissonDiskSampler {
    radius: f32,
    radius_squared: f32,
    extent: Vec2,
    max_attempts: u32,
    grid: AccelerationGrid,
    active: Vec<usize>,
    samples: Vec<Vec2>,
}

impl PoissonDiskSampler {
    fn new(radius: f32, extent: Vec2, max_attempts: u32) -> Self {
        debug_assert!(radius > 0.0);
        let grid = AccelerationGrid::new(radius, extent);
        let ncells = grid.len();

        Self {
            radius,
            radius_squared: radius * radius,
            extent,
            max_attempts,
            grid,
            active: Vec::with_capacity(ncells),
            samples: Vec::with_capacity(ncells),
        }
    }

    fn accept(&mut self, p: Vec2) {
        let index = self.samples.len();
        self.grid.insert(p, index);
        self.active.push(index);
        self.samples.push(p);
    }

    #[inline]
    fn in_bounds(&self, p: Vec2) -> bool {
        p.x >= 0.0 && p.x < self.extent.x && p.y >= 0.0 && p.y < self.extent.y
    }

    /// True when no accepted sample other than `parent` lies strictly closer than `radius`.
    fn is_far_enough(&self, p: Vec2, parent: usize) -> bool {
        self.grid
            .neighbours(p, self.radius)
            .filter(|&index| index != parent)
            .all(|index| self.samples[index].distance_squared(p) >= self.radius_squared)
    }

    /// Uniform point in the annulus `(radius, 2 * radius]` around `center`, by rejection
    /// from the square `[-2, 2]^2` in radius units.
    fn sample_annulus(&self, center: Vec2, rng: &mut dyn RngCore) -> Vec2 {
        loop {
            let x = 4.0 * RSCALE * rng.next_u32() as f32 - 2.0;
            let y = 4.0 * RSCALE * rng.next_u32() as f32 - 2.0;
            let r = Vec2::new(x, y);
            let r2 = r.dot(r);
            if r2 > 1.0 && r2 <= 4.0 {
                return r * self.radius + center;
            }
        }
    }

    fn propose_around(&self, parent: usize, rng: &mut dyn RngCore) -> Option<Vec2> {
        let center = self.samples[parent];

        for _ in 0..self.max_attempts {
            let candidate = self.sample_annulus(center, rng);
            if self.in_bounds(candidate) && self.is_far_enough(candidate, parent) {
                return Some(candidate);
            }
        }

        None
    }

    fn run(mut self, rng: &mut dyn RngCore) -> Vec<Vec2> {
        let ncells = self.grid.len();

        // `h * 2^-32` reaches 1.0 when the hash rounds up to 2^32.
        let x = self.extent.x * rng.next_u32() as f32 * RSCALE;
        let y = self.extent.y * rng.next_u32() as f32 * RSCALE;
        let first = Vec2::new(
            x.min(self.extent.x.next_down()),
            y.min(self.extent.y.next_down()),
        );
        self.accept(first);

        let mut retired = 0usize;
        while self.samples.len() < ncells {
            let nactive = self.active.len();
            let pick = (scaled_draw(rng, 0.0, nactive as f32).min(nactive as f32 - 1.0)) as usize;
            let parent = self.active[pick];

            match self.propose_around(parent, rng) {
                Some(p) => self.accept(p),
                None => {
                    self.active.swap_remove(pick);
                    retired += 1;
                    if self.active.is_empty() {
                        break;
                    }
                }
            }
        }

        debug!(
            "Poisson disk: {} samples in {}x{} (radius {}, {} cells, {} retired, {} still active).",
            self.samples.len(),
            self.extent.x,
            self.extent.y,
            self.radius,
            ncells,
            retired,
            self.active.len()
        );

        self.samples
    }
}
