//! Animating point lists by advecting them through a velocity field.
//!
//! Every particle starts at one of the input points, moves by `step_size * velocity` per
//! frame, and respawns at its origin once it has lived `nframes` frames. A warm-up pass of
//! `nframes` steps staggers the particle ages so the recorded loop of `nframes` frames has
//! no visible synchronised respawn.
use glam::Vec2;
use tracing::debug;

use crate::error::{Error, Result};
use crate::ops::splat::splat_pixels;
use crate::raster::{ByteImage, VectorImage};
use crate::rng::HashRng;

/// Seed of the stream that staggers particle respawns.
const AGE_OFFSET_SEED: u32 = 0;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AdvectOptions {
    /// Multiplier applied to the sampled velocity each frame.
    pub step_size: f32,
    /// Particle lifetime and number of recorded frames.
    pub nframes: u32,
}

impl AdvectOptions {
    pub fn new(step_size: f32, nframes: u32) -> Self {
        Self { step_size, nframes }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.step_size.is_finite() {
            return Err(Error::InvalidInput(format!(
                "step size must be finite, got {}",
                self.step_size
            )));
        }
        if self.nframes == 0 {
            return Err(Error::InvalidInput("frame count must be > 0".into()));
        }
        Ok(())
    }
}

struct Particle {
    origin: Vec2,
    position: Vec2,
    age: u32,
    /// Warm-up frame at which the particle first respawns.
    respawn_at: u32,
}

impl Particle {
    fn respawn(&mut self) {
        self.position = self.origin;
        self.age = 0;
    }
}

/// Runs the simulation, handing each recorded frame to `on_frame` with its index.
///
/// Frames are single-channel images the size of `velocities`, 255 where a particle sits.
/// Returns the number of frames emitted.
pub fn advect_points<F>(
    points: &[Vec2],
    velocities: &VectorImage,
    options: &AdvectOptions,
    mut on_frame: F,
) -> Result<u32>
where
    F: FnMut(u32, &ByteImage) -> Result<()>,
{
    options.validate()?;
    let nframes = options.nframes;

    let mut rng = HashRng::new(AGE_OFFSET_SEED);
    let mut particles: Vec<Particle> = points
        .iter()
        .map(|&origin| Particle {
            origin,
            position: origin,
            age: 0,
            respawn_at: (rng.next_f32_in(0.0, nframes as f32) as u32).min(nframes - 1),
        })
        .collect();

    let step = |particle: &mut Particle| {
        particle.position += options.step_size * velocities.sample(particle.position);
        particle.age += 1;
    };

    for frame in 0..nframes {
        for particle in particles.iter_mut() {
            step(particle);
            if frame >= particle.respawn_at {
                particle.respawn();
                particle.respawn_at = nframes;
            }
        }
    }

    let mut image = ByteImage::new(velocities.width, velocities.height, 1);
    let mut positions = Vec::with_capacity(particles.len());

    for frame in 0..nframes {
        positions.clear();
        for particle in particles.iter_mut() {
            step(particle);
            if particle.age >= nframes {
                particle.respawn();
            }
            positions.push(particle.position);
        }

        image.clear();
        let drawn = splat_pixels(&positions, &mut image);
        debug!("Frame {:03}: {} of {} particles visible.", frame, drawn, positions.len());
        on_frame(frame, &image)?;
    }

    Ok(nframes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform_field(width: usize, height: usize, v: Vec2) -> VectorImage {
        VectorImage {
            width,
            height,
            pixels: vec![v; width * height],
        }
    }

    fn lit(image: &ByteImage) -> Vec<usize> {
        image
            .pixels
            .iter()
            .enumerate()
            .filter(|(_, &v)| v == 255)
            .map(|(i, _)| i)
            .collect()
    }

    #[test]
    fn zero_frames_is_invalid() {
        let field = uniform_field(4, 4, Vec2::ZERO);
        let result = advect_points(&[], &field, &AdvectOptions::new(1.0, 0), |_, _| Ok(()));
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn emits_one_image_per_frame() {
        let field = uniform_field(8, 2, Vec2::X);
        let mut frames = Vec::new();
        let count = advect_points(
            &[Vec2::new(0.5, 0.5)],
            &field,
            &AdvectOptions::new(1.0, 4),
            |index, image| {
                frames.push((index, lit(image)));
                Ok(())
            },
        )
        .unwrap();

        assert_eq!(count, 4);
        assert_eq!(
            frames.iter().map(|(i, _)| *i).collect::<Vec<_>>(),
            vec![0, 1, 2, 3]
        );
        for (_, pixels) in &frames {
            assert_eq!(pixels.len(), 1);
            assert!(pixels[0] < 8);
        }
    }

    #[test]
    fn particles_respawn_after_lifetime() {
        let field = uniform_field(16, 1, Vec2::X);
        let mut columns = Vec::new();
        advect_points(
            &[Vec2::new(0.5, 0.5)],
            &field,
            &AdvectOptions::new(1.0, 3),
            |_, image| {
                columns.push(lit(image)[0]);
                Ok(())
            },
        )
        .unwrap();

        // Never more than `nframes` steps away from the origin column.
        assert!(columns.iter().all(|&c| c <= 3));
        // The loop wraps: some frame shows a smaller column than its predecessor.
        assert!(columns.windows(2).any(|w| w[1] < w[0]) || columns.contains(&0));
    }

    #[test]
    fn static_field_keeps_points_in_place() {
        let field = uniform_field(5, 5, Vec2::ZERO);
        advect_points(
            &[Vec2::new(1.2, 3.7), Vec2::new(4.0, 0.0)],
            &field,
            &AdvectOptions::new(2.0, 2),
            |_, image| {
                assert_eq!(lit(image), vec![4, 1 + 5 * 3]);
                Ok(())
            },
        )
        .unwrap();
    }

    #[test]
    fn sink_errors_stop_the_run() {
        let field = uniform_field(2, 2, Vec2::ZERO);
        let mut calls = 0;
        let result = advect_points(
            &[Vec2::ZERO],
            &field,
            &AdvectOptions::new(1.0, 5),
            |_, _| {
                calls += 1;
                Err(Error::Other("disk full".into()))
            },
        );
        assert!(result.is_err());
        assert_eq!(calls, 1);
    }
}
