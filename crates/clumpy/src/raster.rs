//! Typed views over [`NpyArray`]s: point lists and row-major images.
//!
//! Images are indexed `(x, y)` with `x` the column and `y` the row; texel fetches outside
//! the image return zero.
use glam::Vec2;

use crate::array::{ArrayData, NpyArray};
use crate::error::{Error, Result};

/// Converts an `(n, 2)` float32 array into points, `x` then `y` per row.
pub fn points_from_array(array: &NpyArray) -> Result<Vec<Vec2>> {
    match array.shape.as_slice() {
        [_, 2] => {}
        _ => return Err(Error::shape("input points", "(n, 2)", &array.shape)),
    }
    Ok(array
        .as_f32()?
        .chunks_exact(2)
        .map(|xy| Vec2::new(xy[0], xy[1]))
        .collect())
}

/// Converts points into an `(n, 2)` float32 array.
pub fn points_to_array(points: &[Vec2]) -> NpyArray {
    let data = points.iter().flat_map(|p| [p.x, p.y]).collect();
    NpyArray {
        shape: vec![points.len(), 2],
        data: ArrayData::F32(data),
    }
}

/// Texel coordinates for `p`, or `None` when it lies outside `width x height`.
#[inline]
pub(crate) fn texel_of(p: Vec2, width: usize, height: usize) -> Option<(usize, usize)> {
    if !(p.x >= 0.0 && p.y >= 0.0) {
        return None;
    }
    let (x, y) = (p.x as usize, p.y as usize);
    (x < width && y < height).then_some((x, y))
}

/// Single-channel float image, shape `(height, width)`.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarImage {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<f32>,
}

impl ScalarImage {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![0.0; width * height],
        }
    }

    pub fn from_array(array: &NpyArray) -> Result<Self> {
        let [height, width] = array.shape[..] else {
            return Err(Error::shape("input image", "(height, width)", &array.shape));
        };
        Ok(Self {
            width,
            height,
            pixels: array.as_f32()?.to_vec(),
        })
    }

    pub fn into_array(self) -> NpyArray {
        NpyArray {
            shape: vec![self.height, self.width],
            data: ArrayData::F32(self.pixels),
        }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f32 {
        if x < self.width && y < self.height {
            self.pixels[x + self.width * y]
        } else {
            0.0
        }
    }

    /// Texel containing `p`, zero outside the image.
    #[inline]
    pub fn sample(&self, p: Vec2) -> f32 {
        texel_of(p, self.width, self.height).map_or(0.0, |(x, y)| self.get(x, y))
    }
}

/// Two-channel float image (e.g. velocities), shape `(height, width, 2)`.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorImage {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<Vec2>,
}

impl VectorImage {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![Vec2::ZERO; width * height],
        }
    }

    pub fn from_array(array: &NpyArray) -> Result<Self> {
        let [height, width, 2] = array.shape[..] else {
            return Err(Error::shape(
                "vector image",
                "(height, width, 2)",
                &array.shape,
            ));
        };
        let pixels = array
            .as_f32()?
            .chunks_exact(2)
            .map(|v| Vec2::new(v[0], v[1]))
            .collect();
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn into_array(self) -> NpyArray {
        let data = self.pixels.iter().flat_map(|v| [v.x, v.y]).collect();
        NpyArray {
            shape: vec![self.height, self.width, 2],
            data: ArrayData::F32(data),
        }
    }

    #[inline]
    pub fn texel_fetch(&self, x: usize, y: usize) -> Vec2 {
        if x < self.width && y < self.height {
            self.pixels[x + self.width * y]
        } else {
            Vec2::ZERO
        }
    }

    /// Nearest-texel lookup, zero outside the image.
    #[inline]
    pub fn sample(&self, p: Vec2) -> Vec2 {
        texel_of(p, self.width, self.height).map_or(Vec2::ZERO, |(x, y)| self.texel_fetch(x, y))
    }
}

/// 8-bit image with `channels` interleaved components per pixel.
#[derive(Debug, Clone, PartialEq)]
pub struct ByteImage {
    pub width: usize,
    pub height: usize,
    pub channels: usize,
    pub pixels: Vec<u8>,
}

impl ByteImage {
    pub fn new(width: usize, height: usize, channels: usize) -> Self {
        Self {
            width,
            height,
            channels,
            pixels: vec![0; width * height * channels],
        }
    }

    /// Sets every component to zero.
    pub fn clear(&mut self) {
        self.pixels.fill(0);
    }

    /// Mutable components of pixel `(x, y)`. Panics when out of range.
    #[inline]
    pub fn pixel_mut(&mut self, x: usize, y: usize) -> &mut [u8] {
        let start = (x + self.width * y) * self.channels;
        &mut self.pixels[start..start + self.channels]
    }

    /// Shape `(height, width)` for one channel, `(height, width, channels)` otherwise.
    pub fn into_array(self) -> NpyArray {
        let shape = if self.channels == 1 {
            vec![self.height, self.width]
        } else {
            vec![self.height, self.width, self.channels]
        };
        NpyArray {
            shape,
            data: ArrayData::U8(self.pixels),
        }
    }
}
