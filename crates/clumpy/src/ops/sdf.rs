//! Colourising signed distance fields for preview.
use std::ops::{Add, Mul};
use std::str::FromStr;

use glam::{Vec3, Vec4};

use crate::error::{Error, Result};
use crate::raster::{ByteImage, ScalarImage};

/// Output layout of [`visualize_sdf`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SdfColorMode {
    Rgb,
    Rgba,
}

impl SdfColorMode {
    pub fn channels(self) -> usize {
        match self {
            SdfColorMode::Rgb => 3,
            SdfColorMode::Rgba => 4,
        }
    }
}

impl FromStr for SdfColorMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "rgb" => Ok(SdfColorMode::Rgb),
            "rgba" => Ok(SdfColorMode::Rgba),
            other => Err(Error::InvalidInput(format!(
                "mode must be 'rgb' or 'rgba', got '{other}'"
            ))),
        }
    }
}

#[inline]
fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Linear blend, exact at both ends.
#[inline]
fn mix<T>(a: T, b: T, t: f32) -> T
where
    T: Mul<f32, Output = T> + Add<Output = T>,
{
    a * (1.0 - t) + b * t
}

/// Fill colour inside the shape (`d <= 0`), a thin border at `d ~ 0`.
///
/// In `rgb` mode the outside shows the distance as grey clamped to `[0, 1]`; in `rgba`
/// mode the outside is transparent.
pub fn visualize_sdf(field: &ScalarImage, mode: SdfColorMode) -> ByteImage {
    let mut out = ByteImage::new(field.width, field.height, mode.channels());

    for row in 0..field.height {
        for col in 0..field.width {
            let p = field.get(col, row);
            let inside = smoothstep(-0.001, 0.001, p);
            let edge = smoothstep(0.0, 0.01, p.abs());
            let pixel = out.pixel_mut(col, row);

            match mode {
                SdfColorMode::Rgb => {
                    let fill = Vec3::new(0.2, 0.6, 0.8);
                    let border = Vec3::new(0.8, 0.6, 0.2);
                    let color = mix(fill, Vec3::splat(p.clamp(0.0, 1.0)), inside);
                    let color = mix(border, color, edge) * 255.0;
                    pixel.copy_from_slice(&color.to_array().map(|c| c as u8));
                }
                SdfColorMode::Rgba => {
                    let fill = Vec4::new(0.6, 0.6, 0.6, 1.0);
                    let border = Vec4::new(0.2, 0.2, 0.2, 1.0);
                    let clear = Vec4::new(0.2, 0.2, 0.2, 0.0);
                    let color = mix(fill, clear, inside);
                    let color =
                        (mix(border, color, edge) * 255.0).clamp(Vec4::ZERO, Vec4::splat(255.0));
                    pixel.copy_from_slice(&color.to_array().map(|c| c as u8));
                }
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(values: &[f32]) -> ScalarImage {
        ScalarImage {
            width: values.len(),
            height: 1,
            pixels: values.to_vec(),
        }
    }

    #[test]
    fn modes_parse() {
        assert_eq!("rgb".parse::<SdfColorMode>().unwrap(), SdfColorMode::Rgb);
        assert_eq!("rgba".parse::<SdfColorMode>().unwrap(), SdfColorMode::Rgba);
        assert!("hsv".parse::<SdfColorMode>().is_err());
    }

    #[test]
    fn rgb_inside_is_fill_and_outside_is_grey() {
        let image = visualize_sdf(&field(&[-1.0, 0.5, 2.0]), SdfColorMode::Rgb);
        assert_eq!(image.pixels.len(), 9);
        assert_eq!(&image.pixels[0..3], &[51, 153, 204]);
        assert_eq!(&image.pixels[3..6], &[127, 127, 127]);
        assert_eq!(&image.pixels[6..9], &[255, 255, 255]);
    }

    #[test]
    fn rgb_zero_crossing_is_border() {
        let image = visualize_sdf(&field(&[0.0]), SdfColorMode::Rgb);
        assert_eq!(image.pixels, vec![204, 153, 51]);
    }

    #[test]
    fn rgba_outside_is_transparent() {
        let image = visualize_sdf(&field(&[-1.0, 1.0]), SdfColorMode::Rgba);
        assert_eq!(&image.pixels[0..4], &[153, 153, 153, 255]);
        assert_eq!(image.pixels[7], 0);
    }
}
