//! Curl of a scalar field, turning a potential into a divergence-free velocity field.
use glam::Vec2;
use tracing::info;

use crate::raster::{ScalarImage, VectorImage};

/// Smallest and largest component written by [`curl_2d`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurlRange {
    pub min: f32,
    pub max: f32,
}

/// Forward-difference curl: each output texel is `(dp/dy, dp/dx)`.
///
/// `dp/dx = p[x + 1, y] - p[x, y]` and `dp/dy = p[x, y] - p[x, y + 1]` since rows run
/// downwards. The last column and row reuse themselves, giving zero there.
pub fn curl_2d(field: &ScalarImage) -> (VectorImage, CurlRange) {
    let (width, height) = (field.width, field.height);
    let mut out = VectorImage::new(width, height);
    let mut min = f32::MAX;
    let mut max = f32::MIN;

    for row in 0..height {
        let next_row = (row + 1).min(height - 1);
        for col in 0..width {
            let next_col = (col + 1).min(width - 1);
            let p = field.get(col, row);
            let dpdx = field.get(next_col, row) - p;
            let dpdy = p - field.get(col, next_row);

            min = min.min(dpdx).min(dpdy);
            max = max.max(dpdx).max(dpdy);
            out.pixels[col + row * width] = Vec2::new(dpdy, dpdx);
        }
    }

    let range = if out.pixels.is_empty() {
        CurlRange { min: 0.0, max: 0.0 }
    } else {
        CurlRange { min, max }
    };

    info!(
        "Curl range is {} to {}, shape {}x{}x2.",
        range.min, range.max, width, height
    );

    (out, range)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn horizontal_ramp_has_constant_dx() {
        // p = 2x, 3 columns, 2 rows
        let field = ScalarImage {
            width: 3,
            height: 2,
            pixels: vec![0.0, 2.0, 4.0, 0.0, 2.0, 4.0],
        };
        let (curl, range) = curl_2d(&field);

        assert_eq!(curl.texel_fetch(0, 0), Vec2::new(0.0, 2.0));
        assert_eq!(curl.texel_fetch(1, 1), Vec2::new(0.0, 2.0));
        // last column differences against itself
        assert_eq!(curl.texel_fetch(2, 0), Vec2::ZERO);
        assert_eq!(range, CurlRange { min: 0.0, max: 2.0 });
    }

    #[test]
    fn vertical_ramp_flips_sign_for_downward_rows() {
        // p = row
        let field = ScalarImage {
            width: 2,
            height: 3,
            pixels: vec![0.0, 0.0, 1.0, 1.0, 2.0, 2.0],
        };
        let (curl, range) = curl_2d(&field);
        assert_eq!(curl.texel_fetch(0, 0), Vec2::new(-1.0, 0.0));
        assert_eq!(curl.texel_fetch(1, 2), Vec2::ZERO);
        assert_eq!(range.min, -1.0);
        assert_eq!(range.max, 0.0);
    }

    #[test]
    fn empty_field_has_zero_range() {
        let (curl, range) = curl_2d(&ScalarImage::new(0, 0));
        assert!(curl.pixels.is_empty());
        assert_eq!(range, CurlRange { min: 0.0, max: 0.0 });
    }
}
