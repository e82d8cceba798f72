//! Removing points that fall on non-positive mask texels.
use glam::Vec2;
use tracing::info;

use crate::raster::ScalarImage;

/// Points that survived culling and how many were dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CullOutcome {
    pub kept: Vec<Vec2>,
    pub removed: usize,
}

/// Keeps each point whose mask texel is `> 0`, preserving order.
///
/// Points outside the mask (including negative coordinates) see a texel value of zero and
/// are removed.
pub fn cull_points(points: &[Vec2], mask: &ScalarImage) -> CullOutcome {
    let kept: Vec<Vec2> = points
        .iter()
        .copied()
        .filter(|&p| mask.sample(p) > 0.0)
        .collect();
    let removed = points.len() - kept.len();

    info!("Removed {} of {} points.", removed, points.len());

    CullOutcome { kept, removed }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mask() -> ScalarImage {
        // 3x2, positive only in the left column
        ScalarImage {
            width: 3,
            height: 2,
            pixels: vec![1.0, 0.0, -1.0, 0.5, 0.0, -2.0],
        }
    }

    #[test]
    fn keeps_points_on_positive_texels() {
        let points = [
            Vec2::new(0.2, 0.2),
            Vec2::new(1.5, 0.5),
            Vec2::new(0.9, 1.9),
            Vec2::new(2.1, 1.0),
        ];
        let outcome = cull_points(&points, &mask());
        assert_eq!(outcome.kept, vec![Vec2::new(0.2, 0.2), Vec2::new(0.9, 1.9)]);
        assert_eq!(outcome.removed, 2);
    }

    #[test]
    fn points_outside_mask_are_removed() {
        let points = [Vec2::new(-0.5, 0.5), Vec2::new(3.0, 0.0), Vec2::new(0.0, 2.0)];
        let outcome = cull_points(&points, &mask());
        assert!(outcome.kept.is_empty());
        assert_eq!(outcome.removed, 3);
    }
}
