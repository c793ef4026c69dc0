//! Math helpers and glam re-exports.
//!
//! We re-export [glam](https://docs.rs/glam) types so users don't need to
//! depend on it directly. Sprite transforms are 3x3 affine matrices in pixel
//! space; [`projection`] maps them into clip space.

pub use glam::{Mat3, Vec2};

use crate::error::BoundsError;

/// Projection from pixel space (origin top-left, y-down) into clip space
/// (origin center, y-up, [-1, 1] on both axes).
pub fn projection(width: f32, height: f32) -> Mat3 {
    Mat3::from_translation(Vec2::new(-1.0, 1.0))
        * Mat3::from_scale(Vec2::new(2.0 / width, -2.0 / height))
}

/// Uniform zoom about the surface center, in pixel space.
///
/// `zoom = 1` is the identity; the center pixel stays fixed for any zoom.
pub fn zoom_about_center(zoom: f32, width: f32, height: f32) -> Mat3 {
    let center = Vec2::new(width / 2.0, height / 2.0);
    Mat3::from_translation(center)
        * Mat3::from_scale(Vec2::splat(zoom))
        * Mat3::from_translation(-center)
}

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,
}

impl Bounds {
    /// Compute the axis-aligned extrema of a path.
    ///
    /// A path needs at least two points to enclose anything; fewer is an
    /// error rather than a degenerate box.
    pub fn from_points(points: &[Vec2]) -> Result<Self, BoundsError> {
        if points.len() < 2 {
            return Err(BoundsError::TooFewPoints(points.len()));
        }

        let mut bounds = Bounds {
            min_x: f32::MAX,
            max_x: f32::MIN,
            min_y: f32::MAX,
            max_y: f32::MIN,
        };

        for point in points {
            bounds.min_x = bounds.min_x.min(point.x);
            bounds.max_x = bounds.max_x.max(point.x);
            bounds.min_y = bounds.min_y.min(point.y);
            bounds.max_y = bounds.max_y.max(point.y);
        }

        Ok(bounds)
    }

    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }

    /// Whether a point lies inside the box (edges inclusive).
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min_x && point.x <= self.max_x && point.y >= self.min_y && point.y <= self.max_y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projection_maps_corners_to_clip_space() {
        let p = projection(800.0, 600.0);
        let top_left = p.transform_point2(Vec2::ZERO);
        let bottom_right = p.transform_point2(Vec2::new(800.0, 600.0));
        assert!((top_left - Vec2::new(-1.0, 1.0)).length() < 1e-6);
        assert!((bottom_right - Vec2::new(1.0, -1.0)).length() < 1e-6);
    }

    #[test]
    fn zoom_keeps_center_fixed() {
        let z = zoom_about_center(2.0, 800.0, 600.0);
        let center = Vec2::new(400.0, 300.0);
        assert!((z.transform_point2(center) - center).length() < 1e-4);
        // A point 10px right of center moves 20px right at 2x zoom.
        let moved = z.transform_point2(center + Vec2::new(10.0, 0.0));
        assert!((moved - (center + Vec2::new(20.0, 0.0))).length() < 1e-4);
    }

    #[test]
    fn zoom_of_one_is_identity() {
        let z = zoom_about_center(1.0, 640.0, 480.0);
        let p = Vec2::new(123.0, 45.0);
        assert!((z.transform_point2(p) - p).length() < 1e-4);
    }

    #[test]
    fn bounds_match_extrema() {
        let points = [
            Vec2::new(1.0, 5.0),
            Vec2::new(-3.0, 2.0),
            Vec2::new(4.0, -1.0),
        ];
        let bounds = Bounds::from_points(&points).unwrap();
        assert_eq!(bounds.min_x, -3.0);
        assert_eq!(bounds.max_x, 4.0);
        assert_eq!(bounds.min_y, -1.0);
        assert_eq!(bounds.max_y, 5.0);
    }

    #[test]
    fn bounds_reject_short_paths() {
        assert!(matches!(
            Bounds::from_points(&[]),
            Err(BoundsError::TooFewPoints(0))
        ));
        assert!(matches!(
            Bounds::from_points(&[Vec2::ZERO]),
            Err(BoundsError::TooFewPoints(1))
        ));
    }

    #[test]
    fn bounds_contains() {
        let bounds = Bounds::from_points(&[Vec2::ZERO, Vec2::new(10.0, 10.0)]).unwrap();
        assert!(bounds.contains(Vec2::new(5.0, 5.0)));
        assert!(bounds.contains(Vec2::new(10.0, 0.0)));
        assert!(!bounds.contains(Vec2::new(11.0, 5.0)));
    }
}
