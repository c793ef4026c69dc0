//! Spatial components shared across systems.

use crate::math::Vec2;

/// World-space position, in pixels. Origin top-left, y-down.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position(pub Vec2);

/// Rotation about the sprite pivot, in radians. Positive is clockwise in
/// screen space (y-down).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rotation {
    pub radians: f32,
}

/// Per-axis scale multiplier. Applied on top of sprite dimensions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale(pub Vec2);

impl Default for Scale {
    fn default() -> Self {
        Self(Vec2::ONE)
    }
}
