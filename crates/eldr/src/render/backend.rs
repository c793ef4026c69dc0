//! The drawing-surface abstraction.

use crate::render::{GeometryHandle, MaterialHandle};

/// One instance's 3x3 affine transform, column-major, clip-space output.
pub type InstanceTransform = [f32; 9];

/// A surface that can clear itself and draw instanced geometry.
///
/// [`RenderSystem`](crate::render::RenderSystem) drives this trait and never
/// talks to the GPU directly. The production implementation is
/// [`WgpuRenderer`](crate::render::WgpuRenderer); tests substitute a
/// recording double.
pub trait RenderBackend {
    /// Current drawable size in physical pixels.
    fn surface_size(&self) -> (u32, u32);

    /// Fill the surface with an RGBA color (components in [0, 1]).
    fn clear(&mut self, color: [f64; 4]) -> crate::error::Result<()>;

    /// Draw `transforms.len()` instances of one geometry/material pair.
    fn draw_instanced(
        &mut self,
        geometry: GeometryHandle,
        material: MaterialHandle,
        transforms: &[InstanceTransform],
    ) -> crate::error::Result<()>;
}
