//! 2D rendering: sprites, batching, layers, and the wgpu backend.
//!
//! The render path runs in two ECS stages. A batching system walks sprite
//! entities and groups them by (geometry, material) into a
//! [`RenderableBatch`](batch::RenderableBatch); a render system then turns
//! each group into one instanced draw call against a [`RenderBackend`]. The
//! backend trait keeps the GPU out of the scheduling path, so the whole
//! pipeline is testable with a recording double.

pub mod backend;
pub mod batch;
pub mod draw;
pub mod gpu;
pub mod layer;
pub mod pipeline;
pub mod shader;

pub use backend::{InstanceTransform, RenderBackend};
pub use batch::{Batchable, RenderableBatch, SpriteBatchingSystem};
pub use draw::RenderSystem;
pub use gpu::GpuContext;
pub use layer::{ClearStrategy, LayerService, RenderLayer};
pub use pipeline::WgpuRenderer;

use crate::math::Vec2;

/// Handle to geometry registered with a renderer. Just an index; copyable
/// and free of lifetimes so it can live in components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GeometryHandle(pub usize);

/// Handle to a material (texture plus pipeline state) registered with a
/// renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaterialHandle(pub usize);

/// What to draw: a geometry/material pair. Sprites sharing a `Renderable`
/// batch into a single instanced draw call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Renderable {
    pub geometry: GeometryHandle,
    pub material: MaterialHandle,
}

/// A textured quad component.
///
/// `width` and `height` are the base dimensions in pixels; `bleed` pads them
/// slightly so adjacent tiles overlap by a hair instead of showing seams at
/// non-integer camera positions.
#[derive(Debug, Clone)]
pub struct Sprite {
    /// Name of the render layer this sprite draws on.
    pub layer: String,
    pub renderable: Renderable,
    pub width: f32,
    pub height: f32,
    pub bleed: f32,
    /// Rotation/scale origin as a fraction of the sprite's dimensions.
    /// `(0.5, 0.5)` is the center.
    pub pivot: Vec2,
    pub enabled: bool,
    /// Frame number this sprite was last batched on. Guards against double
    /// batching when several batchers share a layer.
    pub(crate) batched_at: Option<u64>,
}

impl Sprite {
    pub fn new(layer: &str, renderable: Renderable, width: f32, height: f32) -> Self {
        Self {
            layer: layer.to_string(),
            renderable,
            width,
            height,
            bleed: 1.0,
            pivot: Vec2::splat(0.5),
            enabled: true,
            batched_at: None,
        }
    }

    pub fn with_bleed(mut self, bleed: f32) -> Self {
        self.bleed = bleed;
        self
    }

    pub fn with_pivot(mut self, pivot: Vec2) -> Self {
        self.pivot = pivot;
        self
    }

    /// Drawn width, including bleed.
    pub fn draw_width(&self) -> f32 {
        self.width + self.bleed
    }

    /// Drawn height, including bleed.
    pub fn draw_height(&self) -> f32 {
        self.height + self.bleed
    }
}

/// Camera zoom component. An entity with `Position` and `Camera` defines the
/// view for a [`RenderSystem`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub zoom: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self { zoom: 1.0 }
    }
}
