//! The render system: batch in, instanced draw calls out.
//!
//! ## Per-frame flow
//!
//! ```text
//! RenderSystem (one per layer)
//!   │
//!   ├─ before_all ── clear the surface, unless the layer preserves
//!   │
//!   └─ run(batcher entity)
//!        ├─ skip batches belonging to another layer
//!        ├─ read the camera entity's Position + zoom
//!        ├─ surface_size() from the backend
//!        ├─ for each (renderable, instances) group in the batch:
//!        │    build one transform per instance
//!        │    backend.draw_instanced(geometry, material, transforms)
//!        └─ done — one draw call per renderable
//! ```
//!
//! The system's required component is [`RenderableBatch`], so `run` matches
//! the layer's singleton batcher entity, not gameplay entities. The camera
//! is a plain entity (`Position` + [`Camera`](crate::render::Camera)) bound
//! at construction.

use std::any::TypeId;
use std::cell::RefCell;
use std::rc::Rc;

use log::warn;

use crate::ecs::{EntityId, EntityStore, Position, System};
use crate::error::Result;
use crate::math::{projection, zoom_about_center, Mat3, Vec2};
use crate::render::batch::{Batchable, RenderableBatch};
use crate::render::layer::{ClearStrategy, RenderLayer};
use crate::render::{Camera, RenderBackend};
use crate::time::Time;

/// Build one sprite instance's clip-space transform.
///
/// Pixel-space model transform (position, rotation, scale, pivot), then the
/// camera (translate by the negated camera position, zoom about the surface
/// center), then the projection into clip space.
pub fn sprite_instance_matrix(
    surface: (u32, u32),
    camera_position: Vec2,
    zoom: f32,
    entry: &Batchable,
) -> Mat3 {
    let (width, height) = (surface.0 as f32, surface.1 as f32);

    projection(width, height)
        * zoom_about_center(zoom, width, height)
        * Mat3::from_translation(-camera_position)
        * Mat3::from_translation(entry.position)
        * Mat3::from_angle(entry.rotation)
        * Mat3::from_scale(Vec2::new(
            entry.scale.x * entry.width,
            entry.scale.y * entry.height,
        ))
        * Mat3::from_translation(-(entry.pivot / Vec2::new(entry.width, entry.height)))
}

/// Draws one layer's [`RenderableBatch`] through a [`RenderBackend`].
pub struct RenderSystem {
    layer: String,
    clear_strategy: ClearStrategy,
    clear_color: [f64; 4],
    camera: EntityId,
    backend: Rc<RefCell<dyn RenderBackend>>,
    required: [TypeId; 1],
    stopped: bool,
}

impl RenderSystem {
    /// `camera` must hold `Position` and `Camera` components.
    pub fn new(
        store: &EntityStore,
        layer: &RenderLayer,
        camera: EntityId,
        backend: Rc<RefCell<dyn RenderBackend>>,
    ) -> Result<Self> {
        store.component_required::<Position>(camera)?;
        store.component_required::<Camera>(camera)?;

        Ok(Self {
            layer: layer.name().to_string(),
            clear_strategy: layer.clear_strategy,
            clear_color: layer.clear_color,
            camera,
            backend,
            required: [TypeId::of::<RenderableBatch>()],
            stopped: false,
        })
    }
}

impl System for RenderSystem {
    fn name(&self) -> &str {
        "render"
    }

    fn required_components(&self) -> &[TypeId] {
        &self.required
    }

    fn before_all(
        &mut self,
        _store: &mut EntityStore,
        matched: Vec<EntityId>,
        _time: &Time,
    ) -> Result<Vec<EntityId>> {
        if self.clear_strategy == ClearStrategy::Clear {
            self.backend.borrow_mut().clear(self.clear_color)?;
        }
        Ok(matched)
    }

    fn run(&mut self, store: &mut EntityStore, entity: EntityId, _time: &Time) -> Result<()> {
        let batch = store.component_required::<RenderableBatch>(entity)?;
        if batch.layer() != self.layer {
            return Ok(());
        }

        let camera_position = store.component_required::<Position>(self.camera)?.0;
        let zoom = store.component_required::<Camera>(self.camera)?.zoom;

        let mut backend = self.backend.borrow_mut();
        let surface = backend.surface_size();

        for (renderable, instances) in batch.groups() {
            if instances.is_empty() {
                continue;
            }
            let transforms: Vec<[f32; 9]> = instances
                .iter()
                .map(|entry| {
                    sprite_instance_matrix(surface, camera_position, zoom, entry).to_cols_array()
                })
                .collect();
            backend.draw_instanced(renderable.geometry, renderable.material, &transforms)?;
        }
        Ok(())
    }

    fn stop(&mut self) {
        if self.stopped {
            return;
        }
        self.stopped = true;
        if self.clear_strategy == ClearStrategy::Clear {
            if let Err(err) = self.backend.borrow_mut().clear(self.clear_color) {
                warn!("clear on stop failed: {err}");
            }
        }
    }
}
