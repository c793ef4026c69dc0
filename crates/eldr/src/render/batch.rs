//! Sprite collection and batching.
//!
//! [`SpriteBatchingSystem`] walks sprite entities each tick and groups them
//! by [`Renderable`] into a [`RenderableBatch`] component held by a singleton
//! batcher entity. Sprites sharing a geometry/material pair become instances
//! of one draw call, so a starfield of a thousand identical sprites costs one
//! instanced draw instead of a thousand.
//!
//! The batch is cleared at the start of every tick and rebuilt from live
//! entities, so despawned or disabled sprites drop out without any manual
//! bookkeeping. The [`RenderSystem`](crate::render::RenderSystem) that
//! consumes the batch matches the batcher entity; register batchers before
//! the render system so the frame draws this tick's instances.

use std::any::TypeId;

use crate::ecs::{EntityId, EntityStore, Position, Rotation, Scale, System};
use crate::error::Result;
use crate::math::Vec2;
use crate::render::{Renderable, Sprite};
use crate::time::Time;

/// Snapshot of one sprite instance, everything the renderer needs to build
/// its transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Batchable {
    pub position: Vec2,
    pub rotation: f32,
    pub scale: Vec2,
    pub width: f32,
    pub height: f32,
    /// Pivot in pixels (fractional pivot times dimensions).
    pub pivot: Vec2,
}

/// Instances grouped by [`Renderable`], for one layer. A component on the
/// layer's singleton batcher entity.
///
/// Group order is first-seen order, which follows entity spawn order, so
/// draw order is deterministic across frames.
pub struct RenderableBatch {
    layer: String,
    groups: Vec<(Renderable, Vec<Batchable>)>,
}

impl RenderableBatch {
    pub fn new(layer: &str) -> Self {
        Self {
            layer: layer.to_string(),
            groups: Vec::new(),
        }
    }

    pub fn layer(&self) -> &str {
        &self.layer
    }

    /// Drop all instances and groups. Called at the start of each tick.
    pub fn clear(&mut self) {
        self.groups.clear();
    }

    /// Add one instance to its renderable's group, creating the group on
    /// first sight.
    pub fn push(&mut self, renderable: Renderable, instance: Batchable) {
        match self.groups.iter_mut().find(|(r, _)| *r == renderable) {
            Some((_, instances)) => instances.push(instance),
            None => self.groups.push((renderable, vec![instance])),
        }
    }

    pub fn groups(&self) -> &[(Renderable, Vec<Batchable>)] {
        &self.groups
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total instance count across all groups.
    pub fn instance_count(&self) -> usize {
        self.groups.iter().map(|(_, instances)| instances.len()).sum()
    }
}

/// Collects sprites on one layer into its batcher's [`RenderableBatch`].
pub struct SpriteBatchingSystem {
    batcher: EntityId,
    layer: String,
    required: [TypeId; 2],
}

impl SpriteBatchingSystem {
    /// `batcher` must hold a [`RenderableBatch`]; the batch's layer becomes
    /// this system's target layer.
    pub fn new(store: &EntityStore, batcher: EntityId) -> Result<Self> {
        let layer = store
            .component_required::<RenderableBatch>(batcher)?
            .layer()
            .to_string();
        Ok(Self {
            batcher,
            layer,
            required: [TypeId::of::<Sprite>(), TypeId::of::<Position>()],
        })
    }
}

impl System for SpriteBatchingSystem {
    fn name(&self) -> &str {
        "sprite_batching"
    }

    fn required_components(&self) -> &[TypeId] {
        &self.required
    }

    fn before_all(
        &mut self,
        store: &mut EntityStore,
        matched: Vec<EntityId>,
        _time: &Time,
    ) -> Result<Vec<EntityId>> {
        // Rebuilt from scratch every tick; stale instances must not survive.
        store
            .component_required_mut::<RenderableBatch>(self.batcher)?
            .clear();
        Ok(matched)
    }

    fn run(&mut self, store: &mut EntityStore, entity: EntityId, time: &Time) -> Result<()> {
        let (renderable, instance) = {
            let e = store.get_required(entity)?;
            let sprite = e.component_required::<Sprite>()?;

            if !sprite.enabled
                || sprite.layer != self.layer
                || sprite.batched_at == Some(time.frames)
            {
                return Ok(());
            }

            let position = e.component_required::<Position>()?.0;
            let rotation = e.component::<Rotation>().map_or(0.0, |r| r.radians);
            let scale = e.component::<Scale>().map_or(Vec2::ONE, |s| s.0);
            let width = sprite.draw_width();
            let height = sprite.draw_height();

            (
                sprite.renderable,
                Batchable {
                    position,
                    rotation,
                    scale,
                    width,
                    height,
                    pivot: sprite.pivot * Vec2::new(width, height),
                },
            )
        };

        store
            .component_required_mut::<Sprite>(entity)?
            .batched_at = Some(time.frames);
        store
            .component_required_mut::<RenderableBatch>(self.batcher)?
            .push(renderable, instance);
        Ok(())
    }
}
