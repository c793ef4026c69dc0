//! Tween animation: interpolate a component field over time.
//!
//! A [`Tween`] component drives one scalar target on its entity; the
//! [`TweenSystem`] advances every tween by the frame's scaled delta time.
//! Because it reads `delta_time`, tweens respect
//! [`time_scale`](crate::time::Time::time_scale) for free.

use std::any::TypeId;

use crate::ecs::{EntityId, EntityStore, Position, Rotation, Scale, System};
use crate::error::Result;
use crate::math::Vec2;
use crate::time::Time;

/// Easing applied to the normalized tween progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interpolation {
    Linear,
    /// Smoothstep: slow start, slow end.
    EaseInOut,
    /// Runs forward over the first half, backward over the second.
    PingPong,
}

impl Interpolation {
    /// Map raw progress `t` in [0, 1] to eased progress.
    pub fn sample(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Interpolation::Linear => t,
            Interpolation::EaseInOut => t * t * (3.0 - 2.0 * t),
            Interpolation::PingPong => {
                if t < 0.5 {
                    t * 2.0
                } else {
                    2.0 - t * 2.0
                }
            }
        }
    }
}

/// Which scalar on the entity the tween writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TweenTarget {
    PositionX,
    PositionY,
    Rotation,
    /// Writes the same value to both scale axes.
    ScaleUniform,
}

/// A component that animates one scalar from `from` to `to`.
#[derive(Debug, Clone)]
pub struct Tween {
    pub target: TweenTarget,
    pub from: f32,
    pub to: f32,
    pub duration_ms: f64,
    pub elapsed_ms: f64,
    pub interpolation: Interpolation,
}

impl Tween {
    pub fn new(target: TweenTarget, from: f32, to: f32, duration_ms: f64) -> Self {
        Self {
            target,
            from,
            to,
            duration_ms,
            elapsed_ms: 0.0,
            interpolation: Interpolation::Linear,
        }
    }

    pub fn with_interpolation(mut self, interpolation: Interpolation) -> Self {
        self.interpolation = interpolation;
        self
    }

    /// Current value at the tween's elapsed time.
    pub fn value(&self) -> f32 {
        let progress = if self.duration_ms <= 0.0 {
            1.0
        } else {
            (self.elapsed_ms / self.duration_ms) as f32
        };
        let eased = self.interpolation.sample(progress);
        self.from + (self.to - self.from) * eased
    }

    pub fn finished(&self) -> bool {
        self.elapsed_ms >= self.duration_ms
    }
}

/// Advances every entity's [`Tween`] and writes the result to its target.
pub struct TweenSystem {
    required: [TypeId; 1],
}

impl TweenSystem {
    pub fn new() -> Self {
        Self {
            required: [TypeId::of::<Tween>()],
        }
    }
}

impl Default for TweenSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for TweenSystem {
    fn name(&self) -> &str {
        "tween"
    }

    fn required_components(&self) -> &[TypeId] {
        &self.required
    }

    fn run(&mut self, store: &mut EntityStore, entity: EntityId, time: &Time) -> Result<()> {
        let (target, value) = {
            let tween = store.component_required_mut::<Tween>(entity)?;
            tween.elapsed_ms = (tween.elapsed_ms + time.delta_time).min(tween.duration_ms);
            (tween.target, tween.value())
        };

        let e = store.get_required_mut(entity)?;
        match target {
            TweenTarget::PositionX => e.component_required_mut::<Position>()?.0.x = value,
            TweenTarget::PositionY => e.component_required_mut::<Position>()?.0.y = value,
            TweenTarget::Rotation => e.component_required_mut::<Rotation>()?.radians = value,
            TweenTarget::ScaleUniform => e.component_required_mut::<Scale>()?.0 = Vec2::splat(value),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::{Entity, World};

    #[test]
    fn linear_midpoint() {
        let mut tween = Tween::new(TweenTarget::PositionX, 0.0, 100.0, 1000.0);
        tween.elapsed_ms = 500.0;
        assert_eq!(tween.value(), 50.0);
    }

    #[test]
    fn ease_in_out_is_symmetric() {
        let ease = Interpolation::EaseInOut;
        assert_eq!(ease.sample(0.0), 0.0);
        assert_eq!(ease.sample(1.0), 1.0);
        assert!((ease.sample(0.5) - 0.5).abs() < 1e-6);
        // Slower than linear near the start.
        assert!(ease.sample(0.1) < 0.1);
    }

    #[test]
    fn ping_pong_returns_to_start() {
        let ping = Interpolation::PingPong;
        assert_eq!(ping.sample(0.0), 0.0);
        assert_eq!(ping.sample(0.5), 1.0);
        assert_eq!(ping.sample(1.0), 0.0);
    }

    #[test]
    fn system_drives_position() {
        let mut world = World::new();
        let mut entity = Entity::new("mover");
        entity.add(Position(Vec2::ZERO));
        entity.add(Tween::new(TweenTarget::PositionX, 0.0, 100.0, 100.0));
        let id = world.entities.spawn(entity);
        world.register_system(TweenSystem::new());

        let mut time = Time::new();
        time.update(0.0);
        time.update(50.0);
        world.tick(&time).unwrap();

        let pos = world.entities.component_required::<Position>(id).unwrap();
        assert_eq!(pos.0.x, 50.0);
    }

    #[test]
    fn tween_clamps_at_duration() {
        let mut world = World::new();
        let mut entity = Entity::new("mover");
        entity.add(Position(Vec2::ZERO));
        entity.add(Tween::new(TweenTarget::PositionX, 0.0, 10.0, 100.0));
        let id = world.entities.spawn(entity);
        world.register_system(TweenSystem::new());

        let mut time = Time::new();
        time.update(0.0);
        time.update(10_000.0);
        world.tick(&time).unwrap();

        let pos = world.entities.component_required::<Position>(id).unwrap();
        assert_eq!(pos.0.x, 10.0);
        let tween = world.entities.component_required::<Tween>(id).unwrap();
        assert!(tween.finished());
    }
}
