//! Entity-component-system core.
//!
//! Entities are bags of heterogeneous components addressed by [`EntityId`]
//! handles. Systems declare the component types they require and the
//! [`World`](world::World) runs each system over every matching entity once
//! per tick, in registration order.
//!
//! ## Comparison with archetype ECS designs
//!
//! Archetype storage (grouping entities by component set into contiguous
//! tables) wins on iteration throughput for large worlds. This engine keeps
//! the simpler map-per-entity layout: for the hundreds-of-entities scale it
//! targets, deterministic registration-order scheduling and cheap
//! add/remove-component at runtime matter more than raw iteration speed.

mod components;
mod entity;
mod system;
mod world;

pub use components::{Position, Rotation, Scale};
pub use entity::{Entity, EntityId, EntityStore};
pub use system::System;
pub use world::World;
