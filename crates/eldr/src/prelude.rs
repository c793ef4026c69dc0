//! Convenience re-exports — `use eldr::prelude::*` for the common items.

pub use crate::animation::{Interpolation, Tween, TweenSystem, TweenTarget};
pub use crate::asset::ImageCache;
pub use crate::ecs::{Entity, EntityId, EntityStore, Position, Rotation, Scale, System, World};
pub use crate::error::{Error, Result};
pub use crate::events::{Event, EventDispatcher};
pub use crate::game::Game;
pub use crate::input::{InputSnapshot, KeyCode, MouseButton};
pub use crate::math::{Bounds, Mat3, Vec2};
pub use crate::pooling::ObjectPool;
pub use crate::render::{
    Camera, ClearStrategy, GeometryHandle, LayerService, MaterialHandle, Renderable,
    RenderableBatch, RenderBackend, RenderLayer, RenderSystem, Sprite, SpriteBatchingSystem,
    WgpuRenderer,
};
pub use crate::scene::{Scene, SceneObject, Stoppable, Updatable};
pub use crate::space::Space;
pub use crate::time::Time;
pub use crate::window::{EngineContext, WindowRunner};
