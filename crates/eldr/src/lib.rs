//! # Eldr — Lightweight 2D Game Engine
//!
//! A small real-time 2D engine: a custom ECS drives per-frame systems, sprites
//! batch by geometry/material into instanced wgpu draw calls, and named render
//! layers composite the frame in registration order.
//!
//! Start with `use eldr::prelude::*`, build a [`Game`](game::Game) out of
//! [`Scene`](scene::Scene)s and [`World`](ecs::World)s, and hand it to a
//! [`WindowRunner`](window::WindowRunner).

pub mod animation;
pub mod asset;
pub mod ecs;
pub mod error;
pub mod events;
pub mod game;
pub mod input;
pub mod math;
pub mod pooling;
pub mod prelude;
pub mod render;
pub mod scene;
pub mod space;
pub mod time;
pub mod window;
