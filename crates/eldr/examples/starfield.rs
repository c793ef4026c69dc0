//! A drifting starfield: hundreds of sprites, one instanced draw call.
//!
//! Run with `cargo run --example starfield`.

use std::any::TypeId;

use eldr::prelude::*;

const STAR_COUNT: usize = 400;
const STAR_SIZE: f32 = 4.0;

/// Moves stars left and wraps them to the right edge.
struct DriftSystem {
    required: [TypeId; 2],
    surface: Vec2,
}

impl DriftSystem {
    fn new(surface: Vec2) -> Self {
        Self {
            required: [TypeId::of::<Position>(), TypeId::of::<Velocity>()],
            surface,
        }
    }
}

#[derive(Clone, Copy)]
struct Velocity(Vec2);

impl System for DriftSystem {
    fn name(&self) -> &str {
        "drift"
    }

    fn required_components(&self) -> &[TypeId] {
        &self.required
    }

    fn run(&mut self, store: &mut EntityStore, entity: EntityId, time: &Time) -> Result<()> {
        let velocity = store.component_required::<Velocity>(entity)?.0;
        let position = store.component_required_mut::<Position>(entity)?;
        position.0 += velocity * time.delta_secs();
        if position.0.x < -STAR_SIZE {
            position.0.x = self.surface.x + STAR_SIZE;
        }
        Ok(())
    }
}

/// A procedural 4x4 star texture: bright center, dim corners.
fn star_pixels() -> Vec<u8> {
    let mut rgba = Vec::with_capacity(4 * 4 * 4);
    for y in 0..4u32 {
        for x in 0..4u32 {
            let edge = x == 0 || x == 3 || y == 0 || y == 3;
            let v = if edge { 96 } else { 255 };
            rgba.extend_from_slice(&[v, v, v, 255]);
        }
    }
    rgba
}

fn main() -> Result<()> {
    env_logger::init();

    WindowRunner::new("eldr starfield")
        .with_size(800.0, 600.0)
        .with_setup(|ctx| {
            let (width, height) = ctx.layers.window_size();
            ctx.layers
                .register_layer(RenderLayer::new("stars", width, height).with_clear_color([
                    0.01, 0.01, 0.03, 1.0,
                ]));
            let layer = ctx.layers.get_layer("stars").expect("layer just registered");

            let renderable = {
                let mut renderer = ctx.renderer.borrow_mut();
                Renderable {
                    geometry: renderer.create_quad_geometry(),
                    material: renderer.create_sprite_material(4, 4, &star_pixels()),
                }
            };

            let mut world = World::new();

            let mut camera = Entity::new("camera");
            camera.add(Position(Vec2::ZERO));
            camera.add(Camera::default());
            let camera_id = world.entities.spawn(camera);

            let mut batcher = Entity::new("star-batcher");
            batcher.add(RenderableBatch::new("stars"));
            let batcher_id = world.entities.spawn(batcher);

            // Deterministic pseudo-random star placement.
            let mut seed = 0x2545f491u32;
            let mut next = move || {
                seed ^= seed << 13;
                seed ^= seed >> 17;
                seed ^= seed << 5;
                (seed as f32 / u32::MAX as f32).abs()
            };

            let mut pool: ObjectPool<Entity> = ObjectPool::new(
                move || {
                    let mut star = Entity::new("star");
                    star.add(Sprite::new("stars", renderable, STAR_SIZE, STAR_SIZE));
                    star
                },
                |_| {},
            );

            for _ in 0..STAR_COUNT {
                let mut star = pool.get_or_create();
                let depth = next();
                star.add(Position(Vec2::new(next() * width, next() * height)));
                star.add(Velocity(Vec2::new(-20.0 - depth * 80.0, 0.0)));
                star.add(Scale(Vec2::splat(0.5 + depth)));
                world.entities.spawn(star);
            }

            let batching = SpriteBatchingSystem::new(&world.entities, batcher_id)
                .expect("batcher entity holds a batch");
            let render =
                RenderSystem::new(&world.entities, layer, camera_id, ctx.renderer.clone())
                    .expect("camera entity holds Position and Camera");
            world.register_system(DriftSystem::new(Vec2::new(width, height)));
            world.register_system(batching);
            world.register_system(render);

            let mut scene = Scene::new("starfield");
            scene.add(world);
            ctx.game.register_scene(scene);
        })
        .run()
}
