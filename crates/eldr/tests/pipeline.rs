//! End-to-end render pipeline test against a recording backend.
//!
//! Exercises the public path a real game takes: spawn sprite and camera
//! entities, register the batching and render systems on a world inside a
//! scene, drive the game clock, and assert on the draw calls the backend
//! receives.

use std::cell::RefCell;
use std::rc::Rc;

use eldr::prelude::*;

struct RecordingBackend {
    surface: (u32, u32),
    clears: Vec<[f64; 4]>,
    draws: Vec<(Renderable, Vec<[f32; 9]>)>,
}

impl RecordingBackend {
    fn new(width: u32, height: u32) -> Self {
        Self {
            surface: (width, height),
            clears: Vec::new(),
            draws: Vec::new(),
        }
    }
}

impl RenderBackend for RecordingBackend {
    fn surface_size(&self) -> (u32, u32) {
        self.surface
    }

    fn clear(&mut self, color: [f64; 4]) -> Result<()> {
        self.clears.push(color);
        Ok(())
    }

    fn draw_instanced(
        &mut self,
        geometry: GeometryHandle,
        material: MaterialHandle,
        transforms: &[[f32; 9]],
    ) -> Result<()> {
        self.draws
            .push((Renderable { geometry, material }, transforms.to_vec()));
        Ok(())
    }
}

fn renderable() -> Renderable {
    Renderable {
        geometry: GeometryHandle(0),
        material: MaterialHandle(0),
    }
}

/// Sprite with no bleed and a top-left pivot, so its transform maps the quad
/// origin exactly onto its position.
fn corner_sprite(position: Vec2) -> Entity {
    let mut entity = Entity::new("sprite");
    entity.add(
        Sprite::new("main", renderable(), 16.0, 16.0)
            .with_bleed(0.0)
            .with_pivot(Vec2::ZERO),
    );
    entity.add(Position(position));
    entity
}

fn camera_entity() -> Entity {
    let mut entity = Entity::new("camera");
    entity.add(Position(Vec2::ZERO));
    entity.add(Camera::default());
    entity
}

fn build_game(
    backend: Rc<RefCell<RecordingBackend>>,
    sprites: Vec<Entity>,
) -> Game {
    let layer = RenderLayer::new("main", 800.0, 600.0);

    let mut world = World::new();
    let camera = world.entities.spawn(camera_entity());

    let mut batcher = Entity::new("batcher");
    batcher.add(RenderableBatch::new("main"));
    let batcher = world.entities.spawn(batcher);

    for sprite in sprites {
        world.entities.spawn(sprite);
    }

    // Batching must run before rendering so the frame draws this tick's
    // instances.
    let batching = SpriteBatchingSystem::new(&world.entities, batcher).unwrap();
    let render = RenderSystem::new(&world.entities, &layer, camera, backend).unwrap();
    world.register_system(batching);
    world.register_system(render);

    let mut scene = Scene::new("gameplay");
    scene.add(world);

    let mut game = Game::new();
    game.register_scene(scene);
    game
}

#[test]
fn one_frame_is_one_clear_and_one_draw() {
    let backend = Rc::new(RefCell::new(RecordingBackend::new(800, 600)));
    let mut game = build_game(backend.clone(), vec![corner_sprite(Vec2::new(100.0, 50.0))]);

    game.run(16.0).unwrap();

    let backend = backend.borrow();
    assert_eq!(backend.clears.len(), 1);
    assert_eq!(backend.draws.len(), 1);
    assert_eq!(backend.draws[0].1.len(), 1);
}

#[test]
fn instance_transform_places_sprite_in_clip_space() {
    let backend = Rc::new(RefCell::new(RecordingBackend::new(800, 600)));
    let mut game = build_game(backend.clone(), vec![corner_sprite(Vec2::new(100.0, 50.0))]);

    game.run(16.0).unwrap();

    // Pixel (100, 50) on an 800x600 surface is clip (-0.75, 0.8333). With a
    // top-left pivot the transform's translation column is exactly that.
    let backend = backend.borrow();
    let transform = &backend.draws[0].1[0];
    let matrix = Mat3::from_cols_array(transform);
    let origin = matrix.transform_point2(Vec2::ZERO);
    assert!((origin.x - -0.75).abs() < 1e-5);
    assert!((origin.y - 0.833_333_3).abs() < 1e-5);
}

#[test]
fn repeated_frames_do_not_accumulate_instances() {
    let backend = Rc::new(RefCell::new(RecordingBackend::new(800, 600)));
    let mut game = build_game(backend.clone(), vec![corner_sprite(Vec2::ZERO)]);

    game.run(16.0).unwrap();
    game.run(32.0).unwrap();
    game.run(48.0).unwrap();

    let backend = backend.borrow();
    assert_eq!(backend.draws.len(), 3);
    for (_, transforms) in &backend.draws {
        assert_eq!(transforms.len(), 1);
    }
}

#[test]
fn sprites_sharing_a_renderable_become_one_draw() {
    let backend = Rc::new(RefCell::new(RecordingBackend::new(800, 600)));
    let mut game = build_game(
        backend.clone(),
        vec![
            corner_sprite(Vec2::new(0.0, 0.0)),
            corner_sprite(Vec2::new(32.0, 0.0)),
            corner_sprite(Vec2::new(64.0, 0.0)),
        ],
    );

    game.run(16.0).unwrap();

    let backend = backend.borrow();
    assert_eq!(backend.draws.len(), 1);
    assert_eq!(backend.draws[0].1.len(), 3);
}
