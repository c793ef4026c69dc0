//! Top-level game container: clock plus scenes.

use log::info;

use crate::error::{Result, SceneUpdateError};
use crate::scene::Scene;
use crate::time::Time;

/// Owns the frame clock and the list of active scenes.
///
/// Each frame, every registered scene is updated with the shared clock.
/// Scenes are isolated from each other's failures: a scene that errors does
/// not prevent later scenes from updating that frame, and all failures are
/// collected into one [`SceneUpdateError`].
pub struct Game {
    pub time: Time,
    scenes: Vec<Scene>,
    stopped: bool,
}

impl Game {
    pub fn new() -> Self {
        Self {
            time: Time::new(),
            scenes: Vec::new(),
            stopped: false,
        }
    }

    /// Add a scene. Scenes update in registration order.
    pub fn register_scene(&mut self, scene: Scene) {
        info!("registering scene `{}`", scene.name());
        self.scenes.push(scene);
    }

    /// Remove a scene by name, stopping it first. Returns the scene so the
    /// caller can re-register it later, or `None` if no scene matched.
    pub fn deregister_scene(&mut self, name: &str) -> Option<Scene> {
        let index = self.scenes.iter().position(|s| s.name() == name)?;
        let mut scene = self.scenes.remove(index);
        scene.stop();
        Some(scene)
    }

    pub fn scene_count(&self) -> usize {
        self.scenes.len()
    }

    /// Advance the clock and update every scene once.
    ///
    /// Every scene gets its update even when an earlier one fails; the
    /// failures, if any, are returned together.
    pub fn run(&mut self, timestamp_ms: f64) -> Result<(), SceneUpdateError> {
        self.time.update(timestamp_ms);

        let mut failures = Vec::new();
        for scene in &mut self.scenes {
            if let Err(err) = scene.update(&self.time) {
                failures.push((scene.name().to_string(), err));
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(SceneUpdateError { failures })
        }
    }

    /// Stop every scene. Idempotent.
    pub fn stop(&mut self) {
        if self.stopped {
            return;
        }
        self.stopped = true;
        info!("stopping game");
        for scene in &mut self.scenes {
            scene.stop();
        }
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}
