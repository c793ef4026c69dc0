//! Logical coordinate space for a render layer.
//!
//! A [`Space`] describes the pixel dimensions a layer draws in. Cameras and
//! layout code subscribe to its change event instead of polling, so a window
//! resize propagates to everything that cares in one pass.

use crate::events::Event;
use crate::math::Vec2;

/// A 2D coordinate space with a change notification.
pub struct Space {
    width: f32,
    height: f32,
    center: Vec2,
    on_change: Event,
}

impl Space {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            center: Vec2::new(width / 2.0, height / 2.0),
            on_change: Event::new("spaceChange"),
        }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn center(&self) -> Vec2 {
        self.center
    }

    /// Resize the space and notify subscribers. The event is raised exactly
    /// once per call, after both dimensions and the center are updated.
    pub fn set_size(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
        self.center = Vec2::new(width / 2.0, height / 2.0);
        self.on_change.raise();
    }

    /// Subscribe to size changes.
    pub fn on_change(&mut self, listener: impl FnMut() + 'static) {
        self.on_change.subscribe(listener);
    }
}

impl std::fmt::Debug for Space {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Space")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}
