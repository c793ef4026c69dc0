//! Keyboard and mouse state, sampled per frame.
//!
//! The window runner feeds winit events into an [`InputSnapshot`]; systems
//! read it through a shared handle. `pressed` is edge-triggered (true only on
//! the frame the button went down), `held` is level-triggered.

use std::collections::HashSet;
use std::hash::Hash;

pub use winit::event::MouseButton;
pub use winit::keyboard::KeyCode;

use crate::math::Vec2;

/// Per-frame press state for one class of button.
#[derive(Debug, Clone)]
pub struct ButtonSet<T: Eq + Hash + Copy> {
    held: HashSet<T>,
    pressed: HashSet<T>,
    released: HashSet<T>,
}

impl<T: Eq + Hash + Copy> ButtonSet<T> {
    pub fn new() -> Self {
        Self {
            held: HashSet::new(),
            pressed: HashSet::new(),
            released: HashSet::new(),
        }
    }

    pub fn press(&mut self, button: T) {
        if self.held.insert(button) {
            self.pressed.insert(button);
        }
    }

    pub fn release(&mut self, button: T) {
        if self.held.remove(&button) {
            self.released.insert(button);
        }
    }

    /// Down right now, regardless of when it went down.
    pub fn held(&self, button: T) -> bool {
        self.held.contains(&button)
    }

    /// Went down this frame.
    pub fn pressed(&self, button: T) -> bool {
        self.pressed.contains(&button)
    }

    /// Went up this frame.
    pub fn released(&self, button: T) -> bool {
        self.released.contains(&button)
    }

    /// Clear the edge sets at a frame boundary. Held state carries over.
    pub fn next_frame(&mut self) {
        self.pressed.clear();
        self.released.clear();
    }
}

impl<T: Eq + Hash + Copy> Default for ButtonSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Input state for the current frame.
#[derive(Debug, Clone, Default)]
pub struct InputSnapshot {
    pub keys: ButtonSet<KeyCode>,
    pub mouse: ButtonSet<MouseButton>,
    /// Cursor position in surface pixels, origin top-left.
    pub cursor: Vec2,
    /// Scroll wheel movement this frame, in lines.
    pub wheel_delta: f32,
}

impl InputSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Roll the snapshot over to the next frame.
    pub fn next_frame(&mut self) {
        self.keys.next_frame();
        self.mouse.next_frame();
        self.wheel_delta = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pressed_is_edge_triggered() {
        let mut keys = ButtonSet::new();
        keys.press(KeyCode::Space);
        assert!(keys.pressed(KeyCode::Space));
        assert!(keys.held(KeyCode::Space));

        keys.next_frame();
        assert!(!keys.pressed(KeyCode::Space));
        assert!(keys.held(KeyCode::Space));
    }

    #[test]
    fn repeat_press_does_not_retrigger() {
        let mut keys = ButtonSet::new();
        keys.press(KeyCode::KeyW);
        keys.next_frame();
        // OS key repeat sends press events while held.
        keys.press(KeyCode::KeyW);
        assert!(!keys.pressed(KeyCode::KeyW));
        assert!(keys.held(KeyCode::KeyW));
    }

    #[test]
    fn release_clears_held() {
        let mut keys = ButtonSet::new();
        keys.press(KeyCode::KeyA);
        keys.release(KeyCode::KeyA);
        assert!(!keys.held(KeyCode::KeyA));
        assert!(keys.released(KeyCode::KeyA));

        keys.next_frame();
        assert!(!keys.released(KeyCode::KeyA));
    }

    #[test]
    fn wheel_delta_resets_each_frame() {
        let mut input = InputSnapshot::new();
        input.wheel_delta = 2.0;
        input.next_frame();
        assert_eq!(input.wheel_delta, 0.0);
    }
}
