//! Scenes: named groups of updatable objects.
//!
//! A [`Scene`] owns an ordered list of [`SceneObject`]s (usually
//! [`World`](crate::ecs::World)s) and updates them in insertion order each
//! frame. The [`Game`](crate::game::Game) in turn owns the scenes.

use log::{info, warn};

use crate::error::Result;
use crate::time::Time;

/// Something that advances once per frame.
pub trait Updatable {
    fn update(&mut self, time: &Time) -> Result<()>;
}

/// Something that releases resources when the game shuts down.
pub trait Stoppable {
    /// Must be idempotent.
    fn stop(&mut self);
}

/// An object a scene can own. Blanket-implemented for anything that is both
/// updatable and stoppable.
pub trait SceneObject: Updatable + Stoppable {}

impl<T: Updatable + Stoppable> SceneObject for T {}

/// A named, ordered collection of scene objects.
pub struct Scene {
    name: String,
    objects: Vec<Box<dyn SceneObject>>,
    stopped: bool,
}

impl Scene {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            objects: Vec::new(),
            stopped: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Append an object. Update order is insertion order.
    pub fn add(&mut self, object: impl SceneObject + 'static) {
        self.objects.push(Box::new(object));
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Update every object in insertion order. Fail-fast: the first error
    /// aborts the rest of this scene's frame.
    pub fn update(&mut self, time: &Time) -> Result<()> {
        for object in &mut self.objects {
            object.update(time)?;
        }
        Ok(())
    }

    /// Stop every object. Idempotent.
    pub fn stop(&mut self) {
        if self.stopped {
            warn!("scene `{}` stopped twice, ignoring", self.name);
            return;
        }
        self.stopped = true;
        info!("stopping scene `{}`", self.name);
        for object in &mut self.objects {
            object.stop();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::error::{Error, PoolEmptyError};

    struct Probe {
        label: &'static str,
        log: Rc<RefCell<Vec<String>>>,
        fail: bool,
    }

    impl Updatable for Probe {
        fn update(&mut self, _time: &Time) -> Result<()> {
            self.log.borrow_mut().push(format!("update {}", self.label));
            if self.fail {
                Err(Error::from(PoolEmptyError))
            } else {
                Ok(())
            }
        }
    }

    impl Stoppable for Probe {
        fn stop(&mut self) {
            self.log.borrow_mut().push(format!("stop {}", self.label));
        }
    }

    #[test]
    fn updates_in_insertion_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut scene = Scene::new("test");
        scene.add(Probe {
            label: "a",
            log: log.clone(),
            fail: false,
        });
        scene.add(Probe {
            label: "b",
            log: log.clone(),
            fail: false,
        });

        scene.update(&Time::new()).unwrap();
        assert_eq!(*log.borrow(), vec!["update a", "update b"]);
    }

    #[test]
    fn update_is_fail_fast() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut scene = Scene::new("test");
        scene.add(Probe {
            label: "a",
            log: log.clone(),
            fail: true,
        });
        scene.add(Probe {
            label: "b",
            log: log.clone(),
            fail: false,
        });

        assert!(scene.update(&Time::new()).is_err());
        assert_eq!(*log.borrow(), vec!["update a"]);
    }

    #[test]
    fn stop_reaches_every_object_once() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut scene = Scene::new("test");
        scene.add(Probe {
            label: "a",
            log: log.clone(),
            fail: false,
        });

        scene.stop();
        scene.stop();
        assert_eq!(*log.borrow(), vec!["stop a"]);
    }
}
