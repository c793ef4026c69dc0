//! The [`World`]: entity storage plus system scheduling.

use log::{debug, warn};

use crate::ecs::{EntityStore, System};
use crate::error::Result;
use crate::scene::{Stoppable, Updatable};
use crate::time::Time;

/// Owns an [`EntityStore`] and a list of systems, and drives one tick of the
/// simulation per update.
///
/// Systems run in registration order. A tick is fail-fast: the first error a
/// system returns aborts the remainder of the tick and propagates to the
/// caller, leaving any writes from earlier systems in place.
pub struct World {
    pub entities: EntityStore,
    systems: Vec<Box<dyn System>>,
    stopped: bool,
}

impl World {
    pub fn new() -> Self {
        Self {
            entities: EntityStore::new(),
            systems: Vec::new(),
            stopped: false,
        }
    }

    /// Append a system. Order of registration is order of execution.
    pub fn register_system(&mut self, system: impl System + 'static) {
        debug!("registering system `{}`", system.name());
        self.systems.push(Box::new(system));
    }

    pub fn system_count(&self) -> usize {
        self.systems.len()
    }

    /// Run one tick: for each system in registration order, match entities,
    /// hand the list to `before_all`, then `run` over whatever it returned.
    pub fn tick(&mut self, time: &Time) -> Result<()> {
        for system in &mut self.systems {
            // Matching is re-evaluated per system so one system's component
            // edits are visible to the next.
            let matched = self.entities.filter_by_components(system.required_components());
            let ordered = system.before_all(&mut self.entities, matched, time)?;
            for entity in ordered {
                // Entities despawned earlier in this tick simply drop out.
                if !self.entities.is_alive(entity) {
                    continue;
                }
                system.run(&mut self.entities, entity, time)?;
            }
        }
        Ok(())
    }

    /// Stop every system. Idempotent: the second and later calls do nothing.
    pub fn stop(&mut self) {
        if self.stopped {
            warn!("world stopped twice, ignoring");
            return;
        }
        self.stopped = true;
        for system in &mut self.systems {
            debug!("stopping system `{}`", system.name());
            system.stop();
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl Updatable for World {
    fn update(&mut self, time: &Time) -> Result<()> {
        self.tick(time)
    }
}

impl Stoppable for World {
    fn stop(&mut self) {
        World::stop(self);
    }
}
