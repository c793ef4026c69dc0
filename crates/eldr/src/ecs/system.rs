//! The [`System`] trait.

use std::any::TypeId;

use crate::ecs::{EntityId, EntityStore};
use crate::error::Result;
use crate::time::Time;

/// A unit of per-frame behavior.
///
/// Each tick, the [`World`](crate::ecs::World) calls [`before_all`] once
/// with the matched entity list, then [`run`] for every entity the hook
/// returned. Systems run in registration order, so a system registered later
/// observes the writes of systems registered earlier within the same tick.
///
/// [`before_all`]: System::before_all
/// [`run`]: System::run
pub trait System {
    /// Diagnostic name, used in logs and error aggregation.
    fn name(&self) -> &str;

    /// Component types an entity must hold for [`run`](System::run) to be
    /// called on it.
    fn required_components(&self) -> &[TypeId];

    /// Per-tick hook, called once before any entity is processed. May
    /// re-order or filter the matched entities (depth sorting, say) or
    /// perform once-per-tick side effects. Default is identity.
    fn before_all(
        &mut self,
        _store: &mut EntityStore,
        matched: Vec<EntityId>,
        _time: &Time,
    ) -> Result<Vec<EntityId>> {
        Ok(matched)
    }

    /// Process one matching entity.
    fn run(&mut self, store: &mut EntityStore, entity: EntityId, time: &Time) -> Result<()>;

    /// Release resources. Called when the owning world stops; must be
    /// idempotent. Default is a no-op.
    fn stop(&mut self) {}
}
