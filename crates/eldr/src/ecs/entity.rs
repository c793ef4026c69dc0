//! Entities, components, and the generational entity store.
//!
//! An [`EntityId`] is a slot index plus a generation counter. Despawning an
//! entity bumps its slot's generation, so handles held by stale systems fail
//! loudly instead of silently addressing whatever got recycled into the slot.
//!
//! ```text
//!   EntityId { index: 2, generation: 0 }     slots
//!        |                                  +---------+
//!        +--------------------------------> | 0: Some |
//!                                           | 1: None |  <- free_list: [1]
//!                                           | 2: Some |
//!                                           +---------+
//! ```

use std::any::{Any, TypeId};
use std::collections::HashMap;

use crate::error::{MissingComponentError, Result, StaleEntityError};

/// A handle to an entity. Copyable, hashable, and safe to hold across frames:
/// lookups through a stale handle return an error rather than aliased data.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityId {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl std::fmt::Debug for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entity({}v{})", self.index, self.generation)
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

/// A named bag of components.
///
/// Component types are addressed by [`TypeId`]; an entity holds at most one
/// component of each type. Adding a component of a type the entity already
/// holds replaces the old value.
pub struct Entity {
    name: String,
    /// Disabled entities are skipped by system scheduling but stay alive.
    pub enabled: bool,
    components: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl Entity {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            enabled: true,
            components: HashMap::new(),
        }
    }

    /// Diagnostic name. Names are not unique.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attach a component, replacing any existing component of the same type.
    pub fn add<C: Any + Send + Sync>(&mut self, component: C) -> &mut Self {
        self.components.insert(TypeId::of::<C>(), Box::new(component));
        self
    }

    /// Detach and return a component, if present.
    pub fn remove<C: Any + Send + Sync>(&mut self) -> Option<C> {
        self.components
            .remove(&TypeId::of::<C>())
            .and_then(|boxed| boxed.downcast::<C>().ok())
            .map(|boxed| *boxed)
    }

    pub fn component<C: Any + Send + Sync>(&self) -> Option<&C> {
        self.components
            .get(&TypeId::of::<C>())
            .and_then(|boxed| boxed.downcast_ref::<C>())
    }

    pub fn component_mut<C: Any + Send + Sync>(&mut self) -> Option<&mut C> {
        self.components
            .get_mut(&TypeId::of::<C>())
            .and_then(|boxed| boxed.downcast_mut::<C>())
    }

    /// Borrow a component that must be present, per a system's declared
    /// requirements.
    pub fn component_required<C: Any + Send + Sync>(&self) -> Result<&C, MissingComponentError> {
        self.component::<C>().ok_or_else(|| MissingComponentError {
            entity: self.name.clone(),
            component: std::any::type_name::<C>(),
        })
    }

    pub fn component_required_mut<C: Any + Send + Sync>(
        &mut self,
    ) -> Result<&mut C, MissingComponentError> {
        if self.components.contains_key(&TypeId::of::<C>()) {
            Ok(self.component_mut::<C>().unwrap())
        } else {
            Err(MissingComponentError {
                entity: self.name.clone(),
                component: std::any::type_name::<C>(),
            })
        }
    }

    pub fn has<C: Any + Send + Sync>(&self) -> bool {
        self.components.contains_key(&TypeId::of::<C>())
    }

    /// Whether the entity holds every listed component type.
    pub fn has_components(&self, types: &[TypeId]) -> bool {
        types.iter().all(|t| self.components.contains_key(t))
    }
}

impl std::fmt::Debug for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Entity")
            .field("name", &self.name)
            .field("enabled", &self.enabled)
            .field("components", &self.components.len())
            .finish()
    }
}

/// Storage for all live entities, with generational handle validation.
///
/// Slots are recycled through a free list, and iteration order is the
/// spawn-order list `order`, so scheduling is deterministic regardless of
/// recycling history.
pub struct EntityStore {
    slots: Vec<Option<Entity>>,
    generations: Vec<u32>,
    free_list: Vec<u32>,
    order: Vec<EntityId>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            order: Vec::new(),
        }
    }

    /// Add an entity to the store, returning its handle.
    pub fn spawn(&mut self, entity: Entity) -> EntityId {
        let id = match self.free_list.pop() {
            Some(index) => {
                self.slots[index as usize] = Some(entity);
                EntityId {
                    index,
                    generation: self.generations[index as usize],
                }
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Some(entity));
                self.generations.push(0);
                EntityId {
                    index,
                    generation: 0,
                }
            }
        };
        self.order.push(id);
        id
    }

    /// Remove an entity, invalidating its handle. Returns the entity, or
    /// `None` if the handle was already stale.
    pub fn despawn(&mut self, id: EntityId) -> Option<Entity> {
        if !self.is_alive(id) {
            return None;
        }
        let entity = self.slots[id.index as usize].take();
        self.generations[id.index as usize] += 1;
        self.free_list.push(id.index);
        self.order.retain(|other| *other != id);
        entity
    }

    pub fn is_alive(&self, id: EntityId) -> bool {
        self.generations.get(id.index as usize) == Some(&id.generation)
            && self.slots[id.index as usize].is_some()
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        if !self.is_alive(id) {
            return None;
        }
        self.slots[id.index as usize].as_ref()
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        if !self.is_alive(id) {
            return None;
        }
        self.slots[id.index as usize].as_mut()
    }

    pub fn get_required(&self, id: EntityId) -> Result<&Entity, StaleEntityError> {
        self.get(id).ok_or(StaleEntityError(id))
    }

    pub fn get_required_mut(&mut self, id: EntityId) -> Result<&mut Entity, StaleEntityError> {
        if self.is_alive(id) {
            Ok(self.slots[id.index as usize].as_mut().unwrap())
        } else {
            Err(StaleEntityError(id))
        }
    }

    /// Borrow a component from a live entity, or fail with the reason.
    pub fn component_required<C: Any + Send + Sync>(&self, id: EntityId) -> Result<&C> {
        let entity = self.get_required(id)?;
        Ok(entity.component_required::<C>()?)
    }

    pub fn component_required_mut<C: Any + Send + Sync>(&mut self, id: EntityId) -> Result<&mut C> {
        let entity = self.get_required_mut(id)?;
        Ok(entity.component_required_mut::<C>()?)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Handles of every enabled entity holding all listed component types,
    /// in spawn order.
    pub fn filter_by_components(&self, types: &[TypeId]) -> Vec<EntityId> {
        self.order
            .iter()
            .copied()
            .filter(|id| {
                self.get(*id)
                    .is_some_and(|e| e.enabled && e.has_components(types))
            })
            .collect()
    }

    /// Iterate live entity handles in spawn order.
    pub fn ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.order.iter().copied()
    }
}

impl Default for EntityStore {
    fn default() -> Self {
        Self::new()
    }
}
