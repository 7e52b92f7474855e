// scene.rs - Aggregate root: entities, component storage, archetypes, systems
//
// Every per-slot structure (allocator slots, component containers,
// archetype assignments) grows together, so any live entity index is a
// valid index into all of them.

use crate::ecs::{
    ArchetypeId, ArchetypeRegistry, Component, ComponentKind, ComponentSet, ComponentStorage,
    Dispatcher, EcsError, Entity, EntityAllocator, SystemDescriptor, SystemHandle,
    SystemRegistrationError,
};
use tracing::{debug, trace, warn};

/// The ECS world: owns every entity, component and system.
pub struct Scene {
    entities: EntityAllocator,
    components: ComponentStorage,
    archetypes: ArchetypeRegistry,
    dispatcher: Dispatcher,
}

impl Scene {
    /// Create a scene with `initial_capacity` free entity slots.
    pub fn new(initial_capacity: u32) -> Self {
        let capacity = initial_capacity as usize;
        Self {
            entities: EntityAllocator::with_capacity(initial_capacity),
            components: ComponentStorage::with_capacity(capacity),
            archetypes: ArchetypeRegistry::with_capacity(capacity),
            dispatcher: Dispatcher::new(),
        }
    }

    /// Allocate a live entity, growing every per-slot structure by one when
    /// no freed slot is available.
    pub fn new_entity(&mut self) -> Entity {
        if !self.entities.has_free() {
            self.components.expand(1);
            self.archetypes.expand(1);
            let entity = self.entities.allocate();
            debug_assert!(self.is_consistent(), "per-slot structures diverged");
            debug!(
                index = entity.index(),
                capacity = self.capacity(),
                "grew scene capacity"
            );
            return entity;
        }

        let entity = self.entities.allocate();
        trace!(%entity, "allocated entity");
        entity
    }

    /// Free the entity's slot. Stale handles are ignored and return `false`.
    ///
    /// Component values stay in place until the slot is reused; only the
    /// archetype assignment is cleared.
    pub fn delete_entity(&mut self, entity: Entity) -> bool {
        if !self.entities.deallocate(entity) {
            warn!(%entity, "ignoring delete of stale entity");
            return false;
        }
        let cleared = self.archetypes.clear(entity.index());
        debug_assert!(cleared.is_ok(), "archetype table shorter than entity slots");
        trace!(%entity, "deleted entity");
        true
    }

    /// Whether `entity` still refers to a live slot.
    pub fn is_active(&self, entity: Entity) -> bool {
        self.entities.is_active(entity)
    }

    /// Attach (or overwrite) a component, returning the entity's new archetype.
    pub fn add_component<T: Component>(
        &mut self,
        entity: Entity,
        value: T,
    ) -> Result<ArchetypeId, EcsError> {
        self.check_live(entity)?;
        self.components.set(entity.index(), value)?;
        self.archetypes.add_component(entity.index(), T::KIND)
    }

    /// Handle-checked read of a component the entity actually has.
    pub fn component<T: Component>(&self, entity: Entity) -> Option<&T> {
        if !self.has_component(entity, T::KIND) {
            return None;
        }
        self.components.get(entity.index()).ok()
    }

    /// Handle-checked mutable access to a component the entity has.
    pub fn component_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        if !self.has_component(entity, T::KIND) {
            return None;
        }
        self.components.get_mut(entity.index()).ok()
    }

    pub fn has_component(&self, entity: Entity, kind: ComponentKind) -> bool {
        self.is_active(entity) && self.archetypes.components_of(entity.index()).contains(kind)
    }

    /// Archetype of a live entity; `None` for stale handles or entities
    /// without components.
    pub fn archetype_of(&self, entity: Entity) -> Option<ArchetypeId> {
        if !self.is_active(entity) {
            return None;
        }
        self.archetypes.archetype_of(entity.index())
    }

    /// Live entity indices whose archetype is exactly `archetype`.
    pub fn filter_entities(&self, archetype: ArchetypeId) -> Vec<u32> {
        self.archetypes.filter_entities(archetype)
    }

    /// Live entity indices whose component set is exactly `components`.
    pub fn query(&self, components: ComponentSet) -> Vec<u32> {
        self.archetypes
            .find(components)
            .map(|archetype| self.archetypes.filter_entities(archetype))
            .unwrap_or_default()
    }

    /// Add a system to the end of the dispatch order.
    pub fn register_system<F>(
        &mut self,
        descriptor: SystemDescriptor,
        system: F,
    ) -> Result<SystemHandle, SystemRegistrationError>
    where
        F: FnMut(f32, &[u32], &mut ComponentStorage) + Send + 'static,
    {
        self.dispatcher
            .register(descriptor, &mut self.archetypes, Box::new(system))
    }

    /// Advance every registered system by one tick.
    pub fn update(&mut self, dt: f32) {
        self.dispatcher
            .run(dt, &self.archetypes, &mut self.components);
    }

    /// Raw, index-based component access for renderers.
    ///
    /// No liveness checks: only read indices obtained from a query or a
    /// live handle.
    pub fn components(&self) -> &ComponentStorage {
        &self.components
    }

    pub fn entities(&self) -> &EntityAllocator {
        &self.entities
    }

    pub fn archetypes(&self) -> &ArchetypeRegistry {
        &self.archetypes
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Number of entity slots (free or live).
    pub fn capacity(&self) -> usize {
        self.entities.capacity()
    }

    /// Number of live entities.
    pub fn entity_count(&self) -> usize {
        self.entities.active_count()
    }

    /// Whether every per-slot structure has the same length.
    pub fn is_consistent(&self) -> bool {
        let capacity = self.entities.capacity();
        self.components.is_aligned()
            && self.components.capacity() == capacity
            && self.archetypes.capacity() == capacity
    }

    fn check_live(&self, entity: Entity) -> Result<(), EcsError> {
        if self.entities.is_active(entity) {
            Ok(())
        } else {
            warn!(%entity, "rejected stale entity handle");
            Err(EcsError::StaleHandle { entity })
        }
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(0)
    }
}
