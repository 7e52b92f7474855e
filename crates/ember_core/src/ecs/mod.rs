//! Entity Component System core types.
//!
//! Entities are generational handles into fixed slots. Every component
//! kind lives in its own dense container indexed directly by the entity
//! slot, and each slot is tagged with the archetype (the exact set of
//! component kinds) it currently has. Systems declare the set they need
//! and are handed the matching slot indices once per tick.

mod archetype;
mod component;
mod entity;
mod error;
mod id_allocator;
mod scene;
mod storage;
mod system_descriptor;
mod system_handle;
mod system_registration_error;
mod system_registry;

pub use archetype::{Archetype, ArchetypeAssignment, ArchetypeId, ArchetypeRegistry};
pub use component::{
    Component, ComponentKind, ComponentSet, EventListener, Mesh, RenderTag, Transform, Velocity,
    MAX_COMPONENT_KINDS,
};
pub use entity::{AllocatorSlot, Entity, EntityAllocator, Generation};
pub use error::EcsError;
pub use id_allocator::IdAllocator;
pub use scene::Scene;
pub use storage::{ColumnsMut, ComponentStorage};
pub use system_descriptor::SystemDescriptor;
pub use system_handle::SystemHandle;
pub use system_registration_error::SystemRegistrationError;
pub use system_registry::{Dispatcher, SystemFn};

/// Allocate an entity and attach every listed component to it.
///
/// Evaluates to `Result<Entity, EcsError>`.
///
/// ```ignore
/// let entity = spawn!(scene, Transform::default(), Velocity::new(1.0, 0.0, 0.0))?;
/// ```
#[macro_export]
macro_rules! spawn {
    ($scene:expr $(, $component:expr)+ $(,)?) => {{
        let scene: &mut $crate::ecs::Scene = &mut $scene;
        let entity = scene.new_entity();
        let mut result: ::std::result::Result<$crate::ecs::Entity, $crate::ecs::EcsError> =
            Ok(entity);
        $(
            if result.is_ok() {
                if let Err(err) = scene.add_component(entity, $component) {
                    result = Err(err);
                }
            }
        )+
        result
    }};
}
