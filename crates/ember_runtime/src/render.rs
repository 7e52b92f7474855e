//! Render extraction: the read-only pass a renderer runs each frame

use ember_core::ecs::{ComponentKind, ComponentSet, EcsError, Mesh, Scene, Transform};
use ember_core::glam::{Quat, Vec3};

/// Archetype drawn by the renderer.
pub const RENDERABLE: ComponentSet = ComponentSet::EMPTY
    .with(ComponentKind::Transform)
    .with(ComponentKind::Velocity)
    .with(ComponentKind::Mesh)
    .with(ComponentKind::RenderTag);

/// One draw submission.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderItem {
    pub entity: u32,
    pub mesh: u32,
    pub position: Vec3,
    pub rotation: Quat,
}

/// Collect draw items for every live renderable entity, in slot order.
pub fn extract(scene: &Scene) -> Result<Vec<RenderItem>, EcsError> {
    let components = scene.components();
    scene
        .query(RENDERABLE)
        .into_iter()
        .map(|entity| {
            let transform = components.get::<Transform>(entity)?;
            let mesh = components.get::<Mesh>(entity)?;
            Ok(RenderItem {
                entity,
                mesh: mesh.id,
                position: transform.position,
                rotation: transform.rotation,
            })
        })
        .collect()
}
