//! Gameplay systems and the actors they drive

use ember_core::ecs::{
    ColumnsMut, ComponentKind, ComponentStorage, EcsError, Entity, Mesh, RenderTag, Scene,
    SystemDescriptor, SystemRegistrationError, Transform, Velocity,
};
use ember_core::glam::{Quat, Vec3};
use ember_core::spawn;

/// Radians per second applied by [`spin`].
pub const SPIN_RATE: f32 = std::f32::consts::FRAC_PI_2;

/// Integrate velocity into position.
pub fn movement(dt: f32, entities: &[u32], storage: &mut ComponentStorage) {
    let ColumnsMut {
        transforms,
        velocities,
        ..
    } = storage.split_mut();
    for &index in entities {
        let i = index as usize;
        transforms[i].position += velocities[i].linear * dt;
    }
}

/// Move and rotate renderable actors about +Y.
pub fn spin(dt: f32, entities: &[u32], storage: &mut ComponentStorage) {
    let ColumnsMut {
        transforms,
        velocities,
        ..
    } = storage.split_mut();
    let step = Quat::from_rotation_y(SPIN_RATE * dt);
    for &index in entities {
        let transform = &mut transforms[index as usize];
        transform.position += velocities[index as usize].linear * dt;
        transform.rotation = (step * transform.rotation).normalize();
    }
}

pub fn register(scene: &mut Scene) -> Result<(), SystemRegistrationError> {
    use ComponentKind as K;

    scene.register_system(
        SystemDescriptor::new("movement")
            .requires([K::Transform, K::Velocity])
            .writes([K::Transform]),
        movement,
    )?;
    scene.register_system(
        SystemDescriptor::new("spin")
            .requires([K::Transform, K::Velocity, K::Mesh, K::RenderTag])
            .writes([K::Transform]),
        spin,
    )?;
    Ok(())
}

/// Spawn the `n`th actor. Every third one is renderable.
pub fn spawn_actor(scene: &mut Scene, n: u32) -> Result<Entity, EcsError> {
    let x = n as f32;
    let transform = Transform::from_position(Vec3::new(x, 0.0, 0.0));
    let velocity = Velocity::new(1.0, 0.5 * (n % 4) as f32, 0.0);
    if n % 3 == 0 {
        spawn!(*scene, transform, velocity, Mesh { id: n % 8 }, RenderTag)
    } else {
        spawn!(*scene, transform, velocity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_core::ecs::ComponentSet;

    fn scene_with_actors(count: u32) -> (Scene, Vec<Entity>) {
        let mut scene = Scene::new(count);
        register(&mut scene).unwrap();
        let actors = (0..count)
            .map(|n| spawn_actor(&mut scene, n).unwrap())
            .collect();
        (scene, actors)
    }

    #[test]
    fn every_third_actor_is_renderable() {
        let (scene, actors) = scene_with_actors(6);
        let renderable = ComponentSet::from([
            ComponentKind::Transform,
            ComponentKind::Velocity,
            ComponentKind::Mesh,
            ComponentKind::RenderTag,
        ]);
        assert_eq!(scene.query(renderable), vec![actors[0].index(), actors[3].index()]);
        assert_eq!(
            scene
                .query(ComponentSet::from([ComponentKind::Transform, ComponentKind::Velocity]))
                .len(),
            4
        );
    }

    #[test]
    fn movement_and_spin_both_integrate_position() {
        let (mut scene, actors) = scene_with_actors(3);
        scene.update(0.5);

        let plain = scene.component::<Transform>(actors[1]).unwrap();
        assert_eq!(plain.position, Vec3::new(1.5, 0.25, 0.0));
        assert_eq!(plain.rotation, Quat::IDENTITY);

        let drawn = scene.component::<Transform>(actors[0]).unwrap();
        assert_eq!(drawn.position, Vec3::new(0.5, 0.0, 0.0));
        let expected = Quat::from_rotation_y(SPIN_RATE * 0.5);
        assert!(drawn.rotation.abs_diff_eq(expected, 1e-4));
    }

    #[test]
    fn registering_twice_is_rejected() {
        let (mut scene, _) = scene_with_actors(1);
        assert!(matches!(
            register(&mut scene),
            Err(SystemRegistrationError::DuplicateName { .. })
        ));
    }

    #[test]
    fn respawned_actor_reuses_slot() {
        let (mut scene, actors) = scene_with_actors(3);
        assert!(scene.delete_entity(actors[1]));
        let replacement = spawn_actor(&mut scene, 1).unwrap();
        assert_eq!(replacement.index(), actors[1].index());
        assert!(replacement.generation() > actors[1].generation());
        assert_eq!(scene.capacity(), 3);
    }
}
