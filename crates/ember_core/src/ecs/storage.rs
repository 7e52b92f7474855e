// storage.rs - Per-kind dense component containers
//
// One container per component kind, indexed directly by entity slot. All
// containers always have the same length, which equals entity capacity.
// No generation checks happen here; the scene validates handles first.

use crate::ecs::{
    Component, ComponentKind, EcsError, EventListener, Mesh, RenderTag, Transform, Velocity,
};

/// Dense, entity-index-aligned storage for every component kind.
#[derive(Clone, Debug, Default)]
pub struct ComponentStorage {
    pub(crate) transforms: Vec<Transform>,
    pub(crate) velocities: Vec<Velocity>,
    pub(crate) render_tags: Vec<RenderTag>,
    pub(crate) meshes: Vec<Mesh>,
    pub(crate) event_listeners: Vec<EventListener>,
}

impl ComponentStorage {
    /// Create storage with `capacity` default-valued slots per kind.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut storage = Self::default();
        storage.expand(capacity);
        storage
    }

    /// Append `by` default-valued slots to every container.
    pub fn expand(&mut self, by: usize) {
        let target = self.capacity() + by;
        self.transforms.resize(target, Default::default());
        self.velocities.resize(target, Default::default());
        self.render_tags.resize(target, Default::default());
        self.meshes.resize(target, Default::default());
        self.event_listeners.resize(target, Default::default());
        debug_assert!(self.is_aligned(), "component containers diverged");
    }

    /// Number of slots in every container.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.transforms.len()
    }

    /// Length of the container for `kind`.
    pub fn len_of(&self, kind: ComponentKind) -> usize {
        match kind {
            ComponentKind::Transform => self.transforms.len(),
            ComponentKind::Velocity => self.velocities.len(),
            ComponentKind::RenderTag => self.render_tags.len(),
            ComponentKind::Mesh => self.meshes.len(),
            ComponentKind::EventListener => self.event_listeners.len(),
        }
    }

    /// Container lengths in kind ordinal order.
    pub fn lens(&self) -> [usize; ComponentKind::COUNT] {
        ComponentKind::ALL.map(|kind| self.len_of(kind))
    }

    /// Whether every container has the same length.
    pub fn is_aligned(&self) -> bool {
        let capacity = self.capacity();
        self.lens().iter().all(|&len| len == capacity)
    }

    /// Overwrite the component of type `T` at slot `index`.
    pub fn set<T: Component>(&mut self, index: u32, value: T) -> Result<(), EcsError> {
        *self.get_mut::<T>(index)? = value;
        Ok(())
    }

    /// Read the component of type `T` at slot `index`.
    pub fn get<T: Component>(&self, index: u32) -> Result<&T, EcsError> {
        let capacity = self.capacity();
        T::column(self)
            .get(index as usize)
            .ok_or(EcsError::IndexOutOfBounds { index, capacity })
    }

    /// Mutably borrow the component of type `T` at slot `index`.
    pub fn get_mut<T: Component>(&mut self, index: u32) -> Result<&mut T, EcsError> {
        let capacity = self.capacity();
        T::column_mut(self)
            .get_mut(index as usize)
            .ok_or(EcsError::IndexOutOfBounds { index, capacity })
    }

    /// Whole container for `T`, indexed by entity slot.
    #[inline]
    pub fn column<T: Component>(&self) -> &[T] {
        T::column(self)
    }

    /// Whole mutable container for `T`, indexed by entity slot.
    #[inline]
    pub fn column_mut<T: Component>(&mut self) -> &mut [T] {
        T::column_mut(self)
    }

    /// Split into simultaneously borrowable mutable containers.
    pub fn split_mut(&mut self) -> ColumnsMut<'_> {
        ColumnsMut {
            transforms: &mut self.transforms,
            velocities: &mut self.velocities,
            render_tags: &mut self.render_tags,
            meshes: &mut self.meshes,
            event_listeners: &mut self.event_listeners,
        }
    }
}

/// Disjoint mutable views over every container, for systems that read one
/// kind while writing another.
pub struct ColumnsMut<'a> {
    pub transforms: &'a mut [Transform],
    pub velocities: &'a mut [Velocity],
    pub render_tags: &'a mut [RenderTag],
    pub meshes: &'a mut [Mesh],
    pub event_listeners: &'a mut [EventListener],
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn with_capacity_sizes_every_container() {
        let storage = ComponentStorage::with_capacity(3);
        assert_eq!(storage.capacity(), 3);
        assert_eq!(storage.lens(), [3; ComponentKind::COUNT]);
        assert!(storage.is_aligned());
    }

    #[test]
    fn expand_grows_all_containers_together() {
        let mut storage = ComponentStorage::with_capacity(2);
        storage.expand(1);
        assert_eq!(storage.lens(), [3; ComponentKind::COUNT]);
        storage.expand(0);
        assert_eq!(storage.capacity(), 3);
        assert_eq!(storage.get::<Mesh>(2), Ok(&Mesh::default()));
    }

    #[test]
    fn set_then_get_returns_value() {
        let mut storage = ComponentStorage::with_capacity(4);
        let tf = Transform::from_position(Vec3::new(1.0, 2.0, 3.0));
        storage.set(2, tf).unwrap();
        assert_eq!(storage.get::<Transform>(2), Ok(&tf));
        assert_eq!(storage.get::<Transform>(1), Ok(&Transform::default()));
    }

    #[test]
    fn out_of_bounds_access_fails() {
        let mut storage = ComponentStorage::with_capacity(2);
        let err = storage.set(2, Velocity::new(1.0, 0.0, 0.0)).unwrap_err();
        assert_eq!(
            err,
            EcsError::IndexOutOfBounds {
                index: 2,
                capacity: 2
            }
        );
        assert!(storage.get::<Velocity>(9).is_err());
    }

    #[test]
    fn split_columns_can_be_borrowed_together() {
        let mut storage = ComponentStorage::with_capacity(2);
        storage.set(1, Velocity::new(0.0, 2.0, 0.0)).unwrap();
        {
            let columns = storage.split_mut();
            columns.transforms[1].position += columns.velocities[1].linear;
            columns.velocities[1].linear = Vec3::ZERO;
        }
        assert_eq!(
            storage.get::<Transform>(1).unwrap().position,
            Vec3::new(0.0, 2.0, 0.0)
        );
        assert_eq!(storage.get::<Velocity>(1).unwrap().linear, Vec3::ZERO);
    }
}
