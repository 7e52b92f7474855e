// component.rs - Component kinds, component sets and the built-in component types
//
// Kinds form a closed enum with dense ordinals. A set of kinds is a 64-bit
// mask where bit `i` is the kind with ordinal `i`, so iterating the bits in
// ascending order is the canonical sorted order of the set.

use crate::ecs::ComponentStorage;
use glam::{Quat, Vec3};
use std::fmt;

/// Upper bound on the number of component kinds a [`ComponentSet`] can hold.
pub const MAX_COMPONENT_KINDS: usize = u64::BITS as usize;

/// Every component kind the scene can store.
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ComponentKind {
    Transform = 0,
    Velocity = 1,
    RenderTag = 2,
    Mesh = 3,
    EventListener = 4,
}

const _: () = assert!(ComponentKind::COUNT <= MAX_COMPONENT_KINDS);

impl ComponentKind {
    pub const COUNT: usize = 5;

    /// All kinds in ordinal order.
    pub const ALL: [ComponentKind; Self::COUNT] = [
        ComponentKind::Transform,
        ComponentKind::Velocity,
        ComponentKind::RenderTag,
        ComponentKind::Mesh,
        ComponentKind::EventListener,
    ];

    #[inline]
    pub const fn ordinal(self) -> usize {
        self as usize
    }

    pub fn from_ordinal(ordinal: usize) -> Option<Self> {
        Self::ALL.get(ordinal).copied()
    }

    pub const fn name(self) -> &'static str {
        match self {
            ComponentKind::Transform => "Transform",
            ComponentKind::Velocity => "Velocity",
            ComponentKind::RenderTag => "RenderTag",
            ComponentKind::Mesh => "Mesh",
            ComponentKind::EventListener => "EventListener",
        }
    }

    #[inline]
    const fn bit(self) -> u64 {
        1 << self as u64
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Canonical, duplicate-free set of component kinds.
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct ComponentSet(u64);

impl ComponentSet {
    pub const EMPTY: ComponentSet = ComponentSet(0);

    pub const fn new() -> Self {
        Self::EMPTY
    }

    pub const fn single(kind: ComponentKind) -> Self {
        Self(kind.bit())
    }

    /// Copy of this set with `kind` added.
    #[must_use]
    pub const fn with(self, kind: ComponentKind) -> Self {
        Self(self.0 | kind.bit())
    }

    /// Add `kind`, returning `false` if it was already present.
    pub fn insert(&mut self, kind: ComponentKind) -> bool {
        let had = self.contains(kind);
        self.0 |= kind.bit();
        !had
    }

    #[inline]
    pub const fn contains(self, kind: ComponentKind) -> bool {
        self.0 & kind.bit() != 0
    }

    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub const fn is_subset(self, other: Self) -> bool {
        self.0 & !other.0 == 0
    }

    #[inline]
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn bits(self) -> u64 {
        self.0
    }

    /// Kinds in ascending ordinal order.
    pub fn iter(self) -> impl Iterator<Item = ComponentKind> {
        ComponentKind::ALL
            .into_iter()
            .filter(move |kind| self.contains(*kind))
    }
}

impl FromIterator<ComponentKind> for ComponentSet {
    fn from_iter<I: IntoIterator<Item = ComponentKind>>(iter: I) -> Self {
        let mut set = ComponentSet::EMPTY;
        set.extend(iter);
        set
    }
}

impl Extend<ComponentKind> for ComponentSet {
    fn extend<I: IntoIterator<Item = ComponentKind>>(&mut self, iter: I) {
        for kind in iter {
            self.insert(kind);
        }
    }
}

impl<const N: usize> From<[ComponentKind; N]> for ComponentSet {
    fn from(kinds: [ComponentKind; N]) -> Self {
        kinds.into_iter().collect()
    }
}

impl fmt::Debug for ComponentSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl fmt::Display for ComponentSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A typed component stored in its own dense container.
///
/// Implemented only for the built-in component types; each one maps to a
/// single [`ComponentKind`] and to its column in [`ComponentStorage`].
pub trait Component: 'static + Clone + Default + Send + Sync {
    /// Kind this type is stored and matched under.
    const KIND: ComponentKind;

    /// Human-readable name for debugging.
    const NAME: &'static str;

    /// The whole container for this kind, indexed by entity slot.
    fn column(storage: &ComponentStorage) -> &[Self];

    /// Mutable access to the whole container for this kind.
    fn column_mut(storage: &mut ComponentStorage) -> &mut [Self];
}

macro_rules! impl_component {
    ($ty:ty, $kind:ident, $field:ident) => {
        impl Component for $ty {
            const KIND: ComponentKind = ComponentKind::$kind;
            const NAME: &'static str = stringify!($kind);

            #[inline]
            fn column(storage: &ComponentStorage) -> &[Self] {
                &storage.$field
            }

            #[inline]
            fn column_mut(storage: &mut ComponentStorage) -> &mut [Self] {
                &mut storage.$field
            }
        }
    };
}

/// World-space placement.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Transform {
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
        }
    }
}

/// Linear velocity in units per second.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Velocity {
    pub linear: Vec3,
}

impl Velocity {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self {
            linear: Vec3::new(x, y, z),
        }
    }
}

/// Marks an entity for the renderer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderTag;

/// Opaque handle to mesh data owned by the renderer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Mesh {
    pub id: u32,
}

/// Marks an entity as interested in input events.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EventListener;

impl_component!(Transform, Transform, transforms);
impl_component!(Velocity, Velocity, velocities);
impl_component!(RenderTag, RenderTag, render_tags);
impl_component!(Mesh, Mesh, meshes);
impl_component!(EventListener, EventListener, event_listeners);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordinals_are_dense_from_zero() {
        for (expected, kind) in ComponentKind::ALL.iter().enumerate() {
            assert_eq!(kind.ordinal(), expected);
            assert_eq!(ComponentKind::from_ordinal(expected), Some(*kind));
        }
        assert_eq!(ComponentKind::from_ordinal(ComponentKind::COUNT), None);
    }

    #[test]
    fn set_is_order_and_duplicate_insensitive() {
        let a: ComponentSet = [ComponentKind::Mesh, ComponentKind::Transform].into();
        let b: ComponentSet = [
            ComponentKind::Transform,
            ComponentKind::Mesh,
            ComponentKind::Transform,
        ]
        .into();
        assert_eq!(a, b);
        assert_eq!(a.len(), 2);
    }

    #[test]
    fn set_iterates_in_ordinal_order() {
        let set: ComponentSet = [
            ComponentKind::EventListener,
            ComponentKind::Transform,
            ComponentKind::Mesh,
        ]
        .into();
        let kinds: Vec<_> = set.iter().collect();
        assert_eq!(
            kinds,
            vec![
                ComponentKind::Transform,
                ComponentKind::Mesh,
                ComponentKind::EventListener
            ]
        );
        assert_eq!(format!("{set:?}"), "{Transform, Mesh, EventListener}");
    }

    #[test]
    fn insert_reports_new_membership() {
        let mut set = ComponentSet::new();
        assert!(set.insert(ComponentKind::Velocity));
        assert!(!set.insert(ComponentKind::Velocity));
        assert_eq!(set, ComponentSet::single(ComponentKind::Velocity));
    }

    #[test]
    fn subset_and_union() {
        let tf = ComponentSet::single(ComponentKind::Transform);
        let tf_vel = tf.with(ComponentKind::Velocity);
        assert!(tf.is_subset(tf_vel));
        assert!(!tf_vel.is_subset(tf));
        assert!(ComponentSet::EMPTY.is_subset(tf));
        assert_eq!(tf.union(ComponentSet::single(ComponentKind::Velocity)), tf_vel);
    }

    #[test]
    fn component_types_map_to_their_kind() {
        assert_eq!(<Transform as Component>::KIND, ComponentKind::Transform);
        assert_eq!(<Velocity as Component>::KIND, ComponentKind::Velocity);
        assert_eq!(<RenderTag as Component>::KIND, ComponentKind::RenderTag);
        assert_eq!(<Mesh as Component>::KIND, ComponentKind::Mesh);
        assert_eq!(<EventListener as Component>::KIND, ComponentKind::EventListener);
        assert_eq!(<Mesh as Component>::NAME, "Mesh");
    }

    #[test]
    fn default_transform_is_identity() {
        let tf = Transform::default();
        assert_eq!(tf.position, Vec3::ZERO);
        assert_eq!(tf.rotation, Quat::IDENTITY);
    }
}
