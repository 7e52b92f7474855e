// archetype.rs - Archetype identification and per-slot assignment
//
// An archetype is a unique set of component kinds. Entities with the same
// component set share the same archetype. Ids come from their own
// IdAllocator, separate from entity indices.

use crate::ecs::{ComponentKind, ComponentSet, EcsError, IdAllocator};
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

pub type ArchetypeId = u32;

/// An archetype represents a unique combination of component kinds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Archetype {
    pub id: ArchetypeId,

    /// Canonical (ordinal-sorted) set of kinds in this archetype.
    pub components: ComponentSet,
}

impl Archetype {
    /// Check if this archetype contains a specific component kind.
    pub fn contains(&self, kind: ComponentKind) -> bool {
        self.components.contains(kind)
    }
}

/// Which archetype an entity slot currently belongs to.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ArchetypeAssignment {
    pub archetype: ArchetypeId,
    pub active: bool,
}

impl ArchetypeAssignment {
    pub const UNASSIGNED: ArchetypeAssignment = ArchetypeAssignment {
        archetype: 0,
        active: false,
    };

    /// The assigned archetype, if the slot has one.
    pub fn current(&self) -> Option<ArchetypeId> {
        self.active.then_some(self.archetype)
    }
}

/// Deduplicating archetype table plus the slot → archetype assignment.
///
/// Keeps a reverse index (archetype → member slots) so queries cost the
/// number of members rather than the number of slots.
#[derive(Debug, Default)]
pub struct ArchetypeRegistry {
    ids: IdAllocator,
    archetypes: Vec<Archetype>,
    lookup: HashMap<ComponentSet, ArchetypeId>,
    members: Vec<BTreeSet<u32>>,
    assignments: Vec<ArchetypeAssignment>,
}

impl ArchetypeRegistry {
    /// Create a registry with `capacity` unassigned slots.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            assignments: vec![ArchetypeAssignment::UNASSIGNED; capacity],
            ..Self::default()
        }
    }

    /// Append `by` unassigned slots.
    pub fn expand(&mut self, by: usize) {
        let target = self.assignments.len() + by;
        self.assignments
            .resize(target, ArchetypeAssignment::UNASSIGNED);
    }

    /// Number of slots in the assignment table.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.assignments.len()
    }

    /// Number of distinct archetypes seen so far.
    #[inline]
    pub fn len(&self) -> usize {
        self.archetypes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.archetypes.is_empty()
    }

    /// Id of the archetype for `components`, creating it on first sight.
    ///
    /// Resolving a set that already exists returns the existing id.
    pub fn resolve(&mut self, components: ComponentSet) -> ArchetypeId {
        if let Some(&id) = self.lookup.get(&components) {
            return id;
        }

        let id = self.ids.allocate_or_append();
        debug_assert_eq!(id as usize, self.archetypes.len(), "archetype ids are never freed");
        self.archetypes.push(Archetype { id, components });
        self.members.push(BTreeSet::new());
        self.lookup.insert(components, id);

        debug!(archetype = id, components = %components, "created archetype");
        id
    }

    /// [`resolve`](Self::resolve) for kinds in any order, duplicates allowed.
    pub fn resolve_kinds<I>(&mut self, kinds: I) -> ArchetypeId
    where
        I: IntoIterator<Item = ComponentKind>,
    {
        self.resolve(kinds.into_iter().collect())
    }

    /// Existing id for `components` without creating one.
    pub fn find(&self, components: ComponentSet) -> Option<ArchetypeId> {
        self.lookup.get(&components).copied()
    }

    /// Grow the slot's component set by `kind` and move it to the matching
    /// archetype.
    pub fn add_component(
        &mut self,
        index: u32,
        kind: ComponentKind,
    ) -> Result<ArchetypeId, EcsError> {
        let assignment = self.assignment_checked(index)?;
        let current = self.components_of(index);
        if let Some(id) = assignment.current() {
            if current.contains(kind) {
                return Ok(id);
            }
        }

        let id = self.resolve(current.with(kind));
        self.reassign(index, Some(id));
        Ok(id)
    }

    /// Drop the slot's assignment, returning the archetype it had.
    pub fn clear(&mut self, index: u32) -> Result<Option<ArchetypeId>, EcsError> {
        let previous = self.assignment_checked(index)?.current();
        self.reassign(index, None);
        Ok(previous)
    }

    fn assignment_checked(&self, index: u32) -> Result<ArchetypeAssignment, EcsError> {
        self.assignments
            .get(index as usize)
            .copied()
            .ok_or(EcsError::IndexOutOfBounds {
                index,
                capacity: self.assignments.len(),
            })
    }

    fn reassign(&mut self, index: u32, next: Option<ArchetypeId>) {
        let slot = &mut self.assignments[index as usize];
        if let Some(previous) = slot.current() {
            self.members[previous as usize].remove(&index);
        }
        *slot = match next {
            Some(archetype) => {
                self.members[archetype as usize].insert(index);
                ArchetypeAssignment {
                    archetype,
                    active: true,
                }
            }
            None => ArchetypeAssignment::UNASSIGNED,
        };
    }

    /// Active slots assigned to `id`, ascending, without duplicates.
    pub fn filter_entities(&self, id: ArchetypeId) -> Vec<u32> {
        self.members
            .get(id as usize)
            .map(|members| members.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Same result as [`filter_entities`](Self::filter_entities), computed by
    /// scanning the whole assignment table.
    pub fn scan_entities(&self, id: ArchetypeId) -> Vec<u32> {
        self.assignments
            .iter()
            .enumerate()
            .filter(|(_, assignment)| assignment.current() == Some(id))
            .map(|(index, _)| index as u32)
            .collect()
    }

    pub fn member_count(&self, id: ArchetypeId) -> usize {
        self.members.get(id as usize).map_or(0, BTreeSet::len)
    }

    pub fn archetype(&self, id: ArchetypeId) -> Option<&Archetype> {
        self.archetypes.get(id as usize)
    }

    pub fn assignment(&self, index: u32) -> Option<ArchetypeAssignment> {
        self.assignments.get(index as usize).copied()
    }

    /// Archetype currently assigned to slot `index`.
    pub fn archetype_of(&self, index: u32) -> Option<ArchetypeId> {
        self.assignment(index)?.current()
    }

    /// Component set of slot `index`; empty when unassigned.
    pub fn components_of(&self, index: u32) -> ComponentSet {
        self.archetype_of(index)
            .and_then(|id| self.archetype(id))
            .map_or(ComponentSet::EMPTY, |archetype| archetype.components)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Archetype> {
        self.archetypes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::ComponentKind::*;

    #[test]
    fn resolve_is_idempotent_across_permutations() {
        let mut registry = ArchetypeRegistry::with_capacity(0);
        let a = registry.resolve_kinds([Velocity, Transform, Mesh]);
        let b = registry.resolve_kinds([Mesh, Velocity, Transform]);
        let c = registry.resolve_kinds([Transform, Mesh, Velocity, Mesh]);
        assert_eq!(a, b);
        assert_eq!(a, c);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn different_sets_get_different_ids() {
        let mut registry = ArchetypeRegistry::with_capacity(0);
        let tf = registry.resolve_kinds([Transform]);
        let tf_vel = registry.resolve_kinds([Transform, Velocity]);
        let vel = registry.resolve_kinds([Velocity]);
        assert_ne!(tf, tf_vel);
        assert_ne!(tf, vel);
        assert_ne!(tf_vel, vel);
        assert_eq!(registry.find(ComponentSet::from([Velocity])), Some(vel));
        assert_eq!(registry.find(ComponentSet::from([Mesh])), None);
    }

    #[test]
    fn first_archetype_gets_id_zero() {
        let mut registry = ArchetypeRegistry::with_capacity(4);
        let id = registry.add_component(0, Transform).unwrap();
        assert_eq!(id, 0);
        assert_eq!(
            registry.assignment(0),
            Some(ArchetypeAssignment {
                archetype: 0,
                active: true
            })
        );
        assert_eq!(
            registry.archetype(id).map(|a| a.components),
            Some(ComponentSet::single(Transform))
        );
    }

    #[test]
    fn adding_a_second_kind_changes_archetype() {
        let mut registry = ArchetypeRegistry::with_capacity(2);
        let only_tf = registry.add_component(0, Transform).unwrap();
        let tf_mesh = registry.add_component(0, Mesh).unwrap();
        assert_ne!(only_tf, tf_mesh);

        registry.add_component(1, Mesh).unwrap();
        let other = registry.add_component(1, Transform).unwrap();
        assert_eq!(other, tf_mesh);
    }

    #[test]
    fn adding_the_same_kind_twice_keeps_the_set() {
        let mut registry = ArchetypeRegistry::with_capacity(1);
        let first = registry.add_component(0, Velocity).unwrap();
        let second = registry.add_component(0, Velocity).unwrap();
        assert_eq!(first, second);
        assert_eq!(registry.components_of(0).len(), 1);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn filter_returns_members_in_index_order() {
        let mut registry = ArchetypeRegistry::with_capacity(5);
        for index in [3, 0, 4] {
            registry.add_component(index, Transform).unwrap();
        }
        registry.add_component(1, Mesh).unwrap();

        let tf = registry.find(ComponentSet::single(Transform)).unwrap();
        assert_eq!(registry.filter_entities(tf), vec![0, 3, 4]);
        assert_eq!(registry.member_count(tf), 3);

        registry.add_component(3, Velocity).unwrap();
        assert_eq!(registry.filter_entities(tf), vec![0, 4]);
    }

    #[test]
    fn cleared_slots_leave_queries_and_restart_empty() {
        let mut registry = ArchetypeRegistry::with_capacity(2);
        let tf_vel = registry.resolve_kinds([Transform, Velocity]);
        registry.add_component(1, Transform).unwrap();
        registry.add_component(1, Velocity).unwrap();
        assert_eq!(registry.filter_entities(tf_vel), vec![1]);

        assert_eq!(registry.clear(1), Ok(Some(tf_vel)));
        assert!(registry.filter_entities(tf_vel).is_empty());
        assert_eq!(registry.archetype_of(1), None);
        assert_eq!(registry.components_of(1), ComponentSet::EMPTY);

        let only_vel = registry.add_component(1, Velocity).unwrap();
        assert_ne!(only_vel, tf_vel);
    }

    #[test]
    fn unknown_archetype_filters_to_nothing() {
        let registry = ArchetypeRegistry::with_capacity(3);
        assert!(registry.filter_entities(17).is_empty());
        assert!(registry.scan_entities(17).is_empty());
    }

    #[test]
    fn out_of_range_slot_is_rejected() {
        let mut registry = ArchetypeRegistry::with_capacity(1);
        assert_eq!(
            registry.add_component(1, Mesh),
            Err(EcsError::IndexOutOfBounds {
                index: 1,
                capacity: 1
            })
        );
        registry.expand(1);
        assert!(registry.add_component(1, Mesh).is_ok());
        assert_eq!(registry.capacity(), 2);
    }

    #[test]
    fn reverse_index_matches_linear_scan() {
        let mut registry = ArchetypeRegistry::with_capacity(16);
        let mut state = 0x2545_f491_u32;
        for _ in 0..500 {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            let index = state % 16;
            let ordinal = (state >> 8) as usize % (ComponentKind::COUNT + 1);
            match ComponentKind::from_ordinal(ordinal) {
                Some(kind) => {
                    registry.add_component(index, kind).unwrap();
                }
                None => {
                    registry.clear(index).unwrap();
                }
            }
        }
        for archetype in registry.iter() {
            assert_eq!(
                registry.filter_entities(archetype.id),
                registry.scan_entities(archetype.id)
            );
        }
    }
}
