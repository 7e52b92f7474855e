//! Entity handle with generational index
//!
//! Entities are lightweight handles (8 bytes) that address a slot in every
//! component container. The generation counter prevents use-after-free bugs
//! when a slot is handed out again.

use std::fmt;

use crate::ecs::IdAllocator;

pub type Generation = u32;

/// Entity handle (generation-indexed for safety)
///
/// Format: [32-bit index | 32-bit generation]
/// - Index: Slot in the allocator, component storage and archetype table
/// - Generation: Bumped every time a freed slot is reused
///
/// Example:
/// ```ignore
/// let entity = scene.new_entity();
/// scene.delete_entity(entity);
/// // entity handle is now invalid (inactive slot, later a generation mismatch)
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Entity {
    index: u32,
    generation: Generation,
}

impl Entity {
    pub(crate) const fn new(index: u32, generation: Generation) -> Self {
        Self { index, generation }
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Serialize to 64-bit integer (for handing handles to collaborators)
    pub fn to_bits(&self) -> u64 {
        ((self.generation as u64) << 32) | (self.index as u64)
    }

    /// Deserialize from 64-bit integer
    pub fn from_bits(bits: u64) -> Self {
        Self {
            index: bits as u32,
            generation: (bits >> 32) as u32,
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

/// Per-slot bookkeeping.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct AllocatorSlot {
    pub active: bool,
    pub generation: Generation,
}

/// Issues entity handles on top of an [`IdAllocator`].
///
/// A slot's generation only moves when a freed slot is handed out again,
/// so a slot that was freed but not yet reused keeps its generation and
/// callers must also look at `active`.
#[derive(Clone, Debug, Default)]
pub struct EntityAllocator {
    ids: IdAllocator,
    slots: Vec<AllocatorSlot>,
}

impl EntityAllocator {
    /// Create `capacity` free slots at generation 0.
    pub fn with_capacity(capacity: u32) -> Self {
        Self {
            ids: IdAllocator::with_capacity(capacity),
            slots: vec![AllocatorSlot::default(); capacity as usize],
        }
    }

    /// Whether the next `allocate` reuses a slot instead of appending one.
    #[inline]
    pub fn has_free(&self) -> bool {
        self.ids.has_free()
    }

    /// Hand out a live entity.
    ///
    /// Reuses the smallest free slot (bumping its generation) or appends a
    /// new slot at generation 0.
    pub fn allocate(&mut self) -> Entity {
        match self.ids.allocate() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.generation = slot.generation.wrapping_add(1);
                slot.active = true;
                Entity::new(index, slot.generation)
            }
            None => {
                let index = self.ids.append();
                self.slots.push(AllocatorSlot {
                    active: true,
                    generation: 0,
                });
                debug_assert_eq!(self.slots.len(), self.ids.len() as usize);
                Entity::new(index, 0)
            }
        }
    }

    /// Free the entity's slot. Stale handles are ignored and return `false`.
    pub fn deallocate(&mut self, entity: Entity) -> bool {
        if !self.is_active(entity) {
            return false;
        }
        self.slots[entity.index as usize].active = false;
        self.ids.deallocate(entity.index);
        true
    }

    /// A handle is live iff its slot exists, is active and the generations match.
    pub fn is_active(&self, entity: Entity) -> bool {
        self.slots
            .get(entity.index as usize)
            .is_some_and(|slot| slot.active && slot.generation == entity.generation)
    }

    /// Number of slots (free or active).
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn free_count(&self) -> usize {
        self.ids.free_len()
    }

    #[inline]
    pub fn active_count(&self) -> usize {
        self.slots.len() - self.ids.free_len()
    }

    pub fn slot(&self, index: u32) -> Option<&AllocatorSlot> {
        self.slots.get(index as usize)
    }

    pub fn generation_of(&self, index: u32) -> Option<Generation> {
        self.slot(index).map(|slot| slot.generation)
    }

    /// Live handle currently occupying `index`, if any.
    pub fn entity_at(&self, index: u32) -> Option<Entity> {
        self.slot(index)
            .filter(|slot| slot.active)
            .map(|slot| Entity::new(index, slot.generation))
    }
}
