// id_allocator.rs - Reusable dense integer ids
//
// Hands out the smallest previously freed id first. When nothing is free
// the caller grows its own backing storage and asks for a fresh id via
// `append`. No bounds checks happen here; it only juggles integers.

use std::collections::BTreeSet;

/// Dense id allocator with a free list.
#[derive(Clone, Debug, Default)]
pub struct IdAllocator {
    len: u32,
    free: BTreeSet<u32>,
}

impl IdAllocator {
    /// Create an allocator with no ids issued.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an allocator whose ids `0..capacity` exist and are all free.
    pub fn with_capacity(capacity: u32) -> Self {
        Self {
            len: capacity,
            free: (0..capacity).collect(),
        }
    }

    /// Take the smallest free id, or `None` if the caller has to `append`.
    pub fn allocate(&mut self) -> Option<u32> {
        self.free.pop_first()
    }

    /// Issue a brand new id one past the current end.
    pub fn append(&mut self) -> u32 {
        let id = self.len;
        self.len += 1;
        id
    }

    /// Reuse a free id if there is one, otherwise append.
    pub fn allocate_or_append(&mut self) -> u32 {
        match self.allocate() {
            Some(id) => id,
            None => self.append(),
        }
    }

    /// Return `id` to the free list.
    ///
    /// Whatever is keyed by `id` must already be invalidated.
    pub fn deallocate(&mut self, id: u32) {
        self.free.insert(id);
    }

    /// Total ids ever issued (free or not).
    #[inline]
    pub fn len(&self) -> u32 {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of ids waiting for reuse.
    #[inline]
    pub fn free_len(&self) -> usize {
        self.free.len()
    }

    #[inline]
    pub fn has_free(&self) -> bool {
        !self.free.is_empty()
    }

    pub fn is_free(&self, id: u32) -> bool {
        self.free.contains(&id)
    }
}
