use crate::ecs::Entity;
use thiserror::Error;

/// Errors raised by scene and storage operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EcsError {
    /// A slot index past the current capacity. Capacity and handle issuance
    /// are kept in lockstep, so this is an invariant break.
    #[error("slot index {index} is out of bounds (capacity {capacity})")]
    IndexOutOfBounds { index: u32, capacity: usize },

    /// The handle's slot was freed or reused since the handle was issued.
    #[error("entity {entity} is no longer alive")]
    StaleHandle { entity: Entity },
}

impl EcsError {
    /// Fatal errors mean scene state can no longer be trusted and must not
    /// be retried.
    pub fn is_fatal(&self) -> bool {
        matches!(self, EcsError::IndexOutOfBounds { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_bounds_errors_are_fatal() {
        let oob = EcsError::IndexOutOfBounds {
            index: 4,
            capacity: 4,
        };
        let stale = EcsError::StaleHandle {
            entity: Entity::new(1, 2),
        };
        assert!(oob.is_fatal());
        assert!(!stale.is_fatal());
        assert_eq!(stale.to_string(), "entity 1v2 is no longer alive");
    }
}
