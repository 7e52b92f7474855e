use crate::ecs::{ComponentKind, ComponentSet};

/// Metadata describing which entities a system runs on and what it mutates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SystemDescriptor {
    name: String,
    requires: ComponentSet,
    writes: ComponentSet,
}

impl SystemDescriptor {
    /// Create a new descriptor with the provided name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            requires: ComponentSet::EMPTY,
            writes: ComponentSet::EMPTY,
        }
    }

    /// Replace the exact component set an entity needs to be dispatched.
    pub fn requires<I>(mut self, components: I) -> Self
    where
        I: IntoIterator<Item = ComponentKind>,
    {
        self.requires = components.into_iter().collect();
        self
    }

    /// Replace the set of kinds this system writes.
    pub fn writes<I>(mut self, components: I) -> Self
    where
        I: IntoIterator<Item = ComponentKind>,
    {
        self.writes = components.into_iter().collect();
        self
    }

    /// Append a single required kind.
    pub fn add_required(&mut self, kind: ComponentKind) {
        self.requires.insert(kind);
    }

    /// Append a single written kind.
    pub fn add_write(&mut self, kind: ComponentKind) {
        self.writes.insert(kind);
    }

    /// Unique system name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Component set matched against entity archetypes.
    pub fn required_components(&self) -> ComponentSet {
        self.requires
    }

    /// Kinds the system mutates.
    pub fn write_components(&self) -> ComponentSet {
        self.writes
    }

    /// Required kinds the system only reads.
    pub fn read_components(&self) -> ComponentSet {
        self.requires.iter().filter(|kind| !self.writes.contains(*kind)).collect()
    }

    /// First written kind that is not part of the required set.
    pub fn undeclared_write(&self) -> Option<ComponentKind> {
        self.writes.iter().find(|kind| !self.requires.contains(*kind))
    }

    /// Whether the descriptor requires no components at all.
    pub fn is_empty(&self) -> bool {
        self.requires.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::ComponentKind::*;

    #[test]
    fn builder_collects_canonical_sets() {
        let descriptor = SystemDescriptor::new("movement")
            .requires([Velocity, Transform, Velocity])
            .writes([Transform]);
        assert_eq!(descriptor.name(), "movement");
        assert_eq!(
            descriptor.required_components(),
            ComponentSet::from([Transform, Velocity])
        );
        assert_eq!(descriptor.read_components(), ComponentSet::single(Velocity));
        assert_eq!(descriptor.undeclared_write(), None);
    }

    #[test]
    fn writes_outside_requirements_are_reported() {
        let mut descriptor = SystemDescriptor::new("bad").requires([Transform]);
        descriptor.add_write(Mesh);
        assert_eq!(descriptor.undeclared_write(), Some(Mesh));
        descriptor.add_required(Mesh);
        assert_eq!(descriptor.undeclared_write(), None);
    }

    #[test]
    fn empty_descriptor_is_detected() {
        assert!(SystemDescriptor::new("idle").is_empty());
    }
}
