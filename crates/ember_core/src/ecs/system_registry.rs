use crate::ecs::{
    ArchetypeId, ArchetypeRegistry, ComponentStorage, SystemDescriptor, SystemHandle,
    SystemRegistrationError,
};
use ember_metrics::SystemProfiler;
use rayon::prelude::*;
use std::collections::HashMap;
use tracing::{info, trace_span};

/// Per-tick system body: `(dt, matching entity indices, component storage)`.
pub type SystemFn = Box<dyn FnMut(f32, &[u32], &mut ComponentStorage) + Send>;

/// Ordered table of systems, each keyed by the archetype it requires.
///
/// Systems run one after another in registration order, so at most one
/// system holds mutable access to component storage at any time.
pub struct Dispatcher {
    systems: Vec<RegisteredSystem>,
    name_lookup: HashMap<String, SystemHandle>,
    profiler: SystemProfiler,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self {
            systems: Vec::new(),
            name_lookup: HashMap::new(),
            profiler: SystemProfiler::new(),
        }
    }

    /// Validate `descriptor`, resolve its required archetype and append the
    /// system to the dispatch order.
    pub fn register(
        &mut self,
        descriptor: SystemDescriptor,
        archetypes: &mut ArchetypeRegistry,
        run: SystemFn,
    ) -> Result<SystemHandle, SystemRegistrationError> {
        if descriptor.is_empty() {
            return Err(SystemRegistrationError::EmptyAccess {
                name: descriptor.name().to_string(),
            });
        }

        let name_key = descriptor.name().to_string();
        if self.name_lookup.contains_key(&name_key) {
            return Err(SystemRegistrationError::DuplicateName { name: name_key });
        }

        if let Some(component) = descriptor.undeclared_write() {
            return Err(SystemRegistrationError::UndeclaredWrite {
                name: name_key,
                component,
            });
        }

        let archetype = archetypes.resolve(descriptor.required_components());
        let handle = SystemHandle::new(self.systems.len() as u32);
        info!(
            system = %name_key,
            %handle,
            archetype,
            requires = %descriptor.required_components(),
            writes = %descriptor.write_components(),
            "registered system"
        );

        self.name_lookup.insert(name_key, handle);
        self.systems.push(RegisteredSystem {
            handle,
            descriptor,
            archetype,
            run,
        });

        Ok(handle)
    }

    /// Run every system once, in registration order.
    ///
    /// Member lists for all systems are collected before the first system
    /// runs; that read-only pass is the only parallel work.
    pub fn run(
        &mut self,
        dt: f32,
        archetypes: &ArchetypeRegistry,
        storage: &mut ComponentStorage,
    ) {
        let required: Vec<ArchetypeId> = self.systems.iter().map(|s| s.archetype).collect();
        let batches: Vec<Vec<u32>> = required
            .par_iter()
            .map(|&archetype| archetypes.filter_entities(archetype))
            .collect();

        for (system, entities) in self.systems.iter_mut().zip(batches) {
            let name = system.descriptor.name();
            let _span = trace_span!("system", name, entities = entities.len()).entered();
            let run = &mut system.run;
            self.profiler
                .time_system(name, entities.len(), || run(dt, &entities, &mut *storage));
        }
    }

    pub fn descriptor(&self, handle: SystemHandle) -> Option<&SystemDescriptor> {
        self.systems
            .get(handle.index() as usize)
            .map(|system| &system.descriptor)
    }

    /// Archetype a system is dispatched on.
    pub fn archetype(&self, handle: SystemHandle) -> Option<ArchetypeId> {
        self.systems
            .get(handle.index() as usize)
            .map(|system| system.archetype)
    }

    pub fn handle_of(&self, name: &str) -> Option<SystemHandle> {
        self.name_lookup.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SystemHandle, &SystemDescriptor)> {
        self.systems
            .iter()
            .map(|system| (system.handle, &system.descriptor))
    }

    pub fn len(&self) -> usize {
        self.systems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }

    pub fn profiler(&self) -> &SystemProfiler {
        &self.profiler
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

struct RegisteredSystem {
    handle: SystemHandle,
    descriptor: SystemDescriptor,
    archetype: ArchetypeId,
    run: SystemFn,
}
