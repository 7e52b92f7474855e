//! System profiler for timing named systems

use crate::SystemTiming;
use std::collections::HashMap;
use std::time::{Duration, Instant};

#[derive(Debug, Default)]
pub struct SystemProfiler {
    timings: HashMap<String, SystemTiming>,
}

impl SystemProfiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f`, charging its wall time and entity count to `name`.
    pub fn time_system<F, R>(&mut self, name: &str, entities: usize, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let start = Instant::now();
        let result = f();
        let elapsed = start.elapsed();

        let timing = self.timings.entry(name.to_string()).or_default();
        timing.last = elapsed;
        timing.total += elapsed;
        timing.runs += 1;
        timing.last_entities = entities;
        result
    }

    pub fn timing(&self, name: &str) -> Option<SystemTiming> {
        self.timings.get(name).copied()
    }

    pub fn total_time(&self, name: &str) -> Duration {
        self.timings
            .get(name)
            .map_or(Duration::ZERO, |timing| timing.total)
    }

    pub fn reset(&mut self) {
        self.timings.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, SystemTiming)> {
        self.timings
            .iter()
            .map(|(name, timing)| (name.as_str(), *timing))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulates_runs_per_name() {
        let mut profiler = SystemProfiler::new();
        profiler.time_system("movement", 10, || ());
        profiler.time_system("movement", 4, || ());
        profiler.time_system("spin", 1, || ());

        let movement = profiler.timing("movement").unwrap();
        assert_eq!(movement.runs, 2);
        assert_eq!(movement.last_entities, 4);
        assert!(movement.total >= movement.last);
        assert_eq!(profiler.iter().count(), 2);

        profiler.reset();
        assert!(profiler.timing("movement").is_none());
        assert_eq!(profiler.total_time("spin"), Duration::ZERO);
    }
}
