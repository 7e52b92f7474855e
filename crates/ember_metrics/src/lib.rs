//! Ember Metrics - per-system and per-frame timing
//!
//! Everything here is behind the `metrics` feature. Without it the same
//! types exist as empty stubs, so callers never need their own `cfg`s and
//! the instrumentation compiles away.
//!
//! # Usage
//!
//! ```ignore
//! use ember_metrics::{FrameTimer, SystemProfiler};
//!
//! let mut profiler = SystemProfiler::new();
//! profiler.time_system("movement", entities.len(), || run(&entities));
//!
//! let mut timer = FrameTimer::new(60); // Track last 60 frames
//! timer.begin();
//! // ... do work ...
//! timer.end();
//! println!("frame: {:.2} ms", timer.frame_time_ms());
//! ```

use std::time::Duration;

#[cfg(feature = "metrics")]
mod frame_timer;
#[cfg(feature = "metrics")]
mod ring_buffer;
#[cfg(feature = "metrics")]
mod system_profiler;

#[cfg(feature = "metrics")]
pub use frame_timer::FrameTimer;
#[cfg(feature = "metrics")]
pub use ring_buffer::RingBuffer;
#[cfg(feature = "metrics")]
pub use system_profiler::SystemProfiler;

/// Whether this build records anything.
pub const ENABLED: bool = cfg!(feature = "metrics");

/// Accumulated timing for one named system.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SystemTiming {
    /// Duration of the most recent run.
    pub last: Duration,
    /// Sum over all runs.
    pub total: Duration,
    /// Number of runs.
    pub runs: u64,
    /// Entities handed to the most recent run.
    pub last_entities: usize,
}

impl SystemTiming {
    pub fn average(&self) -> Duration {
        match u32::try_from(self.runs) {
            Ok(0) => Duration::ZERO,
            Ok(runs) => self.total / runs,
            Err(_) => Duration::from_secs_f64(self.total.as_secs_f64() / self.runs as f64),
        }
    }
}

// ============================================================================
// No-op stubs when metrics disabled
// ============================================================================

#[cfg(not(feature = "metrics"))]
#[derive(Debug, Default)]
pub struct FrameTimer;

#[cfg(not(feature = "metrics"))]
impl FrameTimer {
    pub fn new(_capacity: usize) -> Self { Self }
    pub fn begin(&mut self) {}
    pub fn end(&mut self) {}
    pub fn frames(&self) -> u64 { 0 }
    pub fn fps(&self) -> f64 { 0.0 }
    pub fn frame_time_ms(&self) -> f64 { 0.0 }
    pub fn frame_time_range_ms(&self) -> (f64, f64) { (0.0, 0.0) }
}

#[cfg(not(feature = "metrics"))]
#[derive(Debug, Default)]
pub struct SystemProfiler;

#[cfg(not(feature = "metrics"))]
impl SystemProfiler {
    pub fn new() -> Self { Self }
    pub fn time_system<F, R>(&mut self, _name: &str, _entities: usize, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        f()
    }
    pub fn timing(&self, _name: &str) -> Option<SystemTiming> { None }
    pub fn total_time(&self, _name: &str) -> Duration { Duration::ZERO }
    pub fn reset(&mut self) {}
    pub fn iter(&self) -> impl Iterator<Item = (&str, SystemTiming)> { std::iter::empty() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profiler_passes_through_results() {
        let mut profiler = SystemProfiler::new();
        let value = profiler.time_system("noop", 3, || 41 + 1);
        assert_eq!(value, 42);
        if ENABLED {
            assert_eq!(profiler.timing("noop").map(|t| t.runs), Some(1));
        } else {
            assert!(profiler.timing("noop").is_none());
        }
    }

    #[test]
    fn frame_timer_api_is_always_available() {
        let mut timer = FrameTimer::new(4);
        timer.begin();
        timer.end();
        assert!(timer.frame_time_ms() >= 0.0);
    }

    #[test]
    fn average_of_no_runs_is_zero() {
        assert_eq!(SystemTiming::default().average(), Duration::ZERO);
        let timing = SystemTiming {
            total: Duration::from_millis(9),
            runs: 3,
            ..SystemTiming::default()
        };
        assert_eq!(timing.average(), Duration::from_millis(3));
    }
}
