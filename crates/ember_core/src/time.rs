//! Fixed-timestep simulation clock
//!
//! Real frame time is accumulated and drained in whole ticks, so
//! `Scene::update` always sees the same `dt`.

use std::time::Duration;

/// Default simulation rate.
pub const DEFAULT_TICK_RATE_HZ: u32 = 60;

/// Frames longer than this are clamped so a stall does not trigger a
/// burst of catch-up ticks.
pub const MAX_FRAME_TIME: Duration = Duration::from_millis(250);

/// Simulation time tracker
#[derive(Debug, Clone)]
pub struct SimulationTime {
    tick: Duration,
    tick_count: u64,
    accumulator: Duration,
    total_time: Duration,
}

impl SimulationTime {
    /// A zero rate is treated as one tick per second.
    pub fn new(tick_rate_hz: u32) -> Self {
        let rate = tick_rate_hz.max(1);
        Self {
            tick: Duration::from_secs(1) / rate,
            tick_count: 0,
            accumulator: Duration::ZERO,
            total_time: Duration::ZERO,
        }
    }

    /// Fixed tick length.
    pub fn tick_duration(&self) -> Duration {
        self.tick
    }

    /// Fixed tick length in seconds, as passed to systems.
    pub fn dt(&self) -> f32 {
        self.tick.as_secs_f32()
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Simulated time covered by the ticks taken so far.
    pub fn total_time(&self) -> Duration {
        self.total_time
    }

    /// Time banked towards the next tick.
    pub fn accumulator(&self) -> Duration {
        self.accumulator
    }

    /// Add one frame of real time and return how many ticks are now due.
    pub fn accumulate(&mut self, frame_time: Duration) -> u32 {
        self.accumulator += frame_time.min(MAX_FRAME_TIME);
        let mut due = 0;
        while self.accumulator >= self.tick {
            self.accumulator -= self.tick;
            self.advance_tick();
            due += 1;
        }
        due
    }

    pub fn advance_tick(&mut self) {
        self.tick_count += 1;
        self.total_time += self.tick;
    }

    /// Fraction of a tick banked in the accumulator, in `[0, 1)`.
    pub fn alpha(&self) -> f32 {
        self.accumulator.as_secs_f32() / self.tick.as_secs_f32()
    }
}

impl Default for SimulationTime {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_RATE_HZ)
    }
}
