//! Settings management

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Driver settings, loadable from JSON. Missing fields keep their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Entity slots reserved up front.
    pub initial_capacity: u32,
    /// Entities spawned before the first frame.
    pub entity_count: u32,
    /// Simulation ticks per second.
    pub tick_rate_hz: u32,
    /// Frames to run before exiting.
    pub frames: u64,
    /// Simulated wall time per frame.
    pub frame_time_ms: u64,
    /// Despawn and respawn one entity every N frames; 0 disables churn.
    pub despawn_every: u64,
    /// `EnvFilter` directives used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            initial_capacity: 1024,
            entity_count: 1000,
            tick_rate_hz: 60,
            frames: 600,
            frame_time_ms: 16,
            despawn_every: 10,
            log_filter: "ember=info,ember_core=info".to_string(),
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("invalid settings JSON")
    }

    /// Read settings from `path`, or return the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let json = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings from {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("in {}", path.display()))
    }

    /// Apply command-line overrides.
    pub fn with_overrides(mut self, frames: Option<u64>, entities: Option<u32>) -> Self {
        if let Some(frames) = frames {
            self.frames = frames;
        }
        if let Some(entities) = entities {
            self.entity_count = entities;
        }
        self
    }
}
