//! Ember Core
//!
//! Contains the fundamental simulation pieces:
//! - Entity Component System (ECS)
//! - Fixed-step simulation time

pub mod ecs;
pub mod time;

pub use glam;

/// Engine version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
