//! Comet Drift - a 2D arcade game core
//!
//! Core modules:
//! - `sim`: Simulation (entities, generation, collisions, per-tick update)
//! - `level`: Fixed level catalog
//! - `progress`: Best-score persistence contract and level unlocking
//! - `session`: Tick clock, input capture and progression bookkeeping
//! - `settings`: Runtime configuration

pub mod error;
pub mod level;
pub mod progress;
pub mod session;
pub mod settings;
pub mod sim;

pub use error::{GameError, Result};
pub use level::{LEVELS, Level};
pub use progress::{JsonProgressStore, MemoryProgressStore, ProgressStore};
pub use session::{Session, SessionEvent, Snapshot};
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Ship defaults
    pub const SHIP_SIZE: f32 = 80.0;
    /// Ship speed in units per tick
    pub const SHIP_SPEED: f32 = 5.0;
    /// Below this distance to the target the ship stops (arrival snap)
    pub const ARRIVAL_THRESHOLD: f32 = 10.0;

    pub const RESOURCE_SIZE: f32 = 20.0;
    /// Degrees per tick
    pub const RESOURCE_SPIN: f32 = 2.0;
    pub const RESOURCE_SCORE: u32 = 10;
    /// Uncollected resources are topped up to this floor every tick
    pub const MIN_UNCOLLECTED_RESOURCES: usize = 5;

    pub const COMET_SIZE: f32 = 60.0;
    /// Degrees per tick
    pub const COMET_SPIN: f32 = 3.0;
    /// Comets spawn this far beyond the viewport edge
    pub const COMET_SPAWN_OFFSET: f32 = 50.0;
    /// Comets are removed once this far beyond the viewport edge
    pub const COMET_DESPAWN_MARGIN: f32 = 100.0;
    pub const COMET_BASE_SPEED: f32 = 2.0;
    pub const COMET_SPEED_PER_DIFFICULTY: f32 = 0.5;

    pub const PLANET_MIN_RADIUS: f32 = 40.0;
    pub const PLANET_MAX_RADIUS: f32 = 100.0;

    pub const STAR_COUNT: usize = 100;
    pub const STAR_SIZE: f32 = 2.0;
    pub const STAR_MIN_BRIGHTNESS: f32 = 0.5;

    /// Base entity counts, scaled by level difficulty
    pub const BASE_PLANETS: f32 = 5.0;
    pub const BASE_RESOURCES: f32 = 15.0;
    pub const BASE_COMETS: f32 = 3.0;
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

/// Unit vector in the direction of `v`, or zero for a zero-length vector
#[inline]
pub fn normalize(v: Vec2) -> Vec2 {
    v.normalize_or_zero()
}

/// Unit direction from `from` to `to`, `None` when the points coincide
#[inline]
pub fn try_direction(from: Vec2, to: Vec2) -> Option<Vec2> {
    (to - from).try_normalize()
}

/// Scale a base count by difficulty, rounding half away from zero
#[inline]
pub fn scaled_count(base: f32, difficulty: f32) -> usize {
    (base * difficulty).round().max(0.0) as usize
}
