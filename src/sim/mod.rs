//! Simulation module
//!
//! All gameplay logic lives here:
//! - Physics in units per tick, driven by an external clock
//! - Injected RNG only
//! - No rendering, storage or platform dependencies

pub mod collision;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{any_comet_hit, circles_overlap, collect_resources};
pub use spawn::{Edge, comet_trajectory};
pub use state::{Comet, GameState, Planet, Resource, Ship, Star, Viewport};
pub use tick::{TickInput, initialize, move_ship_towards, resize, tick, update};
