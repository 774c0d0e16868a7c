//! Game state and core simulation types
//!
//! Everything a renderer needs to draw a frame lives here, and the whole
//! state is serializable so a UI layer can snapshot it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{GameError, Result};
use crate::level::Level;

/// Playfield size in world units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ViewportRaw")]
pub struct Viewport {
    width: f32,
    height: f32,
}

/// Unchecked wire form; deserialized sizes go through [`Viewport::new`]
#[derive(Deserialize)]
struct ViewportRaw {
    width: f32,
    height: f32,
}

impl TryFrom<ViewportRaw> for Viewport {
    type Error = GameError;

    fn try_from(raw: ViewportRaw) -> Result<Self> {
        Viewport::new(raw.width, raw.height)
    }
}

impl Viewport {
    /// Validate a measured size. Zero means "not measured yet" and is rejected.
    pub fn new(width: f32, height: f32) -> Result<Self> {
        let valid = |v: f32| v.is_finite() && v > 0.0;
        if valid(width) && valid(height) {
            Ok(Self { width, height })
        } else {
            Err(GameError::InvalidViewport { width, height })
        }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Clamp a point into `[0, width] x [0, height]`
    pub fn clamp(&self, pos: Vec2) -> Vec2 {
        Vec2::new(pos.x.clamp(0.0, self.width), pos.y.clamp(0.0, self.height))
    }

    /// Whether a point lies inside the viewport grown by `margin` on every side
    pub fn contains_with_margin(&self, pos: Vec2, margin: f32) -> bool {
        pos.x >= -margin
            && pos.x <= self.width + margin
            && pos.y >= -margin
            && pos.y <= self.height + margin
    }
}

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ship {
    pub pos: Vec2,
    /// Units per tick
    pub vel: Vec2,
    pub size: f32,
    pub speed: f32,
}

impl Ship {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            size: SHIP_SIZE,
            speed: SHIP_SPEED,
        }
    }

    pub fn radius(&self) -> f32 {
        self.size / 2.0
    }

    pub fn advance(&mut self) {
        self.pos += self.vel;
    }
}

/// Decorative planet, never moves and never collides
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Planet {
    pub pos: Vec2,
    pub radius: f32,
}

/// A collectible
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    pub id: u32,
    pub pos: Vec2,
    pub size: f32,
    pub collected: bool,
    /// Cosmetic spin in degrees
    pub rotation: f32,
}

impl Resource {
    pub fn new(id: u32, pos: Vec2) -> Self {
        Self {
            id,
            pos,
            size: RESOURCE_SIZE,
            collected: false,
            rotation: 0.0,
        }
    }

    pub fn radius(&self) -> f32 {
        self.size / 2.0
    }

    pub fn advance(&mut self) {
        self.rotation += RESOURCE_SPIN;
    }
}

/// A drifting hazard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comet {
    pub id: u32,
    pub pos: Vec2,
    /// Fixed at creation, units per tick
    pub vel: Vec2,
    pub size: f32,
    /// Cosmetic spin in degrees
    pub rotation: f32,
}

impl Comet {
    pub fn new(id: u32, pos: Vec2, vel: Vec2) -> Self {
        Self {
            id,
            pos,
            vel,
            size: COMET_SIZE,
            rotation: 0.0,
        }
    }

    pub fn radius(&self) -> f32 {
        self.size / 2.0
    }

    pub fn advance(&mut self) {
        self.pos += self.vel;
        self.rotation += COMET_SPIN;
    }
}

/// Background star
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Star {
    pub pos: Vec2,
    pub size: f32,
    pub brightness: f32,
}

/// Complete state of one session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub ship: Ship,
    pub planets: Vec<Planet>,
    /// Collected resources stay in the list with `collected` set
    pub resources: Vec<Resource>,
    pub comets: Vec<Comet>,
    pub stars: Vec<Star>,
    pub score: u32,
    /// Sticky: once set the state never changes again
    pub game_over: bool,
    pub paused: bool,
    pub level: Level,
    pub viewport: Viewport,
    /// Number of updates that actually ran
    pub time_ticks: u64,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Empty state with the ship centered. Entities are filled in by
    /// [`crate::sim::initialize`].
    pub fn new(viewport: Viewport, level: Level) -> Self {
        Self {
            ship: Ship::new(viewport.center()),
            planets: Vec::new(),
            resources: Vec::new(),
            comets: Vec::new(),
            stars: Vec::new(),
            score: 0,
            game_over: false,
            paused: false,
            level,
            viewport,
            time_ticks: 0,
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn uncollected_count(&self) -> usize {
        self.resources.iter().filter(|r| !r.collected).count()
    }

    /// Whether the simulation should advance this tick
    pub fn is_running(&self) -> bool {
        !self.paused && !self.game_over
    }
}
