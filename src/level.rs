//! Level catalog
//!
//! A fixed, ordered table. Level ids are 1-based and match their position
//! in [`LEVELS`] plus one.

use serde::{Deserialize, Serialize};

use crate::consts::{
    BASE_COMETS, BASE_PLANETS, BASE_RESOURCES, COMET_BASE_SPEED, COMET_SPEED_PER_DIFFICULTY,
};
use crate::error::{GameError, Result};
use crate::scaled_count;

/// One entry of the level catalog
///
/// Serialized as its id; deserializing looks the id up in [`LEVELS`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(into = "u8")]
pub struct Level {
    pub id: u8,
    pub name: &'static str,
    /// Scales entity counts and comet speed
    pub difficulty: f32,
    /// Best score on the previous level needed to unlock this one
    pub required_score: u32,
}

/// All levels in play order
pub static LEVELS: [Level; 5] = [
    Level {
        id: 1,
        name: "Nebula",
        difficulty: 1.0,
        required_score: 0,
    },
    Level {
        id: 2,
        name: "Mars",
        difficulty: 1.5,
        required_score: 100,
    },
    Level {
        id: 3,
        name: "Deep Space",
        difficulty: 2.0,
        required_score: 250,
    },
    Level {
        id: 4,
        name: "Red Giant",
        difficulty: 2.5,
        required_score: 500,
    },
    Level {
        id: 5,
        name: "Supernova",
        difficulty: 3.0,
        required_score: 1000,
    },
];

impl Level {
    /// First level, always unlocked
    pub fn first() -> &'static Level {
        &LEVELS[0]
    }

    /// Look up a level by id
    pub fn by_id(id: u8) -> Result<&'static Level> {
        (id as usize)
            .checked_sub(1)
            .and_then(|idx| LEVELS.get(idx))
            .ok_or(GameError::UnknownLevel(id))
    }

    /// The level after this one, if any
    pub fn next(&self) -> Option<&'static Level> {
        LEVELS.get(self.id as usize)
    }

    /// The level before this one, if any
    pub fn previous(&self) -> Option<&'static Level> {
        (self.id as usize).checked_sub(2).and_then(|idx| LEVELS.get(idx))
    }

    pub fn planet_count(&self) -> usize {
        scaled_count(BASE_PLANETS, self.difficulty)
    }

    pub fn resource_count(&self) -> usize {
        scaled_count(BASE_RESOURCES, self.difficulty)
    }

    /// Initial comet count, also the population floor kept during play
    pub fn comet_count(&self) -> usize {
        scaled_count(BASE_COMETS, self.difficulty)
    }

    /// Comet speed in units per tick
    pub fn comet_speed(&self) -> f32 {
        COMET_BASE_SPEED + COMET_SPEED_PER_DIFFICULTY * self.difficulty
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> u8 {
        level.id
    }
}

impl TryFrom<u8> for Level {
    type Error = GameError;

    fn try_from(id: u8) -> Result<Self> {
        Level::by_id(id).copied()
    }
}

// Hand-written so the `'static` name does not leak a `'de: 'static` bound
// into every type that embeds a level.
impl<'de> Deserialize<'de> for Level {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let id = u8::deserialize(deserializer)?;
        Level::try_from(id).map_err(serde::de::Error::custom)
    }
}
