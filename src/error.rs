//! Error types for input validated at the game boundary
//!
//! The simulation itself is total over a valid `GameState`; these errors are
//! only produced where outside data enters (viewport sizes, level ids,
//! configuration files).

use std::path::PathBuf;

/// Errors returned at the boundary of the game core
#[derive(thiserror::Error, Debug)]
pub enum GameError {
    /// Viewport is empty, negative or not finite (e.g. not yet measured)
    #[error("Invalid viewport {width}x{height}")]
    InvalidViewport { width: f32, height: f32 },

    /// Level id outside the catalog
    #[error("Unknown level id: {0}")]
    UnknownLevel(u8),

    /// Level exists but has not been unlocked yet
    #[error("Level {0} is locked")]
    LevelLocked(u8),

    /// Settings file could not be read
    #[error("Failed to read settings {path}: {source}")]
    SettingsIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Settings file is not valid JSON for `Settings`
    #[error("Failed to parse settings {path}: {source}")]
    SettingsParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type for game core operations
pub type Result<T> = std::result::Result<T, GameError>;
