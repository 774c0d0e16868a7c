//! Game settings
//!
//! Loaded from a JSON file; every field has a default so a partial file only
//! overrides what it names.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_SUBSTEPS, SIM_DT};
use crate::error::{GameError, Result};
use crate::level::Level;

/// Runtime configuration for a session host
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Clock ===
    /// Simulation ticks per second
    pub tick_rate: f32,
    /// Maximum ticks run for a single frame
    pub max_substeps: u32,

    // === Progress ===
    /// Where best scores are kept. `None` keeps progress in memory only.
    pub progress_path: Option<PathBuf>,

    // === Demo ===
    /// Level the demo starts on
    pub start_level: u8,
    /// Viewport used by the headless demo
    pub viewport_width: f32,
    pub viewport_height: f32,
    /// Tick budget for the headless demo
    pub demo_ticks: u32,
    /// Fixed RNG seed; `None` draws from the OS
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tick_rate: 1.0 / SIM_DT,
            max_substeps: MAX_SUBSTEPS,

            progress_path: None,

            start_level: 1,
            viewport_width: 800.0,
            viewport_height: 600.0,
            demo_ticks: 60 * 60,
            seed: None,
        }
    }
}

impl Settings {
    /// Load settings from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path).map_err(|source| GameError::SettingsIo {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Settings =
            serde_json::from_str(&json).map_err(|source| GameError::SettingsParse {
                path: path.to_path_buf(),
                source,
            })?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load settings, falling back to defaults when the file is missing or bad
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                log::info!("Using default settings ({})", e);
                Self::default()
            }
        }
    }

    /// Seconds per tick, falling back to the default for a bad tick rate
    pub fn tick_dt(&self) -> f32 {
        if self.tick_rate.is_finite() && self.tick_rate > 0.0 {
            1.0 / self.tick_rate
        } else {
            SIM_DT
        }
    }

    /// Configured start level, or level 1 if the id is unknown
    pub fn level(&self) -> &'static Level {
        Level::by_id(self.start_level).unwrap_or_else(|_| Level::first())
    }
}
